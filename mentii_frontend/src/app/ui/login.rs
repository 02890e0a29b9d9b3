use eframe::egui::{self, RichText};

use crate::app::state::LoginState;
use crate::routes::Route;
use crate::theme;

use super::{error_banner, primary_button, ScreenAction};

pub fn render(ui: &mut egui::Ui, state: &mut LoginState) -> Option<ScreenAction> {
    let mut action = None;
    ui.vertical_centered(|ui| {
        ui.set_max_width(420.0);
        if ui.button("← Back").clicked() {
            action = Some(ScreenAction::Navigate(Route::Welcome));
        }
        ui.add_space(24.0);
        ui.heading(RichText::new("Welcome Back").strong().color(theme::BLUE));
        ui.label(RichText::new("Log in to continue learning").color(theme::MUTED));
        ui.add_space(16.0);

        if let Some(error) = &state.error {
            error_banner(ui, error);
            ui.add_space(8.0);
        }

        ui.label("Email Address");
        ui.add(
            egui::TextEdit::singleline(&mut state.email)
                .hint_text("you@example.com")
                .desired_width(f32::INFINITY),
        );
        ui.add_space(8.0);

        ui.label("Password");
        let mut pressed_enter = false;
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.password)
                    .password(!state.show_password)
                    .hint_text("Enter your password"),
            );
            pressed_enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let eye = if state.show_password { "🙈" } else { "👁" };
            if ui.button(eye).on_hover_text("Show password").clicked() {
                state.show_password = !state.show_password;
            }
        });
        ui.add_space(16.0);

        let label = if state.submitting { "Logging in..." } else { "Log In" };
        let clicked = ui
            .add_enabled(state.can_submit(), primary_button(label))
            .clicked();
        if clicked || (pressed_enter && state.can_submit()) {
            action = Some(ScreenAction::Login);
        }

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.label("Don't have an account?");
            if ui.link("Sign Up").clicked() {
                action = Some(ScreenAction::Navigate(Route::SignUp));
            }
        });
    });
    action
}
