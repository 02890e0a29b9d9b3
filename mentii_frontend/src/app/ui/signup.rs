use eframe::egui::{self, RichText};

use crate::app::state::{SignUpState, SIGNUP_STEPS};
use crate::models::{Level, UserType, SUBJECTS};
use crate::routes::Route;
use crate::theme;

use super::{error_banner, primary_button, ScreenAction};

pub fn render(ui: &mut egui::Ui, state: &mut SignUpState) -> Option<ScreenAction> {
    let mut action = None;
    ui.vertical_centered(|ui| {
        ui.set_max_width(420.0);
        ui.add_space(16.0);
        ui.heading(RichText::new("Create Account").strong().color(theme::BLUE));
        ui.add(
            egui::ProgressBar::new(state.step as f32 / SIGNUP_STEPS as f32)
                .text(format!("Step {} of {}", state.step, SIGNUP_STEPS)),
        );
        ui.add_space(12.0);

        if let Some(error) = &state.error {
            error_banner(ui, error);
            ui.add_space(8.0);
        }

        match state.step {
            1 => account_step(ui, state),
            2 => role_step(ui, state),
            3 => level_step(ui, state),
            _ => subjects_step(ui, state),
        }

        ui.add_space(16.0);
        ui.horizontal(|ui| {
            if state.step > 1 && ui.button("Back").clicked() {
                state.back();
            }
            if state.step < SIGNUP_STEPS {
                if ui.add(primary_button("Next")).clicked() {
                    state.next();
                }
            } else {
                let label = if state.submitting {
                    "Creating account..."
                } else {
                    "Create Account"
                };
                if ui
                    .add_enabled(state.can_submit(), primary_button(label))
                    .clicked()
                {
                    action = Some(ScreenAction::SignUp);
                }
            }
        });

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.label("Already have an account?");
            if ui.link("Log In").clicked() {
                action = Some(ScreenAction::Navigate(Route::Login));
            }
        });
    });
    action
}

fn field(ui: &mut egui::Ui, label: &str, value: &mut String, hint: &str, password: bool) {
    ui.label(label);
    ui.add(
        egui::TextEdit::singleline(value)
            .password(password)
            .hint_text(hint)
            .desired_width(f32::INFINITY),
    );
    ui.add_space(6.0);
}

fn account_step(ui: &mut egui::Ui, state: &mut SignUpState) {
    field(ui, "Full Name", &mut state.full_name, "Jane Doe", false);
    field(ui, "Email Address", &mut state.email, "you@example.com", false);
    field(ui, "Password", &mut state.password, "At least 6 characters", true);
    field(ui, "Confirm Password", &mut state.confirm_password, "Repeat password", true);
}

fn role_step(ui: &mut egui::Ui, state: &mut SignUpState) {
    ui.label(RichText::new("I am a...").strong());
    for user_type in UserType::ALL {
        ui.add_space(6.0);
        let text = RichText::new(format!("{}\n{}", user_type.label(), user_type.description()));
        let width = ui.available_width();
        if ui
            .add_sized(
                [width, 48.0],
                egui::SelectableLabel::new(state.user_type == user_type, text),
            )
            .clicked()
        {
            state.user_type = user_type;
        }
    }
}

fn level_step(ui: &mut egui::Ui, state: &mut SignUpState) {
    let heading = match state.user_type {
        UserType::Student => "What level are you studying at?",
        UserType::Teacher => "What level do you teach?",
    };
    ui.label(RichText::new(heading).strong());
    ui.add_space(6.0);
    egui::ComboBox::from_label("Level")
        .selected_text(state.level.label())
        .show_ui(ui, |ui| {
            for level in Level::ALL {
                ui.selectable_value(&mut state.level, level, level.label());
            }
        });
}

fn subjects_step(ui: &mut egui::Ui, state: &mut SignUpState) {
    ui.label(RichText::new("Pick your subjects").strong());
    ui.label(RichText::new("Choose at least one").color(theme::MUTED));
    ui.add_space(6.0);
    egui::Grid::new("signup_subjects")
        .num_columns(2)
        .spacing([8.0, 8.0])
        .show(ui, |ui| {
            for (index, subject) in SUBJECTS.iter().enumerate() {
                let selected = state.has_subject(subject);
                let text = if selected {
                    format!("✓ {subject}")
                } else {
                    subject.to_string()
                };
                if ui
                    .add_sized([180.0, 32.0], egui::SelectableLabel::new(selected, text))
                    .clicked()
                {
                    state.toggle_subject(subject);
                }
                if index % 2 == 1 {
                    ui.end_row();
                }
            }
        });
}
