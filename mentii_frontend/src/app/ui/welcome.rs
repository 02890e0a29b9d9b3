use eframe::egui::{self, RichText};

use crate::routes::Route;
use crate::theme;

use super::{primary_button, ScreenAction};

const FEATURES: [(&str, &str, &str); 3] = [
    ("👥", "Connect", "Join thousands of students and teachers"),
    ("💬", "Learn Together", "Share knowledge and grow together"),
    ("🏆", "Earn Badges", "Get recognized for your contributions"),
];

pub fn render(ui: &mut egui::Ui) -> Option<ScreenAction> {
    let mut action = None;
    ui.vertical_centered(|ui| {
        ui.add_space(48.0);
        ui.label(RichText::new("Mentii").size(44.0).strong().color(theme::BLUE));
        ui.label(
            RichText::new("Learn, share and grow with students and teachers")
                .size(16.0)
                .color(theme::PURPLE),
        );
        ui.add_space(32.0);

        for (icon, title, blurb) in FEATURES {
            ui.label(RichText::new(icon).size(30.0));
            ui.label(RichText::new(title).strong().color(theme::BLUE));
            ui.label(RichText::new(blurb).color(theme::MUTED));
            ui.add_space(14.0);
        }

        ui.add_space(20.0);
        if ui.add(primary_button("Get Started")).clicked() {
            action = Some(ScreenAction::Navigate(Route::SignUp));
        }
        ui.add_space(8.0);
        if ui
            .add(egui::Button::new("I already have an account").min_size(egui::vec2(200.0, 36.0)))
            .clicked()
        {
            action = Some(ScreenAction::Navigate(Route::Login));
        }
    });
    action
}
