use eframe::egui::{self, RichText};

use crate::app::state::CreatePostState;
use crate::models::SUBJECTS;
use crate::routes::Route;
use crate::theme;

use super::{error_banner, primary_button, ScreenAction};

pub fn render(ui: &mut egui::Ui, state: &mut CreatePostState) -> Option<ScreenAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        if ui.button("✕ Cancel").clicked() {
            action = Some(ScreenAction::Navigate(Route::Feed));
        }
        ui.heading(RichText::new("Create Post").strong().color(theme::BLUE));
    });
    ui.separator();

    if let Some(error) = &state.error {
        error_banner(ui, error);
        ui.add_space(8.0);
    }

    egui::ComboBox::from_label("Subject")
        .selected_text(state.subject)
        .show_ui(ui, |ui| {
            for subject in SUBJECTS {
                ui.selectable_value(&mut state.subject, subject, subject);
            }
        });
    ui.add_space(6.0);

    ui.add(
        egui::TextEdit::multiline(&mut state.content)
            .hint_text("What do you want to share?")
            .desired_rows(6)
            .desired_width(f32::INFINITY),
    );
    ui.add_space(6.0);

    let attached = state.image.as_ref().map(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    });
    ui.horizontal(|ui| {
        match attached {
            Some(name) => {
                ui.label(format!("🖼 {name}"));
                if ui.small_button("✕").on_hover_text("Remove image").clicked() {
                    state.image = None;
                }
            }
            None => {
                if ui.button("📷 Add Image").clicked() {
                    action = Some(ScreenAction::PickImage);
                }
            }
        }
    });
    ui.add_space(12.0);

    let label = if state.submitting { "Posting..." } else { "Post" };
    if ui
        .add_enabled(!state.submitting, primary_button(label))
        .clicked()
    {
        action = Some(ScreenAction::SubmitPost);
    }
    action
}
