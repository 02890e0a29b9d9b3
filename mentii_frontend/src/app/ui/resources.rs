use eframe::egui::{self, RichText};

use crate::app::state::ResourcesState;
use crate::models::{Resource, ResourceKind, FILTER_SUBJECTS};
use crate::theme;

use super::{card, list_status, search_box, ScreenAction};

pub fn render(ui: &mut egui::Ui, state: &mut ResourcesState) -> Option<ScreenAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(RichText::new("Resources").strong().color(theme::BLUE));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("⟳").on_hover_text("Refresh").clicked() {
                action = Some(ScreenAction::ReloadResources);
            }
        });
    });
    ui.add_space(6.0);
    search_box(ui, &mut state.search, "Search resources...");
    ui.add_space(4.0);

    let mut changed = false;
    ui.horizontal(|ui| {
        egui::ComboBox::from_label("Type")
            .selected_text(state.kind_filter.map(ResourceKind::label).unwrap_or("All"))
            .show_ui(ui, |ui| {
                changed |= ui.selectable_value(&mut state.kind_filter, None, "All").changed();
                for kind in ResourceKind::ALL {
                    changed |= ui
                        .selectable_value(&mut state.kind_filter, Some(kind), kind.label())
                        .changed();
                }
            });
        egui::ComboBox::from_label("Subject")
            .selected_text(state.subject_filter.unwrap_or("All"))
            .show_ui(ui, |ui| {
                changed |= ui
                    .selectable_value(&mut state.subject_filter, None, "All")
                    .changed();
                for subject in FILTER_SUBJECTS {
                    changed |= ui
                        .selectable_value(&mut state.subject_filter, Some(subject), subject)
                        .changed();
                }
            });
    });
    if changed {
        action = Some(ScreenAction::ReloadResources);
    }
    ui.separator();

    let visible = state.visible_resources();
    if !list_status(
        ui,
        &state.load,
        visible.is_empty(),
        "No resources match these filters",
        ScreenAction::ReloadResources,
        &mut action,
    ) {
        return action;
    }

    for resource in visible {
        if resource_card(ui, resource) {
            action = Some(ScreenAction::OpenResource(resource.file_url.clone()));
        }
        ui.add_space(8.0);
    }
    action
}

fn resource_card(ui: &mut egui::Ui, resource: &Resource) -> bool {
    card(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new(resource.kind.icon()).size(28.0));
            ui.vertical(|ui| {
                ui.label(RichText::new(&resource.title).strong().color(theme::BLUE));
                ui.label(
                    RichText::new(format!("{} · {}", resource.subject, resource.level))
                        .small()
                        .color(theme::MUTED),
                );
                ui.label(
                    RichText::new(format!(
                        "By {} · {} downloads",
                        resource.uploaded_by, resource.downloads
                    ))
                    .small()
                    .color(theme::MUTED),
                );
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_enabled(!resource.file_url.is_empty(), egui::Button::new("⬇ Open"))
                    .clicked()
            })
            .inner
        })
        .inner
    })
}
