use eframe::egui::{self, RichText};

use crate::app::state::CommunitiesState;
use crate::models::{Community, Level};
use crate::routes::Route;
use crate::theme;

use super::{banner, card, chips, list_status, search_box, ScreenAction};

pub fn render(ui: &mut egui::Ui, state: &mut CommunitiesState) -> Option<ScreenAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(RichText::new("Communities").strong().color(theme::BLUE));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("⟳").on_hover_text("Refresh").clicked() {
                action = Some(ScreenAction::ReloadCommunities);
            }
        });
    });
    ui.add_space(6.0);
    search_box(ui, &mut state.search, "Search communities...");
    ui.add_space(4.0);
    if chips(
        ui,
        &mut state.level_filter,
        CommunitiesState::filter_options(),
        |level: Option<Level>| level.map(Level::label).unwrap_or("All"),
    ) {
        action = Some(ScreenAction::ReloadCommunities);
    }

    if let Some(current) = &state.banner {
        if let Some(retry) = banner(ui, current) {
            action = Some(retry);
        }
    }
    ui.separator();

    let visible = state.visible_communities();
    if !list_status(
        ui,
        &state.load,
        visible.is_empty(),
        "No communities found",
        ScreenAction::ReloadCommunities,
        &mut action,
    ) {
        return action;
    }

    for community in visible {
        if let Some(clicked) = community_card(ui, community) {
            action = Some(clicked);
        }
        ui.add_space(8.0);
    }
    action
}

fn community_card(ui: &mut egui::Ui, community: &Community) -> Option<ScreenAction> {
    let mut action = None;
    card(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new(&community.icon).size(28.0));
            ui.vertical(|ui| {
                let title = RichText::new(&community.name).strong().color(theme::BLUE);
                if ui.link(title).clicked() {
                    action = Some(ScreenAction::Navigate(Route::CommunityDetail(community.id)));
                }
                ui.label(
                    RichText::new(format!(
                        "{} · {} members",
                        community.subject, community.members_count
                    ))
                    .small()
                    .color(theme::MUTED),
                );
            });
        });
        if !community.description.is_empty() {
            ui.label(&community.description);
        }
        ui.add_space(4.0);
        let label = if community.joined { "✓ Joined" } else { "Join" };
        if ui
            .selectable_label(community.joined, label)
            .clicked()
        {
            action = Some(ScreenAction::ToggleJoin(community.id));
        }
    });
    action
}
