use eframe::egui::{self, RichText};

use crate::app::state::CommunityDetailState;
use crate::models::CommunityPost;
use crate::routes::Route;
use crate::theme;

use super::{avatar, banner, card, error_banner, format_timestamp, primary_button, ScreenAction};

pub fn render(ui: &mut egui::Ui, state: &mut CommunityDetailState) -> Option<ScreenAction> {
    let mut action = None;

    if ui.button("← Communities").clicked() {
        action = Some(ScreenAction::Navigate(Route::Communities));
    }
    ui.add_space(6.0);

    if let Some(error) = state.load.error() {
        error_banner(ui, error);
        if ui.button("Retry").clicked() {
            action = Some(ScreenAction::ReloadCommunity);
        }
        return action;
    }
    let Some(community) = &state.community else {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.spinner();
        });
        return action;
    };

    ui.heading(RichText::new(&community.name).strong().color(theme::BLUE));
    ui.label(
        RichText::new(format!(
            "{} · {} members",
            community.subject, community.members_count
        ))
        .color(theme::MUTED),
    );
    ui.add_space(6.0);
    ui.label(&community.description);
    if let Some(about) = &community.about {
        ui.collapsing("About", |ui| ui.label(about));
    }
    ui.add_space(6.0);
    let label = if community.joined { "✓ Joined" } else { "Join Community" };
    if ui.selectable_label(community.joined, label).clicked() {
        action = Some(ScreenAction::ToggleJoin(state.community_id));
    }
    let joined = community.joined;

    if let Some(current) = &state.banner {
        if let Some(retry) = banner(ui, current) {
            action = Some(retry);
        }
    }
    ui.separator();

    if joined {
        ui.add(
            egui::TextEdit::multiline(&mut state.draft)
                .hint_text("Share something with the community...")
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );
        let label = if state.posting { "Posting..." } else { "Post" };
        let enabled = !state.posting && !state.draft.trim().is_empty();
        if ui.add_enabled(enabled, primary_button(label)).clicked() {
            action = Some(ScreenAction::PostToCommunity);
        }
        ui.separator();
    }

    let Some(community) = &state.community else {
        return action;
    };
    if community.posts.is_empty() {
        ui.label(RichText::new("No posts in this community yet").color(theme::MUTED));
    }
    for post in &community.posts {
        post_card(ui, post);
        ui.add_space(8.0);
    }
    action
}

fn post_card(ui: &mut egui::Ui, post: &CommunityPost) {
    card(ui, |ui| {
        ui.horizontal(|ui| {
            avatar(ui, &post.author_name);
            ui.vertical(|ui| {
                ui.label(RichText::new(&post.author_name).strong());
                ui.label(
                    RichText::new(format_timestamp(&post.created_at))
                        .small()
                        .color(theme::MUTED),
                );
            });
        });
        ui.label(&post.content);
        let heart = if post.liked { "♥" } else { "♡" };
        ui.label(format!("{heart} {}", post.likes_count));
    });
}
