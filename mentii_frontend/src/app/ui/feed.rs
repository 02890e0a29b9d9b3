use eframe::egui::{self, RichText};

use crate::app::state::FeedState;
use crate::models::Post;
use crate::routes::Route;
use crate::theme;

use super::{
    avatar, banner, card, chips, format_timestamp, list_status, primary_button, search_box,
    ScreenAction,
};

pub fn render(ui: &mut egui::Ui, state: &mut FeedState) -> Option<ScreenAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(RichText::new("Mentii").strong().color(theme::BLUE));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.add(primary_button("+ New Post")).clicked() {
                action = Some(ScreenAction::Navigate(Route::CreatePost));
            }
            if ui.button("⟳").on_hover_text("Refresh").clicked() {
                action = Some(ScreenAction::ReloadPosts);
            }
        });
    });
    ui.add_space(6.0);
    search_box(ui, &mut state.search, "Search subjects, people...");
    ui.add_space(4.0);
    if chips(ui, &mut state.subject_filter, FeedState::filter_options(), |subject| {
        subject.unwrap_or("All")
    }) {
        action = Some(ScreenAction::ReloadPosts);
    }

    if let Some(current) = &state.banner {
        if let Some(retry) = banner(ui, current) {
            action = Some(retry);
        }
    }
    ui.separator();

    let visible = state.visible_posts();
    if !list_status(
        ui,
        &state.load,
        visible.is_empty(),
        "No posts yet. Be the first to share something!",
        ScreenAction::ReloadPosts,
        &mut action,
    ) {
        return action;
    }

    for post in visible {
        if let Some(clicked) = post_card(ui, post) {
            action = Some(clicked);
        }
        ui.add_space(8.0);
    }
    action
}

fn post_card(ui: &mut egui::Ui, post: &Post) -> Option<ScreenAction> {
    let mut action = None;
    card(ui, |ui| {
        ui.horizontal(|ui| {
            avatar(ui, &post.author_name);
            ui.vertical(|ui| {
                ui.label(RichText::new(&post.author_name).strong());
                ui.label(
                    RichText::new(format!(
                        "{} · {}",
                        post.subject,
                        format_timestamp(&post.created_at)
                    ))
                    .small()
                    .color(theme::MUTED),
                );
            });
        });
        ui.add_space(4.0);
        ui.label(&post.content);
        if let Some(url) = &post.image_url {
            ui.hyperlink_to("🖼 View attached image", url);
        }
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let heart = if post.liked {
                RichText::new(format!("♥ {}", post.likes_count)).color(theme::LIKE_RED)
            } else {
                RichText::new(format!("♡ {}", post.likes_count))
            };
            if ui.button(heart).clicked() {
                action = Some(ScreenAction::ToggleLike(post.id));
            }
            ui.label(format!("💬 {}", post.comments_count));
        });
    });
    action
}
