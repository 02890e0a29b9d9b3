use chrono::{DateTime, Local};
use eframe::egui::{self, Color32, RichText};

use crate::models::Conversation;
use crate::routes::Route;
use crate::theme;

use super::state::{Banner, LoadState, RetryAction, ViewState, ViewStatus};

pub mod bottom_nav;
mod chat;
mod communities;
mod community_detail;
mod create_post;
mod feed;
mod login;
mod profile;
mod resources;
mod signup;
mod welcome;

/// What a screen asks the app to do after a frame.
pub enum ScreenAction {
    Navigate(Route),
    Login,
    SignUp,
    Logout,
    ReloadPosts,
    ToggleLike(i64),
    ReloadCommunities,
    ToggleJoin(i64),
    ReloadCommunity,
    PostToCommunity,
    ReloadConversations,
    OpenConversation(Conversation),
    ReloadMessages(i64),
    SendMessage,
    ReloadResources,
    OpenResource(String),
    ReloadProfile,
    SubmitPost,
    PickImage,
    Retry(RetryAction),
}

pub fn render_view(ui: &mut egui::Ui, view: &mut ViewState) -> Option<ScreenAction> {
    match view {
        ViewState::Welcome => welcome::render(ui),
        ViewState::SignUp(state) => signup::render(ui, state),
        ViewState::Login(state) => login::render(ui, state),
        ViewState::Feed(state) => feed::render(ui, state),
        ViewState::Communities(state) => communities::render(ui, state),
        ViewState::CommunityDetail(state) => community_detail::render(ui, state),
        ViewState::Chat(state) => chat::render(ui, state),
        ViewState::Resources(state) => resources::render(ui, state),
        ViewState::Profile(state) => profile::render(ui, state),
        ViewState::CreatePost(state) => create_post::render(ui, state),
    }
}

fn primary_button(text: &str) -> egui::Button<'static> {
    egui::Button::new(RichText::new(text).strong().color(Color32::WHITE))
        .fill(theme::BLUE)
        .rounding(18.0)
        .min_size(egui::vec2(200.0, 36.0))
}

fn card<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::group(ui.style())
        .rounding(12.0)
        .inner_margin(egui::Margin::same(12.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .inner
}

fn error_banner(ui: &mut egui::Ui, message: &str) {
    egui::Frame::none()
        .fill(theme::ERROR_FILL)
        .rounding(8.0)
        .inner_margin(egui::Margin::same(12.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.colored_label(theme::ERROR_TEXT, RichText::new("Error").strong());
            ui.colored_label(theme::ERROR_TEXT, message);
        });
}

/// Failed write banner; yields a retry action when the user asks for one.
fn banner(ui: &mut egui::Ui, banner: &Banner) -> Option<ScreenAction> {
    let mut action = None;
    egui::Frame::none()
        .fill(theme::ERROR_FILL)
        .rounding(8.0)
        .inner_margin(egui::Margin::same(10.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.colored_label(theme::ERROR_TEXT, banner.message.as_str());
                if let Some(retry) = &banner.retry {
                    if ui.button("Retry").clicked() {
                        action = Some(ScreenAction::Retry(retry.clone()));
                    }
                }
            });
        });
    action
}

/// Draws the loading, empty and error placeholders. Returns true when the
/// caller should render its items.
fn list_status(
    ui: &mut egui::Ui,
    load: &LoadState,
    is_empty: bool,
    empty_text: &str,
    reload: ScreenAction,
    action: &mut Option<ScreenAction>,
) -> bool {
    match load.status(is_empty) {
        ViewStatus::Ready => true,
        ViewStatus::Loading => {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.spinner();
            });
            false
        }
        ViewStatus::Empty => {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.label(RichText::new(empty_text).color(theme::MUTED));
            });
            false
        }
        ViewStatus::Error => {
            error_banner(ui, load.error().unwrap_or_default());
            if ui.button("Retry").clicked() {
                *action = Some(reload);
            }
            false
        }
    }
}

fn search_box(ui: &mut egui::Ui, query: &mut String, hint: &str) -> egui::Response {
    ui.add(
        egui::TextEdit::singleline(query)
            .hint_text(format!("🔍 {hint}"))
            .desired_width(f32::INFINITY),
    )
}

/// A row of mutually exclusive filter chips; returns true when the selection changed.
fn chips<T: PartialEq + Copy>(
    ui: &mut egui::Ui,
    current: &mut T,
    options: impl IntoIterator<Item = T>,
    label: impl Fn(T) -> &'static str,
) -> bool {
    let mut changed = false;
    ui.horizontal_wrapped(|ui| {
        for option in options {
            let selected = *current == option;
            if ui.selectable_label(selected, label(option)).clicked() && !selected {
                *current = option;
                changed = true;
            }
        }
    });
    changed
}

fn avatar(ui: &mut egui::Ui, name: &str) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(36.0, 36.0), egui::Sense::hover());
    let painter = ui.painter();
    painter.circle_filled(rect.center(), 18.0, theme::MINT);
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        initials(name),
        egui::FontId::proportional(14.0),
        theme::BLUE,
    );
}

fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

fn format_timestamp(ts: &str) -> String {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Local).format("%b %d, %H:%M").to_string())
        .unwrap_or_else(|_| ts.to_string())
}
