use eframe::egui::{self, RichText};

use crate::app::state::{ProfileState, ProfileTab};
use crate::models::User;
use crate::theme;

use super::{avatar, card, error_banner, ScreenAction};

pub fn render(ui: &mut egui::Ui, state: &mut ProfileState) -> Option<ScreenAction> {
    let mut action = None;

    if let Some(error) = state.load.error() {
        error_banner(ui, error);
        if ui.button("Retry").clicked() {
            action = Some(ScreenAction::ReloadProfile);
        }
        if ui.button("Log Out").clicked() {
            action = Some(ScreenAction::Logout);
        }
        return action;
    }
    let Some(user) = &state.user else {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.spinner();
        });
        return action;
    };

    header(ui, user);
    ui.add_space(8.0);
    stats(ui, user);
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.add_enabled(false, egui::Button::new("✏ Edit Profile"))
            .on_disabled_hover_text("Coming soon");
        if ui.button("Log Out").clicked() {
            action = Some(ScreenAction::Logout);
        }
    });
    ui.separator();

    ui.horizontal(|ui| {
        for tab in ProfileTab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.label());
        }
    });
    ui.add_space(6.0);

    let Some(user) = &state.user else {
        return action;
    };
    match state.tab {
        ProfileTab::Overview => overview(ui, user),
        ProfileTab::Badges => badges(ui, user),
        ProfileTab::Followers => followers(ui, user),
    }
    action
}

fn header(ui: &mut egui::Ui, user: &User) {
    ui.horizontal(|ui| {
        avatar(ui, &user.full_name);
        ui.vertical(|ui| {
            ui.heading(RichText::new(&user.full_name).strong().color(theme::BLUE));
            ui.label(RichText::new(&user.email).color(theme::MUTED));
            ui.label(RichText::new(role_line(user)).color(theme::PURPLE));
        });
    });
}

/// "Student · Form 3", or just the user type when no level was recorded.
fn role_line(user: &User) -> String {
    match user.level.as_deref().map(str::trim) {
        Some(level) if !level.is_empty() => {
            format!("{} · {}", user.user_type.label(), user.level_label())
        }
        _ => user.user_type.label().to_string(),
    }
}

fn stats(ui: &mut egui::Ui, user: &User) {
    let entries = [
        ("Posts", user.posts_count),
        ("Followers", user.followers_count),
        ("Following", user.following_count),
        ("Day streak 🔥", user.streak),
    ];
    ui.columns(entries.len(), |columns| {
        for (column, (label, value)) in columns.iter_mut().zip(entries) {
            column.vertical_centered(|ui| {
                ui.label(RichText::new(value.to_string()).size(20.0).strong().color(theme::BLUE));
                ui.label(RichText::new(label).small().color(theme::MUTED));
            });
        }
    });
}

fn overview(ui: &mut egui::Ui, user: &User) {
    card(ui, |ui| {
        ui.label(RichText::new("About").strong());
        match user.bio.as_deref().filter(|bio| !bio.trim().is_empty()) {
            Some(bio) => ui.label(bio),
            None => ui.label(RichText::new("This user hasn't added a bio yet").color(theme::MUTED)),
        };
    });
    ui.add_space(6.0);
    card(ui, |ui| {
        ui.label(RichText::new("Subjects").strong());
        if user.subjects.is_empty() {
            ui.label(RichText::new("No subjects yet").color(theme::MUTED));
        }
        ui.horizontal_wrapped(|ui| {
            for subject in &user.subjects {
                ui.add_enabled(false, egui::SelectableLabel::new(true, subject.as_str()));
            }
        });
    });
}

fn badges(ui: &mut egui::Ui, user: &User) {
    if user.badges.is_empty() {
        ui.label(RichText::new("No badges earned yet. Keep contributing!").color(theme::MUTED));
        return;
    }
    for badge in &user.badges {
        card(ui, |ui| {
            ui.label(RichText::new(format!("🏆 {badge}")).strong());
        });
        ui.add_space(4.0);
    }
}

fn followers(ui: &mut egui::Ui, user: &User) {
    card(ui, |ui| {
        ui.label(format!(
            "{} followers · following {}",
            user.followers_count, user.following_count
        ));
    });
}
