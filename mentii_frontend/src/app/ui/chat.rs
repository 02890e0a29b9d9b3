use eframe::egui::{self, Color32, RichText};

use crate::app::state::ChatState;
use crate::models::{Conversation, Message};
use crate::theme;

use super::{avatar, banner, card, list_status, primary_button, search_box, ScreenAction};

pub fn render(ui: &mut egui::Ui, state: &mut ChatState) -> Option<ScreenAction> {
    if state.selected.is_some() {
        conversation_view(ui, state)
    } else {
        inbox(ui, state)
    }
}

fn inbox(ui: &mut egui::Ui, state: &mut ChatState) -> Option<ScreenAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        ui.heading(RichText::new("Messages").strong().color(theme::BLUE));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("⟳").on_hover_text("Refresh").clicked() {
                action = Some(ScreenAction::ReloadConversations);
            }
        });
    });
    ui.add_space(6.0);
    search_box(ui, &mut state.search, "Search conversations...");
    ui.separator();

    let visible = state.visible_conversations();
    if !list_status(
        ui,
        &state.load,
        visible.is_empty(),
        "No conversations yet",
        ScreenAction::ReloadConversations,
        &mut action,
    ) {
        return action;
    }

    for conversation in visible {
        if conversation_row(ui, conversation) {
            action = Some(ScreenAction::OpenConversation(conversation.clone()));
        }
        ui.add_space(4.0);
    }
    action
}

fn conversation_row(ui: &mut egui::Ui, conversation: &Conversation) -> bool {
    card(ui, |ui| {
        ui.horizontal(|ui| {
            avatar(ui, &conversation.user_name);
            let opened = ui
                .vertical(|ui| {
                    let mut name = RichText::new(&conversation.user_name);
                    if conversation.unread {
                        name = name.strong();
                    }
                    let opened = ui.link(name).clicked();
                    ui.label(
                        RichText::new(&conversation.last_message)
                            .small()
                            .color(theme::MUTED),
                    );
                    opened
                })
                .inner;
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                if conversation.unread {
                    ui.colored_label(theme::MINT, "●");
                }
                ui.label(RichText::new(&conversation.timestamp).small().color(theme::MUTED));
            });
            opened
        })
        .inner
    })
}

fn conversation_view(ui: &mut egui::Ui, state: &mut ChatState) -> Option<ScreenAction> {
    let mut action = None;
    let Some(selected) = state.selected.clone() else {
        return None;
    };

    ui.horizontal(|ui| {
        if ui.button("←").on_hover_text("Back to messages").clicked() {
            state.close_conversation();
        }
        avatar(ui, &selected.user_name);
        ui.label(RichText::new(&selected.user_name).strong().color(theme::BLUE));
    });
    if state.selected.is_none() {
        return action;
    }
    ui.separator();

    if let Some(current) = &state.banner {
        if let Some(retry) = banner(ui, current) {
            action = Some(retry);
        }
    }

    if list_status(
        ui,
        &state.messages_load,
        state.messages.is_empty(),
        "Say hello to start the conversation",
        ScreenAction::ReloadMessages(selected.id),
        &mut action,
    ) {
        for message in &state.messages {
            bubble(ui, message);
        }
    }

    ui.separator();
    let mut pressed_enter = false;
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.draft)
                .hint_text("Type a message...")
                .desired_width(ui.available_width() - 90.0),
        );
        pressed_enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let enabled = !state.sending && !state.draft.trim().is_empty();
        let clicked = ui
            .add_enabled(enabled, primary_button("Send").min_size(egui::vec2(80.0, 30.0)))
            .clicked();
        if clicked || (pressed_enter && enabled) {
            action = Some(ScreenAction::SendMessage);
        }
    });
    action
}

fn bubble(ui: &mut egui::Ui, message: &Message) {
    let (layout, fill, text_color) = if message.is_own {
        (
            egui::Layout::right_to_left(egui::Align::TOP),
            theme::BLUE,
            Color32::WHITE,
        )
    } else {
        (
            egui::Layout::left_to_right(egui::Align::TOP),
            theme::GRAY,
            theme::BLUE,
        )
    };
    ui.with_layout(layout, |ui| {
        egui::Frame::none()
            .fill(fill)
            .rounding(12.0)
            .inner_margin(egui::Margin::symmetric(10.0, 6.0))
            .show(ui, |ui| {
                ui.set_max_width(320.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(&message.content).color(text_color));
                    ui.label(RichText::new(&message.timestamp).small().color(text_color));
                });
            });
    });
    ui.add_space(4.0);
}
