use eframe::egui::{self, RichText};

use crate::routes::{Route, NAV_ITEMS};
use crate::theme;

/// Tab bar for the protected screens; returns the tab the user picked.
pub fn render(ui: &mut egui::Ui, current: Route) -> Option<Route> {
    let mut target = None;
    ui.columns(NAV_ITEMS.len(), |columns| {
        for (column, item) in columns.iter_mut().zip(NAV_ITEMS.iter()) {
            column.vertical_centered(|ui| {
                let active = item.route == current;
                let color = if active { theme::BLUE } else { theme::MUTED };
                let text = RichText::new(format!("{}\n{}", item.icon, item.label)).color(color);
                if ui.selectable_label(active, text).clicked() && !active {
                    target = Some(item.route);
                }
            });
        }
    });
    target
}
