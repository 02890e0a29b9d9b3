//! Mentii brand palette and the light visuals built from it.
use eframe::egui::{self, Color32};

pub const BLUE: Color32 = Color32::from_rgb(29, 53, 87);
pub const PURPLE: Color32 = Color32::from_rgb(127, 90, 240);
pub const MINT: Color32 = Color32::from_rgb(77, 213, 200);
pub const GRAY: Color32 = Color32::from_rgb(245, 245, 245);
pub const MUTED: Color32 = Color32::from_rgb(102, 102, 102);
pub const LIKE_RED: Color32 = Color32::from_rgb(239, 68, 68);
pub const ERROR_FILL: Color32 = Color32::from_rgb(254, 226, 226);
pub const ERROR_TEXT: Color32 = Color32::from_rgb(153, 27, 27);

/// Scales each channel towards black; `factor` is clamped to `0.0..=1.0`.
pub fn darken(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    let scale = |channel: u8| (channel as f32 * factor).round() as u8;
    Color32::from_rgb(scale(color.r()), scale(color.g()), scale(color.b()))
}

pub fn mentii_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::light();

    visuals.panel_fill = Color32::WHITE;
    visuals.window_fill = Color32::WHITE;
    visuals.extreme_bg_color = GRAY;
    visuals.faint_bg_color = GRAY;
    visuals.hyperlink_color = PURPLE;

    visuals.selection.bg_fill = MINT;
    visuals.selection.stroke.color = BLUE;

    visuals.widgets.inactive.weak_bg_fill = GRAY;
    visuals.widgets.inactive.bg_fill = GRAY;
    visuals.widgets.hovered.weak_bg_fill = darken(MINT, 0.9);
    visuals.widgets.hovered.bg_stroke.color = MINT;
    visuals.widgets.active.weak_bg_fill = darken(MINT, 0.8);
    visuals.widgets.noninteractive.fg_stroke.color = BLUE;

    visuals.window_stroke.color = darken(GRAY, 0.85);
    visuals
}

pub fn apply(ctx: &egui::Context) {
    ctx.set_visuals(mentii_visuals());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn darken_scales_channels() {
        assert_eq!(darken(Color32::from_rgb(200, 100, 50), 0.5), Color32::from_rgb(100, 50, 25));
        assert_eq!(darken(MINT, 1.0), MINT);
        assert_eq!(darken(MINT, -3.0), Color32::from_rgb(0, 0, 0));
    }

    #[test]
    fn visuals_use_brand_selection() {
        let visuals = mentii_visuals();
        assert!(!visuals.dark_mode);
        assert_eq!(visuals.selection.bg_fill, MINT);
    }
}
