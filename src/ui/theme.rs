use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_CANVAS: Color32 = Color32::from_rgb(24, 24, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(30, 30, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(34, 37, 48);
pub const BG_STICKY: Color32 = Color32::from_rgb(40, 43, 56);
pub const BG_ANCHOR: Color32 = Color32::from_rgba_premultiplied(80, 140, 220, 40);

pub const BORDER: Color32 = Color32::from_rgb(50, 52, 64);
pub const GRID_LINE: Color32 = Color32::from_rgb(44, 46, 58);
pub const ACCENT: Color32 = Color32::from_rgb(80, 140, 220);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(155, 160, 178);
pub const TEXT_DIM: Color32 = Color32::from_rgb(100, 105, 120);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(255, 255, 255);

/// Drag preview pill in the tick row.
pub const DRAG_OVERLAY: Color32 = Color32::from_rgba_premultiplied(150, 150, 152, 180);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const GROUP_ROW_HEIGHT: f32 = 26.0;
pub const TICK_ROW_HEIGHT: f32 = 22.0;
pub const HEADER_HEIGHT: f32 = GROUP_ROW_HEIGHT + TICK_ROW_HEIGHT;
pub const STICKY_WIDTH: f32 = 96.0;
pub const ROW_HEIGHT: f32 = 30.0;
pub const ROW_GAP: f32 = 2.0;
pub const BAR_ROUNDING: f32 = 5.0;
pub const BAR_INSET: f32 = 4.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_group() -> FontId {
    FontId::proportional(13.0)
}

pub fn font_tick() -> FontId {
    FontId::proportional(11.0)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_menu() -> FontId {
    FontId::proportional(13.0)
}

// ── Bar colors ───────────────────────────────────────────────────────────────

pub const BAR_COLORS: &[Color32] = &[
    Color32::from_rgb(66, 133, 244),
    Color32::from_rgb(52, 168, 83),
    Color32::from_rgb(171, 71, 188),
    Color32::from_rgb(251, 140, 0),
    Color32::from_rgb(0, 188, 212),
];

pub fn bar_color(row: usize) -> Color32 {
    BAR_COLORS[row % BAR_COLORS.len()]
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
        &mut visuals.widgets.open,
    ] {
        widget.rounding = Rounding::same(4.0);
    }
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals.window_rounding = Rounding::same(8.0);

    ctx.set_visuals(visuals);
}
