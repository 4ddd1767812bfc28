use chrono::NaiveDateTime;
use egui::{Align2, Id, Pos2, Rect, RichText, Rounding, Sense, Stroke, Ui, Vec2};

use crate::ui::theme;
use gantt_timeline::model::{
    project_offsets, Calendar, DragOverlay, DragRange, Gregorian, ScaleConfig, StickyTracker,
    TaskCollection, Timeline,
};

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_GAP: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;

#[derive(Debug, Clone)]
struct DragSnapshot {
    start: NaiveDateTime,
    end: NaiveDateTime,
    start_pointer_x: f32,
    bar_left: f32,
    bar_width: f32,
    latest: Option<DragRange>,
}

/// What happened in the chart this frame.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    /// Live preview of the bar being dragged.
    pub dragging: Option<DragRange>,
    /// Task id and final range of a drag released this frame.
    pub dropped: Option<(String, DragRange)>,
}

/// Render the timeline header and task rows.
///
/// `drag` is the preview from the previous frame; it drives the overlay in
/// the tick row. The sticky label is refreshed from the scroll offset
/// every frame through `tracker`.
pub fn show_timeline(
    tasks: &TaskCollection,
    timeline: &Timeline,
    config: &ScaleConfig,
    drag: Option<&DragRange>,
    tracker: &mut StickyTracker,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();

    if timeline.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new("No datable tasks to lay out").color(theme::TEXT_DIM));
        });
        return interaction;
    }

    let available = ui.available_size();
    let chart_width = timeline.total_width().max(available.x);
    let chart_height =
        (HEADER_HEIGHT + tasks.len() as f32 * (ROW_HEIGHT + ROW_GAP) + 40.0).max(available.y);

    let output = egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) =
                ui.allocate_painter(Vec2::new(chart_width, chart_height), Sense::hover());
            let origin = response.rect.min;
            painter.rect_filled(response.rect, 0.0, theme::BG_CANVAS);

            draw_header(&painter, origin, timeline, config, drag, chart_width, chart_height);

            for (row, (id, dates)) in tasks.iter().enumerate() {
                let y = origin.y + HEADER_HEIGHT + row as f32 * (ROW_HEIGHT + ROW_GAP);
                if row % 2 == 0 {
                    painter.rect_filled(
                        Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(chart_width, ROW_HEIGHT)),
                        0.0,
                        theme::BG_PANEL,
                    );
                }

                let Some(range) = dates.range() else {
                    painter.text(
                        Pos2::new(origin.x + 8.0, y + ROW_HEIGHT / 2.0),
                        Align2::LEFT_CENTER,
                        format!("{} (unscheduled)", id),
                        theme::font_bar(),
                        theme::TEXT_DIM,
                    );
                    continue;
                };

                let offset = project_offsets(&Gregorian, range, &timeline.cells, config);
                let bar_rect = Rect::from_min_size(
                    Pos2::new(origin.x + offset.margin_left, y + theme::BAR_INSET),
                    Vec2::new(offset.width, ROW_HEIGHT - theme::BAR_INSET * 2.0),
                );
                draw_bar(&painter, bar_rect, id, theme::bar_color(row));

                let response = ui.interact(
                    bar_rect,
                    ui.make_persistent_id(("task-bar", id)),
                    Sense::drag(),
                );
                let key = drag_id(id);

                if response.drag_started() {
                    let ptr_x = response.interact_pointer_pos().map_or(0.0, |p| p.x);
                    ui.ctx().data_mut(|data| {
                        data.insert_temp(
                            key,
                            DragSnapshot {
                                start: range.start_date,
                                end: range.end_date,
                                start_pointer_x: ptr_x,
                                bar_left: offset.margin_left,
                                bar_width: offset.width,
                                latest: None,
                            },
                        );
                    });
                }

                if response.dragged() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
                    let ptr_x = response.interact_pointer_pos().map(|p| p.x);
                    let snapshot = ui.ctx().data(|data| data.get_temp::<DragSnapshot>(key));
                    if let (Some(mut snapshot), Some(ptr_x)) = (snapshot, ptr_x) {
                        let preview = snap_drag(&snapshot, ptr_x - snapshot.start_pointer_x, config);
                        let ghost = project_offsets(&Gregorian, preview.range(), &timeline.cells, config);
                        painter.rect_stroke(
                            Rect::from_min_size(
                                Pos2::new(origin.x + ghost.margin_left, bar_rect.top()),
                                Vec2::new(ghost.width, bar_rect.height()),
                            ),
                            Rounding::same(theme::BAR_ROUNDING),
                            Stroke::new(1.5, theme::ACCENT),
                        );
                        snapshot.latest = Some(preview);
                        ui.ctx().data_mut(|data| data.insert_temp(key, snapshot));
                        interaction.dragging = Some(preview);
                    }
                }

                if response.drag_stopped() {
                    let snapshot = ui.ctx().data_mut(|data| {
                        let snapshot = data.get_temp::<DragSnapshot>(key);
                        data.remove::<DragSnapshot>(key);
                        snapshot
                    });
                    if let Some(latest) = snapshot.and_then(|s| s.latest) {
                        interaction.dropped = Some((id.clone(), latest));
                    }
                }
            }
        });

    tracker.on_scroll(output.state.offset.x);
    draw_sticky_label(ui.painter(), output.inner_rect, tracker.label());

    interaction
}

fn drag_id(task_id: &str) -> Id {
    Id::new(("drag", task_id))
}

/// Snap a pointer delta to whole drag steps and shift the snapshot by it.
fn snap_drag(snapshot: &DragSnapshot, delta_x: f32, config: &ScaleConfig) -> DragRange {
    let steps = (delta_x / config.base_px_per_drag_step).round();
    let units = (steps * config.drag_step_amount).round() as i64;
    DragRange {
        start_date: Gregorian.add(snapshot.start, units, config.drag_step_unit),
        end_date: Gregorian.add(snapshot.end, units, config.drag_step_unit),
        bar_left: snapshot.bar_left + steps * config.base_px_per_drag_step,
        bar_width: snapshot.bar_width,
    }
}

fn draw_header(
    painter: &egui::Painter,
    origin: Pos2,
    timeline: &Timeline,
    config: &ScaleConfig,
    drag: Option<&DragRange>,
    width: f32,
    height: f32,
) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );

    // Group row. The first label is covered by the sticky slot.
    for (idx, group) in timeline.groups.iter().enumerate() {
        let rect = Rect::from_min_size(
            Pos2::new(origin.x + group.left, origin.y),
            Vec2::new(group.width_px, theme::GROUP_ROW_HEIGHT),
        );
        painter.line_segment(
            [rect.left_top(), rect.left_bottom()],
            Stroke::new(1.0, theme::BORDER),
        );
        if idx > 0 {
            painter.with_clip_rect(rect).text(
                Pos2::new(rect.left() + 16.0, rect.center().y),
                Align2::LEFT_CENTER,
                &group.label,
                theme::font_group(),
                theme::TEXT_PRIMARY,
            );
        }
    }

    let tick_top = origin.y + theme::GROUP_ROW_HEIGHT;
    painter.line_segment(
        [Pos2::new(origin.x, tick_top), Pos2::new(origin.x + width, tick_top)],
        Stroke::new(1.0, theme::BORDER),
    );

    let overlay = drag.map(|d| DragOverlay::resolve(&Gregorian, d, &timeline.cells, config));
    let anchor = overlay.and_then(|o| o.anchor_cell);

    let mut x = origin.x;
    for (idx, cell) in timeline.cells.iter().enumerate() {
        let rect = Rect::from_min_size(
            Pos2::new(x, tick_top),
            Vec2::new(cell.width_px, theme::TICK_ROW_HEIGHT),
        );
        if anchor == Some(idx) {
            painter.rect_filled(rect, 0.0, theme::BG_ANCHOR);
        }

        let label = config.tick_label(cell.start_date);
        if !label.is_empty() {
            painter.with_clip_rect(rect).text(
                rect.center(),
                Align2::CENTER_CENTER,
                label,
                theme::font_tick(),
                theme::TEXT_SECONDARY,
            );
        }

        painter.line_segment(
            [Pos2::new(x, tick_top), Pos2::new(x, origin.y + height)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        x += cell.width_px;
    }

    if let Some(overlay) = overlay {
        let pill = Rect::from_min_size(
            Pos2::new(origin.x + overlay.offset.margin_left, tick_top + 1.0),
            Vec2::new(overlay.offset.width, theme::TICK_ROW_HEIGHT - 2.0),
        );
        painter.rect_filled(pill, Rounding::same(theme::TICK_ROW_HEIGHT / 2.0), theme::DRAG_OVERLAY);
    }

    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER),
    );
}

fn draw_bar(painter: &egui::Painter, rect: Rect, label: &str, color: egui::Color32) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    painter.rect_filled(rect.translate(Vec2::new(1.0, 2.0)), rounding, egui::Color32::from_black_alpha(35));
    painter.rect_filled(rect, rounding, color);

    if rect.width() > 30.0 {
        painter.with_clip_rect(rect).text(
            Pos2::new(rect.left() + 6.0, rect.center().y),
            Align2::LEFT_CENTER,
            label,
            theme::font_bar(),
            theme::TEXT_ON_BAR,
        );
    }
}

fn draw_sticky_label(painter: &egui::Painter, viewport: Rect, label: &str) {
    let rect = Rect::from_min_size(
        viewport.min,
        Vec2::new(theme::STICKY_WIDTH, theme::GROUP_ROW_HEIGHT),
    );
    painter.rect_filled(rect, 0.0, theme::BG_STICKY);
    painter.with_clip_rect(rect).text(
        rect.center(),
        Align2::CENTER_CENTER,
        label,
        theme::font_group(),
        theme::TEXT_PRIMARY,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantt_timeline::model::{ScaleKey, ScaleRegistry};

    fn snapshot() -> DragSnapshot {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        DragSnapshot {
            start,
            end: Gregorian.add(start, 3, gantt_timeline::model::TimeUnit::Day),
            start_pointer_x: 0.0,
            bar_left: 400.0,
            bar_width: 120.0,
            latest: None,
        }
    }

    #[test]
    fn drag_snaps_to_whole_steps() {
        let registry = ScaleRegistry::builtin();
        let day = registry.get(ScaleKey::Day).unwrap();
        let snap = snapshot();

        // 40 px per day; 55 px rounds to one day.
        let moved = snap_drag(&snap, 55.0, day);
        assert_eq!(moved.start_date, Gregorian.add(snap.start, 1, day.drag_step_unit));
        assert_eq!(moved.bar_left, 440.0);
        assert_eq!(moved.bar_width, 120.0);

        let back = snap_drag(&snap, -90.0, day);
        assert_eq!(back.end_date, Gregorian.subtract(snap.end, 2, day.drag_step_unit));

        let still = snap_drag(&snap, 10.0, day);
        assert_eq!(still.range(), gantt_timeline::model::DateRange::new(snap.start, snap.end));
    }
}
