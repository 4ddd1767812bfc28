use super::calendar::{Calendar, TimeUnit};
use super::scale::ScaleConfig;
use super::task::{DateRange, DragRange};
use super::timeline::{cell_end, TickCell};

/// Horizontal placement of a bar relative to the first cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BarOffset {
    pub margin_left: f32,
    pub width: f32,
}

/// Place `range` against `cells`.
///
/// Cells ending at or before the range start push the margin; any cell that
/// touches `[start, end)` adds its full width. Widths never drop below one
/// pixel so empty and inverted ranges stay visible.
pub fn project_offsets(
    calendar: &impl Calendar,
    range: DateRange,
    cells: &[TickCell],
    config: &ScaleConfig,
) -> BarOffset {
    if cells.is_empty() {
        return BarOffset::default();
    }

    let mut margin_left = 0.0;
    let mut width = 0.0;

    for cell in cells {
        if cell_end(calendar, cell, config) <= range.start_date {
            margin_left += cell.width_px;
            continue;
        }
        if cell.start_date >= range.end_date {
            break;
        }
        width += cell.width_px;
    }

    BarOffset {
        margin_left,
        width: f32::max(width, 1.0),
    }
}

/// Index of the first cell that starts on the same day the drag starts or ends.
pub fn drag_anchor_index(
    calendar: &impl Calendar,
    drag: &DragRange,
    cells: &[TickCell],
) -> Option<usize> {
    cells.iter().position(|cell| {
        calendar.is_same(cell.start_date, drag.start_date, TimeUnit::Day)
            || calendar.is_same(cell.start_date, drag.end_date, TimeUnit::Day)
    })
}

/// Geometry for the live drag preview drawn over the tick row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOverlay {
    pub offset: BarOffset,
    /// Cell to highlight, when the drag edge sits on a cell boundary day.
    pub anchor_cell: Option<usize>,
}

impl DragOverlay {
    pub fn resolve(
        calendar: &impl Calendar,
        drag: &DragRange,
        cells: &[TickCell],
        config: &ScaleConfig,
    ) -> Self {
        Self {
            offset: project_offsets(calendar, drag.range(), cells, config),
            anchor_cell: drag_anchor_index(calendar, drag, cells),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calendar::Gregorian;
    use crate::model::scale::{ScaleKey, ScaleRegistry};
    use crate::model::timeline::create_tick_cells;
    use chrono::{NaiveDate, NaiveDateTime, Timelike};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn at_hour(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        at(y, m, d).with_hour(h).unwrap()
    }

    fn day_cells() -> (ScaleConfig, Vec<TickCell>) {
        let config = ScaleRegistry::builtin().get(ScaleKey::Day).unwrap().clone();
        let cells = create_tick_cells(&Gregorian, at(2024, 1, 1), at(2024, 1, 11), &config);
        (config, cells)
    }

    #[test]
    fn projects_whole_cells() {
        let (config, cells) = day_cells();
        let offset = project_offsets(
            &Gregorian,
            DateRange::new(at(2024, 1, 3), at(2024, 1, 6)),
            &cells,
            &config,
        );
        assert_eq!(offset, BarOffset { margin_left: 80.0, width: 120.0 });
    }

    #[test]
    fn partial_overlap_counts_full_cell() {
        let (config, cells) = day_cells();
        let start = at_hour(2024, 1, 3, 12);
        let offset = project_offsets(
            &Gregorian,
            DateRange::new(start, at_hour(2024, 1, 4, 1)),
            &cells,
            &config,
        );
        assert_eq!(offset.margin_left, 80.0);
        assert_eq!(offset.width, 80.0);
    }

    #[test]
    fn empty_and_inverted_ranges_are_one_pixel() {
        let (config, cells) = day_cells();
        let same = project_offsets(
            &Gregorian,
            DateRange::new(at(2024, 1, 5), at(2024, 1, 5)),
            &cells,
            &config,
        );
        assert_eq!(same.width, 1.0);
        assert_eq!(same.margin_left, 160.0);

        let inverted = project_offsets(
            &Gregorian,
            DateRange::new(at(2024, 1, 8), at(2024, 1, 2)),
            &cells,
            &config,
        );
        assert_eq!(inverted.width, 1.0);
    }

    #[test]
    fn no_cells_no_offset() {
        let (config, _) = day_cells();
        let offset = project_offsets(
            &Gregorian,
            DateRange::new(at(2024, 1, 5), at(2024, 1, 9)),
            &[],
            &config,
        );
        assert_eq!(offset, BarOffset { margin_left: 0.0, width: 0.0 });
    }

    #[test]
    fn projection_is_idempotent() {
        let (config, cells) = day_cells();
        let range = DateRange::new(at(2024, 1, 2), at(2024, 1, 9));
        let first = project_offsets(&Gregorian, range, &cells, &config);
        let second = project_offsets(&Gregorian, range, &cells, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn drag_overlay_finds_anchor_cell() {
        let (config, cells) = day_cells();
        let drag = DragRange {
            start_date: at_hour(2024, 1, 4, 9),
            end_date: at(2024, 1, 7),
            bar_left: 120.0,
            bar_width: 120.0,
        };
        let overlay = DragOverlay::resolve(&Gregorian, &drag, &cells, &config);
        assert_eq!(overlay.anchor_cell, Some(3));
        assert_eq!(overlay.offset, BarOffset { margin_left: 120.0, width: 120.0 });

        let outside = DragRange {
            start_date: at(2025, 1, 1),
            end_date: at(2025, 1, 2),
            ..drag
        };
        assert_eq!(drag_anchor_index(&Gregorian, &outside, &cells), None);
    }
}
