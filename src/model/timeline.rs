use chrono::NaiveDateTime;

use super::calendar::{Calendar, Gregorian};
use super::groups::{create_label_groups, LabelGroup};
use super::scale::ScaleConfig;
use super::task::TaskCollection;
use crate::error::Result;

/// Ticks of headroom added on each side of the task extent.
pub const TIMELINE_SHIFT_BUFFER: i64 = 4;

/// Earliest start and latest end over a task collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateExtent {
    pub min: NaiveDateTime,
    pub max: NaiveDateTime,
}

/// Smallest rendered column of the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickCell {
    pub start_date: NaiveDateTime,
    pub width_px: f32,
}

/// Find the date extent of `tasks`.
///
/// Starts only pull the minimum down and ends only push the maximum up.
/// Unparsable dates are skipped; `None` means nothing usable was found.
pub fn find_date_extent(tasks: &TaskCollection) -> Option<DateExtent> {
    let mut min: Option<NaiveDateTime> = None;
    let mut max: Option<NaiveDateTime> = None;

    for (id, dates) in tasks {
        match dates.start() {
            Some(start) => min = Some(min.map_or(start, |m| m.min(start))),
            None => log::debug!("Task '{}': skipping unparsable start '{}'", id, dates.start_date),
        }
        match dates.end() {
            Some(end) => max = Some(max.map_or(end, |m| m.max(end))),
            None => log::debug!("Task '{}': skipping unparsable end '{}'", id, dates.end_date),
        }
    }

    Some(DateExtent {
        min: min?,
        max: max?,
    })
}

/// Widen `extent` by [`TIMELINE_SHIFT_BUFFER`] ticks on both sides.
pub fn pad_date_extent(
    calendar: &impl Calendar,
    extent: DateExtent,
    config: &ScaleConfig,
) -> DateExtent {
    let shift = TIMELINE_SHIFT_BUFFER * config.unit_per_tick as i64;
    DateExtent {
        min: calendar.subtract(extent.min, shift, config.tick_unit),
        max: calendar.add(extent.max, shift, config.tick_unit),
    }
}

/// Pixel width of the tick starting at `start`.
///
/// Measured in drag steps so density stays constant even when the tick
/// spans a variable number of days.
fn tick_width(calendar: &impl Calendar, start: NaiveDateTime, config: &ScaleConfig) -> f32 {
    let end = calendar.add(start, config.unit_per_tick as i64, config.tick_unit);
    let steps = calendar.diff(end, start, config.drag_step_unit) as f32 / config.drag_step_amount;
    steps * config.base_px_per_drag_step
}

/// Build the tick cells covering `[padded_min, padded_max)`.
///
/// The first cell starts at `padded_min` truncated to the tick unit. An empty
/// or inverted range produces no cells.
pub fn create_tick_cells(
    calendar: &impl Calendar,
    padded_min: NaiveDateTime,
    padded_max: NaiveDateTime,
    config: &ScaleConfig,
) -> Vec<TickCell> {
    let mut cells = Vec::new();
    if config.unit_per_tick == 0 {
        return cells;
    }

    let mut current = calendar.start_of(padded_min, config.tick_unit);
    while current < padded_max {
        cells.push(TickCell {
            start_date: current,
            width_px: tick_width(calendar, current, config),
        });

        let next = calendar.add(current, config.unit_per_tick as i64, config.tick_unit);
        if next <= current {
            // Saturated at the end of the representable range.
            break;
        }
        current = next;
    }

    cells
}

/// End instant (exclusive) of `cell` under `config`.
pub fn cell_end(calendar: &impl Calendar, cell: &TickCell, config: &ScaleConfig) -> NaiveDateTime {
    calendar.add(cell.start_date, config.unit_per_tick as i64, config.tick_unit)
}

/// A fully laid-out timeline for one task set at one scale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    /// Padded range the cells were generated over; `None` when empty.
    pub padded: Option<DateExtent>,
    pub cells: Vec<TickCell>,
    pub groups: Vec<LabelGroup>,
}

impl Timeline {
    /// Lay out `tasks` at `config` using the Gregorian calendar.
    pub fn build(tasks: &TaskCollection, config: &ScaleConfig) -> Result<Self> {
        Self::build_with(&Gregorian, tasks, config)
    }

    /// Lay out with an explicit calendar. Fails only on a malformed `config`.
    pub fn build_with(
        calendar: &impl Calendar,
        tasks: &TaskCollection,
        config: &ScaleConfig,
    ) -> Result<Self> {
        config.validate("layout")?;

        let Some(extent) = find_date_extent(tasks) else {
            log::debug!("No datable tasks, timeline is empty");
            return Ok(Self::default());
        };

        let padded = pad_date_extent(calendar, extent, config);
        let cells = create_tick_cells(calendar, padded.min, padded.max, config);
        let groups = create_label_groups(calendar, &cells, config);
        log::debug!(
            "Timeline laid out: {} cells, {} groups, {} → {}",
            cells.len(),
            groups.len(),
            padded.min,
            padded.max
        );

        Ok(Self {
            padded: Some(padded),
            cells,
            groups,
        })
    }

    /// Total pixel width of all cells.
    pub fn total_width(&self) -> f32 {
        self.cells.iter().map(|c| c.width_px).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
