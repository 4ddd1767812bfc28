use chrono::NaiveDateTime;

use super::calendar::Calendar;
use super::scale::ScaleConfig;
use super::timeline::TickCell;

/// A header label spanning one or more consecutive tick cells.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelGroup {
    pub label: String,
    pub width_px: f32,
    pub start_date: NaiveDateTime,
    /// Sum of the widths of all groups before this one.
    pub left: f32,
}

/// Group consecutive cells by label bucket.
///
/// Buckets are compared by their start instant, never by label text, so two
/// different periods that happen to format alike stay separate here.
pub fn group_by_bucket(
    calendar: &impl Calendar,
    cells: &[TickCell],
    config: &ScaleConfig,
) -> Vec<LabelGroup> {
    let mut groups: Vec<LabelGroup> = Vec::new();
    let mut current: Option<LabelGroup> = None;

    for cell in cells {
        let bucket = calendar.start_of(cell.start_date, config.label_unit);
        match current.as_mut() {
            Some(group) if group.start_date == bucket => group.width_px += cell.width_px,
            _ => {
                if let Some(done) = current.take() {
                    groups.push(done);
                }
                current = Some(LabelGroup {
                    label: config.group_label(bucket),
                    width_px: cell.width_px,
                    start_date: bucket,
                    left: 0.0,
                });
            }
        }
    }
    groups.extend(current);

    groups
}

/// Merge adjacent groups whose rendered labels are identical.
pub fn merge_equal_labels(groups: Vec<LabelGroup>) -> Vec<LabelGroup> {
    let mut merged: Vec<LabelGroup> = Vec::with_capacity(groups.len());
    for group in groups {
        match merged.last_mut() {
            Some(last) if last.label == group.label => last.width_px += group.width_px,
            _ => merged.push(group),
        }
    }
    merged
}

/// Fill in `left` as a running sum of widths.
pub fn assign_left_offsets(groups: &mut [LabelGroup]) {
    let mut offset = 0.0;
    for group in groups {
        group.left = offset;
        offset += group.width_px;
    }
}

/// Bucket, merge and position the header groups for `cells`.
pub fn create_label_groups(
    calendar: &impl Calendar,
    cells: &[TickCell],
    config: &ScaleConfig,
) -> Vec<LabelGroup> {
    let mut groups = merge_equal_labels(group_by_bucket(calendar, cells, config));
    assign_left_offsets(&mut groups);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calendar::Gregorian;
    use crate::model::scale::{DateFormat, ScaleKey, ScaleRegistry};
    use crate::model::timeline::create_tick_cells;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn scale(key: ScaleKey) -> ScaleConfig {
        ScaleRegistry::builtin().get(key).unwrap().clone()
    }

    #[test]
    fn groups_partition_cells() {
        let config = scale(ScaleKey::Day);
        let cells = create_tick_cells(&Gregorian, at(2024, 1, 20), at(2024, 3, 10), &config);
        let groups = create_label_groups(&Gregorian, &cells, &config);

        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, ["January 2024", "February 2024", "March 2024"]);

        let cell_total: f32 = cells.iter().map(|c| c.width_px).sum();
        let group_total: f32 = groups.iter().map(|g| g.width_px).sum();
        assert_eq!(cell_total, group_total);

        assert_eq!(groups[0].left, 0.0);
        for pair in groups.windows(2) {
            assert!(pair[0].left < pair[1].left);
            assert_eq!(pair[0].left + pair[0].width_px, pair[1].left);
        }
        assert_eq!(groups[1].start_date, at(2024, 2, 1));
        assert_eq!(groups[1].width_px, 29.0 * 40.0);
    }

    #[test]
    fn last_group_is_flushed() {
        let config = scale(ScaleKey::Day);
        let cells = create_tick_cells(&Gregorian, at(2024, 1, 31), at(2024, 2, 2), &config);
        let groups = create_label_groups(&Gregorian, &cells, &config);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].label, "February 2024");
        assert_eq!(groups[1].width_px, 40.0);
    }

    #[test]
    fn equal_text_merges_across_buckets() {
        let mut config = scale(ScaleKey::Day);
        // January and February render the same text.
        config.label_format = Some(DateFormat::Custom(|at: NaiveDateTime| {
            if at < NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap() {
                "Early".to_string()
            } else {
                "Late".to_string()
            }
        }));
        let cells = create_tick_cells(&Gregorian, at(2024, 1, 30), at(2024, 3, 3), &config);

        let buckets = group_by_bucket(&Gregorian, &cells, &config);
        assert_eq!(buckets.len(), 3);

        let groups = create_label_groups(&Gregorian, &cells, &config);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Early");
        assert_eq!(groups[0].width_px, (2.0 + 29.0) * 40.0);
        assert_eq!(groups[0].start_date, at(2024, 1, 1));
        assert_eq!(groups[1].left, groups[0].width_px);
    }

    #[test]
    fn no_cells_no_groups() {
        let config = scale(ScaleKey::Week);
        assert!(create_label_groups(&Gregorian, &[], &config).is_empty());
    }
}
