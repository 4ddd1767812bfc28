use super::groups::LabelGroup;

/// Index of the group pinned at horizontal scroll offset `scroll`.
///
/// Picks the last group whose `left` is at or before `scroll`, falling back
/// to 0 when the offset is before every group or there are no groups.
pub fn sticky_index(scroll: f32, groups: &[LabelGroup]) -> usize {
    groups
        .partition_point(|group| group.left <= scroll)
        .saturating_sub(1)
}

/// Descending scan equivalent of [`sticky_index`], fine for a handful of groups.
pub fn sticky_index_linear(scroll: f32, groups: &[LabelGroup]) -> usize {
    (0..groups.len())
        .rev()
        .find(|&i| scroll >= groups[i].left)
        .unwrap_or(0)
}

/// Label shown in the pinned slot; empty when there are no groups.
pub fn sticky_label(index: usize, groups: &[LabelGroup]) -> &str {
    groups.get(index).map_or("", |g| g.label.as_str())
}

/// Scroll listener state owned by the header view.
///
/// Created when a layout is mounted and dropped with it. Feeding the same
/// offset twice gives the same answer.
#[derive(Debug, Clone, Default)]
pub struct StickyTracker {
    groups: Vec<LabelGroup>,
    index: usize,
    last_offset: Option<f32>,
}

impl StickyTracker {
    /// Attach to a fresh group sequence, pinned as if scrolled to the start.
    pub fn new(groups: Vec<LabelGroup>) -> Self {
        let mut tracker = Self {
            groups,
            index: 0,
            last_offset: None,
        };
        tracker.on_scroll(0.0);
        tracker
    }

    /// Handle a scroll event and return the pinned index.
    pub fn on_scroll(&mut self, offset: f32) -> usize {
        if self.last_offset != Some(offset) {
            self.index = sticky_index(offset, &self.groups);
            self.last_offset = Some(offset);
        }
        self.index
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &str {
        sticky_label(self.index, &self.groups)
    }
}
