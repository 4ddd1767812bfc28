pub mod calendar;
pub mod groups;
pub mod offset;
pub mod scale;
pub mod sticky;
pub mod task;
pub mod timeline;

pub use calendar::{Calendar, Gregorian, TimeUnit};
pub use groups::{create_label_groups, LabelGroup};
pub use offset::{drag_anchor_index, project_offsets, BarOffset, DragOverlay};
pub use scale::{DateFormat, ScaleConfig, ScaleKey, ScaleRegistry};
pub use sticky::{sticky_index, sticky_index_linear, sticky_label, StickyTracker};
pub use task::{parse_date, DateRange, DragRange, TaskCollection, TaskDates};
pub use timeline::{
    create_tick_cells, find_date_extent, pad_date_extent, DateExtent, TickCell, Timeline,
    TIMELINE_SHIFT_BUFFER,
};
