pub mod drag;
pub mod item;
pub mod layout;
pub mod navigation;
pub mod viewport;

pub use drag::{DragController, DragMode, DragOutcome, DragSession};
pub use item::{DatePatch, ScheduledItem};
pub use layout::{layout, layout_rows, BarLayout, LayoutRow};
pub use navigation::NavCommand;
pub use viewport::{TimelineViewport, ZoomLevels};
