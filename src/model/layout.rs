//! Maps item date ranges onto the visible window as percentage geometry.

use chrono::NaiveDate;

use super::item::ScheduledItem;
use super::viewport::TimelineViewport;

/// Horizontal placement of one bar, relative to the track width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    /// Offset of the bar's left edge, as a percentage of the track.
    pub left_percent: f32,
    /// Bar width, as a percentage of the track.
    pub width_percent: f32,
    /// First day of the item inside the window.
    pub visible_start: NaiveDate,
    /// Last day of the item, clipped to the window end.
    pub visible_end: NaiveDate,
    /// Inclusive day count of the clipped range.
    pub visible_days: i64,
}

impl BarLayout {
    /// Pixel span `(left, width)` for a track of the given width.
    pub fn to_pixels(&self, track_width: f32) -> (f32, f32) {
        (
            track_width * self.left_percent / 100.0,
            track_width * self.width_percent / 100.0,
        )
    }

    /// Whether any of the bar falls on the track. An item starting exactly
    /// at the exclusive window end is laid out at 100% and paints nothing.
    pub fn is_on_track(&self) -> bool {
        self.left_percent < 100.0
    }
}

/// One laid-out row: the item and where its bar goes.
#[derive(Debug, Clone, Copy)]
pub struct LayoutRow<'a> {
    pub item: &'a ScheduledItem,
    pub bar: BarLayout,
}

/// Whole days from `from` to `to` (negative if `to` is earlier).
pub fn whole_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Place one item in the viewport, or `None` if it has no usable range or
/// does not overlap the window.
pub fn layout(item: &ScheduledItem, viewport: &TimelineViewport) -> Option<BarLayout> {
    let (start, end) = item.date_range()?;
    let window_start = viewport.window_start;
    let window_end = viewport.window_end();
    if end < window_start || start > window_end {
        return None;
    }

    let visible_start = start.max(window_start);
    let visible_end = end.min(window_end);
    let days_in_view = viewport.days_in_view() as f32;

    let days_from_start = whole_days_between(window_start, visible_start).max(0);
    let visible_days = whole_days_between(visible_start, visible_end) + 1;

    Some(BarLayout {
        left_percent: days_from_start as f32 / days_in_view * 100.0,
        width_percent: visible_days as f32 / days_in_view * 100.0,
        visible_start,
        visible_end,
        visible_days,
    })
}

/// Lay out every item with a bar on the track, nearest end date first.
pub fn layout_rows<'a>(
    items: &'a [ScheduledItem],
    viewport: &TimelineViewport,
) -> Vec<LayoutRow<'a>> {
    let mut rows: Vec<LayoutRow<'a>> = items
        .iter()
        .filter_map(|item| layout(item, viewport).map(|bar| LayoutRow { item, bar }))
        .filter(|row| row.bar.is_on_track())
        .collect();
    rows.sort_by(|a, b| {
        a.item
            .end
            .cmp(&b.item.end)
            .then_with(|| a.item.name.cmp(&b.item.name))
    });
    rows
}
