use chrono::{Duration, NaiveDate};

use crate::error::{Result, TimelineError};

/// Days-in-view magnitudes offered by the zoom controls.
pub const DEFAULT_ZOOM_LEVELS: [u32; 7] = [7, 14, 30, 60, 90, 180, 365];

/// Zoom index used when nothing else is configured (30 days).
pub const DEFAULT_ZOOM_INDEX: usize = 2;

/// Ordered, non-empty list of days-in-view magnitudes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoomLevels(Vec<u32>);

impl ZoomLevels {
    /// Validate a level list: non-empty, positive and strictly ascending.
    pub fn new(levels: Vec<u32>) -> Result<Self> {
        if levels.is_empty() {
            return Err(TimelineError::InvalidSettings(
                "zoom levels must not be empty".into(),
            ));
        }
        if levels[0] == 0 {
            return Err(TimelineError::InvalidSettings(
                "zoom levels must be positive".into(),
            ));
        }
        if levels.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TimelineError::InvalidSettings(format!(
                "zoom levels must be strictly ascending, got {:?}",
                levels
            )));
        }
        Ok(Self(levels))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn max_index(&self) -> usize {
        self.0.len() - 1
    }
}

impl Default for ZoomLevels {
    fn default() -> Self {
        Self(DEFAULT_ZOOM_LEVELS.to_vec())
    }
}

/// The visible window of the timeline: a start date plus a zoom-selected
/// number of days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineViewport {
    levels: ZoomLevels,
    zoom_index: usize,
    /// First visible day.
    pub window_start: NaiveDate,
}

impl TimelineViewport {
    /// Create a viewport; an out-of-range zoom index is clamped to the last level.
    pub fn new(levels: ZoomLevels, zoom_index: usize, window_start: NaiveDate) -> Self {
        let zoom_index = zoom_index.min(levels.max_index());
        Self {
            levels,
            zoom_index,
            window_start,
        }
    }

    pub fn zoom_index(&self) -> usize {
        self.zoom_index
    }

    pub fn levels(&self) -> &ZoomLevels {
        &self.levels
    }

    pub fn days_in_view(&self) -> u32 {
        self.levels.get(self.zoom_index).unwrap_or(1)
    }

    /// Exclusive upper bound of the window.
    pub fn window_end(&self) -> NaiveDate {
        self.window_start + Duration::days(i64::from(self.days_in_view()))
    }

    /// Every calendar day in view, first to last.
    pub fn visible_days(&self) -> Vec<NaiveDate> {
        self.window_start
            .iter_days()
            .take(self.days_in_view() as usize)
            .collect()
    }

    /// Jump straight to a zoom level, clamped to the available levels.
    pub fn set_zoom_index(&mut self, index: usize) {
        self.zoom_index = index.min(self.levels.max_index());
    }

    /// More detail, fewer days. No-op at the first level.
    pub fn zoom_in(&mut self) {
        self.zoom_index = self.zoom_index.saturating_sub(1);
    }

    /// Less detail, more days. No-op at the last level.
    pub fn zoom_out(&mut self) {
        self.zoom_index = (self.zoom_index + 1).min(self.levels.max_index());
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom_index > 0
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom_index < self.levels.max_index()
    }

    /// Shift the window by a number of days (negative scrolls back).
    pub fn scroll_days(&mut self, days: i64) {
        self.window_start += Duration::days(days);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn viewport(zoom_index: usize) -> TimelineViewport {
        TimelineViewport::new(ZoomLevels::default(), zoom_index, d(2025, 4, 1))
    }

    #[test]
    fn derives_window_end_and_days() {
        let vp = viewport(2);
        assert_eq!(vp.days_in_view(), 30);
        assert_eq!(vp.window_end(), d(2025, 5, 1));

        let days = vp.visible_days();
        assert_eq!(days.len(), 30);
        assert_eq!(days.first(), Some(&d(2025, 4, 1)));
        assert_eq!(days.last(), Some(&d(2025, 4, 30)));
    }

    #[test]
    fn zoom_in_at_minimum_is_noop() {
        let mut vp = viewport(0);
        vp.zoom_in();
        assert_eq!(vp.zoom_index(), 0);
        assert!(!vp.can_zoom_in());
    }

    #[test]
    fn zoom_out_at_maximum_is_noop() {
        let mut vp = viewport(6);
        vp.zoom_out();
        assert_eq!(vp.zoom_index(), 6);
        assert_eq!(vp.days_in_view(), 365);
        assert!(!vp.can_zoom_out());
    }

    #[test]
    fn zoom_keeps_window_start() {
        let mut vp = viewport(2);
        vp.zoom_out();
        assert_eq!(vp.days_in_view(), 60);
        assert_eq!(vp.window_start, d(2025, 4, 1));
        assert_eq!(vp.window_end(), d(2025, 5, 31));
        vp.zoom_in();
        vp.zoom_in();
        assert_eq!(vp.days_in_view(), 14);
        assert_eq!(vp.window_start, d(2025, 4, 1));
    }

    #[test]
    fn out_of_range_zoom_index_is_clamped() {
        let vp = viewport(42);
        assert_eq!(vp.zoom_index(), 6);
    }

    #[test]
    fn set_zoom_index_clamps() {
        let mut vp = viewport(2);
        vp.set_zoom_index(5);
        assert_eq!(vp.days_in_view(), 180);
        vp.set_zoom_index(99);
        assert_eq!(vp.zoom_index(), 6);
        assert_eq!(vp.window_start, d(2025, 4, 1));
    }

    #[test]
    fn rejects_bad_level_lists() {
        assert!(ZoomLevels::new(vec![]).is_err());
        assert!(ZoomLevels::new(vec![0, 7]).is_err());
        assert!(ZoomLevels::new(vec![7, 7, 14]).is_err());
        assert!(ZoomLevels::new(vec![30, 14]).is_err());
        assert!(ZoomLevels::new(vec![7, 14]).is_ok());
    }
}
