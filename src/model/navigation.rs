//! Paging, "today" and zoom commands over the viewport.

use chrono::NaiveDate;

use super::viewport::TimelineViewport;

/// A navigation command issued from the toolbar or a keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Previous,
    Next,
    Today,
    ZoomIn,
    ZoomOut,
}

impl TimelineViewport {
    /// Page back by one full window.
    pub fn previous(&mut self) {
        self.scroll_days(-i64::from(self.days_in_view()));
    }

    /// Page forward by one full window.
    pub fn next(&mut self) {
        self.scroll_days(i64::from(self.days_in_view()));
    }

    /// Move the window so it starts at `today`.
    pub fn go_to_today(&mut self, today: NaiveDate) {
        self.window_start = today;
    }

    /// Apply a navigation command. `today` is only read by [`NavCommand::Today`].
    pub fn apply(&mut self, command: NavCommand, today: NaiveDate) {
        match command {
            NavCommand::Previous => self.previous(),
            NavCommand::Next => self.next(),
            NavCommand::Today => self.go_to_today(today),
            NavCommand::ZoomIn => self.zoom_in(),
            NavCommand::ZoomOut => self.zoom_out(),
        }
        tracing::debug!(
            ?command,
            window_start = %self.window_start,
            days_in_view = self.days_in_view(),
            "viewport navigated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::viewport::ZoomLevels;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn pages_by_days_in_view() {
        let mut vp = TimelineViewport::new(ZoomLevels::default(), 1, d(2025, 4, 1));
        assert_eq!(vp.days_in_view(), 14);

        vp.next();
        assert_eq!(vp.window_start, d(2025, 4, 15));
        vp.previous();
        assert_eq!(vp.window_start, d(2025, 4, 1));
    }

    #[test]
    fn today_resets_window_start_only() {
        let mut vp = TimelineViewport::new(ZoomLevels::default(), 4, d(2020, 1, 1));
        vp.apply(NavCommand::Today, d(2025, 6, 18));
        assert_eq!(vp.window_start, d(2025, 6, 18));
        assert_eq!(vp.zoom_index(), 4);
    }

    #[test]
    fn apply_dispatches_zoom_commands() {
        let today = d(2025, 4, 1);
        let mut vp = TimelineViewport::new(ZoomLevels::default(), 0, today);
        vp.apply(NavCommand::ZoomIn, today);
        assert_eq!(vp.zoom_index(), 0);
        vp.apply(NavCommand::ZoomOut, today);
        assert_eq!(vp.zoom_index(), 1);
        assert_eq!(vp.window_start, today);
    }

    proptest! {
        #[test]
        fn next_then_previous_restores_start(
            zoom in 0usize..7,
            offset in -20_000i64..20_000,
        ) {
            let start = d(2025, 1, 1) + chrono::Duration::days(offset);
            let mut vp = TimelineViewport::new(ZoomLevels::default(), zoom, start);
            vp.next();
            prop_assert_eq!(
                vp.window_start,
                start + chrono::Duration::days(i64::from(vp.days_in_view()))
            );
            vp.previous();
            prop_assert_eq!(vp.window_start, start);
        }
    }
}
