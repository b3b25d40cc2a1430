//! Pointer-drag state machine for moving and resizing timeline bars.
//!
//! A drag is opened on pointer-down, updated on every pointer-move and closed
//! on pointer-up (or when the pointer leaves the track). While a drag is
//! active, only its tentative dates change; the rendered bars keep showing the
//! stored dates until a commit succeeds and the store is refreshed.

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use super::item::{DatePatch, ScheduledItem};

/// Which part of a bar the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragMode {
    /// Bar body: shift both dates.
    Move,
    /// Left edge: change the start date.
    ResizeStart,
    /// Right edge: change the end date.
    ResizeEnd,
}

/// An in-progress drag on a single item.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub item_id: Uuid,
    pub mode: DragMode,
    /// Pointer x at pointer-down, in screen pixels.
    anchor_x: f32,
    original_start: NaiveDate,
    original_end: NaiveDate,
    tentative_start: NaiveDate,
    tentative_end: NaiveDate,
    /// Last quantized delta seen, used to skip sub-day jitter.
    day_delta: i64,
}

impl DragSession {
    fn open(
        item_id: Uuid,
        mode: DragMode,
        anchor_x: f32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            item_id,
            mode,
            anchor_x,
            original_start: start,
            original_end: end,
            tentative_start: start,
            tentative_end: end,
            day_delta: 0,
        }
    }

    pub fn original(&self) -> (NaiveDate, NaiveDate) {
        (self.original_start, self.original_end)
    }

    pub fn tentative(&self) -> (NaiveDate, NaiveDate) {
        (self.tentative_start, self.tentative_end)
    }

    pub fn day_delta(&self) -> i64 {
        self.day_delta
    }

    /// Re-derive the tentative dates for a new quantized delta.
    ///
    /// Returns `false` when the delta is the one already applied.
    fn update(&mut self, day_delta: i64) -> bool {
        if day_delta == self.day_delta {
            return false;
        }
        self.day_delta = day_delta;
        let shift = Duration::days(day_delta);
        let (start, end) = match self.mode {
            DragMode::Move => (self.original_start + shift, self.original_end + shift),
            DragMode::ResizeStart => (
                (self.original_start + shift).min(self.original_end),
                self.original_end,
            ),
            DragMode::ResizeEnd => (
                self.original_start,
                (self.original_end + shift).max(self.original_start),
            ),
        };
        self.tentative_start = start;
        self.tentative_end = end;
        true
    }

    /// The partial update to send for this session, or `None` if nothing
    /// the mode touches has changed.
    pub fn patch(&self) -> Option<DatePatch> {
        let start_changed = self.tentative_start != self.original_start;
        let end_changed = self.tentative_end != self.original_end;
        let patch = match self.mode {
            DragMode::Move if start_changed || end_changed => DatePatch {
                start_date: Some(self.tentative_start),
                end_date: Some(self.tentative_end),
            },
            DragMode::ResizeStart if start_changed => DatePatch {
                start_date: Some(self.tentative_start),
                end_date: None,
            },
            DragMode::ResizeEnd if end_changed => DatePatch {
                start_date: None,
                end_date: Some(self.tentative_end),
            },
            _ => return None,
        };
        Some(patch)
    }
}

/// Pixels covered by one day on a track of `track_width` pixels.
pub fn day_width(track_width: f32, days_in_view: u32) -> Option<f32> {
    if days_in_view == 0 || track_width.is_nan() || track_width <= 0.0 {
        return None;
    }
    Some(track_width / days_in_view as f32)
}

/// Quantize a pointer displacement into whole days, rounding half away from
/// zero. A degenerate track yields no movement.
pub fn quantize_days(pixel_delta: f32, track_width: f32, days_in_view: u32) -> i64 {
    match day_width(track_width, days_in_view) {
        Some(width) => (pixel_delta / width).round() as i64,
        None => 0,
    }
}

/// Result of closing a drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// The dates changed; send this patch to the commit gateway.
    Commit { item_id: Uuid, patch: DatePatch },
    /// Net zero change; nothing to send.
    Discarded { item_id: Uuid },
}

/// Owns the single drag session of a timeline view.
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Open a session on `item`. Ignored while another session is active or
    /// when the item has no valid date range. Returns whether a session opened.
    pub fn pointer_down(&mut self, item: &ScheduledItem, mode: DragMode, pointer_x: f32) -> bool {
        if let Some(active) = &self.session {
            tracing::debug!(active = %active.item_id, ignored = %item.id, "drag already active");
            return false;
        }
        let Some((start, end)) = item.date_range() else {
            return false;
        };
        tracing::debug!(item = %item.id, ?mode, pointer_x, "drag started");
        self.session = Some(DragSession::open(item.id, mode, pointer_x, start, end));
        true
    }

    /// Feed a pointer position. `track_width` is the current pixel width of
    /// the timeline track. Returns whether the tentative dates changed.
    pub fn pointer_move(&mut self, pointer_x: f32, track_width: f32, days_in_view: u32) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let pixel_delta = pointer_x - session.anchor_x;
        let day_delta = quantize_days(pixel_delta, track_width, days_in_view);
        session.update(day_delta)
    }

    /// Close the active session (pointer-up or pointer-leave).
    pub fn pointer_up(&mut self) -> Option<DragOutcome> {
        let session = self.session.take()?;
        let outcome = match session.patch() {
            Some(patch) => {
                tracing::debug!(item = %session.item_id, ?patch, "drag released with change");
                DragOutcome::Commit {
                    item_id: session.item_id,
                    patch,
                }
            }
            None => {
                tracing::debug!(item = %session.item_id, "drag released without change");
                DragOutcome::Discarded {
                    item_id: session.item_id,
                }
            }
        };
        Some(outcome)
    }
}
