use crate::model::drag::{day_width, DragController, DragMode, DragOutcome};
use crate::model::{layout_rows, LayoutRow, NavCommand, ScheduledItem, TimelineViewport};
use crate::ui::theme;
use chrono::{Datelike, NaiveDate, Weekday};
use egui::{Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_PADDING: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;
const LABEL_WIDTH: f32 = theme::LABEL_WIDTH;

/// How much detail the day header can show at the current day width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimelineScale {
    Days,
    Weeks,
    Months,
}

impl TimelineScale {
    fn for_day_width(day_width: f32) -> Self {
        if day_width >= 18.0 {
            TimelineScale::Days
        } else if day_width >= 5.0 {
            TimelineScale::Weeks
        } else {
            TimelineScale::Months
        }
    }
}

/// Scroll distance (points) that makes one zoom step.
const ZOOM_SCROLL_STEP: f32 = 50.0;

/// What the pointer does to an active drag this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PointerEvent {
    Move(f32),
    Release,
}

/// Button still down inside the surface keeps dragging; a release or the
/// pointer leaving the surface ends the session.
fn pointer_event(pos: Option<Pos2>, down: bool, surface: Rect) -> PointerEvent {
    match pos {
        Some(pos) if down && surface.contains(pos) => PointerEvent::Move(pos.x),
        _ => PointerEvent::Release,
    }
}

/// Ctrl+scroll accumulator, kept in egui memory between frames. Emits one
/// zoom step per [`ZOOM_SCROLL_STEP`] of travel so a long trackpad swipe
/// does not race through every level.
#[derive(Debug, Clone, Copy, Default)]
struct ScrollZoom {
    accumulated: f32,
}

impl ScrollZoom {
    fn feed(&mut self, delta: f32) -> Option<NavCommand> {
        self.accumulated += delta;
        if self.accumulated >= ZOOM_SCROLL_STEP {
            self.accumulated -= ZOOM_SCROLL_STEP;
            Some(NavCommand::ZoomIn)
        } else if self.accumulated <= -ZOOM_SCROLL_STEP {
            self.accumulated += ZOOM_SCROLL_STEP;
            Some(NavCommand::ZoomOut)
        } else {
            None
        }
    }
}

/// What happened in the chart this frame.
#[derive(Debug, Default)]
pub struct ChartInteraction {
    /// A drag ended this frame.
    pub released: Option<DragOutcome>,
    /// Ctrl+scroll zoom request.
    pub nav: Option<NavCommand>,
}

/// Render the timeline: label column, day header and one bar per visible item.
///
/// Bars are always drawn from the stored item dates. An active drag only
/// changes the session's tentative dates; the bar snaps once the commit lands.
pub fn show_timeline_chart(
    items: &[ScheduledItem],
    viewport: &TimelineViewport,
    drag: &mut DragController,
    selected: &mut Option<Uuid>,
    today: NaiveDate,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let rows = layout_rows(items, viewport);
    let available = ui.available_size();
    let days_in_view = viewport.days_in_view();
    let track_width = (available.x - LABEL_WIDTH).max(1.0);
    let day_width = day_width(track_width, days_in_view).unwrap_or(track_width);
    let chart_height = HEADER_HEIGHT + rows.len() as f32 * (ROW_HEIGHT + ROW_PADDING) + 40.0;

    let zoom_id = ui.id().with("timeline-scroll-zoom");
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        interaction.nav =
            ui.data_mut(|d| d.get_temp_mut_or_default::<ScrollZoom>(zoom_id).feed(scroll));
    } else {
        ui.data_mut(|d| d.remove::<ScrollZoom>(zoom_id));
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(available.x, chart_height.max(available.y)),
                Sense::click(),
            );
            let origin = response.rect.min;
            let track = Rect::from_min_size(
                Pos2::new(origin.x + LABEL_WIDTH, origin.y),
                Vec2::new(track_width, response.rect.height()),
            );
            let mut consumed_click = false;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
            draw_day_grid(&painter, track, viewport, day_width);
            draw_timeline_header(&painter, track, viewport, day_width);

            for (i, row) in rows.iter().enumerate() {
                let y = origin.y + HEADER_HEIGHT + i as f32 * (ROW_HEIGHT + ROW_PADDING);
                let is_selected = *selected == Some(row.item.id);
                draw_row_label(&painter, origin, row.item, y, is_selected);

                let Some(bar_rect) = draw_bar(&painter, track, row, y + ROW_PADDING, is_selected)
                else {
                    continue;
                };

                let bar_response = ui.interact(
                    bar_rect,
                    ui.make_persistent_id(("timeline-bar", row.item.id)),
                    Sense::click_and_drag(),
                );
                let left_response = ui.interact(
                    edge_rect(bar_rect, bar_rect.left()),
                    ui.make_persistent_id(("timeline-resize-start", row.item.id)),
                    Sense::drag(),
                );
                let right_response = ui.interact(
                    edge_rect(bar_rect, bar_rect.right()),
                    ui.make_persistent_id(("timeline-resize-end", row.item.id)),
                    Sense::drag(),
                );

                let grabbed = if left_response.drag_started() {
                    Some(DragMode::ResizeStart)
                } else if right_response.drag_started() {
                    Some(DragMode::ResizeEnd)
                } else if bar_response.drag_started() {
                    Some(DragMode::Move)
                } else {
                    None
                };
                if let Some(mode) = grabbed {
                    let anchor = ui
                        .input(|i| i.pointer.press_origin())
                        .or_else(|| bar_response.interact_pointer_pos());
                    if let Some(anchor) = anchor {
                        if drag.pointer_down(row.item, mode, anchor.x) {
                            *selected = Some(row.item.id);
                        }
                    }
                    consumed_click = true;
                }

                if bar_response.clicked() {
                    *selected = Some(row.item.id);
                    consumed_click = true;
                }

                let edge_hovered = left_response.hovered() || right_response.hovered();
                if !drag.is_active() {
                    if edge_hovered {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
                    } else if bar_response.hovered() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
                    }
                }

                if is_selected || edge_hovered {
                    draw_handles(&painter, bar_rect);
                }

                if !drag.is_active() && (bar_response.hovered() || edge_hovered) {
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        egui::Id::new(("timeline-tip", row.item.id)),
                        |ui| {
                            ui.strong(&row.item.name);
                            if let Some(client) = &row.item.client {
                                ui.label(client);
                            }
                            if let Some((start, end)) = row.item.date_range() {
                                ui.label(format!(
                                    "{} → {}",
                                    start.format("%d/%m/%Y"),
                                    end.format("%d/%m/%Y"),
                                ));
                            }
                            if !row.item.status.is_empty() {
                                ui.label(format!("Status: {}", row.item.status));
                            }
                        },
                    );
                }
            }

            draw_today_line(&painter, track, viewport, day_width, today);

            if drag.is_active() {
                let surface = response.rect.intersect(ui.clip_rect());
                let (pointer, down) = ui.input(|i| (i.pointer.hover_pos(), i.pointer.primary_down()));
                match pointer_event(pointer, down, surface) {
                    PointerEvent::Move(x) => {
                        drag.pointer_move(x, track.width(), days_in_view);
                        let icon = match drag.session().map(|s| s.mode) {
                            Some(DragMode::Move) => egui::CursorIcon::Grabbing,
                            _ => egui::CursorIcon::ResizeHorizontal,
                        };
                        ui.ctx().set_cursor_icon(icon);
                    }
                    PointerEvent::Release => interaction.released = drag.pointer_up(),
                }
            }

            if rows.is_empty() {
                painter.text(
                    Pos2::new(track.center().x, origin.y + HEADER_HEIGHT + 40.0),
                    egui::Align2::CENTER_CENTER,
                    "No scheduled items in this window",
                    theme::font_header(),
                    theme::TEXT_DIM,
                );
            }

            if response.clicked() && !consumed_click {
                *selected = None;
            }
        });

    interaction
}

fn edge_rect(bar_rect: Rect, x: f32) -> Rect {
    Rect::from_min_max(
        Pos2::new(x - HANDLE_WIDTH * 0.5, bar_rect.top()),
        Pos2::new(x + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
    )
    .expand2(Vec2::new(3.0, 0.0))
}

fn day_x(track: Rect, viewport: &TimelineViewport, day_width: f32, date: NaiveDate) -> f32 {
    track.left() + (date - viewport.window_start).num_days() as f32 * day_width
}

fn draw_day_grid(painter: &egui::Painter, track: Rect, viewport: &TimelineViewport, day_width: f32) {
    let scale = TimelineScale::for_day_width(day_width);
    for date in viewport.visible_days() {
        let x = day_x(track, viewport, day_width, date);
        let is_weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        if scale == TimelineScale::Days && is_weekend {
            painter.rect_filled(
                Rect::from_min_size(
                    Pos2::new(x, track.top() + HEADER_HEIGHT),
                    Vec2::new(day_width, track.height() - HEADER_HEIGHT),
                ),
                0.0,
                theme::BG_WEEKEND,
            );
        }
        let boundary = match scale {
            TimelineScale::Days => true,
            TimelineScale::Weeks => date.weekday() == Weekday::Mon,
            TimelineScale::Months => date.day() == 1,
        };
        if boundary {
            painter.line_segment(
                [
                    Pos2::new(x, track.top() + HEADER_HEIGHT),
                    Pos2::new(x, track.bottom()),
                ],
                Stroke::new(0.5, theme::GRID_LINE),
            );
        }
    }
}

fn draw_timeline_header(
    painter: &egui::Painter,
    track: Rect,
    viewport: &TimelineViewport,
    day_width: f32,
) {
    let header = Rect::from_min_size(track.min, Vec2::new(track.width(), HEADER_HEIGHT));
    painter.rect_filled(header, 0.0, theme::BG_HEADER);
    painter.line_segment(
        [
            Pos2::new(header.left(), header.bottom()),
            Pos2::new(header.right(), header.bottom()),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let clipped = painter.with_clip_rect(header);
    let scale = TimelineScale::for_day_width(day_width);
    for (i, date) in viewport.visible_days().into_iter().enumerate() {
        let x = day_x(track, viewport, day_width, date);

        if i == 0 || date.day() == 1 {
            clipped.text(
                Pos2::new(x + 3.0, track.top() + 12.0),
                egui::Align2::LEFT_CENTER,
                date.format("%b %Y").to_string(),
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }

        match scale {
            TimelineScale::Days => {
                let is_weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
                clipped.text(
                    Pos2::new(x + 3.0, track.top() + 30.0),
                    egui::Align2::LEFT_CENTER,
                    date.format("%d").to_string(),
                    theme::font_sub(),
                    if is_weekend {
                        theme::TEXT_DIM
                    } else {
                        theme::TEXT_SECONDARY
                    },
                );
            }
            TimelineScale::Weeks if date.weekday() == Weekday::Mon => {
                clipped.text(
                    Pos2::new(x + 3.0, track.top() + 30.0),
                    egui::Align2::LEFT_CENTER,
                    date.format("W%V").to_string(),
                    theme::font_sub(),
                    theme::TEXT_SECONDARY,
                );
            }
            _ => {}
        }
    }
}

fn draw_today_line(
    painter: &egui::Painter,
    track: Rect,
    viewport: &TimelineViewport,
    day_width: f32,
    today: NaiveDate,
) {
    if today < viewport.window_start || today >= viewport.window_end() {
        return;
    }
    let x = day_x(track, viewport, day_width, today);

    painter.line_segment(
        [
            Pos2::new(x, track.top() + HEADER_HEIGHT),
            Pos2::new(x, track.bottom()),
        ],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, track.top() + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_row_label(
    painter: &egui::Painter,
    origin: Pos2,
    item: &ScheduledItem,
    y: f32,
    is_selected: bool,
) {
    let row_rect = Rect::from_min_size(
        Pos2::new(origin.x, y),
        Vec2::new(LABEL_WIDTH, ROW_HEIGHT + ROW_PADDING),
    );
    painter.rect_filled(
        row_rect,
        0.0,
        if is_selected {
            theme::BG_SELECTED
        } else {
            theme::BG_PANEL
        },
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, row_rect.bottom()),
            Pos2::new(origin.x + LABEL_WIDTH, row_rect.bottom()),
        ],
        Stroke::new(0.5, theme::BORDER_SUBTLE),
    );

    let clipped = painter.with_clip_rect(row_rect.shrink2(Vec2::new(8.0, 0.0)));
    clipped.text(
        Pos2::new(row_rect.left() + 8.0, row_rect.top() + 10.0),
        egui::Align2::LEFT_CENTER,
        &item.name,
        theme::font_bar(),
        theme::TEXT_PRIMARY,
    );
    if let Some(client) = &item.client {
        clipped.text(
            Pos2::new(row_rect.left() + 8.0, row_rect.top() + 23.0),
            egui::Align2::LEFT_CENTER,
            client,
            theme::font_small(),
            theme::TEXT_DIM,
        );
    }
}

/// Paint one bar and return its on-screen rect (clipped to the track).
fn draw_bar(
    painter: &egui::Painter,
    track: Rect,
    row: &LayoutRow<'_>,
    y: f32,
    is_selected: bool,
) -> Option<Rect> {
    let (left, width) = row.bar.to_pixels(track.width());
    let inset = theme::BAR_INSET;
    let bar_rect = Rect::from_min_size(
        Pos2::new(track.left() + left, y + inset),
        Vec2::new(width.max(4.0), ROW_HEIGHT - inset * 2.0),
    )
    .intersect(track);
    if !bar_rect.is_positive() {
        return None;
    }

    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let color = theme::status_color(&row.item.status);
    painter.rect_filled(
        bar_rect.translate(Vec2::new(1.0, 2.0)),
        rounding,
        Color32::from_black_alpha(35),
    );
    painter.rect_filled(bar_rect, rounding, color);

    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if bar_rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(
            row.item.name.clone(),
            theme::font_bar(),
            theme::TEXT_ON_BAR,
        );
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        painter.with_clip_rect(bar_rect).galley(
            Pos2::new(bar_rect.left() + 6.0, text_y),
            galley,
            Color32::TRANSPARENT,
        );
    }

    Some(bar_rect)
}

fn draw_handles(painter: &egui::Painter, bar_rect: Rect) {
    let handle_h = bar_rect.height() * 0.55;
    let handle_y = bar_rect.center().y - handle_h / 2.0;
    for x in [bar_rect.left() - 1.5, bar_rect.right() - 2.5] {
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(x, handle_y), Vec2::new(4.0, handle_h)),
            Rounding::same(2.0),
            theme::HANDLE_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_detail_follows_day_width() {
        assert_eq!(TimelineScale::for_day_width(40.0), TimelineScale::Days);
        assert_eq!(TimelineScale::for_day_width(11.0), TimelineScale::Weeks);
        assert_eq!(TimelineScale::for_day_width(2.7), TimelineScale::Months);
    }

    fn surface() -> Rect {
        Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(800.0, 400.0))
    }

    #[test]
    fn held_button_inside_surface_keeps_dragging() {
        let event = pointer_event(Some(Pos2::new(320.0, 40.0)), true, surface());
        assert_eq!(event, PointerEvent::Move(320.0));
    }

    #[test]
    fn leaving_the_surface_releases() {
        assert_eq!(
            pointer_event(Some(Pos2::new(900.0, 40.0)), true, surface()),
            PointerEvent::Release
        );
        assert_eq!(pointer_event(None, true, surface()), PointerEvent::Release);
    }

    #[test]
    fn button_up_releases() {
        assert_eq!(
            pointer_event(Some(Pos2::new(320.0, 40.0)), false, surface()),
            PointerEvent::Release
        );
    }

    #[test]
    fn leaving_mid_drag_commits_through_the_controller() {
        let item = ScheduledItem::new(
            "Launch",
            NaiveDate::from_ymd_opt(2025, 4, 5).unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
        );
        let mut drag = DragController::new();
        assert!(drag.pointer_down(&item, DragMode::Move, 100.0));
        if let PointerEvent::Move(x) = pointer_event(Some(Pos2::new(140.0, 40.0)), true, surface()) {
            drag.pointer_move(x, 600.0, 30);
        }
        assert_eq!(
            pointer_event(Some(Pos2::new(140.0, 450.0)), true, surface()),
            PointerEvent::Release
        );
        assert!(matches!(drag.pointer_up(), Some(DragOutcome::Commit { .. })));
        assert!(!drag.is_active());
    }

    #[test]
    fn scroll_zoom_steps_once_per_threshold() {
        let mut zoom = ScrollZoom::default();
        let steps: Vec<_> = std::iter::repeat(12.0)
            .take(10)
            .filter_map(|delta| zoom.feed(delta))
            .collect();
        assert_eq!(steps, vec![NavCommand::ZoomIn, NavCommand::ZoomIn]);

        let mut zoom = ScrollZoom::default();
        assert_eq!(zoom.feed(-20.0), None);
        assert_eq!(zoom.feed(-35.0), Some(NavCommand::ZoomOut));
        assert_eq!(zoom.feed(0.0), None);
    }
}
