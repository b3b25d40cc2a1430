use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::config::AppSettings;
use crate::error::Result;
use crate::io::commit::{
    CommitDispatcher, CommitGateway, CommitOutcome, InMemoryGateway, JsonFileGateway,
};
use crate::io::{csv_import, file};
use crate::model::{DragController, DragOutcome, NavCommand, ScheduledItem, TimelineViewport};
use crate::ui;

/// Message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Main application state.
pub struct TimelineApp {
    pub items: Vec<ScheduledItem>,
    pub viewport: TimelineViewport,
    pub drag: DragController,
    pub commits: CommitDispatcher,
    pub selected_item: Option<Uuid>,
    pub data_file: Option<PathBuf>,
    pub status: StatusMessage,
    settings: AppSettings,
    settings_path: PathBuf,
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl TimelineApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: AppSettings, settings_path: PathBuf) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let levels = settings.validate().unwrap_or_default();
        let viewport = TimelineViewport::new(levels, settings.default_zoom_index, today());

        let placeholder: Arc<dyn CommitGateway> = Arc::new(InMemoryGateway::default());
        let commits = CommitDispatcher::new(placeholder).with_repaint(cc.egui_ctx.clone());

        let mut app = Self {
            items: Vec::new(),
            viewport,
            drag: DragController::new(),
            commits,
            selected_item: None,
            data_file: settings.data_file.clone(),
            status: StatusMessage::info("Ready"),
            settings,
            settings_path,
        };
        app.reload();
        app
    }

    /// Reload items from the data file, or fall back to sample data.
    pub fn reload(&mut self) {
        match self.data_file.clone() {
            Some(path) => match open_item_store(&path, &mut self.settings, &self.settings_path) {
                Ok(items) => {
                    tracing::info!(path = %path.display(), count = items.len(), "loaded items");
                    self.status = StatusMessage::info(format!("Loaded {} items", items.len()));
                    self.items = items;
                    self.commits
                        .set_gateway(Arc::new(JsonFileGateway::new(path)));
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to load items");
                    self.status = StatusMessage::error(format!("Failed to load items: {}", e));
                    self.data_file = None;
                    self.use_sample_data();
                }
            },
            None => self.use_sample_data(),
        }
        self.selected_item = None;
    }

    fn use_sample_data(&mut self) {
        self.items = sample_items(today());
        self.commits
            .set_gateway(Arc::new(InMemoryGateway::new(&self.items)));
    }

    /// Apply a navigation command. Ignored while a drag is in progress so the
    /// day width stays fixed for the whole session.
    pub fn navigate(&mut self, command: NavCommand) {
        if self.drag.is_active() {
            return;
        }
        self.viewport.apply(command, today());
    }

    pub fn set_zoom_index(&mut self, index: usize) {
        if self.drag.is_active() {
            return;
        }
        self.viewport.set_zoom_index(index);
    }

    pub fn open_data_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Timeline items", &["json"])
            .pick_file()
        {
            self.data_file = Some(path);
            self.reload();
        }
    }

    /// Import a CSV and save the result as the new data file.
    pub fn import_csv(&mut self) {
        let Some(source) = rfd::FileDialog::new()
            .add_filter("CSV files", &["csv", "tsv", "txt"])
            .pick_file()
        else {
            return;
        };
        let import = match csv_import::import_csv(&source) {
            Ok(import) => import,
            Err(e) => {
                self.status = StatusMessage::error(format!("CSV import failed: {}", e));
                return;
            }
        };
        let Some(target) = rfd::FileDialog::new()
            .add_filter("Timeline items", &["json"])
            .set_file_name("items.json")
            .save_file()
        else {
            return;
        };
        if let Err(e) = file::save_items(&import.items, &target) {
            self.status = StatusMessage::error(format!("Failed to save items: {}", e));
            return;
        }
        self.data_file = Some(target);
        self.reload();
        if self.data_file.is_none() {
            return;
        }
        self.status = StatusMessage::info(format!(
            "Imported {} items ({} rows skipped)",
            import.items.len(),
            import.skipped
        ));
    }

    /// Send a released drag to the gateway. Local dates change only once the
    /// commit reports success.
    fn handle_release(&mut self, outcome: DragOutcome) {
        match outcome {
            DragOutcome::Commit { item_id, patch } => {
                self.commits.submit(item_id, patch);
                self.status = StatusMessage::info(format!("Saving '{}'…", self.item_name(item_id)));
            }
            DragOutcome::Discarded { .. } => {
                self.status = StatusMessage::info("No change");
            }
        }
    }

    /// Fold finished commits into the local items and the status line.
    fn collect_commits(&mut self) {
        for outcome in self.commits.poll() {
            self.status = apply_commit_outcome(&mut self.items, outcome);
        }
    }

    fn item_name(&self, item_id: Uuid) -> String {
        self.items
            .iter()
            .find(|i| i.id == item_id)
            .map(|i| i.name.clone())
            .unwrap_or_default()
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let commands: Vec<NavCommand> = ctx.input(|i| {
            let mut commands = Vec::new();
            if i.key_pressed(egui::Key::ArrowLeft) {
                commands.push(NavCommand::Previous);
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                commands.push(NavCommand::Next);
            }
            if i.key_pressed(egui::Key::T) {
                commands.push(NavCommand::Today);
            }
            if i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals) {
                commands.push(NavCommand::ZoomIn);
            }
            if i.key_pressed(egui::Key::Minus) {
                commands.push(NavCommand::ZoomOut);
            }
            commands
        });
        for command in commands {
            self.navigate(command);
        }
    }

    /// Status bar text, including the tentative dates of an active drag.
    fn status_text(&self) -> String {
        match self.drag.session() {
            Some(session) => {
                let (start, end) = session.tentative();
                format!(
                    "{}: {} → {} ({:+} days)",
                    self.item_name(session.item_id),
                    start.format("%d/%m/%Y"),
                    end.format("%d/%m/%Y"),
                    session.day_delta()
                )
            }
            None => self.status.text.clone(),
        }
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.collect_commits();
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let color = if self.status.is_error && !self.drag.is_active() {
                    ui::theme::ERROR_TEXT
                } else {
                    ui::theme::TEXT_SECONDARY
                };
                ui.label(egui::RichText::new(self.status_text()).size(11.0).color(color));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let pending = self.commits.in_flight();
                    if pending > 0 {
                        ui.spinner();
                        ui.label(egui::RichText::new(format!("{} saving", pending)).size(11.0));
                    }
                    let visible = crate::model::layout_rows(&self.items, &self.viewport).len();
                    ui.label(
                        egui::RichText::new(format!("{} of {} items in view", visible, self.items.len()))
                            .size(11.0)
                            .weak(),
                    );
                });
            });
        });

        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let interaction = ui::timeline_chart::show_timeline_chart(
                &self.items,
                &self.viewport,
                &mut self.drag,
                &mut self.selected_item,
                today(),
                ui,
            );
            if let Some(outcome) = interaction.released {
                self.handle_release(outcome);
            }
            if let Some(command) = interaction.nav {
                self.navigate(command);
            }
        });
    }
}

/// Load the item store at `path`. The path is remembered in the settings
/// only once it has loaded; a path that fails to load is forgotten again so
/// the next launch does not trip over it.
pub fn open_item_store(
    path: &Path,
    settings: &mut AppSettings,
    settings_path: &Path,
) -> Result<Vec<ScheduledItem>> {
    let loaded = file::load_items(path);
    let remembered = match &loaded {
        Ok(_) => Some(path.to_path_buf()),
        Err(_) if settings.data_file.as_deref() == Some(path) => None,
        Err(_) => settings.data_file.clone(),
    };
    if settings.data_file != remembered {
        settings.data_file = remembered;
        if let Err(e) = settings.save_to(settings_path) {
            tracing::warn!(error = %e, "failed to save settings");
        }
    }
    loaded
}

/// Fold one finished commit into the local items. Dates change only when the
/// gateway accepted the patch; a failure leaves the items alone.
pub fn apply_commit_outcome(items: &mut [ScheduledItem], outcome: CommitOutcome) -> StatusMessage {
    let item = items.iter_mut().find(|i| i.id == outcome.item_id);
    let name = item.as_ref().map(|i| i.name.clone()).unwrap_or_default();
    match outcome.result {
        Ok(()) => {
            if let Some(item) = item {
                item.apply_patch(&outcome.patch);
            }
            StatusMessage::info(format!("Updated '{}'", name))
        }
        Err(e) => StatusMessage::error(format!("Could not save '{}': {}", name, e)),
    }
}

/// Demo data used when no data file is configured, placed around `today`.
pub fn sample_items(today: NaiveDate) -> Vec<ScheduledItem> {
    let day = |offset: i64| today + Duration::days(offset);
    vec![
        ScheduledItem::new("Brand refresh", day(-12), day(9))
            .with_client("Northwind")
            .with_status("active"),
        ScheduledItem::new("Spring campaign", day(-3), day(18))
            .with_client("Acme")
            .with_status("active"),
        ScheduledItem::new("Product shoot", day(4), day(4))
            .with_client("Acme")
            .with_status("planned"),
        ScheduledItem::new("Website rebuild", day(6), day(55))
            .with_client("Globex")
            .with_status("planned"),
        ScheduledItem::new("Annual report", day(-40), day(-5))
            .with_client("Initech")
            .with_status("done"),
        ScheduledItem::new("Trade fair stand", day(20), day(27))
            .with_client("Globex")
            .with_status("on hold"),
        ScheduledItem {
            id: Uuid::new_v4(),
            name: "Podcast pilot (unscheduled)".into(),
            client: Some("Northwind".into()),
            status: "pitch".into(),
            start: None,
            end: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimelineError;
    use crate::model::DatePatch;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn move_outcome(item_id: Uuid, result: Result<()>) -> CommitOutcome {
        CommitOutcome {
            item_id,
            patch: DatePatch {
                start_date: Some(d(2025, 4, 7)),
                end_date: Some(d(2025, 4, 12)),
            },
            result,
        }
    }

    #[test]
    fn successful_commit_updates_local_dates() {
        let mut items = vec![ScheduledItem::new("Launch", d(2025, 4, 5), d(2025, 4, 10))];
        let id = items[0].id;

        let status = apply_commit_outcome(&mut items, move_outcome(id, Ok(())));
        assert!(!status.is_error);
        assert_eq!(status.text, "Updated 'Launch'");
        assert_eq!(items[0].date_range(), Some((d(2025, 4, 7), d(2025, 4, 12))));
    }

    #[test]
    fn failed_commit_keeps_local_dates() {
        let mut items = vec![ScheduledItem::new("Launch", d(2025, 4, 5), d(2025, 4, 10))];
        let id = items[0].id;

        let status = apply_commit_outcome(
            &mut items,
            move_outcome(id, Err(TimelineError::UnknownItem(id))),
        );
        assert!(status.is_error);
        assert!(status.text.starts_with("Could not save 'Launch'"));
        assert_eq!(items[0].date_range(), Some((d(2025, 4, 5), d(2025, 4, 10))));
    }

    #[test]
    fn outcomes_fold_in_arrival_order() {
        let mut items = vec![ScheduledItem::new("Launch", d(2025, 4, 5), d(2025, 4, 10))];
        let id = items[0].id;
        apply_commit_outcome(&mut items, move_outcome(id, Ok(())));
        let later = CommitOutcome {
            item_id: id,
            patch: DatePatch {
                start_date: Some(d(2025, 4, 9)),
                end_date: Some(d(2025, 4, 14)),
            },
            result: Ok(()),
        };
        apply_commit_outcome(&mut items, later);
        assert_eq!(items[0].start, Some(d(2025, 4, 9)));
    }

    #[test]
    fn unreadable_store_is_not_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        let bad = dir.path().join("broken.json");
        std::fs::write(&bad, "{ not json").unwrap();

        let mut settings = AppSettings::default();
        assert!(open_item_store(&bad, &mut settings, &settings_path).is_err());
        assert_eq!(settings.data_file, None);

        // A store that was remembered but no longer loads is dropped on disk too.
        settings.data_file = Some(bad.clone());
        settings.save_to(&settings_path).unwrap();
        assert!(open_item_store(&bad, &mut settings, &settings_path).is_err());
        assert_eq!(AppSettings::load_from(&settings_path).unwrap().data_file, None);
    }

    #[test]
    fn good_store_is_remembered_and_bad_pick_keeps_it() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        let good = dir.path().join("items.json");
        file::save_items(&sample_items(d(2025, 4, 1)), &good).unwrap();

        let mut settings = AppSettings::default();
        let items = open_item_store(&good, &mut settings, &settings_path).unwrap();
        assert_eq!(items.len(), 7);
        assert_eq!(
            AppSettings::load_from(&settings_path).unwrap().data_file,
            Some(good.clone())
        );

        let missing = dir.path().join("missing.json");
        assert!(open_item_store(&missing, &mut settings, &settings_path).is_err());
        assert_eq!(settings.data_file, Some(good));
    }

    #[test]
    fn sample_data_contains_an_unscheduled_item() {
        let items = sample_items(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert!(items.iter().any(|i| i.date_range().is_none()));
        assert!(items.iter().filter(|i| i.date_range().is_some()).count() >= 5);
    }
}
