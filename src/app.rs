use std::path::PathBuf;

use chrono::{NaiveDateTime, NaiveTime};

use crate::ui;
use gantt_timeline::io::{self, AppSettings, ConfigPaths};
use gantt_timeline::model::{
    DragRange, ScaleKey, ScaleRegistry, StickyTracker, TaskCollection, TaskDates, Timeline,
};

/// Main application state.
pub struct TimelineApp {
    pub tasks: TaskCollection,
    pub registry: ScaleRegistry,
    pub settings: AppSettings,
    pub config_paths: ConfigPaths,
    pub file_path: Option<PathBuf>,
    pub status_message: String,

    // Derived layout, rebuilt whenever tasks or scale change.
    timeline: Timeline,
    tracker: StickyTracker,
    drag: Option<DragRange>,
}

impl TimelineApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        ui::theme::apply_theme(&cc.egui_ctx);

        let config_paths = ConfigPaths::discover();
        let settings = io::load_settings(&config_paths.settings);
        let (registry, rejected) = io::load_scale_registry(&config_paths.scales);
        let status_message = match rejected.first() {
            Some(e) => format!("Scale overrides partly ignored: {}", e),
            None => "Ready".to_string(),
        };

        let mut app = Self {
            tasks: Self::sample_tasks(),
            registry,
            settings,
            config_paths,
            file_path: None,
            status_message,
            timeline: Timeline::default(),
            tracker: StickyTracker::default(),
            drag: None,
        };
        app.relayout();
        app
    }

    /// A few tasks around today so the chart isn't empty on first launch.
    fn sample_tasks() -> TaskCollection {
        let today = chrono::Local::now().date_naive();
        let day = |offset: i64| (today + chrono::Duration::days(offset)).format("%Y-%m-%d").to_string();

        let mut tasks = TaskCollection::new();
        tasks.insert("design".into(), TaskDates::new(day(-12), day(3)));
        tasks.insert("build".into(), TaskDates::new(day(2), day(34)));
        tasks.insert("review".into(), TaskDates::new(day(30), day(41)));
        tasks.insert("launch".into(), TaskDates::new(day(45), day(45)));
        tasks
    }

    /// Recompute cells and groups and remount the sticky tracker.
    fn relayout(&mut self) {
        self.drag = None;
        let built = self
            .registry
            .get(self.settings.active_scale)
            .and_then(|config| Timeline::build(&self.tasks, config));
        match built {
            Ok(timeline) => self.timeline = timeline,
            Err(e) => {
                log::error!("Cannot lay out timeline: {}", e);
                self.status_message = e.to_string();
                self.timeline = Timeline::default();
            }
        }
        self.tracker = StickyTracker::new(self.timeline.groups.clone());
    }

    // --- Scale ---

    pub fn set_scale(&mut self, key: ScaleKey) {
        if self.settings.active_scale == key {
            return;
        }
        self.settings.active_scale = key;
        if let Err(e) = io::save_settings(&self.settings, &self.config_paths.settings) {
            log::warn!("Could not save settings: {}", e);
        }
        self.relayout();
        self.status_message = format!("Scale: {}", key.title());
    }

    pub fn reload_scales(&mut self) {
        let (registry, rejected) = io::load_scale_registry(&self.config_paths.scales);
        self.registry = registry;
        self.status_message = match rejected.first() {
            Some(e) => format!("Reloaded scales, {} override(s) ignored: {}", rejected.len(), e),
            None => "Reloaded scales".to_string(),
        };
        self.relayout();
    }

    // --- File operations ---

    pub fn open_tasks(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Task ranges", &["json"])
            .pick_file()
        {
            match io::load_tasks(&path) {
                Ok(tasks) => {
                    self.status_message = format!("Loaded {} tasks", tasks.len());
                    self.tasks = tasks;
                    self.file_path = Some(path);
                    self.relayout();
                }
                Err(e) => self.status_message = format!("Error loading: {}", e),
            }
        }
    }

    pub fn save_tasks_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Task ranges", &["json"])
            .set_file_name("tasks.json")
            .save_file()
        {
            match io::save_tasks(&self.tasks, &path) {
                Ok(()) => {
                    self.file_path = Some(path);
                    self.status_message = "Tasks saved".to_string();
                }
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        }
    }

    pub fn import_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match io::csv_import::import_csv(&path) {
                Ok((tasks, skipped)) => {
                    self.status_message = if skipped > 0 {
                        format!("Imported {} tasks ({} rows skipped)", tasks.len(), skipped)
                    } else {
                        format!("Imported {} tasks", tasks.len())
                    };
                    self.tasks = tasks;
                    self.file_path = None;
                    self.relayout();
                }
                Err(e) => self.status_message = format!("CSV import failed: {}", e),
            }
        }
    }

    // --- Drag ---

    fn apply_drop(&mut self, id: &str, dropped: DragRange) {
        if let Some(task) = self.tasks.get_mut(id) {
            *task = TaskDates::new(format_date(dropped.start_date), format_date(dropped.end_date));
            self.status_message = format!(
                "Moved '{}' ({} → {})",
                id, task.start_date, task.end_date
            );
        }
        self.relayout();
    }
}

/// Date-only when the time is midnight, otherwise a full ISO timestamp.
fn format_date(at: NaiveDateTime) -> String {
    if at.time() == NaiveTime::MIN {
        at.format("%Y-%m-%d").to_string()
    } else {
        at.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Tasks: {} · Cells: {} · Groups: {}",
                                self.tasks.len(),
                                self.timeline.cells.len(),
                                self.timeline.groups.len()
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        let mut dropped = None;
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_CANVAS)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let Ok(config) = self.registry.get(self.settings.active_scale) else {
                return;
            };
            let interaction = ui::gantt_chart::show_timeline(
                &self.tasks,
                &self.timeline,
                config,
                self.drag.as_ref(),
                &mut self.tracker,
                ui,
            );
            self.drag = interaction.dragging;
            dropped = interaction.dropped;
        });

        if let Some((id, range)) = dropped {
            self.apply_drop(&id, range);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_keep_time_only_when_needed() {
        let day = chrono::NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(day.and_hms_opt(0, 0, 0).unwrap()), "2024-01-05");
        assert_eq!(format_date(day.and_hms_opt(6, 30, 0).unwrap()), "2024-01-05T06:30:00");
    }

    #[test]
    fn sample_tasks_lay_out() {
        let registry = ScaleRegistry::builtin();
        let tasks = TimelineApp::sample_tasks();
        for key in ScaleKey::ALL {
            let timeline = Timeline::build(&tasks, registry.get(key).unwrap()).unwrap();
            assert!(!timeline.cells.is_empty());
            assert_eq!(timeline.groups[0].left, 0.0);
        }
    }
}
