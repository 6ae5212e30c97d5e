use std::{
    fs::{self, File},
    io::BufWriter,
    time::{Duration, Instant},
};

use chrono::Local;

use crate::{
    constants::{NOTICES, TIME_SETTINGS},
    error::{Error, Result},
    export, storage,
};

use super::{App, NoticeKind, Notification};

impl App {
    pub(super) fn notify(&mut self, message: impl Into<String>) {
        self.show_notice(message.into(), NoticeKind::Info);
    }

    pub(super) fn notify_failure(&mut self, prefix: &str, error: &Error) {
        self.show_notice(format!("{prefix}: {error}"), NoticeKind::Failure);
    }

    fn show_notice(&mut self, message: String, kind: NoticeKind) {
        self.notification = Some(Notification {
            message,
            kind,
            shown_at: Instant::now(),
        });
        self.render_needed = true;
    }

    pub(super) fn expire_notification(&mut self) {
        let lifetime = Duration::from_millis(TIME_SETTINGS.notification_ms);
        if self
            .notification
            .as_ref()
            .is_some_and(|notification| notification.shown_at.elapsed() >= lifetime)
        {
            self.notification = None;
            self.render_needed = true;
        }
    }

    /// Saves unconditionally. Failures keep the in-memory state and surface
    /// as a notice.
    pub(super) fn persist(&mut self) {
        match self.tracker.save() {
            Ok(notice) => self.notify(notice),
            Err(e) => {
                tracing::warn!("saving progress failed: {e}");
                self.notify_failure(NOTICES.save_failed, &e);
            }
        }
        self.last_save = Instant::now();
    }

    /// Saves whatever is in memory once the autosave interval has passed
    /// since the last save, changed or not. Returns true when it saved.
    pub(super) fn autosave_if_due(&mut self, now: Instant) -> bool {
        let interval = Duration::from_secs(TIME_SETTINGS.autosave_secs);
        if now.saturating_duration_since(self.last_save) < interval {
            return false;
        }
        tracing::debug!("autosave");
        self.persist();
        true
    }

    pub(super) fn export_csv(&mut self) {
        match self.write_csv_export() {
            Ok(()) => self.notify(NOTICES.exported),
            Err(e) => {
                tracing::warn!("csv export failed: {e}");
                self.notify_failure(NOTICES.export_failed, &e);
            }
        }
    }

    fn write_csv_export(&self) -> Result<()> {
        let today = Local::now().date_naive();
        fs::create_dir_all(&self.exports_dir).map_err(|e| Error::io(&self.exports_dir, e))?;
        let path = self.exports_dir.join(export::csv_file_name(today));
        let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
        export::write_csv(self.tracker.roadmap(), today, BufWriter::new(file))?;
        tracing::info!(path = %path.display(), "csv export written");
        Ok(())
    }

    pub(super) fn generate_report(&mut self) {
        let today = Local::now().date_naive();
        let html = export::render_report(self.tracker.roadmap(), self.tracker.dashboard(), today);
        let path = self.exports_dir.join(export::report_file_name(today));

        match storage::write_text_file(&path, &html) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "report written");
                self.notify(NOTICES.report);
            }
            Err(e) => {
                tracing::warn!("report generation failed: {e}");
                self.notify_failure(NOTICES.report_failed, &e);
            }
        }
    }

    pub(super) fn confirm_reset(&mut self) {
        match self.tracker.reset() {
            Ok(notice) => self.notify(notice),
            Err(e) => {
                tracing::warn!("reset failed: {e}");
                self.notify_failure(NOTICES.reset_failed, &e);
            }
        }
        self.close_reset_modal();
        self.clamp_selection();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        path::PathBuf,
        time::{Duration, Instant},
    };

    use super::super::{App, NoticeKind};
    use crate::{
        constants::NOTICES,
        domain::{TaskId, Tracker, sample_roadmap},
        progress::FileSlot,
    };

    fn app_in(dir: &std::path::Path) -> App {
        let tracker = Tracker::open(sample_roadmap(), FileSlot::new(dir.join("progress.json")));
        App::new(tracker, dir.join("exports"))
    }

    fn notice(app: &App) -> Option<&str> {
        app.notification
            .as_ref()
            .map(|notification| notification.message.as_str())
    }

    #[test]
    fn test_notification_expires() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.notify("hello");
        app.expire_notification();
        assert_eq!(notice(&app), Some("hello"));

        if let Some(notification) = app.notification.as_mut() {
            if let Some(earlier) = notification.shown_at.checked_sub(Duration::from_secs(5)) {
                notification.shown_at = earlier;
            }
        }
        app.expire_notification();
        assert_eq!(notice(&app), None);
    }

    #[test]
    fn test_persist_reports_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.persist();
        assert_eq!(notice(&app), Some(NOTICES.saved));
    }

    #[test]
    fn test_exports_land_in_exports_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());

        app.export_csv();
        assert_eq!(notice(&app), Some(NOTICES.exported));
        app.generate_report();
        assert_eq!(notice(&app), Some(NOTICES.report));

        let names: Vec<PathBuf> = fs::read_dir(dir.path().join("exports"))
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .collect();
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_confirm_reset_clears_and_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.toggle_task(&TaskId::new("task_1"));
        assert!(dir.path().join("progress.json").exists());

        app.open_reset_modal();
        app.confirm_reset();

        assert!(!app.in_reset_modal());
        assert!(!dir.path().join("progress.json").exists());
        assert_eq!(app.tracker.dashboard().overall.completed, 0);
        assert_eq!(notice(&app), Some(NOTICES.reset));
    }

    #[test]
    fn test_autosave_waits_for_interval() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let now = Instant::now();

        assert!(!app.autosave_if_due(now + Duration::from_secs(29)));
        assert!(!dir.path().join("progress.json").exists());
        assert_eq!(notice(&app), None);
    }

    #[test]
    fn test_autosave_saves_without_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let later = Instant::now() + Duration::from_secs(31);

        assert!(app.autosave_if_due(later));
        let saved = fs::read_to_string(dir.path().join("progress.json")).unwrap();
        assert!(saved.contains("lastSaved"));
        assert_eq!(notice(&app), Some(NOTICES.saved));

        assert!(!app.autosave_if_due(Instant::now() + Duration::from_secs(1)));
    }

    #[test]
    fn test_failed_reset_is_reported_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("backups"), "").unwrap();
        let mut app = app_in(dir.path());
        app.toggle_task(&TaskId::new("task_1"));

        app.open_reset_modal();
        app.confirm_reset();

        let shown = app.notification.as_ref().unwrap();
        assert_eq!(shown.kind, NoticeKind::Failure);
        assert!(shown.message.starts_with(NOTICES.reset_failed));
        assert_eq!(app.tracker.dashboard().overall.completed, 1);
        assert!(dir.path().join("progress.json").exists());
    }

    #[test]
    fn test_successful_actions_are_info() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.persist();
        assert_eq!(app.notification.as_ref().map(|n| n.kind), Some(NoticeKind::Info));
    }
}
