use ratatui::style::Color;

pub const APP_NAME: &str = "roadmap";

pub const FILE_NAMES: FileNames = FileNames {
    progress: "progress.json",
    roadmap: "roadmap.json",
    log: "roadmap.log",
    backups_dir: "backups",
    exports_dir: "exports",
};

pub const TIME_SETTINGS: TimeSettings = TimeSettings {
    autosave_secs: 30,
    notification_ms: 3000,
    poll_ms: 50,
    target_fps: 24,
};

pub const BACKUP_SETTINGS: BackupSettings = BackupSettings { keep: 10 };

pub const NOTICES: Notices = Notices {
    saved: "Progress saved successfully!",
    reset: "All progress has been reset!",
    exported: "Progress exported to CSV!",
    report: "Detailed report generated!",
    save_failed: "Could not save progress",
    export_failed: "Could not export progress",
    report_failed: "Could not generate report",
    reset_failed: "Could not reset progress",
};

pub const RESET_PROMPT: &str =
    "Are you sure you want to reset all progress? This action cannot be undone.";

/// Progress colors, lowest band first.
pub const PROGRESS_COLORS: [Color; 4] = [
    Color::Rgb(255, 51, 0),
    Color::Rgb(255, 204, 0),
    Color::Rgb(128, 255, 0),
    Color::Rgb(0, 176, 80),
];

pub const MILESTONE_COLOR: Color = Color::Rgb(255, 153, 0);

pub struct FileNames {
    pub progress: &'static str,
    pub roadmap: &'static str,
    pub log: &'static str,
    pub backups_dir: &'static str,
    pub exports_dir: &'static str,
}

pub struct TimeSettings {
    pub autosave_secs: u64,
    pub notification_ms: u64,
    pub poll_ms: u64,
    pub target_fps: u64,
}

pub struct BackupSettings {
    pub keep: usize,
}

pub struct Notices {
    pub saved: &'static str,
    pub reset: &'static str,
    pub exported: &'static str,
    pub report: &'static str,
    pub save_failed: &'static str,
    pub export_failed: &'static str,
    pub report_failed: &'static str,
    pub reset_failed: &'static str,
}
