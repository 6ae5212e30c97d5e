use std::{
    collections::HashSet,
    io,
    path::PathBuf,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};

use crate::{
    config::Config,
    constants::TIME_SETTINGS,
    domain::{Roadmap, TaskId, Tracker},
    error::{Error, Result},
    progress::FileSlot,
};

mod actions;
mod checklist_state;
mod event_handlers;
mod render_views;
mod reset_modal_view;
mod ui_helpers;
mod view_style;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UiMode {
    Main,
    ConfirmReset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NoticeKind {
    Info,
    Failure,
}

/// Footer message, cleared once it has been shown long enough.
#[derive(Clone, Debug)]
struct Notification {
    message: String,
    kind: NoticeKind,
    shown_at: Instant,
}

/// One visible line of the checklist.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Row {
    Phase(usize),
    Month { phase: usize, month: usize },
    Task(TaskId),
}

struct App {
    tracker: Tracker<FileSlot>,
    exports_dir: PathBuf,
    ui_mode: UiMode,
    collapsed: HashSet<usize>,
    selected_index: usize,
    show_help: bool,
    notification: Option<Notification>,
    last_save: Instant,
    render_needed: bool,
}

impl App {
    fn new(tracker: Tracker<FileSlot>, exports_dir: PathBuf) -> Self {
        Self {
            tracker,
            exports_dir,
            ui_mode: UiMode::Main,
            collapsed: HashSet::new(),
            selected_index: 0,
            show_help: false,
            notification: None,
            last_save: Instant::now(),
            render_needed: true,
        }
    }

    fn open_reset_modal(&mut self) {
        self.ui_mode = UiMode::ConfirmReset;
        self.render_needed = true;
    }

    fn close_reset_modal(&mut self) {
        self.ui_mode = UiMode::Main;
        self.render_needed = true;
    }

    fn in_reset_modal(&self) -> bool {
        matches!(self.ui_mode, UiMode::ConfirmReset)
    }

    fn modal_rect(&self, terminal_size: Rect) -> Rect {
        let target_width = (terminal_size.width.saturating_mul(2) / 3).max(40);
        let max_width = terminal_size.width.saturating_sub(2).max(1);
        let modal_width = target_width.clamp(1, max_width);
        let modal_height = 7u16.clamp(1, terminal_size.height.max(1));

        let modal_x = (terminal_size.width.saturating_sub(modal_width)) / 2;
        let modal_y = (terminal_size.height.saturating_sub(modal_height)) / 2;

        Rect::new(modal_x, modal_y, modal_width, modal_height)
    }
}

pub fn run_ui(config: &Config) -> Result<()> {
    let roadmap = Roadmap::load(config.roadmap_file.as_deref())?;
    let tracker = Tracker::open(roadmap, FileSlot::new(config.progress_path()));
    let mut app = App::new(tracker, config.exports_dir());

    enable_raw_mode().map_err(Error::Terminal)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(Error::Terminal)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(Error::Terminal)?;

    let loop_result = event_loop(&mut terminal, &mut app);

    app.persist();

    disable_raw_mode().map_err(Error::Terminal)?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(Error::Terminal)?;
    terminal.show_cursor().map_err(Error::Terminal)?;

    loop_result.map_err(Error::Terminal)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    let render_rate = Duration::from_millis(1000 / TIME_SETTINGS.target_fps);
    let poll_rate = Duration::from_millis(TIME_SETTINGS.poll_ms);
    let mut last_render = Instant::now();

    loop {
        app.autosave_if_due(Instant::now());
        app.expire_notification();

        if last_render.elapsed() >= render_rate && app.render_needed {
            terminal.draw(|f| {
                app.draw_frame(f);
            })?;
            app.render_needed = false;
            last_render = Instant::now();
        }

        if event::poll(poll_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) {
                        break;
                    }
                }
                Event::Resize(_, _) => app.render_needed = true,
                _ => {}
            }
        }
    }

    Ok(())
}
