use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::App;

impl App {
    /// Returns true when the app should quit.
    pub(super) fn handle_key(&mut self, key: KeyEvent) -> bool {
        let quit = if self.in_reset_modal() {
            self.handle_reset_modal_key(key);
            false
        } else {
            self.handle_normal_key(key)
        };
        self.render_needed = true;
        quit
    }

    fn handle_reset_modal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_reset(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.close_reset_modal(),
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Home | KeyCode::Char('g') => self.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.select_last(),
            KeyCode::Tab => self.select_next_phase(),
            KeyCode::Char(' ') | KeyCode::Enter => self.activate_selected(),
            KeyCode::Char('c') => {
                if let Some(phase) = self.selected_phase_index() {
                    self.toggle_phase_collapsed(phase);
                }
            }
            KeyCode::Char('s') => self.persist(),
            KeyCode::Char('e') => self.export_csv(),
            KeyCode::Char('r') => self.generate_report(),
            KeyCode::Char('x') => self.open_reset_modal(),
            KeyCode::Char('?') => self.show_help = !self.show_help,
            _ => {}
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::super::{App, Row};
    use crate::{
        domain::{TaskId, Tracker, sample_roadmap},
        progress::FileSlot,
    };

    fn app_in(dir: &std::path::Path) -> App {
        let tracker = Tracker::open(sample_roadmap(), FileSlot::new(dir.join("progress.json")));
        App::new(tracker, PathBuf::from(dir))
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_navigate_and_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_row(), Some(Row::Task(TaskId::new("task_0"))));

        press(&mut app, KeyCode::Char(' '));
        assert!(app.tracker.snapshot().is_completed(&TaskId::new("task_0")));
        assert_eq!(app.tracker.dashboard().overall.completed, 1);
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.toggle_task(&TaskId::new("task_3"));

        press(&mut app, KeyCode::Char('x'));
        assert!(app.in_reset_modal());
        press(&mut app, KeyCode::Char('n'));
        assert!(!app.in_reset_modal());
        assert_eq!(app.tracker.dashboard().overall.completed, 1);

        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.tracker.dashboard().overall.completed, 0);
    }

    #[test]
    fn test_quit_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        assert!(!press(&mut app, KeyCode::Char('?')));
        assert!(app.show_help);
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_modal_swallows_quit() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        press(&mut app, KeyCode::Char('x'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(app.in_reset_modal());
    }
}
