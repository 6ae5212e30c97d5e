use crate::domain::TaskId;

use super::{App, Row, ui_helpers};

impl App {
    /// Rows currently visible, honouring collapsed phases.
    pub(super) fn visible_rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for phase in &self.tracker.roadmap().phases {
            rows.push(Row::Phase(phase.index));
            if self.collapsed.contains(&phase.index) {
                continue;
            }
            for (month_position, month) in phase.months.iter().enumerate() {
                rows.push(Row::Month {
                    phase: phase.index,
                    month: month_position,
                });
                rows.extend(month.tasks.iter().map(|task| Row::Task(task.id.clone())));
            }
        }
        rows
    }

    pub(super) fn selected_row(&self) -> Option<Row> {
        self.visible_rows().get(self.selected_index).cloned()
    }

    pub(super) fn select_next(&mut self) {
        let len = self.visible_rows().len();
        self.selected_index = ui_helpers::wrap_next_index(self.selected_index, len);
    }

    pub(super) fn select_prev(&mut self) {
        let len = self.visible_rows().len();
        self.selected_index = ui_helpers::wrap_prev_index(self.selected_index, len);
    }

    pub(super) fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub(super) fn select_last(&mut self) {
        self.selected_index = self.visible_rows().len().saturating_sub(1);
    }

    /// Moves to the header of the next phase, wrapping at the end.
    pub(super) fn select_next_phase(&mut self) {
        let rows = self.visible_rows();
        let next = rows
            .iter()
            .enumerate()
            .skip(self.selected_index + 1)
            .find(|(_, row)| matches!(row, Row::Phase(_)))
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.selected_index = next;
    }

    pub(super) fn clamp_selection(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    pub(super) fn toggle_phase_collapsed(&mut self, phase_index: usize) {
        if !self.collapsed.remove(&phase_index) {
            self.collapsed.insert(phase_index);
        }

        // Keep the cursor on the phase header that was folded.
        if let Some(position) = self
            .visible_rows()
            .iter()
            .position(|row| *row == Row::Phase(phase_index))
        {
            self.selected_index = position;
        }
        self.clamp_selection();
    }

    /// The phase the cursor is in, whichever row kind it sits on.
    pub(super) fn selected_phase_index(&self) -> Option<usize> {
        match self.selected_row()? {
            Row::Phase(index) => Some(index),
            Row::Month { phase, .. } => Some(phase),
            Row::Task(id) => self
                .tracker
                .roadmap()
                .phases
                .iter()
                .find(|phase| phase.tasks().any(|task| task.id == id))
                .map(|phase| phase.index),
        }
    }

    pub(super) fn activate_selected(&mut self) {
        match self.selected_row() {
            Some(Row::Task(id)) => self.toggle_task(&id),
            Some(Row::Phase(index)) => self.toggle_phase_collapsed(index),
            Some(Row::Month { .. }) | None => {}
        }
    }

    pub(super) fn toggle_task(&mut self, id: &TaskId) {
        match self.tracker.toggle(id) {
            Ok(completed) => {
                tracing::debug!(task = %id, completed, "task toggled");
                self.persist();
            }
            Err(e) => tracing::warn!("toggle failed: {e}"),
        }
    }
}
