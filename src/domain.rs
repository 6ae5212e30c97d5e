use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    progress::{ProgressSlot, ProgressSnapshot, ProgressStore},
    stats::Dashboard,
};

const BUILTIN_ROADMAP: &str = include_str!("../assets/roadmap.json");

/// Stable task identifier, assigned once from the task's ordinal position
/// when the roadmap is built.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        TaskId(id.into())
    }

    pub fn from_ordinal(ordinal: usize) -> Self {
        TaskId(format!("task_{}", ordinal))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    #[default]
    Task,
    Milestone,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Task => "task",
            TaskKind::Milestone => "milestone",
        }
    }

    pub fn is_milestone(self) -> bool {
        matches!(self, TaskKind::Milestone)
    }
}

#[derive(Clone, Debug)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub kind: TaskKind,
    pub completed: bool,
}

impl Task {
    pub fn status_label(&self) -> &'static str {
        if self.completed { "Completed" } else { "Pending" }
    }
}

#[derive(Clone, Debug)]
pub struct Month {
    pub title: String,
    pub tasks: Vec<Task>,
}

#[derive(Clone, Debug)]
pub struct Phase {
    /// 1-based position in the roadmap.
    pub index: usize,
    pub title: String,
    pub months: Vec<Month>,
}

impl Phase {
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.months.iter().flat_map(|month| month.tasks.iter())
    }
}

#[derive(Clone, Debug)]
pub struct Roadmap {
    pub title: String,
    pub phases: Vec<Phase>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoadmapDefinition {
    pub title: String,
    pub phases: Vec<PhaseDefinition>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PhaseDefinition {
    pub title: String,
    #[serde(default)]
    pub months: Vec<MonthDefinition>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonthDefinition {
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub text: String,
    #[serde(default)]
    pub kind: TaskKind,
}

impl Roadmap {
    /// Ids are handed out by one counter across all phases, in document order.
    pub fn from_definition(definition: RoadmapDefinition) -> Self {
        let mut next_ordinal = 0usize;
        let phases = definition
            .phases
            .into_iter()
            .enumerate()
            .map(|(position, phase)| Phase {
                index: position + 1,
                title: phase.title,
                months: phase
                    .months
                    .into_iter()
                    .map(|month| Month {
                        title: month.title,
                        tasks: month
                            .tasks
                            .into_iter()
                            .map(|task| {
                                let id = TaskId::from_ordinal(next_ordinal);
                                next_ordinal += 1;
                                Task {
                                    id,
                                    text: task.text,
                                    kind: task.kind,
                                    completed: false,
                                }
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Roadmap {
            title: definition.title,
            phases,
        }
    }

    pub fn builtin() -> Result<Self> {
        let definition: RoadmapDefinition = serde_json::from_str(BUILTIN_ROADMAP)?;
        Ok(Self::from_definition(definition))
    }

    /// Reads a definition file, or falls back to the built-in roadmap when
    /// no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Self::builtin();
        };

        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let definition: RoadmapDefinition =
            serde_json::from_str(&content).map_err(|source| Error::Definition {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "loaded roadmap definition");
        Ok(Self::from_definition(definition))
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.phases.iter().flat_map(Phase::tasks)
    }

    fn tasks_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.phases
            .iter_mut()
            .flat_map(|phase| phase.months.iter_mut())
            .flat_map(|month| month.tasks.iter_mut())
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks().find(|task| &task.id == id)
    }

    pub fn phase(&self, index: usize) -> Option<&Phase> {
        self.phases.iter().find(|phase| phase.index == index)
    }

    pub fn set_completed(&mut self, id: &TaskId, completed: bool) -> bool {
        match self.tasks_mut().find(|task| &task.id == id) {
            Some(task) => {
                task.completed = completed;
                true
            }
            None => false,
        }
    }

    /// Copies completion flags from a snapshot onto the live task list.
    /// Tasks absent from the snapshot end up unchecked; snapshot entries
    /// naming no live task are skipped. Returns how many were skipped.
    pub fn apply_snapshot(&mut self, snapshot: &ProgressSnapshot) -> usize {
        for task in self.tasks_mut() {
            task.completed = snapshot.is_completed(&task.id);
        }

        let unknown = snapshot
            .task_ids()
            .filter(|id| self.task(id).is_none())
            .count();
        if unknown > 0 {
            tracing::debug!(unknown, "ignored snapshot entries for unknown tasks");
        }
        unknown
    }

    pub fn clear_completion(&mut self) {
        for task in self.tasks_mut() {
            task.completed = false;
        }
    }
}

/// The live roadmap joined with its progress store. Every mutation goes
/// through here so the roadmap, the snapshot and the dashboard agree.
pub struct Tracker<S: ProgressSlot> {
    roadmap: Roadmap,
    store: ProgressStore<S>,
    dashboard: Dashboard,
}

impl<S: ProgressSlot> Tracker<S> {
    pub fn open(mut roadmap: Roadmap, slot: S) -> Self {
        let mut store = ProgressStore::new(slot);
        let skipped = roadmap.apply_snapshot(store.load());
        if store.snapshot().is_empty() {
            tracing::info!("no saved progress, starting fresh");
        } else if skipped > 0 {
            tracing::info!(skipped, "saved progress names tasks not in this roadmap");
        }
        let dashboard = Dashboard::compute(&roadmap);

        Tracker {
            roadmap,
            store,
            dashboard,
        }
    }

    pub fn roadmap(&self) -> &Roadmap {
        &self.roadmap
    }

    pub fn snapshot(&self) -> &ProgressSnapshot {
        self.store.snapshot()
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn store(&self) -> &ProgressStore<S> {
        &self.store
    }

    pub fn set_task_state(&mut self, id: &TaskId, completed: bool) -> Result<()> {
        if !self.roadmap.set_completed(id, completed) {
            return Err(Error::UnknownTask(id.to_string()));
        }
        self.store.set_task_state(id, completed);
        self.dashboard = Dashboard::compute(&self.roadmap);
        Ok(())
    }

    /// Flips one task and returns its new state.
    pub fn toggle(&mut self, id: &TaskId) -> Result<bool> {
        let completed = !self
            .roadmap
            .task(id)
            .ok_or_else(|| Error::UnknownTask(id.to_string()))?
            .completed;
        self.set_task_state(id, completed)?;
        Ok(completed)
    }

    pub fn save(&mut self) -> Result<&'static str> {
        self.store.save()
    }

    pub fn reset(&mut self) -> Result<&'static str> {
        let notice = self.store.reset()?;
        self.roadmap.clear_completion();
        self.dashboard = Dashboard::compute(&self.roadmap);
        Ok(notice)
    }
}

#[cfg(test)]
pub(crate) fn sample_definition() -> RoadmapDefinition {
    serde_json::from_str(
        r#"{
            "title": "Sample",
            "phases": [
                {"title": "One", "months": [
                    {"title": "Jan", "tasks": [
                        {"text": "a"},
                        {"text": "b", "kind": "milestone"}
                    ]},
                    {"title": "Feb", "tasks": [{"text": "c"}]}
                ]},
                {"title": "Two", "months": [
                    {"title": "Mar", "tasks": [{"text": "d"}, {"text": "e"}]}
                ]}
            ]
        }"#,
    )
    .unwrap()
}

#[cfg(test)]
pub(crate) fn sample_roadmap() -> Roadmap {
    Roadmap::from_definition(sample_definition())
}
