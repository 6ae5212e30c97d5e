use serde::Serialize;

use crate::domain::{Phase, Roadmap, Task};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub percent: u32,
}

impl Stats {
    fn from_counts(total: usize, completed: usize) -> Self {
        Stats {
            total,
            completed,
            percent: percent(completed, total),
        }
    }
}

/// Whole-number percentage, rounding halves up. Zero for an empty set.
pub fn percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * completed + total) / (2 * total)) as u32
}

pub fn overall_stats<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Stats {
    let (total, completed) = tasks
        .into_iter()
        .fold((0, 0), |(total, completed), task| {
            (total + 1, completed + usize::from(task.completed))
        });
    Stats::from_counts(total, completed)
}

pub fn milestone_stats<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Stats {
    overall_stats(tasks.into_iter().filter(|task| task.kind.is_milestone()))
}

pub fn phase_stats(phase: &Phase) -> Stats {
    overall_stats(phase.tasks())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PhaseStats {
    pub index: usize,
    pub title: String,
    #[serde(flatten)]
    pub stats: Stats,
}

/// Every statistic the presentation layer shows, recomputed from scratch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub overall: Stats,
    pub milestones: Stats,
    pub phases: Vec<PhaseStats>,
}

impl Dashboard {
    pub fn compute(roadmap: &Roadmap) -> Self {
        Dashboard {
            overall: overall_stats(roadmap.tasks()),
            milestones: milestone_stats(roadmap.tasks()),
            phases: roadmap
                .phases
                .iter()
                .map(|phase| PhaseStats {
                    index: phase.index,
                    title: phase.title.clone(),
                    stats: phase_stats(phase),
                })
                .collect(),
        }
    }

    pub fn phase(&self, index: usize) -> Option<&Stats> {
        self.phases
            .iter()
            .find(|phase| phase.index == index)
            .map(|phase| &phase.stats)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::domain::{Month, TaskId, TaskKind, sample_roadmap};

    fn tasks(flags: &[(bool, TaskKind)]) -> Vec<Task> {
        flags
            .iter()
            .enumerate()
            .map(|(i, &(completed, kind))| Task {
                id: TaskId::from_ordinal(i),
                text: format!("task {}", i),
                kind,
                completed,
            })
            .collect()
    }

    fn plain(completed: &[bool]) -> Vec<Task> {
        let flags: Vec<_> = completed.iter().map(|&c| (c, TaskKind::Task)).collect();
        tasks(&flags)
    }

    #[test]
    fn test_ten_tasks_four_done() {
        let mut flags = vec![false; 10];
        flags[..4].fill(true);
        let stats = overall_stats(&plain(&flags));
        assert_eq!(
            stats,
            Stats {
                total: 10,
                completed: 4,
                percent: 40
            }
        );
    }

    #[test]
    fn test_single_done_task_is_full() {
        assert_eq!(overall_stats(&plain(&[true])).percent, 100);
    }

    #[test]
    fn test_phase_of_three_rounds_down_to_33() {
        let phase = Phase {
            index: 1,
            title: "Phase".to_string(),
            months: vec![Month {
                title: "Month".to_string(),
                tasks: plain(&[true, false, false]),
            }],
        };
        assert_eq!(phase_stats(&phase).percent, 33);
    }

    #[test]
    fn test_percent_rounds_half_up() {
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(0, 7), 0);
    }

    #[test]
    fn test_empty_sets_are_zero_percent() {
        assert_eq!(overall_stats(&plain(&[])), Stats::default());
        assert_eq!(milestone_stats(&plain(&[true, true])), Stats::default());

        let empty = Phase {
            index: 3,
            title: "Empty".to_string(),
            months: Vec::new(),
        };
        assert_eq!(phase_stats(&empty).percent, 0);
    }

    #[test]
    fn test_milestones_counted_separately() {
        let set = tasks(&[
            (true, TaskKind::Milestone),
            (false, TaskKind::Milestone),
            (true, TaskKind::Task),
        ]);
        let stats = milestone_stats(&set);
        assert_eq!((stats.total, stats.completed, stats.percent), (2, 1, 50));
    }

    #[test]
    fn test_dashboard_per_phase() {
        let mut roadmap = sample_roadmap();
        roadmap.set_completed(&TaskId::new("task_0"), true);
        roadmap.set_completed(&TaskId::new("task_1"), true);
        roadmap.set_completed(&TaskId::new("task_4"), true);

        let dashboard = Dashboard::compute(&roadmap);

        assert_eq!(dashboard.overall.completed, 3);
        assert_eq!(dashboard.overall.percent, 60);
        assert_eq!(dashboard.milestones.completed, 1);
        assert_eq!(dashboard.phase(1).map(|s| s.percent), Some(67));
        assert_eq!(dashboard.phase(2).map(|s| s.percent), Some(50));
        assert_eq!(dashboard, Dashboard::compute(&roadmap));
    }

    proptest! {
        #[test]
        fn prop_completed_never_exceeds_total(
            flags in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..64)
        ) {
            let set = tasks(
                &flags
                    .iter()
                    .map(|&(done, milestone)| {
                        (done, if milestone { TaskKind::Milestone } else { TaskKind::Task })
                    })
                    .collect::<Vec<_>>(),
            );

            for stats in [overall_stats(&set), milestone_stats(&set)] {
                prop_assert!(stats.completed <= stats.total);
                prop_assert!(stats.percent <= 100);
                if stats.total == 0 {
                    prop_assert_eq!(stats.percent, 0);
                }
            }
        }

        #[test]
        fn prop_percent_matches_float_rounding(total in 1usize..500, done in 0usize..500) {
            let completed = done.min(total);
            let expected = (100.0 * completed as f64 / total as f64 + 0.5).floor() as u32;
            prop_assert_eq!(percent(completed, total), expected);
        }
    }
}
