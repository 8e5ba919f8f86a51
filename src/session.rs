use std::collections::HashSet;

use chrono::{DateTime, Duration, Local};

use crate::models::{CareTask, Plant, TaskCompletion, TaskKind};

/// How long a fully-resolved plant stays on screen before the session moves
/// to the next one.
pub const ADVANCE_DELAY_MS: i64 = 800;

/// A guided pass over every plant that needed care when the session began.
///
/// The plant list is a snapshot: edits made to the store while a session runs
/// do not show up here. Completions come back to the caller as
/// [`TaskCompletion`] events to apply to the canonical records; the engine
/// also updates its own copy so the per-plant completion checks see the new
/// dates.
///
/// The auto-advance is a deadline stored on the session, fired by [`tick`]
/// from the host event loop and disarmed by [`cancel_advance`]. Dropping the
/// session drops the deadline with it.
///
/// [`tick`]: CareSession::tick
/// [`cancel_advance`]: CareSession::cancel_advance
pub struct CareSession {
    plants: Vec<Plant>,
    current_index: usize,
    completed: HashSet<CareTask>,
    advance_at: Option<DateTime<Local>>,
}

impl CareSession {
    /// Builds a session from the given plants, keeping only those that
    /// currently need care. Input order is preserved, so callers pass the
    /// list pre-sorted.
    pub fn new(plants: Vec<Plant>, now: DateTime<Local>) -> CareSession {
        let plants = plants
            .into_iter()
            .filter(|p| p.needs_any_care(now))
            .collect();
        CareSession {
            plants,
            current_index: 0,
            completed: HashSet::new(),
            advance_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    pub fn plant_count(&self) -> usize {
        self.plants.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_plant(&self) -> Option<&Plant> {
        self.plants.get(self.current_index)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Every task outstanding across the whole snapshot right now.
    pub fn outstanding_tasks(&self, now: DateTime<Local>) -> Vec<CareTask> {
        let mut tasks = Vec::new();
        for plant in &self.plants {
            for kind in TaskKind::ALL {
                if plant.needs(kind, now) {
                    tasks.push(CareTask::new(kind, &plant.name));
                }
            }
        }
        tasks
    }

    /// Checklist for the current plant: each track that needed attention this
    /// pass, paired with whether it has been completed. Completed tracks stay
    /// listed so the checklist does not shrink under the user mid-plant.
    pub fn current_tasks(&self, now: DateTime<Local>) -> Vec<(CareTask, bool)> {
        let Some(plant) = self.current_plant() else {
            return Vec::new();
        };
        let mut tasks = Vec::new();
        for kind in TaskKind::ALL {
            let task = CareTask::new(kind, &plant.name);
            let done = self.completed.contains(&task);
            if done || plant.needs(kind, now) {
                tasks.push((task, done));
            }
        }
        tasks
    }

    /// Completes one task for the current plant.
    ///
    /// Records the completion, stores the new due date on the snapshot copy,
    /// and arms the auto-advance once every track on the plant is resolved.
    /// Completing a task that is already in this pass's completed set is a
    /// no-op and returns `None`.
    pub fn complete_task(
        &mut self,
        task: CareTask,
        now: DateTime<Local>,
    ) -> Option<TaskCompletion> {
        if self.completed.contains(&task) {
            return None;
        }
        let plant = self.plants.get_mut(self.current_index)?;
        let completion = TaskCompletion {
            plant_id: plant.id,
            kind: task.kind,
            completed_at: now,
            next_due: plant.schedule_for(task.kind).next_date(now),
        };
        completion.apply(plant);
        self.completed.insert(task);

        if self.current_plant_complete(now) && self.has_next_plant() {
            self.advance_at = Some(now + Duration::milliseconds(ADVANCE_DELAY_MS));
        }
        Some(completion)
    }

    /// True when every track on the current plant either no longer needs care
    /// or was completed during this pass.
    pub fn current_plant_complete(&self, now: DateTime<Local>) -> bool {
        let Some(plant) = self.current_plant() else {
            return true;
        };
        TaskKind::ALL.iter().all(|&kind| {
            !plant.needs(kind, now) || self.completed.contains(&CareTask::new(kind, &plant.name))
        })
    }

    pub fn has_next_plant(&self) -> bool {
        self.current_index + 1 < self.plants.len()
    }

    /// Terminal check: the last plant is resolved and nothing follows.
    pub fn is_complete(&self, now: DateTime<Local>) -> bool {
        !self.has_next_plant() && self.current_plant_complete(now)
    }

    /// True while an auto-advance is armed and has not fired.
    pub fn advance_pending(&self) -> bool {
        self.advance_at.is_some()
    }

    /// Fires the pending auto-advance if its deadline has passed. Returns
    /// true when the session moved to the next plant.
    pub fn tick(&mut self, now: DateTime<Local>) -> bool {
        match self.advance_at {
            Some(deadline) if now >= deadline => {
                self.advance_at = None;
                self.advance()
            }
            _ => false,
        }
    }

    /// Disarms a pending auto-advance. Called when the session is dismissed
    /// mid-delay; safe to call at any time.
    pub fn cancel_advance(&mut self) {
        self.advance_at = None;
    }

    fn advance(&mut self) -> bool {
        if !self.has_next_plant() {
            return false;
        }
        self.current_index += 1;
        true
    }
}
