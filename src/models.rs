use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::schedule::{is_same_day, Schedule};

/// A plant under care.
///
/// Each plant carries three independent care tracks: watering, rotation and
/// fertilizing. Watering is always scheduled, so its dates are plain fields;
/// the other two are optional and only hold dates while their schedule is
/// enabled.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Plant {
    /// Unique identifier for the plant.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Watering recurrence. Never `Schedule::None` in practice.
    pub watering_schedule: Schedule,
    /// When the plant was last watered.
    pub last_watered: DateTime<Local>,
    /// When the plant is next due for water.
    pub next_watering: DateTime<Local>,
    /// Rotation recurrence, if the plant is rotated at all.
    #[serde(default)]
    pub rotation_schedule: Schedule,
    #[serde(default)]
    pub last_rotated: Option<DateTime<Local>>,
    #[serde(default)]
    pub next_rotation: Option<DateTime<Local>>,
    /// Fertilizing recurrence, if the plant is fertilized at all.
    #[serde(default)]
    pub fertilizing_schedule: Schedule,
    #[serde(default)]
    pub last_fertilized: Option<DateTime<Local>>,
    #[serde(default)]
    pub next_fertilizing: Option<DateTime<Local>>,
    /// Free-text care notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// File name of the stored photo, if one was attached.
    #[serde(default)]
    pub image_file: Option<String>,
}

impl Plant {
    /// True when watering is due today or overdue.
    pub fn needs_watering(&self, now: DateTime<Local>) -> bool {
        is_same_day(self.next_watering, now) || self.next_watering < now
    }

    /// True when rotation is enabled and due today or overdue.
    pub fn needs_rotation(&self, now: DateTime<Local>) -> bool {
        if !self.rotation_schedule.is_enabled() {
            return false;
        }
        match self.next_rotation {
            Some(next) => is_same_day(next, now) || next < now,
            None => false,
        }
    }

    /// True when fertilizing is enabled and due today or overdue.
    pub fn needs_fertilizing(&self, now: DateTime<Local>) -> bool {
        if !self.fertilizing_schedule.is_enabled() {
            return false;
        }
        match self.next_fertilizing {
            Some(next) => is_same_day(next, now) || next < now,
            None => false,
        }
    }

    pub fn needs_any_care(&self, now: DateTime<Local>) -> bool {
        self.needs_watering(now) || self.needs_rotation(now) || self.needs_fertilizing(now)
    }

    /// Earliest upcoming attention date, used to order the plant list.
    /// Watering and rotation only; fertilizing does not influence ordering.
    pub fn next_care_date(&self) -> DateTime<Local> {
        match self.next_rotation {
            Some(next_rotation) => self.next_watering.min(next_rotation),
            None => self.next_watering,
        }
    }

    /// The recurrence governing one care track.
    pub fn schedule_for(&self, kind: TaskKind) -> Schedule {
        match kind {
            TaskKind::Watering => self.watering_schedule,
            TaskKind::Rotation => self.rotation_schedule,
            TaskKind::Fertilizing => self.fertilizing_schedule,
        }
    }

    /// Whether one care track is due, by kind.
    pub fn needs(&self, kind: TaskKind, now: DateTime<Local>) -> bool {
        match kind {
            TaskKind::Watering => self.needs_watering(now),
            TaskKind::Rotation => self.needs_rotation(now),
            TaskKind::Fertilizing => self.needs_fertilizing(now),
        }
    }
}

/// Sorts plants by soonest care date, then name.
pub fn sort_by_care_date(plants: &mut [Plant]) {
    plants.sort_by(|a, b| {
        a.next_care_date()
            .cmp(&b.next_care_date())
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// One of the three care dimensions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Watering,
    Rotation,
    Fertilizing,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [TaskKind::Watering, TaskKind::Rotation, TaskKind::Fertilizing];

    /// Imperative label shown on checklists and buttons.
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::Watering => "Water",
            TaskKind::Rotation => "Rotate",
            TaskKind::Fertilizing => "Fertilize",
        }
    }

    /// Past-tense form for confirmations.
    pub fn done_label(&self) -> &'static str {
        match self {
            TaskKind::Watering => "Watered",
            TaskKind::Rotation => "Rotated",
            TaskKind::Fertilizing => "Fertilized",
        }
    }
}

/// Key identifying one task within a care session pass.
///
/// Keyed by plant name rather than id; two plants sharing a name share task
/// identity within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CareTask {
    pub kind: TaskKind,
    pub plant_name: String,
}

impl CareTask {
    pub fn new(kind: TaskKind, plant_name: &str) -> CareTask {
        CareTask {
            kind,
            plant_name: plant_name.to_string(),
        }
    }
}

/// Emitted when a care task is completed.
///
/// The session engine works on a snapshot, so it hands the date mutation back
/// to the caller as one of these; whoever owns the canonical plant record
/// applies it and saves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCompletion {
    pub plant_id: u64,
    pub kind: TaskKind,
    pub completed_at: DateTime<Local>,
    /// Next due date per the track's schedule, if it yields one.
    pub next_due: Option<DateTime<Local>>,
}

impl TaskCompletion {
    /// Writes the completion onto a plant record.
    pub fn apply(&self, plant: &mut Plant) {
        match self.kind {
            TaskKind::Watering => {
                plant.last_watered = self.completed_at;
                if let Some(next) = self.next_due {
                    plant.next_watering = next;
                }
            }
            TaskKind::Rotation => {
                plant.last_rotated = Some(self.completed_at);
                if let Some(next) = self.next_due {
                    plant.next_rotation = Some(next);
                }
            }
            TaskKind::Fertilizing => {
                plant.last_fertilized = Some(self.completed_at);
                if let Some(next) = self.next_due {
                    plant.next_fertilizing = Some(next);
                }
            }
        }
    }
}
