use chrono::{DateTime, Duration, Local, TimeZone};
use verdant::models::{CareTask, Plant, TaskKind};
use verdant::schedule::{start_of_day, Schedule};
use verdant::session::{CareSession, ADVANCE_DELAY_MS};

fn plant_needing_water(id: u64, name: &str, now: DateTime<Local>) -> Plant {
    Plant {
        id,
        name: name.into(),
        watering_schedule: Schedule::Weekly,
        last_watered: now - Duration::days(8),
        next_watering: now - Duration::days(1),
        rotation_schedule: Schedule::None,
        last_rotated: None,
        next_rotation: None,
        fertilizing_schedule: Schedule::None,
        last_fertilized: None,
        next_fertilizing: None,
        notes: None,
        image_file: None,
    }
}

fn pinned_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 3, 10, 10, 30, 0).unwrap()
}

#[test]
fn test_snapshot_filters_to_plants_needing_care() {
    let now = pinned_now();
    let due = plant_needing_water(1, "Fern", now);
    let mut happy = plant_needing_water(2, "Aloe", now);
    happy.next_watering = now + Duration::days(3);

    let session = CareSession::new(vec![due, happy], now);
    assert_eq!(session.plant_count(), 1);
    assert_eq!(session.current_plant().unwrap().name, "Fern");
}

#[test]
fn test_completing_a_task_twice_is_idempotent() {
    let now = pinned_now();
    let session_plants = vec![plant_needing_water(1, "Fern", now)];
    let mut session = CareSession::new(session_plants, now);

    let task = CareTask::new(TaskKind::Watering, "Fern");
    let first = session.complete_task(task.clone(), now);
    assert!(first.is_some());
    let after_first = session.current_plant().unwrap().clone();

    let second = session.complete_task(task, now);
    assert!(second.is_none());
    let after_second = session.current_plant().unwrap().clone();

    assert_eq!(after_first.last_watered, after_second.last_watered);
    assert_eq!(after_first.next_watering, after_second.next_watering);
    assert_eq!(session.completed_count(), 1);
}

#[test]
fn test_two_plant_session_runs_to_completion() {
    let now = pinned_now();
    let a = plant_needing_water(1, "Aloe", now);
    let b = plant_needing_water(2, "Fern", now);
    let mut session = CareSession::new(vec![a, b], now);

    let first = session
        .complete_task(CareTask::new(TaskKind::Watering, "Aloe"), now)
        .unwrap();
    assert_eq!(first.next_due, Some(start_of_day(now) + Duration::days(7)));

    // Plant resolved, another one waiting: advance is armed but not fired.
    assert!(session.advance_pending());
    assert_eq!(session.current_index(), 0);
    assert!(!session.is_complete(now));

    // Before the delay elapses nothing moves.
    assert!(!session.tick(now + Duration::milliseconds(ADVANCE_DELAY_MS - 1)));
    assert_eq!(session.current_index(), 0);

    // At the deadline the session advances.
    let later = now + Duration::milliseconds(ADVANCE_DELAY_MS);
    assert!(session.tick(later));
    assert_eq!(session.current_index(), 1);
    assert!(!session.advance_pending());

    let second = session
        .complete_task(CareTask::new(TaskKind::Watering, "Fern"), later)
        .unwrap();
    assert_eq!(second.next_due, Some(start_of_day(later) + Duration::days(7)));

    // Last plant resolved, nothing follows: terminal, no advance armed.
    assert!(session.is_complete(later));
    assert!(!session.advance_pending());
}

#[test]
fn test_cancelled_advance_never_moves_the_index() {
    let now = pinned_now();
    let a = plant_needing_water(1, "Aloe", now);
    let b = plant_needing_water(2, "Fern", now);
    let mut session = CareSession::new(vec![a, b], now);

    session.complete_task(CareTask::new(TaskKind::Watering, "Aloe"), now);
    assert!(session.advance_pending());

    session.cancel_advance();
    assert!(!session.tick(now + Duration::seconds(5)));
    assert_eq!(session.current_index(), 0);
}

#[test]
fn test_checklist_keeps_completed_tasks_visible() {
    let now = pinned_now();
    let mut p = plant_needing_water(1, "Fern", now);
    p.rotation_schedule = Schedule::Monthly;
    p.next_rotation = Some(now - Duration::days(1));
    let mut session = CareSession::new(vec![p], now);

    assert_eq!(session.current_tasks(now).len(), 2);

    session.complete_task(CareTask::new(TaskKind::Watering, "Fern"), now);

    // Watering stays on the checklist, marked done; rotation still open.
    let tasks = session.current_tasks(now);
    assert_eq!(tasks.len(), 2);
    let watering = tasks.iter().find(|(t, _)| t.kind == TaskKind::Watering).unwrap();
    assert!(watering.1);
    let rotation = tasks.iter().find(|(t, _)| t.kind == TaskKind::Rotation).unwrap();
    assert!(!rotation.1);

    assert!(!session.current_plant_complete(now));
    assert!(!session.advance_pending());
}

#[test]
fn test_single_plant_session_scenario() {
    // Fern: weekly watering due yesterday, nothing else scheduled.
    let now = pinned_now();
    let fern = plant_needing_water(1, "Fern", now);
    let mut session = CareSession::new(vec![fern], now);

    let tasks = session.current_tasks(now);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].0.kind, TaskKind::Watering);

    let completion = session
        .complete_task(CareTask::new(TaskKind::Watering, "Fern"), now)
        .unwrap();
    assert_eq!(completion.completed_at, now);
    assert_eq!(completion.next_due, Some(start_of_day(now) + Duration::days(7)));

    let plant = session.current_plant().unwrap();
    assert_eq!(plant.last_watered, now);
    assert_eq!(plant.next_watering, start_of_day(now) + Duration::days(7));

    // No rotation or fertilizing tasks exist to block completion.
    assert!(session.is_complete(now));
    assert!(!session.advance_pending());
}

#[test]
fn test_empty_snapshot_is_terminal() {
    let now = pinned_now();
    let mut happy = plant_needing_water(1, "Aloe", now);
    happy.next_watering = now + Duration::days(3);

    let session = CareSession::new(vec![happy], now);
    assert!(session.is_empty());
    assert!(session.current_plant().is_none());
    assert!(session.is_complete(now));
    assert!(session.current_tasks(now).is_empty());
}

#[test]
fn test_outstanding_tasks_span_the_snapshot() {
    let now = pinned_now();
    let a = plant_needing_water(1, "Aloe", now);
    let mut b = plant_needing_water(2, "Fern", now);
    b.fertilizing_schedule = Schedule::Monthly;
    b.next_fertilizing = Some(now - Duration::days(2));

    let mut session = CareSession::new(vec![a, b], now);
    assert_eq!(session.outstanding_tasks(now).len(), 3);

    session.complete_task(CareTask::new(TaskKind::Watering, "Aloe"), now);
    assert_eq!(session.outstanding_tasks(now).len(), 2);
}
