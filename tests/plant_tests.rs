use chrono::{DateTime, Duration, Local, TimeZone};
use verdant::models::{sort_by_care_date, Plant};
use verdant::schedule::{start_of_day, Schedule};

fn base_plant(id: u64, name: &str, now: DateTime<Local>) -> Plant {
    Plant {
        id,
        name: name.into(),
        watering_schedule: Schedule::Weekly,
        last_watered: now - Duration::days(4),
        next_watering: now + Duration::days(3),
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

#[test]
fn test_needs_watering_boundary() {
    let now = Local.with_ymd_and_hms(2026, 3, 10, 10, 30, 0).unwrap();

    // Due exactly at the start of today: needed.
    let mut p = base_plant(1, "Fern", now);
    p.next_watering = start_of_day(now);
    assert!(p.needs_watering(now));

    // Due later today: still needed (calendar-day comparison).
    p.next_watering = now + Duration::hours(8);
    assert!(p.needs_watering(now));

    // Due at the start of tomorrow: not needed.
    p.next_watering = start_of_day(now) + Duration::days(1);
    assert!(!p.needs_watering(now));

    // Overdue: needed.
    p.next_watering = now - Duration::days(2);
    assert!(p.needs_watering(now));
}

#[test]
fn test_disabled_track_never_needs_care() {
    let now = Local.with_ymd_and_hms(2026, 3, 10, 10, 30, 0).unwrap();
    let mut p = base_plant(1, "Fern", now);

    // Stored dates are ignored while the schedule is off.
    p.rotation_schedule = Schedule::None;
    p.next_rotation = Some(now - Duration::days(30));
    assert!(!p.needs_rotation(now));

    p.fertilizing_schedule = Schedule::None;
    p.next_fertilizing = Some(now - Duration::days(30));
    assert!(!p.needs_fertilizing(now));

    // An enabled track with no date yet is not due either.
    p.rotation_schedule = Schedule::Monthly;
    p.next_rotation = None;
    assert!(!p.needs_rotation(now));
}

#[test]
fn test_enabled_track_due_today() {
    let now = Local.with_ymd_and_hms(2026, 3, 10, 10, 30, 0).unwrap();
    let mut p = base_plant(1, "Fern", now);
    p.rotation_schedule = Schedule::Monthly;
    p.next_rotation = Some(start_of_day(now));
    assert!(p.needs_rotation(now));
    assert!(p.needs_any_care(now));
}

#[test]
fn test_next_care_date_ignores_fertilizing() {
    let now = Local.with_ymd_and_hms(2026, 3, 10, 10, 30, 0).unwrap();
    let mut p = base_plant(1, "Fern", now);
    p.next_watering = now + Duration::days(5);
    p.rotation_schedule = Schedule::Monthly;
    p.next_rotation = Some(now + Duration::days(3));
    p.fertilizing_schedule = Schedule::Daily;
    p.next_fertilizing = Some(now + Duration::days(1));

    // Fertilizing is soonest but does not participate in the aggregate.
    assert_eq!(p.next_care_date(), now + Duration::days(3));

    p.next_rotation = None;
    assert_eq!(p.next_care_date(), now + Duration::days(5));
}

#[test]
fn test_sort_by_care_date_then_name() {
    let now = Local.with_ymd_and_hms(2026, 3, 10, 10, 30, 0).unwrap();
    let mut a = base_plant(1, "Monstera", now);
    a.next_watering = now + Duration::days(2);
    let mut b = base_plant(2, "Fern", now);
    b.next_watering = now + Duration::days(1);
    let mut c = base_plant(3, "Aloe", now);
    c.next_watering = now + Duration::days(2);

    let mut plants = vec![a, b, c];
    sort_by_care_date(&mut plants);
    let names: Vec<&str> = plants.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Fern", "Aloe", "Monstera"]);
}
