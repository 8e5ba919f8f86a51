use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{Duration, Local};
use verdant::commands::*;
use verdant::images::image_path;
use verdant::models::{CareTask, TaskKind};
use verdant::schedule::{start_of_day, Schedule};
use verdant::session::CareSession;
use verdant::storage::{load_plant, load_plants, save_plant, save_plants};

// Use a mutex to ensure tests run serially since they modify the environment variable
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_test_db<F>(test_name: &str, f: F)
where
    F: FnOnce(PathBuf),
{
    let _guard = TEST_MUTEX.lock().unwrap();

    let mut db_path = env::temp_dir();
    db_path.push(format!("verdant_test_{}.json", test_name));

    // Set env var
    env::set_var("PLANTS_DB", db_path.to_str().unwrap());

    // Clean up before test
    if db_path.exists() {
        fs::remove_file(&db_path).unwrap();
    }
    let mut images_dir = db_path.clone();
    images_dir.pop();
    images_dir.push("images");
    if images_dir.exists() {
        fs::remove_dir_all(&images_dir).unwrap();
    }

    // Run test
    f(db_path.clone());

    // Clean up after test
    if db_path.exists() {
        fs::remove_file(&db_path).unwrap();
    }
    if images_dir.exists() {
        fs::remove_dir_all(&images_dir).unwrap();
    }
    env::remove_var("PLANTS_DB");
}

#[test]
fn test_add_and_load() {
    with_test_db("add_load", |_path| {
        cmd_add(
            "Fiddle Leaf Fig".into(),
            None,
            Some("monthly".into()),
            None,
            Some("Near the window".into()),
            None,
            true,
        );

        let plants = load_plants();
        assert_eq!(plants.len(), 1);
        let p = &plants[0];
        assert_eq!(p.name, "Fiddle Leaf Fig");
        // Watering defaults to weekly and is seeded from creation time.
        assert_eq!(p.watering_schedule, Schedule::Weekly);
        assert!(p.next_watering > p.last_watered);
        // Rotation enabled, fertilizing left off.
        assert_eq!(p.rotation_schedule, Schedule::Monthly);
        assert!(p.next_rotation.is_some());
        assert_eq!(p.fertilizing_schedule, Schedule::None);
        assert!(p.next_fertilizing.is_none());
        assert_eq!(p.notes, Some("Near the window".into()));
    });
}

#[test]
fn test_add_rejects_disabled_watering() {
    with_test_db("no_watering", |_path| {
        cmd_add("Cactus".into(), Some("none".into()), None, None, None, None, true);
        assert!(load_plants().is_empty());
    });
}

#[test]
fn test_water_command_advances_due_date() {
    with_test_db("water", |_path| {
        cmd_add("Fern".into(), None, None, None, None, None, true);
        let id = load_plants()[0].id;

        // Backdate so the plant is clearly due.
        let mut plants = load_plants();
        plants[0].next_watering = Local::now() - Duration::days(1);
        save_plants(&plants).unwrap();

        cmd_care(id, TaskKind::Watering, true);

        let plants = load_plants();
        let p = &plants[0];
        let now = Local::now();
        assert_eq!(p.next_watering, start_of_day(now) + Duration::days(7));
        assert!(!p.needs_watering(now));
    });
}

#[test]
fn test_care_ignores_disabled_track() {
    with_test_db("care_disabled", |_path| {
        cmd_add("Fern".into(), None, None, None, None, None, true);
        let id = load_plants()[0].id;

        cmd_care(id, TaskKind::Rotation, true);

        let plants = load_plants();
        let p = &plants[0];
        assert!(p.last_rotated.is_none());
        assert!(p.next_rotation.is_none());
    });
}

#[test]
fn test_edit_recomputes_only_changed_schedules() {
    with_test_db("edit", |_path| {
        cmd_add("Fern".into(), None, Some("monthly".into()), None, None, None, true);
        let id = load_plants()[0].id;
        let before = load_plants()[0].clone();

        // Same watering schedule: next date untouched.
        cmd_edit(id, None, Some("weekly".into()), None, None, None, None, true);
        let p = load_plants()[0].clone();
        assert_eq!(p.next_watering, before.next_watering);

        // Changed rotation schedule: next date recomputed.
        cmd_edit(id, None, None, Some("weekly".into()), None, None, None, true);
        let p = load_plants()[0].clone();
        assert_eq!(p.rotation_schedule, Schedule::Weekly);
        assert_eq!(
            p.next_rotation,
            Some(start_of_day(Local::now()) + Duration::days(7))
        );

        // Disabling rotation clears its dates.
        cmd_edit(id, None, None, Some("none".into()), None, None, None, true);
        let p = load_plants()[0].clone();
        assert_eq!(p.rotation_schedule, Schedule::None);
        assert!(p.next_rotation.is_none());
        assert!(p.last_rotated.is_none());
    });
}

#[test]
fn test_edit_name_and_notes() {
    with_test_db("edit_name", |_path| {
        cmd_add("Fern".into(), None, None, None, Some("old".into()), None, true);
        let id = load_plants()[0].id;

        cmd_edit(id, Some("Boston Fern".into()), None, None, None, Some(String::new()), None, true);

        let plants = load_plants();
        let p = &plants[0];
        assert_eq!(p.name, "Boston Fern");
        // Empty notes input clears the field.
        assert!(p.notes.is_none());
    });
}

#[test]
fn test_remove_plant() {
    with_test_db("remove", |_path| {
        cmd_add("Fern".into(), None, None, None, None, None, true);
        cmd_add("Aloe".into(), None, None, None, None, None, true);
        let id = load_plants()[0].id;

        cmd_remove(id, true);

        let plants = load_plants();
        assert_eq!(plants.len(), 1);
        assert_eq!(plants[0].name, "Aloe");
    });
}

#[test]
fn test_remove_releases_stored_image() {
    with_test_db("remove_image", |path| {
        let mut source = path.clone();
        source.pop();
        source.push("verdant_test_leaf.jpg");
        fs::write(&source, b"not really a jpeg").unwrap();

        cmd_add(
            "Fern".into(),
            None,
            None,
            None,
            None,
            Some(source.to_str().unwrap().into()),
            true,
        );
        let p = load_plants()[0].clone();
        let file_name = p.image_file.clone().unwrap();
        assert!(image_path(&file_name).is_some());

        cmd_remove(p.id, true);
        assert!(image_path(&file_name).is_none());

        fs::remove_file(&source).unwrap();
    });
}

#[test]
fn test_session_persists_completions_incrementally() {
    with_test_db("session", |_path| {
        cmd_add("Fern".into(), None, None, None, None, None, true);

        let mut plants = load_plants();
        plants[0].next_watering = Local::now() - Duration::days(1);
        save_plants(&plants).unwrap();

        // The same flow the TUI runs: snapshot, complete, apply the event
        // back onto the stored record.
        let now = Local::now();
        let mut session = CareSession::new(load_plants(), now);
        assert_eq!(session.plant_count(), 1);

        let completion = session
            .complete_task(CareTask::new(TaskKind::Watering, "Fern"), now)
            .unwrap();
        let mut p = load_plant(completion.plant_id).unwrap();
        completion.apply(&mut p);
        save_plant(&p).unwrap();

        let plants = load_plants();
        let stored = &plants[0];
        assert_eq!(stored.last_watered, now);
        assert_eq!(stored.next_watering, start_of_day(now) + Duration::days(7));
        assert!(session.is_complete(now));
    });
}
