use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::images::{image_path, remove_image, store_image};
use crate::models::{sort_by_care_date, Plant, TaskCompletion, TaskKind};
use crate::schedule::{days_until, Schedule};
use crate::storage::{delete_database, load_plant, load_plants, save_plant, save_plants};

fn parse_schedule(s: &str, silent: bool) -> Option<Schedule> {
    match s.parse::<Schedule>() {
        Ok(schedule) => Some(schedule),
        Err(e) => {
            if !silent {
                eprintln!("Invalid schedule '{}': {}.", s, e);
            }
            None
        }
    }
}

/// Adds a new plant to the database.
///
/// Watering defaults to weekly and cannot be disabled; rotation and
/// fertilizing default to off. The creation instant seeds each enabled
/// track: last done now, next due per its schedule.
pub fn cmd_add(
    name: String,
    water: Option<String>,
    rotate: Option<String>,
    fertilize: Option<String>,
    notes: Option<String>,
    image: Option<String>,
    silent: bool,
) {
    let watering_schedule = match water {
        Some(s) => match parse_schedule(&s, silent) {
            Some(schedule) => schedule,
            None => return,
        },
        None => Schedule::Weekly,
    };
    if !watering_schedule.is_enabled() {
        if !silent {
            eprintln!("Watering cannot be 'none'; every plant needs water.");
        }
        return;
    }
    let rotation_schedule = match rotate {
        Some(s) => match parse_schedule(&s, silent) {
            Some(schedule) => schedule,
            None => return,
        },
        None => Schedule::None,
    };
    let fertilizing_schedule = match fertilize {
        Some(s) => match parse_schedule(&s, silent) {
            Some(schedule) => schedule,
            None => return,
        },
        None => Schedule::None,
    };

    let now = Local::now();
    let mut plants = load_plants();
    let next_id = plants.iter().map(|p| p.id).max().unwrap_or(0) + 1;

    let image_file = image.and_then(|path| match store_image(next_id, Path::new(&path)) {
        Ok(file_name) => Some(file_name),
        Err(e) => {
            if !silent {
                eprintln!("Failed to store image '{}': {}", path, e);
            }
            None
        }
    });

    let p = Plant {
        id: next_id,
        name,
        watering_schedule,
        last_watered: now,
        next_watering: watering_schedule.next_date(now).unwrap_or(now),
        rotation_schedule,
        last_rotated: if rotation_schedule.is_enabled() { Some(now) } else { None },
        next_rotation: rotation_schedule.next_date(now),
        fertilizing_schedule,
        last_fertilized: if fertilizing_schedule.is_enabled() { Some(now) } else { None },
        next_fertilizing: fertilizing_schedule.next_date(now),
        notes,
        image_file,
    };
    plants.push(p);
    if let Err(e) = save_plants(&plants) {
        if !silent { eprintln!("Failed to save plants: {}", e); }
    } else {
        if !silent { println!("Plant added (id = {})", next_id); }
    }
}

/// Completes one care task for a plant outside a session.
pub fn cmd_care(id: u64, kind: TaskKind, silent: bool) {
    let now = Local::now();
    let Some(mut plant) = load_plant(id) else {
        if !silent { eprintln!("Plant {} not found.", id); }
        return;
    };
    let schedule = plant.schedule_for(kind);
    if !schedule.is_enabled() {
        if !silent {
            eprintln!("'{}' has no {} schedule.", plant.name, kind.label().to_lowercase());
        }
        return;
    }
    let completion = TaskCompletion {
        plant_id: id,
        kind,
        completed_at: now,
        next_due: schedule.next_date(now),
    };
    completion.apply(&mut plant);

    if let Err(e) = save_plant(&plant) {
        if !silent { eprintln!("Failed to save plants: {}", e); }
        return;
    }
    if !silent {
        match completion.next_due {
            Some(next) => println!(
                "{} '{}'. Next due {}.",
                kind.done_label(),
                plant.name,
                next.format("%Y-%m-%d")
            ),
            None => println!("{} '{}'.", kind.done_label(), plant.name),
        }
    }
}

/// Removes a plant from the database by ID, releasing its stored photo.
pub fn cmd_remove(id: u64, silent: bool) {
    let mut plants = load_plants();
    let Some(pos) = plants.iter().position(|p| p.id == id) else {
        if !silent { eprintln!("Plant {} not found.", id); }
        return;
    };
    let removed = plants.remove(pos);
    if let Some(file_name) = &removed.image_file {
        remove_image(file_name);
    }
    if let Err(e) = save_plants(&plants) {
        if !silent { eprintln!("Failed to save plants: {}", e); }
    } else {
        if !silent { println!("Plant '{}' removed.", removed.name); }
    }
}

/// Edits an existing plant's details.
///
/// A track's next due date is recomputed only when its schedule actually
/// changes; disabling rotation or fertilizing clears that track's dates.
pub fn cmd_edit(
    id: u64,
    name: Option<String>,
    water: Option<String>,
    rotate: Option<String>,
    fertilize: Option<String>,
    notes: Option<String>,
    image: Option<String>,
    silent: bool,
) {
    let now = Local::now();
    let mut plants = load_plants();
    let Some(p) = plants.iter_mut().find(|p| p.id == id) else {
        if !silent { eprintln!("Plant {} not found.", id); }
        return;
    };

    if let Some(n) = name {
        p.name = n;
    }
    if let Some(n) = notes {
        p.notes = if n.is_empty() { None } else { Some(n) };
    }
    if let Some(s) = water {
        let Some(schedule) = parse_schedule(&s, silent) else { return };
        if !schedule.is_enabled() {
            if !silent {
                eprintln!("Watering cannot be 'none'; every plant needs water.");
            }
            return;
        }
        if p.watering_schedule != schedule {
            p.watering_schedule = schedule;
            if let Some(next) = schedule.next_date(now) {
                p.next_watering = next;
            }
        }
    }
    if let Some(s) = rotate {
        let Some(schedule) = parse_schedule(&s, silent) else { return };
        if p.rotation_schedule != schedule {
            p.rotation_schedule = schedule;
            if schedule.is_enabled() {
                p.next_rotation = schedule.next_date(now);
            } else {
                p.last_rotated = None;
                p.next_rotation = None;
            }
        }
    }
    if let Some(s) = fertilize {
        let Some(schedule) = parse_schedule(&s, silent) else { return };
        if p.fertilizing_schedule != schedule {
            p.fertilizing_schedule = schedule;
            if schedule.is_enabled() {
                p.next_fertilizing = schedule.next_date(now);
            } else {
                p.last_fertilized = None;
                p.next_fertilizing = None;
            }
        }
    }
    if let Some(path) = image {
        match store_image(p.id, Path::new(&path)) {
            Ok(file_name) => p.image_file = Some(file_name),
            Err(e) => {
                if !silent { eprintln!("Failed to store image '{}': {}", path, e); }
            }
        }
    }

    if let Err(e) = save_plants(&plants) {
        if !silent { eprintln!("Failed to save plants: {}", e); }
    } else {
        if !silent { println!("Plant {} updated.", id); }
    }
}

fn due_cell(next: Option<DateTime<Local>>, schedule: Schedule, now: DateTime<Local>) -> Cell {
    if !schedule.is_enabled() {
        return Cell::new("-").fg(Color::Grey);
    }
    let Some(next) = next else {
        return Cell::new("-").fg(Color::Grey);
    };
    let days = days_until(next, now);
    if days < 0 {
        Cell::new(format!("{}d overdue", days.abs())).fg(Color::Red)
    } else if days == 0 {
        Cell::new("Today").fg(Color::Yellow)
    } else {
        Cell::new(format!("{}d", days)).fg(Color::Green)
    }
}

/// Lists plants in a formatted table, sorted by soonest care date.
///
/// With `due_only`, hides plants with nothing due today.
pub fn cmd_list(due_only: bool) {
    let now = Local::now();
    let mut plants = load_plants();
    if due_only {
        plants.retain(|p| p.needs_any_care(now));
    }
    if plants.is_empty() {
        println!("No plants found.");
        return;
    }
    sort_by_care_date(&mut plants);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Water").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Rotate").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Fertilize").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
        ]);

    let mut tasks_due = 0;
    for p in &plants {
        for kind in TaskKind::ALL {
            if p.needs(kind, now) {
                tasks_due += 1;
            }
        }
        table.add_row(vec![
            Cell::new(p.id),
            Cell::new(&p.name),
            Cell::new(p.watering_schedule),
            due_cell(Some(p.next_watering), p.watering_schedule, now),
            Cell::new(p.rotation_schedule),
            due_cell(p.next_rotation, p.rotation_schedule, now),
            Cell::new(p.fertilizing_schedule),
            due_cell(p.next_fertilizing, p.fertilizing_schedule, now),
        ]);
    }

    println!("{table}");
    println!(
        "{} task{} toward happy plants",
        tasks_due,
        if tasks_due == 1 { "" } else { "s" }
    );
}

/// Prints full details for one plant.
pub fn cmd_show(id: u64) {
    let now = Local::now();
    let Some(p) = load_plant(id) else {
        eprintln!("Plant {} not found.", id);
        return;
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        Cell::new("Track").add_attribute(Attribute::Bold),
        Cell::new("Schedule").add_attribute(Attribute::Bold),
        Cell::new("Last").add_attribute(Attribute::Bold),
        Cell::new("Next").add_attribute(Attribute::Bold),
        Cell::new("Due").add_attribute(Attribute::Bold),
    ]);

    let fmt = |d: Option<DateTime<Local>>| match d {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    };
    table.add_row(vec![
        Cell::new("Water"),
        Cell::new(p.watering_schedule),
        Cell::new(fmt(Some(p.last_watered))),
        Cell::new(fmt(Some(p.next_watering))),
        due_cell(Some(p.next_watering), p.watering_schedule, now),
    ]);
    table.add_row(vec![
        Cell::new("Rotate"),
        Cell::new(p.rotation_schedule),
        Cell::new(fmt(p.last_rotated)),
        Cell::new(fmt(p.next_rotation)),
        due_cell(p.next_rotation, p.rotation_schedule, now),
    ]);
    table.add_row(vec![
        Cell::new("Fertilize"),
        Cell::new(p.fertilizing_schedule),
        Cell::new(fmt(p.last_fertilized)),
        Cell::new(fmt(p.next_fertilizing)),
        due_cell(p.next_fertilizing, p.fertilizing_schedule, now),
    ]);

    println!("{} (id = {})", p.name, p.id);
    println!("{table}");
    if let Some(notes) = &p.notes {
        println!("Notes: {}", notes);
    }
    if let Some(file_name) = &p.image_file {
        match image_path(file_name) {
            Some(path) => println!("Photo: {}", path.display()),
            None => println!("Photo: missing"),
        }
    }
}

/// Resets the database by deleting all plants and stored photos.
pub fn cmd_reset(force: bool) {
    if !force {
        print!("Are you sure you want to delete all plants and photos? This cannot be undone. [y/N] ");
        io::stdout().flush().unwrap();
        let mut input = String::new();
        io::stdin().read_line(&mut input).unwrap();
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = delete_database() {
        eprintln!("Failed to reset database: {}", e);
    } else {
        println!("Database reset successfully.");
    }
}
