use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;

use crate::models::Plant;

/// Directory holding the plant database and stored photos.
///
/// Resolution order:
/// 1. The directory of the file named by the `PLANTS_DB` environment variable.
/// 2. `~/.local/share/verdant` (platform equivalent via `dirs`).
/// 3. `.` (fallback).
pub(crate) fn data_dir() -> PathBuf {
    let mut p = db_path();
    p.pop();
    p
}

/// Returns the path to the plants database file (`plants.json`).
fn db_path() -> PathBuf {
    std::env::var("PLANTS_DB").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("verdant");
        if !p.exists() {
            let _ = fs::create_dir_all(&p);
        }
        p.push("plants.json");
        p
    })
}

/// Loads a single plant by its ID.
///
/// Returns `None` if the plant is not found.
pub fn load_plant(id: u64) -> Option<Plant> {
    let plants = load_plants();
    if let Some(p) = plants.iter().find(|p| p.id == id) {
        return Some(p.clone());
    }
    None
}

/// Loads all plants from the storage file.
///
/// Returns an empty vector if the file does not exist or cannot be read.
pub fn load_plants() -> Vec<Plant> {
    let path = db_path();
    if !path.exists() {
        return Vec::new();
    }
    let mut f = match OpenOptions::new().read(true).open(&path) {
        Ok(f) => f,
        Err(_) => return Vec::new(),
    };
    let mut s = String::new();
    if f.read_to_string(&mut s).is_err() {
        return Vec::new();
    }
    serde_json::from_str(&s).unwrap_or_else(|_| Vec::new())
}

/// Saves or updates a single plant in the storage file.
///
/// If a plant with the same ID exists, it is updated; otherwise, it is added.
pub fn save_plant(plant: &Plant) -> std::io::Result<()> {
    let mut plants = load_plants();
    if let Some(p) = plants.iter_mut().find(|p| p.id == plant.id) {
        *p = plant.clone();
    } else {
        plants.push(plant.clone());
    }
    save_plants(&plants)
}

/// Saves the given list of plants to the storage file.
///
/// Overwrites the existing file.
pub fn save_plants(plants: &Vec<Plant>) -> std::io::Result<()> {
    let path = db_path();
    let s = serde_json::to_string_pretty(plants).unwrap();
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Deletes the plant database file and any stored photos.
pub fn delete_database() -> std::io::Result<()> {
    let path = db_path();
    if path.exists() {
        fs::remove_file(path)?;
    }
    let images = crate::images::images_dir();
    if images.exists() {
        fs::remove_dir_all(images)?;
    }
    Ok(())
}
