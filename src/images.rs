//! Local photo store: one image file per plant, kept next to the database.
//!
//! Lookups are best-effort. A missing or unreadable image is reported as
//! "no image", never as an error.

use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::data_dir;

pub(crate) fn images_dir() -> PathBuf {
    let mut p = data_dir();
    p.push("images");
    p
}

/// Copies `source` into the image store for `plant_id` and returns the stored
/// file name to record on the plant.
pub fn store_image(plant_id: u64, source: &Path) -> std::io::Result<String> {
    let dir = images_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("img");
    let file_name = format!("plant-{}.{}", plant_id, ext);
    fs::copy(source, dir.join(&file_name))?;
    Ok(file_name)
}

/// Resolves a stored file name to a path, if the image still exists.
pub fn image_path(file_name: &str) -> Option<PathBuf> {
    let path = images_dir().join(file_name);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Removes a stored image. Missing files are ignored.
pub fn remove_image(file_name: &str) {
    let _ = fs::remove_file(images_dir().join(file_name));
}
