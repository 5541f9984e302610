//! Deterministic discovery of card images under a folder tree.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;
use crate::quantity::{self, QuantityMap};

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

fn is_image_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Collect every card image under `root`, expanded by its resolved
/// quantity, in deterministic order.
///
/// Directories are visited in case-insensitive name order; within each
/// directory the level's own files are sorted case-insensitively before
/// sidecar detection and image filtering, so the result does not depend on
/// filesystem enumeration order. An empty result means no images were
/// found; that is for the caller to report, not an error.
pub fn collect_images(root: &Path, include_subfolders: bool) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();

    let max_depth = if include_subfolders { usize::MAX } else { 0 };
    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(false)
        .sort_by(|a, b| {
            a.file_name()
                .to_ascii_lowercase()
                .cmp(&b.file_name().to_ascii_lowercase())
        });

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            collect_directory(entry.path(), &mut entries)?;
        }
    }

    Ok(entries)
}

/// Collect one directory level: sort its own files, scope a sidecar
/// quantity map to it, and expand each image by its resolved quantity.
fn collect_directory(dir: &Path, entries: &mut Vec<PathBuf>) -> Result<()> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
    }
    names.sort_by_key(|name| name.to_lowercase());

    let map = match names.iter().find(|name| quantity::is_quantity_file(name)) {
        Some(name) => quantity::parse_quantity_file(&dir.join(name)),
        None => QuantityMap::new(),
    };

    for name in &names {
        if !is_image_file(name) {
            continue;
        }
        let count = quantity::resolve_quantity(&map, name);
        let path = dir.join(name);
        for _ in 0..count {
            entries.push(path.clone());
        }
    }

    Ok(())
}
