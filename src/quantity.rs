//! Per-card copy counts from sidecar files and filename patterns.
//!
//! A directory may carry one sidecar text file (name starting with `cards`
//! or `quantities`, ending `.txt`) with `name,quantity` lines. A filename
//! may also embed `-x<N>` to set its own default count. Resolution order:
//! sidecar entry, then filename pattern, then 1.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

/// Maps an image base name (no extension) to its copy count
pub type QuantityMap = HashMap<String, u32>;

lazy_static! {
    static ref NAME_QUANTITY: Regex = Regex::new(r"-x(\d+)").unwrap();
}

/// Returns true if `name` is a sidecar quantity file
pub fn is_quantity_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    (lower.starts_with("cards") || lower.starts_with("quantities")) && lower.ends_with(".txt")
}

/// Extract an embedded `-x<N>` quantity from a base name, defaulting to 1
pub fn quantity_from_name(name: &str) -> u32 {
    NAME_QUANTITY
        .captures(name)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(1)
}

/// Parse a sidecar quantity file into a map.
///
/// Lines without a comma are skipped. Lines whose quantity is not a
/// positive integer are skipped with a warning. A file that cannot be read
/// yields a warning and an empty map; it never aborts the run.
pub fn parse_quantity_file(path: &Path) -> QuantityMap {
    let mut map = QuantityMap::new();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            log::warn!("Failed to parse quantity file {}: {}", path.display(), e);
            return map;
        }
    };

    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::warn!("Failed to parse quantity file {}: {}", path.display(), e);
                return QuantityMap::new();
            }
        };

        let Some((name, quantity)) = line.split_once(',') else {
            continue;
        };
        match quantity.trim().parse::<u32>() {
            Ok(quantity) if quantity >= 1 => {
                map.insert(name.trim().to_string(), quantity);
            }
            _ => {
                log::warn!(
                    "Skipping invalid quantity line in {}: {:?}",
                    path.display(),
                    line
                );
            }
        }
    }

    map
}

/// Resolve the copy count for an image file name.
///
/// Sidecar entries win over the filename pattern: the map is checked for
/// the full base name first, then for the base name with its `-x<N>`
/// marker removed, before the pattern itself applies.
pub fn resolve_quantity(map: &QuantityMap, file_name: &str) -> u32 {
    let base = Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name);

    if let Some(quantity) = map.get(base) {
        return *quantity;
    }
    let stripped = NAME_QUANTITY.replace(base, "");
    if let Some(quantity) = map.get(stripped.as_ref()) {
        return *quantity;
    }
    quantity_from_name(base)
}
