use std::path::{Component, Path};

/// Derive the default output file name from the scanned folder path.
///
/// The path is made relative to the working directory when possible, then
/// its normal components are joined with hyphens and spaces stripped:
/// `my decks/elves` becomes `mydecks-elves.pdf`.
pub fn default_output_name(folder: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| folder.strip_prefix(&cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| folder.to_path_buf());

    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str().map(|s| s.replace(' ', "")),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        "cards.pdf".to_string()
    } else {
        format!("{}.pdf", parts.join("-"))
    }
}
