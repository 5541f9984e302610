use proxy_sheets::{
    collect_images, normalize_deck, part_path, render_deck, split_plan, write_deck, GridSpec,
    SheetError,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

// Test fixtures

fn create_card_image(path: &Path, width: u32, height: u32) {
    let mut img = image::RgbImage::new(width, height);
    for pixel in img.pixels_mut() {
        *pixel = image::Rgb([180, 40, 40]);
    }
    img.save(path).unwrap();
}

fn create_card_folder(dir: &Path, count: usize) -> Vec<PathBuf> {
    for index in 1..=count {
        create_card_image(&dir.join(format!("card{:02}.png", index)), 30, 42);
    }
    collect_images(dir, true).unwrap()
}

fn temp_artifacts(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with("_temp.png"))
        .map(|entry| entry.into_path())
        .collect()
}

// Tests for split_plan

#[test]
fn test_split_plan_uses_average_card_size() {
    // 120 cards at 100kB average, 5MB cap: 50 cards per part, 3 parts
    let (cards_per_part, total_parts) = split_plan(12_000_000, 120, 5_000_000).unwrap();
    assert_eq!(cards_per_part, 50);
    assert_eq!(total_parts, 3);
}

#[test]
fn test_split_plan_last_part_may_be_short() {
    let (cards_per_part, total_parts) = split_plan(9_000, 9, 4_000).unwrap();
    assert_eq!(cards_per_part, 4);
    assert_eq!(total_parts, 3);
}

#[test]
fn test_split_plan_exact_fit_is_one_part() {
    let (cards_per_part, total_parts) = split_plan(9_000, 3, 9_000).unwrap();
    assert_eq!(cards_per_part, 3);
    assert_eq!(total_parts, 1);
}

#[test]
fn test_split_plan_rejects_cap_below_one_card() {
    let result = split_plan(9_000, 3, 1_000);
    assert!(matches!(result, Err(SheetError::CapTooSmall { .. })));
}

// End-to-end: render and write

#[test]
fn test_render_deck_produces_a_pdf() {
    let dir = tempdir().unwrap();
    let images = create_card_folder(dir.path(), 3);
    let deck = normalize_deck(&images, false).unwrap();

    let bytes = render_deck(deck.cards(), &GridSpec::default(), "deck").unwrap();

    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_write_deck_single_file() {
    let dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let images = create_card_folder(dir.path(), 13);
    assert_eq!(images.len(), 13);

    let grid = GridSpec::default();
    assert_eq!(grid.pages_for(images.len()), 2);

    let deck = normalize_deck(&images, false).unwrap();
    let output = out_dir.path().join("deck.pdf");
    write_deck(&deck, &output, &grid, None).unwrap();

    assert!(output.exists());
    assert!(fs::read(&output).unwrap().starts_with(b"%PDF"));
    assert!(!part_path(&output, 1).exists());
    // All temporary artifacts are gone once the file is written
    assert!(temp_artifacts(dir.path()).is_empty());
}

#[test]
fn test_write_deck_under_cap_stays_single() {
    let dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let images = create_card_folder(dir.path(), 4);

    let deck = normalize_deck(&images, false).unwrap();
    let output = out_dir.path().join("deck.pdf");
    write_deck(&deck, &output, &GridSpec::default(), Some(512 * 1024 * 1024)).unwrap();

    assert!(output.exists());
    assert!(!part_path(&output, 1).exists());
    assert!(temp_artifacts(dir.path()).is_empty());
}

#[test]
fn test_write_deck_splits_over_cap() {
    let dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let images = create_card_folder(dir.path(), 9);

    let grid = GridSpec::default();
    let deck = normalize_deck(&images, false).unwrap();

    // Measure an unconstrained render, then force a split with a cap at
    // two thirds of it
    let measured = render_deck(deck.cards(), &grid, "deck").unwrap().len() as u64;
    let cap = measured * 2 / 3;
    let (cards_per_part, total_parts) = split_plan(measured, deck.len(), cap).unwrap();
    assert!(total_parts > 1);

    let output = out_dir.path().join("deck.pdf");
    write_deck(&deck, &output, &grid, Some(cap)).unwrap();

    // Only numbered part files are written
    assert!(!output.exists());
    for part in 1..=total_parts {
        assert!(part_path(&output, part).exists(), "missing part {part}");
    }
    assert!(!part_path(&output, total_parts + 1).exists());
    assert!(temp_artifacts(dir.path()).is_empty());

    // Parts are contiguous and exhaustive over the deck
    assert!(cards_per_part * (total_parts - 1) < deck.len());
    assert!(cards_per_part * total_parts >= deck.len());

    // The final short part renders fewer cards, so it is the smaller file
    let first = fs::metadata(part_path(&output, 1)).unwrap().len();
    let last = fs::metadata(part_path(&output, total_parts)).unwrap().len();
    assert!(first > last);
}

#[test]
fn test_split_chunks_preserve_deck_order() {
    let dir = tempdir().unwrap();
    let images = create_card_folder(dir.path(), 7);
    let deck = normalize_deck(&images, false).unwrap();

    // Concatenating the contiguous chunks reproduces the deck exactly
    let rejoined: Vec<_> = deck
        .cards()
        .chunks(3)
        .flatten()
        .map(|card| card.source.clone())
        .collect();
    assert_eq!(rejoined, images);
}
