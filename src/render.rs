//! Renders a deck into one or more PDFs, bounded by an optional size cap.
//!
//! The deck is always rendered once in full to measure its byte size. An
//! unconstrained or under-cap render is written as-is; an over-cap render
//! is re-rendered as sequential part files, with the per-file card budget
//! derived from the measured average size per card.

use std::fs;
use std::path::{Path, PathBuf};

use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument,
    PdfLayerReference, Px,
};

use crate::error::{Result, SheetError};
use crate::layout::GridSpec;
use crate::normalize::{CardEntry, Deck};

/// Resolution the artifacts are embedded at; per-axis scale factors then
/// stretch each image to fill its cell exactly
const EMBED_DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;

/// Render a contiguous card slice into a PDF, returning its bytes.
///
/// Pages are appended as the placement crosses each page boundary; the
/// final page may be partially filled. Temporary artifacts are left in
/// place for the caller to reuse or delete.
pub fn render_deck(cards: &[CardEntry], grid: &GridSpec, title: &str) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(grid.page_width),
        Mm(grid.page_height),
        "Layer 1",
    );
    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut current_page = 0;

    for (index, card) in cards.iter().enumerate() {
        let cell = grid.cell(index);
        if cell.page > current_page {
            let (page, layer_index) =
                doc.add_page(Mm(grid.page_width), Mm(grid.page_height), "Layer 1");
            layer = doc.get_page(page).get_layer(layer_index);
            current_page = cell.page;
        }
        let (x, y) = grid.origin(&cell);
        place_card(&layer, card, grid, x, y)?;
    }

    doc.save_to_bytes().map_err(|e| SheetError::Pdf(e.to_string()))
}

/// Draw one card artifact stretched to fill its cell, aspect ratio not
/// preserved
fn place_card(
    layer: &PdfLayerReference,
    card: &CardEntry,
    grid: &GridSpec,
    x: f32,
    y: f32,
) -> Result<()> {
    let rgb = image::open(&card.rendered)?.to_rgb8();
    let (width, height) = rgb.dimensions();

    let xobject = ImageXObject {
        width: Px(width as usize),
        height: Px(height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    };

    let native_width_mm = width as f32 * MM_PER_INCH / EMBED_DPI;
    let native_height_mm = height as f32 * MM_PER_INCH / EMBED_DPI;

    Image::from(xobject).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y)),
            scale_x: Some(grid.card_width / native_width_mm),
            scale_y: Some(grid.card_height / native_height_mm),
            dpi: Some(EMBED_DPI),
            ..Default::default()
        },
    );

    Ok(())
}

/// Per-file card budget and part count for an over-cap deck.
///
/// Derived from the measured full render: cards per part is the cap
/// divided by the observed average bytes per card. Errs when the cap
/// cannot fit even one card.
pub fn split_plan(total_bytes: u64, card_count: usize, cap_bytes: u64) -> Result<(usize, usize)> {
    let card = (total_bytes / card_count as u64).max(1);
    let cards_per_part = (cap_bytes / card) as usize;
    if cards_per_part == 0 {
        return Err(SheetError::CapTooSmall {
            cap: cap_bytes,
            card,
        });
    }
    Ok((cards_per_part, card_count.div_ceil(cards_per_part)))
}

/// Output path for the 1-based part `part`: `deck.pdf` becomes
/// `deck-part1.pdf`
pub fn part_path(output: &Path, part: usize) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("output");
    output.with_file_name(format!("{}-part{}.pdf", stem, part))
}

/// Write the deck to `output`, splitting into part files when a size cap
/// is configured and the measured render exceeds it.
///
/// Artifacts are deleted after the single-file write, or after each part
/// is written when splitting; the measuring render reuses them untouched.
pub fn write_deck(
    deck: &Deck,
    output: &Path,
    grid: &GridSpec,
    max_bytes: Option<u64>,
) -> Result<()> {
    let title = output
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("cards")
        .to_string();

    let bytes = render_deck(deck.cards(), grid, &title)?;

    let cap = match max_bytes {
        Some(cap) if (bytes.len() as u64) > cap => cap,
        _ => {
            fs::write(output, &bytes)?;
            delete_artifacts(deck.cards());
            log::info!(
                "Saved {} ({} cards, {} pages, {} bytes)",
                output.display(),
                deck.len(),
                grid.pages_for(deck.len()),
                bytes.len()
            );
            return Ok(());
        }
    };

    let (cards_per_part, total_parts) = split_plan(bytes.len() as u64, deck.len(), cap)?;
    log::info!(
        "Full render is {} bytes, over the {} byte cap; splitting into {} parts of up to {} cards",
        bytes.len(),
        cap,
        total_parts,
        cards_per_part
    );

    for (index, chunk) in deck.cards().chunks(cards_per_part).enumerate() {
        let path = part_path(output, index + 1);
        let part_bytes = render_deck(chunk, grid, &title)?;
        fs::write(&path, &part_bytes)?;
        delete_artifacts(chunk);
        log::info!(
            "Saved {} ({} cards, {} bytes)",
            path.display(),
            chunk.len(),
            part_bytes.len()
        );
    }

    Ok(())
}

fn delete_artifacts(cards: &[CardEntry]) {
    for card in cards {
        if let Err(e) = fs::remove_file(&card.rendered) {
            log::warn!(
                "Failed to remove temporary card {}: {}",
                card.rendered.display(),
                e
            );
        }
    }
}
