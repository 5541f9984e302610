//! Turns collected image paths into renderable card artifacts.
//!
//! Every physical card gets its own temporary PNG, even when several cards
//! share a source image, so each artifact can be deleted independently
//! once drawn.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::DynamicImage;
use uuid::Uuid;

use crate::error::Result;

/// Canonical card resolution in pixels (300 DPI at 2.5 x 3.5 inches)
pub const CARD_PIXEL_WIDTH: u32 = 750;
pub const CARD_PIXEL_HEIGHT: u32 = 1050;

/// One physical card to print: its source image and the normalized
/// temporary artifact rendered from it
#[derive(Debug)]
pub struct CardEntry {
    pub source: PathBuf,
    pub rendered: PathBuf,
}

/// The full ordered sequence of cards for one invocation.
///
/// Owns the temporary artifacts: dropping the deck removes any artifact
/// still on disk, so early returns and render failures cannot leak files.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<CardEntry>,
}

impl Deck {
    pub fn cards(&self) -> &[CardEntry] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Drop for Deck {
    fn drop(&mut self) {
        for card in &self.cards {
            if card.rendered.exists() {
                if let Err(e) = fs::remove_file(&card.rendered) {
                    log::warn!(
                        "Failed to remove temporary card {}: {}",
                        card.rendered.display(),
                        e
                    );
                }
            }
        }
    }
}

/// Normalize every collected image into a portrait card artifact.
///
/// A decode or write failure aborts the whole run; artifacts created
/// before the failure are cleaned up when the partial deck drops.
pub fn normalize_deck(paths: &[PathBuf], scale: bool) -> Result<Deck> {
    let mut deck = Deck {
        cards: Vec::with_capacity(paths.len()),
    };

    for path in paths {
        let rendered = normalize_image(path, scale)?;
        deck.cards.push(CardEntry {
            source: path.clone(),
            rendered,
        });
    }

    Ok(deck)
}

fn normalize_image(path: &Path, scale: bool) -> Result<PathBuf> {
    let decoded = image::open(path)?;
    let mut card = DynamicImage::ImageRgb8(decoded.to_rgb8());

    if card.width() > card.height() {
        card = card.rotate90();
    }
    if scale {
        card = card.resize_exact(CARD_PIXEL_WIDTH, CARD_PIXEL_HEIGHT, FilterType::Lanczos3);
    }

    let rendered = temp_path(path);
    card.save(&rendered)?;
    Ok(rendered)
}

/// Unique artifact path next to the source, so duplicate quantities of the
/// same image never collide
fn temp_path(source: &Path) -> PathBuf {
    let suffix = Uuid::new_v4().simple().to_string();
    PathBuf::from(format!("{}_{}_temp.png", source.display(), &suffix[..6]))
}
