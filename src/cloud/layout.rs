//! Deterministic word-cloud layout for a fixed 500×400 canvas.
//!
//! Classic frequency cloud: words are sized by how often they appear in the
//! bucket, then placed along an archimedean spiral from the canvas center
//! outwards, skipping positions that collide with already-placed words.
//! The spiral's starting angle and each word's gradient position derive
//! from an FNV hash of the word, so a given word list always produces the
//! same picture — no RNG anywhere.

use std::collections::HashMap;

use crate::cloud::palette::{ColorScheme, Rgb};

/// Canvas width in logical pixels.
pub const CLOUD_WIDTH: f32 = 500.0;
/// Canvas height in logical pixels.
pub const CLOUD_HEIGHT: f32 = 400.0;

/// Most words drawn per cloud; the long tail of singletons adds clutter,
/// not information.
const MAX_WORDS: usize = 60;

/// Font size bounds in points.
const MIN_SIZE: f32 = 13.0;
const MAX_SIZE: f32 = 64.0;

/// Spiral growth per radian and angle step per probe.
const SPIRAL_GROWTH: f32 = 1.9;
const SPIRAL_STEP: f32 = 0.35;
const SPIRAL_MAX_PROBES: usize = 600;

/// Gap kept between word boxes.
const PADDING: f32 = 2.0;

// ---------------------------------------------------------------------------
// PlacedWord / WordCloud
// ---------------------------------------------------------------------------

/// One word with its final geometry and color.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    /// Font size in points.
    pub size: f32,
    /// Center of the word box, canvas coordinates (origin top-left).
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
}

/// A finished layout for one category panel.
#[derive(Debug, Clone, PartialEq)]
pub struct WordCloud {
    pub words: Vec<PlacedWord>,
    pub scheme: ColorScheme,
}

impl WordCloud {
    /// Lay out `words` (bucket contents, duplicates meaningful) on the
    /// canvas.  Returns `None` for an empty list — the caller shows the
    /// "no words found" warning instead of an empty panel.
    pub fn layout(words: &[String], scheme: ColorScheme) -> Option<WordCloud> {
        if words.is_empty() {
            return None;
        }

        let ranked = rank_by_frequency(words);
        let max_count = ranked.first().map_or(1, |e| e.count);

        let mut placed: Vec<PlacedWord> = Vec::new();
        let mut boxes: Vec<Box2> = Vec::new();

        for entry in ranked.into_iter().take(MAX_WORDS) {
            let weight = (entry.count as f32 / max_count as f32).sqrt();
            let size = MIN_SIZE + (MAX_SIZE - MIN_SIZE) * weight;

            let seed = word_seed(&entry.form);
            let color = scheme.sample(0.2 + 0.8 * seed_fraction(seed));

            let half = text_half_extent(&entry.form, size);
            if let Some((x, y)) = place_on_spiral(half, seed, &boxes) {
                boxes.push(Box2::centered(x, y, half));
                placed.push(PlacedWord {
                    text: entry.form,
                    size,
                    x,
                    y,
                    color,
                });
            }
            // A word that finds no free spot is dropped; later (smaller)
            // words may still fit.
        }

        Some(WordCloud {
            words: placed,
            scheme,
        })
    }
}

// ---------------------------------------------------------------------------
// Frequency ranking
// ---------------------------------------------------------------------------

struct RankedWord {
    form: String,
    count: usize,
    first_index: usize,
}

/// Count case-insensitively, display the first-seen form, order by count
/// descending with first appearance as the tie-breaker.
fn rank_by_frequency(words: &[String]) -> Vec<RankedWord> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut ranked: Vec<RankedWord> = Vec::new();

    for (i, word) in words.iter().enumerate() {
        let key = word.to_lowercase();
        match index.get(&key) {
            Some(&slot) => ranked[slot].count += 1,
            None => {
                index.insert(key, ranked.len());
                ranked.push(RankedWord {
                    form: word.clone(),
                    count: 1,
                    first_index: i,
                });
            }
        }
    }

    ranked.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(a.first_index.cmp(&b.first_index))
    });
    ranked
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Half-extents `(w/2, h/2)` of a word's bounding box, estimated from the
/// font size.  egui's default proportional font runs close to 0.55 em per
/// character.
fn text_half_extent(text: &str, size: f32) -> (f32, f32) {
    let width = size * 0.55 * text.chars().count() as f32;
    let height = size * 1.15;
    (width / 2.0 + PADDING, height / 2.0 + PADDING)
}

/// Walk the spiral until a collision-free, in-bounds center is found.
fn place_on_spiral(half: (f32, f32), seed: u64, boxes: &[Box2]) -> Option<(f32, f32)> {
    let center_x = CLOUD_WIDTH / 2.0;
    let center_y = CLOUD_HEIGHT / 2.0;
    let start_angle = seed_fraction(seed) * std::f32::consts::TAU;

    for probe in 0..SPIRAL_MAX_PROBES {
        let theta = probe as f32 * SPIRAL_STEP;
        let radius = SPIRAL_GROWTH * theta;
        let angle = start_angle + theta;

        // Squash vertically to match the landscape canvas.
        let x = center_x + radius * angle.cos();
        let y = center_y + radius * 0.78 * angle.sin();

        let candidate = Box2::centered(x, y, half);
        if !candidate.inside_canvas() {
            continue;
        }
        if boxes.iter().any(|b| b.intersects(&candidate)) {
            continue;
        }
        return Some((x, y));
    }

    None
}

/// Axis-aligned box used for collision tests.
#[derive(Debug, Clone, Copy)]
struct Box2 {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Box2 {
    fn centered(x: f32, y: f32, (hw, hh): (f32, f32)) -> Self {
        Self {
            min_x: x - hw,
            min_y: y - hh,
            max_x: x + hw,
            max_y: y + hh,
        }
    }

    fn inside_canvas(&self) -> bool {
        self.min_x >= 0.0
            && self.min_y >= 0.0
            && self.max_x <= CLOUD_WIDTH
            && self.max_y <= CLOUD_HEIGHT
    }

    fn intersects(&self, other: &Box2) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

// ---------------------------------------------------------------------------
// Hash seeding
// ---------------------------------------------------------------------------

/// FNV-1a over the word bytes; stable across runs and platforms.
fn word_seed(word: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in word.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Map a seed to `[0, 1)`.
fn seed_fraction(seed: u64) -> f32 {
    (seed % 10_000) as f32 / 10_000.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
