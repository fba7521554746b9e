//! Deterministic per-category attributes.
//!
//! Intensity and influence come from a stable hash of the category id, so
//! the same active set always lays out the same way, across runs and
//! across processes.

use crate::error::{InvalidInput, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::f64::consts::PI;

/// A point or offset in 2D, relative to whatever center the caller uses.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

/// The pseudo-random pair derived from a category id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeededTraits {
    /// In [0.3, 0.7).
    pub intensity: f64,
    /// In [80, 200).
    pub influence: f64,
}

/// Sum of the id's UTF-16 code units.
fn id_seed(category_id: &str) -> u64 {
    category_id.encode_utf16().map(u64::from).sum()
}

/// Derive intensity and influence from a category id.
///
/// Pure: depends only on the id's character codes. The empty id has seed 0
/// and is still well-defined.
pub fn generate(category_id: &str) -> SeededTraits {
    let seed = id_seed(category_id);
    let r1 = ((seed * 9301 + 49297) % 233_280) as f64 / 233_280.0;
    let r2 = ((seed * 17 + 23) % 100) as f64 / 100.0;

    SeededTraits {
        intensity: 0.3 + r1 * 0.4,
        influence: 80.0 + r2 * 120.0,
    }
}

/// Everything the synthesizer and layout need to know about one active
/// category. Recomputed whenever the active set changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLayoutAttributes {
    pub id: String,
    /// Unit-circle position of the category's angular slot.
    pub base_position: Point,
    pub angle_degrees: f64,
    pub intensity: f64,
    /// Influence radius in raster pixels, before intensity scaling.
    pub influence: f64,
}

impl CategoryLayoutAttributes {
    /// Attributes for the category at `index` of an active set of `count`.
    pub fn new(id: &str, index: usize, count: usize) -> Self {
        let traits = generate(id);
        let slot = index as f64 * 2.0 * PI / count as f64;

        Self {
            id: id.to_string(),
            base_position: Point::new(slot.cos(), slot.sin()),
            angle_degrees: index as f64 * 360.0 / count as f64,
            intensity: traits.intensity,
            influence: traits.influence,
        }
    }

    /// `intensity^0.7`, the curve that drives expansion and blob size.
    pub fn intensity_boost(&self) -> f64 {
        self.intensity.powf(0.7)
    }

    /// Offset of the blob's organic center from the shared center, at
    /// the given scale (raster resolution or canvas base radius).
    ///
    /// Strong categories are pushed outward, weak ones pulled in.
    pub fn blob_center(&self, scale: f64) -> Point {
        let boost = self.intensity_boost();
        let expansion = 0.6 + boost * 0.8;
        let center_pull = (1.0 - boost) * 0.3;
        let distance = scale * 0.3 * expansion * (1.0 - center_pull);
        self.base_position.scale(distance)
    }

    /// Boundary radius fed to the organic shape function.
    pub fn effective_radius(&self) -> f64 {
        self.influence * self.intensity_boost() * 1.2
    }
}

/// Attributes for every id of an active set, in arrangement order.
///
/// Rejects an empty list or repeated ids.
pub fn compute_layout_attributes<S: AsRef<str>>(
    active_ids: &[S],
) -> Result<Vec<CategoryLayoutAttributes>> {
    if active_ids.is_empty() {
        return Err(InvalidInput::EmptyActiveSet.into());
    }

    let mut seen = HashSet::new();
    for id in active_ids {
        if !seen.insert(id.as_ref()) {
            return Err(InvalidInput::DuplicateCategory(id.as_ref().to_string()).into());
        }
    }

    let count = active_ids.len();
    Ok(active_ids
        .iter()
        .enumerate()
        .map(|(index, id)| CategoryLayoutAttributes::new(id.as_ref(), index, count))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    #[test]
    fn seed_sums_character_codes() {
        assert_eq!(id_seed(""), 0);
        assert_eq!(id_seed("joy"), 106 + 111 + 121);
    }

    #[test]
    fn joy_matches_hand_computed_values() {
        // seed 338: (338*9301 + 49297) % 233280 = 160395, (338*17 + 23) % 100 = 69
        let traits = generate("joy");
        assert!((traits.intensity - (0.3 + 160_395.0 / 233_280.0 * 0.4)).abs() < 1e-12);
        assert!((traits.influence - (80.0 + 0.69 * 120.0)).abs() < 1e-9);
    }

    #[test]
    fn generate_is_idempotent() {
        for id in ["joy", "sadness", "", "anticipation"] {
            let a = generate(id);
            let b = generate(id);
            assert_eq!(a.intensity.to_bits(), b.intensity.to_bits());
            assert_eq!(a.influence.to_bits(), b.influence.to_bits());
        }
    }

    #[test]
    fn ranges_hold_for_arbitrary_ids() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut ids = vec![String::new()];
        for _ in 0..500 {
            let len = rng.gen_range(1..24);
            ids.push((0..len).map(|_| rng.gen::<char>()).collect());
        }

        for id in &ids {
            let traits = generate(id);
            assert!((0.3..0.7).contains(&traits.intensity), "{id:?}");
            assert!((80.0..200.0).contains(&traits.influence), "{id:?}");
        }
    }

    #[test]
    fn joy_and_sadness_differ() {
        assert_ne!(generate("joy"), generate("sadness"));
    }

    #[test]
    fn slots_are_spread_evenly() {
        let attrs = compute_layout_attributes(&["a", "b", "c", "d"]).unwrap();
        let angles: Vec<f64> = attrs.iter().map(|a| a.angle_degrees).collect();
        assert_eq!(angles, vec![0.0, 90.0, 180.0, 270.0]);
        assert!((attrs[1].base_position.y - 1.0).abs() < 1e-12);
        assert!(attrs[1].base_position.x.abs() < 1e-12);
    }

    #[test]
    fn empty_and_duplicate_ids_are_rejected() {
        assert!(compute_layout_attributes::<&str>(&[]).is_err());
        assert!(compute_layout_attributes(&["joy", "joy"]).is_err());
    }

    #[test]
    fn stronger_categories_sit_further_out() {
        let mut weak = CategoryLayoutAttributes::new("x", 0, 1);
        let mut strong = weak.clone();
        weak.intensity = 0.3;
        strong.intensity = 0.7;
        assert!(strong.blob_center(400.0).length() > weak.blob_center(400.0).length());
    }
}
