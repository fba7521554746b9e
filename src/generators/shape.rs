//! Polar noise silhouette.
//!
//! Replaces a plain circle with a boundary whose radius wobbles with the
//! angle. Each category gets its own phase, so its outline is recognisable
//! from render to render.

/// Harmonic frequencies, amplitudes and phase constants.
const HARMONICS: [(f64, f64, f64); 3] = [(4.0, 0.2, 0.0), (8.0, 0.1, 1.0), (16.0, 0.05, 2.0)];

/// Per-category phase offset: the id's first UTF-16 code unit times 0.1.
/// The empty id gets phase 0.
pub fn phase_offset(category_id: &str) -> f64 {
    category_id
        .encode_utf16()
        .next()
        .map_or(0.0, |unit| f64::from(unit) * 0.1)
}

/// Sum of the three sine harmonics at `angle`. Always within [-0.35, 0.35].
pub fn harmonic_sum(angle: f64, phase: f64) -> f64 {
    HARMONICS
        .iter()
        .map(|(frequency, amplitude, shift)| (angle * frequency + phase + shift).sin() * amplitude)
        .sum()
}

/// Organic boundary radius at `angle` (radians).
///
/// Positive whenever `base_radius > 0` and `intensity` is in [0, 1]: the
/// harmonic multiplier never drops below 0.65.
pub fn organic_radius(angle: f64, base_radius: f64, category_id: &str, intensity: f64) -> f64 {
    organic_radius_with_phase(angle, base_radius, phase_offset(category_id), intensity)
}

/// [`organic_radius`] with the phase already derived, for per-pixel loops.
pub(crate) fn organic_radius_with_phase(
    angle: f64,
    base_radius: f64,
    phase: f64,
    intensity: f64,
) -> f64 {
    let intensity_factor = 1.0 + intensity * 0.4;
    base_radius * intensity_factor * (1.0 + harmonic_sum(angle, phase))
}
