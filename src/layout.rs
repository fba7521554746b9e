//! Placement of blobs and labels around the shared canvas center.
//!
//! Blob centers use the same expansion curve as the synthesizer, scaled to
//! the canvas base radius. Labels sit beyond their blob along the same
//! direction. If any label would leave the canvas, every label distance is
//! shrunk by one shared safety ratio, which keeps their relative spacing.

use crate::attributes::{CategoryLayoutAttributes, Point};
use crate::error::{InvalidInput, Result};
use serde::Serialize;

/// Space reserved around the blobs for labels.
pub const LABEL_MARGIN: f64 = 120.0;

/// Smallest base radius regardless of canvas size.
pub const MIN_BASE_RADIUS: f64 = 200.0;

/// Gap between the outermost label and the canvas edge.
pub const EDGE_PADDING: f64 = 60.0;

/// Bounds for a square canvas fitted to a container.
pub const MIN_CANVAS: u32 = 850;
pub const MAX_CANVAS: u32 = 1300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Square canvas for a container `width` pixels wide, clamped to
    /// [`MIN_CANVAS`, `MAX_CANVAS`].
    pub fn fit_container(width: u32) -> Self {
        let side = width.clamp(MIN_CANVAS, MAX_CANVAS);
        Self::new(side, side)
    }

    /// Half of the shorter side.
    pub fn min_half(self) -> f64 {
        f64::from(self.width.min(self.height)) / 2.0
    }

    /// Furthest a label center may sit from the canvas center.
    pub fn label_limit(self) -> f64 {
        self.min_half() - EDGE_PADDING
    }

    /// `max(200, min_half - 120)`.
    pub fn base_radius(self) -> f64 {
        (self.min_half() - LABEL_MARGIN).max(MIN_BASE_RADIUS)
    }

    /// Reject canvases that are empty or too small to hold any label.
    pub fn validate(self) -> Result<Self> {
        if self.width == 0 || self.height == 0 || self.label_limit() <= 0.0 {
            return Err(InvalidInput::Canvas {
                width: self.width,
                height: self.height,
            }
            .into());
        }
        Ok(self)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(900, 900)
    }
}

/// Compositing mode for a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Plain source-over.
    Normal,
    /// Brightens what is already there.
    Screen,
}

impl BlendMode {
    /// First layer in arrangement order is normal, the rest screen.
    pub fn for_index(index: usize) -> Self {
        if index == 0 {
            BlendMode::Normal
        } else {
            BlendMode::Screen
        }
    }

    pub fn css_name(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Screen => "screen",
        }
    }
}

/// How a blob raster is laid onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerPresentation {
    /// Side of the centered square the raster is stretched over.
    pub extent: f64,
    /// Radius of the circle the layer is clipped to.
    pub clip_radius: f64,
    pub opacity: f64,
    pub blend: BlendMode,
}

/// Visual parameters of one label group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelStyle {
    pub text: String,
    pub percent: String,
    pub marker_radius: f64,
    pub marker_opacity: f64,
    pub percent_font_size: f64,
    pub name_font_size: f64,
    pub name_font_weight: u16,
    /// Vertical offset of the name above the marker center.
    pub name_offset: f64,
    pub name_opacity: f64,
}

impl LabelStyle {
    pub fn new(name: &str, intensity: f64) -> Self {
        let marker_radius = 12.0 + intensity * 18.0;
        Self {
            text: name.to_string(),
            percent: format!("{}%", (intensity * 100.0).round()),
            marker_radius,
            marker_opacity: 0.85 + intensity * 0.15,
            percent_font_size: 10.0 + intensity * 3.0,
            name_font_size: 14.0 + intensity * 2.0,
            name_font_weight: if intensity > 0.6 { 500 } else { 400 },
            name_offset: -(marker_radius + 16.0),
            name_opacity: 0.9 + intensity * 0.1,
        }
    }
}

/// Where one category's glow and label go, relative to the canvas center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementTransform {
    pub category_id: String,
    pub blob_offset: Point,
    pub label_offset: Point,
    /// Final label distance from the canvas center.
    pub label_distance: f64,
    /// Shared by every placement in the same layout.
    pub safety_ratio: f64,
    pub layer: LayerPresentation,
    pub label: LabelStyle,
}

/// Labels wanted more room than the canvas has. Resolved by scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigurationWarning {
    LabelOverflow { requested: f64, allowed: f64 },
}

/// A complete placement pass for one active set and canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub canvas: CanvasSize,
    pub base_radius: f64,
    pub safety_ratio: f64,
    pub placements: Vec<PlacementTransform>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ConfigurationWarning>,
}

impl Layout {
    pub fn get(&self, category_id: &str) -> Option<&PlacementTransform> {
        self.placements.iter().find(|p| p.category_id == category_id)
    }

    /// Whether label distances were shrunk to fit.
    pub fn is_scaled(&self) -> bool {
        self.safety_ratio < 1.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacementTransform> {
        self.placements.iter()
    }
}

/// Ideal label distance before any safety scaling.
fn ideal_label_distance(blob_distance: f64, base_radius: f64, intensity: f64) -> f64 {
    blob_distance + 0.8 * (base_radius + EDGE_PADDING) + intensity * 30.0
}

/// Unit direction from the canvas center toward the label.
fn label_direction(attrs: &CategoryLayoutAttributes, blob_offset: Point) -> Point {
    let distance = blob_offset.length();
    if distance > 0.0 {
        blob_offset.scale(1.0 / distance)
    } else {
        let angle = attrs.angle_degrees.to_radians() - std::f64::consts::FRAC_PI_2;
        Point::new(angle.cos(), angle.sin())
    }
}

/// Place every active category on `canvas`.
///
/// `names` supplies display labels by category id; ids without a name fall
/// back to the id itself.
pub fn compute_layout<'a>(
    attributes: &[CategoryLayoutAttributes],
    canvas: CanvasSize,
    names: impl Fn(&str) -> Option<&'a str>,
) -> Result<Layout> {
    if attributes.is_empty() {
        return Err(InvalidInput::EmptyActiveSet.into());
    }
    let canvas = canvas.validate()?;
    let base_radius = canvas.base_radius();

    // Every ideal distance must be known before any label is final.
    let staged: Vec<(Point, f64)> = attributes
        .iter()
        .map(|attrs| {
            let blob_offset = attrs.blob_center(base_radius);
            let ideal = ideal_label_distance(blob_offset.length(), base_radius, attrs.intensity);
            (blob_offset, ideal)
        })
        .collect();

    let max_label_distance = staged
        .iter()
        .map(|(_, ideal)| *ideal)
        .fold(f64::NEG_INFINITY, f64::max);
    let safe_max_distance = max_label_distance.min(canvas.label_limit());

    let mut warnings = Vec::new();
    let safety_ratio = if max_label_distance > safe_max_distance {
        tracing::warn!(
            requested = max_label_distance,
            allowed = safe_max_distance,
            "labels exceed canvas, scaling placements"
        );
        warnings.push(ConfigurationWarning::LabelOverflow {
            requested: max_label_distance,
            allowed: safe_max_distance,
        });
        safe_max_distance / max_label_distance
    } else {
        1.0
    };

    let placements = attributes
        .iter()
        .zip(staged)
        .enumerate()
        .map(|(index, (attrs, (blob_offset, ideal)))| {
            let label_distance = (ideal * safety_ratio).min(safe_max_distance);
            let direction = label_direction(attrs, blob_offset);
            let name = names(&attrs.id).unwrap_or(&attrs.id);

            PlacementTransform {
                category_id: attrs.id.clone(),
                blob_offset,
                label_offset: direction.scale(label_distance),
                label_distance,
                safety_ratio,
                layer: LayerPresentation {
                    extent: base_radius * 2.5,
                    clip_radius: base_radius * 1.2,
                    opacity: 0.7 + attrs.intensity * 0.3,
                    blend: BlendMode::for_index(index),
                },
                label: LabelStyle::new(name, attrs.intensity),
            }
        })
        .collect();

    tracing::debug!(
        categories = attributes.len(),
        base_radius,
        safety_ratio,
        "computed layout"
    );

    Ok(Layout {
        canvas,
        base_radius,
        safety_ratio,
        placements,
        warnings,
    })
}
