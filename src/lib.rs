//! Circumplex - organic glow blobs for labeled categories.
//!
//! Each active category becomes a translucent, irregular blob whose size,
//! shape and brightness come from a deterministic hash of its id. Blobs are
//! arranged around a shared center, stacked with screen blending, and
//! labeled without running off the canvas.

pub mod attributes;
pub mod catalog;
pub mod compositor;
pub mod config;
pub mod error;
pub mod generators;
pub mod layout;
pub mod raster;
pub mod render;
pub mod svg;

pub use attributes::{compute_layout_attributes, generate, CategoryLayoutAttributes, Point};
pub use catalog::{ActiveSet, Catalog, Category, RgbColor};
pub use compositor::compose;
pub use config::CircumplexConfig;
pub use error::{CircumplexError, InvalidInput};
pub use generators::blob::synthesize;
pub use generators::shape::organic_radius;
pub use generators::Generator;
pub use layout::{compute_layout, CanvasSize, Layout, PlacementTransform};
pub use raster::BlobRaster;
pub use render::{Frame, Renderer};
