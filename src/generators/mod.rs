//! Layer generators - each turns one category into a raster layer.

pub mod blob;
pub mod shape;

use crate::attributes::CategoryLayoutAttributes;
use crate::catalog::Category;
use crate::error::Result;
use crate::raster::BlobRaster;

/// Trait for all layer generators.
///
/// Layers of one pass are generated in parallel, so generators are shared
/// across threads.
pub trait Generator: Send + Sync {
    /// Name of this generator style.
    fn name(&self) -> &'static str;

    /// Render one category's layer from its derived attributes.
    fn generate(&self, category: &Category, attrs: &CategoryLayoutAttributes) -> Result<BlobRaster>;

    /// File extension for this generator's output.
    fn extension(&self) -> &'static str;
}
