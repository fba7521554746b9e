//! Render passes.
//!
//! A pass turns a catalog, an active set and a canvas into a [`Frame`]. All
//! inputs are checked before any raster work. Layers are synthesized in
//! parallel, one task per category; the layout runs to completion first
//! because the safety ratio depends on every label.
//!
//! Each pass holds a [`PassToken`]. Starting a newer pass (or calling
//! [`Renderer::invalidate`]) makes older tokens stale, and a stale pass
//! drops whatever it has produced instead of returning a frame.

use crate::attributes::{compute_layout_attributes, CategoryLayoutAttributes};
use crate::catalog::{ActiveSet, Catalog};
use crate::compositor::compose;
use crate::error::{InvalidInput, Result};
use crate::generators::blob::BlobGenerator;
use crate::generators::Generator;
use crate::layout::{compute_layout, CanvasSize, Layout};
use crate::raster::{self, BlobRaster};
use image::RgbaImage;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one render pass.
#[derive(Debug, Clone)]
pub struct PassToken {
    epoch: u64,
    current: Arc<AtomicU64>,
}

impl PassToken {
    /// False once a newer pass has started.
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::Acquire) == self.epoch
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Output of one completed pass.
#[derive(Debug, Clone)]
pub struct Frame {
    pub attributes: Vec<CategoryLayoutAttributes>,
    /// One raster per active category, in arrangement order.
    pub layers: Vec<BlobRaster>,
    pub composite: RgbaImage,
    pub layout: Layout,
}

impl Frame {
    pub fn composite_png(&self) -> Result<Vec<u8>> {
        raster::encode_png(&self.composite)
    }
}

/// Runs render passes with one layer generator.
///
/// Cheap to clone; clones share the pass counter, so any clone can
/// supersede a pass running on another thread.
#[derive(Debug, Clone)]
pub struct Renderer<G = BlobGenerator> {
    generator: G,
    epoch: Arc<AtomicU64>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::with_generator(BlobGenerator::default())
    }
}

impl Renderer {
    pub fn new(resolution: u32) -> Result<Self> {
        if resolution == 0 {
            return Err(InvalidInput::Resolution(resolution).into());
        }
        Ok(Self::with_generator(BlobGenerator::new(resolution)))
    }

    pub fn resolution(&self) -> u32 {
        self.generator.resolution
    }
}

impl<G: Generator> Renderer<G> {
    pub fn with_generator(generator: G) -> Self {
        Self {
            generator,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Start a new pass, making every earlier token stale.
    pub fn begin_pass(&self) -> PassToken {
        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        PassToken {
            epoch,
            current: Arc::clone(&self.epoch),
        }
    }

    /// Make the running pass (if any) stale without starting another.
    pub fn invalidate(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }

    /// Start a pass and run it to completion.
    pub fn render(
        &self,
        catalog: &Catalog,
        active: &ActiveSet,
        canvas: CanvasSize,
    ) -> Result<Option<Frame>> {
        let token = self.begin_pass();
        self.render_pass(&token, catalog, active, canvas)
    }

    /// Run the pass identified by `token`.
    ///
    /// Returns `Ok(None)` if the token went stale before the frame was
    /// complete.
    pub fn render_pass(
        &self,
        token: &PassToken,
        catalog: &Catalog,
        active: &ActiveSet,
        canvas: CanvasSize,
    ) -> Result<Option<Frame>> {
        if catalog.is_empty() {
            return Err(InvalidInput::EmptyCatalog.into());
        }
        let categories = active.resolve(catalog)?;
        let canvas = canvas.validate()?;

        let attributes = compute_layout_attributes(active.ids())?;
        let layout = compute_layout(&attributes, canvas, |id| {
            catalog.get(id).map(|c| c.name.as_str())
        })?;

        if !token.is_current() {
            tracing::debug!(epoch = token.epoch(), "pass superseded before synthesis");
            return Ok(None);
        }

        let layers = categories
            .par_iter()
            .zip(attributes.par_iter())
            .map(|(category, attrs)| {
                if token.is_current() {
                    self.generator.generate(category, attrs).map(Some)
                } else {
                    Ok(None)
                }
            })
            .collect::<Result<Vec<Option<BlobRaster>>>>()?;

        let Some(layers) = layers.into_iter().collect::<Option<Vec<_>>>() else {
            tracing::debug!(epoch = token.epoch(), "pass superseded during synthesis");
            return Ok(None);
        };

        let composite = compose(&layers)?;
        if !token.is_current() {
            tracing::debug!(epoch = token.epoch(), "pass superseded before commit");
            return Ok(None);
        }

        tracing::debug!(
            epoch = token.epoch(),
            layers = layers.len(),
            generator = self.generator.name(),
            "render pass complete"
        );

        Ok(Some(Frame {
            attributes,
            layers,
            composite,
            layout,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::CategoryLayoutAttributes;
    use crate::catalog::Category;
    use std::sync::atomic::AtomicUsize;

    /// Blob generator that supersedes the running pass after its
    /// `trip_at`-th layer.
    struct Interrupting {
        inner: BlobGenerator,
        epoch: Arc<AtomicU64>,
        calls: AtomicUsize,
        trip_at: usize,
    }

    impl Generator for Interrupting {
        fn name(&self) -> &'static str {
            "interrupting"
        }

        fn generate(&self, category: &Category, attrs: &CategoryLayoutAttributes) -> Result<BlobRaster> {
            let layer = self.inner.generate(category, attrs);
            if self.calls.fetch_add(1, Ordering::SeqCst) == self.trip_at {
                self.epoch.fetch_add(1, Ordering::AcqRel);
            }
            layer
        }

        fn extension(&self) -> &'static str {
            "png"
        }
    }

    fn interrupting_renderer(trip_at: usize) -> Renderer<Interrupting> {
        let epoch = Arc::new(AtomicU64::new(0));
        Renderer {
            generator: Interrupting {
                inner: BlobGenerator::new(24),
                epoch: Arc::clone(&epoch),
                calls: AtomicUsize::new(0),
                trip_at,
            },
            epoch,
        }
    }

    #[test]
    fn zero_resolution_renderer_is_rejected() {
        assert!(Renderer::new(0).unwrap_err().is_invalid_input());
    }

    #[test]
    fn newer_pass_makes_older_token_stale() {
        let renderer = Renderer::new(32).unwrap();
        let first = renderer.begin_pass();
        assert!(first.is_current());
        let second = renderer.begin_pass();
        assert!(!first.is_current());
        assert!(second.is_current());

        renderer.invalidate();
        assert!(!second.is_current());
    }

    #[test]
    fn stale_pass_returns_nothing() {
        let renderer = Renderer::new(32).unwrap();
        let catalog = Catalog::emotions();
        let active = ActiveSet::new(&catalog, ["joy", "love"]).unwrap();

        let stale = renderer.begin_pass();
        let clone = renderer.clone();
        clone.begin_pass();

        let frame = renderer
            .render_pass(&stale, &catalog, &active, CanvasSize::default())
            .unwrap();
        assert!(frame.is_none());
    }

    #[test]
    fn invalid_canvas_fails_before_synthesis() {
        let renderer = Renderer::new(32).unwrap();
        let catalog = Catalog::emotions();
        let active = ActiveSet::default_for(&catalog);
        let err = renderer
            .render(&catalog, &active, CanvasSize::new(100, 100))
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn invalidating_on_first_layer_discards_the_pass() {
        let renderer = interrupting_renderer(0);
        let catalog = Catalog::emotions();
        let active = ActiveSet::new(&catalog, ["joy", "sadness", "anger", "love"]).unwrap();

        let frame = renderer
            .render(&catalog, &active, CanvasSize::default())
            .unwrap();
        assert!(frame.is_none());
        assert!(renderer.generator().calls.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn invalidating_on_last_layer_discards_the_pass() {
        let renderer = interrupting_renderer(2);
        let catalog = Catalog::emotions();
        let active = ActiveSet::new(&catalog, ["joy", "sadness", "fear"]).unwrap();

        let frame = renderer
            .render(&catalog, &active, CanvasSize::default())
            .unwrap();
        assert!(frame.is_none());
        assert_eq!(renderer.generator().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn next_pass_after_an_interrupted_one_completes() {
        let renderer = interrupting_renderer(0);
        let catalog = Catalog::emotions();
        let active = ActiveSet::new(&catalog, ["joy", "love"]).unwrap();

        assert!(renderer
            .render(&catalog, &active, CanvasSize::default())
            .unwrap()
            .is_none());
        let frame = renderer
            .render(&catalog, &active, CanvasSize::default())
            .unwrap()
            .expect("second pass is not interrupted");
        assert_eq!(frame.layers.len(), 2);
    }
}
