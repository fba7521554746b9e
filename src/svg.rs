//! SVG scene export.
//!
//! Lays the rendered layers and labels out as a standalone SVG: each blob
//! raster is embedded as a PNG pattern filling a clipped circle at the
//! canvas center, blended with `mix-blend-mode`, and each label is a marker
//! circle with a percentage and a name above it.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::render::Frame;

/// Page background behind the glows.
pub const BACKGROUND: &str = "#1A1A2E";

const FONT_STACK: &str =
    "'Inter', 'SF Pro Display', -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif";

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Builds an SVG document from a finished frame.
pub struct SvgDocument<'a> {
    frame: &'a Frame,
    catalog: &'a Catalog,
}

impl<'a> SvgDocument<'a> {
    pub fn new(frame: &'a Frame, catalog: &'a Catalog) -> Self {
        Self { frame, catalog }
    }

    fn generate_defs(&self) -> Result<String> {
        let mut defs = String::from("<defs>\n");

        // Outer glow: blurred copy merged under the source.
        defs.push_str(
            r#"    <filter id="emotion-glow" x="-100%" y="-100%" width="300%" height="300%">
      <feGaussianBlur stdDeviation="15" result="coloredBlur"/>
      <feMerge><feMergeNode in="coloredBlur"/><feMergeNode in="SourceGraphic"/></feMerge>
    </filter>
    <filter id="inner-glow" x="-50%" y="-50%" width="200%" height="200%">
      <feGaussianBlur stdDeviation="8" result="innerBlur"/>
    </filter>
"#,
        );

        for (raster, placement) in self.frame.layers.iter().zip(self.frame.layout.iter()) {
            let extent = placement.layer.extent;
            defs.push_str(&format!(
                r#"    <pattern id="emotion-layer-{id}" patternUnits="userSpaceOnUse" x="{x:.2}" y="{x:.2}" width="{extent:.2}" height="{extent:.2}">
      <image href="{href}" width="{extent:.2}" height="{extent:.2}"/>
    </pattern>
"#,
                id = escape(raster.category_id()),
                x = -extent / 2.0,
                extent = extent,
                href = raster.to_data_uri()?,
            ));
        }

        defs.push_str("  </defs>");
        Ok(defs)
    }

    fn generate_layers(&self) -> Vec<String> {
        self.frame
            .layout
            .iter()
            .map(|placement| {
                format!(
                    r#"<circle cx="0" cy="0" r="{:.2}" style="fill: url(#emotion-layer-{}); opacity: {:.3}; mix-blend-mode: {}; filter: url(#emotion-glow)"/>"#,
                    placement.layer.clip_radius,
                    escape(&placement.category_id),
                    placement.layer.opacity,
                    placement.layer.blend.css_name(),
                )
            })
            .collect()
    }

    fn generate_labels(&self) -> Vec<String> {
        self.frame
            .layout
            .iter()
            .map(|placement| {
                let style = &placement.label;
                let color = self
                    .catalog
                    .get(&placement.category_id)
                    .map(|c| c.color.to_hex())
                    .unwrap_or_else(|| "#FFFFFF".to_string());

                format!(
                    r##"<g class="emotion-label" transform="translate({x:.2},{y:.2})">
      <circle cx="0" cy="0" r="{r:.2}" style="fill: {color}; opacity: {mo:.3}; stroke: rgba(255, 255, 255, 0.3); stroke-width: 1; filter: url(#inner-glow)"/>
      <text text-anchor="middle" dominant-baseline="middle" y="0" style="fill: #1A1A2E; font-family: {font}; font-size: {pfs:.1}px; font-weight: 700; letter-spacing: 0.5px">{percent}</text>
      <text text-anchor="middle" dominant-baseline="middle" y="{ny:.2}" style="fill: #F0F0F0; font-family: {font}; font-size: {nfs:.1}px; font-weight: {nfw}; opacity: {no:.3}; letter-spacing: 0.5px">{name}</text>
    </g>"##,
                    x = placement.label_offset.x,
                    y = placement.label_offset.y,
                    r = style.marker_radius,
                    color = color,
                    mo = style.marker_opacity,
                    font = FONT_STACK,
                    pfs = style.percent_font_size,
                    percent = escape(&style.percent),
                    ny = style.name_offset,
                    nfs = style.name_font_size,
                    nfw = style.name_font_weight,
                    no = style.name_opacity,
                    name = escape(&style.text),
                )
            })
            .collect()
    }

    /// Render the complete document.
    pub fn render(&self) -> Result<String> {
        let canvas = self.frame.layout.canvas;
        let defs = self.generate_defs()?;
        let layers = self.generate_layers().join("\n    ");
        let labels = self.generate_labels().join("\n    ");

        Ok(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" overflow="visible">
  <rect width="100%" height="100%" fill="{bg}"/>
  {defs}
  <g transform="translate({cx},{cy})">
    {layers}
    {labels}
  </g>
</svg>"#,
            w = canvas.width,
            h = canvas.height,
            bg = BACKGROUND,
            defs = defs,
            cx = f64::from(canvas.width) / 2.0,
            cy = f64::from(canvas.height) / 2.0,
            layers = layers,
            labels = labels,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ActiveSet, Catalog};
    use crate::layout::CanvasSize;
    use crate::render::Renderer;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("a<b&\"c\">"), "a&lt;b&amp;&quot;c&quot;&gt;");
    }

    #[test]
    fn document_holds_every_layer_and_label() {
        let catalog = Catalog::emotions();
        let active = ActiveSet::new(&catalog, ["joy", "sadness", "anger"]).unwrap();
        let frame = Renderer::new(48)
            .unwrap()
            .render(&catalog, &active, CanvasSize::default())
            .unwrap()
            .unwrap();

        let svg = SvgDocument::new(&frame, &catalog).render().unwrap();
        assert!(svg.starts_with("<?xml"));
        assert_eq!(svg.matches("<pattern ").count(), 3);
        assert_eq!(svg.matches("class=\"emotion-label\"").count(), 3);
        assert_eq!(svg.matches("mix-blend-mode: normal").count(), 1);
        assert_eq!(svg.matches("mix-blend-mode: screen").count(), 2);
        assert!(svg.contains(">Sadness</text>"));
        assert!(svg.contains("translate(450,450)"));
    }
}
