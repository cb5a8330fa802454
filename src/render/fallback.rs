use crate::foundation::core::Rgba8;
use crate::render::bitmap::Bitmap;
use crate::svg::fonts::FontSet;

/// Message lines drawn on the render error surface.
pub const RENDER_ERROR_LINES: [&str; 2] = ["Error rendering slide", "Please try again"];

/// Draws opaque error surfaces with a centered message.
///
/// Text goes through an SVG document rendered by `resvg`. Any failure on that path degrades to
/// a plain fill, so painting never fails.
pub(crate) struct FallbackPainter {
    fonts: FontSet,
}

/// Appearance of one error surface.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FallbackStyle {
    pub(crate) background: Rgba8,
    pub(crate) text_color: Rgba8,
    pub(crate) font_px: f64,
    /// Distance of each line from the vertical center.
    pub(crate) line_offset: f64,
}

impl FallbackPainter {
    pub(crate) fn new(fonts: FontSet) -> Self {
        Self { fonts }
    }

    pub(crate) fn paint(
        &mut self,
        width: u32,
        height: u32,
        lines: &[&str],
        style: FallbackStyle,
    ) -> Bitmap {
        let (width, height) = (width.max(1), height.max(1));
        match self.paint_text(width, height, lines, style) {
            Some(bitmap) => bitmap,
            None => {
                tracing::debug!("fallback text rendering unavailable; using plain fill");
                Bitmap::filled(width, height, style.background)
            }
        }
    }

    fn paint_text(
        &mut self,
        width: u32,
        height: u32,
        lines: &[&str],
        style: FallbackStyle,
    ) -> Option<Bitmap> {
        let svg = message_svg(width, height, lines, style);
        let opts = usvg::Options {
            fontdb: self.fonts.database(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts).ok()?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)?;
        let bg = style.background;
        pixmap.fill(resvg::tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        Bitmap::new(width, height, pixmap.data().to_vec()).ok()
    }
}

fn message_svg(width: u32, height: u32, lines: &[&str], style: FallbackStyle) -> String {
    let cx = f64::from(width) / 2.0;
    let cy = f64::from(height) / 2.0;
    let n = lines.len();

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{width}" height="{height}" fill="{}"/>"#,
        style.background.to_hex_rgb()
    ));
    for (i, line) in lines.iter().enumerate() {
        // Lines are spread symmetrically around the center: two lines sit at -offset/+offset.
        let slot = i as f64 - (n.saturating_sub(1) as f64) / 2.0;
        let y = cy + slot * 2.0 * style.line_offset;
        svg.push_str(&format!(
            r#"<text x="{cx}" y="{y}" text-anchor="middle" dominant-baseline="middle" font-family="Arial, Helvetica, sans-serif" font-size="{}" fill="{}" fill-opacity="{}">{}</text>"#,
            style.font_px,
            style.text_color.to_hex_rgb(),
            style.text_color.opacity(),
            escape_xml(line)
        ));
    }
    svg.push_str("</svg>");
    svg
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/fallback.rs"]
mod tests;
