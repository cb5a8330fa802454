use crate::foundation::core::Size;
use crate::store::convert::ElementBox;

/// Parameters of the slide measurement routine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasureParams {
    /// Presentation nominal size.
    pub nominal: Size,
    /// Floor for the measured height.
    pub min_height: f64,
    /// Room added below the deepest visible descendant.
    pub padding: f64,
}

/// Measure a slide's rendered content extent from its descendants' boxes.
///
/// Height is the bottom edge (plus bottom margin) of the deepest visible descendant, plus
/// `padding`, floored at `min_height`. Width is the rightmost visible edge, floored at the
/// nominal width. Slides without visible descendants measure as the floors.
pub fn measure_slide(boxes: &[ElementBox], params: MeasureParams) -> Size {
    let mut max_bottom: Option<f64> = None;
    let mut max_right = 0.0_f64;
    for b in boxes.iter().filter(|b| b.is_visible()) {
        let margin = if b.margin_bottom.is_finite() {
            b.margin_bottom.max(0.0)
        } else {
            0.0
        };
        let bottom = b.rect.max_y() + margin;
        max_bottom = Some(max_bottom.map_or(bottom, |m| m.max(bottom)));
        max_right = max_right.max(b.rect.max_x());
    }

    let height = match max_bottom {
        Some(bottom) => (bottom + params.padding).max(params.min_height),
        None => params.min_height,
    };
    let width = max_right.max(params.nominal.width);
    Size::new(width, height)
}

#[cfg(test)]
#[path = "../../tests/unit/store/measure.rs"]
mod tests;
