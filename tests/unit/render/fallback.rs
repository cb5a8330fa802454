use super::*;

fn style() -> FallbackStyle {
    FallbackStyle {
        background: Rgba8::WHITE,
        text_color: Rgba8::new(0x66, 0x66, 0x66, 255),
        font_px: 24.0,
        line_offset: 20.0,
    }
}

#[test]
fn paint_is_opaque_and_sized_as_requested() {
    let mut painter = FallbackPainter::new(FontSet::new(false));
    let bmp = painter.paint(320, 180, &RENDER_ERROR_LINES, style());
    assert_eq!((bmp.width, bmp.height), (320, 180));
    assert!(bmp.is_opaque());
    assert_eq!(bmp.pixel(0, 0), Some([255, 255, 255, 255]));
}

#[test]
fn zero_area_request_is_raised_to_one_pixel() {
    let mut painter = FallbackPainter::new(FontSet::new(false));
    let bmp = painter.paint(0, 0, &["x"], style());
    assert_eq!((bmp.width, bmp.height), (1, 1));
    assert!(bmp.is_opaque());
}

#[test]
fn svg_centers_lines_around_the_middle() {
    let svg = message_svg(200, 100, &RENDER_ERROR_LINES, style());
    assert!(svg.contains(r#"y="30""#), "{svg}");
    assert!(svg.contains(r#"y="70""#), "{svg}");
    assert!(svg.contains(r#"x="100""#));
    assert!(svg.contains("Error rendering slide"));
    assert!(svg.contains("Please try again"));
    assert!(svg.contains("#666666"));
}

#[test]
fn single_line_sits_on_center() {
    let svg = message_svg(160, 90, &["Slide 3"], style());
    assert!(svg.contains(r#"y="45""#), "{svg}");
}

#[test]
fn message_text_is_escaped() {
    assert_eq!(escape_xml(r#"a<b & "c">"#), "a&lt;b &amp; &quot;c&quot;&gt;");
    let svg = message_svg(10, 10, &["<script>"], style());
    assert!(!svg.contains("<script>"));
}

#[test]
fn font_database_is_built_once() {
    let painter = FallbackPainter::new(FontSet::new(false));
    let a = painter.fonts.database();
    let b = painter.fonts.database();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}
