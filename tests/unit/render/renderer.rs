use super::*;
use crate::foundation::core::Rgba8;
use crate::render::surface::Canvas;
use crate::store::convert::DocumentSource;
use crate::test_support::{
    PatternRasterizer, Script, ScriptedConverter, deck, deck_sized, small_store,
    small_store_opts,
};

fn test_opts() -> RendererOpts {
    RendererOpts {
        load_system_fonts: false,
        ..RendererOpts::default()
    }
}

fn renderer(rasterizer: PatternRasterizer) -> Renderer<PatternRasterizer> {
    Renderer::with_opts(rasterizer, test_opts()).unwrap()
}

#[tokio::test]
async fn second_identical_render_is_a_pixel_identical_cache_hit() {
    let store = small_store(3).await;
    let mut r = renderer(PatternRasterizer::default());
    let mut canvas = Canvas::default();

    let first = r.render(&store, &mut canvas, 0, 1.0, 0).await.unwrap();
    assert!(matches!(first, RenderOutcome::Rendered { .. }));
    let before = canvas.snapshot();

    let second = r.render(&store, &mut canvas, 0, 1.0, 0).await.unwrap();
    assert!(matches!(second, RenderOutcome::CacheHit { .. }));
    assert_eq!(canvas.snapshot(), before);
    assert_eq!(r.rasterizer().calls, 1);
    assert_eq!(r.stats().cache_hits, 1);
    assert_eq!(r.stats().rasterizations, 1);
}

#[tokio::test]
async fn raster_extent_includes_safety_margin_and_background() {
    let store = small_store(1).await;
    let mut r = renderer(PatternRasterizer::default());
    let mut canvas = Canvas::default();
    r.render(&store, &mut canvas, 0, 1.0, 0).await.unwrap();

    let req = r.rasterizer().requests[0];
    assert_eq!((req.width, req.height), (176, 99));
    assert_eq!(req.background, Rgba8::WHITE);
    assert_eq!(r.rasterizer().markups[0], "slide-0");
}

#[tokio::test]
async fn quarter_turns_swap_axes() {
    let store = small_store(1).await;
    let mut r = renderer(PatternRasterizer::default());
    let mut canvas = Canvas::default();

    let cases = [
        (0, (352, 198)),
        (90, (198, 352)),
        (180, (352, 198)),
        (270, (198, 352)),
    ];
    for (deg, expected) in cases {
        let out = r.render(&store, &mut canvas, 0, 2.0, deg).await.unwrap();
        assert_eq!(out.size(), expected, "rotation {deg}");
        assert_eq!(canvas.size(), expected, "rotation {deg}");
    }
}

#[tokio::test]
async fn cache_evicts_first_inserted_key() {
    let store = small_store(11).await;
    let mut r = renderer(PatternRasterizer::default());
    let mut canvas = Canvas::default();

    for i in 0..11 {
        r.render(&store, &mut canvas, i, 0.5, 0).await.unwrap();
    }
    assert_eq!(r.cache().len(), 10);
    assert!(!r.cache().contains(&RenderKey::new(0, 0.5, Rotation::Deg0)));
    assert!(r.cache().contains(&RenderKey::new(10, 0.5, Rotation::Deg0)));

    // The evicted key is rasterized again.
    r.render(&store, &mut canvas, 0, 0.5, 0).await.unwrap();
    assert_eq!(r.rasterizer().calls, 12);
}

#[tokio::test]
async fn invalid_rotation_fails_without_rasterizing() {
    let store = small_store(1).await;
    let mut r = renderer(PatternRasterizer::default());
    let mut canvas = Canvas::new(3, 3);

    for deg in [45, -90, 360] {
        let err = r.render(&store, &mut canvas, 0, 1.0, deg).await.unwrap_err();
        assert!(matches!(err, SlideError::InvalidRotation(d) if d == deg));
    }
    assert_eq!(r.rasterizer().calls, 0);
    assert_eq!(canvas.size(), (3, 3));
}

#[tokio::test]
async fn invalid_scale_is_rejected() {
    let store = small_store(1).await;
    let mut r = renderer(PatternRasterizer::default());
    let mut canvas = Canvas::default();
    for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            r.render(&store, &mut canvas, 0, scale, 0).await,
            Err(SlideError::Validation(_))
        ));
    }
    assert_eq!(r.rasterizer().calls, 0);
}

#[tokio::test]
async fn out_of_range_index_draws_fallback() {
    let store = small_store(2).await;
    let mut r = renderer(PatternRasterizer::default());
    let mut canvas = Canvas::default();

    let out = r.render(&store, &mut canvas, 2, 1.0, 0).await.unwrap();
    assert!(out.is_fallback());
    assert!(matches!(
        out.error(),
        Some(SlideError::IndexOutOfRange { index: 2, count: 2 })
    ));
    assert_eq!(canvas.size(), (160, 90));
    assert!(canvas.snapshot().is_opaque());
    assert_eq!(r.rasterizer().calls, 0);
    assert!(r.cache().is_empty());
}

#[tokio::test]
async fn empty_store_falls_back_at_default_size() {
    let store = SlideStore::new(ScriptedConverter::default());
    let mut r = renderer(PatternRasterizer::default());
    let mut canvas = Canvas::default();

    let out = r.render(&store, &mut canvas, 0, 1.0, 0).await.unwrap();
    assert!(matches!(
        out.error(),
        Some(SlideError::IndexOutOfRange { index: 0, count: 0 })
    ));
    assert_eq!(canvas.size(), (1280, 720));
}

#[tokio::test]
async fn rasterizer_failure_draws_opaque_rotated_fallback() {
    let mut store = SlideStore::new(ScriptedConverter::new([Script::Slides(deck(3))]));
    store.load(&DocumentSource::new("deck.pptx")).await.unwrap();
    let mut r = renderer(PatternRasterizer::failing());
    let mut canvas = Canvas::default();

    let out = r.render(&store, &mut canvas, 1, 2.0, 90).await.unwrap();
    assert!(matches!(out.error(), Some(SlideError::Rasterization(_))));

    let (w, h) = canvas.size();
    assert_eq!((w, h), (1440, 2560));
    assert!(w >= 720 && h >= 1280);
    assert!(canvas.snapshot().is_opaque());
    assert!(r.cache().is_empty());
    assert_eq!(r.stats().fallbacks, 1);
}

#[tokio::test]
async fn fallback_is_not_cached() {
    let store = small_store(1).await;
    let mut r = renderer(PatternRasterizer::failing());
    let mut canvas = Canvas::default();

    r.render(&store, &mut canvas, 0, 1.0, 0).await.unwrap();
    r.render(&store, &mut canvas, 0, 1.0, 0).await.unwrap();
    assert_eq!(r.rasterizer().calls, 2);
    assert_eq!(r.stats().fallbacks, 2);
}

#[tokio::test]
async fn mis_sized_raster_is_a_rasterization_error() {
    let store = small_store(1).await;
    let mut r = renderer(PatternRasterizer {
        wrong_size: true,
        ..PatternRasterizer::default()
    });
    let mut canvas = Canvas::default();

    let out = r.render(&store, &mut canvas, 0, 1.0, 0).await.unwrap();
    match out.error() {
        Some(SlideError::Rasterization(m)) => assert!(m.contains("expected 176x99"), "{m}"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn raster_timeout_falls_back() {
    let store = small_store(1).await;
    let opts = RendererOpts {
        raster_timeout_ms: Some(5_000),
        ..test_opts()
    };
    let rasterizer = PatternRasterizer {
        hang: true,
        ..PatternRasterizer::default()
    };
    let mut r = Renderer::with_opts(rasterizer, opts).unwrap();
    let mut canvas = Canvas::default();

    let out = r.render(&store, &mut canvas, 0, 1.0, 0).await.unwrap();
    match out.error() {
        Some(SlideError::Rasterization(m)) => assert!(m.contains("timed out"), "{m}"),
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(canvas.size(), (160, 90));
}

#[tokio::test]
async fn reload_drops_cached_renders() {
    let converter = ScriptedConverter::new([
        Script::Slides(deck_sized(2, 160.0, 90.0)),
        Script::Slides(deck_sized(2, 160.0, 90.0)),
    ]);
    let mut store = SlideStore::with_opts(converter, small_store_opts()).unwrap();
    store.load(&DocumentSource::new("a.pptx")).await.unwrap();

    let mut r = renderer(PatternRasterizer::default());
    let mut canvas = Canvas::default();
    r.render(&store, &mut canvas, 0, 1.0, 0).await.unwrap();
    assert_eq!(r.cache().len(), 1);

    store.load(&DocumentSource::new("b.pptx")).await.unwrap();
    let out = r.render(&store, &mut canvas, 0, 1.0, 0).await.unwrap();
    assert!(matches!(out, RenderOutcome::Rendered { .. }));
    assert_eq!(r.rasterizer().calls, 2);
    assert_eq!(r.cache().len(), 1);
}

#[tokio::test]
async fn thumbnails_scale_to_width_and_label_failures() {
    let store = small_store(3).await;
    let mut r = renderer(PatternRasterizer::default());

    let thumbs = r.thumbnails(&store, 1, 10).await;
    assert_eq!(thumbs.len(), 2);
    assert_eq!(thumbs[0].index, 1);
    assert_eq!(thumbs[0].bitmap.width, 160);
    assert_eq!(thumbs[0].bitmap.height, 90);
    assert_eq!(thumbs[0].dpi, 96);
    assert!(thumbs[0].error.is_none());
    assert!(r.cache().is_empty());

    let mut failing = renderer(PatternRasterizer::failing());
    let thumbs = failing.thumbnails(&store, 0, 1).await;
    assert_eq!(thumbs.len(), 1);
    assert_eq!((thumbs[0].bitmap.width, thumbs[0].bitmap.height), (160, 90));
    assert!(thumbs[0].bitmap.is_opaque());
    assert!(matches!(thumbs[0].error, Some(SlideError::Rasterization(_))));
}

#[tokio::test]
async fn thumbnails_past_the_end_are_empty() {
    let store = small_store(2).await;
    let mut r = renderer(PatternRasterizer::default());
    assert!(r.thumbnails(&store, 5, 3).await.is_empty());
    assert_eq!(r.rasterizer().calls, 0);
}

#[test]
fn with_opts_validates() {
    let opts = RendererOpts {
        cache_capacity: 0,
        ..test_opts()
    };
    assert!(matches!(
        Renderer::with_opts(PatternRasterizer::default(), opts),
        Err(SlideError::Validation(_))
    ));
}
