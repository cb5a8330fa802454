use std::time::Duration;

use super::*;
use crate::foundation::core::Rect;
use crate::store::convert::ElementBox;
use crate::test_support::{Script, ScriptedConverter, deck, deck_sized};

fn src() -> DocumentSource {
    DocumentSource::new("deck.pptx")
}

fn store(scripts: impl IntoIterator<Item = Script>) -> SlideStore<ScriptedConverter> {
    SlideStore::new(ScriptedConverter::new(scripts))
}

#[tokio::test]
async fn load_installs_presentation_and_measures_slides() {
    let mut store = store([Script::Slides(deck(3))]);
    assert_eq!(store.generation(), 0);

    let p = store.load(&src()).await.unwrap();
    assert_eq!(p.len(), 3);
    assert_eq!(store.slide_count(), 3);
    assert_eq!(store.dimensions(), Size::new(1280.0, 720.0));
    assert_eq!(store.generation(), 1);

    let slide = store.slide_at(2).unwrap();
    assert_eq!(slide.markup(), "slide-2");
    assert_eq!(slide.measured_height(), 720.0);
    assert_eq!(slide.measured_width(), 1280.0);
}

#[tokio::test]
async fn tall_content_extends_measured_height() {
    let mut doc = deck(1);
    doc.slides[0].boxes.push(
        ElementBox::new(Rect::new(100.0, 600.0, 400.0, 900.0)).with_margin_bottom(10.0),
    );
    let mut store = store([Script::Slides(doc)]);
    store.load(&src()).await.unwrap();
    assert_eq!(store.slide_at(0).unwrap().measured_height(), 960.0);
}

#[tokio::test]
async fn resource_base_is_kept_with_the_slide() {
    let mut doc = deck(2);
    doc.slides[1] = doc.slides[1].clone().with_resources_dir("decks/q3");
    let mut store = store([Script::Slides(doc)]);
    store.load(&src()).await.unwrap();
    assert_eq!(store.slide_at(0).unwrap().resources_dir(), None);
    assert_eq!(
        store.slide_at(1).unwrap().resources_dir(),
        Some(std::path::Path::new("decks/q3"))
    );
}

#[test]
fn nothing_loaded_reports_defaults() {
    let store = store([]);
    assert_eq!(store.slide_count(), 0);
    assert_eq!(store.dimensions(), Size::new(1280.0, 720.0));
    assert!(store.presentation().is_none());
    match store.slide_at(0) {
        Err(SlideError::IndexOutOfRange { index: 0, count: 0 }) => {}
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn slide_at_rejects_indices_past_the_end() {
    let mut store = store([Script::Slides(deck(3))]);
    store.load(&src()).await.unwrap();
    assert!(store.slide_at(0).is_ok());
    match store.slide_at(3) {
        Err(SlideError::IndexOutOfRange { index: 3, count: 3 }) => {}
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn unresponsive_converter_times_out_and_is_aborted() {
    let mut store = store([Script::Never]);
    let err = store.load(&src()).await.unwrap_err();
    assert!(matches!(err, SlideError::ConversionTimeout(d) if d == Duration::from_secs(30)));
    assert_eq!(store.collaborator().aborts, 1);
    assert_eq!(store.slide_count(), 0);
    assert_eq!(store.generation(), 0);
}

#[tokio::test(start_paused = true)]
async fn timeout_keeps_previous_presentation() {
    let mut store = store([Script::Slides(deck(2)), Script::Never]);
    store.load(&src()).await.unwrap();
    assert!(matches!(
        store.load(&src()).await,
        Err(SlideError::ConversionTimeout(_))
    ));
    assert_eq!(store.slide_count(), 2);
    assert_eq!(store.generation(), 1);
}

#[tokio::test]
async fn zero_slides_is_a_conversion_error() {
    let mut store = store([Script::Slides(ConvertedDocument::default())]);
    let err = store.load(&src()).await.unwrap_err();
    assert!(matches!(err, SlideError::Conversion(ref m) if m.contains("no slides")));
    assert_eq!(store.slide_count(), 0);
}

#[tokio::test]
async fn reported_failure_is_a_conversion_error() {
    let mut store = store([Script::Fail("corrupt archive")]);
    let err = store.load(&src()).await.unwrap_err();
    assert!(matches!(err, SlideError::Conversion(ref m) if m.contains("corrupt archive")));
}

#[tokio::test]
async fn synchronous_start_failure_is_a_conversion_error() {
    let mut store = store([Script::RefuseToStart]);
    let err = store.load(&src()).await.unwrap_err();
    match err {
        SlideError::Conversion(m) => {
            assert!(m.starts_with("failed to start conversion"), "{m}");
            assert!(m.contains("engine unavailable"), "{m}");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_declared_size_is_rejected() {
    let mut store = store([Script::Slides(deck_sized(1, 0.0, 720.0))]);
    assert!(matches!(
        store.load(&src()).await,
        Err(SlideError::Conversion(_))
    ));
    assert_eq!(store.generation(), 0);
}

#[tokio::test(start_paused = true)]
async fn retries_until_an_attempt_succeeds() {
    let opts = StoreOpts {
        conversion_attempts: 3,
        ..StoreOpts::default()
    };
    let converter = ScriptedConverter::new([
        Script::Fail("busy"),
        Script::Never,
        Script::Slides(deck(4)),
    ]);
    let mut store = SlideStore::with_opts(converter, opts).unwrap();

    let started = tokio::time::Instant::now();
    store.load(&src()).await.unwrap();
    assert_eq!(store.slide_count(), 4);
    assert_eq!(store.collaborator().begins, 3);
    assert_eq!(store.collaborator().aborts, 1);
    // Two retry pauses plus one full timeout.
    assert_eq!(started.elapsed(), Duration::from_secs(34));
}

#[tokio::test(start_paused = true)]
async fn retries_surface_the_last_error() {
    let opts = StoreOpts {
        conversion_attempts: 2,
        ..StoreOpts::default()
    };
    let converter = ScriptedConverter::new([Script::Never, Script::Fail("still broken")]);
    let mut store = SlideStore::with_opts(converter, opts).unwrap();
    let err = store.load(&src()).await.unwrap_err();
    assert!(matches!(err, SlideError::Conversion(ref m) if m.contains("still broken")));
}

#[tokio::test(start_paused = true)]
async fn slow_converter_within_bound_succeeds() {
    let mut store = store([Script::Delayed(Duration::from_secs(29), deck(1))]);
    store.load(&src()).await.unwrap();
    assert_eq!(store.slide_count(), 1);
    assert_eq!(store.collaborator().aborts, 0);
}

#[tokio::test]
async fn reload_replaces_presentation_and_bumps_generation() {
    let mut store = store([Script::Slides(deck(3)), Script::Slides(deck(5))]);
    store.load(&src()).await.unwrap();
    store.load(&src()).await.unwrap();
    assert_eq!(store.slide_count(), 5);
    assert_eq!(store.generation(), 2);
}

#[tokio::test]
async fn markup_hook_runs_before_measurement() {
    let mut store = store([Script::Slides(deck(2))]);
    store.set_markup_hook(|slide| {
        slide.markup = slide.markup.replace("slide", "patched");
        slide
            .boxes
            .push(ElementBox::new(Rect::new(0.0, 0.0, 10.0, 1000.0)));
    });
    store.load(&src()).await.unwrap();
    let slide = store.slide_at(1).unwrap();
    assert_eq!(slide.markup(), "patched-1");
    assert_eq!(slide.measured_height(), 1050.0);
}

#[tokio::test]
async fn dispose_is_idempotent() {
    let mut store = store([Script::Slides(deck(3))]);
    store.load(&src()).await.unwrap();

    store.dispose();
    assert_eq!(store.slide_count(), 0);
    assert_eq!(store.generation(), 2);
    assert!(matches!(
        store.slide_at(0),
        Err(SlideError::IndexOutOfRange { .. })
    ));

    store.dispose();
    assert_eq!(store.generation(), 2);
    assert_eq!(store.collaborator().releases, 2);
}

#[test]
fn with_opts_validates() {
    let opts = StoreOpts {
        conversion_attempts: 0,
        ..StoreOpts::default()
    };
    assert!(matches!(
        SlideStore::with_opts(ScriptedConverter::default(), opts),
        Err(SlideError::Validation(_))
    ));
}
