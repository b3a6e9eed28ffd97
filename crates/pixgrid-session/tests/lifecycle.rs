//! Integration test: upload, repeated lookup, expiry.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use image::Rgba;
use pixgrid_pipeline::{ConvertParams, RgbaImage, convert};
use pixgrid_session::{ManualClock, SessionConfig, SessionStore};

fn photo() -> RgbaImage {
    RgbaImage::from_fn(64, 32, |x, y| {
        let r = u8::try_from(x * 4).unwrap_or(255);
        let g = u8::try_from(y * 8).unwrap_or(255);
        Rgba([r, g, 60, 255])
    })
}

#[tokio::test]
async fn repeated_conversions_leave_the_source_unchanged() {
    let clock = ManualClock::new();
    let store = SessionStore::with_clock(SessionConfig::default(), clock.clone());
    let source = photo();
    let id = store.create(source.clone()).await.unwrap();

    for (size, colors) in [(32, 0), (16, 8), (64, 27), (8, 3)] {
        let image = store.get(id.as_str()).await.unwrap();
        let out = convert(&image, &ConvertParams::new(size, 2, colors)).unwrap();
        assert_eq!(out.width(), size * 2);
        clock.advance(Duration::from_secs(60));
    }

    assert_eq!(*store.get(id.as_str()).await.unwrap(), source);
}

#[tokio::test]
async fn expired_session_requires_a_new_upload() {
    let clock = ManualClock::new();
    let store = Arc::new(SessionStore::with_clock(
        SessionConfig::default(),
        clock.clone(),
    ));
    let id = store.create(photo()).await.unwrap();

    clock.advance(Duration::from_secs(31 * 60));
    assert_eq!(store.reap_expired().await, 1);
    assert!(store.get(id.as_str()).await.is_none());

    let again = store.create(photo()).await.unwrap();
    assert_ne!(again, id);
    assert!(store.get(again.as_str()).await.is_some());
}
