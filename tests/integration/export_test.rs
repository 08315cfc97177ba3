//! Export tests
//!
//! Format selection by extension, alpha handling per format and the
//! failures a user can run into when choosing an output path.

use super::common::{image_settings, solid};
use image::{ColorType, Rgba};
use watermark_studio::image_io::{ExportFormat, ImageError};
use watermark_studio::session::{SessionError, WatermarkSession};

fn session_with_logo() -> WatermarkSession {
    let mut session = WatermarkSession::default();
    session.set_background(solid(400, 300, [0, 0, 255, 255])).unwrap();
    session
        .set_watermark_image(solid(80, 80, [255, 255, 255, 255]))
        .unwrap();
    session.update_settings(image_settings(20, 60));
    session
}

#[test]
fn test_jpeg_export_drops_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("marked.jpg");

    let session = session_with_logo();
    let format = session.export(&path).unwrap();
    assert_eq!(format, ExportFormat::Jpeg);

    let decoded = image::open(&path).unwrap();
    assert_eq!(decoded.color(), ColorType::Rgb8);
    assert_eq!((decoded.width(), decoded.height()), (400, 300));

    // Flat areas survive compression close to the in-memory composite:
    // the logo interior at 60% white over blue, and the bare background
    let expected = session.render_export().unwrap();
    let decoded = decoded.to_rgb8();
    for (x, y) in [(200, 150), (185, 135), (20, 20), (380, 280)] {
        let want = expected.get_pixel(x, y);
        let got = decoded.get_pixel(x, y);
        for channel in 0..3 {
            assert!(
                got[channel].abs_diff(want[channel]) <= 6,
                "({}, {}): wrote {:?}, composite {:?}",
                x,
                y,
                got,
                want
            );
        }
    }
    assert_eq!(*expected.get_pixel(200, 150), Rgba([153, 153, 255, 255]));
}

#[test]
fn test_png_export_keeps_transparency() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("marked.png");

    let mut session = WatermarkSession::default();
    session.set_background(solid(200, 100, [0, 0, 0, 0])).unwrap();
    session.export(&path).unwrap();

    let decoded = image::open(&path).unwrap();
    assert!(decoded.color().has_alpha());
    let rgba = decoded.to_rgba8();
    // Corners are far from the watermark and stay fully transparent
    assert_eq!(rgba.get_pixel(0, 0)[3], 0);
    assert_eq!(rgba.get_pixel(199, 99)[3], 0);
}

#[test]
fn test_webp_export_keeps_transparency() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("marked.webp");

    let mut session = WatermarkSession::default();
    session.set_background(solid(64, 64, [0, 0, 0, 0])).unwrap();
    let format = session.export(&path).unwrap();
    assert_eq!(format, ExportFormat::WebP);

    let rgba = image::open(&path).unwrap().to_rgba8();
    assert_eq!(rgba.dimensions(), (64, 64));
    assert_eq!(rgba.get_pixel(0, 0)[3], 0);
}

#[test]
fn test_extension_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_with_logo();

    assert_eq!(
        session.export(&dir.path().join("A.PNG")).unwrap(),
        ExportFormat::Png
    );
    assert_eq!(
        session.export(&dir.path().join("B.JpEg")).unwrap(),
        ExportFormat::Jpeg
    );
}

#[test]
fn test_missing_output_directory_is_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("not-there");
    let path = missing.join("marked.png");

    let err = session_with_logo().export(&path).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Image(ImageError::OutputDirMissing { .. })
    ));
    assert!(!missing.exists());
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();

    for name in ["marked.tiff", "marked.gif", "marked"] {
        let err = session_with_logo()
            .export(&dir.path().join(name))
            .unwrap_err();
        assert!(
            matches!(err, SessionError::Image(ImageError::UnsupportedFormat { .. })),
            "{}: {:?}",
            name,
            err
        );
    }
}

#[test]
fn test_export_without_background_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("marked.png");

    let err = WatermarkSession::default().export(&path).unwrap_err();
    assert!(matches!(err, SessionError::NoBackground));
    assert!(!path.exists());
}
