//! Preview tests
//!
//! The preview must show exactly what an export of the preview copy would
//! produce, placed centered on the display surface.

use super::common::{gradient, image_settings, solid, text_settings};
use watermark_studio::session::WatermarkSession;
use watermark_studio::watermark::{ImageDimensions, PixelPoint, PositionPreset};

#[test]
fn test_preview_matches_export_at_preview_size() {
    let mut session = WatermarkSession::default();
    session.set_background(gradient(1800, 1200)).unwrap();
    session.update_settings(text_settings("Preview", 25, 70));
    session.apply_preset(PositionPreset::BottomLeft);

    let background = session.background().unwrap();
    let expected = session
        .processor()
        .export_composite(background.preview(), session.settings())
        .unwrap();

    assert_eq!(session.preview_composite().unwrap(), expected);
}

#[test]
fn test_preview_frame_layout() {
    let mut session = WatermarkSession::new(ImageDimensions::new(800, 800));
    session.set_background(solid(1600, 800, [20, 20, 20, 255])).unwrap();

    let frame = session.render_preview().unwrap();
    assert_eq!(frame.image.dimensions(), (800, 800));
    assert_eq!(frame.display_rect.as_tuple(), (0, 200, 800, 400));

    let composite = session.preview_composite().unwrap();
    for (x, y) in [(0, 0), (400, 200), (799, 399)] {
        assert_eq!(
            frame.image.get_pixel(x, y + 200),
            composite.get_pixel(x, y),
            "({}, {})",
            x,
            y
        );
    }
    assert_eq!(frame.image.get_pixel(400, 100)[3], 0);
}

#[test]
fn test_small_background_is_not_upscaled() {
    let mut session = WatermarkSession::default();
    session.set_background(solid(300, 200, [0, 0, 0, 255])).unwrap();

    assert_eq!(session.display_rect().as_tuple(), (300, 200, 300, 200));
}

#[test]
fn test_drag_in_preview_drives_export_position() {
    let mut session = WatermarkSession::default();
    session.set_background(solid(1800, 1200, [0, 0, 0, 255])).unwrap();
    session
        .set_watermark_image(solid(90, 90, [255, 255, 255, 255]))
        .unwrap();
    session.update_settings(image_settings(10, 100));

    // Preview is 900x600 at the origin; the 90px sprite sits on (450, 300)
    assert!(session.begin_drag(PixelPoint::new(450.0, 300.0)).unwrap());
    session.drag_to(PixelPoint::new(225.0, 150.0)).unwrap();
    session.end_drag();
    assert_eq!(session.preset(), PositionPreset::Custom);

    // Anchor (0.25, 0.25) lands on (450, 300) at full resolution
    let export = session.render_export().unwrap();
    assert!(export.get_pixel(450, 300)[0] >= 250);
    assert_eq!(export.get_pixel(900, 600)[0], 0);
}

#[test]
fn test_surface_resize_keeps_settings() {
    let mut session = WatermarkSession::default();
    session.set_background(solid(1800, 1200, [0, 0, 0, 255])).unwrap();
    session.apply_preset(PositionPreset::TopRight);

    session
        .set_surface_size(ImageDimensions::new(450, 450))
        .unwrap();
    assert_eq!(session.display_rect().as_tuple(), (0, 75, 450, 300));
    assert_eq!(session.preset(), PositionPreset::TopRight);
}
