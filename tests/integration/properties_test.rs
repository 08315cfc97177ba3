//! Rendering properties that must hold for any settings
//!
//! Opacity ordering, rotation periodicity, size targeting and the
//! behavior of degenerate inputs.

use super::common::{gradient, image_settings, red_sum, solid, text_settings};
use rstest::rstest;
use image::RgbaImage;
use watermark_studio::watermark::{
    AnchorRatio, ImageDimensions, WatermarkKind, WatermarkProcessor, WatermarkSettings,
};

fn processor_with_asset(width: u32, height: u32) -> WatermarkProcessor {
    let mut processor = WatermarkProcessor::new();
    processor
        .set_watermark_image_asset(solid(width, height, [255, 255, 255, 255]))
        .unwrap();
    processor
}

#[test]
fn test_image_kind_without_asset_leaves_background_untouched() {
    let processor = WatermarkProcessor::new();
    let original = gradient(640, 480);

    let result = processor
        .export_composite(&original, &image_settings(30, 100))
        .unwrap();
    assert_eq!(result, original);
}

#[test]
fn test_blank_text_leaves_background_untouched() {
    let processor = WatermarkProcessor::new();
    let original = gradient(320, 240);

    for text in ["", "   "] {
        let result = processor
            .export_composite(&original, &text_settings(text, 20, 100))
            .unwrap();
        assert_eq!(result, original, "text {:?}", text);
    }
}

#[test]
fn test_zero_opacity_is_invisible() {
    let original = gradient(500, 400);

    let text = WatermarkProcessor::new()
        .export_composite(&original, &text_settings("Hidden", 40, 0))
        .unwrap();
    assert_eq!(text, original);

    let image = processor_with_asset(100, 100)
        .export_composite(&original, &image_settings(40, 0))
        .unwrap();
    assert_eq!(image, original);
}

#[test]
fn test_text_opacity_is_monotonic() {
    let processor = WatermarkProcessor::new();
    let black = solid(500, 300, [0, 0, 0, 255]);

    let sums: Vec<u64> = [0, 25, 50, 75, 100]
        .iter()
        .map(|&opacity| {
            let result = processor
                .export_composite(&black, &text_settings("Opacity", 40, opacity))
                .unwrap();
            red_sum(&result)
        })
        .collect();

    assert_eq!(sums[0], 0);
    for pair in sums.windows(2) {
        assert!(pair[0] < pair[1], "{:?}", sums);
    }
}

#[rstest]
#[case::text_flat(WatermarkKind::Text, 0)]
#[case::text_rotated(WatermarkKind::Text, 30)]
#[case::image_flat(WatermarkKind::Image, 0)]
#[case::image_rotated(WatermarkKind::Image, 30)]
fn test_raising_opacity_never_lowers_any_pixel(
    #[case] kind: WatermarkKind,
    #[case] rotation: i32,
) {
    let processor = processor_with_asset(120, 60);
    let size = ImageDimensions::new(400, 300);
    let mut previous: Option<RgbaImage> = None;

    for opacity in (0..=100).step_by(5) {
        let mut settings = match kind {
            WatermarkKind::Text => text_settings("Sample Watermark", 30, opacity),
            WatermarkKind::Image => image_settings(30, opacity),
        };
        settings.rotation_degrees = rotation;
        let overlay = processor.create_overlay(size, &settings).unwrap();

        if let Some(previous) = &previous {
            for (x, y, pixel) in overlay.enumerate_pixels() {
                let before = previous.get_pixel(x, y)[3];
                assert!(
                    pixel[3] >= before,
                    "opacity {} lowered ({}, {}) from {} to {}",
                    opacity,
                    x,
                    y,
                    before,
                    pixel[3]
                );
            }
        }
        previous = Some(overlay);
    }
}

#[test]
fn test_image_opacity_scales_alpha() {
    // 100px asset on a 500px background at 20% keeps its size
    let processor = processor_with_asset(100, 100);
    let black = solid(500, 500, [0, 0, 0, 255]);

    let centers: Vec<u8> = [0, 25, 50, 75, 100]
        .iter()
        .map(|&opacity| {
            let result = processor
                .export_composite(&black, &image_settings(20, opacity))
                .unwrap();
            result.get_pixel(250, 250)[0]
        })
        .collect();

    assert_eq!(centers, vec![0, 64, 128, 191, 255]);
}

#[test]
fn test_rendering_is_idempotent() {
    let processor = processor_with_asset(64, 32);
    let original = gradient(800, 600);
    let mut settings = image_settings(25, 65);
    settings.rotation_degrees = 33;

    let first = processor.export_composite(&original, &settings).unwrap();
    let second = processor.export_composite(&original, &settings).unwrap();
    assert_eq!(first, second);

    let text = text_settings("Again", 30, 55);
    let first = processor.export_composite(&original, &text).unwrap();
    let second = processor.export_composite(&original, &text).unwrap();
    assert_eq!(first, second);
}

#[rstest]
#[case(0, 360)]
#[case(-90, 270)]
#[case(45, 405)]
#[case(-30, 330)]
fn test_rotation_is_periodic(#[case] a: i32, #[case] b: i32) {
    let processor = processor_with_asset(80, 40);
    let size = ImageDimensions::new(600, 400);

    let render = |rotation: i32, base: WatermarkSettings| {
        let settings = WatermarkSettings {
            rotation_degrees: rotation,
            ..base
        };
        processor.create_watermark(size, &settings).unwrap()
    };

    assert_eq!(
        render(a, image_settings(20, 80)),
        render(b, image_settings(20, 80))
    );
    assert_eq!(
        render(a, text_settings("Spin", 20, 80)),
        render(b, text_settings("Spin", 20, 80))
    );
}

#[test]
fn test_quarter_turn_swaps_dimensions() {
    let processor = processor_with_asset(200, 100);
    let size = ImageDimensions::new(1000, 1000);
    let mut settings = image_settings(20, 100);

    settings.rotation_degrees = 90;
    let sprite = processor.create_watermark(size, &settings).unwrap();
    assert_eq!(sprite.dimensions(), (100, 200));

    settings.rotation_degrees = 180;
    let sprite = processor.create_watermark(size, &settings).unwrap();
    assert_eq!(sprite.dimensions(), (200, 100));
}

#[test]
fn test_arbitrary_rotation_expands_canvas() {
    let processor = processor_with_asset(200, 100);
    let mut settings = image_settings(20, 100);
    settings.rotation_degrees = 45;

    let sprite = processor
        .create_watermark(ImageDimensions::new(1000, 1000), &settings)
        .unwrap();
    // (200 + 100) * cos 45 = 212.1
    assert_eq!(sprite.dimensions(), (213, 213));
    // Corners of the expanded canvas are transparent
    assert_eq!(sprite.get_pixel(0, 0)[3], 0);
}

#[rstest]
#[case(1000, 20, 200)]
#[case(999, 15, 150)]
#[case(640, 100, 640)]
#[case(10, 1, 1)]
fn test_image_width_follows_size_percent(
    #[case] background_width: u32,
    #[case] size_percent: u32,
    #[case] expected: u32,
) {
    let processor = processor_with_asset(50, 50);
    let sprite = processor
        .create_watermark(
            ImageDimensions::new(background_width, 500),
            &image_settings(size_percent, 100),
        )
        .unwrap();
    assert_eq!(sprite.width(), expected);
    assert_eq!(sprite.height(), expected);
}

#[test]
fn test_anchor_is_clamped() {
    assert_eq!(AnchorRatio::new(1.5, -0.2), AnchorRatio::new(1.0, 0.0));

    let mut settings = WatermarkSettings::default();
    settings.set_anchor(-3.0, 7.0);
    assert_eq!(settings.anchor_ratio, AnchorRatio::new(0.0, 1.0));
}

#[test]
fn test_out_of_range_anchor_lands_on_corner() {
    let processor = processor_with_asset(100, 100);
    let mut settings = image_settings(20, 100);
    settings.anchor_ratio = AnchorRatio::from((1.5, -0.2));
    assert_eq!((settings.anchor_ratio.x(), settings.anchor_ratio.y()), (1.0, 0.0));

    // Clamped to the top-right corner: a quarter of the sprite shows there
    let overlay = processor
        .create_overlay(ImageDimensions::new(500, 500), &settings)
        .unwrap();
    let painted = overlay.pixels().filter(|p| p[3] > 0).count();
    assert_eq!(painted, 50 * 50);
    assert_eq!(overlay.get_pixel(499, 0)[3], 255);
}

#[test]
fn test_corner_anchor_clips_sprite() {
    let processor = processor_with_asset(100, 100);
    let mut settings = image_settings(20, 100);
    settings.anchor_ratio = AnchorRatio::new(1.0, 1.0);

    // 100px sprite centered on (500, 500): only the top-left quarter shows
    let overlay = processor
        .create_overlay(ImageDimensions::new(500, 500), &settings)
        .unwrap();
    let painted = overlay.pixels().filter(|p| p[3] > 0).count();
    assert_eq!(painted, 50 * 50);
}
