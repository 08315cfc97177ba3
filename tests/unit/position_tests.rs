// Positioning tests
//
// Anchors are fractions of the background, so a point picked on the
// preview must land on the same relative spot at any resolution.

use rstest::rstest;
use watermark_studio::watermark::{
    placement_center, ratio_from_pixel, top_left_from_center, AnchorRatio, ImageDimensions,
    PixelPoint, PlacementPosition, PositionPreset, WatermarkDimensions,
};

#[rstest]
#[case(PositionPreset::TopLeft, (80, 64))]
#[case(PositionPreset::Center, (500, 400))]
#[case(PositionPreset::BottomRight, (920, 736))]
#[case(PositionPreset::CenterRight, (920, 400))]
fn test_presets_on_1000x800(#[case] preset: PositionPreset, #[case] expected: (i64, i64)) {
    let ratio = preset.ratio().unwrap();
    let center = placement_center(ratio, &ImageDimensions::new(1000, 800));
    assert_eq!((center.x.round() as i64, center.y.round() as i64), expected);
}

#[test]
fn test_preview_point_maps_to_same_spot_in_original() {
    let preview = ImageDimensions::new(900, 600);
    let original = ImageDimensions::new(3600, 2400);
    let origin = PixelPoint::new(0.0, 0.0);

    let ratio = ratio_from_pixel(PixelPoint::new(300.0, 150.0), origin, &preview);
    assert_eq!(ratio, AnchorRatio::new(300.0 / 900.0, 0.25));

    let center = placement_center(ratio, &original);
    assert!((center.x - 1200.0).abs() < 1e-9);
    assert!((center.y - 600.0).abs() < 1e-9);
}

#[test]
fn test_offset_preview_origin() {
    // 900x300 preview centered on a 900x600 surface
    let preview = ImageDimensions::new(900, 300);
    let origin = PixelPoint::new(0.0, 150.0);

    let ratio = ratio_from_pixel(PixelPoint::new(450.0, 150.0), origin, &preview);
    assert_eq!(ratio, AnchorRatio::new(0.5, 0.0));

    let ratio = ratio_from_pixel(PixelPoint::new(450.0, 600.0), origin, &preview);
    assert_eq!(ratio, AnchorRatio::new(0.5, 1.0));
}

#[test]
fn test_odd_sprite_is_centered_with_half_up_rounding() {
    let center = PixelPoint::new(500.0, 400.0);
    let sprite = WatermarkDimensions {
        width: 201,
        height: 99,
    };
    // 500 - 100.5 = 399.5 -> 400, 400 - 49.5 = 350.5 -> 351
    assert_eq!(
        top_left_from_center(center, &sprite),
        PlacementPosition::new(400, 351)
    );
}
