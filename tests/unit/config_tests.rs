// Settings file tests
//
// These tests load YAML settings files from disk and feed them into a
// session, the way the command-line front end does.

use image::{Rgba, RgbaImage};
use watermark_studio::config::SettingsFile;
use watermark_studio::logging::LogFormat;
use watermark_studio::session::WatermarkSession;
use watermark_studio::watermark::{
    AnchorRatio, ImageDimensions, PositionPreset, TextColor, WatermarkKind,
};

#[test]
fn test_settings_file_with_image_asset_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let logo = dir.path().join("logo.png");
    RgbaImage::from_pixel(40, 20, Rgba([0, 255, 0, 255]))
        .save(&logo)
        .unwrap();

    std::env::set_var("WATERMARK_STUDIO_TEST_ASSET_DIR", dir.path());
    let yaml = r#"
watermark:
  kind: image
  size_percent: 50
  opacity_percent: 100
watermark_image: ${WATERMARK_STUDIO_TEST_ASSET_DIR}/logo.png
preset: top-right
"#;
    let path = dir.path().join("settings.yaml");
    std::fs::write(&path, yaml).unwrap();

    let file = SettingsFile::from_file(&path).unwrap();
    assert_eq!(file.watermark_image.as_deref(), Some(logo.as_path()));
    assert_eq!(file.watermark.anchor_ratio, AnchorRatio::new(0.92, 0.08));

    let session = WatermarkSession::from_settings_file(&file).unwrap();
    assert_eq!(session.preset(), PositionPreset::TopRight);
    let asset = session.processor().watermark_image_asset().unwrap();
    assert_eq!(asset.dimensions(), (40, 20));

    // 50% of 200 = 100 wide, aspect kept
    let sprite = session
        .processor()
        .create_watermark(ImageDimensions::new(200, 200), session.settings())
        .unwrap();
    assert_eq!(sprite.dimensions(), (100, 50));
}

#[test]
fn test_settings_file_with_missing_asset_fails() {
    let file = SettingsFile::from_yaml_with_env(
        "watermark:\n  kind: image\nwatermark_image: /no/such/logo.png\n",
    )
    .unwrap();
    assert!(WatermarkSession::from_settings_file(&file).is_err());
}

#[test]
fn test_color_spellings() {
    let cases = [
        ("\"#FFF\"", TextColor::new(255, 255, 255, 255)),
        ("\"#00FF0080\"", TextColor::new(0, 255, 0, 128)),
        ("[1, 2, 3]", TextColor::new(1, 2, 3, 255)),
        ("[1, 2, 3, 4]", TextColor::new(1, 2, 3, 4)),
    ];

    for (spelling, expected) in cases {
        let yaml = format!("watermark:\n  text_color: {}\n", spelling);
        let file = SettingsFile::from_yaml_with_env(&yaml).unwrap();
        assert_eq!(file.watermark.text_color, expected, "{}", spelling);
    }
}

#[test]
fn test_invalid_color_rejected() {
    let err = SettingsFile::from_yaml_with_env("watermark:\n  text_color: \"#GG0000\"\n")
        .unwrap_err();
    assert!(!err.is_empty());
}

#[test]
fn test_unknown_preset_rejected() {
    assert!(SettingsFile::from_yaml_with_env("preset: middle\n").is_err());
}

#[test]
fn test_logging_section() {
    let file =
        SettingsFile::from_yaml_with_env("logging:\n  format: text\n  level: warn\n").unwrap();
    assert_eq!(file.logging.format, LogFormat::Pretty);
    assert_eq!(file.logging.level, "warn");

    let file = SettingsFile::from_yaml_with_env("{}").unwrap();
    assert_eq!(file.logging.level, "info");
}

#[test]
fn test_kind_defaults_to_text() {
    let file = SettingsFile::from_yaml_with_env("watermark:\n  text: Only text\n").unwrap();
    assert_eq!(file.watermark.kind, WatermarkKind::Text);
    assert_eq!(file.watermark.opacity_percent, 50);
    assert_eq!(file.watermark.size_percent, 20);
}
