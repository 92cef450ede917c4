use std::fs;
use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use qrchitect::style::{EyeBallShape, EyeFrameShape, ModuleShape};
use qrchitect::{
    ContentCategory, EngineOptions, ExportFormat, HexColor, LogoAsset, PreviewSession, QrConfig,
    QrError, RenderOutcome, StyledQrEngine, Surface,
};
use tempfile::TempDir;

fn session(config: QrConfig) -> PreviewSession<StyledQrEngine> {
    PreviewSession::new(Surface::default(), EngineOptions::default(), config)
}

fn phone_config() -> QrConfig {
    QrConfig {
        category: ContentCategory::Phone,
        content: "555-1234".to_string(),
        ..QrConfig::default()
    }
}

fn decode_png(bytes: &[u8]) -> String {
    let img = image::load_from_memory(bytes).expect("Failed to load exported PNG");
    let mut prepared = rqrr::PreparedImage::prepare(img.to_luma8());
    let grids = prepared.detect_grids();
    assert!(!grids.is_empty(), "No QR code found in exported image");
    let (_, content) = grids[0].decode().expect("Failed to decode QR code");
    content
}

fn logo_png() -> Vec<u8> {
    let img = RgbaImage::from_pixel(16, 16, Rgba([0, 200, 0, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode logo");
    bytes
}

#[test]
fn test_export_png_and_svg_to_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output_dir = temp_dir.path().join("qr_output");

    let mut session = session(phone_config());
    assert!(session.render().expect("Render failed").is_rendered());

    for format in [ExportFormat::Png, ExportFormat::Svg] {
        let artifact = session.export(format).expect("Export failed");
        let path = artifact.write_to(&output_dir).expect("Write failed");

        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("qrchitect-Phone-"), "unexpected name {}", name);
        assert!(name.ends_with(&format!(".{}", format.extension())));
        let millis = &name["qrchitect-Phone-".len()..name.len() - 4];
        assert!(millis.parse::<i64>().is_ok(), "timestamp missing in {}", name);
    }

    let count = fs::read_dir(&output_dir).expect("Failed to read output dir").count();
    assert_eq!(count, 2);
}

#[test]
fn test_exported_png_scans_back() {
    let options = EngineOptions {
        margin: 40,
        ..EngineOptions::default()
    };
    let mut session: PreviewSession<StyledQrEngine> =
        PreviewSession::new(Surface::square(400), options, phone_config());
    session.render().expect("Render failed");

    let artifact = session.export(ExportFormat::Png).expect("Export failed");
    assert_eq!(decode_png(&artifact.bytes), "tel:555-1234");

    session
        .select_category(ContentCategory::Url)
        .expect("Render failed");
    session
        .set_content("example.org/path")
        .expect("Render failed");
    assert_eq!(session.request().unwrap().data, "https://example.org/path");

    let artifact = session.export(ExportFormat::Png).expect("Export failed");
    assert_eq!(decode_png(&artifact.bytes), "https://example.org/path");
}

#[test]
fn test_dark_background_keeps_dimensions() {
    let config = QrConfig {
        background: "#101010".parse::<HexColor>().unwrap(),
        ..phone_config()
    };
    let mut session = session(config);
    session.render().expect("Render failed");

    let artifact = session.export(ExportFormat::Png).expect("Export failed");
    let img = image::load_from_memory(&artifact.bytes).expect("Failed to load PNG");
    assert_eq!((img.width(), img.height()), (300, 300));
    assert_eq!(img.to_rgba8().get_pixel(0, 0), &Rgba([0x10, 0x10, 0x10, 255]));
}

#[test]
fn test_config_file_drives_render_request() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("style.json");
    fs::write(
        &path,
        r##"{
            "contentType": "email",
            "content": "hello@example.com",
            "useGradient": true,
            "gradientStartColor": "#ff0000",
            "gradientEndColor": "#0000ff",
            "gradientAngle": 90,
            "dotStyle": "dots",
            "eyeStyle": "rounded",
            "eyeballStyle": "diamond"
        }"##,
    )
    .expect("Failed to write config");

    let config = QrConfig::load(&path).expect("Failed to load config");
    assert_eq!(config.shapes.module, ModuleShape::Dots);
    assert_eq!(config.shapes.eye_frame, EyeFrameShape::Rounded);
    assert_eq!(config.shapes.eye_ball, EyeBallShape::Diamond);

    let mut session = session(config);
    session.render().expect("Render failed");

    let json = serde_json::to_value(session.request().unwrap()).expect("Serialize failed");
    assert_eq!(json["data"], "mailto:hello@example.com");
    assert_eq!(json["dotsOptions"]["type"], "dots");
    assert_eq!(json["dotsOptions"]["color"], serde_json::Value::Null);
    assert_eq!(json["dotsOptions"]["gradient"]["start"], "#ff0000");
    assert_eq!(json["dotsOptions"]["gradient"]["angle"], 90);
    assert_eq!(json["cornersSquareOptions"]["type"], "extra-rounded");
    assert_eq!(json["cornersDotOptions"]["type"], "dot");
    assert_eq!(json["backgroundOptions"]["color"], "#ffffff");
    assert!(json.get("image").is_none());

    let svg = session.export(ExportFormat::Svg).expect("Export failed");
    let svg = String::from_utf8(svg.bytes).expect("SVG is not UTF-8");
    assert!(svg.contains("<linearGradient"));
    assert!(svg.contains("#ff0000"));
}

#[test]
fn test_empty_content_skips_and_keeps_frame() {
    let mut session = session(phone_config());
    session.render().expect("Render failed");
    let before = session.export(ExportFormat::Svg).expect("Export failed").bytes;

    match session.set_content("").expect("Render failed") {
        RenderOutcome::Skipped(QrError::EmptyContent) => {}
        other => panic!("expected skipped render, got {:?}", other),
    }

    let after = session.export(ExportFormat::Svg).expect("Export failed").bytes;
    assert_eq!(before, after);
}

#[test]
fn test_zero_surface_is_unavailable() {
    let mut session: PreviewSession<StyledQrEngine> = PreviewSession::new(
        Surface::square(0),
        EngineOptions::default(),
        phone_config(),
    );
    assert!(matches!(
        session.render(),
        Err(QrError::EngineUnavailable(_))
    ));
    assert!(matches!(
        session.export(ExportFormat::Png),
        Err(QrError::EngineUnavailable(_))
    ));
}

#[tokio::test]
async fn test_logo_lands_in_svg_export() {
    let mut session = session(phone_config());
    session.render().expect("Render failed");
    session.set_logo(LogoAsset::new(logo_png()).with_name("logo.png"));

    let outcome = session
        .next_logo()
        .await
        .expect("No logo update")
        .expect("Render failed");
    assert!(outcome.is_rendered());
    assert!(session.logo_error().is_none());

    let svg = session.export(ExportFormat::Svg).expect("Export failed");
    let svg = String::from_utf8(svg.bytes).expect("SVG is not UTF-8");
    assert!(svg.contains("data:image/png;base64,"));

    session.clear_logo().expect("Render failed");
    assert!(session.request().unwrap().image.is_none());
}

#[tokio::test]
async fn test_svg_logo_lands_in_png_export() {
    let config = QrConfig {
        category: ContentCategory::Text,
        content: "hello".to_string(),
        ..QrConfig::default()
    };
    let mut session = session(config);
    session.render().expect("Render failed");

    let logo = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#ff0000"/></svg>"##;
    session.set_logo(LogoAsset::new(logo.to_vec()).with_name("logo.svg"));
    session
        .next_logo()
        .await
        .expect("No logo update")
        .expect("Render failed");
    assert!(session.logo_error().is_none());

    let artifact = session.export(ExportFormat::Png).expect("Export failed");
    let img = image::load_from_memory(&artifact.bytes)
        .expect("Failed to load PNG")
        .to_rgba8();
    let red = img
        .pixels()
        .filter(|p| p.0[0] > 200 && p.0[1] < 50 && p.0[2] < 50)
        .count();
    assert!(red > 100, "SVG logo missing from PNG export ({} red pixels)", red);
    assert_eq!(img.get_pixel(150, 150).0, [255, 0, 0, 255]);
}

#[tokio::test]
async fn test_broken_logo_renders_without_it() {
    let mut session = session(phone_config());
    session.set_logo(LogoAsset::new(b"definitely not an image".to_vec()));

    let outcome = session
        .next_logo()
        .await
        .expect("No logo update")
        .expect("Render failed");
    assert!(outcome.is_rendered());
    assert!(matches!(session.logo_error(), Some(QrError::LogoDecode(_))));
    assert!(session.request().unwrap().image.is_none());
}
