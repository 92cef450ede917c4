//! A preview session: owns one configuration, one engine instance and the
//! logo decoder, and re-resolves everything after each change.

use crate::config::{EngineOptions, LogoAsset, LogoInput, QrConfig, Surface};
use crate::content::{suggest_default, ContentCategory};
use crate::engine::RenderEngine;
use crate::error::{QrError, QrResult};
use crate::export::{export_file_name, ExportArtifact, ExportFormat};
use crate::logo::LogoDecoder;
use crate::resolve::{RenderRequest, StyleResolver};

/// Result of a render attempt that did not hit a fatal engine error.
#[derive(Debug)]
pub enum RenderOutcome {
    /// The engine drew a new frame; `constructed` is true for the first one.
    Rendered { constructed: bool },
    /// The configuration is not renderable yet; the previous frame stays.
    Skipped(QrError),
}

impl RenderOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderOutcome::Rendered { .. })
    }
}

enum EngineSlot<E> {
    Empty,
    Live(E),
    Unavailable(String),
}

pub struct PreviewSession<E: RenderEngine> {
    surface: Surface,
    resolver: StyleResolver,
    config: QrConfig,
    engine: EngineSlot<E>,
    logo: LogoDecoder,
    logo_uri: Option<String>,
    logo_error: Option<QrError>,
    request: Option<RenderRequest>,
}

impl<E: RenderEngine> PreviewSession<E> {
    /// Create a session. Nothing is rendered until the first `render`/`apply`.
    ///
    /// A logo in `config` is scheduled for decoding, which needs a tokio runtime.
    pub fn new(surface: Surface, options: EngineOptions, config: QrConfig) -> Self {
        let mut session = PreviewSession {
            surface,
            resolver: StyleResolver::new(options),
            config,
            engine: EngineSlot::Empty,
            logo: LogoDecoder::new(),
            logo_uri: None,
            logo_error: None,
            request: None,
        };
        session.sync_logo_input();
        session
    }

    pub fn config(&self) -> &QrConfig {
        &self.config
    }

    /// The request behind the currently displayed frame.
    pub fn request(&self) -> Option<&RenderRequest> {
        self.request.as_ref()
    }

    pub fn engine(&self) -> Option<&E> {
        match &self.engine {
            EngineSlot::Live(engine) => Some(engine),
            EngineSlot::Empty | EngineSlot::Unavailable(_) => None,
        }
    }

    pub fn is_constructed(&self) -> bool {
        matches!(self.engine, EngineSlot::Live(_))
    }

    pub fn logo_pending(&self) -> bool {
        self.logo.is_pending()
    }

    /// Failure of the most recent logo decode, if it failed.
    pub fn logo_error(&self) -> Option<&QrError> {
        self.logo_error.as_ref()
    }

    /// Replace the whole configuration and render.
    pub fn apply(&mut self, config: QrConfig) -> QrResult<RenderOutcome> {
        let logo_changed = config.logo != self.config.logo;
        self.config = config;
        if logo_changed {
            self.sync_logo_input();
        }
        self.render()
    }

    /// Switch category, swapping in a sample value if the content does not fit it.
    pub fn select_category(&mut self, category: ContentCategory) -> QrResult<RenderOutcome> {
        if category != self.config.category {
            self.config.content = suggest_default(category, &self.config.content);
            self.config.category = category;
        }
        self.render()
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> QrResult<RenderOutcome> {
        self.config.content = content.into();
        self.render()
    }

    pub fn toggle_fill_mode(&mut self) -> QrResult<RenderOutcome> {
        self.config.foreground.toggle();
        self.render()
    }

    /// Start decoding a new logo. The frame picks it up via [`Self::next_logo`].
    pub fn set_logo(&mut self, asset: LogoAsset) -> u64 {
        self.config.logo = LogoInput::Asset(asset.clone());
        self.logo_error = None;
        self.logo.submit(asset)
    }

    pub fn clear_logo(&mut self) -> QrResult<RenderOutcome> {
        self.config.logo = LogoInput::Cleared;
        self.sync_logo_input();
        self.render()
    }

    fn sync_logo_input(&mut self) {
        self.logo_error = None;
        match &self.config.logo {
            LogoInput::Asset(asset) => {
                self.logo.submit(asset.clone());
            }
            LogoInput::Unset | LogoInput::Cleared => {
                self.logo.cancel();
                self.logo_uri = None;
            }
        }
    }

    /// Wait for the pending logo decode, merge it and re-render.
    ///
    /// Returns `None` when no decode is pending. A failed decode drops the
    /// logo, is kept in [`Self::logo_error`], and the render still happens.
    pub async fn next_logo(&mut self) -> Option<QrResult<RenderOutcome>> {
        let update = self.logo.next().await?;
        match update.result {
            Ok(uri) => {
                tracing::debug!(generation = update.generation, "logo decoded");
                self.logo_uri = Some(uri);
                self.logo_error = None;
            }
            Err(e) => {
                tracing::warn!("Rendering without logo: {}", e);
                self.logo_uri = None;
                self.logo_error = Some(e);
            }
        }
        Some(self.render())
    }

    /// Resolve the configuration and hand it to the engine.
    ///
    /// Validation problems come back as [`RenderOutcome::Skipped`]; only an
    /// engine that cannot be initialized is an error.
    pub fn render(&mut self) -> QrResult<RenderOutcome> {
        if let EngineSlot::Unavailable(reason) = &self.engine {
            return Err(QrError::EngineUnavailable(reason.clone()));
        }

        let request = match self.resolver.resolve(&self.config, self.logo_uri.as_deref()) {
            Ok(request) => request,
            Err(e) if e.is_validation() => {
                tracing::debug!("render skipped: {}", e);
                return Ok(RenderOutcome::Skipped(e));
            }
            Err(e) => return Err(e),
        };

        let constructed = match std::mem::replace(&mut self.engine, EngineSlot::Empty) {
            EngineSlot::Live(mut engine) => {
                let result = engine.update(&request);
                self.engine = EngineSlot::Live(engine);
                match result {
                    Ok(()) => false,
                    Err(e @ QrError::Encode(_)) => return Ok(RenderOutcome::Skipped(e)),
                    Err(e) => return Err(e),
                }
            }
            EngineSlot::Empty => match E::construct(&self.surface, &request) {
                Ok(engine) => {
                    self.engine = EngineSlot::Live(engine);
                    true
                }
                Err(e @ QrError::Encode(_)) => return Ok(RenderOutcome::Skipped(e)),
                Err(e) => {
                    let reason = match e {
                        QrError::EngineUnavailable(reason) => reason,
                        other => other.to_string(),
                    };
                    tracing::error!("Rendering engine failed to initialize: {}", reason);
                    self.engine = EngineSlot::Unavailable(reason.clone());
                    return Err(QrError::EngineUnavailable(reason));
                }
            },
            EngineSlot::Unavailable(reason) => {
                self.engine = EngineSlot::Unavailable(reason.clone());
                return Err(QrError::EngineUnavailable(reason));
            }
        };

        self.request = Some(request);
        Ok(RenderOutcome::Rendered { constructed })
    }

    /// Export the current frame, named after the category and the current time.
    pub fn export(&self, format: ExportFormat) -> QrResult<ExportArtifact> {
        let engine = match &self.engine {
            EngineSlot::Live(engine) => engine,
            EngineSlot::Empty => {
                return Err(QrError::EngineUnavailable(
                    "nothing has been rendered yet".to_string(),
                ))
            }
            EngineSlot::Unavailable(reason) => {
                return Err(QrError::EngineUnavailable(reason.clone()))
            }
        };

        let bytes = engine.export(format)?;
        let file_name = export_file_name(
            self.config.category,
            format,
            chrono::Utc::now().timestamp_millis(),
        );
        tracing::info!(file = %file_name, bytes = bytes.len(), "exported {}", format);

        Ok(ExportArtifact {
            file_name,
            format,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HexColor;
    use crate::logo::encode_data_uri;
    use crate::style::{EyeBallShape, EyeFrameShape, FillMode, ModuleShape};
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// Records every call instead of drawing.
    struct RecordingEngine {
        constructs: usize,
        updates: usize,
        last: RenderRequest,
    }

    impl RenderEngine for RecordingEngine {
        fn construct(_surface: &Surface, request: &RenderRequest) -> QrResult<Self> {
            Ok(RecordingEngine {
                constructs: 1,
                updates: 0,
                last: request.clone(),
            })
        }

        fn update(&mut self, request: &RenderRequest) -> QrResult<()> {
            self.updates += 1;
            self.last = request.clone();
            Ok(())
        }

        fn export(&self, format: ExportFormat) -> QrResult<Vec<u8>> {
            Ok(format.extension().as_bytes().to_vec())
        }
    }

    struct BrokenEngine;

    impl RenderEngine for BrokenEngine {
        fn construct(_surface: &Surface, _request: &RenderRequest) -> QrResult<Self> {
            Err(QrError::EngineUnavailable("no backend".to_string()))
        }

        fn update(&mut self, _request: &RenderRequest) -> QrResult<()> {
            unreachable!()
        }

        fn export(&self, _format: ExportFormat) -> QrResult<Vec<u8>> {
            unreachable!()
        }
    }

    fn session(config: QrConfig) -> PreviewSession<RecordingEngine> {
        PreviewSession::new(Surface::default(), EngineOptions::default(), config)
    }

    fn png_asset(color: [u8; 4]) -> LogoAsset {
        let img = RgbaImage::from_pixel(4, 4, Rgba(color));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        LogoAsset::new(buf.into_inner())
    }

    #[test]
    fn test_construct_then_update() {
        let mut session = session(QrConfig::default());
        assert!(!session.is_constructed());

        let first = session.render().unwrap();
        assert!(matches!(first, RenderOutcome::Rendered { constructed: true }));
        let second = session.set_content("example.org").unwrap();
        assert!(matches!(second, RenderOutcome::Rendered { constructed: false }));

        let engine = session.engine().unwrap();
        assert_eq!(engine.constructs, 1);
        assert_eq!(engine.updates, 1);
        assert_eq!(engine.last.data, "https://example.org");
    }

    #[test]
    fn test_empty_content_skips_render() {
        let mut session = session(QrConfig::default());
        session.render().unwrap();

        let outcome = session.set_content("").unwrap();
        assert!(matches!(outcome, RenderOutcome::Skipped(QrError::EmptyContent)));
        // The last good frame is kept.
        assert_eq!(session.request().unwrap().data, "https://example.com");
        assert_eq!(session.engine().unwrap().updates, 0);
    }

    #[test]
    fn test_end_to_end_phone_request() {
        let mut config = QrConfig {
            category: ContentCategory::Phone,
            content: "555-1234".to_string(),
            background: HexColor::WHITE,
            ..QrConfig::default()
        };
        config.shapes.module = ModuleShape::Dots;
        config.shapes.eye_frame = EyeFrameShape::Circle;
        config.shapes.eye_ball = EyeBallShape::Square;

        let mut session = session(config);
        session.render().unwrap();
        let json = serde_json::to_value(session.request().unwrap()).unwrap();
        assert_eq!(json["data"], "tel:555-1234");
        assert_eq!(json["dotsOptions"]["type"], "dots");
        assert_eq!(json["cornersSquareOptions"]["type"], "dot");
        assert_eq!(json["cornersDotOptions"]["type"], "square");
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_category_change_suggests_sample() {
        let mut session = session(QrConfig::default());
        session.select_category(ContentCategory::Email).unwrap();
        assert_eq!(session.config().content, "example@email.com");
        assert_eq!(session.request().unwrap().data, "mailto:example@email.com");

        session.set_content("me@here.org").unwrap();
        session.select_category(ContentCategory::Email).unwrap();
        assert_eq!(session.config().content, "me@here.org");
    }

    #[test]
    fn test_toggle_fill_mode_round_trip() {
        let mut config = QrConfig::default();
        config.foreground.solid = "#112233".parse().unwrap();
        let mut session = session(config);

        session.toggle_fill_mode().unwrap();
        let fg = session.config().foreground;
        assert_eq!(fg.mode, FillMode::Gradient);
        assert_eq!(fg.gradient.start, fg.gradient.end);
        assert_eq!(fg.gradient.start, "#112233".parse().unwrap());
        let request = session.request().unwrap();
        assert!(request.dots_options.color.is_none());

        session.toggle_fill_mode().unwrap();
        let fg = session.config().foreground;
        assert_eq!(fg.solid, fg.gradient.start);
        assert!(session.request().unwrap().dots_options.gradient.is_none());
    }

    #[test]
    fn test_engine_unavailable_is_sticky() {
        let mut session: PreviewSession<BrokenEngine> =
            PreviewSession::new(Surface::default(), EngineOptions::default(), QrConfig::default());

        assert!(matches!(session.render(), Err(QrError::EngineUnavailable(_))));
        assert!(matches!(session.set_content("x"), Err(QrError::EngineUnavailable(_))));
        assert!(matches!(
            session.export(ExportFormat::Png),
            Err(QrError::EngineUnavailable(_))
        ));
    }

    #[test]
    fn test_export_names_file_after_category() {
        let mut session = session(QrConfig {
            category: ContentCategory::Text,
            content: "hi".to_string(),
            ..QrConfig::default()
        });
        assert!(session.export(ExportFormat::Svg).is_err());

        session.render().unwrap();
        let artifact = session.export(ExportFormat::Svg).unwrap();
        assert!(artifact.file_name.starts_with("qrchitect-Text-"));
        assert!(artifact.file_name.ends_with(".svg"));
        assert_eq!(artifact.bytes, b"svg");
    }

    #[tokio::test]
    async fn test_logo_merged_after_decode() {
        let mut session = session(QrConfig::default());
        session.render().unwrap();

        let asset = png_asset([255, 0, 0, 255]);
        session.set_logo(asset.clone());
        assert!(session.logo_pending());

        let outcome = session.next_logo().await.unwrap().unwrap();
        assert!(outcome.is_rendered());
        let expected = encode_data_uri(&asset).unwrap();
        assert_eq!(session.request().unwrap().image.as_deref(), Some(expected.as_str()));

        session.clear_logo().unwrap();
        assert!(session.request().unwrap().image.is_none());
        assert!(session.next_logo().await.is_none());
    }

    #[tokio::test]
    async fn test_replacing_logo_keeps_only_latest() {
        let mut session = session(QrConfig::default());
        let first = png_asset([255, 0, 0, 255]);
        let second = png_asset([0, 0, 255, 255]);

        session.set_logo(first.clone());
        session.set_logo(second.clone());
        session.next_logo().await.unwrap().unwrap();
        assert!(session.next_logo().await.is_none());

        let image = session.request().unwrap().image.clone().unwrap();
        assert_eq!(image, encode_data_uri(&second).unwrap());
        assert_ne!(image, encode_data_uri(&first).unwrap());
        assert_eq!(session.engine().unwrap().last.image, Some(image));
    }

    #[tokio::test]
    async fn test_bad_logo_renders_without_it() {
        let mut session = session(QrConfig::default());
        session.set_logo(LogoAsset::new(b"not an image".to_vec()));

        let outcome = session.next_logo().await.unwrap().unwrap();
        assert!(outcome.is_rendered());
        assert!(matches!(session.logo_error(), Some(QrError::LogoDecode(_))));
        assert!(session.request().unwrap().image.is_none());
    }

    #[tokio::test]
    async fn test_apply_schedules_logo_from_config() {
        let mut session = session(QrConfig::default());
        let config = QrConfig {
            logo: LogoInput::Asset(png_asset([0, 255, 0, 255])),
            ..QrConfig::default()
        };
        session.apply(config.clone()).unwrap();
        assert!(session.logo_pending());
        assert!(session.request().unwrap().image.is_none());

        session.next_logo().await.unwrap().unwrap();
        assert!(session.request().unwrap().image.is_some());

        // Same logo again: no new decode.
        session.apply(config).unwrap();
        assert!(!session.logo_pending());
    }
}
