//! Style resolution: configuration in, engine-ready render request out.

use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::config::{EngineOptions, ErrorCorrection, ImageOptions, QrConfig};
use crate::content;
use crate::error::QrResult;
use crate::style::{
    resolve_fill, CornerDotType, CornerSquareType, DotType, FillParams, Gradient, Region,
};

/// Shape primitive and fill for one region, in engine field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionOptions<T> {
    #[serde(rename = "type")]
    pub kind: T,
    pub color: Option<HexColor>,
    pub gradient: Option<Gradient>,
}

impl<T> RegionOptions<T> {
    fn new(kind: T, fill: FillParams) -> Self {
        RegionOptions {
            kind,
            color: fill.color,
            gradient: fill.gradient,
        }
    }

    pub fn fill(&self) -> FillParams {
        FillParams {
            color: self.color,
            gradient: self.gradient,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrOptions {
    pub error_correction_level: ErrorCorrection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundOptions {
    pub color: HexColor,
}

/// Fully resolved parameters for one render.
///
/// A pure function of the configuration (plus the decoded logo). The
/// `image` field is omitted entirely when there is no logo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub data: String,
    pub margin: u32,
    pub qr_options: QrOptions,
    pub image_options: ImageOptions,
    pub dots_options: RegionOptions<DotType>,
    pub corners_square_options: RegionOptions<CornerSquareType>,
    pub corners_dot_options: RegionOptions<CornerDotType>,
    pub background_options: BackgroundOptions,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image: Option<String>,
}

impl RenderRequest {
    pub fn with_logo(mut self, data_uri: Option<String>) -> Self {
        self.image = data_uri;
        self
    }
}

/// Builds render requests with a fixed set of engine options.
#[derive(Debug, Clone, Default)]
pub struct StyleResolver {
    options: EngineOptions,
}

impl StyleResolver {
    pub fn new(options: EngineOptions) -> Self {
        StyleResolver { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Resolve `config` into a render request carrying `logo` as its image.
    ///
    /// Fails with `EmptyContent` or `InvalidAngle` before anything is built.
    /// The same foreground fill is applied to all three regions; the
    /// background is always a flat color.
    pub fn resolve(&self, config: &QrConfig, logo: Option<&str>) -> QrResult<RenderRequest> {
        config.validate()?;

        let data = content::format(config.category, &config.content)?;
        let shapes = config.shapes.translate();
        let fill = config.fill();

        let request = RenderRequest {
            data,
            margin: self.options.margin,
            qr_options: QrOptions {
                error_correction_level: self.options.error_correction,
            },
            image_options: self.options.image_options,
            dots_options: RegionOptions::new(shapes.dots, resolve_fill(&fill, Region::Modules)),
            corners_square_options: RegionOptions::new(
                shapes.corners_square,
                resolve_fill(&fill, Region::EyeFrame),
            ),
            corners_dot_options: RegionOptions::new(
                shapes.corners_dot,
                resolve_fill(&fill, Region::EyeBall),
            ),
            background_options: BackgroundOptions {
                color: config.background,
            },
            image: logo.map(str::to_string),
        };

        tracing::debug!(
            payload = %request.data,
            dots = ?request.dots_options.kind,
            logo = request.image.is_some(),
            "resolved render request"
        );

        Ok(request)
    }
}

/// Resolve with default engine options and no logo.
pub fn resolve(config: &QrConfig) -> QrResult<RenderRequest> {
    StyleResolver::default().resolve(config, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentCategory;
    use crate::error::QrError;
    use crate::style::{EyeBallShape, EyeFrameShape, FillMode, ModuleShape};

    fn phone_config() -> QrConfig {
        let mut config = QrConfig {
            category: ContentCategory::Phone,
            content: "555-1234".to_string(),
            ..QrConfig::default()
        };
        config.shapes.module = ModuleShape::Dots;
        config.shapes.eye_frame = EyeFrameShape::Circle;
        config.shapes.eye_ball = EyeBallShape::Square;
        config
    }

    #[test]
    fn test_end_to_end_phone() {
        let request = resolve(&phone_config()).unwrap();
        assert_eq!(request.data, "tel:555-1234");
        assert_eq!(request.dots_options.kind, DotType::Dots);
        assert_eq!(request.corners_square_options.kind, CornerSquareType::Dot);
        assert_eq!(request.corners_dot_options.kind, CornerDotType::Square);
        assert_eq!(request.background_options.color, HexColor::WHITE);
        assert_eq!(request.dots_options.color, Some(HexColor::BLACK));
        assert!(request.image.is_none());

        let json = serde_json::to_value(&request).unwrap();
        assert!(!json.as_object().unwrap().contains_key("image"));
        assert_eq!(json["cornersSquareOptions"]["type"], "dot");
    }

    #[test]
    fn test_gradient_applies_to_every_region() {
        let mut config = phone_config();
        config.foreground.mode = FillMode::Gradient;
        let request = resolve(&config).unwrap();

        for fill in [
            request.dots_options.fill(),
            request.corners_square_options.fill(),
            request.corners_dot_options.fill(),
        ] {
            assert!(fill.color.is_none());
            assert_eq!(fill.gradient, Some(config.foreground.gradient));
        }
    }

    #[test]
    fn test_switching_back_to_solid_clears_gradient() {
        let mut config = phone_config();
        config.foreground.toggle();
        let gradient = resolve(&config).unwrap();
        assert!(gradient.dots_options.gradient.is_some());

        config.foreground.toggle();
        let solid = resolve(&config).unwrap();
        assert!(solid.dots_options.gradient.is_none());
        assert_eq!(solid.dots_options.color, Some(HexColor::BLACK));
    }

    #[test]
    fn test_empty_content_fails() {
        let mut config = phone_config();
        config.content.clear();
        assert!(matches!(resolve(&config), Err(QrError::EmptyContent)));
    }

    #[test]
    fn test_logo_and_options_carried_through() {
        let resolver = StyleResolver::new(EngineOptions {
            margin: 24,
            error_correction: ErrorCorrection::H,
            ..EngineOptions::default()
        });
        let request = resolver
            .resolve(&phone_config(), Some("data:image/png;base64,AAAA"))
            .unwrap();
        assert_eq!(request.margin, 24);
        assert_eq!(request.qr_options.error_correction_level, ErrorCorrection::H);
        assert_eq!(request.image.as_deref(), Some("data:image/png;base64,AAAA"));
    }
}
