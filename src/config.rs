//! Inbound configuration: what the user picked, plus the engine's fixed
//! construction options.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::content::ContentCategory;
use crate::error::{QrError, QrResult};
use crate::style::{
    EyeBallShape, EyeFrameShape, FillMode, FillStyle, Foreground, Gradient, ModuleShape,
    ShapeStyle,
};

/// Binary logo image supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoAsset {
    pub name: Option<String>,
    pub bytes: Arc<[u8]>,
}

impl LogoAsset {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        LogoAsset {
            name: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn from_file(path: &Path) -> QrResult<Self> {
        let bytes = fs::read(path)?;
        let asset = LogoAsset::new(bytes);
        Ok(match path.file_name().and_then(|s| s.to_str()) {
            Some(name) => asset.with_name(name),
            None => asset,
        })
    }
}

/// Logo slot of the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogoInput {
    #[default]
    Unset,
    Asset(LogoAsset),
    Cleared,
}

impl LogoInput {
    pub fn asset(&self) -> Option<&LogoAsset> {
        match self {
            LogoInput::Asset(asset) => Some(asset),
            LogoInput::Unset | LogoInput::Cleared => None,
        }
    }
}

/// Everything the user configures for one code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FormValues", into = "FormValues")]
pub struct QrConfig {
    pub category: ContentCategory,
    pub content: String,
    pub foreground: Foreground,
    pub background: HexColor,
    pub shapes: ShapeStyle,
    pub logo: LogoInput,
}

impl Default for QrConfig {
    fn default() -> Self {
        QrConfig {
            category: ContentCategory::Url,
            content: ContentCategory::Url.sample().to_string(),
            foreground: Foreground::default(),
            background: HexColor::WHITE,
            shapes: ShapeStyle::default(),
            logo: LogoInput::Unset,
        }
    }
}

impl QrConfig {
    /// Load a configuration from a JSON file using the form's field names.
    pub fn load(path: &Path) -> QrResult<Self> {
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn fill(&self) -> FillStyle {
        self.foreground.fill()
    }

    pub fn validate(&self) -> QrResult<()> {
        if self.content.is_empty() {
            return Err(QrError::EmptyContent);
        }
        if self.foreground.mode == FillMode::Gradient {
            let angle = self.foreground.gradient.angle;
            if !(0..=360).contains(&angle) {
                return Err(QrError::InvalidAngle(angle));
            }
        }
        Ok(())
    }
}

/// Flat field layout of the style form, used for (de)serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FormValues {
    content_type: ContentCategory,
    content: String,
    use_gradient: bool,
    foreground_color: HexColor,
    background_color: HexColor,
    gradient_start_color: HexColor,
    gradient_end_color: HexColor,
    gradient_angle: i32,
    dot_style: ModuleShape,
    eye_style: EyeFrameShape,
    eyeball_style: EyeBallShape,
}

impl Default for FormValues {
    fn default() -> Self {
        QrConfig::default().into()
    }
}

impl From<FormValues> for QrConfig {
    fn from(form: FormValues) -> Self {
        QrConfig {
            category: form.content_type,
            content: form.content,
            foreground: Foreground {
                mode: if form.use_gradient {
                    FillMode::Gradient
                } else {
                    FillMode::Solid
                },
                solid: form.foreground_color,
                gradient: Gradient {
                    start: form.gradient_start_color,
                    end: form.gradient_end_color,
                    angle: form.gradient_angle,
                },
            },
            background: form.background_color,
            shapes: ShapeStyle {
                module: form.dot_style,
                eye_frame: form.eye_style,
                eye_ball: form.eyeball_style,
            },
            logo: LogoInput::Unset,
        }
    }
}

impl From<QrConfig> for FormValues {
    fn from(config: QrConfig) -> Self {
        FormValues {
            content_type: config.category,
            content: config.content,
            use_gradient: config.foreground.mode == FillMode::Gradient,
            foreground_color: config.foreground.solid,
            background_color: config.background,
            gradient_start_color: config.foreground.gradient.start,
            gradient_end_color: config.foreground.gradient.end,
            gradient_angle: config.foreground.gradient.angle,
            dot_style: config.shapes.module,
            eye_style: config.shapes.eye_frame,
            eyeball_style: config.shapes.eye_ball,
        }
    }
}

/// QR error correction level handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum ErrorCorrection {
    L,
    M,
    #[default]
    Q,
    H,
}

/// Logo placement options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    /// Skip data modules underneath the logo.
    pub hide_background_dots: bool,
    /// Logo size as a fraction of the code's drawing area.
    pub image_size: f64,
    /// Clear space around the logo, in pixels.
    pub margin: u32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        ImageOptions {
            hide_background_dots: true,
            image_size: 0.3,
            margin: 0,
        }
    }
}

/// Fixed engine options not exposed in the style form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineOptions {
    /// Quiet space around the code, in pixels.
    pub margin: u32,
    pub error_correction: ErrorCorrection,
    pub image_options: ImageOptions,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            margin: 10,
            error_correction: ErrorCorrection::Q,
            image_options: ImageOptions::default(),
        }
    }
}

/// Size of the preview surface the engine draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    pub fn square(size: u32) -> Self {
        Surface {
            width: size,
            height: size,
        }
    }
}

impl Default for Surface {
    fn default() -> Self {
        Surface::square(300)
    }
}
