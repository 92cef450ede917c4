//! Fill and shape styling, and their translation into the engine's
//! vocabulary.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::color::HexColor;

pub const DEFAULT_GRADIENT_ANGLE: i32 = 45;

/// Which fill variant the foreground uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    #[default]
    Solid,
    Gradient,
}

/// A two-stop linear gradient. The angle is in degrees, 0..=360.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gradient {
    pub start: HexColor,
    pub end: HexColor,
    pub angle: i32,
}

impl Gradient {
    /// Both stops on one color, so the first switch to gradient mode looks unchanged.
    pub fn flat(color: HexColor, angle: i32) -> Self {
        Gradient {
            start: color,
            end: color,
            angle,
        }
    }

    pub fn radians(&self) -> f64 {
        f64::from(self.angle).to_radians()
    }
}

/// Foreground fill: exactly one of a flat color or a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStyle {
    Solid(HexColor),
    Gradient(Gradient),
}

impl FillStyle {
    pub fn mode(&self) -> FillMode {
        match self {
            FillStyle::Solid(_) => FillMode::Solid,
            FillStyle::Gradient(_) => FillMode::Gradient,
        }
    }

    /// Switch variant, seeding the new one from the current one.
    ///
    /// Solid to gradient puts both stops on the solid color at `angle`;
    /// gradient to solid keeps the gradient's start color.
    pub fn toggled(self, angle: i32) -> FillStyle {
        match self {
            FillStyle::Solid(color) => FillStyle::Gradient(Gradient::flat(color, angle)),
            FillStyle::Gradient(gradient) => FillStyle::Solid(gradient.start),
        }
    }
}

/// Form-side foreground state. Both variants' values are kept so the
/// controls can show them, but only `mode` decides what gets rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Foreground {
    pub mode: FillMode,
    pub solid: HexColor,
    pub gradient: Gradient,
}

impl Default for Foreground {
    fn default() -> Self {
        Foreground {
            mode: FillMode::Solid,
            solid: HexColor::BLACK,
            gradient: Gradient {
                start: HexColor::BLACK,
                end: HexColor::rgb(0x66, 0x66, 0x66),
                angle: DEFAULT_GRADIENT_ANGLE,
            },
        }
    }
}

impl Foreground {
    pub fn fill(&self) -> FillStyle {
        match self.mode {
            FillMode::Solid => FillStyle::Solid(self.solid),
            FillMode::Gradient => FillStyle::Gradient(self.gradient),
        }
    }

    /// The only transition of the fill-mode state machine.
    pub fn toggle(&mut self) {
        match self.fill().toggled(self.gradient.angle) {
            FillStyle::Solid(color) => {
                self.mode = FillMode::Solid;
                self.solid = color;
            }
            FillStyle::Gradient(gradient) => {
                self.mode = FillMode::Gradient;
                self.gradient = gradient;
            }
        }
    }
}

/// The three independently stylable zones of a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Modules,
    EyeFrame,
    EyeBall,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Modules, Region::EyeFrame, Region::EyeBall];
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Region::Modules => "modules",
            Region::EyeFrame => "eye-frame",
            Region::EyeBall => "eye-ball",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModuleShape {
    #[default]
    Square,
    Dots,
    Rounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EyeFrameShape {
    #[default]
    Square,
    Circle,
    Rounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EyeBallShape {
    #[default]
    Square,
    Circle,
    Diamond,
}

/// Engine primitive for data modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotType {
    Square,
    Dots,
    Rounded,
}

/// Engine primitive for eye frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerSquareType {
    Square,
    Dot,
    ExtraRounded,
}

/// Engine primitive for eye balls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerDotType {
    Square,
    Dot,
}

impl From<ModuleShape> for DotType {
    fn from(shape: ModuleShape) -> Self {
        match shape {
            ModuleShape::Square => DotType::Square,
            ModuleShape::Dots => DotType::Dots,
            ModuleShape::Rounded => DotType::Rounded,
        }
    }
}

impl From<EyeFrameShape> for CornerSquareType {
    fn from(shape: EyeFrameShape) -> Self {
        match shape {
            EyeFrameShape::Square => CornerSquareType::Square,
            EyeFrameShape::Circle => CornerSquareType::Dot,
            EyeFrameShape::Rounded => CornerSquareType::ExtraRounded,
        }
    }
}

impl From<EyeBallShape> for CornerDotType {
    fn from(shape: EyeBallShape) -> Self {
        match shape {
            EyeBallShape::Square => CornerDotType::Square,
            // The engine has no diamond primitive; dot is the closest match.
            EyeBallShape::Circle | EyeBallShape::Diamond => CornerDotType::Dot,
        }
    }
}

/// Shape choice for each region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShapeStyle {
    pub module: ModuleShape,
    pub eye_frame: EyeFrameShape,
    pub eye_ball: EyeBallShape,
}

/// Shape primitives in the engine's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineShapes {
    pub dots: DotType,
    pub corners_square: CornerSquareType,
    pub corners_dot: CornerDotType,
}

impl ShapeStyle {
    pub fn translate(&self) -> EngineShapes {
        if self.eye_ball == EyeBallShape::Diamond {
            tracing::debug!("eye-ball shape diamond rendered as dot");
        }
        EngineShapes {
            dots: self.module.into(),
            corners_square: self.eye_frame.into(),
            corners_dot: self.eye_ball.into(),
        }
    }
}

/// Nullable color/gradient pair as the engine expects it.
///
/// Both fields always serialize; the unused one is an explicit `null` so a
/// value left over from the previous fill mode is overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillParams {
    pub color: Option<HexColor>,
    pub gradient: Option<Gradient>,
}

/// Resolve a fill for one region. Exactly one field of the result is set.
pub fn resolve_fill(fill: &FillStyle, region: Region) -> FillParams {
    tracing::trace!(%region, mode = ?fill.mode(), "resolving fill");
    match *fill {
        FillStyle::Solid(color) => FillParams {
            color: Some(color),
            gradient: None,
        },
        FillStyle::Gradient(gradient) => FillParams {
            color: None,
            gradient: Some(gradient),
        },
    }
}
