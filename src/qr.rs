use qrcode::{Color, EcLevel, QrCode, Version};

use crate::config::ErrorCorrection;
use crate::error::{QrError, QrResult};

/// Side length of a finder pattern, in modules.
pub const FINDER_SIZE: usize = 7;

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        }
    }
}

/// Dark/light module grid of an encoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    width: usize,
    dark: Vec<bool>,
    version: i16,
}

impl QrMatrix {
    /// Encode `data`, letting the encoder pick the smallest version that fits.
    pub fn encode(data: &[u8], level: ErrorCorrection) -> QrResult<Self> {
        let code = QrCode::with_error_correction_level(data, level.into())
            .map_err(|e| QrError::Encode(e.to_string()))?;

        let version = match code.version() {
            Version::Normal(v) | Version::Micro(v) => v,
        };

        let width = code.width();
        let dark = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();

        Ok(QrMatrix {
            width,
            dark,
            version,
        })
    }

    /// Number of modules per side.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn version(&self) -> i16 {
        self.version
    }

    /// Whether the module at (`row`, `col`) is dark. Out of range is light.
    pub fn is_dark(&self, row: isize, col: isize) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        row < self.width && col < self.width && self.dark[row * self.width + col]
    }

    /// Top-left corners (row, col) of the three finder patterns.
    pub fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.width - FINDER_SIZE;
        [(0, 0), (0, far), (far, 0)]
    }

    /// Whether a module belongs to one of the finder patterns.
    pub fn in_finder(&self, row: usize, col: usize) -> bool {
        self.finder_origins().iter().any(|&(r, c)| {
            row >= r && row < r + FINDER_SIZE && col >= c && col < c + FINDER_SIZE
        })
    }
}
