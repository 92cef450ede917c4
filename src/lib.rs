pub mod color;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod export;
pub mod logo;
pub mod qr;
pub mod resolve;
pub mod session;
pub mod style;
#[cfg(feature = "terminal")]
pub mod terminal;

pub use color::HexColor;
pub use config::{EngineOptions, ErrorCorrection, LogoAsset, LogoInput, QrConfig, Surface};
pub use content::{format, suggest_default, ContentCategory};
pub use engine::{RenderEngine, StyledQrEngine};
pub use error::{QrError, QrResult};
pub use export::{export_file_name, ExportArtifact, ExportFormat};
pub use logo::{encode_data_uri, LogoDecoder};
pub use resolve::{resolve, RenderRequest, StyleResolver};
pub use session::{PreviewSession, RenderOutcome};
pub use style::{resolve_fill, FillMode, FillStyle, Foreground, Gradient, Region, ShapeStyle};
#[cfg(feature = "terminal")]
pub use terminal::{fits_in_terminal, render_to_terminal};
