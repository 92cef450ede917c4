//! Rendering engine: turns a [`RenderRequest`] into a displayed frame and
//! exports it as PNG or SVG.

pub mod layout;
pub mod raster;
pub mod svg;

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::config::Surface;
use crate::error::{QrError, QrResult};
use crate::export::ExportFormat;
use crate::qr::QrMatrix;
use crate::resolve::RenderRequest;

use self::layout::Layout;

/// A live rendering engine bound to one preview surface.
///
/// `construct` is called once per surface; every later render goes
/// through `update` on the same instance.
pub trait RenderEngine: Sized {
    fn construct(surface: &Surface, request: &RenderRequest) -> QrResult<Self>;

    fn update(&mut self, request: &RenderRequest) -> QrResult<()>;

    fn export(&self, format: ExportFormat) -> QrResult<Vec<u8>>;
}

/// Engine backed by the `qrcode` matrix encoder, our own shape layout and
/// `resvg` for pixels.
pub struct StyledQrEngine {
    surface: Surface,
    request: RenderRequest,
    matrix: QrMatrix,
    frame: RgbaImage,
}

impl StyledQrEngine {
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn request(&self) -> &RenderRequest {
        &self.request
    }

    pub fn matrix(&self) -> &QrMatrix {
        &self.matrix
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    pub fn layout(&self) -> Layout {
        layout::build(&self.matrix, &self.request, &self.surface)
    }

    fn redraw(&mut self) -> QrResult<()> {
        self.frame = raster::rasterize(&self.layout())?;
        Ok(())
    }
}

impl RenderEngine for StyledQrEngine {
    fn construct(surface: &Surface, request: &RenderRequest) -> QrResult<Self> {
        if surface.width == 0 || surface.height == 0 {
            return Err(QrError::EngineUnavailable(format!(
                "surface has no area ({}x{})",
                surface.width, surface.height
            )));
        }

        let matrix = QrMatrix::encode(
            request.data.as_bytes(),
            request.qr_options.error_correction_level,
        )?;
        tracing::debug!(
            version = matrix.version(),
            modules = matrix.width(),
            "engine constructed for {}x{} surface",
            surface.width,
            surface.height
        );

        let mut engine = StyledQrEngine {
            surface: *surface,
            request: request.clone(),
            matrix,
            frame: RgbaImage::new(surface.width, surface.height),
        };
        engine.redraw()?;
        Ok(engine)
    }

    fn update(&mut self, request: &RenderRequest) -> QrResult<()> {
        if request.data != self.request.data
            || request.qr_options != self.request.qr_options
        {
            self.matrix = QrMatrix::encode(
                request.data.as_bytes(),
                request.qr_options.error_correction_level,
            )?;
            tracing::debug!(version = self.matrix.version(), "payload re-encoded");
        }

        self.request = request.clone();
        self.redraw()
    }

    fn export(&self, format: ExportFormat) -> QrResult<Vec<u8>> {
        match format {
            ExportFormat::Png => {
                let mut buf = Cursor::new(Vec::new());
                self.frame
                    .write_to(&mut buf, ImageFormat::Png)
                    .map_err(|e| QrError::Export(format!("PNG encoding failed: {}", e)))?;
                Ok(buf.into_inner())
            }
            ExportFormat::Svg => Ok(svg::render(&self.layout()).into_bytes()),
        }
    }
}
