//! Logo handling: binary asset to data URI, decoded off the render path.
//!
//! Each submitted decode gets a generation number. Submitting a new logo
//! aborts the previous task and bumps the generation, so a result that
//! still arrives for an older generation is dropped on receipt.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::LogoAsset;
use crate::error::{QrError, QrResult};

const SVG_MIME: &str = "image/svg+xml";

/// Detect the MIME type of an image. Raster formats are sniffed from their
/// magic bytes; anything else that parses as an SVG document is SVG.
pub fn detect_mime(bytes: &[u8]) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(bytes) {
        return Some(format.to_mime_type());
    }
    usvg::Tree::from_data(bytes, &usvg::Options::default())
        .is_ok()
        .then_some(SVG_MIME)
}

fn check_decodes(bytes: &[u8]) -> QrResult<&'static str> {
    if bytes.is_empty() {
        return Err(QrError::LogoDecode("logo is empty".to_string()));
    }

    let mime = detect_mime(bytes)
        .ok_or_else(|| QrError::LogoDecode("unrecognized image format".to_string()))?;

    if mime != SVG_MIME {
        image::load_from_memory(bytes).map_err(|e| QrError::LogoDecode(e.to_string()))?;
    }
    Ok(mime)
}

/// Encode a logo as a `data:` URI after checking that it decodes.
///
/// SVG logos are embedded as-is and rasterized together with the code.
pub fn encode_data_uri(asset: &LogoAsset) -> QrResult<String> {
    let mime = check_decodes(&asset.bytes).map_err(|e| match (e, &asset.name) {
        (QrError::LogoDecode(msg), Some(name)) => QrError::LogoDecode(format!("{name}: {msg}")),
        (e, _) => e,
    })?;

    Ok(format!("data:{};base64,{}", mime, BASE64.encode(&asset.bytes)))
}

/// Outcome of the newest logo decode.
#[derive(Debug)]
pub struct LogoUpdate {
    pub generation: u64,
    pub result: QrResult<String>,
}

type DecodeMessage = (u64, QrResult<String>);

/// Runs logo decodes in the background, last write wins.
///
/// `submit` must be called from within a tokio runtime.
pub struct LogoDecoder {
    generation: u64,
    pending: bool,
    task: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<DecodeMessage>,
    rx: mpsc::UnboundedReceiver<DecodeMessage>,
}

impl Default for LogoDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LogoDecoder {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        LogoDecoder {
            generation: 0,
            pending: false,
            task: None,
            tx,
            rx,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a decode for the current generation is still outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Start decoding `asset`, superseding any decode in flight.
    pub fn submit(&mut self, asset: LogoAsset) -> u64 {
        self.abort_task();
        self.generation += 1;
        self.pending = true;

        let generation = self.generation;
        let tx = self.tx.clone();
        tracing::debug!(
            generation,
            name = asset.name.as_deref().unwrap_or("<unnamed>"),
            bytes = asset.bytes.len(),
            "logo decode started"
        );

        self.task = Some(tokio::spawn(async move {
            let result = match tokio::task::spawn_blocking(move || encode_data_uri(&asset)).await
            {
                Ok(result) => result,
                Err(e) => Err(QrError::LogoDecode(e.to_string())),
            };
            // Receiver is owned by the decoder; a send error means it was dropped.
            let _ = tx.send((generation, result));
        }));

        generation
    }

    /// Drop any decode in flight; its result will be ignored.
    pub fn cancel(&mut self) {
        self.abort_task();
        self.generation += 1;
        self.pending = false;
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn accept(&mut self, (generation, result): DecodeMessage) -> Option<LogoUpdate> {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "discarding stale logo decode");
            return None;
        }
        self.pending = false;
        self.task = None;
        Some(LogoUpdate { generation, result })
    }

    /// Wait for the current decode to finish. Returns `None` when nothing is pending.
    pub async fn next(&mut self) -> Option<LogoUpdate> {
        while self.pending {
            let message = self.rx.recv().await?;
            if let Some(update) = self.accept(message) {
                return Some(update);
            }
        }
        None
    }

    /// Non-blocking variant of [`LogoDecoder::next`].
    pub fn try_next(&mut self) -> Option<LogoUpdate> {
        while let Ok(message) = self.rx.try_recv() {
            if let Some(update) = self.accept(message) {
                return Some(update);
            }
        }
        None
    }
}

impl Drop for LogoDecoder {
    fn drop(&mut self) {
        self.abort_task();
    }
}
