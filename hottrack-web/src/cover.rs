//! Cover image compositor
//!
//! Downloads a song's cover art, fits it into a square canvas and writes the
//! artist name into a caption band at the bottom.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use ab_glyph::{FontVec, PxScale};
use async_trait::async_trait;
use image::{imageops::FilterType, DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use thiserror::Error;
use tracing::debug;

/// Default canvas edge in pixels
pub const DEFAULT_SIZE: u32 = 256;
pub const MIN_SIZE: u32 = 16;
pub const MAX_SIZE: u32 = 512;

const CANVAS_BACKGROUND: Rgba<u8> = Rgba([24, 24, 24, 255]);
const CAPTION_BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 160]);
const CAPTION_TEXT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Cover compositor errors
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Compositing task failed: {0}")]
    Task(String),
}

/// Clamp a requested canvas size into `[MIN_SIZE, MAX_SIZE]`
pub fn clamp_size(requested: Option<u32>) -> u32 {
    requested.unwrap_or(DEFAULT_SIZE).clamp(MIN_SIZE, MAX_SIZE)
}

/// Produces a PNG cover for `(image_url, label, size)`
#[async_trait]
pub trait CoverCompositor: Send + Sync {
    async fn compose(&self, image_url: &str, label: &str, size: u32) -> Result<Vec<u8>, CoverError>;
}

/// Compositor that fetches the source image over HTTP
pub struct HttpCoverCompositor {
    http_client: reqwest::Client,
    font: Option<Arc<FontVec>>,
}

impl HttpCoverCompositor {
    pub fn new(fetch_timeout: Duration, font: Option<FontVec>) -> Result<Self, CoverError> {
        let http_client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| CoverError::Network(e.to_string()))?;
        Ok(Self {
            http_client,
            font: font.map(Arc::new),
        })
    }

    /// Load the caption font from a TTF/OTF file
    pub fn load_font(path: &Path) -> Result<FontVec, CoverError> {
        let bytes = std::fs::read(path)
            .map_err(|e| CoverError::Font(format!("{}: {}", path.display(), e)))?;
        FontVec::try_from_vec(bytes).map_err(|e| CoverError::Font(format!("{}: {}", path.display(), e)))
    }

    async fn fetch(&self, image_url: &str) -> Result<Vec<u8>, CoverError> {
        let response = self
            .http_client
            .get(image_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CoverError::Network(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CoverError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl CoverCompositor for HttpCoverCompositor {
    async fn compose(&self, image_url: &str, label: &str, size: u32) -> Result<Vec<u8>, CoverError> {
        let source = self.fetch(image_url).await?;
        debug!("Fetched {} bytes of cover art from {}", source.len(), image_url);

        let font = self.font.clone();
        let label = label.to_string();
        tokio::task::spawn_blocking(move || {
            let source = image::load_from_memory(&source)?;
            let canvas = render(&source, &label, size, font.as_deref());
            encode_png(&canvas)
        })
        .await
        .map_err(|e| CoverError::Task(e.to_string()))?
    }
}

/// Fit `source` into a `size`×`size` canvas and draw the caption band
pub fn render(source: &DynamicImage, label: &str, size: u32, font: Option<&FontVec>) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(size, size, CANVAS_BACKGROUND);

    let fitted = source.resize(size, size, FilterType::Lanczos3).to_rgba8();
    let x = (size - fitted.width()) / 2;
    let y = (size - fitted.height()) / 2;
    image::imageops::overlay(&mut canvas, &fitted, i64::from(x), i64::from(y));

    let band_height = (size / 6).max(1);
    let band_top = size - band_height;
    blend_band(&mut canvas, band_top);

    match font {
        Some(font) if !label.is_empty() => {
            let scale = PxScale::from(band_height as f32 * 0.6);
            let (text_width, text_height) = text_size(scale, font, label);
            let text_x = size.saturating_sub(text_width) / 2;
            let text_y = band_top + band_height.saturating_sub(text_height) / 2;
            draw_text_mut(
                &mut canvas,
                CAPTION_TEXT,
                text_x as i32,
                text_y as i32,
                scale,
                font,
                label,
            );
        }
        Some(_) => {}
        None => debug!("No caption font configured, rendering cover without label"),
    }

    canvas
}

/// Alpha-blend `CAPTION_BACKGROUND` over the rows from `band_top` down
fn blend_band(canvas: &mut RgbaImage, band_top: u32) {
    let overlay = CAPTION_BACKGROUND.0;
    let alpha = u32::from(overlay[3]);
    for y in band_top..canvas.height() {
        for x in 0..canvas.width() {
            let base = canvas.get_pixel(x, y).0;
            let mut blended = [0u8; 4];
            for c in 0..3 {
                let value = (u32::from(overlay[c]) * alpha + u32::from(base[c]) * (255 - alpha)) / 255;
                blended[c] = value as u8;
            }
            blended[3] = 255;
            canvas.put_pixel(x, y, Rgba(blended));
        }
    }
}

fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>, CoverError> {
    let mut out = Cursor::new(Vec::new());
    canvas.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
