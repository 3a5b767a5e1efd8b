use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::BrandingConfig;
use crate::model::color::HexColor;

/// Logos are scaled down to fit this box before counting pixels.
const THUMBNAIL_SIZE: u32 = 100;
/// Pixels with a lower alpha are background, not brand.
const MIN_ALPHA: u8 = 128;
const MAX_COLORS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DominantColor {
    pub hex: HexColor,
    /// Share of opaque pixels in this color, `0.0..=1.0`.
    pub area: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Failed to fetch logo: {0}")]
    Fetch(String),

    #[error("Logo is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[error("Failed to decode logo: {0}")]
    Decode(String),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

impl From<reqwest::Error> for ExtractionError {
    fn from(err: reqwest::Error) -> Self {
        ExtractionError::Fetch(err.to_string())
    }
}

/// Ranks the colors of an image by how much of it they cover.
#[async_trait]
pub trait PaletteExtractor: Send + Sync {
    /// Most prevalent color first.
    async fn dominant_colors(&self, url: &str) -> Result<Vec<DominantColor>, ExtractionError>;
}

/// Downloads the image over HTTP and buckets its pixels.
#[derive(Debug, Clone)]
pub struct ImagePaletteExtractor {
    http: reqwest::Client,
    max_bytes: u64,
}

impl ImagePaletteExtractor {
    pub fn new(config: &BrandingConfig) -> Result<Self, ExtractionError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(ImagePaletteExtractor {
            http,
            max_bytes: config.max_logo_bytes as u64,
        })
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ExtractionError> {
        let response = self.http.get(url).send().await?.error_for_status()?;

        if let Some(size) = response.content_length() {
            if size > self.max_bytes {
                return Err(ExtractionError::TooLarge {
                    size,
                    limit: self.max_bytes,
                });
            }
        }

        let bytes = response.bytes().await?;
        let size = bytes.len() as u64;
        if size > self.max_bytes {
            return Err(ExtractionError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        debug!("Fetched {} bytes from {}", size, url);
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl PaletteExtractor for ImagePaletteExtractor {
    #[instrument(skip(self))]
    async fn dominant_colors(&self, url: &str) -> Result<Vec<DominantColor>, ExtractionError> {
        let bytes = self.fetch(url).await?;
        tokio::task::spawn_blocking(move || palette_from_bytes(&bytes))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))?
    }
}

/// Decodes an encoded image and returns its dominant colors.
///
/// RGB is quantized to 4 bits per channel; each bucket reports the mean of
/// the pixels that fell into it. Ties keep bucket order.
pub fn palette_from_bytes(bytes: &[u8]) -> Result<Vec<DominantColor>, ExtractionError> {
    let image = image::load_from_memory(bytes).map_err(|e| ExtractionError::Decode(e.to_string()))?;
    let image = if image.width() > THUMBNAIL_SIZE || image.height() > THUMBNAIL_SIZE {
        image.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE)
    } else {
        image
    };
    let rgba = image.to_rgba8();

    let mut counts = vec![0u32; 4096];
    let mut sums = vec![[0u64; 3]; 4096];
    let mut opaque = 0u32;

    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        if a < MIN_ALPHA {
            continue;
        }
        let bucket = ((r as usize >> 4) << 8) | ((g as usize >> 4) << 4) | (b as usize >> 4);
        counts[bucket] += 1;
        sums[bucket][0] += r as u64;
        sums[bucket][1] += g as u64;
        sums[bucket][2] += b as u64;
        opaque += 1;
    }

    if opaque == 0 {
        return Ok(Vec::new());
    }

    let mut ranked: Vec<usize> = (0..counts.len()).filter(|&i| counts[i] > 0).collect();
    ranked.sort_by(|&a, &b| counts[b].cmp(&counts[a]).then(a.cmp(&b)));

    Ok(ranked
        .into_iter()
        .take(MAX_COLORS)
        .map(|bucket| {
            let count = counts[bucket] as u64;
            let mean = |channel: usize| ((sums[bucket][channel] + count / 2) / count) as u8;
            DominantColor {
                hex: HexColor::rgb(mean(0), mean(1), mean(2)),
                area: counts[bucket] as f32 / opaque as f32,
            }
        })
        .collect())
}

/// Single attempt at picking a brand color from a logo. Failures are
/// logged and reported as `None`.
#[instrument(skip(extractor))]
pub async fn extract_brand_color(extractor: &dyn PaletteExtractor, url: &str) -> Option<HexColor> {
    match extractor.dominant_colors(url).await {
        Ok(colors) => match colors.first() {
            Some(top) => {
                info!("Extracted brand color {} ({:.0}% of logo)", top.hex, top.area * 100.0);
                Some(top.hex)
            }
            None => {
                warn!("Logo at {} has no opaque pixels, keeping current color", url);
                None
            }
        },
        Err(e) => {
            warn!("Brand color extraction failed for {}: {}", url, e);
            None
        }
    }
}
