//! Variant photo normalization and upload.
//!
//! A picked photo is read from disk (or fetched, for remote references),
//! re-encoded to JPEG when it is a HEIC capture, stored under a unique key in
//! the photo bucket, and resolved to its public URL.

use std::io::Cursor;
use std::path::Path;

use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use rand::Rng;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::backend::ObjectStorage;
use crate::supabase::SupabaseError;

/// Extension assumed when a reference has none.
const DEFAULT_EXTENSION: &str = "jpg";

/// Length of the random part of a storage key.
const SUFFIX_LEN: usize = 6;

/// JPEG quality used when transcoding HEIC captures.
pub const TRANSCODE_QUALITY: u8 = 90;

/// Errors raised while preparing or uploading a photo.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The local file could not be read.
    #[error("Failed to read image {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A remote reference could not be fetched.
    #[error("Failed to fetch image: {0}")]
    Fetch(String),

    /// Re-encoding failed.
    #[error("Failed to transcode image: {0}")]
    Transcode(String),

    /// Storage rejected the upload.
    #[error("Upload failed: {0}")]
    Upload(#[from] SupabaseError),
}

impl ImageError {
    /// Whether storage refused the upload because the key already exists.
    #[must_use]
    pub fn is_key_conflict(&self) -> bool {
        matches!(self, Self::Upload(e) if e.is_conflict())
    }
}

/// Re-encodes legacy camera formats into JPEG.
pub trait Transcoder: Send + Sync {
    /// Decode `bytes` and re-encode them as JPEG.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Transcode`] if the bytes cannot be decoded or
    /// encoded.
    fn to_jpeg(&self, bytes: &[u8]) -> Result<Vec<u8>, ImageError>;
}

/// HEIF major brands written by cameras and photo pickers.
const HEIF_BRANDS: [&[u8; 4]; 8] = [
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"mif1", b"msf1",
];

/// Whether `bytes` start with an ISO-BMFF `ftyp` box carrying a HEIF brand.
#[must_use]
pub fn is_heif(bytes: &[u8]) -> bool {
    match (bytes.get(4..8), bytes.get(8..12)) {
        (Some(b"ftyp"), Some(brand)) => HEIF_BRANDS.iter().any(|b| b.as_slice() == brand),
        _ => false,
    }
}

/// [`Transcoder`] backed by the `image` crate, with HEIF decoding through
/// libheif when the `heic` feature is enabled.
///
/// Bytes are sniffed rather than trusted by extension, so pickers that label
/// exported JPEGs as `.heic` are handled by `image` directly.
#[derive(Debug, Clone, Copy)]
pub struct JpegTranscoder {
    quality: u8,
}

impl Default for JpegTranscoder {
    fn default() -> Self {
        Self {
            quality: TRANSCODE_QUALITY,
        }
    }
}

impl JpegTranscoder {
    fn encode(&self, rgb: &image::RgbImage) -> Result<Vec<u8>, ImageError> {
        let mut out = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut out, self.quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| ImageError::Transcode(e.to_string()))?;
        Ok(out.into_inner())
    }
}

impl Transcoder for JpegTranscoder {
    fn to_jpeg(&self, bytes: &[u8]) -> Result<Vec<u8>, ImageError> {
        let rgb = if is_heif(bytes) {
            decode_heif(bytes)?
        } else {
            image::load_from_memory(bytes)
                .map_err(|e| ImageError::Transcode(e.to_string()))?
                .to_rgb8()
        };
        self.encode(&rgb)
    }
}

#[cfg(feature = "heic")]
fn decode_heif(bytes: &[u8]) -> Result<image::RgbImage, ImageError> {
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let heif_err = |e: libheif_rs::HeifError| ImageError::Transcode(e.to_string());

    let lib = LibHeif::new();
    let ctx = HeifContext::read_from_bytes(bytes).map_err(heif_err)?;
    let handle = ctx.primary_image_handle().map_err(heif_err)?;
    let decoded = lib
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(heif_err)?;

    let planes = decoded.planes();
    let plane = planes
        .interleaved
        .ok_or_else(|| ImageError::Transcode("HEIF image has no RGB plane".to_string()))?;

    let width = plane.width as usize;
    let row_len = width * 3;
    let mut pixels = Vec::with_capacity(row_len * plane.height as usize);
    for y in 0..plane.height as usize {
        let start = y * plane.stride;
        let row = plane
            .data
            .get(start..start + row_len)
            .ok_or_else(|| ImageError::Transcode("HEIF plane is truncated".to_string()))?;
        pixels.extend_from_slice(row);
    }

    image::RgbImage::from_raw(plane.width, plane.height, pixels)
        .ok_or_else(|| ImageError::Transcode("HEIF plane size mismatch".to_string()))
}

#[cfg(not(feature = "heic"))]
fn decode_heif(_bytes: &[u8]) -> Result<image::RgbImage, ImageError> {
    Err(ImageError::Transcode(
        "HEIF decoding is not available; build with the `heic` feature".to_string(),
    ))
}

/// A photo ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    /// Extension after normalization (`heic` becomes `jpg`).
    pub extension: String,
    /// MIME type sent with the upload.
    pub content_type: &'static str,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

/// Uploads variant photos to the configured bucket prefix.
#[derive(Debug, Clone)]
pub struct ImageUploader<T = JpegTranscoder> {
    http: Client,
    prefix: String,
    transcoder: T,
}

impl ImageUploader<JpegTranscoder> {
    /// Create an uploader storing objects under `prefix/`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_transcoder(prefix, JpegTranscoder::default())
    }
}

impl<T: Transcoder> ImageUploader<T> {
    /// Create an uploader with a custom transcoder.
    #[must_use]
    pub fn with_transcoder(prefix: impl Into<String>, transcoder: T) -> Self {
        Self {
            http: Client::new(),
            prefix: prefix.into().trim_matches('/').to_string(),
            transcoder,
        }
    }

    /// Normalize, upload and resolve a local image reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be read or transcoded, or if the
    /// upload is rejected (including when the key already exists).
    #[instrument(skip(self, storage))]
    pub async fn upload<S: ObjectStorage>(
        &self,
        storage: &S,
        reference: &str,
    ) -> Result<String, ImageError> {
        let raw = self.read(reference).await?;
        let prepared = self.prepare(reference, raw)?;
        let key = storage_key(&self.prefix, &prepared.extension);

        storage
            .upload_object(&key, prepared.bytes, prepared.content_type)
            .await?;

        let url = storage.public_url(&key);
        debug!(key = %key, url = %url, "Image uploaded");
        Ok(url)
    }

    /// Apply the HEIC transcode and pick the extension and content type.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Transcode`] if a HEIC image cannot be re-encoded.
    pub fn prepare(&self, reference: &str, bytes: Vec<u8>) -> Result<PreparedImage, ImageError> {
        let extension = extension_of(reference);

        let (extension, bytes) = if extension == "heic" {
            debug!("Transcoding HEIC image to JPEG");
            (DEFAULT_EXTENSION.to_string(), self.transcoder.to_jpeg(&bytes)?)
        } else {
            (extension, bytes)
        };

        Ok(PreparedImage {
            content_type: content_type_for(&extension),
            extension,
            bytes,
        })
    }

    async fn read(&self, reference: &str) -> Result<Vec<u8>, ImageError> {
        if is_remote(reference) {
            let response = self
                .http
                .get(reference)
                .send()
                .await
                .map_err(|e| ImageError::Fetch(e.to_string()))?;

            if !response.status().is_success() {
                return Err(ImageError::Fetch(format!(
                    "{reference} returned {}",
                    response.status()
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| ImageError::Fetch(e.to_string()))?;
            return Ok(bytes.to_vec());
        }

        let path = reference.strip_prefix("file://").unwrap_or(reference);
        tokio::fs::read(path).await.map_err(|source| ImageError::Read {
            path: path.to_string(),
            source,
        })
    }
}

/// Whether a reference points at a remote object rather than a local file.
fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Lowercased extension of the last path segment, ignoring any query string.
#[must_use]
pub fn extension_of(reference: &str) -> String {
    let without_query = reference.split(['?', '#']).next().unwrap_or(reference);
    let file_name = without_query.rsplit('/').next().unwrap_or(without_query);

    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map_or_else(|| DEFAULT_EXTENSION.to_string(), str::to_ascii_lowercase)
}

/// MIME type for an extension, restricted to the formats the bucket accepts.
#[must_use]
pub fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}

/// Unique key `<prefix>/<unix-millis>_<random>.<ext>`.
#[must_use]
pub fn storage_key(prefix: &str, extension: &str) -> String {
    format_key(prefix, Utc::now().timestamp_millis(), &random_suffix(), extension)
}

fn format_key(prefix: &str, millis: i64, suffix: &str, extension: &str) -> String {
    if prefix.is_empty() {
        format!("{millis}_{suffix}.{extension}")
    } else {
        format!("{prefix}/{millis}_{suffix}.{extension}")
    }
}

/// Random lowercase base-36 string.
fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..SUFFIX_LEN)
        .map(|_| char::from_digit(rng.random_range(0..36), 36).unwrap_or('0'))
        .collect()
}
