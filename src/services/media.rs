use crate::error::{BlogError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// URL prefix uploaded files are served under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
];

#[derive(Debug, Clone, Serialize)]
pub struct UploadedImage {
    pub filename: String,
    pub url: String,
}

/// Stores an uploaded image under `upload_dir` and returns the URL a post
/// can reference it by.
pub fn upload_image(
    upload_dir: &Path,
    original_name: &str,
    mime_type: &str,
    data: &[u8],
    max_bytes: usize,
) -> Result<UploadedImage> {
    if data.is_empty() {
        return Err(BlogError::InvalidInput("Uploaded file is empty".into()));
    }

    if data.len() > max_bytes {
        return Err(BlogError::InvalidInput(format!(
            "File too large: {} bytes (max {} bytes)",
            data.len(),
            max_bytes
        )));
    }

    if !ALLOWED_MIME_TYPES.contains(&mime_type) {
        return Err(BlogError::InvalidInput(format!(
            "File type not allowed: {}. Allowed types: {}",
            mime_type,
            ALLOWED_MIME_TYPES.join(", ")
        )));
    }

    let detected = infer::get(data).map(|kind| kind.mime_type());
    if detected != Some(mime_type) {
        return Err(BlogError::InvalidInput(format!(
            "File content does not match declared type {}",
            mime_type
        )));
    }

    let filename = format!("{}_{}", Uuid::new_v4(), sanitize_filename(original_name));

    std::fs::create_dir_all(upload_dir)?;
    std::fs::write(upload_dir.join(&filename), data)?;
    tracing::info!("Stored upload {} ({} bytes)", filename, data.len());

    Ok(UploadedImage {
        url: format!("{}/{}", UPLOADS_URL_PREFIX, filename),
        filename,
    })
}

/// Maps a requested file name to a path inside `upload_dir`, refusing
/// anything that would escape it.
pub fn resolve_upload(upload_dir: &Path, filename: &str) -> Option<PathBuf> {
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        return None;
    }

    let canonical_dir = upload_dir.canonicalize().ok()?;
    let canonical_file = upload_dir.join(filename).canonicalize().ok()?;
    canonical_file
        .starts_with(&canonical_dir)
        .then_some(canonical_file)
}

fn sanitize_filename(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Parses sizes such as `"10MB"`, `"512KB"` or `"2048"` into bytes.
pub fn parse_size(value: &str) -> Option<usize> {
    let value = value.trim();
    let upper = value.to_ascii_uppercase();

    let (digits, multiplier) = if let Some(n) = upper.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = upper.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = upper.strip_suffix('B') {
        (n, 1)
    } else {
        (upper.as_str(), 1)
    };

    digits.trim().parse::<usize>().ok()?.checked_mul(multiplier)
}
