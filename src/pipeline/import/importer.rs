use std::io::Read;
use std::path::Path;

use base64::Engine as _;

use super::format::{
    declared_type_from_path, resolve_declared_type, verify_signature, SIGNATURE_LEN,
};
use super::payload::ImagePayload;
use super::RejectionReason;
use crate::config::MAX_IMAGE_BYTES;

/// Validate an image file on disk and encode it as a payload.
///
/// Checks run cheapest first: declared type (no I/O), size (metadata only),
/// content signature (first 4 bytes), then the full read.
/// `declared_type` is the uploader's media label; when `None` the file
/// extension stands in for it.
pub fn ingest_file(
    path: &Path,
    declared_type: Option<&str>,
) -> Result<ImagePayload, RejectionReason> {
    let result = ingest_file_inner(path, declared_type);
    if let Err(e) = &result {
        tracing::warn!(code = e.code(), error = %e, "Image rejected");
    }
    result
}

fn ingest_file_inner(
    path: &Path,
    declared_type: Option<&str>,
) -> Result<ImagePayload, RejectionReason> {
    let declared = match declared_type {
        Some(label) => resolve_declared_type(label)?,
        None => declared_type_from_path(path)?,
    };

    let size = std::fs::metadata(path)?.len();
    check_size(size)?;

    let file = std::fs::File::open(path)?;
    // The file may grow between stat and read; never buffer past the limit.
    let mut limited = file.take(MAX_IMAGE_BYTES + 1);

    let mut bytes = Vec::with_capacity(size as usize);
    (&mut limited)
        .take(SIGNATURE_LEN as u64)
        .read_to_end(&mut bytes)?;
    let subtype = verify_signature(declared, &bytes)?;

    limited.read_to_end(&mut bytes)?;
    check_size(bytes.len() as u64)?;

    tracing::debug!(
        subtype = %subtype,
        bytes = bytes.len(),
        "Image accepted"
    );
    Ok(ImagePayload::from_verified_bytes(subtype, &bytes))
}

/// Validate an in-memory image (e.g. a multipart upload body).
pub fn ingest_bytes(bytes: &[u8], declared_type: &str) -> Result<ImagePayload, RejectionReason> {
    let declared = resolve_declared_type(declared_type)?;
    check_size(bytes.len() as u64)?;
    let header = &bytes[..bytes.len().min(SIGNATURE_LEN)];
    let subtype = verify_signature(declared, header)?;
    Ok(ImagePayload::from_verified_bytes(subtype, bytes))
}

/// Validate a browser-style `data:<mime>;base64,<data>` URL.
///
/// The MIME label inside the URL is treated as the declared type and is
/// cross-checked against the decoded content like any other label.
pub fn ingest_data_url(data_url: &str) -> Result<ImagePayload, RejectionReason> {
    let rest = data_url
        .trim()
        .strip_prefix("data:")
        .ok_or(RejectionReason::NotAnImage)?;
    let (meta, data) = rest.split_once(',').ok_or(RejectionReason::NotAnImage)?;

    let mime = meta
        .strip_suffix(";base64")
        .ok_or(RejectionReason::NotAnImage)?;
    let declared = resolve_declared_type(mime)?;

    // MIME-style encoders wrap lines
    let data: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    check_size(decoded_len_estimate(&data))?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&data)
        .map_err(|_| RejectionReason::NotAnImage)?;
    check_size(bytes.len() as u64)?;

    let header = &bytes[..bytes.len().min(SIGNATURE_LEN)];
    let subtype = verify_signature(declared, header)?;
    Ok(ImagePayload::from_verified_bytes(subtype, &bytes))
}

/// Decoded size of padded base64, exact for well-formed input.
fn decoded_len_estimate(data: &str) -> u64 {
    let padding = data.bytes().rev().take_while(|&b| b == b'=').count().min(2) as u64;
    (data.len() as u64 / 4 * 3).saturating_sub(padding)
}

fn check_size(size_bytes: u64) -> Result<(), RejectionReason> {
    if size_bytes > MAX_IMAGE_BYTES {
        return Err(RejectionReason::TooLarge {
            size_bytes,
            max_bytes: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}
