use std::path::Path;

use super::RejectionReason;
use crate::models::enums::MediaSubtype;

/// Number of leading bytes inspected for format detection.
pub const SIGNATURE_LEN: usize = 4;

/// Resolve a caller-supplied media label ("image/png", "jpg", ...) to an
/// accepted subtype. The label is attacker-controlled metadata: it only
/// gates cheap rejection and is cross-checked against content later.
pub fn resolve_declared_type(label: &str) -> Result<MediaSubtype, RejectionReason> {
    let lowered = label.trim().to_ascii_lowercase();
    // Drop MIME parameters such as "; charset=binary"
    let essence = lowered.split(';').next().unwrap_or("").trim();
    let subtype = essence.strip_prefix("image/").unwrap_or(essence);

    match subtype {
        "jpeg" | "jpg" | "pjpeg" => Ok(MediaSubtype::Jpeg),
        "png" => Ok(MediaSubtype::Png),
        "gif" => Ok(MediaSubtype::Gif),
        "webp" => Ok(MediaSubtype::Webp),
        _ => Err(RejectionReason::UnsupportedFormat(if label.trim().is_empty() {
            "unknown".to_string()
        } else {
            label.trim().to_string()
        })),
    }
}

/// Derive the declared type from a file name when no explicit label is given.
pub fn declared_type_from_path(path: &Path) -> Result<MediaSubtype, RejectionReason> {
    match mime_guess::from_path(path).first() {
        Some(mime) => resolve_declared_type(mime.essence_str()),
        None => Err(RejectionReason::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{e}"))
                .unwrap_or_else(|| "unknown".to_string()),
        )),
    }
}

/// Detect the format from magic bytes (NOT labels or extensions).
pub fn detect_signature(header: &[u8]) -> Option<MediaSubtype> {
    match header {
        [0xFF, 0xD8, 0xFF, ..] => Some(MediaSubtype::Jpeg),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some(MediaSubtype::Png),
        [0x47, 0x49, 0x46, 0x38, ..] => Some(MediaSubtype::Gif),
        [0x52, 0x49, 0x46, 0x46, ..] => Some(MediaSubtype::Webp),
        _ => None,
    }
}

/// Check that the content signature agrees with the declared type.
pub fn verify_signature(
    declared: MediaSubtype,
    header: &[u8],
) -> Result<MediaSubtype, RejectionReason> {
    match detect_signature(header) {
        None => Err(RejectionReason::NotAnImage),
        Some(detected) if detected != declared => {
            Err(RejectionReason::SignatureMismatch { declared, detected })
        }
        Some(detected) => Ok(detected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_mime_labels() {
        assert_eq!(resolve_declared_type("image/jpeg").unwrap(), MediaSubtype::Jpeg);
        assert_eq!(resolve_declared_type("image/png").unwrap(), MediaSubtype::Png);
        assert_eq!(resolve_declared_type("image/gif").unwrap(), MediaSubtype::Gif);
        assert_eq!(resolve_declared_type("image/webp").unwrap(), MediaSubtype::Webp);
    }

    #[test]
    fn resolves_loose_labels() {
        assert_eq!(resolve_declared_type(" IMAGE/JPG ").unwrap(), MediaSubtype::Jpeg);
        assert_eq!(resolve_declared_type("png").unwrap(), MediaSubtype::Png);
        assert_eq!(
            resolve_declared_type("image/webp; charset=binary").unwrap(),
            MediaSubtype::Webp
        );
    }

    #[test]
    fn rejects_other_types_as_unsupported() {
        for label in ["image/bmp", "image/tiff", "image/heic", "application/pdf", "text/plain", ""] {
            let err = resolve_declared_type(label).unwrap_err();
            assert!(
                matches!(err, RejectionReason::UnsupportedFormat(_)),
                "{label}: {err:?}"
            );
        }
    }

    #[test]
    fn declared_type_from_extension() {
        assert_eq!(
            declared_type_from_path(Path::new("bottle.JPG")).unwrap(),
            MediaSubtype::Jpeg
        );
        assert_eq!(
            declared_type_from_path(Path::new("/tmp/can.webp")).unwrap(),
            MediaSubtype::Webp
        );
        assert!(matches!(
            declared_type_from_path(Path::new("report.pdf")),
            Err(RejectionReason::UnsupportedFormat(_))
        ));
        assert!(matches!(
            declared_type_from_path(Path::new("no_extension")),
            Err(RejectionReason::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn detect_all_signatures() {
        assert_eq!(detect_signature(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(MediaSubtype::Jpeg));
        assert_eq!(detect_signature(&[0x89, 0x50, 0x4E, 0x47]), Some(MediaSubtype::Png));
        assert_eq!(detect_signature(b"GIF89a"), Some(MediaSubtype::Gif));
        assert_eq!(detect_signature(b"RIFF\x24\x00\x00\x00WEBP"), Some(MediaSubtype::Webp));
    }

    #[test]
    fn unknown_or_short_header_detects_nothing() {
        assert_eq!(detect_signature(b"%PDF"), None);
        assert_eq!(detect_signature(&[0x89, 0x50]), None);
        assert_eq!(detect_signature(&[]), None);
    }

    #[test]
    fn gif_bytes_labelled_png_is_mismatch() {
        let err = verify_signature(MediaSubtype::Png, &[0x47, 0x49, 0x46, 0x38]).unwrap_err();
        match err {
            RejectionReason::SignatureMismatch { declared, detected } => {
                assert_eq!(declared, MediaSubtype::Png);
                assert_eq!(detected, MediaSubtype::Gif);
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn non_image_content_is_not_an_image() {
        let err = verify_signature(MediaSubtype::Jpeg, b"hello world").unwrap_err();
        assert!(matches!(err, RejectionReason::NotAnImage));
    }

    #[test]
    fn matching_signature_passes() {
        assert_eq!(
            verify_signature(MediaSubtype::Jpeg, &[0xFF, 0xD8, 0xFF, 0xDB]).unwrap(),
            MediaSubtype::Jpeg
        );
    }
}
