use base64::Engine as _;

use crate::models::enums::MediaSubtype;

/// A validated, self-describing image ready for the model.
///
/// Only the importer constructs one, after the content signature has been
/// checked against the declared type, so `subtype` always describes `encoded`.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    subtype: MediaSubtype,
    encoded: String,
    byte_len: usize,
}

impl ImagePayload {
    pub(crate) fn from_verified_bytes(subtype: MediaSubtype, bytes: &[u8]) -> Self {
        Self {
            subtype,
            encoded: base64::engine::general_purpose::STANDARD.encode(bytes),
            byte_len: bytes.len(),
        }
    }

    pub fn subtype(&self) -> MediaSubtype {
        self.subtype
    }

    pub fn mime_type(&self) -> &'static str {
        self.subtype.mime_type()
    }

    /// Standard base64 of the original file content.
    pub fn base64_data(&self) -> &str {
        &self.encoded
    }

    /// Size of the decoded image in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// `data:` URL for previews.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.encoded)
    }
}

// Keep image content out of logs and panic messages.
impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("subtype", &self.subtype)
            .field("byte_len", &self.byte_len)
            .finish_non_exhaustive()
    }
}
