use serde::{Deserialize, Serialize};

/// A string that does not name any member of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field} value: '{value}'")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(DisposalType {
    Hazard => "HAZARD",
    Compost => "COMPOST",
    Recycle => "RECYCLE",
    Trash => "TRASH",
});

str_enum!(Locale {
    En => "en",
    Ur => "ur",
    Ar => "ar",
});

str_enum!(MediaSubtype {
    Jpeg => "jpeg",
    Png => "png",
    Gif => "gif",
    Webp => "webp",
});

impl DisposalType {
    /// Display glyph per category.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Hazard => "⚠️",
            Self::Compost => "🍃",
            Self::Recycle => "♻️",
            Self::Trash => "🗑️",
        }
    }
}

impl Locale {
    /// Urdu and Arabic render right-to-left.
    pub fn is_rtl(&self) -> bool {
        matches!(self, Self::Ur | Self::Ar)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::En
    }
}

impl MediaSubtype {
    /// Leading content bytes that identify the encoded format.
    /// WebP is a RIFF container; only the container tag is checked.
    pub fn signature(&self) -> &'static [u8] {
        match self {
            Self::Jpeg => &[0xFF, 0xD8, 0xFF],
            Self::Png => &[0x89, 0x50, 0x4E, 0x47],
            Self::Gif => &[0x47, 0x49, 0x46, 0x38],
            Self::Webp => &[0x52, 0x49, 0x46, 0x46],
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn disposal_type_round_trips_canonical_names() {
        for t in DisposalType::ALL {
            assert_eq!(DisposalType::from_str(t.as_str()).unwrap(), *t);
        }
        assert_eq!(DisposalType::ALL.len(), 4);
    }

    #[test]
    fn disposal_type_parse_is_exact() {
        let err = DisposalType::from_str("recycle").unwrap_err();
        assert_eq!(err.field, "DisposalType");
        assert_eq!(err.value, "recycle");
        assert!(err.to_string().contains("recycle"));
    }

    #[test]
    fn disposal_type_serializes_upper_case() {
        let json = serde_json::to_string(&DisposalType::Compost).unwrap();
        assert_eq!(json, "\"COMPOST\"");
    }

    #[test]
    fn rtl_locales() {
        assert!(!Locale::En.is_rtl());
        assert!(Locale::Ur.is_rtl());
        assert!(Locale::Ar.is_rtl());
        assert_eq!(Locale::default(), Locale::En);
    }

    #[test]
    fn media_subtype_mime_and_signature() {
        assert_eq!(MediaSubtype::Png.mime_type(), "image/png");
        assert_eq!(MediaSubtype::Jpeg.signature(), &[0xFF_u8, 0xD8, 0xFF][..]);
        assert_eq!(MediaSubtype::Webp.signature(), &b"RIFF"[..]);
        assert_eq!(MediaSubtype::Gif.signature(), &b"GIF8"[..]);
    }

    #[test]
    fn icons_are_distinct() {
        let icons: std::collections::HashSet<_> =
            DisposalType::ALL.iter().map(|t| t.icon()).collect();
        assert_eq!(icons.len(), 4);
    }
}
