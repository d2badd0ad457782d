//! User-facing messages in every supported display language.

use crate::models::enums::Locale;
use crate::pipeline::classification::ClassificationError;
use crate::pipeline::import::RejectionReason;
use crate::pipeline::processor::SubmitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    SelectImage,
    UnsupportedFormat,
    TooLarge,
    SignatureMismatch,
    ReadFailure,
    NotConfigured,
    AnalysisFailed,
    TimedOut,
    Cancelled,
    Analyzing,
}

impl MessageKey {
    pub const ALL: &'static [MessageKey] = &[
        Self::SelectImage,
        Self::UnsupportedFormat,
        Self::TooLarge,
        Self::SignatureMismatch,
        Self::ReadFailure,
        Self::NotConfigured,
        Self::AnalysisFailed,
        Self::TimedOut,
        Self::Cancelled,
        Self::Analyzing,
    ];

    /// Message to show for a failed submission.
    pub fn for_error(error: &SubmitError) -> Self {
        match error {
            SubmitError::Rejected(reason) => match reason {
                RejectionReason::NotAnImage => Self::SelectImage,
                RejectionReason::UnsupportedFormat(_) => Self::UnsupportedFormat,
                RejectionReason::TooLarge { .. } => Self::TooLarge,
                RejectionReason::SignatureMismatch { .. } => Self::SignatureMismatch,
                RejectionReason::ReadFailure(_) => Self::ReadFailure,
            },
            SubmitError::Classification(failed) => match failed.cause {
                ClassificationError::Configuration(_) => Self::NotConfigured,
                ClassificationError::Timeout(_) => Self::TimedOut,
                ClassificationError::Cancelled => Self::Cancelled,
                _ => Self::AnalysisFailed,
            },
        }
    }
}

pub fn text(key: MessageKey, locale: Locale) -> &'static str {
    use MessageKey::*;
    match (key, locale) {
        (SelectImage, Locale::En) => "Please select an image",
        (SelectImage, Locale::Ur) => "براہ کرم ایک تصویر منتخب کریں",
        (SelectImage, Locale::Ar) => "يرجى تحديد صورة",

        (UnsupportedFormat, Locale::En) => {
            "Unsupported image format. Please use JPEG, PNG, GIF or WebP."
        }
        (UnsupportedFormat, Locale::Ur) => {
            "تصویر کی یہ قسم قابل قبول نہیں۔ براہ کرم JPEG، PNG، GIF یا WebP استعمال کریں۔"
        }
        (UnsupportedFormat, Locale::Ar) => {
            "صيغة الصورة غير مدعومة. يرجى استخدام JPEG أو PNG أو GIF أو WebP."
        }

        (TooLarge, Locale::En) => "Image must be less than 5MB",
        (TooLarge, Locale::Ur) => "تصویر 5MB سے کم ہونی چاہیے",
        (TooLarge, Locale::Ar) => "يجب أن تكون الصورة أقل من 5 ميجابايت",

        (SignatureMismatch, Locale::En) => {
            "The file content does not match its image type. Please select a valid image."
        }
        (SignatureMismatch, Locale::Ur) => {
            "فائل کا مواد اس کی تصویر کی قسم سے مطابقت نہیں رکھتا۔ براہ کرم درست تصویر منتخب کریں۔"
        }
        (SignatureMismatch, Locale::Ar) => {
            "محتوى الملف لا يطابق نوع الصورة. يرجى تحديد صورة صالحة."
        }

        (ReadFailure, Locale::En) => "The image could not be read. Please try another file.",
        (ReadFailure, Locale::Ur) => "تصویر پڑھی نہیں جا سکی۔ براہ کرم کوئی اور فائل آزمائیں۔",
        (ReadFailure, Locale::Ar) => "تعذرت قراءة الصورة. يرجى تجربة ملف آخر.",

        (NotConfigured, Locale::En) => {
            "The analysis service is not configured. Please set an API key."
        }
        (NotConfigured, Locale::Ur) => {
            "تجزیاتی سروس ترتیب نہیں دی گئی۔ براہ کرم API کلید سیٹ کریں۔"
        }
        (NotConfigured, Locale::Ar) => "خدمة التحليل غير مهيأة. يرجى تعيين مفتاح API.",

        (AnalysisFailed, Locale::En) => {
            "System analysis failed. Please verify connection and retry."
        }
        (AnalysisFailed, Locale::Ur) => "تجزیہ ناکام ہو گیا۔ دوبارہ کوشش کریں۔",
        (AnalysisFailed, Locale::Ar) => "فشل التحليل. حاول مرة أخرى.",

        (TimedOut, Locale::En) => {
            "Analysis took too long. Please check your connection and retry."
        }
        (TimedOut, Locale::Ur) => "تجزیے میں بہت دیر ہو گئی۔ کنکشن چیک کر کے دوبارہ کوشش کریں۔",
        (TimedOut, Locale::Ar) => "استغرق التحليل وقتًا طويلاً. تحقق من الاتصال وحاول مرة أخرى.",

        (Cancelled, Locale::En) => "Analysis cancelled.",
        (Cancelled, Locale::Ur) => "تجزیہ منسوخ کر دیا گیا۔",
        (Cancelled, Locale::Ar) => "تم إلغاء التحليل.",

        (Analyzing, Locale::En) => "Processing Stream...",
        (Analyzing, Locale::Ur) => "تجزیہ جاری ہے...",
        (Analyzing, Locale::Ar) => "جاري المعالجة...",
    }
}

/// Localized message for a failed submission.
pub fn message_for(error: &SubmitError, locale: Locale) -> &'static str {
    text(MessageKey::for_error(error), locale)
}
