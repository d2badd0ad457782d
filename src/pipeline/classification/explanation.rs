//! Per-category explanation templates, used when the model leaves a locale's
//! explanation empty. `{item}` is replaced with the validated item name.

use crate::models::enums::{DisposalType, Locale};

const ITEM_SLOT: &str = "{item}";

fn template(locale: Locale, disposal_type: DisposalType) -> &'static str {
    match (locale, disposal_type) {
        (Locale::En, DisposalType::Hazard) => {
            "{item} is hazardous waste. Take it to a designated hazardous waste collection point and keep it out of regular bins."
        }
        (Locale::En, DisposalType::Compost) => {
            "{item} is compostable. Place it in the compost bin."
        }
        (Locale::En, DisposalType::Recycle) => {
            "{item} is recyclable. Rinse it if needed and place it in the recycling bin."
        }
        (Locale::En, DisposalType::Trash) => {
            "{item} cannot be recycled or composted. Dispose of it in the general trash bin."
        }

        (Locale::Ur, DisposalType::Hazard) => {
            "{item} خطرناک فضلہ ہے۔ اسے خطرناک فضلہ جمع کرنے کے مخصوص مقام پر لے جائیں اور عام کوڑے دان میں نہ ڈالیں۔"
        }
        (Locale::Ur, DisposalType::Compost) => {
            "{item} سے کھاد بن سکتی ہے۔ اسے کمپوسٹ بن میں ڈالیں۔"
        }
        (Locale::Ur, DisposalType::Recycle) => {
            "{item} ری سائیکل ہو سکتی ہے۔ ضرورت ہو تو دھو کر ری سائیکلنگ بن میں ڈالیں۔"
        }
        (Locale::Ur, DisposalType::Trash) => {
            "{item} نہ ری سائیکل ہو سکتی ہے نہ اس سے کھاد بن سکتی ہے۔ اسے عام کوڑے دان میں پھینکیں۔"
        }

        (Locale::Ar, DisposalType::Hazard) => {
            "{item} من النفايات الخطرة. انقله إلى نقطة جمع النفايات الخطرة المخصصة ولا تضعه في الحاويات العادية."
        }
        (Locale::Ar, DisposalType::Compost) => {
            "{item} قابل للتحويل إلى سماد. ضعه في حاوية السماد."
        }
        (Locale::Ar, DisposalType::Recycle) => {
            "{item} قابل لإعادة التدوير. اشطفه عند الحاجة وضعه في حاوية إعادة التدوير."
        }
        (Locale::Ar, DisposalType::Trash) => {
            "{item} غير قابل لإعادة التدوير أو التسميد. تخلص منه في سلة القمامة العامة."
        }
    }
}

/// Synthesize an explanation for `item_name` in `locale`.
pub fn fallback_explanation(locale: Locale, disposal_type: DisposalType, item_name: &str) -> String {
    template(locale, disposal_type).replace(ITEM_SLOT, item_name)
}
