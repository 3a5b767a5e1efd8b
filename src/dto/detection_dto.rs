use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::detection::category::CategoryInfo;
use crate::model::color::HexColor;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryQuery {
    #[validate(length(max = 500))]
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub description: String,
    pub category: CategoryInfo,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ColorAdjustQuery {
    #[validate(length(min = 3, max = 7))]
    pub hex: String,
    /// Clamped to `-100..=100`.
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorAdjustResponse {
    pub input: HexColor,
    pub percent: f64,
    pub hex: HexColor,
}
