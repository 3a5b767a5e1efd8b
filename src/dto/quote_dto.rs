use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::quote::{Quote, QuoteCustomization, QuoteItem, QuoteStatus};
use crate::util::money::{Money, MoneyError, Quantity};

// --- Validated DTOs for request validation ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuoteItemRequest {
    #[validate(length(min = 1, max = 200))]
    pub description: String,

    #[validate(length(max = 500))]
    pub detail: Option<String>,

    #[validate(range(min = 0.0, max = 1000000.0))]
    pub quantity: f64,

    /// In reais, e.g. `150.5`.
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
}

impl QuoteItemRequest {
    pub fn to_item(&self) -> Result<QuoteItem, MoneyError> {
        Ok(QuoteItem {
            description: self.description.trim().to_string(),
            detail: self.detail.clone().filter(|d| !d.trim().is_empty()),
            quantity: Quantity::try_from(self.quantity)?,
            unit_price: Money::from_major(self.unit_price),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuoteRequest {
    #[validate(length(min = 2, max = 100))]
    pub client_name: String,

    #[validate(length(min = 6, max = 20))]
    pub client_phone: Option<String>,

    pub valid_until: Option<DateTime<Utc>>,

    #[serde(default)]
    #[validate(length(max = 1000))]
    pub payment_terms: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub notes: String,

    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<QuoteItemRequest>,

    #[serde(default)]
    #[validate(nested)]
    pub customization: QuoteCustomization,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReplaceItemsRequest {
    #[validate(nested)]
    pub items: Vec<QuoteItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateQuoteStatusRequest {
    #[validate(length(min = 1, max = 20))]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteItemResponse {
    pub description: String,
    pub detail: Option<String>,
    pub quantity: Quantity,
    pub unit_price: Money,
    pub line_total: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponseDto {
    pub id: Option<String>,
    pub owner_id: String,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub status: QuoteStatus,
    pub items: Vec<QuoteItemResponse>,
    /// Cents.
    pub total: Money,
    pub total_formatted: String,
    pub payment_terms: String,
    pub notes: String,
    pub valid_until: Option<DateTime<Utc>>,
    pub customization: QuoteCustomization,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Quote> for QuoteResponseDto {
    fn from(quote: Quote) -> Self {
        QuoteResponseDto {
            id: quote.id.map(|id| id.to_hex()),
            owner_id: quote.owner_id.to_hex(),
            total_formatted: quote.total.to_string(),
            items: quote
                .items
                .iter()
                .map(|item| QuoteItemResponse {
                    description: item.description.clone(),
                    detail: item.detail.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    line_total: item.line_total(),
                })
                .collect(),
            client_name: quote.client_name,
            client_phone: quote.client_phone,
            status: quote.status,
            total: quote.total,
            payment_terms: quote.payment_terms,
            notes: quote.notes,
            valid_until: quote.valid_until,
            customization: quote.customization,
            created_at: quote.created_at,
            updated_at: quote.updated_at,
        }
    }
}
