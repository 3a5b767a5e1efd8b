use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::util::money::{Money, Quantity};

/// Lifecycle of a quote. `pending` is a legacy label for `draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[serde(alias = "pending")]
    Draft,
    Sent,
    Approved,
    Rejected,
}

impl QuoteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Approved => "approved",
            QuoteStatus::Rejected => "rejected",
        }
    }

    pub fn is_awaiting_decision(self) -> bool {
        matches!(self, QuoteStatus::Draft | QuoteStatus::Sent)
    }

    pub fn is_final(self) -> bool {
        matches!(self, QuoteStatus::Approved | QuoteStatus::Rejected)
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" | "pending" => Ok(QuoteStatus::Draft),
            "sent" => Ok(QuoteStatus::Sent),
            "approved" => Ok(QuoteStatus::Approved),
            "rejected" => Ok(QuoteStatus::Rejected),
            other => Err(QuoteError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    #[error("Unknown quote status: {0}")]
    UnknownStatus(String),

    #[error("Quote already {current}, cannot change to {requested}")]
    AlreadyFinalized {
        current: QuoteStatus,
        requested: QuoteStatus,
    },

    #[error("Cannot move quote from {from} to {to}")]
    InvalidTransition { from: QuoteStatus, to: QuoteStatus },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub quantity: Quantity,
    pub unit_price: Money,
}

impl QuoteItem {
    pub fn new(description: impl Into<String>, quantity: Quantity, unit_price: Money) -> Self {
        QuoteItem {
            description: description.into(),
            detail: None,
            quantity,
            unit_price,
        }
    }

    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// Optional sections the owner toggles while editing a quote.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct QuoteCustomization {
    pub show_timeline: bool,
    pub show_payment_options: bool,
    #[validate(range(min = 1, max = 365))]
    pub estimated_days: Option<u32>,
    #[validate(range(max = 100))]
    pub cash_discount_percent: u8,
    pub installment_count: Option<u8>,
    pub payment_methods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub owner_id: ObjectId,
    pub client_name: String,
    #[serde(default)]
    pub client_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_terms: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub items: Vec<QuoteItem>,
    pub total: Money,
    pub status: QuoteStatus,
    #[serde(default)]
    pub customization: QuoteCustomization,
}

impl Quote {
    pub fn new_draft(
        owner_id: ObjectId,
        client_name: impl Into<String>,
        items: Vec<QuoteItem>,
        now: DateTime<Utc>,
    ) -> Self {
        let total = items.iter().map(QuoteItem::line_total).sum();
        Quote {
            id: None,
            owner_id,
            client_name: client_name.into(),
            client_phone: None,
            created_at: now,
            updated_at: now,
            valid_until: None,
            payment_terms: String::new(),
            notes: String::new(),
            items,
            total,
            status: QuoteStatus::Draft,
            customization: QuoteCustomization::default(),
        }
    }

    pub fn computed_total(&self) -> Money {
        self.items.iter().map(QuoteItem::line_total).sum()
    }

    /// Replaces the item list and recomputes the stored total.
    pub fn replace_items(&mut self, items: Vec<QuoteItem>, now: DateTime<Utc>) {
        self.items = items;
        self.total = self.computed_total();
        self.updated_at = now;
    }

    /// Returns true when the stored total was stale.
    pub fn recompute_total(&mut self) -> bool {
        let computed = self.computed_total();
        let stale = computed != self.total;
        self.total = computed;
        stale
    }

    /// Applies a status change. Re-applying the current status is a no-op
    /// and returns `Ok(false)`.
    pub fn transition(&mut self, to: QuoteStatus, now: DateTime<Utc>) -> Result<bool, QuoteError> {
        let from = self.status;
        if from == to {
            return Ok(false);
        }
        if from.is_final() {
            return Err(QuoteError::AlreadyFinalized {
                current: from,
                requested: to,
            });
        }
        match (from, to) {
            (QuoteStatus::Draft, QuoteStatus::Sent)
            | (_, QuoteStatus::Approved)
            | (_, QuoteStatus::Rejected) => {
                self.status = to;
                self.updated_at = now;
                Ok(true)
            }
            _ => Err(QuoteError::InvalidTransition { from, to }),
        }
    }
}
