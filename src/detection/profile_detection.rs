//! Client profile detection.
//!
//! Looks at a quote's value and the client/business naming to pick a
//! document layout, a tone, an information density and the optional
//! content blocks to render. Pure and deterministic.

use serde::{Deserialize, Serialize};

use crate::model::profile::{LayoutStyle, Profile};
use crate::model::quote::Quote;
use crate::util::money::Money;

/// Above this value a quote is treated as corporate.
pub const CORPORATE_THRESHOLD: Money = Money::from_cents(500_000);
/// Above this value (and up to the corporate threshold) a quote is mid tier.
pub const MID_TIER_THRESHOLD: Money = Money::from_cents(50_000);

/// Substrings marking a corporate name. Matching is case-insensitive.
///
/// Sector nouns ("serviços", "tecnologia") and short abbreviations ("me",
/// "sa") produce false positives for small businesses; the list is kept as
/// it is used in production.
pub const CORPORATE_MARKERS: &[&str] = &[
    "ltda",
    "limitada",
    "s.a.",
    "s/a",
    "sa",
    "sociedade anônima",
    "me",
    "mei",
    "eireli",
    "epp",
    "empresa",
    "indústria",
    "comércio",
    "serviços",
    "tecnologia",
    "solutions",
    "sistemas",
    "engenharia",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Friendly,
    Balanced,
    Corporate,
}

impl Tone {
    pub fn css_class(self) -> &'static str {
        match self {
            Tone::Friendly => "tone-friendly",
            Tone::Balanced => "tone-balanced",
            Tone::Corporate => "tone-corporate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Spacious,
    Normal,
    Compact,
}

impl Density {
    pub fn css_class(self) -> &'static str {
        match self {
            Density::Spacious => "density-spacious",
            Density::Normal => "density-normal",
            Density::Compact => "density-compact",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extra {
    Timeline,
    Warranty,
    Terms,
    Signatures,
    ValueProposition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// Which signal fired the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSignal {
    CorporateName,
    HighValue,
    MidValue,
    LowValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDetection {
    pub layout: LayoutStyle,
    pub tone: Tone,
    pub density: Density,
    pub extras: Vec<Extra>,
    pub signal: DetectionSignal,
    /// Operator-facing explanation. Never used for decisions.
    pub reason: String,
}

impl ProfileDetection {
    pub fn shows(&self, extra: Extra) -> bool {
        self.extras.contains(&extra)
    }
}

/// The parts of a quote the classifier looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteSignals<'a> {
    pub total: Money,
    pub client_name: &'a str,
    pub item_count: usize,
}

impl<'a> From<&'a Quote> for QuoteSignals<'a> {
    fn from(quote: &'a Quote) -> Self {
        QuoteSignals {
            total: quote.total,
            client_name: &quote.client_name,
            item_count: quote.items.len(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSignals<'a> {
    pub business_name: Option<&'a str>,
}

impl<'a> From<&'a Profile> for ProfileSignals<'a> {
    fn from(profile: &'a Profile) -> Self {
        ProfileSignals {
            business_name: profile.business_name.as_deref(),
        }
    }
}

/// Returns the name the corporate heuristic inspects: the business name
/// when present and non-empty, the client name otherwise.
fn inspected_name<'a>(quote: &QuoteSignals<'a>, profile: &ProfileSignals<'a>) -> &'a str {
    match profile.business_name {
        Some(name) if !name.is_empty() => name,
        _ => quote.client_name,
    }
}

pub fn is_corporate_name(name: &str) -> bool {
    let lowered = name.to_lowercase();
    CORPORATE_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Item-count complexity. Exposed on its own; `classify` does not use it.
pub fn quote_complexity(item_count: usize) -> Complexity {
    match item_count {
        0..=3 => Complexity::Low,
        4..=10 => Complexity::Medium,
        _ => Complexity::High,
    }
}

pub fn classify(quote: &QuoteSignals<'_>, profile: &ProfileSignals<'_>) -> ProfileDetection {
    let total = quote.total;
    let name = inspected_name(quote, profile);
    let corporate = is_corporate_name(name);

    if total > CORPORATE_THRESHOLD || corporate {
        let (signal, reason) = if corporate {
            (
                DetectionSignal::CorporateName,
                format!("Cliente corporativo detectado: \"{}\"", name),
            )
        } else {
            (
                DetectionSignal::HighValue,
                format!("Orçamento de alto valor: {}", total),
            )
        };
        return ProfileDetection {
            layout: LayoutStyle::Classic,
            tone: Tone::Corporate,
            density: Density::Compact,
            extras: vec![Extra::Terms, Extra::Signatures, Extra::Warranty],
            signal,
            reason,
        };
    }

    if total > MID_TIER_THRESHOLD {
        return ProfileDetection {
            layout: LayoutStyle::Professional,
            tone: Tone::Balanced,
            density: Density::Normal,
            extras: vec![Extra::Warranty, Extra::Timeline, Extra::ValueProposition],
            signal: DetectionSignal::MidValue,
            reason: format!("Orçamento de médio valor: {}", total),
        };
    }

    // Zero and negative totals land here too.
    ProfileDetection {
        layout: LayoutStyle::Modern,
        tone: Tone::Friendly,
        density: Density::Spacious,
        extras: vec![Extra::Timeline, Extra::ValueProposition, Extra::Warranty],
        signal: DetectionSignal::LowValue,
        reason: format!("Orçamento de baixo valor: {}", total),
    }
}
