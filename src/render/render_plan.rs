use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::detection::category::{detect_category, CategoryInfo};
use crate::detection::profile_detection::{
    classify, quote_complexity, Complexity, Extra, ProfileDetection, ProfileSignals, QuoteSignals,
};
use crate::model::color::{HexColor, DEFAULT_THEME_COLOR};
use crate::model::profile::{LayoutStyle, Profile};
use crate::model::quote::{Quote, QuoteStatus};
use crate::util::money::{Money, Quantity};

/// Quotes without an explicit expiry stay valid this long after creation.
pub const DEFAULT_VALIDITY_DAYS: i64 = 7;
/// Brightness shift between the theme color and its gradient stop.
pub const ACCENT_GRADIENT_PERCENT: f64 = 15.0;

const DEFAULT_PAYMENT_METHODS: [&str; 4] = ["pix", "card", "cash", "installment"];

const WARRANTY_POINTS: [&str; 3] = [
    "Garantia de qualidade em todos os serviços",
    "Profissionais qualificados e experientes",
    "Prazo de execução garantido",
];

const VALUE_POINTS: [ValuePoint; 3] = [
    ValuePoint {
        title: "Melhor Custo-Benefício",
        description: "Preços justos sem abrir mão da qualidade",
    },
    ValuePoint {
        title: "Atendimento Personalizado",
        description: "Suporte dedicado durante todo o projeto",
    },
    ValuePoint {
        title: "Experiência Comprovada",
        description: "Anos de mercado com clientes satisfeitos",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutSource {
    Preference,
    Detected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessHeader {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderItem {
    pub description: String,
    pub detail: Option<String>,
    pub quantity: Quantity,
    pub unit_price: Money,
    pub line_total: Money,
    pub category: CategoryInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePhase {
    pub phase: &'static str,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub phases: Vec<TimelinePhase>,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOption {
    pub method: String,
    pub title: &'static str,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOptions {
    pub options: Vec<PaymentOption>,
    pub cash_discount_note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValuePoint {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermsSection {
    pub payment_terms: String,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Urgent,
    ExpiringSoon,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrgencyBadge {
    pub level: UrgencyLevel,
    pub days_remaining: i64,
    pub expires_at: DateTime<Utc>,
    pub headline: &'static str,
    pub label: String,
}

/// Everything the document renderer needs to draw one quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub quote_id: Option<String>,
    pub status: QuoteStatus,
    pub client_name: String,
    pub detection: ProfileDetection,
    pub layout: LayoutStyle,
    pub layout_source: LayoutSource,
    pub tone_class: &'static str,
    pub density_class: &'static str,
    pub theme_color: HexColor,
    pub accent_gradient: HexColor,
    pub complexity: Complexity,
    pub business: BusinessHeader,
    pub items: Vec<RenderItem>,
    pub total: Money,
    pub total_formatted: String,
    pub timeline: Option<Timeline>,
    pub payment_options: Option<PaymentOptions>,
    pub warranty: Option<Vec<&'static str>>,
    pub value_proposition: Option<Vec<ValuePoint>>,
    pub terms: Option<TermsSection>,
    pub signatures: bool,
    pub urgency: Option<UrgencyBadge>,
    pub approval_url: Option<String>,
}

/// Combines classifier output, the owner's explicit preferences and the
/// quote's own section toggles. `public_base_url` prefixes the approval link.
pub fn build_render_plan(
    quote: &Quote,
    profile: &Profile,
    now: DateTime<Utc>,
    public_base_url: &str,
) -> RenderPlan {
    let detection = classify(&QuoteSignals::from(quote), &ProfileSignals::from(profile));

    let (layout, layout_source) = match profile.layout_style {
        Some(layout) => (layout, LayoutSource::Preference),
        None => (detection.layout, LayoutSource::Detected),
    };

    let theme_color = profile.theme_color.unwrap_or(DEFAULT_THEME_COLOR);
    let accent_gradient = theme_color.adjust_brightness(ACCENT_GRADIENT_PERCENT);

    let items = quote
        .items
        .iter()
        .map(|item| RenderItem {
            description: item.description.clone(),
            detail: item.detail.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: item.line_total(),
            category: detect_category(&item.description),
        })
        .collect();

    let custom = &quote.customization;
    let timeline = custom.show_timeline.then(|| timeline(custom.estimated_days));
    let payment_options = custom.show_payment_options.then(|| {
        payment_options(&custom.payment_methods, custom.cash_discount_percent, custom.installment_count)
    });

    let warranty = detection.shows(Extra::Warranty).then(|| WARRANTY_POINTS.to_vec());
    let value_proposition = detection.shows(Extra::ValueProposition).then(|| VALUE_POINTS.to_vec());
    let terms = detection.shows(Extra::Terms).then(|| TermsSection {
        payment_terms: quote.payment_terms.clone(),
        notes: quote.notes.clone(),
    });
    let signatures = detection.shows(Extra::Signatures);

    let urgency = if quote.status.is_awaiting_decision() {
        let expires_at = quote
            .valid_until
            .unwrap_or(quote.created_at + Duration::days(DEFAULT_VALIDITY_DAYS));
        urgency_badge(expires_at, now)
    } else {
        None
    };

    let quote_id = quote.id.map(|id| id.to_hex());
    let approval_url = quote_id
        .as_ref()
        .map(|id| format!("{}/quotes/{}/approve", public_base_url.trim_end_matches('/'), id));

    RenderPlan {
        quote_id,
        status: quote.status,
        client_name: quote.client_name.clone(),
        tone_class: detection.tone.css_class(),
        density_class: detection.density.css_class(),
        detection,
        layout,
        layout_source,
        theme_color,
        accent_gradient,
        complexity: quote_complexity(quote.items.len()),
        business: BusinessHeader {
            name: profile.business_name.clone(),
            phone: profile.phone.clone(),
            email: profile.email.clone(),
            logo_url: profile.logo_url.clone(),
        },
        items,
        total: quote.total,
        total_formatted: quote.total.to_string(),
        timeline,
        payment_options,
        warranty,
        value_proposition,
        terms,
        signatures,
        urgency,
        approval_url,
    }
}

pub fn timeline(estimated_days: Option<u32>) -> Timeline {
    let (execution, total) = match estimated_days {
        Some(days) if days > 0 => (format!("{} dias", days), format!("{} dias úteis", u64::from(days) + 3)),
        _ => ("3-5 dias".to_string(), "5-8 dias úteis".to_string()),
    };
    Timeline {
        phases: vec![
            TimelinePhase {
                phase: "Aprovação e Início",
                duration: "1-2 dias".to_string(),
            },
            TimelinePhase {
                phase: "Execução do Serviço",
                duration: execution,
            },
            TimelinePhase {
                phase: "Revisão e Entrega",
                duration: "1 dia".to_string(),
            },
        ],
        total,
    }
}

/// Unknown method keys are skipped. An empty list offers every method.
pub fn payment_options(methods: &[String], cash_discount_percent: u8, installment_count: Option<u8>) -> PaymentOptions {
    let discount = (cash_discount_percent > 0).then(|| format!("À vista com {}% de desconto", cash_discount_percent));

    let keys: Vec<&str> = if methods.is_empty() {
        DEFAULT_PAYMENT_METHODS.to_vec()
    } else {
        methods.iter().map(String::as_str).collect()
    };

    let options = keys
        .into_iter()
        .filter_map(|key| {
            let (title, description) = match key {
                "pix" => ("PIX", discount.clone().unwrap_or_else(|| "Pagamento instantâneo".to_string())),
                "cash" => ("Dinheiro", discount.clone().unwrap_or_else(|| "Pagamento em espécie".to_string())),
                "card" => ("Cartão", "Débito ou crédito".to_string()),
                "installment" => (
                    "Parcelado",
                    match installment_count {
                        Some(n) if n > 0 => format!("Em até {}x", n),
                        _ => "Condições a combinar".to_string(),
                    },
                ),
                _ => return None,
            };
            Some(PaymentOption {
                method: key.to_string(),
                title,
                description,
            })
        })
        .collect();

    PaymentOptions {
        options,
        cash_discount_note: (cash_discount_percent > 0).then(|| {
            format!(
                "{}% de desconto para pagamento à vista (PIX ou Dinheiro)",
                cash_discount_percent
            )
        }),
    }
}

/// `None` once the quote has expired. Days round up, so a quote expiring
/// in 30 hours has 2 days remaining.
pub fn urgency_badge(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<UrgencyBadge> {
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    let remaining_ms = (expires_at - now).num_milliseconds();
    let days_remaining = if remaining_ms > 0 {
        (remaining_ms + DAY_MS - 1) / DAY_MS
    } else {
        remaining_ms / DAY_MS
    };

    if days_remaining < 0 {
        return None;
    }

    let level = match days_remaining {
        0..=2 => UrgencyLevel::Urgent,
        3..=5 => UrgencyLevel::ExpiringSoon,
        _ => UrgencyLevel::Normal,
    };
    let headline = match level {
        UrgencyLevel::Urgent => "Oferta expira em breve!",
        _ => "Validade do Orçamento",
    };
    let label = if days_remaining == 1 {
        "Expira amanhã".to_string()
    } else {
        format!("{} dias restantes", days_remaining)
    };

    Some(UrgencyBadge {
        level,
        days_remaining,
        expires_at,
        headline,
        label,
    })
}
