use bson::oid::ObjectId;
use chrono::Utc;

use quote_builder_backend::detection::category::{adjust_color_brightness, detect_category, GENERAL_CATEGORY};
use quote_builder_backend::detection::profile_detection::{
    classify, DetectionSignal, Extra, ProfileSignals, QuoteSignals, Tone,
};
use quote_builder_backend::model::color::HexColor;
use quote_builder_backend::model::profile::{LayoutStyle, Profile};
use quote_builder_backend::model::quote::{Quote, QuoteItem};
use quote_builder_backend::util::money::{Money, Quantity};

fn quote_worth(cents: i64, client_name: &str) -> Quote {
    Quote::new_draft(
        ObjectId::new(),
        client_name,
        vec![QuoteItem::new("Serviço", Quantity::units(1), Money::from_cents(cents))],
        Utc::now(),
    )
}

fn layout_for(cents: i64, client_name: &str) -> LayoutStyle {
    let quote = quote_worth(cents, client_name);
    classify(&QuoteSignals::from(&quote), &ProfileSignals::default()).layout
}

#[test]
fn test_value_thresholds_are_exclusive() {
    assert_eq!(layout_for(50_000, "Ana Lima"), LayoutStyle::Modern);
    assert_eq!(layout_for(50_001, "Ana Lima"), LayoutStyle::Professional);
    assert_eq!(layout_for(500_000, "Ana Lima"), LayoutStyle::Professional);
    assert_eq!(layout_for(500_001, "Ana Lima"), LayoutStyle::Classic);
}

#[test]
fn test_zero_and_empty_quotes_are_low_value() {
    let quote = Quote::new_draft(ObjectId::new(), "Ana Lima", Vec::new(), Utc::now());
    let detection = classify(&QuoteSignals::from(&quote), &ProfileSignals::default());
    assert_eq!(detection.layout, LayoutStyle::Modern);
    assert_eq!(detection.tone, Tone::Friendly);
    assert_eq!(detection.signal, DetectionSignal::LowValue);
}

#[test]
fn test_corporate_suffix_wins_over_tiny_total() {
    assert_eq!(layout_for(1_000, "Acme Ltda"), LayoutStyle::Classic);
}

#[test]
fn test_mid_value_individual_client() {
    let quote = quote_worth(120_000, "Maria Souza");
    let detection = classify(&QuoteSignals::from(&quote), &ProfileSignals::default());

    assert_eq!(detection.layout, LayoutStyle::Professional);
    assert_eq!(detection.tone, Tone::Balanced);
    assert_eq!(detection.tone.css_class(), "tone-balanced");
    assert_eq!(detection.density.css_class(), "density-normal");
    assert_eq!(
        detection.extras,
        vec![Extra::Warranty, Extra::Timeline, Extra::ValueProposition]
    );
}

#[test]
fn test_sector_word_marks_small_business_as_corporate() {
    let quote = quote_worth(30_000, "João Tech Serviços");
    let detection = classify(&QuoteSignals::from(&quote), &ProfileSignals::default());
    assert_eq!(detection.layout, LayoutStyle::Classic);
    assert_eq!(detection.tone, Tone::Corporate);
    assert!(detection.shows(Extra::Signatures));
}

#[test]
fn test_business_name_is_inspected_before_client_name() {
    let quote = quote_worth(10_000, "Ana Lima");
    let mut profile = Profile::empty(ObjectId::new());
    profile.business_name = Some("Construtora Alfa Ltda".to_string());

    let detection = classify(&QuoteSignals::from(&quote), &ProfileSignals::from(&profile));
    assert_eq!(detection.signal, DetectionSignal::CorporateName);
    assert!(detection.reason.contains("Construtora Alfa Ltda"));

    profile.business_name = Some(String::new());
    let detection = classify(&QuoteSignals::from(&quote), &ProfileSignals::from(&profile));
    assert_eq!(detection.layout, LayoutStyle::Modern);
}

#[test]
fn test_classification_is_deterministic() {
    let quote = quote_worth(75_000, "Bruno Costa");
    let first = classify(&QuoteSignals::from(&quote), &ProfileSignals::default());
    let second = classify(&QuoteSignals::from(&quote), &ProfileSignals::default());
    assert_eq!(first, second);
}

#[test]
fn test_detect_category_is_total() {
    for description in ["", "   ", "???", "Visita técnica", "Troca de óleo", "Aula particular"] {
        let info = detect_category(description);
        assert!(!info.name.is_empty());
    }
    assert_eq!(detect_category(""), GENERAL_CATEGORY);
    assert_eq!(detect_category("").name, "Geral");
}

#[test]
fn test_brightness_extremes() {
    assert_eq!(adjust_color_brightness("#000000", 100.0).unwrap().to_string(), "#ffffff");
    assert_eq!(adjust_color_brightness("#ffffff", -100.0).unwrap().to_string(), "#000000");
    assert_eq!(adjust_color_brightness("#0d9b5c", 0.0).unwrap().to_string(), "#0d9b5c");
}

#[test]
fn test_brightness_stays_in_channel_range() {
    let base = HexColor::rgb(0x12, 0x80, 0xf0);
    for percent in [-250.0, -100.0, -33.3, 0.0, 15.0, 100.0, 400.0] {
        let adjusted = base.adjust_brightness(percent);
        assert_eq!(adjusted.to_string().len(), 7);
    }
    assert_eq!(base.adjust_brightness(400.0), HexColor::rgb(0xff, 0xff, 0xff));
    assert_eq!(base.adjust_brightness(-250.0), HexColor::rgb(0, 0, 0));
}

#[test]
fn test_brightness_rejects_malformed_hex() {
    assert!(adjust_color_brightness("", 10.0).is_err());
    assert!(adjust_color_brightness("#0d9b5", 10.0).is_err());
    assert!(adjust_color_brightness("#zzzzzz", 10.0).is_err());
}
