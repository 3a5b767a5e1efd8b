use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::color::{HexColor, DEFAULT_THEME_COLOR};

/// One of the three fixed document templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStyle {
    #[default]
    Modern,
    Professional,
    Classic,
}

impl LayoutStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutStyle::Modern => "modern",
            LayoutStyle::Professional => "professional",
            LayoutStyle::Classic => "classic",
        }
    }
}

impl fmt::Display for LayoutStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "modern" => Ok(LayoutStyle::Modern),
            "professional" => Ok(LayoutStyle::Professional),
            "classic" => Ok(LayoutStyle::Classic),
            other => Err(format!("Unknown layout style: {other}")),
        }
    }
}

/// Self-declared business scale chosen during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingTier {
    Autonomous,
    Standard,
    Premium,
}

/// Business profile, one per owning user. `_id` is the owner's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    /// `Some` only when the owner explicitly chose or saved a color.
    #[serde(default)]
    pub theme_color: Option<HexColor>,
    /// `Some` only when the owner explicitly chose a layout.
    #[serde(default)]
    pub layout_style: Option<LayoutStyle>,
    #[serde(default)]
    pub pricing_tier: Option<PricingTier>,
    #[serde(default)]
    pub onboarded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn empty(owner_id: ObjectId) -> Self {
        Profile {
            id: owner_id,
            business_name: None,
            phone: None,
            email: None,
            logo_url: None,
            theme_color: None,
            layout_style: None,
            pricing_tier: None,
            onboarded_at: None,
            updated_at: None,
        }
    }

    pub fn is_onboarded(&self) -> bool {
        self.onboarded_at.is_some()
    }

    pub fn effective_theme_color(&self) -> HexColor {
        self.theme_color.unwrap_or(DEFAULT_THEME_COLOR)
    }

    pub fn effective_layout(&self) -> LayoutStyle {
        self.layout_style.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_parse() {
        assert_eq!("Classic".parse::<LayoutStyle>().unwrap(), LayoutStyle::Classic);
        assert!("fancy".parse::<LayoutStyle>().is_err());
        assert_eq!(LayoutStyle::default(), LayoutStyle::Modern);
    }

    #[test]
    fn test_profile_defaults() {
        let profile = Profile::empty(ObjectId::new());
        assert!(!profile.is_onboarded());
        assert_eq!(profile.effective_theme_color(), DEFAULT_THEME_COLOR);
        assert_eq!(profile.effective_layout(), LayoutStyle::Modern);
    }
}
