//! Live branding state of a profile being edited.
//!
//! A session layers unsaved edits over the persisted profile. Logo
//! uploads issue an [`ExtractionTicket`]; only the result for the most
//! recently issued ticket may change the live color, so a slow extraction
//! for an older logo can never overwrite the newer one. Sessions never
//! write to storage.

use bson::oid::ObjectId;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::{debug, info};

use crate::model::color::HexColor;
use crate::model::profile::{LayoutStyle, Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ExtractionTicket(u64);

impl ExtractionTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    Applied,
    /// A newer upload was started after this ticket was issued.
    Stale,
    /// Extraction finished without a usable color.
    NoColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeSource {
    Manual,
    Extracted,
    Saved,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandingSnapshot {
    pub owner_id: String,
    pub theme_color: HexColor,
    pub theme_source: ThemeSource,
    pub layout: LayoutStyle,
    pub logo_url: Option<String>,
    pub latest_ticket: Option<ExtractionTicket>,
    pub extraction_pending: bool,
    pub extracted_color: Option<HexColor>,
    /// True when the session holds edits the profile does not.
    pub dirty: bool,
}

#[derive(Debug, Default)]
struct SessionState {
    saved_color: Option<HexColor>,
    saved_layout: Option<LayoutStyle>,
    manual_color: Option<HexColor>,
    manual_layout: Option<LayoutStyle>,
    extracted_color: Option<HexColor>,
    logo_url: Option<String>,
    latest_ticket: u64,
    pending: bool,
}

impl SessionState {
    fn from_profile(profile: &Profile) -> Self {
        SessionState {
            saved_color: profile.theme_color,
            saved_layout: profile.layout_style,
            logo_url: profile.logo_url.clone(),
            ..Default::default()
        }
    }

    fn theme(&self, default_color: HexColor) -> (HexColor, ThemeSource) {
        if let Some(color) = self.manual_color {
            (color, ThemeSource::Manual)
        } else if let Some(color) = self.extracted_color {
            (color, ThemeSource::Extracted)
        } else if let Some(color) = self.saved_color {
            (color, ThemeSource::Saved)
        } else {
            (default_color, ThemeSource::Default)
        }
    }

    fn layout(&self) -> LayoutStyle {
        self.manual_layout.or(self.saved_layout).unwrap_or_default()
    }

    fn dirty(&self) -> bool {
        self.manual_color.is_some() || self.extracted_color.is_some() || self.manual_layout.is_some()
    }
}

#[derive(Debug)]
pub struct BrandingSession {
    owner_id: ObjectId,
    default_color: HexColor,
    state: Mutex<SessionState>,
}

impl BrandingSession {
    pub fn new(profile: &Profile, default_color: HexColor) -> Self {
        BrandingSession {
            owner_id: profile.id,
            default_color,
            state: Mutex::new(SessionState::from_profile(profile)),
        }
    }

    pub fn owner_id(&self) -> ObjectId {
        self.owner_id
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts tracking an extraction for a newly uploaded logo. Any manual
    /// color is dropped so the new logo's color can show.
    pub fn begin_extraction(&self) -> ExtractionTicket {
        let mut state = self.state();
        state.latest_ticket += 1;
        state.pending = true;
        state.manual_color = None;
        debug!(owner_id = %self.owner_id, ticket = state.latest_ticket, "Extraction started");
        ExtractionTicket(state.latest_ticket)
    }

    pub fn is_latest(&self, ticket: ExtractionTicket) -> bool {
        self.state().latest_ticket == ticket.0
    }

    pub fn complete_extraction(&self, ticket: ExtractionTicket, color: Option<HexColor>) -> ApplyOutcome {
        let mut state = self.state();
        if ticket.0 != state.latest_ticket {
            info!(
                owner_id = %self.owner_id,
                ticket = ticket.0,
                latest = state.latest_ticket,
                "Discarding stale extraction result"
            );
            return ApplyOutcome::Stale;
        }

        state.pending = false;
        match color {
            Some(color) => {
                state.extracted_color = Some(color);
                info!(owner_id = %self.owner_id, color = %color, "Applied extracted brand color");
                ApplyOutcome::Applied
            }
            None => ApplyOutcome::NoColor,
        }
    }

    pub fn set_theme_color(&self, color: HexColor) {
        self.state().manual_color = Some(color);
    }

    pub fn set_layout(&self, layout: LayoutStyle) {
        self.state().manual_layout = Some(layout);
    }

    /// Logos are persisted on upload, so this never makes the session dirty.
    pub fn set_logo_url(&self, url: impl Into<String>) {
        self.state().logo_url = Some(url.into());
    }

    pub fn live_theme_color(&self) -> HexColor {
        self.state().theme(self.default_color).0
    }

    pub fn live_layout(&self) -> LayoutStyle {
        self.state().layout()
    }

    /// Color worth persisting on save: an edit or extraction, never the default.
    pub fn unsaved_theme_color(&self) -> Option<HexColor> {
        let state = self.state();
        state.manual_color.or(state.extracted_color)
    }

    pub fn unsaved_layout(&self) -> Option<LayoutStyle> {
        self.state().manual_layout
    }

    pub fn snapshot(&self) -> BrandingSnapshot {
        let state = self.state();
        let (theme_color, theme_source) = state.theme(self.default_color);
        BrandingSnapshot {
            owner_id: self.owner_id.to_hex(),
            theme_color,
            theme_source,
            layout: state.layout(),
            logo_url: state.logo_url.clone(),
            latest_ticket: (state.latest_ticket > 0).then_some(ExtractionTicket(state.latest_ticket)),
            extraction_pending: state.pending,
            extracted_color: state.extracted_color,
            dirty: state.dirty(),
        }
    }

    /// Makes a freshly saved profile the new baseline. Ticket numbering
    /// carries on so in-flight extractions still resolve.
    pub fn rebase(&self, profile: &Profile) {
        let mut state = self.state();
        let latest_ticket = state.latest_ticket;
        let pending = state.pending;
        *state = SessionState {
            latest_ticket,
            pending,
            ..SessionState::from_profile(profile)
        };
    }
}

/// Open branding sessions keyed by owner.
#[derive(Debug)]
pub struct SessionRegistry {
    default_color: HexColor,
    sessions: RwLock<HashMap<ObjectId, Arc<BrandingSession>>>,
}

impl SessionRegistry {
    pub fn new(default_color: HexColor) -> Self {
        SessionRegistry {
            default_color,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the owner's session, starting one from `profile` if none is open.
    pub fn open(&self, profile: &Profile) -> Arc<BrandingSession> {
        if let Some(session) = self.get(&profile.id) {
            return session;
        }
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions
            .entry(profile.id)
            .or_insert_with(|| {
                debug!(owner_id = %profile.id, "Opening branding session");
                Arc::new(BrandingSession::new(profile, self.default_color))
            })
            .clone()
    }

    pub fn get(&self, owner_id: &ObjectId) -> Option<Arc<BrandingSession>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(owner_id)
            .cloned()
    }

    /// Drops unsaved edits. Returns false when no session was open.
    pub fn discard(&self, owner_id: &ObjectId) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(owner_id)
            .is_some();
        if removed {
            info!(owner_id = %owner_id, "Discarded branding session");
        }
        removed
    }
}
