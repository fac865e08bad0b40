//! Team configuration document.
//!
//! `TeamConfig` is the only persisted entity. It is stored whole under a
//! single key and every save replaces it entirely; nothing here merges.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{HudError, HudResult};

/// Store key of the one team configuration document.
pub const TEAM_CONFIG_KEY: &str = "teamConfig";

pub const DEFAULT_CT_NAME: &str = "Counter-Terrorists";
pub const DEFAULT_T_NAME: &str = "Terrorists";

/// Display metadata for both teams plus the overlay's compact flag.
///
/// Optional fields that were absent stay absent through a save/load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/src/types/generated/")]
pub struct TeamConfig {
    /// Counter-Terrorist side display name.
    pub ct_name: String,
    /// Terrorist side display name.
    pub t_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub ct_logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub t_logo_url: Option<String>,
    /// Compact scoreboard rendering. Absent means `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub is_condensed: Option<bool>,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            ct_name: DEFAULT_CT_NAME.to_string(),
            t_name: DEFAULT_T_NAME.to_string(),
            ct_logo_url: Some(String::new()),
            t_logo_url: Some(String::new()),
            is_condensed: Some(false),
        }
    }
}

impl TeamConfig {
    /// Effective condensed flag.
    pub fn condensed(&self) -> bool {
        self.is_condensed.unwrap_or(false)
    }

    /// Copy of this document with a single field overwritten.
    pub fn with_field(&self, update: FieldUpdate) -> Self {
        let mut next = self.clone();
        match update {
            FieldUpdate::CtName(name) => next.ct_name = name,
            FieldUpdate::TName(name) => next.t_name = name,
            FieldUpdate::CtLogoUrl(url) => next.ct_logo_url = url,
            FieldUpdate::TLogoUrl(url) => next.t_logo_url = url,
            FieldUpdate::IsCondensed(condensed) => next.is_condensed = Some(condensed),
        }
        next
    }

    /// Edit-boundary check. Storage and the config service never call this.
    pub fn validate(&self) -> HudResult<()> {
        if self.ct_name.is_empty() {
            return Err(HudError::Validation("CT team name is required".to_string()));
        }
        if self.t_name.is_empty() {
            return Err(HudError::Validation("T team name is required".to_string()));
        }
        Ok(())
    }
}

/// A change to exactly one `TeamConfig` field.
///
/// Wire form: `{ "field": "isCondensed", "value": true }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
#[ts(export, export_to = "../ui/src/types/generated/")]
pub enum FieldUpdate {
    CtName(String),
    TName(String),
    CtLogoUrl(Option<String>),
    TLogoUrl(Option<String>),
    IsCondensed(bool),
}
