//! Team configuration commands.
//!
//! Every command runs against the calling window's own session, so a
//! save from the control panel updates the panel's cache first and then
//! reaches the overlay through the bus.

use tauri::{command, State, WebviewWindow};

use crate::app::HudState;
use crate::config::{FieldUpdate, TeamConfig};
use crate::error::HudResult;

/// Fresh read from the store (default when absent or unreadable).
#[command]
pub async fn load_team_config(
    window: WebviewWindow,
    state: State<'_, HudState>,
) -> HudResult<TeamConfig> {
    let session = state.session(window.label()).await;
    Ok(session.reload().await)
}

/// The window's last-known document, without touching the store.
#[command]
pub async fn get_cached_team_config(
    window: WebviewWindow,
    state: State<'_, HudState>,
) -> HudResult<TeamConfig> {
    let session = state.session(window.label()).await;
    Ok(session.cache().current())
}

#[command]
pub async fn save_team_config(
    window: WebviewWindow,
    state: State<'_, HudState>,
    config: TeamConfig,
) -> HudResult<TeamConfig> {
    config.validate()?;
    let session = state.session(window.label()).await;
    session.service().save(config).await
}

#[command]
pub async fn update_team_config_field(
    window: WebviewWindow,
    state: State<'_, HudState>,
    update: FieldUpdate,
) -> HudResult<TeamConfig> {
    let session = state.session(window.label()).await;
    session.cache().current().with_field(update.clone()).validate()?;
    session.service().toggle(update).await
}

/// Flip `isCondensed`; returns the new value.
#[command]
pub async fn toggle_condensed_mode(
    window: WebviewWindow,
    state: State<'_, HudState>,
) -> HudResult<bool> {
    let session = state.session(window.label()).await;
    let next = !session.cache().current().condensed();
    let saved = session
        .service()
        .toggle(FieldUpdate::IsCondensed(next))
        .await?;
    Ok(saved.condensed())
}
