//! # ama-watch
//!
//! Watches one room and logs its ranked question list on every change.

use std::sync::Arc;

use ama_common::{AppConfig, AppError, AppResult};
use ama_core::{RankedView, RoomId};
use ama_http::ApiClient;
use ama_stream::WsConnector;
use ama_sync::{RoomSession, SessionConfig, SessionDeps, SessionNotice};
use tracing::{info, warn};

/// Watch `AMA_ROOM_ID` until Ctrl-C or a failed snapshot
pub async fn run(config: AppConfig) -> AppResult<()> {
    let room_id = RoomId::new(config.require_room_id()?);

    let api = Arc::new(
        ApiClient::from_config(&config.api).map_err(|e| AppError::HttpClient(e.to_string()))?,
    );
    let connector = Arc::new(WsConnector::from_config(&config.stream));
    let deps = SessionDeps::new(api.clone(), api, connector);

    let (handle, mut notices) =
        RoomSession::start(room_id, deps, SessionConfig::from_app_config(&config));

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let outcome = loop {
        tokio::select! {
            result = &mut shutdown => {
                info!("Shutdown signal received");
                break result.map_err(AppError::internal);
            }
            notice = notices.recv() => {
                let Some(notice) = notice else {
                    break Ok(());
                };
                match notice {
                    SessionNotice::ViewChanged(view) => {
                        info!(questions = view.len(), "Room updated\n{}", render(&view));
                    }
                    SessionNotice::SnapshotFailed(e) => {
                        if e.is_transient() {
                            warn!(error = %e, "Snapshot fetch failed; retrying later may help");
                        }
                        break Err(AppError::Fetch(e));
                    }
                    SessionNotice::ReactionFailed(failure) => {
                        warn!(%failure, "Reaction rolled back");
                    }
                    SessionNotice::StreamState(state) => {
                        info!(%state, "Event stream");
                    }
                    SessionNotice::StreamGap(gap) => {
                        warn!(
                            reconnects = gap.reconnects,
                            disconnected_ms = gap.disconnected_for.as_millis() as u64,
                            "Event stream reconnected; some updates may be missing"
                        );
                    }
                }
            }
        }
    };

    handle.shutdown().await;
    outcome
}

/// One line per question: count, the viewer's mark, text, answered tag
pub fn render(view: &RankedView) -> String {
    if view.is_empty() {
        return "  (no questions yet)".to_string();
    }

    view.entries()
        .iter()
        .map(|entry| {
            let mark = if entry.reacted { '*' } else { ' ' };
            let answered = if entry.message.answered {
                "  [answered]"
            } else {
                ""
            };
            format!(
                "{:>5} {mark} {}{answered}",
                entry.message.reaction_count, entry.message.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
