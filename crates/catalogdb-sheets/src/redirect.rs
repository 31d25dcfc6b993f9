//! Loopback receiver for the OAuth consent redirect.
//!
//! A single-route axum app on an already-bound `127.0.0.1` listener. The first
//! request that carries `code` or `error` resolves the flow; the server then
//! shuts down gracefully.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};

use crate::error::SheetsError;

type Outcome = Result<String, SheetsError>;

/// Query parameters Google appends to the redirect URI.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RedirectQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

impl RedirectQuery {
    /// `None` when the request carries neither a code nor an error.
    ///
    /// An `error` (e.g. `access_denied`) wins over a `code`.
    pub(crate) fn into_outcome(self) -> Option<Outcome> {
        match (self.code, self.error) {
            (_, Some(error)) => Some(Err(SheetsError::Authorization(error))),
            (Some(code), None) => Some(Ok(code)),
            (None, None) => None,
        }
    }
}

#[derive(Clone)]
struct RedirectState {
    outcome: Arc<Mutex<Option<oneshot::Sender<Outcome>>>>,
}

async fn receive_redirect(
    State(state): State<RedirectState>,
    Query(query): Query<RedirectQuery>,
) -> &'static str {
    let Some(outcome) = query.into_outcome() else {
        return "Waiting for the authorization redirect.";
    };

    let denied = outcome.is_err();
    if let Some(sender) = state.outcome.lock().await.take() {
        // The receiver only goes away once the flow has already finished.
        let _ = sender.send(outcome);
    }

    if denied {
        "Authorization was not granted. You may close this window."
    } else {
        "Authorization received. You may close this window."
    }
}

fn redirect_router(sender: oneshot::Sender<Outcome>) -> Router {
    let state = RedirectState {
        outcome: Arc::new(Mutex::new(Some(sender))),
    };
    Router::new()
        .route("/", get(receive_redirect))
        .with_state(state)
}

/// Serves `listener` until a redirect yields an authorization code.
///
/// Requests to other paths get a 404 and are otherwise ignored.
///
/// # Errors
///
/// - [`SheetsError::Authorization`] if the redirect reports an `error`, or the
///   server stops before a redirect arrives.
/// - [`SheetsError::Io`] if serving the listener fails.
pub(crate) async fn receive_authorization_code(listener: TcpListener) -> Result<String, SheetsError> {
    let (outcome_tx, outcome_rx) = oneshot::channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = redirect_router(outcome_tx);
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    let outcome = outcome_rx.await;
    let _ = shutdown_tx.send(());

    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(source)) => {
            return Err(SheetsError::Io {
                path: "127.0.0.1 loopback listener".into(),
                source,
            })
        }
        Err(e) => {
            return Err(SheetsError::Authorization(format!(
                "redirect listener task failed: {e}"
            )))
        }
    }

    outcome.map_err(|_| {
        SheetsError::Authorization("redirect listener stopped before receiving a code".to_string())
    })?
}
