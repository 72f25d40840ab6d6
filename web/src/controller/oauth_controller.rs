//! Controller for the query-driven OAuth endpoint.
//!
//! Every step of a flow goes through `GET /oauth2`: providers redirect back to it, and
//! action links point at it.

use crate::extractors::flow_session::SessionFlow;
use crate::{AppState, Error};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use log::*;
use tower_sessions::Session;

use domain::{ActionRequest, Notice, Outcome, ProviderSummary};
use serde::{Deserialize, Serialize};

/// Query parameters for the provider listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Where action links send the user once the flow is over.
    pub redir: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    pub notice: Option<Notice>,
    pub providers: Vec<ProviderSummary>,
}

/// GET /oauth2
///
/// Starts an authorization, handles the provider callback, refreshes or revokes a token.
pub async fn action(
    State(app_state): State<AppState>,
    session: Session,
    Query(params): Query<ActionRequest>,
) -> Result<Response, Error> {
    let flow = SessionFlow::new(session);
    let user = flow.user_id().await?;

    let outcome = app_state
        .manager
        .request_action(&params, &flow, &user)
        .await?;

    let response = match outcome {
        Outcome::Redirect { url, notice } => {
            if let Some(notice) = notice {
                flow.set_notice(&notice).await?;
            }
            Redirect::to(&url).into_response()
        }
        Outcome::Failed {
            notice,
            redirect: Some(url),
        } => {
            flow.set_notice(&notice).await?;
            Redirect::to(&url).into_response()
        }
        Outcome::Failed {
            notice,
            redirect: None,
        } => (StatusCode::BAD_REQUEST, notice.message).into_response(),
        Outcome::Ignored => {
            debug!("Nothing to do for this OAuth request");
            StatusCode::NOT_FOUND.into_response()
        }
    };

    Ok(response)
}

/// GET /oauth2/providers
///
/// Lists registered providers with the session user's status and the pending notice.
pub async fn providers(
    State(app_state): State<AppState>,
    session: Session,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    let flow = SessionFlow::new(session);
    let user = flow.user_id().await?;
    let redir = params.redir.unwrap_or_else(|| "/oauth2/providers".to_string());

    let providers = app_state.manager.providers(&user, &redir).await?;
    let notice = flow.take_notice().await?;

    Ok(Json(ProvidersResponse { notice, providers }))
}
