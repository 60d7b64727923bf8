// HTTP API routes: Discord interactions, page set hand-over, health, metrics.

use axum::{
    body::Bytes,
    extract::{Json, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::auth::{RelayAuth, SignatureVerifier};
use crate::discord::interaction::{Interaction, InteractionResponse, MESSAGE_COMPONENT, PING};
use crate::metrics;
use crate::model::{ChannelId, MessageId, UserId};
use crate::pager::{
    self, ChannelSource, EmbedAuthor, Page, PageBuilder, ReplyError, ReplyOptions,
    SessionRegistry,
};

// ── Request types ─────────────────────────────────────────────────────

/// Hand a page set over for delivery. Exactly one of `pages` (ready-made
/// embeds) or `elements` (raw lines plus layout) must be given.
#[derive(Deserialize)]
pub struct CreatePaginationRequest {
    pub channel_id: ChannelId,
    pub viewer_id: UserId,
    pub content: Option<String>,
    pub reply_to: Option<MessageId>,
    pub pages: Option<Vec<Page>>,
    /// Number ready-made pages in their footers. `elements` carries its own.
    #[serde(default = "default_show_index")]
    pub show_index: bool,
    pub elements: Option<ElementPages>,
}

#[derive(Deserialize)]
pub struct ElementPages {
    pub title: String,
    pub elements: Vec<String>,
    pub max_per_page: usize,
    pub thumbnail_url: Option<String>,
    pub author: Option<EmbedAuthor>,
    #[serde(default)]
    pub formatter: String,
    #[serde(default)]
    pub body_header: String,
    pub image_urls: Option<Vec<String>>,
    pub timestamps: Option<Vec<DateTime<Utc>>>,
    #[serde(default)]
    pub extra_footer: String,
    #[serde(default = "default_show_index")]
    pub show_index: bool,
    pub colour: Option<u32>,
}

fn default_show_index() -> bool {
    true
}

impl ElementPages {
    fn into_builder(self) -> PageBuilder {
        let mut builder = PageBuilder::new(self.title, self.elements, self.max_per_page)
            .formatter(self.formatter)
            .body_header(self.body_header)
            .extra_footer(self.extra_footer)
            .show_index(self.show_index);
        if let Some(url) = self.thumbnail_url {
            builder = builder.thumbnail(url);
        }
        if let Some(author) = self.author {
            builder = builder.author(author);
        }
        if let Some(urls) = self.image_urls {
            builder = builder.images(urls);
        }
        if let Some(timestamps) = self.timestamps {
            builder = builder.timestamps(timestamps);
        }
        if let Some(colour) = self.colour {
            builder = builder.colour(colour);
        }
        builder
    }
}

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionRegistry,
    pub channels: Arc<dyn ChannelSource>,
    /// None disables the interactions endpoint.
    pub verifier: Option<Arc<SignatureVerifier>>,
    pub relay_secret: Option<String>,
}

// ── Error helper ──────────────────────────────────────────────────────

fn json_error(status: StatusCode, msg: &str) -> impl IntoResponse {
    (status, Json(json!({ "error": msg })))
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_text))
        .route("/interactions", post(interactions))
        .route("/api/paginations", post(create_pagination))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "goldfish-bot" }))
}

async fn metrics_text() -> impl IntoResponse {
    match metrics::gather_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Metrics encoding failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

// ── Interactions ──────────────────────────────────────────────────────

async fn interactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let Some(verifier) = state.verifier.as_deref() else {
        return json_error(StatusCode::SERVICE_UNAVAILABLE, "Interactions are disabled")
            .into_response();
    };

    if let Err(e) = verifier.verify_request(&headers, &body) {
        tracing::debug!("Rejected interaction: {e}");
        metrics::INTERACTIONS_TOTAL
            .with_label_values(&["unknown", "bad_signature"])
            .inc();
        return json_error(StatusCode::UNAUTHORIZED, "invalid request signature").into_response();
    }

    let interaction: Interaction = match serde_json::from_slice(&body) {
        Ok(i) => i,
        Err(e) => {
            return json_error(StatusCode::BAD_REQUEST, &format!("malformed interaction: {e}"))
                .into_response()
        }
    };

    match interaction.kind {
        PING => {
            metrics::INTERACTIONS_TOTAL
                .with_label_values(&["ping", "ok"])
                .inc();
            Json(InteractionResponse::PONG).into_response()
        }
        MESSAGE_COMPONENT => {
            metrics::INTERACTIONS_TOTAL
                .with_label_values(&["component", "ok"])
                .inc();
            // Every press is acknowledged the same way, whoever sent it.
            if let Some((message, event)) = interaction.navigation() {
                state.sessions.dispatch(message, event);
            }
            Json(InteractionResponse::DEFERRED_UPDATE_MESSAGE).into_response()
        }
        other => {
            tracing::debug!("Unsupported interaction type {other}");
            json_error(StatusCode::BAD_REQUEST, "unsupported interaction type").into_response()
        }
    }
}

// ── Page set hand-over ────────────────────────────────────────────────

async fn create_pagination(
    State(state): State<AppState>,
    _auth: RelayAuth,
    Json(req): Json<CreatePaginationRequest>,
) -> impl IntoResponse {
    let show_index = req.show_index;
    let pages = match (req.pages, req.elements) {
        (Some(mut pages), None) => {
            if show_index {
                pager::number_pages(&mut pages);
            }
            pages
        }
        (None, Some(elements)) => match elements.into_builder().build() {
            Ok(pages) => pages,
            Err(e) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
        },
        _ => {
            return json_error(
                StatusCode::BAD_REQUEST,
                "exactly one of pages or elements is required",
            )
            .into_response()
        }
    };

    let options = ReplyOptions {
        content: req.content,
        reply_to: req.reply_to,
    };
    let channel = state.channels.channel(req.channel_id);

    match pager::reply(&state.sessions, channel.as_ref(), pages, req.viewer_id, &options).await {
        Ok(reply) => (
            StatusCode::CREATED,
            Json(json!({
                "message_id": reply.message,
                "interactive": reply.interactive,
            })),
        )
            .into_response(),
        Err(ReplyError::Pager(e)) => {
            json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response()
        }
        Err(e @ ReplyError::Send(_)) => {
            tracing::error!(channel_id = %req.channel_id, "Pagination delivery failed: {e}");
            json_error(StatusCode::BAD_GATEWAY, "failed to deliver message").into_response()
        }
    }
}
