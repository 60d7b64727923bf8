// Sending a page set: statically for one page, with controls otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::affordance::Affordances;
use super::control::NavigationControl;
use super::error::PagerError;
use super::page::Page;
use super::page_set::PageSet;
use super::session::{BoxError, MessageHandle, SessionRegistry};
use crate::metrics;
use crate::model::{ChannelId, MessageId, UserId};

/// Extras carried by the first message.
#[derive(Debug, Clone, Default)]
pub struct ReplyOptions {
    /// Plain text shown above the embed.
    pub content: Option<String>,
    /// Message being replied to. The author is not pinged.
    pub reply_to: Option<MessageId>,
}

/// Somewhere a first page can be sent.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Send `page`, with navigation buttons when `controls` is set, and
    /// return a handle to the new message.
    async fn send_page(
        &self,
        page: &Page,
        controls: Option<Affordances>,
        options: &ReplyOptions,
    ) -> Result<Arc<dyn MessageHandle>, BoxError>;
}

/// Opens channels by id.
pub trait ChannelSource: Send + Sync {
    fn channel(&self, id: ChannelId) -> Arc<dyn Channel>;
}

#[derive(Debug, Error)]
pub enum ReplyError {
    #[error(transparent)]
    Pager(#[from] PagerError),
    #[error("failed to send first page: {0}")]
    Send(#[source] BoxError),
}

/// What was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    pub message: MessageId,
    pub interactive: bool,
}

/// Send `pages` to `channel` on behalf of `viewer`.
///
/// A single page goes out as static content. Longer sets get navigation
/// controls only `viewer` can drive, and a session in `registry`.
pub async fn reply(
    registry: &SessionRegistry,
    channel: &dyn Channel,
    pages: Vec<Page>,
    viewer: UserId,
    options: &ReplyOptions,
) -> Result<Reply, ReplyError> {
    let pages = PageSet::new(pages)?;

    if pages.size() == 1 {
        let message = channel
            .send_page(pages.current(), None, options)
            .await
            .map_err(ReplyError::Send)?;
        metrics::SESSIONS_STARTED_TOTAL
            .with_label_values(&["static"])
            .inc();
        return Ok(Reply {
            message: message.id(),
            interactive: false,
        });
    }

    let message = channel
        .send_page(pages.current(), Some(pages.affordances()), options)
        .await
        .map_err(ReplyError::Send)?;
    let id = message.id();
    let control = NavigationControl::new(pages, viewer, id)?;
    registry.start(control, message);
    metrics::SESSIONS_STARTED_TOTAL
        .with_label_values(&["interactive"])
        .inc();

    Ok(Reply {
        message: id,
        interactive: true,
    })
}
