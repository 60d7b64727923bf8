// Discord REST client: sending and editing bot messages.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::components::{controls, ActionRow};
use crate::model::{ChannelId, MessageId};
use crate::pager::{Affordances, BoxError, Channel, ChannelSource, MessageHandle, Page, ReplyOptions};

#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("discord returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("discord response carried no message id")]
    MissingMessageId,
}

/// Body of a create or edit message request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
    pub embeds: Vec<&'a Page>,
    pub components: Vec<ActionRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_reference: Option<MessageReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<AllowedMentions>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageReference {
    pub message_id: MessageId,
    pub fail_if_not_exists: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllowedMentions {
    pub parse: Vec<&'static str>,
    pub replied_user: bool,
}

#[derive(Deserialize)]
struct CreatedMessage {
    #[serde(default)]
    id: Option<MessageId>,
}

impl CreatedMessage {
    fn into_id(self) -> Result<MessageId, DiscordError> {
        self.id.ok_or(DiscordError::MissingMessageId)
    }
}

/// Thin wrapper over the REST endpoints the pager needs.
#[derive(Clone)]
pub struct DiscordHttp {
    client: Client,
    api_base: String,
    token: String,
}

impl std::fmt::Debug for DiscordHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordHttp")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl DiscordHttp {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            token: token.into(),
        }
    }

    pub async fn create_message(
        &self,
        channel: ChannelId,
        body: &MessageBody<'_>,
    ) -> Result<MessageId, DiscordError> {
        let response = self
            .client
            .post(format!("{}/channels/{channel}/messages", self.api_base))
            .header("Authorization", format!("Bot {}", self.token))
            .json(body)
            .send()
            .await?;
        let created: CreatedMessage = check(response).await?.json().await?;
        created.into_id()
    }

    pub async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        body: &MessageBody<'_>,
    ) -> Result<(), DiscordError> {
        let response = self
            .client
            .patch(format!(
                "{}/channels/{channel}/messages/{message}",
                self.api_base
            ))
            .header("Authorization", format!("Bot {}", self.token))
            .json(body)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, DiscordError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DiscordError::Api { status, body })
}

impl ChannelSource for DiscordHttp {
    fn channel(&self, id: ChannelId) -> Arc<dyn Channel> {
        Arc::new(DiscordChannel {
            http: self.clone(),
            id,
        })
    }
}

/// A text channel reached through the REST API.
#[derive(Debug, Clone)]
pub struct DiscordChannel {
    http: DiscordHttp,
    id: ChannelId,
}

#[async_trait]
impl Channel for DiscordChannel {
    async fn send_page(
        &self,
        page: &Page,
        affordances: Option<Affordances>,
        options: &ReplyOptions,
    ) -> Result<Arc<dyn MessageHandle>, BoxError> {
        let body = MessageBody {
            content: options.content.as_deref(),
            embeds: vec![page],
            components: controls(affordances),
            message_reference: options.reply_to.map(|message_id| MessageReference {
                message_id,
                fail_if_not_exists: false,
            }),
            allowed_mentions: Some(AllowedMentions {
                parse: vec![],
                replied_user: false,
            }),
        };
        let id = self.http.create_message(self.id, &body).await?;
        Ok(Arc::new(DiscordMessage {
            http: self.http.clone(),
            channel: self.id,
            id,
        }))
    }
}

/// A message the bot sent, addressed by channel and id.
#[derive(Debug, Clone)]
pub struct DiscordMessage {
    http: DiscordHttp,
    channel: ChannelId,
    id: MessageId,
}

impl DiscordMessage {
    async fn edit(&self, page: &Page, affordances: Option<Affordances>) -> Result<(), BoxError> {
        let body = MessageBody {
            embeds: vec![page],
            components: controls(affordances),
            ..Default::default()
        };
        self.http.edit_message(self.channel, self.id, &body).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageHandle for DiscordMessage {
    fn id(&self) -> MessageId {
        self.id
    }

    async fn render_page(&self, page: &Page, affordances: Affordances) -> Result<(), BoxError> {
        self.edit(page, Some(affordances)).await
    }

    async fn strip_controls(&self, page: &Page) -> Result<(), BoxError> {
        self.edit(page, None).await
    }
}
