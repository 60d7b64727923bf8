// Inbound interaction payloads (HTTP interactions endpoint).

use serde::{Deserialize, Serialize};

use crate::model::{MessageId, UserId};
use crate::pager::{NavAction, NavigationEvent};

pub const PING: u8 = 1;
pub const MESSAGE_COMPONENT: u8 = 3;

/// The subset of an interaction the bot reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub data: Option<ComponentData>,
    #[serde(default)]
    pub message: Option<InteractionMessage>,
    /// Present for guild interactions.
    #[serde(default)]
    pub member: Option<Member>,
    /// Present for DM interactions.
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentData {
    #[serde(default)]
    pub custom_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionMessage {
    pub id: MessageId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: UserId,
}

impl Interaction {
    /// The user who triggered the interaction.
    pub fn actor(&self) -> Option<UserId> {
        self.member
            .as_ref()
            .map(|m| m.user.id)
            .or_else(|| self.user.as_ref().map(|u| u.id))
    }

    /// A pager button press, with the message its controls are attached to.
    /// None for anything else.
    pub fn navigation(&self) -> Option<(MessageId, NavigationEvent)> {
        if self.kind != MESSAGE_COMPONENT {
            return None;
        }
        let action = NavAction::from_custom_id(self.data.as_ref()?.custom_id.as_deref()?)?;
        let message = self.message.as_ref()?.id;
        let actor = self.actor()?;
        Some((message, NavigationEvent { action, actor }))
    }
}

/// Interaction callback types the bot answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
}

impl InteractionResponse {
    pub const PONG: Self = Self { kind: 1 };
    /// Acknowledge a component press without changing the message. The
    /// session edits the message itself.
    pub const DEFERRED_UPDATE_MESSAGE: Self = Self { kind: 6 };
}
