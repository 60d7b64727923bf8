// Discord platform layer: REST calls, components and inbound interactions.

pub mod components;
pub mod http;
pub mod interaction;

pub use http::{DiscordChannel, DiscordError, DiscordHttp, DiscordMessage};
pub use interaction::{Interaction, InteractionResponse};
