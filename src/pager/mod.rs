// Embed pagination: page sets, navigation controls and the sessions that
// drive them.

mod affordance;
mod builder;
mod control;
mod error;
mod page;
mod page_set;
mod reply;
mod session;

pub use affordance::{Affordances, NavAction};
pub use builder::{number_pages, PageBuilder};
pub use control::{ControlState, NavigationControl, Outcome};
pub use error::PagerError;
pub use page::{rgb, EmbedAuthor, EmbedFooter, EmbedMedia, Page, GOLDFISH_COLOUR};
pub use page_set::{chunk, PageSet};
pub use reply::{reply, Channel, ChannelSource, Reply, ReplyError, ReplyOptions};
pub use session::{
    BoxError, MessageHandle, NavigationEvent, SessionRegistry, IDLE_TIMEOUT,
};
