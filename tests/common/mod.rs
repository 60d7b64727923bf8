// Recording fakes for the message side effects.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use goldfish_bot::model::{ChannelId, MessageId};
use goldfish_bot::pager::{
    Affordances, BoxError, Channel, ChannelSource, MessageHandle, Page, ReplyOptions,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Sent {
        message: MessageId,
        page: Page,
        controls: Option<Affordances>,
        content: Option<String>,
    },
    Render {
        message: MessageId,
        page: Page,
        affordances: Affordances,
    },
    Strip {
        message: MessageId,
        page: Page,
    },
}

/// Channel that records every send and edit. Edits can be made to fail, as
/// if the message had been deleted.
#[derive(Clone, Default)]
pub struct Recorder {
    effects: Arc<Mutex<Vec<Effect>>>,
    next_id: Arc<AtomicU64>,
    fail_edits: bool,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_edits() -> Self {
        Self {
            fail_edits: true,
            ..Self::default()
        }
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.effects.lock().unwrap().clone()
    }

    pub fn renders(&self) -> Vec<(Page, Affordances)> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                Effect::Render {
                    page, affordances, ..
                } => Some((page, affordances)),
                _ => None,
            })
            .collect()
    }

    pub fn strips(&self) -> Vec<Page> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                Effect::Strip { page, .. } => Some(page),
                _ => None,
            })
            .collect()
    }

    pub fn sent(&self) -> Vec<(Page, Option<Affordances>, Option<String>)> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                Effect::Sent {
                    page,
                    controls,
                    content,
                    ..
                } => Some((page, controls, content)),
                _ => None,
            })
            .collect()
    }

    /// A handle to an already sent message with the given id.
    pub fn handle(&self, id: MessageId) -> Arc<dyn MessageHandle> {
        Arc::new(FakeMessage {
            id,
            recorder: self.clone(),
        })
    }

    fn push(&self, effect: Effect) {
        self.effects.lock().unwrap().push(effect);
    }
}

#[async_trait]
impl Channel for Recorder {
    async fn send_page(
        &self,
        page: &Page,
        controls: Option<Affordances>,
        options: &ReplyOptions,
    ) -> Result<Arc<dyn MessageHandle>, BoxError> {
        let id = MessageId(1000 + self.next_id.fetch_add(1, Ordering::Relaxed));
        self.push(Effect::Sent {
            message: id,
            page: page.clone(),
            controls,
            content: options.content.clone(),
        });
        Ok(Arc::new(FakeMessage {
            id,
            recorder: self.clone(),
        }))
    }
}

impl ChannelSource for Recorder {
    fn channel(&self, _id: ChannelId) -> Arc<dyn Channel> {
        Arc::new(self.clone())
    }
}

struct FakeMessage {
    id: MessageId,
    recorder: Recorder,
}

#[async_trait]
impl MessageHandle for FakeMessage {
    fn id(&self) -> MessageId {
        self.id
    }

    async fn render_page(&self, page: &Page, affordances: Affordances) -> Result<(), BoxError> {
        self.recorder.push(Effect::Render {
            message: self.id,
            page: page.clone(),
            affordances,
        });
        if self.recorder.fail_edits {
            return Err("Unknown Message".into());
        }
        Ok(())
    }

    async fn strip_controls(&self, page: &Page) -> Result<(), BoxError> {
        self.recorder.push(Effect::Strip {
            message: self.id,
            page: page.clone(),
        });
        if self.recorder.fail_edits {
            return Err("Unknown Message".into());
        }
        Ok(())
    }
}

/// Pages titled P0..Pn-1.
pub fn pages(n: usize) -> Vec<Page> {
    (0..n).map(|i| Page::new().title(format!("P{i}"))).collect()
}

/// Let spawned session tasks run, including any timers that just fired.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
