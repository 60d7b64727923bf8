// Session runtime: one task per navigation control.
//
// Each session owns its control and processes navigation events one at a
// time, side effects included, so cursor states never interleave. The idle
// timeout is a deadline inside the task's select loop that only accepted
// actions push forward.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use super::affordance::{Affordances, NavAction};
use super::control::{NavigationControl, Outcome};
use super::page::Page;
use crate::metrics;
use crate::model::{MessageId, UserId};

/// How long a control stays interactive without an accepted action.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Pending events buffered per session before new presses are dropped.
const EVENT_BUFFER: usize = 16;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Edits applied to a previously sent message.
#[async_trait]
pub trait MessageHandle: Send + Sync {
    fn id(&self) -> MessageId;

    /// Replace the displayed page and button state.
    async fn render_page(&self, page: &Page, affordances: Affordances) -> Result<(), BoxError>;

    /// Remove every control, leaving `page` static.
    async fn strip_controls(&self, page: &Page) -> Result<(), BoxError>;
}

/// A button press routed to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationEvent {
    pub action: NavAction,
    pub actor: UserId,
}

type SenderMap = HashMap<MessageId, mpsc::Sender<NavigationEvent>>;

/// Live sessions keyed by the message their controls are attached to.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<Mutex<SenderMap>>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::with_idle_timeout(IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Spawn the session task for `control`, bound to `message`.
    ///
    /// The idle countdown starts now, not when the task is first polled.
    pub fn start(&self, control: NavigationControl<Page>, message: Arc<dyn MessageHandle>) {
        let id = message.id();
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let deadline = Instant::now() + self.idle_timeout;

        // A session already bound to this message is replaced; its task
        // sees the closed channel, runs out its own timer and then leaves
        // the message to the newer session.
        self.senders().insert(id, tx);
        metrics::ACTIVE_SESSIONS.inc();
        tracing::info!(
            message_id = %id,
            viewer = %control.viewer(),
            "pager: session started"
        );

        let session = Session {
            control,
            message,
            registry: self.clone(),
            idle_timeout: self.idle_timeout,
        };
        tokio::spawn(session.run(rx, deadline));
    }

    /// Route an event to the session bound to `message`.
    ///
    /// Returns false when no live session exists or its buffer is full; the
    /// event is dropped in both cases.
    pub fn dispatch(&self, message: MessageId, event: NavigationEvent) -> bool {
        let Some(tx) = self.senders().get(&message).cloned() else {
            tracing::debug!(message_id = %message, "pager: no session for message");
            metrics::NAVIGATION_ACTIONS_TOTAL
                .with_label_values(&[event.action.as_str(), "stale"])
                .inc();
            return false;
        };
        match tx.try_send(event) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(message_id = %message, "pager: event dropped: {e}");
                false
            }
        }
    }

    pub fn is_active(&self, message: MessageId) -> bool {
        self.senders().contains_key(&message)
    }

    pub fn len(&self) -> usize {
        self.senders().len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders().is_empty()
    }

    /// Drop the entry for `message` once its receiver has been closed.
    ///
    /// A replacement session registered later still has an open channel and
    /// is left alone; false is returned so the caller keeps its hands off
    /// the message.
    fn remove_closed(&self, message: MessageId) -> bool {
        let mut map = self.senders();
        match map.get(&message) {
            Some(tx) if !tx.is_closed() => false,
            Some(_) => {
                map.remove(&message);
                true
            }
            None => true,
        }
    }

    fn senders(&self) -> std::sync::MutexGuard<'_, SenderMap> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

struct Session {
    control: NavigationControl<Page>,
    message: Arc<dyn MessageHandle>,
    registry: SessionRegistry,
    idle_timeout: Duration,
}

impl Session {
    async fn run(mut self, mut events: mpsc::Receiver<NavigationEvent>, deadline: Instant) {
        let idle = sleep_until(deadline);
        tokio::pin!(idle);

        loop {
            tokio::select! {
                () = &mut idle => break,
                event = events.recv() => match event {
                    Some(event) => {
                        if self.handle(event).await {
                            idle.as_mut().reset(Instant::now() + self.idle_timeout);
                        }
                    }
                    None => {
                        // Dismissed; let the countdown run out as usual.
                        (&mut idle).await;
                        break;
                    }
                },
            }
        }

        events.close();
        let message = self.control.bound_message();
        if self.registry.remove_closed(message) {
            self.expire().await;
        } else {
            tracing::debug!(message_id = %message, "pager: superseded, controls left in place");
        }
        metrics::ACTIVE_SESSIONS.dec();
    }

    /// Apply one event. Returns true if it was accepted.
    async fn handle(&mut self, event: NavigationEvent) -> bool {
        let outcome = self.control.request(event.action, event.actor);
        metrics::NAVIGATION_ACTIONS_TOTAL
            .with_label_values(&[event.action.as_str(), outcome.as_str()])
            .inc();

        let Outcome::Applied(affordances) = outcome else {
            tracing::debug!(
                message_id = %self.message.id(),
                actor = %event.actor,
                action = %event.action,
                "pager: ignored ({})",
                outcome.as_str()
            );
            return false;
        };

        if let Err(e) = self
            .message
            .render_page(self.control.current(), affordances)
            .await
        {
            tracing::warn!(message_id = %self.message.id(), "pager: render failed: {e}");
            metrics::SIDE_EFFECT_FAILURES_TOTAL
                .with_label_values(&["render"])
                .inc();
        }
        true
    }

    async fn expire(&mut self) {
        if !self.control.on_idle_timeout_elapsed() {
            return;
        }
        tracing::info!(message_id = %self.message.id(), "pager: session expired");
        metrics::CONTROLS_STRIPPED_TOTAL.inc();
        if let Err(e) = self.message.strip_controls(self.control.current()).await {
            tracing::warn!(message_id = %self.message.id(), "pager: strip failed: {e}");
            metrics::SIDE_EFFECT_FAILURES_TOTAL
                .with_label_values(&["strip"])
                .inc();
        }
    }
}
