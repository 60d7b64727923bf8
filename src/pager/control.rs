// Viewer-restricted navigation state machine over a page set.

use super::affordance::{Affordances, NavAction};
use super::error::PagerError;
use super::page::Page;
use super::page_set::PageSet;
use crate::model::{MessageId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Active,
    Expired,
}

/// Result of one navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Cursor moved; the bound message must be re-rendered with these buttons.
    Applied(Affordances),
    /// Someone other than the authorized viewer pressed a button.
    Unauthorized,
    /// The requested direction is disabled at the current position.
    Boundary,
    /// The control has already expired.
    Stale,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Applied(_) => "applied",
            Outcome::Unauthorized => "unauthorized",
            Outcome::Boundary => "boundary",
            Outcome::Stale => "stale",
        }
    }
}

/// Navigation controls attached to one sent message.
///
/// Only `viewer` may drive the cursor. Everything else is ignored without
/// surfacing an error. The bound message is held by id only; the control
/// never owns the message itself.
#[derive(Debug)]
pub struct NavigationControl<P = Page> {
    pages: PageSet<P>,
    viewer: UserId,
    bound_message: MessageId,
    state: ControlState,
}

impl<P> NavigationControl<P> {
    /// Wrap a multi-page set. Single-page sets are rendered statically and
    /// never get controls.
    pub fn new(
        pages: PageSet<P>,
        viewer: UserId,
        bound_message: MessageId,
    ) -> Result<Self, PagerError> {
        if pages.size() < 2 {
            return Err(PagerError::invalid(
                "navigation controls need more than one page",
            ));
        }
        Ok(Self {
            pages,
            viewer,
            bound_message,
            state: ControlState::Active,
        })
    }

    pub fn viewer(&self) -> UserId {
        self.viewer
    }

    pub fn bound_message(&self) -> MessageId {
        self.bound_message
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.pages.cursor()
    }

    pub fn current(&self) -> &P {
        self.pages.current()
    }

    pub fn affordances(&self) -> Affordances {
        self.pages.affordances()
    }

    pub fn request_first(&mut self, actor: UserId) -> Outcome {
        self.request(NavAction::First, actor)
    }

    pub fn request_prev(&mut self, actor: UserId) -> Outcome {
        self.request(NavAction::Prev, actor)
    }

    pub fn request_next(&mut self, actor: UserId) -> Outcome {
        self.request(NavAction::Next, actor)
    }

    pub fn request_last(&mut self, actor: UserId) -> Outcome {
        self.request(NavAction::Last, actor)
    }

    pub fn request(&mut self, action: NavAction, actor: UserId) -> Outcome {
        if actor != self.viewer {
            return Outcome::Unauthorized;
        }
        if self.state != ControlState::Active {
            return Outcome::Stale;
        }
        if !self.affordances().allows(action) {
            return Outcome::Boundary;
        }

        let moved = match action {
            NavAction::First => {
                self.pages.jump_to_first();
                Ok(())
            }
            NavAction::Prev => self.pages.retreat(),
            NavAction::Next => self.pages.advance(),
            NavAction::Last => {
                self.pages.jump_to_last();
                Ok(())
            }
        };
        match moved {
            Ok(()) => Outcome::Applied(self.affordances()),
            Err(_) => Outcome::Boundary,
        }
    }

    /// Expire the control. Returns true only on the `Active -> Expired`
    /// transition, i.e. when the controls must be stripped.
    pub fn on_idle_timeout_elapsed(&mut self) -> bool {
        match self.state {
            ControlState::Active => {
                self.state = ControlState::Expired;
                true
            }
            ControlState::Expired => false,
        }
    }
}
