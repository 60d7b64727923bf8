// Navigation actions and the enabled/disabled state of their buttons.

use std::fmt;

/// A navigation action a viewer can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavAction {
    First,
    Prev,
    Next,
    Last,
}

impl NavAction {
    /// All actions in the order their buttons are laid out.
    pub const ALL: [NavAction; 4] = [
        NavAction::First,
        NavAction::Prev,
        NavAction::Next,
        NavAction::Last,
    ];

    /// Component custom id carried by the button for this action.
    pub fn custom_id(self) -> &'static str {
        match self {
            NavAction::First => "pager:first",
            NavAction::Prev => "pager:prev",
            NavAction::Next => "pager:next",
            NavAction::Last => "pager:last",
        }
    }

    /// Parse a component custom id back into an action.
    pub fn from_custom_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.custom_id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            NavAction::First => "⏮",
            NavAction::Prev => "◂",
            NavAction::Next => "▸",
            NavAction::Last => "⏭",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NavAction::First => "first",
            NavAction::Prev => "prev",
            NavAction::Next => "next",
            NavAction::Last => "last",
        }
    }
}

impl fmt::Display for NavAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which navigation buttons are currently enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub first: bool,
    pub prev: bool,
    pub next: bool,
    pub last: bool,
}

impl Affordances {
    /// Derive button state from the cursor position. Boundaries disable
    /// buttons instead of wrapping.
    pub fn compute(cursor: usize, size: usize) -> Self {
        let backward = cursor > 0;
        let forward = cursor + 1 < size;
        Self {
            first: backward,
            prev: backward,
            next: forward,
            last: forward,
        }
    }

    pub fn allows(&self, action: NavAction) -> bool {
        match action {
            NavAction::First => self.first,
            NavAction::Prev => self.prev,
            NavAction::Next => self.next,
            NavAction::Last => self.last,
        }
    }
}
