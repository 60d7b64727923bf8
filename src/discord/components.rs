// Message components: the navigation button row.

use serde::Serialize;

use crate::pager::{Affordances, NavAction};

const ACTION_ROW: u8 = 1;
const BUTTON: u8 = 2;
const SECONDARY: u8 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    kind: u8,
    pub components: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Button {
    #[serde(rename = "type")]
    kind: u8,
    style: u8,
    pub label: &'static str,
    pub custom_id: &'static str,
    pub disabled: bool,
}

/// One row of first/prev/next/last buttons, disabled per `affordances`.
pub fn navigation_row(affordances: Affordances) -> ActionRow {
    ActionRow {
        kind: ACTION_ROW,
        components: NavAction::ALL
            .into_iter()
            .map(|action| Button {
                kind: BUTTON,
                style: SECONDARY,
                label: action.label(),
                custom_id: action.custom_id(),
                disabled: !affordances.allows(action),
            })
            .collect(),
    }
}

/// Component list for a message: the navigation row, or nothing at all.
pub fn controls(affordances: Option<Affordances>) -> Vec<ActionRow> {
    affordances.map(navigation_row).into_iter().collect()
}
