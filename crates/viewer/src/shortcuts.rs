//! Keyboard shortcuts.
//!
//! [`shortcut_for`] is total over key names: anything not in the table maps
//! to `None`, which callers treat as a no-op.

use serde::Serialize;
use viewstate::ProviderId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "provider", rename_all = "camelCase")]
pub enum Shortcut {
    SelectProvider(ProviderId),
    ToggleLayer,
    AddFavorite,
    OpenHistory,
    ResetView,
    CopyLink,
    FocusSearch,
    CloseOverlays,
}

/// Where keyboard focus was when the key was pressed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Focus {
    Document,
    /// An input or textarea; shortcuts are off so typing works.
    TextEntry,
}

/// Rows of the shortcuts dialog, in display order.
pub const SHORTCUT_HELP: [(&str, &str); 12] = [
    ("1", "Switch to Google Maps"),
    ("2", "Switch to Mapbox"),
    ("3", "Switch to Esri"),
    ("4", "Switch to HERE"),
    ("5", "Switch to OpenStreetMap"),
    ("S", "Toggle satellite / map"),
    ("F", "Add to favorites"),
    ("H", "Open history"),
    ("R", "Back to the starting view"),
    ("C", "Copy current link"),
    ("/", "Focus search"),
    ("Esc", "Close panels and dialogs"),
];

/// Maps a `KeyboardEvent.key` value to its shortcut.
pub fn shortcut_for(key: &str) -> Option<Shortcut> {
    match key {
        "Escape" => return Some(Shortcut::CloseOverlays),
        "/" => return Some(Shortcut::FocusSearch),
        _ => {}
    }

    let mut chars = key.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    match c.to_ascii_lowercase() {
        d @ '1'..='5' => d
            .to_digit(10)
            .and_then(|n| ProviderId::from_ordinal(n as usize))
            .map(Shortcut::SelectProvider),
        's' => Some(Shortcut::ToggleLayer),
        'f' => Some(Shortcut::AddFavorite),
        'h' => Some(Shortcut::OpenHistory),
        'r' => Some(Shortcut::ResetView),
        'c' => Some(Shortcut::CopyLink),
        _ => None,
    }
}

/// Like [`shortcut_for`], but nothing fires while typing into a text field.
pub fn dispatch(key: &str, focus: Focus) -> Option<Shortcut> {
    match focus {
        Focus::TextEntry => None,
        Focus::Document => shortcut_for(key),
    }
}

impl Shortcut {
    /// Whether the browser's default handling of the key must be suppressed.
    pub fn prevents_default(self) -> bool {
        matches!(self, Shortcut::FocusSearch)
    }
}
