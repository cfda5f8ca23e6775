use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SidePanel {
    Favorites,
    History,
}

/// Which panels and dialogs are open. At most one side panel at a time.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlays {
    pub panel: Option<SidePanel>,
    pub shortcuts_dialog: bool,
    pub provider_info_dialog: bool,
}

impl Overlays {
    pub fn open_panel(&mut self, panel: SidePanel) {
        self.panel = Some(panel);
    }

    /// Header-button behaviour: opens `panel`, or closes it if it is the open one.
    pub fn toggle_panel(&mut self, panel: SidePanel) {
        self.panel = if self.panel == Some(panel) {
            None
        } else {
            Some(panel)
        };
    }

    pub fn close_panel(&mut self) {
        self.panel = None;
    }

    pub fn show_shortcuts(&mut self, open: bool) {
        self.shortcuts_dialog = open;
    }

    pub fn show_provider_info(&mut self, open: bool) {
        self.provider_info_dialog = open;
    }

    pub fn any_open(&self) -> bool {
        self.panel.is_some() || self.shortcuts_dialog || self.provider_info_dialog
    }

    pub fn close_all(&mut self) {
        *self = Self::default();
    }
}
