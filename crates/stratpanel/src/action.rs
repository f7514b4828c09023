use stratpanel_core::AutomaticEntrypoints;

/// A user interaction with one of the panel's controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelAction {
    /// A file was picked in the open dialog.
    Browse(String),
    /// A recent script was picked from the script menu.
    OpenRecent(String),
    /// "Disable" was picked from the script menu.
    Disable,
    /// An entry point was picked from the entry point menu.
    SelectEntrypoint(String),
    /// The reload button was clicked.
    Reload,
    /// "Reload automatically" was toggled.
    SetAutoReload(bool),
    /// The debugging button was toggled.
    SetDebugEnabled(bool),
    /// "Trigger debugger" was picked.
    TriggerDebugger,
    /// "Performance Mode" was toggled.
    SetPerformanceMode(bool),
    /// The automatic entry point dialog was accepted.
    EditAutomaticEntrypoints(AutomaticEntrypoints),
}

/// An item of the script drop-down menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptMenuItem {
    Disable,
    Browse,
    Separator,
    Recent(String),
}

impl ScriptMenuItem {
    pub fn label(&self) -> &str {
        match self {
            ScriptMenuItem::Disable => "Disable",
            ScriptMenuItem::Browse => "Browse",
            ScriptMenuItem::Separator => "",
            ScriptMenuItem::Recent(filename) => filename,
        }
    }

    /// The action picking this item triggers.
    ///
    /// `Browse` needs a file dialog first and has no direct action.
    pub fn action(&self) -> Option<PanelAction> {
        match self {
            ScriptMenuItem::Disable => Some(PanelAction::Disable),
            ScriptMenuItem::Recent(filename) => Some(PanelAction::OpenRecent(filename.clone())),
            ScriptMenuItem::Browse | ScriptMenuItem::Separator => None,
        }
    }
}
