use std::path::Path;

use stratpanel_core::{
    settings::SettingsHandle, shorten_entrypoint_name, AutomaticEntrypoints, EntrypointMenu,
    RecentScripts, Role,
};
use stratpanel_protos::{
    strategy_command::{Command, CommandStrategy, StageEntrypointMapping},
    strategy_status::{status_strategy::State, Status},
};
use tokio::sync::mpsc;

use crate::{strategy_command, PanelAction, PanelStyle, ScriptMenuItem};

const SCRIPT_KEY: &str = "Script";
const ENTRY_POINT_KEY: &str = "EntryPoint";
const AUTO_RELOAD_KEY: &str = "AutoReload";
const ENABLE_DEBUG_KEY: &str = "EnableDebug";
const PERFORMANCE_MODE_KEY: &str = "PerformanceMode";
const AUTOMATIC_ENTRYPOINTS_GROUP: &str = "AutomaticEntrypoints";

/// Label shown while no strategy is loaded.
pub const DISABLED_LABEL: &str = "Disabled";

/// In easy mode, the first recent script with this suffix is picked when no
/// script was saved.
pub const EASY_MODE_SCRIPT_SUFFIX: &str = ".ts";

/// Length the current entry point label is shortened to.
pub const ENTRYPOINT_LABEL_LENGTH: usize = 20;

/// Session-wide panel options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelConfig {
    /// Auto-reload is forced on and cannot be changed.
    pub tournament_mode: bool,
    /// Fall back to a recent TypeScript strategy when no script was saved.
    pub easy_mode: bool,
    /// Use the dark variants of the role colors.
    pub dark_colors: bool,
}

/// State of a strategy as last reported by the strategy host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyState {
    Closed,
    Running,
    Failed,
    Compiling,
}

impl From<State> for StrategyState {
    fn from(state: State) -> Self {
        match state {
            State::CLOSED => StrategyState::Closed,
            State::RUNNING => StrategyState::Running,
            State::FAILED => StrategyState::Failed,
            State::COMPILING => StrategyState::Compiling,
        }
    }
}

/// The script and options selected in a panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptSelection {
    pub filename: Option<String>,
    pub entry_point: Option<String>,
    pub auto_reload: bool,
    pub debug_enabled: bool,
    pub performance_mode: bool,
}

/// Controller behind the strategy panel of one [`Role`].
///
/// Turns user interactions into [`Command`]s for the strategy host and
/// mirrors the host's [`Status`] reports into display state. Preferences are
/// restored with [`StrategyPanel::load`] and stored with
/// [`StrategyPanel::save_config`].
pub struct StrategyPanel {
    role: Role,
    config: PanelConfig,
    settings: SettingsHandle,
    command_tx: mpsc::UnboundedSender<Command>,
    recent_scripts: Option<RecentScripts>,

    filename: Option<String>,
    entry_point: Option<String>,
    automatic_entrypoints: AutomaticEntrypoints,

    // Check state of the toggles
    auto_reload: bool,
    user_auto_reload: bool,
    auto_reload_forced: bool,
    debug_enabled: bool,
    performance_mode: bool,

    content_enabled: bool,
    debugger_available: bool,
    debugger_visible: bool,
    disable_visible: bool,

    label: String,
    state: Option<StrategyState>,
    notification: bool,
    compiling: bool,
    entrypoints: Vec<String>,
    entrypoint_menu: EntrypointMenu,
    current_entrypoint: Option<String>,
}

impl StrategyPanel {
    pub fn new(
        role: Role,
        config: PanelConfig,
        settings: SettingsHandle,
        command_tx: mpsc::UnboundedSender<Command>,
    ) -> Self {
        Self {
            role,
            config,
            settings,
            command_tx,
            recent_scripts: None,
            filename: None,
            entry_point: None,
            automatic_entrypoints: AutomaticEntrypoints::default(),
            auto_reload: config.tournament_mode,
            user_auto_reload: false,
            auto_reload_forced: false,
            // The autoref always runs with debugging enabled
            debug_enabled: role == Role::Autoref,
            performance_mode: true,
            content_enabled: true,
            debugger_available: false,
            debugger_visible: true,
            disable_visible: false,
            label: DISABLED_LABEL.to_owned(),
            state: None,
            notification: false,
            compiling: false,
            entrypoints: Vec::new(),
            entrypoint_menu: EntrypointMenu::new(),
            current_entrypoint: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn config(&self) -> PanelConfig {
        self.config
    }

    /// Shares the recent script list with this panel.
    pub fn set_recent_scripts(&mut self, recent_scripts: RecentScripts) {
        self.recent_scripts = Some(recent_scripts);
    }

    pub fn recent_scripts(&self) -> Option<&RecentScripts> {
        self.recent_scripts.as_ref()
    }

    /// Restores the saved preferences and, if the saved script still exists,
    /// loads it together with its automatic entry points.
    pub fn load(&mut self) {
        let settings = self.settings.group(self.role.settings_group());

        match settings.get_string(SCRIPT_KEY).filter(|f| !f.is_empty()) {
            Some(filename) => self.filename = Some(filename),
            None if self.config.easy_mode => {
                let fallback = self.recent_scripts.as_ref().and_then(|recent| {
                    recent.first_matching(|script| script.ends_with(EASY_MODE_SCRIPT_SUFFIX))
                });
                if let Some(filename) = fallback {
                    log::info!("{}: no saved script, using recent {}", self.role, filename);
                    self.filename = Some(filename);
                }
            }
            None => {}
        }

        self.entry_point = settings
            .get_string(ENTRY_POINT_KEY)
            .filter(|entry_point| !entry_point.is_empty());
        if !self.config.tournament_mode {
            let auto_reload = settings.get_bool(AUTO_RELOAD_KEY).unwrap_or(false);
            self.user_auto_reload = auto_reload;
            self.set_auto_reload_checked(auto_reload);
        } else {
            // Checked from the start, the host still has to be told
            self.send_auto_reload();
        }
        self.set_performance_checked(settings.get_bool(PERFORMANCE_MODE_KEY).unwrap_or(true));
        if self.role != Role::Autoref {
            self.set_debug_checked(settings.get_bool(ENABLE_DEBUG_KEY).unwrap_or(false));
        }
        self.automatic_entrypoints =
            AutomaticEntrypoints::load(&settings.group(AUTOMATIC_ENTRYPOINTS_GROUP));

        let exists = self
            .filename
            .as_deref()
            .is_some_and(|filename| Path::new(filename).exists());
        if exists {
            let entry_point = self.entry_point.clone();
            self.send_filename_and_entrypoint(entry_point.as_deref());
            self.send_automatic_entrypoints();
        } else if let Some(filename) = &self.filename {
            log::debug!("{}: saved script {} not found, not loading", self.role, filename);
        }
    }

    /// Writes the current preferences to the settings store.
    pub fn save_config(&self) {
        let settings = self.settings.group(self.role.settings_group());
        match &self.filename {
            Some(filename) => settings.set_string(SCRIPT_KEY, filename),
            None => settings.remove(SCRIPT_KEY),
        }
        match &self.entry_point {
            Some(entry_point) => settings.set_string(ENTRY_POINT_KEY, entry_point),
            None => settings.remove(ENTRY_POINT_KEY),
        }
        settings.set_bool(AUTO_RELOAD_KEY, self.user_auto_reload);
        settings.set_bool(ENABLE_DEBUG_KEY, self.debug_enabled);
        settings.set_bool(PERFORMANCE_MODE_KEY, self.performance_mode);
        self.automatic_entrypoints
            .save(&settings.group(AUTOMATIC_ENTRYPOINTS_GROUP));
    }

    pub fn shutdown(&mut self) {
        self.save_config();
        self.close_script();
    }

    /// Opens `filename` and moves it to the front of the recent scripts.
    ///
    /// The host starts the script's default entry point until one is picked.
    pub fn open(&mut self, filename: &str) {
        log::info!("{}: opening {}", self.role, filename);
        self.filename = Some(filename.to_owned());
        self.entry_point = None;
        if let Some(recent) = &self.recent_scripts {
            recent.push_front(filename);
        }

        self.emit(|strategy| {
            strategy
                .load
                .mut_or_insert_default()
                .set_filename(filename.to_owned());
        });
    }

    /// Loads the current script at `entry_point`.
    pub fn send_filename_and_entrypoint(&mut self, entry_point: Option<&str>) {
        self.entry_point = entry_point.map(str::to_owned);
        let filename = self.filename.clone().unwrap_or_default();

        self.emit(|strategy| {
            let load = strategy.load.mut_or_insert_default();
            load.set_filename(filename);
            if let Some(entry_point) = entry_point {
                load.set_entry_point(entry_point.to_owned());
            }
        });
    }

    pub fn close_script(&mut self) {
        log::info!("{}: closing strategy", self.role);
        self.notification = false;
        self.compiling = false;
        self.emit(|strategy| {
            strategy.close.mut_or_insert_default();
        });
    }

    pub fn send_reload(&self) {
        self.emit(|strategy| strategy.set_reload(true));
    }

    /// Sends the current auto-reload state. While the user may change it, the
    /// state is also remembered as the user's choice.
    pub fn send_auto_reload(&mut self) {
        if self.is_auto_reload_editable() {
            self.user_auto_reload = self.auto_reload;
        }
        let auto_reload = self.auto_reload;
        self.emit(|strategy| strategy.set_auto_reload(auto_reload));
    }

    pub fn send_enable_debug(&self, enable: bool) {
        self.emit(|strategy| strategy.set_enable_debug(enable));
    }

    pub fn send_trigger_debug(&self) {
        self.emit(|strategy| {
            strategy.debug.mut_or_insert_default();
        });
    }

    pub fn send_performance_debug(&self, enable: bool) {
        self.emit(|strategy| strategy.set_performance_mode(enable));
    }

    /// Sends the stage to entry point mapping. Nothing is sent while no
    /// automatic entry point is set.
    pub fn send_automatic_entrypoints(&self) {
        if self.automatic_entrypoints.all_unset() {
            return;
        }

        let mapping: Vec<StageEntrypointMapping> = self
            .automatic_entrypoints
            .stage_mappings()
            .into_iter()
            .map(|(stage, entry_point)| {
                let mut mapping = StageEntrypointMapping::new();
                mapping.set_stage(stage);
                mapping.set_entry_point(entry_point.to_owned());
                mapping
            })
            .collect();
        self.emit(|strategy| {
            strategy.automatic_entrypoints.mut_or_insert_default().mapping = mapping;
        });
    }

    /// Replaces the automatic entry points, sending them if they changed.
    pub fn set_automatic_entrypoints(&mut self, entrypoints: AutomaticEntrypoints) {
        if entrypoints == self.automatic_entrypoints {
            return;
        }
        self.automatic_entrypoints = entrypoints;
        self.send_automatic_entrypoints();
    }

    pub fn automatic_entrypoints(&self) -> &AutomaticEntrypoints {
        &self.automatic_entrypoints
    }

    /// Mirrors the strategy host's report for this panel's role.
    ///
    /// Reports for other roles, or any report while the content is disabled,
    /// leave the display untouched.
    pub fn handle_status(&mut self, status: &Status) {
        if !self.content_enabled {
            return;
        }
        let Some(strategy) = status
            .status_strategy
            .as_ref()
            .filter(|wrapper| wrapper.role() == self.role.status_role())
            .and_then(|wrapper| wrapper.status.as_ref())
        else {
            return;
        };

        self.entrypoints = strategy.entry_point.clone();
        self.entrypoint_menu = EntrypointMenu::from_entrypoints(&self.entrypoints);
        self.current_entrypoint = strategy
            .has_current_entry_point()
            .then(|| strategy.current_entry_point().to_owned());

        self.label = strategy.name().to_owned();
        let state = StrategyState::from(strategy.state());
        self.disable_visible = state != StrategyState::Closed;

        self.compiling = false;
        match state {
            StrategyState::Closed => {
                self.label = DISABLED_LABEL.to_owned();
                self.notification = false;
                self.filename = None;
                self.entry_point = None;
            }
            StrategyState::Running => self.notification = false,
            StrategyState::Failed => self.notification = true,
            StrategyState::Compiling => self.compiling = true,
        }
        if self.state != Some(state) {
            log::debug!("{}: strategy state {:?} -> {:?}", self.role, self.state, state);
        }
        self.state = Some(state);

        self.debugger_available = strategy.has_debugger();
    }

    /// Enables or disables all controls of the panel.
    pub fn enable_content(&mut self, enable: bool) {
        self.content_enabled = enable;
        self.debugger_available = enable;
    }

    /// Forces auto-reload on, or restores the user's choice when released.
    pub fn force_auto_reload(&mut self, force: bool) {
        if self.config.tournament_mode {
            // Always on, just report it again
            self.send_auto_reload();
            return;
        }
        self.auto_reload_forced = force;
        let checked = force || self.user_auto_reload;
        if checked != self.auto_reload {
            self.set_auto_reload_checked(checked);
        } else {
            self.send_auto_reload();
        }
    }

    pub fn set_debugger_visible(&mut self, visible: bool) {
        self.debugger_visible = visible;
    }

    pub fn set_use_dark_colors(&mut self, dark: bool) {
        self.config.dark_colors = dark;
    }

    /// Dispatches a user interaction. Interactions with disabled controls are
    /// ignored and return `false`.
    pub fn handle_action(&mut self, action: PanelAction) -> bool {
        match action {
            PanelAction::Browse(filename) | PanelAction::OpenRecent(filename)
                if self.content_enabled =>
            {
                self.open(&filename)
            }
            PanelAction::Disable if self.content_enabled && self.disable_visible => {
                self.close_script()
            }
            PanelAction::SelectEntrypoint(entry_point) if self.content_enabled => {
                self.send_filename_and_entrypoint(Some(&entry_point))
            }
            PanelAction::Reload if self.content_enabled => self.send_reload(),
            PanelAction::SetAutoReload(checked) if self.is_auto_reload_editable() => {
                self.set_auto_reload_checked(checked)
            }
            PanelAction::SetDebugEnabled(checked) if self.is_debug_editable() => {
                self.set_debug_checked(checked)
            }
            PanelAction::TriggerDebugger if self.can_trigger_debugger() => {
                self.send_trigger_debug()
            }
            PanelAction::SetPerformanceMode(checked) if self.content_enabled => {
                self.set_performance_checked(checked)
            }
            PanelAction::EditAutomaticEntrypoints(entrypoints) => {
                self.set_automatic_entrypoints(entrypoints)
            }
            action => {
                log::debug!("{}: ignoring {:?}, control is disabled", self.role, action);
                return false;
            }
        }
        true
    }

    /// Contents of the script drop-down menu.
    pub fn script_menu(&self) -> Vec<ScriptMenuItem> {
        let mut items = Vec::new();
        if self.disable_visible {
            items.push(ScriptMenuItem::Disable);
        }
        items.push(ScriptMenuItem::Browse);

        if let Some(recent) = self.recent_scripts.as_ref().filter(|r| !r.is_empty()) {
            items.push(ScriptMenuItem::Separator);
            items.extend(recent.to_vec().into_iter().map(ScriptMenuItem::Recent));
        }
        items
    }

    pub fn selection(&self) -> ScriptSelection {
        ScriptSelection {
            filename: self.filename.clone(),
            entry_point: self.entry_point.clone(),
            auto_reload: self.auto_reload,
            debug_enabled: self.debug_enabled,
            performance_mode: self.performance_mode,
        }
    }

    /// Text of the script button: the strategy name, or [`DISABLED_LABEL`].
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Last reported strategy state, `None` before the first report.
    pub fn state(&self) -> Option<StrategyState> {
        self.state
    }

    pub fn entrypoints(&self) -> &[String] {
        &self.entrypoints
    }

    pub fn entrypoint_menu(&self) -> &EntrypointMenu {
        &self.entrypoint_menu
    }

    pub fn current_entrypoint(&self) -> Option<&str> {
        self.current_entrypoint.as_deref()
    }

    /// The current entry point, shortened to fit the entry point button.
    pub fn entrypoint_label(&self) -> Option<String> {
        self.current_entrypoint.as_deref().map(|entry_point| {
            shorten_entrypoint_name(&self.entrypoint_menu, entry_point, ENTRYPOINT_LABEL_LENGTH)
        })
    }

    pub fn style(&self) -> PanelStyle {
        PanelStyle::new(
            self.role,
            self.config.dark_colors,
            self.notification,
            self.compiling,
        )
    }

    pub fn has_notification(&self) -> bool {
        self.notification
    }

    pub fn is_compiling(&self) -> bool {
        self.compiling
    }

    pub fn is_content_enabled(&self) -> bool {
        self.content_enabled
    }

    pub fn is_disable_visible(&self) -> bool {
        self.disable_visible
    }

    pub fn is_auto_reload_editable(&self) -> bool {
        self.content_enabled && !self.config.tournament_mode && !self.auto_reload_forced
    }

    pub fn is_debug_editable(&self) -> bool {
        self.content_enabled && self.role != Role::Autoref
    }

    pub fn can_trigger_debugger(&self) -> bool {
        self.debugger_visible && self.debugger_available
    }

    fn set_auto_reload_checked(&mut self, checked: bool) {
        if self.auto_reload != checked {
            self.auto_reload = checked;
            self.send_auto_reload();
        }
    }

    fn set_debug_checked(&mut self, checked: bool) {
        if self.debug_enabled != checked {
            self.debug_enabled = checked;
            self.send_enable_debug(checked);
        }
    }

    fn set_performance_checked(&mut self, checked: bool) {
        if self.performance_mode != checked {
            self.performance_mode = checked;
            self.send_performance_debug(checked);
        }
    }

    fn emit(&self, fill: impl FnOnce(&mut CommandStrategy)) {
        let command = strategy_command(self.role, fill);
        log::trace!("{}: sending {:?}", self.role, command);
        if self.command_tx.send(command).is_err() {
            log::warn!("{}: command channel closed, dropping command", self.role);
        }
    }
}
