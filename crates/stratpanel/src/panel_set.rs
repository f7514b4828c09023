use std::collections::BTreeMap;

use stratpanel_core::{settings::SettingsHandle, RecentScripts, Role};
use stratpanel_protos::{strategy_command::Command, strategy_status::Status};
use tokio::sync::mpsc;

use crate::{PanelConfig, StrategyPanel};

const RECENT_SCRIPTS_KEY: &str = "RecentScripts";

/// The strategy panels of one session.
///
/// Owns the recent script list shared by all panels and persists it next to
/// the panels' own settings.
pub struct PanelSet {
    settings: SettingsHandle,
    recent_scripts: RecentScripts,
    panels: BTreeMap<Role, StrategyPanel>,
}

impl PanelSet {
    /// Creates one panel per role in `roles`, all sending to `command_tx`.
    pub fn new(
        roles: &[Role],
        config: PanelConfig,
        settings: SettingsHandle,
        command_tx: mpsc::UnboundedSender<Command>,
    ) -> Self {
        let recent_scripts = RecentScripts::new();
        let panels = roles
            .iter()
            .map(|&role| {
                let mut panel =
                    StrategyPanel::new(role, config, settings.clone(), command_tx.clone());
                panel.set_recent_scripts(recent_scripts.clone());
                (role, panel)
            })
            .collect();
        Self {
            settings,
            recent_scripts,
            panels,
        }
    }

    /// Restores the recent scripts, then every panel.
    pub fn load(&mut self) {
        if let Some(list) = self.settings.get_string_list(RECENT_SCRIPTS_KEY) {
            self.recent_scripts.replace(list);
        }
        for panel in self.panels.values_mut() {
            panel.load();
        }
        log::info!(
            "Loaded {} panels, {} recent scripts",
            self.panels.len(),
            self.recent_scripts.len()
        );
    }

    /// Saves the recent scripts and shuts every panel down.
    pub fn shutdown(&mut self) {
        self.settings
            .set_string_list(RECENT_SCRIPTS_KEY, &self.recent_scripts.to_vec());
        for panel in self.panels.values_mut() {
            panel.shutdown();
        }
    }

    /// Hands `status` to every panel; only the addressed one reacts.
    pub fn handle_status(&mut self, status: &Status) {
        for panel in self.panels.values_mut() {
            panel.handle_status(status);
        }
    }

    pub fn enable_content(&mut self, enable: bool) {
        for panel in self.panels.values_mut() {
            panel.enable_content(enable);
        }
    }

    pub fn force_auto_reload(&mut self, force: bool) {
        for panel in self.panels.values_mut() {
            panel.force_auto_reload(force);
        }
    }

    pub fn set_use_dark_colors(&mut self, dark: bool) {
        for panel in self.panels.values_mut() {
            panel.set_use_dark_colors(dark);
        }
    }

    pub fn panel(&self, role: Role) -> Option<&StrategyPanel> {
        self.panels.get(&role)
    }

    pub fn panel_mut(&mut self, role: Role) -> Option<&mut StrategyPanel> {
        self.panels.get_mut(&role)
    }

    pub fn panels(&self) -> impl Iterator<Item = &StrategyPanel> {
        self.panels.values()
    }

    pub fn recent_scripts(&self) -> &RecentScripts {
        &self.recent_scripts
    }
}

#[cfg(test)]
mod tests {
    use stratpanel_protos::strategy_status::{status_strategy::State, StatusStrategy};

    use super::*;
    use crate::{role_strategy, strategy_status, StrategyState};

    fn panel_set(
        roles: &[Role],
        settings: SettingsHandle,
    ) -> (PanelSet, mpsc::UnboundedReceiver<Command>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (PanelSet::new(roles, PanelConfig::default(), settings, tx), rx)
    }

    #[test_log::test]
    fn test_panels_share_recent_scripts() {
        let (mut set, _rx) = panel_set(&Role::ALL, SettingsHandle::open_in_memory());

        set.panel_mut(Role::BlueTeam).unwrap().open("blue.lua");
        set.panel_mut(Role::YellowTeam).unwrap().open("yellow.ts");

        let expected = vec!["yellow.ts".to_string(), "blue.lua".to_string()];
        assert_eq!(set.recent_scripts().to_vec(), expected);
        assert_eq!(
            set.panel(Role::Autoref)
                .unwrap()
                .recent_scripts()
                .unwrap()
                .to_vec(),
            expected
        );
    }

    #[test_log::test]
    fn test_recent_scripts_persist_across_sessions() {
        let settings = SettingsHandle::open_in_memory();
        let (mut set, _rx) = panel_set(&[Role::BlueTeam], settings.clone());
        set.panel_mut(Role::BlueTeam).unwrap().open("a.lua");
        set.panel_mut(Role::BlueTeam).unwrap().open("b.lua");
        set.shutdown();

        let (mut restored, _rx) = panel_set(&[Role::BlueTeam, Role::YellowTeam], settings);
        restored.load();
        assert_eq!(restored.recent_scripts().to_vec(), vec!["b.lua", "a.lua"]);
    }

    #[test_log::test]
    fn test_status_reaches_only_addressed_panel() {
        let (mut set, _rx) = panel_set(&Role::ALL, SettingsHandle::open_in_memory());
        let mut strategy = StatusStrategy::new();
        strategy.set_state(State::FAILED);
        strategy.set_name("init.lua".to_owned());

        set.handle_status(&strategy_status(Role::ReplayYellow, strategy));

        for panel in set.panels() {
            if panel.role() == Role::ReplayYellow {
                assert_eq!(panel.state(), Some(StrategyState::Failed));
                assert!(panel.has_notification());
            } else {
                assert_eq!(panel.state(), None);
                assert_eq!(panel.label(), crate::DISABLED_LABEL);
            }
        }
    }

    #[test_log::test]
    fn test_shutdown_closes_every_panel() {
        let (mut set, mut rx) = panel_set(
            &[Role::BlueTeam, Role::Autoref],
            SettingsHandle::open_in_memory(),
        );
        set.shutdown();

        let mut closed = Vec::new();
        while let Ok(command) = rx.try_recv() {
            for role in [Role::BlueTeam, Role::Autoref] {
                if role_strategy(&command, role).is_some_and(|s| s.close.is_some()) {
                    closed.push(role);
                }
            }
        }
        assert_eq!(closed, vec![Role::BlueTeam, Role::Autoref]);
    }

    #[test_log::test]
    fn test_enable_content_fans_out() {
        let (mut set, _rx) = panel_set(&Role::ALL, SettingsHandle::open_in_memory());
        set.enable_content(false);
        assert!(set.panels().all(|panel| !panel.is_content_enabled()));
        set.enable_content(true);
        assert!(set.panels().all(|panel| panel.is_content_enabled()));
    }

    #[test_log::test]
    fn test_missing_role_has_no_panel() {
        let (set, _rx) = panel_set(&[Role::BlueTeam], SettingsHandle::open_in_memory());
        assert!(set.panel(Role::YellowTeam).is_none());
    }
}
