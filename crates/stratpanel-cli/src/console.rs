//! Line based console driving the panels.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use stratpanel::{PanelAction, PanelSet, StrategyPanel};
use stratpanel_core::{AutomaticEntrypoints, Role};
use stratpanel_protos::strategy_status::{status_strategy::State, StatusStrategy};

/// Placeholder for an unset automatic entry point.
const UNSET: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn is_on(self) -> bool {
        self == Toggle::On
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    Closed,
    Running,
    Failed,
    Compiling,
}

impl From<StateArg> for State {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Closed => State::CLOSED,
            StateArg::Running => State::RUNNING,
            StateArg::Failed => State::FAILED,
            StateArg::Compiling => State::COMPILING,
        }
    }
}

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_help_flag = true)]
struct ConsoleLine {
    #[command(subcommand)]
    command: ConsoleCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ConsoleCommand {
    /// Open a strategy script.
    Open { role: Role, path: String },
    /// Select an entry point of the current script.
    Entry { role: Role, name: String },
    /// Close the running strategy.
    Close { role: Role },
    Reload { role: Role },
    #[command(name = "autoreload")]
    AutoReload { role: Role, state: Toggle },
    Debug { role: Role, state: Toggle },
    /// Break into the strategy debugger.
    Trigger { role: Role },
    Perf { role: Role, state: Toggle },
    /// Set the automatic entry points, `-` leaves one unset.
    Auto {
        role: Role,
        game: String,
        #[arg(value_name = "BREAK")]
        break_: String,
        postgame: String,
    },
    /// Feed a status report as if sent by the strategy host.
    Status {
        role: Role,
        state: StateArg,
        name: String,
        #[arg(long)]
        current: Option<String>,
        #[arg(long, value_delimiter = ',')]
        entry_points: Vec<String>,
        #[arg(long, default_value = "false", action)]
        debugger: bool,
    },
    Enable { state: Toggle },
    ForceReload { state: Toggle },
    /// Print the display state of a panel.
    Show { role: Role },
    /// Print the recent scripts.
    Recent,
    #[command(alias = "exit")]
    Quit,
}

/// Whether the console keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parses one console line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    let parsed =
        ConsoleLine::try_parse_from(words).map_err(|err| anyhow!("{}", err.render()))?;
    Ok(Some(parsed.command))
}

fn panel_mut(panels: &mut PanelSet, role: Role) -> Result<&mut StrategyPanel> {
    panels
        .panel_mut(role)
        .ok_or_else(|| anyhow!("No panel for {}", role))
}

fn unset_if_dash(value: String) -> Option<String> {
    (value != UNSET).then_some(value)
}

/// Runs `command` against the panels.
pub fn apply(panels: &mut PanelSet, command: ConsoleCommand) -> Result<Flow> {
    let action = match command {
        ConsoleCommand::Open { role, path } => (role, PanelAction::Browse(path)),
        ConsoleCommand::Entry { role, name } => (role, PanelAction::SelectEntrypoint(name)),
        ConsoleCommand::Close { role } => (role, PanelAction::Disable),
        ConsoleCommand::Reload { role } => (role, PanelAction::Reload),
        ConsoleCommand::AutoReload { role, state } => {
            (role, PanelAction::SetAutoReload(state.is_on()))
        }
        ConsoleCommand::Debug { role, state } => {
            (role, PanelAction::SetDebugEnabled(state.is_on()))
        }
        ConsoleCommand::Trigger { role } => (role, PanelAction::TriggerDebugger),
        ConsoleCommand::Perf { role, state } => {
            (role, PanelAction::SetPerformanceMode(state.is_on()))
        }
        ConsoleCommand::Auto {
            role,
            game,
            break_,
            postgame,
        } => {
            let entrypoints = AutomaticEntrypoints {
                for_game: unset_if_dash(game),
                for_break: unset_if_dash(break_),
                for_postgame: unset_if_dash(postgame),
            };
            (role, PanelAction::EditAutomaticEntrypoints(entrypoints))
        }
        ConsoleCommand::Status {
            role,
            state,
            name,
            current,
            entry_points,
            debugger,
        } => {
            let mut strategy = StatusStrategy::new();
            strategy.set_state(state.into());
            strategy.set_name(name);
            strategy.entry_point = entry_points;
            if let Some(current) = current {
                strategy.set_current_entry_point(current);
            }
            strategy.set_has_debugger(debugger);
            panels.handle_status(&stratpanel::strategy_status(role, strategy));
            return Ok(Flow::Continue);
        }
        ConsoleCommand::Enable { state } => {
            panels.enable_content(state.is_on());
            return Ok(Flow::Continue);
        }
        ConsoleCommand::ForceReload { state } => {
            panels.force_auto_reload(state.is_on());
            return Ok(Flow::Continue);
        }
        ConsoleCommand::Show { role } => {
            let panel = panels
                .panel(role)
                .ok_or_else(|| anyhow!("No panel for {}", role))?;
            println!("{}", describe(panel));
            return Ok(Flow::Continue);
        }
        ConsoleCommand::Recent => {
            for (i, script) in panels.recent_scripts().to_vec().iter().enumerate() {
                println!("{}: {}", i + 1, script);
            }
            return Ok(Flow::Continue);
        }
        ConsoleCommand::Quit => return Ok(Flow::Quit),
    };

    let (role, action) = action;
    if !panel_mut(panels, role)?.handle_action(action) {
        eprintln!("{}: control is disabled", role);
    }
    Ok(Flow::Continue)
}

/// Human readable summary of a panel's display state.
pub fn describe(panel: &StrategyPanel) -> String {
    let selection = panel.selection();
    let state = panel
        .state()
        .map(|state| format!("{:?}", state))
        .unwrap_or_else(|| "-".to_owned());
    let automatic = panel.automatic_entrypoints();
    let or_dash = |value: Option<&str>| value.unwrap_or(UNSET).to_owned();
    let menu: Vec<String> = panel
        .script_menu()
        .iter()
        .map(|item| item.label().to_owned())
        .filter(|label| !label.is_empty())
        .collect();

    [
        format!("[{}] {} ({})", panel.role(), panel.label(), state),
        format!("  script:       {}", or_dash(selection.filename.as_deref())),
        format!("  entry point:  {}", or_dash(panel.entrypoint_label().as_deref())),
        format!("  entry points: {}", panel.entrypoints().join(", ")),
        format!(
            "  automatic:    game={} break={} postgame={}",
            or_dash(automatic.for_game.as_deref()),
            or_dash(automatic.for_break.as_deref()),
            or_dash(automatic.for_postgame.as_deref()),
        ),
        format!(
            "  auto reload={} debug={} performance={}",
            selection.auto_reload, selection.debug_enabled, selection.performance_mode
        ),
        format!("  menu:         {}", menu.join(" | ")),
        format!("  style:        {}", panel.style().to_css("QFrame")),
    ]
    .join("\n")
}
