use stratpanel_core::Role;
use stratpanel_protos::{
    strategy_command::{Command, CommandStrategy},
    strategy_status::{Status, StatusStrategy, StatusStrategyWrapper},
};

/// Builds a command addressed to `role`'s strategy, filled in by `fill`.
pub fn strategy_command(role: Role, fill: impl FnOnce(&mut CommandStrategy)) -> Command {
    let mut command = Command::new();
    let strategy = match role {
        Role::BlueTeam => command.strategy_blue.mut_or_insert_default(),
        Role::YellowTeam => command.strategy_yellow.mut_or_insert_default(),
        Role::Autoref => command.strategy_autoref.mut_or_insert_default(),
        Role::ReplayBlue => command
            .replay
            .mut_or_insert_default()
            .blue_strategy
            .mut_or_insert_default(),
        Role::ReplayYellow => command
            .replay
            .mut_or_insert_default()
            .yellow_strategy
            .mut_or_insert_default(),
    };
    fill(strategy);
    command
}

/// The part of `command` addressed to `role`, if present.
pub fn role_strategy(command: &Command, role: Role) -> Option<&CommandStrategy> {
    match role {
        Role::BlueTeam => command.strategy_blue.as_ref(),
        Role::YellowTeam => command.strategy_yellow.as_ref(),
        Role::Autoref => command.strategy_autoref.as_ref(),
        Role::ReplayBlue => command
            .replay
            .as_ref()
            .and_then(|replay| replay.blue_strategy.as_ref()),
        Role::ReplayYellow => command
            .replay
            .as_ref()
            .and_then(|replay| replay.yellow_strategy.as_ref()),
    }
}

/// Wraps `strategy` into a status message reported for `role`.
pub fn strategy_status(role: Role, strategy: StatusStrategy) -> Status {
    let mut wrapper = StatusStrategyWrapper::new();
    wrapper.set_role(role.status_role());
    wrapper.status = Some(strategy).into();

    let mut status = Status::new();
    status.status_strategy = Some(wrapper).into();
    status
}
