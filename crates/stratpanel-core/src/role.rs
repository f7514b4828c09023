use stratpanel_protos::strategy_status::status_strategy_wrapper::StrategyRole;

use crate::Rgb;

/// The strategy slot a panel controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    BlueTeam,
    YellowTeam,
    Autoref,
    ReplayBlue,
    ReplayYellow,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::BlueTeam,
        Role::YellowTeam,
        Role::Autoref,
        Role::ReplayBlue,
        Role::ReplayYellow,
    ];

    /// Name of the settings group holding this role's preferences.
    pub fn settings_group(&self) -> &'static str {
        match self {
            Role::BlueTeam => "BlueTeam",
            Role::YellowTeam => "YellowTeam",
            Role::Autoref => "Autoref",
            Role::ReplayBlue => "ReplayBlue",
            Role::ReplayYellow => "ReplayYellow",
        }
    }

    /// The role tag used by inbound status messages.
    pub fn status_role(&self) -> StrategyRole {
        match self {
            Role::BlueTeam => StrategyRole::BLUE,
            Role::YellowTeam => StrategyRole::YELLOW,
            Role::Autoref => StrategyRole::AUTOREF,
            Role::ReplayBlue => StrategyRole::REPLAY_BLUE,
            Role::ReplayYellow => StrategyRole::REPLAY_YELLOW,
        }
    }

    pub fn from_status_role(role: StrategyRole) -> Role {
        match role {
            StrategyRole::BLUE => Role::BlueTeam,
            StrategyRole::YELLOW => Role::YellowTeam,
            StrategyRole::AUTOREF => Role::Autoref,
            StrategyRole::REPLAY_BLUE => Role::ReplayBlue,
            StrategyRole::REPLAY_YELLOW => Role::ReplayYellow,
        }
    }

    /// Base panel color for this role.
    ///
    /// Replay roles share the colors of the team they replay.
    pub fn base_color(&self, dark: bool) -> Rgb {
        match (self, dark) {
            (Role::BlueTeam | Role::ReplayBlue, false) => BLUE_COLOR_LIGHT,
            (Role::BlueTeam | Role::ReplayBlue, true) => BLUE_COLOR_DARK,
            (Role::YellowTeam | Role::ReplayYellow, false) => YELLOW_COLOR_LIGHT,
            (Role::YellowTeam | Role::ReplayYellow, true) => YELLOW_COLOR_DARK,
            (Role::Autoref, false) => AUTOREF_COLOR_LIGHT,
            (Role::Autoref, true) => AUTOREF_COLOR_DARK,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.settings_group())
    }
}

impl std::str::FromStr for Role {
    type Err = anyhow::Error;

    /// Parses either the settings group name or a short alias (`blue`, `yellow`,
    /// `autoref`, `replay-blue`, `replay-yellow`), case insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace(['-', '_'], "");
        Role::ALL
            .into_iter()
            .find(|role| {
                let group = role.settings_group().to_lowercase();
                group == normalized || group.trim_end_matches("team") == normalized
            })
            .ok_or_else(|| anyhow::anyhow!("Unknown strategy role: {}", s))
    }
}

pub const BLUE_COLOR_LIGHT: Rgb = Rgb::new(0x44, 0x8a, 0xff);
pub const BLUE_COLOR_DARK: Rgb = Rgb::new(0x1f, 0x4e, 0x9c);
pub const YELLOW_COLOR_LIGHT: Rgb = Rgb::new(0xff, 0xd7, 0x00);
pub const YELLOW_COLOR_DARK: Rgb = Rgb::new(0x9c, 0x84, 0x00);
pub const AUTOREF_COLOR_LIGHT: Rgb = Rgb::new(0xb3, 0x6b, 0xe0);
pub const AUTOREF_COLOR_DARK: Rgb = Rgb::new(0x6a, 0x3d, 0x8a);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_role_roundtrip() {
        for role in Role::ALL {
            assert_eq!(Role::from_status_role(role.status_role()), role);
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("blue".parse::<Role>().unwrap(), Role::BlueTeam);
        assert_eq!("YellowTeam".parse::<Role>().unwrap(), Role::YellowTeam);
        assert_eq!("autoref".parse::<Role>().unwrap(), Role::Autoref);
        assert_eq!("replay-blue".parse::<Role>().unwrap(), Role::ReplayBlue);
        assert_eq!("replay_yellow".parse::<Role>().unwrap(), Role::ReplayYellow);
        assert!("green".parse::<Role>().is_err());
    }

    #[test]
    fn test_replay_shares_team_color() {
        assert_eq!(Role::ReplayBlue.base_color(false), Role::BlueTeam.base_color(false));
        assert_eq!(Role::ReplayYellow.base_color(true), Role::YellowTeam.base_color(true));
    }
}
