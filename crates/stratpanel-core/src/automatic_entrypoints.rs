use stratpanel_protos::ssl_gc_referee_message::referee::Stage;

use crate::settings::SettingsHandle;

/// Stages covered by the in-game automatic entry point.
pub const GAME_STAGES: [Stage; 7] = [
    Stage::NORMAL_SECOND_HALF_PRE,
    Stage::NORMAL_SECOND_HALF,
    Stage::EXTRA_FIRST_HALF_PRE,
    Stage::EXTRA_FIRST_HALF,
    Stage::EXTRA_SECOND_HALF_PRE,
    Stage::EXTRA_SECOND_HALF,
    Stage::PENALTY_SHOOTOUT,
];

/// Stages covered by the break automatic entry point.
pub const BREAK_STAGES: [Stage; 4] = [
    Stage::NORMAL_HALF_TIME,
    Stage::EXTRA_TIME_BREAK,
    Stage::EXTRA_HALF_TIME,
    Stage::PENALTY_SHOOTOUT_BREAK,
];

/// Stages covered by the post-game automatic entry point.
pub const POSTGAME_STAGES: [Stage; 1] = [Stage::POST_GAME];

const GAME_KEY: &str = "game";
const BREAK_KEY: &str = "break";
const POSTGAME_KEY: &str = "postgame";

/// Entry points the strategy host switches to on referee stage changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AutomaticEntrypoints {
    pub for_game: Option<String>,
    pub for_break: Option<String>,
    pub for_postgame: Option<String>,
}

impl AutomaticEntrypoints {
    pub fn all_unset(&self) -> bool {
        self.for_game.is_none() && self.for_break.is_none() && self.for_postgame.is_none()
    }

    /// Expands the set entry points into one `(stage, entry point)` pair per
    /// covered stage, in game, break, post-game order.
    pub fn stage_mappings(&self) -> Vec<(Stage, &str)> {
        let groups: [(&Option<String>, &[Stage]); 3] = [
            (&self.for_game, &GAME_STAGES),
            (&self.for_break, &BREAK_STAGES),
            (&self.for_postgame, &POSTGAME_STAGES),
        ];
        groups
            .into_iter()
            .filter_map(|(entrypoint, stages)| entrypoint.as_deref().map(|e| (e, stages)))
            .flat_map(|(entrypoint, stages)| stages.iter().map(move |stage| (*stage, entrypoint)))
            .collect()
    }

    /// Reads the entry points from `settings`. Missing or empty keys stay unset.
    pub fn load(settings: &SettingsHandle) -> Self {
        let read = |key: &str| settings.get_string(key).filter(|e| !e.is_empty());
        Self {
            for_game: read(GAME_KEY),
            for_break: read(BREAK_KEY),
            for_postgame: read(POSTGAME_KEY),
        }
    }

    /// Writes the entry points to `settings`; unset entry points remove their key.
    pub fn save(&self, settings: &SettingsHandle) {
        for (key, value) in [
            (GAME_KEY, &self.for_game),
            (BREAK_KEY, &self.for_break),
            (POSTGAME_KEY, &self.for_postgame),
        ] {
            match value {
                Some(entrypoint) => settings.set_string(key, entrypoint),
                None => settings.remove(key),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_unset() {
        assert!(AutomaticEntrypoints::default().all_unset());
        assert!(AutomaticEntrypoints::default().stage_mappings().is_empty());

        let entrypoints = AutomaticEntrypoints {
            for_break: Some("break/idle".to_string()),
            ..Default::default()
        };
        assert!(!entrypoints.all_unset());
    }

    #[test]
    fn test_stage_mappings_expand_each_group() {
        let entrypoints = AutomaticEntrypoints {
            for_game: Some("game".to_string()),
            for_break: None,
            for_postgame: Some("post".to_string()),
        };
        let mappings = entrypoints.stage_mappings();
        assert_eq!(mappings.len(), 8);
        assert!(mappings[..7]
            .iter()
            .zip(GAME_STAGES)
            .all(|(&(stage, e), expected)| stage == expected && e == "game"));
        assert_eq!(mappings[7], (Stage::POST_GAME, "post"));
    }

    #[test]
    fn test_stage_sets_are_disjoint_and_skip_first_half() {
        let mut all: Vec<Stage> = GAME_STAGES
            .iter()
            .chain(BREAK_STAGES.iter())
            .chain(POSTGAME_STAGES.iter())
            .copied()
            .collect();
        let total = all.len();
        all.sort_by_key(|stage| *stage as i32);
        all.dedup();
        assert_eq!(all.len(), total);
        assert!(!all.contains(&Stage::NORMAL_FIRST_HALF_PRE));
        assert!(!all.contains(&Stage::NORMAL_FIRST_HALF));
    }

    #[test]
    fn test_save_removes_unset_keys() {
        let settings = SettingsHandle::open_in_memory().group("AutomaticEntrypoints");
        let set = AutomaticEntrypoints {
            for_game: Some("g".to_string()),
            for_break: Some("b".to_string()),
            for_postgame: Some("p".to_string()),
        };
        set.save(&settings);
        assert_eq!(AutomaticEntrypoints::load(&settings), set);

        let partial = AutomaticEntrypoints {
            for_break: Some("b2".to_string()),
            ..Default::default()
        };
        partial.save(&settings);
        assert!(!settings.contains("game"));
        assert!(!settings.contains("postgame"));
        assert_eq!(AutomaticEntrypoints::load(&settings), partial);
    }
}
