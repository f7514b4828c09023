//! Hierarchical entry point names.
//!
//! Strategies name their entry points with `/`-separated paths such as
//! `game/offense/corner`. These are organized into a menu tree with one
//! sub-menu per path segment.

/// One item of an [`EntrypointMenu`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// Selectable leaf carrying the full entry point name.
    Action { text: String, entry_point: String },
    SubMenu { title: String, menu: EntrypointMenu },
}

impl MenuEntry {
    /// The label shown for this entry.
    pub fn title(&self) -> &str {
        match self {
            MenuEntry::Action { text, .. } => text,
            MenuEntry::SubMenu { title, .. } => title,
        }
    }
}

/// A tree of entry points, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntrypointMenu {
    entries: Vec<MenuEntry>,
}

impl EntrypointMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a menu where every entry point is inserted under its own name.
    pub fn from_entrypoints<S: AsRef<str>>(entrypoints: &[S]) -> Self {
        let mut menu = Self::new();
        for entrypoint in entrypoints {
            let entrypoint = entrypoint.as_ref();
            add_entry_point(&mut menu, entrypoint, entrypoint);
        }
        menu
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The sub-menu titled `title` at this level, if any.
    pub fn submenu(&self, title: &str) -> Option<&EntrypointMenu> {
        self.entries.iter().find_map(|entry| match entry {
            MenuEntry::SubMenu { title: t, menu } if t == title => Some(menu),
            _ => None,
        })
    }

    fn submenu_mut_or_insert(&mut self, title: &str) -> &mut EntrypointMenu {
        let position = self
            .entries
            .iter()
            .position(|entry| matches!(entry, MenuEntry::SubMenu { title: t, .. } if t == title));
        let index = match position {
            Some(index) => index,
            None => {
                self.entries.push(MenuEntry::SubMenu {
                    title: title.to_owned(),
                    menu: EntrypointMenu::new(),
                });
                self.entries.len() - 1
            }
        };
        match &mut self.entries[index] {
            MenuEntry::SubMenu { menu, .. } => menu,
            MenuEntry::Action { .. } => unreachable!("index points at a sub-menu"),
        }
    }

    /// All leaf entry points, depth first.
    pub fn entrypoints(&self) -> Vec<&str> {
        let mut result = Vec::new();
        self.collect_entrypoints(&mut result);
        result
    }

    fn collect_entrypoints<'a>(&'a self, out: &mut Vec<&'a str>) {
        for entry in &self.entries {
            match entry {
                MenuEntry::Action { entry_point, .. } => out.push(entry_point),
                MenuEntry::SubMenu { menu, .. } => menu.collect_entrypoints(out),
            }
        }
    }
}

/// Inserts `entry_point` into `menu` at the position described by `name`.
///
/// `name` is split on its first `/`: without a separator a leaf is appended,
/// otherwise the sub-menu for the first segment is looked up (or created) and
/// the remainder is inserted there.
pub fn add_entry_point(menu: &mut EntrypointMenu, name: &str, entry_point: &str) {
    match name.split_once('/') {
        None => menu.entries.push(MenuEntry::Action {
            text: name.to_owned(),
            entry_point: entry_point.to_owned(),
        }),
        Some((group, rest)) => {
            add_entry_point(menu.submenu_mut_or_insert(group), rest, entry_point);
        }
    }
}

/// Shortens `name` to fit `target_length` characters where possible.
///
/// Leading path segments are abbreviated one at a time, left to right, each to
/// the shortest prefix that still tells it apart from its siblings in `menu`.
/// Shortening stops once the name fits or only the last segment is left. The
/// last segment is never abbreviated.
pub fn shorten_entrypoint_name(menu: &EntrypointMenu, name: &str, target_length: usize) -> String {
    let mut left = String::new();
    let mut right = name;
    let mut menu = menu;

    while left.chars().count() + 1 + right.chars().count() > target_length {
        let Some((segment, rest)) = right.split_once('/') else {
            break;
        };
        let Some(next_menu) = menu.submenu(segment) else {
            break;
        };

        // Length of the longest prefix shared with any sibling
        let segment_chars: Vec<char> = segment.chars().collect();
        let mut max_common = 0;
        for sibling in menu.entries().iter().map(MenuEntry::title) {
            if sibling == segment {
                continue;
            }
            for (i, c) in sibling.chars().enumerate() {
                if segment_chars.get(i) != Some(&c) {
                    max_common = max_common.max(i);
                    break;
                }
            }
        }

        if !left.is_empty() {
            left.push('/');
        }
        left.extend(segment_chars.iter().take(max_common + 1));
        right = rest;
        menu = next_menu;
    }

    if left.is_empty() {
        right.to_owned()
    } else {
        format!("{}/{}", left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> EntrypointMenu {
        EntrypointMenu::from_entrypoints(&[
            "game/offense/corner",
            "game/offense/kickoff",
            "game/defense",
            "gameplay/test",
            "testing/drive",
            "stop",
        ])
    }

    #[test]
    fn test_add_entry_point_builds_tree() {
        let menu = menu();
        let titles: Vec<_> = menu.entries().iter().map(MenuEntry::title).collect();
        assert_eq!(titles, vec!["game", "gameplay", "testing", "stop"]);

        let game = menu.submenu("game").unwrap();
        let game_titles: Vec<_> = game.entries().iter().map(MenuEntry::title).collect();
        assert_eq!(game_titles, vec!["offense", "defense"]);

        let offense = game.submenu("offense").unwrap();
        assert_eq!(
            offense.entries()[1],
            MenuEntry::Action {
                text: "kickoff".to_string(),
                entry_point: "game/offense/kickoff".to_string(),
            }
        );
    }

    #[test]
    fn test_add_entry_point_reuses_non_adjacent_group() {
        let menu = EntrypointMenu::from_entrypoints(&["a/x", "b", "a/y"]);
        assert_eq!(menu.entries().len(), 2);
        assert_eq!(menu.entrypoints(), vec!["a/x", "a/y", "b"]);
    }

    #[test]
    fn test_shorten_keeps_short_names() {
        let menu = menu();
        assert_eq!(shorten_entrypoint_name(&menu, "game/defense", 20), "game/defense");
        assert_eq!(shorten_entrypoint_name(&menu, "stop", 1), "stop");
    }

    #[test]
    fn test_shorten_disambiguates_against_siblings() {
        let menu = menu();
        // "game" diverges from "gameplay" only after its own end, so it stays whole
        assert_eq!(
            shorten_entrypoint_name(&menu, "game/offense/corner", 10),
            "game/o/corner"
        );
        // "game" is a prefix of "gameplay" and therefore never counts as a divergence
        assert_eq!(shorten_entrypoint_name(&menu, "gameplay/test", 5), "g/test");
        assert_eq!(shorten_entrypoint_name(&menu, "testing/drive", 5), "t/drive");
    }

    #[test]
    fn test_shorten_stops_once_it_fits() {
        let menu = menu();
        assert_eq!(shorten_entrypoint_name(&menu, "testing/drive", 14), "testing/drive");
        assert_eq!(shorten_entrypoint_name(&menu, "testing/drive", 13), "t/drive");

        assert_eq!(
            shorten_entrypoint_name(&menu, "game/offense/corner", 19),
            "game/offense/corner"
        );
        assert_eq!(
            shorten_entrypoint_name(&menu, "game/offense/corner", 18),
            "game/o/corner"
        );
    }

    #[test]
    fn test_shortened_siblings_do_not_collide() {
        let names = [
            "alpha/run",
            "alps/run",
            "beta/run",
            "bet/run",
            "gamma/run",
        ];
        let menu = EntrypointMenu::from_entrypoints(&names);
        let shortened: Vec<_> = names
            .iter()
            .map(|name| shorten_entrypoint_name(&menu, name, 0))
            .collect();
        for (i, a) in shortened.iter().enumerate() {
            for b in shortened.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_prefix_sibling_shortens_to_same_name() {
        // A sibling that is a prefix of the segment never diverges from it,
        // so both names end up with the same abbreviation
        let menu = EntrypointMenu::from_entrypoints(&["g/test", "gameplay/test"]);
        assert_eq!(shorten_entrypoint_name(&menu, "g/test", 0), "g/test");
        assert_eq!(shorten_entrypoint_name(&menu, "gameplay/test", 0), "g/test");
    }
}
