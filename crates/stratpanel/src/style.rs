use stratpanel_core::{Rgb, Role};

/// Percentage by which the role color is lightened for the idle background.
pub const BACKGROUND_LIGHTNESS: u32 = 170;

/// Colors the panel frame is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelStyle {
    pub border: Rgb,
    pub background: Rgb,
}

impl PanelStyle {
    /// The border always shows the role color. The background signals a failed
    /// strategy in red, a compiling one in gray, and otherwise shows a lighter
    /// role color.
    pub fn new(role: Role, dark_colors: bool, notification: bool, compiling: bool) -> Self {
        let border = role.base_color(dark_colors);
        let background = if notification {
            Rgb::RED
        } else if compiling {
            Rgb::GRAY
        } else {
            border.lighter(BACKGROUND_LIGHTNESS)
        };
        Self { border, background }
    }

    pub fn to_css(&self, selector: &str) -> String {
        format!(
            "{} {{ background-color: {}; border: 1px solid {}; border-radius: 5px; }}",
            selector,
            self.background.name(),
            self.border.name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_wins_over_compiling() {
        let style = PanelStyle::new(Role::BlueTeam, false, true, true);
        assert_eq!(style.background, Rgb::RED);
        assert_eq!(style.border, Role::BlueTeam.base_color(false));
    }

    #[test]
    fn test_compiling_is_gray() {
        let style = PanelStyle::new(Role::Autoref, true, false, true);
        assert_eq!(style.background, Rgb::GRAY);
        assert_eq!(style.border, Role::Autoref.base_color(true));
    }

    #[test]
    fn test_idle_background_is_lighter_role_color() {
        let style = PanelStyle::new(Role::YellowTeam, false, false, false);
        let base = Role::YellowTeam.base_color(false);
        assert_eq!(style.background, base.lighter(BACKGROUND_LIGHTNESS));
        assert_ne!(style.background, base);
    }

    #[test]
    fn test_css() {
        let style = PanelStyle {
            border: Rgb::new(0, 0, 255),
            background: Rgb::new(178, 178, 255),
        };
        assert_eq!(
            style.to_css("StrategyPanel"),
            "StrategyPanel { background-color: #b2b2ff; border: 1px solid #0000ff; border-radius: 5px; }"
        );
    }
}
