/// An 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(0xff, 0x00, 0x00);
    pub const GRAY: Rgb = Rgb::new(0x80, 0x80, 0x80);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` notation.
    pub fn name(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Returns a lighter color by scaling the HSV value by `factor` percent.
    ///
    /// When the value overflows, the excess is taken from the saturation, so
    /// strongly saturated colors fade towards white instead of clipping.
    /// Factors below 100 darken.
    pub fn lighter(&self, factor: u32) -> Rgb {
        if factor == 0 {
            return *self;
        }
        if factor < 100 {
            return self.darker(10000 / factor);
        }

        let (h, s, v) = self.to_hsv();
        let scaled = i64::from(v) * i64::from(factor) / 100;
        if scaled > 255 {
            let s = (i64::from(s) - (scaled - 255)).max(0) as i32;
            Rgb::from_hsv(h, s, 255)
        } else {
            Rgb::from_hsv(h, s, scaled as i32)
        }
    }

    /// Returns a darker color by dividing the HSV value by `factor` percent.
    pub fn darker(&self, factor: u32) -> Rgb {
        if factor == 0 {
            return *self;
        }
        if factor < 100 {
            return self.lighter(10000 / factor);
        }

        let (h, s, v) = self.to_hsv();
        Rgb::from_hsv(h, s, (i64::from(v) * 100 / i64::from(factor)) as i32)
    }

    /// Hue in degrees, saturation and value in `0..=255`.
    fn to_hsv(self) -> (f64, i32, i32) {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let s = if max == 0.0 { 0.0 } else { delta / max };
        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        (h, (s * 255.0).round() as i32, (max * 255.0).round() as i32)
    }

    fn from_hsv(h: f64, s: i32, v: i32) -> Rgb {
        let s = s.clamp(0, 255) as f64 / 255.0;
        let v = v.clamp(0, 255) as f64 / 255.0;
        let c = v * s;
        let hp = (h / 60.0).rem_euclid(6.0);
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let channel = |value: f64| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(channel(r), channel(g), channel(b))
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        assert_eq!(Rgb::new(0x44, 0x8a, 0xff).name(), "#448aff");
        assert_eq!(Rgb::RED.to_string(), "#ff0000");
    }

    #[test]
    fn test_lighter_gray_scales_value() {
        assert_eq!(Rgb::new(100, 100, 100).lighter(170), Rgb::new(170, 170, 170));
        assert_eq!(Rgb::new(200, 200, 200).lighter(170), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_lighter_saturated_spills_into_saturation() {
        assert_eq!(Rgb::new(0, 0, 255).lighter(170), Rgb::new(178, 178, 255));
    }

    #[test]
    fn test_darker_inverts_lighter_for_grays() {
        assert_eq!(Rgb::new(170, 170, 170).darker(170), Rgb::new(100, 100, 100));
        assert_eq!(Rgb::new(100, 100, 100).lighter(50), Rgb::new(50, 50, 50));
    }

    #[test]
    fn test_extreme_factors_saturate() {
        let blue = Rgb::new(0x44, 0x8a, 0xff);
        assert_eq!(blue.lighter(u32::MAX), Rgb::new(255, 255, 255));
        assert_eq!(blue.darker(u32::MAX), Rgb::new(0, 0, 0));
    }
}
