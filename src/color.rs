/// Hue in degrees, saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsl {
    pub fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Hue given as a fraction of a full turn.
    pub fn from_turns(turns: f32, saturation: f32, lightness: f32) -> Self {
        Self::new(turns * 360.0, saturation, lightness)
    }

    pub fn css(&self) -> String {
        format!(
            "hsl({}, {}%, {}%)",
            self.hue,
            (self.saturation * 100.0).round(),
            (self.lightness * 100.0).round()
        )
    }

    /// sRGB components in `[0, 1]`.
    pub fn to_rgb(&self) -> [f32; 3] {
        let h = self.hue.rem_euclid(360.0) / 360.0;
        let s = self.saturation.clamp(0.0, 1.0);
        let l = self.lightness.clamp(0.0, 1.0);
        if s == 0.0 {
            return [l, l, l];
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        [
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        ]
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// `0xRRGGBB` to sRGB components.
pub fn rgb_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn css_string() {
        assert_eq!(Hsl::new(210.0, 0.7, 0.6).css(), "hsl(210, 70%, 60%)");
    }

    #[test]
    fn primary_hues() {
        assert!(close(Hsl::new(0.0, 1.0, 0.5).to_rgb(), [1.0, 0.0, 0.0]));
        assert!(close(Hsl::new(120.0, 1.0, 0.5).to_rgb(), [0.0, 1.0, 0.0]));
        assert!(close(Hsl::from_turns(2.0 / 3.0, 1.0, 0.5).to_rgb(), [0.0, 0.0, 1.0]));
    }

    #[test]
    fn grey_when_unsaturated() {
        assert!(close(Hsl::new(42.0, 0.0, 0.25).to_rgb(), [0.25, 0.25, 0.25]));
    }

    #[test]
    fn hex_decoding() {
        assert!(close(rgb_hex(0x28a745), [40.0 / 255.0, 167.0 / 255.0, 69.0 / 255.0]));
    }
}
