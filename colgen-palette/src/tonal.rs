use palette::convert::FromColorUnclamped;
use palette::{FromColor, Lch, Srgb};

/// Slack allowed when checking whether a converted color is inside sRGB.
const GAMUT_EPSILON: f32 = 1e-4;
const CHROMA_STEPS: usize = 16;

/// A hue and a chroma; tones are read off it by lightness (CIE L*).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TonalPalette {
    pub hue: f32,
    pub chroma: f32,
}

impl TonalPalette {
    pub fn new(hue: f32, chroma: f32) -> Self {
        Self {
            hue: hue.rem_euclid(360.0),
            chroma: chroma.max(0.0),
        }
    }

    /// The color at lightness `tone` (0 = black, 100 = white).
    ///
    /// If the requested chroma does not fit in sRGB at this tone, the largest
    /// chroma that does is used instead; hue and tone are preserved.
    pub fn tone(&self, tone: f32) -> Srgb<u8> {
        let tone = tone.clamp(0.0, 100.0);
        if tone <= 0.0 {
            return Srgb::new(0, 0, 0);
        }
        if tone >= 100.0 {
            return Srgb::new(255, 255, 255);
        }

        if let Some(rgb) = self.in_gamut(tone, self.chroma) {
            return rgb.into_format();
        }

        // Bisect for the largest chroma that stays in gamut.
        let (mut lo, mut hi) = (0.0f32, self.chroma);
        let mut best = self.in_gamut(tone, 0.0).unwrap_or_else(|| gray(tone));
        for _ in 0..CHROMA_STEPS {
            let mid = (lo + hi) / 2.0;
            match self.in_gamut(tone, mid) {
                Some(rgb) => {
                    best = rgb;
                    lo = mid;
                }
                None => hi = mid,
            }
        }
        best.into_format()
    }

    fn in_gamut(&self, tone: f32, chroma: f32) -> Option<Srgb> {
        let lch: Lch = Lch::new(tone, chroma, self.hue);
        let rgb: Srgb = Srgb::from_color_unclamped(lch);
        let ok = [rgb.red, rgb.green, rgb.blue]
            .iter()
            .all(|c| (-GAMUT_EPSILON..=1.0 + GAMUT_EPSILON).contains(c));
        ok.then(|| Srgb::new(rgb.red.clamp(0.0, 1.0), rgb.green.clamp(0.0, 1.0), rgb.blue.clamp(0.0, 1.0)))
    }
}

fn gray(tone: f32) -> Srgb {
    let lch: Lch = Lch::new(tone, 0.0, 0.0);
    let rgb: Srgb = Srgb::from_color(lch);
    let v = rgb.red.clamp(0.0, 1.0);
    Srgb::new(v, v, v)
}
