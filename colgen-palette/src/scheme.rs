use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use palette::{IntoColor, Lch, Srgb};

use crate::roles::{Colors, PaletteKind, ROLES};
use crate::seed::extract_seed_color;
use crate::{PaletteError, TonalPalette};

/// How far one step of contrast moves a foreground tone.
const CONTRAST_TONE_RANGE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Dark,
    Light,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Dark => "dark",
            Mode::Light => "light",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Mode::Dark
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Ok(Mode::Dark),
            "light" => Ok(Mode::Light),
            _ => Err(PaletteError::UnknownMode(s.to_string())),
        }
    }
}

/// The flavors of scheme that can be built from one seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemeVariant {
    #[default]
    TonalSpot,
    Expressive,
    Fidelity,
    FruitSalad,
    Monochrome,
    Neutral,
    Rainbow,
    Vibrant,
    Content,
}

impl SchemeVariant {
    pub const ALL: [SchemeVariant; 9] = [
        SchemeVariant::TonalSpot,
        SchemeVariant::Expressive,
        SchemeVariant::Fidelity,
        SchemeVariant::FruitSalad,
        SchemeVariant::Monochrome,
        SchemeVariant::Neutral,
        SchemeVariant::Rainbow,
        SchemeVariant::Vibrant,
        SchemeVariant::Content,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SchemeVariant::TonalSpot => "tonal-spot",
            SchemeVariant::Expressive => "expressive",
            SchemeVariant::Fidelity => "fidelity",
            SchemeVariant::FruitSalad => "fruit-salad",
            SchemeVariant::Monochrome => "monochrome",
            SchemeVariant::Neutral => "neutral",
            SchemeVariant::Rainbow => "rainbow",
            SchemeVariant::Vibrant => "vibrant",
            SchemeVariant::Content => "content",
        }
    }

    /// Builds the five key palettes for a seed of the given hue and chroma.
    pub fn palettes(self, hue: f32, chroma: f32) -> CorePalettes {
        let p = TonalPalette::new;
        let (primary, secondary, tertiary, neutral, neutral_variant) = match self {
            SchemeVariant::TonalSpot => (
                p(hue, 36.0),
                p(hue, 16.0),
                p(hue + 60.0, 24.0),
                p(hue, 6.0),
                p(hue, 8.0),
            ),
            SchemeVariant::Expressive => (
                p(hue + 240.0, 40.0),
                p(hue - 30.0, 24.0),
                p(hue + 60.0, 32.0),
                p(hue + 15.0, 8.0),
                p(hue + 15.0, 12.0),
            ),
            SchemeVariant::Fidelity => (
                p(hue, chroma),
                p(hue, (chroma - 32.0).max(chroma * 0.5)),
                p(hue + 180.0, (chroma - 32.0).max(chroma * 0.5)),
                p(hue, chroma / 12.0),
                p(hue, chroma / 8.0 + 4.0),
            ),
            SchemeVariant::Content => (
                p(hue, chroma),
                p(hue, (chroma - 32.0).max(chroma * 0.5)),
                p(hue + 60.0, (chroma - 32.0).max(chroma * 0.5)),
                p(hue, chroma / 12.0),
                p(hue, chroma / 8.0 + 4.0),
            ),
            SchemeVariant::FruitSalad => (
                p(hue - 50.0, 48.0),
                p(hue - 50.0, 36.0),
                p(hue, 36.0),
                p(hue, 10.0),
                p(hue, 16.0),
            ),
            SchemeVariant::Monochrome => (
                p(hue, 0.0),
                p(hue, 0.0),
                p(hue, 0.0),
                p(hue, 0.0),
                p(hue, 0.0),
            ),
            SchemeVariant::Neutral => (
                p(hue, 12.0),
                p(hue, 8.0),
                p(hue, 16.0),
                p(hue, 2.0),
                p(hue, 2.0),
            ),
            SchemeVariant::Rainbow => (
                p(hue, 48.0),
                p(hue, 16.0),
                p(hue + 60.0, 24.0),
                p(hue, 0.0),
                p(hue, 0.0),
            ),
            SchemeVariant::Vibrant => (
                p(hue, 200.0),
                p(hue + 15.0, 24.0),
                p(hue + 30.0, 32.0),
                p(hue, 10.0),
                p(hue, 12.0),
            ),
        };

        CorePalettes {
            primary,
            secondary,
            tertiary,
            neutral,
            neutral_variant,
            error: p(25.0, 84.0),
        }
    }
}

impl fmt::Display for SchemeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemeVariant {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemeVariant::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| PaletteError::UnknownScheme(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorePalettes {
    pub primary: TonalPalette,
    pub secondary: TonalPalette,
    pub tertiary: TonalPalette,
    pub neutral: TonalPalette,
    pub neutral_variant: TonalPalette,
    pub error: TonalPalette,
}

impl CorePalettes {
    pub fn get(&self, kind: PaletteKind) -> &TonalPalette {
        match kind {
            PaletteKind::Primary => &self.primary,
            PaletteKind::Secondary => &self.secondary,
            PaletteKind::Tertiary => &self.tertiary,
            PaletteKind::Neutral => &self.neutral,
            PaletteKind::NeutralVariant => &self.neutral_variant,
            PaletteKind::Error => &self.error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SchemeOptions {
    pub mode: Mode,
    pub variant: SchemeVariant,
    /// -1.0 (softer) to 1.0 (harsher); 0.0 is the standard scheme.
    pub contrast: f32,
}

/// Builds every color role from a seed color.
pub fn scheme_from_seed(seed: Srgb<u8>, options: &SchemeOptions) -> Colors {
    let lch: Lch = seed.into_format::<f32>().into_color();
    let palettes = options
        .variant
        .palettes(lch.hue.into_positive_degrees(), lch.chroma);
    let contrast = options.contrast.clamp(-1.0, 1.0);

    let entries = ROLES
        .iter()
        .map(|role| {
            let mut tone = if options.mode.is_dark() {
                role.dark_tone
            } else {
                role.light_tone
            };
            if role.foreground && contrast != 0.0 {
                // Push away from the middle, i.e. away from the surface behind it.
                let direction = if tone >= 50.0 { 1.0 } else { -1.0 };
                tone = (tone + direction * contrast * CONTRAST_TONE_RANGE).clamp(0.0, 100.0);
            }
            (role.name, palettes.get(role.palette).tone(tone))
        })
        .collect();

    Colors::new(entries)
}

/// Opens `path`, picks a seed color from it and builds the scheme.
pub fn generate_scheme<P: AsRef<Path>>(path: P, options: &SchemeOptions) -> Result<Colors> {
    let path = path.as_ref();
    let img = image::open(path).with_context(|| format!("Failed to open image {}", path.display()))?;
    let seed = extract_seed_color(&img);
    Ok(scheme_from_seed(seed, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_to_hex;

    fn luminance(c: Srgb<u8>) -> f32 {
        let lch: Lch = c.into_format::<f32>().into_color();
        lch.l
    }

    #[test]
    fn every_role_is_present() {
        let colors = scheme_from_seed(Srgb::new(0x42, 0x85, 0xf4), &SchemeOptions::default());
        assert_eq!(colors.len(), 48);
        for (name, color) in colors.iter() {
            let hex = color_to_hex(color);
            assert_eq!(hex.len(), 7, "{name}");
            assert!(hex.starts_with('#'));
        }
        assert_eq!(colors.iter().next().map(|(n, _)| n), Some("primary"));
    }

    #[test]
    fn dark_surface_is_darker_than_light_surface() {
        let seed = Srgb::new(200, 120, 40);
        let dark = scheme_from_seed(seed, &SchemeOptions::default());
        let light = scheme_from_seed(
            seed,
            &SchemeOptions {
                mode: Mode::Light,
                ..SchemeOptions::default()
            },
        );
        let surface = |c: &Colors| luminance(c.get("surface").unwrap());
        assert!(surface(&dark) < 10.0);
        assert!(surface(&light) > 90.0);
    }

    #[test]
    fn monochrome_is_achromatic() {
        let colors = scheme_from_seed(
            Srgb::new(30, 200, 90),
            &SchemeOptions {
                variant: SchemeVariant::Monochrome,
                ..SchemeOptions::default()
            },
        );
        for name in ["primary", "secondary", "tertiary", "surface", "outline", "on_surface"] {
            let c = colors.get(name).unwrap();
            assert!(c.red == c.green && c.green == c.blue, "{name}: {c:?}");
        }
        // Error keeps its hue in every variant.
        let error = colors.get("error").unwrap();
        assert!(error.red > error.blue);
    }

    #[test]
    fn contrast_pushes_foregrounds_outward() {
        let seed = Srgb::new(90, 60, 200);
        let base = scheme_from_seed(seed, &SchemeOptions::default());
        let high = scheme_from_seed(
            seed,
            &SchemeOptions {
                contrast: 1.0,
                ..SchemeOptions::default()
            },
        );
        let l = |c: &Colors, n: &str| luminance(c.get(n).unwrap());

        // on_surface is light in dark mode, so it gets lighter.
        assert!(l(&high, "on_surface") > l(&base, "on_surface"));
        // Backgrounds are untouched.
        assert_eq!(high.get("surface"), base.get("surface"));
    }

    #[test]
    fn variant_names_round_trip() {
        for v in SchemeVariant::ALL {
            assert_eq!(v.name().parse::<SchemeVariant>(), Ok(v));
        }
        assert_eq!(
            "pastel".parse::<SchemeVariant>(),
            Err(PaletteError::UnknownScheme("pastel".into()))
        );
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("Light".parse::<Mode>(), Ok(Mode::Light));
        assert!("dim".parse::<Mode>().is_err());
        assert_eq!(Mode::Dark.to_string(), "dark");
    }

    #[test]
    fn generate_scheme_reports_missing_file() {
        let err = generate_scheme("/no/such/wallpaper.png", &SchemeOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to open image"));
    }
}
