//! Material-style color schemes derived from a wallpaper.
//!
//! The pipeline is: pick a seed color from the image ([`extract_seed_color`]),
//! build tonal palettes around its hue ([`SchemeVariant`]), then read every
//! named role off those palettes at a fixed tone ([`scheme_from_seed`]).

mod error;
mod roles;
mod scheme;
mod seed;
mod tonal;

pub use error::PaletteError;
pub use roles::{Colors, PaletteKind, Role, ROLES};
pub use scheme::{generate_scheme, scheme_from_seed, CorePalettes, Mode, SchemeOptions, SchemeVariant};
pub use seed::{extract_seed_color, quantize, rank_seeds, FALLBACK_SEED};
pub use tonal::TonalPalette;

pub use palette::Srgb;

/// `#rrggbb`
pub fn color_to_hex(color: Srgb<u8>) -> String {
    format!("#{}", color_to_hex_stripped(color))
}

/// `rrggbb`
pub fn color_to_hex_stripped(color: Srgb<u8>) -> String {
    format!("{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting() {
        let c = Srgb::new(0x42u8, 0x85, 0xf4);
        assert_eq!(color_to_hex(c), "#4285f4");
        assert_eq!(color_to_hex_stripped(c), "4285f4");
        assert_eq!(color_to_hex(Srgb::new(0u8, 0, 0)), "#000000");
    }
}
