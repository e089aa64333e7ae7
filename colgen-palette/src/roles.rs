use palette::Srgb;

use crate::{color_to_hex, color_to_hex_stripped};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKind {
    Primary,
    Secondary,
    Tertiary,
    Neutral,
    NeutralVariant,
    Error,
}

/// A named color read from one palette at a fixed tone per mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Role {
    pub name: &'static str,
    pub palette: PaletteKind,
    pub dark_tone: f32,
    pub light_tone: f32,
    /// Drawn on top of another role; moved by the contrast setting.
    pub foreground: bool,
}

const fn bg(name: &'static str, palette: PaletteKind, dark_tone: f32, light_tone: f32) -> Role {
    Role {
        name,
        palette,
        dark_tone,
        light_tone,
        foreground: false,
    }
}

const fn fg(name: &'static str, palette: PaletteKind, dark_tone: f32, light_tone: f32) -> Role {
    Role {
        name,
        palette,
        dark_tone,
        light_tone,
        foreground: true,
    }
}

use PaletteKind::{Error as E, Neutral as N, NeutralVariant as NV, Primary as P, Secondary as S, Tertiary as T};

/// Every role, in the order templates iterate them.
pub const ROLES: [Role; 48] = [
    bg("primary", P, 80.0, 40.0),
    fg("on_primary", P, 20.0, 100.0),
    bg("primary_container", P, 30.0, 90.0),
    fg("on_primary_container", P, 90.0, 10.0),
    bg("primary_fixed", P, 90.0, 90.0),
    bg("primary_fixed_dim", P, 80.0, 80.0),
    fg("on_primary_fixed", P, 10.0, 10.0),
    fg("on_primary_fixed_variant", P, 30.0, 30.0),
    bg("secondary", S, 80.0, 40.0),
    fg("on_secondary", S, 20.0, 100.0),
    bg("secondary_container", S, 30.0, 90.0),
    fg("on_secondary_container", S, 90.0, 10.0),
    bg("secondary_fixed", S, 90.0, 90.0),
    bg("secondary_fixed_dim", S, 80.0, 80.0),
    fg("on_secondary_fixed", S, 10.0, 10.0),
    fg("on_secondary_fixed_variant", S, 30.0, 30.0),
    bg("tertiary", T, 80.0, 40.0),
    fg("on_tertiary", T, 20.0, 100.0),
    bg("tertiary_container", T, 30.0, 90.0),
    fg("on_tertiary_container", T, 90.0, 10.0),
    bg("tertiary_fixed", T, 90.0, 90.0),
    bg("tertiary_fixed_dim", T, 80.0, 80.0),
    fg("on_tertiary_fixed", T, 10.0, 10.0),
    fg("on_tertiary_fixed_variant", T, 30.0, 30.0),
    bg("error", E, 80.0, 40.0),
    fg("on_error", E, 20.0, 100.0),
    bg("error_container", E, 30.0, 90.0),
    fg("on_error_container", E, 90.0, 10.0),
    bg("surface", N, 6.0, 98.0),
    fg("on_surface", N, 90.0, 10.0),
    fg("on_surface_variant", NV, 80.0, 30.0),
    bg("surface_dim", N, 6.0, 87.0),
    bg("surface_bright", N, 24.0, 98.0),
    bg("surface_container_lowest", N, 4.0, 100.0),
    bg("surface_container_low", N, 10.0, 96.0),
    bg("surface_container", N, 12.0, 94.0),
    bg("surface_container_high", N, 17.0, 92.0),
    bg("surface_container_highest", N, 22.0, 90.0),
    bg("surface_variant", NV, 30.0, 90.0),
    fg("outline", NV, 60.0, 50.0),
    fg("outline_variant", NV, 30.0, 80.0),
    bg("shadow", N, 0.0, 0.0),
    bg("scrim", N, 0.0, 0.0),
    bg("inverse_surface", N, 90.0, 20.0),
    fg("inverse_on_surface", N, 20.0, 95.0),
    fg("inverse_primary", P, 40.0, 80.0),
    bg("background", N, 6.0, 98.0),
    fg("on_background", N, 90.0, 10.0),
];

/// A generated scheme: role names paired with colors, in [`ROLES`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct Colors {
    entries: Vec<(&'static str, Srgb<u8>)>,
}

impl Colors {
    pub fn new(entries: Vec<(&'static str, Srgb<u8>)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<Srgb<u8>> {
        self.entries.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
    }

    pub fn hex(&self, name: &str) -> Option<String> {
        self.get(name).map(color_to_hex)
    }

    pub fn hex_stripped(&self, name: &str) -> Option<String> {
        self.get(name).map(color_to_hex_stripped)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Srgb<u8>)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn role_names_are_unique() {
        let names: HashSet<&str> = ROLES.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), ROLES.len());
    }

    #[test]
    fn on_roles_are_foreground() {
        for role in ROLES.iter().filter(|r| r.name.starts_with("on_")) {
            assert!(role.foreground, "{}", role.name);
        }
    }

    #[test]
    fn lookup_by_name() {
        let colors = Colors::new(vec![("primary", Srgb::new(1, 2, 3)), ("scrim", Srgb::new(0, 0, 0))]);
        assert_eq!(colors.hex("primary").as_deref(), Some("#010203"));
        assert_eq!(colors.hex_stripped("scrim").as_deref(), Some("000000"));
        assert_eq!(colors.get("nope"), None);
        assert_eq!(colors.len(), 2);
    }
}
