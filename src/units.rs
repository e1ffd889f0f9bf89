//! Static raw-unit → SI conversion registry (§4.1).
//!
//! Deliberately a fixed table, not a trait object: nothing in this crate
//! needs a pluggable registry, and a `&[(&str, fn(f32) -> f32)]` slice reads
//! closer to the rest of the static tables in this crate than a `dyn Fn`
//! would.

use std::f32::consts::PI;

fn identity(v: f32) -> f32 {
    v
}

fn celsius_to_kelvin(v: f32) -> f32 {
    v + 273.15
}

fn degree_to_rad(v: f32) -> f32 {
    v * (PI / 180.0)
}

fn g_per_s_to_kg_per_s(v: f32) -> f32 {
    v / 1000.0
}

fn km_to_m(v: f32) -> f32 {
    v * 1000.0
}

fn kmh_to_ms(v: f32) -> f32 {
    v * 1000.0 / 3600.0
}

fn kpa_to_pa(v: f32) -> f32 {
    v * 1000.0
}

fn nm_to_m(v: f32) -> f32 {
    v * 1e-9
}

fn rpm_to_rad_per_s(v: f32) -> f32 {
    v * (PI / 30.0)
}

fn s_to_ns(v: f32) -> f32 {
    v * 1e9
}

/// `(raw unit name, conversion function to SI)`.
const UNITS: &[(&str, fn(f32) -> f32)] = &[
    ("celsius", celsius_to_kelvin),
    ("degree", degree_to_rad),
    ("g/s", g_per_s_to_kg_per_s),
    ("km", km_to_m),
    ("km/h", kmh_to_ms),
    ("kPa", kpa_to_pa),
    ("nm", nm_to_m),
    ("rpm", rpm_to_rad_per_s),
    ("s", s_to_ns),
    ("K", identity),
    ("m", identity),
    ("m/s", identity),
    ("Pa", identity),
    ("kg/s", identity),
    ("rad/s", identity),
    ("percent", identity),
];

/// Looks up the conversion function for a raw unit name. Returns `None` if
/// the unit is not registered.
#[must_use]
pub fn lookup(raw_unit: &str) -> Option<fn(f32) -> f32> {
    UNITS
        .iter()
        .find(|(name, _)| *name == raw_unit)
        .map(|(_, f)| *f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_units_resolve() {
        assert!(lookup("celsius").is_some());
        assert!(lookup("rpm").is_some());
        assert!(lookup("m/s").is_some());
    }

    #[test]
    fn unknown_unit_is_none() {
        assert!(lookup("furlong").is_none());
    }

    #[test]
    fn celsius_conversion() {
        let f = lookup("celsius").unwrap();
        assert!((f(0.0) - 273.15).abs() < 1e-4);
    }

    #[test]
    fn kmh_conversion() {
        let f = lookup("km/h").unwrap();
        assert!((f(60.0) - 16.666_666).abs() < 1e-4);
    }

    #[test]
    fn gs_conversion() {
        let f = lookup("g/s").unwrap();
        assert!((f(526.51) - 0.526_51).abs() < 1e-4);
    }
}
