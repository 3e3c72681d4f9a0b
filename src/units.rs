//! Physical units attached to axes.
//!
//! A [`Unit`] is a display name plus the multiplier that converts a value in
//! that unit into base units, e.g. `kHz` has multiplier `1e3`. Tick labels on
//! linear axes are printed in the axis unit.

/// Immutable (name, multiplier) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Unit {
    /// Display name.
    pub name: &'static str,
    /// Value of one unit expressed in base units.
    pub multiplier: f64,
}

impl Unit {
    /// Create a unit.
    pub const fn new(name: &'static str, multiplier: f64) -> Self {
        Self { name, multiplier }
    }

    /// Convert a value in base units into this unit.
    pub fn from_base(&self, value: f64) -> f64 {
        value / self.multiplier
    }

    /// Find a unit by name in a registry.
    pub fn lookup(registry: &[Unit], name: &str) -> Option<Unit> {
        registry.iter().copied().find(|unit| unit.name == name)
    }
}

/// Frequency units.
pub static FREQUENCY_UNITS: [Unit; 4] = [
    Unit::new("Hz", 1.0),
    Unit::new("kHz", 1e3),
    Unit::new("MHz", 1e6),
    Unit::new("GHz", 1e9),
];

/// Time units.
pub static TIME_UNITS: [Unit; 4] = [
    Unit::new("s", 1.0),
    Unit::new("ms", 1e-3),
    Unit::new("µs", 1e-6),
    Unit::new("ns", 1e-9),
];

/// Phase units.
pub static PHASE_UNITS: [Unit; 2] = [
    Unit::new("rad", 1.0),
    Unit::new("°", std::f64::consts::PI / 180.0),
];

/// Level units.
pub static LEVEL_UNITS: [Unit; 1] = [Unit::new("dB", 1.0)];

// Units are persisted by name and resolved against the static registries.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Unit {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            name: String,
        }
        let raw = Raw::deserialize(deserializer)?;
        FREQUENCY_UNITS
            .iter()
            .chain(TIME_UNITS.iter())
            .chain(PHASE_UNITS.iter())
            .chain(LEVEL_UNITS.iter())
            .copied()
            .find(|unit| unit.name == raw.name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown unit `{}`", raw.name)))
    }
}
