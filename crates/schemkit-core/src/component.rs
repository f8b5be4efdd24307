//! Component type tags and rotation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Schematic component kinds the editor can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    /// Resistor
    Resistor,
    /// Inductor
    Inductor,
    /// Capacitor
    Capacitor,
    /// N-channel MOSFET
    Nmos,
    /// P-channel MOSFET
    Pmos,
}

impl ComponentType {
    /// Every component type in palette order.
    pub const ALL: [ComponentType; 5] = [
        ComponentType::Resistor,
        ComponentType::Inductor,
        ComponentType::Capacitor,
        ComponentType::Nmos,
        ComponentType::Pmos,
    ];

    /// The lowercase tag used in files and asset names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resistor => "resistor",
            Self::Inductor => "inductor",
            Self::Capacitor => "capacitor",
            Self::Nmos => "nmos",
            Self::Pmos => "pmos",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "resistor" => Ok(Self::Resistor),
            "inductor" => Ok(Self::Inductor),
            "capacitor" => Ok(Self::Capacitor),
            "nmos" => Ok(Self::Nmos),
            "pmos" => Ok(Self::Pmos),
            _ => Err(format!("Unknown component type: {}", s)),
        }
    }
}

/// Quarter-turn rotation in degrees: always 0, 90, 180 or 270.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "u16")]
pub struct Rotation(u16);

impl Rotation {
    pub const ZERO: Rotation = Rotation(0);

    /// Builds a rotation from degrees, snapping to the nearest quarter turn
    /// and normalizing into `0..360`.
    pub fn from_degrees(degrees: i64) -> Self {
        let quarter = (degrees as f64 / 90.0).round() as i64;
        Rotation((quarter.rem_euclid(4) * 90) as u16)
    }

    pub fn degrees(&self) -> u16 {
        self.0
    }

    /// Advances by 90°, wrapping 270 → 0.
    pub fn step(&self) -> Self {
        Rotation((self.0 + 90) % 360)
    }

    /// True for 90° and 270°, where width and height trade places.
    pub fn is_quarter_turn(&self) -> bool {
        self.0 == 90 || self.0 == 270
    }
}

impl From<i64> for Rotation {
    fn from(degrees: i64) -> Self {
        Rotation::from_degrees(degrees)
    }
}

impl From<Rotation> for u16 {
    fn from(r: Rotation) -> u16 {
        r.0
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}
