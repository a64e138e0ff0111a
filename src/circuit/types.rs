//! Core types for circuit representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ResistoError, Result};

/// A unique, stable identifier for a placed component (e.g. `R1`, `V1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One of the two ends of a two-terminal component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerminalSide {
    A,
    B,
}

impl TerminalSide {
    pub const BOTH: [TerminalSide; 2] = [TerminalSide::A, TerminalSide::B];

    /// Sign of the unrotated x offset from the component center.
    pub fn offset_sign(&self) -> f64 {
        match self {
            TerminalSide::A => -1.0,
            TerminalSide::B => 1.0,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            TerminalSide::A => TerminalSide::B,
            TerminalSide::B => TerminalSide::A,
        }
    }
}

impl fmt::Display for TerminalSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalSide::A => write!(f, "A"),
            TerminalSide::B => write!(f, "B"),
        }
    }
}

/// A terminal reference, written `<component>-<side>` (e.g. `R1-A`).
///
/// Terminals are never stored on their own; they are a function of the
/// owning component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TerminalId {
    pub component: ComponentId,
    pub side: TerminalSide,
}

impl TerminalId {
    pub fn new(component: ComponentId, side: TerminalSide) -> Self {
        Self { component, side }
    }

    /// The other terminal of the same component.
    pub fn opposite(&self) -> Self {
        Self::new(self.component.clone(), self.side.opposite())
    }
}

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.component, self.side)
    }
}

impl FromStr for TerminalId {
    type Err = ResistoError;

    fn from_str(text: &str) -> Result<Self> {
        let invalid = || ResistoError::InvalidTerminal {
            text: text.to_string(),
        };
        let (component, side) = text.rsplit_once('-').ok_or_else(invalid)?;
        if component.is_empty() {
            return Err(invalid());
        }
        let side = match side {
            "A" | "a" => TerminalSide::A,
            "B" | "b" => TerminalSide::B,
            _ => return Err(invalid()),
        };
        Ok(Self::new(ComponentId::new(component), side))
    }
}

impl TryFrom<String> for TerminalId {
    type Error = ResistoError;

    fn try_from(text: String) -> Result<Self> {
        text.parse()
    }
}

impl From<TerminalId> for String {
    fn from(terminal: TerminalId) -> Self {
        terminal.to_string()
    }
}

/// Identifier of an electrical net: a set of terminals joined by wires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A canvas position in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Snap both coordinates to the nearest multiple of `grid`.
    pub fn snapped(&self, grid: f64) -> Self {
        if grid <= 0.0 {
            return *self;
        }
        Self::new((self.x / grid).round() * grid, (self.y / grid).round() * grid)
    }
}

/// Component orientation. Only horizontal and vertical placement exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
}

impl Rotation {
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            _ => Err(ResistoError::InvalidRotation { degrees }),
        }
    }

    pub fn degrees(&self) -> i64 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
        }
    }

    /// Next orientation for a "rotate" action: `(r + 90) mod 180`.
    pub fn toggled(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg0,
        }
    }
}

impl TryFrom<i64> for Rotation {
    type Error = ResistoError;

    fn try_from(degrees: i64) -> Result<Self> {
        Self::from_degrees(degrees)
    }
}

impl From<Rotation> for i64 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// A user-drawn wire between two terminals.
///
/// Wires are undirected: `A→B` and `B→A` describe the same connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: TerminalId,
    pub to: TerminalId,
}

impl Connection {
    pub fn new(from: TerminalId, to: TerminalId) -> Self {
        Self { from, to }
    }

    /// True if both connections join the same unordered pair of terminals.
    pub fn same_pair(&self, other: &Connection) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// True if either end belongs to the given component.
    pub fn touches(&self, component: &ComponentId) -> bool {
        &self.from.component == component || &self.to.component == component
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_parse_and_display() {
        let t: TerminalId = "R12-B".parse().unwrap();
        assert_eq!(t.component, ComponentId::new("R12"));
        assert_eq!(t.side, TerminalSide::B);
        assert_eq!(t.to_string(), "R12-B");
        assert_eq!(t.opposite().to_string(), "R12-A");
    }

    #[test]
    fn test_terminal_parse_rejects_malformed() {
        assert!("R1".parse::<TerminalId>().is_err());
        assert!("R1-C".parse::<TerminalId>().is_err());
        assert!("-A".parse::<TerminalId>().is_err());
    }

    #[test]
    fn test_connection_is_unordered() {
        let a: TerminalId = "R1-A".parse().unwrap();
        let b: TerminalId = "R2-B".parse().unwrap();
        let forward = Connection::new(a.clone(), b.clone());
        let backward = Connection::new(b, a);
        assert!(forward.same_pair(&backward));
        assert!(!forward.is_self_loop());
    }

    #[test]
    fn test_rotation_toggle_and_snap() {
        assert_eq!(Rotation::Deg0.toggled(), Rotation::Deg90);
        assert_eq!(Rotation::Deg90.toggled(), Rotation::Deg0);
        assert!(Rotation::from_degrees(45).is_err());

        let p = Point::new(29.0, 51.0).snapped(20.0);
        assert_eq!(p, Point::new(20.0, 60.0));
    }
}
