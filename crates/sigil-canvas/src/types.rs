//! Core types for the composition canvas
//!
//! These types describe the fragments ("sigils") placed on the canvas and
//! their coordinates. They are serializable so a rendering layer can
//! receive them as JSON.

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Unique identifier for a fragment
pub type FragmentId = String;

/// Content given to fragments created without explicit text
pub const DEFAULT_CONTENT: &str = "New instruction...";

/// Where fragments created without explicit coordinates are placed
pub const DEFAULT_POSITION: Position = Position { x: 20.0, y: 20.0 };

/// A point (or an offset) on the canvas
///
/// Coordinates are unconstrained; nothing clamps them to the visible area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// The origin, also the empty offset
    pub const ZERO: Position = Position { x: 0.0, y: 0.0 };

    /// Create a position
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when both components are exactly zero
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Position {
    fn add_assign(&mut self, rhs: Position) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A text fragment placed on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    /// Unique identifier, fixed for the fragment's lifetime
    pub id: FragmentId,
    /// Text contributed to the prompt (may be empty)
    pub content: String,
    /// Position on the canvas
    pub position: Position,
}

impl Fragment {
    /// Create a fragment
    pub fn new(id: impl Into<FragmentId>, content: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            position,
        }
    }
}

/// Content and coordinates for a fragment created at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedFragment {
    pub content: String,
    pub position: Position,
}

impl SeedFragment {
    pub fn new(content: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            content: content.into(),
            position: Position::new(x, y),
        }
    }
}

/// The layout a fresh canvas starts with
pub fn default_seed() -> Vec<SeedFragment> {
    vec![
        SeedFragment::new("A lone knight", 50.0, 50.0),
        SeedFragment::new("in a dark forest", 250.0, 150.0),
        SeedFragment::new("under a crimson moon", 100.0, 300.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_arithmetic() {
        let mut pos = Position::new(10.0, 20.0);
        pos += Position::new(-2.5, 4.0);
        assert_eq!(pos, Position::new(7.5, 24.0));
        assert_eq!(pos + Position::ZERO, pos);
        assert!(Position::ZERO.is_zero());
        assert!(!Position::new(0.0, -1.0).is_zero());
    }

    #[test]
    fn test_negative_zero_counts_as_zero() {
        assert!(Position::new(-0.0, 0.0).is_zero());
    }

    #[test]
    fn test_fragment_serializes_for_rendering() {
        let fragment = Fragment::new("sigil-1", "A lone knight", Position::new(50.0, 50.0));
        let json = serde_json::to_value(&fragment).unwrap();
        assert_eq!(json["id"], "sigil-1");
        assert_eq!(json["content"], "A lone knight");
        assert_eq!(json["position"]["y"], 50.0);
    }

    #[test]
    fn test_default_seed_layout() {
        let seed = default_seed();
        assert_eq!(seed.len(), 3);
        assert_eq!(seed[1].content, "in a dark forest");
        assert_eq!(seed[2].position, Position::new(100.0, 300.0));
    }
}
