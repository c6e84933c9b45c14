//! Hand position type.

use serde::{Deserialize, Serialize};

/// An estimated hand centroid for one frame, in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Whether both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert_eq!(a.distance_to(&b), b.distance_to(&a));
    }

    #[test]
    fn test_finite() {
        assert!(Position::new(1.0, 2.0).is_finite());
        assert!(!Position::new(f64::NAN, 2.0).is_finite());
        assert!(!Position::new(1.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_string(&Position::new(1.5, 2.0)).unwrap();
        assert_eq!(json, r#"{"x":1.5,"y":2.0}"#);
    }
}
