//! Hand trajectory accumulated over one analysis session.
//!
//! A trajectory is append-only: positions are recorded in the temporal order
//! of the frames they were detected in. Frames without a detection leave no
//! entry, so index distance is only a proxy for time.

use serde::{Deserialize, Serialize};

use crate::position::Position;

/// Ordered hand positions, one per frame in which a hand was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    positions: Vec<Position>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
        }
    }

    /// Append a detected position.
    pub fn push(&mut self, position: Position) {
        self.positions.push(position);
    }

    /// Record the outcome of locating the hand in one frame.
    ///
    /// Absent detections are dropped rather than stored as placeholders.
    /// Returns whether a position was appended.
    pub fn record(&mut self, detection: Option<Position>) -> bool {
        match detection {
            Some(position) => {
                self.positions.push(position);
                true
            }
            None => false,
        }
    }

    /// Append every position of `other`, preserving its order.
    pub fn append(&mut self, other: Trajectory) {
        self.positions.extend(other.positions);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.positions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.positions.iter()
    }

    /// Frame-to-frame displacement magnitudes.
    ///
    /// Length is `len() - 1`, or zero for fewer than two positions.
    pub fn displacements(&self) -> Vec<f64> {
        self.positions
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .collect()
    }

    /// Total path length travelled, in pixels.
    pub fn path_length(&self) -> f64 {
        self.displacements().iter().sum()
    }
}

impl From<Vec<Position>> for Trajectory {
    fn from(positions: Vec<Position>) -> Self {
        Self { positions }
    }
}

impl FromIterator<Position> for Trajectory {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// Builds a trajectory from per-frame detections, skipping misses.
impl FromIterator<Option<Position>> for Trajectory {
    fn from_iter<I: IntoIterator<Item = Option<Position>>>(iter: I) -> Self {
        let mut trajectory = Trajectory::new();
        for detection in iter {
            trajectory.record(detection);
        }
        trajectory
    }
}

impl Extend<Position> for Trajectory {
    fn extend<I: IntoIterator<Item = Position>>(&mut self, iter: I) {
        self.positions.extend(iter);
    }
}

impl IntoIterator for Trajectory {
    type Item = Position;
    type IntoIter = std::vec::IntoIter<Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.into_iter()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter()
    }
}

/// Parse a trajectory from a JSON array of `{"x": .., "y": ..}` objects.
pub fn parse_trajectory(json: &str) -> Result<Trajectory, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_skips_misses() {
        let mut trajectory = Trajectory::new();
        assert!(trajectory.record(Some(Position::new(1.0, 1.0))));
        assert!(!trajectory.record(None));
        assert!(trajectory.record(Some(Position::new(2.0, 1.0))));
        assert_eq!(trajectory.len(), 2);
        assert_eq!(trajectory.as_slice()[1], Position::new(2.0, 1.0));
    }

    #[test]
    fn test_collect_from_detections() {
        let detections = vec![
            None,
            Some(Position::new(0.0, 0.0)),
            None,
            None,
            Some(Position::new(3.0, 4.0)),
        ];
        let trajectory: Trajectory = detections.into_iter().collect();
        assert_eq!(
            trajectory.as_slice(),
            &[Position::new(0.0, 0.0), Position::new(3.0, 4.0)]
        );
    }

    #[test]
    fn test_displacements_length() {
        assert!(Trajectory::new().displacements().is_empty());

        let single: Trajectory = vec![Position::new(5.0, 5.0)].into();
        assert!(single.displacements().is_empty());

        let trajectory: Trajectory = vec![
            Position::new(0.0, 0.0),
            Position::new(3.0, 4.0),
            Position::new(3.0, 4.0),
        ]
        .into();
        assert_eq!(trajectory.displacements(), vec![5.0, 0.0]);
        assert!((trajectory.path_length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut a: Trajectory = vec![Position::new(0.0, 0.0)].into();
        let b: Trajectory = vec![Position::new(1.0, 0.0), Position::new(2.0, 0.0)].into();
        a.append(b);
        let xs: Vec<f64> = a.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let trajectory: Trajectory = vec![Position::new(1.0, 2.0)].into();
        let json = serde_json::to_string(&trajectory).unwrap();
        assert_eq!(json, r#"[{"x":1.0,"y":2.0}]"#);

        let parsed = parse_trajectory(&json).unwrap();
        assert_eq!(parsed, trajectory);
    }

    proptest::proptest! {
        #[test]
        fn displacements_are_one_shorter_and_non_negative(
            points in proptest::collection::vec((-1e4f64..1e4, -1e4f64..1e4), 0..64)
        ) {
            let trajectory: Trajectory = points.into_iter().map(Position::from).collect();
            let displacements = trajectory.displacements();
            proptest::prop_assert_eq!(displacements.len(), trajectory.len().saturating_sub(1));
            proptest::prop_assert!(displacements.iter().all(|d| *d >= 0.0));
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_trajectory(r#"{"x": 1.0}"#).is_err());
        assert!(parse_trajectory(r#"[{"x": 1.0}]"#).is_err());
    }
}
