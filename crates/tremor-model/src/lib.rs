//! Tremor Analyzer Data Model
//!
//! Defines the data contracts shared by the analysis pipeline:
//! - **Position:** An estimated hand centroid in frame pixel space
//! - **Trajectory:** Ordered positions across one analysis session
//! - **Report:** The scored result plus the intermediate series
//!
//! Coordinates are frame pixels with `(0, 0)` at the top-left corner.

pub mod position;
pub mod report;
pub mod trajectory;

pub use position::*;
pub use report::*;
pub use trajectory::*;
