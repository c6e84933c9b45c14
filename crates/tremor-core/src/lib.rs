//! Tremor Analyzer Core
//!
//! Turns recorded video frames into a tremor intensity score:
//! - **Hand Locator:** Segment each frame and take the centroid of the largest dark region
//! - **Tremor Scorer:** Velocities, edge-shrinking moving average, population std-dev
//!
//! This crate is pure computation — no I/O, no platform dependencies.
//! All inputs are data; all outputs are data.

pub mod frame;
pub mod locator;
pub mod scorer;

pub use frame::{ChannelOrder, Frame};
pub use locator::{HandLocator, LocatorConfig};
pub use scorer::{TremorMeasurement, TremorScorer};
