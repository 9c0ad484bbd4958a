//! Stepwise clustering simulations for interactive 2D visualization.
//!
//! `clusterlab` is the algorithmic core of a canvas-based clustering
//! visualizer: k-means and DBSCAN kernels that advance one discrete unit
//! of work at a time, a [`sim::Simulator`] that drives them manually or
//! on a wall-clock tick, and a [`render`] projection that turns each
//! snapshot into drawable primitives. It performs no drawing, no I/O,
//! and installs no timers — the host supplies the clock and the canvas.
//!
//! ```rust
//! use clusterlab::{Bounds, Dbscan, SimState, Simulator};
//! use std::time::Duration;
//!
//! let mut sim = Simulator::new(Dbscan::new(Bounds::new(800.0, 500.0)).with_seed(42));
//!
//! // Single-step one point visitation by hand...
//! sim.step().unwrap();
//! assert_eq!(sim.state(), SimState::Paused);
//!
//! // ...or run continuously, ticking from the host's timer source.
//! sim.set_speed(10).unwrap();
//! sim.start().unwrap();
//! let mut now = Duration::ZERO;
//! while sim.tick(now) {
//!     now += Duration::from_millis(100);
//! }
//! assert_eq!(sim.state(), SimState::Completed);
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod geom;
pub mod render;
pub mod sim;

pub use cluster::{
    Dbscan, DbscanFrame, DbscanPoint, Kmeans, KmeansFrame, KmeansOutcome, KmeansPoint, PointClass,
};
pub use error::{Error, Result};
pub use geom::{Bounds, Vec2};
pub use sim::{SimState, Simulator, Snapshot, StepOutcome, Stepwise};
