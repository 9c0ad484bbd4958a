//! Clustering kernels, packaged as stepwise simulations.
//!
//! Both kernels own a 2D point set in canvas coordinates and implement
//! [`Stepwise`](crate::sim::Stepwise), so either can sit inside a
//! [`Simulator`](crate::sim::Simulator) and be single-stepped or animated.
//!
//! ## K-means
//!
//! The classic fixed-k algorithm: assign each point to the nearest
//! centroid, move each centroid to the mean of its points, repeat. The
//! unit of work is one full assign/update iteration.
//!
//! **Objective**: minimize the within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! Assumes roughly spherical clusters of similar size and a known k.
//!
//! ## DBSCAN
//!
//! Density-based clustering: discovers the number of clusters itself,
//! finds non-convex shapes, and labels sparse points as noise. The unit
//! of work is one visitation of the outer point scan, including any
//! cluster expansion it triggers.
//!
//! ## Usage
//!
//! ```rust
//! use clusterlab::cluster::Dbscan;
//! use clusterlab::geom::{Bounds, Vec2};
//! use clusterlab::sim::{StepOutcome, Stepwise};
//!
//! let mut kernel = Dbscan::new(Bounds::new(800.0, 500.0)).with_seed(42);
//! kernel.set_min_points(2).unwrap();
//! kernel.load_points(&[
//!     Vec2::new(100.0, 100.0),
//!     Vec2::new(110.0, 100.0),
//!     Vec2::new(120.0, 100.0),
//!     Vec2::new(500.0, 400.0),
//! ]);
//!
//! // Drive the kernel by hand: one outer-scan visitation per unit.
//! let mut units = 1;
//! while kernel.advance() == StepOutcome::Advanced {
//!     units += 1;
//! }
//! assert_eq!(units, 4);
//! assert_eq!(kernel.clusters_found(), 1); // the tight triple
//! ```

mod dbscan;
mod kmeans;

pub use dbscan::{
    Dbscan, DbscanFrame, DbscanPoint, PointClass, EPSILON_RANGE, MIN_POINTS_RANGE,
};
pub use kmeans::{
    Kmeans, KmeansFrame, KmeansOutcome, KmeansPoint, K_RANGE, MAX_ITERATIONS_RANGE,
};
