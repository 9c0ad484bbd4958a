//! K-means: Lloyd's algorithm as a stepwise simulation.
//!
//! # The Algorithm
//!
//! K-means partitions n points into k clusters by alternating two passes:
//!
//! 1. **Assign**: give every point the index of its nearest centroid.
//! 2. **Update**: move every centroid to the arithmetic mean of the
//!    points assigned to it.
//!
//! One assign/update pair is one *iteration*, and one iteration is the
//! unit of work this kernel performs per [`Stepwise::advance`] call. The
//! run terminates when an assignment pass changes nothing (the centroids
//! are stable) or when the configured iteration cap is reached, whichever
//! comes first; [`Kmeans::outcome`] records which.
//!
//! ## Initialization
//!
//! Centroids are seeded uniformly at random within the canvas bounds,
//! not sampled from the data (Forgy) and not spread by k-means++. That
//! matches the visualization this kernel animates: centroids visibly
//! wander in from arbitrary positions. Use [`Kmeans::place_centroids`]
//! when a walkthrough needs a deterministic starting layout.
//!
//! ## Limitations
//!
//! - A cluster that loses all its points keeps its previous centroid;
//!   there is no re-seeding of empty clusters.
//! - Ties in the assignment pass go to the lowest centroid index.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{ensure_in_range, Error, Result};
use crate::geom::{Bounds, Vec2};
use crate::sim::{StepOutcome, Stepwise};

/// Accepted range for the cluster count K.
pub const K_RANGE: RangeInclusive<usize> = 1..=10;

/// Accepted range for the iteration cap.
pub const MAX_ITERATIONS_RANGE: RangeInclusive<usize> = 1..=100;

/// Points generated by [`Stepwise::regenerate`].
const GENERATED_POINTS: usize = 100;

/// How a finished k-means run terminated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KmeansOutcome {
    /// An assignment pass changed no memberships.
    Converged,
    /// The iteration cap fired before the assignments stabilized.
    MaxIterations,
}

/// A data point as seen by the render collaborator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KmeansPoint {
    /// Canvas position.
    pub pos: Vec2,
    /// Assigned cluster index, or `None` before the first assignment.
    pub cluster: Option<usize>,
}

/// Drawable snapshot of a k-means simulation.
#[derive(Clone, Debug)]
pub struct KmeansFrame {
    /// All points with their current assignments.
    pub points: Vec<KmeansPoint>,
    /// Current centroid positions, one per cluster.
    pub centroids: Vec<Vec2>,
    /// Set once the run has terminated.
    pub outcome: Option<KmeansOutcome>,
}

/// Stepwise k-means kernel.
#[derive(Clone, Debug)]
pub struct Kmeans {
    k: usize,
    max_iterations: usize,
    bounds: Bounds,
    positions: Vec<Vec2>,
    assignments: Vec<Option<usize>>,
    centroids: Vec<Vec2>,
    iteration: usize,
    outcome: Option<KmeansOutcome>,
    rng: StdRng,
}

impl Kmeans {
    /// Create a kernel with a fresh random data set in `bounds`.
    ///
    /// Defaults: k = 3, iteration cap = 20, unseeded RNG.
    pub fn new(bounds: Bounds) -> Self {
        let mut kernel = Self {
            k: 3,
            max_iterations: 20,
            bounds,
            positions: Vec::new(),
            assignments: Vec::new(),
            centroids: Vec::new(),
            iteration: 0,
            outcome: None,
            rng: StdRng::from_os_rng(),
        };
        kernel.regenerate();
        kernel
    }

    /// Seed the RNG for reproducibility and redraw the data set.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.regenerate();
        self
    }

    /// The configured cluster count.
    pub fn k(&self) -> usize {
        self.k
    }

    /// The configured iteration cap.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Iterations performed since the last rewind.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// How the run terminated, once it has.
    pub fn outcome(&self) -> Option<KmeansOutcome> {
        self.outcome
    }

    /// Point positions.
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// Per-point cluster assignments.
    pub fn assignments(&self) -> &[Option<usize>] {
        &self.assignments
    }

    /// Current centroid positions.
    pub fn centroids(&self) -> &[Vec2] {
        &self.centroids
    }

    /// Set the cluster count.
    ///
    /// Re-seeds the centroids and clears all assignments, so a shrunk K
    /// can never leave a point labeled with a cluster that no longer
    /// exists.
    pub fn set_k(&mut self, k: usize) -> Result<()> {
        ensure_in_range("k", k as f64, *K_RANGE.start() as f64, *K_RANGE.end() as f64)?;
        self.k = k;
        self.seed_centroids();
        self.clear_assignments();
        Ok(())
    }

    /// Set the iteration cap.
    pub fn set_max_iterations(&mut self, max_iterations: usize) -> Result<()> {
        ensure_in_range(
            "max_iterations",
            max_iterations as f64,
            *MAX_ITERATIONS_RANGE.start() as f64,
            *MAX_ITERATIONS_RANGE.end() as f64,
        )?;
        self.max_iterations = max_iterations;
        Ok(())
    }

    /// Append a manually placed point, unassigned.
    pub fn add_point(&mut self, pos: Vec2) {
        self.positions.push(pos);
        self.assignments.push(None);
    }

    /// Replace the data set wholesale and discard run progress.
    pub fn load_points(&mut self, points: &[Vec2]) {
        self.positions = points.to_vec();
        self.clear_assignments();
        self.iteration = 0;
        self.outcome = None;
    }

    /// Pin the centroids to explicit positions, adopting their count as K.
    ///
    /// Clears all assignments. Intended for deterministic walkthroughs.
    pub fn place_centroids(&mut self, centroids: &[Vec2]) -> Result<()> {
        ensure_in_range(
            "k",
            centroids.len() as f64,
            *K_RANGE.start() as f64,
            *K_RANGE.end() as f64,
        )?;
        self.k = centroids.len();
        self.centroids = centroids.to_vec();
        self.clear_assignments();
        Ok(())
    }

    fn seed_centroids(&mut self) {
        self.centroids = (0..self.k)
            .map(|_| self.bounds.random_point(&mut self.rng))
            .collect();
    }

    fn clear_assignments(&mut self) {
        for a in &mut self.assignments {
            *a = None;
        }
    }

    /// Assignment pass. Returns whether any membership changed.
    fn assign(&mut self) -> bool {
        let mut changed = false;

        for (pos, assignment) in self.positions.iter().zip(self.assignments.iter_mut()) {
            let mut best = 0;
            let mut best_dist = f32::INFINITY;
            for (j, centroid) in self.centroids.iter().enumerate() {
                let dist = pos.distance(*centroid);
                // Strict less-than: ties stay with the lowest index.
                if dist < best_dist {
                    best_dist = dist;
                    best = j;
                }
            }

            if *assignment != Some(best) {
                *assignment = Some(best);
                changed = true;
            }
        }

        changed
    }

    /// Update pass: move each centroid to the mean of its members.
    /// Empty clusters keep their previous centroid.
    fn update_centroids(&mut self) {
        let mut sums = vec![Vec2::default(); self.k];
        let mut counts = vec![0usize; self.k];

        for (pos, assignment) in self.positions.iter().zip(self.assignments.iter()) {
            if let Some(c) = assignment {
                sums[*c].x += pos.x;
                sums[*c].y += pos.y;
                counts[*c] += 1;
            }
        }

        for (c, count) in counts.iter().enumerate() {
            if *count > 0 {
                self.centroids[c] = Vec2::new(
                    sums[c].x / *count as f32,
                    sums[c].y / *count as f32,
                );
            }
        }
    }
}

impl Stepwise for Kmeans {
    type Frame = KmeansFrame;

    fn validate(&self) -> Result<()> {
        if self.positions.is_empty() {
            return Err(Error::EmptyInput);
        }
        if self.k > self.positions.len() {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_points: self.positions.len(),
            });
        }
        Ok(())
    }

    fn advance(&mut self) -> StepOutcome {
        let changed = self.assign();
        self.update_centroids();
        self.iteration += 1;

        if !changed {
            self.outcome = Some(KmeansOutcome::Converged);
            tracing::debug!(iteration = self.iteration, "assignments stable; converged");
            StepOutcome::Done
        } else if self.iteration >= self.max_iterations {
            self.outcome = Some(KmeansOutcome::MaxIterations);
            tracing::debug!(iteration = self.iteration, "iteration cap reached");
            StepOutcome::Done
        } else {
            StepOutcome::Advanced
        }
    }

    fn rewind(&mut self) {
        self.clear_assignments();
        self.seed_centroids();
        self.iteration = 0;
        self.outcome = None;
    }

    fn regenerate(&mut self) {
        self.positions = (0..GENERATED_POINTS)
            .map(|_| self.bounds.random_point(&mut self.rng))
            .collect();
        self.assignments = vec![None; self.positions.len()];
        self.rewind();
    }

    fn units_done(&self) -> usize {
        self.iteration
    }

    fn clusters_found(&self) -> usize {
        self.k
    }

    fn frame(&self) -> KmeansFrame {
        KmeansFrame {
            points: self
                .positions
                .iter()
                .zip(self.assignments.iter())
                .map(|(pos, cluster)| KmeansPoint {
                    pos: *pos,
                    cluster: *cluster,
                })
                .collect(),
            centroids: self.centroids.clone(),
            outcome: self.outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_pairs() -> Kmeans {
        let mut kernel = Kmeans::new(Bounds::default()).with_seed(42);
        kernel.load_points(&[
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 11.0),
        ]);
        kernel
            .place_centroids(&[Vec2::new(0.0, 0.5), Vec2::new(10.0, 10.5)])
            .unwrap();
        kernel
    }

    #[test]
    fn converges_on_two_tight_pairs() {
        let mut kernel = two_pairs();

        // First iteration assigns everything (a change), second confirms
        // stability.
        assert_eq!(kernel.advance(), StepOutcome::Advanced);
        assert_eq!(kernel.advance(), StepOutcome::Done);
        assert_eq!(kernel.outcome(), Some(KmeansOutcome::Converged));

        assert_eq!(
            kernel.assignments(),
            &[Some(0), Some(0), Some(1), Some(1)]
        );
        let c = kernel.centroids();
        assert!((c[0].x - 0.0).abs() < 1e-6 && (c[0].y - 0.5).abs() < 1e-6);
        assert!((c[1].x - 10.0).abs() < 1e-6 && (c[1].y - 10.5).abs() < 1e-6);
    }

    #[test]
    fn assign_is_idempotent_once_stable() {
        let mut kernel = two_pairs();
        while kernel.advance() == StepOutcome::Advanced {}
        assert_eq!(kernel.outcome(), Some(KmeansOutcome::Converged));

        // A further assignment pass over stable centroids changes nothing.
        assert!(!kernel.assign());
    }

    #[test]
    fn centroids_are_exact_means() {
        let mut kernel = Kmeans::new(Bounds::default()).with_seed(1);
        kernel.load_points(&[
            Vec2::new(2.0, 0.0),
            Vec2::new(4.0, 6.0),
            Vec2::new(6.0, 3.0),
        ]);
        kernel.place_centroids(&[Vec2::new(4.0, 3.0)]).unwrap();

        kernel.advance();
        let c = kernel.centroids()[0];
        assert!((c.x - 4.0).abs() < 1e-6);
        assert!((c.y - 3.0).abs() < 1e-6);
    }

    #[test]
    fn empty_cluster_keeps_its_centroid() {
        let mut kernel = Kmeans::new(Bounds::default()).with_seed(1);
        kernel.load_points(&[Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)]);
        kernel
            .place_centroids(&[Vec2::new(0.5, 0.5), Vec2::new(500.0, 500.0)])
            .unwrap();

        kernel.advance();
        // Both points went to centroid 0; centroid 1 must not move.
        assert_eq!(kernel.assignments(), &[Some(0), Some(0)]);
        assert_eq!(kernel.centroids()[1], Vec2::new(500.0, 500.0));
    }

    #[test]
    fn ties_go_to_the_lowest_centroid_index() {
        let mut kernel = Kmeans::new(Bounds::default()).with_seed(1);
        kernel.load_points(&[Vec2::new(5.0, 0.0)]);
        kernel
            .place_centroids(&[Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)])
            .unwrap();

        kernel.advance();
        assert_eq!(kernel.assignments(), &[Some(0)]);
    }

    #[test]
    fn iteration_cap_fires_exactly() {
        let mut kernel = Kmeans::new(Bounds::default()).with_seed(42);
        kernel.set_max_iterations(1).unwrap();

        // The very first assignment always changes memberships (all
        // points start unassigned), so the cap is what terminates.
        assert_eq!(kernel.advance(), StepOutcome::Done);
        assert_eq!(kernel.iteration(), 1);
        assert_eq!(kernel.outcome(), Some(KmeansOutcome::MaxIterations));
    }

    #[test]
    fn same_seed_same_data() {
        let a = Kmeans::new(Bounds::default()).with_seed(7);
        let b = Kmeans::new(Bounds::default()).with_seed(7);
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.centroids(), b.centroids());
        assert_eq!(a.positions().len(), 100);
    }

    #[test]
    fn validate_rejects_bad_setups() {
        let mut kernel = Kmeans::new(Bounds::default()).with_seed(1);
        kernel.load_points(&[]);
        assert!(matches!(kernel.validate().unwrap_err(), Error::EmptyInput));

        kernel.load_points(&[Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)]);
        kernel.set_k(5).unwrap();
        assert!(matches!(
            kernel.validate().unwrap_err(),
            Error::InvalidClusterCount {
                requested: 5,
                n_points: 2
            }
        ));
    }

    #[test]
    fn configuration_is_range_checked() {
        let mut kernel = Kmeans::new(Bounds::default()).with_seed(1);
        assert!(kernel.set_k(0).is_err());
        assert!(kernel.set_k(11).is_err());
        assert!(kernel.set_max_iterations(0).is_err());
        assert!(kernel.set_max_iterations(101).is_err());
        assert!(kernel.set_k(10).is_ok());
        assert!(kernel.set_max_iterations(100).is_ok());
    }

    #[test]
    fn changing_k_clears_assignments() {
        let mut kernel = two_pairs();
        kernel.advance();
        assert!(kernel.assignments().iter().all(Option::is_some));

        kernel.set_k(3).unwrap();
        assert!(kernel.assignments().iter().all(Option::is_none));
        assert_eq!(kernel.centroids().len(), 3);
    }

    #[test]
    fn manual_points_join_unassigned() {
        let mut kernel = Kmeans::new(Bounds::default()).with_seed(1);
        let n = kernel.positions().len();
        kernel.add_point(Vec2::new(12.0, 34.0));
        assert_eq!(kernel.positions().len(), n + 1);
        assert_eq!(kernel.assignments()[n], None);
    }

    #[test]
    fn rewind_keeps_points_and_reseeds_centroids() {
        let mut kernel = Kmeans::new(Bounds::default()).with_seed(42);
        let points = kernel.positions().to_vec();
        while kernel.advance() == StepOutcome::Advanced {}

        kernel.rewind();
        assert_eq!(kernel.positions(), &points[..]);
        assert_eq!(kernel.iteration(), 0);
        assert_eq!(kernel.outcome(), None);
        assert!(kernel.assignments().iter().all(Option::is_none));
    }
}
