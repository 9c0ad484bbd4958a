//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise,
//! as a stepwise simulation.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN groups points by neighborhood density. Unlike k-means, it
//! discovers clusters of arbitrary shape, determines the number of
//! clusters itself, and labels outliers as noise.
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: neighborhood radius.
//! - **MinPoints**: neighbors (the point itself not counted) required
//!   within ε for a point to be core.
//! - **Core point**: has at least MinPoints neighbors within ε.
//! - **Border point**: within ε of a core point but not core itself.
//! - **Noise point**: neither core nor border.
//!
//! ## Stepwise execution
//!
//! The unit of work is one visitation of the outer scan, which walks the
//! points in index order:
//!
//! 1. A point that already has a cluster, or was already marked noise,
//!    is skipped (the unit still counts).
//! 2. A point with fewer than MinPoints neighbors is marked noise. A
//!    later expansion may still reclaim it as a border point; that
//!    promotion is the only way a noise label is ever revised.
//! 3. Otherwise the point is core: it seeds the next cluster id and the
//!    whole cluster is expanded within the same unit, via a seed set
//!    scanned by cursor. The seed set only ever grows; the membership
//!    check on append is what keeps each point from being re-expanded.
//!
//! The run completes when the outer scan has visited every point. Every
//! point then carries a final classification, and `cluster` is `None`
//! only for permanent noise.
//!
//! ## Complexity
//!
//! O(n²) over the whole run with the brute-force region query; fine at
//! the few hundred points an interactive canvas holds.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering
//! Clusters in Large Spatial Databases with Noise." KDD-96.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ensure_in_range, Error, Result};
use crate::geom::{neighbors, Bounds, Vec2};
use crate::sim::{StepOutcome, Stepwise};

/// Accepted range for the neighborhood radius.
pub const EPSILON_RANGE: RangeInclusive<f32> = 10.0..=100.0;

/// Accepted range for the core-point neighbor threshold.
pub const MIN_POINTS_RANGE: RangeInclusive<usize> = 2..=20;

/// Points generated per dense patch by [`Stepwise::regenerate`].
const PATCH_POINTS: usize = 40;

/// Background points generated by [`Stepwise::regenerate`].
const NOISE_POINTS: usize = 20;

/// Density classification of a point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointClass {
    /// Not yet visited by the scan.
    Unclassified,
    /// Has at least MinPoints neighbors within ε.
    Core,
    /// Reached from a core point's neighborhood, not core itself.
    Border,
    /// Too few neighbors; not (yet) reached from any core point.
    Noise,
}

/// A data point as seen by the render collaborator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DbscanPoint {
    /// Canvas position.
    pub pos: Vec2,
    /// Assigned cluster id, `None` for unvisited points and noise.
    pub cluster: Option<usize>,
    /// Current density classification.
    pub class: PointClass,
}

/// Drawable snapshot of a DBSCAN simulation.
#[derive(Clone, Debug)]
pub struct DbscanFrame {
    /// All points with their current labels.
    pub points: Vec<DbscanPoint>,
    /// The configured neighborhood radius, for drawing the ε ring.
    pub epsilon: f32,
    /// Index of the point most recently processed by the scan.
    pub active: Option<usize>,
    /// Neighbor indices of the active point.
    pub active_neighbors: Vec<usize>,
}

/// Stepwise DBSCAN kernel.
#[derive(Clone, Debug)]
pub struct Dbscan {
    epsilon: f32,
    min_points: usize,
    bounds: Bounds,
    positions: Vec<Vec2>,
    clusters: Vec<Option<usize>>,
    classes: Vec<PointClass>,
    cursor: usize,
    next_cluster: usize,
    active: Option<usize>,
    active_neighbors: Vec<usize>,
    rng: StdRng,
}

impl Dbscan {
    /// Create a kernel with a fresh random data set in `bounds`.
    ///
    /// Defaults: ε = 30, MinPoints = 5, unseeded RNG.
    pub fn new(bounds: Bounds) -> Self {
        let mut kernel = Self {
            epsilon: 30.0,
            min_points: 5,
            bounds,
            positions: Vec::new(),
            clusters: Vec::new(),
            classes: Vec::new(),
            cursor: 0,
            next_cluster: 0,
            active: None,
            active_neighbors: Vec::new(),
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

    /// The configured neighborhood radius.
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// The configured core-point neighbor threshold.
    pub fn min_points(&self) -> usize {
        self.min_points
    }

    /// Point positions.
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// Per-point cluster ids.
    pub fn clusters(&self) -> &[Option<usize>] {
        &self.clusters
    }

    /// Per-point classifications.
    pub fn classes(&self) -> &[PointClass] {
        &self.classes
    }

    /// Set the neighborhood radius.
    pub fn set_epsilon(&mut self, epsilon: f32) -> Result<()> {
        ensure_in_range(
            "epsilon",
            f64::from(epsilon),
            f64::from(*EPSILON_RANGE.start()),
            f64::from(*EPSILON_RANGE.end()),
        )?;
        self.epsilon = epsilon;
        Ok(())
    }

    /// Set the core-point neighbor threshold.
    pub fn set_min_points(&mut self, min_points: usize) -> Result<()> {
        ensure_in_range(
            "min_points",
            min_points as f64,
            *MIN_POINTS_RANGE.start() as f64,
            *MIN_POINTS_RANGE.end() as f64,
        )?;
        self.min_points = min_points;
        Ok(())
    }

    /// Append a manually placed point, unclassified.
    pub fn add_point(&mut self, pos: Vec2) {
        self.positions.push(pos);
        self.clusters.push(None);
        self.classes.push(PointClass::Unclassified);
    }

    /// Replace the data set wholesale and discard run progress.
    pub fn load_points(&mut self, points: &[Vec2]) {
        self.positions = points.to_vec();
        self.rewind();
    }

    fn progress(&self) -> StepOutcome {
        if self.cursor >= self.positions.len() {
            StepOutcome::Done
        } else {
            StepOutcome::Advanced
        }
    }

    /// Expand a freshly seeded cluster from the core point's neighbors.
    ///
    /// The seed set is an append-only worklist scanned by cursor, never a
    /// dequeue: a point re-enters only if appended again, and the
    /// membership check prevents that.
    fn expand_cluster(&mut self, cluster: usize, seeds: Vec<usize>) {
        let mut seeds = seeds;
        let mut s = 0;

        while s < seeds.len() {
            let j = seeds[s];

            // A point previously written off as noise is density-reachable
            // after all: promote it to border. Noise is never promoted to
            // core here; its own neighborhood was already found wanting.
            if self.classes[j] == PointClass::Noise {
                self.classes[j] = PointClass::Border;
                self.clusters[j] = Some(cluster);
            }

            if self.clusters[j].is_none() {
                self.clusters[j] = Some(cluster);
                self.classes[j] = PointClass::Border;

                let reach = neighbors(&self.positions, j, self.epsilon);
                if reach.len() >= self.min_points {
                    self.classes[j] = PointClass::Core;
                    for n in reach {
                        if self.clusters[n].is_none() && !seeds.contains(&n) {
                            seeds.push(n);
                        }
                    }
                }
            }

            s += 1;
        }
    }
}

impl Stepwise for Dbscan {
    type Frame = DbscanFrame;

    fn validate(&self) -> Result<()> {
        if self.positions.is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(())
    }

    fn advance(&mut self) -> StepOutcome {
        let idx = self.cursor;
        debug_assert!(idx < self.positions.len());

        // Already labeled in an earlier expansion, or already written off
        // as noise: the visitation still consumes a unit. The highlight
        // state is deliberately left on the previous processed point.
        if self.clusters[idx].is_some() || self.classes[idx] == PointClass::Noise {
            self.cursor += 1;
            return self.progress();
        }

        self.active = Some(idx);
        let found = neighbors(&self.positions, idx, self.epsilon);
        self.active_neighbors = found.clone();

        if found.len() < self.min_points {
            // Not enough neighbors: noise for now, maybe border later.
            self.classes[idx] = PointClass::Noise;
            self.cursor += 1;
            return self.progress();
        }

        let cluster = self.next_cluster;
        self.clusters[idx] = Some(cluster);
        self.classes[idx] = PointClass::Core;
        self.expand_cluster(cluster, found);
        self.next_cluster += 1;
        tracing::debug!(cluster, seed = idx, "expanded cluster");

        self.cursor += 1;
        self.progress()
    }

    fn rewind(&mut self) {
        let n = self.positions.len();
        self.clusters = vec![None; n];
        self.classes = vec![PointClass::Unclassified; n];
        self.cursor = 0;
        self.next_cluster = 0;
        self.active = None;
        self.active_neighbors.clear();
    }

    fn regenerate(&mut self) {
        let w = self.bounds.width;
        let h = self.bounds.height;
        let side = 0.3 * w.min(h);
        let anchors = [Vec2::new(0.15 * w, 0.2 * h), Vec2::new(0.55 * w, 0.55 * h)];

        self.positions = Vec::with_capacity(2 * PATCH_POINTS + NOISE_POINTS);
        for anchor in anchors {
            for _ in 0..PATCH_POINTS {
                self.positions.push(Vec2::new(
                    anchor.x + self.rng.random_range(0.0..side),
                    anchor.y + self.rng.random_range(0.0..side),
                ));
            }
        }
        for _ in 0..NOISE_POINTS {
            self.positions.push(self.bounds.random_point(&mut self.rng));
        }

        self.rewind();
    }

    fn units_done(&self) -> usize {
        self.cursor
    }

    fn clusters_found(&self) -> usize {
        self.next_cluster
    }

    fn frame(&self) -> DbscanFrame {
        DbscanFrame {
            points: self
                .positions
                .iter()
                .zip(self.clusters.iter())
                .zip(self.classes.iter())
                .map(|((pos, cluster), class)| DbscanPoint {
                    pos: *pos,
                    cluster: *cluster,
                    class: *class,
                })
                .collect(),
            epsilon: self.epsilon,
            active: self.active,
            active_neighbors: self.active_neighbors.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kernel_with(points: &[Vec2], epsilon: f32, min_points: usize) -> Dbscan {
        let mut kernel = Dbscan::new(Bounds::default()).with_seed(42);
        kernel.set_epsilon(epsilon).unwrap();
        kernel.set_min_points(min_points).unwrap();
        kernel.load_points(points);
        kernel
    }

    fn run(kernel: &mut Dbscan) {
        let n = kernel.positions().len();
        for _ in 0..n {
            if kernel.advance() == StepOutcome::Done {
                break;
            }
        }
    }

    #[test]
    fn two_patches_become_two_clusters() {
        let mut points = Vec::new();
        // Patch around (100, 100) and patch around (400, 300), each point
        // within epsilon of its patch-mates.
        for d in [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0), (5.0, 5.0)] {
            points.push(Vec2::new(100.0 + d.0, 100.0 + d.1));
        }
        for d in [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0), (5.0, 5.0)] {
            points.push(Vec2::new(400.0 + d.0, 300.0 + d.1));
        }

        let mut kernel = kernel_with(&points, 20.0, 3);
        run(&mut kernel);

        assert_eq!(kernel.clusters_found(), 2);
        for i in 0..5 {
            assert_eq!(kernel.clusters()[i], Some(0));
        }
        for i in 5..10 {
            assert_eq!(kernel.clusters()[i], Some(1));
        }
        assert!(kernel.classes().iter().all(|c| *c == PointClass::Core));
    }

    #[test]
    fn insufficient_density_leaves_everything_noise() {
        // Two mutual neighbors, each with only one neighbor, and an
        // isolated point: below MinPoints = 2, so nothing ever seeds a
        // cluster.
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(12.0, 0.0),
            Vec2::new(500.0, 500.0),
        ];
        let mut kernel = kernel_with(&points, 20.0, 2);
        run(&mut kernel);

        assert_eq!(kernel.clusters_found(), 0);
        for i in 0..3 {
            assert_eq!(kernel.classes()[i], PointClass::Noise);
            assert_eq!(kernel.clusters()[i], None);
        }
    }

    #[test]
    fn noise_is_reclaimed_as_border() {
        // Index 0 is visited first, sees one neighbor (< MinPoints), and
        // is marked noise. The chain 1-2-3 then forms a cluster whose
        // expansion reaches back and promotes 0 to border.
        let points = [
            Vec2::new(100.0, 100.0),
            Vec2::new(115.0, 100.0),
            Vec2::new(130.0, 100.0),
            Vec2::new(145.0, 100.0),
        ];
        let mut kernel = kernel_with(&points, 20.0, 2);

        kernel.advance();
        assert_eq!(kernel.classes()[0], PointClass::Noise);

        run(&mut kernel);
        assert_eq!(kernel.classes()[0], PointClass::Border);
        assert_eq!(kernel.clusters()[0], Some(0));
    }

    #[test]
    fn promotions_never_regress() {
        let mut kernel = Dbscan::new(Bounds::default()).with_seed(3);
        let n = kernel.positions().len();

        let mut best = vec![0u8; n];
        let rank = |c: PointClass| match c {
            PointClass::Unclassified => 0,
            PointClass::Noise => 1,
            PointClass::Border => 2,
            PointClass::Core => 3,
        };

        for _ in 0..n {
            let outcome = kernel.advance();
            for (i, class) in kernel.classes().iter().enumerate() {
                let r = rank(*class);
                // noise -> border is the one allowed reclassification;
                // core and border never fall back.
                assert!(r >= best[i], "point {i} regressed");
                best[i] = r;
            }
            if outcome == StepOutcome::Done {
                break;
            }
        }
    }

    #[test]
    fn density_reachable_points_share_a_cluster() {
        // A chain with 15px spacing under epsilon 20: every link is
        // density-reachable from the first core point.
        let points: Vec<Vec2> = (0..10)
            .map(|i| Vec2::new(100.0 + 15.0 * i as f32, 100.0))
            .collect();
        let mut kernel = kernel_with(&points, 20.0, 2);
        run(&mut kernel);

        assert_eq!(kernel.clusters_found(), 1);
        assert!(kernel.clusters().iter().all(|c| *c == Some(0)));
    }

    #[test]
    fn core_iff_enough_neighbors() {
        let mut kernel = Dbscan::new(Bounds::default()).with_seed(9);
        let n = kernel.positions().len();
        for _ in 0..n {
            if kernel.advance() == StepOutcome::Done {
                break;
            }
        }

        for i in 0..n {
            let degree = neighbors(kernel.positions(), i, kernel.epsilon()).len();
            match kernel.classes()[i] {
                PointClass::Core => assert!(degree >= kernel.min_points()),
                PointClass::Border | PointClass::Noise => {
                    assert!(degree < kernel.min_points());
                }
                PointClass::Unclassified => panic!("point {i} never classified"),
            }
        }
    }

    #[test]
    fn every_visitation_is_one_unit() {
        let mut kernel = Dbscan::new(Bounds::default()).with_seed(5);
        let n = kernel.positions().len();

        for step in 1..=n {
            let outcome = kernel.advance();
            assert_eq!(kernel.units_done(), step);
            assert_eq!(outcome == StepOutcome::Done, step == n);
        }
    }

    #[test]
    fn skip_keeps_previous_highlight() {
        // All three points are labeled on the first unit; the second unit
        // skips and must leave the highlight untouched.
        let points = [
            Vec2::new(100.0, 100.0),
            Vec2::new(110.0, 100.0),
            Vec2::new(120.0, 100.0),
        ];
        let mut kernel = kernel_with(&points, 20.0, 2);

        kernel.advance();
        let frame = kernel.frame();
        assert_eq!(frame.active, Some(0));

        kernel.advance(); // point 1 already clustered: skipped
        let frame = kernel.frame();
        assert_eq!(frame.active, Some(0));
    }

    #[test]
    fn cluster_ids_are_bounded_by_the_counter() {
        let mut kernel = Dbscan::new(Bounds::default()).with_seed(11);
        let n = kernel.positions().len();
        for _ in 0..n {
            let outcome = kernel.advance();
            for c in kernel.clusters().iter().flatten() {
                assert!(*c < kernel.clusters_found());
            }
            if outcome == StepOutcome::Done {
                break;
            }
        }
    }

    #[test]
    fn parameters_are_range_checked() {
        let mut kernel = Dbscan::new(Bounds::default()).with_seed(1);
        assert!(kernel.set_epsilon(9.9).is_err());
        assert!(kernel.set_epsilon(100.1).is_err());
        assert!(kernel.set_min_points(1).is_err());
        assert!(kernel.set_min_points(21).is_err());
        assert!(kernel.set_epsilon(10.0).is_ok());
        assert!(kernel.set_min_points(20).is_ok());
    }

    #[test]
    fn generated_data_has_the_documented_shape() {
        let kernel = Dbscan::new(Bounds::default()).with_seed(42);
        assert_eq!(kernel.positions().len(), 100);
        assert!(kernel.classes().iter().all(|c| *c == PointClass::Unclassified));
        assert!(kernel.clusters().iter().all(Option::is_none));
    }

    #[test]
    fn rewind_clears_labels_but_keeps_points() {
        let mut kernel = Dbscan::new(Bounds::default()).with_seed(8);
        let points = kernel.positions().to_vec();
        run(&mut kernel);
        assert!(kernel.clusters_found() > 0);

        kernel.rewind();
        assert_eq!(kernel.positions(), &points[..]);
        assert_eq!(kernel.units_done(), 0);
        assert_eq!(kernel.clusters_found(), 0);
        assert!(kernel.classes().iter().all(|c| *c == PointClass::Unclassified));
    }

    #[test]
    fn empty_data_set_is_rejected() {
        let mut kernel = Dbscan::new(Bounds::default()).with_seed(1);
        kernel.load_points(&[]);
        assert!(matches!(kernel.validate().unwrap_err(), Error::EmptyInput));
    }
}
