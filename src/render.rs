//! Projection of simulation state into drawable primitives.
//!
//! This crate draws nothing itself. After each unit of work the host
//! takes a [`Snapshot`](crate::sim::Snapshot) and feeds its frame through
//! the scene functions here, getting back an ordered list of
//! [`Primitive`]s: earlier entries are drawn first, so halos and the ε
//! ring land underneath the point discs they emphasize.
//!
//! Colors are deliberately absent. A fill is a semantic tag — cluster
//! index, noise, unclassified — and hosts typically cycle a small palette
//! by `cluster % palette.len()`.

use crate::cluster::{DbscanFrame, KmeansFrame, KmeansOutcome, PointClass};
use crate::geom::Vec2;
use crate::sim::{SimState, Snapshot};

/// Disc radius for an unclassified or k-means point.
const POINT_RADIUS: f32 = 5.0;
/// Disc radius for a DBSCAN core point.
const CORE_RADIUS: f32 = 7.0;
/// Disc radius for a DBSCAN border point.
const BORDER_RADIUS: f32 = 5.0;
/// Disc radius for a DBSCAN noise point.
const NOISE_RADIUS: f32 = 3.0;
/// Disc radius for a k-means centroid.
const CENTROID_RADIUS: f32 = 8.0;
/// Extra radius of the halo behind the point being processed.
const ACTIVE_PAD: f32 = 5.0;
/// Extra radius of the halo behind a neighbor of the active point.
const NEIGHBOR_PAD: f32 = 3.0;

/// Semantic fill of a disc; the host maps this to an actual color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fill {
    /// Point not yet touched by the algorithm.
    Unclassified,
    /// Member of the given cluster.
    Cluster(usize),
    /// DBSCAN noise.
    Noise,
}

/// Outline drawn around a disc.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stroke {
    /// Heavy outline marking a core point.
    Core,
    /// Light outline marking a border point.
    Border,
    /// Centroid outline.
    Centroid,
}

/// What a halo is emphasizing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Emphasis {
    /// The point currently being processed.
    Active,
    /// A neighbor of the active point.
    Neighbor,
}

/// One drawable shape, in draw order.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// The ε neighborhood ring around the active point.
    EpsilonRing { center: Vec2, radius: f32 },
    /// A translucent emphasis disc drawn under a point.
    Halo {
        center: Vec2,
        radius: f32,
        kind: Emphasis,
    },
    /// A point or centroid disc.
    Disc {
        center: Vec2,
        radius: f32,
        fill: Fill,
        stroke: Option<Stroke>,
    },
}

/// Project a k-means frame into drawable primitives: points first, then
/// centroids on top.
pub fn kmeans_scene(frame: &KmeansFrame) -> Vec<Primitive> {
    let mut scene = Vec::with_capacity(frame.points.len() + frame.centroids.len());

    for point in &frame.points {
        scene.push(Primitive::Disc {
            center: point.pos,
            radius: POINT_RADIUS,
            fill: match point.cluster {
                Some(c) => Fill::Cluster(c),
                None => Fill::Unclassified,
            },
            stroke: None,
        });
    }

    for (i, centroid) in frame.centroids.iter().enumerate() {
        scene.push(Primitive::Disc {
            center: *centroid,
            radius: CENTROID_RADIUS,
            fill: Fill::Cluster(i),
            stroke: Some(Stroke::Centroid),
        });
    }

    scene
}

/// Project a DBSCAN frame into drawable primitives: the ε ring, then per
/// point any emphasis halo followed by the disc itself.
pub fn dbscan_scene(frame: &DbscanFrame) -> Vec<Primitive> {
    let mut scene = Vec::with_capacity(frame.points.len() + 4);

    if let Some(active) = frame.active {
        scene.push(Primitive::EpsilonRing {
            center: frame.points[active].pos,
            radius: frame.epsilon,
        });
    }

    for (i, point) in frame.points.iter().enumerate() {
        let radius = match point.class {
            PointClass::Core => CORE_RADIUS,
            PointClass::Border | PointClass::Unclassified => BORDER_RADIUS,
            PointClass::Noise => NOISE_RADIUS,
        };

        if frame.active == Some(i) {
            scene.push(Primitive::Halo {
                center: point.pos,
                radius: radius + ACTIVE_PAD,
                kind: Emphasis::Active,
            });
        }
        if frame.active_neighbors.contains(&i) {
            scene.push(Primitive::Halo {
                center: point.pos,
                radius: radius + NEIGHBOR_PAD,
                kind: Emphasis::Neighbor,
            });
        }

        scene.push(Primitive::Disc {
            center: point.pos,
            radius,
            fill: match (point.cluster, point.class) {
                (Some(c), _) => Fill::Cluster(c),
                (None, PointClass::Noise) => Fill::Noise,
                (None, _) => Fill::Unclassified,
            },
            stroke: match point.class {
                PointClass::Core => Some(Stroke::Core),
                PointClass::Border => Some(Stroke::Border),
                _ => None,
            },
        });
    }

    scene
}

fn state_phrase(state: SimState) -> &'static str {
    match state {
        SimState::Idle => "Ready",
        SimState::Running => "Running...",
        SimState::Paused => "Paused",
        SimState::Completed => "Complete!",
    }
}

/// Status line for a k-means snapshot, in the visualization's wording.
pub fn kmeans_status(snapshot: &Snapshot<KmeansFrame>) -> String {
    let phrase = match (snapshot.state, snapshot.frame.outcome) {
        (SimState::Completed, Some(KmeansOutcome::Converged)) => "Convergence reached!",
        (SimState::Completed, Some(KmeansOutcome::MaxIterations)) => "Iteration limit reached",
        (state, _) => state_phrase(state),
    };
    format!("Iteration: {} | {}", snapshot.units, phrase)
}

/// Status line for a DBSCAN snapshot, in the visualization's wording.
pub fn dbscan_status(snapshot: &Snapshot<DbscanFrame>) -> String {
    format!(
        "Points processed: {} of {} | Clusters found: {} | {}",
        snapshot.units,
        snapshot.frame.points.len(),
        snapshot.clusters,
        state_phrase(snapshot.state),
    )
}
