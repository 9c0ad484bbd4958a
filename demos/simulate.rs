//! K-means and DBSCAN driven through the simulation controller.

use std::time::Duration;

use clusterlab::render::{dbscan_scene, dbscan_status, kmeans_scene, kmeans_status};
use clusterlab::{Bounds, Dbscan, Kmeans, PointClass, Simulator, Vec2};

fn main() {
    let bounds = Bounds::new(800.0, 500.0);

    // --- K-means on three hand-placed groups ---
    let mut kernel = Kmeans::new(bounds).with_seed(42);
    kernel.load_points(&demo_points());
    kernel.set_k(3).unwrap();

    let mut sim = Simulator::new(kernel);
    sim.set_speed(10).unwrap();
    sim.start().unwrap();

    // Drive the controller from a synthetic clock, the way a host would
    // from its animation-frame callback.
    let mut now = Duration::ZERO;
    while sim.tick(now) {
        now += Duration::from_millis(25);
    }

    let snapshot = sim.snapshot();
    println!("=== K-means (k=3) ===");
    println!("{}", kmeans_status(&snapshot));
    for (i, point) in snapshot.frame.points.iter().enumerate() {
        println!(
            "  point {:2} ({:5.1}, {:5.1}) => cluster {:?}",
            i, point.pos.x, point.pos.y, point.cluster
        );
    }
    println!("  scene: {} primitives", kmeans_scene(&snapshot.frame).len());

    // --- DBSCAN on the same layout ---
    let mut kernel = Dbscan::new(bounds).with_seed(42);
    kernel.load_points(&demo_points());
    kernel.set_epsilon(40.0).unwrap();
    kernel.set_min_points(2).unwrap();

    let mut sim = Simulator::new(kernel);
    sim.set_speed(10).unwrap();
    sim.start().unwrap();

    let mut now = Duration::ZERO;
    while sim.tick(now) {
        now += Duration::from_millis(25);
    }

    let snapshot = sim.snapshot();
    println!("\n=== DBSCAN (eps=40, min_points=2) ===");
    println!("{}", dbscan_status(&snapshot));
    for (i, point) in snapshot.frame.points.iter().enumerate() {
        let tag = match (point.cluster, point.class) {
            (Some(c), PointClass::Core) => format!("cluster {c} (core)"),
            (Some(c), _) => format!("cluster {c} (border)"),
            _ => "NOISE".to_string(),
        };
        println!(
            "  point {:2} ({:5.1}, {:5.1}) => {}",
            i, point.pos.x, point.pos.y, tag
        );
    }
    println!("  scene: {} primitives", dbscan_scene(&snapshot.frame).len());
}

/// Three well-separated groups in canvas coordinates.
fn demo_points() -> Vec<Vec2> {
    vec![
        // Group A (upper left)
        Vec2::new(100.0, 100.0),
        Vec2::new(120.0, 110.0),
        Vec2::new(110.0, 130.0),
        Vec2::new(90.0, 120.0),
        // Group B (center)
        Vec2::new(400.0, 250.0),
        Vec2::new(420.0, 240.0),
        Vec2::new(410.0, 270.0),
        Vec2::new(430.0, 260.0),
        // Group C (lower right)
        Vec2::new(700.0, 420.0),
        Vec2::new(710.0, 430.0),
        Vec2::new(690.0, 410.0),
        Vec2::new(720.0, 440.0),
    ]
}
