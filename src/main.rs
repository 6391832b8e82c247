/*

    Classify oriented bounding boxes against a camera frustum
    and explicit culling planes given in a JSON scene.

    @date: Oct, 2025
    @author: Bartu

*/

use std::{self, env, time::Instant};
use tracing::{info, warn, error, debug};
use tracing_subscriber;

use obb_cull::json_parser::parse_scene;
use obb_cull::plane::Intersect;

fn main() -> Result<(), Box<dyn std::error::Error>> {

    // Logging on console
    tracing_subscriber::fmt::init();

    // Parse args
    let args: Vec<String> = env::args().collect();
    let json_path: &String = if args.len() == 1 {
        warn!("No arguments were provided, setting default scene path...");
        &String::from("./inputs/frustum.json")
    } else if args.len() == 2 {
        &args[1]
    } else {
        error!("Usage: {} <filename>.json", args[0]);
        std::process::exit(1);
    };

    // Parse JSON
    info!("Loading scene from {}...", json_path);
    let mut scene = parse_scene(json_path).map_err(|e| {
        error!("Failed to load scene: {}", e);
        e
    })?;
    scene.setup();
    debug!("Scene is setup successfully.\n {:#?}", scene);
    let scene = scene; // Shadow mutatability before culling

    let start = Instant::now();
    let culling_volume = scene.culling_volume()?;
    let boxes = scene.build_boxes()?;
    let visibility = culling_volume.compute_visibility_all(&boxes);

    let (mut inside, mut intersecting, mut outside) = (0, 0, 0);
    for ((volume, obb), result) in scene.volumes.as_slice().iter().zip(&boxes).zip(&visibility) {
        match result {
            Intersect::Inside => inside += 1,
            Intersect::Intersecting => intersecting += 1,
            Intersect::Outside => outside += 1,
        }
        info!("Volume {} ({}) centered at {:?}: {:?}", volume.id(), volume.kind(), obb.center, result);
    }

    info!(
        "Culled {} volumes against {} planes in {:?}: {} inside, {} intersecting, {} outside",
        boxes.len(), culling_volume.planes.len(), start.elapsed(), inside, intersecting, outside
    );
    info!("Finished execution.");
    Ok(())
}
