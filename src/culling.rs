/*

    Culling volume: a set of planes whose normals point inward.
    A box is visible when it is not fully outside any of them.

    @date: 15 Nov, 2025
    @author: bartu
*/

use rayon::prelude::*;

use crate::prelude::*;
use crate::obb::OrientedBoundingBox;
use crate::plane::{Intersect, Plane};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CullingVolume {
    pub planes: Vec<Plane>,
}

impl CullingVolume {
    pub fn new(planes: Vec<Plane>) -> Self {
        Self { planes }
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Outside as soon as one plane rejects the box, Intersecting if any plane
    /// cuts through it, Inside otherwise. An empty volume accepts everything.
    pub fn compute_visibility(&self, obb: &OrientedBoundingBox) -> Intersect {
        let mut intersecting = false;
        for plane in &self.planes {
            match obb.intersect_plane(plane) {
                Intersect::Outside => return Intersect::Outside,
                Intersect::Intersecting => intersecting = true,
                Intersect::Inside => {}
            }
        }

        if intersecting { Intersect::Intersecting } else { Intersect::Inside }
    }

    /// Classifies every box, in parallel. Output order follows `boxes`.
    pub fn compute_visibility_all(&self, boxes: &[OrientedBoundingBox]) -> Vec<Intersect> {
        debug!("Culling {} boxes against {} planes", boxes.len(), self.planes.len());

        // --- Rayon Multithreading ---
        boxes
            .par_iter()
            .map(|obb| self.compute_visibility(obb))
            .collect()
        // -----------------------------
    }
}
