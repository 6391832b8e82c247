/*

    Plane in Hessian normal form and the three-way
    classification result used by culling.

    A point p lies on the plane when
        normal . p + distance == 0
    and on the positive (inside) side when the sum is > 0.

    @date: 14 Nov, 2025
    @author: bartu
*/

use crate::prelude::*;

/// Where a volume lies with respect to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intersect {
    /// Entirely on the side the normal points to.
    Inside,
    /// Entirely on the opposite side.
    Outside,
    Intersecting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3,
    pub distance: Float,
}

impl Plane {
    /// `normal` must be unit length; debug builds assert it.
    /// Use `try_new` for normals that come from outside the crate.
    pub fn new(normal: Vector3, distance: Float) -> Self {
        debug_assert!(normal.is_normalized());
        Self {
            normal,
            distance,
        }
    }

    pub fn try_new(normal: Vector3, distance: Float) -> GeoResult<Self> {
        if !normal.is_finite() || !distance.is_finite() {
            return Err(GeometryError::InvalidArgument("plane must be finite"));
        }
        if !normal.is_normalized() {
            return Err(GeometryError::InvalidArgument("plane normal must be unit length"));
        }
        Ok(Self::new(normal, distance))
    }

    /// Plane through `point` with unit `normal`.
    pub fn from_point_normal(point: Vector3, normal: Vector3) -> Self {
        Self::new(normal, -normal.dot(point))
    }

    /// Signed distance, positive on the side the normal points to.
    #[inline]
    pub fn get_point_distance(&self, point: Vector3) -> Float {
        self.normal.dot(point) + self.distance
    }

    pub fn project_point_onto_plane(&self, point: Vector3) -> Vector3 {
        point - self.normal * self.get_point_distance(point)
    }
}
