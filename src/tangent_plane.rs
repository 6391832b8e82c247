/*

    Plane tangent to an ellipsoid at a surface point, with a
    local east-north-up frame:

        x axis: east
        y axis: north
        z axis: up (geodetic surface normal, also the plane normal)

    Points are flattened into the (x, y) frame by orthogonal
    projection onto the plane.

    @date: 14 Nov, 2025
    @author: bartu
*/

use crate::prelude::*;
use crate::ellipsoid::{Cartographic, Ellipsoid};
use crate::plane::Plane;

/// East, north and up unit vectors at a surface point.
/// On the polar axis east is fixed to +Y and north points away from +X
/// (for the north pole), since longitude is undefined there.
pub fn east_north_up_axes(origin: Vector3, ellipsoid: &Ellipsoid) -> (Vector3, Vector3, Vector3) {
    if equals_epsilon(origin.x, 0.0, EPSILON14) && equals_epsilon(origin.y, 0.0, EPSILON14) {
        let sign = if origin.z < 0.0 { -1.0 } else { 1.0 };
        return (
            Vector3::Y,
            Vector3::new(-sign, 0.0, 0.0),
            Vector3::new(0.0, 0.0, sign),
        );
    }

    let up = ellipsoid.geodetic_surface_normal(origin);
    let east = Vector3::new(-origin.y, origin.x, 0.0).normalize();
    let north = up.cross(east);
    (east, north, up)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipsoidTangentPlane {
    ellipsoid: Ellipsoid,
    origin: Vector3,
    x_axis: Vector3,
    y_axis: Vector3,
    plane: Plane,
}

impl EllipsoidTangentPlane {
    /// Tangent plane at the surface point closest to `origin` (along the geodetic normal).
    pub fn new(origin: Vector3, ellipsoid: Ellipsoid) -> GeoResult<Self> {
        let origin = ellipsoid.scale_to_geodetic_surface(origin).ok_or(
            GeometryError::InvalidArgument("tangent plane origin must be finite and away from the ellipsoid center"),
        )?;
        let (east, north, up) = east_north_up_axes(origin, &ellipsoid);
        debug!("Tangent plane at {:?}, east {:?}, north {:?}", origin, east, north);

        Ok(Self {
            ellipsoid,
            origin,
            x_axis: east,
            y_axis: north,
            plane: Plane::from_point_normal(origin, up),
        })
    }

    pub fn from_cartographic(cartographic: &Cartographic, ellipsoid: Ellipsoid) -> GeoResult<Self> {
        let origin = ellipsoid.cartographic_to_cartesian(&cartographic.with_height(0.0));
        Self::new(origin, ellipsoid)
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn origin(&self) -> Vector3 {
        self.origin
    }

    pub fn x_axis(&self) -> Vector3 {
        self.x_axis
    }

    pub fn y_axis(&self) -> Vector3 {
        self.y_axis
    }

    pub fn z_axis(&self) -> Vector3 {
        self.plane.normal
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Coordinates of the point of the plane nearest to `cartesian`.
    #[inline]
    pub fn project_point_to_nearest_on_plane(&self, cartesian: Vector3) -> Vector2 {
        // x and y axes lie in the plane, so the normal component drops out
        let offset = cartesian - self.origin;
        Vector2::new(self.x_axis.dot(offset), self.y_axis.dot(offset))
    }

    /// Lifts plane coordinates back to world space.
    pub fn plane_point_to_world(&self, point: Vector2) -> Vector3 {
        self.origin + self.x_axis * point.x + self.y_axis * point.y
    }
}
