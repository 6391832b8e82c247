/*

    Oriented Bounding Box.

    A box is a center and three half axes stored as the columns
    of a 3x3 matrix. A column's direction is an edge direction,
    its length half the extent along that edge. Zero columns are
    allowed and describe flat (or point) boxes.

    Every constructor comes in two flavours sharing the same math:
    - from_*( ) returns a fresh box,
    - from_*_into( ) overwrites a caller owned box and hands
      the same reference back, so a culling loop can reuse one
      box per node instead of allocating.

    @author: bartu
    @date: 14 Nov, 2025
*/

use crate::prelude::*;
use crate::ellipsoid::{Cartographic, Ellipsoid};
use crate::error::required;
use crate::geometry::{mean_and_covariance, symmetric_eigen_decomposition};
use crate::interval::Interval;
use crate::plane::{Intersect, Plane};
use crate::rectangle::{BoundingRectangle, Rectangle};
use crate::tangent_plane::EllipsoidTangentPlane;

// Perimeter sample layout used by from_rectangle_tangent_plane
//
//          N/+y
//      [0] [1] [2]
// W/-x [7]     [3] E/+x
//      [6] [5] [4]
//          S/-y
const WEST_EDGE: [usize; 3] = [0, 7, 6];
const EAST_EDGE: [usize; 3] = [2, 3, 4];
const SOUTH_EDGE: [usize; 3] = [6, 5, 4];
const NORTH_EDGE: [usize; 3] = [0, 1, 2];
const CORNERS: [usize; 4] = [0, 2, 4, 6];

#[derive(Debug, Clone, Copy, PartialEq, SmartDefault)]
pub struct OrientedBoundingBox {
    pub center: Vector3,
    #[default(Matrix3::ZERO)]
    pub half_axes: Matrix3,
}

impl OrientedBoundingBox {
    pub fn new(center: Vector3, half_axes: Matrix3) -> Self {
        Self {
            center,
            half_axes,
        }
    }

    // ================================================================================================
    // Construction from a planar rectangle
    // ================================================================================================

    /// Box around `rectangle` (lying in the z = 0 plane) after rotating it by
    /// `rotation` radians about +Z around its min corner.
    pub fn from_bounding_rectangle(rectangle: Option<&BoundingRectangle>, rotation: Option<Float>) -> GeoResult<Self> {
        let mut result = Self::default();
        Self::from_bounding_rectangle_into(rectangle, rotation, &mut result)?;
        Ok(result)
    }

    pub fn from_bounding_rectangle_into<'a>(
        rectangle: Option<&BoundingRectangle>,
        rotation: Option<Float>,
        result: &'a mut Self,
    ) -> GeoResult<&'a mut Self> {
        let rectangle = required(rectangle, "rectangle is required")?;

        let rotation = Matrix3::from_rotation_z(rotation.unwrap_or(0.0));
        let half_extents = Vector3::new(rectangle.width * 0.5, rectangle.height * 0.5, 0.0);

        // Scale first, then rotate
        result.half_axes = rotation * Matrix3::from_diagonal(half_extents);
        result.center = Vector3::new(rectangle.x, rectangle.y, 0.0) + rotation * half_extents;
        Ok(result)
    }

    // ================================================================================================
    // Construction from a geographic rectangle on a tangent plane
    // ================================================================================================

    /// Box around `rectangle` flattened onto `tangent_plane` and extruded between
    /// `minimum_height` and `maximum_height` above the ellipsoid.
    pub fn from_rectangle_tangent_plane(
        rectangle: Option<&Rectangle>,
        tangent_plane: Option<&EllipsoidTangentPlane>,
        minimum_height: Float,
        maximum_height: Float,
    ) -> GeoResult<Self> {
        let mut result = Self::default();
        Self::from_rectangle_tangent_plane_into(rectangle, tangent_plane, minimum_height, maximum_height, &mut result)?;
        Ok(result)
    }

    pub fn from_rectangle_tangent_plane_into<'a>(
        rectangle: Option<&Rectangle>,
        tangent_plane: Option<&EllipsoidTangentPlane>,
        minimum_height: Float,
        maximum_height: Float,
        result: &'a mut Self,
    ) -> GeoResult<&'a mut Self> {
        let rectangle = required(rectangle, "rectangle is required")?;
        let tangent_plane = required(tangent_plane, "tangent_plane is required")?;

        if rectangle.width() == 0.0 || rectangle.height() == 0.0 {
            debug!("Degenerate rectangle {:?}, box collapses to a slab", rectangle);
        }

        let ellipsoid = tangent_plane.ellipsoid();
        let plane = tangent_plane.plane();

        // Edge midpoints sit at the center longitude / latitude. A rectangle
        // spanning the equator is widest there, so W and E are sampled on it.
        let center = rectangle.center();
        let lon_center = center.longitude;
        let lat_center = if rectangle.south < 0.0 && rectangle.north > 0.0 { 0.0 } else { center.latitude };

        let (west, south, east, north) = (rectangle.west, rectangle.south, rectangle.east, rectangle.north);
        let perimeter = [
            Cartographic::new(west, north, maximum_height),
            Cartographic::new(lon_center, north, maximum_height),
            Cartographic::new(east, north, maximum_height),
            Cartographic::new(east, lat_center, maximum_height),
            Cartographic::new(east, south, maximum_height),
            Cartographic::new(lon_center, south, maximum_height),
            Cartographic::new(west, south, maximum_height),
            Cartographic::new(west, lat_center, maximum_height),
        ];

        // XY extents from the perimeter at maximum height
        let cartesians = perimeter.map(|c| ellipsoid.cartographic_to_cartesian(&c));
        let projected = cartesians.map(|p| tangent_plane.project_point_to_nearest_on_plane(p));

        // Each bound comes from its own edge, so an inverted rectangle keeps its
        // orientation (negative half axis) instead of being silently flipped
        let pick = |edge: [usize; 3], coord: fn(Vector2) -> Float, init: Float, f: fn(Float, Float) -> Float| {
            edge.iter().map(|&i| coord(projected[i])).fold(init, f)
        };
        let x_extent = Interval::new(
            pick(WEST_EDGE, |p: Vector2| p.x, Float::INFINITY, Float::min),
            pick(EAST_EDGE, |p: Vector2| p.x, Float::NEG_INFINITY, Float::max),
        );
        let y_extent = Interval::new(
            pick(SOUTH_EDGE, |p: Vector2| p.y, Float::INFINITY, Float::min),
            pick(NORTH_EDGE, |p: Vector2| p.y, Float::NEG_INFINITY, Float::max),
        );

        // The plane touches the surface at height 0, so the corners at minimum
        // height are the deepest points
        let min_z = CORNERS
            .iter()
            .map(|&i| {
                let low = ellipsoid.cartographic_to_cartesian(&perimeter[i].with_height(minimum_height));
                plane.get_point_distance(low)
            })
            .fold(Float::INFINITY, Float::min);
        let max_z = cartesians
            .iter()
            .map(|p| plane.get_point_distance(*p))
            .fold(maximum_height, Float::max);
        let z_extent = Interval::new(min_z, max_z);

        Ok(Self::from_tangent_plane_extents(tangent_plane, &x_extent, &y_extent, &z_extent, result))
    }

    /// Box spanning the given extents in the east-north-up frame of `tangent_plane`.
    fn from_tangent_plane_extents<'a>(
        tangent_plane: &EllipsoidTangentPlane,
        x_extent: &Interval,
        y_extent: &Interval,
        z_extent: &Interval,
        result: &'a mut Self,
    ) -> &'a mut Self {
        let axes = Matrix3::from_cols(tangent_plane.x_axis(), tangent_plane.y_axis(), tangent_plane.z_axis());
        let center_offset = Vector3::new(x_extent.midpoint(), y_extent.midpoint(), z_extent.midpoint());
        let scale = Vector3::new(x_extent.half_size(), y_extent.half_size(), z_extent.half_size());

        result.center = tangent_plane.origin() + axes * center_offset;
        result.half_axes = scale_columns(&axes, scale);
        result
    }

    /// Box around `rectangle` using the tangent plane at the rectangle's center.
    pub fn from_rectangle(
        rectangle: Option<&Rectangle>,
        minimum_height: Float,
        maximum_height: Float,
        ellipsoid: &Ellipsoid,
    ) -> GeoResult<Self> {
        let mut result = Self::default();
        Self::from_rectangle_into(rectangle, minimum_height, maximum_height, ellipsoid, &mut result)?;
        Ok(result)
    }

    pub fn from_rectangle_into<'a>(
        rectangle: Option<&Rectangle>,
        minimum_height: Float,
        maximum_height: Float,
        ellipsoid: &Ellipsoid,
        result: &'a mut Self,
    ) -> GeoResult<&'a mut Self> {
        let rectangle = required(rectangle, "rectangle is required")?;

        // A tangent plane cannot bound more than a hemisphere-wide span
        let span = Interval::new(0.0, PI);
        if !span.contains(rectangle.width()) {
            return Err(GeometryError::InvalidArgument("rectangle width must be between 0 and pi"));
        }
        if !span.contains(rectangle.height()) {
            return Err(GeometryError::InvalidArgument("rectangle height must be between 0 and pi"));
        }

        let tangent_plane = EllipsoidTangentPlane::from_cartographic(&rectangle.center(), *ellipsoid)?;
        Self::from_rectangle_tangent_plane_into(Some(rectangle), Some(&tangent_plane), minimum_height, maximum_height, result)
    }

    // ================================================================================================
    // Construction from points
    // ================================================================================================

    /// Box aligned with the principal directions of `points`.
    /// An empty slice gives the default (zero) box.
    pub fn from_points(points: &[Vector3]) -> Self {
        let mut result = Self::default();
        Self::from_points_into(points, &mut result);
        result
    }

    pub fn from_points_into<'a>(points: &[Vector3], result: &'a mut Self) -> &'a mut Self {
        let Some((_, covariance)) = mean_and_covariance(points) else {
            *result = Self::default();
            return result;
        };

        let rotation = symmetric_eigen_decomposition(&covariance).unitary;

        let mut center = Vector3::ZERO;
        let mut scale = Vector3::ZERO;
        for i in 0..3 {
            let axis = rotation.col(i);
            let extent = Interval::enclosing(points.iter().map(|p| axis.dot(*p)));
            center += axis * extent.midpoint();
            scale[i] = extent.half_size();
        }

        result.center = center;
        result.half_axes = scale_columns(&rotation, scale);
        result
    }

    // ================================================================================================
    // Queries
    // ================================================================================================

    /// Projected half extent of the box on `direction` (support function radius).
    #[inline]
    pub fn radius_along(&self, direction: Vector3) -> Float {
        self.half_axes.x_axis.dot(direction).abs()
            + self.half_axes.y_axis.dot(direction).abs()
            + self.half_axes.z_axis.dot(direction).abs()
    }

    /// Which side of `plane` the box is on. Exact for any half axes,
    /// orthogonal or not, including zero ones.
    #[inline]
    pub fn intersect_plane(&self, plane: &Plane) -> Intersect {
        let radius = self.radius_along(plane.normal);
        let distance = plane.get_point_distance(self.center);

        if distance - radius > 0.0 {
            Intersect::Inside
        } else if distance + radius < 0.0 {
            Intersect::Outside
        } else {
            Intersect::Intersecting
        }
    }

    pub fn try_intersect_plane(obb: Option<&Self>, plane: Option<&Plane>) -> GeoResult<Intersect> {
        let obb = required(obb, "box is required")?;
        let plane = required(plane, "plane is required")?;
        Ok(obb.intersect_plane(plane))
    }

    pub fn compute_corners(&self) -> [Vector3; 8] {
        let (u, v, w) = (self.half_axes.x_axis, self.half_axes.y_axis, self.half_axes.z_axis);
        let c = self.center;
        [
            c - u - v - w,
            c - u - v + w,
            c - u + v - w,
            c - u + v + w,
            c + u - v - w,
            c + u - v + w,
            c + u + v - w,
            c + u + v + w,
        ]
    }

    /// Squared distance from `point` to the closest point of the box, 0 inside.
    /// Assumes orthogonal half axes, which every constructor here produces.
    pub fn distance_squared_to(&self, point: Vector3) -> Float {
        let offset = point - self.center;
        let mut distance_squared = 0.0;
        let mut covered = 0.0;
        let mut spanned = 0;

        for axis in [self.half_axes.x_axis, self.half_axes.y_axis, self.half_axes.z_axis] {
            let half_length = axis.length();
            if half_length == 0.0 {
                continue;
            }
            let projection = offset.dot(axis / half_length);
            covered += projection * projection;
            spanned += 1;

            let excess = projection.abs() - half_length;
            if excess > 0.0 {
                distance_squared += excess * excess;
            }
        }

        // Whatever the non-degenerate axes do not span is pure distance
        if spanned < 3 {
            distance_squared += (offset.length_squared() - covered).max(0.0);
        }
        distance_squared
    }

    /// Signed near and far distances of the box along `direction` from `position`.
    pub fn compute_plane_distances(&self, position: Vector3, direction: Vector3) -> Interval {
        let mid = direction.dot(self.center - position);
        let radius = self.radius_along(direction);
        Interval::new(mid - radius, mid + radius)
    }

    // ================================================================================================
    // Equality and cloning
    // ================================================================================================

    pub fn equals(&self, other: Option<&Self>) -> bool {
        other.is_some_and(|other| self == other)
    }

    pub fn equals_epsilon(&self, other: &Self, epsilon: Float) -> bool {
        self.center.abs_diff_eq(other.center, epsilon) && self.half_axes.abs_diff_eq(other.half_axes, epsilon)
    }

    /// Copies this box into `result` and returns that same reference.
    pub fn clone_into_result<'a>(&self, result: &'a mut Self) -> &'a mut Self {
        result.center = self.center;
        result.half_axes = self.half_axes;
        result
    }

    pub fn clone_from_option(obb: Option<&Self>) -> Option<Self> {
        obb.copied()
    }

    /// Leaves `result` untouched and returns None when there is nothing to copy.
    pub fn clone_option_into<'a>(obb: Option<&Self>, result: &'a mut Self) -> Option<&'a mut Self> {
        let obb = obb?;
        Some(obb.clone_into_result(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::SQRT_2;
    use std::ptr;

    const SQRT1_2: Float = std::f64::consts::FRAC_1_SQRT_2;

    // Planes whose offset or normal collapse under a degenerate transform are skipped
    const PLANE_DISTANCE_GUARD: Float = 1e-4;
    const NORMAL_MAGNITUDE_GUARD: Float = 1e-4;
    const BOUNDARY_MARGIN: Float = 1e-5;

    fn rotation(axis: Vector3, angle: Float) -> Matrix3 {
        Matrix3::from_quat(Quaternion::from_axis_angle(axis.normalize(), angle))
    }

    #[test]
    fn default_box_is_a_point_at_origin() {
        let obb = OrientedBoundingBox::default();
        assert_eq!(obb.center, Vector3::ZERO);
        assert_eq!(obb.half_axes, Matrix3::ZERO);
    }

    // ---------------------------------------------------------------------------------------------
    // from_bounding_rectangle

    #[test]
    fn bounding_rectangle_is_required() {
        let err = OrientedBoundingBox::from_bounding_rectangle(None, None).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidArgument(_)));
    }

    #[test]
    fn zero_size_bounding_rectangle_gives_zero_box() {
        let obb = OrientedBoundingBox::from_bounding_rectangle(Some(&BoundingRectangle::default()), None).unwrap();
        assert_eq!(obb.center, Vector3::ZERO);
        assert_eq!(obb.half_axes, Matrix3::ZERO);
    }

    #[test]
    fn bounding_rectangle_without_rotation() {
        let rect = BoundingRectangle::from_min_max(Vector2::new(1.0, 2.0), Vector2::new(4.0, 6.0));
        let obb = OrientedBoundingBox::from_bounding_rectangle(Some(&rect), Some(0.0)).unwrap();
        assert_eq!(obb.center, Vector3::new(2.5, 4.0, 0.0));
        assert_eq!(obb.half_axes, Matrix3::from_diagonal(Vector3::new(1.5, 2.0, 0.0)));
    }

    #[test]
    fn bounding_rectangle_rotated_without_result() {
        let rect = BoundingRectangle::new(1.0, 2.0, 3.0, 4.0);
        let angle = PI_OVER_TWO;
        let obb = OrientedBoundingBox::from_bounding_rectangle(Some(&rect), Some(angle)).unwrap();

        assert!(obb.center.abs_diff_eq(Vector3::new(-1.0, 3.5, 0.0), EPSILON15));
        let expected = Matrix3::from_rotation_z(angle) * Matrix3::from_diagonal(Vector3::new(1.5, 2.0, 0.0));
        assert!(obb.half_axes.abs_diff_eq(expected, EPSILON15));
    }

    #[test]
    fn bounding_rectangle_rotated_with_result() {
        let rect = BoundingRectangle::new(1.0, 2.0, 3.0, 4.0);
        let angle = PI_OVER_TWO;
        let mut result = OrientedBoundingBox::default();
        let result_ptr: *const OrientedBoundingBox = &result;

        let obb = OrientedBoundingBox::from_bounding_rectangle_into(Some(&rect), Some(angle), &mut result).unwrap();
        assert!(ptr::eq(obb, result_ptr));
        assert!(obb.center.abs_diff_eq(Vector3::new(-1.0, 3.5, 0.0), EPSILON15));
        let expected = Matrix3::from_rotation_z(angle) * Matrix3::from_diagonal(Vector3::new(1.5, 2.0, 0.0));
        assert!(obb.half_axes.abs_diff_eq(expected, EPSILON15));
    }

    // ---------------------------------------------------------------------------------------------
    // from_rectangle_tangent_plane

    fn unit_sphere_plane(origin: Vector3) -> EllipsoidTangentPlane {
        EllipsoidTangentPlane::new(origin, Ellipsoid::UNIT_SPHERE).unwrap()
    }

    // Row-major constructor, matching how the fixtures are written down
    fn rows(m: [Float; 9]) -> Matrix3 {
        Matrix3::from_cols_array(&m).transpose()
    }

    fn tangent_box_into(rect: &Rectangle, origin: Vector3) -> OrientedBoundingBox {
        let tangent_plane = unit_sphere_plane(origin);
        let mut result = OrientedBoundingBox::default();
        let result_ptr: *const OrientedBoundingBox = &result;
        let obb = OrientedBoundingBox::from_rectangle_tangent_plane_into(
            Some(rect),
            Some(&tangent_plane),
            0.0,
            0.0,
            &mut result,
        )
        .unwrap();
        assert!(ptr::eq(obb, result_ptr));
        *obb
    }

    #[test]
    fn tangent_plane_requires_rectangle() {
        let tangent_plane = unit_sphere_plane(Vector3::X);
        let err = OrientedBoundingBox::from_rectangle_tangent_plane(None, Some(&tangent_plane), 0.0, 0.0).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidArgument(_)));
    }

    #[test]
    fn tangent_plane_requires_tangent_plane() {
        let rect = Rectangle::new(1.0, 2.0, 3.0, 4.0);
        let err = OrientedBoundingBox::from_rectangle_tangent_plane(Some(&rect), None, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidArgument(_)));
    }

    #[test]
    fn tangent_plane_point_rectangle_without_result() {
        let rect = Rectangle::new(0.0, 0.0, 0.0, 0.0);
        let tangent_plane = unit_sphere_plane(Vector3::X);
        let obb = OrientedBoundingBox::from_rectangle_tangent_plane(Some(&rect), Some(&tangent_plane), 0.0, 0.0).unwrap();
        assert!(obb.center.abs_diff_eq(Vector3::X, EPSILON15));
        assert!(obb.half_axes.abs_diff_eq(Matrix3::ZERO, EPSILON15));
    }

    #[test]
    fn tangent_plane_point_rectangle_with_result() {
        let obb = tangent_box_into(&Rectangle::new(0.0, 0.0, 0.0, 0.0), Vector3::X);
        assert!(obb.center.abs_diff_eq(Vector3::X, EPSILON15));
        assert!(obb.half_axes.abs_diff_eq(Matrix3::ZERO, EPSILON15));
    }

    #[test]
    fn tangent_plane_degenerate_latitude_span() {
        let d45 = PI_OVER_FOUR;
        let obb = tangent_box_into(&Rectangle::new(-d45, 0.0, d45, 0.0), Vector3::X);

        assert!(obb.center.abs_diff_eq(Vector3::new((1.0 + SQRT1_2) / 2.0, 0.0, 0.0), EPSILON15));
        let expected = rows([0.0, 0.0, 0.5 * (1.0 - SQRT1_2), SQRT1_2, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(obb.half_axes.abs_diff_eq(expected, EPSILON15));
    }

    #[test]
    fn tangent_plane_degenerate_span_across_antimeridian() {
        let d135 = 3.0 * PI_OVER_FOUR;
        let obb = tangent_box_into(&Rectangle::new(d135, 0.0, -d135, 0.0), -Vector3::X);

        assert!(obb.center.abs_diff_eq(Vector3::new(-(1.0 + SQRT1_2) / 2.0, 0.0, 0.0), EPSILON15));
        let expected = rows([0.0, 0.0, -0.5 * (1.0 - SQRT1_2), -SQRT1_2, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(obb.half_axes.abs_diff_eq(expected, EPSILON15));
    }

    #[test]
    fn tangent_plane_degenerate_longitude_span() {
        let d45 = PI_OVER_FOUR;
        let obb = tangent_box_into(&Rectangle::new(0.0, -d45, 0.0, d45), Vector3::X);

        assert!(obb.center.abs_diff_eq(Vector3::new((1.0 + SQRT1_2) / 2.0, 0.0, 0.0), EPSILON15));
        let expected = rows([0.0, 0.0, 0.5 * (1.0 - SQRT1_2), 0.0, 0.0, 0.0, 0.0, SQRT1_2, 0.0]);
        assert!(obb.half_axes.abs_diff_eq(expected, EPSILON15));
    }

    #[test]
    fn tangent_plane_degenerate_span_over_the_poles() {
        let d135 = 3.0 * PI_OVER_FOUR;
        let obb = tangent_box_into(&Rectangle::new(0.0, d135, 0.0, -d135), -Vector3::X);

        assert!(obb.center.abs_diff_eq(Vector3::new(-(1.0 + SQRT1_2) / 2.0, 0.0, 0.0), EPSILON15));
        let expected = rows([0.0, 0.0, -0.5 * (1.0 - SQRT1_2), 0.0, 0.0, 0.0, 0.0, -SQRT1_2, 0.0]);
        assert!(obb.half_axes.abs_diff_eq(expected, EPSILON15));
    }

    #[test]
    fn tangent_plane_box_contains_extruded_rectangle() {
        let rect = Rectangle::from_degrees(-10.0, 30.0, 15.0, 50.0);
        let (min_h, max_h) = (-500.0, 8000.0);
        let obb = OrientedBoundingBox::from_rectangle(Some(&rect), min_h, max_h, &Ellipsoid::WGS84).unwrap();

        let wgs84 = Ellipsoid::WGS84;
        for i in 0..=10 {
            for j in 0..=10 {
                let lon = rect.west + rect.width() * i as Float / 10.0;
                let lat = rect.south + rect.height() * j as Float / 10.0;
                for h in [min_h, max_h] {
                    let p = wgs84.cartographic_to_cartesian(&Cartographic::new(lon, lat, h));
                    // Sampling only sees edges, allow slack for the bulge between samples
                    assert!(obb.distance_squared_to(p) < 1.0, "point {:?} outside box", p);
                }
            }
        }
    }

    #[test]
    fn from_rectangle_with_result_matches_fresh_box() {
        let rect = Rectangle::from_degrees(20.0, -10.0, 35.0, 5.0);
        let fresh = OrientedBoundingBox::from_rectangle(Some(&rect), 0.0, 250.0, &Ellipsoid::WGS84).unwrap();

        let mut result = OrientedBoundingBox::default();
        let result_ptr: *const OrientedBoundingBox = &result;
        let obb = OrientedBoundingBox::from_rectangle_into(Some(&rect), 0.0, 250.0, &Ellipsoid::WGS84, &mut result).unwrap();
        assert!(ptr::eq(obb, result_ptr));
        assert_eq!(*obb, fresh);
    }

    #[test]
    fn from_rectangle_rejects_wide_rectangles() {
        let rect = Rectangle::from_degrees(-100.0, 0.0, 100.0, 10.0);
        let err = OrientedBoundingBox::from_rectangle(Some(&rect), 0.0, 0.0, &Ellipsoid::WGS84).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidArgument(_)));
        assert!(OrientedBoundingBox::from_rectangle(None, 0.0, 0.0, &Ellipsoid::WGS84).is_err());
    }

    // ---------------------------------------------------------------------------------------------
    // intersect_plane

    /// Plane with local normal (nx, ny, nz) at signed distance `dist` from the center
    /// of the unit cube, carried through `axes` into world space.
    fn plane_normal_transform(center: Vector3, axes: &Matrix3, n: Vector3, dist: Float) -> Option<Plane> {
        let arbitrary = Vector3::new(357.0, 924.0, 258.0);
        let mut p0 = n.normalize() * -dist;
        let mut tangent = n.cross(arbitrary).normalize();
        let mut binormal = n.cross(tangent).normalize();

        p0 = *axes * p0;
        tangent = *axes * tangent;
        binormal = *axes * binormal;
        let normal = tangent.cross(binormal).normalize_or_zero();

        p0 += center;
        let d = -p0.dot(normal);
        if d.abs() > PLANE_DISTANCE_GUARD && normal.length_squared() > NORMAL_MAGNITUDE_GUARD {
            Some(Plane::new(normal, d))
        } else {
            None
        }
    }

    fn check_boundaries(obb: &OrientedBoundingBox, center: Vector3, axes: &Matrix3, normals: &[Vector3], radius: Float) {
        let cases = [
            (radius + BOUNDARY_MARGIN, Intersect::Inside),
            (radius - BOUNDARY_MARGIN, Intersect::Intersecting),
            (-radius + BOUNDARY_MARGIN, Intersect::Intersecting),
            (-radius - BOUNDARY_MARGIN, Intersect::Outside),
        ];
        for n in normals {
            for (dist, expected) in cases {
                if let Some(plane) = plane_normal_transform(center, axes, *n, dist) {
                    assert_eq!(obb.intersect_plane(&plane), expected, "normal {:?} at {}", n, dist);
                }
            }
        }
    }

    fn intersect_plane_corners_edges_faces(center: Vector3, axes: Matrix3) {
        let obb = OrientedBoundingBox::new(center, axes * 0.5);

        let faces = [
            Vector3::X, -Vector3::X, Vector3::Y, -Vector3::Y, Vector3::Z, -Vector3::Z,
        ];
        let mut edges = Vec::new();
        for (a, b) in [(Vector3::X, Vector3::Y), (Vector3::X, Vector3::Z), (Vector3::Y, Vector3::Z)] {
            for (sa, sb) in [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)] {
                edges.push(a * sa + b * sb);
            }
        }
        let mut corners = Vec::new();
        for sx in [1.0, -1.0] {
            for sy in [1.0, -1.0] {
                for sz in [1.0, -1.0] {
                    corners.push(Vector3::new(sx, sy, sz));
                }
            }
        }

        check_boundaries(&obb, center, &axes, &faces, 0.5);
        check_boundaries(&obb, center, &axes, &edges, SQRT1_2);
        check_boundaries(&obb, center, &axes, &corners, (0.75 as Float).sqrt());
    }

    #[test]
    fn intersect_plane_untransformed_box() {
        intersect_plane_corners_edges_faces(Vector3::ZERO, Matrix3::IDENTITY);
    }

    #[test]
    fn intersect_plane_off_center_box() {
        intersect_plane_corners_edges_faces(Vector3::new(1.0, 0.0, 0.0), Matrix3::IDENTITY);
        intersect_plane_corners_edges_faces(Vector3::new(0.7, -1.8, 12.0), Matrix3::IDENTITY);
    }

    #[test]
    fn intersect_plane_rotated_box() {
        intersect_plane_corners_edges_faces(Vector3::ZERO, rotation(Vector3::new(0.5, 1.5, -1.2), 1.2));
    }

    #[test]
    fn intersect_plane_scaled_box() {
        for scale in [
            Vector3::new(1.5, 0.4, 20.6),
            Vector3::new(0.0, 0.4, 20.6),
            Vector3::new(1.5, 0.0, 20.6),
            Vector3::new(1.5, 0.4, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
        ] {
            intersect_plane_corners_edges_faces(Vector3::ZERO, Matrix3::from_diagonal(scale));
        }
    }

    #[test]
    fn intersect_plane_arbitrary_box() {
        let m = Matrix3::from_diagonal(Vector3::new(1.5, 80.4, 2.6));
        let n = rotation(Vector3::new(0.5, 1.5, -1.2), 1.2);
        intersect_plane_corners_edges_faces(Vector3::new(-5.1, 0.0, 0.1), m * n);
    }

    #[test]
    fn intersect_plane_requires_box_and_plane() {
        let plane = Plane::new(Vector3::X, 0.0);
        let err = OrientedBoundingBox::try_intersect_plane(None, Some(&plane)).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidArgument(_)));

        let obb = OrientedBoundingBox::new(Vector3::ONE, Matrix3::ZERO);
        let err = OrientedBoundingBox::try_intersect_plane(Some(&obb), None).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidArgument(_)));

        assert_eq!(
            OrientedBoundingBox::try_intersect_plane(Some(&obb), Some(&plane)),
            Ok(Intersect::Inside)
        );
    }

    // ---------------------------------------------------------------------------------------------
    // clone / equals

    #[test]
    fn clone_without_result() {
        let obb = OrientedBoundingBox::default();
        let result = OrientedBoundingBox::clone_from_option(Some(&obb)).unwrap();
        assert!(!ptr::eq(&obb, &result));
        assert_eq!(obb, result);
    }

    #[test]
    fn clone_with_result() {
        let obb = OrientedBoundingBox::new(Vector3::new(1.0, 2.0, 3.0), Matrix3::IDENTITY);
        let mut result = OrientedBoundingBox::default();
        let result_ptr: *const OrientedBoundingBox = &result;

        let returned = OrientedBoundingBox::clone_option_into(Some(&obb), &mut result).unwrap();
        assert!(ptr::eq(returned, result_ptr));
        assert_eq!(*returned, obb);

        let mut other = OrientedBoundingBox::default();
        let other_ptr: *const OrientedBoundingBox = &other;
        assert!(ptr::eq(obb.clone_into_result(&mut other), other_ptr));
        assert_eq!(other, obb);
    }

    #[test]
    fn clone_of_nothing_is_nothing() {
        let mut result = OrientedBoundingBox::new(Vector3::ONE, Matrix3::IDENTITY);
        assert!(OrientedBoundingBox::clone_option_into(None, &mut result).is_none());
        assert_eq!(result, OrientedBoundingBox::new(Vector3::ONE, Matrix3::IDENTITY));
        assert!(OrientedBoundingBox::clone_from_option(None).is_none());
    }

    #[test]
    fn equals_in_all_cases() {
        let obb = OrientedBoundingBox::default();
        assert!(obb.equals(Some(&OrientedBoundingBox::default())));
        assert!(!obb.equals(None));
        assert!(!obb.equals(Some(&OrientedBoundingBox::new(Vector3::X, Matrix3::ZERO))));
        assert!(obb.equals_epsilon(&OrientedBoundingBox::new(Vector3::splat(1e-16), Matrix3::ZERO), EPSILON15));
    }

    // ---------------------------------------------------------------------------------------------
    // from_points

    #[test]
    fn points_empty_gives_default() {
        let mut result = OrientedBoundingBox::new(Vector3::ONE, Matrix3::IDENTITY);
        OrientedBoundingBox::from_points_into(&[], &mut result);
        assert_eq!(result, OrientedBoundingBox::default());
    }

    #[test]
    fn points_single_gives_point_box() {
        let p = Vector3::new(1.0, 2.0, 3.0);
        let obb = OrientedBoundingBox::from_points(&[p]);
        assert!(obb.center.abs_diff_eq(p, EPSILON15));
        assert!(obb.half_axes.abs_diff_eq(Matrix3::ZERO, EPSILON15));
    }

    fn column_lengths_sorted(m: &Matrix3) -> [Float; 3] {
        let mut lengths = [m.x_axis.length(), m.y_axis.length(), m.z_axis.length()];
        lengths.sort_by(|a, b| a.partial_cmp(b).unwrap());
        lengths
    }

    #[test]
    fn points_on_rotated_translated_axes() {
        let positions = [
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 3.0, 0.0),
            Vector3::new(0.0, 0.0, 4.0),
            Vector3::new(-2.0, 0.0, 0.0),
            Vector3::new(0.0, -3.0, 0.0),
            Vector3::new(0.0, 0.0, -4.0),
        ];
        let rotation = rotation(Vector3::new(0.3, -1.0, 0.8), 0.7);
        let translation = Vector3::new(-40.0, 12.5, 3.0);
        let points: Vec<Vector3> = positions.iter().map(|p| rotation * *p + translation).collect();

        let obb = OrientedBoundingBox::from_points(&points);
        assert!(obb.center.abs_diff_eq(translation, 1e-10));

        let lengths = column_lengths_sorted(&obb.half_axes);
        assert!((lengths[0] - 2.0).abs() < 1e-10);
        assert!((lengths[1] - 3.0).abs() < 1e-10);
        assert!((lengths[2] - 4.0).abs() < 1e-10);

        // Axes follow the rotated frame
        for local in [Vector3::X, Vector3::Y, Vector3::Z] {
            let world = rotation * local;
            let aligned = [obb.half_axes.x_axis, obb.half_axes.y_axis, obb.half_axes.z_axis]
                .iter()
                .any(|axis| (axis.normalize().dot(world).abs() - 1.0).abs() < 1e-10);
            assert!(aligned, "no box axis along {:?}", world);
        }
    }

    #[test]
    fn points_box_contains_random_cloud() {
        use rand::{Rng, SeedableRng, rngs::StdRng};

        let mut rng = StdRng::seed_from_u64(795);
        let frame = rotation(Vector3::new(-0.2, 0.9, 0.4), 2.1) * Matrix3::from_diagonal(Vector3::new(7.0, 1.0, 0.2));
        let points: Vec<Vector3> = (0..500)
            .map(|_| {
                let local = Vector3::new(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                );
                frame * local + Vector3::new(3.0, -1.0, 0.5)
            })
            .collect();

        let obb = OrientedBoundingBox::from_points(&points);
        for p in &points {
            assert!(obb.distance_squared_to(*p) < 1e-20, "point {:?} escapes the box", p);
        }

        let axes = obb.half_axes;
        assert!(axes.x_axis.dot(axes.y_axis).abs() < 1e-9);
        assert!(axes.x_axis.dot(axes.z_axis).abs() < 1e-9);
        assert!(axes.y_axis.dot(axes.z_axis).abs() < 1e-9);
    }

    // ---------------------------------------------------------------------------------------------
    // corners / distances

    #[test]
    fn corners_of_scaled_box() {
        let obb = OrientedBoundingBox::new(Vector3::new(1.0, 0.0, 0.0), Matrix3::from_diagonal(Vector3::new(1.0, 2.0, 3.0)));
        let corners = obb.compute_corners();
        assert_eq!(corners[0], Vector3::new(0.0, -2.0, -3.0));
        assert_eq!(corners[7], Vector3::new(2.0, 2.0, 3.0));
        for corner in corners {
            assert!(obb.distance_squared_to(corner) < EPSILON12);
        }
    }

    #[test]
    fn distance_squared_to_rotated_box() {
        let obb = OrientedBoundingBox::new(Vector3::ZERO, rotation(Vector3::Z, PI_OVER_FOUR));
        assert_eq!(obb.distance_squared_to(Vector3::new(0.1, 0.2, 0.3)), 0.0);

        // Corner of the rotated unit cube sits at (0, sqrt 2, 1)
        let d2 = obb.distance_squared_to(Vector3::new(0.0, SQRT_2 + 1.0, 1.0));
        assert!((d2 - 1.0).abs() < EPSILON12);
    }

    #[test]
    fn distance_squared_to_flat_box() {
        let obb = OrientedBoundingBox::new(Vector3::ZERO, Matrix3::from_diagonal(Vector3::new(1.0, 1.0, 0.0)));
        assert_eq!(obb.distance_squared_to(Vector3::new(0.5, 0.5, 2.0)), 4.0);
        assert_eq!(obb.distance_squared_to(Vector3::new(2.0, 0.0, 1.0)), 2.0);

        let point_box = OrientedBoundingBox::new(Vector3::X, Matrix3::ZERO);
        assert_eq!(point_box.distance_squared_to(Vector3::new(1.0, 3.0, 4.0)), 25.0);
    }

    #[test]
    fn plane_distances_along_view_direction() {
        let obb = OrientedBoundingBox::new(Vector3::new(0.0, 0.0, -10.0), Matrix3::IDENTITY);
        let distances = obb.compute_plane_distances(Vector3::ZERO, -Vector3::Z);
        assert_eq!(distances, Interval::new(9.0, 11.0));

        let diagonal = Vector3::new(1.0, 1.0, 0.0).normalize();
        let distances = OrientedBoundingBox::new(Vector3::ZERO, Matrix3::IDENTITY)
            .compute_plane_distances(Vector3::ZERO, diagonal);
        assert!((distances.max - SQRT_2).abs() < EPSILON15);
        assert!((distances.min + SQRT_2).abs() < EPSILON15);
    }
}
