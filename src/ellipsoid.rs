/*

    Ellipsoid of revolution (or triaxial) centered at the origin
    and geographic positions on it.

    Only the conversions the box constructors need are provided:
    cartographic -> cartesian, geodetic surface normals and
    scaling a point onto the surface along its geodetic normal.

    @date: 14 Nov, 2025
    @author: bartu
*/

use crate::prelude::*;

/// Longitude and latitude in radians, height in metres above the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cartographic {
    pub longitude: Float,
    pub latitude: Float,
    pub height: Float,
}

impl Cartographic {
    pub fn new(longitude: Float, latitude: Float, height: Float) -> Self {
        Self { longitude, latitude, height }
    }

    pub fn from_degrees(longitude: Float, latitude: Float, height: Float) -> Self {
        Self::new(longitude.to_radians(), latitude.to_radians(), height)
    }

    pub fn with_height(mut self, height: Float) -> Self {
        self.height = height;
        self
    }
}

// Below this squared (radii-normalized) norm the Newton iteration in
// scale_to_geodetic_surface does not converge reliably
const CENTER_TOLERANCE_SQUARED: Float = EPSILON1;

// Newton converges in a handful of steps for any finite point off the center
const MAX_NEWTON_ITERATIONS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    radii: Vector3,
    radii_squared: Vector3,
    one_over_radii_squared: Vector3,
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

impl Ellipsoid {
    pub const WGS84: Self = Self::from_radii(6378137.0, 6378137.0, 6356752.3142451793);
    pub const UNIT_SPHERE: Self = Self::from_radii(1.0, 1.0, 1.0);

    const fn from_radii(x: Float, y: Float, z: Float) -> Self {
        Self {
            radii: Vector3::new(x, y, z),
            radii_squared: Vector3::new(x * x, y * y, z * z),
            one_over_radii_squared: Vector3::new(1.0 / (x * x), 1.0 / (y * y), 1.0 / (z * z)),
        }
    }

    pub fn new(radii: Vector3) -> Self {
        debug_assert!(radii.min_element() > 0.0, "ellipsoid radii must be positive");
        Self::from_radii(radii.x, radii.y, radii.z)
    }

    pub fn radii(&self) -> Vector3 {
        self.radii
    }

    pub fn geodetic_surface_normal_cartographic(&self, cartographic: &Cartographic) -> Vector3 {
        let cos_latitude = cartographic.latitude.cos();
        Vector3::new(
            cos_latitude * cartographic.longitude.cos(),
            cos_latitude * cartographic.longitude.sin(),
            cartographic.latitude.sin(),
        )
        .normalize()
    }

    /// Normal of the surface through `cartesian`; zero at the center.
    pub fn geodetic_surface_normal(&self, cartesian: Vector3) -> Vector3 {
        (cartesian * self.one_over_radii_squared).normalize_or_zero()
    }

    pub fn cartographic_to_cartesian(&self, cartographic: &Cartographic) -> Vector3 {
        let n = self.geodetic_surface_normal_cartographic(cartographic);
        let k = self.radii_squared * n;
        let gamma = n.dot(k).sqrt();
        k / gamma + n * cartographic.height
    }

    /// Moves `cartesian` along the geodetic normal onto the surface.
    /// Returns None when the point sits at the center, where no normal exists,
    /// is not finite, or the iteration fails to converge.
    pub fn scale_to_geodetic_surface(&self, cartesian: Vector3) -> Option<Vector3> {
        if !cartesian.is_finite() {
            warn!("Cannot scale non-finite point {:?} to the ellipsoid surface", cartesian);
            return None;
        }

        let p2 = cartesian * cartesian * self.one_over_radii_squared;
        let squared_norm = p2.x + p2.y + p2.z;
        let ratio = (1.0 / squared_norm).sqrt();

        // Initial guess: intersection of the ray from the center
        let intersection = cartesian * ratio;
        if squared_norm < CENTER_TOLERANCE_SQUARED {
            return if ratio.is_finite() { Some(intersection) } else { None };
        }

        let gradient = intersection * self.one_over_radii_squared * 2.0;
        let mut lambda = (1.0 - ratio) * cartesian.length() / (0.5 * gradient.length());
        let mut correction = 0.0;
        let ors = self.one_over_radii_squared;

        // Newton iteration on the Lagrange multiplier
        for _ in 0..MAX_NEWTON_ITERATIONS {
            lambda -= correction;
            let multiplier = Vector3::new(
                1.0 / (1.0 + lambda * ors.x),
                1.0 / (1.0 + lambda * ors.y),
                1.0 / (1.0 + lambda * ors.z),
            );
            let multiplier2 = multiplier * multiplier;
            let multiplier3 = multiplier2 * multiplier;

            let func = (p2 * multiplier2).element_sum() - 1.0;
            let denominator = (p2 * multiplier3 * ors).element_sum();
            let derivative = -2.0 * denominator;
            correction = func / derivative;

            if func.abs() <= EPSILON12 {
                return Some(cartesian * multiplier);
            }
        }

        warn!("Scaling {:?} to the ellipsoid surface did not converge", cartesian);
        None
    }
}
