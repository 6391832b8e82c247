/*

    Declare data structs needed to parse JSON.

    - SingleOrVec
    - PlaneJSON: explicit culling plane
    - EllipsoidJSON: named ellipsoid or explicit radii

    @date: 13 Oct, 2025
    @author: Bartu
*/

use serde::Deserialize;
use std::str::FromStr;

use crate::ellipsoid::Ellipsoid;
use crate::json_parser::{deser_float, deser_vec3, parse_vec3_str};
use crate::numeric::{Float, Vector3};
use crate::error::{GeometryError, GeoResult};
use crate::plane::Plane;

// To handle JSON file having a single <object>
// or an array of <object>s
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum SingleOrVec<T> {
    Empty,
    Single(T),
    Multiple(Vec<T>),
}

impl<T> SingleOrVec<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            SingleOrVec::Empty => &[],
            SingleOrVec::Single(t) => std::slice::from_ref(t),
            SingleOrVec::Multiple(vec) => vec.as_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<T> Default for SingleOrVec<T> {
    fn default() -> Self {
        SingleOrVec::Empty
    }
}

/// Plane given as `normal . p + distance = 0`; the normal need not be unit length.
#[derive(Debug, Deserialize, Clone)]
pub struct PlaneJSON {
    #[serde(rename = "Normal", deserialize_with = "deser_vec3")]
    pub normal: Vector3,

    #[serde(rename = "Distance", deserialize_with = "deser_float")]
    pub distance: Float,
}

impl PlaneJSON {
    /// Scales the equation so the normal is unit length.
    pub fn to_plane(&self) -> GeoResult<Plane> {
        let length = self.normal.length();
        if length == 0.0 || !length.is_finite() {
            return Err(GeometryError::InvalidArgument("plane normal must be non-zero"));
        }
        Plane::try_new(self.normal / length, self.distance / length)
    }
}

/// "WGS84", "UnitSphere" or radii as "a b c".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EllipsoidJSON(pub Ellipsoid);

impl FromStr for EllipsoidJSON {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "WGS84" | "wgs84" => Ok(Self(Ellipsoid::WGS84)),
            "UnitSphere" | "unit_sphere" => Ok(Self(Ellipsoid::UNIT_SPHERE)),
            other => {
                let radii: Vector3 = parse_vec3_str(other)?;
                if radii.min_element() <= 0.0 {
                    return Err(format!("Ellipsoid radii must be positive, found '{}'", other));
                }
                Ok(Self(Ellipsoid::new(radii)))
            }
        }
    }
}

impl<'de> Deserialize<'de> for EllipsoidJSON {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
