/*

    Declare CullingScene consisting of an optional camera,
    explicit culling planes and the volumes to classify.

    Every volume entry carries a "_type" naming how its
    box is derived:
        - BoundingRectangle: "x y width height", Rotation in degrees
        - TangentRectangle:  "west south east north" in degrees projected
                             on the tangent plane at Origin
        - Rectangle:         same, tangent plane at the rectangle center
        - Points:            list of points
        - Box:               explicit Center and three HalfAxes

    @date: 2 Oct, 2025
    @author: Bartu
*/

use crate::prelude::*;
use crate::camera::Camera;
use crate::culling::CullingVolume;
use crate::json_parser::{deser_float, deser_float_array, deser_opt_float, deser_usize, deser_vec3, deser_vecvec3};
use crate::json_structs::{EllipsoidJSON, PlaneJSON, SingleOrVec};
use crate::obb::OrientedBoundingBox;
use crate::rectangle::{BoundingRectangle, Rectangle};
use crate::tangent_plane::EllipsoidTangentPlane;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CullingScene {
    #[serde(rename = "Camera")]
    pub camera: Option<Camera>,

    #[serde(rename = "Planes")]
    pub planes: SingleOrVec<PlaneJSON>,

    #[serde(rename = "Volumes")]
    pub volumes: SingleOrVec<Volume>,
}

impl CullingScene {
    pub fn setup(&mut self) {
        // Implement required adjustments after loading from a JSON file
        if let Some(camera) = self.camera.as_mut() {
            camera.setup();
        } else {
            debug!("No camera found, culling with explicit planes only.");
        }
        info!(">> There are {} volumes and {} explicit planes in the scene.", self.volumes.len(), self.planes.len());
    }

    /// Camera frustum planes (if any) followed by the explicit planes.
    pub fn culling_volume(&self) -> GeoResult<CullingVolume> {
        let mut volume = self.camera.as_ref().map(Camera::culling_volume).unwrap_or_default();
        for plane in self.planes.as_slice() {
            volume.planes.push(plane.to_plane()?);
        }

        if volume.is_empty() {
            warn!("Scene has neither a camera nor planes, every volume will be visible");
        }
        Ok(volume)
    }

    /// Derives the box of every volume, in file order.
    pub fn build_boxes(&self) -> GeoResult<Vec<OrientedBoundingBox>> {
        let span = tracing::span!(tracing::Level::INFO, "build_volumes");
        let _enter = span.enter();

        let volumes = self.volumes.as_slice();
        let mut boxes = vec![OrientedBoundingBox::default(); volumes.len()];
        for (volume, obb) in volumes.iter().zip(boxes.iter_mut()) {
            if let Err(e) = volume.build_into(obb) {
                error!("Volume {} ({}) could not be built: {}", volume.id(), volume.kind(), e);
                return Err(e);
            }
            debug!("Volume {} ({}) -> {:?}", volume.id(), volume.kind(), obb);
        }
        Ok(boxes)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "_type")]
pub enum Volume {
    BoundingRectangle(BoundingRectangleVolume),
    TangentRectangle(TangentRectangleVolume),
    Rectangle(RectangleVolume),
    Points(PointsVolume),
    Box(BoxVolume),
}

impl Volume {
    pub fn id(&self) -> usize {
        match self {
            Volume::BoundingRectangle(v) => v.id,
            Volume::TangentRectangle(v) => v.id,
            Volume::Rectangle(v) => v.id,
            Volume::Points(v) => v.id,
            Volume::Box(v) => v.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Volume::BoundingRectangle(_) => "BoundingRectangle",
            Volume::TangentRectangle(_) => "TangentRectangle",
            Volume::Rectangle(_) => "Rectangle",
            Volume::Points(_) => "Points",
            Volume::Box(_) => "Box",
        }
    }

    pub fn build_into<'a>(&self, result: &'a mut OrientedBoundingBox) -> GeoResult<&'a mut OrientedBoundingBox> {
        match self {
            Volume::BoundingRectangle(v) => {
                let [x, y, width, height] = v.rectangle;
                let rectangle = BoundingRectangle::new(x, y, width, height);
                OrientedBoundingBox::from_bounding_rectangle_into(Some(&rectangle), v.rotation.map(Float::to_radians), result)
            }
            Volume::TangentRectangle(v) => {
                let tangent_plane = EllipsoidTangentPlane::new(v.origin, v.ellipsoid.0)?;
                OrientedBoundingBox::from_rectangle_tangent_plane_into(
                    Some(&rectangle_from_degrees(&v.rectangle)),
                    Some(&tangent_plane),
                    v.minimum_height,
                    v.maximum_height,
                    result,
                )
            }
            Volume::Rectangle(v) => OrientedBoundingBox::from_rectangle_into(
                Some(&rectangle_from_degrees(&v.rectangle)),
                v.minimum_height,
                v.maximum_height,
                &v.ellipsoid.0,
                result,
            ),
            Volume::Points(v) => {
                if v.points.is_empty() {
                    warn!("Points volume {} is empty, using a zero box", v.id);
                }
                Ok(OrientedBoundingBox::from_points_into(&v.points, result))
            }
            Volume::Box(v) => {
                let [u, w, z] = v.half_axes.as_slice() else {
                    return Err(GeometryError::InvalidArgument("box needs exactly three half axes"));
                };
                result.center = v.center;
                result.half_axes = Matrix3::from_cols(*u, *w, *z);
                Ok(result)
            }
        }
    }
}

fn rectangle_from_degrees(wsen: &[Float; 4]) -> Rectangle {
    let [west, south, east, north] = *wsen;
    Rectangle::from_degrees(west, south, east, north)
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct BoundingRectangleVolume {
    #[serde(rename = "_id", deserialize_with = "deser_usize")]
    pub id: usize,

    /// x y width height
    #[serde(rename = "Rectangle", deserialize_with = "deser_float_array")]
    pub rectangle: [Float; 4],

    /// Degrees about +Z, around the min corner
    #[serde(rename = "Rotation", deserialize_with = "deser_opt_float")]
    pub rotation: Option<Float>,
}

#[derive(Debug, Deserialize, Clone, SmartDefault)]
#[serde(default)]
pub struct TangentRectangleVolume {
    #[serde(rename = "_id", deserialize_with = "deser_usize")]
    pub id: usize,

    /// west south east north, in degrees
    #[serde(rename = "Rectangle", deserialize_with = "deser_float_array")]
    pub rectangle: [Float; 4],

    #[default(Vector3::X)]
    #[serde(rename = "Origin", deserialize_with = "deser_vec3")]
    pub origin: Vector3,

    #[serde(rename = "Ellipsoid")]
    pub ellipsoid: EllipsoidJSON,

    #[serde(rename = "MinimumHeight", deserialize_with = "deser_float")]
    pub minimum_height: Float,

    #[serde(rename = "MaximumHeight", deserialize_with = "deser_float")]
    pub maximum_height: Float,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RectangleVolume {
    #[serde(rename = "_id", deserialize_with = "deser_usize")]
    pub id: usize,

    /// west south east north, in degrees
    #[serde(rename = "Rectangle", deserialize_with = "deser_float_array")]
    pub rectangle: [Float; 4],

    #[serde(rename = "Ellipsoid")]
    pub ellipsoid: EllipsoidJSON,

    #[serde(rename = "MinimumHeight", deserialize_with = "deser_float")]
    pub minimum_height: Float,

    #[serde(rename = "MaximumHeight", deserialize_with = "deser_float")]
    pub maximum_height: Float,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PointsVolume {
    #[serde(rename = "_id", deserialize_with = "deser_usize")]
    pub id: usize,

    #[serde(rename = "Points", deserialize_with = "deser_vecvec3")]
    pub points: Vec<Vector3>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct BoxVolume {
    #[serde(rename = "_id", deserialize_with = "deser_usize")]
    pub id: usize,

    #[serde(rename = "Center", deserialize_with = "deser_vec3")]
    pub center: Vector3,

    /// Three columns
    #[serde(rename = "HalfAxes", deserialize_with = "deser_vecvec3")]
    pub half_axes: Vec<Vector3>,
}
