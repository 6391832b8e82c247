/*

    Declare the perspective Camera whose view frustum is
    turned into a six plane CullingVolume.

    Basis follows the usual convention:
        w: backward (-gaze)
        u: right
        v: corrected up

    @date: Oct, 2025
    @author: bartu
*/

use crate::prelude::*;
use crate::culling::CullingVolume;
use crate::json_parser::{deser_float, deser_vec3};
use crate::plane::Plane;

#[derive(Debug, Deserialize, Clone)]
#[derive(SmartDefault)]
#[serde(default)]
pub struct Camera {
    #[default = ""]
    _type: String,

    #[serde(rename = "Position", deserialize_with = "deser_vec3")]
    position: Vector3,

    #[default(Vector3::NEG_Z)]
    #[serde(rename = "Gaze", deserialize_with = "deser_vec3")]
    gaze_dir: Vector3,

    #[serde(rename = "GazePoint", deserialize_with = "deser_vec3")]
    gaze_point: Vector3, // To be used if _type = "lookAt"

    #[default(Vector3::Y)]
    #[serde(rename = "Up", deserialize_with = "deser_vec3")]
    up: Vector3,

    /// Vertical field of view in degrees
    #[default = 60.0]
    #[serde(rename = "FovY", deserialize_with = "deser_float")]
    fovy: Float,

    /// Width over height
    #[default = 1.0]
    #[serde(rename = "Aspect", deserialize_with = "deser_float")]
    aspect: Float,

    #[default = 1.0]
    #[serde(rename = "NearDistance", deserialize_with = "deser_float")]
    near_distance: Float,

    #[default = 1000.0]
    #[serde(rename = "FarDistance", deserialize_with = "deser_float")]
    far_distance: Float,

    #[serde(skip)]
    w : Vector3,

    #[serde(skip)]
    v : Vector3,

    #[serde(skip)]
    u : Vector3,
}

impl Camera {
    pub fn new(position: Vector3, gaze: Vector3, up: Vector3, fovy: Float, aspect: Float, near_distance: Float, far_distance: Float) -> Self {
        let mut cam = Camera {
            position,
            gaze_dir: gaze,
            up,
            fovy,
            aspect,
            near_distance,
            far_distance,
            ..Default::default()
        };
        cam.setup();
        cam
    }

    pub fn setup(&mut self) {
        // Compute w, v, u vectors
        // corrects Up vector if given Up was not perpendicular to
        // Gaze vector.
        if self._type == "lookAt" {
            info!("Found camera _type = lookAt, using gaze point...");
            self.gaze_dir = self.gaze_point - self.position;
        }

        if self.near_distance >= self.far_distance {
            warn!("Camera near distance {} is not in front of far distance {}", self.near_distance, self.far_distance);
        }

        self.w = match self.gaze_dir.try_normalize() {
            Some(gaze) => -gaze,
            None => {
                warn!("Camera gaze {:?} has no direction, looking down -Z instead", self.gaze_dir);
                Vector3::Z
            }
        };
        self.u = match self.up.cross(self.w).try_normalize() {
            Some(u) => u,
            None => {
                warn!("Camera up {:?} is parallel to gaze {:?}, picking an arbitrary right vector", self.up, -self.w);
                self.w.any_orthonormal_vector()
            }
        };
        self.v = self.w.cross(self.u).normalize(); // directly use corrected up

        debug_assert!(approx_zero(self.u.dot(self.w)));
        debug_assert!(approx_zero(self.v.dot(self.w)));
        debug_assert!(approx_zero(self.v.dot(self.u)));
        debug!("Camera position {:?}, gaze {:?}", self.position, -self.w);
    }

    pub fn get_direction(&self) -> Vector3 {
        -self.w
    }

    /// Frustum planes with inward normals, ordered
    /// [left, right, bottom, top, near, far].
    pub fn culling_volume(&self) -> CullingVolume {
        let direction = self.get_direction();
        let (u, v) = (self.u, self.v);

        // Half extents of the near plane
        let top = self.near_distance * (self.fovy.to_radians() / 2.0).tan();
        let right = top * self.aspect;
        let near_center = direction * self.near_distance;

        let left_normal = (near_center - u * right).cross(v).normalize();
        let right_normal = v.cross(near_center + u * right).normalize();
        let bottom_normal = u.cross(near_center - v * top).normalize();
        let top_normal = (near_center + v * top).cross(u).normalize();

        let eye = self.position;
        CullingVolume::new(vec![
            Plane::from_point_normal(eye, left_normal),
            Plane::from_point_normal(eye, right_normal),
            Plane::from_point_normal(eye, bottom_normal),
            Plane::from_point_normal(eye, top_normal),
            Plane::from_point_normal(eye + near_center, direction),
            Plane::from_point_normal(eye + direction * self.far_distance, -direction),
        ])
    }
}
