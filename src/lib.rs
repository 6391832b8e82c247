pub mod numeric;
pub mod interval;
pub mod error;
pub mod plane;
pub mod rectangle;
pub mod ellipsoid;
pub mod tangent_plane;
pub mod geometry;
pub mod obb;
pub mod culling;
pub mod camera;
pub mod scene;
pub mod json_structs;
pub mod json_parser;

pub mod prelude;
