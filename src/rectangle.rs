/*

    Declare 2D rectangles consumed by the box constructors.

    - BoundingRectangle: planar axis aligned rectangle given by
      its min corner (x, y) and its width and height.
    - Rectangle: geographic rectangle in radians. East may be
      smaller than west when the rectangle crosses the antimeridian.

    @date: 14 Nov, 2025
    @author: bartu
*/

use crate::prelude::*;
use crate::ellipsoid::Cartographic;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingRectangle {
    pub x: Float,
    pub y: Float,
    pub width: Float,
    pub height: Float,
}

impl BoundingRectangle {
    pub fn new(x: Float, y: Float, width: Float, height: Float) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_min_max(min: Vector2, max: Vector2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn min(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vector2 {
        Vector2::new(self.x + self.width, self.y + self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rectangle {
    pub west: Float,
    pub south: Float,
    pub east: Float,
    pub north: Float,
}

impl Rectangle {
    pub fn new(west: Float, south: Float, east: Float, north: Float) -> Self {
        Self { west, south, east, north }
    }

    pub fn from_degrees(west: Float, south: Float, east: Float, north: Float) -> Self {
        Self::new(west.to_radians(), south.to_radians(), east.to_radians(), north.to_radians())
    }

    /// Longitudinal span, accounting for antimeridian crossing.
    pub fn width(&self) -> Float {
        let east = if self.east < self.west { self.east + TWO_PI } else { self.east };
        east - self.west
    }

    pub fn height(&self) -> Float {
        self.north - self.south
    }

    pub fn spans_antimeridian(&self) -> bool {
        self.east < self.west
    }

    /// Center on the surface; longitude wrapped into [-PI, PI].
    pub fn center(&self) -> Cartographic {
        let east = if self.east < self.west { self.east + TWO_PI } else { self.east };
        let longitude = negative_pi_to_pi((self.west + east) * 0.5);
        let latitude = (self.south + self.north) * 0.5;
        Cartographic::new(longitude, latitude, 0.0)
    }
}
