/*

    Closed range [min, max] on the real line.

    Used to accumulate projected extents while fitting
    boxes, and to report near/far distances of a box
    along a view direction.

    See also Interval::EMPTY: (inf, -inf), the identity for expand( )

    @author: Bartu
    @date: Sept 2025

*/

use crate::numeric::Float;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: Float,
    pub max: Float,
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Interval {

    pub const EMPTY: Self = Self {
        min: Float::INFINITY,
        max: Float::NEG_INFINITY,
    };

    pub fn new(min: Float, max: Float) -> Self {
        Self {
            min,
            max,
        }
    }

    /// Smallest interval holding every value of the iterator.
    pub fn enclosing<I: IntoIterator<Item = Float>>(values: I) -> Self {
        let mut interval = Self::EMPTY;
        for x in values {
            interval.expand(x);
        }
        interval
    }

    pub fn half_size(&self) -> Float {
        (self.max - self.min) * 0.5
    }

    pub fn midpoint(&self) -> Float {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, x: Float) -> bool {
        self.min <= x && x <= self.max
    }

    pub fn expand(&mut self, x: Float) {
        if x < self.min { self.min = x; }
        if x > self.max { self.max = x; }
    }

}
