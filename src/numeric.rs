/*

    Declare numeric types used throughout this repo.

    Everything runs in f64. Tangent plane fixtures are compared
    against 1e-15, which f32 cannot hold.

    Named epsilons follow the usual EPSILON<n> = 1e-<n> scheme
    so guard conditions never carry bare literals.

    @date: 2 Oct, 2025
    @author: Bartu
*/

use bevy_math::{DMat3, DQuat, DVec2, DVec3};

pub type Float = f64; // WARNING: If you want to change it to f32, don't forget to update Vector and Matrix types
pub type Vector2 = DVec2;
pub type Vector3 = DVec3;
pub type Matrix3 = DMat3;
pub type Quaternion = DQuat;

pub const EPSILON1: Float = 1e-1;
pub const EPSILON6: Float = 1e-6;
pub const EPSILON8: Float = 1e-8;
pub const EPSILON12: Float = 1e-12;
pub const EPSILON14: Float = 1e-14;
pub const EPSILON15: Float = 1e-15;

pub const PI: Float = std::f64::consts::PI;
pub const TWO_PI: Float = 2.0 * PI;
pub const PI_OVER_TWO: Float = std::f64::consts::FRAC_PI_2;
pub const PI_OVER_FOUR: Float = std::f64::consts::FRAC_PI_4;

pub fn approx_zero(x: Float) -> bool {
    x.abs() < EPSILON8
}

/// Absolute-or-relative comparison, whichever is looser.
pub fn equals_epsilon(left: Float, right: Float, epsilon: Float) -> bool {
    let diff = (left - right).abs();
    diff <= epsilon || diff <= epsilon * left.abs().max(right.abs())
}

/// Wraps an angle into [-PI, PI].
pub fn negative_pi_to_pi(angle: Float) -> Float {
    if angle >= -PI && angle <= PI {
        return angle;
    }
    zero_to_two_pi(angle + PI) - PI
}

/// Wraps an angle into [0, 2PI]; nonzero multiples of 2PI map to 2PI.
pub fn zero_to_two_pi(angle: Float) -> Float {
    let m = angle.rem_euclid(TWO_PI);
    if m.abs() < EPSILON14 && angle.abs() > EPSILON14 {
        return TWO_PI;
    }
    m
}

/// Scales every column of `mat` by the matching component of `scale`.
pub fn scale_columns(mat: &Matrix3, scale: Vector3) -> Matrix3 {
    Matrix3::from_cols(mat.x_axis * scale.x, mat.y_axis * scale.y, mat.z_axis * scale.z)
}
