use std::f64::consts::{PI, TAU};

use crate::foundation::core::Vec2;

/// `magnitude * (cos angle, sin angle)`.
#[inline]
pub(crate) fn polar(magnitude: f64, angle: f64) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(magnitude * c, magnitude * s)
}

/// Three-valued sign: `-1`, `0` or `1`. Unlike `f64::signum`, zero maps to zero.
#[inline]
pub(crate) fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Wrap an angle into `(-PI, PI]`.
pub(crate) fn wrap_angle(angle: f64) -> f64 {
    let mut a = angle.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
