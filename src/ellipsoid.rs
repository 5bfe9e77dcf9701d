// Copyright (c) 2025 Ken Barker

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! The ellipsoid module contains types and functions for defining an ellipsoid
//! given its Semimajor axis (the equivalent of its radius) and flattening ratio,
//! together with the auxiliary latitudes used by the geodesic and projection
//! calculations.

#![allow(clippy::suboptimal_flops)]

pub mod coefficients;
pub mod wgs84;

use crate::Metres;
use angle_sc::Angle;

/// Calculate the Semiminor axis of an ellipsoid.
/// * `a` - the Semimajor axis of an ellipsoid.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use wgs84_trilateration::Metres;
/// use wgs84_trilateration::ellipsoid::{calculate_minor_axis, wgs84};
///
/// // The WGS 84 Semiminor axis measured in metres.
/// let b : Metres = Metres(6_356_752.314_245_179);
/// assert_eq!(b, calculate_minor_axis(wgs84::A, wgs84::F));
/// ```
#[must_use]
pub fn calculate_minor_axis(a: Metres, f: f64) -> Metres {
    Metres(a.0 * (1.0 - f))
}

/// Calculate the square of the Eccentricity of an ellipsoid.
/// * `f` - the flattening ratio.
#[must_use]
pub fn calculate_sq_eccentricity(f: f64) -> f64 {
    f * (2.0 - f)
}

/// Calculate the square of the second Eccentricity of an ellipsoid.
/// * `f` - the flattening ratio.
#[must_use]
pub fn calculate_sq_2nd_eccentricity(f: f64) -> f64 {
    let one_minus_f = 1.0 - f;
    calculate_sq_eccentricity(f) / (one_minus_f * one_minus_f)
}

/// Calculate the third flattening of an ellipsoid.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use wgs84_trilateration::ellipsoid::{calculate_3rd_flattening, wgs84};
///
/// // The WGS 84 3rd flattening.
/// assert_eq!(0.0016792203863837047, calculate_3rd_flattening(wgs84::F));
/// ```
#[must_use]
pub fn calculate_3rd_flattening(f: f64) -> f64 {
    f / (2.0 - f)
}

/// Function to convert a `geodetic` Latitude to a `parametric` Latitude on the
/// auxiliary sphere.
/// * `lat` - the `geodetic` Latitude
/// * `one_minus_f` - one minus the flattening ratio.
#[must_use]
pub fn calculate_parametric_latitude(lat: Angle, one_minus_f: f64) -> Angle {
    Angle::from_y_x(one_minus_f * lat.sin().0, lat.cos().0)
}

/// Evaluate `e * atanh(e * x)`, the term relating geodetic and conformal
/// latitudes.
/// * `x` - the sine of the latitude.
/// * `e` - the Eccentricity of the ellipsoid.
#[must_use]
fn e_atanh_e(x: f64, e: f64) -> f64 {
    e * libm::atanh(e * x)
}

/// Convert the tangent of a `geodetic` Latitude to the tangent of the
/// `conformal` Latitude.
///
/// CFF Karney, [Transverse Mercator with an accuracy of a few nanometers](https://arxiv.org/pdf/1002.1417.pdf)
/// Eqs 7 & 9.
/// * `tau` - the tangent of the `geodetic` Latitude.
/// * `e` - the Eccentricity of the ellipsoid.
///
/// returns the tangent of the `conformal` Latitude.
#[must_use]
pub fn calculate_conformal_tau(tau: f64, e: f64) -> f64 {
    if tau.is_finite() {
        let tau1 = libm::hypot(1.0, tau);
        let sigma = libm::sinh(e_atanh_e(tau / tau1, e));
        libm::hypot(1.0, sigma) * tau - sigma * tau1
    } else {
        tau
    }
}

/// Convert the tangent of a `conformal` Latitude back to the tangent of the
/// `geodetic` Latitude.
///
/// There is no closed form for the inverse, so it is solved by Newton's
/// method, Karney Eqs 19-21. Starting from `taup / (1 - e²)` it converges in
/// two or three iterations for every latitude short of the poles, the loop is
/// capped at `MAX_ITERATIONS`.
/// * `taup` - the tangent of the `conformal` Latitude.
/// * `e` - the Eccentricity of the ellipsoid.
///
/// returns the tangent of the `geodetic` Latitude.
#[must_use]
pub fn calculate_geodetic_tau(taup: f64, e: f64) -> f64 {
    const MAX_ITERATIONS: u32 = 5;
    const TAU_MAX: f64 = 2.0 / 1.490_116_119_384_765_6e-8; // 2 / sqrt(EPSILON)
    let tolerance = 0.1 * 1.490_116_119_384_765_6e-8 * libm::fmax(1.0, libm::fabs(taup));

    let e2m = 1.0 - e * e;
    let mut tau = if libm::fabs(taup) > 70.0 {
        taup * libm::exp(e_atanh_e(1.0, e))
    } else {
        taup / e2m
    };
    if libm::fabs(tau) >= TAU_MAX || tau.is_nan() {
        return tau;
    }

    for _ in 0..MAX_ITERATIONS {
        let taupa = calculate_conformal_tau(tau, e);
        let delta_tau = (taup - taupa) * (1.0 + e2m * tau * tau)
            / (e2m * libm::hypot(1.0, tau) * libm::hypot(1.0, taupa));
        tau += delta_tau;
        if libm::fabs(delta_tau) < tolerance {
            break;
        }
    }
    tau
}
