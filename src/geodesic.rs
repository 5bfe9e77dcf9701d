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

//! The geodesic module contains functions for calculating the geodesic path
//! between two points on the surface of an ellipsoid.
//!
//! The inverse problem is solved with
//! [Vincenty's formulae](https://www.ngs.noaa.gov/PUBS_LIB/inverse.pdf).
//! They are accurate to well under a millimetre and converge in a handful of
//! iterations for the short distances measured in a trilateration survey.
//! Nearly antipodal positions may not converge at all, in which case a
//! `GeodesicConvergence` error is returned rather than a partial result.

#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::suboptimal_flops)]

use crate::ellipsoid::coefficients::{evaluate_vincenty_a, evaluate_vincenty_b};
use crate::Metres;
use crate::{Ellipsoid, Result, TrilaterationError};
use angle_sc::{Angle, Radians};
use unit_sphere::LatLong;

/// The maximum number of iterations to attempt.
pub const MAX_ITERATIONS: u32 = 200;

/// The longitude difference on the auxiliary sphere is converged when it
/// changes by less than this, about 0.006 mm on the ellipsoid.
pub const PRECISION: Radians = Radians(1e-12);

/// A solution to the inverse geodesic problem.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InverseSolution {
    /// The azimuth of the geodesic at the start position.
    pub azimuth: Angle,
    /// The azimuth from the finish position back towards the start position.
    pub back_azimuth: Angle,
    /// The length of the geodesic on the ellipsoid.
    pub distance: Metres,
    /// The number of iterations taken to converge.
    pub iterations: u32,
}

/// Calculate the azimuths and geodesic length (in metres) between a pair
/// of positions on the ellipsoid.
/// * `a`, `b` - the start and finish positions in geodetic coordinates.
/// * `ellipsoid` - the `Ellipsoid`.
///
/// returns the `InverseSolution` between the positions.
///
/// # Errors
///
/// Returns `TrilaterationError::GeodesicConvergence` if the iteration fails
/// to converge within `MAX_ITERATIONS`, or the positions are so close to
/// antipodal that the auxiliary sphere longitude leaves the range ±π.
///
/// # Examples
/// ```
/// use wgs84_trilateration::*;
/// use wgs84_trilateration::geodesic::calculate_azimuths_and_distance;
/// use angle_sc::is_within_tolerance;
///
/// // Vincenty's Flinders Peak to Buninyong example.
/// let flinders_peak = LatLong::new(Degrees(-37.951_033_416_666_67), Degrees(144.424_867_888_888_9));
/// let buninyong = LatLong::new(Degrees(-37.652_821_138_888_89), Degrees(143.926_495_527_777_8));
///
/// let solution = calculate_azimuths_and_distance(&flinders_peak, &buninyong, &WGS84_ELLIPSOID).unwrap();
/// assert!(is_within_tolerance(54_972.271, solution.distance.0, 2e-3));
/// ```
pub fn calculate_azimuths_and_distance(
    a: &LatLong,
    b: &LatLong,
    ellipsoid: &Ellipsoid,
) -> Result<InverseSolution> {
    calculate_inverse(a, b, ellipsoid, MAX_ITERATIONS)
}

/// Vincenty's inverse iteration, limited to `max_iterations`.
fn calculate_inverse(
    a: &LatLong,
    b: &LatLong,
    ellipsoid: &Ellipsoid,
    max_iterations: u32,
) -> Result<InverseSolution> {
    let f = ellipsoid.f();

    // project latitudes onto the auxiliary sphere
    let beta1 = ellipsoid.calculate_parametric_latitude(Angle::from(a.lat()));
    let beta2 = ellipsoid.calculate_parametric_latitude(Angle::from(b.lat()));
    let (sin_u1, cos_u1) = (beta1.sin().0, beta1.cos().0);
    let (sin_u2, cos_u2) = (beta2.sin().0, beta2.cos().0);

    // Longitude difference on the ellipsoid, in the range ±π
    let delta_long = Radians::from(Angle::from(b.lon() - a.lon())).0;

    let mut lambda = delta_long;
    let mut iterations = 0;
    loop {
        iterations += 1;
        if iterations > max_iterations {
            tracing::debug!(iterations, "geodesic inverse failed to converge");
            return Err(TrilaterationError::GeodesicConvergence {
                iterations: max_iterations,
            });
        }

        let (sin_lambda, cos_lambda) = (libm::sin(lambda), libm::cos(lambda));
        let sin_sigma = libm::hypot(
            cos_u2 * sin_lambda,
            cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda,
        );

        // coincident positions
        if sin_sigma == 0.0 {
            return Ok(InverseSolution {
                azimuth: Angle::default(),
                back_azimuth: Angle::default().opposite(),
                distance: Metres(0.0),
                iterations,
            });
        }

        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = libm::atan2(sin_sigma, cos_sigma);

        // Clairaut's constant, the sine of the azimuth at the Equator
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let sq_cos_alpha = (1.0 - sin_alpha) * (1.0 + sin_alpha);

        // cos_2sigma_m is zero on an equatorial geodesic
        let cos_2sigma_m = if sq_cos_alpha == 0.0 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / sq_cos_alpha
        };

        let c = f / 16.0 * sq_cos_alpha * (4.0 + f * (4.0 - 3.0 * sq_cos_alpha));
        let previous = lambda;
        lambda = delta_long
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if libm::fabs(lambda) > core::f64::consts::PI {
            tracing::debug!(iterations, "geodesic inverse positions are nearly antipodal");
            return Err(TrilaterationError::GeodesicConvergence { iterations });
        }

        if libm::fabs(lambda - previous) <= PRECISION.0 {
            let u2 = sq_cos_alpha * ellipsoid.ep_2();
            let big_a = evaluate_vincenty_a(u2);
            let big_b = evaluate_vincenty_b(u2);
            let sq_cos_2sigma_m = cos_2sigma_m * cos_2sigma_m;
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * sq_cos_2sigma_m)
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                                * (-3.0 + 4.0 * sq_cos_2sigma_m)));
            let distance = Metres(ellipsoid.b().0 * big_a * (sigma - delta_sigma));

            let (sin_lambda, cos_lambda) = (libm::sin(lambda), libm::cos(lambda));
            let azimuth = Angle::from_y_x(
                cos_u2 * sin_lambda,
                cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda,
            );
            let end_azimuth = Angle::from_y_x(
                cos_u1 * sin_lambda,
                -sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_lambda,
            );

            tracing::trace!(iterations, distance = distance.0, "geodesic inverse converged");
            return Ok(InverseSolution {
                azimuth,
                back_azimuth: end_azimuth.opposite(),
                distance,
                iterations,
            });
        }
    }
}
