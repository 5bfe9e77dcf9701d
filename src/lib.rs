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

//! wgs84-trilateration
//!
//! A library for locating a position on the
//! [WGS-84](https://www.icao.int/NACC/Documents/Meetings/2014/ECARAIM/REF08-Doc9674.pdf)
//! ellipsoid from its distances to two known positions.
//!
//! ## Trilateration
//!
//! The positions at given distances from two known positions are the
//! intersections of two small circles on the ellipsoid. Over survey distances
//! of tens to hundreds of metres, the circles are found on a local plane:
//!
//! 1. both known positions are projected onto a transverse Mercator plane with
//!    its origin at the first position,
//! 2. the distances are the radii of circles about the projected positions,
//!    which intersect in zero, one or two points,
//! 3. the intersection points are converted back to geodetic coordinates,
//! 4. and their geodesic distances to the known positions are calculated to
//!    verify them.
//!
//! ## Design
//!
//! The `Ellipsoid` class represents an ellipsoid of revolution.
//! The static `WGS84_ELLIPSOID` represents the WGS-84 `Ellipsoid` which is used
//! by `calculate_trilateration` and `calculate_geodesic_inverse`.
//!
//! Geodesic distances and azimuths are calculated with
//! [Vincenty's inverse formula](https://en.wikipedia.org/wiki/Vincenty%27s_formulae),
//! the local plane is a transverse Mercator projection using the Krüger series
//! described by Charles Karney in
//! [Transverse Mercator with an accuracy of a few nanometers](https://arxiv.org/pdf/1002.1417.pdf).
//!
//! The library depends upon the following crates:
//!
//! - [angle-sc](https://crates.io/crates/angle-sc) - to define `Angle`,
//!   `Degrees` and `Radians` and perform trigonometric calculations;
//! - [unit-sphere](https://crates.io/crates/unit-sphere) - to define `LatLong`;
//! - [icao_units](https://crates.io/crates/icao-units) - to define `Metres`.
//!
//! The library is declared [no_std](https://docs.rust-embedded.org/book/intro/no-std.html)
//! so it can be used in embedded applications.

#![cfg_attr(not(test), no_std)]

extern crate angle_sc;
extern crate icao_units;
extern crate unit_sphere;

pub mod dms;
pub mod ellipsoid;
pub mod geodesic;
pub mod intersection;
pub mod projection;
pub mod trilateration;

pub use angle_sc::{Angle, Degrees, Radians, Validate};
pub use icao_units::si::Metres;
pub use unit_sphere::LatLong;

pub use dms::Dms;
pub use geodesic::InverseSolution;
pub use intersection::{Circle, PlanarPoint};
pub use projection::LocalProjection;
pub use trilateration::{Solution, Trilateration, TrilaterationInput, Verification};

use once_cell::sync::Lazy;

/// The errors returned by the library.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum TrilaterationError {
    /// The circles about the known positions do not intersect.
    #[error("no intersection: centres {separation} m apart, radii {radius1} m and {radius2} m")]
    NoIntersection {
        /// The distance between the centres of the circles in metres.
        separation: f64,
        /// The radius of the first circle in metres.
        radius1: f64,
        /// The radius of the second circle in metres.
        radius2: f64,
    },
    /// The geodesic inverse calculation failed to converge.
    #[error("geodesic failed to converge after {iterations} iterations")]
    GeodesicConvergence {
        /// The number of iterations performed.
        iterations: u32,
    },
    /// A degrees, minutes and seconds value is malformed.
    #[error("invalid DMS value: {reason}")]
    InvalidDms {
        /// What is wrong with the value.
        reason: &'static str,
    },
    /// A distance is negative or not finite.
    #[error("invalid distance: {0} m")]
    InvalidDistance(f64),
    /// A latitude or longitude is out of range.
    #[error("invalid position: latitude {latitude}, longitude {longitude}")]
    InvalidPosition {
        /// The latitude in degrees.
        latitude: f64,
        /// The longitude in degrees.
        longitude: f64,
    },
}

/// The `Result` type returned by the library.
pub type Result<T> = core::result::Result<T, TrilaterationError>;

/// The parameters of an `Ellipsoid`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipsoid {
    /// The Semimajor axis of the ellipsoid.
    a: Metres,
    /// The flattening of the ellipsoid, a ratio.
    f: f64,

    /// The Semiminor axis of the ellipsoid.
    b: Metres,
    /// One minus the flattening ratio.
    one_minus_f: f64,
    /// The square of the Eccentricity of the ellipsoid.
    e_2: f64,
    /// The square of the second Eccentricity of the ellipsoid.
    ep_2: f64,
    /// The Eccentricity of the ellipsoid.
    e: f64,
    /// The third flattening of the ellipsoid.
    n: f64,

    /// The rectifying radius of the ellipsoid.
    rectifying_radius: Metres,
    /// The Krüger series `coefficients` from the conformal sphere to the
    /// transverse Mercator plane.
    alpha: [f64; 6],
    /// The Krüger series `coefficients` from the transverse Mercator plane
    /// to the conformal sphere.
    beta: [f64; 6],
}

impl Ellipsoid {
    /// Constructor.
    /// * `a` - the Semimajor axis of the `Ellipsoid`.
    /// * `f` - the flattening of the `Ellipsoid`, a ratio.
    #[must_use]
    pub fn new(a: Metres, f: f64) -> Self {
        let n = ellipsoid::calculate_3rd_flattening(f);
        let e_2 = ellipsoid::calculate_sq_eccentricity(f);
        Self {
            a,
            f,
            b: ellipsoid::calculate_minor_axis(a, f),
            one_minus_f: 1.0 - f,
            e_2,
            ep_2: ellipsoid::calculate_sq_2nd_eccentricity(f),
            e: libm::sqrt(e_2),
            n,
            rectifying_radius: Metres(ellipsoid::coefficients::evaluate_rectifying_radius(
                a.0, n,
            )),
            alpha: ellipsoid::coefficients::evaluate_coeffs_alpha(n),
            beta: ellipsoid::coefficients::evaluate_coeffs_beta(n),
        }
    }

    /// Construct an `Ellipsoid` with the WGS-84 parameters.
    #[must_use]
    pub fn wgs84() -> Self {
        Self::new(ellipsoid::wgs84::A, ellipsoid::wgs84::F)
    }

    /// The Semimajor axis of the ellipsoid.
    #[must_use]
    pub const fn a(&self) -> Metres {
        self.a
    }

    /// The flattening of the ellipsoid, a ratio.
    #[must_use]
    pub const fn f(&self) -> f64 {
        self.f
    }

    /// The Semiminor axis of the ellipsoid.
    #[must_use]
    pub const fn b(&self) -> Metres {
        self.b
    }

    /// One minus the flattening ratio.
    #[must_use]
    pub const fn one_minus_f(&self) -> f64 {
        self.one_minus_f
    }

    /// The square of the Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn e_2(&self) -> f64 {
        self.e_2
    }

    /// The square of the second Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn ep_2(&self) -> f64 {
        self.ep_2
    }

    /// The Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn e(&self) -> f64 {
        self.e
    }

    /// The third flattening of the ellipsoid.
    #[must_use]
    pub const fn n(&self) -> f64 {
        self.n
    }

    /// The rectifying radius of the ellipsoid: the radius of a sphere with
    /// the same meridian length.
    #[must_use]
    pub const fn rectifying_radius(&self) -> Metres {
        self.rectifying_radius
    }

    /// The Krüger series `coefficients` of the forward transverse Mercator
    /// projection.
    #[must_use]
    pub const fn alpha(&self) -> &[f64; 6] {
        &self.alpha
    }

    /// The Krüger series `coefficients` of the reverse transverse Mercator
    /// projection.
    #[must_use]
    pub const fn beta(&self) -> &[f64; 6] {
        &self.beta
    }

    /// Convert a geodetic Latitude to a parametric Latitude on the
    /// auxiliary sphere.
    /// * `lat` - the geodetic Latitude
    #[must_use]
    pub fn calculate_parametric_latitude(&self, lat: Angle) -> Angle {
        ellipsoid::calculate_parametric_latitude(lat, self.one_minus_f)
    }

    /// Convert the tangent of a geodetic Latitude to the tangent of the
    /// conformal Latitude.
    /// * `tau` - the tangent of the geodetic Latitude
    #[must_use]
    pub fn calculate_conformal_tau(&self, tau: f64) -> f64 {
        ellipsoid::calculate_conformal_tau(tau, self.e)
    }

    /// Convert the tangent of a conformal Latitude to the tangent of the
    /// geodetic Latitude.
    /// * `taup` - the tangent of the conformal Latitude
    #[must_use]
    pub fn calculate_geodetic_tau(&self, taup: f64) -> f64 {
        ellipsoid::calculate_geodetic_tau(taup, self.e)
    }
}

/// A static instance of the WGS-84 `Ellipsoid`.
pub static WGS84_ELLIPSOID: Lazy<Ellipsoid> = Lazy::new(Ellipsoid::wgs84);

/// Calculate the azimuths and geodesic distance (in metres) between a pair
/// of positions on the WGS-84 ellipsoid.
/// * `a`, `b` - the start and finish positions in geodetic coordinates.
///
/// returns the azimuth at the start position, the azimuth from the finish
/// position back to the start and the distance between them.
///
/// # Errors
///
/// Returns `TrilaterationError::GeodesicConvergence` if the calculation fails
/// to converge, e.g. for nearly antipodal positions.
///
/// # Examples
/// ```
/// use wgs84_trilateration::*;
///
/// let istanbul = LatLong::new(Degrees(42.0), Degrees(29.0));
/// let washington = LatLong::new(Degrees(39.0), Degrees(-77.0));
/// let result = calculate_geodesic_inverse(&istanbul, &washington).unwrap();
///
/// let azimuth_degrees = Degrees::from(result.azimuth);
/// println!("Istanbul-Washington initial azimuth: {:?}", azimuth_degrees.0);
/// println!("Istanbul-Washington distance: {:?}", result.distance);
///
/// let azimuth_degrees = Degrees::from(result.back_azimuth);
/// println!("Washington-Istanbul initial azimuth: {:?}", azimuth_degrees.0);
/// ```
pub fn calculate_geodesic_inverse(a: &LatLong, b: &LatLong) -> Result<InverseSolution> {
    geodesic::calculate_azimuths_and_distance(a, b, &WGS84_ELLIPSOID)
}

/// Calculate the positions at the input distances from two known positions
/// on the WGS-84 ellipsoid, verifying them with the geodesic inverse.
/// * `input` - the known positions and the distances to them.
///
/// returns the two solutions.
///
/// # Errors
///
/// Returns `TrilaterationError::NoIntersection` if no position is at both
/// distances.
/// Returns `TrilaterationError::GeodesicConvergence` if a verification
/// geodesic fails to converge.
///
/// # Examples
/// ```
/// use wgs84_trilateration::*;
///
/// let a = LatLong::new(Degrees(39.298_183_556), Degrees(105.497_873_306));
/// let b = LatLong::new(Degrees(39.298_309_139), Degrees(105.497_861_972));
/// let input = TrilaterationInput::new(a, b, Metres(16.91), Metres(9.0)).unwrap();
///
/// let solutions = calculate_trilateration(&input).unwrap();
/// for solution in &solutions {
///     let verification = solution.verification.unwrap();
///     assert!(verification.is_within(&input, Metres(0.01)));
/// }
/// ```
pub fn calculate_trilateration(input: &TrilaterationInput) -> Result<[Solution; 2]> {
    Trilateration::default().solve(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use angle_sc::is_within_tolerance;

    #[test]
    fn test_ellipsoid_wgs84() {
        let geoid = Ellipsoid::wgs84();
        assert_eq!(ellipsoid::wgs84::A, geoid.a());
        assert_eq!(ellipsoid::wgs84::F, geoid.f());
        assert_eq!(
            ellipsoid::calculate_minor_axis(ellipsoid::wgs84::A, ellipsoid::wgs84::F),
            geoid.b()
        );
        assert_eq!(1.0 - ellipsoid::wgs84::F, geoid.one_minus_f());
        assert_eq!(
            ellipsoid::calculate_sq_eccentricity(ellipsoid::wgs84::F),
            geoid.e_2()
        );
        assert_eq!(
            ellipsoid::calculate_sq_2nd_eccentricity(ellipsoid::wgs84::F),
            geoid.ep_2()
        );
        assert!(is_within_tolerance(0.081_819_190_842_622, geoid.e(), 1e-15));
        assert_eq!(
            ellipsoid::calculate_3rd_flattening(ellipsoid::wgs84::F),
            geoid.n()
        );
        assert!(is_within_tolerance(
            6_367_449.145_823_4,
            geoid.rectifying_radius().0,
            1e-6
        ));
        assert_eq!(
            &ellipsoid::coefficients::evaluate_coeffs_alpha(geoid.n()),
            geoid.alpha()
        );
        assert_eq!(
            &ellipsoid::coefficients::evaluate_coeffs_beta(geoid.n()),
            geoid.beta()
        );

        assert_eq!(geoid, *WGS84_ELLIPSOID);
    }

    #[test]
    fn test_ellipsoid_conformal_latitude() {
        let geoid = Ellipsoid::wgs84();
        for lat in [-89.0, -60.0, -30.0, 0.0, 15.0, 39.3, 45.0, 75.0, 89.5] {
            let tau = libm::tan(lat * core::f64::consts::PI / 180.0);
            let taup = geoid.calculate_conformal_tau(tau);
            // the conformal latitude is closer to the Equator
            assert!(libm::fabs(taup) <= libm::fabs(tau));
            assert!(is_within_tolerance(
                tau,
                geoid.calculate_geodetic_tau(taup),
                1e-12 * libm::fmax(1.0, libm::fabs(tau))
            ));
        }
    }

    #[test]
    fn test_calculate_geodesic_inverse() {
        // Flinders Peak to Buninyong
        let a = LatLong::new(
            Degrees(-dms::to_decimal(37, 57, 3.72030)),
            Degrees(dms::to_decimal(144, 25, 29.52440)),
        );
        let b = LatLong::new(
            Degrees(-dms::to_decimal(37, 39, 10.15610)),
            Degrees(dms::to_decimal(143, 55, 35.38390)),
        );
        let result = calculate_geodesic_inverse(&a, &b).unwrap();
        assert!(is_within_tolerance(54_972.271, result.distance.0, 2e-3));
        assert_eq!(
            geodesic::calculate_azimuths_and_distance(&a, &b, &WGS84_ELLIPSOID).unwrap(),
            result
        );
    }

    #[test]
    fn test_trilateration_error_display() {
        let error = TrilaterationError::NoIntersection {
            separation: 0.5,
            radius1: 16.91,
            radius2: 9.0,
        };
        assert_eq!(
            "no intersection: centres 0.5 m apart, radii 16.91 m and 9 m",
            error.to_string()
        );

        let error = TrilaterationError::GeodesicConvergence { iterations: 200 };
        assert_eq!(
            "geodesic failed to converge after 200 iterations",
            error.to_string()
        );

        let error = TrilaterationError::InvalidDistance(-1.5);
        assert_eq!("invalid distance: -1.5 m", error.to_string());

        let error = TrilaterationError::InvalidPosition {
            latitude: 91.0,
            longitude: 0.0,
        };
        assert_eq!(
            "invalid position: latitude 91, longitude 0",
            error.to_string()
        );
    }

    #[test]
    fn test_calculate_trilateration() {
        let a = LatLong::new(Degrees(39.298_183_556), Degrees(105.497_873_306));
        let b = LatLong::new(Degrees(39.298_309_139), Degrees(105.497_861_972));
        let input = TrilaterationInput::new(a, b, Metres(16.91), Metres(9.0)).unwrap();

        let solutions = calculate_trilateration(&input).unwrap();
        let expected = Trilateration::new(&WGS84_ELLIPSOID).solve(&input).unwrap();
        for (solution, expected) in solutions.iter().zip(expected.iter()) {
            assert_eq!(expected.planar, solution.planar);
            assert_eq!(expected.verification, solution.verification);
        }
    }
}
