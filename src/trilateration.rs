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

//! The trilateration module contains the `Trilateration` solver, which
//! locates the positions at given distances from two known positions.
//!
//! The known positions are projected onto a `LocalProjection` with its origin
//! at the first position, where the distances are the radii of two circles.
//! The intersection points of the circles are converted back to geodetic
//! coordinates and, optionally, their geodesic distances to the known
//! positions are calculated to verify them.

use crate::geodesic::calculate_azimuths_and_distance;
use crate::intersection::{calculate_intersection_points, Circle, PlanarPoint};
use crate::projection::LocalProjection;
use crate::{Ellipsoid, Metres, Result, TrilaterationError, WGS84_ELLIPSOID};
use angle_sc::Validate;
use unit_sphere::LatLong;

/// The largest verification residual that is not reported as a warning.
pub const RESIDUAL_WARNING_THRESHOLD: Metres = Metres(0.01);

/// Whether a position is a valid geodetic position.
fn is_valid_position(position: &LatLong) -> bool {
    (-90.0..=90.0).contains(&position.lat().0) && (-180.0..=180.0).contains(&position.lon().0)
}

/// Whether a distance is finite and not negative.
fn is_valid_distance(distance: Metres) -> bool {
    distance.0.is_finite() && distance.0 >= 0.0
}

/// The known positions and the distances to them.
#[derive(Clone, Debug)]
pub struct TrilaterationInput {
    /// The first known position, the origin of the local plane.
    a: LatLong,
    /// The second known position.
    b: LatLong,
    /// The distance to the first known position.
    distance_a: Metres,
    /// The distance to the second known position.
    distance_b: Metres,
}

impl Validate for TrilaterationInput {
    /// Test whether a `TrilaterationInput` is valid.
    /// Whether both positions are within latitude and longitude range and
    /// both distances are finite and not negative.
    fn is_valid(&self) -> bool {
        is_valid_position(&self.a)
            && is_valid_position(&self.b)
            && is_valid_distance(self.distance_a)
            && is_valid_distance(self.distance_b)
    }
}

impl TrilaterationInput {
    /// Constructor.
    /// * `a`, `b` - the known positions.
    /// * `distance_a`, `distance_b` - the distances to the known positions.
    ///
    /// # Errors
    ///
    /// Returns `TrilaterationError::InvalidPosition` if a latitude is outside
    /// [-90, 90] or a longitude is outside [-180, 180] degrees.
    /// Returns `TrilaterationError::InvalidDistance` if a distance is negative
    /// or not finite.
    pub fn new(a: LatLong, b: LatLong, distance_a: Metres, distance_b: Metres) -> Result<Self> {
        for position in [&a, &b] {
            if !is_valid_position(position) {
                return Err(TrilaterationError::InvalidPosition {
                    latitude: position.lat().0,
                    longitude: position.lon().0,
                });
            }
        }
        for distance in [distance_a, distance_b] {
            if !is_valid_distance(distance) {
                return Err(TrilaterationError::InvalidDistance(distance.0));
            }
        }

        Ok(Self {
            a,
            b,
            distance_a,
            distance_b,
        })
    }

    /// Accessor for the first known position.
    #[must_use]
    pub const fn a(&self) -> &LatLong {
        &self.a
    }

    /// Accessor for the second known position.
    #[must_use]
    pub const fn b(&self) -> &LatLong {
        &self.b
    }

    /// Accessor for the distance to the first known position.
    #[must_use]
    pub const fn distance_a(&self) -> Metres {
        self.distance_a
    }

    /// Accessor for the distance to the second known position.
    #[must_use]
    pub const fn distance_b(&self) -> Metres {
        self.distance_b
    }
}

/// The geodesic distances from a solution to the known positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Verification {
    /// The geodesic distance to the first known position.
    pub distance_a: Metres,
    /// The geodesic distance to the second known position.
    pub distance_b: Metres,
}

impl Verification {
    /// The differences between the geodesic distances and the required
    /// distances.
    /// * `input` - the input that the solution was calculated from.
    ///
    /// returns the residuals to the first and second known positions.
    #[must_use]
    pub fn residuals(&self, input: &TrilaterationInput) -> (Metres, Metres) {
        (
            Metres(self.distance_a.0 - input.distance_a.0),
            Metres(self.distance_b.0 - input.distance_b.0),
        )
    }

    /// Whether both residuals are within a tolerance.
    /// * `input` - the input that the solution was calculated from.
    /// * `tolerance` - the largest acceptable residual.
    #[must_use]
    pub fn is_within(&self, input: &TrilaterationInput, tolerance: Metres) -> bool {
        let (residual_a, residual_b) = self.residuals(input);
        libm::fabs(residual_a.0) <= tolerance.0 && libm::fabs(residual_b.0) <= tolerance.0
    }
}

/// A position at the required distances from the known positions.
#[derive(Clone, Debug)]
pub struct Solution {
    /// The position in geodetic coordinates.
    pub position: LatLong,
    /// The position on the local plane about the first known position.
    pub planar: PlanarPoint,
    /// The geodesic distances to the known positions, if verified.
    pub verification: Option<Verification>,
}

/// A trilateration solver.
#[derive(Clone, Copy, Debug)]
pub struct Trilateration<'a> {
    /// A reference to the `Ellipsoid`.
    ellipsoid: &'a Ellipsoid,
    /// Whether to verify solutions with the geodesic inverse.
    verify: bool,
}

impl Default for Trilateration<'_> {
    /// A verifying solver on the WGS-84 `Ellipsoid`.
    fn default() -> Self {
        Trilateration::new(&WGS84_ELLIPSOID)
    }
}

impl<'a> Trilateration<'a> {
    /// Construct a verifying solver.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    #[must_use]
    pub const fn new(ellipsoid: &'a Ellipsoid) -> Self {
        Self {
            ellipsoid,
            verify: true,
        }
    }

    /// Set whether to verify solutions.
    /// * `verify` - whether to calculate the geodesic distances from each
    ///   solution to the known positions.
    #[must_use]
    pub const fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Accessor for the reference to the underlying `Ellipsoid`.
    #[must_use]
    pub const fn ellipsoid(&self) -> &Ellipsoid {
        self.ellipsoid
    }

    /// Whether the solver verifies solutions.
    #[must_use]
    pub const fn verify(&self) -> bool {
        self.verify
    }

    /// Calculate the positions at the input distances from the known
    /// positions.
    /// * `input` - the known positions and the distances to them.
    ///
    /// returns the two solutions: the first to the right of the direction
    /// from the first known position to the second, the second to its left.
    /// They are the same position where the circles touch.
    ///
    /// # Errors
    ///
    /// Returns `TrilaterationError::NoIntersection` if no position is at both
    /// distances.
    /// Returns `TrilaterationError::GeodesicConvergence` if a verification
    /// geodesic fails to converge.
    pub fn solve(&self, input: &TrilaterationInput) -> Result<[Solution; 2]> {
        let projection = LocalProjection::new(&input.a, self.ellipsoid);
        let centre_b = projection.to_planar(&input.b);
        tracing::debug!(
            easting = centre_b.easting.0,
            northing = centre_b.northing.0,
            separation = PlanarPoint::origin().distance(&centre_b).0,
            "projected second position"
        );

        let circle_a = Circle::new(PlanarPoint::origin(), input.distance_a);
        let circle_b = Circle::new(centre_b, input.distance_b);
        let [p1, p2] = calculate_intersection_points(&circle_a, &circle_b)?;
        tracing::debug!(
            p1_easting = p1.easting.0,
            p1_northing = p1.northing.0,
            p2_easting = p2.easting.0,
            p2_northing = p2.northing.0,
            "intersection points"
        );

        Ok([
            self.create_solution(&projection, input, p1)?,
            self.create_solution(&projection, input, p2)?,
        ])
    }

    /// Convert an intersection point to a `Solution`, verifying it if required.
    fn create_solution(
        &self,
        projection: &LocalProjection,
        input: &TrilaterationInput,
        planar: PlanarPoint,
    ) -> Result<Solution> {
        let position = projection.to_geodetic(&planar);
        let verification = if self.verify {
            let verification = Verification {
                distance_a: calculate_azimuths_and_distance(&position, &input.a, self.ellipsoid)?
                    .distance,
                distance_b: calculate_azimuths_and_distance(&position, &input.b, self.ellipsoid)?
                    .distance,
            };
            if !verification.is_within(input, RESIDUAL_WARNING_THRESHOLD) {
                let (residual_a, residual_b) = verification.residuals(input);
                tracing::warn!(
                    lat = position.lat().0,
                    lon = position.lon().0,
                    residual_a = residual_a.0,
                    residual_b = residual_b.0,
                    "solution distances differ from the input distances"
                );
            }
            Some(verification)
        } else {
            None
        };

        Ok(Solution {
            position,
            planar,
            verification,
        })
    }
}
