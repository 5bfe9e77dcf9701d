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

//! The projection module contains the `LocalProjection` type, which maps
//! positions near an origin onto a local plane and back.
//!
//! The plane is a transverse Mercator projection with its central meridian
//! through the origin and a scale factor of one, using the Krüger series to
//! sixth order in the third flattening, see CFF Karney
//! [Transverse Mercator with an accuracy of a few nanometers](https://arxiv.org/pdf/1002.1417.pdf).
//! The projection is conformal, so the small circles about the known
//! positions of a survey are (to well under a micrometre at survey scale)
//! circles on the plane.
//!
//! Planar coordinates are measured from the origin: the projected coordinates
//! of the origin are subtracted from every projected position, so the origin
//! itself is always at (0, 0).

#![allow(clippy::suboptimal_flops)]

use crate::intersection::PlanarPoint;
use crate::{Ellipsoid, Metres, WGS84_ELLIPSOID};
use angle_sc::{Angle, Degrees, Radians};
use unit_sphere::LatLong;

/// The scale factor along the central meridian.
pub const K0: f64 = 1.0;

/// Sum the Krüger series:
///   `(sum(c[j] * sin(2j * xi) * cosh(2j * eta)), sum(c[j] * cos(2j * xi) * sinh(2j * eta)))`
/// for j = 1 to 6.
/// * `coeffs` - the series coefficients, `alpha` or `beta`.
/// * `xi`, `eta` - the northing and easting on the unit sphere.
#[must_use]
fn sum_krueger_series(coeffs: &[f64; 6], xi: f64, eta: f64) -> (f64, f64) {
    coeffs
        .iter()
        .zip(1..=6)
        .fold((0.0, 0.0), |(xi_sum, eta_sum), (coeff, j)| {
            let two_j = 2.0 * f64::from(j);
            (
                xi_sum + coeff * libm::sin(two_j * xi) * libm::cosh(two_j * eta),
                eta_sum + coeff * libm::cos(two_j * xi) * libm::sinh(two_j * eta),
            )
        })
}

/// A local planar projection about an origin position.
#[derive(Clone, Debug)]
pub struct LocalProjection<'a> {
    /// The origin position.
    origin: LatLong,
    /// The longitude of the central meridian.
    lon0: Angle,
    /// The easting of the origin on the projection.
    x0: f64,
    /// The northing of the origin on the projection.
    y0: f64,
    /// A reference to the underlying `Ellipsoid`.
    ellipsoid: &'a Ellipsoid,
}

impl<'a> LocalProjection<'a> {
    /// Construct a `LocalProjection` with its origin at a position.
    /// The origin may be at a pole.
    /// * `origin` - the origin position in geodetic coordinates.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    #[must_use]
    pub fn new(origin: &LatLong, ellipsoid: &'a Ellipsoid) -> Self {
        let mut projection = Self {
            origin: LatLong::new(origin.lat(), origin.lon()),
            lon0: Angle::from(origin.lon()),
            x0: 0.0,
            y0: 0.0,
            ellipsoid,
        };
        let (x0, y0) = projection.forward(origin);
        projection.x0 = x0;
        projection.y0 = y0;
        tracing::trace!(
            lat = origin.lat().0,
            lon = origin.lon().0,
            northing = y0,
            "local projection origin"
        );
        projection
    }

    /// Accessor for the origin position.
    #[must_use]
    pub const fn origin(&self) -> &LatLong {
        &self.origin
    }

    /// Accessor for the reference to the underlying `Ellipsoid`.
    #[must_use]
    pub const fn ellipsoid(&self) -> &Ellipsoid {
        self.ellipsoid
    }

    /// The transverse Mercator easting and northing of a position, from the
    /// central meridian and the Equator.
    #[must_use]
    fn forward(&self, position: &LatLong) -> (f64, f64) {
        let lat = Angle::from(position.lat());
        let lambda = Angle::from(position.lon()) - self.lon0;
        let (sin_lambda, cos_lambda) = (lambda.sin().0, lambda.cos().0);

        // the conformal latitude, then Gauss-Schreiber coordinates
        let tau = lat.sin().0 / lat.cos().0;
        let taup = self.ellipsoid.calculate_conformal_tau(tau);
        let xip = libm::atan2(taup, cos_lambda);
        let etap = libm::asinh(sin_lambda / libm::hypot(taup, cos_lambda));

        let (delta_xi, delta_eta) = sum_krueger_series(self.ellipsoid.alpha(), xip, etap);
        let scale = K0 * self.ellipsoid.rectifying_radius().0;
        (scale * (etap + delta_eta), scale * (xip + delta_xi))
    }

    /// The position at a transverse Mercator easting and northing, from the
    /// central meridian and the Equator.
    #[must_use]
    fn reverse(&self, x: f64, y: f64) -> LatLong {
        let scale = K0 * self.ellipsoid.rectifying_radius().0;
        let xi = y / scale;
        let eta = x / scale;

        let (delta_xi, delta_eta) = sum_krueger_series(self.ellipsoid.beta(), xi, eta);
        let xip = xi - delta_xi;
        let etap = eta - delta_eta;

        let sinh_etap = libm::sinh(etap);
        let cos_xip = libm::cos(xip);
        let taup = libm::sin(xip) / libm::hypot(sinh_etap, cos_xip);
        let lambda = libm::atan2(sinh_etap, cos_xip);

        let tau = self.ellipsoid.calculate_geodetic_tau(taup);
        LatLong::new(
            Degrees::from(Angle::from_y_x(tau, 1.0)),
            Degrees::from(self.lon0 + Angle::from(Radians(lambda))),
        )
    }

    /// Project a position onto the local plane.
    /// * `position` - the position in geodetic coordinates.
    ///
    /// returns the position East and North of the origin, in metres.
    ///
    /// # Examples
    /// ```
    /// use wgs84_trilateration::*;
    /// use wgs84_trilateration::projection::LocalProjection;
    ///
    /// let origin = LatLong::new(Degrees(39.3), Degrees(105.5));
    /// let projection = LocalProjection::from(&origin);
    ///
    /// // The origin is at the origin of the plane.
    /// let xy = projection.to_planar(&origin);
    /// assert_eq!(0.0, xy.easting.0);
    /// assert_eq!(0.0, xy.northing.0);
    ///
    /// // A position to the North East is East and North of the origin.
    /// let xy = projection.to_planar(&LatLong::new(Degrees(39.3001), Degrees(105.5001)));
    /// assert!(0.0 < xy.easting.0);
    /// assert!(0.0 < xy.northing.0);
    /// ```
    #[must_use]
    pub fn to_planar(&self, position: &LatLong) -> PlanarPoint {
        let (x, y) = self.forward(position);
        PlanarPoint::new(Metres(x - self.x0), Metres(y - self.y0))
    }

    /// Convert a point on the local plane back to a position.
    /// * `point` - the point East and North of the origin, in metres.
    ///
    /// returns the position in geodetic coordinates.
    #[must_use]
    pub fn to_geodetic(&self, point: &PlanarPoint) -> LatLong {
        self.reverse(point.easting.0 + self.x0, point.northing.0 + self.y0)
    }
}

impl From<&LatLong> for LocalProjection<'_> {
    /// Construct a `LocalProjection` on the WGS-84 `Ellipsoid` with its origin
    /// at a position.
    /// * `origin` - the origin position in geodetic coordinates.
    fn from(origin: &LatLong) -> Self {
        LocalProjection::new(origin, &WGS84_ELLIPSOID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesic::calculate_azimuths_and_distance;
    use angle_sc::is_within_tolerance;

    const ORIGINS: [(f64, f64); 6] = [
        (39.298_183_555_6, 105.497_873_305_6),
        (0.0, 0.0),
        (-37.951_033_416_7, 144.424_867_888_9),
        (51.477_8, -0.001_5),
        (-64.5, -60.25),
        (78.2, 15.6),
    ];

    #[test]
    fn test_local_projection_origin() {
        for (lat, lon) in ORIGINS {
            let origin = LatLong::new(Degrees(lat), Degrees(lon));
            let projection = LocalProjection::from(&origin);

            assert_eq!(PlanarPoint::origin(), projection.to_planar(&origin));
            assert_eq!(Degrees(lat), projection.origin().lat());
            assert_eq!(Degrees(lon), projection.origin().lon());

            let result = projection.to_geodetic(&PlanarPoint::origin());
            assert!(is_within_tolerance(lat, result.lat().0, 1e-12));
            assert!(is_within_tolerance(lon, result.lon().0, 1e-12));
        }
    }

    #[test]
    fn test_local_projection_round_trip() {
        // Positions up to a kilometre from the origin
        for (lat, lon) in ORIGINS {
            let origin = LatLong::new(Degrees(lat), Degrees(lon));
            let projection = LocalProjection::new(&origin, &WGS84_ELLIPSOID);

            for i in -3..=3 {
                for j in -3..=3 {
                    let position = LatLong::new(
                        Degrees(lat + f64::from(i) * 0.003),
                        Degrees(lon + f64::from(j) * 0.003),
                    );
                    let xy = projection.to_planar(&position);
                    let result = projection.to_geodetic(&xy);

                    assert!(is_within_tolerance(position.lat().0, result.lat().0, 1e-9));
                    assert!(is_within_tolerance(position.lon().0, result.lon().0, 1e-9));
                }
            }
        }
    }

    #[test]
    fn test_local_projection_round_trip_micrometre() {
        // Positions within 100 metres of the origin
        for (lat, lon) in ORIGINS {
            let origin = LatLong::new(Degrees(lat), Degrees(lon));
            let projection = LocalProjection::from(&origin);

            for i in -4..=4 {
                for j in -4..=4 {
                    let xy = PlanarPoint::new(Metres(f64::from(i) * 17.5), Metres(f64::from(j) * 17.5));
                    let position = projection.to_geodetic(&xy);
                    let result = projection.to_planar(&position);

                    assert!(xy.distance(&result).0 < 1e-6, "{xy:?} {result:?}");
                }
            }
        }
    }

    #[test]
    fn test_local_projection_distances() {
        // Distances on the plane match geodesic distances near the origin.
        for (lat, lon) in ORIGINS {
            let origin = LatLong::new(Degrees(lat), Degrees(lon));
            let projection = LocalProjection::from(&origin);

            for (east, north) in [(60.0, 0.0), (0.0, -75.0), (-40.0, 55.5), (12.0, 9.0)] {
                let xy = PlanarPoint::new(Metres(east), Metres(north));
                let position = projection.to_geodetic(&xy);
                let geodesic =
                    calculate_azimuths_and_distance(&origin, &position, &WGS84_ELLIPSOID).unwrap();

                assert!(is_within_tolerance(
                    PlanarPoint::origin().distance(&xy).0,
                    geodesic.distance.0,
                    1e-5
                ));
            }
        }
    }

    #[test]
    fn test_local_projection_directions() {
        let origin = LatLong::new(Degrees(39.3), Degrees(105.5));
        let projection = LocalProjection::from(&origin);

        // North along the central meridian
        let xy = projection.to_planar(&LatLong::new(Degrees(39.3001), Degrees(105.5)));
        assert!(libm::fabs(xy.easting.0) < 1e-9);
        assert!(is_within_tolerance(11.1, xy.northing.0, 0.1));

        // East along the parallel
        let xy = projection.to_planar(&LatLong::new(Degrees(39.3), Degrees(105.5001)));
        assert!(is_within_tolerance(8.6, xy.easting.0, 0.1));
        assert!(libm::fabs(xy.northing.0) < 1e-3);

        // South West
        let xy = projection.to_planar(&LatLong::new(Degrees(39.2999), Degrees(105.4999)));
        assert!(xy.easting.0 < 0.0);
        assert!(xy.northing.0 < 0.0);
    }

    #[test]
    fn test_local_projection_pole() {
        for lat in [90.0, -90.0] {
            let origin = LatLong::new(Degrees(lat), Degrees(0.0));
            let projection = LocalProjection::from(&origin);
            assert_eq!(PlanarPoint::origin(), projection.to_planar(&origin));

            // Along the central meridian, away from the pole
            let near = if lat > 0.0 { 89.9999 } else { -89.9999 };
            let xy = projection.to_planar(&LatLong::new(Degrees(near), Degrees(0.0)));
            assert!(libm::fabs(xy.easting.0) < 1e-9);
            assert!(is_within_tolerance(11.17, libm::fabs(xy.northing.0), 0.01));

            // A quarter turn around the pole
            let xy = projection.to_planar(&LatLong::new(Degrees(near), Degrees(90.0)));
            assert!(is_within_tolerance(11.17, libm::fabs(xy.easting.0), 0.01));
            assert!(libm::fabs(xy.northing.0) < 1e-6);

            for (east, north) in [(5.0, -8.0), (-7.5, 3.0), (0.0, 10.0)] {
                let xy = PlanarPoint::new(Metres(east), Metres(north));
                let result = projection.to_planar(&projection.to_geodetic(&xy));
                assert!(xy.distance(&result).0 < 1e-6, "{xy:?} {result:?}");
            }
        }
    }

    #[test]
    fn test_local_projection_antimeridian() {
        let origin = LatLong::new(Degrees(-16.5), Degrees(179.9999));
        let projection = LocalProjection::from(&origin);

        let position = LatLong::new(Degrees(-16.5), Degrees(-179.9999));
        let xy = projection.to_planar(&position);
        assert!(is_within_tolerance(21.3, xy.easting.0, 0.1));

        let result = projection.to_geodetic(&xy);
        assert!(is_within_tolerance(-179.9999, result.lon().0, 1e-9));
        assert!(is_within_tolerance(-16.5, result.lat().0, 1e-9));
    }
}
