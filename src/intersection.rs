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

//! The intersection module contains types and functions for calculating the
//! intersection points of a pair of circles in a local plane.
//!
//! A measured distance from a known position constrains the unknown position
//! to a circle about the known position, so two distances give a pair of
//! circles. If they intersect, the two intersection points are the candidate
//! positions.

#![allow(clippy::suboptimal_flops)]

use crate::Metres;
use crate::{Result, TrilaterationError};

/// A point in a local plane, in metres East and North of its origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanarPoint {
    /// The distance East of the origin.
    pub easting: Metres,
    /// The distance North of the origin.
    pub northing: Metres,
}

impl PlanarPoint {
    /// Constructor.
    /// * `easting` - the distance East of the origin.
    /// * `northing` - the distance North of the origin.
    #[must_use]
    pub const fn new(easting: Metres, northing: Metres) -> Self {
        Self { easting, northing }
    }

    /// The origin of the plane.
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(Metres(0.0), Metres(0.0))
    }

    /// Calculate the Euclidean distance to another `PlanarPoint`.
    #[must_use]
    pub fn distance(&self, other: &Self) -> Metres {
        Metres(libm::hypot(
            other.easting.0 - self.easting.0,
            other.northing.0 - self.northing.0,
        ))
    }
}

/// A circle in a local plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    /// The centre of the circle.
    pub centre: PlanarPoint,
    /// The radius of the circle.
    pub radius: Metres,
}

impl Circle {
    /// Constructor.
    /// * `centre` - the centre of the circle.
    /// * `radius` - the radius of the circle, not negative.
    #[must_use]
    pub const fn new(centre: PlanarPoint, radius: Metres) -> Self {
        Self { centre, radius }
    }
}

/// Calculate the intersection points of a pair of circles.
///
/// Where the circles intersect, `a` is the distance from the centre of `c1`
/// to the chord between the intersection points and `h` is half the length of
/// the chord. When the circles touch the chord has zero length and both
/// points are the same.
///
/// The first point is to the right of the line from the centre of `c1` to the
/// centre of `c2`, the second to its left. So swapping the circles swaps the
/// points.
/// * `c1`, `c2` - the circles.
///
/// returns the intersection points.
///
/// # Errors
///
/// Returns `TrilaterationError::NoIntersection` if the circles are further
/// apart than the sum of their radii, one is inside the other without
/// touching, or they are concentric.
///
/// # Examples
/// ```
/// use wgs84_trilateration::Metres;
/// use wgs84_trilateration::intersection::{calculate_intersection_points, Circle, PlanarPoint};
///
/// let c1 = Circle::new(PlanarPoint::origin(), Metres(5.0));
/// let c2 = Circle::new(PlanarPoint::new(Metres(8.0), Metres(0.0)), Metres(5.0));
///
/// let [p1, p2] = calculate_intersection_points(&c1, &c2).unwrap();
/// assert_eq!(PlanarPoint::new(Metres(4.0), Metres(-3.0)), p1);
/// assert_eq!(PlanarPoint::new(Metres(4.0), Metres(3.0)), p2);
/// ```
pub fn calculate_intersection_points(c1: &Circle, c2: &Circle) -> Result<[PlanarPoint; 2]> {
    let (x1, y1, r1) = (c1.centre.easting.0, c1.centre.northing.0, c1.radius.0);
    let (x2, y2, r2) = (c2.centre.easting.0, c2.centre.northing.0, c2.radius.0);

    let d = libm::hypot(x2 - x1, y2 - y1);
    if d > r1 + r2 || d < libm::fabs(r1 - r2) || d == 0.0 {
        return Err(TrilaterationError::NoIntersection {
            separation: d,
            radius1: r1,
            radius2: r2,
        });
    }

    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    // rounding may make r1² - a² slightly negative when the circles touch
    let h = libm::sqrt(libm::fmax(r1 * r1 - a * a, 0.0));

    let xm = x1 + a * (x2 - x1) / d;
    let ym = y1 + a * (y2 - y1) / d;
    let dx = h * (y2 - y1) / d;
    let dy = h * (x1 - x2) / d;

    Ok([
        PlanarPoint::new(Metres(xm + dx), Metres(ym + dy)),
        PlanarPoint::new(Metres(xm - dx), Metres(ym - dy)),
    ])
}
