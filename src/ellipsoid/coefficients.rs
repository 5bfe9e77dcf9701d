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

//! This module contains the series coefficients used by the geodesic and
//! projection calculations on the surface of an ellipsoid.
//!
//! The transverse Mercator coefficients are the Krüger series to sixth order
//! in the third flattening given by CFF Karney in
//! [Transverse Mercator with an accuracy of a few nanometers](https://arxiv.org/pdf/1002.1417.pdf).
//! The geodesic coefficients are from T. Vincenty,
//! [Direct and Inverse Solutions of Geodesics on the Ellipsoid](https://www.ngs.noaa.gov/PUBS_LIB/inverse.pdf).

#![allow(clippy::unreadable_literal)]

/// Evaluate the polynomial in x using
/// [Horner's method](https://en.wikipedia.org/wiki/Horner%27s_method).
/// * `coeffs` - the polynomial coefficients, constant term first.
/// * `x` - the variable.
/// # Examples
/// ```
/// use wgs84_trilateration::ellipsoid::coefficients::evaluate_polynomial;
///
/// // 1 + 2x + 3x^2 at x = 2
/// assert_eq!(17.0, evaluate_polynomial(&[1.0, 2.0, 3.0], 2.0));
/// assert_eq!(0.0, evaluate_polynomial(&[], 2.0));
/// ```
#[must_use]
pub fn evaluate_polynomial(coeffs: &[f64], x: f64) -> f64 {
    coeffs
        .iter()
        .rev()
        .fold(0.0, |result, coeff| result * x + coeff)
}

/// The rectifying radius of an ellipsoid: the radius of a sphere with the
/// same meridian length.
/// CFF Karney, Eq. 14.
/// * `a` - the Semimajor axis of the ellipsoid in metres.
/// * `n` - the third flattening of the ellipsoid.
#[must_use]
pub fn evaluate_rectifying_radius(a: f64, n: f64) -> f64 {
    a / (1.0 + n) * evaluate_polynomial(&[1.0, 1.0 / 4.0, 1.0 / 64.0, 1.0 / 256.0], n * n)
}

/// The coefficients `alpha[j]` of the Krüger series from the conformal
/// sphere to the transverse Mercator plane.
/// CFF Karney, Eq. 35.
/// * `n` - the third flattening of the ellipsoid.
#[must_use]
pub fn evaluate_coeffs_alpha(n: f64) -> [f64; 6] {
    let n2 = n * n;
    let n3 = n2 * n;
    let n4 = n3 * n;
    let n5 = n4 * n;
    let n6 = n5 * n;

    [
        n * evaluate_polynomial(
            &[
                1.0 / 2.0,
                -2.0 / 3.0,
                5.0 / 16.0,
                41.0 / 180.0,
                -127.0 / 288.0,
                7891.0 / 37800.0,
            ],
            n,
        ),
        n2 * evaluate_polynomial(
            &[
                13.0 / 48.0,
                -3.0 / 5.0,
                557.0 / 1440.0,
                281.0 / 630.0,
                -1983433.0 / 1935360.0,
            ],
            n,
        ),
        n3 * evaluate_polynomial(
            &[
                61.0 / 240.0,
                -103.0 / 140.0,
                15061.0 / 26880.0,
                167603.0 / 181440.0,
            ],
            n,
        ),
        n4 * evaluate_polynomial(
            &[49561.0 / 161280.0, -179.0 / 168.0, 6601661.0 / 7257600.0],
            n,
        ),
        n5 * evaluate_polynomial(&[34729.0 / 80640.0, -3418889.0 / 1995840.0], n),
        n6 * (212378941.0 / 319334400.0),
    ]
}

/// The coefficients `beta[j]` of the Krüger series from the transverse
/// Mercator plane back to the conformal sphere.
/// CFF Karney, Eq. 36.
/// * `n` - the third flattening of the ellipsoid.
#[must_use]
pub fn evaluate_coeffs_beta(n: f64) -> [f64; 6] {
    let n2 = n * n;
    let n3 = n2 * n;
    let n4 = n3 * n;
    let n5 = n4 * n;
    let n6 = n5 * n;

    [
        n * evaluate_polynomial(
            &[
                1.0 / 2.0,
                -2.0 / 3.0,
                37.0 / 96.0,
                -1.0 / 360.0,
                -81.0 / 512.0,
                96199.0 / 604800.0,
            ],
            n,
        ),
        n2 * evaluate_polynomial(
            &[
                1.0 / 48.0,
                1.0 / 15.0,
                -437.0 / 1440.0,
                46.0 / 105.0,
                -1118711.0 / 3870720.0,
            ],
            n,
        ),
        n3 * evaluate_polynomial(
            &[
                17.0 / 480.0,
                -37.0 / 840.0,
                -209.0 / 4480.0,
                5569.0 / 90720.0,
            ],
            n,
        ),
        n4 * evaluate_polynomial(
            &[4397.0 / 161280.0, -11.0 / 504.0, -830251.0 / 7257600.0],
            n,
        ),
        n5 * evaluate_polynomial(&[4583.0 / 161280.0, -108847.0 / 3991680.0], n),
        n6 * (20648693.0 / 638668800.0),
    ]
}

/// Vincenty's scale factor `A` for the geodesic distance.
/// Vincenty, Eq. 3.
/// * `u2` - `cos²(alpha) * e'²`, where alpha is the azimuth at the Equator.
#[must_use]
pub fn evaluate_vincenty_a(u2: f64) -> f64 {
    1.0 + u2 / 16384.0 * evaluate_polynomial(&[4096.0, -768.0, 320.0, -175.0], u2)
}

/// Vincenty's coefficient `B` for the geodesic distance correction.
/// Vincenty, Eq. 4.
/// * `u2` - `cos²(alpha) * e'²`, where alpha is the azimuth at the Equator.
#[must_use]
pub fn evaluate_vincenty_b(u2: f64) -> f64 {
    u2 / 1024.0 * evaluate_polynomial(&[256.0, -128.0, 74.0, -47.0], u2)
}
