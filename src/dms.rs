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

//! The dms module contains functions for converting angles between decimal
//! degrees and degrees, minutes and seconds.
//!
//! Survey data is commonly recorded in degrees, minutes and seconds, e.g.
//! `39°17'53.4608"`, while the calculations use decimal `Degrees`.
//!
//! The free functions `to_decimal` and `to_dms` work on raw components and
//! perform no validation. `Dms` is a validated value with the sign held
//! separately, so that minutes and seconds are always magnitudes.

use crate::{Result, TrilaterationError};
use angle_sc::Degrees;
use core::fmt;
use core::str::FromStr;

/// The number of minutes in a degree.
pub const MINUTES_PER_DEGREE: f64 = 60.0;

/// The number of seconds in a degree.
pub const SECONDS_PER_DEGREE: f64 = 3600.0;

/// Convert degrees, minutes and seconds to decimal degrees.
///
/// The components are simply summed: a negative angle must have all of its
/// components negative. Minutes and seconds are not range checked.
/// * `degrees` - the whole degrees.
/// * `minutes` - the whole minutes.
/// * `seconds` - the seconds.
/// # Examples
/// ```
/// use wgs84_trilateration::dms::to_decimal;
/// use angle_sc::is_within_tolerance;
///
/// assert!(is_within_tolerance(105.497_873_305_6, to_decimal(105, 29, 52.3439), 1e-10));
/// ```
#[must_use]
pub fn to_decimal(degrees: i32, minutes: i32, seconds: f64) -> f64 {
    f64::from(degrees) + f64::from(minutes) / MINUTES_PER_DEGREE + seconds / SECONDS_PER_DEGREE
}

/// Convert decimal degrees to degrees, minutes and seconds.
///
/// Each component is truncated toward zero, so every component carries the
/// sign of `value` and `to_decimal` reverses the conversion. The seconds are
/// not rounded: a value a fraction below a whole minute may be displayed as
/// `60.00000` seconds.
/// * `value` - the angle in decimal degrees.
///
/// returns the degrees, minutes and seconds.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn to_dms(value: f64) -> (i32, i32, f64) {
    let degrees = libm::trunc(value);
    let fraction = (value - degrees) * MINUTES_PER_DEGREE;
    let minutes = libm::trunc(fraction);
    let seconds = (fraction - minutes) * MINUTES_PER_DEGREE;
    (degrees as i32, minutes as i32, seconds)
}

/// An angle in degrees, minutes and seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dms {
    /// Whether the angle is negative, i.e. South or West.
    negative: bool,
    /// The whole degrees.
    degrees: u32,
    /// The whole minutes, less than 60.
    minutes: u32,
    /// The seconds.
    seconds: f64,
}

impl Dms {
    /// Constructor.
    /// * `negative` - whether the angle is negative.
    /// * `degrees` - the whole degrees, 0 to 180.
    /// * `minutes` - the whole minutes, 0 to 59.
    /// * `seconds` - the seconds, in the range [0, 60).
    ///
    /// # Errors
    ///
    /// Returns `TrilaterationError::InvalidDms` if any component is out of range.
    pub fn new(negative: bool, degrees: u32, minutes: u32, seconds: f64) -> Result<Self> {
        if degrees > 180 {
            return Err(TrilaterationError::InvalidDms {
                reason: "degrees must not exceed 180",
            });
        }
        if minutes >= 60 {
            return Err(TrilaterationError::InvalidDms {
                reason: "minutes must be less than 60",
            });
        }
        if !(0.0..MINUTES_PER_DEGREE).contains(&seconds) {
            return Err(TrilaterationError::InvalidDms {
                reason: "seconds must be at least 0 and less than 60",
            });
        }
        Ok(Self {
            negative,
            degrees,
            minutes,
            seconds,
        })
    }

    /// Whether the angle is negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// Accessor for the whole degrees.
    #[must_use]
    pub const fn degrees(&self) -> u32 {
        self.degrees
    }

    /// Accessor for the whole minutes.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Accessor for the seconds.
    #[must_use]
    pub const fn seconds(&self) -> f64 {
        self.seconds
    }
}

impl From<Degrees> for Dms {
    /// Convert decimal `Degrees` to `Dms`.
    /// The seconds are not rounded, see `to_dms`.
    fn from(value: Degrees) -> Self {
        let (degrees, minutes, seconds) = to_dms(libm::fabs(value.0));
        Self {
            negative: value.0 < 0.0,
            degrees: degrees.unsigned_abs(),
            minutes: minutes.unsigned_abs(),
            seconds,
        }
    }
}

impl From<Dms> for Degrees {
    fn from(value: Dms) -> Self {
        let magnitude = f64::from(value.degrees)
            + f64::from(value.minutes) / MINUTES_PER_DEGREE
            + value.seconds / SECONDS_PER_DEGREE;
        Self(if value.negative { -magnitude } else { magnitude })
    }
}

impl fmt::Display for Dms {
    /// Format as `DD°MM'SS.SSSSS"` with a leading `-` for negative angles.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        write!(
            f,
            "{:02}°{:02}'{:08.5}\"",
            self.degrees, self.minutes, self.seconds
        )
    }
}

impl FromStr for Dms {
    type Err = TrilaterationError;

    /// Parse an angle from decimal degrees, e.g. `-37.95`, or from degrees,
    /// minutes and (optional) seconds separated by `:`, whitespace or the
    /// `°`, `'` and `"` symbols, e.g. `39:17:53.4608` or `39°17'53.4608"`.
    fn from_str(s: &str) -> Result<Self> {
        const INVALID_NUMBER: TrilaterationError = TrilaterationError::InvalidDms {
            reason: "component is not a valid number",
        };

        let text = s.trim();
        let (negative, body) = text
            .strip_prefix('-')
            .map_or((false, text), |rest| (true, rest));

        let mut fields = [""; 3];
        let mut count = 0;
        for field in body
            .split(|c: char| matches!(c, ':' | '°' | '\'' | '"') || c.is_whitespace())
            .filter(|field| !field.is_empty())
        {
            if count == fields.len() {
                return Err(TrilaterationError::InvalidDms {
                    reason: "too many components",
                });
            }
            fields[count] = field;
            count += 1;
        }

        match count {
            0 => Err(TrilaterationError::InvalidDms {
                reason: "empty angle",
            }),
            1 => {
                let value: f64 = fields[0].parse().map_err(|_| INVALID_NUMBER)?;
                if !value.is_finite() || value.is_sign_negative() {
                    return Err(INVALID_NUMBER);
                }
                if value > 180.0 {
                    return Err(TrilaterationError::InvalidDms {
                        reason: "degrees must not exceed 180",
                    });
                }
                Ok(Self::from(Degrees(if negative { -value } else { value })))
            }
            _ => {
                let degrees: u32 = fields[0].parse().map_err(|_| INVALID_NUMBER)?;
                let minutes: u32 = fields[1].parse().map_err(|_| INVALID_NUMBER)?;
                let seconds: f64 = if count == 3 {
                    fields[2].parse().map_err(|_| INVALID_NUMBER)?
                } else {
                    0.0
                };
                Self::new(negative, degrees, minutes, seconds)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angle_sc::is_within_tolerance;

    #[test]
    fn test_to_decimal() {
        assert!(is_within_tolerance(
            39.298_183_555_6,
            to_decimal(39, 17, 53.4608),
            1e-10
        ));
        assert_eq!(-37.5, to_decimal(-37, -30, 0.0));

        // Out of range components are accepted.
        assert_eq!(2.0, to_decimal(0, 90, 1800.0));

        // A negative angle with positive minutes and seconds is nearer zero.
        assert!(is_within_tolerance(
            -36.5,
            to_decimal(-37, 30, 0.0),
            f64::EPSILON
        ));
    }

    #[test]
    fn test_to_dms() {
        let (degrees, minutes, seconds) = to_dms(to_decimal(105, 29, 52.3439));
        assert_eq!(105, degrees);
        assert_eq!(29, minutes);
        assert!(is_within_tolerance(52.3439, seconds, 1e-8));

        // All components carry the sign.
        let (degrees, minutes, seconds) = to_dms(-37.5125);
        assert_eq!(-37, degrees);
        assert_eq!(-30, minutes);
        assert!(is_within_tolerance(-45.0, seconds, 1e-8));

        // Angles between -1 and 0 keep their sign in the minutes.
        let (degrees, minutes, _) = to_dms(-0.5);
        assert_eq!(0, degrees);
        assert_eq!(-30, minutes);
    }

    #[test]
    fn test_to_dms_to_decimal_round_trip() {
        for i in -1800..=1800 {
            let value = f64::from(i) * 0.1 + 0.012_345_678_9;
            let value = value.clamp(-180.0, 180.0);
            let (degrees, minutes, seconds) = to_dms(value);
            assert!(is_within_tolerance(
                value,
                to_decimal(degrees, minutes, seconds),
                1e-8
            ));
        }
    }

    #[test]
    fn test_dms_new() {
        let dms = Dms::new(true, 37, 57, 3.7203).unwrap();
        assert!(dms.is_negative());
        assert_eq!(37, dms.degrees());
        assert_eq!(57, dms.minutes());
        assert_eq!(3.7203, dms.seconds());

        assert!(Dms::new(false, 181, 0, 0.0).is_err());
        assert!(Dms::new(false, 10, 60, 0.0).is_err());
        assert!(Dms::new(false, 10, 0, 60.0).is_err());
        assert!(Dms::new(false, 10, 0, -1.0).is_err());
        assert!(Dms::new(false, 10, 0, f64::NAN).is_err());
    }

    #[test]
    fn test_dms_degrees_conversions() {
        let value = Degrees(-to_decimal(37, 57, 3.7203));
        let dms = Dms::from(value);
        assert!(dms.is_negative());
        assert_eq!(37, dms.degrees());
        assert_eq!(57, dms.minutes());
        assert!(is_within_tolerance(3.7203, dms.seconds(), 1e-8));

        let result = Degrees::from(dms);
        assert!(is_within_tolerance(value.0, result.0, 1e-12));

        // Between -1 and 0 the sign is held separately.
        let dms = Dms::from(Degrees(-0.5));
        assert!(dms.is_negative());
        assert_eq!(0, dms.degrees());
        assert_eq!(30, dms.minutes());
        assert_eq!(-0.5, Degrees::from(dms).0);
    }

    #[test]
    fn test_dms_display() {
        let dms = Dms::from(Degrees(to_decimal(39, 17, 53.4608)));
        assert_eq!("39°17'53.46080\"", format!("{dms}"));

        let dms = Dms::new(true, 5, 3, 2.5).unwrap();
        assert_eq!("-05°03'02.50000\"", dms.to_string());

        // Seconds a fraction below a minute are displayed as 60.
        let dms = Dms::from(Degrees(10.0 + 59.0 / 60.0 + 59.999_999_9 / 3600.0));
        assert_eq!("10°59'60.00000\"", dms.to_string());
    }

    #[test]
    fn test_dms_from_str() {
        let dms: Dms = "105:29:52.3439".parse().unwrap();
        assert!(!dms.is_negative());
        assert_eq!(105, dms.degrees());
        assert_eq!(29, dms.minutes());
        assert_eq!(52.3439, dms.seconds());

        let dms: Dms = "39°17'53.4608\"".parse().unwrap();
        assert_eq!(39, dms.degrees());
        assert_eq!(17, dms.minutes());
        assert_eq!(53.4608, dms.seconds());

        let dms: Dms = " -37 57 3.7203 ".parse().unwrap();
        assert!(dms.is_negative());
        assert_eq!(37, dms.degrees());

        let dms: Dms = "12:30".parse().unwrap();
        assert_eq!(12.5, Degrees::from(dms).0);

        let dms: Dms = "-37.95".parse().unwrap();
        assert!(dms.is_negative());
        assert!(is_within_tolerance(-37.95, Degrees::from(dms).0, 1e-12));

        assert!("".parse::<Dms>().is_err());
        assert!("abc".parse::<Dms>().is_err());
        assert!("1:2:3:4".parse::<Dms>().is_err());
        assert!("10:61:0".parse::<Dms>().is_err());
        assert!("--10".parse::<Dms>().is_err());

        // decimal degrees are range checked like the components
        let dms: Dms = "180".parse().unwrap();
        assert_eq!(180, dms.degrees());
        let dms: Dms = "-180.0".parse().unwrap();
        assert!(dms.is_negative());
        assert_eq!(180, dms.degrees());
        let too_large = TrilaterationError::InvalidDms {
            reason: "degrees must not exceed 180",
        };
        assert_eq!(Err(too_large), "200".parse::<Dms>());
        assert_eq!(Err(too_large), "-180.5".parse::<Dms>());
        assert_eq!(Err(too_large), "1e12".parse::<Dms>());
        assert_eq!(Err(too_large), Dms::new(false, 200, 0, 0.0));
        assert!("inf".parse::<Dms>().is_err());
    }
}
