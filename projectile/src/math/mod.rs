// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Two-dimensional affine math
//!
//! Points and vectors are kept as distinct types: a [`Point2D`] is a
//! location, a [`Vector2D`] is a displacement. Points can be offset by
//! vectors and subtracted from each other, but never scaled.

mod point;
mod vector;

pub use point::Point2D;
pub use vector::Vector2D;

use std::fmt;

/// Write a coordinate pair as `(x, y)` with at most three decimals.
pub(crate) fn write_pair(f: &mut fmt::Formatter<'_>, x: f64, y: f64) -> fmt::Result {
    write!(f, "({}, {})", trim_coord(x), trim_coord(y))
}

fn trim_coord(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let mut s = format!("{:.3}", value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::trim_coord;

    #[test]
    fn test_trim_coord() {
        assert_eq!(trim_coord(1.0), "1");
        assert_eq!(trim_coord(1.5), "1.5");
        assert_eq!(trim_coord(-9.81), "-9.81");
        assert_eq!(trim_coord(0.12345), "0.123");
        assert_eq!(trim_coord(-0.0001), "0");
        assert_eq!(trim_coord(f64::NAN), "NaN");
        assert_eq!(trim_coord(f64::INFINITY), "inf");
    }
}
