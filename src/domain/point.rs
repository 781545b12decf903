//! Board coordinates, value escaping and handicap star points.

use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// Largest coordinate expressible as a single lowercase letter.
pub const MAX_COORDINATE: i32 = 26;

/// A board position, 1-based. `x` runs left to right, `y` top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Two-letter position code, see [`encode_point`].
    pub fn encode(&self) -> DomainResult<String> {
        encode_point(self.x, self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Encode a 1-based coordinate pair as two letters starting at `a`.
///
/// `(1, 1)` is `"aa"`, `(19, 19)` is `"ss"`. Fails unless both values lie
/// in `1..=26`.
pub fn encode_point(x: i32, y: i32) -> DomainResult<String> {
    let range = 1..=MAX_COORDINATE;
    if !range.contains(&x) || !range.contains(&y) {
        return Err(DomainError::CoordinateOutOfRange {
            x: i64::from(x),
            y: i64::from(y),
        });
    }
    Ok([letter(x), letter(y)].iter().collect())
}

fn letter(n: i32) -> char {
    // n is range checked by the caller
    char::from(b'a' + (n - 1) as u8)
}

/// Prefix every backslash and closing bracket with a backslash.
pub fn escape_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' || c == ']' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Inverse of [`escape_value`]: every backslash escapes the character after it.
pub fn unescape_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Which diagonal receives the third handicap stone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandicapLayout {
    /// Third stone lower right, fourth upper left.
    LowerRightFirst,
    /// Third stone upper left, fourth lower right.
    UpperLeftFirst,
}

/// Standard star points for `handicap` stones on a `size` board.
///
/// The handicap is clamped to 9. Boards smaller than 4 get no stones, even
/// boards never get more than 4 (there is no center line). Points are
/// distinct and returned in placement order.
pub fn handicap_points(size: i32, handicap: i32, layout: HandicapLayout) -> Vec<Point> {
    let handicap = handicap.min(9);
    let mut points = Vec::new();
    if size < 4 || handicap < 2 {
        return points;
    }

    let edge = match size {
        13.. => 4,
        7..=12 => 3,
        _ => 2,
    };
    let lo = edge;
    let hi = size + 1 - edge;
    let mid = (size + 1) / 2;

    points.push(Point::new(hi, lo));
    points.push(Point::new(lo, hi));

    let (third, fourth) = match layout {
        HandicapLayout::LowerRightFirst => (Point::new(hi, hi), Point::new(lo, lo)),
        HandicapLayout::UpperLeftFirst => (Point::new(lo, lo), Point::new(hi, hi)),
    };
    if handicap >= 3 {
        points.push(third);
    }
    if handicap >= 4 {
        points.push(fourth);
    }

    if size % 2 == 0 {
        return points;
    }

    if matches!(handicap, 5 | 7 | 9) {
        points.push(Point::new(mid, mid));
    }
    if handicap >= 6 {
        points.push(Point::new(lo, mid));
        points.push(Point::new(hi, mid));
    }
    if handicap >= 8 {
        points.push(Point::new(mid, lo));
        points.push(Point::new(mid, hi));
    }
    points
}
