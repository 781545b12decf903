//! Dialect parsers: decoded record text in, raw [`PropertyTree`] out.
//!
//! Every parser has the same shape ([`crate::application::format::ParseFn`]).
//! A single malformed record yields a [`Skip`] that the line loop logs and
//! steps over; structural problems abort with a [`DomainError`].
//!
//! [`PropertyTree`]: crate::domain::PropertyTree
//! [`DomainError`]: crate::domain::DomainError

pub mod gib;
pub mod ngf;
pub mod ugf;

/// Reason a single record was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skip(pub &'static str);

/// Outcome of decoding one record line.
pub type RecordResult<T> = Result<T, Skip>;

/// Stone colour of a move record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Property key of a move by this colour.
    pub fn key(self) -> &'static str {
        match self {
            Color::Black => "B",
            Color::White => "W",
        }
    }

    /// `B` or `W`, case-insensitive.
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'B' => Some(Color::Black),
            'W' => Some(Color::White),
            _ => None,
        }
    }
}

/// Render a komi value without trailing zeros (`6.5`, `0.5`, `7`).
pub fn format_komi(komi: f64) -> String {
    format!("{}", komi)
}

/// Map an uppercase ASCII letter to its distance from `base`.
pub(crate) fn letter_offset(c: u8, base: u8) -> i32 {
    i32::from(c) - i32::from(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_komi() {
        assert_eq!(format_komi(6.5), "6.5");
        assert_eq!(format_komi(0.5), "0.5");
        assert_eq!(format_komi(7.0), "7");
        assert_eq!(format_komi(0.0), "0");
    }

    #[test]
    fn test_color_from_letter() {
        assert_eq!(Color::from_letter('b'), Some(Color::Black));
        assert_eq!(Color::from_letter('W'), Some(Color::White));
        assert_eq!(Color::from_letter('x'), None);
    }
}
