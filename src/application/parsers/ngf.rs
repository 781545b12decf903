//! WBaduk `.ngf` records: fixed meaning per line index, then `PM` move lines.

use regex::Regex;
use tracing::{debug, instrument};

use super::{format_komi, letter_offset, Color, RecordResult, Skip};
use crate::application::normalize::MAX_BOARD_SIZE;
use crate::domain::{
    encode_point, handicap_points, DomainError, DomainResult, GameBuilder, HandicapLayout,
    PropertyTree,
};

const FORMAT: &str = "ngf";
const DEFAULT_BOARD_SIZE: i32 = 19;
const MAX_HANDICAP: i32 = 9;

const LINE_TITLE: usize = 0;
const LINE_SIZE: usize = 1;
const LINE_WHITE: usize = 2;
const LINE_BLACK: usize = 3;
const LINE_PLACE: usize = 4;
const LINE_HANDICAP: usize = 5;
const LINE_KOMI: usize = 7;
const LINE_DATE: usize = 8;
const LINE_RESULT: usize = 10;
/// Move records start after the fixed header block
const HEADER_LINES: usize = 12;

/// Parse a decoded NGF record.
pub fn parse(text: &str) -> DomainResult<PropertyTree> {
    NgfParser::new().parse(text)
}

pub struct NgfParser {
    move_regex: Regex,
}

impl Default for NgfParser {
    fn default() -> Self {
        Self::new()
    }
}

impl NgfParser {
    pub fn new() -> Self {
        Self {
            move_regex: Regex::new(r"^PM[A-Z]{2}([BW])([A-Z])([A-Z])").unwrap(),
        }
    }

    #[instrument(level = "debug", skip_all)]
    pub fn parse(&self, text: &str) -> DomainResult<PropertyTree> {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        let field = |idx: usize| lines.get(idx).copied().unwrap_or("");
        let mut builder = GameBuilder::new();

        if !field(LINE_TITLE).is_empty() {
            builder.set_root("GN", field(LINE_TITLE));
        }

        let size = first_token(field(LINE_SIZE))
            .parse::<i32>()
            .unwrap_or(DEFAULT_BOARD_SIZE);
        builder.set_root("SZ", &size.to_string());

        apply_player(&mut builder, "PW", "WR", field(LINE_WHITE));
        apply_player(&mut builder, "PB", "BR", field(LINE_BLACK));

        if !field(LINE_PLACE).is_empty() {
            builder.set_root("PC", field(LINE_PLACE));
        }

        let handicap = first_token(field(LINE_HANDICAP)).parse::<i32>().unwrap_or(0);
        if !(0..=MAX_HANDICAP).contains(&handicap) {
            return Err(DomainError::parse(
                FORMAT,
                format!("handicap {} outside 0..={}", handicap, MAX_HANDICAP),
            ));
        }

        let komi = match first_token(field(LINE_KOMI)).parse::<f64>() {
            // even games record the komi without its half point
            Ok(k) if handicap == 0 && k.fract() == 0.0 => k + 0.5,
            Ok(k) => k,
            Err(_) => 0.0,
        };
        builder.set_root("KM", &format_komi(komi));

        if let Some(date) = parse_date(field(LINE_DATE)) {
            builder.set_root("DT", &date);
        }
        if let Some(result) = parse_result(field(LINE_RESULT)) {
            builder.set_root("RE", result);
        }

        if handicap >= 2 {
            builder.set_root("HA", &handicap.to_string());
            // oversize boards are left for the normalizer to reject
            let stones = if (1..=MAX_BOARD_SIZE).contains(&size) {
                handicap_points(size, handicap, HandicapLayout::UpperLeftFirst)
            } else {
                Vec::new()
            };
            for point in stones {
                builder.add_root("AB", &point.encode()?);
            }
        }

        for (offset, line) in lines.iter().enumerate().skip(HEADER_LINES) {
            match self.parse_move(line) {
                Ok((color, point)) => {
                    builder.append_move(color.key(), &point);
                }
                Err(Skip(reason)) => debug!("line {}: {}", offset + 1, reason),
            }
        }

        debug!("parsed {} moves", builder.node_count());
        builder.finish_with_moves(FORMAT)
    }

    fn parse_move(&self, line: &str) -> RecordResult<(Color, String)> {
        let caps = self
            .move_regex
            .captures(line)
            .ok_or(Skip("not a move record"))?;
        let color = caps[1]
            .chars()
            .next()
            .and_then(Color::from_letter)
            .ok_or(Skip("unknown move colour"))?;
        let x = letter_offset(caps[2].as_bytes()[0], b'A');
        let y = letter_offset(caps[3].as_bytes()[0], b'A');
        let point = encode_point(x, y).map_err(|_| Skip("move coordinate out of range"))?;
        Ok((color, point))
    }
}

fn first_token(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

fn apply_player(builder: &mut GameBuilder, name_key: &str, rank_key: &str, line: &str) {
    let mut tokens = line.split_whitespace();
    if let Some(name) = tokens.next() {
        builder.set_root(name_key, name);
        if let Some(rank) = tokens.next() {
            builder.set_root(rank_key, rank);
        }
    }
}

/// `YYYYMMDD...` to `YYYY-MM-DD`, only when all eight leading characters are digits.
fn parse_date(line: &str) -> Option<String> {
    let digits = line.get(..8)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{}-{}-{}", &digits[..4], &digits[4..6], &digits[6..]))
}

fn parse_result(line: &str) -> Option<&'static str> {
    let line = line.to_ascii_lowercase();
    if line.contains("white win") {
        Some("W+")
    } else if line.contains("black win") {
        Some("B+")
    } else {
        None
    }
}
