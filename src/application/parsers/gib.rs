//! Tygem `.gib` records.
//!
//! Metadata arrives as `\[KEY=value\]` tokens, the setup line as
//! `INI a b handicap ...` and every move as `STO a n colour x y` with
//! zero-based coordinates. Games are always 19x19 and strictly linear.

use itertools::Itertools;
use regex::Regex;
use tracing::{debug, instrument};

use super::{format_komi, Color, RecordResult, Skip};
use crate::domain::{
    encode_point, handicap_points, DomainError, DomainResult, GameBuilder, HandicapLayout,
    PropertyTree,
};

const FORMAT: &str = "gib";
const BOARD_SIZE: i32 = 19;
const MAX_HANDICAP: i32 = 9;

/// Parse a decoded GIB record.
pub fn parse(text: &str) -> DomainResult<PropertyTree> {
    GibParser::new().parse(text)
}

pub struct GibParser {
    tag_regex: Regex,
    player_regex: Regex,
}

impl Default for GibParser {
    fn default() -> Self {
        Self::new()
    }
}

impl GibParser {
    pub fn new() -> Self {
        Self {
            tag_regex: Regex::new(r"\[([A-Z][A-Z0-9_]*)=([^\]]*)\]").unwrap(),
            player_regex: Regex::new(r"^(.*?)\s*\(([^()]*)\)$").unwrap(),
        }
    }

    #[instrument(level = "debug", skip_all)]
    pub fn parse(&self, text: &str) -> DomainResult<PropertyTree> {
        let mut builder = GameBuilder::new();
        builder.set_root("SZ", &BOARD_SIZE.to_string());

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();

            for caps in self.tag_regex.captures_iter(line) {
                let value = caps[2].trim_end_matches('\\').trim();
                self.apply_tag(&mut builder, &caps[1], value);
            }

            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("INI") => {
                    if builder.has_nodes() {
                        return Err(DomainError::parse(
                            FORMAT,
                            format!("setup line {} follows the first move", line_no + 1),
                        ));
                    }
                    match parse_setup(tokens) {
                        Ok(handicap) => apply_handicap(&mut builder, handicap)?,
                        Err(Skip(reason)) => debug!("line {}: {}", line_no + 1, reason),
                    }
                }
                Some("STO") => match parse_move(tokens) {
                    Ok((color, point)) => {
                        builder.append_move(color.key(), &point);
                    }
                    Err(Skip(reason)) => debug!("line {}: {}", line_no + 1, reason),
                },
                _ => {}
            }
        }

        debug!("parsed {} moves", builder.node_count());
        builder.finish_with_moves(FORMAT)
    }

    fn apply_tag(&self, builder: &mut GameBuilder, key: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        match key {
            "GAMEBLACKNAME" => self.apply_player(builder, "PB", "BR", value),
            "GAMEWHITENAME" => self.apply_player(builder, "PW", "WR", value),
            "GAMENAME" => {
                builder.set_root_once("GN", value);
            }
            "GAMEPLACE" => {
                builder.set_root_once("PC", value);
            }
            "GAMEDATE" => {
                builder.set_root_once("DT", value);
            }
            "GAMERESULT" => {
                builder.set_root_once("RE", value);
            }
            "GAMEGONGJE" => {
                // stored as tenths of a point
                if let Ok(tenths) = value.parse::<i32>() {
                    builder.set_root_once("KM", &format_komi(f64::from(tenths) / 10.0));
                }
            }
            _ => {}
        }
    }

    fn apply_player(&self, builder: &mut GameBuilder, name_key: &str, rank_key: &str, value: &str) {
        if builder.root_has(name_key) {
            return;
        }
        let (name, rank) = match self.player_regex.captures(value) {
            Some(caps) => (
                caps.get(1).map_or("", |m| m.as_str()),
                caps.get(2).map_or("", |m| m.as_str().trim()),
            ),
            None => (value, ""),
        };
        builder.set_root(name_key, name);
        builder.set_root(rank_key, rank);
    }
}

fn parse_setup<'a>(mut tokens: impl Iterator<Item = &'a str>) -> RecordResult<i32> {
    let (_, _, handicap) = tokens.next_tuple().ok_or(Skip("setup line too short"))?;
    let handicap: i32 = handicap.parse().map_err(|_| Skip("setup handicap is not a number"))?;
    if !(0..=MAX_HANDICAP).contains(&handicap) {
        return Err(Skip("setup handicap outside 0..=9"));
    }
    Ok(handicap)
}

fn apply_handicap(builder: &mut GameBuilder, handicap: i32) -> DomainResult<()> {
    if handicap < 2 {
        return Ok(());
    }
    builder.set_root("HA", &handicap.to_string());
    for point in handicap_points(BOARD_SIZE, handicap, HandicapLayout::LowerRightFirst) {
        builder.add_root("AB", &point.encode()?);
    }
    Ok(())
}

fn parse_move<'a>(mut tokens: impl Iterator<Item = &'a str>) -> RecordResult<(Color, String)> {
    let (_, _, color, x, y) = tokens.next_tuple().ok_or(Skip("move line too short"))?;
    let color = match color {
        "1" => Color::Black,
        "2" => Color::White,
        _ => return Err(Skip("unknown move colour")),
    };
    let x: i32 = x.parse().map_err(|_| Skip("move x is not a number"))?;
    let y: i32 = y.parse().map_err(|_| Skip("move y is not a number"))?;
    let point = encode_point(x + 1, y + 1).map_err(|_| Skip("move coordinate out of range"))?;
    Ok((color, point))
}
