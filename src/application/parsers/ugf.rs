//! Pandanet `.ugf` / `.ugi` records: a `[Header]` section of `key=value`
//! lines followed by a `[Data]` section of comma separated move records.

use tracing::{debug, instrument};

use super::{format_komi, letter_offset, Color, RecordResult, Skip};
use crate::domain::{
    DomainError, DomainResult, GameBuilder, Point, PropertyTree, point::MAX_COORDINATE,
};

const FORMAT: &str = "ugf";
/// Coordinate type whose rows count from the bottom edge
const FLIPPED_COORDINATES: &str = "IGS";
/// Marker field value of a handicap placement record
const HANDICAP_MARKER: &str = "0";

/// Parse a decoded UGF or UGI record.
pub fn parse(text: &str) -> DomainResult<PropertyTree> {
    let mut parser = UgfParser::default();
    for (line_no, line) in text.lines().enumerate() {
        parser.feed(line_no + 1, line.trim())?;
    }
    parser.finish()
}

/// Header values collected before the data section opens.
#[derive(Debug, Default)]
struct Header {
    size: Option<i32>,
    handicap: Option<i32>,
    flip: bool,
}

/// Board geometry fixed when `[Data]` is entered.
#[derive(Debug, Clone, Copy)]
struct Board {
    size: i32,
    handicap: i32,
    flip: bool,
}

#[derive(Debug, Default)]
enum Section {
    #[default]
    Preamble,
    Header,
    Data(Board),
    Ignored,
}

#[derive(Debug, PartialEq, Eq)]
struct Record {
    color: Color,
    /// `None` for coordinates off the board
    point: Option<Point>,
    handicap_marker: bool,
}

#[derive(Debug, Default)]
struct UgfParser {
    builder: GameBuilder,
    header: Header,
    section: Section,
    placed_handicap: i32,
}

impl UgfParser {
    fn feed(&mut self, line_no: usize, line: &str) -> DomainResult<()> {
        if line.is_empty() {
            return Ok(());
        }
        if let Some(name) = section_name(line) {
            self.section = self.open_section(name)?;
            return Ok(());
        }
        match self.section {
            Section::Header => self.apply_header(line),
            Section::Data(board) => match parse_record(line, &board) {
                Ok(record) => self.apply_record(record, &board)?,
                Err(Skip(reason)) => debug!("line {}: {}", line_no, reason),
            },
            Section::Preamble | Section::Ignored => {}
        }
        Ok(())
    }

    fn open_section(&mut self, name: &str) -> DomainResult<Section> {
        if name.eq_ignore_ascii_case("header") {
            return Ok(Section::Header);
        }
        if !name.eq_ignore_ascii_case("data") {
            debug!("ignoring section [{}]", name);
            return Ok(Section::Ignored);
        }

        let size = self
            .header
            .size
            .filter(|s| (1..=MAX_COORDINATE).contains(s))
            .ok_or_else(|| DomainError::parse(FORMAT, "no valid board size before [Data]"))?;
        let handicap = self
            .header
            .handicap
            .filter(|h| *h >= 0)
            .ok_or_else(|| DomainError::parse(FORMAT, "no valid handicap before [Data]"))?;

        if handicap >= 2 {
            self.builder.set_root("HA", &handicap.to_string());
        }
        Ok(Section::Data(Board {
            size,
            handicap,
            flip: self.header.flip,
        }))
    }

    fn apply_header(&mut self, line: &str) {
        let Some((key, value)) = line.split_once('=') else {
            debug!("header line without '=': {}", line);
            return;
        };
        let value = value.trim();
        let mut fields = value.split(',').map(str::trim);
        let first = fields.next().unwrap_or("");

        match key.trim().to_ascii_lowercase().as_str() {
            "size" => {
                self.header.size = first.parse().ok();
                if let Some(size) = self.header.size {
                    self.builder.set_root("SZ", &size.to_string());
                }
            }
            "hdcp" => {
                self.header.handicap = first.parse().ok();
                match fields.next().map(str::parse::<f64>) {
                    Some(Ok(komi)) => self.builder.set_root("KM", &format_komi(komi)),
                    Some(Err(_)) => debug!("komi is not a number: {}", value),
                    None => {}
                }
            }
            "playerb" => self.apply_player("PB", "BR", first, fields.next()),
            "playerw" => self.apply_player("PW", "WR", first, fields.next()),
            "place" if !first.is_empty() => self.builder.set_root("PC", first),
            "title" if !first.is_empty() => self.builder.set_root("GN", first),
            "date" if !first.is_empty() => self.builder.set_root("DT", &first.replace('/', "-")),
            "winner" => {
                if let Some(color) = first.chars().next().and_then(Color::from_letter) {
                    let detail = fields.next().unwrap_or("");
                    self.builder
                        .set_root("RE", &format!("{}+{}", color.key(), detail));
                }
            }
            "coordinatetype" => {
                self.header.flip = first.eq_ignore_ascii_case(FLIPPED_COORDINATES);
            }
            _ => {}
        }
    }

    fn apply_player(&mut self, name_key: &str, rank_key: &str, name: &str, rank: Option<&str>) {
        if name.is_empty() {
            return;
        }
        self.builder.set_root(name_key, name);
        if let Some(rank) = rank.filter(|r| !r.is_empty()) {
            self.builder.set_root(rank_key, rank);
        }
    }

    fn apply_record(&mut self, record: Record, board: &Board) -> DomainResult<()> {
        let is_placement = record.color == Color::Black
            && record.handicap_marker
            && self.placed_handicap < board.handicap;
        if is_placement {
            self.placed_handicap += 1;
            match record.point {
                Some(point) => self.builder.add_root("AB", &point.encode()?),
                None => debug!("handicap stone off the board"),
            }
            return Ok(());
        }

        let value = record
            .point
            .map(|p| p.encode())
            .transpose()?
            .unwrap_or_default();
        self.builder.append_move(record.color.key(), &value);
        Ok(())
    }

    fn finish(self) -> DomainResult<PropertyTree> {
        debug!("parsed {} moves", self.builder.node_count());
        self.builder.finish_with_moves(FORMAT)
    }
}

fn section_name(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']').map(str::trim)
}

fn parse_record(line: &str, board: &Board) -> RecordResult<Record> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [coordinate, color, marker, ..] = fields.as_slice() else {
        return Err(Skip("record has fewer than three fields"));
    };

    let &[col, row] = coordinate.as_bytes() else {
        return Err(Skip("coordinate is not two letters"));
    };
    if !col.is_ascii_uppercase() || !row.is_ascii_uppercase() {
        return Err(Skip("coordinate is not two letters"));
    }
    let color = color
        .chars()
        .next()
        .and_then(Color::from_letter)
        .ok_or(Skip("unknown move colour"))?;

    let x = letter_offset(col, b'A') + 1;
    let mut y = letter_offset(row, b'A') + 1;
    if board.flip {
        y = board.size + 1 - y;
    }
    let on_board = |v: i32| (1..=board.size).contains(&v);
    let point = (on_board(x) && on_board(y)).then(|| Point::new(x, y));

    Ok(Record {
        color,
        point,
        handicap_marker: *marker == HANDICAP_MARKER,
    })
}
