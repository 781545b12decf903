//! End-to-end conversion: decoded record text in, SGF text out.

use rstest::rstest;

use kifu2sgf::application::normalize::application_tag;
use kifu2sgf::application::serialize::serialize;
use kifu2sgf::application::{convert, convert_to_writer, parse_normalized, Format};
use kifu2sgf::domain::{DomainError, GameBuilder};
use kifu2sgf::util::testing::{fixture, init_test_setup};

#[rstest]
#[case("handicap.gib", Format::Gib, "19", Some("2"), 2)]
#[case("handicap.ngf", Format::Ngf, "19", Some("2"), 2)]
#[case("handicap.ugi", Format::Ugi, "19", Some("2"), 1)]
#[case("even.ugf", Format::Ugf, "9", None, 3)]
fn given_fixture_when_normalized_then_root_and_moves_match(
    #[case] name: &str,
    #[case] format: Format,
    #[case] size: &str,
    #[case] handicap: Option<&str>,
    #[case] moves: usize,
) {
    init_test_setup();
    let tree = parse_normalized(&fixture(name), format).expect("converts");
    let root = tree.root();

    let leading: Vec<&str> = tree
        .node(root)
        .unwrap()
        .properties()
        .iter()
        .take(5)
        .map(|p| p.key.as_str())
        .collect();
    assert_eq!(leading, vec!["FF", "GM", "CA", "AP", "SZ"]);
    assert_eq!(tree.first(root, "SZ"), Some(size));
    assert_eq!(tree.first(root, "HA"), handicap);
    assert_eq!(tree.move_count(), moves);
}

#[test]
fn given_even_ugf_when_converted_then_exact_sgf_text() {
    init_test_setup();
    let sgf = convert(&fixture("even.ugf"), Format::Ugf).unwrap();

    let expected = format!(
        "(;FF[4]GM[1]CA[UTF-8]AP[{}]SZ[9]KM[6.5]PB[Sato]BR[2k]PW[Kim]WR[1k];B[ee];W[cc];B[])\n",
        application_tag()
    );
    assert_eq!(sgf, expected);
}

#[test]
fn given_record_when_streamed_then_identical_to_string_output() {
    let text = fixture("handicap.gib");
    let mut sink = Vec::new();

    convert_to_writer(&text, Format::Gib, &mut sink).unwrap();

    assert_eq!(String::from_utf8(sink).unwrap(), convert(&text, Format::Gib).unwrap());
}

#[test]
fn given_failing_record_when_streamed_then_nothing_written() {
    let mut sink = Vec::new();

    let result = convert_to_writer("no moves here", Format::Gib, &mut sink);

    assert!(result.is_err());
    assert!(sink.is_empty());
}

#[test]
fn given_value_with_bracket_when_converted_then_value_is_escaped() {
    let text = "[Header]\nSize=19\nHdcp=0,6.5\nPlayerB=Lee]Jr,3d\nPlace=C:\\go\n[Data]\nEE,B1,1,0\n";
    let sgf = convert(text, Format::Ugf).unwrap();

    assert!(sgf.contains("PB[Lee\\]Jr]"));
    assert!(sgf.contains("PC[C:\\\\go]"));
}

#[test]
fn given_ngf_board_size_above_19_when_converted_then_board_size_error() {
    let text = "\n21\nW\nB\n\n0\n\n6.5\n\n\n\n\nPMAABDD\n";

    let result = convert(text, Format::Ngf);

    assert!(matches!(result, Err(DomainError::BoardSize(_))));
}

#[test]
fn given_ngf_oversize_handicap_board_when_converted_then_board_size_error() {
    let text = "\n30\nW\nB\n\n2\n\n0.5\n\n\n\n\nPMAABDD\n";

    let result = convert(text, Format::Ngf);

    assert!(matches!(result, Err(DomainError::BoardSize(_))));
}

#[test]
fn given_ugf_board_of_25_when_converted_then_parses_but_normalization_rejects() {
    let text = "[Header]\nSize=25\nHdcp=0,6.5\n[Data]\nEE,B1,1,0\n";

    assert!(Format::Ugf.parse(text).is_ok());
    assert!(matches!(
        convert(text, Format::Ugf),
        Err(DomainError::BoardSize(_))
    ));
}

// ============================================================
// Serializer
// ============================================================

#[test]
fn given_linear_chain_when_serialized_then_single_flat_group() {
    let mut builder = GameBuilder::new();
    builder.set_root("SZ", "19");
    for (key, value) in [("B", "pd"), ("W", "dp"), ("B", "pp")] {
        builder.append_move(key, value);
    }
    let sgf = serialize(&builder.finish());

    assert_eq!(sgf, "(;SZ[19];B[pd];W[dp];B[pp])\n");
    assert_eq!(sgf.matches('(').count(), 1);
}

#[test]
fn given_branch_point_when_serialized_then_one_nested_group_per_child() {
    let mut builder = GameBuilder::new();
    builder.append_move("B", "pd");
    builder.start_variation();
    builder.append_move("W", "dd");
    builder.append_move("B", "dp");
    builder.end_variation().unwrap();
    builder.start_variation();
    builder.append_move("W", "qp");
    builder.end_variation().unwrap();

    let sgf = serialize(&builder.finish());

    assert_eq!(sgf, "(;;B[pd](;W[dd];B[dp])(;W[qp]))\n");
    assert_eq!(sgf.matches('(').count(), 3);
    assert_eq!(sgf.matches(')').count(), 3);
}

#[test]
fn given_multi_value_property_when_serialized_then_each_value_bracketed() {
    let mut builder = GameBuilder::new();
    builder.add_root("AB", "pd");
    builder.add_root("AB", "dp");
    builder.append_move("W", "pp");

    assert_eq!(serialize(&builder.finish()), "(;AB[pd][dp];W[pp])\n");
}
