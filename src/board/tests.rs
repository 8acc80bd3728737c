use super::*;

#[test]
fn minimal_board() {
    let loaded = load(b"o#", None, None).unwrap();
    assert_eq!(loaded.board.height(), 1);
    assert_eq!(loaded.board.car_pos(), (0, 0));
    assert_eq!(loaded.board.tile_at(0, 0), Tile::Empty);
    assert_eq!(loaded.board.tile_at(1, 0), Tile::Exit);
    assert!(!loaded.input_as_text);
    assert!(!loaded.output_as_text);
}

#[test]
fn comments_are_stripped() {
    let loaded = load(b"o ; a comment\n#", None, None).unwrap();
    assert_eq!(loaded.board.height(), 2);
    assert_eq!(loaded.board.row_len(0), 1);
}

#[test]
fn blank_lines_are_dropped() {
    let loaded = load(b"o\n\n\n#", None, None).unwrap();
    assert_eq!(loaded.board.height(), 2);
}

#[test]
fn common_indentation_is_stripped() {
    let loaded = load(b"  o\n  #", None, None).unwrap();
    assert_eq!(loaded.board.row_len(0), 1);
    assert_eq!(loaded.board.tile_at(0, 0), Tile::Empty);
}

#[test]
fn no_deindent_when_any_line_unindented() {
    let loaded = load(b"  o\n#", None, None).unwrap();
    assert_eq!(loaded.board.row_len(0), 3);
    assert_eq!(loaded.board.tile_at(2, 0), Tile::Empty);
}

#[test]
fn intext_directive_sets_flag() {
    let loaded = load(b"@intext\no#", None, None).unwrap();
    assert!(loaded.input_as_text);
}

#[test]
fn caller_override_beats_directive() {
    let loaded = load(b"@intext\no#", Some(false), None).unwrap();
    assert!(!loaded.input_as_text);
}

#[test]
fn outtext_directive_sets_flag() {
    let loaded = load(b"@outtext\no#", None, None).unwrap();
    assert!(loaded.output_as_text);
}

#[test]
fn missing_car_is_error() {
    assert_eq!(load(b".#", None, None).unwrap_err(), LoadError::NoCar);
}

#[test]
fn missing_exit_is_error() {
    assert_eq!(load(b"o.", None, None).unwrap_err(), LoadError::NoExit);
}

#[test]
fn multiple_cars_is_error() {
    assert_eq!(load(b"oo#", None, None).unwrap_err(), LoadError::MultipleCars);
}

#[test]
fn multiple_exits_is_error() {
    assert_eq!(load(b"o##", None, None).unwrap_err(), LoadError::MultipleExits);
}

#[test]
fn empty_bytes_is_error() {
    assert_eq!(load(b"", None, None).unwrap_err(), LoadError::NoProgramData);
}

#[test]
fn comment_only_source_is_error() {
    assert_eq!(load(b"; just a comment", None, None).unwrap_err(), LoadError::NoSourceCode);
}

#[test]
fn unknown_bytes_become_empty() {
    let loaded = load(b"o?#", None, None).unwrap();
    assert_eq!(loaded.board.tile_at(1, 0), Tile::Empty);
}
