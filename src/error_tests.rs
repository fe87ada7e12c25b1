use crate::{ErrorKind, parse};

fn err(input: &str) -> crate::Error {
    parse(input).unwrap_err()
}

#[test]
fn rendered_message_has_location_snippet_and_caret() {
    let e = err("x = @");
    assert!(matches!(e.kind(), ErrorKind::Unexpected('@')));
    assert_eq!(
        e.to_string(),
        "Unexpected character: `@`\n at line: 1, column: 5\nx = @\n    ^-- near here"
    );
}

#[test]
fn location_is_one_based_and_line_accurate() {
    let e = err("a = 1\na = 2");
    assert!(matches!(e.kind(), ErrorKind::DuplicateKey));
    assert_eq!(e.location().line, 2);
    let rendered = e.to_string();
    assert!(rendered.contains(" at line: 2, column: "));
    assert!(rendered.contains("a = 2"));
    assert!(rendered.ends_with("^-- near here"));
}

#[test]
fn long_lines_are_clipped() {
    let input = format!("key = \"{}", "a".repeat(300));
    let e = err(&input);
    assert!(matches!(e.kind(), ErrorKind::UnterminatedString));
    let rendered = e.to_string();
    let snippet = rendered.lines().nth(2).unwrap();
    assert!(snippet.len() <= 120, "snippet was {} chars", snippet.len());
}

#[test]
fn non_printables_are_stripped_from_snippet() {
    let e = err("k\u{0101}ey = 1");
    let rendered = e.to_string();
    let snippet = rendered.lines().nth(2).unwrap();
    assert!(snippet.is_ascii());
}

#[test]
fn kind_codes() {
    assert_eq!(err("[a]\n[a]").kind().to_string(), "table-redefined");
    assert_eq!(err("a = 1\na = 2").kind().to_string(), "duplicate-key");
    assert_eq!(err("a = ").kind().to_string(), "premature-eof");
    assert_eq!(err("a = \"x").kind().to_string(), "unterminated-string");
}

#[test]
fn bare_messages() {
    assert_eq!(err("[a]\n[a]").message(), "Table redefined");
    assert_eq!(err("a = 1\na = 2").message(), "Duplicate key");
    assert_eq!(
        err("t = { a = 1, }").message(),
        "Trailing comma not permitted for inline tables"
    );
    assert_eq!(err("a = ").message(), "Premature end of file");
}

#[test]
fn span_covers_offending_region() {
    let input = "k = 0x";
    let e = err(input);
    assert!(matches!(e.kind(), ErrorKind::InvalidNumber));
    let span = e.span();
    assert_eq!(&input[span.start as usize..span.end as usize], "0x");
}

#[test]
fn whitespace_characters_are_escaped_in_messages() {
    let e = err("t = {a = 1\n}");
    assert_eq!(e.message(), "Unexpected character: `\\n`");
}
