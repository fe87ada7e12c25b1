//! Mode-driven tokenizer for TOML documents.
//!
//! TOML is context-sensitive: `2021-05-01` is a date in value position but a
//! bare key in key position. The lexer therefore never decides on its own
//! which productions are legal — the parser sets a [`State`] before every
//! [`Lexer::next_token`] call, and the state selects the accepted tokens and
//! the whitespace discipline (skipped, surfaced, or rejected).

#[cfg(test)]
#[path = "./lexer_tests.rs"]
mod tests;

use crate::error::{Error, ErrorKind, Location, Span};
use crate::time;

/// Token tags produced by the lexer.
///
/// Tokens carry no payload: the parser reads the matched text through
/// [`Lexer::slice`] (raw input) or [`Lexer::take_text`] (the decoded string
/// buffer) before polling the next token.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Token {
    UnquotedKey,
    DotSep,
    String,
    True,
    False,
    OffsetDateTime,
    LocalDateTime,
    LocalDate,
    LocalTime,
    Float,
    Integer,
    StdTableOpen,
    StdTableClose,
    InlineTableOpen,
    InlineTableClose,
    ArrayTableOpen,
    ArrayTableClose,
    ArrayOpen,
    ArrayClose,
    KeyValSep,
    Comma,
    /// A whitespace/comment/newline run in value position; only array
    /// literals accept it.
    ArrayWsCommentNewline,
}

impl Token {
    /// Human description used in "unexpected token" messages.
    pub(crate) fn describe(self) -> &'static str {
        match self {
            Token::UnquotedKey => "unquoted key",
            Token::DotSep => "'.'",
            Token::String => "string",
            Token::True => "'true'",
            Token::False => "'false'",
            Token::OffsetDateTime => "offset date-time",
            Token::LocalDateTime => "local date-time",
            Token::LocalDate => "local date",
            Token::LocalTime => "local time",
            Token::Float => "float",
            Token::Integer => "integer",
            Token::StdTableOpen => "'['",
            Token::StdTableClose => "']'",
            Token::InlineTableOpen => "'{'",
            Token::InlineTableClose => "'}'",
            Token::ArrayTableOpen => "'[['",
            Token::ArrayTableClose => "']]'",
            Token::ArrayOpen => "'['",
            Token::ArrayClose => "']'",
            Token::KeyValSep => "'='",
            Token::Comma => "','",
            Token::ArrayWsCommentNewline => "whitespace",
        }
    }
}

/// Lexer start-states. The parser sets one before each token request.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum State {
    /// Top level, at the start of an expression. Skips blank space,
    /// comments, and newlines.
    ExpectExpression,
    /// After a complete statement: whitespace and an optional comment, then
    /// a newline or EOF. Emits nothing; continues in `ExpectExpression`.
    ExpectEol,
    /// Inside a (possibly dotted) key, a table header, or an inline table
    /// at key position. Newlines are forbidden.
    ExpectInlineKey,
    /// Right-hand side of `=` and element position inside arrays.
    ExpectValue,
    /// After a value inside an array literal. Skips newlines and comments.
    ExpectArraySep,
    /// After a value inside an inline table. Newlines are forbidden.
    ExpectTableSep,
}

pub(crate) struct Lexer<'de> {
    input: &'de str,
    cursor: usize,
    state: State,

    // Position of the cursor, updated on every consumed character.
    line: u32,
    column: u32,
    char_position: usize,

    /// Byte offset where the current token started.
    token_start: usize,
    /// Decoded contents of the current string token. Cleared (capacity
    /// retained) when a new string starts; surrendered to the parser via
    /// [`Lexer::take_text`].
    buffer: String,
}

impl<'de> Lexer<'de> {
    pub(crate) fn new(input: &'de str) -> Self {
        // Skip a UTF-8 BOM (U+FEFF = EF BB BF) if present at the start.
        let bom = input.as_bytes().starts_with(b"\xef\xbb\xbf");
        let cursor = if bom { 3 } else { 0 };
        Lexer {
            input,
            cursor,
            state: State::ExpectExpression,
            line: 0,
            column: 0,
            char_position: usize::from(bom),
            token_start: cursor,
            buffer: String::new(),
        }
    }

    /// Sets the start-state for the next token.
    pub(crate) fn begin(&mut self, state: State) {
        self.state = state;
    }

    pub(crate) fn state(&self) -> State {
        self.state
    }

    /// Raw input text of the current token.
    pub(crate) fn slice(&self) -> &'de str {
        &self.input[self.token_start..self.cursor]
    }

    /// Surrenders the decoded text of the current string token.
    pub(crate) fn take_text(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    /// The cursor position, 1-based for line and column.
    pub(crate) fn location(&self) -> Location {
        Location {
            line: self.line + 1,
            column: self.column + 1,
            char_position: self.char_position,
            byte_offset: self.cursor,
        }
    }

    /// Builds an error at the current cursor position, spanning the current
    /// token.
    pub(crate) fn error(&self, kind: ErrorKind) -> Error {
        let start = self.token_start;
        let end = if self.cursor > start {
            self.cursor
        } else {
            (start + 1).min(self.input.len())
        };
        let span = Span::new(start as u32, end.max(start) as u32);
        Error::new(kind, self.location(), span, self.input)
    }

    fn unexpected(&self) -> Error {
        let c = self.peek_char().unwrap_or(char::REPLACEMENT_CHARACTER);
        self.error(ErrorKind::Unexpected(c))
    }

    fn rest(&self) -> &'de [u8] {
        &self.input.as_bytes()[self.cursor..]
    }

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.cursor).copied()
    }

    #[inline]
    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.cursor + offset).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.cursor..].chars().next()
    }

    /// Advances over one ASCII byte that is not a newline.
    #[inline]
    fn bump(&mut self) {
        self.cursor += 1;
        self.column += 1;
        self.char_position += 1;
    }

    /// Advances over a `\n` byte.
    #[inline]
    fn bump_newline(&mut self) {
        self.cursor += 1;
        self.line += 1;
        self.column = 0;
        self.char_position += 1;
    }

    /// Advances over `n` ASCII bytes containing no newline.
    fn bump_n(&mut self, n: usize) {
        self.cursor += n;
        self.column += n as u32;
        self.char_position += n;
    }

    /// Decodes and advances over one character of any width.
    fn bump_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.cursor += ch.len_utf8();
        self.char_position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    #[inline]
    fn eat_byte(&mut self, b: u8) -> bool {
        if self.peek_byte() == Some(b) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_whitespace(&mut self) {
        while let Some(b' ' | b'\t') = self.peek_byte() {
            self.bump();
        }
    }

    /// Consumes a `#` comment through its line ending (or EOF). Control
    /// characters other than tab end the scan and trip the newline check.
    fn eat_comment(&mut self) -> Result<(), Error> {
        self.bump(); // '#'
        loop {
            match self.peek_byte() {
                Some(0x09 | 0x20..=0x7E) => self.bump(),
                Some(0x80..) => {
                    self.bump_char();
                }
                _ => break,
            }
        }
        self.eat_newline_or_eof()
    }

    fn eat_newline_or_eof(&mut self) -> Result<(), Error> {
        match self.peek_byte() {
            None => Ok(()),
            Some(b'\n') => {
                self.bump_newline();
                Ok(())
            }
            Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                self.bump();
                self.bump_newline();
                Ok(())
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Lexes the next token under the current start-state. Returns `None`
    /// at end of input.
    pub(crate) fn next_token(&mut self) -> Result<Option<Token>, Error> {
        loop {
            match self.state {
                State::ExpectExpression => return self.lex_expression(),
                State::ExpectEol => {
                    if self.lex_eol()? {
                        return Ok(None);
                    }
                    // Line consumed; continue lexing the next expression.
                }
                State::ExpectInlineKey => return self.lex_inline_key(),
                State::ExpectValue => return self.lex_value(),
                State::ExpectArraySep => return self.lex_array_sep(),
                State::ExpectTableSep => return self.lex_table_sep(),
            }
        }
    }

    /// Consumes the rest of the current statement line: whitespace, an
    /// optional comment, and the newline. Emits nothing. Returns `true` at
    /// end of input; otherwise leaves the lexer in `ExpectExpression`.
    fn lex_eol(&mut self) -> Result<bool, Error> {
        self.eat_whitespace();
        match self.peek_byte() {
            None => Ok(true),
            Some(b'#') => {
                self.eat_comment()?;
                self.state = State::ExpectExpression;
                Ok(false)
            }
            Some(b'\n') => {
                self.bump_newline();
                self.state = State::ExpectExpression;
                Ok(false)
            }
            Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                self.bump();
                self.bump_newline();
                self.state = State::ExpectExpression;
                Ok(false)
            }
            Some(_) => Err(self.unexpected()),
        }
    }

    fn lex_expression(&mut self) -> Result<Option<Token>, Error> {
        loop {
            self.eat_whitespace();
            match self.peek_byte() {
                None => return Ok(None),
                Some(b'\n') => self.bump_newline(),
                Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                    self.bump();
                    self.bump_newline();
                }
                Some(b'#') => self.eat_comment()?,
                Some(b) => {
                    self.token_start = self.cursor;
                    return match b {
                        b'[' => {
                            self.bump();
                            if self.eat_byte(b'[') {
                                Ok(Some(Token::ArrayTableOpen))
                            } else {
                                Ok(Some(Token::StdTableOpen))
                            }
                        }
                        b'"' | b'\'' => self.lex_key_string(b),
                        _ if is_keylike_byte(b) => {
                            self.read_keylike();
                            Ok(Some(Token::UnquotedKey))
                        }
                        _ => Err(self.unexpected()),
                    };
                }
            }
        }
    }

    fn lex_inline_key(&mut self) -> Result<Option<Token>, Error> {
        self.eat_whitespace();
        let Some(b) = self.peek_byte() else {
            return Ok(None);
        };
        self.token_start = self.cursor;
        match b {
            b'.' => {
                self.bump();
                Ok(Some(Token::DotSep))
            }
            b'=' => {
                self.bump();
                Ok(Some(Token::KeyValSep))
            }
            b']' => {
                self.bump();
                if self.eat_byte(b']') {
                    Ok(Some(Token::ArrayTableClose))
                } else {
                    Ok(Some(Token::StdTableClose))
                }
            }
            b'}' => {
                self.bump();
                Ok(Some(Token::InlineTableClose))
            }
            b'"' | b'\'' => self.lex_key_string(b),
            _ if is_keylike_byte(b) => {
                self.read_keylike();
                Ok(Some(Token::UnquotedKey))
            }
            _ => Err(self.unexpected()),
        }
    }

    fn lex_value(&mut self) -> Result<Option<Token>, Error> {
        self.eat_whitespace();
        // A run containing a newline or comment is its own token here;
        // only the array loops accept it. This is what makes a newline
        // between `=` and a top-level value an error.
        match self.peek_byte() {
            Some(b'\n' | b'#') => {
                self.lex_ws_comment_newline()?;
                return Ok(Some(Token::ArrayWsCommentNewline));
            }
            Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                self.lex_ws_comment_newline()?;
                return Ok(Some(Token::ArrayWsCommentNewline));
            }
            _ => {}
        }
        let Some(b) = self.peek_byte() else {
            return Ok(None);
        };
        self.token_start = self.cursor;
        match b {
            b'"' | b'\'' => {
                self.read_string(b)?;
                Ok(Some(Token::String))
            }
            b'[' => {
                self.bump();
                Ok(Some(Token::ArrayOpen))
            }
            b']' => {
                self.bump();
                Ok(Some(Token::ArrayClose))
            }
            b'{' => {
                self.bump();
                Ok(Some(Token::InlineTableOpen))
            }
            b'0'..=b'9' => {
                if let Some((consumed, token)) = time::munch(self.rest()) {
                    self.bump_n(consumed);
                    return Ok(Some(token));
                }
                self.scan_number(false)
            }
            b'+' | b'-' => {
                self.bump();
                self.scan_number(true)
            }
            _ if is_keylike_byte(b) => self.scan_symbolic(),
            _ => Err(self.unexpected()),
        }
    }

    fn lex_array_sep(&mut self) -> Result<Option<Token>, Error> {
        loop {
            match self.peek_byte() {
                None => return Ok(None),
                Some(b' ' | b'\t') => self.bump(),
                Some(b'\n') => self.bump_newline(),
                Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                    self.bump();
                    self.bump_newline();
                }
                Some(b'#') => self.eat_comment()?,
                Some(b',') => {
                    self.token_start = self.cursor;
                    self.bump();
                    return Ok(Some(Token::Comma));
                }
                Some(b']') => {
                    self.token_start = self.cursor;
                    self.bump();
                    return Ok(Some(Token::ArrayClose));
                }
                Some(_) => return Err(self.unexpected()),
            }
        }
    }

    fn lex_table_sep(&mut self) -> Result<Option<Token>, Error> {
        self.eat_whitespace();
        match self.peek_byte() {
            None => Ok(None),
            Some(b',') => {
                self.token_start = self.cursor;
                self.bump();
                Ok(Some(Token::Comma))
            }
            Some(b'}') => {
                self.token_start = self.cursor;
                self.bump();
                Ok(Some(Token::InlineTableClose))
            }
            Some(_) => Err(self.unexpected()),
        }
    }

    /// Consumes a whitespace/comment/newline run.
    fn lex_ws_comment_newline(&mut self) -> Result<(), Error> {
        self.token_start = self.cursor;
        loop {
            match self.peek_byte() {
                Some(b' ' | b'\t') => self.bump(),
                Some(b'\n') => self.bump_newline(),
                Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                    self.bump();
                    self.bump_newline();
                }
                Some(b'#') => self.eat_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn read_keylike(&mut self) {
        while let Some(b) = self.peek_byte() {
            if !is_keylike_byte(b) {
                break;
            }
            self.bump();
        }
    }

    fn lex_key_string(&mut self, delim: u8) -> Result<Option<Token>, Error> {
        let multiline = self.read_string(delim)?;
        if multiline {
            return Err(self.error(ErrorKind::MultilineStringKey));
        }
        Ok(Some(Token::String))
    }

    /// Reads a string at the opening delimiter, decoding it into the text
    /// buffer. Returns whether the string used the multi-line form.
    fn read_string(&mut self, delim: u8) -> Result<bool, Error> {
        self.buffer.clear();
        self.bump(); // opening quote
        let mut multiline = false;
        if self.eat_byte(delim) {
            if self.eat_byte(delim) {
                multiline = true;
            } else {
                return Ok(false); // empty string
            }
        }
        if multiline {
            // A newline immediately following the opening delimiter is
            // discarded.
            match self.peek_byte() {
                Some(b'\n') => self.bump_newline(),
                Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                    self.bump();
                    self.bump_newline();
                }
                _ => {}
            }
        }

        loop {
            let Some(b) = self.peek_byte() else {
                return Err(self.error(ErrorKind::UnterminatedString));
            };
            match b {
                d if d == delim => {
                    if !multiline {
                        self.bump();
                        return Ok(false);
                    }
                    // 1-2 adjacent quotes are content; a run of 3-5 closes
                    // the string, with any quotes beyond three belonging to
                    // the content.
                    let mut run = 1;
                    while run < 5 && self.peek_byte_at(run) == Some(delim) {
                        run += 1;
                    }
                    if run < 3 {
                        for _ in 0..run {
                            self.buffer.push(delim as char);
                            self.bump();
                        }
                    } else {
                        for _ in 0..run - 3 {
                            self.buffer.push(delim as char);
                            self.bump();
                        }
                        self.bump_n(3);
                        return Ok(true);
                    }
                }
                b'\\' if delim == b'"' => {
                    self.bump();
                    self.read_basic_escape(multiline)?;
                }
                b'\n' => {
                    if !multiline {
                        return Err(self.error(ErrorKind::InvalidCharInString('\n')));
                    }
                    self.buffer.push('\n');
                    self.bump_newline();
                }
                b'\r' => {
                    if multiline && self.peek_byte_at(1) == Some(b'\n') {
                        self.buffer.push('\r');
                        self.buffer.push('\n');
                        self.bump();
                        self.bump_newline();
                    } else {
                        return Err(self.error(ErrorKind::InvalidCharInString('\r')));
                    }
                }
                b'\t' => {
                    self.buffer.push('\t');
                    self.bump();
                }
                0x00..=0x1F | 0x7F => {
                    return Err(self.error(ErrorKind::InvalidCharInString(b as char)));
                }
                0x20..=0x7E => {
                    self.buffer.push(b as char);
                    self.bump();
                }
                _ => {
                    if let Some(ch) = self.bump_char() {
                        self.buffer.push(ch);
                    }
                }
            }
        }
    }

    /// Decodes one escape sequence; the cursor sits after the backslash.
    fn read_basic_escape(&mut self, multi: bool) -> Result<(), Error> {
        let Some(b) = self.peek_byte() else {
            return Err(self.error(ErrorKind::UnterminatedString));
        };
        match b {
            b'"' => {
                self.bump();
                self.buffer.push('"');
            }
            b'\\' => {
                self.bump();
                self.buffer.push('\\');
            }
            b'b' => {
                self.bump();
                self.buffer.push('\u{0008}');
            }
            b'f' => {
                self.bump();
                self.buffer.push('\u{000C}');
            }
            b'n' => {
                self.bump();
                self.buffer.push('\n');
            }
            b'r' => {
                self.bump();
                self.buffer.push('\r');
            }
            b't' => {
                self.bump();
                self.buffer.push('\t');
            }
            b'u' => {
                self.bump();
                let ch = self.read_hex(4)?;
                self.buffer.push(ch);
            }
            b'U' => {
                self.bump();
                let ch = self.read_hex(8)?;
                self.buffer.push(ch);
            }
            b' ' | b'\t' | b'\n' | b'\r' if multi => self.eat_line_ending_backslash(b)?,
            _ => {
                let c = self.peek_char().unwrap_or(char::REPLACEMENT_CHARACTER);
                return Err(self.error(ErrorKind::InvalidEscape(c)));
            }
        }
        Ok(())
    }

    /// Line-ending backslash: the backslash and any inline whitespace must
    /// be followed by a newline; everything through the next non-whitespace
    /// character is discarded.
    fn eat_line_ending_backslash(&mut self, first: u8) -> Result<(), Error> {
        match first {
            b'\n' => self.bump_newline(),
            b'\r' => {
                if self.peek_byte_at(1) == Some(b'\n') {
                    self.bump();
                    self.bump_newline();
                } else {
                    return Err(self.error(ErrorKind::InvalidCharInString('\r')));
                }
            }
            _ => {
                // ' ' or '\t'
                self.bump();
                loop {
                    match self.peek_byte() {
                        Some(b' ' | b'\t') => self.bump(),
                        Some(b'\n') => {
                            self.bump_newline();
                            break;
                        }
                        Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                            self.bump();
                            self.bump_newline();
                            break;
                        }
                        _ => return Err(self.error(ErrorKind::InvalidEscape(first as char))),
                    }
                }
            }
        }
        loop {
            match self.peek_byte() {
                Some(b' ' | b'\t') => self.bump(),
                Some(b'\n') => self.bump_newline(),
                Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                    self.bump();
                    self.bump_newline();
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_hex(&mut self, n: u32) -> Result<char, Error> {
        let mut val: u32 = 0;
        for _ in 0..n {
            let Some(b) = self.peek_byte() else {
                return Err(self.error(ErrorKind::UnterminatedString));
            };
            let Some(digit) = (b as char).to_digit(16) else {
                let c = self.peek_char().unwrap_or(char::REPLACEMENT_CHARACTER);
                return Err(self.error(ErrorKind::InvalidHexEscape(c)));
            };
            val = (val << 4) | digit;
            self.bump();
        }
        match char::from_u32(val) {
            Some(ch) => Ok(ch),
            None => Err(self.error(ErrorKind::InvalidEscapeValue(val))),
        }
    }

    /// Scans `true`, `false`, or the bare special floats in value position.
    fn scan_symbolic(&mut self) -> Result<Option<Token>, Error> {
        let rest = self.rest();
        let len = rest
            .iter()
            .position(|&b| !is_keylike_byte(b))
            .unwrap_or(rest.len());
        let token = match &rest[..len] {
            b"true" => Token::True,
            b"false" => Token::False,
            b"inf" | b"nan" => Token::Float,
            _ => return Err(self.unexpected()),
        };
        self.bump_n(len);
        Ok(Some(token))
    }

    /// Scans a numeric literal; the cursor sits after the optional sign.
    /// Validates the literal's shape (digit alphabet, underscore placement,
    /// leading zeros) and classifies integer against float. Digit-to-value
    /// conversion is the parser's job.
    fn scan_number(&mut self, signed: bool) -> Result<Option<Token>, Error> {
        let run_start = self.cursor;
        self.read_number_run();
        let run = &self.input.as_bytes()[run_start..self.cursor];
        if matches!(run, b"inf" | b"nan") {
            return Ok(Some(Token::Float));
        }
        match classify_number(run, signed) {
            Some(token) => Ok(Some(token)),
            None => Err(self.error(ErrorKind::InvalidNumber)),
        }
    }

    /// Consumes the maximal run of bytes that can belong to one numeric
    /// literal. `+`/`-` are only part of the run directly after an exponent
    /// marker.
    fn read_number_run(&mut self) {
        let mut prev = 0u8;
        while let Some(b) = self.peek_byte() {
            let ok = b.is_ascii_alphanumeric()
                || b == b'_'
                || b == b'.'
                || ((b == b'+' || b == b'-') && matches!(prev, b'e' | b'E'));
            if !ok {
                break;
            }
            prev = b;
            self.bump();
        }
    }
}

#[inline]
fn is_keylike_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Shape-validates a numeric literal and classifies it.
///
/// `run` excludes the sign; `signed` records whether one was present (TOML
/// forbids signs on base-prefixed integers).
fn classify_number(run: &[u8], signed: bool) -> Option<Token> {
    if let [b'0', base @ (b'x' | b'o' | b'b'), digits @ ..] = run {
        if signed {
            return None;
        }
        let good = match base {
            b'x' => digits_valid(digits, |b| b.is_ascii_hexdigit()),
            b'o' => digits_valid(digits, |b| (b'0'..=b'7').contains(&b)),
            _ => digits_valid(digits, |b| b == b'0' || b == b'1'),
        };
        return good.then_some(Token::Integer);
    }

    // decimal: int-part [ '.' frac ] [ ('e'|'E') ['+'|'-'] exp ]
    let int_end = run
        .iter()
        .position(|&b| matches!(b, b'.' | b'e' | b'E'))
        .unwrap_or(run.len());
    if !decimal_int_valid(&run[..int_end]) {
        return None;
    }
    let mut i = int_end;
    let mut float = false;
    if run.get(i) == Some(&b'.') {
        float = true;
        i += 1;
        let frac_end = run[i..]
            .iter()
            .position(|&b| matches!(b, b'e' | b'E'))
            .map(|p| i + p)
            .unwrap_or(run.len());
        if !digits_valid(&run[i..frac_end], |b| b.is_ascii_digit()) {
            return None;
        }
        i = frac_end;
    }
    if matches!(run.get(i), Some(b'e' | b'E')) {
        float = true;
        i += 1;
        if matches!(run.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        // Exponent digits may carry leading zeros.
        if !digits_valid(&run[i..], |b| b.is_ascii_digit()) {
            return None;
        }
        i = run.len();
    }
    if i != run.len() {
        return None;
    }
    Some(if float { Token::Float } else { Token::Integer })
}

/// At least one digit, underscores only between digits.
fn digits_valid(bytes: &[u8], is_digit: impl Fn(u8) -> bool) -> bool {
    let mut has_digit = false;
    let mut prev_underscore = false;
    for &b in bytes {
        if b == b'_' {
            if !has_digit || prev_underscore {
                return false;
            }
            prev_underscore = true;
        } else if is_digit(b) {
            has_digit = true;
            prev_underscore = false;
        } else {
            return false;
        }
    }
    has_digit && !prev_underscore
}

/// Decimal integer part: digits with underscores, no leading zero unless
/// the part is exactly `0`.
fn decimal_int_valid(bytes: &[u8]) -> bool {
    if !digits_valid(bytes, |b| b.is_ascii_digit()) {
        return false;
    }
    bytes.len() == 1 || bytes[0] != b'0'
}
