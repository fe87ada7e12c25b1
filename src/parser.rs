//! The pull parser: drives the lexer, enforces the TOML grammar, and
//! assembles the builder tree.

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;

use crate::builder::{BuilderNode, DocumentBuilder, NodeId};
use crate::error::{Error, ErrorKind};
use crate::lexer::{Lexer, State, Token};
use crate::value::{Number, Value};
use num_bigint::BigInt;
use std::borrow::Cow;
use std::fmt::Display;

/// Values nested deeper than this are rejected.
const MAX_RECURSION_DEPTH: i16 = 256;

/// A resolved dotted key: the object it lands in and the final key part.
struct FieldRef {
    object: NodeId,
    key: String,
}

struct Parser<'de> {
    lexer: Lexer<'de>,
    /// One-token lookahead. `None` means end of input.
    next: Option<Token>,
    doc: DocumentBuilder,
}

/// Parses a TOML v1.0.0 document into a [`Value`] tree.
///
/// The root of the returned tree is always a [`Value::Object`]. Object keys
/// retain insertion order. On failure the whole parse is abandoned and the
/// [`Error`] describes the first problem found.
pub fn parse(input: &str) -> Result<Value, Error> {
    // Spans and offsets are u32.
    if input.len() >= u32::MAX as usize {
        return Err(Error::file_too_large());
    }
    let mut lexer = Lexer::new(input);
    let next = lexer.next_token()?;
    let parser = Parser {
        lexer,
        next,
        doc: DocumentBuilder::new(),
    };
    parser.parse_document()
}

impl<'de> Parser<'de> {
    fn peek(&self) -> Result<Token, Error> {
        match self.next {
            Some(token) => Ok(token),
            None => Err(self.lexer.error(ErrorKind::PrematureEof)),
        }
    }

    /// Returns the current token and advances: sets the lexer start-state,
    /// then lexes the following token. Text belonging to the current token
    /// must be captured from the lexer *before* calling this.
    fn poll(&mut self, next_state: State) -> Result<Token, Error> {
        let here = self.peek()?;
        self.lexer.begin(next_state);
        self.next = self.lexer.next_token()?;
        Ok(here)
    }

    fn poll_expected(&mut self, expected: Token, next_state: State) -> Result<(), Error> {
        let actual = self.poll(next_state)?;
        if actual != expected {
            return Err(self.err_unexpected_token(actual, expected.describe()));
        }
        Ok(())
    }

    fn err(&self, kind: ErrorKind) -> Error {
        self.lexer.error(kind)
    }

    fn err_unexpected_token(&self, found: Token, expected: &'static str) -> Error {
        self.err(ErrorKind::UnexpectedToken {
            found: found.describe(),
            expected,
        })
    }

    fn parse_document(mut self) -> Result<Value, Error> {
        let root = self.doc.new_object();
        let mut current = root;
        while self.next.is_some() {
            match self.peek()? {
                Token::UnquotedKey | Token::String => {
                    self.parse_key_val(current, State::ExpectEol, MAX_RECURSION_DEPTH)?;
                }
                Token::StdTableOpen => {
                    self.poll_expected(Token::StdTableOpen, State::ExpectInlineKey)?;
                    let field = self.parse_and_enter_key(root, true)?;
                    current = self.get_or_create_object(field)?;
                    if self.doc.object(current).defined {
                        return Err(self.err(ErrorKind::TableRedefined));
                    }
                    self.doc.object_mut(current).defined = true;
                    self.poll_expected(Token::StdTableClose, State::ExpectEol)?;
                }
                Token::ArrayTableOpen => {
                    self.poll_expected(Token::ArrayTableOpen, State::ExpectInlineKey)?;
                    let field = self.parse_and_enter_key(root, true)?;
                    let array = self.get_or_create_array(field)?;
                    if self.doc.array(array).closed {
                        return Err(self.err(ErrorKind::ArrayClosed));
                    }
                    current = self.doc.push_object(array);
                    self.poll_expected(Token::ArrayTableClose, State::ExpectEol)?;
                }
                other => {
                    return Err(self.err_unexpected_token(other, "key or table"));
                }
            }
        }
        // A clean document ends between statements. Any other resting
        // state means a construct was cut off by EOF.
        let eof_state = self.lexer.state();
        if eof_state != State::ExpectExpression && eof_state != State::ExpectEol {
            return Err(self.err(ErrorKind::UnterminatedStatement));
        }
        Ok(self.doc.finalize(root))
    }

    /// Walks a (possibly dotted) key anchored at `outer`, descending
    /// through intermediate components, and returns where the final part
    /// should be resolved.
    ///
    /// Intermediates auto-vivify as objects. For dotted *assignments*
    /// (`for_table == false`), every traversed table becomes `defined`; for
    /// table headers only the final node is marked, by the caller, so that
    /// a later explicit header for an intermediate stays legal. Traversal
    /// through an open array of tables lands in its most recently appended
    /// element.
    fn parse_and_enter_key(&mut self, outer: NodeId, for_table: bool) -> Result<FieldRef, Error> {
        let mut node = outer;
        loop {
            if self.doc.object(node).closed {
                return Err(self.err(ErrorKind::ObjectClosed));
            }
            if !for_table {
                // Dotted keys define every table they traverse.
                self.doc.object_mut(node).defined = true;
            }

            let part_token = self.peek()?;
            let part = match part_token {
                Token::String => self.lexer.take_text(),
                Token::UnquotedKey => self.lexer.slice().to_owned(),
                other => {
                    return Err(self.err_unexpected_token(other, "quoted or unquoted key"));
                }
            };
            self.poll_expected(part_token, State::ExpectInlineKey)?;
            if self.peek()? != Token::DotSep {
                return Ok(FieldRef { object: node, key: part });
            }
            self.poll_expected(Token::DotSep, State::ExpectInlineKey)?;

            node = match self.doc.object(node).find(&part) {
                None => self.doc.put_object(node, part),
                Some(existing) => match self.doc.node(existing) {
                    BuilderNode::Object(_) => existing,
                    BuilderNode::Array(array) => {
                        if array.closed {
                            return Err(self.err(ErrorKind::ArrayClosed));
                        }
                        // Only arrays introduced by `[[header]]` are open,
                        // and those always hold at least one table.
                        *array.items.last().unwrap()
                    }
                    BuilderNode::Scalar(value) => {
                        return Err(self.err(ErrorKind::PathIntoNonObject {
                            found: value.type_name(),
                        }));
                    }
                },
            };
        }
    }

    fn get_or_create_object(&mut self, field: FieldRef) -> Result<NodeId, Error> {
        match self.doc.object(field.object).find(&field.key) {
            None => Ok(self.doc.put_object(field.object, field.key)),
            Some(existing) => match self.doc.node(existing) {
                BuilderNode::Object(_) => Ok(existing),
                BuilderNode::Array(_) => {
                    Err(self.err(ErrorKind::PathIntoNonObject { found: "array" }))
                }
                BuilderNode::Scalar(value) => Err(self.err(ErrorKind::PathIntoNonObject {
                    found: value.type_name(),
                })),
            },
        }
    }

    fn get_or_create_array(&mut self, field: FieldRef) -> Result<NodeId, Error> {
        match self.doc.object(field.object).find(&field.key) {
            None => Ok(self.doc.put_array(field.object, field.key)),
            Some(existing) => match self.doc.node(existing) {
                BuilderNode::Array(_) => Ok(existing),
                BuilderNode::Object(_) => {
                    Err(self.err(ErrorKind::PathIntoNonArray { found: "table" }))
                }
                BuilderNode::Scalar(value) => Err(self.err(ErrorKind::PathIntoNonArray {
                    found: value.type_name(),
                })),
            },
        }
    }

    fn parse_key_val(&mut self, target: NodeId, next_state: State, depth: i16) -> Result<(), Error> {
        let field = self.parse_and_enter_key(target, false)?;
        self.poll_expected(Token::KeyValSep, State::ExpectValue)?;
        let value = self.parse_value(next_state, depth)?;
        if self.doc.object(field.object).contains(&field.key) {
            return Err(self.err(ErrorKind::DuplicateKey));
        }
        self.doc.object_mut(field.object).insert(field.key, value);
        Ok(())
    }

    fn parse_value(&mut self, next_state: State, depth: i16) -> Result<NodeId, Error> {
        match self.peek()? {
            Token::String => {
                let text = self.lexer.take_text();
                self.poll_expected(Token::String, next_state)?;
                Ok(self.doc.new_scalar(Value::String(text)))
            }
            Token::True => {
                self.poll_expected(Token::True, next_state)?;
                Ok(self.doc.new_scalar(Value::Boolean(true)))
            }
            Token::False => {
                self.poll_expected(Token::False, next_state)?;
                Ok(self.doc.new_scalar(Value::Boolean(false)))
            }
            Token::OffsetDateTime | Token::LocalDateTime | Token::LocalDate | Token::LocalTime => {
                let value = self.parse_date_time(next_state)?;
                Ok(self.doc.new_scalar(value))
            }
            Token::Float => {
                let text = strip_underscores(self.lexer.slice());
                self.poll_expected(Token::Float, next_state)?;
                let number = self.decode_float(&text)?;
                Ok(self.doc.new_scalar(Value::Number(number)))
            }
            Token::Integer => {
                let text = strip_underscores(self.lexer.slice());
                self.poll_expected(Token::Integer, next_state)?;
                let number = self.decode_integer(&text)?;
                Ok(self.doc.new_scalar(Value::Number(number)))
            }
            Token::ArrayOpen => self.parse_array(next_state, depth),
            Token::InlineTableOpen => self.parse_inline_table(next_state, depth),
            other => Err(self.err_unexpected_token(other, "value")),
        }
    }

    fn parse_array(&mut self, next_state: State, depth: i16) -> Result<NodeId, Error> {
        if depth < 0 {
            return Err(self.err(ErrorKind::RecursionLimit));
        }
        // array-values = ws-comment-newline val ws-comment-newline
        //                [ array-sep array-values ]
        self.poll_expected(Token::ArrayOpen, State::ExpectValue)?;
        let id = self.doc.new_array();
        loop {
            let token = self.peek()?;
            if token == Token::ArrayWsCommentNewline {
                self.poll_expected(Token::ArrayWsCommentNewline, State::ExpectValue)?;
                continue;
            }
            if token == Token::ArrayClose {
                break;
            }
            let value = self.parse_value(State::ExpectArraySep, depth - 1)?;
            self.doc.array_mut(id).items.push(value);
            let sep = self.peek()?;
            if sep == Token::ArrayClose {
                break;
            }
            if sep != Token::Comma {
                return Err(self.err_unexpected_token(sep, "comma or array end"));
            }
            self.poll_expected(Token::Comma, State::ExpectValue)?;
        }
        self.poll_expected(Token::ArrayClose, next_state)?;
        self.doc.array_mut(id).closed = true;
        Ok(id)
    }

    fn parse_inline_table(&mut self, next_state: State, depth: i16) -> Result<NodeId, Error> {
        if depth < 0 {
            return Err(self.err(ErrorKind::RecursionLimit));
        }
        // inline-table-keyvals = keyval [ inline-table-sep inline-table-keyvals ]
        self.poll_expected(Token::InlineTableOpen, State::ExpectInlineKey)?;
        let id = self.doc.new_object();
        loop {
            let token = self.peek()?;
            if token == Token::InlineTableClose {
                if self.doc.object(id).is_empty() {
                    break;
                }
                // A separator was consumed to get back here with entries
                // already present.
                return Err(self.err(ErrorKind::TrailingComma));
            }
            self.parse_key_val(id, State::ExpectTableSep, depth - 1)?;
            let sep = self.peek()?;
            if sep == Token::InlineTableClose {
                break;
            }
            if sep != Token::Comma {
                return Err(self.err_unexpected_token(sep, "comma or table end"));
            }
            self.poll_expected(Token::Comma, State::ExpectInlineKey)?;
        }
        self.poll_expected(Token::InlineTableClose, next_state)?;
        let object = self.doc.object_mut(id);
        object.closed = true;
        object.defined = true;
        Ok(id)
    }

    fn parse_date_time(&mut self, next_state: State) -> Result<Value, Error> {
        let token = self.peek()?;
        let raw = self.lexer.slice();
        // The delimiter between date and time may be [Tt ]; normalize the
        // space form to 'T'.
        let text = if matches!(token, Token::OffsetDateTime | Token::LocalDateTime)
            && raw.as_bytes()[10] == b' '
        {
            let mut normalized = String::with_capacity(raw.len());
            normalized.push_str(&raw[..10]);
            normalized.push('T');
            normalized.push_str(&raw[11..]);
            normalized
        } else {
            raw.to_owned()
        };
        self.poll(next_state)?;
        Ok(Value::String(text))
    }

    /// Decodes an integer literal (underscores already stripped) into the
    /// smallest carrier its digit count admits.
    fn decode_integer(&self, text: &str) -> Result<Number, Error> {
        let bytes = text.as_bytes();
        if bytes.len() > 2 && bytes[0] == b'0' {
            // Base-prefixed integers parse as unsigned; the lexer has
            // already rejected a sign in front of a prefix. The digit-count
            // thresholds keep the 32/64-bit rungs from overflowing their
            // signed carriers.
            let digits = &text[2..];
            match bytes[1] {
                b'x' => return self.decode_radix(digits, 16, 31 / 4, 63 / 4),
                b'o' => return self.decode_radix(digits, 8, 31 / 3, 63 / 3),
                b'b' => return self.decode_radix(digits, 2, 31, 63),
                _ => {}
            }
        }

        let (negative, digits) = match bytes.first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let count = digits.len();
        if count <= 9 {
            let v = match digits.parse::<i32>() {
                Ok(v) => v,
                Err(e) => return Err(self.number_error(e)),
            };
            return Ok(Number::Int32(if negative { -v } else { v }));
        }
        if count <= 18 {
            let v = match digits.parse::<i64>() {
                Ok(v) => v,
                Err(e) => return Err(self.number_error(e)),
            };
            let v = if negative { -v } else { v };
            // An 18-digit literal may still fit 32 bits.
            return Ok(if v as i32 as i64 == v {
                Number::Int32(v as i32)
            } else {
                Number::Int64(v)
            });
        }
        match BigInt::parse_bytes(digits.as_bytes(), 10) {
            Some(big) => Ok(Number::BigInt(if negative { -big } else { big })),
            None => Err(self.number_error("invalid digits")),
        }
    }

    fn decode_radix(
        &self,
        digits: &str,
        radix: u32,
        max32: usize,
        max64: usize,
    ) -> Result<Number, Error> {
        let count = digits.len();
        if count <= max32 {
            match i32::from_str_radix(digits, radix) {
                Ok(v) => Ok(Number::Int32(v)),
                Err(e) => Err(self.number_error(e)),
            }
        } else if count <= max64 {
            match i64::from_str_radix(digits, radix) {
                Ok(v) => Ok(Number::Int64(v)),
                Err(e) => Err(self.number_error(e)),
            }
        } else {
            match BigInt::parse_bytes(digits.as_bytes(), radix) {
                Some(big) => Ok(Number::BigInt(big)),
                None => Err(self.number_error("invalid digits")),
            }
        }
    }

    /// Decodes a float literal (underscores already stripped).
    fn decode_float(&self, text: &str) -> Result<Number, Error> {
        if text.ends_with("nan") {
            // The sign of a nan literal is not preserved.
            return Ok(Number::Float(f64::NAN.copysign(1.0)));
        }
        if text.ends_with("inf") {
            return Ok(Number::Float(if text.starts_with('-') {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }));
        }
        match text.parse::<f64>() {
            Ok(v) => Ok(Number::Float(v)),
            Err(e) => Err(self.number_error(e)),
        }
    }

    fn number_error(&self, cause: impl Display) -> Error {
        self.err(ErrorKind::InvalidNumberRepresentation(
            cause.to_string().into_boxed_str(),
        ))
    }
}

fn strip_underscores(text: &str) -> Cow<'_, str> {
    if text.contains('_') {
        Cow::Owned(text.replace('_', ""))
    } else {
        Cow::Borrowed(text)
    }
}
