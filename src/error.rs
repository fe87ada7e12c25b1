//! Parse errors with source locations and snippet rendering.

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;

use std::fmt::{self, Debug, Display, Write as _};

/// Longest snippet line rendered under an error message.
const MAX_SNIPPET_LENGTH: usize = 120;

/// A byte-offset range within a TOML document.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u32,
    /// End byte offset (exclusive).
    pub end: u32,
}

impl Span {
    /// Creates a new [`Span`] from start and end byte offsets.
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

impl From<Span> for std::ops::Range<u32> {
    fn from(s: Span) -> Self {
        s.start..s.end
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(s: Span) -> Self {
        s.start as usize..s.end as usize
    }
}

impl From<std::ops::Range<u32>> for Span {
    fn from(s: std::ops::Range<u32>) -> Self {
        Self::new(s.start, s.end)
    }
}

/// Position of a parse failure within the source document.
///
/// Lines and columns are 1-based and counted in characters;
/// `char_position` is the absolute character offset from the start of the
/// input.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Location {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// Absolute character offset.
    pub char_position: usize,
    /// Absolute byte offset, used for snippet extraction.
    pub(crate) byte_offset: usize,
}

/// Error produced when reading a TOML document.
///
/// Carries the failure [`ErrorKind`], its [`Location`] and byte [`Span`],
/// and the source text. The [`Display`] rendering includes a single-line
/// snippet of the source with a caret pointing at the failure:
///
/// ```text
/// Duplicate key
///  at line: 2, column: 6
/// key = 2
///      ^-- near here
/// ```
#[derive(Clone)]
pub struct Error {
    kind: ErrorKind,
    location: Location,
    span: Span,
    contents: Box<str>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, location: Location, span: Span, contents: &str) -> Self {
        Self {
            kind,
            location,
            span,
            contents: contents.into(),
        }
    }

    /// Error for inputs too large to be offset-addressed. Built without
    /// copying the oversized input.
    pub(crate) fn file_too_large() -> Self {
        Self {
            kind: ErrorKind::FileTooLarge,
            location: Location {
                line: 1,
                column: 1,
                char_position: 0,
                byte_offset: 0,
            },
            span: Span::new(0, 0),
            contents: "".into(),
        }
    }

    /// The kind of failure.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Where the failure occurred.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Byte span of the offending input region.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The bare error message, without location or snippet.
    pub fn message(&self) -> String {
        match &self.kind {
            ErrorKind::UnterminatedString => "Unterminated string".into(),
            ErrorKind::InvalidCharInString(c) => {
                format!("Invalid character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidEscape(c) => {
                format!("Invalid escape character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidHexEscape(c) => {
                format!("Invalid hex escape character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidEscapeValue(v) => format!("Invalid escape value: `{v}`"),
            ErrorKind::Unexpected(c) => format!("Unexpected character: `{}`", Escape(*c)),
            ErrorKind::InvalidNumber => "Invalid number".into(),
            ErrorKind::MultilineStringKey => "Multiline strings are not allowed for keys".into(),
            ErrorKind::UnexpectedToken { found, expected } => {
                format!("Unexpected token: Got {found}, expected {expected}")
            }
            ErrorKind::PrematureEof => "Premature end of file".into(),
            ErrorKind::UnterminatedStatement => {
                "Premature end of file inside an unfinished statement".into()
            }
            ErrorKind::TableRedefined => "Table redefined".into(),
            ErrorKind::DuplicateKey => "Duplicate key".into(),
            ErrorKind::ObjectClosed => "Object already closed".into(),
            ErrorKind::ArrayClosed => "Array already closed".into(),
            ErrorKind::PathIntoNonObject { found } => {
                format!("Path into existing non-object value of type {found}")
            }
            ErrorKind::PathIntoNonArray { found } => {
                format!("Path into existing non-array value of type {found}")
            }
            ErrorKind::TrailingComma => "Trailing comma not permitted for inline tables".into(),
            ErrorKind::InvalidNumberRepresentation(cause) => {
                format!("Invalid number representation: {cause}")
            }
            ErrorKind::FileTooLarge => "Document is too large (maximum 4 GiB)".into(),
            ErrorKind::RecursionLimit => "Maximum nesting depth exceeded".into(),
        }
    }
}

impl std::error::Error for Error {}

impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("location", &self.location)
            .field("span", &self.span)
            .finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n at line: {}, column: {}",
            self.message(),
            self.location.line,
            self.location.column
        )?;

        let content = &*self.contents;
        if content.is_empty() {
            return Ok(());
        }
        let pos = self.location.byte_offset.min(content.len());

        // Single source line around the failure, clipped to
        // MAX_SNIPPET_LENGTH centered on the caret position.
        let mut start = match content[..pos].rfind('\n') {
            Some(i) => i + 1,
            None => 0,
        };
        let mut end = match content[pos..].find('\n') {
            Some(i) => pos + i,
            None => content.len(),
        };
        if end - start > MAX_SNIPPET_LENGTH {
            start = start.max(pos.saturating_sub(MAX_SNIPPET_LENGTH / 2));
            end = end.min(start + MAX_SNIPPET_LENGTH);
            while !content.is_char_boundary(start) {
                start += 1;
            }
            while !content.is_char_boundary(end) {
                end -= 1;
            }
        }

        f.write_char('\n')?;
        for ch in content[start..end].chars() {
            // Non-printable and non-ASCII characters are stripped from the
            // rendered line.
            if ('\x20'..='\x7e').contains(&ch) {
                f.write_char(ch)?;
            }
        }
        f.write_char('\n')?;
        for _ in 0..content[start..pos].chars().count() {
            f.write_char(' ')?;
        }
        f.write_str("^-- near here")
    }
}

/// Failure kinds for TOML parsing.
#[derive(Clone)]
pub enum ErrorKind {
    /// EOF before the closing string delimiter.
    UnterminatedString,

    /// A character not allowed in a string (control characters, or a raw CR
    /// outside a CRLF pair).
    InvalidCharInString(char),

    /// An invalid character after a backslash in a basic string.
    InvalidEscape(char),

    /// A non-hex character inside a `\u`/`\U` escape.
    InvalidHexEscape(char),

    /// A `\u`/`\U` escape that does not name a Unicode scalar value.
    InvalidEscapeValue(u32),

    /// A character with no meaning in the current lexer mode.
    Unexpected(char),

    /// A malformed numeric literal (bad digits, misplaced underscore,
    /// leading zero, sign on a base-prefixed literal).
    InvalidNumber,

    /// A multi-line string used in key position.
    MultilineStringKey,

    /// Wanted one sort of token, but found another.
    UnexpectedToken {
        /// Description of the token that was found.
        found: &'static str,
        /// Description of what was expected instead.
        expected: &'static str,
    },

    /// The document ended where a token was required.
    PrematureEof,

    /// The document ended in the middle of a statement.
    UnterminatedStatement,

    /// A `[table]` header for a table that was already defined.
    TableRedefined,

    /// A key assigned twice within the same table.
    DuplicateKey,

    /// A dotted path reached an inline table, which is sealed.
    ObjectClosed,

    /// A dotted path or `[[header]]` reached an array literal, which is
    /// sealed.
    ArrayClosed,

    /// A dotted path component resolved to a non-table value.
    PathIntoNonObject {
        /// Type name of the value that was found.
        found: &'static str,
    },

    /// An `[[array-table]]` header resolved to a non-array value.
    PathIntoNonArray {
        /// Type name of the value that was found.
        found: &'static str,
    },

    /// A comma before the closing brace of an inline table.
    TrailingComma,

    /// A well-formed literal whose digits could not be converted, with the
    /// underlying parse failure attached.
    InvalidNumberRepresentation(Box<str>),

    /// The input exceeds the maximum supported size of 4 GiB.
    FileTooLarge,

    /// Values nested beyond the supported depth.
    RecursionLimit,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UnterminatedString => "unterminated-string",
            Self::InvalidCharInString(..) => "invalid-char-in-string",
            Self::InvalidEscape(..) => "invalid-escape",
            Self::InvalidHexEscape(..) => "invalid-hex-escape",
            Self::InvalidEscapeValue(..) => "invalid-escape-value",
            Self::Unexpected(..) => "unexpected",
            Self::InvalidNumber => "invalid-number",
            Self::MultilineStringKey => "multiline-string-key",
            Self::UnexpectedToken { .. } => "unexpected-token",
            Self::PrematureEof => "premature-eof",
            Self::UnterminatedStatement => "unterminated-statement",
            Self::TableRedefined => "table-redefined",
            Self::DuplicateKey => "duplicate-key",
            Self::ObjectClosed => "object-closed",
            Self::ArrayClosed => "array-closed",
            Self::PathIntoNonObject { .. } => "path-into-non-object",
            Self::PathIntoNonArray { .. } => "path-into-non-array",
            Self::TrailingComma => "trailing-comma",
            Self::InvalidNumberRepresentation(..) => "invalid-number-representation",
            Self::FileTooLarge => "file-too-large",
            Self::RecursionLimit => "recursion-limit",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

struct Escape(char);

impl Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_whitespace() || self.0.is_control() {
            for esc in self.0.escape_default() {
                f.write_char(esc)?;
            }
            Ok(())
        } else {
            f.write_char(self.0)
        }
    }
}

#[cfg(feature = "reporting")]
#[cfg_attr(docsrs, doc(cfg(feature = "reporting")))]
impl Error {
    /// Converts this [`Error`] into a [`codespan_reporting::diagnostic::Diagnostic`].
    pub fn to_diagnostic<FileId: Copy + PartialEq>(
        &self,
        fid: FileId,
    ) -> codespan_reporting::diagnostic::Diagnostic<FileId> {
        use codespan_reporting::diagnostic::{Diagnostic, Label};

        Diagnostic::error()
            .with_code(self.kind.to_string())
            .with_message(self.message())
            .with_labels(vec![Label::primary(fid, self.span)])
    }
}
