use std::error::Error;
use std::fmt::{Debug, Display};
use std::io::{Error as IoError, Write};
use std::str::FromStr;

use itertools::Itertools;

use crate::Rule;

/// A parsed run length encoded Life pattern
///
/// `cells` is `height` rows of `width` cells each.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct RlePattern {
    pub width: usize,
    pub height: usize,
    /// from `#R left top`
    pub left: i64,
    pub top: i64,
    pub name: Option<String>,
    pub origin: Option<String>,
    pub comments: Vec<String>,
    /// `#CXRLE` lines, kept verbatim
    pub extended: Vec<String>,
    pub rule: Rule,
    pub cells: Vec<Vec<bool>>,
}
impl RlePattern {
    /// largest `width * height` a header may declare, cells are allocated up front
    pub const MAX_CELLS: usize = 1 << 28;

    /// pattern with no metadata, panics if the rows aren't all the same length
    pub fn from_cells(cells: Vec<Vec<bool>>) -> Self {
        let width = cells.first().map_or(0, Vec::len);
        assert!(
            cells.iter().all(|row| row.len() == width),
            "rows must all be {width} cells wide"
        );
        Self {
            width,
            height: cells.len(),
            cells,
            ..Self::default()
        }
    }

    pub fn write_to(&self, write: impl Write) -> Result<(), IoError> {
        RleWriter::new(write).write(self)
    }
    pub fn write_to_string(&self) -> String {
        let mut out = Vec::new();
        self.write_to(&mut out).expect("valid bytes");
        String::from_utf8(out).expect("valid string")
    }

    pub fn read_from_string(src: &str) -> Result<Self, RleError> {
        RleReader::new().read(src)
    }
}
impl FromStr for RlePattern {
    type Err = RleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::read_from_string(s)
    }
}

// formatting

const MAX_LINE: usize = 70;

struct RleWriter<W> {
    write: W,
    line_len: usize,
}
impl<W: Write> RleWriter<W> {
    fn new(write: W) -> Self {
        Self { write, line_len: 0 }
    }
    fn write(mut self, pattern: &RlePattern) -> Result<(), IoError> {
        self.write_metadata(pattern)?;
        writeln!(
            self.write,
            "x = {}, y = {}, rule = {}",
            pattern.width, pattern.height, pattern.rule
        )?;
        self.write_body(&pattern.cells)
    }
    fn write_metadata(&mut self, pattern: &RlePattern) -> Result<(), IoError> {
        if let Some(name) = &pattern.name {
            writeln!(self.write, "#N {name}")?;
        }
        if let Some(origin) = &pattern.origin {
            writeln!(self.write, "#O {origin}")?;
        }
        for comment in &pattern.comments {
            writeln!(self.write, "#C {comment}")?;
        }
        for extended in &pattern.extended {
            writeln!(self.write, "#CXRLE {extended}")?;
        }
        writeln!(self.write, "#R {} {}", pattern.left, pattern.top)
    }
    fn write_body(&mut self, cells: &[Vec<bool>]) -> Result<(), IoError> {
        // row ends not yet written, trailing ones never are
        let mut rows = 0;
        for row in cells {
            // dead cells up to the end of the row are implied
            let end = row.iter().rposition(|&alive| alive).map_or(0, |last| last + 1);
            for (count, alive) in row[..end].iter().dedup_with_count() {
                let mut token = String::new();
                match rows {
                    0 => {}
                    1 => token.push('$'),
                    n => token.push_str(&format!("{n}$")),
                }
                rows = 0;
                if count > 1 {
                    token.push_str(&count.to_string());
                }
                token.push(if *alive { 'o' } else { 'b' });
                self.write_token(&token)?;
            }
            rows += 1;
        }
        self.write_token("!")?;
        writeln!(self.write)
    }
    fn write_token(&mut self, token: &str) -> Result<(), IoError> {
        if self.line_len + token.len() > MAX_LINE {
            writeln!(self.write)?;
            self.line_len = 0;
        }
        self.line_len += token.len();
        self.write.write_all(token.as_bytes())
    }
}

// parsing

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RleErrorKind {
    /// a `#` line
    InvalidComment,
    /// the `x = .., y = ..` line
    InvalidHeader,
    /// the run length encoded cells
    InvalidBody,
    /// cells before the header, or no header at all
    MissingHeader,
}
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RleErrorHint {
    MissingSpace,
    UnknownTag,
    InvalidOffset,
    InvalidPair,
    InvalidDimension,
    UnknownKey,
    MissingDimension,
    TooLarge,
    DuplicateHeader,
    InvalidRule,
    InvalidChar,
    RunTooLong,
    TooManyCells,
    TooManyRows,
    BodyBeforeHeader,
    NoHeader,
}

#[derive(Clone)]
struct RleErrorData {
    line: usize,
    column: usize,
    line_src: String,
    hint: RleErrorHint,
}
#[derive(Clone)]
pub struct RleError(Box<RleErrorData>);
impl RleError {
    fn new(line: usize, column: usize, line_src: &str, hint: RleErrorHint) -> Self {
        Self(Box::new(RleErrorData {
            line,
            column,
            line_src: line_src.to_owned(),
            hint,
        }))
    }
    pub fn kind(&self) -> RleErrorKind {
        match self.0.hint {
            RleErrorHint::MissingSpace | RleErrorHint::UnknownTag | RleErrorHint::InvalidOffset => {
                RleErrorKind::InvalidComment
            }
            RleErrorHint::InvalidPair
            | RleErrorHint::InvalidDimension
            | RleErrorHint::UnknownKey
            | RleErrorHint::MissingDimension
            | RleErrorHint::TooLarge
            | RleErrorHint::DuplicateHeader
            | RleErrorHint::InvalidRule => RleErrorKind::InvalidHeader,
            RleErrorHint::InvalidChar
            | RleErrorHint::RunTooLong
            | RleErrorHint::TooManyCells
            | RleErrorHint::TooManyRows => RleErrorKind::InvalidBody,
            RleErrorHint::BodyBeforeHeader | RleErrorHint::NoHeader => RleErrorKind::MissingHeader,
        }
    }
    pub fn line_src(&self) -> &str {
        &self.0.line_src
    }
    /// 0 based line index
    pub fn line(&self) -> usize {
        self.0.line
    }
    /// 0 based column index
    pub fn column(&self) -> usize {
        self.0.column
    }
    pub fn hint(&self) -> &'static str {
        match self.0.hint {
            RleErrorHint::MissingSpace => "Expected a space after the '#' tag",
            RleErrorHint::UnknownTag => "Unknown '#' tag, expected one of #N, #O, #C, #CXRLE, #R, #r",
            RleErrorHint::InvalidOffset => "#R takes two integers separated by a space",
            RleErrorHint::InvalidPair => "Header fields look like 'key = value'",
            RleErrorHint::InvalidDimension => "x and y must be positive integers",
            RleErrorHint::UnknownKey => "Header only has x, y, and rule fields",
            RleErrorHint::MissingDimension => "Header needs both x and y",
            RleErrorHint::TooLarge => "Pattern is too large, x * y can be at most 2^28",
            RleErrorHint::DuplicateHeader => "Only one 'x = .., y = ..' header is allowed",
            RleErrorHint::InvalidRule => "Rule must look like B<digits>/S<digits>",
            RleErrorHint::InvalidChar => "Invalid character, expected digits, 'b', 'o', '$', or '!'",
            RleErrorHint::RunTooLong => "Run count is too large",
            RleErrorHint::TooManyCells => "Row is longer than the header's x",
            RleErrorHint::TooManyRows => "Live cells below the header's y",
            RleErrorHint::BodyBeforeHeader => "Cells must come after the 'x = .., y = ..' header",
            RleErrorHint::NoHeader => "Missing the 'x = .., y = ..' header",
        }
    }
}
impl Debug for RleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RleError")
            .field("line", &self.line())
            .field("column", &self.column())
            .field("line_src", &self.line_src())
            .field("hint", &self.0.hint)
            .finish()
    }
}
impl Display for RleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let line = self.line() + 1;
        let line_src = self.line_src();
        let column = self.column() + 1;
        let mark = "^";
        let hint = self.hint();
        writeln!(
            f,
            "Failed to parse rle on line {line}:\n{line_src}\n{mark:>column$}\n{hint}"
        )
    }
}
impl Error for RleError {}

type RleResult<T> = Result<T, RleError>;

/// the line currently being read, for error reporting
#[derive(Clone, Copy)]
struct Line<'src> {
    index: usize,
    src: &'src str,
}
impl<'src> Line<'src> {
    /// `at` must point into `src`
    fn fail<T>(self, at: &str, hint: RleErrorHint) -> RleResult<T> {
        let column = at.as_ptr() as usize - self.src.as_ptr() as usize;
        Err(RleError::new(self.index, column, self.src, hint))
    }
}

struct RleReader {
    pattern: RlePattern,
    header: bool,
    done: bool,
    x: usize,
    y: usize,
    /// pending run count, may carry over a line break
    count: Option<usize>,
}
impl RleReader {
    fn new() -> Self {
        Self {
            pattern: RlePattern::default(),
            header: false,
            done: false,
            x: 0,
            y: 0,
            count: None,
        }
    }

    fn read(mut self, src: &str) -> RleResult<RlePattern> {
        let mut last = Line { index: 0, src };
        for (index, line_src) in src.lines().enumerate() {
            let line = Line {
                index,
                src: line_src,
            };
            let text = line_src.trim();
            if text.is_empty() {
                continue;
            }
            last = line;
            if text.starts_with('#') {
                self.read_comment(line, text)?;
            } else if text.starts_with('x') {
                self.read_header(line, text)?;
            } else if !self.header {
                return line.fail(text, RleErrorHint::BodyBeforeHeader);
            } else {
                self.read_body(line, text)?;
            }
            if self.done {
                break;
            }
        }
        if !self.header {
            return last.fail(last.src, RleErrorHint::NoHeader);
        }
        Ok(self.pattern)
    }

    fn read_comment(&mut self, line: Line<'_>, text: &str) -> RleResult<()> {
        let Some((tag, content)) = text.split_once(' ') else {
            return line.fail(&text[text.len()..], RleErrorHint::MissingSpace);
        };
        match tag {
            "#N" => self.pattern.name = Some(content.to_owned()),
            "#O" => self.pattern.origin = Some(content.to_owned()),
            "#C" | "#c" => self.pattern.comments.push(content.to_owned()),
            "#CXRLE" => self.pattern.extended.push(content.to_owned()),
            "#R" => {
                let offset: Option<Vec<i64>> =
                    content.split_whitespace().map(|n| n.parse().ok()).collect();
                match offset.as_deref() {
                    Some(&[left, top]) => {
                        self.pattern.left = left;
                        self.pattern.top = top;
                    }
                    _ => return line.fail(content, RleErrorHint::InvalidOffset),
                }
            }
            // xlife rule line, the rule from the header is the one that's kept
            "#r" => {}
            _ => return line.fail(tag, RleErrorHint::UnknownTag),
        }
        Ok(())
    }

    fn read_header(&mut self, line: Line<'_>, text: &str) -> RleResult<()> {
        if self.header {
            return line.fail(text, RleErrorHint::DuplicateHeader);
        }
        let (mut width, mut height) = (None, None);
        for pair in text.split(',') {
            let Some((key, value)) = pair.split_once('=') else {
                return line.fail(pair, RleErrorHint::InvalidPair);
            };
            let value = value.trim();
            match key.trim() {
                "x" => width = Some(parse_dimension(line, value)?),
                "y" => height = Some(parse_dimension(line, value)?),
                "rule" => match value.parse() {
                    Ok(rule) => self.pattern.rule = rule,
                    Err(_) => return line.fail(value, RleErrorHint::InvalidRule),
                },
                _ => return line.fail(pair, RleErrorHint::UnknownKey),
            }
        }
        let (Some(width), Some(height)) = (width, height) else {
            return line.fail(text, RleErrorHint::MissingDimension);
        };
        match width.checked_mul(height) {
            Some(cells) if cells <= RlePattern::MAX_CELLS => {}
            _ => return line.fail(text, RleErrorHint::TooLarge),
        }
        self.pattern.width = width;
        self.pattern.height = height;
        self.pattern.cells = vec![vec![false; width]; height];
        self.header = true;
        Ok(())
    }

    fn read_body(&mut self, line: Line<'_>, text: &str) -> RleResult<()> {
        for (i, c) in text.char_indices() {
            let at = &text[i..];
            match c {
                '0'..='9' => {
                    let digit = c as usize - '0' as usize;
                    let count = self
                        .count
                        .unwrap_or(0)
                        .checked_mul(10)
                        .and_then(|count| count.checked_add(digit));
                    match count {
                        Some(count) => self.count = Some(count),
                        None => return line.fail(at, RleErrorHint::RunTooLong),
                    }
                }
                'b' | 'o' => {
                    let run = self.count.take().unwrap_or(1);
                    let end = match self.x.checked_add(run) {
                        Some(end) if end <= self.pattern.width => end,
                        _ => return line.fail(at, RleErrorHint::TooManyCells),
                    };
                    if c == 'o' {
                        let Some(row) = self.pattern.cells.get_mut(self.y) else {
                            return line.fail(at, RleErrorHint::TooManyRows);
                        };
                        row[self.x..end].fill(true);
                    }
                    self.x = end;
                }
                '$' => {
                    let run = self.count.take().unwrap_or(1);
                    self.y = self.y.saturating_add(run);
                    self.x = 0;
                }
                '!' => {
                    self.done = true;
                    return Ok(());
                }
                _ => return line.fail(at, RleErrorHint::InvalidChar),
            }
        }
        Ok(())
    }
}

fn parse_dimension(line: Line<'_>, value: &str) -> RleResult<usize> {
    match value.parse() {
        Ok(n) if n > 0 => Ok(n),
        _ => line.fail(value, RleErrorHint::InvalidDimension),
    }
}

// tests
