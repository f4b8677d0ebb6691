//! JavaScript tokenizer.
//!
//! The scanner is driven by the parser one token at a time. `/` is always
//! produced as a punctuator; when the parser is at an expression position it
//! asks for a rescan as a regular expression. Template literals are scanned
//! chunk by chunk: the parser rescans the `}` that closes a substitution as
//! the start of the next chunk.

use super::{regexp, Feature, SyntaxError, SyntaxResult};
use crate::version::EcmaVersion;

// ─────────────────────────────────────────────────────────────────────────────
// Position / Token
// ─────────────────────────────────────────────────────────────────────────────

/// A byte offset + line/column location in source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Position {
    /// Byte offset from the beginning of the source string.
    pub offset: usize,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column, in UTF-16 code units.
    pub column: u32,
}

impl Position {
    /// The first character of a source text.
    pub const START: Self = Self {
        offset: 0,
        line: 1,
        column: 1,
    };
}

/// The syntactic category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier, keyword, or contextual word.
    Name,
    /// Operator or delimiter.
    Punct,
    /// Numeric literal.
    Number,
    /// String literal.
    String,
    /// One chunk of a template literal (`` `…${ ``, `}…${`, `}…` `` or `` `…` ``).
    Template,
    /// Regular expression literal.
    RegExp,
    /// End of input.
    Eof,
}

/// A scanned token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Category.
    pub kind: TokenKind,
    /// Inclusive start.
    pub start: Position,
    /// Exclusive end.
    pub end: Position,
    /// A line terminator separates this token from the previous one.
    pub newline_before: bool,
    /// Decoded name when the source spelled it with `\u` escapes.
    pub(crate) escaped_name: Option<String>,
    /// Legacy octal number (`017`, `09`) or string with an octal escape.
    pub(crate) legacy_octal: bool,
    /// Template chunk closes the literal.
    pub(crate) template_tail: bool,
    /// First escape in a template chunk that only tagged templates tolerate.
    pub(crate) bad_escape: Option<Position>,
}

impl Token {
    fn new(kind: TokenKind, start: Position, end: Position) -> Self {
        Self {
            kind,
            start,
            end,
            newline_before: false,
            escaped_name: None,
            legacy_octal: false,
            template_tail: false,
            bad_escape: None,
        }
    }

    /// Raw source text of the token.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start.offset..self.end.offset]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Character classes
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_whitespace(c: char) -> bool {
    match c {
        '\t' | '\u{0B}' | '\u{0C}' | ' ' | '\u{A0}' | '\u{FEFF}' => true,
        '\u{85}' => false,
        c if c.is_ascii() => false,
        c => c.is_whitespace() && !is_line_terminator(c),
    }
}

pub(crate) fn is_id_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '$' || c == '_' || (!c.is_ascii() && c.is_alphabetic())
}

// Non-ASCII continuation characters are accepted unless they are spacing;
// combining marks and connector punctuation have no std predicate.
pub(crate) fn is_id_part(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphanumeric() || c == '$' || c == '_'
    } else {
        !c.is_whitespace() && !is_line_terminator(c)
    }
}

/// Longest first: the scanner takes the first entry that matches.
const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "=>", "==", "!=", "<=", ">=", "&&",
    "||", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "**", "{", "}",
    "(", ")", "[", "]", ";", ",", "<", ">", "+", "-", "*", "/", "%", "&", "|", "^", "!", "~", "?",
    ":", "=", ".",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    Plain,
    LegacyOctal,
    /// Malformed, tolerated only in tagged templates.
    Invalid(Position),
}

// ─────────────────────────────────────────────────────────────────────────────
// Scanner
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub(crate) struct Scanner<'src> {
    source: &'src str,
    version: EcmaVersion,
    /// Module code has no HTML-like comments.
    module: bool,
    pos: Position,
}

impl<'src> Scanner<'src> {
    pub(crate) fn new(source: &'src str, version: EcmaVersion) -> Self {
        Self {
            source,
            version,
            module: false,
            pos: Position::START,
        }
    }

    pub(crate) fn module(mut self, module: bool) -> Self {
        self.module = module;
        self
    }

    pub(crate) fn position(&self) -> Position {
        self.pos
    }

    pub(crate) fn reset(&mut self, pos: Position) {
        self.pos = pos;
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos.offset..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.source[self.pos.offset..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos.offset += c.len_utf8();
        match c {
            '\n' | '\u{2028}' | '\u{2029}' => {
                self.pos.line += 1;
                self.pos.column = 1;
            }
            // `\r\n` is one line break, counted on the `\n`.
            '\r' if self.peek() == Some('\n') => self.pos.column += 1,
            '\r' => {
                self.pos.line += 1;
                self.pos.column = 1;
            }
            _ => self.pos.column += c.len_utf16() as u32,
        }
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn gate(&self, feature: Feature, pos: Position) -> SyntaxResult<()> {
        feature.gate(self.version, pos)
    }

    /// Skips a `#!` line at the very start of the input.
    pub(crate) fn skip_hash_bang(&mut self) {
        if self.pos.offset == 0 && self.source.starts_with("#!") {
            while self.peek().is_some_and(|c| !is_line_terminator(c)) {
                self.bump();
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while self.peek().is_some_and(|c| !is_line_terminator(c)) {
            self.bump();
        }
    }

    /// Skips whitespace and comments; reports whether a line break was seen.
    ///
    /// Scripts also treat `<!--` and a `-->` opening a line as line comments.
    fn skip_trivia(&mut self) -> SyntaxResult<bool> {
        let at_input_start = self.pos.offset == 0;
        let mut newline = false;
        loop {
            let rest = &self.source[self.pos.offset..];
            match self.peek() {
                _ if !self.module && rest.starts_with("<!--") => self.skip_line_comment(),
                _ if !self.module
                    && (newline || at_input_start)
                    && rest.starts_with("-->") =>
                {
                    self.skip_line_comment();
                }
                Some(c) if is_line_terminator(c) => {
                    newline = true;
                    self.bump();
                }
                Some(c) if is_whitespace(c) => {
                    self.bump();
                }
                Some('/') if self.peek_nth(1) == Some('/') => self.skip_line_comment(),
                Some('/') if self.peek_nth(1) == Some('*') => {
                    let start = self.pos;
                    self.bump();
                    self.bump();
                    loop {
                        match self.peek() {
                            None => {
                                return Err(SyntaxError::new("Unterminated comment", start));
                            }
                            Some('*') if self.peek_nth(1) == Some('/') => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            Some(c) => {
                                newline |= is_line_terminator(c);
                                self.bump();
                            }
                        }
                    }
                }
                _ => return Ok(newline),
            }
        }
    }

    /// Scans the next token.
    pub(crate) fn next_token(&mut self) -> SyntaxResult<Token> {
        let newline_before = self.skip_trivia()?;
        let start = self.pos;
        let Some(c) = self.peek() else {
            let mut eof = Token::new(TokenKind::Eof, start, start);
            eof.newline_before = newline_before;
            return Ok(eof);
        };
        let mut token = match c {
            '"' | '\'' => self.scan_string(c, start)?,
            '`' => {
                self.gate(Feature::TemplateLiterals, start)?;
                self.bump();
                self.scan_template_chunk(start)?
            }
            '0'..='9' => self.scan_number(start)?,
            '.' if self.peek_nth(1).is_some_and(|n| n.is_ascii_digit()) => {
                self.scan_number(start)?
            }
            c if is_id_start(c) || c == '\\' => self.scan_name(start)?,
            _ => self.scan_punct(c, start)?,
        };
        token.newline_before = newline_before;
        Ok(token)
    }

    fn scan_punct(&mut self, c: char, start: Position) -> SyntaxResult<Token> {
        let source = self.source;
        let rest = &source[start.offset..];
        let Some(punct) = PUNCTUATORS.iter().find(|p| rest.starts_with(**p)) else {
            return Err(SyntaxError::new(
                format!("Unexpected character '{c}'"),
                start,
            ));
        };
        for _ in 0..punct.len() {
            self.bump();
        }
        Ok(Token::new(TokenKind::Punct, start, self.pos))
    }

    fn scan_name(&mut self, start: Position) -> SyntaxResult<Token> {
        let source = self.source;
        let mut decoded: Option<String> = None;
        let mut first = true;
        loop {
            match self.peek() {
                Some('\\') => {
                    let escape_start = self.pos;
                    let prefix = &source[start.offset..escape_start.offset];
                    self.bump();
                    if !self.eat('u') {
                        return Err(SyntaxError::new(
                            "Expecting Unicode escape sequence \\uXXXX",
                            escape_start,
                        ));
                    }
                    let code = self.scan_unicode_escape(escape_start)?;
                    let valid = char::from_u32(code)
                        .filter(|&c| if first { is_id_start(c) } else { is_id_part(c) });
                    let Some(c) = valid else {
                        return Err(SyntaxError::new(
                            "Invalid Unicode escape in identifier",
                            escape_start,
                        ));
                    };
                    decoded.get_or_insert_with(|| prefix.to_string()).push(c);
                }
                Some(c) if (first && is_id_start(c)) || (!first && is_id_part(c)) => {
                    self.bump();
                    if let Some(name) = decoded.as_mut() {
                        name.push(c);
                    }
                }
                _ => break,
            }
            first = false;
        }
        let mut token = Token::new(TokenKind::Name, start, self.pos);
        token.escaped_name = decoded;
        Ok(token)
    }

    /// Reads the body of a `\u` escape (after the `u`) and returns the code unit or point.
    fn scan_unicode_escape(&mut self, escape_start: Position) -> SyntaxResult<u32> {
        if self.peek() != Some('{') {
            return self.scan_hex(Some(4), escape_start);
        }
        self.gate(Feature::CodePointEscapes, escape_start)?;
        self.bump();
        let value = self.scan_hex(None, escape_start)?;
        if !self.eat('}') {
            return Err(SyntaxError::new(
                "Bad character escape sequence",
                escape_start,
            ));
        }
        if value > 0x0010_FFFF {
            return Err(SyntaxError::new("Code point out of bounds", escape_start));
        }
        Ok(value)
    }

    /// Reads exactly `len` hex digits, or at least one when `len` is `None`.
    fn scan_hex(&mut self, len: Option<usize>, escape_start: Position) -> SyntaxResult<u32> {
        let mut value: u32 = 0;
        let mut count = 0;
        while len.map_or(true, |len| count < len) {
            let Some(digit) = self.peek().and_then(|c| c.to_digit(16)) else {
                break;
            };
            value = value.saturating_mul(16).saturating_add(digit);
            count += 1;
            self.bump();
        }
        if count == 0 || len.is_some_and(|len| count != len) {
            return Err(SyntaxError::new(
                "Bad character escape sequence",
                escape_start,
            ));
        }
        Ok(value)
    }

    fn skip_digits(&mut self, radix: u32) -> usize {
        let mut count = 0;
        while self.peek().is_some_and(|c| c.is_digit(radix)) {
            self.bump();
            count += 1;
        }
        count
    }

    fn scan_number(&mut self, start: Position) -> SyntaxResult<Token> {
        let mut legacy_octal = false;
        let radix_prefix = if self.peek() == Some('0') {
            self.peek_nth(1)
        } else {
            None
        };
        match radix_prefix {
            Some('x' | 'X') => self.scan_radix_literal(16)?,
            Some(c @ ('b' | 'B' | 'o' | 'O')) => {
                self.gate(Feature::BinaryOctalLiterals, start)?;
                self.scan_radix_literal(if matches!(c, 'b' | 'B') { 2 } else { 8 })?;
            }
            Some('0'..='9') => {
                legacy_octal = true;
                self.bump();
                let digits_start = self.pos.offset;
                self.skip_digits(10);
                // `08` / `09.5` are decimal in sloppy mode.
                if self.source[digits_start..self.pos.offset].contains(['8', '9']) {
                    self.scan_decimal_tail()?;
                }
            }
            _ => {
                self.skip_digits(10);
                self.scan_decimal_tail()?;
            }
        }
        if self
            .peek()
            .is_some_and(|c| is_id_start(c) || c == '\\' || c.is_ascii_digit())
        {
            return Err(SyntaxError::new(
                "Identifier directly after number",
                self.pos,
            ));
        }
        let mut token = Token::new(TokenKind::Number, start, self.pos);
        token.legacy_octal = legacy_octal;
        Ok(token)
    }

    fn scan_radix_literal(&mut self, radix: u32) -> SyntaxResult<()> {
        self.bump();
        self.bump();
        if self.skip_digits(radix) == 0 {
            return Err(SyntaxError::new(
                format!("Expected number in radix {radix}"),
                self.pos,
            ));
        }
        Ok(())
    }

    fn scan_decimal_tail(&mut self) -> SyntaxResult<()> {
        if self.eat('.') {
            self.skip_digits(10);
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let exponent = self.pos;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.skip_digits(10) == 0 {
                return Err(SyntaxError::new("Invalid number", exponent));
            }
        }
        Ok(())
    }

    fn scan_string(&mut self, quote: char, start: Position) -> SyntaxResult<Token> {
        self.bump();
        let mut legacy_octal = false;
        loop {
            match self.peek() {
                None | Some('\n' | '\r') => {
                    return Err(SyntaxError::new("Unterminated string constant", start));
                }
                Some(c) if c == quote => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    if self.scan_escape(false)? == Escape::LegacyOctal {
                        legacy_octal = true;
                    }
                }
                Some('\u{2028}' | '\u{2029}') => {
                    self.gate(Feature::LineSeparatorInStrings, self.pos)?;
                    self.bump();
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        let mut token = Token::new(TokenKind::String, start, self.pos);
        token.legacy_octal = legacy_octal;
        Ok(token)
    }

    /// Scans one escape sequence starting at the backslash.
    fn scan_escape(&mut self, in_template: bool) -> SyntaxResult<Escape> {
        let escape_start = self.pos;
        self.bump();
        let Some(c) = self.peek() else {
            return Ok(Escape::Plain);
        };
        let tolerate = |result: SyntaxResult<u32>| match result {
            Ok(_) => Ok(Escape::Plain),
            Err(_) if in_template => Ok(Escape::Invalid(escape_start)),
            Err(err) => Err(err),
        };
        match c {
            'u' => {
                self.bump();
                let result = self.scan_unicode_escape(escape_start);
                tolerate(result)
            }
            'x' => {
                self.bump();
                let result = self.scan_hex(Some(2), escape_start);
                tolerate(result)
            }
            '0' if !self.peek_nth(1).is_some_and(|n| n.is_ascii_digit()) => {
                self.bump();
                Ok(Escape::Plain)
            }
            '0'..='7' => {
                if in_template {
                    self.bump();
                    return Ok(Escape::Invalid(escape_start));
                }
                let max_digits = if c <= '3' { 3 } else { 2 };
                let mut digits = 0;
                while digits < max_digits && self.peek().is_some_and(|d| ('0'..='7').contains(&d))
                {
                    self.bump();
                    digits += 1;
                }
                Ok(Escape::LegacyOctal)
            }
            '8' | '9' => {
                self.bump();
                Ok(if in_template {
                    Escape::Invalid(escape_start)
                } else {
                    Escape::LegacyOctal
                })
            }
            _ => {
                // Identity escapes and line continuations (`\r\n` is one).
                self.bump();
                if c == '\r' {
                    self.eat('\n');
                }
                Ok(Escape::Plain)
            }
        }
    }

    /// Scans template text after `` ` `` or `}` up to `${` or the closing backtick.
    fn scan_template_chunk(&mut self, start: Position) -> SyntaxResult<Token> {
        let mut bad_escape = None;
        let tail = loop {
            match self.peek() {
                None => return Err(SyntaxError::new("Unterminated template", start)),
                Some('`') => {
                    self.bump();
                    break true;
                }
                Some('$') if self.peek_nth(1) == Some('{') => {
                    self.bump();
                    self.bump();
                    break false;
                }
                Some('\\') => {
                    if let Escape::Invalid(pos) = self.scan_escape(true)? {
                        bad_escape.get_or_insert(pos);
                    }
                }
                Some(_) => {
                    self.bump();
                }
            }
        };
        let mut token = Token::new(TokenKind::Template, start, self.pos);
        token.template_tail = tail;
        token.bad_escape = bad_escape;
        Ok(token)
    }

    /// Rescans the `}` closing a template substitution as the next template chunk.
    pub(crate) fn rescan_template_continuation(&mut self, brace: &Token) -> SyntaxResult<Token> {
        self.pos = brace.start;
        self.bump();
        let mut token = self.scan_template_chunk(brace.start)?;
        token.newline_before = brace.newline_before;
        Ok(token)
    }

    /// Rescans a `/` or `/=` punctuator as a regular expression literal.
    pub(crate) fn rescan_regexp(&mut self, slash: &Token) -> SyntaxResult<Token> {
        let start = slash.start;
        self.pos = start;
        self.bump();
        let body_start = self.pos;
        let mut in_class = false;
        loop {
            let c = match self.peek() {
                Some(c) if !is_line_terminator(c) => c,
                _ => {
                    return Err(SyntaxError::new(
                        "Unterminated regular expression",
                        start,
                    ))
                }
            };
            match c {
                '\\' => {
                    self.bump();
                    if !self.peek().is_some_and(|n| !is_line_terminator(n)) {
                        return Err(SyntaxError::new(
                            "Unterminated regular expression",
                            start,
                        ));
                    }
                    self.bump();
                }
                '[' => {
                    in_class = true;
                    self.bump();
                }
                ']' if in_class => {
                    in_class = false;
                    self.bump();
                }
                '/' if !in_class => break,
                _ => {
                    self.bump();
                }
            }
        }
        let source = self.source;
        let pattern = &source[body_start.offset..self.pos.offset];
        self.bump();

        let mut flags = String::new();
        while let Some(flag) = self.peek().filter(|&c| is_id_part(c)) {
            let flag_pos = self.pos;
            match flag {
                'g' | 'i' | 'm' => {}
                'u' | 'y' => self.gate(Feature::StickyUnicodeRegExpFlags, flag_pos)?,
                's' => self.gate(Feature::DotAllRegExpFlag, flag_pos)?,
                _ => {
                    return Err(SyntaxError::new(
                        format!("Invalid regular expression flag '{flag}'"),
                        flag_pos,
                    ))
                }
            }
            if flags.contains(flag) {
                return Err(SyntaxError::new(
                    format!("Duplicate regular expression flag '{flag}'"),
                    flag_pos,
                ));
            }
            flags.push(flag);
            self.bump();
        }

        if let Some(offset) = find_2018_pattern_syntax(pattern, flags.contains('u')) {
            let column_delta: usize = pattern[..offset].chars().map(char::len_utf16).sum();
            let pos = Position {
                offset: body_start.offset + offset,
                line: body_start.line,
                column: body_start.column + column_delta as u32,
            };
            self.gate(Feature::RegExpSyntax2018, pos)?;
        }
        if let Err(reason) = regexp::validate_pattern(pattern, flags.contains('u'), self.version) {
            return Err(SyntaxError::new(
                format!("Invalid regular expression: /{pattern}/: {reason}"),
                start,
            ));
        }

        let mut token = Token::new(TokenKind::RegExp, start, self.pos);
        token.newline_before = slash.newline_before;
        Ok(token)
    }
}

/// Byte offset of the first named group, lookbehind, or `\p{…}` escape.
fn find_2018_pattern_syntax(pattern: &str, unicode: bool) -> Option<usize> {
    let mut chars = pattern.char_indices().peekable();
    let mut in_class = false;
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                if let Some((_, escaped)) = chars.next() {
                    if unicode
                        && matches!(escaped, 'p' | 'P')
                        && chars.peek().is_some_and(|&(_, n)| n == '{')
                    {
                        return Some(i);
                    }
                }
            }
            '[' => in_class = true,
            ']' => in_class = false,
            '(' if !in_class && pattern[i..].starts_with("(?<") => return Some(i),
            _ => {}
        }
    }
    None
}
