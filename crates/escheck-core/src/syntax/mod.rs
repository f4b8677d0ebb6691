//! Grammar-versioned JavaScript syntax recognizer.
//!
//! - [`scanner`] converts source text into tokens, rejecting lexical syntax
//!   (literals, escapes, regexp flags) newer than the target version.
//! - [`parser`] is a recursive-descent recognizer over those tokens. It
//!   validates the grammar without building an AST and stops at the first
//!   error.
//!
//! Every version-dependent construct is named by a [`Feature`]; a feature
//! used under an older grammar produces a [`SyntaxError`] naming the
//! minimal version that allows it.

use crate::version::EcmaVersion;

mod parser;
mod regexp;
mod scanner;

pub use scanner::{Position, Token, TokenKind};

/// Whether source text is a classic script or an ES module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceType {
    /// Classic script (sloppy mode unless a `"use strict"` prologue says otherwise).
    #[default]
    Script,
    /// ES module: strict, allows `import`/`export` at the top level.
    Module,
}

/// Dialect settings for one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Grammar version to accept.
    pub ecma_version: EcmaVersion,
    /// Script or module.
    pub source_type: SourceType,
    /// Treat a leading `#!` line as a comment.
    pub allow_hash_bang: bool,
}

impl ParseOptions {
    /// Options for a classic script under `ecma_version`.
    #[must_use]
    pub fn new(ecma_version: EcmaVersion) -> Self {
        Self {
            ecma_version,
            ..Self::default()
        }
    }

    /// Sets the source type.
    #[must_use]
    pub fn source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = source_type;
        self
    }

    /// Sets hashbang tolerance.
    #[must_use]
    pub fn allow_hash_bang(mut self, allow: bool) -> Self {
        self.allow_hash_bang = allow;
        self
    }
}

/// The first syntax error found in a source text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} ({}:{})", .position.line, .position.column)]
pub struct SyntaxError {
    /// Diagnostic text without location.
    pub message: String,
    /// Where the error was detected.
    pub position: Position,
}

impl SyntaxError {
    pub(crate) fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// 1-based line.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.position.line
    }

    /// 1-based column, in UTF-16 code units.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.position.column
    }
}

/// Result alias for the recognizer.
pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Version-dependent syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// `get x() {}` / `set x(v) {}` in object literals.
    Accessors,
    /// Keywords and reserved words as property names (`a.default`, `{ class: 1 }`).
    ReservedWordPropertyNames,
    /// `{ a: 1, }`.
    ObjectTrailingComma,
    /// `let` and `const` declarations.
    BlockBindings,
    /// `class` declarations and expressions.
    Classes,
    /// `() => {}`.
    ArrowFunctions,
    /// `` `text ${expr}` `` and tagged templates.
    TemplateLiterals,
    /// Array and object patterns in bindings and assignments.
    Destructuring,
    /// `function f(a = 1) {}`.
    DefaultParameters,
    /// `function f(...rest) {}` and array rest elements.
    RestParameters,
    /// `[...a]` and `f(...a)`.
    SpreadElements,
    /// `{ a }`.
    ShorthandProperties,
    /// `{ [key]: value }`.
    ComputedProperties,
    /// `{ method() {} }`.
    MethodDefinitions,
    /// `function*` and `yield`.
    Generators,
    /// `for (x of xs)`.
    ForOf,
    /// `import` / `export` declarations.
    Modules,
    /// `0b1010` / `0o17`.
    BinaryOctalLiterals,
    /// `\u{1F600}`.
    CodePointEscapes,
    /// RegExp `u` and `y` flags.
    StickyUnicodeRegExpFlags,
    /// `new.target`.
    NewTarget,
    /// `super.x` and `super()`.
    Super,
    /// `a ** b`.
    Exponentiation,
    /// `async function`, `await`.
    AsyncFunctions,
    /// `f(a, b,)` and `function f(a, b,) {}`.
    TrailingCommaInCalls,
    /// `{ ...a }` in literals and patterns.
    ObjectRestSpread,
    /// `for await` and `async function*`.
    AsyncIteration,
    /// RegExp `s` flag.
    DotAllRegExpFlag,
    /// `(?<name>…)`, `(?<=…)`, `(?<!…)`, `\p{…}` in regular expressions.
    RegExpSyntax2018,
    /// `try {} catch {}`.
    OptionalCatchBinding,
    /// Unescaped U+2028 / U+2029 in string literals.
    LineSeparatorInStrings,
}

impl Feature {
    /// The first version that accepts this feature.
    #[must_use]
    pub fn since(self) -> EcmaVersion {
        match self {
            Self::Accessors | Self::ReservedWordPropertyNames | Self::ObjectTrailingComma => {
                EcmaVersion::Es5
            }
            Self::BlockBindings
            | Self::Classes
            | Self::ArrowFunctions
            | Self::TemplateLiterals
            | Self::Destructuring
            | Self::DefaultParameters
            | Self::RestParameters
            | Self::SpreadElements
            | Self::ShorthandProperties
            | Self::ComputedProperties
            | Self::MethodDefinitions
            | Self::Generators
            | Self::ForOf
            | Self::Modules
            | Self::BinaryOctalLiterals
            | Self::CodePointEscapes
            | Self::StickyUnicodeRegExpFlags
            | Self::NewTarget
            | Self::Super => EcmaVersion::Es2015,
            Self::Exponentiation => EcmaVersion::Es2016,
            Self::AsyncFunctions | Self::TrailingCommaInCalls => EcmaVersion::Es2017,
            Self::ObjectRestSpread
            | Self::AsyncIteration
            | Self::DotAllRegExpFlag
            | Self::RegExpSyntax2018 => EcmaVersion::Es2018,
            Self::OptionalCatchBinding | Self::LineSeparatorInStrings => EcmaVersion::Es2019,
        }
    }

    /// Short description used in diagnostics.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Accessors => "getter/setter property",
            Self::ReservedWordPropertyNames => "reserved word as property name",
            Self::ObjectTrailingComma => "trailing comma in object literal",
            Self::BlockBindings => "`let`/`const` declaration",
            Self::Classes => "class",
            Self::ArrowFunctions => "arrow function",
            Self::TemplateLiterals => "template literal",
            Self::Destructuring => "destructuring pattern",
            Self::DefaultParameters => "default parameter",
            Self::RestParameters => "rest element",
            Self::SpreadElements => "spread element",
            Self::ShorthandProperties => "shorthand property",
            Self::ComputedProperties => "computed property name",
            Self::MethodDefinitions => "method definition",
            Self::Generators => "generator",
            Self::ForOf => "for-of loop",
            Self::Modules => "import/export declaration",
            Self::BinaryOctalLiterals => "binary/octal literal",
            Self::CodePointEscapes => "code point escape",
            Self::StickyUnicodeRegExpFlags => "regular expression flag `u`/`y`",
            Self::NewTarget => "`new.target`",
            Self::Super => "`super`",
            Self::Exponentiation => "exponentiation operator",
            Self::AsyncFunctions => "async function",
            Self::TrailingCommaInCalls => "trailing comma in parameter or argument list",
            Self::ObjectRestSpread => "object rest/spread property",
            Self::AsyncIteration => "async iteration",
            Self::DotAllRegExpFlag => "regular expression flag `s`",
            Self::RegExpSyntax2018 => "regular expression named group/lookbehind/property escape",
            Self::OptionalCatchBinding => "optional catch binding",
            Self::LineSeparatorInStrings => "line separator in string literal",
        }
    }

    pub(crate) fn gate(self, version: EcmaVersion, position: Position) -> SyntaxResult<()> {
        if version >= self.since() {
            Ok(())
        } else {
            Err(SyntaxError::new(
                format!(
                    "{} requires {} or later",
                    self.describe(),
                    self.since().label()
                ),
                position,
            ))
        }
    }
}

/// Checks that `source` is valid under `options`.
///
/// # Errors
///
/// Returns the first [`SyntaxError`] encountered.
///
/// # Example
///
/// ```
/// use escheck_core::syntax::{parse, ParseOptions};
/// use escheck_core::EcmaVersion;
///
/// assert!(parse("var a = [1, 2];", &ParseOptions::new(EcmaVersion::Es5)).is_ok());
/// assert!(parse("let a = 1;", &ParseOptions::new(EcmaVersion::Es5)).is_err());
/// ```
pub fn parse(source: &str, options: &ParseOptions) -> SyntaxResult<()> {
    parser::Parser::new(source, options)?.parse_program()
}
