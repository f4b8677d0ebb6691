//! Recursive-descent recognizer.
//!
//! The parser walks the token stream the way an AST builder would but keeps
//! only what early errors need:
//!
//! - a [`Context`] describing the enclosing function,
//! - a label stack,
//! - a [`Scope`] stack of declared names, for redeclaration errors,
//! - an [`Expr`] summary of each parsed expression, enough to validate
//!   assignment targets and the object/array cover grammar.
//!
//! Arrow function heads are recognized by speculatively parsing a parameter
//! list and rewinding when no `=>` follows. A head that failed once is not
//! retried, which keeps nested parenthesized defaults linear.

use std::collections::{HashMap, HashSet};

use super::scanner::{Position, Scanner, Token, TokenKind};
use super::{Feature, ParseOptions, SourceType, SyntaxError, SyntaxResult};
use crate::version::EcmaVersion;

const KEYWORDS: &[&str] = &[
    "break", "case", "catch", "continue", "debugger", "default", "do", "else", "finally", "for",
    "function", "if", "return", "switch", "throw", "try", "var", "while", "with", "null", "true",
    "false", "instanceof", "typeof", "void", "delete", "new", "in", "this",
];

const KEYWORDS_ES2015: &[&str] = &["const", "class", "extends", "export", "import", "super"];

const RESERVED_ES3: &[&str] = &[
    "abstract", "boolean", "byte", "char", "class", "double", "enum", "export", "extends", "final",
    "float", "goto", "implements", "import", "int", "interface", "long", "native", "package",
    "private", "protected", "public", "short", "static", "super", "synchronized", "throws",
    "transient", "volatile",
];

const RESERVED_ES5: &[&str] = &["class", "enum", "extends", "super", "const", "export", "import"];

const RESERVED_STRICT: &[&str] = &[
    "implements", "interface", "let", "package", "private", "protected", "public", "static",
    "yield",
];

const ASSIGN_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "<<=", ">>=", ">>>=", "&=", "|=", "^=", "**=",
];

/// Recursion guard: nested statements, expressions and patterns beyond this
/// depth are reported instead of exhausting the thread stack.
pub(crate) const MAX_NESTING_DEPTH: u32 = 2048;

// ─────────────────────────────────────────────────────────────────────────────
// Parser state
// ─────────────────────────────────────────────────────────────────────────────

/// What the enclosing function (or script/module) allows.
#[derive(Debug, Clone, Copy, Default)]
#[allow(clippy::struct_excessive_bools)]
struct Context {
    strict: bool,
    in_function: bool,
    in_generator: bool,
    in_async: bool,
    super_property: bool,
    super_call: bool,
    new_target: bool,
    loop_depth: u32,
    breakable_depth: u32,
}

impl Context {
    fn function(self, generator: bool, is_async: bool) -> Self {
        Self {
            strict: self.strict,
            in_function: true,
            in_generator: generator,
            in_async: is_async,
            new_target: true,
            ..Self::default()
        }
    }

    /// Arrows keep `this`, `super` and `new.target` of the enclosing function.
    fn arrow(self, is_async: bool) -> Self {
        Self {
            in_function: true,
            in_generator: false,
            in_async: is_async,
            loop_depth: 0,
            breakable_depth: 0,
            ..self
        }
    }
}

#[derive(Debug, Clone)]
struct Label {
    name: String,
    is_loop: bool,
    /// Still waiting for the statement it labels.
    pending: bool,
}

struct Snapshot {
    scanner: Position,
    token: Token,
    ctx: Context,
    labels: Vec<Label>,
    scopes: usize,
    bindings: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Top,
    Function,
    Block,
    /// `catch (e)` with an identifier parameter.
    SimpleCatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Var,
    Lexical,
    /// Sloppy-mode function declaration.
    Function,
    SimpleCatch,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    var: HashSet<String>,
    lexical: HashSet<String>,
    functions: HashSet<String>,
    /// A `var` of the same name may redeclare a simple catch parameter.
    catch_param: Option<String>,
}

impl Scope {
    fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            var: HashSet::new(),
            lexical: HashSet::new(),
            functions: HashSet::new(),
            catch_param: None,
        }
    }

    fn is_var_scope(&self) -> bool {
        matches!(self.kind, ScopeKind::Top | ScopeKind::Function)
    }

    /// Function declarations behave like `var` at function level, and at
    /// the top level of scripts.
    fn functions_as_var(&self, module: bool) -> bool {
        self.kind == ScopeKind::Function || (!module && self.kind == ScopeKind::Top)
    }
}

/// Bound names of a parameter list.
#[derive(Debug, Default)]
struct Params {
    names: Vec<(String, Position)>,
    /// Plain identifiers only: no patterns, defaults or rest.
    simple: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementContext {
    /// Program body: module declarations are allowed.
    TopLevel,
    /// Block or function body: lexical declarations are allowed.
    ListItem,
    /// Body of `if`, loops, `with` and labels.
    Substatement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclarationKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Default)]
struct Declarations {
    count: usize,
    has_init: bool,
    has_pattern: bool,
    missing_init: Option<SyntaxError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionKind {
    Declaration,
    /// Sloppy `if (a) function f() {}`: the name is not bound.
    Hanging,
    DefaultExport,
    Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MethodKind {
    Method,
    Getter,
    Setter,
}

enum PropertyName {
    Identifier(Token),
    Literal(Token),
    Computed,
}

/// Names already defined by an object literal.
#[derive(Debug, Default)]
struct DefinedProperties {
    proto: bool,
    /// Before ES2015: `[init, get, set]` per name.
    kinds: HashMap<String, [bool; 3]>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Expression summaries
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExprKind {
    Identifier { restricted: bool },
    Member,
    Call,
    Paren { simple: bool },
    ArrayLiteral { convertible: bool },
    ObjectLiteral { convertible: bool },
    Assign { convertible: bool },
    Unary,
    Other,
}

/// An error that only stands if the literal is not turned into a pattern.
#[derive(Debug, Clone, Copy)]
enum Pending {
    /// `{ a = 1 }`
    ShorthandInit(Position),
    /// `{ __proto__: a, __proto__: b }`
    DuplicateProto(Position),
}

#[derive(Debug, Clone, Copy)]
struct Expr {
    kind: ExprKind,
    start: Position,
    pending: Option<Pending>,
}

impl Expr {
    fn new(kind: ExprKind, start: Position) -> Self {
        Self {
            kind,
            start,
            pending: None,
        }
    }

    fn is_pattern_target(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Identifier { .. }
                | ExprKind::Member
                | ExprKind::Paren { simple: true }
                | ExprKind::ArrayLiteral { convertible: true }
                | ExprKind::ObjectLiteral { convertible: true }
                | ExprKind::Assign { convertible: true }
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parser
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) struct Parser<'src> {
    source: &'src str,
    scanner: Scanner<'src>,
    version: EcmaVersion,
    module: bool,
    token: Token,
    ctx: Context,
    labels: Vec<Label>,
    scopes: Vec<Scope>,
    /// Names bound by the pattern being parsed, drained by its declaration.
    bindings: Vec<(String, Position)>,
    /// Offsets of `(` and `async` tokens already known not to start an arrow.
    failed_arrow_heads: HashSet<usize>,
    depth: u32,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(source: &'src str, options: &ParseOptions) -> SyntaxResult<Self> {
        let module = options.source_type == SourceType::Module;
        let mut scanner = Scanner::new(source, options.ecma_version).module(module);
        if options.allow_hash_bang {
            scanner.skip_hash_bang();
        }
        let token = scanner.next_token()?;
        Ok(Self {
            source,
            scanner,
            version: options.ecma_version,
            module,
            token,
            ctx: Context {
                strict: module,
                ..Context::default()
            },
            labels: Vec::new(),
            scopes: vec![Scope::new(ScopeKind::Top)],
            bindings: Vec::new(),
            failed_arrow_heads: HashSet::new(),
            depth: 0,
        })
    }

    pub(crate) fn parse_program(mut self) -> SyntaxResult<()> {
        self.parse_body(StatementContext::TopLevel)
    }

    // ── Token helpers ────────────────────────────────────────────────────────

    fn text(&self) -> &'src str {
        self.token.text(self.source)
    }

    fn name_of<'a>(&'a self, token: &'a Token) -> &'a str {
        token
            .escaped_name
            .as_deref()
            .unwrap_or_else(|| token.text(self.source))
    }

    fn name(&self) -> &str {
        self.name_of(&self.token)
    }

    fn next(&mut self) -> SyntaxResult<()> {
        self.token = self.scanner.next_token()?;
        Ok(())
    }

    fn peek(&self) -> Option<Token> {
        self.scanner.clone().next_token().ok()
    }

    fn punct_is(&self, token: &Token, punct: &str) -> bool {
        token.kind == TokenKind::Punct && token.text(self.source) == punct
    }

    fn word_is(&self, token: &Token, word: &str) -> bool {
        token.kind == TokenKind::Name
            && token.escaped_name.is_none()
            && token.text(self.source) == word
    }

    fn is_punct(&self, punct: &str) -> bool {
        self.punct_is(&self.token, punct)
    }

    fn is_word(&self, word: &str) -> bool {
        self.word_is(&self.token, word)
    }

    fn peek_is_punct(&self, punct: &str) -> bool {
        self.peek().is_some_and(|next| self.punct_is(&next, punct))
    }

    fn eat(&mut self, punct: &str) -> SyntaxResult<bool> {
        if self.is_punct(punct) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn eat_word(&mut self, word: &str) -> SyntaxResult<bool> {
        if self.is_word(word) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, punct: &str) -> SyntaxResult<()> {
        if self.eat(punct)? {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_word(&mut self, word: &str) -> SyntaxResult<()> {
        if self.eat_word(word)? {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> SyntaxError {
        if self.token.kind == TokenKind::Eof {
            return SyntaxError::new("Unexpected end of input", self.token.start);
        }
        let text: String = self.text().chars().take(24).collect();
        SyntaxError::new(format!("Unexpected token `{text}`"), self.token.start)
    }

    fn gate(&self, feature: Feature, at: Position) -> SyntaxResult<()> {
        feature.gate(self.version, at)
    }

    fn can_insert_semicolon(&self) -> bool {
        self.token.kind == TokenKind::Eof || self.is_punct("}") || self.token.newline_before
    }

    fn semicolon(&mut self) -> SyntaxResult<()> {
        if self.eat(";")? || self.can_insert_semicolon() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            scanner: self.scanner.position(),
            token: self.token.clone(),
            ctx: self.ctx,
            labels: self.labels.clone(),
            scopes: self.scopes.len(),
            bindings: self.bindings.len(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.scanner.reset(snapshot.scanner);
        self.token = snapshot.token;
        self.ctx = snapshot.ctx;
        self.labels = snapshot.labels;
        self.scopes.truncate(snapshot.scopes);
        self.bindings.truncate(snapshot.bindings);
    }

    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> SyntaxResult<T>) -> SyntaxResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SyntaxError::new(
                "Maximum nesting depth exceeded",
                self.token.start,
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // ── Scopes ───────────────────────────────────────────────────────────────

    fn with_scope<T>(
        &mut self,
        kind: ScopeKind,
        parse: impl FnOnce(&mut Self) -> SyntaxResult<T>,
    ) -> SyntaxResult<T> {
        self.scopes.push(Scope::new(kind));
        let result = parse(self);
        self.scopes.pop();
        result
    }

    fn declare(&mut self, name: &str, binding: Binding, at: Position) -> SyntaxResult<()> {
        let module = self.module;
        let redeclared = match binding {
            Binding::Var => {
                let mut clash = false;
                for scope in self.scopes.iter_mut().rev() {
                    let lexical = scope.lexical.contains(name)
                        && scope.catch_param.as_deref() != Some(name);
                    if lexical || (!scope.functions_as_var(module) && scope.functions.contains(name)) {
                        clash = true;
                        break;
                    }
                    scope.var.insert(name.to_string());
                    if scope.is_var_scope() {
                        break;
                    }
                }
                clash
            }
            Binding::Lexical | Binding::Function | Binding::SimpleCatch => {
                let Some(scope) = self.scopes.last_mut() else {
                    return Ok(());
                };
                match binding {
                    Binding::Lexical => {
                        let clash = scope.lexical.contains(name)
                            || scope.functions.contains(name)
                            || scope.var.contains(name);
                        scope.lexical.insert(name.to_string());
                        clash
                    }
                    Binding::Function => {
                        let clash = scope.lexical.contains(name)
                            || (!scope.functions_as_var(module) && scope.var.contains(name));
                        scope.functions.insert(name.to_string());
                        clash
                    }
                    _ => {
                        scope.lexical.insert(name.to_string());
                        scope.catch_param.get_or_insert_with(|| name.to_string());
                        false
                    }
                }
            }
        };
        if redeclared {
            return Err(SyntaxError::new(
                format!("Identifier '{name}' has already been declared"),
                at,
            ));
        }
        Ok(())
    }

    /// Declares the names bound since `mark`.
    fn declare_bindings(&mut self, mark: usize, binding: Binding) -> SyntaxResult<()> {
        let names: Vec<_> = self.bindings.drain(mark..).collect();
        for (name, at) in names {
            self.declare(&name, binding, at)?;
        }
        Ok(())
    }

    /// How a function declaration binds its name in the current scope.
    fn function_binding(&self, generator: bool, is_async: bool) -> Binding {
        if !(self.ctx.strict || generator || is_async) {
            return Binding::Function;
        }
        let as_var = self
            .scopes
            .last()
            .is_some_and(|scope| scope.functions_as_var(self.module));
        if as_var {
            Binding::Var
        } else {
            Binding::Lexical
        }
    }

    // ── Identifiers ──────────────────────────────────────────────────────────

    fn is_keyword(&self, name: &str) -> bool {
        KEYWORDS.contains(&name)
            || (self.version >= EcmaVersion::Es2015 && KEYWORDS_ES2015.contains(&name))
    }

    fn is_reserved(&self, name: &str) -> bool {
        let reserved = if self.version >= EcmaVersion::Es2015 {
            name == "enum" || (self.module && name == "await")
        } else if self.version >= EcmaVersion::Es5 {
            RESERVED_ES5.contains(&name)
        } else {
            RESERVED_ES3.contains(&name)
        };
        reserved || (self.ctx.strict && RESERVED_STRICT.contains(&name))
    }

    fn check_identifier(&self, name: &str, binding: bool, at: Position) -> SyntaxResult<()> {
        if self.is_keyword(name) {
            return Err(SyntaxError::new(format!("Unexpected keyword '{name}'"), at));
        }
        if self.is_reserved(name) {
            return Err(SyntaxError::new(
                format!("The keyword '{name}' is reserved"),
                at,
            ));
        }
        if self.ctx.in_generator && name == "yield" {
            return Err(SyntaxError::new(
                "Cannot use 'yield' as an identifier inside a generator",
                at,
            ));
        }
        if self.ctx.in_async && name == "await" {
            return Err(SyntaxError::new(
                "Cannot use 'await' as an identifier inside an async function",
                at,
            ));
        }
        if binding && self.ctx.strict && matches!(name, "eval" | "arguments") {
            return Err(SyntaxError::new(
                format!("Binding '{name}' in strict mode"),
                at,
            ));
        }
        Ok(())
    }

    fn parse_identifier(&mut self, binding: bool) -> SyntaxResult<()> {
        if self.token.kind != TokenKind::Name {
            return Err(self.unexpected());
        }
        self.check_identifier(self.name(), binding, self.token.start)?;
        self.next()
    }

    /// Parses a binding name and records it for the enclosing declaration.
    fn parse_binding_identifier(&mut self) -> SyntaxResult<(String, Position)> {
        let binding = (self.name().to_string(), self.token.start);
        self.parse_identifier(true)?;
        self.bindings.push(binding.clone());
        Ok(binding)
    }

    fn check_octal(&self) -> SyntaxResult<()> {
        if self.token.legacy_octal && self.ctx.strict {
            let message = if self.token.kind == TokenKind::Number {
                "Octal literal in strict mode"
            } else {
                "Octal escape sequence in strict mode"
            };
            return Err(SyntaxError::new(message, self.token.start));
        }
        Ok(())
    }

    // ── Statements ───────────────────────────────────────────────────────────

    /// Statement list with a directive prologue, up to `}` or end of input.
    fn parse_body(&mut self, context: StatementContext) -> SyntaxResult<()> {
        let mut prologue = true;
        loop {
            let at_end = self.token.kind == TokenKind::Eof
                || (context != StatementContext::TopLevel && self.is_punct("}"));
            if at_end {
                return Ok(());
            }
            if prologue {
                if self.token.kind == TokenKind::String && self.directive_follows() {
                    let use_strict = self.is_use_strict();
                    self.parse_statement(context)?;
                    if use_strict && self.version >= EcmaVersion::Es5 {
                        self.ctx.strict = true;
                    }
                    continue;
                }
                prologue = false;
            }
            self.parse_statement(context)?;
        }
    }

    fn directive_follows(&self) -> bool {
        self.peek().is_some_and(|next| {
            next.kind == TokenKind::Eof
                || next.newline_before
                || self.punct_is(&next, ";")
                || self.punct_is(&next, "}")
        })
    }

    fn is_use_strict(&self) -> bool {
        self.token.kind == TokenKind::String
            && matches!(self.text(), "'use strict'" | "\"use strict\"")
    }

    /// Looks through the directive prologue at the cursor for "use strict".
    fn strict_directive_follows(&mut self) -> bool {
        if self.version < EcmaVersion::Es5 {
            return false;
        }
        let snapshot = self.snapshot();
        let scan = |parser: &mut Self| -> SyntaxResult<bool> {
            while parser.token.kind == TokenKind::String && parser.directive_follows() {
                if parser.is_use_strict() {
                    return Ok(true);
                }
                parser.next()?;
                parser.eat(";")?;
            }
            Ok(false)
        };
        let found = scan(self).unwrap_or(false);
        self.restore(snapshot);
        found
    }

    fn parse_statement(&mut self, context: StatementContext) -> SyntaxResult<()> {
        self.nested(|parser| parser.parse_statement_inner(context))
    }

    fn parse_statement_inner(&mut self, context: StatementContext) -> SyntaxResult<()> {
        if self.token.kind == TokenKind::Name
            && !(self.token.escaped_name.is_none() && self.is_keyword(self.text()))
            && self.peek_is_punct(":")
        {
            return self.parse_labeled_statement();
        }
        self.resolve_pending_labels();

        let start = self.token.start;
        if self.token.kind == TokenKind::Name && self.token.escaped_name.is_none() {
            match self.text() {
                "var" => {
                    self.next()?;
                    return self.parse_var_statement(DeclarationKind::Var);
                }
                "let" if self.let_starts_declaration(context) => {
                    self.gate(Feature::BlockBindings, start)?;
                    self.forbid_in_substatement(context)?;
                    self.next()?;
                    return self.parse_var_statement(DeclarationKind::Let);
                }
                "const" => {
                    self.gate(Feature::BlockBindings, start)?;
                    self.forbid_in_substatement(context)?;
                    self.next()?;
                    return self.parse_var_statement(DeclarationKind::Const);
                }
                "function" => {
                    let hanging = context == StatementContext::Substatement;
                    if hanging && self.ctx.strict {
                        return Err(SyntaxError::new(
                            "In strict mode code, functions can only be declared at top level or inside a block",
                            start,
                        ));
                    }
                    self.next()?;
                    if hanging && self.is_punct("*") {
                        return Err(self.unexpected());
                    }
                    let kind = if hanging {
                        FunctionKind::Hanging
                    } else {
                        FunctionKind::Declaration
                    };
                    return self.parse_function(kind, false, start);
                }
                "async" if self.async_function_follows() => {
                    self.gate(Feature::AsyncFunctions, start)?;
                    self.forbid_in_substatement(context)?;
                    self.next()?;
                    self.next()?;
                    return self.parse_function(FunctionKind::Declaration, true, start);
                }
                "class" => {
                    self.forbid_in_substatement(context)?;
                    return self.parse_class(true, true);
                }
                "if" => return self.parse_if(),
                "for" => return self.parse_for(),
                "while" => {
                    self.next()?;
                    self.parse_paren_condition()?;
                    return self.parse_loop_body();
                }
                "do" => return self.parse_do_while(),
                "return" => return self.parse_return(),
                "break" | "continue" => return self.parse_break_continue(),
                "throw" => return self.parse_throw(),
                "try" => return self.parse_try(),
                "switch" => return self.parse_switch(),
                "with" => {
                    if self.ctx.strict {
                        return Err(SyntaxError::new("'with' in strict mode", start));
                    }
                    self.next()?;
                    self.parse_paren_condition()?;
                    return self.parse_statement(StatementContext::Substatement);
                }
                "debugger" => {
                    self.next()?;
                    return self.semicolon();
                }
                "import" if !self.peek_is_punct("(") && !self.peek_is_punct(".") => {
                    return self.parse_import(context, start);
                }
                "export" => return self.parse_export(context, start),
                _ => {}
            }
        }

        if self.is_punct("{") {
            return self.parse_block();
        }
        if self.eat(";")? {
            return Ok(());
        }
        self.parse_expression(false)?;
        self.semicolon()
    }

    fn forbid_in_substatement(&self, context: StatementContext) -> SyntaxResult<()> {
        if context == StatementContext::Substatement {
            return Err(self.unexpected());
        }
        Ok(())
    }

    /// `let` at the cursor begins a lexical declaration rather than an
    /// expression. In a single-statement position only `let [` does, since
    /// no expression statement may start with it.
    fn let_starts_declaration(&self, context: StatementContext) -> bool {
        let Some(next) = self.peek() else {
            return false;
        };
        let name_follows = next.kind == TokenKind::Name
            && !(next.escaped_name.is_none() && self.is_keyword(next.text(self.source)));
        if self.version >= EcmaVersion::Es2015 {
            if self.punct_is(&next, "[") {
                return true;
            }
            context != StatementContext::Substatement
                && (name_follows || self.punct_is(&next, "{"))
        } else {
            !next.newline_before && (name_follows || self.punct_is(&next, "{"))
        }
    }

    fn async_function_follows(&self) -> bool {
        self.peek()
            .is_some_and(|next| !next.newline_before && self.word_is(&next, "function"))
    }

    fn resolve_pending_labels(&mut self) {
        let is_loop = self.is_word("for") || self.is_word("while") || self.is_word("do");
        for label in self.labels.iter_mut().rev() {
            if !label.pending {
                break;
            }
            label.pending = false;
            label.is_loop = is_loop;
        }
    }

    fn parse_labeled_statement(&mut self) -> SyntaxResult<()> {
        let start = self.token.start;
        let name = self.name().to_string();
        self.check_identifier(&name, false, start)?;
        if self.labels.iter().any(|label| label.name == name) {
            return Err(SyntaxError::new(
                format!("Label '{name}' is already declared"),
                start,
            ));
        }
        self.next()?;
        self.expect(":")?;
        self.labels.push(Label {
            name,
            is_loop: false,
            pending: true,
        });
        let result = self.parse_statement(StatementContext::Substatement);
        self.labels.pop();
        result
    }

    fn parse_block(&mut self) -> SyntaxResult<()> {
        self.with_scope(ScopeKind::Block, Self::parse_block_contents)
    }

    /// `{ … }` in the current scope.
    fn parse_block_contents(&mut self) -> SyntaxResult<()> {
        self.expect("{")?;
        while !self.eat("}")? {
            self.parse_statement(StatementContext::ListItem)?;
        }
        Ok(())
    }

    fn parse_var_statement(&mut self, kind: DeclarationKind) -> SyntaxResult<()> {
        self.parse_declarations(kind, false)?;
        self.semicolon()
    }

    /// Declarator list after `var`/`let`/`const`. In a `for` head the
    /// initializer checks are deferred until it is known whether the loop
    /// is `for-in`/`for-of`.
    fn parse_declarations(
        &mut self,
        kind: DeclarationKind,
        in_for: bool,
    ) -> SyntaxResult<Declarations> {
        let mut result = Declarations::default();
        let binding = if kind == DeclarationKind::Var {
            Binding::Var
        } else {
            Binding::Lexical
        };
        loop {
            let start = self.token.start;
            if kind != DeclarationKind::Var && self.is_word("let") {
                return Err(SyntaxError::new(
                    "let is disallowed as a lexically bound name",
                    start,
                ));
            }
            let is_pattern = self.is_punct("[") || self.is_punct("{");
            let mark = self.bindings.len();
            self.parse_binding_target()?;
            self.declare_bindings(mark, binding)?;
            result.count += 1;
            result.has_pattern |= is_pattern;
            if self.eat("=")? {
                result.has_init = true;
                self.parse_maybe_assign(in_for, false)?;
            } else if result.missing_init.is_none() {
                let message = if kind == DeclarationKind::Const {
                    Some("Missing initializer in const declaration")
                } else if is_pattern {
                    Some("Complex binding patterns require an initialization value")
                } else {
                    None
                };
                if let Some(message) = message {
                    let err = SyntaxError::new(message, start);
                    if !in_for {
                        return Err(err);
                    }
                    result.missing_init = Some(err);
                }
            }
            if !self.eat(",")? {
                return Ok(result);
            }
        }
    }

    fn parse_paren_condition(&mut self) -> SyntaxResult<()> {
        self.expect("(")?;
        self.parse_expression(false)?;
        self.expect(")")
    }

    fn parse_if(&mut self) -> SyntaxResult<()> {
        self.next()?;
        self.parse_paren_condition()?;
        self.parse_statement(StatementContext::Substatement)?;
        if self.eat_word("else")? {
            self.parse_statement(StatementContext::Substatement)?;
        }
        Ok(())
    }

    fn parse_loop_body(&mut self) -> SyntaxResult<()> {
        self.ctx.loop_depth += 1;
        self.ctx.breakable_depth += 1;
        let result = self.parse_statement(StatementContext::Substatement);
        self.ctx.loop_depth -= 1;
        self.ctx.breakable_depth -= 1;
        result
    }

    fn parse_do_while(&mut self) -> SyntaxResult<()> {
        self.next()?;
        self.parse_loop_body()?;
        self.expect_word("while")?;
        self.parse_paren_condition()?;
        if self.version >= EcmaVersion::Es2015 {
            self.eat(";")?;
            Ok(())
        } else {
            self.semicolon()
        }
    }

    fn parse_for(&mut self) -> SyntaxResult<()> {
        self.next()?;
        let mut is_await = false;
        if self.ctx.in_async && self.is_word("await") {
            self.gate(Feature::AsyncIteration, self.token.start)?;
            is_await = true;
            self.next()?;
        }
        // Head declarations are scoped to the loop.
        self.with_scope(ScopeKind::Block, |parser| parser.parse_for_loop(is_await))
    }

    fn parse_for_loop(&mut self, is_await: bool) -> SyntaxResult<()> {
        self.expect("(")?;
        if self.is_punct(";") {
            if is_await {
                return Err(self.unexpected());
            }
            return self.parse_for_rest();
        }

        let declaration = if self.is_word("var") {
            Some(DeclarationKind::Var)
        } else if self.is_word("const") {
            Some(DeclarationKind::Const)
        } else if self.is_word("let") && self.let_starts_declaration(StatementContext::ListItem) {
            Some(DeclarationKind::Let)
        } else {
            None
        };

        if let Some(kind) = declaration {
            let keyword = self.token.start;
            if kind != DeclarationKind::Var {
                self.gate(Feature::BlockBindings, keyword)?;
            }
            self.next()?;
            let declarations = self.parse_declarations(kind, true)?;
            if self.is_word("in") || self.is_word("of") {
                if declarations.count != 1 {
                    return Err(SyntaxError::new(
                        "Only one variable declaration allowed in for-in/of loop",
                        keyword,
                    ));
                }
                // Annex B keeps `for (var x = 1 in o)` for sloppy scripts.
                let initializer_allowed = self.is_word("in")
                    && kind == DeclarationKind::Var
                    && !self.ctx.strict
                    && !declarations.has_pattern;
                if declarations.has_init && !initializer_allowed {
                    return Err(SyntaxError::new(
                        "for-in/of loop variable declaration may not have an initializer",
                        keyword,
                    ));
                }
                return self.parse_for_in_of(is_await);
            }
            if let Some(err) = declarations.missing_init {
                return Err(err);
            }
        } else {
            let init = self.parse_expression_with(true, true)?;
            if self.is_word("in") || self.is_word("of") {
                self.check_assign_target(&init)?;
                return self.parse_for_in_of(is_await);
            }
            self.no_pending(&init)?;
        }
        if is_await {
            return Err(self.unexpected());
        }
        self.parse_for_rest()
    }

    fn parse_for_in_of(&mut self, is_await: bool) -> SyntaxResult<()> {
        let of = self.is_word("of");
        if of {
            self.gate(Feature::ForOf, self.token.start)?;
        } else if is_await {
            return Err(self.unexpected());
        }
        self.next()?;
        if of {
            self.parse_maybe_assign(false, false)?;
        } else {
            self.parse_expression(false)?;
        }
        self.expect(")")?;
        self.parse_loop_body()
    }

    fn parse_for_rest(&mut self) -> SyntaxResult<()> {
        self.expect(";")?;
        if !self.is_punct(";") {
            self.parse_expression(false)?;
        }
        self.expect(";")?;
        if !self.is_punct(")") {
            self.parse_expression(false)?;
        }
        self.expect(")")?;
        self.parse_loop_body()
    }

    fn parse_return(&mut self) -> SyntaxResult<()> {
        if !self.ctx.in_function {
            return Err(SyntaxError::new(
                "'return' outside of function",
                self.token.start,
            ));
        }
        self.next()?;
        if !self.eat(";")? && !self.can_insert_semicolon() {
            self.parse_expression(false)?;
            self.semicolon()?;
        }
        Ok(())
    }

    fn parse_break_continue(&mut self) -> SyntaxResult<()> {
        let start = self.token.start;
        let is_break = self.is_word("break");
        self.next()?;
        let has_label = self.token.kind == TokenKind::Name
            && !self.token.newline_before
            && !(self.token.escaped_name.is_none() && self.is_keyword(self.text()));
        if has_label {
            let name = self.name();
            match self.labels.iter().rev().find(|label| label.name == name) {
                None => {
                    return Err(SyntaxError::new(
                        format!("Undefined label '{name}'"),
                        self.token.start,
                    ));
                }
                Some(label) if !is_break && !label.is_loop => {
                    return Err(SyntaxError::new("Unsyntactic continue", start));
                }
                Some(_) => {}
            }
            self.next()?;
        } else if is_break && self.ctx.breakable_depth == 0 {
            return Err(SyntaxError::new("Unsyntactic break", start));
        } else if !is_break && self.ctx.loop_depth == 0 {
            return Err(SyntaxError::new("Unsyntactic continue", start));
        }
        self.semicolon()
    }

    fn parse_throw(&mut self) -> SyntaxResult<()> {
        self.next()?;
        if self.token.newline_before {
            return Err(SyntaxError::new(
                "Illegal newline after throw",
                self.token.start,
            ));
        }
        self.parse_expression(false)?;
        self.semicolon()
    }

    fn parse_try(&mut self) -> SyntaxResult<()> {
        let start = self.token.start;
        self.next()?;
        self.parse_block()?;
        let mut handled = false;
        let catch_start = self.token.start;
        if self.eat_word("catch")? {
            handled = true;
            if self.eat("(")? {
                let simple = self.token.kind == TokenKind::Name;
                let (scope, binding) = if simple {
                    (ScopeKind::SimpleCatch, Binding::SimpleCatch)
                } else {
                    (ScopeKind::Block, Binding::Lexical)
                };
                // The parameter and the catch body share one scope.
                self.with_scope(scope, |parser| {
                    let mark = parser.bindings.len();
                    parser.parse_binding_target()?;
                    parser.declare_bindings(mark, binding)?;
                    parser.expect(")")?;
                    parser.parse_block_contents()
                })?;
            } else {
                self.gate(Feature::OptionalCatchBinding, catch_start)?;
                self.parse_block()?;
            }
        }
        if self.eat_word("finally")? {
            handled = true;
            self.parse_block()?;
        }
        if !handled {
            return Err(SyntaxError::new("Missing catch or finally clause", start));
        }
        Ok(())
    }

    fn parse_switch(&mut self) -> SyntaxResult<()> {
        self.next()?;
        self.parse_paren_condition()?;
        self.expect("{")?;
        self.ctx.breakable_depth += 1;
        self.with_scope(ScopeKind::Block, Self::parse_switch_cases)?;
        self.ctx.breakable_depth -= 1;
        Ok(())
    }

    fn parse_switch_cases(&mut self) -> SyntaxResult<()> {
        let mut seen_default = false;
        let mut in_clause = false;
        while !self.eat("}")? {
            if self.is_word("case") {
                self.next()?;
                self.parse_expression(false)?;
                self.expect(":")?;
                in_clause = true;
            } else if self.is_word("default") {
                if seen_default {
                    return Err(SyntaxError::new(
                        "Multiple default clauses",
                        self.token.start,
                    ));
                }
                seen_default = true;
                self.next()?;
                self.expect(":")?;
                in_clause = true;
            } else if in_clause {
                self.parse_statement(StatementContext::ListItem)?;
            } else {
                return Err(self.unexpected());
            }
        }
        Ok(())
    }

    // ── Modules ──────────────────────────────────────────────────────────────

    fn check_module_item(&self, context: StatementContext, start: Position) -> SyntaxResult<()> {
        self.gate(Feature::Modules, start)?;
        if !self.module {
            return Err(SyntaxError::new(
                "'import' and 'export' may appear only with 'sourceType: module'",
                start,
            ));
        }
        if context != StatementContext::TopLevel {
            return Err(SyntaxError::new(
                "'import' and 'export' may only appear at the top level",
                start,
            ));
        }
        Ok(())
    }

    fn parse_import(&mut self, context: StatementContext, start: Position) -> SyntaxResult<()> {
        self.check_module_item(context, start)?;
        self.next()?;
        if self.token.kind == TokenKind::String {
            self.next()?;
            return self.semicolon();
        }
        let mark = self.bindings.len();
        self.parse_import_bindings()?;
        self.declare_bindings(mark, Binding::Lexical)?;
        self.parse_from_clause()
    }

    fn parse_import_bindings(&mut self) -> SyntaxResult<()> {
        if self.token.kind == TokenKind::Name {
            self.parse_binding_identifier()?;
            if !self.eat(",")? {
                return Ok(());
            }
        }
        if self.eat("*")? {
            self.expect_word("as")?;
            self.parse_binding_identifier()?;
        } else if self.eat("{")? {
            while !self.eat("}")? {
                let imported = self.token.clone();
                if imported.kind != TokenKind::Name {
                    return Err(self.unexpected());
                }
                self.next()?;
                if self.eat_word("as")? {
                    self.parse_binding_identifier()?;
                } else {
                    let name = self.name_of(&imported).to_string();
                    self.check_identifier(&name, true, imported.start)?;
                    self.bindings.push((name, imported.start));
                }
                if !self.is_punct("}") {
                    self.expect(",")?;
                }
            }
        } else {
            return Err(self.unexpected());
        }
        Ok(())
    }

    fn parse_from_clause(&mut self) -> SyntaxResult<()> {
        self.expect_word("from")?;
        self.parse_module_specifier()?;
        self.semicolon()
    }

    fn parse_module_specifier(&mut self) -> SyntaxResult<()> {
        if self.token.kind != TokenKind::String {
            return Err(self.unexpected());
        }
        self.next()
    }

    fn parse_export(&mut self, context: StatementContext, start: Position) -> SyntaxResult<()> {
        self.check_module_item(context, start)?;
        self.next()?;
        if self.eat("*")? {
            return self.parse_from_clause();
        }
        if self.eat_word("default")? {
            let default_start = self.token.start;
            if self.is_word("function") {
                self.next()?;
                return self.parse_function(FunctionKind::DefaultExport, false, default_start);
            }
            if self.is_word("async") && self.async_function_follows() {
                self.gate(Feature::AsyncFunctions, default_start)?;
                self.next()?;
                self.next()?;
                return self.parse_function(FunctionKind::DefaultExport, true, default_start);
            }
            if self.is_word("class") {
                return self.parse_class(true, false);
            }
            self.parse_maybe_assign(false, false)?;
            return self.semicolon();
        }
        if self.eat("{")? {
            while !self.eat("}")? {
                if self.token.kind != TokenKind::Name {
                    return Err(self.unexpected());
                }
                self.next()?;
                if self.eat_word("as")? {
                    if self.token.kind != TokenKind::Name {
                        return Err(self.unexpected());
                    }
                    self.next()?;
                }
                if !self.is_punct("}") {
                    self.expect(",")?;
                }
            }
            if self.eat_word("from")? {
                self.parse_module_specifier()?;
            }
            return self.semicolon();
        }
        let declares = ["var", "let", "const", "function", "class"]
            .iter()
            .any(|word| self.is_word(word))
            || (self.is_word("async") && self.async_function_follows());
        if !declares {
            return Err(self.unexpected());
        }
        self.parse_statement(StatementContext::ListItem)
    }

    // ── Functions and classes ────────────────────────────────────────────────

    /// Parses a function after its `function` keyword.
    fn parse_function(
        &mut self,
        kind: FunctionKind,
        is_async: bool,
        start: Position,
    ) -> SyntaxResult<()> {
        let generator = self.is_punct("*");
        if generator {
            self.gate(Feature::Generators, self.token.start)?;
            if is_async {
                self.gate(Feature::AsyncIteration, start)?;
            }
            self.next()?;
        }
        let outer = self.ctx;
        let inner = outer.function(generator, is_async);
        let mut name = None;
        if self.token.kind == TokenKind::Name {
            // A function expression's name is bound inside the function.
            if kind == FunctionKind::Expression {
                self.ctx = inner;
            }
            let at = self.token.start;
            let text = self.name().to_string();
            self.parse_identifier(true)?;
            self.ctx = outer;
            if matches!(kind, FunctionKind::Declaration | FunctionKind::DefaultExport) {
                self.declare(&text, self.function_binding(generator, is_async), at)?;
            }
            name = Some((text, at));
        } else if matches!(kind, FunctionKind::Declaration | FunctionKind::Hanging) {
            return Err(self.unexpected());
        }
        self.enter_function(inner, |parser| {
            let params = parser.parse_params()?;
            parser.parse_function_body(start, &params, true, name)
        })
    }

    fn enter_function(
        &mut self,
        inner: Context,
        body: impl FnOnce(&mut Self) -> SyntaxResult<()>,
    ) -> SyntaxResult<()> {
        let outer = std::mem::replace(&mut self.ctx, inner);
        let labels = std::mem::take(&mut self.labels);
        self.scopes.push(Scope::new(ScopeKind::Function));
        body(self)?;
        self.scopes.pop();
        self.ctx = outer;
        self.labels = labels;
        Ok(())
    }

    fn parse_params(&mut self) -> SyntaxResult<Params> {
        let mark = self.bindings.len();
        let mut simple = true;
        self.expect("(")?;
        while !self.eat(")")? {
            if self.is_punct("...") {
                simple = false;
                self.parse_rest_binding()?;
                self.expect(")")?;
                break;
            }
            simple &= self.parse_binding_element()?;
            if !self.is_punct(")") {
                let comma = self.token.start;
                self.expect(",")?;
                if self.is_punct(")") {
                    self.gate(Feature::TrailingCommaInCalls, comma)?;
                }
            }
        }
        Ok(Params {
            names: self.bindings.split_off(mark),
            simple,
        })
    }

    /// Declares the parameters in the function scope. Repeated names are
    /// only allowed for plain sloppy functions with a simple list.
    fn declare_params(&mut self, params: &Params, duplicates_allowed: bool) -> SyntaxResult<()> {
        let mut seen = HashSet::new();
        for (name, at) in &params.names {
            if !seen.insert(name.as_str()) && !duplicates_allowed {
                return Err(SyntaxError::new("Argument name clash", *at));
            }
            self.declare(name, Binding::Var, *at)?;
        }
        Ok(())
    }

    /// Parses a braced function body. Its own "use strict" applies to the
    /// parameters and the name too, so the prologue is checked first.
    fn parse_function_body(
        &mut self,
        start: Position,
        params: &Params,
        plain: bool,
        name: Option<(String, Position)>,
    ) -> SyntaxResult<()> {
        self.expect("{")?;
        let outer_strict = self.ctx.strict;
        let non_simple = self.version >= EcmaVersion::Es2016 && !params.simple;
        let use_strict = (!outer_strict || non_simple) && self.strict_directive_follows();
        if use_strict && non_simple {
            return Err(SyntaxError::new(
                "Illegal 'use strict' directive in function with non-simple parameter list",
                start,
            ));
        }
        if use_strict {
            self.ctx.strict = true;
            let names = params.names.iter().chain(name.as_ref());
            for (name, at) in names {
                self.check_identifier(name, true, *at)?;
            }
        }
        let duplicates_allowed = plain && !self.ctx.strict && params.simple;
        self.declare_params(params, duplicates_allowed)?;
        self.parse_body(StatementContext::ListItem)?;
        self.expect("}")
    }

    fn parse_method(
        &mut self,
        kind: MethodKind,
        generator: bool,
        is_async: bool,
        super_call: bool,
    ) -> SyntaxResult<()> {
        let inner = Context {
            super_property: true,
            super_call,
            ..self.ctx.function(generator, is_async)
        };
        let start = self.token.start;
        self.enter_function(inner, |parser| {
            let params = match kind {
                MethodKind::Getter => {
                    parser.expect("(")?;
                    parser.expect(")")?;
                    Params {
                        names: Vec::new(),
                        simple: true,
                    }
                }
                MethodKind::Setter => {
                    let mark = parser.bindings.len();
                    parser.expect("(")?;
                    if parser.is_punct("...") {
                        return Err(parser.unexpected());
                    }
                    let simple = parser.parse_binding_element()?;
                    parser.expect(")")?;
                    Params {
                        names: parser.bindings.split_off(mark),
                        simple,
                    }
                }
                MethodKind::Method => parser.parse_params()?,
            };
            parser.parse_function_body(start, &params, false, None)
        })
    }

    /// Consumes `async`, `*`, `get` or `set` in front of a method name.
    fn parse_method_prefix(&mut self) -> SyntaxResult<(MethodKind, bool, bool)> {
        let start = self.token.start;
        let is_async = self.is_word("async") && self.modifier_follows(false);
        if is_async {
            self.gate(Feature::AsyncFunctions, start)?;
            self.next()?;
        }
        let generator = self.is_punct("*");
        if generator {
            self.gate(Feature::Generators, self.token.start)?;
            if is_async {
                self.gate(Feature::AsyncIteration, start)?;
            }
            self.next()?;
        }
        if !is_async
            && !generator
            && (self.is_word("get") || self.is_word("set"))
            && self.modifier_follows(true)
        {
            let kind = if self.is_word("get") {
                MethodKind::Getter
            } else {
                MethodKind::Setter
            };
            self.gate(Feature::Accessors, start)?;
            self.next()?;
            return Ok((kind, false, false));
        }
        Ok((MethodKind::Method, is_async, generator))
    }

    /// The word at the cursor is followed by a property name, so it modifies it.
    fn modifier_follows(&self, newline_allowed: bool) -> bool {
        self.peek().is_some_and(|next| {
            (newline_allowed || !next.newline_before)
                && match next.kind {
                    TokenKind::Name | TokenKind::String | TokenKind::Number => true,
                    TokenKind::Punct => matches!(next.text(self.source), "[" | "*"),
                    _ => false,
                }
        })
    }

    fn parse_property_name(&mut self) -> SyntaxResult<PropertyName> {
        match self.token.kind {
            TokenKind::Punct if self.is_punct("[") => {
                self.gate(Feature::ComputedProperties, self.token.start)?;
                self.next()?;
                self.parse_maybe_assign(false, false)?;
                self.expect("]")?;
                Ok(PropertyName::Computed)
            }
            TokenKind::Name => {
                let token = self.token.clone();
                let name = self.name();
                if self.is_keyword(name) || self.is_reserved(name) {
                    self.gate(Feature::ReservedWordPropertyNames, token.start)?;
                }
                self.next()?;
                Ok(PropertyName::Identifier(token))
            }
            TokenKind::String | TokenKind::Number => {
                self.check_octal()?;
                let token = self.token.clone();
                self.next()?;
                Ok(PropertyName::Literal(token))
            }
            _ => Err(self.unexpected()),
        }
    }

    fn property_is(&self, key: &PropertyName, name: &str) -> bool {
        match key {
            PropertyName::Identifier(token) => self.name_of(token) == name,
            PropertyName::Literal(token) if token.kind == TokenKind::String => {
                let text = token.text(self.source);
                text.len() >= 2 && &text[1..text.len() - 1] == name
            }
            _ => false,
        }
    }

    /// Parses a class after checking the `class` keyword is at the cursor.
    /// Declarations bind the class name in the current scope.
    fn parse_class(&mut self, declaration: bool, require_name: bool) -> SyntaxResult<()> {
        self.gate(Feature::Classes, self.token.start)?;
        self.next()?;
        let outer_strict = self.ctx.strict;
        self.ctx.strict = true;
        if self.token.kind == TokenKind::Name && !self.is_word("extends") {
            let at = self.token.start;
            let name = self.name().to_string();
            self.parse_identifier(true)?;
            if declaration {
                self.declare(&name, Binding::Lexical, at)?;
            }
        } else if require_name {
            return Err(self.unexpected());
        }
        let derived = self.eat_word("extends")?;
        if derived {
            let heritage = self.parse_expr_subscripts()?;
            self.no_pending(&heritage)?;
        }
        self.expect("{")?;
        let mut has_constructor = false;
        while !self.eat("}")? {
            if self.eat(";")? {
                continue;
            }
            let start = self.token.start;
            if self.parse_class_member(derived)? {
                if has_constructor {
                    return Err(SyntaxError::new(
                        "Duplicate constructor in the same class",
                        start,
                    ));
                }
                has_constructor = true;
            }
        }
        self.ctx.strict = outer_strict;
        Ok(())
    }

    /// Returns whether the member was the class constructor.
    fn parse_class_member(&mut self, derived: bool) -> SyntaxResult<bool> {
        let start = self.token.start;
        let is_static = self.is_word("static") && !self.peek_is_punct("(");
        if is_static {
            self.next()?;
        }
        let (kind, is_async, generator) = self.parse_method_prefix()?;
        let key = self.parse_property_name()?;
        let is_constructor = !is_static && self.property_is(&key, "constructor");
        if is_constructor && (kind != MethodKind::Method || is_async || generator) {
            return Err(SyntaxError::new(
                "Constructor can't be a special method",
                start,
            ));
        }
        if is_static && self.property_is(&key, "prototype") {
            return Err(SyntaxError::new(
                "Classes may not have a static property named prototype",
                start,
            ));
        }
        if !self.is_punct("(") {
            return Err(self.unexpected());
        }
        self.parse_method(kind, generator, is_async, is_constructor && derived)?;
        Ok(is_constructor)
    }

    // ── Binding patterns ─────────────────────────────────────────────────────

    /// Identifier or pattern; bound names are pushed to `bindings`.
    fn parse_binding_target(&mut self) -> SyntaxResult<()> {
        self.nested(|parser| {
            let start = parser.token.start;
            if parser.is_punct("[") {
                parser.gate(Feature::Destructuring, start)?;
                parser.parse_array_pattern()
            } else if parser.is_punct("{") {
                parser.gate(Feature::Destructuring, start)?;
                parser.parse_object_pattern()
            } else {
                parser.parse_binding_identifier().map(|_| ())
            }
        })
    }

    /// Returns whether the element was a plain identifier without default.
    fn parse_binding_element(&mut self) -> SyntaxResult<bool> {
        let mut simple = self.token.kind == TokenKind::Name;
        self.parse_binding_target()?;
        if self.is_punct("=") {
            simple = false;
            self.gate(Feature::DefaultParameters, self.token.start)?;
            self.next()?;
            self.parse_maybe_assign(false, false)?;
        }
        Ok(simple)
    }

    /// `...target`, which must close the enclosing list.
    fn parse_rest_binding(&mut self) -> SyntaxResult<()> {
        self.gate(Feature::RestParameters, self.token.start)?;
        self.next()?;
        if self.version == EcmaVersion::Es2015 && self.token.kind != TokenKind::Name {
            return Err(self.unexpected());
        }
        self.parse_binding_target()?;
        if self.is_punct(",") {
            return Err(SyntaxError::new(
                "Comma is not permitted after the rest element",
                self.token.start,
            ));
        }
        Ok(())
    }

    fn parse_array_pattern(&mut self) -> SyntaxResult<()> {
        self.expect("[")?;
        while !self.eat("]")? {
            if self.eat(",")? {
                continue;
            }
            if self.is_punct("...") {
                self.parse_rest_binding()?;
                return self.expect("]");
            }
            self.parse_binding_element()?;
            if !self.is_punct("]") {
                self.expect(",")?;
            }
        }
        Ok(())
    }

    fn parse_object_pattern(&mut self) -> SyntaxResult<()> {
        self.expect("{")?;
        while !self.eat("}")? {
            if self.is_punct("...") {
                self.gate(Feature::ObjectRestSpread, self.token.start)?;
                self.next()?;
                self.parse_binding_identifier()?;
                if self.is_punct(",") {
                    return Err(SyntaxError::new(
                        "Comma is not permitted after the rest element",
                        self.token.start,
                    ));
                }
                return self.expect("}");
            }
            let key = self.parse_property_name()?;
            if self.eat(":")? {
                self.parse_binding_element()?;
            } else {
                let PropertyName::Identifier(token) = key else {
                    return Err(self.unexpected());
                };
                let name = self.name_of(&token).to_string();
                self.check_identifier(&name, true, token.start)?;
                self.bindings.push((name, token.start));
                if self.is_punct("=") {
                    self.gate(Feature::DefaultParameters, self.token.start)?;
                    self.next()?;
                    self.parse_maybe_assign(false, false)?;
                }
            }
            if !self.is_punct("}") {
                self.expect(",")?;
            }
        }
        Ok(())
    }

    // ── Expression targets ───────────────────────────────────────────────────

    fn no_pending(&self, expr: &Expr) -> SyntaxResult<()> {
        match expr.pending {
            Some(Pending::ShorthandInit(at)) => Err(SyntaxError::new(
                "Shorthand property assignments are valid only in destructuring patterns",
                at,
            )),
            Some(Pending::DuplicateProto(at)) => Err(SyntaxError::new(
                "Redefinition of __proto__ property",
                at,
            )),
            None => Ok(()),
        }
    }

    fn check_simple_target(&self, expr: &Expr) -> SyntaxResult<()> {
        match expr.kind {
            ExprKind::Identifier { restricted: true } if self.ctx.strict => Err(SyntaxError::new(
                "Assigning to eval or arguments in strict mode",
                expr.start,
            )),
            ExprKind::Identifier { .. } | ExprKind::Member | ExprKind::Paren { simple: true } => {
                Ok(())
            }
            _ => Err(SyntaxError::new("Assigning to rvalue", expr.start)),
        }
    }

    /// Validates the left side of `=` or of a `for-in`/`for-of` head,
    /// converting array and object literals to patterns.
    fn check_assign_target(&self, expr: &Expr) -> SyntaxResult<()> {
        match expr.kind {
            ExprKind::ArrayLiteral { convertible: true }
            | ExprKind::ObjectLiteral { convertible: true } => {
                self.gate(Feature::Destructuring, expr.start)
            }
            ExprKind::ArrayLiteral { .. } | ExprKind::ObjectLiteral { .. } => Err(
                SyntaxError::new("Invalid destructuring assignment target", expr.start),
            ),
            _ => self.check_simple_target(expr),
        }
    }

    // ── Expressions ──────────────────────────────────────────────────────────

    fn parse_expression(&mut self, no_in: bool) -> SyntaxResult<Expr> {
        self.parse_expression_with(no_in, false)
    }

    fn parse_expression_with(&mut self, no_in: bool, allow_pending: bool) -> SyntaxResult<Expr> {
        let start = self.token.start;
        let first = self.parse_maybe_assign(no_in, allow_pending)?;
        if !self.is_punct(",") {
            return Ok(first);
        }
        self.no_pending(&first)?;
        while self.eat(",")? {
            self.parse_maybe_assign(no_in, false)?;
        }
        Ok(Expr::new(ExprKind::Other, start))
    }

    /// AssignmentExpression. With `allow_pending`, an object literal holding
    /// `{ a = 1 }` is returned to the caller, which may still turn it into a
    /// pattern.
    fn parse_maybe_assign(&mut self, no_in: bool, allow_pending: bool) -> SyntaxResult<Expr> {
        self.nested(|parser| parser.parse_maybe_assign_inner(no_in, allow_pending))
    }

    fn parse_maybe_assign_inner(&mut self, no_in: bool, allow_pending: bool) -> SyntaxResult<Expr> {
        if self.ctx.in_generator && self.is_word("yield") {
            return self.parse_yield(no_in);
        }
        if let Some(arrow) = self.try_parse_arrow(no_in)? {
            return Ok(arrow);
        }
        let start = self.token.start;
        let left = self.parse_conditional(no_in)?;
        if self.token.kind == TokenKind::Punct && ASSIGN_OPERATORS.contains(&self.text()) {
            let convertible = if self.is_punct("=") {
                self.check_assign_target(&left)?;
                true
            } else {
                if self.is_punct("**=") {
                    self.gate(Feature::Exponentiation, self.token.start)?;
                }
                self.check_simple_target(&left)?;
                false
            };
            self.next()?;
            self.parse_maybe_assign(no_in, false)?;
            return Ok(Expr::new(ExprKind::Assign { convertible }, start));
        }
        if !allow_pending {
            self.no_pending(&left)?;
        }
        Ok(left)
    }

    fn parse_yield(&mut self, no_in: bool) -> SyntaxResult<Expr> {
        let start = self.token.start;
        self.next()?;
        let has_argument = !self.token.newline_before
            && self.token.kind != TokenKind::Eof
            && !(self.token.kind == TokenKind::Punct
                && matches!(self.text(), ")" | "]" | "}" | "," | ";" | ":"));
        if has_argument {
            self.eat("*")?;
            self.parse_maybe_assign(no_in, false)?;
        }
        Ok(Expr::new(ExprKind::Other, start))
    }

    fn arrow_here(&self) -> bool {
        self.is_punct("=>") && !self.token.newline_before
    }

    fn try_parse_arrow(&mut self, no_in: bool) -> SyntaxResult<Option<Expr>> {
        let start = self.token.start;
        match self.token.kind {
            TokenKind::Name => {
                if self.is_word("async") {
                    if let Some(arrow) = self.try_parse_async_arrow(no_in)? {
                        return Ok(Some(arrow));
                    }
                }
                let arrow_follows = self
                    .peek()
                    .is_some_and(|next| self.punct_is(&next, "=>") && !next.newline_before);
                if !arrow_follows {
                    return Ok(None);
                }
                let params = self.parse_single_param()?;
                self.parse_arrow_body(start, false, no_in, &params).map(Some)
            }
            TokenKind::Punct if self.is_punct("(") => {
                if self.failed_arrow_heads.contains(&start.offset) {
                    return Ok(None);
                }
                let snapshot = self.snapshot();
                // A failed parameter list only means this is not an arrow head.
                if let Ok(params) = self.parse_params() {
                    if self.arrow_here() {
                        return self.parse_arrow_body(start, false, no_in, &params).map(Some);
                    }
                }
                self.failed_arrow_heads.insert(start.offset);
                self.restore(snapshot);
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn parse_single_param(&mut self) -> SyntaxResult<Params> {
        let mark = self.bindings.len();
        self.parse_binding_identifier()?;
        Ok(Params {
            names: self.bindings.split_off(mark),
            simple: true,
        })
    }

    fn try_parse_async_arrow(&mut self, no_in: bool) -> SyntaxResult<Option<Expr>> {
        let start = self.token.start;
        if self.failed_arrow_heads.contains(&start.offset) {
            return Ok(None);
        }
        let Some(next) = self.peek() else {
            return Ok(None);
        };
        if next.newline_before {
            return Ok(None);
        }
        let snapshot = self.snapshot();
        self.next()?;
        let params = if next.kind == TokenKind::Name {
            self.parse_single_param().ok()
        } else if self.punct_is(&next, "(") {
            self.parse_params().ok()
        } else {
            None
        };
        if let Some(params) = params {
            if self.arrow_here() {
                return self.parse_arrow_body(start, true, no_in, &params).map(Some);
            }
        }
        self.failed_arrow_heads.insert(start.offset);
        self.restore(snapshot);
        Ok(None)
    }

    fn parse_arrow_body(
        &mut self,
        start: Position,
        is_async: bool,
        no_in: bool,
        params: &Params,
    ) -> SyntaxResult<Expr> {
        self.gate(Feature::ArrowFunctions, start)?;
        if is_async {
            self.gate(Feature::AsyncFunctions, start)?;
        }
        self.expect("=>")?;
        let inner = self.ctx.arrow(is_async);
        self.enter_function(inner, |parser| {
            if parser.is_punct("{") {
                parser.parse_function_body(start, params, false, None)
            } else {
                parser.declare_params(params, false)?;
                parser.parse_maybe_assign(no_in, false).map(|_| ())
            }
        })?;
        Ok(Expr::new(ExprKind::Other, start))
    }

    fn parse_conditional(&mut self, no_in: bool) -> SyntaxResult<Expr> {
        let start = self.token.start;
        let test = self.parse_binary(no_in)?;
        if !self.is_punct("?") {
            return Ok(test);
        }
        self.no_pending(&test)?;
        self.next()?;
        self.parse_maybe_assign(false, false)?;
        self.expect(":")?;
        self.parse_maybe_assign(no_in, false)?;
        Ok(Expr::new(ExprKind::Other, start))
    }

    fn binary_precedence(&self, no_in: bool) -> Option<u8> {
        match self.token.kind {
            TokenKind::Punct => match self.text() {
                "||" => Some(1),
                "&&" => Some(2),
                "|" => Some(3),
                "^" => Some(4),
                "&" => Some(5),
                "==" | "!=" | "===" | "!==" => Some(6),
                "<" | ">" | "<=" | ">=" => Some(7),
                "<<" | ">>" | ">>>" => Some(8),
                "+" | "-" => Some(9),
                "*" | "/" | "%" => Some(10),
                "**" => Some(11),
                _ => None,
            },
            TokenKind::Name if self.token.escaped_name.is_none() => match self.text() {
                "instanceof" => Some(7),
                "in" if !no_in => Some(7),
                _ => None,
            },
            _ => None,
        }
    }

    fn parse_binary(&mut self, no_in: bool) -> SyntaxResult<Expr> {
        let left = self.parse_unary()?;
        self.parse_binary_rhs(left, 0, no_in)
    }

    /// Precedence climbing; `**` is right-associative.
    fn parse_binary_rhs(&mut self, mut left: Expr, min_precedence: u8, no_in: bool) -> SyntaxResult<Expr> {
        loop {
            let Some(precedence) = self.binary_precedence(no_in) else {
                return Ok(left);
            };
            if precedence <= min_precedence {
                return Ok(left);
            }
            let operator = self.token.start;
            let exponent = self.is_punct("**");
            if exponent {
                self.gate(Feature::Exponentiation, operator)?;
                if left.kind == ExprKind::Unary {
                    return Err(SyntaxError::new(
                        "Unary operator used immediately before exponentiation expression",
                        operator,
                    ));
                }
            }
            self.no_pending(&left)?;
            self.next()?;
            let right = self.parse_unary()?;
            let right_min = if exponent { precedence - 1 } else { precedence };
            let right = self.nested(|parser| parser.parse_binary_rhs(right, right_min, no_in))?;
            self.no_pending(&right)?;
            left = Expr::new(ExprKind::Other, left.start);
        }
    }

    fn parse_unary(&mut self) -> SyntaxResult<Expr> {
        self.nested(Self::parse_unary_inner)
    }

    fn parse_unary_inner(&mut self) -> SyntaxResult<Expr> {
        let start = self.token.start;
        if self.ctx.in_async && self.is_word("await") {
            self.next()?;
            let argument = self.parse_unary()?;
            self.no_pending(&argument)?;
            return Ok(Expr::new(ExprKind::Unary, start));
        }
        let prefix = match self.token.kind {
            TokenKind::Punct => matches!(self.text(), "!" | "~" | "+" | "-"),
            TokenKind::Name => {
                self.token.escaped_name.is_none()
                    && matches!(self.text(), "typeof" | "void" | "delete")
            }
            _ => false,
        };
        if prefix {
            let is_delete = self.is_word("delete");
            self.next()?;
            let argument = self.parse_unary()?;
            self.no_pending(&argument)?;
            if is_delete
                && self.ctx.strict
                && matches!(argument.kind, ExprKind::Identifier { .. })
            {
                return Err(SyntaxError::new(
                    "Deleting local variable in strict mode",
                    start,
                ));
            }
            return Ok(Expr::new(ExprKind::Unary, start));
        }
        if self.is_punct("++") || self.is_punct("--") {
            self.next()?;
            let argument = self.parse_unary()?;
            self.check_simple_target(&argument)?;
            return Ok(Expr::new(ExprKind::Other, start));
        }
        let expr = self.parse_expr_subscripts()?;
        if (self.is_punct("++") || self.is_punct("--")) && !self.token.newline_before {
            self.check_simple_target(&expr)?;
            self.next()?;
            return Ok(Expr::new(ExprKind::Other, start));
        }
        Ok(expr)
    }

    fn parse_expr_subscripts(&mut self) -> SyntaxResult<Expr> {
        let base = self.parse_expr_atom()?;
        self.parse_subscripts(base, false)
    }

    fn parse_subscripts(&mut self, mut expr: Expr, no_call: bool) -> SyntaxResult<Expr> {
        loop {
            let kind = if self.is_punct(".") {
                self.no_pending(&expr)?;
                self.next()?;
                self.parse_property_identifier()?;
                ExprKind::Member
            } else if self.is_punct("[") {
                self.no_pending(&expr)?;
                self.next()?;
                self.parse_expression(false)?;
                self.expect("]")?;
                ExprKind::Member
            } else if !no_call && self.is_punct("(") {
                self.no_pending(&expr)?;
                self.parse_arguments()?;
                ExprKind::Call
            } else if self.token.kind == TokenKind::Template {
                self.no_pending(&expr)?;
                self.parse_template(true)?;
                ExprKind::Call
            } else {
                return Ok(expr);
            };
            expr = Expr::new(kind, expr.start);
        }
    }

    fn parse_property_identifier(&mut self) -> SyntaxResult<()> {
        if self.token.kind != TokenKind::Name {
            return Err(self.unexpected());
        }
        let name = self.name();
        if self.is_keyword(name) || self.is_reserved(name) {
            self.gate(Feature::ReservedWordPropertyNames, self.token.start)?;
        }
        self.next()
    }

    fn parse_arguments(&mut self) -> SyntaxResult<()> {
        self.expect("(")?;
        while !self.eat(")")? {
            if self.is_punct("...") {
                self.gate(Feature::SpreadElements, self.token.start)?;
                self.next()?;
            }
            self.parse_maybe_assign(false, false)?;
            if !self.is_punct(")") {
                let comma = self.token.start;
                self.expect(",")?;
                if self.is_punct(")") {
                    self.gate(Feature::TrailingCommaInCalls, comma)?;
                }
            }
        }
        Ok(())
    }

    fn parse_expr_atom(&mut self) -> SyntaxResult<Expr> {
        self.nested(Self::parse_expr_atom_inner)
    }

    fn parse_expr_atom_inner(&mut self) -> SyntaxResult<Expr> {
        let start = self.token.start;
        match self.token.kind {
            TokenKind::Name => self.parse_name_atom(),
            TokenKind::Number | TokenKind::String => {
                self.check_octal()?;
                self.next()?;
                Ok(Expr::new(ExprKind::Other, start))
            }
            TokenKind::Template => {
                self.parse_template(false)?;
                Ok(Expr::new(ExprKind::Other, start))
            }
            TokenKind::Punct => match self.text() {
                "(" => self.parse_paren_expression(),
                "[" => self.parse_array_literal(),
                "{" => self.parse_object_literal(),
                "/" | "/=" => {
                    self.token = self.scanner.rescan_regexp(&self.token)?;
                    self.next()?;
                    Ok(Expr::new(ExprKind::Other, start))
                }
                _ => Err(self.unexpected()),
            },
            TokenKind::RegExp | TokenKind::Eof => Err(self.unexpected()),
        }
    }

    fn parse_name_atom(&mut self) -> SyntaxResult<Expr> {
        let start = self.token.start;
        if self.token.escaped_name.is_none() {
            match self.text() {
                "this" | "null" | "true" | "false" => {
                    self.next()?;
                    return Ok(Expr::new(ExprKind::Other, start));
                }
                "function" => {
                    self.next()?;
                    self.parse_function(FunctionKind::Expression, false, start)?;
                    return Ok(Expr::new(ExprKind::Other, start));
                }
                "async" if self.async_function_follows() => {
                    self.gate(Feature::AsyncFunctions, start)?;
                    self.next()?;
                    self.next()?;
                    self.parse_function(FunctionKind::Expression, true, start)?;
                    return Ok(Expr::new(ExprKind::Other, start));
                }
                "class" => {
                    self.parse_class(false, false)?;
                    return Ok(Expr::new(ExprKind::Other, start));
                }
                "new" => return self.parse_new(),
                "super" => return self.parse_super(),
                "yield" if self.ctx.in_generator => return Err(self.unexpected()),
                _ => {}
            }
        }
        let name = self.name();
        self.check_identifier(name, false, start)?;
        let restricted = matches!(name, "eval" | "arguments");
        self.next()?;
        Ok(Expr::new(ExprKind::Identifier { restricted }, start))
    }

    fn parse_new(&mut self) -> SyntaxResult<Expr> {
        let start = self.token.start;
        self.next()?;
        if self.eat(".")? {
            if !self.is_word("target") {
                return Err(self.unexpected());
            }
            self.gate(Feature::NewTarget, start)?;
            if !self.ctx.new_target {
                return Err(SyntaxError::new(
                    "'new.target' can only be used in functions",
                    start,
                ));
            }
            self.next()?;
            return Ok(Expr::new(ExprKind::Other, start));
        }
        let callee = self.parse_expr_atom()?;
        let callee = self.parse_subscripts(callee, true)?;
        self.no_pending(&callee)?;
        if self.is_punct("(") {
            self.parse_arguments()?;
        }
        Ok(Expr::new(ExprKind::Other, start))
    }

    fn parse_super(&mut self) -> SyntaxResult<Expr> {
        let start = self.token.start;
        self.gate(Feature::Super, start)?;
        self.next()?;
        if self.is_punct("(") {
            if !self.ctx.super_call {
                return Err(SyntaxError::new(
                    "super() call outside constructor of a subclass",
                    start,
                ));
            }
        } else if self.is_punct(".") || self.is_punct("[") {
            if !self.ctx.super_property {
                return Err(SyntaxError::new(
                    "'super' keyword outside a method",
                    start,
                ));
            }
        } else {
            return Err(self.unexpected());
        }
        Ok(Expr::new(ExprKind::Other, start))
    }

    fn parse_paren_expression(&mut self) -> SyntaxResult<Expr> {
        let start = self.token.start;
        self.expect("(")?;
        let inner = self.parse_expression(false)?;
        self.expect(")")?;
        let simple = matches!(
            inner.kind,
            ExprKind::Identifier { .. } | ExprKind::Member | ExprKind::Paren { simple: true }
        );
        Ok(Expr::new(ExprKind::Paren { simple }, start))
    }

    fn parse_array_literal(&mut self) -> SyntaxResult<Expr> {
        let start = self.token.start;
        self.expect("[")?;
        let mut convertible = true;
        let mut pending = None;
        while !self.eat("]")? {
            if self.eat(",")? {
                continue;
            }
            let element = if self.is_punct("...") {
                self.gate(Feature::SpreadElements, self.token.start)?;
                self.next()?;
                let element = self.parse_maybe_assign(false, true)?;
                // As a rest element it must come last and take no default.
                convertible &=
                    !self.is_punct(",") && !matches!(element.kind, ExprKind::Assign { .. });
                element
            } else {
                self.parse_maybe_assign(false, true)?
            };
            convertible &= element.is_pattern_target();
            pending = pending.or(element.pending);
            if !self.is_punct("]") {
                self.expect(",")?;
            }
        }
        Ok(Expr {
            kind: ExprKind::ArrayLiteral { convertible },
            start,
            pending,
        })
    }

    fn parse_object_literal(&mut self) -> SyntaxResult<Expr> {
        let start = self.token.start;
        self.expect("{")?;
        let mut convertible = true;
        let mut pending = None;
        let mut defined = DefinedProperties::default();
        let mut first = true;
        while !self.eat("}")? {
            if !first {
                let comma = self.token.start;
                self.expect(",")?;
                if self.eat("}")? {
                    self.gate(Feature::ObjectTrailingComma, comma)?;
                    break;
                }
            }
            first = false;
            let (property_convertible, property_pending) =
                self.parse_object_property(&mut defined)?;
            convertible &= property_convertible;
            pending = pending.or(property_pending);
        }
        Ok(Expr {
            kind: ExprKind::ObjectLiteral { convertible },
            start,
            pending,
        })
    }

    /// One property of an object literal. Returns whether it can become a
    /// pattern property, and any error deferred until that is known.
    fn parse_object_property(
        &mut self,
        defined: &mut DefinedProperties,
    ) -> SyntaxResult<(bool, Option<Pending>)> {
        let start = self.token.start;
        if self.is_punct("...") {
            self.gate(Feature::ObjectRestSpread, start)?;
            self.next()?;
            let argument = self.parse_maybe_assign(false, true)?;
            let convertible = matches!(
                argument.kind,
                ExprKind::Identifier { .. } | ExprKind::Member
            ) && !self.is_punct(",");
            return Ok((convertible, argument.pending));
        }
        let (kind, is_async, generator) = self.parse_method_prefix()?;
        let key = self.parse_property_name()?;
        if kind != MethodKind::Method || is_async || generator || self.is_punct("(") {
            if kind == MethodKind::Method {
                self.gate(Feature::MethodDefinitions, start)?;
            }
            self.parse_method(kind, generator, is_async, false)?;
            if kind != MethodKind::Method {
                self.define_property(defined, &key, kind)?;
            }
            return Ok((false, None));
        }
        if self.eat(":")? {
            let value = self.parse_maybe_assign(false, true)?;
            let duplicate_proto = self.define_property(defined, &key, kind)?;
            let pending = value.pending.or(duplicate_proto.map(Pending::DuplicateProto));
            return Ok((value.is_pattern_target(), pending));
        }
        let PropertyName::Identifier(token) = key else {
            return Err(self.unexpected());
        };
        self.gate(Feature::ShorthandProperties, start)?;
        self.check_identifier(self.name_of(&token), false, token.start)?;
        if self.is_punct("=") {
            let pending = Pending::ShorthandInit(self.token.start);
            self.next()?;
            self.parse_maybe_assign(false, false)?;
            return Ok((true, Some(pending)));
        }
        Ok((true, None))
    }

    /// Records a `key: value` or accessor property. Before ES2015 a
    /// conflicting definition is an error. Later only a repeated
    /// `__proto__` is, and its position is returned for the caller to defer.
    fn define_property(
        &self,
        defined: &mut DefinedProperties,
        key: &PropertyName,
        kind: MethodKind,
    ) -> SyntaxResult<Option<Position>> {
        let (name, at) = match key {
            PropertyName::Identifier(token) => (self.name_of(token).to_string(), token.start),
            PropertyName::Literal(token) => (self.literal_key(token), token.start),
            PropertyName::Computed => return Ok(None),
        };
        if self.version >= EcmaVersion::Es2015 {
            if kind == MethodKind::Method && name == "__proto__" {
                if defined.proto {
                    return Ok(Some(at));
                }
                defined.proto = true;
            }
            return Ok(None);
        }
        let slot = match kind {
            MethodKind::Method => 0,
            MethodKind::Getter => 1,
            MethodKind::Setter => 2,
        };
        let other = defined.kinds.entry(name).or_default();
        let redefinition = if slot == 0 {
            (self.ctx.strict && other[0]) || other[1] || other[2]
        } else {
            other[0] || other[slot]
        };
        if redefinition {
            return Err(SyntaxError::new("Redefinition of property", at));
        }
        other[slot] = true;
        Ok(None)
    }

    /// Property name of a string or number key, as `String(key)` spells it.
    fn literal_key(&self, token: &Token) -> String {
        let text = token.text(self.source);
        if token.kind == TokenKind::String {
            return text.get(1..text.len() - 1).unwrap_or_default().to_string();
        }
        numeric_key(text).unwrap_or_else(|| text.to_string())
    }

    /// Parses a template literal starting at its first chunk.
    fn parse_template(&mut self, tagged: bool) -> SyntaxResult<()> {
        loop {
            if let Some(at) = self.token.bad_escape {
                if !tagged || self.version < EcmaVersion::Es2018 {
                    return Err(SyntaxError::new("Bad escape sequence in template", at));
                }
            }
            let tail = self.token.template_tail;
            self.next()?;
            if tail {
                return Ok(());
            }
            self.parse_expression(false)?;
            if !self.is_punct("}") {
                return Err(self.unexpected());
            }
            self.token = self.scanner.rescan_template_continuation(&self.token)?;
        }
    }
}

fn numeric_key(text: &str) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    let radix = |digits: &str, radix| {
        u128::from_str_radix(digits, radix)
            .ok()
            .map(|value| value.to_string())
    };
    if let Some(digits) = lower.strip_prefix("0x") {
        return radix(digits, 16);
    }
    if let Some(digits) = lower.strip_prefix("0o") {
        return radix(digits, 8);
    }
    if let Some(digits) = lower.strip_prefix("0b") {
        return radix(digits, 2);
    }
    let legacy_octal = lower.len() > 1
        && lower.starts_with('0')
        && lower.bytes().all(|b| (b'0'..=b'7').contains(&b));
    if legacy_octal {
        return radix(&lower[1..], 8);
    }
    let value: f64 = lower.parse().ok()?;
    if value.fract() == 0.0 && value.abs() < 1e21 {
        Some(format!("{value:.0}"))
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::syntax::{parse, ParseOptions, SourceType, SyntaxError};
    use crate::version::EcmaVersion;

    fn script(src: &str, version: EcmaVersion) -> Result<(), SyntaxError> {
        parse(src, &ParseOptions::new(version))
    }

    fn module(src: &str, version: EcmaVersion) -> Result<(), SyntaxError> {
        parse(
            src,
            &ParseOptions::new(version).source_type(SourceType::Module),
        )
    }

    #[track_caller]
    fn accepts(src: &str, version: EcmaVersion) {
        if let Err(err) = script(src, version) {
            panic!("`{src}` rejected under {version}: {err}");
        }
    }

    #[track_caller]
    fn rejects(src: &str, version: EcmaVersion) -> SyntaxError {
        match script(src, version) {
            Ok(()) => panic!("`{src}` accepted under {version}"),
            Err(err) => err,
        }
    }

    #[test]
    fn es5_baseline() {
        accepts(
            "var a = [1, 2, 3];\nfunction twice(x) { return x * 2; }\nfor (var i = 0; i < a.length; i++) { a[i] = twice(a[i]); }",
            EcmaVersion::Es5,
        );
        accepts("", EcmaVersion::Es3);
        accepts("// only a comment", EcmaVersion::Es3);
    }

    #[test]
    fn features_require_their_version() {
        use EcmaVersion::{Es2015, Es2016, Es2017, Es2018, Es2019, Es3, Es5};
        let cases: &[(&str, EcmaVersion, EcmaVersion)] = &[
            ("var o = { get a() { return 1; }, set a(v) {} };", Es3, Es5),
            ("a.default = 1;", Es3, Es5),
            ("var o = { class: 1 };", Es3, Es5),
            ("var o = { a: 1, };", Es3, Es5),
            ("let a = 1;", Es5, Es2015),
            ("const a = 1;", Es5, Es2015),
            ("class A extends B { constructor() { super(); } }", Es5, Es2015),
            ("var f = (a, b) => a + b;", Es5, Es2015),
            ("var f = x => x;", Es5, Es2015),
            ("var s = `a${b}c`;", Es5, Es2015),
            ("var { a, b: [c] } = o;", Es5, Es2015),
            ("function f(a = 1) {}", Es5, Es2015),
            ("function f(...args) {}", Es5, Es2015),
            ("f(...args);", Es5, Es2015),
            ("var o = { a };", Es5, Es2015),
            ("var o = { [k]: 1 };", Es5, Es2015),
            ("var o = { m() {} };", Es5, Es2015),
            ("function* g() { yield 1; }", Es5, Es2015),
            ("for (var x of xs) {}", Es5, Es2015),
            ("var n = 0b101;", Es5, Es2015),
            ("var r = /a/y;", Es5, Es2015),
            ("var s = '\\u{1F600}';", Es5, Es2015),
            ("function F() { return new.target; }", Es5, Es2015),
            ("var n = 2 ** 8;", Es2015, Es2016),
            ("async function f() { await g(); }", Es2016, Es2017),
            ("var f = async () => 1;", Es2016, Es2017),
            ("f(a, b,);", Es2016, Es2017),
            ("function f(a,) {}", Es2016, Es2017),
            ("var o = { ...p };", Es2017, Es2018),
            ("var { a, ...rest } = o;", Es2017, Es2018),
            ("async function f() { for await (const x of xs) {} }", Es2017, Es2018),
            ("async function* g() {}", Es2017, Es2018),
            ("var r = /a.b/s;", Es2017, Es2018),
            ("var r = /(?<y>\\d{4})/;", Es2017, Es2018),
            ("try { f(); } catch { g(); }", Es2018, Es2019),
            ("var s = '\u{2028}';", Es2018, Es2019),
        ];
        for &(src, rejected, accepted) in cases {
            assert!(
                script(src, rejected).is_err(),
                "`{src}` should be rejected under {rejected}"
            );
            if let Err(err) = script(src, accepted) {
                panic!("`{src}` should be accepted under {accepted}: {err}");
            }
        }
    }

    #[test]
    fn post_es2019_syntax_is_always_rejected() {
        for src in [
            "a?.b;",
            "a ?? b;",
            "var n = 10n;",
            "var n = 1_000;",
            "class A { x = 1; }",
            "class A { #x() {} }",
            "a ||= b;",
            "import('./a');",
        ] {
            rejects(src, EcmaVersion::Es2019);
        }
    }

    #[test]
    fn gate_error_points_at_construct() {
        let err = rejects("var a = 1;\nlet y = () => 2;", EcmaVersion::Es5);
        assert_eq!((err.line(), err.column()), (2, 1));
        let err = rejects("var f = (a) => a;", EcmaVersion::Es5);
        assert_eq!((err.line(), err.column()), (1, 9));
        insta::assert_snapshot!(
            rejects("const x = () => 1;", EcmaVersion::Es5).to_string(),
            @"`let`/`const` declaration requires es6/es2015 or later (1:1)"
        );
    }

    #[test]
    fn es4_behaves_like_es3() {
        rejects("var o = { get a() {} };", EcmaVersion::Es4);
        rejects("var o = { a: 1, };", EcmaVersion::Es4);
        accepts("var o = { 'a': 1 };", EcmaVersion::Es4);
    }

    #[test]
    fn strict_mode_rules() {
        rejects("'use strict'; with (a) {}", EcmaVersion::Es5);
        accepts("with (a) {}", EcmaVersion::Es5);
        rejects("'use strict'; var x = 010;", EcmaVersion::Es5);
        accepts("var x = 010;", EcmaVersion::Es5);
        rejects("function f() { 'use strict'; delete x; }", EcmaVersion::Es5);
        rejects("function f() { 'use strict'; var eval = 1; }", EcmaVersion::Es5);
        rejects("'use strict'; var let = 1;", EcmaVersion::Es5);
        rejects("'use strict'; arguments = 1;", EcmaVersion::Es5);
        rejects("'use strict'; var s = '\\01';", EcmaVersion::Es5);
        // A directive must be the whole statement.
        accepts("'use strict' + 1; with (a) {}", EcmaVersion::Es5);
    }

    #[test]
    fn sloppy_mode_words_are_identifiers() {
        accepts("var let = 1; let = 2;", EcmaVersion::Es5);
        accepts("var yield = 1, async = 2; async(1);", EcmaVersion::Es2017);
        accepts("var of = [], get = 1, set = 2, static = 3;", EcmaVersion::Es2015);
        accepts("let\nfoo = 1", EcmaVersion::Es5);
    }

    #[test]
    fn keywords_cannot_be_identifiers() {
        rejects("var if = 1;", EcmaVersion::Es5);
        rejects("var class = 1;", EcmaVersion::Es5);
        rejects("var enum = 1;", EcmaVersion::Es2019);
        rejects("\\u0076ar x = 1;", EcmaVersion::Es5);
        accepts("var \\u0061bc = 1;", EcmaVersion::Es5);
    }

    #[test]
    fn modules() {
        let es6 = EcmaVersion::Es2015;
        let err = rejects("import a from 'a';", es6);
        assert!(err.message.contains("sourceType: module"));
        assert!(module(
            "import a, { b as c, d } from 'a';\nimport * as ns from 'ns';\nimport 'side';\nexport default function () {}\nexport const x = 1;\nexport { c as e };\nexport * from 'f';",
            es6
        )
        .is_ok());
        assert!(module("export default class {}", es6).is_ok());
        assert!(module("export default 1 + 2;", es6).is_ok());
        assert!(module("with (a) {}", es6).is_err());
        assert!(module("var await = 1;", es6).is_err());
        assert!(module("if (a) { import b from 'b'; }", es6).is_err());
        assert!(module("import a from 'a';", EcmaVersion::Es5).is_err());
        assert!(module("export * as ns from 'ns';", EcmaVersion::Es2019).is_err());
    }

    #[test]
    fn automatic_semicolon_insertion() {
        accepts("var a = 1\nvar b = 2\na\n++b", EcmaVersion::Es5);
        accepts("function f() { return\n1 }", EcmaVersion::Es5);
        rejects("var a = 1 var b = 2", EcmaVersion::Es5);
        rejects("throw\nerr;", EcmaVersion::Es5);
        accepts("do x(); while (y) z()", EcmaVersion::Es2015);
    }

    #[test]
    fn control_flow_rules() {
        rejects("return 1;", EcmaVersion::Es5);
        rejects("break;", EcmaVersion::Es5);
        rejects("continue;", EcmaVersion::Es5);
        accepts("a: for (;;) { continue a; }", EcmaVersion::Es5);
        accepts("a: { break a; }", EcmaVersion::Es5);
        rejects("a: { continue a; }", EcmaVersion::Es5);
        rejects("a: a: ;", EcmaVersion::Es5);
        rejects("for (;;) { break b; }", EcmaVersion::Es5);
        accepts("switch (a) { case 1: break; default: f(); }", EcmaVersion::Es5);
        rejects("switch (a) { default: default: }", EcmaVersion::Es5);
        rejects("try {}", EcmaVersion::Es5);
        rejects("a: for (;;) { (function () { break a; }); }", EcmaVersion::Es5);
    }

    #[test]
    fn regexp_and_division() {
        accepts("var a = b / c / d;", EcmaVersion::Es5);
        accepts("var r = /=/.test(s);", EcmaVersion::Es5);
        accepts("x = a\n/b/g", EcmaVersion::Es5);
        accepts("if (/^a/.test(s)) {}", EcmaVersion::Es5);
        accepts("var r = [/a/, /[/]/];", EcmaVersion::Es5);
        accepts("if (a) /b/.test(c);", EcmaVersion::Es5);
    }

    #[test]
    fn templates() {
        let es6 = EcmaVersion::Es2015;
        accepts("var s = `a${`b${c}`}d${ {e: 1}.e }`;", es6);
        accepts("tag`x${y}z`;", es6);
        accepts("tag`\\unicode`;", EcmaVersion::Es2018);
        rejects("tag`\\unicode`;", EcmaVersion::Es2017);
        rejects("`\\unicode`;", EcmaVersion::Es2019);
        rejects("var s = `a${b`;", es6);
    }

    #[test]
    fn arrow_heads_fall_back_to_parenthesized_expressions() {
        let es6 = EcmaVersion::Es2015;
        accepts("var a = (b, c);", EcmaVersion::Es5);
        accepts("var f = (a = 1, {b}, [c], ...d) => a;", es6);
        accepts("(() => {})();", es6);
        accepts("var f = async x => x, g = async (a, b) => a;", EcmaVersion::Es2017);
        accepts("async(a, b);", EcmaVersion::Es2017);
        rejects("(a + b) => 1;", es6);
        rejects("() => {}();", es6);
        rejects("var f = a\n=> a;", es6);
    }

    #[test]
    fn destructuring_assignment_cover_grammar() {
        let es6 = EcmaVersion::Es2015;
        accepts("[a, b] = [b, a];", es6);
        accepts("({ a, b: c.d } = o);", es6);
        accepts("({ a = 1 } = o);", es6);
        accepts("[{ a = 1 }] = o;", es6);
        accepts("for ([k, v] of pairs) {}", es6);
        rejects("({ a = 1 });", es6);
        rejects("f({ a = 1 });", es6);
        rejects("[a + b] = c;", es6);
        rejects("[...a, b] = c;", es6);
        rejects("({ m() {} } = o);", es6);
        rejects("[a, b] = c;", EcmaVersion::Es5);
    }

    #[test]
    fn assignment_targets() {
        accepts("a.b = 1; a[b] = 2; (a) = 3; a++; --a.b;", EcmaVersion::Es5);
        rejects("1 = a;", EcmaVersion::Es5);
        rejects("a + b = c;", EcmaVersion::Es5);
        rejects("f() = 1;", EcmaVersion::Es5);
        rejects("++a();", EcmaVersion::Es5);
    }

    #[test]
    fn exponentiation_rules() {
        accepts("var a = (-b) ** 2, c = 2 ** -b, d = a ** b ** c;", EcmaVersion::Es2016);
        rejects("var a = -b ** 2;", EcmaVersion::Es2016);
        accepts("a **= 2;", EcmaVersion::Es2016);
        rejects("a **= 2;", EcmaVersion::Es2015);
    }

    #[test]
    fn classes_and_super() {
        let es6 = EcmaVersion::Es2015;
        accepts(
            "class A extends B {\n  constructor() { super(); this.x = 1; }\n  static create() { return new A(); }\n  get x() { return super.x; }\n  set x(v) {}\n  *gen() { yield 1; }\n  ['computed']() {}\n  static() {}\n}",
            es6,
        );
        rejects("class A { constructor() { super(); } }", es6);
        rejects("function f() { super.x; }", es6);
        rejects("class A { get constructor() {} }", es6);
        rejects("class A { static prototype() {} }", es6);
        rejects("if (a) class B {}", es6);
        accepts("var o = { m() { return super.m(); } };", es6);
    }

    #[test]
    fn generators_and_async() {
        accepts("function* g() { var x = yield; yield* other(); }", EcmaVersion::Es2015);
        rejects("function* g() { var yield = 1; }", EcmaVersion::Es2015);
        accepts("async function f() { var x = await y; }", EcmaVersion::Es2017);
        rejects("async function f() { var await = 1; }", EcmaVersion::Es2017);
        accepts("var o = { async m() {}, async: 1 };", EcmaVersion::Es2017);
        rejects("var o = { async m() {} };", EcmaVersion::Es2016);
    }

    #[test]
    fn declarations_in_loops() {
        let es6 = EcmaVersion::Es2015;
        accepts("for (let i = 0; i < n; i++) {}", es6);
        accepts("for (const k in o) {}", es6);
        accepts("for (let [a, b] of pairs) {}", es6);
        accepts("for (var x = 1 in o) {}", EcmaVersion::Es5);
        rejects("for (let x = 1 of xs) {}", es6);
        rejects("for (var a, b in o) {}", EcmaVersion::Es5);
        rejects("const a;", es6);
        rejects("for (const a; ;) {}", es6);
        rejects("if (a) let b = 1;", es6);
        rejects("let let = 1;", es6);
    }

    #[test]
    fn optional_catch_points_at_catch() {
        let err = rejects("try {} catch {}", EcmaVersion::Es2018);
        assert_eq!(err.column(), 8);
    }

    #[test]
    fn hash_bang_handling() {
        let src = "#!/usr/bin/env node\nvar a = 1;";
        let err = rejects(src, EcmaVersion::Es5);
        assert_eq!((err.line(), err.column()), (1, 1));
        assert!(parse(src, &ParseOptions::new(EcmaVersion::Es5).allow_hash_bang(true)).is_ok());
    }

    #[test]
    fn unexpected_end_of_input() {
        let err = rejects("function f() {", EcmaVersion::Es5);
        assert_eq!(err.message, "Unexpected end of input");
    }

    #[test]
    fn deep_nesting_parses() {
        let depth = 64;
        let src = format!("var a = {}1{};", "(".repeat(depth), ")".repeat(depth));
        accepts(&src, EcmaVersion::Es5);
        let chain = format!("var s = {};", vec!["'x'"; 5000].join(" + "));
        accepts(&chain, EcmaVersion::Es5);
    }

    fn on_large_stack<T: Send + 'static>(run: impl FnOnce() -> T + Send + 'static) -> T {
        std::thread::Builder::new()
            .stack_size(256 << 20)
            .spawn(run)
            .expect("spawn parser thread")
            .join()
            .expect("parser thread panicked")
    }

    #[test]
    fn nesting_beyond_the_limit_is_an_error() {
        let results = on_large_stack(|| {
            let deep = 5000;
            [
                format!("x = {}1{};", "(".repeat(deep), ")".repeat(deep)),
                format!("x = {}{};", "[".repeat(deep), "]".repeat(deep)),
                format!("{}{}", "{".repeat(deep), "}".repeat(deep)),
                format!("x = {}1;", "- ".repeat(deep)),
                format!("x = 2{};", " ** 2".repeat(deep)),
            ]
            .iter()
            .map(|src| script(src, EcmaVersion::Es2016).map_err(|err| err.message))
            .collect::<Vec<_>>()
        });
        for result in results {
            assert_eq!(result, Err("Maximum nesting depth exceeded".to_string()));
        }
    }

    #[test]
    fn nesting_below_the_limit_parses() {
        let result = on_large_stack(|| {
            let depth = 500;
            let src = format!("x = {}1{};", "(".repeat(depth), ")".repeat(depth));
            script(&src, EcmaVersion::Es5).map_err(|err| err.message)
        });
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn nested_parenthesized_defaults_parse_in_linear_time() {
        // Every `(` may start an arrow head, so each failed head must not be
        // re-explored by enclosing attempts.
        let depth = 40;
        let src = format!("x = {}1{};", "(a = ".repeat(depth), ")".repeat(depth));
        accepts(&src, EcmaVersion::Es2015);
        let arrows = format!("x = {}1{};", "(a = ".repeat(depth), ") => 1".repeat(depth));
        accepts(&arrows, EcmaVersion::Es2015);
        let calls = format!("x = {}1{};", "async(a = ".repeat(depth), ")".repeat(depth));
        accepts(&calls, EcmaVersion::Es2017);
    }

    #[test]
    fn let_in_single_statement_position_is_an_identifier() {
        let es6 = EcmaVersion::Es2015;
        accepts("if (a) let\nx = 1", es6);
        accepts("while (a) let\nx = 1", es6);
        accepts("if (a) let;", es6);
        rejects("if (a) let [x] = y;", es6);
        rejects("if (a) let x = 1;", es6);
        accepts("{ let\nx = 1 }", es6);
    }

    #[test]
    fn html_like_comments_depend_on_source_type() {
        accepts("<!-- foo\nvar a;", EcmaVersion::Es5);
        accepts("var a;\n--> comment", EcmaVersion::Es5);
        assert!(module("<!-- foo\nvar a;", EcmaVersion::Es2015).is_err());
        assert!(module("var a;\n--> comment", EcmaVersion::Es2015).is_err());
    }

    #[test]
    fn invalid_regexp_patterns_are_rejected() {
        let err = rejects("var r = /(/;", EcmaVersion::Es5);
        assert_eq!(err.message, "Invalid regular expression: /(/: Unterminated group");
        assert_eq!(err.column(), 9);
        rejects("var r = /a{2,1}/;", EcmaVersion::Es5);
        accepts("var r = /a{2,1/;", EcmaVersion::Es5);
        rejects("var r = /a{2,1/u;", EcmaVersion::Es2015);
    }

    #[test]
    fn redeclarations() {
        let es6 = EcmaVersion::Es2015;
        let err = rejects("let a; let a;", es6);
        assert_eq!(err.message, "Identifier 'a' has already been declared");
        assert_eq!(err.column(), 12);
        rejects("let a; var a;", es6);
        rejects("var a; let a;", es6);
        rejects("const a = 1; function a() {}", es6);
        rejects("class A {} class A {}", es6);
        rejects("let [a, a] = b;", es6);
        rejects("{ var a; let a; }", es6);
        rejects("for (let i;;) { var i; }", es6);
        rejects("switch (x) { case 1: let a; case 2: let a; }", es6);
        rejects("try {} catch (e) { let e; }", es6);
        rejects("try {} catch ([e]) { var e; }", es6);
        rejects("function f(a) { let a; }", es6);
        rejects("'use strict'; { function f() {} function f() {} }", es6);

        accepts("var a; var a;", es6);
        accepts("var a; function a() {}", es6);
        accepts("function a() {} function a() {}", es6);
        accepts("let a; { let a; }", es6);
        accepts("for (let i;;) { let i; }", es6);
        accepts("try {} catch (e) { var e; }", es6);
        accepts("function f(a) { var a; }", es6);
        accepts("{ function f() {} function f() {} }", es6);
        accepts("if (a) function f() {} let f;", es6);
        accepts("var f = function a() { let a; };", es6);
        accepts("var C = class A {}; let A;", es6);
    }

    #[test]
    fn module_functions_are_lexical() {
        let es6 = EcmaVersion::Es2015;
        assert!(module("function f() {} var f;", es6).is_err());
        assert!(module("import a from 'a'; let a;", es6).is_err());
        assert!(module("import { a, b as a } from 'a';", es6).is_err());
        assert!(module("export default function f() {} let f;", es6).is_err());
        accepts("function f() {} var f;", es6);
    }

    #[test]
    fn duplicate_parameters() {
        accepts("function f(a, a) {}", EcmaVersion::Es5);
        let err = rejects("function f(a, a) { 'use strict'; }", EcmaVersion::Es5);
        assert_eq!(err.message, "Argument name clash");
        assert_eq!(err.column(), 15);
        rejects("'use strict'; function f(a, a) {}", EcmaVersion::Es5);
        rejects("var f = (a, a) => 1;", EcmaVersion::Es2015);
        rejects("var f = (a, a) => { return 1; };", EcmaVersion::Es2015);
        rejects("function f(a, [a]) {}", EcmaVersion::Es2015);
        rejects("function f(a, a = 1) {}", EcmaVersion::Es2015);
        rejects("var o = { m(a, a) {} };", EcmaVersion::Es2015);
        rejects("class A { m(a, a) {} }", EcmaVersion::Es2015);
        accepts("var f = (a, b) => a;", EcmaVersion::Es2015);
    }

    #[test]
    fn strict_body_applies_to_parameters_and_name() {
        rejects("function f(eval) { 'use strict'; }", EcmaVersion::Es5);
        rejects("function arguments() { 'use strict'; }", EcmaVersion::Es5);
        rejects("function f(interface) { 'use strict'; }", EcmaVersion::Es5);
        accepts("function f(eval) {}", EcmaVersion::Es5);
    }

    #[test]
    fn use_strict_needs_simple_parameters() {
        let err = rejects("function f(a = 1) { 'use strict'; }", EcmaVersion::Es2016);
        assert_eq!(
            err.message,
            "Illegal 'use strict' directive in function with non-simple parameter list"
        );
        assert_eq!(err.column(), 1);
        rejects("var f = ({a}) => { 'use strict'; };", EcmaVersion::Es2016);
        rejects("var f = (...a) => { 'use strict'; };", EcmaVersion::Es2016);
        rejects("'use strict'; function f([a]) { 'use strict'; }", EcmaVersion::Es2016);
        accepts("function f(a = 1) { 'use strict'; }", EcmaVersion::Es2015);
        accepts("function f(a, b) { 'use strict'; }", EcmaVersion::Es2016);
    }

    #[test]
    fn duplicate_proto_only_in_object_literals() {
        let es6 = EcmaVersion::Es2015;
        let err = rejects("x = { __proto__: 1, __proto__: 2 };", es6);
        assert_eq!(err.message, "Redefinition of __proto__ property");
        assert_eq!(err.column(), 21);
        rejects("x = { __proto__: 1, '__proto__': 2 };", es6);
        rejects("f({ __proto__: a, __proto__: b });", es6);
        accepts("({ __proto__: a, __proto__: b } = x);", es6);
        accepts("x = { __proto__: 1, ['__proto__']: 2 };", es6);
        accepts("x = { __proto__: 1, __proto__() {} };", es6);
        accepts("var __proto__; x = { __proto__: 1, __proto__ };", es6);
        accepts("x = { __proto__: 1, __proto__: 2 };", EcmaVersion::Es5);
    }

    #[test]
    fn es5_property_redefinition() {
        let es5 = EcmaVersion::Es5;
        let err = rejects("x = ({a: 1, get a() {}});", es5);
        assert_eq!(err.message, "Redefinition of property");
        rejects("x = { get a() {}, get a() {} };", es5);
        rejects("x = { get a() {}, a: 1 };", es5);
        rejects("'use strict'; x = { a: 1, a: 2 };", es5);
        rejects("'use strict'; x = { 1: 1, 0x1: 2 };", es5);
        accepts("x = { a: 1, a: 2 };", es5);
        accepts("x = { get a() {}, set a(v) {} };", es5);
        accepts("x = ({a: 1, get a() {}});", EcmaVersion::Es2015);
        accepts("'use strict'; x = { a: 1, a: 2 };", EcmaVersion::Es2015);
    }

    #[test]
    fn one_constructor_per_class() {
        let es6 = EcmaVersion::Es2015;
        let err = rejects("class A { constructor() {} constructor() {} }", es6);
        assert_eq!(err.message, "Duplicate constructor in the same class");
        assert_eq!(err.column(), 28);
        rejects("class A { constructor() {} 'constructor'() {} }", es6);
        accepts("class A { constructor() {} static constructor() {} }", es6);
        accepts("class A { constructor() {} ['constructor']() {} }", es6);
    }
}
