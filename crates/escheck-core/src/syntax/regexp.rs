//! Regular expression pattern validation.
//!
//! Patterns are checked against the pattern grammar, with the Annex B
//! extensions that non-unicode patterns allow (`]`, `{` and `}` as literal
//! characters, quantified lookaheads, legacy octal escapes). Only
//! well-formedness is checked: `\p{…}` property names are not looked up.

use super::scanner::{is_id_part, is_id_start};
use crate::version::EcmaVersion;

type PatternResult<T> = Result<T, &'static str>;

/// Validates `pattern` (the text between the slashes) for `version`.
///
/// Returns the reason on failure, worded like V8.
pub(crate) fn validate_pattern(
    pattern: &str,
    unicode: bool,
    version: EcmaVersion,
) -> PatternResult<()> {
    let es2018 = version >= EcmaVersion::Es2018;
    let mut validator = Validator::new(pattern, unicode, unicode && es2018, es2018);
    validator.pattern()?;
    // A named group switches `\k` to a named reference; reparse with that goal.
    if !validator.named && es2018 && !validator.group_names.is_empty() {
        Validator::new(pattern, unicode, true, es2018).pattern()?;
    }
    Ok(())
}

const fn unit(c: char) -> u32 {
    c as u32
}

fn is_syntax_character(u: u32) -> bool {
    char::from_u32(u).is_some_and(|c| "^$\\.*+?()[]{}|".contains(c))
}

fn hex_value(u: u32) -> Option<u32> {
    char::from_u32(u)?.to_digit(16)
}

#[allow(clippy::struct_excessive_bools)]
struct Validator {
    /// Code points with `u`, UTF-16 code units without.
    units: Vec<u32>,
    pos: usize,
    unicode: bool,
    named: bool,
    es2018: bool,
    capturing_groups: u32,
    max_back_reference: u32,
    group_names: Vec<String>,
    back_reference_names: Vec<String>,
    last_assertion_quantifiable: bool,
    /// Value of the last escape or class atom; `None` for `\d`-like classes.
    value: Option<u32>,
}

impl Validator {
    fn new(pattern: &str, unicode: bool, named: bool, es2018: bool) -> Self {
        let units = if unicode {
            pattern.chars().map(u32::from).collect()
        } else {
            pattern.encode_utf16().map(u32::from).collect()
        };
        Self {
            units,
            pos: 0,
            unicode,
            named,
            es2018,
            capturing_groups: 0,
            max_back_reference: 0,
            group_names: Vec::new(),
            back_reference_names: Vec::new(),
            last_assertion_quantifiable: false,
            value: None,
        }
    }

    fn current(&self) -> Option<u32> {
        self.units.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.units.len()
    }

    fn is(&self, c: char) -> bool {
        self.current() == Some(unit(c))
    }

    fn eat(&mut self, c: char) -> bool {
        if self.is(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn pattern(&mut self) -> PatternResult<()> {
        self.disjunction()?;
        if !self.at_end() {
            if self.eat(')') {
                return Err("Unmatched ')'");
            }
            if self.eat(']') || self.eat('}') {
                return Err("Lone quantifier brackets");
            }
        }
        if self.max_back_reference > self.capturing_groups {
            return Err("Invalid escape");
        }
        if self
            .back_reference_names
            .iter()
            .any(|name| !self.group_names.contains(name))
        {
            return Err("Invalid named capture referenced");
        }
        Ok(())
    }

    fn disjunction(&mut self) -> PatternResult<()> {
        self.alternative()?;
        while self.eat('|') {
            self.alternative()?;
        }
        if self.eat_quantifier(true)? {
            return Err("Nothing to repeat");
        }
        if self.eat('{') {
            return Err("Lone quantifier brackets");
        }
        Ok(())
    }

    fn alternative(&mut self) -> PatternResult<()> {
        while !self.at_end() && self.term()? {}
        Ok(())
    }

    fn term(&mut self) -> PatternResult<bool> {
        if self.eat_assertion()? {
            if self.last_assertion_quantifiable && self.eat_quantifier(false)? && self.unicode {
                return Err("Invalid quantifier");
            }
            return Ok(true);
        }
        let atom = if self.unicode {
            self.eat_atom()?
        } else {
            self.eat_extended_atom()?
        };
        if atom {
            self.eat_quantifier(false)?;
        }
        Ok(atom)
    }

    fn eat_assertion(&mut self) -> PatternResult<bool> {
        let start = self.pos;
        self.last_assertion_quantifiable = false;
        if self.eat('^') || self.eat('$') {
            return Ok(true);
        }
        if self.eat('\\') {
            if self.eat('B') || self.eat('b') {
                return Ok(true);
            }
            self.pos = start;
        }
        if self.eat('(') && self.eat('?') {
            let lookbehind = self.es2018 && self.eat('<');
            if self.eat('=') || self.eat('!') {
                self.disjunction()?;
                if !self.eat(')') {
                    return Err("Unterminated group");
                }
                self.last_assertion_quantifiable = !lookbehind;
                return Ok(true);
            }
        }
        self.pos = start;
        Ok(false)
    }

    fn eat_quantifier(&mut self, no_error: bool) -> PatternResult<bool> {
        let prefix = self.eat('*')
            || self.eat('+')
            || self.eat('?')
            || self.eat_braced_quantifier(no_error)?;
        if prefix {
            self.eat('?');
        }
        Ok(prefix)
    }

    fn eat_braced_quantifier(&mut self, no_error: bool) -> PatternResult<bool> {
        let start = self.pos;
        if self.eat('{') {
            if let Some(min) = self.eat_decimal_digits() {
                let max = if self.eat(',') {
                    self.eat_decimal_digits()
                } else {
                    None
                };
                if self.eat('}') {
                    if max.is_some_and(|max| max < min) && !no_error {
                        return Err("numbers out of order in {} quantifier");
                    }
                    return Ok(true);
                }
            }
            if self.unicode && !no_error {
                return Err("Incomplete quantifier");
            }
            self.pos = start;
        }
        Ok(false)
    }

    fn eat_decimal_digits(&mut self) -> Option<u64> {
        let start = self.pos;
        let mut value = 0u64;
        while let Some(digit) = self.current().and_then(char::from_u32).and_then(|c| c.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(u64::from(digit));
            self.pos += 1;
        }
        (self.pos != start).then_some(value)
    }

    // ── Atoms ────────────────────────────────────────────────────────────────

    fn eat_atom(&mut self) -> PatternResult<bool> {
        if self.eat_pattern_characters() || self.eat('.') {
            return Ok(true);
        }
        Ok(self.eat_reverse_solidus_atom_escape()?
            || self.eat_character_class()?
            || self.eat_uncapturing_group()?
            || self.eat_capturing_group()?)
    }

    fn eat_extended_atom(&mut self) -> PatternResult<bool> {
        if self.eat('.') {
            return Ok(true);
        }
        if self.eat_reverse_solidus_atom_escape()?
            || self.eat_character_class()?
            || self.eat_uncapturing_group()?
            || self.eat_capturing_group()?
        {
            return Ok(true);
        }
        if self.eat_braced_quantifier(true)? {
            return Err("Nothing to repeat");
        }
        Ok(self.eat_extended_pattern_character())
    }

    fn eat_pattern_characters(&mut self) -> bool {
        let start = self.pos;
        while self.current().is_some_and(|u| !is_syntax_character(u)) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn eat_extended_pattern_character(&mut self) -> bool {
        match self.current().and_then(char::from_u32) {
            Some('$' | '(' | ')' | '*' | '+' | '.' | '?' | '[' | '^' | '|') => false,
            Some(_) => {
                self.pos += 1;
                true
            }
            // Lone surrogate code unit.
            None if !self.at_end() => {
                self.pos += 1;
                true
            }
            None => false,
        }
    }

    fn eat_reverse_solidus_atom_escape(&mut self) -> PatternResult<bool> {
        let start = self.pos;
        if self.eat('\\') {
            if self.eat_atom_escape()? {
                return Ok(true);
            }
            self.pos = start;
        }
        Ok(false)
    }

    fn eat_uncapturing_group(&mut self) -> PatternResult<bool> {
        let start = self.pos;
        if self.eat('(') {
            if self.eat('?') && self.eat(':') {
                self.disjunction()?;
                if self.eat(')') {
                    return Ok(true);
                }
                return Err("Unterminated group");
            }
            self.pos = start;
        }
        Ok(false)
    }

    fn eat_capturing_group(&mut self) -> PatternResult<bool> {
        if !self.eat('(') {
            return Ok(false);
        }
        if self.es2018 {
            if self.eat('?') {
                let Some(name) = self.eat_group_name()? else {
                    return Err("Invalid group");
                };
                if self.group_names.contains(&name) {
                    return Err("Duplicate capture group name");
                }
                self.group_names.push(name);
            }
        } else if self.is('?') {
            return Err("Invalid group");
        }
        self.disjunction()?;
        if self.eat(')') {
            self.capturing_groups += 1;
            return Ok(true);
        }
        Err("Unterminated group")
    }

    fn eat_group_name(&mut self) -> PatternResult<Option<String>> {
        if !self.eat('<') {
            return Ok(None);
        }
        let mut name = String::new();
        loop {
            let c = if self.is('\\') {
                self.pos += 1;
                if !self.eat_unicode_escape(true)? {
                    return Err("Invalid capture group name");
                }
                self.value.and_then(char::from_u32)
            } else {
                let c = self.current().and_then(char::from_u32);
                if c.is_some() {
                    self.pos += 1;
                }
                c
            };
            let Some(c) = c else {
                return Err("Invalid capture group name");
            };
            if c == '>' && !name.is_empty() {
                return Ok(Some(name));
            }
            let valid = if name.is_empty() {
                is_id_start(c)
            } else {
                is_id_part(c)
            };
            if !valid {
                return Err("Invalid capture group name");
            }
            name.push(c);
        }
    }

    // ── Escapes ──────────────────────────────────────────────────────────────

    fn eat_atom_escape(&mut self) -> PatternResult<bool> {
        if self.eat_back_reference()
            || self.eat_character_class_escape()?
            || self.eat_character_escape()?
            || (self.named && self.eat_k_group_name()?)
        {
            return Ok(true);
        }
        if self.unicode {
            if self.is('c') {
                return Err("Invalid unicode escape");
            }
            return Err("Invalid escape");
        }
        Ok(false)
    }

    fn eat_back_reference(&mut self) -> bool {
        let start = self.pos;
        if self.current().is_some_and(|u| (unit('1')..=unit('9')).contains(&u)) {
            let n = self
                .eat_decimal_digits()
                .map_or(u32::MAX, |n| u32::try_from(n).unwrap_or(u32::MAX));
            if self.unicode {
                self.max_back_reference = self.max_back_reference.max(n);
                return true;
            }
            if n <= self.capturing_groups {
                return true;
            }
            self.pos = start;
        }
        false
    }

    fn eat_k_group_name(&mut self) -> PatternResult<bool> {
        if !self.eat('k') {
            return Ok(false);
        }
        match self.eat_group_name()? {
            Some(name) => {
                self.back_reference_names.push(name);
                Ok(true)
            }
            None => Err("Invalid named reference"),
        }
    }

    fn eat_character_class_escape(&mut self) -> PatternResult<bool> {
        let Some(c) = self.current().and_then(char::from_u32) else {
            return Ok(false);
        };
        if matches!(c, 'd' | 'D' | 's' | 'S' | 'w' | 'W') {
            self.pos += 1;
            self.value = None;
            return Ok(true);
        }
        if self.unicode && self.es2018 && matches!(c, 'p' | 'P') {
            self.pos += 1;
            self.value = None;
            if self.eat('{') && self.eat_property_expression() && self.eat('}') {
                return Ok(true);
            }
            return Err("Invalid property name");
        }
        Ok(false)
    }

    /// `Name` or `Name=Value`.
    fn eat_property_expression(&mut self) -> bool {
        let word = |v: &mut Self, digits: bool| {
            let start = v.pos;
            while v.current().and_then(char::from_u32).is_some_and(|c| {
                c.is_ascii_alphabetic() || c == '_' || (digits && c.is_ascii_digit())
            }) {
                v.pos += 1;
            }
            v.pos != start
        };
        if !word(self, false) {
            return false;
        }
        if self.eat('=') {
            return word(self, true);
        }
        true
    }

    fn eat_character_escape(&mut self) -> PatternResult<bool> {
        if let Some(value) = self.current().and_then(|u| match char::from_u32(u)? {
            'f' => Some(0x0C),
            'n' => Some(0x0A),
            'r' => Some(0x0D),
            't' => Some(0x09),
            'v' => Some(0x0B),
            _ => None,
        }) {
            self.pos += 1;
            self.value = Some(value);
            return Ok(true);
        }
        if self.is('c') {
            let letter = self
                .units
                .get(self.pos + 1)
                .copied()
                .filter(|&u| char::from_u32(u).is_some_and(|c| c.is_ascii_alphabetic()));
            if let Some(letter) = letter {
                self.pos += 2;
                self.value = Some(letter % 32);
                return Ok(true);
            }
        }
        if self.is('0')
            && !self
                .units
                .get(self.pos + 1)
                .is_some_and(|&u| (unit('0')..=unit('9')).contains(&u))
        {
            self.pos += 1;
            self.value = Some(0);
            return Ok(true);
        }
        if self.eat_hex_escape()? || self.eat_unicode_escape(false)? {
            return Ok(true);
        }
        if !self.unicode && self.eat_legacy_octal_escape() {
            return Ok(true);
        }
        Ok(self.eat_identity_escape())
    }

    fn eat_fixed_hex(&mut self, len: usize) -> Option<u32> {
        let digits = self.units.get(self.pos..self.pos + len)?;
        let value = digits
            .iter()
            .try_fold(0u32, |acc, &u| Some(acc * 16 + hex_value(u)?))?;
        self.pos += len;
        Some(value)
    }

    fn eat_hex_escape(&mut self) -> PatternResult<bool> {
        let start = self.pos;
        if self.eat('x') {
            if let Some(value) = self.eat_fixed_hex(2) {
                self.value = Some(value);
                return Ok(true);
            }
            if self.unicode {
                return Err("Invalid escape");
            }
            self.pos = start;
        }
        Ok(false)
    }

    /// `\u` escapes; `force_unicode` applies the `u` rules regardless of flags.
    fn eat_unicode_escape(&mut self, force_unicode: bool) -> PatternResult<bool> {
        let unicode = force_unicode || self.unicode;
        let start = self.pos;
        if !self.eat('u') {
            return Ok(false);
        }
        if let Some(lead) = self.eat_fixed_hex(4) {
            self.value = Some(lead);
            if unicode && (0xD800..=0xDBFF).contains(&lead) {
                let lead_end = self.pos;
                if self.eat('\\') && self.eat('u') {
                    if let Some(trail) = self.eat_fixed_hex(4).filter(|t| (0xDC00..=0xDFFF).contains(t)) {
                        self.value = Some((lead - 0xD800) * 0x400 + (trail - 0xDC00) + 0x1_0000);
                        return Ok(true);
                    }
                }
                self.pos = lead_end;
            }
            return Ok(true);
        }
        if unicode && self.eat('{') {
            let digits_start = self.pos;
            let mut value = 0u32;
            while let Some(digit) = self.current().and_then(hex_value) {
                value = value.saturating_mul(16).saturating_add(digit);
                self.pos += 1;
            }
            if self.pos != digits_start && self.eat('}') && value <= 0x10_FFFF {
                self.value = Some(value);
                return Ok(true);
            }
        }
        if unicode {
            return Err("Invalid unicode escape");
        }
        self.pos = start;
        Ok(false)
    }

    fn eat_legacy_octal_escape(&mut self) -> bool {
        let octal = |u: Option<&u32>| {
            u.and_then(|&u| char::from_u32(u))
                .and_then(|c| c.to_digit(8))
        };
        let Some(first) = octal(self.units.get(self.pos)) else {
            return false;
        };
        self.pos += 1;
        let mut value = first;
        if let Some(second) = octal(self.units.get(self.pos)) {
            self.pos += 1;
            value = value * 8 + second;
            if first <= 3 {
                if let Some(third) = octal(self.units.get(self.pos)) {
                    self.pos += 1;
                    value = value * 8 + third;
                }
            }
        }
        self.value = Some(value);
        true
    }

    fn eat_identity_escape(&mut self) -> bool {
        let Some(u) = self.current() else {
            return false;
        };
        let allowed = if self.unicode {
            is_syntax_character(u) || u == unit('/')
        } else {
            u != unit('c') && (!self.named || u != unit('k'))
        };
        if allowed {
            self.value = Some(u);
            self.pos += 1;
        }
        allowed
    }

    // ── Character classes ────────────────────────────────────────────────────

    fn eat_character_class(&mut self) -> PatternResult<bool> {
        if !self.eat('[') {
            return Ok(false);
        }
        self.eat('^');
        self.class_ranges()?;
        if self.eat(']') {
            return Ok(true);
        }
        Err("Unterminated character class")
    }

    fn class_ranges(&mut self) -> PatternResult<()> {
        while self.eat_class_atom()? {
            let left = self.value;
            if self.eat('-') && self.eat_class_atom()? {
                let right = self.value;
                match (left, right) {
                    (Some(left), Some(right)) if left > right => {
                        return Err("Range out of order in character class");
                    }
                    (None, _) | (_, None) if self.unicode => {
                        return Err("Invalid character class");
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn eat_class_atom(&mut self) -> PatternResult<bool> {
        let start = self.pos;
        if self.eat('\\') {
            if self.eat_class_escape()? {
                return Ok(true);
            }
            if self.unicode {
                let octal = self
                    .current()
                    .is_some_and(|u| (unit('0')..=unit('7')).contains(&u));
                if self.is('c') || octal {
                    return Err("Invalid class escape");
                }
                return Err("Invalid escape");
            }
            self.pos = start;
        }
        match self.current() {
            Some(u) if u != unit(']') => {
                self.value = Some(u);
                self.pos += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn eat_class_escape(&mut self) -> PatternResult<bool> {
        let start = self.pos;
        if self.eat('b') {
            self.value = Some(0x08);
            return Ok(true);
        }
        if self.unicode && self.eat('-') {
            self.value = Some(unit('-'));
            return Ok(true);
        }
        if !self.unicode && self.eat('c') {
            let letter = self.current().filter(|&u| {
                char::from_u32(u).is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
            });
            if let Some(letter) = letter {
                self.pos += 1;
                self.value = Some(letter % 32);
                return Ok(true);
            }
            self.pos = start;
        }
        Ok(self.eat_character_class_escape()? || self.eat_character_escape()?)
    }
}
