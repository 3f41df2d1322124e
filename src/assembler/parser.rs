//! Assembly source line parser
//!
//! Splits a line into an optional label and a statement, and parses the
//! numeric literal forms accepted in operands.

/// A parsed line of assembly source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// Optional label definition (e.g., "start" from "start: LDA #$01")
    pub label: Option<&'a str>,

    /// What the rest of the line asks for
    pub statement: Statement<'a>,
}

/// The part of a line after the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement<'a> {
    /// Nothing to assemble (blank, comment only, or label only)
    Empty,

    /// `* = value` relocates the write cursor; holds the value text
    Origin(&'a str),

    /// Mnemonic as written and the operand with all whitespace removed
    Instruction { mnemonic: &'a str, operand: String },
}

/// Removes a trailing `;` comment and surrounding whitespace.
pub fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    }
    .trim()
}

/// Splits a leading `identifier:` label from the rest of the line.
pub fn split_label(text: &str) -> (Option<&str>, &str) {
    if let Some(colon) = text.find(':') {
        let name = &text[..colon];
        if is_identifier(name) {
            return (Some(name), text[colon + 1..].trim_start());
        }
    }
    (None, text)
}

/// Parse one source line
///
/// # Errors
///
/// Returns a description of the problem when the line has neither a
/// well-formed origin directive nor a word-character mnemonic.
pub fn parse_line(line: &str) -> Result<SourceLine<'_>, String> {
    let (label, rest) = split_label(strip_comment(line));

    if rest.is_empty() {
        return Ok(SourceLine {
            label,
            statement: Statement::Empty,
        });
    }

    if let Some(directive) = rest.strip_prefix('*') {
        let value = directive
            .trim_start()
            .strip_prefix('=')
            .ok_or_else(|| "expected '=' after '*'".to_string())?;
        return Ok(SourceLine {
            label,
            statement: Statement::Origin(value.trim()),
        });
    }

    let (mnemonic, operand) = match rest.find(char::is_whitespace) {
        Some(pos) => (&rest[..pos], &rest[pos..]),
        None => (rest, ""),
    };

    if !mnemonic.chars().all(is_word_char) {
        return Err(format!("malformed mnemonic '{}'", mnemonic));
    }

    Ok(SourceLine {
        label,
        statement: Statement::Instruction {
            mnemonic,
            operand: operand.chars().filter(|c| !c.is_whitespace()).collect(),
        },
    })
}

/// Whether `s` is a label name: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => chars.all(is_word_char),
        _ => false,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn hex_digits(s: &str, min: usize, max: usize) -> Option<u16> {
    if s.len() < min || s.len() > max || !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(s, 16).ok()
}

fn decimal_digits(s: &str, min: usize, max: usize) -> Option<u32> {
    if s.len() < min || s.len() > max || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse a byte literal: `$h`, `$hh` or 1-3 decimal digits up to 255.
///
/// Used for zero-page addresses, immediates and `DCB` items.
pub fn parse_byte(s: &str) -> Option<u8> {
    match s.strip_prefix('$') {
        Some(hex) => hex_digits(hex, 1, 2).map(|v| v as u8),
        None => decimal_digits(s, 1, 3).and_then(|v| u8::try_from(v).ok()),
    }
}

/// Parse an absolute address literal: `$hhh`, `$hhhh` or a decimal up to
/// 65535.
pub fn parse_word(s: &str) -> Option<u16> {
    match s.strip_prefix('$') {
        Some(hex) => hex_digits(hex, 3, 4),
        None => decimal_digits(s, 1, 5).and_then(|v| u16::try_from(v).ok()),
    }
}

/// Parse a branch target literal: `$` followed by 1-4 hex digits.
pub fn parse_target(s: &str) -> Option<u16> {
    s.strip_prefix('$').and_then(|hex| hex_digits(hex, 1, 4))
}

/// Parse the value of an origin directive (`$hex` or decimal).
///
/// The value is not range-checked here so the caller can report an
/// out-of-memory origin separately from a malformed one.
pub fn parse_origin(s: &str) -> Option<u64> {
    let (digits, radix) = match s.strip_prefix('$') {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    // Well-formed digits too long for u64 are still out of range
    Some(u64::from_str_radix(digits, radix).unwrap_or(u64::MAX))
}

/// Strips a `,X` / `,Y` index suffix (either case).
pub fn strip_index(operand: &str, register: char) -> Option<&str> {
    let base = operand.len().checked_sub(2)?;
    let suffix = operand.get(base..)?;
    let mut chars = suffix.chars();
    if chars.next() == Some(',') && chars.next().map(|c| c.to_ascii_uppercase()) == Some(register) {
        Some(&operand[..base])
    } else {
        None
    }
}
