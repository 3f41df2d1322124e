//! Instruction encoder for the 6502 assembler
//!
//! Each addressing mode has a matcher that recognises its operand syntax.
//! Matching depends on the operand text alone, so a line encodes to the same
//! length whether or not its labels are resolved yet. Unresolved labels get
//! placeholder values while sizing and become errors when committing.

use crate::addressing::AddressingMode;
use crate::assembler::parser::{is_identifier, parse_byte, parse_target, parse_word, strip_index};
use crate::assembler::LabelTable;
use crate::opcodes::Mnemonic;

/// Placeholder word for an absolute label that is not yet defined.
pub const LABEL_PLACEHOLDER: u16 = 0x1234;

/// Which assembler pass is encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Lengths only; unresolved labels get placeholders
    Sizing,

    /// Final bytes; every label must resolve
    Commit,
}

/// Operand shape recognised by a matcher, before label resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'a> {
    None,
    Byte(u8),
    Word(u16),
    Label(&'a str),
    LowByte(&'a str),
    HighByte(&'a str),
}

/// Why a line could not be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// No addressing mode of the mnemonic accepts the operand
    NoMatchingMode,

    /// A label used on the committing pass was never defined
    UndefinedLabel(String),

    /// Branch target further than a signed byte away
    BranchOutOfRange(i32),
}

/// Match `operand` against the syntax of `mode`.
///
/// # Examples
///
/// ```
/// use sim6502::assembler::encoder::{match_operand, Operand};
/// use sim6502::AddressingMode;
///
/// assert_eq!(match_operand(AddressingMode::ZeroPageX, "$10,X"), Some(Operand::Byte(0x10)));
/// assert_eq!(match_operand(AddressingMode::Absolute, "loop"), Some(Operand::Label("loop")));
/// assert_eq!(match_operand(AddressingMode::Absolute, "$10"), None);
/// ```
pub fn match_operand(mode: AddressingMode, operand: &str) -> Option<Operand<'_>> {
    match mode {
        AddressingMode::Implied => operand.is_empty().then_some(Operand::None),
        AddressingMode::Immediate => match_immediate(operand.strip_prefix('#')?),
        AddressingMode::ZeroPage => parse_byte(operand).map(Operand::Byte),
        AddressingMode::ZeroPageX => parse_byte(strip_index(operand, 'X')?).map(Operand::Byte),
        AddressingMode::ZeroPageY => parse_byte(strip_index(operand, 'Y')?).map(Operand::Byte),
        AddressingMode::Absolute => match_absolute(operand),
        AddressingMode::AbsoluteX => match_absolute(strip_index(operand, 'X')?),
        AddressingMode::AbsoluteY => match_absolute(strip_index(operand, 'Y')?),
        AddressingMode::IndirectX => {
            let inner = operand.strip_prefix('(')?.strip_suffix(')')?;
            parse_byte(strip_index(inner, 'X')?).map(Operand::Byte)
        }
        AddressingMode::IndirectY => {
            let inner = strip_index(operand, 'Y')?;
            parse_byte(inner.strip_prefix('(')?.strip_suffix(')')?).map(Operand::Byte)
        }
        AddressingMode::Relative => {
            if is_identifier(operand) {
                Some(Operand::Label(operand))
            } else {
                parse_target(operand).map(Operand::Word)
            }
        }
        AddressingMode::Indirect => None,
    }
}

fn match_immediate(value: &str) -> Option<Operand<'_>> {
    if let Some(name) = value.strip_prefix('<') {
        return is_identifier(name).then_some(Operand::LowByte(name));
    }
    if let Some(name) = value.strip_prefix('>') {
        return is_identifier(name).then_some(Operand::HighByte(name));
    }
    parse_byte(value).map(Operand::Byte)
}

fn match_absolute(operand: &str) -> Option<Operand<'_>> {
    if is_identifier(operand) {
        return Some(Operand::Label(operand));
    }
    parse_word(operand).map(Operand::Word)
}

/// Encode one instruction at `address`.
///
/// Tries the addressing modes in [`AddressingMode::MATCH_ORDER`]; the first
/// mode the mnemonic supports whose syntax matches wins.
///
/// # Examples
///
/// ```
/// use sim6502::assembler::encoder::{encode_instruction, Pass};
/// use sim6502::{LabelTable, Mnemonic};
///
/// let labels = LabelTable::new();
/// let bytes = encode_instruction(Mnemonic::Sta, "$0200", 0x0600, &labels, Pass::Commit).unwrap();
/// assert_eq!(bytes, vec![0x8D, 0x00, 0x02]);
/// ```
pub fn encode_instruction(
    mnemonic: Mnemonic,
    operand: &str,
    address: u16,
    labels: &LabelTable,
    pass: Pass,
) -> Result<Vec<u8>, EncodeError> {
    let descriptor = mnemonic.descriptor();

    for mode in AddressingMode::MATCH_ORDER {
        let Some(opcode) = descriptor.opcode(mode) else {
            continue;
        };
        let Some(parsed) = match_operand(mode, operand) else {
            continue;
        };

        let mut bytes = vec![opcode];
        if mode == AddressingMode::Relative {
            bytes.push(branch_offset(parsed, address, labels, pass)?);
        } else {
            encode_operand(parsed, labels, pass, &mut bytes)?;
        }
        return Ok(bytes);
    }

    Err(EncodeError::NoMatchingMode)
}

fn resolve(name: &str, labels: &LabelTable, pass: Pass) -> Result<Option<u16>, EncodeError> {
    match (labels.address_of(name), pass) {
        (Some(address), _) => Ok(Some(address)),
        (None, Pass::Sizing) => Ok(None),
        (None, Pass::Commit) => Err(EncodeError::UndefinedLabel(name.to_string())),
    }
}

fn encode_operand(
    operand: Operand<'_>,
    labels: &LabelTable,
    pass: Pass,
    bytes: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    match operand {
        Operand::None => {}
        Operand::Byte(value) => bytes.push(value),
        Operand::Word(value) => bytes.extend_from_slice(&value.to_le_bytes()),
        Operand::Label(name) => {
            let address = resolve(name, labels, pass)?.unwrap_or(LABEL_PLACEHOLDER);
            bytes.extend_from_slice(&address.to_le_bytes());
        }
        Operand::LowByte(name) => {
            bytes.push(resolve(name, labels, pass)?.map_or(0x00, |addr| addr as u8));
        }
        Operand::HighByte(name) => {
            bytes.push(resolve(name, labels, pass)?.map_or(0x00, |addr| (addr >> 8) as u8));
        }
    }
    Ok(())
}

/// Offset byte for a branch at `address`, relative to the following
/// instruction.
fn branch_offset(
    operand: Operand<'_>,
    address: u16,
    labels: &LabelTable,
    pass: Pass,
) -> Result<u8, EncodeError> {
    let target = match operand {
        Operand::Label(name) => resolve(name, labels, pass)?,
        Operand::Word(target) => Some(target),
        _ => None,
    };

    let Some(target) = target else {
        return Ok(0x00);
    };

    let distance = target as i32 - (address as i32 + 2);
    match i8::try_from(distance) {
        Ok(offset) => Ok(offset as u8),
        Err(_) if pass == Pass::Sizing => Ok(0x00),
        Err(_) => Err(EncodeError::BranchOutOfRange(distance)),
    }
}
