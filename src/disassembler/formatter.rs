//! Formatting functions for disassembled instructions and memory dumps

use crate::addressing::AddressingMode;
use crate::disassembler::Instruction;

/// Format a single instruction as assembly text
///
/// The output uses the assembler's operand syntax: two hex digits for
/// byte operands, four for addresses, and branch targets as absolute
/// addresses.
pub fn format_instruction(instr: &Instruction) -> String {
    let operand = format_operand(instr);

    if operand.is_empty() {
        instr.mnemonic.to_string()
    } else {
        format!("{} {}", instr.mnemonic, operand)
    }
}

/// Format the operand based on addressing mode
fn format_operand(instr: &Instruction) -> String {
    use AddressingMode::*;

    if instr.mnemonic == "DCB" {
        return format!("${:02X}", instr.opcode);
    }

    let byte = instr.operand_bytes.first().copied().unwrap_or(0);
    let word = match instr.operand_bytes.as_slice() {
        [lo, hi, ..] => u16::from_le_bytes([*lo, *hi]),
        _ => 0,
    };

    match instr.addressing_mode {
        Implied => String::new(),
        Immediate => format!("#${:02X}", byte),
        ZeroPage => format!("${:02X}", byte),
        ZeroPageX => format!("${:02X},X", byte),
        ZeroPageY => format!("${:02X},Y", byte),
        Relative => {
            let target = instr
                .address
                .wrapping_add(2)
                .wrapping_add_signed(byte as i8 as i16);
            format!("${:04X}", target)
        }
        Absolute => format!("${:04X}", word),
        AbsoluteX => format!("${:04X},X", word),
        AbsoluteY => format!("${:04X},Y", word),
        Indirect => format!("(${:04X})", word),
        IndirectX => format!("(${:02X},X)", byte),
        IndirectY => format!("(${:02X}),Y", byte),
    }
}

/// Render bytes as a hex dump, 16 per row, grouped in pairs.
///
/// Each row starts with the address of its first byte. An odd byte count
/// ends with `-- [END]`.
///
/// # Examples
///
/// ```
/// use sim6502::hexdump;
///
/// let dump = hexdump(&[0xA9, 0x01, 0x8D, 0x00, 0x02], 0x0600);
/// assert_eq!(dump, "0600: a901 8d00 02-- [END]\n");
/// ```
pub fn hexdump(bytes: &[u8], start: u16) -> String {
    let mut out = String::new();

    for (row, chunk) in bytes.chunks(16).enumerate() {
        let address = start.wrapping_add((row * 16) as u16);
        out.push_str(&format!("{:04x}:", address));

        for pair in chunk.chunks(2) {
            out.push(' ');
            for byte in pair {
                out.push_str(&format!("{:02x}", byte));
            }
        }

        if chunk.len() % 2 == 1 {
            out.push_str("-- [END]");
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instr(opcode: u8, mnemonic: &'static str, mode: AddressingMode, operand: &[u8]) -> Instruction {
        Instruction {
            address: 0x0600,
            opcode,
            mnemonic,
            addressing_mode: mode,
            operand_bytes: operand.to_vec(),
            size_bytes: 1 + operand.len() as u8,
        }
    }

    #[test]
    fn test_format_immediate() {
        let i = instr(0xA9, "LDA", AddressingMode::Immediate, &[0x42]);
        assert_eq!(format_instruction(&i), "LDA #$42");
    }

    #[test]
    fn test_format_absolute() {
        let i = instr(0x8D, "STA", AddressingMode::Absolute, &[0x00, 0x02]);
        assert_eq!(format_instruction(&i), "STA $0200");
    }

    #[test]
    fn test_format_implied() {
        let i = instr(0xEA, "NOP", AddressingMode::Implied, &[]);
        assert_eq!(format_instruction(&i), "NOP");
    }

    #[test]
    fn test_format_branch_target() {
        let i = instr(0xF0, "BEQ", AddressingMode::Relative, &[0xFE]);
        assert_eq!(format_instruction(&i), "BEQ $0600");
    }

    #[test]
    fn test_format_indirect_y() {
        let i = instr(0xB1, "LDA", AddressingMode::IndirectY, &[0x10]);
        assert_eq!(format_instruction(&i), "LDA ($10),Y");
    }

    #[test]
    fn test_format_undocumented_byte() {
        let i = instr(0xFF, "DCB", AddressingMode::Implied, &[0xFF]);
        assert_eq!(format_instruction(&i), "DCB $FF");
    }

    #[test]
    fn test_hexdump_rows() {
        let bytes: Vec<u8> = (0..18).collect();
        let dump = hexdump(&bytes, 0x0600);
        assert_eq!(
            dump,
            "0600: 0001 0203 0405 0607 0809 0a0b 0c0d 0e0f\n0610: 1011\n"
        );
    }
}
