//! 6502 Disassembler Module
//!
//! Converts machine code back into assembler syntax using the same decode
//! table as the interpreter. Bytes that are not documented opcodes come out
//! as `DCB` lines, so a listing can be fed back to the assembler.

pub mod decoder;
pub mod formatter;

pub use decoder::decode_instruction;
pub use formatter::{format_instruction, hexdump};

use crate::addressing::AddressingMode;

/// A single disassembled instruction with full metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Memory address where this instruction starts
    pub address: u16,

    /// The opcode byte value (0x00-0xFF)
    pub opcode: u8,

    /// Instruction mnemonic (e.g., "LDA", "STA", "JMP"), or "DCB" for a
    /// byte that does not decode
    pub mnemonic: &'static str,

    /// Addressing mode used by this instruction
    pub addressing_mode: AddressingMode,

    /// Operand bytes (0-2 bytes depending on addressing mode)
    pub operand_bytes: Vec<u8>,

    /// Total size in bytes (1-3 bytes: opcode + operands)
    pub size_bytes: u8,
}

/// Options controlling disassembly output
#[derive(Debug, Clone, Copy)]
pub struct DisassemblyOptions {
    /// Starting address for disassembly (affects address display)
    pub start_address: u16,

    /// Prefix each line with its address
    pub show_address: bool,

    /// Include the raw instruction bytes after the address
    pub show_bytes: bool,
}

impl Default for DisassemblyOptions {
    fn default() -> Self {
        Self {
            start_address: crate::cpu::DEFAULT_ORIGIN,
            show_address: true,
            show_bytes: true,
        }
    }
}

/// Disassemble a byte slice into a vector of instructions
///
/// # Arguments
///
/// * `bytes` - The machine code to disassemble
/// * `options` - Disassembly options; only `start_address` matters here
///
/// # Returns
///
/// A vector of `Instruction` structs, one for each decoded instruction
pub fn disassemble(bytes: &[u8], options: DisassemblyOptions) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut pc = 0;
    let mut address = options.start_address;

    while pc < bytes.len() {
        match decoder::decode_instruction(&bytes[pc..], address) {
            Some(instr) => {
                pc += instr.size_bytes as usize;
                address = address.wrapping_add(instr.size_bytes as u16);
                instructions.push(instr);
            }
            None => {
                // Undocumented opcode or truncated instruction
                instructions.push(Instruction {
                    address,
                    opcode: bytes[pc],
                    mnemonic: "DCB",
                    addressing_mode: AddressingMode::Implied,
                    operand_bytes: vec![bytes[pc]],
                    size_bytes: 1,
                });
                pc += 1;
                address = address.wrapping_add(1);
            }
        }
    }

    instructions
}

/// Disassemble into a text listing, one instruction per line.
///
/// # Examples
///
/// ```
/// use sim6502::disassembler::{listing, DisassemblyOptions};
///
/// let text = listing(&[0xA9, 0x01, 0x00], DisassemblyOptions::default());
/// assert_eq!(text, "$0600  a9 01     LDA #$01\n$0602  00        BRK\n");
/// ```
pub fn listing(bytes: &[u8], options: DisassemblyOptions) -> String {
    let mut out = String::new();

    for instr in disassemble(bytes, options) {
        if options.show_address {
            out.push_str(&format!("${:04x}  ", instr.address));
        }
        if options.show_bytes {
            let raw: Vec<String> = std::iter::once(instr.opcode)
                .chain(instr.operand_bytes.iter().copied())
                .take(instr.size_bytes as usize)
                .map(|b| format!("{:02x}", b))
                .collect();
            out.push_str(&format!("{:<10}", raw.join(" ")));
        }
        out.push_str(&format_instruction(&instr));
        out.push('\n');
    }

    out
}
