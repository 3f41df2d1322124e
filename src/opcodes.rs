//! # Opcode Tables
//!
//! Two static views of the documented NMOS 6502 instruction set:
//!
//! - [`OPCODE_DESCRIPTORS`]: one row per mnemonic mapping each assembler
//!   addressing mode to its opcode byte (or `None` when the combination does
//!   not exist). The assembler encodes through this table.
//! - [`OPCODE_TABLE`]: 256 entries indexed by opcode byte, derived from the
//!   descriptor rows at compile time. The interpreter and the disassembler
//!   decode through this table. Undocumented opcodes are `None`.
//!
//! The table covers 151 documented opcodes. `RTI`, `CLI`, `SEI` and
//! `JMP ($hhhh)` are decoded but marked as not implemented.

use crate::addressing::AddressingMode;
use std::fmt;

/// Instruction mnemonics of the documented 6502 instruction set.
///
/// Declaration order matches the row order of [`OPCODE_DESCRIPTORS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bit,
    Bpl,
    Bmi,
    Bvc,
    Bvs,
    Bcc,
    Bcs,
    Bne,
    Beq,
    Brk,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Eor,
    Clc,
    Sec,
    Cli,
    Sei,
    Clv,
    Cld,
    Sed,
    Inc,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Tax,
    Txa,
    Dex,
    Inx,
    Tay,
    Tya,
    Dey,
    Iny,
    Ror,
    Rol,
    Rti,
    Rts,
    Sbc,
    Sta,
    Txs,
    Tsx,
    Pha,
    Pla,
    Php,
    Plp,
    Stx,
    Sty,
}

impl Mnemonic {
    /// Upper-case assembler spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Adc => "ADC",
            Mnemonic::And => "AND",
            Mnemonic::Asl => "ASL",
            Mnemonic::Bit => "BIT",
            Mnemonic::Bpl => "BPL",
            Mnemonic::Bmi => "BMI",
            Mnemonic::Bvc => "BVC",
            Mnemonic::Bvs => "BVS",
            Mnemonic::Bcc => "BCC",
            Mnemonic::Bcs => "BCS",
            Mnemonic::Bne => "BNE",
            Mnemonic::Beq => "BEQ",
            Mnemonic::Brk => "BRK",
            Mnemonic::Cmp => "CMP",
            Mnemonic::Cpx => "CPX",
            Mnemonic::Cpy => "CPY",
            Mnemonic::Dec => "DEC",
            Mnemonic::Eor => "EOR",
            Mnemonic::Clc => "CLC",
            Mnemonic::Sec => "SEC",
            Mnemonic::Cli => "CLI",
            Mnemonic::Sei => "SEI",
            Mnemonic::Clv => "CLV",
            Mnemonic::Cld => "CLD",
            Mnemonic::Sed => "SED",
            Mnemonic::Inc => "INC",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Jsr => "JSR",
            Mnemonic::Lda => "LDA",
            Mnemonic::Ldx => "LDX",
            Mnemonic::Ldy => "LDY",
            Mnemonic::Lsr => "LSR",
            Mnemonic::Nop => "NOP",
            Mnemonic::Ora => "ORA",
            Mnemonic::Tax => "TAX",
            Mnemonic::Txa => "TXA",
            Mnemonic::Dex => "DEX",
            Mnemonic::Inx => "INX",
            Mnemonic::Tay => "TAY",
            Mnemonic::Tya => "TYA",
            Mnemonic::Dey => "DEY",
            Mnemonic::Iny => "INY",
            Mnemonic::Ror => "ROR",
            Mnemonic::Rol => "ROL",
            Mnemonic::Rti => "RTI",
            Mnemonic::Rts => "RTS",
            Mnemonic::Sbc => "SBC",
            Mnemonic::Sta => "STA",
            Mnemonic::Txs => "TXS",
            Mnemonic::Tsx => "TSX",
            Mnemonic::Pha => "PHA",
            Mnemonic::Pla => "PLA",
            Mnemonic::Php => "PHP",
            Mnemonic::Plp => "PLP",
            Mnemonic::Stx => "STX",
            Mnemonic::Sty => "STY",
        }
    }

    /// Looks up a mnemonic by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Mnemonic> {
        OPCODE_DESCRIPTORS
            .iter()
            .map(|d| d.mnemonic)
            .find(|m| m.as_str().eq_ignore_ascii_case(name))
    }

    /// Whether the interpreter executes this instruction.
    ///
    /// Interrupt-related instructions are decoded but refused at run time.
    pub const fn is_executable(self) -> bool {
        !matches!(self, Mnemonic::Rti | Mnemonic::Cli | Mnemonic::Sei)
    }

    /// Returns the descriptor row for this mnemonic.
    pub fn descriptor(self) -> &'static OpcodeDescriptor {
        &OPCODE_DESCRIPTORS[self as usize]
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assembler view of one mnemonic: the opcode byte for every addressing mode
/// it supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeDescriptor {
    /// Instruction mnemonic.
    pub mnemonic: Mnemonic,

    /// Opcode bytes in [`AddressingMode::COLUMNS`] order.
    pub opcodes: [Option<u8>; 11],
}

impl OpcodeDescriptor {
    /// Returns the opcode byte for `mode`, or `None` if this mnemonic has no
    /// encoding in that mode.
    pub fn opcode(&self, mode: AddressingMode) -> Option<u8> {
        mode.column().and_then(|col| self.opcodes[col])
    }
}

/// Decoder view of one opcode byte.
///
/// # Examples
///
/// ```
/// use sim6502::{AddressingMode, Mnemonic, OPCODE_TABLE};
///
/// let lda_imm = OPCODE_TABLE[0xA9].unwrap();
/// assert_eq!(lda_imm.mnemonic, Mnemonic::Lda);
/// assert_eq!(lda_imm.addressing_mode, AddressingMode::Immediate);
/// assert_eq!(lda_imm.size_bytes, 2);
/// assert!(OPCODE_TABLE[0x02].is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// The opcode byte this entry describes.
    pub opcode: u8,

    /// Instruction mnemonic.
    pub mnemonic: Mnemonic,

    /// Addressing mode for this instruction.
    pub addressing_mode: AddressingMode,

    /// Total instruction size in bytes (opcode + operands).
    pub size_bytes: u8,

    /// Whether the interpreter executes this opcode.
    pub implemented: bool,
}

const __: Option<u8> = None;

const fn op(byte: u8) -> Option<u8> {
    Some(byte)
}

const fn row(mnemonic: Mnemonic, opcodes: [Option<u8>; 11]) -> OpcodeDescriptor {
    OpcodeDescriptor { mnemonic, opcodes }
}

/// Mnemonic to opcode mapping, one row per [`Mnemonic`] in declaration order.
#[rustfmt::skip]
pub const OPCODE_DESCRIPTORS: [OpcodeDescriptor; 56] = [
    //                    Imm       ZP        ZPX       ZPY       ABS       ABSX      ABSY      INDX      INDY      SNGL      BRA
    row(Mnemonic::Adc, [op(0x69), op(0x65), op(0x75), __,       op(0x6D), op(0x7D), op(0x79), op(0x61), op(0x71), __,       __      ]),
    row(Mnemonic::And, [op(0x29), op(0x25), op(0x35), __,       op(0x2D), op(0x3D), op(0x39), op(0x21), op(0x31), __,       __      ]),
    row(Mnemonic::Asl, [__,       op(0x06), op(0x16), __,       op(0x0E), op(0x1E), __,       __,       __,       op(0x0A), __      ]),
    row(Mnemonic::Bit, [__,       op(0x24), __,       __,       op(0x2C), __,       __,       __,       __,       __,       __      ]),
    row(Mnemonic::Bpl, [__,       __,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x10)]),
    row(Mnemonic::Bmi, [__,       __,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x30)]),
    row(Mnemonic::Bvc, [__,       __,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x50)]),
    row(Mnemonic::Bvs, [__,       __,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x70)]),
    row(Mnemonic::Bcc, [__,       __,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x90)]),
    row(Mnemonic::Bcs, [__,       __,       __,       __,       __,       __,       __,       __,       __,       __,       op(0xB0)]),
    row(Mnemonic::Bne, [__,       __,       __,       __,       __,       __,       __,       __,       __,       __,       op(0xD0)]),
    row(Mnemonic::Beq, [__,       __,       __,       __,       __,       __,       __,       __,       __,       __,       op(0xF0)]),
    row(Mnemonic::Brk, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x00), __      ]),
    row(Mnemonic::Cmp, [op(0xC9), op(0xC5), op(0xD5), __,       op(0xCD), op(0xDD), op(0xD9), op(0xC1), op(0xD1), __,       __      ]),
    row(Mnemonic::Cpx, [op(0xE0), op(0xE4), __,       __,       op(0xEC), __,       __,       __,       __,       __,       __      ]),
    row(Mnemonic::Cpy, [op(0xC0), op(0xC4), __,       __,       op(0xCC), __,       __,       __,       __,       __,       __      ]),
    row(Mnemonic::Dec, [__,       op(0xC6), op(0xD6), __,       op(0xCE), op(0xDE), __,       __,       __,       __,       __      ]),
    row(Mnemonic::Eor, [op(0x49), op(0x45), op(0x55), __,       op(0x4D), op(0x5D), op(0x59), op(0x41), op(0x51), __,       __      ]),
    row(Mnemonic::Clc, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x18), __      ]),
    row(Mnemonic::Sec, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x38), __      ]),
    row(Mnemonic::Cli, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x58), __      ]),
    row(Mnemonic::Sei, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x78), __      ]),
    row(Mnemonic::Clv, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0xB8), __      ]),
    row(Mnemonic::Cld, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0xD8), __      ]),
    row(Mnemonic::Sed, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0xF8), __      ]),
    row(Mnemonic::Inc, [__,       op(0xE6), op(0xF6), __,       op(0xEE), op(0xFE), __,       __,       __,       __,       __      ]),
    row(Mnemonic::Jmp, [__,       __,       __,       __,       op(0x4C), __,       __,       __,       __,       __,       __      ]),
    row(Mnemonic::Jsr, [__,       __,       __,       __,       op(0x20), __,       __,       __,       __,       __,       __      ]),
    row(Mnemonic::Lda, [op(0xA9), op(0xA5), op(0xB5), __,       op(0xAD), op(0xBD), op(0xB9), op(0xA1), op(0xB1), __,       __      ]),
    row(Mnemonic::Ldx, [op(0xA2), op(0xA6), __,       op(0xB6), op(0xAE), __,       op(0xBE), __,       __,       __,       __      ]),
    row(Mnemonic::Ldy, [op(0xA0), op(0xA4), op(0xB4), __,       op(0xAC), op(0xBC), __,       __,       __,       __,       __      ]),
    row(Mnemonic::Lsr, [__,       op(0x46), op(0x56), __,       op(0x4E), op(0x5E), __,       __,       __,       op(0x4A), __      ]),
    row(Mnemonic::Nop, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0xEA), __      ]),
    row(Mnemonic::Ora, [op(0x09), op(0x05), op(0x15), __,       op(0x0D), op(0x1D), op(0x19), op(0x01), op(0x11), __,       __      ]),
    row(Mnemonic::Tax, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0xAA), __      ]),
    row(Mnemonic::Txa, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x8A), __      ]),
    row(Mnemonic::Dex, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0xCA), __      ]),
    row(Mnemonic::Inx, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0xE8), __      ]),
    row(Mnemonic::Tay, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0xA8), __      ]),
    row(Mnemonic::Tya, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x98), __      ]),
    row(Mnemonic::Dey, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x88), __      ]),
    row(Mnemonic::Iny, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0xC8), __      ]),
    row(Mnemonic::Ror, [__,       op(0x66), op(0x76), __,       op(0x6E), op(0x7E), __,       __,       __,       op(0x6A), __      ]),
    row(Mnemonic::Rol, [__,       op(0x26), op(0x36), __,       op(0x2E), op(0x3E), __,       __,       __,       op(0x2A), __      ]),
    row(Mnemonic::Rti, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x40), __      ]),
    row(Mnemonic::Rts, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x60), __      ]),
    row(Mnemonic::Sbc, [op(0xE9), op(0xE5), op(0xF5), __,       op(0xED), op(0xFD), op(0xF9), op(0xE1), op(0xF1), __,       __      ]),
    row(Mnemonic::Sta, [__,       op(0x85), op(0x95), __,       op(0x8D), op(0x9D), op(0x99), op(0x81), op(0x91), __,       __      ]),
    row(Mnemonic::Txs, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x9A), __      ]),
    row(Mnemonic::Tsx, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0xBA), __      ]),
    row(Mnemonic::Pha, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x48), __      ]),
    row(Mnemonic::Pla, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x68), __      ]),
    row(Mnemonic::Php, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x08), __      ]),
    row(Mnemonic::Plp, [__,       __,       __,       __,       __,       __,       __,       __,       __,       op(0x28), __      ]),
    row(Mnemonic::Stx, [__,       op(0x86), __,       op(0x96), op(0x8E), __,       __,       __,       __,       __,       __      ]),
    row(Mnemonic::Sty, [__,       op(0x84), op(0x94), __,       op(0x8C), __,       __,       __,       __,       __,       __      ]),
];

/// Opcode of `JMP ($hhhh)`, the only documented opcode the assembler cannot
/// produce.
pub const JMP_INDIRECT: u8 = 0x6C;

/// Complete 256-entry decode table indexed by opcode byte value.
///
/// # Examples
///
/// ```
/// use sim6502::{Mnemonic, OPCODE_TABLE};
///
/// let brk = OPCODE_TABLE[0x00].unwrap();
/// assert_eq!(brk.mnemonic, Mnemonic::Brk);
/// assert_eq!(brk.size_bytes, 1);
///
/// let documented = OPCODE_TABLE.iter().filter(|e| e.is_some()).count();
/// assert_eq!(documented, 151);
/// ```
pub const OPCODE_TABLE: [Option<OpcodeMetadata>; 256] = build_opcode_table();

const fn build_opcode_table() -> [Option<OpcodeMetadata>; 256] {
    let mut table: [Option<OpcodeMetadata>; 256] = [None; 256];

    let mut row = 0;
    while row < OPCODE_DESCRIPTORS.len() {
        let descriptor = &OPCODE_DESCRIPTORS[row];
        let mut col = 0;
        while col < AddressingMode::COLUMNS.len() {
            if let Some(opcode) = descriptor.opcodes[col] {
                let mode = AddressingMode::COLUMNS[col];
                table[opcode as usize] = Some(OpcodeMetadata {
                    opcode,
                    mnemonic: descriptor.mnemonic,
                    addressing_mode: mode,
                    size_bytes: 1 + mode.operand_size(),
                    implemented: descriptor.mnemonic.is_executable(),
                });
            }
            col += 1;
        }
        row += 1;
    }

    table[JMP_INDIRECT as usize] = Some(OpcodeMetadata {
        opcode: JMP_INDIRECT,
        mnemonic: Mnemonic::Jmp,
        addressing_mode: AddressingMode::Indirect,
        size_bytes: 3,
        implemented: false,
    });

    table
}
