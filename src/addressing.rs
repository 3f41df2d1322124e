//! # Addressing Modes
//!
//! This module defines the addressing modes understood by the assembler and the
//! interpreter. Each mode determines how operand bytes follow an opcode and how
//! the CPU calculates the effective address.

/// 6502 addressing mode enumeration.
///
/// The first eleven variants are the modes the assembler can encode. `Indirect`
/// exists only so that `JMP ($hhhh)` can be decoded and reported as an
/// unimplemented instruction.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implied
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative, IndirectX, IndirectY
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// 8-bit constant operand in instruction.
    ///
    /// Example: LDA #$10
    Immediate,

    /// 8-bit address in zero page (0x00-0xFF).
    ///
    /// Example: LDA $80
    ZeroPage,

    /// Zero page address indexed by X register, wrapping within zero page.
    ///
    /// Example: LDA $80,X
    ZeroPageX,

    /// Zero page address indexed by Y register, wrapping within zero page.
    ///
    /// Example: LDX $80,Y
    ZeroPageY,

    /// Full 16-bit address.
    ///
    /// Example: JMP $1234
    Absolute,

    /// 16-bit address indexed by X register.
    ///
    /// Example: LDA $1234,X
    AbsoluteX,

    /// 16-bit address indexed by Y register.
    ///
    /// Example: LDA $1234,Y
    AbsoluteY,

    /// Indexed indirect: (ZP + X) then dereference.
    ///
    /// Example: LDA ($40,X)
    IndirectX,

    /// Indirect indexed: ZP dereference then + Y.
    ///
    /// Example: LDA ($40),Y
    IndirectY,

    /// No operand. Covers implied instructions and the accumulator forms of
    /// the shifts and rotates.
    ///
    /// Examples: CLC, RTS, ASL
    Implied,

    /// Signed 8-bit offset for branch instructions.
    ///
    /// Example: BEQ label
    Relative,

    /// Indirect jump through 16-bit pointer. Decoded, never executed.
    ///
    /// Example: JMP ($FFFC)
    Indirect,
}

impl AddressingMode {
    /// Column order of the assembler's opcode descriptor table.
    pub const COLUMNS: [AddressingMode; 11] = [
        AddressingMode::Immediate,
        AddressingMode::ZeroPage,
        AddressingMode::ZeroPageX,
        AddressingMode::ZeroPageY,
        AddressingMode::Absolute,
        AddressingMode::AbsoluteX,
        AddressingMode::AbsoluteY,
        AddressingMode::IndirectX,
        AddressingMode::IndirectY,
        AddressingMode::Implied,
        AddressingMode::Relative,
    ];

    /// Order in which the assembler tries operand matchers.
    ///
    /// Zero-page forms come before absolute ones, and the bare-label absolute
    /// form comes after every indexed form.
    pub const MATCH_ORDER: [AddressingMode; 11] = [
        AddressingMode::Implied,
        AddressingMode::Immediate,
        AddressingMode::ZeroPage,
        AddressingMode::ZeroPageX,
        AddressingMode::ZeroPageY,
        AddressingMode::AbsoluteX,
        AddressingMode::AbsoluteY,
        AddressingMode::IndirectX,
        AddressingMode::IndirectY,
        AddressingMode::Absolute,
        AddressingMode::Relative,
    ];

    /// Index of this mode in [`AddressingMode::COLUMNS`], or `None` for modes
    /// the assembler cannot encode.
    pub const fn column(self) -> Option<usize> {
        match self {
            AddressingMode::Immediate => Some(0),
            AddressingMode::ZeroPage => Some(1),
            AddressingMode::ZeroPageX => Some(2),
            AddressingMode::ZeroPageY => Some(3),
            AddressingMode::Absolute => Some(4),
            AddressingMode::AbsoluteX => Some(5),
            AddressingMode::AbsoluteY => Some(6),
            AddressingMode::IndirectX => Some(7),
            AddressingMode::IndirectY => Some(8),
            AddressingMode::Implied => Some(9),
            AddressingMode::Relative => Some(10),
            AddressingMode::Indirect => None,
        }
    }

    /// Number of operand bytes following the opcode.
    pub const fn operand_size(self) -> u8 {
        match self {
            AddressingMode::Implied => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY
            | AddressingMode::Relative => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }
}
