//! # 6502 Instruction Implementations
//!
//! This module contains the implementations of all executed 6502 instructions,
//! organized by category. Each instruction is a function taking a mutable
//! reference to the CPU and the addressing mode from the decode table; operand
//! bytes are consumed from PC as the mode requires.
//!
//! ## Categories
//!
//! - **alu**: Arithmetic and logic operations (ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT)
//! - **branches**: Conditional branch instructions (BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS)
//! - **shifts**: Shift and rotate operations (ASL, LSR, ROL, ROR)
//! - **load_store**: Load and store instructions (LDA, LDX, LDY, STA, STX, STY)
//! - **inc_dec**: Increment and decrement operations (INC, DEC, INX, INY, DEX, DEY)
//! - **control**: Control flow instructions (JMP, JSR, RTS, BRK, NOP)
//! - **stack**: Stack operations (PHA, PHP, PLA, PLP)
//! - **flags**: Status flag manipulation (CLC, SEC, CLV, CLD, SED)
//! - **transfer**: Register transfer operations (TAX, TAY, TXA, TYA, TSX, TXS)

pub mod alu;
pub mod branches;
pub mod control;
pub mod flags;
pub mod inc_dec;
pub mod load_store;
pub mod shifts;
pub mod stack;
pub mod transfer;

use crate::opcodes::{Mnemonic, OpcodeMetadata};
use crate::{ExecutionError, MemoryBus, CPU};

/// What the CPU does after an instruction completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Break,
}

/// Executes one decoded instruction. PC already points past the opcode byte.
pub(crate) fn execute<M: MemoryBus>(
    cpu: &mut CPU<M>,
    metadata: &OpcodeMetadata,
) -> Result<Flow, ExecutionError> {
    let mode = metadata.addressing_mode;

    match metadata.mnemonic {
        Mnemonic::Brk => return Ok(control::execute_brk(cpu)),

        Mnemonic::Adc => alu::execute_adc(cpu, mode),
        Mnemonic::Sbc => alu::execute_sbc(cpu, mode),
        Mnemonic::And => alu::execute_and(cpu, mode),
        Mnemonic::Ora => alu::execute_ora(cpu, mode),
        Mnemonic::Eor => alu::execute_eor(cpu, mode),
        Mnemonic::Cmp => alu::execute_cmp(cpu, mode),
        Mnemonic::Cpx => alu::execute_cpx(cpu, mode),
        Mnemonic::Cpy => alu::execute_cpy(cpu, mode),
        Mnemonic::Bit => alu::execute_bit(cpu, mode),

        Mnemonic::Bpl
        | Mnemonic::Bmi
        | Mnemonic::Bvc
        | Mnemonic::Bvs
        | Mnemonic::Bcc
        | Mnemonic::Bcs
        | Mnemonic::Bne
        | Mnemonic::Beq => branches::execute_branch(cpu, metadata.mnemonic),

        Mnemonic::Asl => shifts::execute_asl(cpu, mode),
        Mnemonic::Lsr => shifts::execute_lsr(cpu, mode),
        Mnemonic::Rol => shifts::execute_rol(cpu, mode),
        Mnemonic::Ror => shifts::execute_ror(cpu, mode),

        Mnemonic::Lda => load_store::execute_lda(cpu, mode),
        Mnemonic::Ldx => load_store::execute_ldx(cpu, mode),
        Mnemonic::Ldy => load_store::execute_ldy(cpu, mode),
        Mnemonic::Sta => load_store::execute_sta(cpu, mode),
        Mnemonic::Stx => load_store::execute_stx(cpu, mode),
        Mnemonic::Sty => load_store::execute_sty(cpu, mode),

        Mnemonic::Inc => inc_dec::execute_inc(cpu, mode),
        Mnemonic::Dec => inc_dec::execute_dec(cpu, mode),
        Mnemonic::Inx => inc_dec::execute_inx(cpu),
        Mnemonic::Iny => inc_dec::execute_iny(cpu),
        Mnemonic::Dex => inc_dec::execute_dex(cpu),
        Mnemonic::Dey => inc_dec::execute_dey(cpu),

        Mnemonic::Jmp => control::execute_jmp(cpu, mode),
        Mnemonic::Jsr => control::execute_jsr(cpu)?,
        Mnemonic::Rts => control::execute_rts(cpu)?,
        Mnemonic::Nop => {}

        Mnemonic::Pha => stack::execute_pha(cpu)?,
        Mnemonic::Php => stack::execute_php(cpu)?,
        Mnemonic::Pla => stack::execute_pla(cpu)?,
        Mnemonic::Plp => stack::execute_plp(cpu)?,

        Mnemonic::Clc => flags::execute_clc(cpu),
        Mnemonic::Sec => flags::execute_sec(cpu),
        Mnemonic::Clv => flags::execute_clv(cpu),
        Mnemonic::Cld => flags::execute_cld(cpu),
        Mnemonic::Sed => flags::execute_sed(cpu),

        Mnemonic::Tax => transfer::execute_tax(cpu),
        Mnemonic::Tay => transfer::execute_tay(cpu),
        Mnemonic::Txa => transfer::execute_txa(cpu),
        Mnemonic::Tya => transfer::execute_tya(cpu),
        Mnemonic::Tsx => transfer::execute_tsx(cpu),
        Mnemonic::Txs => transfer::execute_txs(cpu),

        // Flagged unimplemented in OPCODE_TABLE, so CPU::step never gets here
        Mnemonic::Rti | Mnemonic::Cli | Mnemonic::Sei => {}
    }

    Ok(Flow::Continue)
}
