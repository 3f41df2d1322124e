//! # Branch Instructions
//!
//! This module implements conditional branch operations:
//! - BPL, BMI: Branch on the Negative flag
//! - BVC, BVS: Branch on the Overflow flag
//! - BCC, BCS: Branch on the Carry flag
//! - BNE, BEQ: Branch on the Zero flag
//!
//! All branch instructions use relative addressing with a signed 8-bit offset
//! measured from the address following the two-byte instruction.

use crate::opcodes::Mnemonic;
use crate::{MemoryBus, CPU};

/// Executes a conditional branch.
///
/// The offset byte is always consumed. When the condition holds, PC moves by
/// the signed offset, wrapping within 64KB. No flags are affected.
pub(crate) fn execute_branch<M: MemoryBus>(cpu: &mut CPU<M>, mnemonic: Mnemonic) {
    let offset = cpu.fetch_byte() as i8;

    if branch_taken(cpu, mnemonic) {
        cpu.pc = cpu.pc.wrapping_add_signed(offset as i16);
    }
}

fn branch_taken<M: MemoryBus>(cpu: &CPU<M>, mnemonic: Mnemonic) -> bool {
    match mnemonic {
        Mnemonic::Bpl => !cpu.flag_n,
        Mnemonic::Bmi => cpu.flag_n,
        Mnemonic::Bvc => !cpu.flag_v,
        Mnemonic::Bvs => cpu.flag_v,
        Mnemonic::Bcc => !cpu.flag_c,
        Mnemonic::Bcs => cpu.flag_c,
        Mnemonic::Bne => !cpu.flag_z,
        Mnemonic::Beq => cpu.flag_z,
        _ => false,
    }
}
