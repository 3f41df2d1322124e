//! # Shift and Rotate Instructions
//!
//! ASL, LSR, ROL and ROR operate on the accumulator (implied form) or on a
//! memory location. Carry receives the bit shifted out; Z and N come from
//! the stored 8-bit result.

use crate::{AddressingMode, MemoryBus, CPU};

/// Executes the ASL (Arithmetic Shift Left) instruction.
pub(crate) fn execute_asl<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    modify(cpu, mode, |value, _| (value << 1, value & 0x80 != 0));
}

/// Executes the LSR (Logical Shift Right) instruction.
///
/// Bit 7 of the result is always clear, so N is always cleared.
pub(crate) fn execute_lsr<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    modify(cpu, mode, |value, _| (value >> 1, value & 0x01 != 0));
}

/// Executes the ROL (Rotate Left) instruction. The old carry enters bit 0.
pub(crate) fn execute_rol<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    modify(cpu, mode, |value, carry| {
        ((value << 1) | carry as u8, value & 0x80 != 0)
    });
}

/// Executes the ROR (Rotate Right) instruction. The old carry enters bit 7.
pub(crate) fn execute_ror<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    modify(cpu, mode, |value, carry| {
        ((value >> 1) | ((carry as u8) << 7), value & 0x01 != 0)
    });
}

/// Read-modify-write helper. `op` maps (value, carry in) to (result, carry out).
fn modify<M, F>(cpu: &mut CPU<M>, mode: AddressingMode, op: F)
where
    M: MemoryBus,
    F: FnOnce(u8, bool) -> (u8, bool),
{
    if mode == AddressingMode::Implied {
        let (result, carry) = op(cpu.a, cpu.flag_c);
        cpu.a = result;
        cpu.flag_c = carry;
        cpu.set_zn(result);
    } else {
        let addr = cpu.get_effective_address(mode);
        let (result, carry) = op(cpu.memory.read(addr), cpu.flag_c);
        cpu.memory.write(addr, result);
        cpu.flag_c = carry;
        cpu.set_zn(result);
    }
}
