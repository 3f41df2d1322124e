//! # Increment and Decrement Instructions
//!
//! - INC, DEC: Modify a memory location
//! - INX, INY, DEX, DEY: Modify an index register
//!
//! All wrap modulo 256 and set Z and N from the result.

use crate::{AddressingMode, MemoryBus, CPU};

/// Executes the INC (Increment Memory) instruction.
pub(crate) fn execute_inc<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    let addr = cpu.get_effective_address(mode);
    let value = cpu.memory.read(addr).wrapping_add(1);
    cpu.memory.write(addr, value);
    cpu.set_zn(value);
}

/// Executes the DEC (Decrement Memory) instruction.
pub(crate) fn execute_dec<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    let addr = cpu.get_effective_address(mode);
    let value = cpu.memory.read(addr).wrapping_sub(1);
    cpu.memory.write(addr, value);
    cpu.set_zn(value);
}

pub(crate) fn execute_inx<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.set_zn(cpu.x);
}

pub(crate) fn execute_iny<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.set_zn(cpu.y);
}

pub(crate) fn execute_dex<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.set_zn(cpu.x);
}

pub(crate) fn execute_dey<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.set_zn(cpu.y);
}
