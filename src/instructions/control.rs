//! # Control Flow Instructions
//!
//! This module implements control flow operations:
//! - BRK: Halt the program
//! - JMP: Jump to an absolute address
//! - JSR: Jump to Subroutine
//! - RTS: Return from Subroutine
//!
//! BRK does not vector through `$FFFE`; it stops the run and leaves PC past
//! the opcode. JMP indirect is refused before dispatch.

use super::Flow;
use crate::{AddressingMode, ExecutionError, MemoryBus, CPU};

/// Executes the BRK instruction. Registers and memory are left unchanged.
pub(crate) fn execute_brk<M: MemoryBus>(_cpu: &mut CPU<M>) -> Flow {
    Flow::Break
}

/// Executes the JMP (Jump) instruction.
pub(crate) fn execute_jmp<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    cpu.pc = cpu.get_effective_address(mode);
}

/// Executes the JSR (Jump to Subroutine) instruction.
///
/// Pushes the address of the last byte of the JSR instruction (return
/// address minus one), high byte first, then jumps to the target.
///
/// # Errors
///
/// Faults with [`ExecutionError::StackOverflow`] if fewer than two bytes of
/// stack remain; the stack is left untouched in that case.
pub(crate) fn execute_jsr<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let target = cpu.fetch_word();
    let return_address = cpu.pc.wrapping_sub(1);
    cpu.push_word(return_address)?;
    cpu.pc = target;
    Ok(())
}

/// Executes the RTS (Return from Subroutine) instruction.
///
/// Pulls the return address low byte first and resumes one byte past it.
pub(crate) fn execute_rts<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let address = cpu.pop_word()?;
    cpu.pc = address.wrapping_add(1);
    Ok(())
}
