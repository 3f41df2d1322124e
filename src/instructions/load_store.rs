//! # Load and Store Instructions
//!
//! Loads set Z and N from the loaded value. Stores affect no flags.

use crate::{AddressingMode, MemoryBus, CPU};

/// Executes the LDA (Load Accumulator) instruction.
pub(crate) fn execute_lda<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    cpu.a = cpu.get_operand_value(mode);
    cpu.set_zn(cpu.a);
}

/// Executes the LDX (Load X Register) instruction.
pub(crate) fn execute_ldx<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    cpu.x = cpu.get_operand_value(mode);
    cpu.set_zn(cpu.x);
}

/// Executes the LDY (Load Y Register) instruction.
pub(crate) fn execute_ldy<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    cpu.y = cpu.get_operand_value(mode);
    cpu.set_zn(cpu.y);
}

/// Executes the STA (Store Accumulator) instruction.
pub(crate) fn execute_sta<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    let addr = cpu.get_effective_address(mode);
    cpu.memory.write(addr, cpu.a);
}

/// Executes the STX (Store X Register) instruction.
pub(crate) fn execute_stx<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    let addr = cpu.get_effective_address(mode);
    cpu.memory.write(addr, cpu.x);
}

/// Executes the STY (Store Y Register) instruction.
pub(crate) fn execute_sty<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    let addr = cpu.get_effective_address(mode);
    cpu.memory.write(addr, cpu.y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryImage;

    #[test]
    fn test_lda_immediate_sets_negative() {
        let mut mem = MemoryImage::new();
        mem.write(0x0601, 0x80);
        let mut cpu = CPU::new(mem);
        cpu.pc = 0x0601;

        execute_lda(&mut cpu, AddressingMode::Immediate);

        assert_eq!(cpu.a, 0x80);
        assert!(cpu.flag_n);
        assert!(!cpu.flag_z);
        assert_eq!(cpu.pc, 0x0602);
    }

    #[test]
    fn test_sta_absolute_y() {
        let mut mem = MemoryImage::new();
        mem.write(0x0601, 0x00);
        mem.write(0x0602, 0x02);
        let mut cpu = CPU::new(mem);
        cpu.pc = 0x0601;
        cpu.a = 0x05;
        cpu.y = 0x21;

        execute_sta(&mut cpu, AddressingMode::AbsoluteY);

        assert_eq!(cpu.memory.read(0x0221), 0x05);
        assert_eq!(cpu.pc, 0x0603);
    }

    #[test]
    fn test_ldx_zero_page_y_wraps() {
        let mut mem = MemoryImage::new();
        mem.write(0x0601, 0xF0);
        mem.write(0x0010, 0x33);
        let mut cpu = CPU::new(mem);
        cpu.pc = 0x0601;
        cpu.y = 0x20;

        execute_ldx(&mut cpu, AddressingMode::ZeroPageY);

        assert_eq!(cpu.x, 0x33);
    }
}
