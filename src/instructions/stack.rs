//! # Stack Instructions
//!
//! PHA, PHP, PLA and PLP. The stack lives at `$0100-$01FF`; pushing onto a
//! full page or pulling from an empty one faults.

use crate::{ExecutionError, MemoryBus, CPU};

/// Break and unused bits, always set in a pushed status byte.
const PUSHED_STATUS_BITS: u8 = 0b0011_0000;

/// Executes the PHA (Push Accumulator) instruction.
pub(crate) fn execute_pha<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let a = cpu.a;
    cpu.push(a)
}

/// Executes the PHP (Push Processor Status) instruction.
///
/// The pushed byte has bits 4 and 5 set.
pub(crate) fn execute_php<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let status = cpu.status() | PUSHED_STATUS_BITS;
    cpu.push(status)
}

/// Executes the PLA (Pull Accumulator) instruction. Sets Z and N.
pub(crate) fn execute_pla<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.a = cpu.pop()?;
    cpu.set_zn(cpu.a);
    Ok(())
}

/// Executes the PLP (Pull Processor Status) instruction.
///
/// Every flag is restored from the pulled byte except B, which keeps its
/// current value.
pub(crate) fn execute_plp<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let value = cpu.pop()?;
    let flag_b = cpu.flag_b;
    cpu.set_status(value);
    cpu.flag_b = flag_b;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryImage;

    #[test]
    fn test_php_sets_break_and_unused_bits() {
        let mut cpu = CPU::new(MemoryImage::new());
        cpu.flag_c = true;
        execute_php(&mut cpu).unwrap();
        assert_eq!(cpu.memory.read(0x01FF), 0x31);
        assert_eq!(cpu.sp, 0x00FF);
    }

    #[test]
    fn test_plp_ignores_break_bit() {
        let mut cpu = CPU::new(MemoryImage::new());
        cpu.push(0xFF).unwrap();
        execute_plp(&mut cpu).unwrap();
        assert!(!cpu.flag_b);
        assert!(cpu.flag_n && cpu.flag_v && cpu.flag_d && cpu.flag_i);
        assert!(cpu.flag_z && cpu.flag_c);
        assert_eq!(cpu.status(), 0xEF);
    }

    #[test]
    fn test_pla_sets_zero() {
        let mut cpu = CPU::new(MemoryImage::new());
        cpu.a = 0x44;
        cpu.push(0x00).unwrap();
        execute_pla(&mut cpu).unwrap();
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.flag_z);
    }

    #[test]
    fn test_pla_on_empty_stack_faults() {
        let mut cpu = CPU::new(MemoryImage::new());
        assert!(matches!(
            execute_pla(&mut cpu),
            Err(ExecutionError::StackUnderflow { .. })
        ));
    }

    #[test]
    fn test_pha_on_full_stack_faults() {
        let mut cpu = CPU::new(MemoryImage::new());
        for i in 0..256 {
            cpu.a = i as u8;
            execute_pha(&mut cpu).unwrap();
        }
        assert_eq!(cpu.sp, 0);
        assert!(matches!(
            execute_pha(&mut cpu),
            Err(ExecutionError::StackOverflow { .. })
        ));
        assert_eq!(cpu.sp, 0);
    }
}
