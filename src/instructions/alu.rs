//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements arithmetic and logical operations:
//! - ADC: Add with Carry
//! - SBC: Subtract with Carry
//! - AND, ORA, EOR: Bitwise logic on the accumulator
//! - CMP, CPX, CPY: Register comparisons
//! - BIT: Bit test
//!
//! ADC and SBC honour the decimal flag with NMOS binary-coded-decimal
//! behaviour: the accumulator and carry hold the decimal result, while the
//! overflow flag is derived from the uncorrected binary intermediate.

use crate::{AddressingMode, MemoryBus, CPU};

/// Executes the ADC (Add with Carry) instruction.
///
/// Adds the operand plus the carry flag to the accumulator.
///
/// # Flag Behavior
///
/// - Carry (C): Set on unsigned overflow (binary) or decimal result > 99
/// - Overflow (V): Set when both inputs share a sign the result does not have
/// - Zero (Z), Negative (N): From the final accumulator
pub(crate) fn execute_adc<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    let value = cpu.get_operand_value(mode);
    add_with_carry(cpu, value);
}

/// Executes the SBC (Subtract with Carry) instruction.
///
/// Subtracts the operand and the borrow (inverted carry) from the accumulator.
///
/// # Flag Behavior
///
/// - Carry (C): Clear if a borrow occurred
/// - Overflow (V): Set on signed overflow of the binary subtraction
/// - Zero (Z), Negative (N): From the final accumulator
pub(crate) fn execute_sbc<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    let value = cpu.get_operand_value(mode);
    subtract_with_carry(cpu, value);
}

pub(crate) fn add_with_carry<M: MemoryBus>(cpu: &mut CPU<M>, value: u8) {
    let a = cpu.a;
    let carry_in = cpu.flag_c as u16;

    if cpu.flag_d {
        // Low digit first; a corrected digit carries 0x10 into the high digit
        let mut low = (a & 0x0F) as u16 + (value & 0x0F) as u16 + carry_in;
        if low > 0x09 {
            low = ((low + 0x06) & 0x0F) + 0x10;
        }

        let mut sum = (a & 0xF0) as u16 + (value & 0xF0) as u16 + low;

        // V comes from the sum before the high digit is corrected
        cpu.flag_v = add_overflows(a, value, sum as u8);

        if sum > 0x9F {
            sum += 0x60;
        }

        cpu.flag_c = sum > 0xFF;
        cpu.a = sum as u8;
    } else {
        let sum = a as u16 + value as u16 + carry_in;

        cpu.flag_v = add_overflows(a, value, sum as u8);
        cpu.flag_c = sum > 0xFF;
        cpu.a = sum as u8;
    }

    cpu.set_zn(cpu.a);
}

pub(crate) fn subtract_with_carry<M: MemoryBus>(cpu: &mut CPU<M>, value: u8) {
    let a = cpu.a;
    let borrow = (!cpu.flag_c) as i16;

    let difference = a as i16 - value as i16 - borrow;

    // C and V always follow the binary subtraction
    cpu.flag_c = difference >= 0;
    cpu.flag_v = ((a ^ value) & (a ^ difference as u8) & 0x80) != 0;

    if cpu.flag_d {
        let mut low = (a & 0x0F) as i16 - (value & 0x0F) as i16 - borrow;
        let mut high = (a >> 4) as i16 - (value >> 4) as i16;

        if low < 0 {
            low -= 0x06;
            high -= 1;
        }
        if high < 0 {
            high -= 0x06;
        }

        cpu.a = (((high << 4) | (low & 0x0F)) & 0xFF) as u8;
    } else {
        cpu.a = difference as u8;
    }

    cpu.set_zn(cpu.a);
}

fn add_overflows(a: u8, b: u8, result: u8) -> bool {
    (!(a ^ b) & (a ^ result) & 0x80) != 0
}

/// Executes the AND (Logical AND) instruction.
pub(crate) fn execute_and<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    cpu.a &= cpu.get_operand_value(mode);
    cpu.set_zn(cpu.a);
}

/// Executes the ORA (Logical Inclusive OR) instruction.
pub(crate) fn execute_ora<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    cpu.a |= cpu.get_operand_value(mode);
    cpu.set_zn(cpu.a);
}

/// Executes the EOR (Exclusive OR) instruction.
pub(crate) fn execute_eor<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    cpu.a ^= cpu.get_operand_value(mode);
    cpu.set_zn(cpu.a);
}

/// Executes the CMP (Compare Accumulator) instruction.
///
/// # Flag Behavior
///
/// - Carry (C): Set if A >= M (unsigned)
/// - Zero (Z), Negative (N): From `(A - M) & 0xFF`
/// - The accumulator is not modified
pub(crate) fn execute_cmp<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    let value = cpu.get_operand_value(mode);
    let a = cpu.a;
    compare(cpu, a, value);
}

/// Executes the CPX (Compare X Register) instruction.
pub(crate) fn execute_cpx<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    let value = cpu.get_operand_value(mode);
    let x = cpu.x;
    compare(cpu, x, value);
}

/// Executes the CPY (Compare Y Register) instruction.
pub(crate) fn execute_cpy<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    let value = cpu.get_operand_value(mode);
    let y = cpu.y;
    compare(cpu, y, value);
}

fn compare<M: MemoryBus>(cpu: &mut CPU<M>, register: u8, value: u8) {
    cpu.flag_c = register >= value;
    cpu.set_zn(register.wrapping_sub(value));
}

/// Executes the BIT (Bit Test) instruction.
///
/// # Flag Behavior
///
/// - Zero (Z): Set if `A & M` is zero
/// - Negative (N): Bit 7 of M
/// - Overflow (V): Bit 6 of M
pub(crate) fn execute_bit<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) {
    let value = cpu.get_operand_value(mode);
    cpu.flag_z = (cpu.a & value) == 0;
    cpu.flag_n = (value & 0x80) != 0;
    cpu.flag_v = (value & 0x40) != 0;
}
