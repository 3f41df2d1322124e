//! # CPU State and Execution
//!
//! This module contains the CPU struct representing the 6502 processor state and
//! the fetch-decode-execute loop.
//!
//! ## CPU State
//!
//! The CPU maintains:
//! - **Registers**: Accumulator (A), index registers (X, Y)
//! - **Program counter** (PC): 16-bit address of next instruction
//! - **Stack pointer** (SP): index into the stack page with the 0x100 offset
//!   folded in; `0x100` means the stack is empty, `0x000` means it is full
//! - **Status flags**: N, V, B, D, I, Z, C (individual bool fields)
//!
//! ## Execution Model
//!
//! - `step()`: Fetch one opcode, advance PC, decode it, execute it
//! - `run_for_instructions()`: Step until halted or the budget is exhausted
//!
//! BRK halts execution, as does PC reaching 0x0000. Faults (unknown opcode,
//! stack overflow/underflow, unimplemented opcode) are returned as errors and
//! leave the CPU state as it was at the fault.

use std::fmt;

use log::trace;

use crate::addressing::AddressingMode;
use crate::instructions::{self, Flow};
use crate::{ExecutionError, MemoryBus, OPCODE_TABLE};

/// Address the program counter starts at after reset.
pub const DEFAULT_ORIGIN: u16 = 0x0600;

/// Base address of the stack page.
pub const STACK_PAGE: u16 = 0x0100;

/// Stack pointer value of an empty stack.
pub const STACK_EMPTY: u16 = 0x0100;

/// Status register value after reset (only the unused bit set).
pub const RESET_STATUS: u8 = 0x20;

/// Result of executing one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The instruction completed and execution can continue.
    Continue,

    /// BRK was executed at `address`.
    Break { address: u16 },

    /// The instruction at `address` left PC at 0x0000.
    ProgramEnd { address: u16 },
}

impl StepOutcome {
    /// Whether execution stopped.
    pub fn is_halt(&self) -> bool {
        !matches!(self, StepOutcome::Continue)
    }
}

/// Register and flag values at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSnapshot {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    pub sp: u16,
    pub pc: u16,
}

impl fmt::Display for RegisterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A=${:02x} X=${:02x} Y=${:02x}\nP=${:02x} SP=${:04x} PC=${:04x}",
            self.a, self.x, self.y, self.p, self.sp, self.pc
        )
    }
}

/// 6502 CPU state and execution context.
///
/// The CPU is generic over the memory implementation via the `MemoryBus` trait.
///
/// # Examples
///
/// ```
/// use sim6502::{CPU, MemoryImage, MemoryBus};
///
/// let mut memory = MemoryImage::new();
/// memory.write(0x0600, 0xA9); // LDA #$42
/// memory.write(0x0601, 0x42);
///
/// let mut cpu = CPU::new(memory);
/// assert_eq!(cpu.pc(), 0x0600);
/// assert_eq!(cpu.sp(), 0x0100);
/// assert_eq!(cpu.status(), 0x20);
///
/// cpu.step().unwrap();
/// assert_eq!(cpu.a(), 0x42);
/// assert_eq!(cpu.pc(), 0x0602);
/// ```
pub struct CPU<M: MemoryBus> {
    /// Accumulator register
    pub(crate) a: u8,

    /// X index register
    pub(crate) x: u8,

    /// Y index register
    pub(crate) y: u8,

    /// Program counter (address of next byte to fetch)
    pub(crate) pc: u16,

    /// Stack pointer with the stack page folded in (0x000..=0x100)
    pub(crate) sp: u16,

    /// Negative flag (set if bit 7 of result is 1)
    pub(crate) flag_n: bool,

    /// Overflow flag (set on signed overflow)
    pub(crate) flag_v: bool,

    /// Break flag
    pub(crate) flag_b: bool,

    /// Decimal mode flag (enables BCD arithmetic)
    pub(crate) flag_d: bool,

    /// Interrupt disable flag
    pub(crate) flag_i: bool,

    /// Zero flag (set if result is zero)
    pub(crate) flag_z: bool,

    /// Carry flag (set on unsigned overflow, clear on borrow)
    pub(crate) flag_c: bool,

    /// Address of the instruction currently executing
    pub(crate) instruction_address: u16,

    /// PC value loaded on reset
    origin: u16,

    /// Total instructions executed since reset
    instructions: u64,

    /// Memory bus implementation
    pub(crate) memory: M,
}

impl<M: MemoryBus> CPU<M> {
    /// Creates a CPU in the power-on state with PC at [`DEFAULT_ORIGIN`].
    pub fn new(memory: M) -> Self {
        Self::with_origin(memory, DEFAULT_ORIGIN)
    }

    /// Creates a CPU in the power-on state with PC at `origin`.
    ///
    /// - A, X, Y are zeroed
    /// - SP is 0x0100 (empty stack)
    /// - Status register is 0x20
    pub fn with_origin(memory: M, origin: u16) -> Self {
        let mut cpu = Self {
            a: 0,
            x: 0,
            y: 0,
            pc: origin,
            sp: STACK_EMPTY,
            flag_n: false,
            flag_v: false,
            flag_b: false,
            flag_d: false,
            flag_i: false,
            flag_z: false,
            flag_c: false,
            instruction_address: origin,
            origin,
            instructions: 0,
            memory,
        };
        cpu.reset();
        cpu
    }

    /// Restores the power-on register state. Memory is left untouched.
    pub fn reset(&mut self) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.pc = self.origin;
        self.sp = STACK_EMPTY;
        self.set_status(RESET_STATUS);
        self.flag_b = false;
        self.instruction_address = self.origin;
        self.instructions = 0;
    }

    /// Executes one instruction.
    ///
    /// Performs the fetch-decode-execute cycle:
    /// 1. Fetch opcode byte at PC and advance PC
    /// 2. Look up the opcode in the decode table
    /// 3. Refuse undocumented and unimplemented opcodes
    /// 4. Execute, consuming operand bytes as the addressing mode requires
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] for unknown or unimplemented opcodes and
    /// for stack overflow/underflow.
    pub fn step(&mut self) -> Result<StepOutcome, ExecutionError> {
        self.instruction_address = self.pc;
        let opcode = self.fetch_byte();

        let metadata = OPCODE_TABLE[opcode as usize].ok_or(ExecutionError::UnknownOpcode {
            address: self.instruction_address,
            opcode,
        })?;

        if !metadata.implemented {
            return Err(ExecutionError::UnimplementedOpcode {
                address: self.instruction_address,
                opcode,
            });
        }

        trace!(
            "${:04x}: {} {:?}",
            self.instruction_address,
            metadata.mnemonic,
            metadata.addressing_mode
        );

        let flow = instructions::execute(self, &metadata)?;
        self.instructions += 1;

        Ok(match flow {
            Flow::Break => StepOutcome::Break {
                address: self.instruction_address,
            },
            Flow::Continue if self.pc == 0 => StepOutcome::ProgramEnd {
                address: self.instruction_address,
            },
            Flow::Continue => StepOutcome::Continue,
        })
    }

    /// Runs up to `budget` instructions, stopping early on a halt.
    ///
    /// Returns `StepOutcome::Continue` when the budget ran out with the
    /// program still running.
    pub fn run_for_instructions(&mut self, budget: usize) -> Result<StepOutcome, ExecutionError> {
        for _ in 0..budget {
            let outcome = self.step()?;
            if outcome.is_halt() {
                return Ok(outcome);
            }
        }
        Ok(StepOutcome::Continue)
    }

    // ========== Operand Fetching ==========

    /// Reads the byte at PC and advances PC.
    pub(crate) fn fetch_byte(&mut self) -> u8 {
        let value = self.memory.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    /// Reads a little-endian word at PC and advances PC by two.
    pub(crate) fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch_byte() as u16;
        let hi = self.fetch_byte() as u16;
        (hi << 8) | lo
    }

    /// Consumes the operand bytes of `mode` and returns the effective address.
    ///
    /// For `Immediate` and `Relative` the effective address is the operand byte
    /// itself. `Implied` consumes nothing and yields the current PC.
    pub(crate) fn get_effective_address(&mut self, mode: AddressingMode) -> u16 {
        match mode {
            AddressingMode::Implied => self.pc,
            AddressingMode::Immediate | AddressingMode::Relative => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                addr
            }
            AddressingMode::ZeroPage => self.fetch_byte() as u16,
            AddressingMode::ZeroPageX => self.fetch_byte().wrapping_add(self.x) as u16,
            AddressingMode::ZeroPageY => self.fetch_byte().wrapping_add(self.y) as u16,
            AddressingMode::Absolute => self.fetch_word(),
            AddressingMode::AbsoluteX => self.fetch_word().wrapping_add(self.x as u16),
            AddressingMode::AbsoluteY => self.fetch_word().wrapping_add(self.y as u16),
            AddressingMode::IndirectX => {
                let zp = self.fetch_byte().wrapping_add(self.x);
                self.read_zero_page_word(zp)
            }
            AddressingMode::IndirectY => {
                let zp = self.fetch_byte();
                self.read_zero_page_word(zp).wrapping_add(self.y as u16)
            }
            // JMP ($hhhh) is flagged unimplemented, so step never resolves this
            AddressingMode::Indirect => {
                let pointer = self.fetch_word();
                self.memory.read_word(pointer)
            }
        }
    }

    /// Consumes the operand bytes of `mode` and returns the operand value.
    pub(crate) fn get_operand_value(&mut self, mode: AddressingMode) -> u8 {
        let addr = self.get_effective_address(mode);
        self.memory.read(addr)
    }

    /// Reads a pointer from zero page; the high byte wraps within zero page.
    fn read_zero_page_word(&self, zp: u8) -> u16 {
        let lo = self.memory.read(zp as u16) as u16;
        let hi = self.memory.read(zp.wrapping_add(1) as u16) as u16;
        (hi << 8) | lo
    }

    // ========== Flags and Stack ==========

    /// Sets Z and N from `value`.
    pub(crate) fn set_zn(&mut self, value: u8) {
        self.flag_z = value == 0;
        self.flag_n = (value & 0x80) != 0;
    }

    /// Pushes one byte, faulting if the stack page is full.
    pub(crate) fn push(&mut self, value: u8) -> Result<(), ExecutionError> {
        if self.sp == 0 {
            return Err(ExecutionError::StackOverflow {
                address: self.instruction_address,
            });
        }
        self.sp -= 1;
        self.memory.write(STACK_PAGE + self.sp, value);
        Ok(())
    }

    /// Pulls one byte, faulting if the stack is empty.
    pub(crate) fn pop(&mut self) -> Result<u8, ExecutionError> {
        if self.sp >= STACK_EMPTY {
            return Err(ExecutionError::StackUnderflow {
                address: self.instruction_address,
            });
        }
        let value = self.memory.read(STACK_PAGE + self.sp);
        self.sp += 1;
        Ok(value)
    }

    /// Pushes a word high byte first. Checks room for both bytes up front.
    pub(crate) fn push_word(&mut self, value: u16) -> Result<(), ExecutionError> {
        if self.sp < 2 {
            return Err(ExecutionError::StackOverflow {
                address: self.instruction_address,
            });
        }
        self.push((value >> 8) as u8)?;
        self.push(value as u8)
    }

    /// Pulls a word low byte first. Checks both bytes are present up front.
    pub(crate) fn pop_word(&mut self) -> Result<u16, ExecutionError> {
        if self.sp > STACK_EMPTY - 2 {
            return Err(ExecutionError::StackUnderflow {
                address: self.instruction_address,
            });
        }
        let lo = self.pop()? as u16;
        let hi = self.pop()? as u16;
        Ok((hi << 8) | lo)
    }

    // ========== Register Getters ==========

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// Returns the X index register value.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Returns the Y index register value.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Returns the stack pointer with the stack page folded in.
    ///
    /// `0x0100` is an empty stack; the next push writes to `0x01FF`.
    pub fn sp(&self) -> u16 {
        self.sp
    }

    /// Returns the PC value used on reset.
    pub fn origin(&self) -> u16 {
        self.origin
    }

    /// Returns the number of instructions executed since reset.
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Returns the status register as a packed byte.
    ///
    /// Bit layout (NV-BDIZC), bit 5 always reads 1.
    pub fn status(&self) -> u8 {
        let mut status: u8 = 0b0010_0000;

        if self.flag_n {
            status |= 0b1000_0000;
        }
        if self.flag_v {
            status |= 0b0100_0000;
        }
        if self.flag_b {
            status |= 0b0001_0000;
        }
        if self.flag_d {
            status |= 0b0000_1000;
        }
        if self.flag_i {
            status |= 0b0000_0100;
        }
        if self.flag_z {
            status |= 0b0000_0010;
        }
        if self.flag_c {
            status |= 0b0000_0001;
        }

        status
    }

    /// Captures the registers for a front end.
    pub fn snapshot(&self) -> RegisterSnapshot {
        RegisterSnapshot {
            a: self.a,
            x: self.x,
            y: self.y,
            p: self.status(),
            sp: self.sp,
            pc: self.pc,
        }
    }

    // ========== Status Flag Getters ==========

    /// Returns true if the Negative flag is set.
    pub fn flag_n(&self) -> bool {
        self.flag_n
    }

    /// Returns true if the Overflow flag is set.
    pub fn flag_v(&self) -> bool {
        self.flag_v
    }

    /// Returns true if the Break flag is set.
    pub fn flag_b(&self) -> bool {
        self.flag_b
    }

    /// Returns true if the Decimal mode flag is set.
    pub fn flag_d(&self) -> bool {
        self.flag_d
    }

    /// Returns true if the Interrupt Disable flag is set.
    pub fn flag_i(&self) -> bool {
        self.flag_i
    }

    /// Returns true if the Zero flag is set.
    pub fn flag_z(&self) -> bool {
        self.flag_z
    }

    /// Returns true if the Carry flag is set.
    pub fn flag_c(&self) -> bool {
        self.flag_c
    }

    // ========== Setters ==========

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Sets the stack pointer, clamped to the empty-stack value.
    pub fn set_sp(&mut self, value: u16) {
        self.sp = value.min(STACK_EMPTY);
    }

    /// Loads every flag from a packed status byte.
    pub fn set_status(&mut self, value: u8) {
        self.flag_n = value & 0b1000_0000 != 0;
        self.flag_v = value & 0b0100_0000 != 0;
        self.flag_b = value & 0b0001_0000 != 0;
        self.flag_d = value & 0b0000_1000 != 0;
        self.flag_i = value & 0b0000_0100 != 0;
        self.flag_z = value & 0b0000_0010 != 0;
        self.flag_c = value & 0b0000_0001 != 0;
    }

    pub fn set_flag_n(&mut self, value: bool) {
        self.flag_n = value;
    }

    pub fn set_flag_v(&mut self, value: bool) {
        self.flag_v = value;
    }

    pub fn set_flag_d(&mut self, value: bool) {
        self.flag_d = value;
    }

    pub fn set_flag_z(&mut self, value: bool) {
        self.flag_z = value;
    }

    pub fn set_flag_c(&mut self, value: bool) {
        self.flag_c = value;
    }

    // ========== Memory Access ==========

    /// Returns a shared reference to the memory bus.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Returns a mutable reference to the memory bus.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryImage;

    #[test]
    fn test_cpu_initialization() {
        let cpu = CPU::new(MemoryImage::new());

        assert_eq!(cpu.pc(), 0x0600);
        assert_eq!(cpu.sp(), 0x0100);
        assert_eq!(cpu.a(), 0x00);
        assert_eq!(cpu.x(), 0x00);
        assert_eq!(cpu.y(), 0x00);
        assert_eq!(cpu.status(), 0x20);
        assert_eq!(cpu.instructions(), 0);
    }

    #[test]
    fn test_status_register_round_trip() {
        let mut cpu = CPU::new(MemoryImage::new());
        cpu.set_status(0b1100_1011);
        assert!(cpu.flag_n());
        assert!(cpu.flag_v());
        assert!(cpu.flag_d());
        assert!(cpu.flag_z());
        assert!(cpu.flag_c());
        assert!(!cpu.flag_i());
        assert_eq!(cpu.status(), 0b1110_1011);
    }

    #[test]
    fn test_reset_restores_power_on_state() {
        let mut cpu = CPU::with_origin(MemoryImage::new(), 0x1000);
        cpu.set_a(0x12);
        cpu.set_pc(0x2000);
        cpu.set_sp(0x80);
        cpu.set_flag_c(true);

        cpu.reset();

        assert_eq!(cpu.a(), 0);
        assert_eq!(cpu.pc(), 0x1000);
        assert_eq!(cpu.sp(), 0x0100);
        assert_eq!(cpu.status(), 0x20);
    }

    #[test]
    fn test_step_unknown_opcode() {
        let mut mem = MemoryImage::new();
        mem.write(0x0600, 0x02);

        let mut cpu = CPU::new(mem);
        assert_eq!(
            cpu.step(),
            Err(ExecutionError::UnknownOpcode {
                address: 0x0600,
                opcode: 0x02
            })
        );
    }

    #[test]
    fn test_step_unimplemented_opcode() {
        let mut mem = MemoryImage::new();
        mem.write(0x0600, 0x78); // SEI

        let mut cpu = CPU::new(mem);
        assert_eq!(
            cpu.step(),
            Err(ExecutionError::UnimplementedOpcode {
                address: 0x0600,
                opcode: 0x78
            })
        );
    }

    #[test]
    fn test_every_flagged_opcode_refused_before_execution() {
        let flagged: Vec<u8> = (0..=255u8)
            .filter(|&op| {
                matches!(crate::opcodes::OPCODE_TABLE[op as usize], Some(m) if !m.implemented)
            })
            .collect();
        assert_eq!(flagged, vec![0x40, 0x58, 0x6C, 0x78]);

        for opcode in flagged {
            let mut mem = MemoryImage::new();
            mem.write(0x0600, opcode);
            mem.write(0x0601, 0x00);
            mem.write(0x0602, 0x07);

            let mut cpu = CPU::new(mem);
            assert_eq!(
                cpu.step(),
                Err(ExecutionError::UnimplementedOpcode {
                    address: 0x0600,
                    opcode
                })
            );
            assert_eq!(cpu.instructions(), 0);
        }
    }

    #[test]
    fn test_run_for_instructions_budget() {
        let mut mem = MemoryImage::new();
        for addr in 0x0600..0x0610 {
            mem.write(addr, 0xEA); // NOP
        }

        let mut cpu = CPU::new(mem);
        assert_eq!(cpu.run_for_instructions(5), Ok(StepOutcome::Continue));
        assert_eq!(cpu.pc(), 0x0605);
        assert_eq!(cpu.instructions(), 5);
    }

    #[test]
    fn test_pc_zero_ends_program() {
        let mut mem = MemoryImage::new();
        mem.write(0x0600, 0x4C); // JMP $0000
        mem.write(0x0601, 0x00);
        mem.write(0x0602, 0x00);

        let mut cpu = CPU::new(mem);
        assert_eq!(
            cpu.step(),
            Ok(StepOutcome::ProgramEnd { address: 0x0600 })
        );
    }

    #[test]
    fn test_indirect_pointer_wraps_in_zero_page() {
        let mut mem = MemoryImage::new();
        mem.write(0x00FF, 0x34);
        mem.write(0x0000, 0x12);
        mem.write(0x1234, 0x99);
        mem.write(0x0600, 0xA1); // LDA ($FF,X)
        mem.write(0x0601, 0xFF);

        let mut cpu = CPU::new(mem);
        cpu.step().unwrap();
        assert_eq!(cpu.a(), 0x99);
    }

    #[test]
    fn test_snapshot_display() {
        let cpu = CPU::new(MemoryImage::new());
        assert_eq!(
            cpu.snapshot().to_string(),
            "A=$00 X=$00 Y=$00\nP=$20 SP=$0100 PC=$0600"
        );
    }
}
