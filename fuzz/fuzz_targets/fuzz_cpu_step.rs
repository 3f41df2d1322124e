//! Fuzz target for CPU step execution.
//!
//! Builds an arbitrary register state and memory around the origin, then
//! runs a short burst of instructions. Faults are fine; panics are not.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sim6502::{MemoryBus, MemoryImage, CPU, DEFAULT_ORIGIN};

/// Arbitrary CPU initial state for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    a: u8,
    x: u8,
    y: u8,
    /// Stack pointer, page folded in (clamped to 0x0100)
    sp: u16,
    status: u8,
}

/// Memory regions written before execution
#[derive(Debug, Arbitrary)]
struct FuzzMemory {
    /// Program bytes at the origin
    program: [u8; 32],
    zero_page: [u8; 256],
    stack_page: [u8; 256],
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    memory: FuzzMemory,
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = MemoryImage::new();

    for (i, &byte) in input.memory.program.iter().enumerate() {
        memory.write(DEFAULT_ORIGIN + i as u16, byte);
    }
    for (i, &byte) in input.memory.zero_page.iter().enumerate() {
        memory.write(i as u16, byte);
    }
    for (i, &byte) in input.memory.stack_page.iter().enumerate() {
        memory.write(0x0100 + i as u16, byte);
    }

    let mut cpu = CPU::new(memory);
    cpu.set_a(input.cpu_state.a);
    cpu.set_x(input.cpu_state.x);
    cpu.set_y(input.cpu_state.y);
    cpu.set_sp(input.cpu_state.sp);
    cpu.set_status(input.cpu_state.status);

    let _ = cpu.run_for_instructions(64);

    // The stack pointer never leaves the stack page
    assert!(cpu.sp() <= 0x0100);
    assert!(cpu.memory_mut().take_pixel_changes().iter().all(|c| c.color < 16));
});
