//! Tests for the fetch-decode-execute loop: halting, faults and the
//! display window.

use sim6502::{
    Assembler, ExecutionError, MemoryBus, MemoryImage, PixelChange, StepOutcome, CPU,
    DEFAULT_ORIGIN,
};

fn load(source: &str) -> CPU<MemoryImage> {
    let mut memory = MemoryImage::new();
    Assembler::default().compile(source, &mut memory).unwrap();
    CPU::new(memory)
}

#[test]
fn test_power_on_state() {
    let cpu = CPU::new(MemoryImage::new());

    assert_eq!(cpu.pc(), DEFAULT_ORIGIN);
    assert_eq!(cpu.sp(), 0x0100);
    assert_eq!(cpu.status(), 0x20);
    assert_eq!((cpu.a(), cpu.x(), cpu.y()), (0, 0, 0));
}

#[test]
fn test_program_draws_pixel_and_halts() {
    let mut cpu = load("LDA #$01\nSTA $0200\nBRK");

    let outcome = cpu.run_for_instructions(100).unwrap();

    assert_eq!(outcome, StepOutcome::Break { address: 0x0605 });
    assert_eq!(cpu.a(), 0x01);
    assert_eq!(
        cpu.memory_mut().take_pixel_changes(),
        vec![PixelChange {
            offset: 0,
            color: 1
        }]
    );
}

#[test]
fn test_pixel_colour_uses_low_nibble() {
    let mut cpu = load("LDA #$F3\nLDX #$21\nSTA $0200,X\nSTA $05FF\nSTA $0600\nBRK");
    cpu.run_for_instructions(100).unwrap();

    let changes = cpu.memory_mut().take_pixel_changes();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0], PixelChange { offset: 0x21, color: 3 });
    assert_eq!((changes[0].x(), changes[0].y()), (1, 1));
    assert_eq!((changes[1].x(), changes[1].y()), (31, 31));
}

#[test]
fn test_brk_leaves_registers_alone() {
    let mut cpu = load("LDX #$09\nBRK");
    cpu.run_for_instructions(100).unwrap();

    assert_eq!(cpu.x(), 0x09);
    assert_eq!(cpu.sp(), 0x0100);
    assert_eq!(cpu.pc(), 0x0603);
}

#[test]
fn test_running_into_terminator_halts() {
    // The assembler writes a zero after the last byte
    let mut cpu = load("INX\nINX");

    let outcome = cpu.run_for_instructions(100).unwrap();
    assert_eq!(outcome, StepOutcome::Break { address: 0x0602 });
    assert_eq!(cpu.x(), 0x02);
}

#[test]
fn test_pc_reaching_zero_ends_program() {
    let mut cpu = load("JMP $0000");

    let outcome = cpu.run_for_instructions(100).unwrap();
    assert_eq!(outcome, StepOutcome::ProgramEnd { address: 0x0600 });
    assert!(outcome.is_halt());
}

#[test]
fn test_budget_exhausted() {
    let mut cpu = load("loop: INX\nJMP loop");

    let outcome = cpu.run_for_instructions(7).unwrap();
    assert_eq!(outcome, StepOutcome::Continue);
    assert_eq!(cpu.instructions(), 7);
    assert_eq!(cpu.x(), 4);
}

#[test]
fn test_unknown_opcode() {
    let mut cpu = load("NOP\nDCB $02");
    cpu.step().unwrap();

    let err = cpu.step().unwrap_err();
    assert_eq!(
        err,
        ExecutionError::UnknownOpcode {
            address: 0x0601,
            opcode: 0x02
        }
    );
    assert_eq!(err.to_string(), "Address $0601 - unknown opcode $02");
}

#[test]
fn test_interrupt_instructions_are_not_implemented() {
    for (source, opcode) in [("SEI", 0x78), ("CLI", 0x58), ("RTI", 0x40)] {
        let mut cpu = load(source);
        assert_eq!(
            cpu.step(),
            Err(ExecutionError::UnimplementedOpcode {
                address: 0x0600,
                opcode
            }),
            "{}",
            source
        );
    }
}

#[test]
fn test_reset_restores_registers() {
    let mut cpu = load("LDA #$10\nPHA\nSEC\nBRK");
    cpu.run_for_instructions(100).unwrap();

    cpu.reset();
    assert_eq!(cpu.pc(), 0x0600);
    assert_eq!(cpu.sp(), 0x0100);
    assert_eq!(cpu.a(), 0x00);
    assert!(!cpu.flag_c());
    assert_eq!(cpu.instructions(), 0);
    // Memory is untouched
    assert_eq!(cpu.memory().read(0x01FF), 0x10);
}

#[test]
fn test_custom_origin() {
    let mut memory = MemoryImage::new();
    Assembler::new(0x0800)
        .compile("LDY #$04\nBRK", &mut memory)
        .unwrap();

    let mut cpu = CPU::with_origin(memory, 0x0800);
    let outcome = cpu.run_for_instructions(10).unwrap();
    assert_eq!(outcome, StepOutcome::Break { address: 0x0802 });
    assert_eq!(cpu.y(), 0x04);
}
