//! Tests for the stack instructions and stack fault handling.
//!
//! The stack occupies $0100-$01FF. SP is kept with the page folded in:
//! 0x0100 is empty and 0x0000 is full.

use sim6502::{Assembler, ExecutionError, MemoryBus, MemoryImage, StepOutcome, CPU};

fn load(source: &str) -> CPU<MemoryImage> {
    let mut memory = MemoryImage::new();
    Assembler::default().compile(source, &mut memory).unwrap();
    CPU::new(memory)
}

fn run(source: &str) -> CPU<MemoryImage> {
    let mut cpu = load(source);
    let outcome = cpu.run_for_instructions(1_000).unwrap();
    assert!(matches!(outcome, StepOutcome::Break { .. }));
    cpu
}

// ========== Push and Pull ==========

#[test]
fn test_pha_pla_round_trip() {
    let cpu = run("LDA #$42\nPHA\nLDA #$00\nPLA\nBRK");

    assert_eq!(cpu.a(), 0x42);
    assert_eq!(cpu.sp(), 0x0100);
    assert!(!cpu.flag_z());
    assert_eq!(cpu.memory().read(0x01FF), 0x42);
}

#[test]
fn test_pla_sets_zero_and_negative() {
    let cpu = run("LDA #$80\nPHA\nLDA #$01\nPLA\nBRK");
    assert!(cpu.flag_n());

    let cpu = run("LDA #$00\nPHA\nLDA #$01\nPLA\nBRK");
    assert!(cpu.flag_z());
}

#[test]
fn test_php_pushes_break_and_unused_bits() {
    let cpu = run("SEC\nSED\nPHP\nPLA\nBRK");
    assert_eq!(cpu.a(), 0x39);
}

#[test]
fn test_plp_restores_flags_but_not_break() {
    let cpu = run("LDA #$D3\nPHA\nPLP\nBRK");

    assert!(cpu.flag_n());
    assert!(cpu.flag_v());
    assert!(cpu.flag_z());
    assert!(cpu.flag_c());
    assert!(!cpu.flag_b());
    assert_eq!(cpu.status(), 0xE3);
}

#[test]
fn test_tsx_and_txs() {
    let cpu = run("PHA\nPHA\nTSX\nBRK");
    assert_eq!(cpu.x(), 0xFE);

    let cpu = run("LDX #$80\nTXS\nPHA\nBRK");
    assert_eq!(cpu.sp(), 0x007F);
    assert_eq!(cpu.x(), 0x80);
}

#[test]
fn test_tsx_on_empty_stack() {
    let cpu = run("LDX #$05\nTSX\nBRK");
    assert_eq!(cpu.x(), 0x00);
    assert!(cpu.flag_z());
}

// ========== Faults ==========

#[test]
fn test_push_past_full_page_faults_before_zero_page() {
    let mut cpu = load(
        r#"
            LDA #$AA
            STA $FF
            LDA #$55
        loop:
            PHA
            JMP loop
        "#,
    );

    let err = cpu.run_for_instructions(10_000).unwrap_err();
    assert_eq!(err, ExecutionError::StackOverflow { address: 0x0606 });

    // 256 pushes filled the page; the 257th faulted
    assert_eq!(cpu.sp(), 0x0000);
    assert_eq!(cpu.memory().read(0x0100), 0x55);
    assert_eq!(cpu.memory().read(0x01FF), 0x55);
    assert_eq!(cpu.memory().read(0x00FF), 0xAA);
    assert_eq!(cpu.instructions(), 3 + 256 * 2);
}

#[test]
fn test_pull_from_empty_stack_faults() {
    let mut cpu = load("NOP\nPLA");
    cpu.step().unwrap();

    assert_eq!(
        cpu.step(),
        Err(ExecutionError::StackUnderflow { address: 0x0601 })
    );
    assert_eq!(cpu.sp(), 0x0100);
}

#[test]
fn test_plp_from_empty_stack_faults() {
    let mut cpu = load("PLP");
    assert_eq!(
        cpu.step(),
        Err(ExecutionError::StackUnderflow { address: 0x0600 })
    );
}

#[test]
fn test_fault_message_names_address() {
    let err = ExecutionError::StackOverflow { address: 0x0606 };
    assert_eq!(err.to_string(), "Stack full at $0606");
    assert_eq!(err.address(), 0x0606);
}
