//! # 6502 Assembler and Interpreter
//!
//! A two-pass assembler for 6502 mnemonic source and an NMOS 6502 interpreter
//! that executes the assembled image against a flat 64KB memory with a 32x32
//! pixel display window at `$0200-$05FF`.
//!
//! ## Quick Start
//!
//! ```rust
//! use sim6502::{Session, SessionConfig, StepOutcome};
//!
//! let mut session = Session::new(SessionConfig::default());
//! let report = session.compile("LDA #$01\nSTA $0200\nBRK").unwrap();
//! assert_eq!(report.bytes_emitted, 6);
//!
//! session.start_continuous().unwrap();
//! let outcome = session.run_batch(100).unwrap();
//! assert!(matches!(outcome, StepOutcome::Break { .. }));
//! assert_eq!(session.cpu().a(), 0x01);
//! ```
//!
//! ## Modules
//!
//! - `addressing` - Addressing mode enumeration
//! - `opcodes` - Mnemonic descriptor table and 256-entry decode table
//! - `memory` - MemoryBus trait and the display-aware memory image
//! - `assembler` - Label pre-pass and two-pass encoder
//! - `cpu` - CPU state and the fetch-decode-execute loop
//! - `disassembler` - Decoder, formatter and hex dump
//! - `session` - Compile/run driver producing events for a front end
//! - `palette` - The 16-colour display palette

pub mod addressing;
pub mod assembler;
pub mod cpu;
pub mod disassembler;
pub mod memory;
pub mod opcodes;
pub mod palette;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

// Internal instruction implementations (not part of public API)
mod instructions;

// Re-export public API
pub use addressing::AddressingMode;
pub use assembler::{
    assemble, AssemblerError, AssemblerOutput, Assembler, ErrorType, LabelTable, Segment,
};
pub use cpu::{RegisterSnapshot, StepOutcome, CPU, DEFAULT_ORIGIN};
pub use disassembler::{
    decode_instruction, disassemble, format_instruction, hexdump, DisassemblyOptions, Instruction,
};
pub use memory::{MemoryBus, MemoryImage, PixelChange, DISPLAY_END, DISPLAY_START};
pub use opcodes::{Mnemonic, OpcodeDescriptor, OpcodeMetadata, OPCODE_DESCRIPTORS, OPCODE_TABLE};
pub use session::{
    parse_address, AddressParseError, Event, MessageLevel, RunMode, Session, SessionConfig,
    SessionError, SessionState,
};

/// Runtime faults raised by the interpreter.
///
/// Every fault carries the address of the instruction that raised it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    /// The opcode byte is not a documented 6502 instruction.
    #[error("Address ${address:04x} - unknown opcode ${opcode:02x}")]
    UnknownOpcode { address: u16, opcode: u8 },

    /// The opcode is documented but the interpreter does not execute it
    /// (RTI, CLI, SEI, JMP indirect).
    #[error("Address ${address:04x} - opcode ${opcode:02x} is not implemented")]
    UnimplementedOpcode { address: u16, opcode: u8 },

    /// A push was attempted with the stack page already full.
    #[error("Stack full at ${address:04x}")]
    StackOverflow { address: u16 },

    /// A pull was attempted with the stack page empty.
    #[error("Stack empty at ${address:04x}")]
    StackUnderflow { address: u16 },
}

impl ExecutionError {
    /// Address of the instruction that faulted.
    pub fn address(&self) -> u16 {
        match self {
            ExecutionError::UnknownOpcode { address, .. }
            | ExecutionError::UnimplementedOpcode { address, .. }
            | ExecutionError::StackOverflow { address }
            | ExecutionError::StackUnderflow { address } => *address,
        }
    }
}
