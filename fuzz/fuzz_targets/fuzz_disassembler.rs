//! Fuzz target for the disassembler.
//!
//! Feeds arbitrary byte sequences to the disassembler and checks that every
//! input byte is accounted for exactly once.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sim6502::disassembler::listing;
use sim6502::{disassemble, hexdump, DisassemblyOptions};

#[derive(Debug, Arbitrary)]
struct FuzzOptions {
    start_address: u16,
    show_address: bool,
    show_bytes: bool,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    bytes: Vec<u8>,
    options: FuzzOptions,
}

fuzz_target!(|input: FuzzInput| {
    if input.bytes.len() > 65536 {
        return;
    }

    let options = DisassemblyOptions {
        start_address: input.options.start_address,
        show_address: input.options.show_address,
        show_bytes: input.options.show_bytes,
    };

    let instructions = disassemble(&input.bytes, options);

    let mut total_size: usize = 0;
    let mut expected_address = input.options.start_address;

    for instr in &instructions {
        assert_eq!(instr.address, expected_address);
        assert!(instr.size_bytes >= 1 && instr.size_bytes <= 3);
        assert!(instr.operand_bytes.len() <= instr.size_bytes as usize);

        total_size += instr.size_bytes as usize;
        expected_address = expected_address.wrapping_add(instr.size_bytes as u16);
    }

    assert_eq!(total_size, input.bytes.len());

    let text = listing(&input.bytes, options);
    assert_eq!(text.lines().count(), instructions.len());

    let dump = hexdump(&input.bytes, input.options.start_address);
    assert_eq!(dump.lines().count(), input.bytes.len().div_ceil(16));
});
