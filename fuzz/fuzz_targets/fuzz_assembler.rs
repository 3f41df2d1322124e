//! Fuzz target for the assembler.
//!
//! Feeds arbitrary text to the assembler. Besides not panicking, a
//! successful assembly must agree with its own label table and end address.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sim6502::disassembler::listing;
use sim6502::{assemble, DisassemblyOptions, DEFAULT_ORIGIN};

fuzz_target!(|data: &[u8]| {
    let source = String::from_utf8_lossy(data);

    let Ok(output) = assemble(&source) else {
        return;
    };

    assert_eq!(output.bytes.len(), output.bytes_emitted);
    assert!(output.bytes_emitted > 0);
    let covered: usize = output.segments.iter().map(|segment| segment.len).sum();
    assert_eq!(covered, output.bytes_emitted);

    // Without an origin directive the bytes are contiguous from the origin
    if !source.contains('*') {
        assert_eq!(
            output.end_address,
            DEFAULT_ORIGIN.wrapping_add(output.bytes_emitted as u16)
        );
    }

    let _ = listing(&output.bytes, DisassemblyOptions::default());
});
