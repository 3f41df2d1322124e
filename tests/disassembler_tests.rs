//! Integration tests for the 6502 disassembler

use sim6502::disassembler::listing;
use sim6502::{
    assemble, decode_instruction, disassemble, format_instruction, hexdump, AddressingMode,
    DisassemblyOptions,
};

#[test]
fn test_single_instruction_disassembly() {
    let instructions = disassemble(&[0xA9, 0x42], DisassemblyOptions::default());
    assert_eq!(instructions.len(), 1);

    let instr = &instructions[0];
    assert_eq!(instr.address, 0x0600);
    assert_eq!(instr.opcode, 0xA9);
    assert_eq!(instr.mnemonic, "LDA");
    assert_eq!(instr.addressing_mode, AddressingMode::Immediate);
    assert_eq!(instr.operand_bytes, vec![0x42]);
    assert_eq!(instr.size_bytes, 2);

    assert_eq!(format_instruction(instr), "LDA #$42");
}

#[test]
fn test_multi_instruction_addresses() {
    let bytes = &[
        0xA9, 0x42, // LDA #$42
        0x8D, 0x00, 0x80, // STA $8000
        0x4C, 0x00, 0x80, // JMP $8000
    ];
    let options = DisassemblyOptions {
        start_address: 0x8000,
        ..DisassemblyOptions::default()
    };

    let instructions = disassemble(bytes, options);
    let addresses: Vec<u16> = instructions.iter().map(|i| i.address).collect();
    let text: Vec<String> = instructions.iter().map(format_instruction).collect();

    assert_eq!(addresses, vec![0x8000, 0x8002, 0x8005]);
    assert_eq!(text, vec!["LDA #$42", "STA $8000", "JMP $8000"]);
}

#[test]
fn test_every_operand_syntax() {
    let cases: &[(&[u8], &str)] = &[
        (&[0x0A], "ASL"),
        (&[0xA5, 0x10], "LDA $10"),
        (&[0xB5, 0x10], "LDA $10,X"),
        (&[0xB6, 0x10], "LDX $10,Y"),
        (&[0xAD, 0x34, 0x12], "LDA $1234"),
        (&[0xBD, 0x34, 0x12], "LDA $1234,X"),
        (&[0xB9, 0x34, 0x12], "LDA $1234,Y"),
        (&[0xA1, 0x20], "LDA ($20,X)"),
        (&[0xB1, 0x20], "LDA ($20),Y"),
        (&[0x6C, 0x34, 0x12], "JMP ($1234)"),
    ];

    for (bytes, expected) in cases {
        let instr = decode_instruction(bytes, 0x0600).unwrap();
        assert_eq!(format_instruction(&instr), *expected);
    }
}

#[test]
fn test_branch_shows_target_address() {
    let forward = decode_instruction(&[0xD0, 0x05], 0x0600).unwrap();
    let backward = decode_instruction(&[0xD0, 0xFB], 0x0605).unwrap();

    assert_eq!(format_instruction(&forward), "BNE $0607");
    assert_eq!(format_instruction(&backward), "BNE $0602");
}

#[test]
fn test_undocumented_and_truncated_bytes() {
    let instructions = disassemble(&[0x02, 0xEA, 0xAD, 0x00], DisassemblyOptions::default());
    let text: Vec<String> = instructions.iter().map(format_instruction).collect();

    assert_eq!(text, vec!["DCB $02", "NOP", "DCB $AD", "DCB $00"]);
}

#[test]
fn test_listing_of_assembled_program() {
    let output = assemble("start: LDX #$00\nloop: INX\nBNE loop\nBRK").unwrap();
    let text = listing(&output.bytes, DisassemblyOptions::default());

    assert_eq!(
        text,
        "$0600  a2 00     LDX #$00\n\
         $0602  e8        INX\n\
         $0603  d0 fd     BNE $0602\n\
         $0605  00        BRK\n"
    );
}

#[test]
fn test_listing_without_address_or_bytes() {
    let options = DisassemblyOptions {
        show_address: false,
        show_bytes: false,
        ..DisassemblyOptions::default()
    };
    assert_eq!(listing(&[0xE8, 0xC8], options), "INX\nINY\n");
}

#[test]
fn test_listing_reassembles() {
    let source = "LDA #$01\nSTA $0200\nLDX $10,Y\nloop: DEX\nBPL loop\nBRK";
    let original = assemble(source).unwrap();

    let options = DisassemblyOptions {
        show_address: false,
        show_bytes: false,
        ..DisassemblyOptions::default()
    };
    let text = listing(&original.bytes, options);

    assert_eq!(assemble(&text).unwrap().bytes, original.bytes);
}

#[test]
fn test_hexdump_format() {
    let output = assemble("LDA #$01\nSTA $0200\nBRK").unwrap();
    assert_eq!(hexdump(&output.bytes, 0x0600), "0600: a901 8d00 0200\n");

    let odd = hexdump(&[0xA9, 0x01, 0xEA], 0x0600);
    assert_eq!(odd, "0600: a901 ea-- [END]\n");

    assert_eq!(hexdump(&[], 0x0600), "");
}
