//! 6502 Assembler Module
//!
//! Converts assembly language source code into machine code in two passes:
//!
//! 1. **Label pre-pass** ([`Assembler::index_labels`]): walks every line,
//!    records `label:` definitions at the current write cursor and sizes
//!    each statement to advance the cursor. No bytes are written.
//! 2. **Committing pass** ([`Assembler::emit`]): encodes every line again
//!    with the complete label table and writes the bytes to memory,
//!    stopping at the first line that fails.
//!
//! # Source syntax
//!
//! ```text
//! ; comments run to the end of the line
//! *=$0600           ; origin directive ($hex or decimal)
//! start:  LDX #$00  ; labels end with a colon
//! loop:   STA $0200,X
//!         INX
//!         BNE loop
//!         DCB $01, 2, $03
//! ```

pub mod encoder;
pub mod label_table;
pub mod parser;

use log::{debug, info};

use crate::assembler::encoder::{encode_instruction, EncodeError, Pass};
use crate::assembler::parser::{
    parse_byte, parse_line, parse_origin, split_label, strip_comment, Statement,
};
use crate::cpu::DEFAULT_ORIGIN;
use crate::memory::{MemoryBus, MemoryImage};
use crate::opcodes::Mnemonic;

pub use label_table::{Label, LabelTable};

/// Complete output from assembling source code
#[derive(Debug, Clone)]
pub struct AssemblerOutput {
    /// Assembled bytes in emission order
    pub bytes: Vec<u8>,

    /// Number of bytes emitted (the terminator is not counted)
    pub bytes_emitted: usize,

    /// Every label defined by the source
    pub labels: LabelTable,

    /// Address of the first emitted byte
    pub start_address: u16,

    /// Contiguous runs of emitted bytes, in emission order
    pub segments: Vec<Segment>,

    /// Write cursor after the last line; the zero terminator lives here
    pub end_address: u16,
}

/// A contiguous run of emitted bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: u16,
    pub len: usize,
}

impl Segment {
    fn ends_at(&self, address: u16) -> bool {
        self.start as usize + self.len == address as usize
    }
}

/// An error encountered during assembly
///
/// Displays as the message shown to the user, e.g.
/// `Syntax error line 3: LDA #$100`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", report(.error_type, .line, .text))]
pub struct AssemblerError {
    /// Error type classification
    pub error_type: ErrorType,

    /// Line number where the error occurred (1-indexed), if any
    pub line: Option<usize>,

    /// The offending source line as written
    pub text: String,

    /// Detailed description of the problem
    pub message: String,
}

/// Classification of assembly errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    /// Syntax error (malformed mnemonic or directive)
    SyntaxError,

    /// Undefined label reference
    UndefinedLabel,

    /// Duplicate label definition
    DuplicateLabel,

    /// Invalid mnemonic (not a recognized instruction)
    InvalidMnemonic,

    /// No addressing mode of the mnemonic accepts the operand
    InvalidOperand,

    /// Branch target too far away
    RangeError,

    /// Origin outside 64K or malformed `DCB` item
    InvalidDirective,

    /// The source assembled to zero bytes
    NothingToRun,
}

fn report(error_type: &ErrorType, line: &Option<usize>, text: &str) -> String {
    match (error_type, line) {
        (ErrorType::NothingToRun, _) => "No code to run.".to_string(),
        (ErrorType::DuplicateLabel, Some(line)) => {
            format!("Label already defined at line {}: {}", line, text)
        }
        (_, Some(line)) => format!("Syntax error line {}: {}", line, text),
        (_, None) => format!("Syntax error: {}", text),
    }
}

impl AssemblerError {
    fn at_line(error_type: ErrorType, line: usize, text: &str, message: String) -> Self {
        Self {
            error_type,
            line: Some(line),
            text: text.to_string(),
            message,
        }
    }
}

/// A line-level failure before it is tied to a line number.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LineError {
    error_type: ErrorType,
    message: String,
}

impl LineError {
    fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
        }
    }
}

impl From<EncodeError> for LineError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::NoMatchingMode => {
                LineError::new(ErrorType::InvalidOperand, "unknown opcode/operand combination")
            }
            EncodeError::UndefinedLabel(name) => {
                LineError::new(ErrorType::UndefinedLabel, format!("undefined label '{}'", name))
            }
            EncodeError::BranchOutOfRange(distance) => LineError::new(
                ErrorType::RangeError,
                format!("branch distance {} out of range -128..127", distance),
            ),
        }
    }
}

/// Two-pass assembler writing into any [`MemoryBus`].
///
/// # Examples
///
/// ```
/// use sim6502::{Assembler, MemoryBus, MemoryImage};
///
/// let mut memory = MemoryImage::new();
/// let mut assembler = Assembler::new(0x0600);
/// let output = assembler.compile("loop: JMP loop", &mut memory).unwrap();
///
/// assert_eq!(output.bytes, vec![0x4C, 0x00, 0x06]);
/// assert_eq!(memory.read(0x0601), 0x00);
/// assert_eq!(memory.read(0x0603), 0x00); // terminator
/// ```
#[derive(Debug, Clone)]
pub struct Assembler {
    origin: u16,
    labels: LabelTable,
}

impl Assembler {
    /// Create an assembler whose write cursor starts at `origin`
    pub fn new(origin: u16) -> Self {
        Self {
            origin,
            labels: LabelTable::new(),
        }
    }

    /// Labels found by the last pre-pass
    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Run both passes.
    pub fn compile<M: MemoryBus>(
        &mut self,
        source: &str,
        memory: &mut M,
    ) -> Result<AssemblerOutput, AssemblerError> {
        self.index_labels(source)?;
        self.emit(source, memory)
    }

    /// Label pre-pass. Returns the number of labels found.
    ///
    /// Lines that fail to encode are sized as zero bytes here; the committing
    /// pass reports them.
    ///
    /// # Errors
    ///
    /// [`ErrorType::DuplicateLabel`] for the first redefinition.
    pub fn index_labels(&mut self, source: &str) -> Result<usize, AssemblerError> {
        self.labels.clear();
        let mut cursor = self.origin;

        for (index, line) in source.lines().enumerate() {
            let address = cursor;
            if let Ok(parsed) = parse_line(line) {
                let _ = self.process(&parsed.statement, &mut cursor, Pass::Sizing, &mut |_, _| {});
            }

            // Recorded even when the statement is malformed
            if let (Some(name), _) = split_label(strip_comment(line)) {
                if let Err(existing) = self.labels.add_label(name, address, index + 1) {
                    return Err(AssemblerError::at_line(
                        ErrorType::DuplicateLabel,
                        index + 1,
                        line,
                        format!(
                            "label '{}' already defined at line {}",
                            name, existing.defined_at
                        ),
                    ));
                }
            }
        }

        debug!("indexed {} label(s)", self.labels.len());
        Ok(self.labels.len())
    }

    /// Committing pass using the labels from [`Assembler::index_labels`].
    ///
    /// Writes a zero terminator after the last emitted byte.
    ///
    /// # Errors
    ///
    /// Stops at the first failing line. A source that emits nothing fails
    /// with [`ErrorType::NothingToRun`].
    pub fn emit<M: MemoryBus>(
        &self,
        source: &str,
        memory: &mut M,
    ) -> Result<AssemblerOutput, AssemblerError> {
        let mut cursor = self.origin;
        let mut bytes = Vec::new();
        let mut segments: Vec<Segment> = Vec::new();

        for (index, line) in source.lines().enumerate() {
            let start = bytes.len();
            let address = cursor;

            let parsed = parse_line(line).map_err(|message| {
                AssemblerError::at_line(ErrorType::SyntaxError, index + 1, line, message)
            })?;

            self.process(&parsed.statement, &mut cursor, Pass::Commit, &mut |addr, value| {
                memory.write(addr, value);
                bytes.push(value);
                match segments.last_mut() {
                    Some(segment) if segment.ends_at(addr) => segment.len += 1,
                    _ => segments.push(Segment { start: addr, len: 1 }),
                }
            })
            .map_err(|err| AssemblerError::at_line(err.error_type, index + 1, line, err.message))?;

            if bytes.len() > start {
                debug!("{:>4} ${:04x}: {:02x?}", index + 1, address, &bytes[start..]);
            }
        }

        if bytes.is_empty() {
            return Err(AssemblerError {
                error_type: ErrorType::NothingToRun,
                line: None,
                text: String::new(),
                message: "no code to run".to_string(),
            });
        }

        memory.write(cursor, 0x00);
        info!("assembled {} bytes", bytes.len());

        Ok(AssemblerOutput {
            bytes_emitted: bytes.len(),
            bytes,
            labels: self.labels.clone(),
            start_address: segments.first().map_or(self.origin, |segment| segment.start),
            segments,
            end_address: cursor,
        })
    }

    /// Handle one statement, passing each byte to `sink` and advancing the
    /// cursor past it.
    fn process(
        &self,
        statement: &Statement<'_>,
        cursor: &mut u16,
        pass: Pass,
        sink: &mut dyn FnMut(u16, u8),
    ) -> Result<(), LineError> {
        let mut emit = |values: &[u8], cursor: &mut u16| -> Result<(), LineError> {
            // The cursor must stay addressable for the terminator
            if *cursor as usize + values.len() > u16::MAX as usize {
                return Err(LineError::new(
                    ErrorType::InvalidDirective,
                    "Unable to write code outside 64k memory",
                ));
            }
            for &value in values {
                sink(*cursor, value);
                *cursor += 1;
            }
            Ok(())
        };

        match statement {
            Statement::Empty => Ok(()),
            Statement::Origin(text) => {
                let value = parse_origin(text).ok_or_else(|| {
                    LineError::new(ErrorType::SyntaxError, format!("malformed origin '{}'", text))
                })?;
                *cursor = u16::try_from(value).map_err(|_| {
                    LineError::new(
                        ErrorType::InvalidDirective,
                        "Unable to relocate code outside 64k memory",
                    )
                })?;
                Ok(())
            }
            Statement::Instruction { mnemonic, operand } => {
                if mnemonic.eq_ignore_ascii_case("DCB") {
                    let values = parse_dcb(operand)?;
                    return emit(&values, cursor);
                }

                let mnemonic = Mnemonic::from_name(mnemonic).ok_or_else(|| {
                    LineError::new(
                        ErrorType::InvalidMnemonic,
                        format!("unknown mnemonic '{}'", mnemonic),
                    )
                })?;
                let encoded = encode_instruction(mnemonic, operand, *cursor, &self.labels, pass)?;
                emit(&encoded, cursor)
            }
        }
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGIN)
    }
}

/// Parse the comma-separated byte list of a `DCB` directive.
fn parse_dcb(operand: &str) -> Result<Vec<u8>, LineError> {
    if operand.is_empty() {
        return Err(LineError::new(ErrorType::InvalidDirective, "DCB without values"));
    }

    operand
        .split(',')
        .filter(|item| !item.is_empty())
        .map(|item| {
            parse_byte(item).ok_or_else(|| {
                LineError::new(
                    ErrorType::InvalidDirective,
                    format!("malformed DCB value '{}'", item),
                )
            })
        })
        .collect()
}

/// Assemble `source` at [`DEFAULT_ORIGIN`] into a scratch memory image.
///
/// # Examples
///
/// ```
/// use sim6502::assemble;
///
/// let output = assemble("LDA #$01\nSTA $0200\nBRK").unwrap();
/// assert_eq!(output.bytes, vec![0xA9, 0x01, 0x8D, 0x00, 0x02, 0x00]);
/// assert_eq!(output.end_address, 0x0606);
/// ```
pub fn assemble(source: &str) -> Result<AssemblerOutput, AssemblerError> {
    let mut memory = MemoryImage::new();
    Assembler::default().compile(source, &mut memory)
}
