//! # Session
//!
//! A session owns the memory image, the label table and the CPU, and drives
//! them through compile, run, step, stop and reset commands. Everything a
//! front end needs to show (messages, pixel updates, register dumps) is
//! queued as [`Event`]s and collected with [`Session::drain_events`].
//!
//! ## States
//!
//! ```text
//!  Idle --compile ok--> Ready --start_*--> Running(mode) --stop--> Ready
//!                                             |
//!                               BRK/PC=0 -> Halted, fault -> Faulted
//! ```
//!
//! `reset` returns any compiled session to `Ready`; `compile` is accepted in
//! every state except `Running`.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::assembler::{
    Assembler, AssemblerError, AssemblerOutput, ErrorType, LabelTable, Segment,
};
use crate::cpu::{RegisterSnapshot, StepOutcome, CPU, DEFAULT_ORIGIN};
use crate::disassembler::{self, DisassemblyOptions};
use crate::memory::{MemoryBus, MemoryImage, PixelChange};
use crate::ExecutionError;

/// Session settings.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Address code is assembled at and PC starts from
    pub origin: u16,

    /// Instructions per [`Session::run`] call
    pub steps_per_batch: usize,

    /// Where a fresh random byte is stored before every instruction
    pub random_byte_address: Option<u16>,

    /// Where [`Session::key_press`] stores the key code
    pub key_address: u16,

    /// Seed for the random byte generator; `None` seeds from entropy
    pub rng_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN,
            steps_per_batch: 200,
            random_byte_address: Some(0x00FE),
            key_address: 0x00FF,
            rng_seed: None,
        }
    }
}

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Error,
}

/// Output for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A diagnostic line, optionally tied to a 1-indexed source line
    Message {
        level: MessageLevel,
        line: Option<usize>,
        text: String,
    },

    /// One display pixel changed
    DisplayChanged(PixelChange),

    /// Every display pixel went back to colour 0
    DisplayCleared,

    /// Register dump after a step or a batch
    Registers(RegisterSnapshot),
}

/// How a running program is advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Driven by [`Session::run_batch`]
    Continuous,

    /// Driven by [`Session::step`]
    Debug,
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing compiled, or the last compile failed
    Idle,

    /// Compiled and stopped; can be started
    Ready,

    /// Executing in the given mode
    Running(RunMode),

    /// Stopped by BRK or PC reaching 0x0000
    Halted,

    /// Stopped by an execution fault
    Faulted,
}

/// Address text that is neither hex nor a known label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    #[error("no address given")]
    Empty,

    #[error("Unable to find/parse given address/label: {0}")]
    Unrecognized(String),
}

/// A command the session refused, or a failure while carrying it out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no program has been compiled")]
    NotCompiled,

    #[error("a program is running")]
    Busy,

    #[error("no program is running")]
    NotRunning,

    #[error("command not available in {0:?} mode")]
    WrongMode(RunMode),

    #[error("program has ended; reset or recompile to run it again")]
    Halted,

    #[error("program faulted; reset or recompile to run it again")]
    Faulted,

    #[error(transparent)]
    Assembly(#[from] AssemblerError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    BadAddress(#[from] AddressParseError),
}

/// Resolve address text: `$hhhh`, `0xhhhh` (1-4 hex digits) or a label.
///
/// Labels are looked up first.
///
/// # Examples
///
/// ```
/// use sim6502::{parse_address, LabelTable};
///
/// let mut labels = LabelTable::new();
/// labels.add_label("loop", 0x0604, 3).unwrap();
///
/// assert_eq!(parse_address("$0610", &labels), Ok(0x0610));
/// assert_eq!(parse_address("0x6ff", &labels), Ok(0x06FF));
/// assert_eq!(parse_address("loop", &labels), Ok(0x0604));
/// assert!(parse_address("nowhere", &labels).is_err());
/// ```
pub fn parse_address(text: &str, labels: &LabelTable) -> Result<u16, AddressParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AddressParseError::Empty);
    }

    if let Some(address) = labels.address_of(text) {
        return Ok(address);
    }

    let digits = text
        .strip_prefix('$')
        .or_else(|| text.strip_prefix("0x"))
        .or_else(|| text.strip_prefix("0X"));

    match digits {
        Some(hex)
            if (1..=4).contains(&hex.len()) && hex.chars().all(|c| c.is_ascii_hexdigit()) =>
        {
            u16::from_str_radix(hex, 16)
                .map_err(|_| AddressParseError::Unrecognized(text.to_string()))
        }
        _ => Err(AddressParseError::Unrecognized(text.to_string())),
    }
}

/// Compile/run driver for one program.
///
/// # Examples
///
/// ```
/// use sim6502::{Event, Session, SessionConfig, StepOutcome};
///
/// let mut session = Session::new(SessionConfig::default());
/// session.compile("LDX #$05\nloop: DEX\nBNE loop\nBRK").unwrap();
///
/// session.start_debug().unwrap();
/// session.step().unwrap();
/// assert_eq!(session.cpu().x(), 0x05);
///
/// let events = session.drain_events();
/// assert!(matches!(events.last(), Some(Event::Registers(_))));
/// ```
pub struct Session {
    config: SessionConfig,
    cpu: CPU<MemoryImage>,
    labels: LabelTable,
    /// Where the last successful compile placed its bytes
    program: Option<Vec<Segment>>,
    state: SessionState,
    events: Vec<Event>,
    rng: StdRng,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            cpu: CPU::with_origin(MemoryImage::new(), config.origin),
            labels: LabelTable::new(),
            program: None,
            state: SessionState::Idle,
            events: Vec::new(),
            rng,
        }
    }

    // ========== Accessors ==========

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cpu(&self) -> &CPU<MemoryImage> {
        &self.cpu
    }

    pub fn memory(&self) -> &MemoryImage {
        self.cpu.memory()
    }

    /// Labels of the last successful compile.
    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Removes and returns every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ========== Compilation ==========

    /// Assemble `source` into a freshly cleared memory image.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] while a program is running (nothing changes),
    /// or [`SessionError::Assembly`] when the source does not assemble; the
    /// session is then `Idle`.
    pub fn compile(&mut self, source: &str) -> Result<AssemblerOutput, SessionError> {
        if let SessionState::Running(_) = self.state {
            return Err(SessionError::Busy);
        }

        self.state = SessionState::Idle;
        self.program = None;
        self.labels.clear();
        self.cpu.memory_mut().clear();
        self.cpu.reset();
        self.events.push(Event::DisplayCleared);

        self.info("Indexing labels..");
        let mut assembler = Assembler::new(self.config.origin);
        let count = match assembler.index_labels(source) {
            Ok(count) => count,
            Err(err) => return Err(self.compile_failed(err)),
        };
        self.info(format!(
            "Found {} label{}.",
            count,
            if count == 1 { "" } else { "s" }
        ));

        self.info("Compiling code..");
        let result = assembler.emit(source, self.cpu.memory_mut());
        self.push_pixel_changes();

        let output = match result {
            Ok(output) => output,
            Err(err) => return Err(self.compile_failed(err)),
        };

        self.labels = output.labels.clone();
        self.program = Some(output.segments.clone());
        self.state = SessionState::Ready;
        self.info(format!(
            "Code compiled successfully, {} bytes.",
            output.bytes_emitted
        ));
        self.push_registers();

        Ok(output)
    }

    fn compile_failed(&mut self, err: AssemblerError) -> SessionError {
        warn!("compile failed: {} ({})", err, err.message);
        if err.error_type == ErrorType::InvalidDirective {
            self.error(err.line, err.message.clone());
        }
        self.error(err.line, err.to_string());
        SessionError::Assembly(err)
    }

    // ========== Run Control ==========

    /// Start continuous execution; drive it with [`Session::run_batch`].
    pub fn start_continuous(&mut self) -> Result<(), SessionError> {
        self.start(RunMode::Continuous)
    }

    /// Start single-step execution; drive it with [`Session::step`].
    pub fn start_debug(&mut self) -> Result<(), SessionError> {
        self.start(RunMode::Debug)
    }

    fn start(&mut self, mode: RunMode) -> Result<(), SessionError> {
        match self.state {
            SessionState::Ready => {
                info!("running from ${:04x} in {:?} mode", self.cpu.pc(), mode);
                self.state = SessionState::Running(mode);
                Ok(())
            }
            SessionState::Running(_) => Err(SessionError::Busy),
            SessionState::Idle => Err(SessionError::NotCompiled),
            SessionState::Halted => Err(SessionError::Halted),
            SessionState::Faulted => Err(SessionError::Faulted),
        }
    }

    /// Stop a running program before its next fetch. It can be started again
    /// from where it stopped.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Running(_) => {
                self.state = SessionState::Ready;
                Ok(())
            }
            _ => Err(SessionError::NotRunning),
        }
    }

    /// Run one batch of [`SessionConfig::steps_per_batch`] instructions.
    pub fn run(&mut self) -> Result<StepOutcome, SessionError> {
        self.run_batch(self.config.steps_per_batch)
    }

    /// Execute up to `budget` instructions in continuous mode.
    ///
    /// Returns `StepOutcome::Continue` if the budget ran out with the program
    /// still running. A register event is queued after the batch.
    ///
    /// # Errors
    ///
    /// Refused unless running in continuous mode. An execution fault is
    /// returned as [`SessionError::Execution`] and leaves the session
    /// `Faulted`.
    pub fn run_batch(&mut self, budget: usize) -> Result<StepOutcome, SessionError> {
        self.require_mode(RunMode::Continuous)?;

        let mut outcome = StepOutcome::Continue;
        for _ in 0..budget {
            outcome = self.execute_one()?;
            if outcome.is_halt() {
                break;
            }
        }

        self.push_registers();
        Ok(outcome)
    }

    /// Execute one instruction in debug mode and queue a register event.
    pub fn step(&mut self) -> Result<StepOutcome, SessionError> {
        self.require_mode(RunMode::Debug)?;
        let outcome = self.execute_one()?;
        self.push_registers();
        Ok(outcome)
    }

    fn require_mode(&self, mode: RunMode) -> Result<(), SessionError> {
        match self.state {
            SessionState::Running(current) if current == mode => Ok(()),
            SessionState::Running(current) => Err(SessionError::WrongMode(current)),
            SessionState::Ready => Err(SessionError::NotRunning),
            SessionState::Idle => Err(SessionError::NotCompiled),
            SessionState::Halted => Err(SessionError::Halted),
            SessionState::Faulted => Err(SessionError::Faulted),
        }
    }

    /// Store a random byte, execute one instruction, and queue its display
    /// changes. Halts and faults update the state and message queue.
    fn execute_one(&mut self) -> Result<StepOutcome, SessionError> {
        if let Some(address) = self.config.random_byte_address {
            let value: u8 = self.rng.gen();
            self.cpu.memory_mut().write(address, value);
        }

        let result = self.cpu.step();
        self.push_pixel_changes();

        match result {
            Ok(outcome) => {
                if let StepOutcome::Break { address } | StepOutcome::ProgramEnd { address } =
                    outcome
                {
                    info!("program end at ${:04x}", address);
                    self.state = SessionState::Halted;
                    self.info(format!("Program end at PC=${:04x}", address));
                }
                Ok(outcome)
            }
            Err(fault) => {
                warn!("{}", fault);
                self.state = SessionState::Faulted;
                self.error(None, fault.to_string());
                self.push_registers();
                Err(fault.into())
            }
        }
    }

    // ========== Debugger Commands ==========

    /// Clear zero page, stack and display (everything below the origin) and
    /// the registers. The compiled program stays loaded.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.program.is_none() {
            return Err(SessionError::NotCompiled);
        }

        let origin = self.config.origin;
        self.cpu.memory_mut().clear_range(0..origin);
        self.cpu.reset();
        self.state = SessionState::Ready;

        self.events.push(Event::DisplayCleared);
        let lit = self
            .cpu
            .memory()
            .display_pixels()
            .into_iter()
            .enumerate()
            .filter(|(_, color)| *color != 0)
            .map(|(offset, color)| {
                Event::DisplayChanged(PixelChange {
                    offset: offset as u16,
                    color,
                })
            })
            .collect::<Vec<_>>();
        self.events.extend(lit);
        self.push_registers();

        debug!("reset, origin ${:04x}", origin);
        Ok(())
    }

    /// Set the program counter.
    pub fn set_pc(&mut self, address: u16) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle => return Err(SessionError::NotCompiled),
            SessionState::Running(RunMode::Continuous) => return Err(SessionError::Busy),
            _ => {}
        }

        self.cpu.set_pc(address);
        self.push_registers();
        Ok(())
    }

    /// Set the program counter from address text; see [`parse_address`].
    pub fn goto(&mut self, text: &str) -> Result<(), SessionError> {
        let address = parse_address(text, &self.labels)?;
        self.set_pc(address)
    }

    /// Store a key code where programs poll for input.
    pub fn key_press(&mut self, code: u8) {
        let address = self.config.key_address;
        self.cpu.memory_mut().write(address, code);
    }

    /// Hex dump of the compiled program, or `None` before a compile.
    pub fn hexdump(&self) -> Option<String> {
        let segments = self.program.as_ref()?;
        Some(
            segments
                .iter()
                .map(|segment| {
                    let bytes = self.cpu.memory().slice(segment.start, segment.len);
                    disassembler::hexdump(bytes, segment.start)
                })
                .collect(),
        )
    }

    /// Disassembly listing of the compiled program, or `None` before a
    /// compile.
    pub fn disassembly(&self) -> Option<String> {
        let segments = self.program.as_ref()?;
        Some(
            segments
                .iter()
                .map(|segment| {
                    let bytes = self.cpu.memory().slice(segment.start, segment.len);
                    let options = DisassemblyOptions {
                        start_address: segment.start,
                        ..DisassemblyOptions::default()
                    };
                    disassembler::listing(bytes, options)
                })
                .collect(),
        )
    }

    // ========== Event Queue ==========

    fn info(&mut self, text: impl Into<String>) {
        self.events.push(Event::Message {
            level: MessageLevel::Info,
            line: None,
            text: text.into(),
        });
    }

    fn error(&mut self, line: Option<usize>, text: String) {
        self.events.push(Event::Message {
            level: MessageLevel::Error,
            line,
            text,
        });
    }

    fn push_pixel_changes(&mut self) {
        let changes = self.cpu.memory_mut().take_pixel_changes();
        self.events
            .extend(changes.into_iter().map(Event::DisplayChanged));
    }

    fn push_registers(&mut self) {
        self.events.push(Event::Registers(self.cpu.snapshot()));
    }
}
