use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, LevelFilter};
use simple_logger::SimpleLogger;

use sim6502::memory::DISPLAY_SIDE;
use sim6502::{Event, MessageLevel, Session, SessionConfig, SessionError, StepOutcome};

/// Assemble a 6502 source file and run it on the interpreter.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Assembly source file
    path: PathBuf,

    /// Give up after this many instructions
    #[arg(long, default_value_t = 1_000_000)]
    max_steps: usize,

    /// Print a hex dump of the assembled program
    #[arg(long)]
    hexdump: bool,

    /// Print a disassembly of the assembled program
    #[arg(long)]
    disassemble: bool,

    /// Only assemble, do not run
    #[arg(long)]
    no_run: bool,

    /// Print the 32x32 display as palette indices when the program stops
    #[arg(long)]
    display: bool,

    /// Seed for the random byte at $FE
    #[arg(long)]
    seed: Option<u64>,

    /// Do not store a random byte at $FE before each instruction
    #[arg(long)]
    no_random: bool,

    /// Increase logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(err) = SimpleLogger::new().with_level(level).init() {
        eprintln!("logger: {err}");
    }

    let source = match fs::read_to_string(&args.path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: {err}", args.path.display());
            return ExitCode::from(2);
        }
    };

    let config = SessionConfig {
        rng_seed: args.seed,
        random_byte_address: if args.no_random {
            None
        } else {
            SessionConfig::default().random_byte_address
        },
        ..SessionConfig::default()
    };
    let mut session = Session::new(config);

    let compiled = session.compile(&source);
    print_messages(&mut session);
    if compiled.is_err() {
        return ExitCode::FAILURE;
    }

    if args.hexdump {
        if let Some(dump) = session.hexdump() {
            print!("{dump}");
        }
    }
    if args.disassemble {
        if let Some(listing) = session.disassembly() {
            print!("{listing}");
        }
    }
    if args.no_run {
        return ExitCode::SUCCESS;
    }

    let code = match run(&mut session, args.max_steps) {
        Ok(StepOutcome::Continue) => {
            eprintln!("Stopped after {} instructions", args.max_steps);
            ExitCode::from(3)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    };

    print_messages(&mut session);
    println!("{}", session.cpu().snapshot());
    if args.display {
        print_display(&session);
    }

    code
}

fn run(session: &mut Session, max_steps: usize) -> Result<StepOutcome, SessionError> {
    session.start_continuous()?;

    let batch = session.config().steps_per_batch.max(1);
    let mut remaining = max_steps;
    while remaining > 0 {
        let budget = batch.min(remaining);
        let outcome = session.run_batch(budget)?;
        if outcome.is_halt() {
            return Ok(outcome);
        }
        remaining -= budget;

        // Only messages are shown; pixel and register events are dropped
        print_messages(session);
    }

    debug!("instruction budget exhausted at ${:04x}", session.cpu().pc());
    Ok(StepOutcome::Continue)
}

fn print_messages(session: &mut Session) {
    for event in session.drain_events() {
        if let Event::Message { level, text, .. } = event {
            match level {
                MessageLevel::Info => println!("{text}"),
                MessageLevel::Error => eprintln!("{text}"),
            }
        }
    }
}

fn print_display(session: &Session) {
    let pixels = session.memory().display_pixels();
    for row in pixels.chunks(DISPLAY_SIDE) {
        let line: String = row.iter().map(|color| format!("{:x}", color & 0x0F)).collect();
        println!("{line}");
    }
}
