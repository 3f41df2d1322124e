//! End-to-end tests for the compile/run session.

use sim6502::{
    Event, ExecutionError, MemoryBus, MessageLevel, PixelChange, RunMode, Session,
    SessionConfig, SessionError, SessionState, StepOutcome,
};

fn session() -> Session {
    Session::new(SessionConfig {
        rng_seed: Some(42),
        ..SessionConfig::default()
    })
}

fn messages(events: &[Event]) -> Vec<(MessageLevel, String)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Message { level, text, .. } => Some((*level, text.clone())),
            _ => None,
        })
        .collect()
}

fn pixels(events: &[Event]) -> Vec<PixelChange> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::DisplayChanged(change) => Some(*change),
            _ => None,
        })
        .collect()
}

#[test]
fn test_compile_and_run_draws_pixel() {
    let mut session = session();

    let output = session.compile("LDA #$01\nSTA $0200\nBRK").unwrap();
    assert_eq!(output.bytes, vec![0xA9, 0x01, 0x8D, 0x00, 0x02, 0x00]);
    session.drain_events();

    session.start_continuous().unwrap();
    let outcome = session.run_batch(100).unwrap();

    assert_eq!(outcome, StepOutcome::Break { address: 0x0605 });
    assert_eq!(session.state(), SessionState::Halted);
    assert_eq!(session.cpu().a(), 0x01);

    let events = session.drain_events();
    assert_eq!(
        pixels(&events),
        vec![PixelChange {
            offset: 0,
            color: 1
        }]
    );
    assert!(messages(&events).contains(&(MessageLevel::Info, "Program end at PC=$0605".to_string())));
    assert!(matches!(events.last(), Some(Event::Registers(_))));
}

#[test]
fn test_compile_error_reports_line() {
    let mut session = session();
    let err = session.compile("LDA #$01\nLDA #$100").unwrap_err();

    assert!(matches!(err, SessionError::Assembly(_)));
    assert_eq!(session.state(), SessionState::Idle);

    let events = session.drain_events();
    let errors: Vec<&Event> = events
        .iter()
        .filter(|e| matches!(e, Event::Message { level: MessageLevel::Error, .. }))
        .collect();
    assert_eq!(
        errors,
        vec![&Event::Message {
            level: MessageLevel::Error,
            line: Some(2),
            text: "Syntax error line 2: LDA #$100".to_string(),
        }]
    );
    assert_eq!(session.start_continuous(), Err(SessionError::NotCompiled));
}

#[test]
fn test_empty_source_has_nothing_to_run() {
    let mut session = session();
    assert!(session.compile("; nothing").is_err());

    let text = messages(&session.drain_events());
    assert_eq!(
        text.last(),
        Some(&(MessageLevel::Error, "No code to run.".to_string()))
    );
}

#[test]
fn test_origin_outside_memory_message() {
    let mut session = session();
    assert!(session.compile("*=$10000").is_err());

    let text: Vec<String> = messages(&session.drain_events())
        .into_iter()
        .map(|(_, t)| t)
        .collect();
    assert!(text.contains(&"Unable to relocate code outside 64k memory".to_string()));
}

#[test]
fn test_recompile_is_deterministic() {
    let source = "start: LDX #$10\nloop: DEX\nBNE loop\nJMP start";
    let mut session = session();

    let first = session.compile(source).unwrap();
    let second = session.compile(source).unwrap();

    assert_eq!(first.bytes, second.bytes);
    assert_eq!(
        session.memory().slice(0x0600, first.bytes_emitted + 1),
        &[0xA2, 0x10, 0xCA, 0xD0, 0xFD, 0x4C, 0x00, 0x06, 0x00][..]
    );
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let source = r#"
        loop:
            LDA $FE
            AND #$03
            TAX
            LDA $FE
            STA $0200,X
            JMP loop
    "#;

    let trace = || {
        let mut session = session();
        session.compile(source).unwrap();
        session.start_continuous().unwrap();
        session.run_batch(60).unwrap();
        pixels(&session.drain_events())
    };

    let first = trace();
    assert_eq!(first.len(), 10);
    assert_eq!(first, trace());
}

#[test]
fn test_debug_stepping() {
    let mut session = session();
    session.compile("LDX #$01\nINX\nBRK").unwrap();
    session.drain_events();

    session.start_debug().unwrap();
    assert_eq!(session.state(), SessionState::Running(RunMode::Debug));

    assert_eq!(session.step(), Ok(StepOutcome::Continue));
    let events = session.drain_events();
    assert!(matches!(
        events.as_slice(),
        [Event::Registers(regs)] if regs.x == 0x01 && regs.pc == 0x0602
    ));

    session.step().unwrap();
    assert_eq!(session.step(), Ok(StepOutcome::Break { address: 0x0603 }));
    assert_eq!(session.state(), SessionState::Halted);
    assert_eq!(session.step(), Err(SessionError::Halted));
}

#[test]
fn test_stop_and_resume() {
    let mut session = session();
    session.compile("loop: INX\nJMP loop").unwrap();
    session.start_continuous().unwrap();

    assert_eq!(session.run_batch(10), Ok(StepOutcome::Continue));
    session.stop().unwrap();
    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(session.run_batch(10), Err(SessionError::NotRunning));

    session.start_continuous().unwrap();
    session.run_batch(10).unwrap();
    assert_eq!(session.cpu().x(), 10);
}

#[test]
fn test_fault_stops_session() {
    let mut session = session();
    session.compile("NOP\nDCB $02").unwrap();
    session.drain_events();
    session.start_continuous().unwrap();

    let err = session.run_batch(10).unwrap_err();
    assert_eq!(
        err,
        SessionError::Execution(ExecutionError::UnknownOpcode {
            address: 0x0601,
            opcode: 0x02
        })
    );
    assert_eq!(session.state(), SessionState::Faulted);

    let text = messages(&session.drain_events());
    assert_eq!(
        text,
        vec![(
            MessageLevel::Error,
            "Address $0601 - unknown opcode $02".to_string()
        )]
    );

    assert_eq!(session.start_continuous(), Err(SessionError::Faulted));
    session.reset().unwrap();
    assert_eq!(session.state(), SessionState::Ready);
}

#[test]
fn test_reset_clears_low_memory_and_keeps_program() {
    let mut session = session();
    session
        .compile("LDA #$05\nSTA $0210\nSTA $10\nPHA\nBRK")
        .unwrap();
    session.start_continuous().unwrap();
    session.run_batch(100).unwrap();
    assert_eq!(session.memory().read(0x0210), 0x05);

    session.drain_events();
    session.reset().unwrap();

    assert_eq!(session.cpu().pc(), 0x0600);
    assert_eq!(session.cpu().sp(), 0x0100);
    assert!(session.memory().slice(0x0000, 0x0600).iter().all(|b| *b == 0));
    assert_eq!(session.memory().slice(0x0600, 2), &[0xA9, 0x05][..]);

    let events = session.drain_events();
    assert_eq!(events.first(), Some(&Event::DisplayCleared));
    assert!(pixels(&events).is_empty());

    // Runs again from the top
    session.start_continuous().unwrap();
    assert!(session.run_batch(100).unwrap().is_halt());
}

#[test]
fn test_goto_label_and_hex() {
    let mut session = session();
    session
        .compile("LDX #$01\nBRK\nalt: LDX #$02\nBRK")
        .unwrap();

    session.goto("alt").unwrap();
    assert_eq!(session.cpu().pc(), 0x0603);

    session.goto("$0600").unwrap();
    assert_eq!(session.cpu().pc(), 0x0600);

    session.goto("0x0603").unwrap();
    session.start_continuous().unwrap();
    session.run_batch(10).unwrap();
    assert_eq!(session.cpu().x(), 0x02);

    assert!(matches!(
        session.goto("nowhere"),
        Err(SessionError::BadAddress(_))
    ));
}

#[test]
fn test_goto_rejected_during_continuous_run() {
    let mut session = session();
    session.compile("loop: JMP loop").unwrap();
    session.start_continuous().unwrap();
    assert_eq!(session.goto("$0600"), Err(SessionError::Busy));

    session.stop().unwrap();
    session.start_debug().unwrap();
    assert_eq!(session.goto("$0600"), Ok(()));
}

#[test]
fn test_hexdump_and_disassembly() {
    let mut session = session();
    session.compile("LDA #$01\nSTA $0200\nBRK").unwrap();

    assert_eq!(session.hexdump().unwrap(), "0600: a901 8d00 0200\n");
    assert_eq!(
        session.disassembly().unwrap(),
        "$0600  a9 01     LDA #$01\n$0602  8d 00 02  STA $0200\n$0605  00        BRK\n"
    );
}

#[test]
fn test_hexdump_follows_origin_directive() {
    let mut session = session();
    session.compile("*=$0800\nLDA #$01\nBRK").unwrap();

    assert_eq!(session.hexdump().unwrap(), "0800: a901 00-- [END]\n");
    assert_eq!(
        session.disassembly().unwrap(),
        "$0800  a9 01     LDA #$01\n$0802  00        BRK\n"
    );
}

#[test]
fn test_hexdump_one_block_per_origin() {
    let mut session = session();
    session.compile("JMP far\n*=$0700\nfar: BRK").unwrap();

    assert_eq!(
        session.hexdump().unwrap(),
        "0600: 4c00 07-- [END]\n0700: 00-- [END]\n"
    );
}

#[test]
fn test_random_byte_can_be_disabled() {
    let mut session = Session::new(SessionConfig {
        random_byte_address: None,
        ..SessionConfig::default()
    });
    session.compile("NOP\nNOP\nBRK").unwrap();
    session.start_continuous().unwrap();
    session.run_batch(10).unwrap();

    assert_eq!(session.memory().slice(0x00FE, 1), &[0x00][..]);
}

#[test]
fn test_key_press_visible_to_program() {
    let mut session = session();
    session.compile("LDA $FF\nBRK").unwrap();
    session.key_press(b'w');
    session.start_continuous().unwrap();
    session.run_batch(10).unwrap();

    assert_eq!(session.cpu().a(), b'w');
    assert!(session.labels().is_empty());
}
