//! Runs the sample programs under demos/ through a session.

use sim6502::{Session, SessionConfig, StepOutcome};

const COLORS: &str = include_str!("../demos/colors.asm");
const RANDOM_PIXELS: &str = include_str!("../demos/random_pixels.asm");
const SUBROUTINES: &str = include_str!("../demos/subroutines.asm");

fn session() -> Session {
    Session::new(SessionConfig {
        rng_seed: Some(1),
        ..SessionConfig::default()
    })
}

/// Run to completion and return the outcome
fn run_to_end(source: &str) -> (Session, StepOutcome) {
    let mut session = session();
    session.compile(source).unwrap();
    session.start_continuous().unwrap();

    for _ in 0..100 {
        let outcome = session.run().unwrap();
        if outcome.is_halt() {
            return (session, outcome);
        }
    }
    panic!("program did not halt");
}

#[test]
fn test_colors_fills_display() {
    let (session, outcome) = run_to_end(COLORS);
    assert!(matches!(outcome, StepOutcome::Break { .. }));

    let pixels = session.memory().display_pixels();
    for (offset, color) in pixels.iter().enumerate() {
        assert_eq!(*color, ((offset % 256) / 2) as u8 & 0x0F, "offset {}", offset);
    }
}

#[test]
fn test_subroutines_draw_diagonal() {
    let (session, outcome) = run_to_end(SUBROUTINES);
    assert!(matches!(outcome, StepOutcome::ProgramEnd { .. }));
    assert_eq!(session.cpu().pc(), 0x0000);

    let pixels = session.memory().display_pixels();
    for i in 0..8usize {
        assert_eq!(pixels[i * 33], i as u8 + 1);
    }
    assert_eq!(pixels.iter().filter(|c| **c != 0).count(), 8);
}

#[test]
fn test_random_pixels_keeps_running() {
    let mut session = session();
    session.compile(RANDOM_PIXELS).unwrap();
    session.start_continuous().unwrap();

    for _ in 0..20 {
        assert_eq!(session.run(), Ok(StepOutcome::Continue));
    }

    let lit = session.memory().display_pixels()[..256]
        .iter()
        .filter(|c| **c != 0)
        .count();
    assert!(lit > 0);
}
