//! WASM API for a compile/run session.
//!
//! Events are returned as plain JavaScript objects with a `kind` field of
//! `"message"`, `"pixel"`, `"clear"` or `"registers"`.

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;

use crate::palette::css_color;
use crate::{Event, MessageLevel, Session, SessionConfig, SessionError, SessionState};

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

impl From<SessionError> for JsError {
    fn from(err: SessionError) -> Self {
        JsError::new(&err.to_string())
    }
}

/// Main session interface for JavaScript
#[wasm_bindgen]
pub struct WasmSession {
    session: Session,
}

#[wasm_bindgen]
impl WasmSession {
    /// Create a session with the default origin and random-byte settings
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        WasmSession {
            session: Session::new(SessionConfig::default()),
        }
    }

    /// Compile source text. Returns the number of bytes emitted.
    pub fn compile(&mut self, source: &str) -> Result<usize, JsError> {
        Ok(self.session.compile(source)?.bytes_emitted)
    }

    pub fn start_continuous(&mut self) -> Result<(), JsError> {
        Ok(self.session.start_continuous()?)
    }

    pub fn start_debug(&mut self) -> Result<(), JsError> {
        Ok(self.session.start_debug()?)
    }

    /// Run up to `budget` instructions. Returns true once the program halted.
    pub fn run_batch(&mut self, budget: u32) -> Result<bool, JsError> {
        let outcome = self.session.run_batch(budget as usize)?;
        Ok(outcome.is_halt())
    }

    /// Execute one instruction. Returns true once the program halted.
    pub fn step(&mut self) -> Result<bool, JsError> {
        let outcome = self.session.step()?;
        Ok(outcome.is_halt())
    }

    pub fn stop(&mut self) -> Result<(), JsError> {
        Ok(self.session.stop()?)
    }

    pub fn reset(&mut self) -> Result<(), JsError> {
        Ok(self.session.reset()?)
    }

    /// Set PC from `$hhhh`, `0xhhhh` or a label name
    pub fn goto(&mut self, text: &str) -> Result<(), JsError> {
        Ok(self.session.goto(text)?)
    }

    pub fn key_press(&mut self, code: u8) {
        self.session.key_press(code);
    }

    /// Whether the session is currently executing
    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        matches!(self.session.state(), SessionState::Running(_))
    }

    /// Hex dump of the compiled program
    pub fn hexdump(&self) -> Option<String> {
        self.session.hexdump()
    }

    /// Disassembly of the compiled program
    pub fn disassembly(&self) -> Option<String> {
        self.session.disassembly()
    }

    /// Whole display as palette indices, row by row
    pub fn display(&self) -> Vec<u8> {
        self.session.memory().display_pixels()
    }

    /// Drain queued events as an array of plain objects
    pub fn drain_events(&mut self) -> Result<Array, JsValue> {
        let array = Array::new();
        for event in self.session.drain_events() {
            array.push(&event_to_object(&event)?);
        }
        Ok(array)
    }
}

impl Default for WasmSession {
    fn default() -> Self {
        Self::new()
    }
}

fn set(object: &Object, key: &str, value: JsValue) -> Result<(), JsValue> {
    Reflect::set(object, &JsValue::from_str(key), &value).map(|_| ())
}

fn event_to_object(event: &Event) -> Result<Object, JsValue> {
    let object = Object::new();

    match event {
        Event::Message { level, line, text } => {
            set(&object, "kind", "message".into())?;
            let level = match level {
                MessageLevel::Info => "info",
                MessageLevel::Error => "error",
            };
            set(&object, "level", level.into())?;
            set(
                &object,
                "line",
                line.map_or(JsValue::NULL, |l| JsValue::from(l as u32)),
            )?;
            set(&object, "text", text.as_str().into())?;
        }
        Event::DisplayChanged(change) => {
            set(&object, "kind", "pixel".into())?;
            set(&object, "x", (change.x() as u32).into())?;
            set(&object, "y", (change.y() as u32).into())?;
            set(&object, "color", change.color.into())?;
            set(&object, "css", css_color(change.color).into())?;
        }
        Event::DisplayCleared => {
            set(&object, "kind", "clear".into())?;
        }
        Event::Registers(regs) => {
            set(&object, "kind", "registers".into())?;
            set(&object, "a", regs.a.into())?;
            set(&object, "x", regs.x.into())?;
            set(&object, "y", regs.y.into())?;
            set(&object, "p", regs.p.into())?;
            set(&object, "sp", regs.sp.into())?;
            set(&object, "pc", regs.pc.into())?;
            set(&object, "text", regs.to_string().into())?;
        }
    }

    Ok(object)
}
