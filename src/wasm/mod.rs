//! WebAssembly bindings for the assembler and interpreter.
//!
//! This module exposes a [`Session`](crate::Session) to JavaScript so a
//! browser page can supply source text, drive execution from a timer and
//! render the events it drains.

#[cfg(feature = "wasm")]
pub mod api;

#[cfg(feature = "wasm")]
pub use api::WasmSession;
