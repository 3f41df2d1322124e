//! # Memory Image
//!
//! This module provides the `MemoryBus` trait that decouples the CPU and the
//! assembler from a specific memory implementation, and `MemoryImage`, the flat
//! 64KB memory used by a session.
//!
//! ## Display Window
//!
//! Addresses `0x0200..=0x05FF` form a 32x32 pixel display. Every write into
//! that window is recorded as a [`PixelChange`] holding the offset within the
//! window and the palette index (`value & 0x0F`). Callers drain the recorded
//! changes with [`MemoryImage::take_pixel_changes`].

use std::ops::RangeInclusive;

/// First address of the display window.
pub const DISPLAY_START: u16 = 0x0200;

/// Last address of the display window.
pub const DISPLAY_END: u16 = 0x05FF;

/// Width and height of the display in pixels.
pub const DISPLAY_SIDE: usize = 32;

/// Memory bus trait for the CPU and the assembler to read/write bytes.
///
/// # Design
///
/// - `read(&self)`: Immutable reference allows shared reads
/// - `write(&mut self)`: Mutable reference makes side effects explicit
/// - No error types: the 6502 has no bus error mechanism
///
/// # Examples
///
/// ```
/// use sim6502::{MemoryBus, MemoryImage};
///
/// let mut mem = MemoryImage::new();
/// mem.write(0x1234, 0x42);
/// assert_eq!(mem.read(0x1234), 0x42);
/// ```
pub trait MemoryBus {
    /// Reads a byte from the specified 16-bit address.
    fn read(&self, addr: u16) -> u8;

    /// Writes a byte to the specified 16-bit address.
    fn write(&mut self, addr: u16, value: u8);

    /// Reads a little-endian word. The high byte address wraps at 0xFFFF.
    fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }
}

/// A byte written into the display window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelChange {
    /// Offset of the pixel within the display window (0..0x400).
    pub offset: u16,

    /// Palette index, the low nibble of the written byte.
    pub color: u8,
}

impl PixelChange {
    /// Column of the pixel on the 32x32 grid.
    pub fn x(&self) -> usize {
        self.offset as usize % DISPLAY_SIDE
    }

    /// Row of the pixel on the 32x32 grid.
    pub fn y(&self) -> usize {
        self.offset as usize / DISPLAY_SIDE
    }
}

/// Flat 64KB memory with a display window side channel.
///
/// # Examples
///
/// ```
/// use sim6502::{MemoryBus, MemoryImage, PixelChange};
///
/// let mut memory = MemoryImage::new();
/// memory.write(0x0201, 0x1E);
///
/// assert_eq!(
///     memory.take_pixel_changes(),
///     vec![PixelChange { offset: 1, color: 0x0E }]
/// );
/// assert!(memory.take_pixel_changes().is_empty());
/// ```
pub struct MemoryImage {
    /// 64KB contiguous memory array
    data: Box<[u8; 65536]>,

    /// Addresses whose writes are reported as pixel changes
    display: RangeInclusive<u16>,

    /// Pixel changes not yet collected by the caller
    pixel_changes: Vec<PixelChange>,
}

impl MemoryImage {
    /// Creates a zeroed memory image with the standard display window.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; 65536]),
            display: DISPLAY_START..=DISPLAY_END,
            pixel_changes: Vec::new(),
        }
    }

    /// Zeroes every byte and drops pending pixel changes.
    pub fn clear(&mut self) {
        self.data.fill(0);
        self.pixel_changes.clear();
    }

    /// Zeroes `range` without raising pixel changes.
    ///
    /// Used when resetting, where the caller redraws the whole display anyway.
    pub fn clear_range(&mut self, range: std::ops::Range<u16>) {
        self.data[range.start as usize..range.end as usize].fill(0);
        self.pixel_changes
            .retain(|change| !range.contains(&(DISPLAY_START + change.offset)));
    }

    /// Returns `len` bytes starting at `start`, stopping at the end of memory.
    pub fn slice(&self, start: u16, len: usize) -> &[u8] {
        let start = start as usize;
        let end = (start + len).min(self.data.len());
        &self.data[start..end]
    }

    /// Returns the whole display window, one palette index per pixel.
    pub fn display_pixels(&self) -> Vec<u8> {
        self.data[*self.display.start() as usize..=*self.display.end() as usize]
            .iter()
            .map(|byte| byte & 0x0F)
            .collect()
    }

    /// Removes and returns the pixel changes recorded since the last call.
    pub fn take_pixel_changes(&mut self) -> Vec<PixelChange> {
        std::mem::take(&mut self.pixel_changes)
    }
}

impl Default for MemoryImage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for MemoryImage {
    fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
        if self.display.contains(&addr) {
            self.pixel_changes.push(PixelChange {
                offset: addr - DISPLAY_START,
                color: value & 0x0F,
            });
        }
    }
}
