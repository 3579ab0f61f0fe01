//! Shared test infrastructure for rgb-strip-serial integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use rgb_strip_serial::{ByteStorage, Color, PowerSense, RgbOutput, SerialTx};

// ============================================================================
// Mock Output
// ============================================================================

/// Mock output stage that records every pushed color
#[derive(Default)]
pub struct MockOutput {
    pub history: Vec<Color>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<Color> {
        self.history.last().copied()
    }
}

impl RgbOutput for MockOutput {
    fn set_color(&mut self, color: Color) {
        self.history.push(color);
    }
}

// ============================================================================
// Mock Serial
// ============================================================================

/// Mock transmitter capturing everything sent
#[derive(Default)]
pub struct MockSerial {
    pub sent: Vec<u8>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.sent).into_owned()
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl SerialTx for MockSerial {
    fn send_byte(&mut self, byte: u8) {
        self.sent.push(byte);
    }
}

// ============================================================================
// Mock Power Sense
// ============================================================================

pub struct MockPower(pub bool);

impl PowerSense for MockPower {
    fn is_power_present(&self) -> bool {
        self.0
    }
}

// ============================================================================
// Mock EEPROM
// ============================================================================

/// Mock EEPROM, erased (all `0xFF`) by default
pub struct MockEeprom {
    pub cells: [u8; 64],
    pub writes: usize,
}

impl MockEeprom {
    pub fn erased() -> Self {
        Self {
            cells: [0xFF; 64],
            writes: 0,
        }
    }

    /// EEPROM with `record` already stored at `base`
    pub fn with_record(base: usize, record: [u8; 5]) -> Self {
        let mut eeprom = Self::erased();
        eeprom.cells[base..base + 5].copy_from_slice(&record);
        eeprom
    }
}

impl ByteStorage for MockEeprom {
    fn read_byte(&mut self, offset: usize) -> u8 {
        self.cells[offset]
    }

    fn write_byte(&mut self, offset: usize, value: u8) {
        self.cells[offset] = value;
        self.writes += 1;
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Feeds every byte of `input` to `feed`, collecting the dispatch results
pub fn feed_str<R>(input: &str, mut feed: impl FnMut(u8) -> Option<R>) -> Vec<R> {
    input.bytes().filter_map(|b| feed(b)).collect()
}
