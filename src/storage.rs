//! Persisted configuration record.
//!
//! The record is five bytes at a fixed base offset:
//!
//! | offset | content                 |
//! |--------|-------------------------|
//! | +0     | mode                    |
//! | +1     | target red              |
//! | +2     | target green            |
//! | +3     | target blue             |
//! | +4     | fade rate, low 8 bits   |
//!
//! There is no checksum or version byte. A mode byte of `0x00` or `0xFF`
//! marks storage that was never written.

use crate::colors::Color;
use crate::hal::ByteStorage;
use crate::types::{FadeRate, Mode};
use palette::Srgb;

/// Size of the persisted record in bytes.
pub const RECORD_LEN: usize = 5;

/// Configuration that survives a power cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistentRecord {
    pub mode: Mode,
    pub target: Color,
    pub fade_rate: FadeRate,
}

impl PersistentRecord {
    /// Encodes the record. The fade rate is truncated to its low byte.
    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        [
            self.mode.as_raw(),
            self.target.red,
            self.target.green,
            self.target.blue,
            self.fade_rate.to_storage_byte(),
        ]
    }

    /// Decodes a record, or `None` if the mode byte marks uninitialized storage.
    pub fn from_bytes(bytes: [u8; RECORD_LEN]) -> Option<Self> {
        if Mode::is_uninitialized_marker(bytes[0]) {
            return None;
        }

        Some(Self {
            mode: Mode::from_raw(bytes[0]),
            target: Srgb::new(bytes[1], bytes[2], bytes[3]),
            fade_rate: FadeRate::new(u16::from(bytes[4])),
        })
    }
}

/// Reads and writes the [`PersistentRecord`] through a [`ByteStorage`].
pub struct Persistence<S: ByteStorage> {
    storage: S,
    base: usize,
}

impl<S: ByteStorage> Persistence<S> {
    pub fn new(storage: S, base: usize) -> Self {
        Self { storage, base }
    }

    /// Writes the record starting at the base offset.
    ///
    /// Bytes that already hold the right value are not rewritten, sparing
    /// EEPROM cells. Returns the number of bytes actually written.
    pub fn save(&mut self, mode: Mode, target: Color, fade_rate: FadeRate) -> usize {
        let record = PersistentRecord {
            mode,
            target,
            fade_rate,
        };

        let mut written = 0;
        for (offset, value) in (self.base..).zip(record.to_bytes()) {
            if self.storage.read_byte(offset) != value {
                self.storage.write_byte(offset, value);
                written += 1;
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("persisted record, {=usize} bytes changed", written);

        written
    }

    /// Reads the record, or `None` when storage holds no configuration.
    pub fn load(&mut self) -> Option<PersistentRecord> {
        let mut bytes = [0u8; RECORD_LEN];
        for (offset, slot) in (self.base..).zip(bytes.iter_mut()) {
            *slot = self.storage.read_byte(offset);
        }
        PersistentRecord::from_bytes(bytes)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
