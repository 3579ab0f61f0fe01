//! Hardware abstraction traits.
//!
//! The controller never touches registers. Implement these for your PWM
//! timers, sense pin, UART and EEPROM to wire the core to real hardware.

use crate::colors::Color;

/// Trait for abstracting the RGB output stage.
pub trait RgbOutput {
    /// Loads a color into the output hardware.
    ///
    /// Implementations convert to their native format (e.g. inverted PWM
    /// compare values). This method cannot fail.
    fn set_color(&mut self, color: Color);
}

/// Trait for abstracting the strip supply sensor.
pub trait PowerSense {
    /// Returns true when the strip supply voltage is present.
    fn is_power_present(&self) -> bool;
}

/// Trait for abstracting the transmit half of the serial line.
pub trait SerialTx {
    /// Sends a single byte, waiting for the transmitter if necessary.
    fn send_byte(&mut self, byte: u8);

    /// Sends every byte of `bytes` in order.
    fn send_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.send_byte(byte);
        }
    }
}

/// Trait for abstracting byte-addressed non-volatile storage.
pub trait ByteStorage {
    /// Reads the byte stored at `offset`.
    fn read_byte(&mut self, offset: usize) -> u8;

    /// Writes `value` at `offset`.
    fn write_byte(&mut self, offset: usize, value: u8);
}

/// `core::fmt::Write` adapter that streams formatted text to a [`SerialTx`].
pub struct SerialWriter<'a, T: SerialTx + ?Sized> {
    tx: &'a mut T,
}

impl<'a, T: SerialTx + ?Sized> SerialWriter<'a, T> {
    pub fn new(tx: &'a mut T) -> Self {
        Self { tx }
    }
}

impl<T: SerialTx + ?Sized> core::fmt::Write for SerialWriter<'_, T> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.tx.send_bytes(s.as_bytes());
        Ok(())
    }
}
