//! Serial line framing.
//!
//! Provides [`LineFramer`], which collects received bytes into a fixed-size
//! [`CommandLine`] and hands out the line once it is terminated or full.

use crate::config::LINE_CAPACITY;
use crate::hal::SerialTx;
use heapless::Vec;

/// Sent after the echo of a completed line, before any reply.
pub const LINE_PROMPT: &[u8] = b"\r\n";

/// A completed line of received bytes.
///
/// Holds at most `N - 1` bytes; the last slot is reserved for the terminator
/// marker. Includes the `\r`/`\n` that ended the line, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine<const N: usize = LINE_CAPACITY> {
    bytes: Vec<u8, N>,
}

impl<const N: usize> CommandLine<N> {
    /// Creates a line from raw bytes, keeping at most `N - 1` of them.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let keep = bytes.len().min(N.saturating_sub(1));
        let mut line = Self { bytes: Vec::new() };
        // `keep` never exceeds the capacity
        let _ = line.bytes.extend_from_slice(&bytes[..keep]);
        line
    }

    /// Returns the received bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Receives completed lines from a [`LineFramer`].
///
/// The handler is installed when the framer is built and is invoked
/// synchronously in the byte-arrival context, after the prompt has been sent.
/// `tx` is the same transmitter the echo went to, so replies follow it.
pub trait LineHandler<const N: usize> {
    /// Value handed back to the caller of [`LineFramer::feed`].
    type Output;

    fn on_line<T: SerialTx + ?Sized>(&mut self, line: CommandLine<N>, tx: &mut T) -> Self::Output;
}

/// Accumulates serial bytes into command lines.
///
/// Runs entirely inside the byte-arrival context. A line completes on `\n`,
/// on `\r`, or when `N - 1` bytes are buffered; overflow is early termination,
/// never an error.
#[derive(Debug)]
pub struct LineFramer<H, const N: usize = LINE_CAPACITY> {
    buffer: Vec<u8, N>,
    handler: H,
}

impl<H: LineHandler<N>, const N: usize> LineFramer<H, N> {
    /// Creates a framer that delivers every completed line to `handler`.
    pub const fn new(handler: H) -> Self {
        Self {
            buffer: Vec::new(),
            handler,
        }
    }

    /// Appends a received byte and echoes it back on `tx`.
    ///
    /// When `byte` terminates the line or fills the buffer, the prompt is
    /// sent, the buffer is reset and the line is passed to the handler. The
    /// handler's result is returned; otherwise `None`.
    pub fn feed<T: SerialTx + ?Sized>(&mut self, byte: u8, tx: &mut T) -> Option<H::Output> {
        // Capacity is reserved below, push cannot fail
        let _ = self.buffer.push(byte);
        tx.send_byte(byte);

        let full = self.buffer.len() >= N.saturating_sub(1);
        if !full && byte != b'\n' && byte != b'\r' {
            return None;
        }

        let line = CommandLine {
            bytes: core::mem::take(&mut self.buffer),
        };
        tx.send_bytes(LINE_PROMPT);
        Some(self.handler.on_line(line, tx))
    }

    /// Number of bytes buffered for the line in progress.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }
}
