//! Wiring of framer, dispatcher, fade engine and persistence.
//!
//! Provides [`SharedStrip`], the critical-section guarded state block shared
//! by the two execution contexts, [`CommandHandler`], the line handler that
//! turns completed lines into state changes, and [`Coordinator`], which
//! installs that handler into its framer and runs in the byte-arrival
//! context.
//!
//! # Execution contexts
//!
//! - **Tick**: the timer interrupt calls [`SharedStrip::tick`]. It only ever
//!   touches the strip.
//! - **Byte arrival**: the UART receive interrupt calls
//!   [`Coordinator::on_byte_received`]. Framing touches only the line buffer;
//!   a completed line is dispatched, answered and optionally persisted inside
//!   one critical section, so the tick never observes a half-applied command
//!   and a record write is never split by a tick.

use core::cell::RefCell;
use core::fmt::Write;

use critical_section::Mutex;

use crate::config::{CoordinatorConfig, LINE_CAPACITY};
use crate::dispatch::{self, HELP_TEXT, Reply};
use crate::framer::{CommandLine, LineFramer, LineHandler};
use crate::hal::{ByteStorage, PowerSense, RgbOutput, SerialTx, SerialWriter};
use crate::storage::{Persistence, PersistentRecord};
use crate::transition::{Strip, TickOutcome};
use crate::types::Unrecognized;

/// Sent after a successfully dispatched command.
pub const OK_REPLY: &[u8] = b"\r\nOK\r\n";

/// Sent after an unrecognized line.
pub const ERR_REPLY: &[u8] = b"\r\nERR\r\n";

/// The strip state block behind a critical-section mutex.
///
/// Place it in a `static` so both interrupt handlers can reach it.
pub struct SharedStrip<O: RgbOutput> {
    inner: Mutex<RefCell<Strip<O>>>,
}

impl<O: RgbOutput> SharedStrip<O> {
    pub const fn new(output: O) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Strip::new(output))),
        }
    }

    /// Timer context entry point, called once per tick period.
    pub fn tick(&self) -> TickOutcome {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).tick())
    }

    /// Runs `f` with exclusive access to the strip.
    pub fn with<R>(&self, f: impl FnOnce(&mut Strip<O>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }
}

/// Where the startup configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Startup {
    /// A valid record was found in storage.
    Restored(PersistentRecord),
    /// Storage was uninitialized, compiled-in defaults applied.
    Defaults,
}

/// Line handler installed into the framer by [`Coordinator`].
///
/// Dispatches each completed line, answers on the serial line and persists
/// the configuration when autosave is on. Everything happens inside one
/// critical section: the tick is suppressed from the first field written
/// until the last record byte is stored.
pub struct CommandHandler<'a, O, P, S>
where
    O: RgbOutput,
    P: PowerSense,
    S: ByteStorage,
{
    shared: &'a SharedStrip<O>,
    power: P,
    persistence: Persistence<S>,
}

impl<'a, O, P, S> CommandHandler<'a, O, P, S>
where
    O: RgbOutput,
    P: PowerSense,
    S: ByteStorage,
{
    pub fn new(shared: &'a SharedStrip<O>, power: P, persistence: Persistence<S>) -> Self {
        Self {
            shared,
            power,
            persistence,
        }
    }
}

impl<O, P, S, const N: usize> LineHandler<N> for CommandHandler<'_, O, P, S>
where
    O: RgbOutput,
    P: PowerSense,
    S: ByteStorage,
{
    type Output = Result<Reply, Unrecognized>;

    fn on_line<T: SerialTx + ?Sized>(&mut self, line: CommandLine<N>, tx: &mut T) -> Self::Output {
        let shared = self.shared;

        critical_section::with(|cs| {
            let mut strip = shared.inner.borrow_ref_mut(cs);

            let result = dispatch::dispatch(line.as_bytes(), &mut *strip, &self.power);
            match &result {
                Ok(reply) => {
                    // SerialWriter never fails
                    let _ = write!(SerialWriter::new(&mut *tx), "{}", reply);
                    tx.send_bytes(OK_REPLY);

                    if strip.autosave() {
                        let record = strip.record();
                        self.persistence
                            .save(record.mode, record.target, record.fade_rate);
                    }
                }
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("unrecognized line: {=[u8]}", line.as_bytes());

                    tx.send_bytes(ERR_REPLY);
                }
            }

            result
        })
    }
}

/// Byte-arrival side of the controller.
///
/// Owns the line framer, with a [`CommandHandler`] installed at construction,
/// and the serial transmitter. Completed lines are handled synchronously in
/// the same context that completed them.
///
/// # Type Parameters
/// * `'a` - Lifetime of the shared strip reference
/// * `O` - RGB output implementation type
/// * `P` - Power sensor implementation type
/// * `S` - Non-volatile storage implementation type
/// * `T` - Serial transmitter implementation type
/// * `N` - Command line capacity
pub struct Coordinator<'a, O, P, S, T, const N: usize = LINE_CAPACITY>
where
    O: RgbOutput,
    P: PowerSense,
    S: ByteStorage,
    T: SerialTx,
{
    framer: LineFramer<CommandHandler<'a, O, P, S>, N>,
    serial: T,
    config: CoordinatorConfig,
}

impl<'a, O, P, S, T> Coordinator<'a, O, P, S, T>
where
    O: RgbOutput,
    P: PowerSense,
    S: ByteStorage,
    T: SerialTx,
{
    /// Creates a coordinator with the default line capacity and configuration.
    pub fn new(shared: &'a SharedStrip<O>, serial: T, power: P, storage: S) -> Self {
        Self::with_config(shared, serial, power, storage, CoordinatorConfig::default())
    }
}

impl<'a, O, P, S, T, const N: usize> Coordinator<'a, O, P, S, T, N>
where
    O: RgbOutput,
    P: PowerSense,
    S: ByteStorage,
    T: SerialTx,
{
    pub fn with_config(
        shared: &'a SharedStrip<O>,
        serial: T,
        power: P,
        storage: S,
        config: CoordinatorConfig,
    ) -> Self {
        let persistence = Persistence::new(storage, config.storage_base);
        Self {
            framer: LineFramer::new(CommandHandler::new(shared, power, persistence)),
            serial,
            config,
        }
    }

    /// Loads the stored configuration and prints the banner.
    ///
    /// Call once before enabling the tick interrupt. Uninitialized storage
    /// falls back to the startup defaults.
    pub fn start(&mut self) -> Startup {
        let defaults = self.config.defaults;
        let handler = self.framer.handler_mut();
        let shared = handler.shared;

        let startup = critical_section::with(|cs| {
            let mut strip = shared.inner.borrow_ref_mut(cs);
            match handler.persistence.load() {
                Some(record) => {
                    strip.restore(record);
                    Startup::Restored(record)
                }
                None => {
                    strip.apply_defaults(&defaults);
                    Startup::Defaults
                }
            }
        });

        #[cfg(feature = "defmt")]
        match startup {
            Startup::Restored(record) => {
                defmt::info!("restored configuration, mode {}", record.mode)
            }
            Startup::Defaults => defmt::info!("storage uninitialized, using defaults"),
        }

        if self.config.banner {
            self.serial.send_bytes(HELP_TEXT.as_bytes());
            self.serial.send_bytes(OK_REPLY);
        }

        startup
    }

    /// Byte-arrival entry point.
    ///
    /// Echoes and frames the byte; when it completes a line the installed
    /// handler runs before returning and its dispatch result is returned.
    pub fn on_byte_received(&mut self, byte: u8) -> Option<Result<Reply, Unrecognized>> {
        self.framer.feed(byte, &mut self.serial)
    }

    pub fn serial(&self) -> &T {
        &self.serial
    }

    pub fn serial_mut(&mut self) -> &mut T {
        &mut self.serial
    }

    pub fn power_mut(&mut self) -> &mut P {
        &mut self.framer.handler_mut().power
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.framer.handler().persistence
    }
}
