#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`LineFramer`**: Collects serial bytes into `CommandLine`s, echoing each byte, and hands each line to its installed `LineHandler`
//! - **`Command`**: One parsed protocol command (`RGB:`, `DELAY:`, `MODE:`, `SAVE:`, `status`, `help`)
//! - **`Strip`**: The shared state block (current/target color, mode, fade rate, autosave) and its output
//! - **`SharedStrip`**: `Strip` behind a critical-section mutex, ticked from the timer interrupt
//! - **`CommandHandler`**: The `LineHandler` that dispatches, replies and persists
//! - **`Coordinator`**: Byte-arrival side: installs a `CommandHandler` into its framer at construction
//! - **`Persistence`**: Five-byte configuration record in non-volatile storage
//! - **`RgbOutput`**, **`PowerSense`**, **`SerialTx`**, **`ByteStorage`**: Traits to implement for your hardware
//!
//! Colors are `Srgb<u8>`: three plain 8-bit channels, no color-space correction.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod colors;
pub mod command;
pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod framer;
pub mod hal;
pub mod storage;
pub mod transition;
pub mod types;

pub use colors::{BLACK, BLUE, Color, GREEN, RED, WHITE};
pub use command::Command;
pub use config::{CoordinatorConfig, StartupDefaults};
pub use coordinator::{CommandHandler, Coordinator, ERR_REPLY, OK_REPLY, SharedStrip, Startup};
pub use dispatch::{Reply, StatusReport, dispatch};
pub use framer::{CommandLine, LineFramer, LineHandler};
pub use hal::{ByteStorage, PowerSense, RgbOutput, SerialTx};
pub use storage::{Persistence, PersistentRecord};
pub use transition::{Strip, TickOutcome};
pub use types::{FadeRate, Mode, Unrecognized};
