#![no_std]
#![no_main]

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m_rt::{entry, exception};
use panic_halt as _;
use rgb_strip_serial::{ByteStorage, Color, Coordinator, PowerSense, RgbOutput, SerialTx, SharedStrip};

// ============================================================================
// Minimal Hardware Implementations
// ============================================================================

/// Zero-size output stage for measuring library overhead
pub struct MinimalOutput;

impl RgbOutput for MinimalOutput {
    fn set_color(&mut self, color: Color) {
        // Inverted PWM compare values, as a common-anode strip would need
        core::hint::black_box([255 - color.red, 255 - color.green, 255 - color.blue]);
    }
}

pub struct MinimalSense;

impl PowerSense for MinimalSense {
    fn is_power_present(&self) -> bool {
        core::hint::black_box(true)
    }
}

pub struct MinimalSerial;

impl SerialTx for MinimalSerial {
    fn send_byte(&mut self, byte: u8) {
        core::hint::black_box(byte);
    }
}

/// RAM-backed stand-in for a 64 byte EEPROM
pub struct MinimalEeprom([u8; 64]);

impl ByteStorage for MinimalEeprom {
    fn read_byte(&mut self, offset: usize) -> u8 {
        self.0.get(offset).copied().unwrap_or(0xFF)
    }

    fn write_byte(&mut self, offset: usize, value: u8) {
        if let Some(cell) = self.0.get_mut(offset) {
            *cell = value;
        }
    }
}

// ============================================================================
// Execution Contexts
// ============================================================================

static STRIP: SharedStrip<MinimalOutput> = SharedStrip::new(MinimalOutput);

/// Fade tick, every 1ms
#[exception]
fn SysTick() {
    STRIP.tick();
}

const SCRIPT: &[u8] = b"help\rSAVE:001\rDELAY:010\rRGB:255128000\rMODE:001\rstatus\rbogus\r";

#[entry]
fn main() -> ! {
    let mut peripherals = cortex_m::Peripherals::take().unwrap();

    let mut coordinator = Coordinator::new(&STRIP, MinimalSerial, MinimalSense, MinimalEeprom([0xFF; 64]));
    coordinator.start();

    // Tick only after the configuration is loaded
    peripherals.SYST.set_clock_source(SystClkSource::Core);
    peripherals.SYST.set_reload(8_000 - 1);
    peripherals.SYST.clear_current();
    peripherals.SYST.enable_counter();
    peripherals.SYST.enable_interrupt();

    // Stand-in for the UART receive interrupt
    for &byte in SCRIPT {
        core::hint::black_box(coordinator.on_byte_received(byte));
    }

    loop {
        cortex_m::asm::wfi();
    }
}
