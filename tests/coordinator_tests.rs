//! Integration tests for Coordinator: framing, dispatch, replies and autosave

mod common;
use common::*;

use rgb_strip_serial::config::STORAGE_BASE;
use rgb_strip_serial::dispatch::HELP_TEXT;
use rgb_strip_serial::{
    BLACK, Coordinator, ERR_REPLY, FadeRate, Mode, OK_REPLY, Reply, SharedStrip, Srgb, Startup,
    TickOutcome, Unrecognized, WHITE,
};

type TestCoordinator<'a> = Coordinator<'a, MockOutput, MockPower, MockEeprom, MockSerial>;

fn started<'a>(strip: &'a SharedStrip<MockOutput>, eeprom: MockEeprom) -> TestCoordinator<'a> {
    let mut coordinator = Coordinator::new(strip, MockSerial::new(), MockPower(true), eeprom);
    coordinator.start();
    coordinator.serial_mut().clear();
    coordinator
}

fn send(coordinator: &mut TestCoordinator<'_>, input: &str) -> Vec<Result<Reply, Unrecognized>> {
    feed_str(input, |b| coordinator.on_byte_received(b))
}

// ============================================================================
// Startup
// ============================================================================

#[test]
fn erased_storage_starts_with_defaults() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = Coordinator::new(&strip, MockSerial::new(), MockPower(true), MockEeprom::erased());

    assert_eq!(coordinator.start(), Startup::Defaults);

    strip.with(|s| {
        assert_eq!(s.mode(), Mode::Fading);
        assert_eq!(s.current(), BLACK);
        assert_eq!(s.target(), WHITE);
        assert_eq!(s.output().last(), Some(BLACK));
    });
}

#[test]
fn startup_prints_help_banner_and_ok() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = Coordinator::new(&strip, MockSerial::new(), MockPower(true), MockEeprom::erased());
    coordinator.start();

    let mut expected = HELP_TEXT.as_bytes().to_vec();
    expected.extend_from_slice(OK_REPLY);
    assert_eq!(coordinator.serial().sent, expected);
}

#[test]
fn all_ones_mode_byte_falls_back_to_defaults() {
    let strip = SharedStrip::new(MockOutput::new());
    let eeprom = MockEeprom::with_record(STORAGE_BASE, [255, 1, 2, 3, 4]);
    let mut coordinator = Coordinator::new(&strip, MockSerial::new(), MockPower(true), eeprom);

    assert_eq!(coordinator.start(), Startup::Defaults);
    strip.with(|s| {
        assert_eq!(s.mode(), Mode::Fading);
        assert_eq!(s.current(), BLACK);
        assert_eq!(s.target(), WHITE);
    });
}

#[test]
fn stored_record_is_restored_without_fading() {
    let strip = SharedStrip::new(MockOutput::new());
    let eeprom = MockEeprom::with_record(STORAGE_BASE, [1, 10, 20, 30, 5]);
    let mut coordinator = Coordinator::new(&strip, MockSerial::new(), MockPower(true), eeprom);

    assert!(matches!(coordinator.start(), Startup::Restored(_)));
    strip.with(|s| {
        assert_eq!(s.mode(), Mode::Immediate);
        assert_eq!(s.target(), Srgb::new(10, 20, 30));
        assert_eq!(s.current(), Srgb::new(10, 20, 30));
        assert_eq!(s.fade_rate(), FadeRate::new(5));
        assert_eq!(s.output().last(), Some(Srgb::new(10, 20, 30)));
    });
}

// ============================================================================
// Replies
// ============================================================================

#[test]
fn accepted_command_is_echoed_then_acknowledged() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());

    let results = send(&mut coordinator, "DELAY:010\r");
    assert_eq!(results, vec![Ok(Reply::Ack)]);
    assert_eq!(coordinator.serial().text(), "DELAY:010\r\r\n\r\nOK\r\n");
}

#[test]
fn unknown_command_replies_err_and_changes_nothing() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());
    let before = strip.with(|s| (s.mode(), s.current(), s.target(), s.fade_rate(), s.autosave()));

    let results = send(&mut coordinator, "bogus\n");
    assert_eq!(results, vec![Err(Unrecognized)]);

    let mut expected = b"bogus\n\r\n".to_vec();
    expected.extend_from_slice(ERR_REPLY);
    assert_eq!(coordinator.serial().sent, expected);

    let after = strip.with(|s| (s.mode(), s.current(), s.target(), s.fade_rate(), s.autosave()));
    assert_eq!(before, after);
}

#[test]
fn status_reports_every_field() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());
    coordinator.power_mut().0 = false;

    send(&mut coordinator, "status\r");
    assert_eq!(
        coordinator.serial().text(),
        "status\r\r\n\
         Mode: 2\r\n\
         Delay: 1\r\n\
         Autosave: disabled\r\n\
         Strip power: disabled\r\n\
         Current RGB Values: 0/0/0\r\n\
         Target RGB Values: 255/255/255\r\n\
         \r\nOK\r\n"
    );
}

#[test]
fn help_prints_command_reference() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());

    assert_eq!(send(&mut coordinator, "help\n"), vec![Ok(Reply::Help)]);
    assert_eq!(
        coordinator.serial().text(),
        format!("help\n\r\n{}\r\nOK\r\n", HELP_TEXT)
    );
}

#[test]
fn overlong_line_is_dispatched_when_buffer_fills() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());

    // 15 bytes fill the 16 byte buffer, no terminator needed
    assert_eq!(send(&mut coordinator, "abcdefghijkhelp"), vec![Ok(Reply::Help)]);
    assert_eq!(send(&mut coordinator, "DELAY:007\r"), vec![Ok(Reply::Ack)]);
    strip.with(|s| assert_eq!(s.fade_rate(), FadeRate::new(7)));
}

#[test]
fn commands_are_handled_in_arrival_order() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());

    let results = send(&mut coordinator, "MODE:001\rRGB:001001001\rRGB:002002002\r");
    assert_eq!(results.len(), 3);
    strip.with(|s| {
        assert_eq!(s.current(), Srgb::new(2, 2, 2));
        let tail = &s.output().history[s.output().history.len() - 2..];
        assert_eq!(tail, &[Srgb::new(1, 1, 1), Srgb::new(2, 2, 2)]);
    });
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn fading_color_advances_one_unit_per_step() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());
    send(&mut coordinator, "DELAY:000\r");
    send(&mut coordinator, "RGB:255000000\r");
    strip.with(|s| assert_eq!(s.current(), BLACK));

    assert_eq!(strip.tick(), TickOutcome::Stepped);
    strip.with(|s| assert_eq!(s.current(), Srgb::new(1, 0, 0)));

    for _ in 1..255 {
        strip.tick();
    }
    strip.with(|s| {
        assert_eq!(s.current(), Srgb::new(255, 0, 0));
        assert!(s.is_settled());
    });
}

#[test]
fn immediate_mode_applies_color_at_once() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());

    assert_eq!(send(&mut coordinator, "MODE:001\r"), vec![Ok(Reply::Ack)]);
    assert_eq!(send(&mut coordinator, "RGB:010020030\r"), vec![Ok(Reply::Ack)]);

    strip.with(|s| {
        assert_eq!(s.current(), Srgb::new(10, 20, 30));
        assert_eq!(s.target(), Srgb::new(10, 20, 30));
        assert_eq!(s.output().last(), Some(Srgb::new(10, 20, 30)));
    });

    for _ in 0..50 {
        assert_eq!(strip.tick(), TickOutcome::Held);
    }
    strip.with(|s| assert_eq!(s.current(), Srgb::new(10, 20, 30)));
}

#[test]
fn slowest_delay_steps_on_the_999th_tick() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());
    send(&mut coordinator, "DELAY:999\r");

    for _ in 0..998 {
        assert_eq!(strip.tick(), TickOutcome::Waiting);
    }
    strip.with(|s| assert_eq!(s.current(), BLACK));

    assert_eq!(strip.tick(), TickOutcome::Stepped);
    strip.with(|s| assert_eq!(s.current(), Srgb::new(1, 1, 1)));
}

#[test]
fn unknown_mode_value_is_stored_and_never_steps() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());
    send(&mut coordinator, "DELAY:000\r");
    send(&mut coordinator, "MODE:007\r");

    for _ in 0..10 {
        assert_eq!(strip.tick(), TickOutcome::Held);
    }
    strip.with(|s| {
        assert_eq!(s.mode(), Mode::Other(7));
        assert_eq!(s.current(), BLACK);
    });

    coordinator.serial_mut().clear();
    send(&mut coordinator, "status\r");
    assert!(coordinator.serial().text().contains("Mode: 7\r\n"));
}

// ============================================================================
// Autosave
// ============================================================================

#[test]
fn nothing_is_written_while_autosave_is_off() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());

    send(&mut coordinator, "RGB:001002003\rDELAY:005\rMODE:001\r");
    assert_eq!(coordinator.persistence().storage().writes, 0);
}

#[test]
fn autosave_persists_after_each_accepted_command() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());

    send(&mut coordinator, "SAVE:001\r");
    let cells = coordinator.persistence().storage().cells;
    assert_eq!(&cells[STORAGE_BASE..STORAGE_BASE + 5], &[2, 255, 255, 255, 1]);

    send(&mut coordinator, "RGB:001002003\r");
    let cells = coordinator.persistence().storage().cells;
    assert_eq!(&cells[STORAGE_BASE..STORAGE_BASE + 5], &[2, 1, 2, 3, 1]);
}

#[test]
fn rejected_line_is_not_persisted() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());
    send(&mut coordinator, "SAVE:001\r");
    let writes = coordinator.persistence().storage().writes;

    send(&mut coordinator, "nonsense\r");
    assert_eq!(coordinator.persistence().storage().writes, writes);
}

#[test]
fn disabling_autosave_stops_writes() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());
    send(&mut coordinator, "SAVE:001\rSAVE:000\r");
    let writes = coordinator.persistence().storage().writes;

    send(&mut coordinator, "RGB:009009009\r");
    assert_eq!(coordinator.persistence().storage().writes, writes);
    strip.with(|s| assert!(!s.autosave()));
}

#[test]
fn negative_save_value_enables_autosave() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());

    send(&mut coordinator, "SAVE:-01\r");
    assert!(coordinator.serial().text().ends_with("\r\nOK\r\n"));
    strip.with(|s| assert!(s.autosave()));

    let cells = coordinator.persistence().storage().cells;
    assert_eq!(&cells[STORAGE_BASE..STORAGE_BASE + 5], &[2, 255, 255, 255, 1]);
}

#[test]
fn negative_color_field_wraps_to_full_channel() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());

    send(&mut coordinator, "MODE:001\rRGB:-01000000\r");
    strip.with(|s| {
        assert_eq!(s.target(), Srgb::new(255, 0, 0));
        assert_eq!(s.current(), Srgb::new(255, 0, 0));
    });
}

#[test]
fn slow_delay_is_truncated_across_restart() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());
    send(&mut coordinator, "SAVE:001\rDELAY:300\r");
    strip.with(|s| assert_eq!(s.fade_rate(), FadeRate::new(300)));

    let cells = coordinator.persistence().storage().cells;
    let rebooted = SharedStrip::new(MockOutput::new());
    let mut coordinator = Coordinator::new(
        &rebooted,
        MockSerial::new(),
        MockPower(true),
        MockEeprom { cells, writes: 0 },
    );

    assert!(matches!(coordinator.start(), Startup::Restored(_)));
    rebooted.with(|s| assert_eq!(s.fade_rate(), FadeRate::new(300 % 256)));
}

#[test]
fn persisted_zero_mode_reads_back_as_uninitialized() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());
    send(&mut coordinator, "SAVE:001\rMODE:000\r");

    let cells = coordinator.persistence().storage().cells;
    assert_eq!(cells[STORAGE_BASE], 0);

    let rebooted = SharedStrip::new(MockOutput::new());
    let mut coordinator = Coordinator::new(
        &rebooted,
        MockSerial::new(),
        MockPower(true),
        MockEeprom { cells, writes: 0 },
    );
    assert_eq!(coordinator.start(), Startup::Defaults);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn tick_thread_never_observes_a_torn_color() {
    let strip = SharedStrip::new(MockOutput::new());
    let mut coordinator = started(&strip, MockEeprom::erased());
    send(&mut coordinator, "MODE:001\r");

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..5000 {
                strip.tick();
            }
        });

        for v in 0..100u32 {
            let line = format!("RGB:{v:03}{v:03}{v:03}\r");
            send(&mut coordinator, &line);
        }
    });

    strip.with(|s| {
        assert_eq!(s.current(), Srgb::new(99, 99, 99));
        assert!(
            s.output()
                .history
                .iter()
                .all(|c| c.red == c.green && c.green == c.blue)
        );
    });
}
