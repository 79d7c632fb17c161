//! Call lifecycle integration tests: dial, answer, ring/busy policy,
//! hang-up, disconnect reconciliation, PPP targets.

mod support;

use retromodem_core::ppp::{PppEngine, PppError, PppStatus};
use retromodem_core::{CallState, Mode, PeerKind, PppLink};
use std::cell::RefCell;
use std::rc::Rc;
use support::Harness;

#[test]
fn test_dial_success_connects_and_enters_data_mode() {
    let mut h = Harness::new();
    let peer = h.dialer.expect_connection();
    let out = h.command("ATDTbbs.example.com:2323", 0);
    assert!(out.contains("Dialing BBS.EXAMPLE.COM:2323"), "got {out:?}");
    assert!(out.contains("CONNECT 9600"), "got {out:?}");
    assert_eq!(h.dialer.dialed(), vec![("BBS.EXAMPLE.COM".to_string(), 2323)]);
    assert_eq!(h.modem.mode(), Mode::Data);
    assert!(h.modem.call_state().is_connected());
    // Carrier asserted: normal polarity drives the pin low on a call.
    assert!(!h.carrier.get());

    // Data now flows serial -> network.
    h.serial.push_str("hello");
    h.tick_at(100);
    assert_eq!(peer.take_output(), b"hello");
}

#[test]
fn test_dial_default_port_is_23() {
    let mut h = Harness::new();
    let _peer = h.dialer.expect_connection();
    h.command("ATDTexample.org", 0);
    assert_eq!(h.dialer.dialed(), vec![("EXAMPLE.ORG".to_string(), 23)]);
}

#[test]
fn test_dial_failure_reports_no_answer() {
    let mut h = Harness::new();
    let out = h.command("ATDTnowhere.example:23", 0);
    assert!(out.contains("NO ANSWER"), "got {out:?}");
    assert_eq!(h.modem.call_state(), CallState::Idle);
    assert_eq!(h.modem.mode(), Mode::Command);
    assert!(h.carrier.get(), "carrier must stay deasserted");
}

#[test]
fn test_dial_while_connected_is_error() {
    let mut h = Harness::new();
    let _peer = h.dialer.expect_connection();
    h.command("ATDThost:23", 0);
    assert!(h.modem.call_state().is_connected());
    // Escape back to command mode first.
    h.serial.push_str("+++");
    h.tick_at(1_000);
    h.tick_at(2_100);
    assert_eq!(h.modem.mode(), Mode::Command);
    let out = h.command("ATDTother:23", 3_000);
    assert!(out.contains("ERROR"), "got {out:?}");
}

#[test]
fn test_speed_dial_slot_resolution() {
    let mut h = Harness::new();
    h.command("AT&Z3=dialme.example:7000", 0);
    let _peer = h.dialer.expect_connection();
    h.command("ATDS3", 0);
    assert_eq!(h.dialer.dialed(), vec![("DIALME.EXAMPLE".to_string(), 7000)]);
}

#[test]
fn test_empty_speed_dial_slot_fails() {
    let mut h = Harness::new();
    let out = h.command("ATDS9", 0);
    assert!(out.contains("NO ANSWER"), "got {out:?}");
}

#[test]
fn test_hangup_reports_duration_then_zero() {
    let mut h = Harness::new();
    let _peer = h.dialer.expect_connection();
    h.command("ATDThost:23", 0);
    // Escape at the one-hour mark, then hang up.
    h.serial.push_str("+++");
    h.tick_at(3_600_000);
    h.tick_at(3_601_200);
    assert_eq!(h.modem.mode(), Mode::Command);
    let out = h.command("ATH", 3_601_500);
    assert!(out.contains("NO CARRIER (01:00:0"), "got {out:?}");
    assert_eq!(h.modem.call_state(), CallState::Idle);

    // Second hang-up: still NO CARRIER, duration reset to zero.
    let out = h.command("ATH", 3_602_000);
    assert!(out.contains("NO CARRIER (00:00:00)"), "got {out:?}");
    assert_eq!(h.modem.call_state(), CallState::Idle);
}

#[test]
fn test_unsolicited_disconnect_restores_command_mode() {
    let mut h = Harness::new();
    let peer = h.dialer.expect_connection();
    h.command("ATDThost:23", 0);
    assert_eq!(h.modem.mode(), Mode::Data);
    h.serial.take_output();

    peer.disconnect();
    h.tick_at(10_000);
    let out = h.serial.take_output();
    assert!(out.contains("NO CARRIER"), "got {out:?}");
    assert_eq!(h.modem.mode(), Mode::Command);
    assert_eq!(h.modem.call_state(), CallState::Idle);
    assert!(h.carrier.get(), "carrier deasserted after loss");
}

#[test]
fn test_auto_answer_connects_after_pause() {
    let mut h = Harness::new();
    let peer = h.listener.dial_in();
    h.tick_at(0);
    let out = h.serial.take_output();
    assert!(out.contains("RING 127.0.0.1"), "got {out:?}");
    // Not yet connected inside the one-second pause.
    h.tick_at(500);
    assert!(!h.modem.call_state().is_connected());
    h.tick_at(1_100);
    let out = h.serial.take_output();
    assert!(out.contains("CONNECT"), "got {out:?}");
    assert_eq!(h.modem.mode(), Mode::Data);

    h.serial.push_str("hi");
    h.tick_at(1_200);
    assert_eq!(peer.take_output(), b"hi");
}

#[test]
fn test_manual_answer_with_ata() {
    let mut h = Harness::new();
    h.command("ATS0=0", 0);
    let _peer = h.listener.dial_in();
    h.tick_at(100);
    let out = h.serial.take_output();
    assert!(out.contains("RING"), "got {out:?}");
    assert!(!out.contains("CONNECT"), "got {out:?}");

    let out = h.command("ATA", 200);
    assert!(out.contains("CONNECT"), "got {out:?}");
    assert_eq!(h.modem.mode(), Mode::Data);
}

#[test]
fn test_ata_without_pending_call_is_error() {
    let mut h = Harness::new();
    h.command("ATS0=0", 0);
    let out = h.command("ATA", 100);
    assert!(out.contains("ERROR"), "got {out:?}");
}

#[test]
fn test_ring_cadence_and_busy_after_ring_limit() {
    let mut h = Harness::new();
    h.command("ATS0=0", 0);
    let caller = h.listener.dial_in();

    // Rings are gated to one per six-second window.
    h.tick_at(1_000);
    let out = h.serial.take_output();
    assert!(out.contains("RING"), "first ring, got {out:?}");
    h.tick_at(2_000);
    assert!(
        !h.serial.take_output().contains("RING"),
        "window not elapsed"
    );
    h.tick_at(7_100); // ring 2
    h.tick_at(13_300); // ring 3
    h.tick_at(19_500); // ring 4
    let out = h.serial.take_output();
    assert_eq!(out.matches("RING").count(), 3, "got {out:?}");

    // The caller is still pending; past the limit it gets the busy
    // treatment instead of a fifth RING.
    h.tick_at(26_000);
    let notice = caller.take_output_string();
    assert!(notice.contains("SORRY, SYSTEM IS CURRENTLY BUSY"), "got {notice:?}");
    assert!(notice.contains("Current call length: 00:00:00"), "got {notice:?}");
    assert_eq!(h.modem.call_state(), CallState::Idle);
    assert!(!h.serial.take_output().contains("RING"));
}

#[test]
fn test_second_caller_during_call_gets_busy_message() {
    let mut h = Harness::new();
    let _peer = h.dialer.expect_connection();
    h.command("ATDThost:23", 0);
    assert!(h.modem.call_state().is_connected());

    let second = h.listener.dial_in();
    h.tick_at(120_000);
    let notice = second.take_output_string();
    assert!(notice.contains("SORRY, SYSTEM IS CURRENTLY BUSY"), "got {notice:?}");
    assert!(notice.contains("Current call length: 00:02:00"), "got {notice:?}");
    // The original call is untouched.
    assert!(h.modem.call_state().is_connected());
    assert_eq!(h.modem.mode(), Mode::Data);
}

#[test]
fn test_online_returns_to_data_mode() {
    let mut h = Harness::new();
    let _peer = h.dialer.expect_connection();
    h.command("ATDThost:23", 0);
    h.serial.push_str("+++");
    h.tick_at(100);
    h.tick_at(1_300);
    assert_eq!(h.modem.mode(), Mode::Command);

    let out = h.command("ATO", 2_000);
    assert!(out.contains("CONNECT"), "got {out:?}");
    assert_eq!(h.modem.mode(), Mode::Data);

    // ATO with no call is an error.
    let mut h = Harness::new();
    let out = h.command("ATO", 0);
    assert!(out.contains("ERROR"), "got {out:?}");
}

// ============================================================================
// PPP dial targets
// ============================================================================

#[derive(Default)]
struct RecordingEngine {
    fed: Rc<RefCell<Vec<u8>>>,
    out: Rc<RefCell<Vec<u8>>>,
    status: Rc<RefCell<Option<PppStatus>>>,
}

impl PppEngine for RecordingEngine {
    fn listen(&mut self) -> Result<(), PppError> {
        Ok(())
    }

    fn input(&mut self, data: &[u8]) {
        self.fed.borrow_mut().extend_from_slice(data);
    }

    fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut *self.out.borrow_mut())
    }

    fn close(&mut self) {}

    fn poll_status(&mut self) -> Option<PppStatus> {
        self.status.borrow_mut().take()
    }
}

#[test]
fn test_ppp_dial_with_engine() {
    let fed = Rc::new(RefCell::new(Vec::new()));
    let out = Rc::new(RefCell::new(Vec::new()));
    let status = Rc::new(RefCell::new(None));
    let engine = RecordingEngine {
        fed: fed.clone(),
        out: out.clone(),
        status: status.clone(),
    };
    let mut h = Harness::with_ppp(PppLink::new(Box::new(engine)));

    let result = h.command("ATDTPPP", 0);
    assert!(result.contains("CONNECT"), "got {result:?}");
    assert_eq!(h.modem.mode(), Mode::Data);
    assert!(matches!(
        h.modem.call_state(),
        CallState::Connected {
            peer: PeerKind::Ppp,
            ..
        }
    ));

    // Serial frames go to the engine, engine output comes back.
    h.serial.push_bytes(&[0x7E, 0x01, 0x7E]);
    h.tick_at(100);
    assert_eq!(*fed.borrow(), vec![0x7E, 0x01, 0x7E]);

    out.borrow_mut().extend_from_slice(&[0x7E, 0x02, 0x7E]);
    h.tick_at(200);
    assert_eq!(h.serial.take_output_bytes(), vec![0x7E, 0x02, 0x7E]);

    // A fatal status tears the call down with a notice.
    *status.borrow_mut() = Some(PppStatus::ConnectionLost);
    h.tick_at(300);
    let text = h.serial.take_output();
    assert!(text.contains("PPP: Connection lost"), "got {text:?}");
    assert!(text.contains("NO CARRIER"), "got {text:?}");
    assert_eq!(h.modem.call_state(), CallState::Idle);
    assert_eq!(h.modem.mode(), Mode::Command);
}

#[test]
fn test_ppp_dial_without_engine_falls_back_to_tcp() {
    // Engine-less builds treat the reserved name as an ordinary host; the
    // dial fails and reports NO ANSWER.
    let mut h = Harness::new();
    let out = h.command("ATDT777", 0);
    assert!(out.contains("NO ANSWER"), "got {out:?}");
    assert_eq!(h.dialer.dialed(), vec![("777".to_string(), 23)]);
}
