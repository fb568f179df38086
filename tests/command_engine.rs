//! Command/response engine against a simulated module: response matching,
//! error tiers and the response window.
mod helpers;

use helpers::{ack, module_frame, response, MockCanBus, MockError, Reply, TokioTimer, VirtualTimer};
use ossm_j1939::{
    error::{result_code, CommandError, NO_RESPONSE_CODE},
    protocol::command::{
        check_response, send_command, transact, Command, ErrorCode, ResponseTiming, COMMAND_PGN,
        RESPONSE_PGN,
    },
    protocol::transport::{can_frame::CanFrame, can_id::CanId},
};
use std::time::Instant;

#[tokio::test]
/// A silent module costs the grace period plus 200 polls of 5 ms.
async fn test_timeout_window_is_bounded() {
    let mut bus = MockCanBus::new();
    let mut timer = VirtualTimer::new();
    let handle = bus.clone();

    let result = check_response(&mut bus, &mut timer, &ResponseTiming::default(), Command::Save).await;

    assert!(matches!(result, Err(CommandError::Timeout)));
    assert_eq!(result_code(&result), NO_RESPONSE_CODE);
    assert_eq!(timer.elapsed_ms(), 1050);
    assert_eq!(handle.recv_calls(), 200);
}

#[tokio::test]
/// Same window measured on the wall clock.
async fn test_timeout_wall_clock() {
    let mut bus = MockCanBus::new();
    let mut timer = TokioTimer::new();

    let start = Instant::now();
    let result = check_response(&mut bus, &mut timer, &ResponseTiming::default(), Command::Reset).await;
    let elapsed = start.elapsed().as_millis();

    assert!(matches!(result, Err(CommandError::Timeout)));
    assert!(elapsed >= 1050, "returned too early: {elapsed} ms");
    assert!(elapsed < 3000, "took too long: {elapsed} ms");
}

#[tokio::test]
/// A matching response returns the six result bytes.
async fn test_transact_success() {
    let mut bus = MockCanBus::with_responder(|frame| {
        Reply::Frames(vec![response(frame.data[0], 0, [1, 2, 3, 4, 5, 6])])
    });
    let mut timer = VirtualTimer::new();
    let handle = bus.clone();

    let result = transact(&mut bus, &mut timer, &ResponseTiming::default(), Command::Query, &[0]).await;

    assert_eq!(result.unwrap(), [1, 2, 3, 4, 5, 6]);
    let sent = handle.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].id.pgn(), COMMAND_PGN);
    assert_eq!(sent[0].data, [0x05, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    // Answered on the first poll, right after the grace period.
    assert_eq!(timer.elapsed_ms(), 50);
    assert_eq!(handle.recv_calls(), 1);
}

#[tokio::test]
/// Non-zero error bytes surface as the firmware code.
async fn test_module_error_code() {
    let mut bus = MockCanBus::with_responder(|frame| {
        Reply::Frames(vec![response(frame.data[0], 0x03, [0xFF; 6])])
    });
    let mut timer = VirtualTimer::new();

    let result = transact(&mut bus, &mut timer, &ResponseTiming::default(), Command::EnableSpn, &[0, 1, 1, 0]).await;

    let err = result.as_ref().unwrap_err();
    assert!(matches!(err, CommandError::Module(ErrorCode::UnknownSpn)));
    assert!(!err.is_no_response());
    assert_eq!(result_code(&result), 3);
}

#[tokio::test]
/// Unknown firmware codes are passed through unchanged.
async fn test_unlisted_error_code_kept() {
    let mut bus = MockCanBus::with_responder(|frame| {
        Reply::Frames(vec![response(frame.data[0], 0x2A, [0xFF; 6])])
    });
    let mut timer = VirtualTimer::new();

    let result = transact(&mut bus, &mut timer, &ResponseTiming::default(), Command::Save, &[]).await;
    assert_eq!(result_code(&result), 0x2A);
}

#[tokio::test]
/// Responses to another command, foreign sources and telemetry are skipped.
async fn test_discards_unrelated_frames() {
    let mut bus = MockCanBus::with_responder(|frame| {
        let foreign = CanFrame::new_j1939(
            CanId::from_parts(RESPONSE_PGN, 6, 0x20),
            [frame.data[0], 0, 9, 9, 9, 9, 9, 9],
        );
        Reply::Frames(vec![
            response(Command::Save.as_u8(), 0, [0xEE; 6]),
            foreign,
            module_frame(0xFEEE, [0xFF; 8]),
            response(frame.data[0], 0, [7, 7, 7, 7, 7, 7]),
        ])
    });
    let mut timer = VirtualTimer::new();
    let handle = bus.clone();

    let result = transact(&mut bus, &mut timer, &ResponseTiming::default(), Command::Query, &[0]).await;

    assert_eq!(result.unwrap(), [7; 6]);
    // One frame per poll: the match is the fourth.
    assert_eq!(handle.recv_calls(), 4);
    assert_eq!(timer.elapsed_ms(), 50 + 3 * 5);
}

#[tokio::test]
/// A stale response to another command never satisfies the wait.
async fn test_out_of_order_response_times_out() {
    let mut bus = MockCanBus::with_responder(|_| {
        Reply::Frames(vec![response(Command::Reset.as_u8(), 0, [0; 6])])
    });
    let mut timer = VirtualTimer::new();

    let result = transact(&mut bus, &mut timer, &ResponseTiming::default(), Command::Save, &[]).await;
    assert!(matches!(result, Err(CommandError::Timeout)));
}

#[tokio::test]
/// Send failures are reported at once and nothing is polled.
async fn test_send_failure() {
    let mut bus = MockCanBus::new();
    bus.set_fail_send(true);
    let mut timer = VirtualTimer::new();
    let handle = bus.clone();

    let result = transact(&mut bus, &mut timer, &ResponseTiming::default(), Command::Save, &[]).await;

    assert!(matches!(result, Err(CommandError::Send(MockError::Send))));
    assert!(result.as_ref().unwrap_err().is_no_response());
    assert_eq!(result_code(&result), NO_RESPONSE_CODE);
    assert_eq!(handle.recv_calls(), 0);
    assert_eq!(timer.elapsed_ms(), 0);
}

#[tokio::test]
/// A bus that keeps failing reports the receive error once the window is spent.
async fn test_receive_failure() {
    let mut bus = MockCanBus::with_responder(|_| Reply::BreakRecv);
    let mut timer = VirtualTimer::new();
    let handle = bus.clone();

    let sent = send_command(&mut bus, Command::Save, &[]).await;
    assert!(sent.is_ok());
    let result = check_response(&mut bus, &mut timer, &ResponseTiming::default(), Command::Save).await;

    assert!(matches!(result, Err(CommandError::Receive(MockError::Recv))));
    assert_eq!(result_code(&result), NO_RESPONSE_CODE);
    assert_eq!(timer.elapsed_ms(), 1050);
    assert_eq!(handle.recv_calls(), 200);
}

#[tokio::test]
/// A single failed read does not lose a response queued behind it.
async fn test_transient_receive_failure_keeps_waiting() {
    let mut bus = MockCanBus::with_responder(|frame| {
        Reply::GlitchThen(vec![response(frame.data[0], 0, [4, 3, 2, 1, 0, 0])])
    });
    let mut timer = VirtualTimer::new();
    let handle = bus.clone();

    let result = transact(&mut bus, &mut timer, &ResponseTiming::default(), Command::Save, &[]).await;

    assert_eq!(result.unwrap(), [4, 3, 2, 1, 0, 0]);
    assert_eq!(handle.recv_calls(), 2);
    assert_eq!(timer.elapsed_ms(), 50 + 5);
}

#[tokio::test]
/// A failed read followed by silence still reports the receive error.
async fn test_transient_receive_failure_then_silence() {
    let mut bus = MockCanBus::with_responder(|_| Reply::GlitchThen(vec![]));
    let mut timer = VirtualTimer::new();

    let result = transact(&mut bus, &mut timer, &ResponseTiming::default(), Command::Reset, &[]).await;

    assert!(matches!(result, Err(CommandError::Receive(MockError::Recv))));
    assert_eq!(result_code(&result), NO_RESPONSE_CODE);
    assert_eq!(timer.elapsed_ms(), 1050);
}

#[tokio::test]
/// Custom timing changes the window; a zero poll interval still advances.
async fn test_custom_timing() {
    let timing = ResponseTiming {
        grace_ms: 10,
        poll_interval_ms: 0,
        timeout_ms: 20,
    };
    let mut bus = MockCanBus::new();
    let mut timer = VirtualTimer::new();
    let handle = bus.clone();

    let result = check_response(&mut bus, &mut timer, &timing, Command::Save).await;

    assert!(matches!(result, Err(CommandError::Timeout)));
    assert_eq!(timer.elapsed_ms(), 30);
    assert_eq!(handle.recv_calls(), 20);
}

#[tokio::test]
/// The acknowledgement helper echoes the command byte.
async fn test_ack_round_trip() {
    let mut bus = MockCanBus::with_responder(ack);
    let mut timer = VirtualTimer::new();
    let result = transact(&mut bus, &mut timer, &ResponseTiming::default(), Command::Reset, &[]).await;
    assert_eq!(result_code(&result), 0);
}
