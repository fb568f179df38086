//! # Quickstart Example
//!
//! Minimal tour of ossm-j1939 against an in-process simulated module:
//! - Build and inspect a J1939 identifier
//! - Decode a telemetry frame into the sensor snapshot
//! - Run configuration commands through a `ModuleSession`
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use ossm_j1939::core::OSSM_SOURCE_ADDRESS;
use ossm_j1939::error::result_code;
use ossm_j1939::protocol::command::{Command, RESPONSE_PGN};
use ossm_j1939::protocol::lookups::spn_name;
use ossm_j1939::protocol::operations::PressurePreset;
use ossm_j1939::protocol::session::ModuleSession;
use ossm_j1939::protocol::telemetry::PGN_ENGINE_TEMPERATURE_1;
use ossm_j1939::protocol::transport::can_frame::CanFrame;
use ossm_j1939::protocol::transport::can_id::CanId;
use ossm_j1939::protocol::transport::traits::{can_bus::CanBus, ossm_timer::OssmTimer};
use std::collections::VecDeque;
use std::time::Instant;

/// Loopback bus: every command is answered by a fake module with success and
/// a canned result block.
struct SimulatedModule {
    rx: VecDeque<CanFrame>,
}

impl CanBus for SimulatedModule {
    type Error = ();

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        let command = frame.data[0];
        let result = if command == Command::Query.as_u8() {
            match (frame.data[1], frame.data[2]) {
                (0, _) => [3, 2, 1, 1, 0xFF, 0xFF],
                (1, 0) => [0x00, 0xAF, 0x00, 0x6E, 0xFF, 0xFF],
                _ => [0xFF; 6],
            }
        } else {
            [0xFF; 6]
        };
        let mut data = [command, 0, 0, 0, 0, 0, 0, 0];
        data[2..].copy_from_slice(&result);
        let id = CanId::from_parts(RESPONSE_PGN, 6, OSSM_SOURCE_ADDRESS);
        self.rx.push_back(CanFrame::new_j1939(id, data));
        Ok(())
    }

    async fn try_recv(&mut self) -> Result<Option<CanFrame>, Self::Error> {
        Ok(self.rx.pop_front())
    }
}

struct TokioTimer(Instant);

impl OssmTimer for TokioTimer {
    async fn delay_ms(&mut self, millis: u32) {
        tokio::time::sleep(std::time::Duration::from_millis(millis as u64)).await;
    }

    fn now_ms(&self) -> u64 {
        self.0.elapsed().as_millis() as u64
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== ossm-j1939 Quickstart ===\n");

    // ======================================================================
    // 1. Identifiers
    // ======================================================================
    println!("1. J1939 identifiers");
    let id = CanId::from_parts(PGN_ENGINE_TEMPERATURE_1, 6, OSSM_SOURCE_ADDRESS);
    println!(
        "   ID {:#010X}: PGN {:#06X}, priority {}, source {:#04X}\n",
        id.0,
        id.pgn(),
        id.priority(),
        id.source_address()
    );

    // ======================================================================
    // 2. Telemetry
    // ======================================================================
    println!("2. Decoding engine temperatures");
    let mut bus = SimulatedModule { rx: VecDeque::new() };
    bus.rx
        .push_back(CanFrame::new_j1939(id, [130, 60, 0x20, 0x26, 0xFF, 0xFF, 0xFF, 0xFF]));
    let mut session = ModuleSession::new(bus, TokioTimer(Instant::now()));
    if let Ok(outcome) = session.poll_telemetry().await {
        println!("   poll: {:?}", outcome);
    }
    for reading in session.snapshot().readings().iter().filter(|r| r.value().is_some()) {
        println!("   {:<10} {:>7.1} {}", reading.label, reading.raw, reading.unit);
    }
    println!();

    // ======================================================================
    // 3. Configuration
    // ======================================================================
    println!("3. Configuring the module");
    let result = session.set_pressure_preset(0, PressurePreset::Psi100).await;
    println!("   pressure preset -> {}", result_code(&result));

    match session.refresh_configuration().await {
        Ok(()) => {
            let config = session.config_state();
            println!(
                "   {} temperature inputs, {} pressure inputs, EGT {}",
                config.temp_count, config.pressure_count, config.egt_enabled
            );
            for (input, spn) in session.assignments().assigned_temperature() {
                println!("   T{}: {} ({})", input, spn_name(spn), spn);
            }
        }
        Err(e) => eprintln!("   query failed: {} (code {})", e, e.code()),
    }
}
