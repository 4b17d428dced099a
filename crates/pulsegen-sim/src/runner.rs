//! Drives the engine through a scenario, rebooting it like the watchdog
//! would.

use crate::board::SimBoard;
use crate::error::SimError;
use crate::report::{BootEnding, BootRecord, Report};
use crate::scenario::Scenario;
use pulsegen_engine::{EngineState, SyncStateMachine};
use pulsegen_hal::Board;
use tracing::{info, warn};

/// Run `scenario` to completion.
///
/// # Errors
///
/// Returns an error if the scenario or its engine configuration is invalid.
pub fn run(scenario: &Scenario) -> Result<Report, SimError> {
    scenario.validate()?;
    let mut board = SimBoard::new(scenario);
    let end_ns = scenario.duration_ms.saturating_mul(1_000_000);
    let mut boots = Vec::new();
    let mut started_ms = 0;
    let mut machine = SyncStateMachine::new(board.take_peripherals(), scenario.config.clone())?;
    info!(scenario = %scenario.name, duration_ms = scenario.duration_ms, "simulation started");

    let ending = loop {
        if board.now_ns() >= end_ns {
            break BootEnding::Running;
        }
        let state = machine.step();
        if board.watchdog_expired() {
            warn!("watchdog reset at {} ms in {:?}", board.now_ms(), state);
            boots.push(BootRecord::of(
                &machine,
                started_ms,
                board.now_ms(),
                BootEnding::WatchdogReset,
            ));
            board.reboot();
            started_ms = board.now_ms();
            machine = SyncStateMachine::new(board.take_peripherals(), scenario.config.clone())?;
            continue;
        }
        if state == EngineState::Bootloader {
            info!("bootloader entered at {} ms", board.now_ms());
            break BootEnding::Bootloader;
        }
    };
    boots.push(BootRecord::of(&machine, started_ms, board.now_ms(), ending));

    Ok(Report::new(scenario, board.now_ms(), boots, board.observations()))
}
