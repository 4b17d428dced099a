//! Run report, as JSON or for humans.

use crate::board::Observations;
use crate::error::SimError;
use crate::scenario::Scenario;
use crate::uart::{ReceivedFrame, UartCounters};
use colored::Colorize;
use pulsegen_engine::{EngineState, EngineStats, SyncStateMachine};
use pulsegen_hal::Board;
use pulsegen_timebase::ClockInput;
use serde::Serialize;
use std::fmt;

/// How a boot ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootEnding {
    /// Starved the watchdog.
    WatchdogReset,
    /// Handed over to the bootloader.
    Bootloader,
    /// Still running when the scenario ended.
    Running,
}

/// One boot of the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BootRecord {
    /// Power-on instant.
    pub started_ms: u64,
    /// Reset, hand-over or end of the scenario.
    pub ended_ms: u64,
    /// Why the boot ended.
    pub ending: BootEnding,
    /// Engine state at the end.
    pub final_state: EngineState,
    /// Selected reference, if detection finished.
    pub selected: Option<ClockInput>,
    /// Its measured frequency.
    pub measured_hz: Option<u32>,
    /// Engine counters.
    pub stats: EngineStats,
}

impl BootRecord {
    /// Summarize a boot.
    pub fn of<B: Board>(
        machine: &SyncStateMachine<B>,
        started_ms: u64,
        ended_ms: u64,
        ending: BootEnding,
    ) -> Self {
        let active = machine.active_clock();
        Self {
            started_ms,
            ended_ms,
            ending,
            final_state: machine.state(),
            selected: active.map(|clock| clock.source.input),
            measured_hz: active.map(|clock| clock.source.measured_hz),
            stats: *machine.stats(),
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Scenario label.
    pub scenario: String,
    /// Simulated time actually covered.
    pub simulated_ms: u64,
    /// Every boot, in order.
    pub boots: Vec<BootRecord>,
    /// Boots ended by the watchdog.
    pub watchdog_resets: u32,
    /// Whether the run ended in the bootloader.
    pub bootloader_entered: bool,
    /// Watchdog feeds across all boots.
    pub watchdog_feeds: u64,
    /// Receiver totals.
    pub uart: UartCounters,
    /// Seconds the legacy clock advanced, one per clean character.
    pub displayed_seconds: u64,
    /// First frames the receiver rejected.
    pub rejected: Vec<ReceivedFrame>,
}

impl Report {
    /// Assemble the report.
    #[must_use]
    pub fn new(
        scenario: &Scenario,
        simulated_ms: u64,
        boots: Vec<BootRecord>,
        observations: Observations,
    ) -> Self {
        let watchdog_resets = boots
            .iter()
            .filter(|boot| boot.ending == BootEnding::WatchdogReset)
            .count();
        Self {
            scenario: scenario.name.clone(),
            simulated_ms,
            watchdog_resets: u32::try_from(watchdog_resets).unwrap_or(u32::MAX),
            bootloader_entered: observations.bootloader_requested,
            watchdog_feeds: observations.watchdog_feeds,
            uart: observations.uart,
            displayed_seconds: observations.uart.zero_bytes,
            rejected: observations.rejected,
            boots,
        }
    }

    /// The boot running when the scenario ended.
    #[must_use]
    pub fn last_boot(&self) -> Option<&BootRecord> {
        self.boots.last()
    }

    /// Whether every character decoded and no watchdog reset occurred.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.watchdog_resets == 0 && self.uart.errors() == 0
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", "Scenario:".bold(), self.scenario)?;
        writeln!(f, "  Simulated: {} ms", self.simulated_ms)?;
        writeln!(f, "  Displayed seconds: {}", self.displayed_seconds)?;
        writeln!(f, "  Watchdog feeds: {}", self.watchdog_feeds)?;

        let errors = self.uart.errors();
        if errors == 0 {
            writeln!(f, "  Receiver: {}", "all characters clean".green())?;
        } else {
            writeln!(
                f,
                "  Receiver: {} ({} short, {} long, {} stop-bit)",
                format!("{errors} bad characters").red(),
                self.uart.too_short,
                self.uart.too_long,
                self.uart.stop_bit_violations
            )?;
        }
        if self.watchdog_resets > 0 {
            writeln!(
                f,
                "  {}",
                format!("{} watchdog resets", self.watchdog_resets).yellow()
            )?;
        }
        if self.bootloader_entered {
            writeln!(f, "  {}", "Entered bootloader".yellow())?;
        }

        writeln!(f, "{}", "Boots:".bold())?;
        for (index, boot) in self.boots.iter().enumerate() {
            let source = boot
                .selected
                .map_or_else(|| "no reference".to_string(), |input| input.to_string());
            writeln!(
                f,
                "  #{index}: {}-{} ms, {:?}, {source}, ended {:?}",
                boot.started_ms, boot.ended_ms, boot.final_state, boot.ending
            )?;
            let stats = &boot.stats;
            writeln!(
                f,
                "      pulses boot/slew/step: {}/{}/{}, taps {}, holds {}, resyncs {}",
                stats.boot_pulses,
                stats.slew_pulses,
                stats.step_pulses,
                stats.taps,
                stats.holds,
                stats.resyncs
            )?;
        }

        if !self.rejected.is_empty() {
            writeln!(f, "{}", "Rejected characters:".bold())?;
            for frame in &self.rejected {
                writeln!(
                    f,
                    "  at {} ns: low {} ns, {:?}",
                    frame.start_ns, frame.low_ns, frame.verdict
                )?;
            }
        }
        Ok(())
    }
}
