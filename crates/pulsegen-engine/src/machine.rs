//! The top-level controller.
//!
//! The engine never blocks for longer than one bounded wait: every call to
//! [`SyncStateMachine::step`] performs one poll, one pulse or one delay and
//! returns. Firmware drives it from a tight loop; the simulator interleaves
//! it with its own bookkeeping. Waits that never resolve are left to the
//! watchdog, which is only fed on forward progress.

use crate::boot::DeviceBanner;
use crate::config::ClockConfig;
use crate::error::ConfigError;
use crate::feed::FeedEdge;
use crate::selection::{ActiveClock, ClockSelection};
use crate::stats::EngineStats;
use core::fmt;
use pulsegen_hal::{Board, Bootloader, DelayMs, OutputRoute, Peripherals, SystemControl};
use pulsegen_input::{
    ButtonId, ConfirmationCounter, InputController, PressClassifier, PressKind,
};
use pulsegen_pulse::{PulseEncoder, PulseProfile};
use pulsegen_timebase::{ClockInput, ClockSource, ClockSourceDetector, TimeBase, TimeBaseConfig};
use pulsegen_watchdog::WatchdogGuard;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Operating mode once booted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SyncState {
    /// Looking for a reference input.
    Detecting,
    /// Fast-forwarding while a button is held.
    Slewing,
    /// Following the time base and serving buttons.
    Tracking,
    /// Re-aligning the time base to the external sync input.
    Resyncing,
}

/// Lifecycle of one boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EngineState {
    /// Arming the watchdog and running the bootloader window.
    Booting,
    /// Control was handed to the bootloader.
    Bootloader,
    /// Normal operation.
    Running(SyncState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    PowerOn,
    BootWindow { remaining: u32 },
    Bootloader,
    Detecting,
    Slewing { pending_pulse: bool },
    /// `served` is the last button handled in the current pass.
    Tracking { served: Option<ButtonId> },
    Advancing { button: ButtonId, remaining: u32 },
    Classifying { classifier: PressClassifier },
    AwaitingRelease { button: ButtonId, release: ConfirmationCounter },
    ResyncSettling { quiet: ConfirmationCounter },
    ResyncArmed,
    ResyncReleasing { release: ConfirmationCounter },
}

impl Phase {
    fn state(self) -> EngineState {
        match self {
            Self::PowerOn | Self::BootWindow { .. } => EngineState::Booting,
            Self::Bootloader => EngineState::Bootloader,
            Self::Detecting => EngineState::Running(SyncState::Detecting),
            Self::Slewing { .. } => EngineState::Running(SyncState::Slewing),
            Self::Tracking { .. }
            | Self::Advancing { .. }
            | Self::Classifying { .. }
            | Self::AwaitingRelease { .. } => EngineState::Running(SyncState::Tracking),
            Self::ResyncSettling { .. } | Self::ResyncArmed | Self::ResyncReleasing { .. } => {
                EngineState::Running(SyncState::Resyncing)
            }
        }
    }
}

/// Detection, slewing, tracking and resync under the watchdog.
pub struct SyncStateMachine<B: Board> {
    config: ClockConfig,
    time_base_config: TimeBaseConfig,
    selection: ClockSelection,
    detector: ClockSourceDetector,
    classifier: PressClassifier,
    release: ConfirmationCounter,
    quiet: ConfirmationCounter,
    guard: WatchdogGuard<B::Watchdog>,
    time_base: TimeBase<B::Counter>,
    encoder: PulseEncoder<B::Output>,
    input: InputController<B::Port>,
    delay: B::Delay,
    system: B::System,
    active: Option<ActiveClock>,
    feed_edge: FeedEdge,
    reset_pin_released: bool,
    phase: Phase,
    stats: EngineStats,
}

impl<B: Board> SyncStateMachine<B> {
    /// Take the peripherals of one boot. No hardware is touched until the
    /// first [`SyncStateMachine::step`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(peripherals: Peripherals<B>, config: ClockConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let selection = ClockSelection::new(&config)?;
        let (_, initial_buttons) = selection.for_input(ClockInput::ClockIn);
        let Peripherals {
            port,
            output,
            counter,
            delay,
            watchdog,
            system,
        } = peripherals;

        Ok(Self {
            time_base_config: config.time_base()?,
            detector: ClockSourceDetector::new(config.detector.clone())?,
            classifier: PressClassifier::new(
                config.hold_threshold_samples,
                config.release_debounce_samples,
            )?,
            release: ConfirmationCounter::new(config.release_confirm_samples)?,
            quiet: ConfirmationCounter::new(config.resync_quiet_samples)?,
            guard: WatchdogGuard::new(watchdog, config.watchdog.to_config()?),
            time_base: TimeBase::new(counter),
            encoder: PulseEncoder::new(output),
            input: InputController::new(port, initial_buttons),
            feed_edge: FeedEdge::new(config.feed_edge_counts),
            selection,
            delay,
            system,
            config,
            active: None,
            reset_pin_released: false,
            phase: Phase::PowerOn,
            stats: EngineStats::default(),
        })
    }

    /// Advance by one poll, pulse or delay.
    pub fn step(&mut self) -> EngineState {
        self.phase = match self.phase {
            Phase::PowerOn => self.power_on(),
            Phase::BootWindow { remaining } => self.boot_window(remaining),
            Phase::Bootloader => Phase::Bootloader,
            Phase::Detecting => self.detecting(),
            Phase::Slewing { pending_pulse } => self.slewing(pending_pulse),
            Phase::Tracking { served } => self.tracking(served),
            Phase::Advancing { button, remaining } => self.advancing(button, remaining),
            Phase::Classifying { classifier } => self.classifying(classifier),
            Phase::AwaitingRelease { button, release } => self.awaiting_release(button, release),
            Phase::ResyncSettling { quiet } => self.resync_settling(quiet),
            Phase::ResyncArmed => self.resync_armed(),
            Phase::ResyncReleasing { release } => self.resync_releasing(release),
        };
        self.phase.state()
    }

    /// Step through the boot window. Returns the state boot ended in.
    pub fn boot(&mut self) -> EngineState {
        while self.state() == EngineState::Booting {
            self.step();
        }
        self.state()
    }

    fn power_on(&mut self) -> Phase {
        if let Err(err) = self.guard.arm_boot() {
            warn!("watchdog not armed: {err}");
        }
        self.encoder.route(OutputRoute::Software);
        Phase::BootWindow {
            remaining: self.config.boot_window_pulses,
        }
    }

    fn boot_window(&mut self, remaining: u32) -> Phase {
        if remaining == 0 {
            return self.finish_boot();
        }
        if self.input.is_pressed(ButtonId::Minutes) {
            info!("bootloader requested");
            if let Err(err) = self.guard.rearm_bootloader() {
                warn!("watchdog not widened for bootloader: {err}");
            }
            self.encoder.route(OutputRoute::Released);
            self.system.enter_bootloader();
            return Phase::Bootloader;
        }
        self.encoder.emit(self.config.internal_profile);
        self.guard.feed();
        self.stats.boot_pulses += 1;
        Phase::BootWindow {
            remaining: remaining - 1,
        }
    }

    fn finish_boot(&mut self) -> Phase {
        self.encoder.route(OutputRoute::Released);
        self.system.set_console(true);
        self.system.set_reset_pin(true);
        DeviceBanner::read(&mut self.system).log();
        if let Err(err) = self.guard.rearm_operational() {
            warn!("watchdog not widened: {err}");
        }
        Phase::Detecting
    }

    fn detecting(&mut self) -> Phase {
        match self.detector.scan(&mut self.time_base, &mut self.delay) {
            Some(source) => self.select(source),
            None => {
                self.stats.empty_detection_passes += 1;
                Phase::Detecting
            }
        }
    }

    fn select(&mut self, source: ClockSource) -> Phase {
        let active = self.selection.select(source);
        info!("using {}", active.source.input);
        self.system.set_console(false);
        if active.source.input.drives_core() {
            self.system.use_clock_in();
        }
        self.time_base
            .configure_with(&active.source, self.time_base_config);
        self.time_base.start();
        self.input.set_map(active.buttons);
        self.encoder.route(OutputRoute::Timer);
        self.active = Some(active);
        Phase::Slewing {
            pending_pulse: false,
        }
    }

    fn slewing(&mut self, pending_pulse: bool) -> Phase {
        if pending_pulse {
            if !self.inject_when_open() {
                return Phase::Slewing {
                    pending_pulse: true,
                };
            }
            self.stats.slew_pulses += 1;
            return Phase::Slewing {
                pending_pulse: false,
            };
        }

        self.guard.feed();
        if self.input.poll().is_empty() {
            if !self.reset_pin_released {
                self.system.set_reset_pin(false);
                self.reset_pin_released = true;
            }
            info!("tracking");
            return Phase::Tracking { served: None };
        }
        self.delay.delay_ms(self.config.slew_interval_ms);
        Phase::Slewing {
            pending_pulse: true,
        }
    }

    /// One pass serves the pressed buttons in order, re-reading the port
    /// before each. The feed edge is checked once at the start of a pass.
    fn tracking(&mut self, served: Option<ButtonId>) -> Phase {
        if served.is_none() {
            let phase = self.time_base.phase();
            if self.feed_edge.observe(phase) {
                self.guard.feed();
            }
        }

        let next = self
            .input
            .poll()
            .iter()
            .find(|button| served.is_none_or(|last| *button > last));
        let Some(button) = next else {
            return Phase::Tracking { served: None };
        };
        self.guard.feed();
        let remaining = self.input.map().step_size(button);
        debug!("{button} pressed, advancing {remaining}");
        Phase::Advancing { button, remaining }
    }

    fn advancing(&mut self, button: ButtonId, remaining: u32) -> Phase {
        if remaining > 0 {
            if !self.inject_when_open() {
                return Phase::Advancing { button, remaining };
            }
            self.stats.step_pulses += 1;
        }
        let remaining = remaining.saturating_sub(1);
        if remaining > 0 {
            return Phase::Advancing { button, remaining };
        }
        match button {
            ButtonId::Seconds => Phase::Classifying {
                classifier: self.classifier,
            },
            ButtonId::Minutes | ButtonId::Hours => Phase::AwaitingRelease {
                button,
                release: self.release,
            },
        }
    }

    fn classifying(&mut self, mut classifier: PressClassifier) -> Phase {
        let pressed = self.input.is_pressed(ButtonId::Seconds);
        let Some(kind) = classifier.observe(pressed) else {
            self.delay.delay_ms(self.config.hold_sample_interval_ms);
            return Phase::Classifying { classifier };
        };
        match kind {
            PressKind::Tap => self.stats.taps += 1,
            PressKind::Hold => self.stats.holds += 1,
        }
        info!("seconds {kind:?}, resynchronizing");
        self.time_base.stop();
        Phase::ResyncSettling { quiet: self.quiet }
    }

    fn awaiting_release(&mut self, button: ButtonId, mut release: ConfirmationCounter) -> Phase {
        let released = !self.input.is_pressed(button);
        if release.observe(released) {
            return Phase::Tracking {
                served: Some(button),
            };
        }
        Phase::AwaitingRelease { button, release }
    }

    fn resync_settling(&mut self, mut quiet: ConfirmationCounter) -> Phase {
        let snapshot = self.input.sample();
        if !snapshot.is_pressed(ButtonId::Seconds) || quiet.observe(!snapshot.sync_asserted()) {
            return Phase::ResyncArmed;
        }
        Phase::ResyncSettling { quiet }
    }

    fn resync_armed(&mut self) -> Phase {
        let snapshot = self.input.sample();
        if !snapshot.sync_asserted() && snapshot.is_pressed(ButtonId::Seconds) {
            return Phase::ResyncArmed;
        }
        let preload = self.config.resync_preload();
        self.time_base.reset(preload);
        self.time_base.start();
        debug!("time base restarted at {preload}");
        Phase::ResyncReleasing {
            release: self.release,
        }
    }

    fn resync_releasing(&mut self, mut release: ConfirmationCounter) -> Phase {
        let released = !self.input.is_pressed(ButtonId::Seconds);
        if !release.observe(released) {
            return Phase::ResyncReleasing { release };
        }
        self.stats.resyncs += 1;
        info!("resynchronized");
        Phase::Tracking {
            served: Some(ButtonId::Seconds),
        }
    }

    /// Inject one pulse if the window is open. Returns whether it did.
    fn inject_when_open(&mut self) -> bool {
        if !self.time_base.pulse_window_open() {
            self.stats.window_waits += 1;
            return false;
        }
        let profile = self.active_profile();
        self.encoder.inject(profile);
        true
    }

    /// Profile for the current core clock.
    #[must_use]
    pub fn active_profile(&self) -> PulseProfile {
        self.active
            .map_or(self.config.internal_profile, |active| active.profile)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.phase.state()
    }

    /// Current operating mode, once booted.
    #[must_use]
    pub fn sync_state(&self) -> Option<SyncState> {
        match self.phase.state() {
            EngineState::Running(state) => Some(state),
            EngineState::Booting | EngineState::Bootloader => None,
        }
    }

    /// The selected reference, once detected.
    #[must_use]
    pub fn active_clock(&self) -> Option<&ActiveClock> {
        self.active.as_ref()
    }

    /// Counters since power-on.
    #[must_use]
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// The configuration in force.
    #[must_use]
    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// The watchdog guard.
    #[must_use]
    pub fn guard(&self) -> &WatchdogGuard<B::Watchdog> {
        &self.guard
    }

    /// The time base.
    pub fn time_base_mut(&mut self) -> &mut TimeBase<B::Counter> {
        &mut self.time_base
    }

    /// Whether the reset function has been taken off the hours button.
    #[must_use]
    pub fn reset_pin_released(&self) -> bool {
        self.reset_pin_released
    }
}

impl<B: Board> fmt::Debug for SyncStateMachine<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncStateMachine")
            .field("phase", &self.phase)
            .field("active", &self.active)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
