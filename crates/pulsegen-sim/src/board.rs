//! Virtual-time model of the target board.
//!
//! All handles share one [`World`]. Time moves only when firmware touches a
//! peripheral: a port read, pin write or counter read costs one busy-loop
//! iteration at the current core clock, a delay costs its length. Every
//! advance also ticks the watchdog and replays the hardware pulses the
//! counter produces while it owns the output pin, so the serial receiver sees
//! the same line the legacy clock would.

use crate::scenario::Scenario;
use crate::uart::UartMonitor;
use pulsegen_hal::{
    Board, Bootloader, BootloaderVersion, CounterInput, CycleCounter, DelayMs, DeviceInfo,
    InputPort, OutputRoute, Peripherals, PinId, PulseOutput, SystemControl, WatchdogTimer,
};
use pulsegen_pulse::{CYCLES_PER_ITERATION, INTERNAL_OSC_CORE_HZ, SerialFrame};
use pulsegen_watchdog::SoftwareWatchdog;
use std::cell::RefCell;
use std::rc::Rc;

const NS_PER_MS: u64 = 1_000_000;
const NS_PER_S: u128 = 1_000_000_000;

/// Part id of the simulated chip.
pub const SIM_PART_ID: u32 = 0x0000_8122;
/// Boot ROM version word of the simulated chip.
pub const SIM_BOOTLOADER_WORD: u32 = 0x0000_0d04;
/// Serial number of the simulated chip.
pub const SIM_UNIQUE_ID: [u32; 4] = [0x5053_4700, 0x0000_0001, 0x0000_0002, 0x0000_0003];

#[derive(Debug, Clone, Copy)]
struct Line {
    pin: PinId,
    from_ns: u64,
    until_ns: u64,
}

#[derive(Debug, Clone, Copy)]
struct Counter {
    input: CounterInput,
    limit: u32,
    match_value: u32,
    running: bool,
    anchor_count: u32,
    anchor_ns: u64,
}

impl Counter {
    fn power_on(now_ns: u64) -> Self {
        Self {
            input: CounterInput::SystemClock,
            limit: u32::MAX,
            match_value: u32::MAX,
            running: false,
            anchor_count: 0,
            anchor_ns: now_ns,
        }
    }

    fn period(&self) -> u128 {
        u128::from(self.limit) + 1
    }
}

/// Everything outside the firmware.
#[derive(Debug)]
pub struct World {
    now_ns: u64,
    core_hz: u32,
    clock_in_hz: u32,
    counter_in_hz: u32,
    lost_at_ns: Option<u64>,
    reference_lost: bool,
    presses: Vec<Line>,
    sync: Option<crate::scenario::SyncPulses>,
    counter: Counter,
    route: OutputRoute,
    uart: UartMonitor,
    watchdog: SoftwareWatchdog,
    ns_per_watchdog_tick: u64,
    watchdog_carry_ns: u64,
    feeds: u64,
    uses_clock_in: bool,
    reset_pin_enabled: bool,
    console_attached: bool,
    bootloader_requested: bool,
}

impl World {
    fn new(scenario: &Scenario) -> Self {
        let presses = scenario
            .presses
            .iter()
            .map(|press| Line {
                pin: scenario.line_of(press.button),
                from_ns: press.from_ms.saturating_mul(NS_PER_MS),
                until_ns: press.until_ms.saturating_mul(NS_PER_MS),
            })
            .collect();
        Self {
            now_ns: 0,
            core_hz: INTERNAL_OSC_CORE_HZ,
            clock_in_hz: scenario.clock_in_hz,
            counter_in_hz: scenario.counter_in_hz,
            lost_at_ns: scenario.reference_lost_ms.map(|ms| ms.saturating_mul(NS_PER_MS)),
            reference_lost: false,
            presses,
            sync: scenario.sync,
            counter: Counter::power_on(0),
            route: OutputRoute::Released,
            uart: UartMonitor::new(SerialFrame::CONSOLE),
            watchdog: SoftwareWatchdog::new(),
            ns_per_watchdog_tick: 1_000_000_000 / u64::from(scenario.watchdog_hz.max(1)),
            watchdog_carry_ns: 0,
            feeds: 0,
            uses_clock_in: false,
            reset_pin_enabled: false,
            console_attached: false,
            bootloader_requested: false,
        }
    }

    fn rate_hz(&self, input: CounterInput) -> u32 {
        match input {
            CounterInput::SystemClock if self.uses_clock_in && self.reference_lost => 0,
            CounterInput::SystemClock => self.core_hz,
            _ if self.reference_lost => 0,
            CounterInput::Pin(pin) if pin == PinId::CLOCK_IN => self.clock_in_hz,
            CounterInput::Pin(pin) if pin == PinId::COUNTER_IN => self.counter_in_hz,
            CounterInput::Pin(_) => 0,
        }
    }

    /// Counts since the anchor, unwrapped.
    fn absolute_ticks(&self, at_ns: u64) -> u128 {
        let counter = &self.counter;
        let anchor = u128::from(counter.anchor_count);
        if !counter.running {
            return anchor;
        }
        let elapsed = u128::from(at_ns.saturating_sub(counter.anchor_ns));
        anchor + elapsed * u128::from(self.rate_hz(counter.input)) / NS_PER_S
    }

    fn counter_value(&self) -> u32 {
        let wrapped = self.absolute_ticks(self.now_ns) % self.counter.period();
        u32::try_from(wrapped).unwrap_or(u32::MAX)
    }

    fn rebase(&mut self) {
        self.counter.anchor_count = self.counter_value();
        self.counter.anchor_ns = self.now_ns;
    }

    /// Instant the unwrapped count reaches `tick`.
    fn tick_time_ns(&self, tick: u128) -> u64 {
        let rate = u128::from(self.rate_hz(self.counter.input).max(1));
        let counts = tick.saturating_sub(u128::from(self.counter.anchor_count));
        let offset = (counts * NS_PER_S).div_ceil(rate);
        self.counter
            .anchor_ns
            .saturating_add(u64::try_from(offset).unwrap_or(u64::MAX))
    }

    /// Match (low) and wrap (high) edges in `(from_ns, to_ns]`.
    fn timer_edges(&self, from_ns: u64, to_ns: u64) -> Vec<(u64, bool)> {
        let mut edges = Vec::new();
        if !self.counter.running || self.rate_hz(self.counter.input) == 0 {
            return edges;
        }
        let start = self.absolute_ticks(from_ns);
        let end = self.absolute_ticks(to_ns);
        let period = self.counter.period();
        let mut base = start / period * period;
        while base <= end {
            for (tick, high) in [
                (base + u128::from(self.counter.match_value), false),
                (base + period, true),
            ] {
                if tick > start && tick <= end {
                    edges.push((self.tick_time_ns(tick), high));
                }
            }
            base += period;
        }
        edges
    }

    fn advance_to(&mut self, to_ns: u64) {
        if let Some(lost_ns) = self.lost_at_ns
            && lost_ns <= to_ns
        {
            self.advance_segment(lost_ns.max(self.now_ns));
            self.rebase();
            self.reference_lost = true;
            self.lost_at_ns = None;
        }
        self.advance_segment(to_ns);
    }

    fn advance_segment(&mut self, to_ns: u64) {
        if to_ns <= self.now_ns {
            return;
        }
        if self.route == OutputRoute::Timer {
            for (at_ns, high) in self.timer_edges(self.now_ns, to_ns) {
                self.drive(at_ns, high);
            }
        }
        self.watchdog_carry_ns += to_ns - self.now_ns;
        let ticks = self.watchdog_carry_ns / self.ns_per_watchdog_tick;
        self.watchdog_carry_ns %= self.ns_per_watchdog_tick;
        if ticks > 0 {
            self.watchdog.advance(u32::try_from(ticks).unwrap_or(u32::MAX));
        }
        self.now_ns = to_ns;
    }

    fn spend_iteration(&mut self) {
        let ns = u64::from(CYCLES_PER_ITERATION) * 1_000_000_000 / u64::from(self.core_hz.max(1));
        self.advance_to(self.now_ns + ns);
    }

    /// Drive the output line. Nothing leaves a chip held in reset.
    fn drive(&mut self, at_ns: u64, high: bool) {
        if !self.watchdog.has_expired() {
            self.uart.edge(at_ns, high);
        }
    }

    fn levels(&self) -> u32 {
        let now_ms = self.now_ns / NS_PER_MS;
        let mut levels = !PinId::SYNC_IN.mask();
        if self.sync.is_some_and(|sync| sync.is_high(now_ms)) {
            levels |= PinId::SYNC_IN.mask();
        }
        self.presses
            .iter()
            .filter(|line| line.from_ns <= self.now_ns && self.now_ns < line.until_ns)
            .fold(levels, |levels, line| levels & !line.pin.mask())
    }

    /// Put the chip back into its power-on state. Time and the outside
    /// world carry on.
    fn reboot(&mut self) {
        let now = self.now_ns;
        self.watchdog.reset();
        self.watchdog_carry_ns = 0;
        self.drive(now, true);
        self.core_hz = INTERNAL_OSC_CORE_HZ;
        self.counter = Counter::power_on(now);
        self.route = OutputRoute::Released;
        self.uses_clock_in = false;
        self.reset_pin_enabled = false;
        self.console_attached = false;
        self.bootloader_requested = false;
    }
}

/// Shared handle to the simulated board.
#[derive(Debug, Clone)]
pub struct SimBoard {
    world: Rc<RefCell<World>>,
}

impl SimBoard {
    /// Power up a board wired as `scenario` describes.
    #[must_use]
    pub fn new(scenario: &Scenario) -> Self {
        Self {
            world: Rc::new(RefCell::new(World::new(scenario))),
        }
    }

    /// Simulated time in nanoseconds.
    #[must_use]
    pub fn now_ns(&self) -> u64 {
        self.world.borrow().now_ns
    }

    /// Simulated time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ns() / NS_PER_MS
    }

    /// Whether the watchdog has fired.
    #[must_use]
    pub fn watchdog_expired(&self) -> bool {
        self.world.borrow().watchdog.has_expired()
    }

    /// Reset the chip after a watchdog expiry.
    pub fn reboot(&self) {
        self.world.borrow_mut().reboot();
    }

    /// Snapshot of what the outside world observed.
    #[must_use]
    pub fn observations(&self) -> Observations {
        let world = self.world.borrow();
        Observations {
            uart: world.uart.counters(),
            rejected: world.uart.rejected().to_vec(),
            watchdog_feeds: world.feeds,
            uses_clock_in: world.uses_clock_in,
            reset_pin_enabled: world.reset_pin_enabled,
            console_attached: world.console_attached,
            bootloader_requested: world.bootloader_requested,
        }
    }

    fn handle(&self) -> Handle {
        Handle {
            world: Rc::clone(&self.world),
        }
    }
}

/// What the bench saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observations {
    /// Receiver totals.
    pub uart: crate::uart::UartCounters,
    /// First rejected frames.
    pub rejected: Vec<crate::uart::ReceivedFrame>,
    /// Watchdog feeds across all boots.
    pub watchdog_feeds: u64,
    /// Core clock switched to the clock-in reference.
    pub uses_clock_in: bool,
    /// External reset line enabled.
    pub reset_pin_enabled: bool,
    /// Console attached to the output pin.
    pub console_attached: bool,
    /// Bootloader entry requested.
    pub bootloader_requested: bool,
}

/// One peripheral handle. The same type serves every role.
#[derive(Debug, Clone)]
pub struct Handle {
    world: Rc<RefCell<World>>,
}

impl InputPort for Handle {
    fn read(&mut self) -> u32 {
        let mut world = self.world.borrow_mut();
        world.spend_iteration();
        world.levels()
    }
}

impl PulseOutput for Handle {
    fn route(&mut self, route: OutputRoute) {
        let mut world = self.world.borrow_mut();
        let now = world.now_ns;
        // The pin idles high under every route at the instants we switch.
        world.drive(now, true);
        world.route = route;
    }

    fn set_low(&mut self) {
        let mut world = self.world.borrow_mut();
        if world.route == OutputRoute::Software {
            let now = world.now_ns;
            world.drive(now, false);
        }
        world.spend_iteration();
    }

    fn set_high(&mut self) {
        let mut world = self.world.borrow_mut();
        if world.route == OutputRoute::Software {
            let now = world.now_ns;
            world.drive(now, true);
        }
        world.spend_iteration();
    }
}

impl CycleCounter for Handle {
    fn select_input(&mut self, input: CounterInput) {
        let mut world = self.world.borrow_mut();
        world.rebase();
        world.counter.input = input;
    }

    fn set_limit(&mut self, limit: u32) {
        let mut world = self.world.borrow_mut();
        world.rebase();
        world.counter.limit = limit;
        world.counter.anchor_count = world.counter.anchor_count.min(limit);
    }

    fn set_match(&mut self, value: u32) {
        self.world.borrow_mut().counter.match_value = value;
    }

    fn count(&mut self) -> u32 {
        let mut world = self.world.borrow_mut();
        world.spend_iteration();
        world.counter_value()
    }

    fn load(&mut self, value: u32) {
        let mut world = self.world.borrow_mut();
        world.counter.anchor_count = value;
        world.counter.anchor_ns = world.now_ns;
    }

    fn halt(&mut self) {
        let mut world = self.world.borrow_mut();
        world.rebase();
        world.counter.running = false;
    }

    fn resume(&mut self) {
        let mut world = self.world.borrow_mut();
        world.rebase();
        world.counter.running = true;
    }
}

impl DelayMs for Handle {
    fn delay_ms(&mut self, ms: u32) {
        let mut world = self.world.borrow_mut();
        let to = world.now_ns + u64::from(ms) * NS_PER_MS;
        world.advance_to(to);
    }
}

impl WatchdogTimer for Handle {
    fn start(&mut self, timeout_ticks: u32) {
        self.world.borrow().watchdog.start(timeout_ticks);
    }

    fn feed(&mut self) {
        let mut world = self.world.borrow_mut();
        world.watchdog.feed();
        world.feeds += 1;
    }
}

impl SystemControl for Handle {
    fn use_clock_in(&mut self) {
        let mut world = self.world.borrow_mut();
        world.rebase();
        world.core_hz = world.clock_in_hz;
        world.uses_clock_in = true;
    }

    fn core_clock_hz(&self) -> u32 {
        self.world.borrow().core_hz
    }

    fn set_reset_pin(&mut self, enabled: bool) {
        self.world.borrow_mut().reset_pin_enabled = enabled;
    }

    fn set_console(&mut self, attached: bool) {
        self.world.borrow_mut().console_attached = attached;
    }
}

impl DeviceInfo for Handle {
    fn part_id(&mut self) -> u32 {
        SIM_PART_ID
    }

    fn bootloader_version(&mut self) -> BootloaderVersion {
        BootloaderVersion::from_word(SIM_BOOTLOADER_WORD)
    }

    fn unique_id(&mut self) -> [u32; 4] {
        SIM_UNIQUE_ID
    }
}

impl Bootloader for Handle {
    fn enter_bootloader(&mut self) {
        self.world.borrow_mut().bootloader_requested = true;
    }
}

impl Board for SimBoard {
    type Port = Handle;
    type Output = Handle;
    type Counter = Handle;
    type Delay = Handle;
    type Watchdog = Handle;
    type System = Handle;

    fn take_peripherals(&mut self) -> Peripherals<Self> {
        Peripherals {
            port: self.handle(),
            output: self.handle(),
            counter: self.handle(),
            delay: self.handle(),
            watchdog: self.handle(),
            system: self.handle(),
        }
    }
}
