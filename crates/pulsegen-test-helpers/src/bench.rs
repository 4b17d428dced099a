//! A scripted fake board driven by a virtual clock.
//!
//! Every handle shares one [`Bench`]. Time only moves when firmware code
//! touches a peripheral: a port read or a pin write costs one busy-loop
//! iteration at the current core clock, a delay costs its length. The counter
//! is derived from elapsed time and the rate of whatever it is counting, so
//! frequency measurement and phase gating behave as on hardware.

use pulsegen_hal::{
    Board, Bootloader, BootloaderVersion, CounterInput, CycleCounter, DelayMs, DeviceInfo,
    InputPort, OutputRoute, Peripherals, PinId, PulseOutput, SystemControl, WatchdogTimer,
};
use std::cell::RefCell;
use std::rc::Rc;

const NS_PER_MS: u64 = 1_000_000;
const NS_PER_S: u128 = 1_000_000_000;
const INTERNAL_OSC_HZ: u32 = 30_000_000;
const CYCLES_PER_ITERATION: u64 = 13;

/// Part id reported by the fake.
pub const FAKE_PART_ID: u32 = 0x0000_8122;
/// Serial number reported by the fake.
pub const FAKE_UNIQUE_ID: [u32; 4] = [0x0001_0203, 0x0405_0607, 0x0809_0a0b, 0x0c0d_0e0f];

/// Iteration counts of one software pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PulseShape {
    /// `set_low` calls in the low phase.
    pub low_iterations: u32,
    /// `set_high` calls after it.
    pub high_iterations: u32,
}

#[derive(Debug, Clone, Copy)]
struct LineOverride {
    pin: PinId,
    from_ns: u64,
    until_ns: u64,
    high: bool,
}

#[derive(Debug)]
struct CounterModel {
    input: CounterInput,
    limit: u32,
    match_value: u32,
    running: bool,
    anchor_count: u32,
    anchor_ns: u64,
    loads: Vec<u32>,
}

#[derive(Debug)]
struct BenchState {
    now_ns: u64,
    core_clock_hz: u32,
    clock_in_hz: u32,
    counter_in_hz: u32,
    idle_levels: u32,
    overrides: Vec<LineOverride>,
    port_reads: u64,
    counter: CounterModel,
    route: OutputRoute,
    route_log: Vec<OutputRoute>,
    line_low: bool,
    shapes: Vec<PulseShape>,
    watchdog_starts: Vec<u32>,
    feed_times_ns: Vec<u64>,
    uses_clock_in: bool,
    reset_pin_log: Vec<bool>,
    console_log: Vec<bool>,
    bootloader_requests: u32,
}

impl BenchState {
    fn new() -> Self {
        Self {
            now_ns: 0,
            core_clock_hz: INTERNAL_OSC_HZ,
            clock_in_hz: 0,
            counter_in_hz: 0,
            idle_levels: !PinId::SYNC_IN.mask(),
            overrides: Vec::new(),
            port_reads: 0,
            counter: CounterModel {
                input: CounterInput::SystemClock,
                limit: u32::MAX,
                match_value: u32::MAX,
                running: false,
                anchor_count: 0,
                anchor_ns: 0,
                loads: Vec::new(),
            },
            route: OutputRoute::Released,
            route_log: Vec::new(),
            line_low: false,
            shapes: Vec::new(),
            watchdog_starts: Vec::new(),
            feed_times_ns: Vec::new(),
            uses_clock_in: false,
            reset_pin_log: Vec::new(),
            console_log: Vec::new(),
            bootloader_requests: 0,
        }
    }

    fn spend_iteration(&mut self) {
        let hz = u64::from(self.core_clock_hz.max(1));
        self.now_ns += CYCLES_PER_ITERATION * 1_000_000_000 / hz;
    }

    fn rate_hz(&self, input: CounterInput) -> u32 {
        match input {
            CounterInput::SystemClock => self.core_clock_hz,
            CounterInput::Pin(pin) if pin == PinId::CLOCK_IN => self.clock_in_hz,
            CounterInput::Pin(pin) if pin == PinId::COUNTER_IN => self.counter_in_hz,
            CounterInput::Pin(_) => 0,
        }
    }

    fn counter_value(&self) -> u32 {
        let counter = &self.counter;
        if !counter.running {
            return counter.anchor_count;
        }
        let elapsed = u128::from(self.now_ns - counter.anchor_ns);
        let ticks = elapsed * u128::from(self.rate_hz(counter.input)) / NS_PER_S;
        let total = u128::from(counter.anchor_count) + ticks;
        let modulus = u128::from(counter.limit) + 1;
        (total % modulus) as u32
    }

    fn rebase(&mut self) {
        self.counter.anchor_count = self.counter_value();
        self.counter.anchor_ns = self.now_ns;
    }

    fn levels(&self) -> u32 {
        self.overrides
            .iter()
            .filter(|o| o.from_ns <= self.now_ns && self.now_ns < o.until_ns)
            .fold(self.idle_levels, |levels, o| {
                if o.high {
                    levels | o.pin.mask()
                } else {
                    levels & !o.pin.mask()
                }
            })
    }
}

/// Shared handle to the fake board's state.
#[derive(Debug, Clone)]
pub struct Bench {
    state: Rc<RefCell<BenchState>>,
}

impl Bench {
    /// A board with no reference signals and all buttons released.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(BenchState::new())),
        }
    }

    /// Drive the clock-in reference at `hz`.
    pub fn with_clock_in_hz(self, hz: u32) -> Self {
        self.state.borrow_mut().clock_in_hz = hz;
        self
    }

    /// Drive the counter-in reference at `hz`.
    pub fn with_counter_in_hz(self, hz: u32) -> Self {
        self.state.borrow_mut().counter_in_hz = hz;
        self
    }

    /// Hold an active-low button on `pin` between two instants.
    pub fn press(&self, pin: PinId, from_ms: u64, until_ms: u64) {
        self.override_line(pin, from_ms, until_ms, false);
    }

    /// Drive an active-high line, such as the sync input, between two instants.
    pub fn drive_high(&self, pin: PinId, from_ms: u64, until_ms: u64) {
        self.override_line(pin, from_ms, until_ms, true);
    }

    fn override_line(&self, pin: PinId, from_ms: u64, until_ms: u64, high: bool) {
        self.state.borrow_mut().overrides.push(LineOverride {
            pin,
            from_ns: from_ms * NS_PER_MS,
            until_ns: until_ms * NS_PER_MS,
            high,
        });
    }

    /// Let time pass without any firmware activity.
    pub fn advance_ms(&self, ms: u64) {
        self.state.borrow_mut().now_ns += ms * NS_PER_MS;
    }

    /// Virtual time in nanoseconds.
    pub fn now_ns(&self) -> u64 {
        self.state.borrow().now_ns
    }

    /// Virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ns() / NS_PER_MS
    }

    /// Board view handing out this bench's peripherals.
    pub fn board(&self) -> FakeBoard {
        FakeBoard {
            bench: self.clone(),
        }
    }

    /// Port handle.
    pub fn port(&self) -> FakePort {
        FakePort {
            bench: self.clone(),
        }
    }

    /// Pulse output handle.
    pub fn output(&self) -> FakeOutput {
        FakeOutput {
            bench: self.clone(),
        }
    }

    /// Counter handle.
    pub fn counter(&self) -> FakeCounter {
        FakeCounter {
            bench: self.clone(),
        }
    }

    /// Delay handle.
    pub fn delay(&self) -> FakeDelay {
        FakeDelay {
            bench: self.clone(),
        }
    }

    /// Watchdog handle.
    pub fn watchdog(&self) -> FakeWatchdog {
        FakeWatchdog {
            bench: self.clone(),
        }
    }

    /// System handle.
    pub fn system(&self) -> FakeSystem {
        FakeSystem {
            bench: self.clone(),
        }
    }

    /// Software pulses emitted so far.
    pub fn software_pulses(&self) -> usize {
        self.state.borrow().shapes.len()
    }

    /// Shape of every software pulse, in order.
    pub fn pulse_shapes(&self) -> Vec<PulseShape> {
        self.state.borrow().shapes.clone()
    }

    /// Every route change, in order.
    pub fn route_log(&self) -> Vec<OutputRoute> {
        self.state.borrow().route_log.clone()
    }

    /// Current output route.
    pub fn route(&self) -> OutputRoute {
        self.state.borrow().route
    }

    /// Number of port reads.
    pub fn port_reads(&self) -> u64 {
        self.state.borrow().port_reads
    }

    /// Current counter value.
    pub fn counter_value(&self) -> u32 {
        self.state.borrow().counter_value()
    }

    /// Whether the counter is counting.
    pub fn counter_running(&self) -> bool {
        self.state.borrow().counter.running
    }

    /// Counter limit and match programming.
    pub fn counter_programming(&self) -> (u32, u32) {
        let state = self.state.borrow();
        (state.counter.limit, state.counter.match_value)
    }

    /// What the counter counts.
    pub fn counter_input(&self) -> CounterInput {
        self.state.borrow().counter.input
    }

    /// Every value forced into the counter, in order.
    pub fn counter_loads(&self) -> Vec<u32> {
        self.state.borrow().counter.loads.clone()
    }

    /// Every watchdog start, with its timeout.
    pub fn watchdog_starts(&self) -> Vec<u32> {
        self.state.borrow().watchdog_starts.clone()
    }

    /// Number of watchdog feeds.
    pub fn feeds(&self) -> usize {
        self.state.borrow().feed_times_ns.len()
    }

    /// Virtual time of every feed.
    pub fn feed_times_ns(&self) -> Vec<u64> {
        self.state.borrow().feed_times_ns.clone()
    }

    /// Whether the core clock was switched to clock-in.
    pub fn uses_clock_in(&self) -> bool {
        self.state.borrow().uses_clock_in
    }

    /// Every reset-pin enable/disable, in order.
    pub fn reset_pin_log(&self) -> Vec<bool> {
        self.state.borrow().reset_pin_log.clone()
    }

    /// Every console attach/detach, in order.
    pub fn console_log(&self) -> Vec<bool> {
        self.state.borrow().console_log.clone()
    }

    /// Number of bootloader entries requested.
    pub fn bootloader_requests(&self) -> u32 {
        self.state.borrow().bootloader_requests
    }
}

impl Default for Bench {
    fn default() -> Self {
        Self::new()
    }
}

/// Port 0 snapshot following the scripted line overrides.
#[derive(Debug, Clone)]
pub struct FakePort {
    bench: Bench,
}

impl InputPort for FakePort {
    fn read(&mut self) -> u32 {
        let mut state = self.bench.state.borrow_mut();
        state.spend_iteration();
        state.port_reads += 1;
        state.levels()
    }
}

/// Pulse output recording the shape of software pulses.
#[derive(Debug, Clone)]
pub struct FakeOutput {
    bench: Bench,
}

impl PulseOutput for FakeOutput {
    fn route(&mut self, route: OutputRoute) {
        let mut state = self.bench.state.borrow_mut();
        state.route = route;
        state.route_log.push(route);
        state.line_low = false;
    }

    fn set_low(&mut self) {
        let mut state = self.bench.state.borrow_mut();
        state.spend_iteration();
        if state.route != OutputRoute::Software {
            return;
        }
        if !state.line_low {
            state.line_low = true;
            state.shapes.push(PulseShape::default());
        }
        if let Some(shape) = state.shapes.last_mut() {
            shape.low_iterations += 1;
        }
    }

    fn set_high(&mut self) {
        let mut state = self.bench.state.borrow_mut();
        state.spend_iteration();
        if state.route != OutputRoute::Software {
            return;
        }
        state.line_low = false;
        if let Some(shape) = state.shapes.last_mut() {
            shape.high_iterations += 1;
        }
    }
}

/// Counter derived from virtual time.
#[derive(Debug, Clone)]
pub struct FakeCounter {
    bench: Bench,
}

impl CycleCounter for FakeCounter {
    fn select_input(&mut self, input: CounterInput) {
        let mut state = self.bench.state.borrow_mut();
        state.rebase();
        state.counter.input = input;
    }

    fn set_limit(&mut self, limit: u32) {
        let mut state = self.bench.state.borrow_mut();
        state.rebase();
        state.counter.limit = limit;
        state.counter.anchor_count = state.counter.anchor_count.min(limit);
    }

    fn set_match(&mut self, value: u32) {
        self.bench.state.borrow_mut().counter.match_value = value;
    }

    fn count(&mut self) -> u32 {
        let mut state = self.bench.state.borrow_mut();
        state.spend_iteration();
        state.counter_value()
    }

    fn load(&mut self, value: u32) {
        let mut state = self.bench.state.borrow_mut();
        state.counter.anchor_count = value;
        state.counter.anchor_ns = state.now_ns;
        state.counter.loads.push(value);
    }

    fn halt(&mut self) {
        let mut state = self.bench.state.borrow_mut();
        state.rebase();
        state.counter.running = false;
    }

    fn resume(&mut self) {
        let mut state = self.bench.state.borrow_mut();
        state.rebase();
        state.counter.running = true;
    }
}

/// Delay that moves virtual time.
#[derive(Debug, Clone)]
pub struct FakeDelay {
    bench: Bench,
}

impl DelayMs for FakeDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.bench.advance_ms(u64::from(ms));
    }
}

/// Watchdog recording starts and feeds. It never fires.
#[derive(Debug, Clone)]
pub struct FakeWatchdog {
    bench: Bench,
}

impl WatchdogTimer for FakeWatchdog {
    fn start(&mut self, timeout_ticks: u32) {
        self.bench
            .state
            .borrow_mut()
            .watchdog_starts
            .push(timeout_ticks);
    }

    fn feed(&mut self) {
        let mut state = self.bench.state.borrow_mut();
        let now = state.now_ns;
        state.feed_times_ns.push(now);
    }
}

/// Clock tree, reset pin, console and ISP recorder.
#[derive(Debug, Clone)]
pub struct FakeSystem {
    bench: Bench,
}

impl SystemControl for FakeSystem {
    fn use_clock_in(&mut self) {
        let mut state = self.bench.state.borrow_mut();
        state.rebase();
        state.core_clock_hz = state.clock_in_hz;
        state.uses_clock_in = true;
    }

    fn core_clock_hz(&self) -> u32 {
        self.bench.state.borrow().core_clock_hz
    }

    fn set_reset_pin(&mut self, enabled: bool) {
        self.bench.state.borrow_mut().reset_pin_log.push(enabled);
    }

    fn set_console(&mut self, attached: bool) {
        self.bench.state.borrow_mut().console_log.push(attached);
    }
}

impl DeviceInfo for FakeSystem {
    fn part_id(&mut self) -> u32 {
        FAKE_PART_ID
    }

    fn bootloader_version(&mut self) -> BootloaderVersion {
        BootloaderVersion::from_word(0x0d04)
    }

    fn unique_id(&mut self) -> [u32; 4] {
        FAKE_UNIQUE_ID
    }
}

impl Bootloader for FakeSystem {
    fn enter_bootloader(&mut self) {
        self.bench.state.borrow_mut().bootloader_requests += 1;
    }
}

/// [`Board`] over a [`Bench`].
#[derive(Debug, Clone)]
pub struct FakeBoard {
    bench: Bench,
}

impl FakeBoard {
    /// The bench behind this board.
    pub fn bench(&self) -> &Bench {
        &self.bench
    }
}

impl Board for FakeBoard {
    type Port = FakePort;
    type Output = FakeOutput;
    type Counter = FakeCounter;
    type Delay = FakeDelay;
    type Watchdog = FakeWatchdog;
    type System = FakeSystem;

    fn take_peripherals(&mut self) -> Peripherals<Self> {
        Peripherals {
            port: self.bench.port(),
            output: self.bench.output(),
            counter: self.bench.counter(),
            delay: self.bench.delay(),
            watchdog: self.bench.watchdog(),
            system: self.bench.system(),
        }
    }
}
