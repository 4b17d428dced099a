//! Board aggregation of all peripheral handles.

use crate::counter::CycleCounter;
use crate::io::{InputPort, PulseOutput};
use crate::system::{Bootloader, DelayMs, DeviceInfo, SystemControl, WatchdogTimer};

/// A board names one concrete handle type per peripheral.
///
/// Dispatch is static; the engine is generic over `B: Board`.
pub trait Board {
    /// Port 0 level snapshot.
    type Port: InputPort;
    /// Pulse output pin.
    type Output: PulseOutput;
    /// Time base counter.
    type Counter: CycleCounter;
    /// Millisecond delay.
    type Delay: DelayMs;
    /// Deadman timer.
    type Watchdog: WatchdogTimer;
    /// Clock tree, reset pin, console and ISP access.
    type System: SystemControl + DeviceInfo + Bootloader;

    /// Hand out the peripheral handles. Called once per boot.
    fn take_peripherals(&mut self) -> Peripherals<Self>;
}

/// Owned set of peripheral handles for one boot of the firmware.
pub struct Peripherals<B: Board + ?Sized> {
    /// Port 0 level snapshot.
    pub port: B::Port,
    /// Pulse output pin.
    pub output: B::Output,
    /// Time base counter.
    pub counter: B::Counter,
    /// Millisecond delay.
    pub delay: B::Delay,
    /// Deadman timer.
    pub watchdog: B::Watchdog,
    /// Clock tree, reset pin, console and ISP access.
    pub system: B::System,
}

impl<B: Board + ?Sized> core::fmt::Debug for Peripherals<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Peripherals").finish_non_exhaustive()
    }
}
