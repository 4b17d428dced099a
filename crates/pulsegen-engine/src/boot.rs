//! Boot banner.

use pulsegen_hal::{BootloaderVersion, DeviceInfo, SystemControl};
use tracing::info;

/// Chip identity printed at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceBanner {
    /// Part identification number.
    pub part_id: u32,
    /// Boot ROM version.
    pub bootloader_version: BootloaderVersion,
    /// Device serial number.
    pub unique_id: [u32; 4],
    /// Core clock at the time of the banner.
    pub core_clock_hz: u32,
}

impl DeviceBanner {
    /// Query the chip.
    pub fn read<S: DeviceInfo + SystemControl>(system: &mut S) -> Self {
        Self {
            part_id: system.part_id(),
            bootloader_version: system.bootloader_version(),
            unique_id: system.unique_id(),
            core_clock_hz: system.core_clock_hz(),
        }
    }

    /// Emit the banner on the diagnostic log.
    pub fn log(&self) {
        let [a, b, c, d] = self.unique_id;
        info!("pulsegen clock retrofit {}", env!("CARGO_PKG_VERSION"));
        info!("part id: {:#x}", self.part_id);
        info!("bootloader version: {}", self.bootloader_version);
        info!("uid = [{a:#010x}, {b:#010x}, {c:#010x}, {d:#010x}]");
        info!("core clock = {} Hz", self.core_clock_hz);
    }
}
