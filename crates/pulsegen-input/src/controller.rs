//! Port polling.

use crate::button::{ButtonId, ButtonMap, PressedButtons};
use pulsegen_hal::{InputPort, PinId};

/// One read of the input port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSnapshot {
    levels: u32,
    pressed: PressedButtons,
    sync: bool,
}

impl InputSnapshot {
    /// Decode raw port levels against a button map.
    #[must_use]
    pub fn decode(levels: u32, map: &ButtonMap, sync_pin: PinId) -> Self {
        let pressed = map
            .iter()
            .filter(|button| levels & button.input_mask == 0)
            .map(|button| button.id)
            .collect();
        Self {
            levels,
            pressed,
            sync: sync_pin.is_high(levels),
        }
    }

    /// Buttons pressed in this snapshot.
    #[must_use]
    pub fn pressed(&self) -> PressedButtons {
        self.pressed
    }

    /// Whether `id` is pressed.
    #[must_use]
    pub fn is_pressed(&self, id: ButtonId) -> bool {
        self.pressed.contains(id)
    }

    /// Whether the sync input is high.
    #[must_use]
    pub fn sync_asserted(&self) -> bool {
        self.sync
    }

    /// Raw port levels.
    #[must_use]
    pub fn levels(&self) -> u32 {
        self.levels
    }
}

/// Reads buttons and the sync input through the port handle.
#[derive(Debug)]
pub struct InputController<P: InputPort> {
    port: P,
    map: ButtonMap,
    sync_pin: PinId,
}

impl<P: InputPort> InputController<P> {
    /// Poll `port` with `map`, sync on the board's sync line.
    pub fn new(port: P, map: ButtonMap) -> Self {
        Self {
            port,
            map,
            sync_pin: PinId::SYNC_IN,
        }
    }

    /// Read the port once.
    pub fn sample(&mut self) -> InputSnapshot {
        InputSnapshot::decode(self.port.read(), &self.map, self.sync_pin)
    }

    /// Currently pressed buttons.
    pub fn poll(&mut self) -> PressedButtons {
        self.sample().pressed()
    }

    /// Whether `id` is pressed right now.
    pub fn is_pressed(&mut self, id: ButtonId) -> bool {
        self.sample().is_pressed(id)
    }

    /// Whether the sync input is high right now.
    pub fn sync_asserted(&mut self) -> bool {
        self.sample().sync_asserted()
    }

    /// Button bindings.
    #[must_use]
    pub fn map(&self) -> &ButtonMap {
        &self.map
    }

    /// Rebind the buttons, for instance after the seconds line moves.
    pub fn set_map(&mut self, map: ButtonMap) {
        self.map = map;
    }

    /// The wrapped port.
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;

    #[test]
    fn test_decode_active_low_buttons() -> Result<(), InputError> {
        let map = ButtonMap::new(PinId::CLOCK_IN)?;
        let levels = !(PinId::CLOCK_IN.mask() | PinId::HOURS.mask());
        let snapshot = InputSnapshot::decode(levels, &map, PinId::SYNC_IN);

        assert!(snapshot.is_pressed(ButtonId::Seconds));
        assert!(!snapshot.is_pressed(ButtonId::Minutes));
        assert!(snapshot.is_pressed(ButtonId::Hours));
        assert!(snapshot.sync_asserted());
        Ok(())
    }

    #[test]
    fn test_decode_idle_port() -> Result<(), InputError> {
        let map = ButtonMap::new(PinId::COUNTER_IN)?;
        let snapshot = InputSnapshot::decode(!PinId::SYNC_IN.mask(), &map, PinId::SYNC_IN);
        assert!(snapshot.pressed().is_empty());
        assert!(!snapshot.sync_asserted());
        Ok(())
    }
}
