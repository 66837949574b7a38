use std::fmt;

use super::{ClimateState, FanSpeed, Mode, Swing, TEMP_MAX, TEMP_MIN};

/// One complete remote transmission: 14 bytes, no checksum.
///
/// Byte 0 is a fixed sync value, byte 1 carries the setpoint, byte 4 packs
/// the mode tag (bits 4-6) together with the fan tag (bits 0-1), and byte 5
/// holds either the power-off marker or the swing tag. The remaining bytes
/// are always zero.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Packet(pub [u8; Packet::LENGTH]);

/// Fields that an incoming packet left at their previous value because the
/// wire pattern carried no usable tag for them.
///
/// Fan and swing tags cover their whole two-bit range, so in practice only
/// `mode` (an unassigned nibble pattern) and `swing` (not transmitted in
/// power-off frames) can be retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Retained {
    pub mode: bool,
    pub fan: bool,
    pub swing: bool,
}

impl Packet {
    pub const LENGTH: usize = 14;

    const HEADER: u8 = 0x56;
    const TEMP_OFFSET: u8 = 0x5C;

    // Byte 5 value marking the unit as powered down. Takes priority over
    // the mode nibble when reading a frame.
    const POWER_OFF: u8 = 0xC1;

    // Modes, byte 4 bits 4-6
    const MODE_MASK: u8 = 0x70;
    const MODE_HEAT: u8 = 0x10;
    const MODE_COOL: u8 = 0x20;
    const MODE_DRY: u8 = 0x30;
    const MODE_AUTO: u8 = 0x40;
    const MODE_FAN: u8 = 0x50;

    // Fan speeds, byte 4 bits 0-1
    const FAN_MASK: u8 = 0x03;
    const FAN_AUTO: u8 = 0;
    const FAN_HIGH: u8 = 1;
    const FAN_LOW: u8 = 2;
    const FAN_MED: u8 = 3;

    // Swing positions, byte 5 bits 0-1
    const SWING_MASK: u8 = 0x03;
    const SWING_OFF: u8 = 0x00;
    const SWING_HORIZONTAL: u8 = 0x01;
    const SWING_VERTICAL: u8 = 0x02;
    const SWING_BOTH: u8 = 0x03;

    pub fn new() -> Self {
        let mut bytes = [0; Packet::LENGTH];
        bytes[0] = Packet::HEADER;
        bytes[1] = Packet::TEMP_OFFSET;
        Packet(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; Packet::LENGTH] {
        &self.0
    }

    pub fn header_valid(&self) -> bool {
        self.0[0] == Packet::HEADER
    }

    // Returns the setpoint in Celsius as carried on the wire. A sender
    // violating the protocol yields an out-of-range value here; the caller
    // decides whether to re-validate.
    pub fn temperature(&self) -> u8 {
        self.0[1].wrapping_sub(Packet::TEMP_OFFSET)
    }

    pub fn set_temperature(&mut self, celsius: f32) {
        let celsius = celsius.clamp(TEMP_MIN, TEMP_MAX).round() as u8;
        self.0[1] = Packet::TEMP_OFFSET + celsius;
    }

    pub fn power_off(&self) -> bool {
        self.0[5] == Packet::POWER_OFF
    }

    // Returns None for a nibble pattern with no assigned mode.
    pub fn mode(&self) -> Option<Mode> {
        Some(match self.0[4] & Packet::MODE_MASK {
            Packet::MODE_HEAT => Mode::Heat,
            Packet::MODE_COOL => Mode::Cool,
            Packet::MODE_DRY => Mode::Dry,
            Packet::MODE_AUTO => Mode::HeatCool,
            Packet::MODE_FAN => Mode::FanOnly,
            _ => return None,
        })
    }

    pub fn set_mode(&mut self, mode: Mode) {
        let tag = match mode {
            Mode::Off => {
                self.0[5] = Packet::POWER_OFF;
                return;
            }
            Mode::Heat => Packet::MODE_HEAT,
            Mode::Cool => Packet::MODE_COOL,
            Mode::Dry => Packet::MODE_DRY,
            Mode::HeatCool => Packet::MODE_AUTO,
            Mode::FanOnly => Packet::MODE_FAN,
        };
        self.0[4] = (self.0[4] & !Packet::MODE_MASK) | tag;
    }

    // Tag 0 is auto and doubles as the fallback, so this is total.
    pub fn fan(&self) -> FanSpeed {
        match self.0[4] & Packet::FAN_MASK {
            Packet::FAN_HIGH => FanSpeed::High,
            Packet::FAN_LOW => FanSpeed::Low,
            Packet::FAN_MED => FanSpeed::Medium,
            _ => FanSpeed::Auto,
        }
    }

    pub fn set_fan(&mut self, fan: FanSpeed) {
        let tag = match fan {
            FanSpeed::Auto => Packet::FAN_AUTO,
            FanSpeed::High => Packet::FAN_HIGH,
            FanSpeed::Low => Packet::FAN_LOW,
            FanSpeed::Medium => Packet::FAN_MED,
        };
        self.0[4] = (self.0[4] & !Packet::FAN_MASK) | tag;
    }

    pub fn swing(&self) -> Swing {
        match self.0[5] & Packet::SWING_MASK {
            Packet::SWING_HORIZONTAL => Swing::Horizontal,
            Packet::SWING_VERTICAL => Swing::Vertical,
            Packet::SWING_BOTH => Swing::Both,
            _ => Swing::Off,
        }
    }

    pub fn set_swing(&mut self, swing: Swing) {
        let tag = match swing {
            Swing::Off => Packet::SWING_OFF,
            Swing::Horizontal => Packet::SWING_HORIZONTAL,
            Swing::Vertical => Packet::SWING_VERTICAL,
            Swing::Both => Packet::SWING_BOTH,
        };
        self.0[5] = (self.0[5] & !Packet::SWING_MASK) | tag;
    }

    /// Applies this packet to an existing state, overwriting only the
    /// fields it carries a usable value for. Returns which fields were
    /// left untouched.
    pub fn apply_to(&self, state: &mut ClimateState) -> Retained {
        let mut retained = Retained::default();

        if self.power_off() {
            state.mode = Mode::Off;
            // The power-off marker replaces the swing tag in byte 5, so
            // the packet says nothing about the louver position.
            retained.swing = true;
        } else {
            match self.mode() {
                Some(mode) => state.mode = mode,
                None => retained.mode = true,
            }
            state.swing = self.swing();
        }

        state.target_temperature = f32::from(self.temperature());
        state.fan = self.fan();

        retained
    }
}

impl Default for Packet {
    fn default() -> Self {
        Packet::new()
    }
}

impl From<&ClimateState> for Packet {
    fn from(state: &ClimateState) -> Self {
        let mut packet = Packet::new();
        packet.set_temperature(state.target_temperature);
        packet.set_fan(state.fan);
        packet.set_mode(state.mode);
        // A power-off frame carries the marker where the swing tag would
        // go, so the louver position is only written for powered frames.
        if state.mode != Mode::Off {
            packet.set_swing(state.swing);
        }
        packet
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}
