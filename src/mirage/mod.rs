pub mod packet;
pub mod phy;
pub mod remote;

pub use phy::Phy;
pub use remote::{EchoGuard, MirageRemote, PulseTransport, StateSink};

/// Setpoint range supported by the remote, in degrees Celsius.
pub const TEMP_MIN: f32 = 16.0;
pub const TEMP_MAX: f32 = 32.0;

// The complete state carried by one remote transmission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateState {
    // Operating mode, `Off` meaning the unit is powered down
    pub mode: Mode,

    // Target temperature in Celsius. The wire format carries whole
    // degrees; out-of-range values are clamped on encode.
    pub target_temperature: f32,

    // Fan speed setting
    pub fan: FanSpeed,

    // Louver swing position
    pub swing: Swing,
}

impl Default for ClimateState {
    fn default() -> Self {
        Self {
            mode: Mode::Off,
            target_temperature: 24.0,
            fan: FanSpeed::Auto,
            swing: Swing::Off,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumIter,
    strum::AsRefStr,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    Off,
    Heat,
    Cool,
    Dry,
    FanOnly,
    HeatCool,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumIter,
    strum::AsRefStr,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum FanSpeed {
    Auto,
    Low,
    Medium,
    High,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumIter,
    strum::AsRefStr,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum Swing {
    Off,
    Vertical,
    Horizontal,
    Both,
}
