use crate::pwm::{CodecError, DistanceCodec, Rule};

use std::time::Duration;

use thiserror::Error;

use super::packet::Packet;

// Frame timings as measured from the factory remote
const HEADER_MARK: Duration = Duration::from_micros(8360);
const HEADER_SPACE: Duration = Duration::from_micros(4248);
const BIT_MARK: Duration = Duration::from_micros(554);
const ONE_SPACE: Duration = Duration::from_micros(1592);
const ZERO_SPACE: Duration = Duration::from_micros(545);

#[derive(Error, Debug, Copy, Clone)]
pub enum PhyError {
    #[error("modulation error: {0}")]
    Modulation(#[from] CodecError),
    #[error("bad frame sync byte: {0:#04x}")]
    BadSync(u8),
}

pub struct Phy {
    codec: DistanceCodec,
}

impl Phy {
    pub fn new() -> Self {
        let codec = DistanceCodec {
            header_mark: Rule::new(HEADER_MARK),
            header_space: Rule::new(HEADER_SPACE),
            bit_mark: Rule::new(BIT_MARK),
            one_space: Rule::new(ONE_SPACE),
            zero_space: Rule::new(ZERO_SPACE),
        };

        Self { codec }
    }

    pub fn encode(&self, packet: &Packet) -> Vec<Duration> {
        self.codec.encode(packet.as_bytes())
    }

    /// Demodulates one frame and checks its sync byte. Everything after the
    /// payload bits (trailing mark, receiver gap artifacts) is ignored.
    pub fn decode(&self, pulses: impl Iterator<Item = Duration>) -> Result<Packet, PhyError> {
        let mut bytes = [0u8; Packet::LENGTH];
        self.codec.decode(pulses, &mut bytes)?;

        let packet = Packet(bytes);
        if !packet.header_valid() {
            return Err(PhyError::BadSync(packet.as_bytes()[0]));
        }
        Ok(packet)
    }
}

impl Default for Phy {
    fn default() -> Self {
        Phy::new()
    }
}
