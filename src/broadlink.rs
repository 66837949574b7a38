use std::time::Duration;

/**
 * Encoding/decoding of pulse recordings in the broadlink remote format.
 * Payload format from: https://github.com/mjg59/python-broadlink/blob/master/protocol.md
 */
use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

// Pulse lengths on the wire are expressed in 2^-15 second ticks.
fn to_ticks(pulse: Duration) -> u16 {
    // Round through float to avoid rounding errors in conversion
    (pulse.as_micros() as f64 * 269.0 / 8192.0).round() as u16
}

fn from_ticks(ticks: u16) -> Duration {
    // Round through float to avoid rounding errors in conversion
    Duration::from_nanos((f64::from(ticks) * 8192000.0 / 269.0).round() as u64)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transport {
    Ir = 0x26,
    Rf433 = 0xb2,
    Rf315 = 0xd7,
}

impl TryFrom<u8> for Transport {
    type Error = ParseError;

    fn try_from(marker: u8) -> Result<Self, ParseError> {
        match marker {
            0x26 => Ok(Transport::Ir),
            0xb2 => Ok(Transport::Rf433),
            0xd7 => Ok(Transport::Rf315),
            other => Err(ParseError::InvalidTransport(other)),
        }
    }
}

/*
Offset  Contents
0x00    0x26 = IR, 0xb2 for RF 433Mhz, 0xd7 for RF 315Mhz
0x01    repeat count, (0 = no repeat, 1 send twice, .....)
0x02-03 Length of the following data in little endian
0x04... Pulse lengths in ticks, one byte each; 0x00 escapes a u16_be value
....    For IR codes, the pulse lengths should be paired as ON, OFF
 */
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recording {
    pub repeat_count: u8,
    pub transport: Transport,
    // On-off pulse durations
    pub pulses: Vec<Duration>,
}

#[derive(Error, Debug, Copy, Clone)]
pub enum ParseError {
    #[error("invalid transport type: {0:#04x}")]
    InvalidTransport(u8),

    #[error("message too short to carry a header")]
    Truncated,
}

impl Recording {
    pub fn new_ir(pulses: Vec<Duration>) -> Self {
        Self {
            repeat_count: 0,
            transport: Transport::Ir,
            pulses,
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut payload = BytesMut::new();
        for &pulse in &self.pulses {
            let ticks = to_ticks(pulse);
            match u8::try_from(ticks) {
                Ok(byte) => payload.put_u8(byte),
                // Escaped as 0x00 followed by the big-endian value
                Err(_) => {
                    payload.put_u8(0);
                    payload.put_u16(ticks);
                }
            }
        }

        let mut out = BytesMut::with_capacity(4 + payload.len());
        out.put_u8(self.transport as u8);
        out.put_u8(self.repeat_count);
        out.put_u16_le(payload.len() as u16);
        out.put(payload);
        out.freeze()
    }

    pub fn from_bytes(mut buf: Bytes) -> Result<Self, ParseError> {
        if buf.len() < 4 {
            return Err(ParseError::Truncated);
        }

        let transport = Transport::try_from(buf.get_u8())?;
        let repeat_count = buf.get_u8();
        let payload_len = buf.get_u16_le() as usize;

        let mut pulses = Vec::new();
        let mut remain = payload_len.min(buf.len());
        while remain > 0 {
            let mut ticks = u16::from(buf.get_u8());
            remain -= 1;

            if ticks == 0 {
                // Escape marker: the real value follows as a u16_be
                if remain < 2 {
                    break;
                }
                ticks = buf.get_u16();
                remain -= 2;
            }

            pulses.push(from_ticks(ticks));
        }

        // Captures sometimes lose the final off pulse; restore the pairing
        if pulses.len() % 2 != 0 {
            pulses.push(Duration::from_millis(100));
        }

        Ok(Recording {
            repeat_count,
            transport,
            pulses,
        })
    }

    pub fn to_raw_format(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        for (i, pulse) in self.pulses.iter().enumerate() {
            let sign = if i % 2 == 0 { '+' } else { '-' };
            write!(out, "{}{} ", sign, pulse.as_micros()).unwrap();
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_decode() {
        // two pulses: 18 ticks (~548us) and 51 ticks (~1553us)
        let message = Bytes::copy_from_slice(&hex!("260002001233"));

        let decoded = Recording::from_bytes(message.clone()).unwrap();
        assert_eq!(decoded.transport, Transport::Ir);
        assert_eq!(decoded.repeat_count, 0);
        assert_eq!(decoded.pulses.len(), 2);
        assert_eq!(decoded.pulses[0].as_micros(), 548);
        assert_eq!(decoded.pulses[1].as_micros(), 1553);

        let encoded = decoded.to_bytes();
        assert_eq!(hex::encode(encoded), hex::encode(message));
    }

    #[test]
    fn test_long_pulses_are_escaped() {
        // 8360us -> 275 ticks and 100ms -> 3284 ticks, both over one byte
        let recording = Recording::new_ir(vec![
            Duration::from_micros(8360),
            Duration::from_millis(100),
        ]);

        let encoded = recording.to_bytes();
        assert_eq!(hex::encode(&encoded), "26000600000113000cd4");

        let decoded = Recording::from_bytes(encoded.clone()).unwrap();
        assert_eq!(decoded.pulses.len(), 2);
        assert_eq!(hex::encode(decoded.to_bytes()), hex::encode(encoded));
    }

    #[test]
    fn test_odd_pulse_count_is_padded() {
        let message = Bytes::copy_from_slice(&hex!("2600030012331f"));

        let decoded = Recording::from_bytes(message).unwrap();
        assert_eq!(decoded.pulses.len(), 4);
        assert_eq!(decoded.pulses[3], Duration::from_millis(100));
    }

    #[test]
    fn test_rejects_unknown_transport() {
        let message = Bytes::copy_from_slice(&hex!("ff0002001233"));
        assert!(matches!(
            Recording::from_bytes(message),
            Err(ParseError::InvalidTransport(0xff))
        ));
    }

    #[test]
    fn test_rejects_short_message() {
        let message = Bytes::copy_from_slice(&hex!("2600"));
        assert!(matches!(
            Recording::from_bytes(message),
            Err(ParseError::Truncated)
        ));
    }
}
