/** A pulse-distance IR modulator/demodulator with configurable timings */
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Rule {
    pub duration: Duration,
    pub tolerance: Duration,
}

impl Rule {
    pub fn new(duration: Duration) -> Self {
        // Use a 20% tolerance by default
        Self {
            duration,
            tolerance: duration / 5,
        }
    }

    fn matches(&self, observed: Duration) -> bool {
        let diff = if observed > self.duration {
            observed - self.duration
        } else {
            self.duration - observed
        };
        diff <= self.tolerance
    }
}

#[derive(Error, Debug, Copy, Clone)]
pub enum CodecError {
    #[error("pulse train ended mid-frame")]
    Truncated,

    #[error("missing frame preamble")]
    MissingPreamble,

    #[error("unexpected mark length: {0:?}")]
    UnexpectedMark(Duration),

    #[error("unexpected space length: {0:?}")]
    UnexpectedSpace(Duration),
}

/// Distance coding: every bit is a fixed-width mark, and the width of the
/// following space selects the bit value. A frame opens with a long
/// mark/space preamble and closes with one trailing mark.
pub struct DistanceCodec {
    pub header_mark: Rule,
    pub header_space: Rule,
    pub bit_mark: Rule,
    pub one_space: Rule,
    pub zero_space: Rule,
}

impl DistanceCodec {
    /// Bytes are modulated in order, least significant bit first.
    pub fn encode(&self, frame: &[u8]) -> Vec<Duration> {
        let mut pulses = Vec::with_capacity(2 + frame.len() * 16 + 1);

        pulses.push(self.header_mark.duration);
        pulses.push(self.header_space.duration);

        for &byte in frame {
            for bit in 0..8 {
                pulses.push(self.bit_mark.duration);
                pulses.push(if byte & (1 << bit) != 0 {
                    self.one_space.duration
                } else {
                    self.zero_space.duration
                });
            }
        }

        // Close the final space, otherwise the last bit has no edge
        pulses.push(self.bit_mark.duration);
        pulses
    }

    /// Fills `frame` from a pulse train. Pulses past the last payload bit
    /// (the trailing mark, recording artifacts) are ignored.
    pub fn decode(
        &self,
        mut pulses: impl Iterator<Item = Duration>,
        frame: &mut [u8],
    ) -> Result<(), CodecError> {
        let mark = pulses.next().ok_or(CodecError::Truncated)?;
        let space = pulses.next().ok_or(CodecError::Truncated)?;
        if !self.header_mark.matches(mark) || !self.header_space.matches(space) {
            return Err(CodecError::MissingPreamble);
        }

        for byte in frame.iter_mut() {
            *byte = 0;
            for bit in 0..8 {
                let mark = pulses.next().ok_or(CodecError::Truncated)?;
                if !self.bit_mark.matches(mark) {
                    return Err(CodecError::UnexpectedMark(mark));
                }

                let space = pulses.next().ok_or(CodecError::Truncated)?;
                if self.one_space.matches(space) {
                    *byte |= 1 << bit;
                } else if !self.zero_space.matches(space) {
                    return Err(CodecError::UnexpectedSpace(space));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_codec() -> DistanceCodec {
        DistanceCodec {
            header_mark: Rule::new(Duration::from_micros(4000)),
            header_space: Rule::new(Duration::from_micros(2000)),
            bit_mark: Rule::new(Duration::from_micros(500)),
            one_space: Rule::new(Duration::from_micros(1500)),
            zero_space: Rule::new(Duration::from_micros(500)),
        }
    }

    #[test]
    fn test_rule_tolerance() {
        let rule = Rule::new(Duration::from_micros(500));
        assert!(rule.matches(Duration::from_micros(500)));
        assert!(rule.matches(Duration::from_micros(410)));
        assert!(rule.matches(Duration::from_micros(590)));
        assert!(!rule.matches(Duration::from_micros(390)));
        assert!(!rule.matches(Duration::from_micros(620)));
    }

    #[test]
    fn test_round_trip() {
        let codec = get_codec();
        let frame = [0xA5, 0x00, 0xFF];

        let pulses = codec.encode(&frame);
        assert_eq!(pulses.len(), 2 + 3 * 16 + 1);

        let mut decoded = [0u8; 3];
        codec.decode(pulses.into_iter(), &mut decoded).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_decode_with_jitter() {
        let codec = get_codec();
        // 10% off on every edge still classifies
        let frame = [0x4E];
        let pulses: Vec<Duration> = get_codec()
            .encode(&frame)
            .into_iter()
            .map(|d| d + d / 10)
            .collect();

        let mut decoded = [0u8; 1];
        codec.decode(pulses.into_iter(), &mut decoded).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_rejects_truncated_train() {
        let codec = get_codec();
        let pulses = codec.encode(&[0x12, 0x34]);

        let mut decoded = [0u8; 2];
        let err = codec
            .decode(pulses.into_iter().take(20), &mut decoded)
            .unwrap_err();
        assert!(matches!(err, CodecError::Truncated));
    }

    #[test]
    fn test_rejects_bad_preamble() {
        let codec = get_codec();
        let pulses = codec.encode(&[0x12]);

        let mut decoded = [0u8; 1];
        let err = codec
            .decode(pulses.into_iter().skip(2), &mut decoded)
            .unwrap_err();
        assert!(matches!(err, CodecError::MissingPreamble));
    }

    #[test]
    fn test_rejects_unclassifiable_space() {
        let codec = get_codec();
        let mut pulses = codec.encode(&[0x12]);
        pulses[3] = Duration::from_micros(1000); // between zero and one

        let mut decoded = [0u8; 1];
        let err = codec.decode(pulses.into_iter(), &mut decoded).unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedSpace(_)));
    }
}
