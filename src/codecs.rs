use bytes::Bytes;
use thiserror::Error;

use crate::broadlink::{self, Recording, Transport};

/// Text representations a recording can cross stdin/stdout in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum CodecType {
    Base64,
    Hex,
    Raw,
}

pub trait Codec {
    type Error;

    fn decode(&self, input: &str) -> Result<Recording, Self::Error>;
    fn encode(&self, recording: &Recording) -> Result<String, Self::Error>;
}

pub fn create_codec(ty: CodecType) -> Box<dyn Codec<Error = CodecError>> {
    match ty {
        CodecType::Base64 => Box::new(BroadlinkBase64),
        CodecType::Hex => Box::new(BroadlinkHex),
        CodecType::Raw => Box::new(RawText),
    }
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("failed to decode hex string: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("failed to decode base64 string: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("failed to parse broadlink message: {0}")]
    Broadlink(#[from] broadlink::ParseError),
    #[error("failed to parse raw pulse text")]
    RawText,
    #[error("empty input")]
    EmptyInput,
}

pub struct BroadlinkHex;

impl Codec for BroadlinkHex {
    type Error = CodecError;

    fn decode(&self, input: &str) -> Result<Recording, Self::Error> {
        let mut decoded = hex::decode(input)?;
        if decoded.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        if decoded.len() % 2 != 0 {
            decoded.push(0);
        }

        Ok(Recording::from_bytes(Bytes::copy_from_slice(&decoded))?)
    }

    fn encode(&self, recording: &Recording) -> Result<String, Self::Error> {
        Ok(hex::encode(recording.to_bytes()))
    }
}

pub struct BroadlinkBase64;

impl Codec for BroadlinkBase64 {
    type Error = CodecError;

    fn decode(&self, input: &str) -> Result<Recording, Self::Error> {
        let decoded = base64::decode(input)?;
        Ok(Recording::from_bytes(Bytes::copy_from_slice(&decoded))?)
    }

    fn encode(&self, recording: &Recording) -> Result<String, Self::Error> {
        Ok(base64::encode(recording.to_bytes()))
    }
}

pub struct RawText;

impl Codec for RawText {
    type Error = CodecError;

    fn decode(&self, input: &str) -> Result<Recording, Self::Error> {
        // Support IrTransmogrifier's format which looks like `Freq=38400Hz[.....][...]`
        let input = match input.split_once('[') {
            Some((prefix, rest)) if prefix.starts_with("Freq=") => {
                rest.split(']').next().ok_or(CodecError::RawText)?
            }
            _ => input,
        };

        let msg = irp::Message::parse(input).or(Err(CodecError::RawText))?;
        Ok(Recording {
            repeat_count: 0,
            transport: Transport::Ir,
            pulses: msg
                .raw
                .into_iter()
                .map(|t| std::time::Duration::from_micros(t as _))
                .collect(),
        })
    }

    fn encode(&self, recording: &Recording) -> Result<String, Self::Error> {
        Ok(recording.to_raw_format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::time::Duration;

    #[test]
    fn test_codec_type_from_str() {
        assert_eq!(CodecType::from_str("hex").unwrap(), CodecType::Hex);
        assert_eq!(CodecType::from_str("base64").unwrap(), CodecType::Base64);
        assert!(CodecType::from_str("pronto").is_err());
    }

    #[test]
    fn test_hex_round_trip() {
        let codec = BroadlinkHex;
        let recording = codec.decode("260002001233").unwrap();
        assert_eq!(recording.pulses.len(), 2);
        assert_eq!(codec.encode(&recording).unwrap(), "260002001233");
    }

    #[test]
    fn test_hex_rejects_empty_line() {
        assert!(matches!(
            BroadlinkHex.decode(""),
            Err(CodecError::EmptyInput)
        ));
    }

    #[test]
    fn test_base64_round_trip() {
        let hex_codec = BroadlinkHex;
        let b64_codec = BroadlinkBase64;

        let recording = hex_codec.decode("260002001233").unwrap();
        let line = b64_codec.encode(&recording).unwrap();
        assert_eq!(b64_codec.decode(&line).unwrap(), recording);
    }

    #[test]
    fn test_raw_output_signs_pairs() {
        let recording = Recording::new_ir(vec![
            Duration::from_micros(554),
            Duration::from_micros(1592),
            Duration::from_micros(554),
        ]);
        assert_eq!(RawText.encode(&recording).unwrap(), "+554 -1592 +554 ");
    }
}
