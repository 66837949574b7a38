use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{
    broadlink::Recording,
    mirage::{packet::Packet, ClimateState, FanSpeed, Mode, Phy, Swing, TEMP_MAX, TEMP_MIN},
};

/*
{
   "manufacturer":"Mirage",
   "supportedModels":[
      "Magnum 12"
   ],
   "supportedController":"Broadlink",
   "commandsEncoding":"Base64",
   "minTemperature":16.0,
   "maxTemperature":32.0,
   "precision":1,
   "operationModes":[
      "heat",
      "cool",
      "dry",
      "fan_only",
      "heat_cool"
   ],
   "fanModes":[
      "auto",
      "low",
      "medium",
      "high"
   ],
   */

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CodeFile {
    pub manufacturer: String,
    pub supported_models: Vec<String>,
    pub supported_controller: String,
    pub commands_encoding: String,
    pub min_temperature: f32,
    pub max_temperature: f32,
    pub precision: u8,
    pub operation_modes: Vec<String>,
    pub fan_modes: Vec<String>,
    pub commands: serde_json::Value,
}

/// Generates a SmartIR code file covering every encodable state
pub fn code_file() -> CodeFile {
    let commands: serde_json::Value = {
        // Commands are nested to represent all possible states, the hierarchy used in other models is:
        // mode -> fan -> temperature

        let mut all_commands = serde_json::Map::new();

        for mode in Mode::iter().filter(|&m| m != Mode::Off) {
            let mode_map = all_commands
                .entry(mode.as_ref().to_string())
                .or_insert(serde_json::Map::new().into());
            let mode_map = mode_map.as_object_mut().unwrap();

            for fan in FanSpeed::iter() {
                let fan_map = mode_map
                    .entry(fan.as_ref().to_string())
                    .or_insert(serde_json::Map::new().into());
                let fan_map = fan_map.as_object_mut().unwrap();

                for temperature in (TEMP_MIN as u8)..=(TEMP_MAX as u8) {
                    let state = ClimateState {
                        mode,
                        target_temperature: f32::from(temperature),
                        fan,
                        swing: Swing::Off,
                    };

                    fan_map.insert(format!("{}", temperature), encode_state(&state).into());
                }
            }
        }

        // Add "Off" state
        let off_state = ClimateState {
            mode: Mode::Off,
            ..ClimateState::default()
        };
        all_commands.insert("off".into(), encode_state(&off_state).into());

        all_commands.into()
    };

    CodeFile {
        manufacturer: "Mirage".into(),
        supported_models: vec!["Magnum 12".into(), "Magnum 18".into()],
        supported_controller: "Broadlink".into(),
        commands_encoding: "Base64".into(),
        min_temperature: TEMP_MIN,
        max_temperature: TEMP_MAX,
        precision: 1,
        operation_modes: Mode::iter()
            .filter(|&m| m != Mode::Off)
            .map(|m| m.as_ref().to_string())
            .collect(),
        fan_modes: FanSpeed::iter().map(|m| m.as_ref().to_string()).collect(),
        commands,
    }
}

fn encode_state(state: &ClimateState) -> String {
    let packet = Packet::from(state);
    let pulses = Phy::new().encode(&packet);
    base64::encode(Recording::new_ir(pulses).to_bytes())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codecs::{BroadlinkBase64, Codec};

    #[test]
    fn test_every_mode_and_fan_is_covered() {
        let file = code_file();

        let commands = file.commands.as_object().unwrap();
        assert!(commands.contains_key("off"));

        for mode in ["heat", "cool", "dry", "fan_only", "heat_cool"] {
            let mode_map = commands[mode].as_object().unwrap();
            for fan in ["auto", "low", "medium", "high"] {
                let fan_map = mode_map[fan].as_object().unwrap();
                assert_eq!(fan_map.len(), 17); // 16C through 32C
            }
        }
    }

    #[test]
    fn test_commands_decode_back_to_their_state() {
        let file = code_file();
        let line = file.commands["cool"]["high"]["24"].as_str().unwrap();

        let recording = BroadlinkBase64.decode(line).unwrap();
        let packet = Phy::new()
            .decode(recording.pulses.iter().copied())
            .unwrap();

        let mut state = ClimateState::default();
        packet.apply_to(&mut state);
        assert_eq!(state.mode, Mode::Cool);
        assert_eq!(state.target_temperature, 24.0);
        assert_eq!(state.fan, FanSpeed::High);
    }
}
