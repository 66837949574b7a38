use std::io::{self, Write};
use std::str::FromStr;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use aircon::broadlink::Recording;
use aircon::codecs::{create_codec, CodecType};
use aircon::mirage::{packet::Packet, ClimateState, FanSpeed, Mode, Phy, Swing};
use aircon::smartir;

#[derive(Parser)]
#[command(about = "Mirage air conditioner IR remote codec")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read recordings from stdin, one per line, and print the decoded states
    Decode {
        #[arg(long, default_value = "hex", value_parser = CodecType::from_str)]
        codec: CodecType,
    },

    /// Encode a climate state as a transmittable recording
    Encode {
        #[arg(long, value_parser = Mode::from_str)]
        mode: Mode,

        #[arg(long, default_value_t = 24.0)]
        temp: f32,

        #[arg(long, default_value = "auto", value_parser = FanSpeed::from_str)]
        fan: FanSpeed,

        #[arg(long, default_value = "off", value_parser = Swing::from_str)]
        swing: Swing,

        #[arg(long, default_value = "hex", value_parser = CodecType::from_str)]
        codec: CodecType,
    },

    /// Generate a SmartIR code file for this remote
    Smartir,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Decode { codec } => decode_lines(codec),
        Command::Encode {
            mode,
            temp,
            fan,
            swing,
            codec,
        } => encode_state(mode, temp, fan, swing, codec),
        Command::Smartir => {
            println!("{}", serde_json::to_string_pretty(&smartir::code_file())?);
            Ok(())
        }
    }
}

fn decode_lines(codec: CodecType) -> anyhow::Result<()> {
    let codec = create_codec(codec);
    let phy = Phy::new();

    // Frames only carry the fields they recognize, so keep updating one
    // state across the whole session
    let mut state = ClimateState::default();

    let stdin = io::stdin();
    for line in stdin.lines() {
        let recording = codec.decode(line?.trim_end())?;
        let packet = phy.decode(recording.pulses.iter().copied())?;

        packet.apply_to(&mut state);
        println!("{:?}", packet);
        println!("{:?}", state);
        io::stdout().flush()?;
    }

    Ok(())
}

fn encode_state(
    mode: Mode,
    temp: f32,
    fan: FanSpeed,
    swing: Swing,
    codec: CodecType,
) -> anyhow::Result<()> {
    let state = ClimateState {
        mode,
        target_temperature: temp,
        fan,
        swing,
    };

    let packet = Packet::from(&state);
    let pulses = Phy::new().encode(&packet);
    let line = create_codec(codec).encode(&Recording::new_ir(pulses))?;
    println!("{}", line);

    Ok(())
}
