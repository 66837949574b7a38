use std::time::{Duration, Instant};

use tracing::debug;

use super::packet::Packet;
use super::{ClimateState, Phy};

/// How long after a local transmission incoming signals are dropped.
///
/// IR receivers routinely pick up the unit's own transmitter; anything
/// arriving inside this window is assumed to be our own signal bouncing
/// back.
pub const ECHO_WINDOW: Duration = Duration::from_millis(500);

/// Debounce for self-received transmissions. The caller supplies the
/// current instant, so tests never have to sleep.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoGuard {
    last_transmit: Option<Instant>,
}

impl EchoGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_transmit(&mut self, now: Instant) {
        self.last_transmit = Some(now);
    }

    /// True unless `now` falls within [`ECHO_WINDOW`] of the last recorded
    /// transmission. Before any transmission, always true.
    pub fn should_accept(&self, now: Instant) -> bool {
        match self.last_transmit {
            Some(last) => now.duration_since(last) >= ECHO_WINDOW,
            None => true,
        }
    }
}

/// Sends a modulated pulse train out the IR hardware.
pub trait PulseTransport {
    type Error;

    fn transmit(&mut self, pulses: &[Duration]) -> Result<(), Self::Error>;
}

/// Receives every externally visible state change.
pub trait StateSink {
    fn publish(&mut self, state: &ClimateState, current_temperature: Option<f32>);
}

/// The remote-control head end: owns the logical climate state and moves
/// it over the wire in both directions.
///
/// Driven by three events: a requested state change (encode + transmit),
/// a captured pulse train (guard + decode + publish), and a reading from
/// the room-temperature sensor (publish only).
pub struct MirageRemote<T, S> {
    state: ClimateState,
    current_temperature: Option<f32>,
    phy: Phy,
    guard: EchoGuard,
    transport: T,
    sink: S,
}

impl<T: PulseTransport, S: StateSink> MirageRemote<T, S> {
    pub fn new(transport: T, sink: S) -> Self {
        Self {
            state: ClimateState::default(),
            current_temperature: None,
            phy: Phy::new(),
            guard: EchoGuard::new(),
            transport,
            sink,
        }
    }

    pub fn state(&self) -> &ClimateState {
        &self.state
    }

    pub fn current_temperature(&self) -> Option<f32> {
        self.current_temperature
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Stores the requested settings and transmits them.
    pub fn set_state(&mut self, state: ClimateState, now: Instant) -> Result<(), T::Error> {
        self.state = state;
        self.transmit_state(now)
    }

    fn transmit_state(&mut self, now: Instant) -> Result<(), T::Error> {
        self.guard.record_transmit(now);

        let packet = Packet::from(&self.state);
        debug!(?packet, "transmitting");
        self.transport.transmit(&self.phy.encode(&packet))?;

        self.sink.publish(&self.state, self.current_temperature);
        Ok(())
    }

    /// Handles one captured pulse train. Returns whether it was consumed
    /// as a valid remote frame; echoes of our own transmission and
    /// undecodable captures are dropped.
    pub fn handle_pulses(
        &mut self,
        pulses: impl Iterator<Item = Duration>,
        now: Instant,
    ) -> bool {
        if !self.guard.should_accept(now) {
            debug!("dropping capture inside the transmit window");
            return false;
        }

        let packet = match self.phy.decode(pulses) {
            Ok(packet) => packet,
            Err(err) => {
                debug!(%err, "dropping undecodable capture");
                return false;
            }
        };

        debug!(?packet, "received");
        let retained = packet.apply_to(&mut self.state);
        if retained.mode {
            debug!("frame carried no recognizable mode, keeping the previous one");
        }

        self.sink.publish(&self.state, self.current_temperature);
        true
    }

    /// Feed from the room-temperature sensor; independent of the codec.
    pub fn set_current_temperature(&mut self, celsius: f32) {
        self.current_temperature = Some(celsius);
        self.sink.publish(&self.state, self.current_temperature);
    }
}
