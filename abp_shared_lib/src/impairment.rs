//! Fault injection for the ARQ engines.
//!
//! Both endpoints route every impaired transmission through a [`Simulator`]:
//! the client for data frames, the server for acknowledgments. The simulator
//! only decides what goes on the wire. It never changes the frame the engine
//! keeps for validation and retransmission, corruption always yields a copy.
//!
//! The random source is owned by the simulator and can be seeded, so a
//! transfer under impairment is reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::error::{ErrorType, Result};
use crate::packet::Packet;

/// what kind of frame is about to be sent
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameKind {
    Data,
    Ack,
}

/// Probabilities for one kind of frame, each in the range `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ImpairmentProfile {
    pub corrupt_sequence: f64,
    pub corrupt_checksum: f64,
    pub drop: f64,
    pub duplicate: f64,
    /// the probability that a frame is dropped if the previous frame of the same kind was also dropped
    ///
    /// None uses `drop` for every frame
    pub drop_after_drop: Option<f64>,
}

impl ImpairmentProfile {

    /// a profile that never touches a frame
    pub fn none() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            self.corrupt_sequence,
            self.corrupt_checksum,
            self.drop,
            self.duplicate,
            self.drop_after_drop.unwrap_or(0.0),
        ];
        for p in probabilities.iter() {
            if !(0.0..=1.0).contains(p) {
                return Err(ErrorType::InvalidProbability(*p));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ImpairmentConfig {
    pub data: ImpairmentProfile,
    pub ack: ImpairmentProfile,
}

impl ImpairmentConfig {

    /// transparent, every frame is delivered once and unmodified
    pub fn none() -> Self {
        Self::default()
    }

    /// 20% corrupted sequence, 20% corrupted checksum, 30% dropped and
    /// 30% duplicated data frames; 30% dropped and 30% duplicated acknowledgments
    pub fn reference() -> Self {
        ImpairmentConfig {
            data: ImpairmentProfile {
                corrupt_sequence: 0.2,
                corrupt_checksum: 0.2,
                drop: 0.3,
                duplicate: 0.3,
                drop_after_drop: None,
            },
            ack: ImpairmentProfile {
                corrupt_sequence: 0.0,
                corrupt_checksum: 0.0,
                drop: 0.3,
                duplicate: 0.3,
                drop_after_drop: None,
            },
        }
    }

    pub fn profile(&self, kind: FrameKind) -> &ImpairmentProfile {
        match kind {
            FrameKind::Data => &self.data,
            FrameKind::Ack => &self.ack,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.data.validate()?;
        self.ack.validate()
    }
}

/// The independent draws for one transmission
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ImpairmentDecision {
    pub corrupt_sequence: bool,
    pub corrupt_checksum: bool,
    pub drop: bool,
    pub duplicate: bool,
}

/// A frame that goes on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub frame: Packet,
    pub corrupted: bool,
    pub duplicated: bool,
}

impl Delivery {
    /// how often the frame is sent back to back
    pub fn copies(&self) -> usize {
        if self.duplicated { 2 } else { 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedOutcome {
    /// nothing is transmitted
    Drop,
    Deliver(Delivery),
}

impl SimulatedOutcome {
    pub fn is_drop(&self) -> bool {
        matches!(self, SimulatedOutcome::Drop)
    }
}

pub struct Simulator<R: Rng = StdRng> {
    config: ImpairmentConfig,
    rng: R,
    last_data_dropped: bool,
    last_ack_dropped: bool,
}

impl Simulator<StdRng> {

    /// reproducible simulator
    pub fn seeded(config: ImpairmentConfig, seed: u64) -> Result<Self> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: ImpairmentConfig) -> Result<Self> {
        Self::new(config, StdRng::from_entropy())
    }

    /// simulator that never impairs a frame
    pub fn transparent() -> Self {
        Self {
            config: ImpairmentConfig::none(),
            rng: StdRng::seed_from_u64(0),
            last_data_dropped: false,
            last_ack_dropped: false,
        }
    }
}

impl<R: Rng> Simulator<R> {

    pub fn new(config: ImpairmentConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Simulator {
            config,
            rng,
            last_data_dropped: false,
            last_ack_dropped: false,
        })
    }

    pub fn config(&self) -> &ImpairmentConfig {
        &self.config
    }

    /// draws corrupt sequence, corrupt checksum, drop and duplicate, in this order
    pub fn decide(&mut self, kind: FrameKind) -> ImpairmentDecision {
        let profile = *self.config.profile(kind);
        let last_dropped = match kind {
            FrameKind::Data => &mut self.last_data_dropped,
            FrameKind::Ack => &mut self.last_ack_dropped,
        };
        let drop_probability = match profile.drop_after_drop {
            Some(q) if *last_dropped => q,
            _ => profile.drop,
        };
        let corrupt_sequence = self.rng.gen::<f64>() < profile.corrupt_sequence;
        let corrupt_checksum = self.rng.gen::<f64>() < profile.corrupt_checksum;
        let drop = self.rng.gen::<f64>() < drop_probability;
        let duplicate = self.rng.gen::<f64>() < profile.duplicate;
        *last_dropped = drop;
        ImpairmentDecision {
            corrupt_sequence,
            corrupt_checksum,
            drop,
            duplicate,
        }
    }

    /// pure, `packet` is left untouched
    ///
    /// corrupted fields are replaced by their bitwise complement, a corrupted
    /// sequence field therefore never holds a valid sequence bit
    pub fn apply(decision: &ImpairmentDecision, packet: &Packet) -> SimulatedOutcome {
        if decision.drop {
            return SimulatedOutcome::Drop;
        }
        let mut frame = packet.clone();
        if decision.corrupt_sequence {
            frame = frame.with_sequence(!packet.sequence());
        }
        if decision.corrupt_checksum {
            frame = frame.with_checksum(!packet.checksum());
        }
        SimulatedOutcome::Deliver(Delivery {
            frame,
            corrupted: decision.corrupt_sequence || decision.corrupt_checksum,
            duplicated: decision.duplicate,
        })
    }

    pub fn maybe_impair(&mut self, packet: &Packet, kind: FrameKind) -> SimulatedOutcome {
        let decision = self.decide(kind);
        let outcome = Self::apply(&decision, packet);
        crate::log_impairment!(kind, decision);
        outcome
    }
}
