use std::collections::HashMap;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Producer;
use crate::{ChannelId, ChannelRegistry};

/// Bounds and step of one simulated signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalProfile {
    pub min: f64,
    pub max: f64,
    /// Largest change between two consecutive readings
    pub max_step: f64,
}

impl SignalProfile {
    pub const TEMPERATURE: SignalProfile = SignalProfile {
        min: 18.0,
        max: 32.0,
        max_step: 0.4,
    };

    pub const GAS: SignalProfile = SignalProfile {
        min: 50.0,
        max: 900.0,
        max_step: 25.0,
    };

    /// Temperature-like channels are recognised by name, everything else
    /// behaves like a gas sensor.
    pub fn for_channel_name(name: &str) -> Self {
        if name.to_ascii_uppercase().starts_with("TEMP") {
            Self::TEMPERATURE
        } else {
            Self::GAS
        }
    }

    fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

struct Walk {
    profile: SignalProfile,
    current: f64,
}

struct SimState {
    rng: StdRng,
    walks: HashMap<ChannelId, Walk>,
}

/// Random-walk producer standing in for real sensors.
///
/// Each configured channel drifts within its profile's bounds. With
/// probability `unavailable_rate` a read yields nothing, modelling a sensor
/// that did not answer. Unknown channels are always unavailable.
pub struct SimulatedProducer {
    state: Mutex<SimState>,
    unavailable_rate: f64,
}

impl std::fmt::Debug for SimulatedProducer {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SimulatedProducer")
            .field("channels", &self.state.lock().walks.len())
            .field("unavailable_rate", &self.unavailable_rate)
            .finish()
    }
}

impl SimulatedProducer {
    pub fn new(
        channels: &ChannelRegistry,
        unavailable_rate: f64,
    ) -> Self {
        Self::with_rng(channels, unavailable_rate, StdRng::from_entropy())
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(
        channels: &ChannelRegistry,
        unavailable_rate: f64,
        seed: u64,
    ) -> Self {
        Self::with_rng(channels, unavailable_rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        channels: &ChannelRegistry,
        unavailable_rate: f64,
        rng: StdRng,
    ) -> Self {
        let walks = channels
            .iter()
            .map(|c| {
                let profile = SignalProfile::for_channel_name(&c.name);
                (
                    c.id,
                    Walk {
                        profile,
                        current: profile.midpoint(),
                    },
                )
            })
            .collect();

        Self {
            state: Mutex::new(SimState { rng, walks }),
            unavailable_rate: unavailable_rate.clamp(0.0, 1.0),
        }
    }

    /// Overrides the profile of one channel and restarts its walk.
    pub fn with_profile(
        self,
        channel: ChannelId,
        profile: SignalProfile,
    ) -> Self {
        self.state.lock().walks.insert(
            channel,
            Walk {
                profile,
                current: profile.midpoint(),
            },
        );
        self
    }
}

impl Producer for SimulatedProducer {
    fn read(
        &self,
        channel: ChannelId,
    ) -> Option<f64> {
        let mut guard = self.state.lock();
        let SimState { rng, walks } = &mut *guard;
        let walk = walks.get_mut(&channel)?;

        if rng.gen_bool(self.unavailable_rate) {
            return None;
        }

        let step = walk.profile.max_step;
        let delta = if step > 0.0 { rng.gen_range(-step..=step) } else { 0.0 };
        walk.current = (walk.current + delta).clamp(walk.profile.min, walk.profile.max);
        Some((walk.current * 100.0).round() / 100.0)
    }
}
