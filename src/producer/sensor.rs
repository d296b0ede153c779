use std::collections::HashMap;

#[cfg(test)]
use mockall::automock;
use tracing::trace;

use super::{GasSensorModel, Producer};
use crate::ChannelId;

/// Temperature probe driver.
#[cfg_attr(test, automock)]
pub trait TemperatureSource: Send + Sync + 'static {
    /// Degrees Celsius, `None` when the probe did not answer
    fn read_celsius(&self) -> Option<f64>;
}

/// ADC input wired to an analog sensor.
#[cfg_attr(test, automock)]
pub trait VoltageSource: Send + Sync + 'static {
    /// Volts at the ADC pin, `None` on conversion failure
    fn read_volts(&self) -> Option<f64>;
}

enum SensorBinding {
    Temperature(Box<dyn TemperatureSource>),
    Gas {
        source: Box<dyn VoltageSource>,
        model: GasSensorModel,
    },
}

/// Producer backed by hardware drivers, one binding per channel.
#[derive(Default)]
pub struct SensorProducer {
    bindings: HashMap<ChannelId, SensorBinding>,
}

impl std::fmt::Debug for SensorProducer {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let mut channels: Vec<_> = self.bindings.keys().collect();
        channels.sort();
        f.debug_struct("SensorProducer").field("channels", &channels).finish()
    }
}

impl SensorProducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(
        mut self,
        channel: ChannelId,
        source: impl TemperatureSource,
    ) -> Self {
        self.bindings.insert(channel, SensorBinding::Temperature(Box::new(source)));
        self
    }

    pub fn with_gas(
        mut self,
        channel: ChannelId,
        source: impl VoltageSource,
        model: GasSensorModel,
    ) -> Self {
        self.bindings.insert(
            channel,
            SensorBinding::Gas {
                source: Box::new(source),
                model,
            },
        );
        self
    }
}

impl Producer for SensorProducer {
    fn read(
        &self,
        channel: ChannelId,
    ) -> Option<f64> {
        let reading = match self.bindings.get(&channel)? {
            // The probe reports 0 or below when it is disconnected
            SensorBinding::Temperature(source) => source.read_celsius().filter(|c| *c > 0.0),
            SensorBinding::Gas { source, model } => source.read_volts().and_then(|v| model.ppm(v)),
        };
        trace!("sensor {channel} -> {:?}", reading);
        reading
    }
}
