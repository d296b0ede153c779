/// Load resistor on the sensor board, in ohms.
pub const LOAD_RESISTANCE_OHMS: f64 = 1000.0;

/// Supply voltage across the sensing element and load resistor.
const SUPPLY_VOLTS: f64 = 5.0;

/// Power-law fit `ppm = (Rs / R0 / a) ^ b` of a metal-oxide gas sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasSensorModel {
    /// Sensor resistance in clean air, in ohms
    pub r0: f64,
    pub a: f64,
    pub b: f64,
}

impl GasSensorModel {
    /// Combustible gas / smoke sensor
    pub const MQ2: GasSensorModel = GasSensorModel {
        r0: 22_500.0,
        a: 11.5428,
        b: -1.526,
    };

    /// Carbon monoxide sensor
    pub const MQ7: GasSensorModel = GasSensorModel {
        r0: 15_000.0,
        a: 22.07,
        b: -1.498,
    };

    /// Converts the divided-down ADC voltage to a concentration in ppm,
    /// rounded to two decimals.
    ///
    /// The board halves the load voltage before the ADC, so the reading is
    /// doubled first. Returns `None` for non-positive voltages and for
    /// voltages at or above the supply, where the resistance ratio is no
    /// longer positive.
    pub fn ppm(
        &self,
        adc_volts: f64,
    ) -> Option<f64> {
        if adc_volts.is_nan() || adc_volts <= 0.0 {
            return None;
        }
        let vrl = 2.0 * adc_volts;
        let rs = (SUPPLY_VOLTS - vrl) * LOAD_RESISTANCE_OHMS / vrl;
        let ratio = rs / self.r0;
        if ratio <= 0.0 {
            return None;
        }
        let ppm = (ratio / self.a).powf(self.b);
        Some((ppm * 100.0).round() / 100.0)
    }
}
