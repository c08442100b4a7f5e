/// Converter resolution.
pub const ADC_BITS: u32 = 12;

/// Largest raw value the converter produces.
pub const ADC_MAX: u16 = (1 << ADC_BITS) - 1;

/// Linear sensor transfer function: `T = t_ref - (V - v_at_ref) / slope`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    /// ADC reference voltage, V
    pub vref: f32,
    /// Sensor output at `t_ref`, V
    pub v_at_ref: f32,
    /// Sensor slope, V/*C
    pub slope: f32,
    /// Reference temperature, *C
    pub t_ref: f32,
}

impl Calibration {
    /// STM32F1 internal sensor, datasheet typical values.
    pub const STM32F1: Calibration = Calibration {
        vref: 3.3,
        v_at_ref: 1.43,
        slope: 0.0043,
        t_ref: 25.0,
    };

    /// RP2040 internal sensor, datasheet typical values.
    pub const RP2040: Calibration = Calibration {
        vref: 3.3,
        v_at_ref: 0.706,
        slope: 0.001721,
        t_ref: 27.0,
    };

    /// Raw 12-bit sample -> *C.
    #[inline]
    pub fn convert(&self, raw: u16) -> f32 {
        let voltage = raw as f32 * (self.vref / (1u32 << ADC_BITS) as f32);
        self.t_ref - (voltage - self.v_at_ref) / self.slope
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::STM32F1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_is_reproducible() {
        for cal in [Calibration::STM32F1, Calibration::RP2040] {
            for raw in [0, 1, 868, 2048, ADC_MAX] {
                assert_eq!(cal.convert(raw).to_bits(), cal.convert(raw).to_bits());
            }
        }
    }

    #[test]
    fn higher_raw_means_lower_temperature() {
        for cal in [Calibration::STM32F1, Calibration::RP2040] {
            let mut prev = cal.convert(0);
            for raw in 1..=ADC_MAX {
                let t = cal.convert(raw);
                assert!(t < prev, "raw {} -> {} not below {}", raw, t, prev);
                prev = t;
            }
        }
    }

    #[test]
    fn reference_voltage_maps_to_reference_temperature() {
        // 0.706 V is raw ~876 at 3.3 V / 4096
        let cal = Calibration::RP2040;
        let raw = (cal.v_at_ref / cal.vref * 4096.0) as u16;
        assert!((cal.convert(raw) - cal.t_ref).abs() < 0.5);

        let cal = Calibration::STM32F1;
        let raw = (cal.v_at_ref / cal.vref * 4096.0) as u16;
        assert!((cal.convert(raw) - cal.t_ref).abs() < 0.5);
    }

    #[test]
    fn zero_raw_value() {
        let t = Calibration::RP2040.convert(0);
        assert!((t - (27.0 + 0.706 / 0.001721)).abs() < 1e-3);
    }
}
