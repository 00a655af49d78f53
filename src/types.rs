use heapless::Vec;

/// Length of the block returned by a read-measurement transaction.
pub const FRAME_LEN: usize = 60;
/// Two CRC-guarded byte pairs per float.
pub const WORD_LEN: usize = 6;
/// Largest word count of any supported sensor.
pub const MAX_WORDS: usize = FRAME_LEN / WORD_LEN;
/// Largest packed payload.
pub const MAX_PAYLOAD_LEN: usize = MAX_WORDS * 4;

/// Raw response of a read-measurement transaction.
pub type RawFrame = [u8; FRAME_LEN];

/// Decoded floats of one complete, validated measurement, in device order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reading {
    values: Vec<f32, MAX_WORDS>,
}

impl Reading {
    /// Returns `None` if more than [`MAX_WORDS`] values are given.
    pub fn from_values(values: &[f32]) -> Option<Self> {
        Vec::from_slice(values).ok().map(|values| Reading { values })
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// SPS30 measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticulateData {
    /// Mass Concentration PM1.0 [μg/m³]
    pub mass_pm1_0: f32,
    /// Mass Concentration PM2.5 [μg/m³]
    pub mass_pm2_5: f32,
    /// Mass Concentration PM4.0 [μg/m³]
    pub mass_pm4_0: f32,
    /// Mass Concentration PM10 [μg/m³]
    pub mass_pm10_0: f32,
    /// Number Concentration PM0.5 [#/cm³]
    pub number_pm0_5: f32,
    /// Number Concentration PM1.0 [#/cm³]
    pub number_pm1_0: f32,
    /// Number Concentration PM2.5 [#/cm³]
    pub number_pm2_5: f32,
    /// Number Concentration PM4.0 [#/cm³]
    pub number_pm4_0: f32,
    /// Number Concentration PM10 [#/cm³]
    pub number_pm10_0: f32,
    /// Typical Particle Size [μm]
    pub typical_size: f32,
}

impl ParticulateData {
    pub fn from_reading(reading: &Reading) -> Option<Self> {
        match *reading.values() {
            [mass_pm1_0, mass_pm2_5, mass_pm4_0, mass_pm10_0, number_pm0_5, number_pm1_0, number_pm2_5, number_pm4_0, number_pm10_0, typical_size] => {
                Some(ParticulateData {
                    mass_pm1_0,
                    mass_pm2_5,
                    mass_pm4_0,
                    mass_pm10_0,
                    number_pm0_5,
                    number_pm1_0,
                    number_pm2_5,
                    number_pm4_0,
                    number_pm10_0,
                    typical_size,
                })
            }
            _ => None,
        }
    }
}

/// SCD30 measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Co2Data {
    /// CO2 Concentration [ppm]
    pub co2: f32,
    /// Temperature [°C]
    pub temperature: f32,
    /// Relative Humidity [%RH]
    pub humidity: f32,
}

impl Co2Data {
    pub fn from_reading(reading: &Reading) -> Option<Self> {
        match *reading.values() {
            [co2, temperature, humidity] => Some(Co2Data {
                co2,
                temperature,
                humidity,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_capacity() {
        assert!(Reading::from_values(&[0.0; MAX_WORDS]).is_some());
        assert!(Reading::from_values(&[0.0; MAX_WORDS + 1]).is_none());
    }

    #[test]
    fn particulate_field_order() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let data = ParticulateData::from_reading(&Reading::from_values(&values).unwrap()).unwrap();
        assert_eq!(data.mass_pm1_0, 1.0);
        assert_eq!(data.mass_pm10_0, 4.0);
        assert_eq!(data.number_pm0_5, 5.0);
        assert_eq!(data.number_pm10_0, 9.0);
        assert_eq!(data.typical_size, 10.0);
    }

    #[test]
    fn co2_field_order() {
        let reading = Reading::from_values(&[412.5, 23.25, 45.5]).unwrap();
        let data = Co2Data::from_reading(&reading).unwrap();
        assert_eq!(data.co2, 412.5);
        assert_eq!(data.temperature, 23.25);
        assert_eq!(data.humidity, 45.5);
    }

    #[test]
    fn views_reject_wrong_length() {
        let reading = Reading::from_values(&[1.0, 2.0]).unwrap();
        assert!(Co2Data::from_reading(&reading).is_none());
        assert!(ParticulateData::from_reading(&reading).is_none());
    }
}
