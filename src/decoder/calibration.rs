//! Scalar conversions shared by the decoders.

/// Voltage at which a CR2032 cell is considered empty.
const BATTERY_EMPTY_VOLTS: f64 = 2.2;
/// Usable voltage span above [`BATTERY_EMPTY_VOLTS`].
const BATTERY_RANGE_VOLTS: f64 = 0.65;

/// Propane tank level coefficients (c0, c1, c2) as supplied by Mopeka.
/// Other fluids need different coefficients.
pub const PROPANE_COEFFICIENTS: (f64, f64, f64) = (0.573045, -0.002822, -0.00000535);

/// Round `value` to `places` decimal places.
///
/// Precision beyond what an `f64` carries leaves `value` unchanged.
pub fn round_to(value: f64, places: u32) -> f64 {
    if places > f64::DIGITS + 1 {
        return value;
    }
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() { rounded } else { value }
}

/// Battery percentage for a 3 V CR2032 cell.
///
/// Linear between 2.2 V (0 %) and 2.85 V (100 %), clamped at both ends.
pub fn battery_percent(voltage: f64) -> u8 {
    let percent = ((voltage - BATTERY_EMPTY_VOLTS) / BATTERY_RANGE_VOLTS) * 100.0;
    if percent > 100.0 {
        return 100;
    }
    if percent < 0.0 {
        return 0;
    }
    // NaN falls through to here and saturates to 0
    round_to(percent, 1) as u8
}

/// Propane level in millimetres from a raw Mopeka level reading and the
/// tank temperature in °C.
pub fn propane_level(raw_level: u16, temperature: f64) -> u32 {
    let (c0, c1, c2) = PROPANE_COEFFICIENTS;
    let factor = c0 + c1 * temperature + c2 * temperature * temperature;
    (f64::from(raw_level) * factor) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_percent_saturates() {
        assert_eq!(battery_percent(0.0), 0);
        assert_eq!(battery_percent(2.2), 0);
        assert_eq!(battery_percent(2.85), 100);
        assert_eq!(battery_percent(3.3), 100);
        assert_eq!(battery_percent(1_600_000.0), 100);
        assert_eq!(battery_percent(-5.0), 0);
    }

    #[test]
    fn test_battery_percent_midpoint() {
        // (2.525 - 2.2) / 0.65 = 0.5
        assert_eq!(battery_percent(2.525), 50);
        // (2.4 - 2.2) / 0.65 * 100 = 30.769..., rounds to 30.8, truncates to 30
        assert_eq!(battery_percent(2.4), 30);
    }

    #[test]
    fn test_battery_percent_is_monotonic() {
        let mut previous = 0;
        for step in 0..=400 {
            let voltage = 2.0 + f64::from(step) * 0.0025;
            let percent = battery_percent(voltage);
            assert!(
                percent >= previous,
                "battery_percent({voltage}) = {percent} < {previous}"
            );
            previous = percent;
        }
        assert_eq!(previous, 100);
    }

    #[test]
    fn test_battery_percent_nan() {
        assert_eq!(battery_percent(f64::NAN), 0);
    }

    #[test]
    fn test_propane_level_at_zero_degrees() {
        assert_eq!(propane_level(1000, 0.0), 573);
    }

    #[test]
    fn test_propane_level_temperature_compensation() {
        // 0.573045 - 0.002822 * 20 - 0.00000535 * 400 = 0.514465
        assert_eq!(propane_level(1000, 20.0), 514);
        assert_eq!(propane_level(0, 20.0), 0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.0049, 2), 2.0);
        assert_eq!(round_to(1.23456, 4), 1.2346);
        assert_eq!(round_to(-163.84, 2), -163.84);
    }

    #[test]
    fn test_round_to_decimal_ties_round_up() {
        // humidity raw 6
        assert_eq!(round_to(6.0 / 400.0, 2), 0.02);
        assert_eq!(round_to(-0.015, 2), -0.02);
    }

    #[test]
    fn test_round_to_excess_precision_is_identity() {
        assert_eq!(round_to(5.065135, 400), 5.065135);
        assert_eq!(round_to(5.065135, 3_000_000_000), 5.065135);
        assert_eq!(round_to(f64::MAX, 10), f64::MAX);
    }
}
