//! Interpretation of raw 16-bit holding register words.
//!
//! Every catalog entry carries an [`Encoding`] tag and decoding dispatches on that tag alone. The
//! device conventions are:
//!
//! * negative temperatures are 16-bit two's complement (`65531` is -5 °C);
//! * fixed-point quantities are stored multiplied by 10 or 100;
//! * dual-zone settings pack zone 1 into the low byte and zone 2 into the high byte;
//! * 32-bit counters are split over a high/low register pair, scaled by 0.01;
//! * `0xFFFF` or `0xFF` may stand for "sensor not fitted" (see [`crate::registers`]).

use crate::registers::RegisterIndex;

/// A named bit of a bit field register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flag {
    pub bit: u8,
    pub name: &'static str,
}

/// What the low and the high byte of a packed register hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteLabels {
    pub low: &'static str,
    pub high: &'static str,
}

impl ByteLabels {
    pub const ZONES: Self = Self { low: "Zone1", high: "Zone2" };
}

/// Selects one of the two bytes of a packed register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Byte {
    Low,
    High,
}

/// Which half of a 32-bit counter a register holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Half {
    High,
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Unsigned value as-is.
    Plain { unit: &'static str },
    /// Unsigned code with documented meanings.
    Enumerated(&'static [(u16, &'static str)]),
    /// Two's complement over 16 bits.
    Signed { unit: &'static str },
    /// Fixed point, `raw / divisor`.
    Scale { divisor: u16, unit: &'static str },
    /// `raw * factor`.
    Multiple { factor: u16, unit: &'static str },
    /// Two independent bytes.
    ZonePair(ByteLabels),
    /// Independent boolean flags.
    BitField(&'static [Flag]),
    /// One half of a 32-bit counter in hundredths of a kWh.
    Combined32(Half),
}

impl Encoding {
    pub const U16: Self = Self::Plain { unit: "" };

    pub fn decode(self, raw: u16) -> Value {
        match self {
            Self::Plain { unit } => Value::Plain { raw, unit },
            Self::Enumerated(labels) => Value::Enumerated {
                raw,
                label: labels.iter().find(|(code, _)| *code == raw).map(|(_, l)| *l),
            },
            Self::Signed { unit } => Value::Signed { value: raw as i16, unit },
            Self::Scale { divisor, unit } => Value::Scaled { raw, divisor, unit },
            Self::Multiple { factor, unit } => Value::Multiple { raw, factor, unit },
            Self::ZonePair(labels) => {
                let (low, high) = split_pair(raw);
                Value::Pair { low, high, labels }
            }
            Self::BitField(flags) => Value::Flags { raw, flags },
            Self::Combined32(_) => Value::Scaled { raw, divisor: 100, unit: "kWh" },
        }
    }

    /// Encode a physical value into the register word.
    ///
    /// Values are rounded to the nearest representable word (half away from zero) before range
    /// checking. Packed registers and counter halves cannot be written as a single number.
    pub fn encode(self, value: f64) -> Result<u16, EncodeError> {
        if !value.is_finite() {
            return Err(EncodeError::NotANumber(value));
        }
        let word = |scaled: f64, requested: f64, min: f64, max: f64| {
            let rounded = scaled.round();
            if rounded < min || rounded > max {
                return Err(EncodeError::OutOfRange { value: requested, min, max });
            }
            Ok(rounded)
        };
        match self {
            Self::Plain { .. } | Self::Enumerated(_) | Self::BitField(_) => {
                Ok(word(value, value, 0.0, u16::MAX.into())? as u16)
            }
            Self::Signed { .. } => {
                let v = word(value, value, i16::MIN.into(), i16::MAX.into())?;
                Ok(v as i16 as u16)
            }
            Self::Scale { divisor, .. } => {
                let divisor = f64::from(divisor);
                word(value * divisor, value, 0.0, u16::MAX.into())
                    .map(|v| v as u16)
                    .map_err(|e| e.rescaled(divisor))
            }
            Self::Multiple { factor, .. } => {
                let factor = f64::from(factor);
                word(value / factor, value, 0.0, u16::MAX.into())
                    .map(|v| v as u16)
                    .map_err(|e| e.rescaled(1.0 / factor))
            }
            Self::ZonePair(_) => Err(EncodeError::Unsupported("packed")),
            Self::Combined32(_) => Err(EncodeError::Unsupported("32-bit counter")),
        }
    }

    pub fn is_packed(&self) -> bool {
        matches!(self, Self::ZonePair(_))
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Plain { unit: "" } => f.write_str("U16"),
            Self::Plain { unit } => write!(f, "U16 {unit}"),
            Self::Enumerated(_) => f.write_str("ENUM"),
            Self::Signed { unit: "" } => f.write_str("I16"),
            Self::Signed { unit } => write!(f, "I16 {unit}"),
            Self::Scale { divisor, unit } => write!(f, "/{divisor} {unit}"),
            Self::Multiple { factor, unit } => write!(f, "x{factor} {unit}"),
            Self::ZonePair(labels) => write!(f, "PAIR {}|{}", labels.low, labels.high),
            Self::BitField(_) => f.write_str("BITS"),
            Self::Combined32(Half::High) => f.write_str("U32 HI"),
            Self::Combined32(Half::Low) => f.write_str("U32 LO"),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EncodeError {
    #[error("{value} is outside of the writable range {min}..={max}")]
    OutOfRange { value: f64, min: f64, max: f64 },
    #[error("{0} is not a finite number")]
    NotANumber(f64),
    #[error("{0} registers cannot be written from a single number")]
    Unsupported(&'static str),
}

impl EncodeError {
    fn rescaled(self, divisor: f64) -> Self {
        match self {
            Self::OutOfRange { value, min, max } => {
                Self::OutOfRange { value, min: min / divisor, max: max / divisor }
            }
            e => e,
        }
    }
}

/// Low byte first, high byte second.
pub const fn split_pair(raw: u16) -> (u8, u8) {
    ((raw & 0xFF) as u8, ((raw >> 8) & 0xFF) as u8)
}

pub const fn compose_pair(low: u8, high: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}

/// Range-check a target for one byte of a packed register.
pub fn encode_byte(value: f64) -> Result<u8, EncodeError> {
    if !value.is_finite() {
        return Err(EncodeError::NotANumber(value));
    }
    let rounded = value.round();
    if !(0.0..=255.0).contains(&rounded) {
        return Err(EncodeError::OutOfRange { value, min: 0.0, max: 255.0 });
    }
    Ok(rounded as u8)
}

/// `(high * 65536 + low) / 100`, in kWh.
pub fn combine_energy(high: u16, low: u16) -> f64 {
    (u32::from(high) << 16 | u32::from(low)) as f64 / 100.0
}

/// Decode a word read from `address`.
///
/// Addresses without a catalog entry decode as [`Encoding::U16`].
pub fn decode(address: u16, raw: u16) -> Value {
    match RegisterIndex::from_address(address) {
        Some(register) => register.decode(raw),
        None => Encoding::U16.decode(raw),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// The register holds its "not fitted" sentinel.
    Unavailable(u16),
    Plain { raw: u16, unit: &'static str },
    Enumerated { raw: u16, label: Option<&'static str> },
    Signed { value: i16, unit: &'static str },
    Scaled { raw: u16, divisor: u16, unit: &'static str },
    Multiple { raw: u16, factor: u16, unit: &'static str },
    Pair { low: u8, high: u8, labels: ByteLabels },
    Flags { raw: u16, flags: &'static [Flag] },
}

impl Value {
    pub fn raw(&self) -> u16 {
        match *self {
            Value::Unavailable(raw)
            | Value::Plain { raw, .. }
            | Value::Enumerated { raw, .. }
            | Value::Scaled { raw, .. }
            | Value::Multiple { raw, .. }
            | Value::Flags { raw, .. } => raw,
            Value::Signed { value, .. } => value as u16,
            Value::Pair { low, high, .. } => compose_pair(low, high),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Value::Unavailable(_))
    }

    /// The physical quantity, for scalar values.
    pub fn number(&self) -> Option<f64> {
        match *self {
            Value::Plain { raw, .. } | Value::Enumerated { raw, .. } => Some(raw.into()),
            Value::Signed { value, .. } => Some(value.into()),
            Value::Scaled { raw, divisor, .. } => Some(f64::from(raw) / f64::from(divisor)),
            Value::Multiple { raw, factor, .. } => Some(f64::from(raw) * f64::from(factor)),
            Value::Unavailable(_) | Value::Pair { .. } | Value::Flags { .. } => None,
        }
    }

    pub fn pair(&self) -> Option<(u8, u8)> {
        match *self {
            Value::Pair { low, high, .. } => Some((low, high)),
            _ => None,
        }
    }

    /// Documented flags and whether each is set. Empty for anything but bit fields.
    pub fn flags(&self) -> impl Iterator<Item = (&'static str, bool)> + use<> {
        let none: &'static [Flag] = &[];
        let (raw, flags) = match *self {
            Value::Flags { raw, flags } => (raw, flags),
            _ => (0, none),
        };
        flags.iter().map(move |f| (f.name, raw & (1 << f.bit) != 0))
    }
}

fn decimals(divisor: u16) -> usize {
    let mut decimals = 0;
    let mut d = 1u32;
    while d < u32::from(divisor) {
        d *= 10;
        decimals += 1;
    }
    decimals
}

fn write_with_unit(
    f: &mut std::fmt::Formatter<'_>,
    value: std::fmt::Arguments<'_>,
    unit: &str,
) -> std::fmt::Result {
    if unit.is_empty() { write!(f, "{value}") } else { write!(f, "{value} {unit}") }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Value::Unavailable(raw) => write!(f, "{raw} (n/a)"),
            Value::Plain { raw, unit } => write_with_unit(f, format_args!("{raw}"), unit),
            Value::Enumerated { raw, label: Some(label) } => write!(f, "{raw} ({label})"),
            Value::Enumerated { raw, label: None } => write!(f, "{raw}"),
            Value::Signed { value, unit } => write_with_unit(f, format_args!("{value}"), unit),
            Value::Scaled { raw, divisor, unit } => {
                let scaled = f64::from(raw) / f64::from(divisor);
                let precision = decimals(divisor);
                write!(f, "{raw} (")?;
                write_with_unit(f, format_args!("{scaled:.precision$}"), unit)?;
                f.write_str(")")
            }
            Value::Multiple { raw, factor, unit } => {
                let multiplied = u32::from(raw) * u32::from(factor);
                write!(f, "{raw} (")?;
                write_with_unit(f, format_args!("{multiplied}"), unit)?;
                f.write_str(")")
            }
            Value::Pair { low, high, labels } => {
                let raw = compose_pair(low, high);
                write!(f, "{raw} ({}={low}, {}={high})", labels.low, labels.high)
            }
            Value::Flags { raw, .. } => {
                write!(f, "0x{raw:04X}")?;
                let mut set = self.flags().filter(|(_, on)| *on).map(|(name, _)| name);
                if let Some(first) = set.next() {
                    write!(f, " [{first}")?;
                    for name in set {
                        write!(f, ", {name}")?;
                    }
                    f.write_str("]")?;
                }
                Ok(())
            }
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Value::Unavailable(_) => serializer.serialize_none(),
            Value::Plain { raw, .. } | Value::Enumerated { raw, .. } => serializer.serialize_u16(raw),
            Value::Signed { value, .. } => serializer.serialize_i16(value),
            Value::Scaled { .. } | Value::Multiple { .. } => {
                serializer.serialize_f64(self.number().unwrap_or_default())
            }
            Value::Pair { low, high, labels } => {
                serializer.collect_map([(labels.low, low), (labels.high, high)])
            }
            Value::Flags { .. } => serializer.collect_map(self.flags()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNED_TEMPERATURE: u16 = 232;
    const ODU_CURRENT: u16 = 118;
    const HEATING_COP: u16 = 151;

    #[test]
    fn plain_is_identity() {
        for raw in 0..=u16::MAX {
            assert_eq!(Encoding::U16.decode(raw).number(), Some(f64::from(raw)));
            assert_eq!(Encoding::U16.decode(raw).raw(), raw);
        }
    }

    #[test]
    fn unknown_address_decodes_plain() {
        assert_eq!(decode(50, 1234), Value::Plain { raw: 1234, unit: "" });
        assert_eq!(decode(65000, 7), Value::Plain { raw: 7, unit: "" });
    }

    #[test]
    fn twos_complement_temperatures() {
        let number = |raw| decode(SIGNED_TEMPERATURE, raw).number();
        assert_eq!(number(65531), Some(-5.0));
        assert_eq!(number(65526), Some(-10.0));
        assert_eq!(number(65521), Some(-15.0));
        assert_eq!(number(0), Some(0.0));
        assert_eq!(number(25), Some(25.0));
    }

    #[test]
    fn signed_decode_encode_is_bijective() {
        let register = RegisterIndex::from_address(SIGNED_TEMPERATURE).unwrap();
        let encoding = register.encoding();
        for raw in 0..=u16::MAX {
            let decoded = decode(SIGNED_TEMPERATURE, raw).number().unwrap();
            assert_eq!(encoding.encode(decoded), Ok(raw));
        }
    }

    #[test]
    fn fixed_point_scales() {
        assert_eq!(decode(HEATING_COP, 7708).number(), Some(77.08));
        assert_eq!(decode(ODU_CURRENT, 30).number(), Some(3.0));
        assert_eq!(decode(ODU_CURRENT, 30).to_string(), "30 (3.0 A)");
        assert_eq!(decode(138, 106).to_string(), "106 (1.06 m³/h)");
        assert_eq!(decode(143, 7708).number(), Some(77.08));
    }

    #[test]
    fn scaled_encode_rounds_to_nearest() {
        let pwm = Encoding::Scale { divisor: 10, unit: "%" };
        assert_eq!(pwm.encode(20.0), Ok(200));
        assert_eq!(pwm.encode(20.04), Ok(200));
        assert_eq!(pwm.encode(20.06), Ok(201));
        assert_eq!(pwm.encode(20.09), Ok(201));
        let half = Encoding::Scale { divisor: 2, unit: "°C" };
        assert_eq!(half.encode(17.0), Ok(34));
        assert_eq!(half.encode(17.3), Ok(35));
        let watts = Encoding::Multiple { factor: 100, unit: "W" };
        assert_eq!(watts.encode(2000.0), Ok(20));
        assert_eq!(watts.encode(2049.0), Ok(20));
        assert_eq!(watts.encode(2051.0), Ok(21));
    }

    #[test]
    fn encode_rejects_out_of_range() {
        assert!(matches!(Encoding::U16.encode(-1.0), Err(EncodeError::OutOfRange { .. })));
        assert!(matches!(Encoding::U16.encode(65536.0), Err(EncodeError::OutOfRange { .. })));
        let signed = Encoding::Signed { unit: "°C" };
        assert!(matches!(signed.encode(32768.0), Err(EncodeError::OutOfRange { .. })));
        assert_eq!(signed.encode(-32768.0), Ok(0x8000));
        let scale = Encoding::Scale { divisor: 100, unit: "" };
        assert_eq!(
            scale.encode(655.36),
            Err(EncodeError::OutOfRange { value: 655.36, min: 0.0, max: 655.35 })
        );
        assert_eq!(Encoding::U16.encode(f64::NAN).is_err(), true);
        assert_eq!(
            Encoding::ZonePair(ByteLabels::ZONES).encode(1.0),
            Err(EncodeError::Unsupported("packed"))
        );
    }

    #[test]
    fn zone_pair_round_trip() {
        let encoding = Encoding::ZonePair(ByteLabels::ZONES);
        for zone1 in 0..=255u8 {
            for zone2 in 0..=255u8 {
                let raw = u16::from(zone1) | u16::from(zone2) << 8;
                let value = encoding.decode(raw);
                assert_eq!(value.pair(), Some((zone1, zone2)));
                assert_eq!(compose_pair(zone1, zone2), raw);
                assert_eq!(value.raw(), raw);
            }
        }
    }

    #[test]
    fn packed_setpoint_example() {
        let value = decode(2, 0x1E1C);
        assert_eq!(value.pair(), Some((28, 30)));
        assert_eq!(value.to_string(), "7708 (Zone1=28, Zone2=30)");
    }

    #[test]
    fn byte_targets_are_range_checked() {
        assert_eq!(encode_byte(0.0), Ok(0));
        assert_eq!(encode_byte(255.0), Ok(255));
        assert_eq!(encode_byte(35.4), Ok(35));
        assert!(matches!(encode_byte(256.0), Err(EncodeError::OutOfRange { .. })));
        assert!(matches!(encode_byte(-1.0), Err(EncodeError::OutOfRange { .. })));
        assert!(matches!(encode_byte(f64::INFINITY), Err(EncodeError::NotANumber(_))));
    }

    #[test]
    fn energy_pairs_combine() {
        assert_eq!(combine_energy(2, 50), 1311.22);
        assert_eq!(combine_energy(0, 0), 0.0);
        assert_eq!(combine_energy(u16::MAX, u16::MAX), 42949672.95);
    }

    #[test]
    fn sentinels_are_not_zero() {
        // T3 uses 0xFFFF, Tbt1 uses 0xFF.
        assert_eq!(decode(106, 0xFFFF), Value::Unavailable(0xFFFF));
        assert_eq!(decode(120, 0xFF), Value::Unavailable(0xFF));
        assert_ne!(decode(106, 0), Value::Unavailable(0));
        assert_eq!(decode(106, 0).number(), Some(0.0));
        assert_eq!(decode(120, 0).number(), Some(0.0));
        // A register without a sentinel reports 255 as a reading.
        assert_eq!(decode(104, 0xFF).number(), Some(255.0));
        assert_eq!(decode(106, 0xFFFF).number(), None);
    }

    #[test]
    fn decode_is_pure() {
        for address in [0, 2, 104, 106, 129, 143, 232, 290] {
            for raw in [0, 1, 255, 0x7FFF, 0x8000, 0xFFFF] {
                assert_eq!(decode(address, raw), decode(address, raw));
            }
        }
    }

    #[test]
    fn bit_fields_name_each_flag() {
        // Zone1 water temperature control and DHW on.
        let value = decode(0, 0b0110);
        let flags = value.flags().collect::<Vec<_>>();
        assert_eq!(
            flags,
            vec![
                ("Zone1/2 room temp control", false),
                ("Zone1 water temp control", true),
                ("DHW power", true),
                ("Zone2 water temp control", false),
            ]
        );
        assert_eq!(
            value.to_string(),
            "0x0006 [Zone1 water temp control, DHW power]"
        );
        assert_eq!(Encoding::U16.decode(3).flags().count(), 0);
    }

    #[test]
    fn enumerated_values_carry_labels() {
        assert_eq!(decode(1, 3).to_string(), "3 (Heating)");
        assert_eq!(decode(1, 9).to_string(), "9");
        assert_eq!(decode(1, 3).number(), Some(3.0));
    }

    #[test]
    fn values_serialize_to_json() {
        let json = |address, raw| serde_json::to_string(&decode(address, raw)).unwrap();
        assert_eq!(json(106, 0xFFFF), "null");
        assert_eq!(json(232, 65531), "-5");
        assert_eq!(json(151, 414), "4.14");
        assert_eq!(json(2, 0x1E1C), r#"{"Zone1":28,"Zone2":30}"#);
        assert_eq!(json(10, 0b10), r#"{"SG1 signal":true,"SG2/EVU signal":false}"#);
    }
}
