//! Display units for traffic volumes
//!
//! All counters are kept in gigabits. Reports divide by the unit's divisor.

use serde::{Deserialize, Serialize};

/// Bits per unit.
pub const BIT: f64 = 1.0;
pub const BYTE: f64 = 8.0;

/// Unit used when reading counters back for reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    #[default]
    Bit,
    Byte,
}

impl DisplayUnit {
    pub fn divisor(&self) -> f64 {
        match self {
            DisplayUnit::Bit => BIT,
            DisplayUnit::Byte => BYTE,
        }
    }

    /// Convert a raw gigabit value into this unit
    pub fn scale(&self, gigabits: f64) -> f64 {
        gigabits / self.divisor()
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            DisplayUnit::Bit => "Gb",
            DisplayUnit::Byte => "GB",
        }
    }
}

impl std::fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayUnit::Bit => write!(f, "bit"),
            DisplayUnit::Byte => write!(f, "byte"),
        }
    }
}

impl std::str::FromStr for DisplayUnit {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bit" | "bits" => Ok(DisplayUnit::Bit),
            "byte" | "bytes" => Ok(DisplayUnit::Byte),
            other => Err(crate::Error::InvalidConfig(format!(
                "unknown display unit: {}",
                other
            ))),
        }
    }
}

/// Format a volume with one decimal, e.g. `12.5`
pub fn format_volume(value: f64) -> String {
    format!("{:.1}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divisors() {
        assert_eq!(DisplayUnit::Bit.scale(80.0), 80.0);
        assert_eq!(DisplayUnit::Byte.scale(80.0), 10.0);
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!("bit".parse::<DisplayUnit>().unwrap(), DisplayUnit::Bit);
        assert_eq!("Bytes".parse::<DisplayUnit>().unwrap(), DisplayUnit::Byte);
        assert!("nibble".parse::<DisplayUnit>().is_err());
    }

    #[test]
    fn test_format_volume() {
        assert_eq!(format_volume(0.0), "0.0");
        assert_eq!(format_volume(13.333), "13.3");
        assert_eq!(format_volume(20.0), "20.0");
    }
}
