use crate::prelude::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [FixStatus] describes the positioning quality, either per [Constellation]
/// or as the overall best value. Variants are ordered by quality.
///
/// [Constellation]: crate::prelude::Constellation
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FixStatus {
    /// Nothing received (yet)
    #[default]
    NoData,
    /// Receiver reports but has no position fix
    NoFix,
    /// Horizontal fix only
    Fix2D,
    /// Complete fix
    Fix3D,
}

impl std::fmt::Display for FixStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NoData => write!(f, "No Data"),
            Self::NoFix => write!(f, "No Fix"),
            Self::Fix2D => write!(f, "2D Fix"),
            Self::Fix3D => write!(f, "3D Fix"),
        }
    }
}

/// Legacy receiver status, as reported in RMC/GLL sentences.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReceiverStatus {
    /// 'A': data is valid
    Active,
    /// 'V': navigation receiver warning.
    /// Some receivers emit 'V' with a position fix below acceptable quality.
    Void,
    /// Status not reported
    #[default]
    Unknown,
}

impl From<char> for ReceiverStatus {
    fn from(c: char) -> Self {
        match c {
            'A' => Self::Active,
            'V' => Self::Void,
            _ => Self::Unknown,
        }
    }
}

impl std::str::FromStr for ReceiverStatus {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" => Ok(Self::Active),
            "V" => Ok(Self::Void),
            "" => Ok(Self::Unknown),
            _ => Err(Error::InvalidReceiverStatus),
        }
    }
}

/// NMEA (GSA) fix type code.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FixType {
    /// Fix type not reported
    #[default]
    NotReported,
    /// Fix not available (code 1)
    Bad,
    /// 2D fix (code 2)
    Fix2D,
    /// 3D fix (code 3)
    Fix3D,
}

impl From<u8> for FixType {
    fn from(code: u8) -> Self {
        match code {
            1 => Self::Bad,
            2 => Self::Fix2D,
            3 => Self::Fix3D,
            _ => Self::NotReported,
        }
    }
}

/// GGA quality indicator: correction technology used for the fix.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QualityIndicator {
    /// Code 0. Also our default value: a report that never
    /// carried a GGA sentence has no usable quality.
    #[default]
    Invalid,
    /// Code 1: autonomous (standalone) GPS fix
    GPS,
    /// Code 2: differential GPS
    DGPS,
    /// Code 3: Precise Positioning Service
    PPS,
    /// Code 4: RTK with fixed ambiguities
    RTK,
    /// Code 5: RTK with float ambiguities
    FloatRTK,
    /// Code 6: dead reckoning
    Estimated,
    /// Code 7: manual input
    Manual,
    /// Code 8: simulator
    Simulation,
    /// Unrecognized raw code
    Unknown(u8),
}

impl QualityIndicator {
    /// Human readable label.
    pub fn description(&self) -> String {
        match self {
            Self::Simulation => "Simulation mode".to_string(),
            Self::Manual => "Manual input mode".to_string(),
            Self::Estimated => "Estimated".to_string(),
            Self::FloatRTK => "Float RTK".to_string(),
            Self::RTK => "Fixed RTK".to_string(),
            Self::PPS => "PPS".to_string(),
            Self::DGPS => "DGPS".to_string(),
            Self::GPS => "Autonomous".to_string(),
            Self::Invalid => "Invalid".to_string(),
            Self::Unknown(code) => format!("Unknown ({})", code),
        }
    }
}

impl From<u8> for QualityIndicator {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::Invalid,
            1 => Self::GPS,
            2 => Self::DGPS,
            3 => Self::PPS,
            4 => Self::RTK,
            5 => Self::FloatRTK,
            6 => Self::Estimated,
            7 => Self::Manual,
            8 => Self::Simulation,
            code => Self::Unknown(code),
        }
    }
}

impl std::str::FromStr for QualityIndicator {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s
            .trim()
            .parse::<u8>()
            .map_err(|_| Error::InvalidQualityIndicator)?;
        Ok(Self::from(code))
    }
}

impl std::fmt::Display for QualityIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;
    use std::str::FromStr;

    #[rstest]
    #[case(0, "Invalid")]
    #[case(1, "Autonomous")]
    #[case(2, "DGPS")]
    #[case(3, "PPS")]
    #[case(4, "Fixed RTK")]
    #[case(5, "Float RTK")]
    #[case(6, "Estimated")]
    #[case(7, "Manual input mode")]
    #[case(8, "Simulation mode")]
    #[case(9, "Unknown (9)")]
    #[case(42, "Unknown (42)")]
    fn quality_descriptions(#[case] code: u8, #[case] expected: &str) {
        assert_eq!(QualityIndicator::from(code).description(), expected);
    }

    #[test]
    fn quality_parsing() {
        assert_eq!(
            QualityIndicator::from_str(" 4").unwrap(),
            QualityIndicator::RTK
        );
        assert_eq!(
            QualityIndicator::from_str("x"),
            Err(Error::InvalidQualityIndicator)
        );
        assert_eq!(
            QualityIndicator::from_str("12").unwrap(),
            QualityIndicator::Unknown(12)
        );
    }

    #[test]
    fn fix_status_ordering() {
        assert!(FixStatus::NoData < FixStatus::NoFix);
        assert!(FixStatus::NoFix < FixStatus::Fix2D);
        assert!(FixStatus::Fix2D < FixStatus::Fix3D);
    }

    #[test]
    fn receiver_status() {
        assert_eq!(ReceiverStatus::from('A'), ReceiverStatus::Active);
        assert_eq!(ReceiverStatus::from('V'), ReceiverStatus::Void);
        assert_eq!(ReceiverStatus::from(' '), ReceiverStatus::Unknown);
        assert_eq!(
            ReceiverStatus::from_str("Q"),
            Err(Error::InvalidReceiverStatus)
        );
        assert_eq!(FixType::from(2), FixType::Fix2D);
        assert_eq!(FixType::from(0), FixType::NotReported);
    }
}
