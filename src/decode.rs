//! Decoders for the coded fields of a volinfo record.

use crate::error::ListerError;
use crate::models::VolumeType;
use std::str::FromStr;

/// Maps the raw recency code to its display label.
///
/// Unknown codes are rendered as `未知(<raw>)` rather than rejected.
pub fn decode_extra_info(value: &str) -> String {
    match value {
        "0" => "無".to_string(),
        "1" => "最近一週更新".to_string(),
        "2" => "90天內曾下載/推送".to_string(),
        other => format!("未知({})", other),
    }
}

/// Maps a raw volume type label to [`VolumeType`].
///
/// # Errors
/// Returns [`ListerError::InvalidEnumValue`] carrying the raw label when it is
/// not one of the three known labels.
pub fn decode_volume_type(value: &str) -> Result<VolumeType, ListerError> {
    match value {
        "單行本" => Ok(VolumeType::Volume),
        "番外篇" => Ok(VolumeType::Extra),
        "話" => Ok(VolumeType::Serialized),
        other => Err(ListerError::InvalidEnumValue(other.to_string())),
    }
}

impl FromStr for VolumeType {
    type Err = ListerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_volume_type(s)
    }
}
