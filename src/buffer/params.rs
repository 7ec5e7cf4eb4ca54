//! Buffer styling parameters.

use crate::error::GeometryError;
use serde::{Deserialize, Serialize};

/// Shape at the ends of buffered lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EndCapStyle {
    /// Half circle around the endpoint.
    #[default]
    Round,
    /// Cut square at the endpoint.
    Flat,
    /// Square extending `distance` past the endpoint.
    Square,
}

/// Shape of the outside corner where two buffered segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JoinStyle {
    #[default]
    Round,
    /// Sharp corner, replaced by a bevel past the mitre limit.
    Mitre,
    Bevel,
}

impl TryFrom<i32> for EndCapStyle {
    type Error = GeometryError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(EndCapStyle::Round),
            2 => Ok(EndCapStyle::Flat),
            3 => Ok(EndCapStyle::Square),
            other => Err(GeometryError::InvalidInput(format!(
                "unknown end cap style code {}",
                other
            ))),
        }
    }
}

impl TryFrom<i32> for JoinStyle {
    type Error = GeometryError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(JoinStyle::Round),
            2 => Ok(JoinStyle::Mitre),
            3 => Ok(JoinStyle::Bevel),
            other => Err(GeometryError::InvalidInput(format!(
                "unknown join style code {}",
                other
            ))),
        }
    }
}

/// How `buffer` and `offset_curve` shape their output.
///
/// # Example
///
/// ```rust
/// use planar::buffer::{BufferParameters, EndCapStyle, JoinStyle};
///
/// let params = BufferParameters::default()
///     .with_end_cap_style(EndCapStyle::Square)
///     .with_join_style(JoinStyle::Mitre);
/// assert_eq!(params.quadrant_segments, 8);
/// assert!(params.validate().is_ok());
///
/// let parsed: BufferParameters = serde_json::from_str(r#"{"join_style": "bevel"}"#).unwrap();
/// assert_eq!(parsed.join_style, JoinStyle::Bevel);
/// assert_eq!(parsed.mitre_limit, 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferParameters {
    /// Segments used to approximate a quarter circle.
    #[serde(default = "BufferParameters::default_quadrant_segments")]
    pub quadrant_segments: usize,

    #[serde(default)]
    pub end_cap_style: EndCapStyle,

    #[serde(default)]
    pub join_style: JoinStyle,

    /// Largest ratio of mitre length to buffer distance before a mitre join
    /// falls back to a bevel.
    #[serde(default = "BufferParameters::default_mitre_limit")]
    pub mitre_limit: f64,
}

impl BufferParameters {
    const fn default_quadrant_segments() -> usize {
        8
    }

    const fn default_mitre_limit() -> f64 {
        5.0
    }

    pub fn with_quadrant_segments(mut self, quadrant_segments: usize) -> Self {
        self.quadrant_segments = quadrant_segments;
        self
    }

    pub fn with_end_cap_style(mut self, style: EndCapStyle) -> Self {
        self.end_cap_style = style;
        self
    }

    pub fn with_join_style(mut self, style: JoinStyle) -> Self {
        self.join_style = style;
        self
    }

    pub fn with_mitre_limit(mut self, limit: f64) -> Self {
        self.mitre_limit = limit;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.quadrant_segments == 0 {
            return Err("Quadrant segments must be greater than 0".to_string());
        }
        if self.quadrant_segments > 1024 {
            return Err("Quadrant segments must not exceed 1024".to_string());
        }
        if !self.mitre_limit.is_finite() || self.mitre_limit < 1.0 {
            return Err("Mitre limit must be a finite number of at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for BufferParameters {
    fn default() -> Self {
        Self {
            quadrant_segments: Self::default_quadrant_segments(),
            end_cap_style: EndCapStyle::default(),
            join_style: JoinStyle::default(),
            mitre_limit: Self::default_mitre_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_codes() {
        assert_eq!(EndCapStyle::try_from(1).unwrap(), EndCapStyle::Round);
        assert_eq!(EndCapStyle::try_from(2).unwrap(), EndCapStyle::Flat);
        assert_eq!(EndCapStyle::try_from(3).unwrap(), EndCapStyle::Square);
        assert_eq!(JoinStyle::try_from(2).unwrap(), JoinStyle::Mitre);
        assert_eq!(JoinStyle::try_from(3).unwrap(), JoinStyle::Bevel);
        assert!(EndCapStyle::try_from(0).is_err());
        assert!(JoinStyle::try_from(4).is_err());
    }

    #[test]
    fn test_validation() {
        assert!(BufferParameters::default().validate().is_ok());
        assert!(
            BufferParameters::default()
                .with_quadrant_segments(0)
                .validate()
                .is_err()
        );
        assert!(
            BufferParameters::default()
                .with_mitre_limit(0.5)
                .validate()
                .is_err()
        );
        assert!(
            BufferParameters::default()
                .with_mitre_limit(f64::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_serde_defaults() {
        let params: BufferParameters = serde_json::from_str("{}").unwrap();
        assert_eq!(params, BufferParameters::default());
        let flat = BufferParameters::default().with_end_cap_style(EndCapStyle::Flat);
        let json = serde_json::to_string(&flat).unwrap();
        assert!(json.contains("\"flat\""));
    }
}
