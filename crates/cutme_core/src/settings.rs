use crate::error::Result;
use crate::types::TimeMs;
use serde::{Deserialize, Serialize};

/// Per-device editor configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorSettings {
    /// Width of the timeline viewport in density-independent units. A track
    /// as long as the longest track spans exactly this width at zoom 1.
    pub viewport_width_dp: f32,
    /// Physical pixels per dp.
    pub density: f32,
    pub min_zoom: f32,
    pub history_limit: usize,
    /// Length given to imported media that has no duration of its own.
    pub default_import_duration: TimeMs,
}

impl EditorSettings {
    /// Padding before the first piece; lets time zero scroll to the centre line.
    pub fn leading_padding_dp(&self) -> f32 {
        self.viewport_width_dp / 2.0
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        preset_phone()
    }
}

/// 411dp-wide phone at xxhdpi.
pub fn preset_phone() -> EditorSettings {
    EditorSettings {
        viewport_width_dp: 411.0,
        density: 2.625,
        min_zoom: 0.5,
        history_limit: 100,
        default_import_duration: TimeMs(2_000),
    }
}

/// 800dp-wide tablet at xhdpi.
pub fn preset_tablet() -> EditorSettings {
    EditorSettings {
        viewport_width_dp: 800.0,
        density: 2.0,
        ..preset_phone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_values_are_correct() {
        let phone = preset_phone();
        assert_eq!(phone.viewport_width_dp, 411.0);
        assert_eq!(phone.density, 2.625);
        assert_eq!(phone.min_zoom, 0.5);
        assert_eq!(phone.history_limit, 100);
        assert_eq!(phone.default_import_duration, TimeMs(2_000));

        let tablet = preset_tablet();
        assert_eq!(tablet.viewport_width_dp, 800.0);
        assert_eq!(tablet.density, 2.0);
        assert_eq!(tablet.min_zoom, 0.5);
    }

    #[test]
    fn leading_padding_is_half_viewport() {
        assert_eq!(preset_tablet().leading_padding_dp(), 400.0);
    }

    #[test]
    fn json_roundtrip() {
        let settings = preset_tablet();
        let json = settings.to_json().unwrap();
        assert_eq!(EditorSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings = EditorSettings::from_json(r#"{"viewport_width_dp": 360.0}"#).unwrap();
        assert_eq!(settings.viewport_width_dp, 360.0);
        assert_eq!(settings.min_zoom, 0.5);
        assert_eq!(settings.default_import_duration, TimeMs(2_000));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(EditorSettings::from_json("{not json").is_err());
    }
}
