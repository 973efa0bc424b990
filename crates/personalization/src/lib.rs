//! User-tunable visual parameters for the curtains background and the halo
//! border, plus their persisted JSON form.
//!
//! The structs here carry no behaviour beyond defaults and (de)serialisation.
//! They are owned by whatever edits them and handed to the renderer by value
//! each update; the renderer never mutates them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to parse personalization settings: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to encode personalization settings: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("unknown background style '{0}'")]
    UnknownStyle(String),
}

/// RGBA container used for persisted colour customisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbaColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl RgbaColor {
    pub const fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

fn default_alpha() -> f64 {
    1.0
}

/// Hand-authored background looks selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BackgroundStyle {
    DeepBlue,
    DeepRed,
    DeepGreen,
}

impl BackgroundStyle {
    pub fn all() -> &'static [BackgroundStyle] {
        &[
            BackgroundStyle::DeepBlue,
            BackgroundStyle::DeepRed,
            BackgroundStyle::DeepGreen,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            BackgroundStyle::DeepBlue => "Deep Blue",
            BackgroundStyle::DeepRed => "Deep Red",
            BackgroundStyle::DeepGreen => "Deep Green",
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            BackgroundStyle::DeepBlue => "deepBlue",
            BackgroundStyle::DeepRed => "deepRed",
            BackgroundStyle::DeepGreen => "deepGreen",
        }
    }

    /// Cycles through [`BackgroundStyle::all`], wrapping at the end.
    pub fn next(self) -> Self {
        let all = Self::all();
        let index = all.iter().position(|style| *style == self).unwrap_or(0);
        all[(index + 1) % all.len()]
    }
}

impl fmt::Display for BackgroundStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackgroundStyle {
    type Err = SettingsError;

    /// Accepts ids (`deepBlue`), display names (`Deep Blue`) and the bare
    /// colour (`blue`), ignoring case, spaces, dashes and underscores.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "deepblue" | "blue" => Ok(BackgroundStyle::DeepBlue),
            "deepred" | "red" => Ok(BackgroundStyle::DeepRed),
            "deepgreen" | "green" => Ok(BackgroundStyle::DeepGreen),
            _ => Err(SettingsError::UnknownStyle(value.to_string())),
        }
    }
}

/// Parameters for the rounded-rectangle halo overlay.
///
/// Geometry is expressed in surface points; the renderer normalises it by the
/// smaller surface dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HaloEffectSettings {
    /// Master visibility toggle; a hidden halo is not drawn at all.
    pub is_visible: bool,
    pub corner_radius: f64,
    pub edge_inset: f64,
    /// Inward offset of the animated wave.
    #[serde(default = "default_wave_inset_pixels")]
    pub wave_inset_pixels: f64,
    /// Displacement amplitude of the wave.
    #[serde(default = "default_wave_amplitude_pixels")]
    pub wave_amplitude_pixels: f64,
    /// Wave peaks around the perimeter.
    #[serde(default = "default_wave_count")]
    pub wave_count: f64,
    /// Scales `pulse_speed` into the wave travel speed.
    #[serde(default = "default_wave_speed_multiplier")]
    pub wave_speed_multiplier: f64,
    /// Constant term added to the wave travel speed.
    #[serde(default = "default_wave_speed_offset")]
    pub wave_speed_offset: f64,
    /// Width of the bright inner line.
    pub core_width: f64,
    /// Width of the main glow band.
    pub glow_width: f64,
    /// Width of the outer haze.
    pub mist_width: f64,
    pub halo_strength: f64,
    pub pulse_base: f64,
    pub pulse_amount: f64,
    pub pulse_speed: f64,
    /// Hue cycles per second around the border.
    pub color_shift_speed: f64,
}

fn default_wave_inset_pixels() -> f64 {
    4.0
}

fn default_wave_amplitude_pixels() -> f64 {
    11.0
}

fn default_wave_count() -> f64 {
    3.0
}

fn default_wave_speed_multiplier() -> f64 {
    1.2
}

fn default_wave_speed_offset() -> f64 {
    0.2
}

impl Default for HaloEffectSettings {
    fn default() -> Self {
        Self {
            is_visible: true,
            corner_radius: 88.0,
            edge_inset: 2.0,
            wave_inset_pixels: default_wave_inset_pixels(),
            wave_amplitude_pixels: default_wave_amplitude_pixels(),
            wave_count: default_wave_count(),
            wave_speed_multiplier: default_wave_speed_multiplier(),
            wave_speed_offset: default_wave_speed_offset(),
            core_width: 4.0,
            glow_width: 14.0,
            mist_width: 34.0,
            halo_strength: 0.92,
            pulse_base: 0.78,
            pulse_amount: 0.22,
            pulse_speed: 2.2,
            color_shift_speed: 0.04,
        }
    }
}

/// Parameters for the animated gradient background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundEffectSettings {
    pub soft_glow_enabled: bool,
    /// Base colour the palette shades are derived from when no named style is set.
    pub custom_color: RgbaColor,
    /// Named style overriding `custom_color` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BackgroundStyle>,
    pub wave_amplitude: f64,
    pub wave_frequency: f64,
    pub wave_speed: f64,
    /// Glow radius in UV units.
    pub touch_glow_radius: f64,
    pub touch_glow_intensity: f64,
    /// Per-frame interpolation factor for the trailing glow position.
    pub touch_follow_speed: f64,
}

impl Default for BackgroundEffectSettings {
    fn default() -> Self {
        Self {
            soft_glow_enabled: true,
            custom_color: RgbaColor::new(0.14, 0.34, 0.72, 1.0),
            style: None,
            wave_amplitude: 0.08,
            wave_frequency: 8.0,
            wave_speed: 0.2,
            touch_glow_radius: 0.35,
            touch_glow_intensity: 1.0,
            touch_follow_speed: 0.05,
        }
    }
}

/// Root settings object persisted as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewPersonalizationSettings {
    pub halo: HaloEffectSettings,
    pub background: BackgroundEffectSettings,
}

impl ViewPersonalizationSettings {
    pub fn from_json_str(input: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(input).map_err(SettingsError::Parse)
    }

    pub fn from_json_slice(input: &[u8]) -> Result<Self, SettingsError> {
        serde_json::from_slice(input).map_err(SettingsError::Parse)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, SettingsError> {
        serde_json::to_string_pretty(self).map_err(SettingsError::Encode)
    }

    /// Decodes a persisted blob, falling back to `current` when it is malformed.
    ///
    /// Empty input means nothing was persisted yet and is not an error. The
    /// returned error is informational only; callers keep the returned settings
    /// either way.
    pub fn decode_or_keep(current: Self, input: &[u8]) -> (Self, Option<SettingsError>) {
        if input.iter().all(u8::is_ascii_whitespace) {
            return (current, None);
        }
        match Self::from_json_slice(input) {
            Ok(decoded) => (decoded, None),
            Err(err) => (current, Some(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSISTED_WITHOUT_WAVES: &str = r#"
{
  "halo": {
    "isVisible": false,
    "cornerRadius": 120,
    "edgeInset": 3.5,
    "coreWidth": 5,
    "glowWidth": 20,
    "mistWidth": 40,
    "haloStrength": 1.1,
    "pulseBase": 0.5,
    "pulseAmount": 0.3,
    "pulseSpeed": 3,
    "colorShiftSpeed": 0.1
  },
  "background": {
    "softGlowEnabled": false,
    "customColor": { "red": 0.5, "green": 0.25, "blue": 0.75 },
    "waveAmplitude": 0.1,
    "waveFrequency": 4,
    "waveSpeed": 0.4,
    "touchGlowRadius": 0.2,
    "touchGlowIntensity": 1.5,
    "touchFollowSpeed": 0.1
  }
}
"#;

    #[test]
    fn missing_wave_fields_take_documented_defaults() {
        let settings =
            ViewPersonalizationSettings::from_json_str(PERSISTED_WITHOUT_WAVES).expect("decode");
        assert_eq!(settings.halo.wave_count, 3.0);
        assert_eq!(settings.halo.wave_inset_pixels, 4.0);
        assert_eq!(settings.halo.wave_amplitude_pixels, 11.0);
        assert_eq!(settings.halo.wave_speed_multiplier, 1.2);
        assert_eq!(settings.halo.wave_speed_offset, 0.2);
        assert!(!settings.halo.is_visible);
        assert_eq!(settings.halo.corner_radius, 120.0);
        assert_eq!(settings.background.custom_color.alpha, 1.0);
        assert_eq!(settings.background.style, None);
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let blob = r#"{ "halo": { "isVisible": true }, "background": {} }"#;
        let err = ViewPersonalizationSettings::from_json_str(blob).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn decode_or_keep_retains_current_on_garbage() {
        let mut current = ViewPersonalizationSettings::default();
        current.background.wave_speed = 0.9;
        let (kept, err) = ViewPersonalizationSettings::decode_or_keep(current.clone(), b"{not json");
        assert_eq!(kept, current);
        assert!(err.is_some());
    }

    #[test]
    fn decode_or_keep_treats_empty_as_nothing_persisted() {
        let current = ViewPersonalizationSettings::default();
        let (kept, err) = ViewPersonalizationSettings::decode_or_keep(current.clone(), b"  \n");
        assert_eq!(kept, current);
        assert!(err.is_none());
    }

    #[test]
    fn encoded_settings_use_camel_case_keys() {
        let mut settings = ViewPersonalizationSettings::default();
        settings.background.style = Some(BackgroundStyle::DeepRed);
        let json = settings.to_json_string_pretty().expect("encode");
        assert!(json.contains("\"isVisible\""));
        assert!(json.contains("\"waveSpeedMultiplier\""));
        assert!(json.contains("\"touchFollowSpeed\""));
        assert!(json.contains("\"deepRed\""));

        let decoded = ViewPersonalizationSettings::from_json_str(&json).expect("decode");
        assert_eq!(decoded, settings);
    }

    #[test]
    fn unset_style_is_omitted() {
        let json = ViewPersonalizationSettings::default()
            .to_json_string_pretty()
            .expect("encode");
        assert!(!json.contains("\"style\""));
    }

    #[test]
    fn style_parses_ids_and_display_names() {
        assert_eq!(
            "deepGreen".parse::<BackgroundStyle>().unwrap(),
            BackgroundStyle::DeepGreen
        );
        assert_eq!(
            "Deep Red".parse::<BackgroundStyle>().unwrap(),
            BackgroundStyle::DeepRed
        );
        assert_eq!(
            "deep-blue".parse::<BackgroundStyle>().unwrap(),
            BackgroundStyle::DeepBlue
        );
        assert!(matches!(
            "plaid".parse::<BackgroundStyle>(),
            Err(SettingsError::UnknownStyle(_))
        ));
    }

    #[test]
    fn style_cycle_wraps() {
        let mut style = BackgroundStyle::DeepBlue;
        for _ in 0..BackgroundStyle::all().len() {
            style = style.next();
        }
        assert_eq!(style, BackgroundStyle::DeepBlue);
        assert_eq!(BackgroundStyle::DeepGreen.next(), BackgroundStyle::DeepBlue);
    }
}
