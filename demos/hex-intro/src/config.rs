use glam::Vec2;
use serde::{Deserialize, Serialize};
use zap_motion::{Easing, MotionError, Result, SchedulerConfig};

/// Number of hexes in the logo: the middle one and three satellites.
pub const HEX_COUNT: usize = 4;

/// Intro configuration, loaded from the JSON the host page passes in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroConfig {
    /// Fill content per hex: middle, north-east, west, south-east.
    pub shapes: Vec<HexContent>,
    pub primary_font: String,
    pub secondary_font: String,
    pub primary_color: String,
    pub primary_text: String,
    pub secondary_text: String,
    #[serde(default)]
    pub timing: IntroTiming,
}

/// What fills one hexagon once the contours are in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexContent {
    /// Background fill color.
    pub color: String,
    /// Image URL, also used as the image's asset name.
    pub src: String,
    /// Image size in world units.
    pub width: f32,
    pub height: f32,
    /// Opened when the hex is clicked. Ignored for the middle hex.
    #[serde(default)]
    pub url: Option<String>,
}

/// Layout and timing constants. Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntroTiming {
    pub hex_diameter: f32,
    pub hex_gen_duration: f32,
    pub rotation_duration: f32,
    pub shape_fill_duration: f32,
    pub hex_translation_duration: f32,
    pub text_rect_width: f32,
    pub text_rect_height: f32,
    pub translation_factor_x: f32,
    pub translation_factor_y: f32,
    pub time_scale: f32,
    pub easing: Easing,
    /// Keys that skip straight to the end of the intro. Newer browsers report
    /// the space bar as `" "`, older ones as `"Spacebar"`.
    pub skip_keys: Vec<String>,
}

impl Default for IntroTiming {
    fn default() -> Self {
        Self {
            hex_diameter: 100.0,
            hex_gen_duration: 600.0,
            rotation_duration: 300.0,
            shape_fill_duration: 400.0,
            hex_translation_duration: 300.0,
            text_rect_width: 300.0,
            text_rect_height: 50.0,
            translation_factor_x: 0.36,
            translation_factor_y: 0.5,
            time_scale: 0.5,
            easing: Easing::CubicInOut,
            skip_keys: vec!["Escape".into(), " ".into(), "Spacebar".into()],
        }
    }
}

impl IntroTiming {
    /// Where the world origin sits inside the canvas, as a fraction of its size.
    pub fn translation_factor(&self) -> Vec2 {
        Vec2::new(self.translation_factor_x, self.translation_factor_y)
    }
}

impl IntroConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.shapes.len() < HEX_COUNT {
            return Err(MotionError::InvalidConfig(format!(
                "expected {} shapes, got {}",
                HEX_COUNT,
                self.shapes.len()
            )));
        }
        let t = &self.timing;
        if !(t.hex_diameter.is_finite() && t.hex_diameter > 0.0) {
            return Err(MotionError::InvalidConfig(format!(
                "hexDiameter must be positive, got {}",
                t.hex_diameter
            )));
        }
        let durations = [
            t.hex_gen_duration,
            t.rotation_duration,
            t.shape_fill_duration,
            t.hex_translation_duration,
        ];
        if durations.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(MotionError::InvalidConfig(
                "durations must be finite and non-negative".into(),
            ));
        }
        self.scheduler_config().validate()
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::default().with_time_scale(self.timing.time_scale)
    }
}
