use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroller: ScrollerConfig,
    #[serde(default)]
    pub visibility: VisibilityConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Paged section scroller settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollerConfig {
    /// Allow input to trigger section transitions at all
    #[serde(default = "default_true")]
    pub scrollable: bool,
    /// Continuous scrolling with visibility reporting instead of paged transitions
    #[serde(default)]
    pub use_native_scroll: bool,
    /// Duration of one section transition
    #[serde(default = "default_transition_duration")]
    pub transition_duration_ms: u64,
    /// Timing function of the section transition
    #[serde(default = "default_transition_easing")]
    pub easing: EasingType,
    /// Wheel events closer than this to the last transition are dropped
    #[serde(default = "default_wheel_throttle")]
    pub wheel_throttle_ms: u64,
    /// Wheel deltas with an absolute value at or below this are noise
    #[serde(default = "default_wheel_noise_threshold")]
    pub wheel_noise_threshold: f32,
    /// Touch moves smaller than this (in pixels) are ambiguous
    #[serde(default)]
    pub touch_noise_threshold: f32,
    /// Slack when deciding whether inner content is scrolled to its bottom
    #[serde(default = "default_overflow_tolerance")]
    pub overflow_tolerance: f32,
}

impl Default for ScrollerConfig {
    fn default() -> Self {
        Self {
            scrollable: default_true(),
            use_native_scroll: false,
            transition_duration_ms: default_transition_duration(),
            easing: default_transition_easing(),
            wheel_throttle_ms: default_wheel_throttle(),
            wheel_noise_threshold: default_wheel_noise_threshold(),
            touch_noise_threshold: 0.0,
            overflow_tolerance: default_overflow_tolerance(),
        }
    }
}

/// Visibility reporter settings (native scroll mode)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityConfig {
    /// Visible ratios a section must reach to be considered; the smallest one gates candidates
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<f64>,
    /// Grows (positive) or shrinks (negative) the container viewport before measuring
    #[serde(default)]
    pub root_margin: RootMargin,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            thresholds: default_thresholds(),
            root_margin: RootMargin::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Show the section progress indicator
    #[serde(default = "default_true")]
    pub show_progress: bool,
    /// Smooth scrolling used by native scroll mode
    #[serde(default)]
    pub scroll: SmoothScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            show_progress: default_true(),
            scroll: SmoothScrollConfig::default(),
        }
    }
}

/// Easing curve for animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump at the end of the animation
    None,
    Linear,
    /// Cubic ease-out
    Cubic,
    /// Quintic ease-out
    Quintic,
    /// Exponential ease-out
    EaseOut,
    /// Cubic ease-in-out (CSS `ease-in-out` stand-in)
    EaseInOut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothScrollConfig {
    /// Enable smooth scrolling
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Animation duration in milliseconds
    #[serde(default = "default_smooth_duration")]
    pub animation_duration_ms: u64,
    /// Easing function
    #[serde(default = "default_smooth_easing")]
    pub easing: EasingType,
    /// Lines per wheel notch or arrow key
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
    /// Frame rate while an animation is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_smooth_duration(),
            easing: default_smooth_easing(),
            scroll_lines: default_scroll_lines(),
            animation_fps: default_animation_fps(),
        }
    }
}

/// One side of a root margin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Margin {
    Px(f32),
    Percent(f32),
}

impl Margin {
    /// Resolve against the container extent along the scroll axis
    pub fn resolve(&self, extent: f32) -> f32 {
        match self {
            Margin::Px(px) => *px,
            Margin::Percent(pct) => extent * pct / 100.0,
        }
    }

    fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token == "0" {
            return Some(Margin::Px(0.0));
        }
        if let Some(px) = token.strip_suffix("px") {
            return px.parse().ok().map(Margin::Px);
        }
        if let Some(pct) = token.strip_suffix('%') {
            return pct.parse().ok().map(Margin::Percent);
        }
        None
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Margin::Px(px) => write!(f, "{}px", px),
            Margin::Percent(pct) => write!(f, "{}%", pct),
        }
    }
}

/// Vertical root margin, written CSS-style ("10px 0px -20% 0px")
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: Margin,
    pub bottom: Margin,
}

impl Default for RootMargin {
    fn default() -> Self {
        Self {
            top: Margin::Px(0.0),
            bottom: Margin::Px(0.0),
        }
    }
}

impl RootMargin {
    /// Parse CSS margin shorthand with one to four values; horizontal values are ignored
    pub fn parse(value: &str) -> Option<Self> {
        let parts = value
            .split_whitespace()
            .map(Margin::parse)
            .collect::<Option<Vec<_>>>()?;

        let (top, bottom) = match parts.as_slice() {
            [all] => (*all, *all),
            [vertical, _] => (*vertical, *vertical),
            [top, _, bottom] | [top, _, bottom, _] => (*top, *bottom),
            _ => return None,
        };
        Some(Self { top, bottom })
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0px {} 0px", self.top, self.bottom)
    }
}

impl Serialize for RootMargin {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

// Accept either CSS shorthand or a map with 'top' and 'bottom'
impl<'de> Deserialize<'de> for RootMargin {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};

        struct RootMarginVisitor;

        impl<'de> Visitor<'de> for RootMarginVisitor {
            type Value = RootMargin;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a margin string like \"10px 0px\" or a map with 'top' and 'bottom'")
            }

            fn visit_str<E>(self, value: &str) -> Result<RootMargin, E>
            where
                E: de::Error,
            {
                RootMargin::parse(value)
                    .ok_or_else(|| E::custom(format!("invalid root margin: {value:?}")))
            }

            fn visit_map<M>(self, mut map: M) -> Result<RootMargin, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut margin = RootMargin::default();

                while let Some(key) = map.next_key::<String>()? {
                    let slot = match key.as_str() {
                        "top" => &mut margin.top,
                        "bottom" => &mut margin.bottom,
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                            continue;
                        }
                    };
                    let raw: String = map.next_value()?;
                    *slot = Margin::parse(&raw)
                        .ok_or_else(|| de::Error::custom(format!("invalid margin: {raw:?}")))?;
                }

                Ok(margin)
            }
        }

        deserializer.deserialize_any(RootMarginVisitor)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scrollstage")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_transition_duration() -> u64 {
    500
}

fn default_transition_easing() -> EasingType {
    EasingType::EaseInOut
}

fn default_wheel_throttle() -> u64 {
    500
}

fn default_wheel_noise_threshold() -> f32 {
    1.0
}

fn default_overflow_tolerance() -> f32 {
    1.0
}

fn default_thresholds() -> Vec<f64> {
    vec![0.0]
}

fn default_tick_rate() -> u64 {
    100
}

fn default_smooth_duration() -> u64 {
    150
}

fn default_smooth_easing() -> EasingType {
    EasingType::Cubic
}

fn default_scroll_lines() -> u16 {
    3
}

fn default_animation_fps() -> u32 {
    60
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scrollstage/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrollstage")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("scrollstage.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.scroller.scrollable);
        assert!(!config.scroller.use_native_scroll);
        assert_eq!(config.scroller.transition_duration_ms, 500);
        assert_eq!(config.scroller.wheel_throttle_ms, 500);
        assert_eq!(config.scroller.easing, EasingType::EaseInOut);
        assert_eq!(config.visibility.thresholds, vec![0.0]);
        assert_eq!(config.ui.scroll.easing, EasingType::Cubic);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [scroller]
            use_native_scroll = true
            wheel_throttle_ms = 300

            [visibility]
            root_margin = "-10% 0px"
            "#,
        )
        .unwrap();

        assert!(config.scroller.use_native_scroll);
        assert_eq!(config.scroller.wheel_throttle_ms, 300);
        assert_eq!(config.scroller.transition_duration_ms, 500);
        assert_eq!(config.visibility.root_margin.top, Margin::Percent(-10.0));
        assert_eq!(config.visibility.root_margin.bottom, Margin::Percent(-10.0));
    }

    #[test]
    fn test_root_margin_map_form() {
        let config: VisibilityConfig = toml::from_str(
            r#"
            root_margin = { top = "20px", bottom = "-5%" }
            "#,
        )
        .unwrap();
        assert_eq!(config.root_margin.top, Margin::Px(20.0));
        assert_eq!(config.root_margin.bottom, Margin::Percent(-5.0));
    }

    #[test]
    fn test_root_margin_shorthand() {
        let margin = RootMargin::parse("10px 0 -20% 0").unwrap();
        assert_eq!(margin.top, Margin::Px(10.0));
        assert_eq!(margin.bottom, Margin::Percent(-20.0));
        assert!(RootMargin::parse("10em").is_none());
        assert!(RootMargin::parse("").is_none());
        assert_eq!(Margin::Percent(50.0).resolve(200.0), 100.0);
    }

    #[test]
    fn test_config_serializes() {
        let content = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed.scroller, ScrollerConfig::default());
        assert_eq!(parsed.visibility, VisibilityConfig::default());
    }
}
