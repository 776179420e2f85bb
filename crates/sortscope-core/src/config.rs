use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::producers::Algorithm;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub visualizer: VisualizerConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizerConfig {
    /// Length of generated arrays (5-15)
    #[serde(default = "default_array_size")]
    pub array_size: usize,
    /// Speed slider position (10-500, higher is faster)
    #[serde(default = "default_speed")]
    pub speed: u32,
    /// Smallest generated value
    #[serde(default = "default_min_value")]
    pub min_value: i64,
    /// Generated values stay below this
    #[serde(default = "default_max_value")]
    pub max_value: i64,
    /// Algorithm selected at startup
    #[serde(default)]
    pub default_algorithm: Algorithm,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            array_size: default_array_size(),
            speed: default_speed(),
            min_value: default_min_value(),
            max_value: default_max_value(),
            default_algorithm: Algorithm::default(),
        }
    }
}

impl VisualizerConfig {
    /// Array size clamped to what the visualizer accepts
    pub fn array_size(&self) -> usize {
        self.array_size
            .clamp(crate::session::MIN_LEN, crate::session::MAX_LEN)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Enable the explain and quiz features
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Gemini API key
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    /// Gemini model name
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    /// Attempts before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// First backoff delay in milliseconds, doubled per attempt
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            gemini_api_key: None,
            gemini_model: default_gemini_model(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            request_timeout_secs: default_timeout(),
        }
    }
}

impl AiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// API key from config, falling back to `GEMINI_API_KEY`
    pub fn api_key(&self) -> Option<String> {
        self.gemini_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Print values under the bars
    #[serde(default = "default_true")]
    pub show_values: bool,
    /// Optional color overrides
    #[serde(default)]
    pub colors: ThemeColorOverrides,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            show_values: default_true(),
            colors: ThemeColorOverrides::default(),
        }
    }
}

/// Optional color overrides for theme customization
/// Each color is a hex string (e.g., "#ff0000" or "ff0000")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    /// Background
    pub bg: Option<String>,
    /// Foreground text
    pub fg: Option<String>,
    /// Untagged bar
    pub bar: Option<String>,
    /// Bars being compared
    pub comparing: Option<String>,
    /// Bars being swapped or overwritten
    pub swapping: Option<String>,
    /// Settled bars
    pub sorted: Option<String>,
    /// Highlighted key / pivot
    pub active: Option<String>,
    /// Accent color
    pub accent: Option<String>,
    /// Error color
    pub error: Option<String>,
    /// Success color
    pub success: Option<String>,
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "<C-c>" (Ctrl+c), "<S-g>" (Shift+g), "<CR>" (Enter), "<Esc>", "<Tab>", "<Space>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Generate a new random array
    #[serde(default = "default_key_generate")]
    pub generate: String,
    /// Start sorting
    #[serde(default = "default_key_start")]
    pub start: String,
    /// Pause or resume the running sort
    #[serde(default = "default_key_toggle_pause")]
    pub toggle_pause: String,
    /// Select next algorithm
    #[serde(default = "default_key_next_algorithm")]
    pub next_algorithm: String,
    /// Select previous algorithm
    #[serde(default = "default_key_prev_algorithm")]
    pub prev_algorithm: String,
    /// Grow the array
    #[serde(default = "default_key_size_up")]
    pub size_up: String,
    /// Shrink the array
    #[serde(default = "default_key_size_down")]
    pub size_down: String,
    /// Faster playback
    #[serde(default = "default_key_speed_up")]
    pub speed_up: String,
    /// Slower playback
    #[serde(default = "default_key_speed_down")]
    pub speed_down: String,
    /// Type a custom array
    #[serde(default = "default_key_custom_array")]
    pub custom_array: String,
    /// Ask for an explanation of the algorithm
    #[serde(default = "default_key_explain")]
    pub explain: String,
    /// Ask for a quiz about the algorithm
    #[serde(default = "default_key_quiz")]
    pub quiz: String,
    /// Show help
    #[serde(default = "default_key_help")]
    pub help: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            generate: default_key_generate(),
            start: default_key_start(),
            toggle_pause: default_key_toggle_pause(),
            next_algorithm: default_key_next_algorithm(),
            prev_algorithm: default_key_prev_algorithm(),
            size_up: default_key_size_up(),
            size_down: default_key_size_down(),
            speed_up: default_key_speed_up(),
            speed_down: default_key_speed_down(),
            custom_array: default_key_custom_array(),
            explain: default_key_explain(),
            quiz: default_key_quiz(),
            help: default_key_help(),
        }
    }
}

// Default keymap values (Vim-style notation)
fn default_key_quit() -> String { "q".to_string() }
fn default_key_generate() -> String { "g".to_string() }
fn default_key_start() -> String { "<CR>".to_string() }
fn default_key_toggle_pause() -> String { "<Space>".to_string() }
fn default_key_next_algorithm() -> String { "j".to_string() }
fn default_key_prev_algorithm() -> String { "k".to_string() }
fn default_key_size_up() -> String { "+".to_string() }
fn default_key_size_down() -> String { "-".to_string() }
fn default_key_speed_up() -> String { "l".to_string() }
fn default_key_speed_down() -> String { "h".to_string() }
fn default_key_custom_array() -> String { "c".to_string() }
fn default_key_explain() -> String { "e".to_string() }
fn default_key_quiz() -> String { "z".to_string() }
fn default_key_help() -> String { "?".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sortscope")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_array_size() -> usize {
    15
}

fn default_speed() -> u32 {
    460 // 50ms per step
}

fn default_min_value() -> i64 {
    10
}

fn default_max_value() -> i64 {
    380
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_timeout() -> u64 {
    30
}

fn default_tick_rate() -> u64 {
    16
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
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaults if it does not exist
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/sortscope/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("sortscope")
            .join("config.toml")
    }

    /// Get the log file path used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("sortscope.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
