use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::browser::webdriver::WebDriverOptions;
use crate::element::wait::WaitPolicy;
use crate::report::ReportFormat;
use crate::runner::filter::RunMode;
use crate::steps::context::Sites;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "bdd-lab.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "bdd-lab",
    version,
    about = "Gherkin-driven browser UI tests for Elite Shoppy and Google Search"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: bdd-lab.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against a browser
    Run(RunArgs),

    /// Match every step against the registry without a browser
    Check {
        /// Feature file or directory
        #[arg(long)]
        features: Option<String>,

        /// Tag expression (repeatable; values are ANDed)
        #[arg(long)]
        tags: Vec<String>,
    },

    /// List registered step patterns by keyword
    Steps,

    /// Re-render a saved JSON run record
    Report {
        /// Path to the run record
        #[arg(long)]
        json: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
        format: ReportFormat,

        /// Output file path (default: stdout for console)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Feature file or directory (default: config `run.features`)
    #[arg(long)]
    pub features: Option<String>,

    /// Scenario selection mode
    #[arg(long, value_enum, default_value_t = RunMode::All)]
    pub mode: RunMode,

    /// Feature area for `--mode area`, matched against the file path
    #[arg(long)]
    pub area: Option<String>,

    /// Tag expression, e.g. `@smoke,@high` or `~@slow` (repeatable; ANDed)
    #[arg(long)]
    pub tags: Vec<String>,

    /// Where to write the JSON run record
    #[arg(long)]
    pub json: Option<String>,

    /// Output format (default: config `run.format`)
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Output file path (default: stdout for console, reports dir otherwise)
    #[arg(short, long)]
    pub output: Option<String>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `bdd-lab.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    #[serde(default)]
    pub sites: Sites,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_browser")]
    pub name: String,

    #[serde(default)]
    pub headless: bool,

    #[serde(default = "default_width")]
    pub window_width: u32,

    #[serde(default = "default_height")]
    pub window_height: u32,

    /// Extra browser command-line switches.
    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            name: default_browser(),
            headless: false,
            window_width: default_width(),
            window_height: default_height(),
            args: vec!["--disable-notifications".into(), "--no-sandbox".into()],
            command_timeout_secs: default_command_timeout(),
        }
    }
}

impl BrowserConfig {
    pub fn to_options(&self) -> WebDriverOptions {
        WebDriverOptions {
            webdriver_url: self.webdriver_url.clone(),
            browser: self.name.clone(),
            headless: self.headless,
            window_width: self.window_width,
            window_height: self.window_height,
            args: self.args.clone(),
            command_timeout: Duration::from_secs(self.command_timeout_secs),
        }
    }
}

/// Wait budgets in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    #[serde(default = "default_element_wait")]
    pub element: f64,

    #[serde(default = "default_page_load")]
    pub page_load: f64,

    #[serde(default = "default_settle")]
    pub settle: f64,

    #[serde(default = "default_probe")]
    pub probe: f64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            element: default_element_wait(),
            page_load: default_page_load(),
            settle: default_settle(),
            probe: default_probe(),
        }
    }
}

impl TimeoutsConfig {
    pub fn to_policy(&self) -> WaitPolicy {
        WaitPolicy {
            element: seconds(self.element),
            page_load: seconds(self.page_load),
            settle: seconds(self.settle),
            probe: seconds(self.probe),
        }
    }
}

/// Negative or non-finite values read as zero.
fn seconds(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value)
    } else {
        Duration::ZERO
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    #[serde(default = "default_reports_dir")]
    pub dir: String,

    /// JSON run record, relative to `dir` unless absolute.
    #[serde(default = "default_json")]
    pub json: String,

    #[serde(default = "default_summary")]
    pub summary: String,

    /// JSON-lines step trace; disabled when unset.
    #[serde(default)]
    pub trace: Option<String>,

    #[serde(default = "default_true")]
    pub screenshots: bool,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            dir: default_reports_dir(),
            json: default_json(),
            summary: default_summary(),
            trace: None,
            screenshots: true,
        }
    }
}

impl ReportsConfig {
    fn resolve(&self, file: &str) -> PathBuf {
        let path = PathBuf::from(file);
        if path.is_absolute() {
            path
        } else {
            PathBuf::from(&self.dir).join(path)
        }
    }

    pub fn json_path(&self) -> PathBuf {
        self.resolve(&self.json)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.resolve(&self.summary)
    }

    pub fn trace_path(&self) -> Option<PathBuf> {
        self.trace.as_deref().map(|t| self.resolve(t))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_features")]
    pub features: String,

    #[serde(default)]
    pub format: ReportFormat,

    #[serde(default = "default_suite_name")]
    pub suite_name: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            features: default_features(),
            format: ReportFormat::Console,
            suite_name: default_suite_name(),
        }
    }
}

// Serde default helpers
fn default_webdriver_url() -> String { "http://localhost:9515".to_string() }
fn default_browser() -> String { "chrome".to_string() }
fn default_width() -> u32 { 1920 }
fn default_height() -> u32 { 1080 }
fn default_command_timeout() -> u64 { 60 }
fn default_element_wait() -> f64 { 10.0 }
fn default_page_load() -> f64 { 20.0 }
fn default_settle() -> f64 { 2.0 }
fn default_probe() -> f64 { 5.0 }
fn default_reports_dir() -> String { "reports".to_string() }
fn default_json() -> String { "run.json".to_string() }
fn default_summary() -> String { "test_summary.txt".to_string() }
fn default_true() -> bool { true }
fn default_features() -> String { "features".to_string() }
fn default_suite_name() -> String { "bdd-lab".to_string() }

// ============================================================================
// Validation
// ============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unsupported browser '{0}' (expected chrome or firefox)")]
    UnsupportedBrowser(String),

    #[error("window size {width}x{height} must be non-zero")]
    WindowSize { width: u32, height: u32 },

    #[error("webdriver_url '{0}' must start with http:// or https://")]
    WebDriverUrl(String),
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let browser = self.browser.name.to_ascii_lowercase();
        if browser != "chrome" && browser != "firefox" {
            return Err(ConfigError::UnsupportedBrowser(self.browser.name.clone()));
        }
        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            return Err(ConfigError::WindowSize {
                width: self.browser.window_width,
                height: self.browser.window_height,
            });
        }
        let url = &self.browser.webdriver_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::WebDriverUrl(url.clone()));
        }
        Ok(())
    }

    /// Apply `run` flags that override file values.
    pub fn apply_run_args(&mut self, args: &RunArgs) {
        if let Some(url) = &args.webdriver_url {
            self.browser.webdriver_url = url.clone();
        }
        if args.headless {
            self.browser.headless = true;
        }
        if let Some(features) = &args.features {
            self.run.features = features.clone();
        }
        if let Some(format) = args.format {
            self.run.format = format;
        }
    }
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring malformed config '{}': {}", config_path, e);
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    }
}
