use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::DrawOptions;
use crate::entry::parse_stock;
use crate::ui::Theme;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub appearance: AppearanceConfig,
    pub draw: DrawConfig,
    pub palette: PaletteConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Theme preset: darkwall, catppuccin-mocha, catppuccin-latte, nord, gruvbox
    pub theme: String,
    pub selected_prefix: String,
    pub unselected_prefix: String,
    /// Glyph used for color swatches and the drawn ball
    pub ball_glyph: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Initial batch size
    pub count: usize,
    /// Exclude entries already picked within the same batch
    pub no_repeat: bool,
    /// Skip out-of-stock entries and take stock on every draw
    pub respect_stock: bool,
    /// Spin animation length before a result is revealed
    pub spin_ms: u64,
    /// Fixed RNG seed for reproducible draws
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Default number of generated colors
    pub count: usize,
    /// Default shared stock, empty for unlimited
    pub stock: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where CSV/JSON exports are written
    pub dir: PathBuf,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: "darkwall".to_string(),
            selected_prefix: "❯ ".to_string(),
            unselected_prefix: "  ".to_string(),
            ball_glyph: "●".to_string(),
        }
    }
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            count: 1,
            no_repeat: true,
            respect_stock: true,
            spin_ms: 900,
            seed: None,
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            count: 6,
            stock: "2".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

impl DrawConfig {
    pub fn options(&self) -> DrawOptions {
        DrawOptions {
            count: self.count.max(1),
            no_repeat: self.no_repeat,
            respect_stock: self.respect_stock,
        }
    }

    pub fn spin_duration(&self) -> Duration {
        Duration::from_millis(self.spin_ms)
    }
}

impl PaletteConfig {
    pub fn stock(&self) -> Option<u32> {
        parse_stock(&self.stock)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(expanded.as_ref());

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            tracing::info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Theme named in the config, falling back to the default preset
    pub fn resolve_theme(&self) -> Theme {
        Theme::from_preset(&self.appearance.theme).unwrap_or_else(|| {
            tracing::warn!("Unknown theme '{}', using default", self.appearance.theme);
            Theme::default()
        })
    }

    /// Export directory with `~` expanded
    pub fn export_dir(&self) -> PathBuf {
        let raw = self.export.dir.to_string_lossy();
        PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
    }
}
