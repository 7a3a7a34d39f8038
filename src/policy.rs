//! Font policy – which font each script class gets, and how a styled unit is
//! spelled in markup.
//!
//! The table is plain data so hosts can swap fonts without touching the
//! formatting code. It can be built in code or loaded from TOML:
//!
//! ```toml
//! unit = "span"          # or "font-face"
//!
//! [fonts]
//! cjk = "SimSun"
//! other = "Times New Roman"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::unicode::ScriptClass;

pub const DEFAULT_CJK_FONT: &str = "SimSun";
pub const DEFAULT_OTHER_FONT: &str = "Times New Roman";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config `{0}`: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid {0} font name `{1}`")]
    InvalidFont(&'static str, String),
}

/// Script class → font family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontPolicy {
    pub cjk: String,
    pub other: String,
}

impl Default for FontPolicy {
    fn default() -> Self {
        Self {
            cjk: DEFAULT_CJK_FONT.to_owned(),
            other: DEFAULT_OTHER_FONT.to_owned(),
        }
    }
}

impl FontPolicy {
    pub fn new(cjk: impl Into<String>, other: impl Into<String>) -> Self {
        Self {
            cjk: cjk.into(),
            other: other.into(),
        }
    }

    #[inline(always)]
    pub fn font_for(&self, class: ScriptClass) -> &str {
        match class {
            ScriptClass::Cjk => &self.cjk,
            ScriptClass::Other => &self.other,
        }
    }

    /// `true` if `family` names one of the two policy fonts.
    #[inline]
    pub fn is_policy_font(&self, family: &str) -> bool {
        family == self.cjk || family == self.other
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_font(ScriptClass::Cjk.name(), &self.cjk)?;
        validate_font(ScriptClass::Other.name(), &self.other)
    }
}

// Font names end up inside a style declaration; reject anything that would
// break out of it.
fn validate_font(which: &'static str, name: &str) -> Result<(), ConfigError> {
    let bad = name.trim().is_empty()
        || name.trim() != name
        || name.contains([';', '"', '\'', '<', '>', '&']);
    if bad {
        return Err(ConfigError::InvalidFont(which, name.to_owned()));
    }
    Ok(())
}

/// Markup shape of a styled unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitSyntax {
    /// `<span style="font-family: F;">…</span>`
    #[default]
    Span,
    /// `<font face="F">…</font>`
    FontFace,
}

/// Everything a formatter needs, as loaded from a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub fonts: FontPolicy,
    pub unit: UnitSyntax,
}

impl FormatterConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.fonts.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            cjk = %config.fonts.cjk,
            other = %config.fonts.other,
            unit = ?config.unit,
            "font policy loaded"
        );
        Ok(config)
    }
}
