use std::{borrow::Cow, sync::LazyLock};

use thiserror::Error;

use crate::{
    markup::{MarkupTree, ParseError, contains_markup, rewrite, serialize_runs},
    policy::{ConfigError, FontPolicy, FormatterConfig, UnitSyntax},
    segment::segment,
    unicode::{Composition, ScriptClass, composition},
};

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("label looks like markup but does not parse: {0}")]
    Parse(#[from] ParseError),
}

/// Outcome of formatting one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatted<'a> {
    /// Empty or whitespace-only label; nothing to do.
    Unchanged(&'a str),
    /// The label is a single script: keep the text and set the whole unit's
    /// font to `font`.
    WholeFont {
        value: &'a str,
        class: ScriptClass,
        font: &'a str,
    },
    /// Replacement rich-text value.
    Markup(String),
}

impl<'a> Formatted<'a> {
    #[inline]
    pub fn value(&self) -> &str {
        match self {
            Formatted::Unchanged(value) | Formatted::WholeFont { value, .. } => *value,
            Formatted::Markup(markup) => markup.as_str(),
        }
    }

    #[inline]
    pub fn is_markup(&self) -> bool {
        matches!(self, Formatted::Markup(_))
    }

    /// Whole-unit font, for single-script labels only.
    #[inline]
    pub fn font(&self) -> Option<&'a str> {
        match self {
            Formatted::WholeFont { font, .. } => Some(*font),
            _ => None,
        }
    }

    pub fn into_value(self) -> Cow<'a, str> {
        match self {
            Formatted::Unchanged(value) | Formatted::WholeFont { value, .. } => {
                Cow::Borrowed(value)
            }
            Formatted::Markup(markup) => Cow::Owned(markup),
        }
    }
}

/// Dual-font formatter. Immutable once built, so one instance can be shared
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct DualFont {
    policy: FontPolicy,
    unit: UnitSyntax,
}

static DEFAULT_FORMATTER: LazyLock<DualFont> = LazyLock::new(DualFont::default);

/// Format `label` with the default policy (SimSun / Times New Roman, span units).
pub fn apply(label: &str) -> Result<Formatted<'_>, FormatError> {
    DEFAULT_FORMATTER.apply(label)
}

impl DualFont {
    pub fn builder() -> DualFontBuilder {
        DualFontBuilder::default()
    }

    pub fn from_config(config: FormatterConfig) -> Result<Self, ConfigError> {
        config.fonts.validate()?;
        Ok(Self {
            policy: config.fonts,
            unit: config.unit,
        })
    }

    #[inline]
    pub fn policy(&self) -> &FontPolicy {
        &self.policy
    }

    #[inline]
    pub fn unit(&self) -> UnitSyntax {
        self.unit
    }

    /// Format one label.
    ///
    /// Markup-looking labels are parsed and rewritten; plain labels either get
    /// a whole-unit font (single script) or are converted to markup (mixed).
    /// A label that looks like markup but does not parse is returned as an
    /// error and nothing is produced for it.
    pub fn apply<'a>(&'a self, label: &'a str) -> Result<Formatted<'a>, FormatError> {
        if contains_markup(label) {
            let mut tree = MarkupTree::parse(label).inspect_err(|e| {
                tracing::warn!(error = %e, len = label.len(), "markup label rejected");
            })?;
            rewrite(&mut tree, &self.policy, self.unit);
            tracing::debug!(len = label.len(), "markup label rewritten");
            return Ok(Formatted::Markup(tree.to_markup()));
        }

        match composition(label) {
            Composition::Empty => Ok(Formatted::Unchanged(label)),
            Composition::Single(class) => {
                let font = self.policy.font_for(class);
                tracing::debug!(class = class.name(), font, "single-script label");
                Ok(Formatted::WholeFont {
                    value: label,
                    class,
                    font,
                })
            }
            Composition::Mixed => {
                let markup = serialize_runs(segment(label), &self.policy, self.unit);
                tracing::debug!(len = label.len(), "mixed-script label converted to markup");
                Ok(Formatted::Markup(markup))
            }
        }
    }

    /// Format every label, one result per label in input order. A failing
    /// label does not stop the batch.
    pub fn apply_all<'a, I>(&'a self, labels: I) -> Vec<Result<Formatted<'a>, FormatError>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let results: Vec<_> = labels.into_iter().map(|label| self.apply(label)).collect();
        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::debug!(total = results.len(), failed, "batch formatted");
        results
    }
}

#[derive(Debug, Default)]
pub struct DualFontBuilder {
    config: FormatterConfig,
}

impl DualFontBuilder {
    pub fn cjk_font(mut self, font: impl Into<String>) -> Self {
        self.config.fonts.cjk = font.into();
        self
    }

    pub fn other_font(mut self, font: impl Into<String>) -> Self {
        self.config.fonts.other = font.into();
        self
    }

    pub fn unit(mut self, unit: UnitSyntax) -> Self {
        self.config.unit = unit;
        self
    }

    pub fn config(mut self, config: FormatterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<DualFont, ConfigError> {
        DualFont::from_config(self.config)
    }
}
