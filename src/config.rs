#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::constants::{
    DEFAULT_CEILING, DEFAULT_GRADE, DEFAULT_GRADE_ENV, RANGE_ENV, TAB_FALLBACK_ENV,
};

/// What to do with an error-code table whose extension is not recognised.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatPolicy {
    /// Refuse to load it.
    #[default]
    Strict,
    /// Read it as tab-separated text.
    TabFallback,
}

/// Settings for one grading run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct GradingConfig {
    /// Grade every entity starts from.
    #[builder(default = DEFAULT_GRADE)]
    pub default_grade:    f64,
    /// Optional ceiling replacing 100 for range checks and histogram bins.
    #[builder(default, setter(strip_option))]
    pub range_constraint: Option<f64>,
    /// Handling of unrecognised error-code table extensions.
    #[builder(default)]
    pub format_policy:    FormatPolicy,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GradingConfig {
    /// Builds a configuration from `GRADETALLY_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// * `lookup`: returns the value for a `GRADETALLY_*` key, if set
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let default_grade = match value(DEFAULT_GRADE_ENV) {
            Some(v) => v
                .parse::<f64>()
                .with_context(|| format!("{DEFAULT_GRADE_ENV} is not a number: {v}"))?,
            None => DEFAULT_GRADE,
        };
        let range_constraint = value(RANGE_ENV)
            .map(|v| {
                v.parse::<f64>()
                    .with_context(|| format!("{RANGE_ENV} is not a number: {v}"))
            })
            .transpose()?;
        let format_policy = match value(TAB_FALLBACK_ENV).map(|v| v.to_ascii_lowercase()) {
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => {
                FormatPolicy::TabFallback
            }
            _ => FormatPolicy::Strict,
        };

        let config = Self {
            default_grade,
            range_constraint,
            format_policy,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the grade and range constraint are usable numbers.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.default_grade.is_finite(),
            "Default grade must be a finite number, got {}",
            self.default_grade
        );
        if let Some(range) = self.range_constraint {
            ensure!(
                range.is_finite() && range > 0.0,
                "Range constraint must be a positive number, got {range}"
            );
        }
        Ok(())
    }

    /// Ceiling above which a grade is reported as out of range.
    pub fn ceiling(&self) -> f64 {
        self.range_constraint.unwrap_or(DEFAULT_CEILING)
    }
}
