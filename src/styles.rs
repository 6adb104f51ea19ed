//! Styling of mismatch annotations.

use serde::{Deserialize, Serialize};

/// Icons (and optional colour hints) used when annotating mismatches.
///
/// # Example
///
/// ```rust
/// use autopsy::{IssueStyleConfig, IssueStyleOverrides};
///
/// let overrides = IssueStyleOverrides {
///     icon_property_missing: Some("?".to_string()),
///     ..Default::default()
/// };
/// let styles = IssueStyleConfig::default().merged(&overrides);
///
/// assert_eq!(styles.icon_property_missing, "?");
/// assert_eq!(styles.icon_property_error, IssueStyleConfig::default().icon_property_error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueStyleConfig {
    /// Prefix for values that fail a constraint.
    pub icon_property_error: String,
    /// Prefix for properties that are required but absent.
    pub icon_property_missing: String,
    /// Colour hint for failing values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_property_error: Option<String>,
    /// Colour hint for missing properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_property_missing: Option<String>,
}

impl Default for IssueStyleConfig {
    fn default() -> Self {
        Self {
            icon_property_error: "❌".to_string(),
            icon_property_missing: "⚠️".to_string(),
            color_property_error: Some("red".to_string()),
            color_property_missing: Some("orange".to_string()),
        }
    }
}

impl IssueStyleConfig {
    /// Returns a copy of `self` with every field set in `overrides` replaced.
    pub fn merged(&self, overrides: &IssueStyleOverrides) -> Self {
        Self {
            icon_property_error: overrides
                .icon_property_error
                .clone()
                .unwrap_or_else(|| self.icon_property_error.clone()),
            icon_property_missing: overrides
                .icon_property_missing
                .clone()
                .unwrap_or_else(|| self.icon_property_missing.clone()),
            color_property_error: overrides
                .color_property_error
                .clone()
                .or_else(|| self.color_property_error.clone()),
            color_property_missing: overrides
                .color_property_missing
                .clone()
                .or_else(|| self.color_property_missing.clone()),
        }
    }

    /// Annotation for a required property that is absent.
    pub fn missing_property(&self, name: &str) -> String {
        format!("{} Missing property '{}'", self.icon_property_missing, name)
    }

    /// Annotation for a value that fails a constraint.
    pub fn property_error(&self, rendered_value: &str, message: &str) -> String {
        format!("{} '{}' {}", self.icon_property_error, rendered_value, message)
    }
}

/// Caller-supplied partial styling; unset fields keep the default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueStyleOverrides {
    /// Replaces [`IssueStyleConfig::icon_property_error`].
    pub icon_property_error: Option<String>,
    /// Replaces [`IssueStyleConfig::icon_property_missing`].
    pub icon_property_missing: Option<String>,
    /// Replaces [`IssueStyleConfig::color_property_error`].
    pub color_property_error: Option<String>,
    /// Replaces [`IssueStyleConfig::color_property_missing`].
    pub color_property_missing: Option<String>,
}
