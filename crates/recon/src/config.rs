use serde::Deserialize;

use crate::error::VaultError;

/// Marker appended to notes of entries whose password is reused.
pub const DEFAULT_REUSE_MARKER: &str =
    "[VaultCleanup] [!] This password is reused across multiple sites.";

/// Display name exports use for entries saved without one.
pub const DEFAULT_PLACEHOLDER_NAME: &str = "--";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanupConfig {
    /// Names equal to this are replaced with one derived from the first URI.
    pub placeholder_name: String,
    /// Line appended to the notes of entries with a reused password.
    pub reuse_marker: String,
    /// URI prefixes that denote mobile app identifiers.
    pub app_schemes: Vec<String>,
    /// Append `reuse_marker` to reconciled entries with reused passwords.
    pub flag_reused: bool,
    /// Assign unfiled entries to the first folder named inside their username.
    pub assign_folders: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            placeholder_name: DEFAULT_PLACEHOLDER_NAME.into(),
            reuse_marker: DEFAULT_REUSE_MARKER.into(),
            app_schemes: vec!["android://".into(), "androidapp://".into()],
            flag_reused: true,
            assign_folders: true,
        }
    }
}

impl CleanupConfig {
    /// Parse and validate a TOML config. Missing keys take their defaults.
    pub fn from_toml(s: &str) -> Result<Self, VaultError> {
        let config: Self = toml::from_str(s).map_err(|e| VaultError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), VaultError> {
        if self.reuse_marker.trim().is_empty() {
            return Err(VaultError::ConfigValidation("reuse_marker must not be blank".into()));
        }
        if self.app_schemes.is_empty() {
            return Err(VaultError::ConfigValidation(
                "app_schemes must list at least one scheme".into(),
            ));
        }
        for scheme in &self.app_schemes {
            let prefix = scheme.strip_suffix("://").unwrap_or_default();
            if prefix.is_empty() || prefix.contains('/') {
                return Err(VaultError::ConfigValidation(format!(
                    "app scheme '{scheme}' must look like 'name://'"
                )));
            }
        }
        Ok(())
    }
}
