//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FeatureFlags {
    /// Assess the combined CSRF (PIS/COFINS/CSLL) line
    #[serde(default)]
    pub enable_csrf: bool,

    /// Show detailed error messages (disable in production!)
    #[serde(default)]
    pub verbose_errors: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_default_off() {
        let flags = FeatureFlags::default();
        assert!(!flags.enable_csrf);
        assert!(!flags.verbose_errors);
    }

    #[test]
    fn flags_deserialize_from_json() {
        let json = r#"{"enable_csrf": true, "verbose_errors": false}"#;
        let flags: FeatureFlags = serde_json::from_str(json).unwrap();
        assert!(flags.enable_csrf);
        assert!(!flags.verbose_errors);
    }
}
