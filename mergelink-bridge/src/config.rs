//! Bridge configuration
//!
//! The executor's public root URL and the three note templates. Both are
//! static per deployment and handed to `MergeRequestBuilds` at construction.

use mergelink_core::template::MessageTemplates;

/// Bridge configuration
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Public base URL of the executor, always ending with '/'
    pub root_url: String,

    /// Note templates per outcome bucket
    pub templates: MessageTemplates,
}

impl BridgeConfig {
    /// Creates a configuration with the default templates
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: normalize_root_url(root_url.into()),
            templates: MessageTemplates::default(),
        }
    }

    /// Replaces the note templates
    pub fn with_templates(mut self, templates: MessageTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.root_url.trim_end_matches('/').is_empty() {
            anyhow::bail!("root_url cannot be empty");
        }

        if !self.root_url.starts_with("http://") && !self.root_url.starts_with("https://") {
            anyhow::bail!("root_url must start with http:// or https://");
        }

        let templates = &self.templates;
        for (name, template) in [
            ("success", &templates.success),
            ("unstable", &templates.unstable),
            ("failure", &templates.failure),
        ] {
            if template.trim().is_empty() {
                anyhow::bail!("{} message template cannot be empty", name);
            }
        }

        Ok(())
    }
}

fn normalize_root_url(mut root_url: String) -> String {
    if !root_url.ends_with('/') {
        root_url.push('/');
    }
    root_url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_url_gets_trailing_slash() {
        let config = BridgeConfig::new("https://ci.example.com");
        assert_eq!(config.root_url, "https://ci.example.com/");

        let config = BridgeConfig::new("https://ci.example.com/");
        assert_eq!(config.root_url, "https://ci.example.com/");
    }

    #[test]
    fn test_config_validation() {
        let mut config = BridgeConfig::new("https://ci.example.com/");
        assert!(config.validate().is_ok());

        config.root_url = "/".to_string();
        assert!(config.validate().is_err());

        config.root_url = "ci.example.com/".to_string();
        assert!(config.validate().is_err());

        config.root_url = "http://localhost:8080/".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_template_is_rejected() {
        let templates = MessageTemplates {
            unstable: "  ".to_string(),
            ..MessageTemplates::default()
        };
        let config = BridgeConfig::new("https://ci.example.com/").with_templates(templates);

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unstable"));
    }
}
