//! Server configuration
//!
//! Command-line flags with environment variable fallbacks.

use clap::Parser;
use mergelink_bridge::BridgeConfig;
use mergelink_core::template::MessageTemplates;

/// Server configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "mergelink")]
#[command(about = "Builds GitLab merge requests and reports the results back", long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "MERGELINK_BIND_ADDR", default_value = "0.0.0.0:8090")]
    pub bind_addr: String,

    /// GitLab instance URL
    #[arg(long, env = "MERGELINK_GITLAB_URL")]
    pub gitlab_url: String,

    /// GitLab project id or full path ("group/app")
    #[arg(long, env = "MERGELINK_GITLAB_PROJECT")]
    pub gitlab_project: String,

    /// GitLab access token with api scope
    #[arg(long, env = "MERGELINK_GITLAB_TOKEN", hide_env_values = true)]
    pub gitlab_token: String,

    /// Secret GitLab sends in X-Gitlab-Token
    #[arg(long, env = "MERGELINK_WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: Option<String>,

    /// Executor API base URL
    #[arg(long, env = "MERGELINK_EXECUTOR_URL", default_value = "http://localhost:8080")]
    pub executor_url: String,

    /// Job the executor runs for merge requests
    #[arg(long, env = "MERGELINK_JOB")]
    pub job: String,

    /// Public URL of the executor, prefixed to build paths in notes
    #[arg(long, env = "MERGELINK_ROOT_URL")]
    pub root_url: String,

    /// Note template for successful builds
    #[arg(long, env = "MERGELINK_SUCCESS_MESSAGE")]
    pub success_message: Option<String>,

    /// Note template for unstable builds
    #[arg(long, env = "MERGELINK_UNSTABLE_MESSAGE")]
    pub unstable_message: Option<String>,

    /// Note template for failed, aborted and unbuilt builds
    #[arg(long, env = "MERGELINK_FAILURE_MESSAGE")]
    pub failure_message: Option<String>,
}

impl Config {
    /// Webhook secret, treating an empty value as unset
    pub fn webhook_secret(&self) -> Option<&str> {
        self.webhook_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
    }

    /// Bridge configuration: root URL and templates, defaults filled in
    pub fn bridge_config(&self) -> BridgeConfig {
        let defaults = MessageTemplates::default();
        let templates = MessageTemplates {
            success: self.success_message.clone().unwrap_or(defaults.success),
            unstable: self.unstable_message.clone().unwrap_or(defaults.unstable),
            failure: self.failure_message.clone().unwrap_or(defaults.failure),
        };

        BridgeConfig::new(self.root_url.clone()).with_templates(templates)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [
            ("gitlab_url", &self.gitlab_url),
            ("executor_url", &self.executor_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.gitlab_project.trim().is_empty() {
            anyhow::bail!("gitlab_project cannot be empty");
        }

        if self.gitlab_token.is_empty() {
            anyhow::bail!("gitlab_token cannot be empty");
        }

        if self.job.trim().is_empty() {
            anyhow::bail!("job cannot be empty");
        }

        self.bridge_config().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Config {
        let mut args = vec![
            "mergelink",
            "--gitlab-url",
            "https://gitlab.example.com",
            "--gitlab-project",
            "group/app",
            "--gitlab-token",
            "glpat-secret",
            "--job",
            "app",
            "--root-url",
            "https://ci.example.com",
        ];
        args.extend_from_slice(extra);
        Config::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.bind_addr, "0.0.0.0:8090");
        assert_eq!(config.executor_url, "http://localhost:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bridge_config_templates() {
        let config = parse(&["--success-message", "Passed #build.number#"]);
        let bridge = config.bridge_config();

        assert_eq!(bridge.root_url, "https://ci.example.com/");
        assert_eq!(bridge.templates.success, "Passed #build.number#");
        assert_eq!(
            bridge.templates.failure,
            MessageTemplates::default().failure
        );
    }

    #[test]
    fn test_empty_webhook_secret_is_unset() {
        assert_eq!(parse(&[]).webhook_secret(), None);
        assert_eq!(parse(&["--webhook-secret", ""]).webhook_secret(), None);
        assert_eq!(
            parse(&["--webhook-secret", "s3cret"]).webhook_secret(),
            Some("s3cret")
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = parse(&[]);

        config.gitlab_url = "gitlab.example.com".to_string();
        assert!(config.validate().is_err());
        config.gitlab_url = "https://gitlab.example.com".to_string();

        config.job = " ".to_string();
        assert!(config.validate().is_err());
        config.job = "app".to_string();

        config.root_url = "ci.example.com".to_string();
        assert!(config.validate().is_err());
        config.root_url = "https://ci.example.com".to_string();

        assert!(config.validate().is_ok());
    }
}
