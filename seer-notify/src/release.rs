use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use url::Url;

use seer_shared::Masked;

use crate::notifier::NotifyError;

pub const DEFAULT_API_BASE: &str = "https://sentry.io/api/0";
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// `notify-deploy` command arguments. Every flag falls back to its
/// environment variable.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "notify-deploy",
    about = "Record a release and deploy with the error monitor",
    version
)]
pub struct NotifyArgs {
    /// Release identifier. Defaults to `seer-playground@<now>`.
    #[arg(long = "release", env = "RELEASE_VERSION")]
    pub release: Option<String>,
    #[arg(long = "environment", env = "SENTRY_ENVIRONMENT", default_value = DEFAULT_ENVIRONMENT)]
    pub environment: String,
    #[arg(long = "project", env = "SENTRY_PROJECT_SLUG")]
    pub project_slug: Option<String>,
    #[arg(long = "org", env = "SENTRY_ORG_SLUG")]
    pub org_slug: Option<String>,
    /// When set, the release is posted here and the REST API is not used.
    #[arg(long = "webhook", env = "SENTRY_RELEASE_WEBHOOK", value_name = "url")]
    pub webhook_url: Option<String>,
    #[arg(long = "token", env = "SENTRY_DEPLOY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
    #[arg(long = "deploy-url", env = "DEPLOYMENT_URL", value_name = "url")]
    pub deploy_url: Option<String>,
    /// Defaults to `Deploy <now>`.
    #[arg(long = "deploy-name", env = "DEPLOYMENT_NAME")]
    pub deploy_name: Option<String>,
    /// Commit SHA. `COMMIT_SHA` is read when `GIT_COMMIT_SHA` is unset.
    #[arg(long = "commit", env = "GIT_COMMIT_SHA")]
    pub commit: Option<String>,
    #[arg(long = "api-base", env = "SENTRY_API_BASE_URL", default_value = DEFAULT_API_BASE, value_name = "url")]
    pub api_base: String,
}

fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_url(raw: &str) -> Result<Url, NotifyError> {
    Url::parse(raw).map_err(|source| NotifyError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// A release as it will be announced: every value trimmed, defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Release {
    pub version: String,
    pub environment: String,
    pub project: Option<String>,
    pub url: Option<String>,
    pub commit: Option<String>,
    pub deploy_name: String,
}

/// REST API coordinates for release and deploy registration.
#[derive(Debug, Clone)]
pub struct ApiTarget {
    pub base: Url,
    pub org: String,
    pub project: String,
    pub token: Masked<String>,
}

#[derive(Debug, Clone)]
pub enum Delivery {
    Webhook(Url),
    Api(ApiTarget),
}

impl NotifyArgs {
    pub fn release(&self, now: DateTime<Utc>) -> Release {
        let stamp = now.to_rfc3339();
        Release {
            version: clean(self.release.as_deref())
                .unwrap_or_else(|| format!("seer-playground@{}", stamp)),
            environment: clean(Some(&self.environment))
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            project: clean(self.project_slug.as_deref()),
            url: clean(self.deploy_url.as_deref()),
            commit: clean(self.commit.as_deref()),
            deploy_name: clean(self.deploy_name.as_deref())
                .unwrap_or_else(|| format!("Deploy {}", stamp)),
        }
    }

    /// Webhook wins; otherwise token, org and project are all required.
    pub fn delivery(&self) -> Result<Delivery, NotifyError> {
        if let Some(webhook) = clean(self.webhook_url.as_deref()) {
            return Ok(Delivery::Webhook(parse_url(&webhook)?));
        }

        let token = clean(self.token.as_deref());
        let org = clean(self.org_slug.as_deref());
        let project = clean(self.project_slug.as_deref());

        match (token, org, project) {
            (Some(token), Some(org), Some(project)) => {
                let base = clean(Some(&self.api_base)).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
                Ok(Delivery::Api(ApiTarget {
                    base: parse_url(&base)?,
                    org,
                    project,
                    token: Masked::new(token),
                }))
            }
            (token, org, project) => {
                let missing = [
                    ("SENTRY_DEPLOY_TOKEN", token.is_none()),
                    ("SENTRY_ORG_SLUG", org.is_none()),
                    ("SENTRY_PROJECT_SLUG", project.is_none()),
                ]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| name)
                .collect();
                Err(NotifyError::MissingSettings { missing })
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeployPayload<'a> {
    pub environment: &'a str,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct ReleasePayload<'a> {
    pub version: &'a str,
    pub projects: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub version: &'a str,
    pub environment: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<&'a str>,
    pub deploy: DeployPayload<'a>,
}

impl Release {
    pub fn deploy_payload(&self) -> DeployPayload<'_> {
        DeployPayload {
            environment: &self.environment,
            name: &self.deploy_name,
            url: self.url.as_deref(),
        }
    }

    pub fn release_payload<'a>(&'a self, project: &'a str) -> ReleasePayload<'a> {
        ReleasePayload {
            version: &self.version,
            projects: vec![project],
            url: self.url.as_deref(),
            commit: self.commit.as_deref(),
        }
    }

    pub fn webhook_payload(&self) -> WebhookPayload<'_> {
        WebhookPayload {
            version: &self.version,
            environment: &self.environment,
            projects: self.project.as_deref().map(|p| vec![p]),
            url: self.url.as_deref(),
            commit: self.commit.as_deref(),
            deploy: self.deploy_payload(),
        }
    }
}
