use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::release::{ApiTarget, Delivery, Release};

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(
        "no delivery configured: set SENTRY_RELEASE_WEBHOOK, or provide {}",
        .missing.join(", ")
    )]
    MissingSettings { missing: Vec<&'static str> },
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{url} cannot carry path segments")]
    NotABase { url: Url },
    #[error("{action} failed with status {status}: {body}")]
    Rejected {
        action: &'static str,
        status: u16,
        body: String,
    },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Release creation outcome. 208 and 409 mean the release already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStatus {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    WebhookDelivered,
    Registered(ReleaseStatus),
}

/// Append path segments to `base`, percent-encoding each one and keeping a
/// trailing slash.
pub fn api_url(base: &Url, segments: &[&str]) -> Result<Url, NotifyError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| NotifyError::NotABase { url: base.clone() })?
        .pop_if_empty()
        .extend(segments)
        .push("");
    Ok(url)
}

#[derive(Clone, Default)]
pub struct Notifier {
    client: Client,
}

impl Notifier {
    pub fn new() -> Result<Self, NotifyError> {
        let client = Client::builder()
            .user_agent(concat!("seer-notify/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub async fn notify(&self, release: &Release, delivery: &Delivery) -> Result<NotifyOutcome, NotifyError> {
        match delivery {
            Delivery::Webhook(url) => {
                self.post_webhook(url, release).await?;
                Ok(NotifyOutcome::WebhookDelivered)
            }
            Delivery::Api(target) => {
                let status = self.ensure_release(target, release).await?;
                self.register_deploy(target, release).await?;
                Ok(NotifyOutcome::Registered(status))
            }
        }
    }

    pub async fn post_webhook(&self, url: &Url, release: &Release) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(url.clone())
            .json(&release.webhook_payload())
            .send()
            .await?;

        check("webhook delivery", response).await?;
        info!("Release {} posted to webhook", release.version);
        Ok(())
    }

    pub async fn ensure_release(&self, target: &ApiTarget, release: &Release) -> Result<ReleaseStatus, NotifyError> {
        let url = api_url(&target.base, &["organizations", target.org.as_str(), "releases"])?;
        let response = self
            .authorized_post(target, url, &release.release_payload(&target.project))
            .await?;

        match response.status() {
            StatusCode::ALREADY_REPORTED | StatusCode::CONFLICT => {
                warn!("Release {} already exists", release.version);
                Ok(ReleaseStatus::AlreadyExists)
            }
            _ => {
                check("release creation", response).await?;
                info!("Release {} created", release.version);
                Ok(ReleaseStatus::Created)
            }
        }
    }

    pub async fn register_deploy(&self, target: &ApiTarget, release: &Release) -> Result<(), NotifyError> {
        let url = api_url(
            &target.base,
            &["organizations", target.org.as_str(), "releases", release.version.as_str(), "deploys"],
        )?;
        let response = self
            .authorized_post(target, url, &release.deploy_payload())
            .await?;

        check("deploy registration", response).await?;
        info!(
            "Deploy {} recorded for {} in {}",
            release.deploy_name, release.version, release.environment
        );
        Ok(())
    }

    async fn authorized_post<T: Serialize + ?Sized>(
        &self,
        target: &ApiTarget,
        url: Url,
        payload: &T,
    ) -> Result<reqwest::Response, NotifyError> {
        Ok(self
            .client
            .post(url)
            .bearer_auth(target.token.expose())
            .json(payload)
            .send()
            .await?)
    }
}

async fn check(action: &'static str, response: reqwest::Response) -> Result<(), NotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(NotifyError::Rejected {
        action,
        status: status.as_u16(),
        body,
    })
}
