//! Outbound lead delivery
//!
//! Every accepted lead goes to each configured sink in turn. A failing
//! sink is logged and skipped; the visitor is redirected either way.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use lexpages_core::{Lead, SiteConfig};

/// Lead delivery error
#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {sink} failed: {source}")]
    Request {
        sink: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{sink} answered with status {status}")]
    Status {
        sink: &'static str,
        status: reqwest::StatusCode,
    },
}

/// Destination for accepted leads
#[async_trait]
pub trait LeadSink: Send + Sync {
    fn name(&self) -> &'static str;

    /// Deliver `lead`. `visit` is the analytics visit cookie, if any.
    async fn send(&self, lead: &Lead, visit: Option<&str>) -> Result<(), LeadError>;
}

fn check_status(sink: &'static str, response: reqwest::Response) -> Result<(), LeadError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(LeadError::Status { sink, status })
    }
}

/// CRM endpoint receiving the lead as a JSON POST
pub struct CrmSink {
    client: reqwest::Client,
    url: String,
    domain: String,
}

impl CrmSink {
    pub fn new(client: reqwest::Client, url: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            domain: domain.into(),
        }
    }
}

#[async_trait]
impl LeadSink for CrmSink {
    fn name(&self) -> &'static str {
        "crm"
    }

    async fn send(&self, lead: &Lead, _visit: Option<&str>) -> Result<(), LeadError> {
        let response = self
            .client
            .post(&self.url)
            .json(&lead.to_crm(&self.domain))
            .send()
            .await
            .map_err(|source| LeadError::Request {
                sink: self.name(),
                source,
            })?;
        check_status(self.name(), response)
    }
}

/// Analytics endpoint receiving the lead as GET query parameters
pub struct AnalyticsSink {
    client: reqwest::Client,
    url: String,
    key: String,
}

impl AnalyticsSink {
    pub fn new(client: reqwest::Client, url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            key: key.into(),
        }
    }
}

#[async_trait]
impl LeadSink for AnalyticsSink {
    fn name(&self) -> &'static str {
        "analytics"
    }

    async fn send(&self, lead: &Lead, visit: Option<&str>) -> Result<(), LeadError> {
        let response = self
            .client
            .get(&self.url)
            .query(&lead.analytics_params(&self.key, visit))
            .send()
            .await
            .map_err(|source| LeadError::Request {
                sink: self.name(),
                source,
            })?;
        check_status(self.name(), response)
    }
}

/// Fans accepted leads out to every sink
#[derive(Clone, Default)]
pub struct LeadDistributor {
    sinks: Vec<Arc<dyn LeadSink>>,
}

impl LeadDistributor {
    pub fn new(sinks: Vec<Arc<dyn LeadSink>>) -> Self {
        Self { sinks }
    }

    /// Sinks for the configured endpoints. An unset URL disables its sink.
    pub fn from_config(config: &SiteConfig) -> Result<Self, LeadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.leads.timeout_secs.max(1)))
            .build()
            .map_err(LeadError::Client)?;

        let mut sinks: Vec<Arc<dyn LeadSink>> = Vec::new();
        match &config.leads.crm_url {
            Some(url) => sinks.push(Arc::new(CrmSink::new(
                client.clone(),
                url.clone(),
                config.site.lead_domain.clone(),
            ))),
            None => tracing::warn!("leads.crm_url not set, CRM delivery disabled"),
        }
        match &config.leads.analytics_url {
            Some(url) => sinks.push(Arc::new(AnalyticsSink::new(
                client,
                url.clone(),
                config.leads.analytics_key.clone(),
            ))),
            None => tracing::warn!("leads.analytics_url not set, analytics delivery disabled"),
        }
        Ok(Self { sinks })
    }

    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Deliver `lead` to every sink, returning how many accepted it.
    /// Spam is dropped before any delivery.
    pub async fn distribute(&self, lead: &Lead, visit: Option<&str>) -> usize {
        if lead.is_spam() {
            tracing::info!(phone = %lead.phone, source = %lead.source, "lead rejected as spam");
            return 0;
        }
        let mut delivered = 0;
        for sink in &self.sinks {
            match sink.send(lead, visit).await {
                Ok(()) => {
                    delivered += 1;
                    tracing::info!(sink = sink.name(), phone = %lead.phone, source = %lead.source, "lead delivered");
                }
                Err(e) => tracing::error!(sink = sink.name(), error = %e, "lead delivery failed"),
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<(String, Option<String>)>>,
    }

    #[async_trait]
    impl LeadSink for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn send(&self, lead: &Lead, visit: Option<&str>) -> Result<(), LeadError> {
            self.seen
                .lock()
                .unwrap()
                .push((lead.phone.clone(), visit.map(str::to_owned)));
            Ok(())
        }
    }

    struct Refusing;

    #[async_trait]
    impl LeadSink for Refusing {
        fn name(&self) -> &'static str {
            "refusing"
        }

        async fn send(&self, _lead: &Lead, _visit: Option<&str>) -> Result<(), LeadError> {
            Err(LeadError::Status {
                sink: "refusing",
                status: reqwest::StatusCode::BAD_GATEWAY,
            })
        }
    }

    fn lead(phone: &str) -> Lead {
        let form: HashMap<String, String> = [("name", "Анна"), ("phone", phone)]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Lead::from_form(&form, "https://jurist.example/family/")
    }

    #[tokio::test]
    async fn failing_sink_does_not_block_others() {
        let recording = Arc::new(Recording::default());
        let distributor = LeadDistributor::new(vec![Arc::new(Refusing), recording.clone()]);

        let delivered = distributor.distribute(&lead("8 (916) 123-45-67"), Some("v42")).await;
        assert_eq!(delivered, 1);
        let seen = recording.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), [("79161234567".to_owned(), Some("v42".to_owned()))]);
    }

    #[tokio::test]
    async fn spam_is_not_delivered() {
        let recording = Arc::new(Recording::default());
        let distributor = LeadDistributor::new(vec![recording.clone()]);

        assert_eq!(distributor.distribute(&lead("12345"), None).await, 0);
        assert!(recording.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn unset_urls_disable_sinks() {
        let mut config = SiteConfig::default();
        assert!(LeadDistributor::from_config(&config).unwrap().sink_names().is_empty());

        config.leads.crm_url = Some("http://crm.invalid/leads".into());
        config.leads.analytics_url = Some("http://analytics.invalid/add".into());
        assert_eq!(
            LeadDistributor::from_config(&config).unwrap().sink_names(),
            ["crm", "analytics"]
        );
    }
}
