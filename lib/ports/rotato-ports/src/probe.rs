use async_trait::async_trait;

use rotato_domain::HealthVerdict;

/// One cluster health concern.
///
/// `evaluate` must not fail: a query that cannot be answered right now is an
/// unhealthy verdict, not an error.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    fn name(&self) -> &str;

    /// Cluster members found at discovery. Probes that account for every
    /// member keep this list; the rest ignore it.
    fn expect_members(&self, _members: &[String]) {}

    async fn evaluate(&self) -> HealthVerdict;
}
