//! Port interface for the third-party event listing source

use async_trait::async_trait;
use eventide_domain::{EventSummary, Result};

/// Read-only listing source queried by city and state.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch one page of events. Failures are reported, not swallowed; the
    /// caller decides how to degrade.
    async fn fetch_events(&self, city: &str, state: &str) -> Result<Vec<EventSummary>>;
}
