//! Admin event creation

use std::sync::Arc;

use eventide_domain::{parse_coordinate, EventDraft, EventideError, FieldValue, Result};
use tracing::{info, warn};

use crate::document_ports::DocumentStore;
use crate::utils::{fields, paths};

const MISSING_FIELDS_MESSAGE: &str = "Please fill all required fields";

/// Writes admin-authored events to the `events` collection.
pub struct AdminEventService {
    documents: Arc<dyn DocumentStore>,
}

impl AdminEventService {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// Validate `draft` and store it under a new id.
    ///
    /// Coordinates that do not parse are stored as `NaN`, matching how the
    /// listing source treats them.
    pub async fn create_event(&self, draft: &EventDraft) -> Result<String> {
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            warn!(?missing, "Rejected incomplete event draft");
            return Err(EventideError::ValidationMissing(MISSING_FIELDS_MESSAGE.into()));
        }

        let record = fields([
            ("name", FieldValue::from(draft.name.as_str())),
            ("summary", draft.summary.as_str().into()),
            ("address", draft.address.as_str().into()),
            ("category", draft.category.as_str().into()),
            ("startDate", draft.start_date.as_str().into()),
            ("startTime", draft.start_time.as_str().into()),
            ("endTime", draft.end_time.as_str().into()),
            ("latitude", parse_coordinate(&draft.latitude).into()),
            ("longitude", parse_coordinate(&draft.longitude).into()),
            ("createdAt", FieldValue::ServerTimestamp),
        ]);

        let id = self.documents.add(&paths::events()?, record).await?;
        info!(event_id = %id, name = %draft.name, "Event created");
        Ok(id)
    }
}
