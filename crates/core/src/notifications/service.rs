//! "Event favorited" notification handler
//!
//! Runs wherever the callable function is hosted; the client reaches it
//! through [`FavoriteNotifier`](super::FavoriteNotifier).

use eventide_domain::{EventideError, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::ports::{PushGateway, PushMessage};

const NOTIFICATION_TITLE: &str = "Event Favorited !!";

/// Callable payload. Both fields are required but validated by the handler
/// so the error message is uniform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRequest {
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub fcm_token: Option<String>,
}

impl NotifyRequest {
    pub fn new(event_name: impl Into<String>, fcm_token: impl Into<String>) -> Self {
        Self { event_name: Some(event_name.into()), fcm_token: Some(fcm_token.into()) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyResponse {
    pub success: bool,
}

/// Validate the request and push a single notification to its token.
pub async fn notify_on_favorite(
    gateway: &dyn PushGateway,
    request: NotifyRequest,
) -> Result<NotifyResponse> {
    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    let (Some(event_name), Some(token)) =
        (non_empty(request.event_name), non_empty(request.fcm_token))
    else {
        return Err(EventideError::ValidationMissing("Missing event name or token".into()));
    };

    let message = PushMessage {
        token,
        title: NOTIFICATION_TITLE.to_string(),
        body: format!("You added \"{event_name}\" to your favorites!"),
    };

    match gateway.send(message).await {
        Ok(()) => {
            info!(event_name = %event_name, "Favorite notification sent");
            Ok(NotifyResponse { success: true })
        }
        Err(err) => {
            error!(error = %err, event_name = %event_name, "Favorite notification failed");
            Err(EventideError::Internal("Push failed".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingPushGateway;

    #[tokio::test]
    async fn sends_formatted_message() {
        let gateway = RecordingPushGateway::new();

        let response =
            notify_on_favorite(&gateway, NotifyRequest::new("Jazz Night", "tok-1")).await.unwrap();

        assert!(response.success);
        assert_eq!(
            gateway.sent(),
            vec![PushMessage {
                token: "tok-1".into(),
                title: "Event Favorited !!".into(),
                body: "You added \"Jazz Night\" to your favorites!".into(),
            }]
        );
    }

    #[tokio::test]
    async fn missing_fields_are_rejected_before_sending() {
        let gateway = RecordingPushGateway::new();
        let expected = EventideError::ValidationMissing("Missing event name or token".into());

        let no_token = NotifyRequest { event_name: Some("Jazz".into()), fcm_token: None };
        assert_eq!(notify_on_favorite(&gateway, no_token).await.unwrap_err(), expected);

        let blank_name = NotifyRequest::new("", "tok-1");
        assert_eq!(notify_on_favorite(&gateway, blank_name).await.unwrap_err(), expected);

        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn gateway_failure_is_internal() {
        let gateway = RecordingPushGateway::new();
        gateway.fail(true);

        let err = notify_on_favorite(&gateway, NotifyRequest::new("Jazz", "tok")).await.unwrap_err();
        assert_eq!(err, EventideError::Internal("Push failed".into()));
    }

    #[test]
    fn request_uses_camel_case_wire_names() {
        let request: NotifyRequest =
            serde_json::from_str(r#"{"eventName":"Jazz","fcmToken":"tok"}"#).unwrap();
        assert_eq!(request, NotifyRequest::new("Jazz", "tok"));
    }
}
