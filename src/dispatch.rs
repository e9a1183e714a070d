use serde::Deserialize;

use crate::error::AppError;

/// Reply shape of the classification backend.
/// A well-formed reply carries exactly one of the two fields.
#[derive(Debug, Deserialize)]
struct ClassifyReply {
    response: Option<String>,
    error: Option<String>,
}

/// The result of one completed dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The backend produced a verdict; the scan session is complete
    Classified { link: String, verdict: String },
    /// The dispatch finished without a verdict; scanning may continue.
    /// Carries either a transport error or a backend-reported one.
    Errored { link: String, error: AppError },
}

impl DispatchOutcome {
    /// The payload this dispatch was issued for
    pub fn link(&self) -> &str {
        match self {
            DispatchOutcome::Classified { link, .. } => link,
            DispatchOutcome::Errored { link, .. } => link,
        }
    }

    /// The text shown to the user (and recorded in the history catalog)
    pub fn message(&self) -> String {
        match self {
            DispatchOutcome::Classified { verdict, .. } => verdict.clone(),
            DispatchOutcome::Errored { error, .. } => error.to_string(),
        }
    }

    /// Whether the backend produced a classification
    pub fn ok(&self) -> bool {
        matches!(self, DispatchOutcome::Classified { .. })
    }

    /// Only a classification success ends the scan session; errors leave
    /// the user scanning.
    pub fn ends_session(&self) -> bool {
        self.ok()
    }
}

/// Send a decoded payload to the classification backend.
///
/// The caller holds the single-flight slot for the duration of this
/// future; every path through here produces an outcome that releases it.
pub async fn classify(
    client: reqwest::Client,
    backend_url: String,
    payload: String,
) -> DispatchOutcome {
    let request = client
        .get(&backend_url)
        .query(&[("exp", payload.as_str())]);

    match request.send().await {
        Ok(reply) => {
            let status = reply.status().as_u16();
            match reply.text().await {
                Ok(body) => interpret_response(payload, status, &body),
                Err(e) => DispatchOutcome::Errored {
                    link: payload,
                    error: AppError::Transport(format!("could not read reply: {e}")),
                },
            }
        }
        Err(e) => DispatchOutcome::Errored {
            link: payload,
            error: AppError::Transport(format!("request failed: {e}")),
        },
    }
}

/// Map a transport status and body into an outcome.
///
/// A non-2xx status is a transport error regardless of the body. A 2xx
/// body is expected to carry either a `response` (verdict) or an `error`
/// field; anything else is treated as a transport-class error so the user
/// can keep scanning.
pub fn interpret_response(link: String, status: u16, body: &str) -> DispatchOutcome {
    if !(200..300).contains(&status) {
        return DispatchOutcome::Errored {
            link,
            error: AppError::Transport(format!("request failed with status {status}")),
        };
    }

    match serde_json::from_str::<ClassifyReply>(body) {
        Ok(ClassifyReply {
            response: Some(verdict),
            ..
        }) => DispatchOutcome::Classified { link, verdict },
        Ok(ClassifyReply {
            error: Some(reason),
            ..
        }) => DispatchOutcome::Errored {
            link,
            error: AppError::Classification(reason),
        },
        Ok(_) => DispatchOutcome::Errored {
            link,
            error: AppError::Transport(
                "reply contained neither a classification nor an error".to_string(),
            ),
        },
        Err(e) => DispatchOutcome::Errored {
            link,
            error: AppError::Transport(format!("unexpected reply: {e}")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_success_stops_the_session() {
        let outcome = interpret_response(
            "https://example.com".to_string(),
            200,
            r#"{ "response": "This looks like a legitimate URL." }"#,
        );

        assert_eq!(outcome.link(), "https://example.com");
        assert_eq!(outcome.message(), "This looks like a legitimate URL.");
        assert!(outcome.ok());
        assert!(outcome.ends_session());
    }

    #[test]
    fn test_http_error_status_keeps_scanning() {
        let outcome = interpret_response("https://example.com".to_string(), 500, "oops");

        assert!(!outcome.ok());
        assert!(!outcome.ends_session());
        assert!(outcome.message().contains("500"));
    }

    #[test]
    fn test_backend_error_field_keeps_scanning() {
        let outcome = interpret_response(
            "https://example.com".to_string(),
            200,
            r#"{ "error": "unrecognized format" }"#,
        );

        assert!(!outcome.ends_session());
        assert_eq!(outcome.message(), "Error: unrecognized format");
    }

    #[test]
    fn test_unparseable_body_is_a_transport_error() {
        let outcome =
            interpret_response("https://example.com".to_string(), 200, "<html>not json</html>");

        assert!(!outcome.ends_session());
        assert!(matches!(
            outcome,
            DispatchOutcome::Errored {
                error: AppError::Transport(_),
                ..
            }
        ));
    }

    #[test]
    fn test_reply_with_neither_field_is_a_transport_error() {
        let outcome = interpret_response("https://example.com".to_string(), 200, "{}");

        assert!(!outcome.ends_session());
        assert!(matches!(
            outcome,
            DispatchOutcome::Errored {
                error: AppError::Transport(_),
                ..
            }
        ));
    }
}
