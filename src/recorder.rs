use crate::csrf::{cookie_value, CSRF_COOKIE, CSRF_FIELD};
use crate::errors::RecordError;
use crate::storage::BoxFuture;
use reqwest::{header, Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A finished focus session, as submitted to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSubmission {
    pub duration_minutes: u32,
    pub skill_id: Option<String>,
    pub notes: String,
}

/// Delivers finished sessions and reports the points they earned.
pub trait SessionRecorder: Send + Sync {
    fn record<'a>(&'a self, session: &'a SessionSubmission) -> BoxFuture<'a, Result<u64, RecordError>>;
}

#[derive(Debug, Deserialize)]
struct RecordResponse {
    status: String,
    #[serde(default)]
    points_earned: u64,
}

/// Posts sessions to the tracker's pomodoro endpoint as a form.
#[derive(Debug, Clone)]
pub struct HttpSessionRecorder {
    client: Client,
    endpoint: Url,
    cookies: Option<String>,
}

impl HttpSessionRecorder {
    /// `cookies` is a raw `Cookie` header; its `csrftoken` is echoed back in
    /// the form.
    pub fn new(endpoint: Url, cookies: Option<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint,
            cookies,
        })
    }

    fn form(&self, session: &SessionSubmission) -> Vec<(&'static str, String)> {
        let token = self
            .cookies
            .as_deref()
            .and_then(|cookies| cookie_value(cookies, CSRF_COOKIE))
            .unwrap_or_default();
        vec![
            ("duration", session.duration_minutes.to_string()),
            ("skill_id", session.skill_id.clone().unwrap_or_default()),
            ("notes", session.notes.clone()),
            (CSRF_FIELD, token),
        ]
    }

    async fn post(&self, session: &SessionSubmission) -> Result<u64, RecordError> {
        let mut request = self.client.post(self.endpoint.clone()).form(&self.form(session));
        if let Some(cookies) = &self.cookies {
            request = request.header(header::COOKIE, cookies);
        }

        let response = request.send().await.map_err(RecordError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RecordError::Status(status));
        }

        let body: RecordResponse = response.json().await.map_err(RecordError::Decode)?;
        debug!(status = %body.status, points = body.points_earned, "session endpoint replied");
        if body.status != "success" {
            return Err(RecordError::Rejected(body.status));
        }
        Ok(body.points_earned)
    }
}

impl SessionRecorder for HttpSessionRecorder {
    fn record<'a>(&'a self, session: &'a SessionSubmission) -> BoxFuture<'a, Result<u64, RecordError>> {
        Box::pin(self.post(session))
    }
}
