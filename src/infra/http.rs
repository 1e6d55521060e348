use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response, Url,
    header::{ACCEPT, COOKIE},
};
use serde::Serialize;
use tracing::debug;

use crate::domain::ticket::{NoteContent, ServerResponse, StatusValue, TicketId, ViewLocation};
use crate::error::{AppError, AppResult, TransportError};
use crate::services::HelpdeskService;

pub struct HttpHelpdesk {
    http: Client,
    base_url: Url,
    session: Option<SessionCookie>,
}

#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

impl SessionCookie {
    fn header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

impl HttpHelpdesk {
    pub fn new(
        base_url: &str,
        session: Option<SessionCookie>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let base_url = Url::parse(base_url.trim()).map_err(|err| {
            AppError::Configuration(format!("invalid helpdesk URL '{base_url}': {err}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Configuration(format!(
                "helpdesk URL '{base_url}' cannot carry a path"
            )));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// Appends percent-encoded segments to the configured base URL.
    ///
    /// URL parsing folds `.` and `..` (and their `%2E` spellings) into the
    /// surrounding path, so such segments cannot be addressed and are refused
    /// before any request is built.
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        if let Some(segment) = segments.iter().find(|s| is_dot_segment(s)) {
            return Err(TransportError::Unaddressable {
                segment: segment.to_string(),
            }
            .into());
        }
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session {
            Some(cookie) => request.header(COOKIE, cookie.header_value()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> AppResult<Response> {
        let path = url.path().to_string();
        debug!(%path, "sending helpdesk request");
        let response = self
            .with_session(request)
            .send()
            .await
            .map_err(|err| TransportError::Network {
                path: path.clone(),
                detail: describe_send_error(&err),
            })?;
        debug!(%path, status = response.status().as_u16(), "helpdesk responded");
        Ok(response)
    }

    async fn read_reply(response: Response, path: &str) -> AppResult<ServerResponse> {
        let status = response.status();
        let body = response.text().await.map_err(|err| TransportError::Network {
            path: path.to_string(),
            detail: format!("error reading body: {err}"),
        })?;

        if !status.is_success() {
            let server_message = serde_json::from_str::<ServerResponse>(&body)
                .ok()
                .map(|reply| reply.message);
            return Err(TransportError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                server_message,
            }
            .into());
        }

        serde_json::from_str::<ServerResponse>(&body).map_err(|err| {
            TransportError::Decode {
                path: path.to_string(),
                detail: err.to_string(),
            }
            .into()
        })
    }
}

#[async_trait]
impl HelpdeskService for HttpHelpdesk {
    async fn update_status(
        &self,
        ticket: &TicketId,
        status: &StatusValue,
    ) -> AppResult<ServerResponse> {
        let url = self.endpoint(&["ticket", ticket.as_str(), "update_status", status.as_str()])?;
        let request = self
            .http
            .post(url.clone())
            .header(ACCEPT, "application/json");
        let response = self.send(request, &url).await?;
        Self::read_reply(response, url.path()).await
    }

    async fn append_note(
        &self,
        ticket: &TicketId,
        note: &NoteContent,
    ) -> AppResult<ServerResponse> {
        let url = self.endpoint(&["ticket", ticket.as_str(), "append_note"])?;
        let request = self
            .http
            .post(url.clone())
            .header(ACCEPT, "application/json")
            .form(&AppendNoteForm {
                note_content: note.as_str(),
            });
        let response = self.send(request, &url).await?;
        Self::read_reply(response, url.path()).await
    }

    async fn fetch_view(&self, location: &ViewLocation) -> AppResult<()> {
        let url = match location {
            ViewLocation::Dashboard => self.endpoint(&["dashboard"])?,
            ViewLocation::Ticket(id) => self.endpoint(&["ticket", id.as_str()])?,
        };
        let response = self.send(self.http.get(url.clone()), &url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                path: url.path().to_string(),
                status: status.as_u16(),
                server_message: None,
            }
            .into());
        }
        Ok(())
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

fn describe_send_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

#[derive(Serialize)]
struct AppendNoteForm<'a> {
    note_content: &'a str,
}
