use async_trait::async_trait;

use crate::domain::ticket::{NoteContent, ServerResponse, StatusValue, TicketId, ViewLocation};
use crate::error::AppResult;

/// Remote helpdesk endpoints. Any non-2xx answer is an error.
#[async_trait]
pub trait HelpdeskService: Send + Sync {
    async fn update_status(
        &self,
        ticket: &TicketId,
        status: &StatusValue,
    ) -> AppResult<ServerResponse>;

    async fn append_note(&self, ticket: &TicketId, note: &NoteContent)
    -> AppResult<ServerResponse>;

    async fn fetch_view(&self, location: &ViewLocation) -> AppResult<()>;
}
