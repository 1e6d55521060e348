use async_trait::async_trait;

use crate::error::AppResult;

/// The user-facing surface an action reads from and reconciles.
#[async_trait]
pub trait DashboardView: Send + Sync {
    /// Current value of the ticket id input.
    fn ticket_id_input(&self) -> AppResult<String>;

    /// Current value of the note text area.
    fn note_input(&self) -> AppResult<String>;

    fn notify(&self, message: &str);

    /// Full refresh so the view reflects server state.
    async fn reload(&self);
}
