use std::future::Future;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::ticket::{NoteContent, ServerResponse, StatusValue, TicketId};
use crate::error::{AppError, AppResult, ValidationError};
use crate::services::{DashboardView, HelpdeskService};

const STATUS_FAILURE_NOTICE: &str =
    "An error occurred while updating the ticket. Please try again.";
const NOTE_FAILURE_NOTICE: &str = "Failed to add note. Please try again.";

/// Terminal result of one request/response/reconcile cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed { message: String },
    Rejected(ValidationError),
    Failed,
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed { .. })
    }
}

#[derive(Debug, Clone, Copy)]
enum ActionKind {
    StatusUpdate,
    NoteSubmission,
}

impl ActionKind {
    fn name(self) -> &'static str {
        match self {
            ActionKind::StatusUpdate => "update_status",
            ActionKind::NoteSubmission => "append_note",
        }
    }

    fn failure_notice(self) -> &'static str {
        match self {
            ActionKind::StatusUpdate => STATUS_FAILURE_NOTICE,
            ActionKind::NoteSubmission => NOTE_FAILURE_NOTICE,
        }
    }
}

/// Sends one state-changing request and reconciles the view: the view is only
/// reloaded after a confirmed success, and every outcome produces exactly one
/// notice.
pub struct RemoteActionClient {
    helpdesk: Arc<dyn HelpdeskService>,
    view: Arc<dyn DashboardView>,
}

impl RemoteActionClient {
    pub fn new(helpdesk: Arc<dyn HelpdeskService>, view: Arc<dyn DashboardView>) -> Self {
        Self { helpdesk, view }
    }

    pub async fn perform_status_update(
        &self,
        ticket_id: &str,
        new_status: &StatusValue,
    ) -> ActionOutcome {
        let ticket = match TicketId::parse(ticket_id) {
            Ok(ticket) => ticket,
            Err(reason) => return self.reject(reason),
        };

        self.run(
            ActionKind::StatusUpdate,
            &ticket,
            self.helpdesk.update_status(&ticket, new_status),
        )
        .await
    }

    pub async fn perform_note_submission(
        &self,
        ticket_id: &str,
        note_content_raw: &str,
    ) -> ActionOutcome {
        let ticket = match TicketId::parse(ticket_id) {
            Ok(ticket) => ticket,
            Err(reason) => return self.reject(reason),
        };
        let note = match NoteContent::parse(note_content_raw) {
            Ok(note) => note,
            Err(reason) => return self.reject(reason),
        };

        self.run(
            ActionKind::NoteSubmission,
            &ticket,
            self.helpdesk.append_note(&ticket, &note),
        )
        .await
    }

    /// Closes the ticket named in the view's ticket id input.
    pub async fn close_ticket(&self) -> AppResult<ActionOutcome> {
        let ticket_id = self.view.ticket_id_input()?;
        Ok(self
            .perform_status_update(&ticket_id, &StatusValue::closed())
            .await)
    }

    /// Appends whatever the view's note input holds at call time.
    pub async fn submit_note(&self, ticket_id: &str) -> AppResult<ActionOutcome> {
        let note = self.view.note_input()?;
        Ok(self.perform_note_submission(ticket_id, &note).await)
    }

    fn reject(&self, reason: ValidationError) -> ActionOutcome {
        warn!(%reason, "action rejected before sending");
        self.view.notify(reason.notice());
        ActionOutcome::Rejected(reason)
    }

    async fn run<F>(&self, kind: ActionKind, ticket: &TicketId, request: F) -> ActionOutcome
    where
        F: Future<Output = AppResult<ServerResponse>>,
    {
        match request.await {
            Ok(reply) => {
                info!(action = kind.name(), %ticket, "action succeeded");
                self.view.notify(&reply.message);
                self.view.reload().await;
                ActionOutcome::Completed {
                    message: reply.message,
                }
            }
            Err(err) => {
                log_failure(kind, ticket, &err);
                self.view.notify(kind.failure_notice());
                ActionOutcome::Failed
            }
        }
    }
}

fn log_failure(kind: ActionKind, ticket: &TicketId, err: &AppError) {
    match err {
        AppError::Transport(transport) => error!(
            action = kind.name(),
            %ticket,
            status = transport.status(),
            server_message = transport.server_message(),
            error = %transport,
            "action failed"
        ),
        other => error!(action = kind.name(), %ticket, error = %other, "action failed"),
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::ticket::ViewLocation;
    use crate::error::TransportError;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        UpdateStatus { ticket: String, status: String },
        AppendNote { ticket: String, note: String },
    }

    enum Reply {
        Message(&'static str),
        Status(u16, Option<&'static str>),
        Network,
    }

    struct FakeHelpdesk {
        reply: Reply,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeHelpdesk {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn respond(&self, path: String) -> AppResult<ServerResponse> {
            match &self.reply {
                Reply::Message(message) => Ok(ServerResponse {
                    message: message.to_string(),
                }),
                Reply::Status(status, message) => Err(TransportError::Status {
                    path,
                    status: *status,
                    server_message: message.map(str::to_string),
                }
                .into()),
                Reply::Network => Err(TransportError::Network {
                    path,
                    detail: "connection failed: connection refused".to_string(),
                }
                .into()),
            }
        }
    }

    #[async_trait]
    impl HelpdeskService for FakeHelpdesk {
        async fn update_status(
            &self,
            ticket: &TicketId,
            status: &StatusValue,
        ) -> AppResult<ServerResponse> {
            self.calls.lock().unwrap().push(Call::UpdateStatus {
                ticket: ticket.to_string(),
                status: status.to_string(),
            });
            self.respond(format!("/ticket/{ticket}/update_status/{status}"))
        }

        async fn append_note(
            &self,
            ticket: &TicketId,
            note: &NoteContent,
        ) -> AppResult<ServerResponse> {
            self.calls.lock().unwrap().push(Call::AppendNote {
                ticket: ticket.to_string(),
                note: note.as_str().to_string(),
            });
            self.respond(format!("/ticket/{ticket}/append_note"))
        }

        async fn fetch_view(&self, _location: &ViewLocation) -> AppResult<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingView {
        ticket_input: Option<String>,
        note_input: Option<String>,
        notices: Mutex<Vec<String>>,
        reloads: AtomicUsize,
    }

    impl RecordingView {
        fn notices(&self) -> Vec<String> {
            self.notices.lock().unwrap().clone()
        }

        fn reloads(&self) -> usize {
            self.reloads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DashboardView for RecordingView {
        fn ticket_id_input(&self) -> AppResult<String> {
            self.ticket_input
                .clone()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no input").into())
        }

        fn note_input(&self) -> AppResult<String> {
            Ok(self.note_input.clone().unwrap_or_default())
        }

        fn notify(&self, message: &str) {
            self.notices.lock().unwrap().push(message.to_string());
        }

        async fn reload(&self) {
            self.reloads.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn client(
        helpdesk: &Arc<FakeHelpdesk>,
        view: &Arc<RecordingView>,
    ) -> RemoteActionClient {
        RemoteActionClient::new(helpdesk.clone(), view.clone())
    }

    #[tokio::test]
    async fn blank_ticket_ids_send_nothing() {
        for raw in ["", "   ", "\t\n"] {
            let helpdesk = FakeHelpdesk::new(Reply::Message("unused"));
            let view = Arc::new(RecordingView::default());
            let actions = client(&helpdesk, &view);

            let status = actions
                .perform_status_update(raw, &StatusValue::closed())
                .await;
            let note = actions.perform_note_submission(raw, "a note").await;

            assert_eq!(status, ActionOutcome::Rejected(ValidationError::EmptyTicketId));
            assert_eq!(note, ActionOutcome::Rejected(ValidationError::EmptyTicketId));
            assert!(helpdesk.calls().is_empty());
            assert_eq!(
                view.notices(),
                vec![
                    "Ticket Number was NOT found. Try again.".to_string(),
                    "Ticket Number was NOT found. Try again.".to_string(),
                ]
            );
            assert_eq!(view.reloads(), 0);
        }
    }

    #[tokio::test]
    async fn blank_note_sends_nothing() {
        let helpdesk = FakeHelpdesk::new(Reply::Message("unused"));
        let view = Arc::new(RecordingView::default());
        let actions = client(&helpdesk, &view);

        let outcome = actions.perform_note_submission("TKT-1", " \n\t ").await;

        assert_eq!(outcome, ActionOutcome::Rejected(ValidationError::EmptyNote));
        assert!(helpdesk.calls().is_empty());
        assert_eq!(view.notices(), vec!["Note content cannot be empty.".to_string()]);
        assert_eq!(view.reloads(), 0);
    }

    #[tokio::test]
    async fn status_update_success_notifies_and_reloads_once() {
        let helpdesk = FakeHelpdesk::new(Reply::Message("Ticket closed"));
        let view = Arc::new(RecordingView::default());
        let actions = client(&helpdesk, &view);

        let outcome = actions
            .perform_status_update("  TKT-42 ", &StatusValue::new("In Progress"))
            .await;

        assert_eq!(
            outcome,
            ActionOutcome::Completed {
                message: "Ticket closed".to_string()
            }
        );
        assert_eq!(
            helpdesk.calls(),
            vec![Call::UpdateStatus {
                ticket: "TKT-42".to_string(),
                status: "In Progress".to_string(),
            }]
        );
        assert_eq!(view.notices(), vec!["Ticket closed".to_string()]);
        assert_eq!(view.reloads(), 1);
    }

    #[tokio::test]
    async fn server_errors_show_generic_notice_without_reload() {
        for status in [400, 403, 404, 500, 503] {
            let helpdesk = FakeHelpdesk::new(Reply::Status(status, Some("Ticket not found.")));
            let view = Arc::new(RecordingView::default());
            let actions = client(&helpdesk, &view);

            let update = actions
                .perform_status_update("TKT-1", &StatusValue::closed())
                .await;
            let note = actions.perform_note_submission("TKT-1", "hello").await;

            assert_eq!(update, ActionOutcome::Failed);
            assert_eq!(note, ActionOutcome::Failed);
            assert_eq!(
                view.notices(),
                vec![
                    STATUS_FAILURE_NOTICE.to_string(),
                    NOTE_FAILURE_NOTICE.to_string()
                ]
            );
            assert_eq!(view.reloads(), 0);
        }
    }

    #[tokio::test]
    async fn network_failure_is_logged_and_not_reloaded() {
        let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || LogWriter(writer.clone()))
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let helpdesk = FakeHelpdesk::new(Reply::Network);
        let view = Arc::new(RecordingView::default());
        let actions = client(&helpdesk, &view);

        let outcome = actions
            .perform_status_update("TKT-9", &StatusValue::closed())
            .await;

        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(helpdesk.calls().len(), 1);
        assert_eq!(view.notices(), vec![STATUS_FAILURE_NOTICE.to_string()]);
        assert_eq!(view.reloads(), 0);

        let logs = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("action failed"));
        assert!(logs.contains("connection refused"));
        assert!(logs.contains("TKT-9"));
    }

    #[tokio::test]
    async fn note_submission_sends_trimmed_content() {
        let helpdesk = FakeHelpdesk::new(Reply::Message("Note added successfully."));
        let view = Arc::new(RecordingView::default());
        let actions = client(&helpdesk, &view);

        let outcome = actions
            .perform_note_submission("TKT-3", "\n  replaced keyboard  \n")
            .await;

        assert!(outcome.is_completed());
        assert_eq!(
            helpdesk.calls(),
            vec![Call::AppendNote {
                ticket: "TKT-3".to_string(),
                note: "replaced keyboard".to_string(),
            }]
        );
        assert_eq!(view.notices(), vec!["Note added successfully.".to_string()]);
        assert_eq!(view.reloads(), 1);
    }

    #[tokio::test]
    async fn repeated_success_runs_independent_cycles() {
        let helpdesk = FakeHelpdesk::new(Reply::Message("Ticket closed"));
        let view = Arc::new(RecordingView::default());
        let actions = client(&helpdesk, &view);

        for _ in 0..2 {
            let outcome = actions
                .perform_status_update("TKT-5", &StatusValue::closed())
                .await;
            assert!(outcome.is_completed());
        }

        assert_eq!(helpdesk.calls().len(), 2);
        assert_eq!(view.notices().len(), 2);
        assert_eq!(view.reloads(), 2);
    }

    #[tokio::test]
    async fn close_ticket_reads_input_and_sends_closed() {
        let helpdesk = FakeHelpdesk::new(Reply::Message("Ticket TKT-8 updated to Closed."));
        let view = Arc::new(RecordingView {
            ticket_input: Some(" TKT-8\n".to_string()),
            ..RecordingView::default()
        });
        let actions = client(&helpdesk, &view);

        let outcome = actions.close_ticket().await.unwrap();

        assert!(outcome.is_completed());
        assert_eq!(
            helpdesk.calls(),
            vec![Call::UpdateStatus {
                ticket: "TKT-8".to_string(),
                status: "Closed".to_string(),
            }]
        );
        assert_eq!(view.reloads(), 1);
    }

    #[tokio::test]
    async fn close_ticket_propagates_unreadable_input() {
        let helpdesk = FakeHelpdesk::new(Reply::Message("unused"));
        let view = Arc::new(RecordingView::default());
        let actions = client(&helpdesk, &view);

        let result = actions.close_ticket().await;

        assert!(matches!(result, Err(AppError::Io(_))));
        assert!(helpdesk.calls().is_empty());
        assert!(view.notices().is_empty());
    }

    #[tokio::test]
    async fn submit_note_reads_note_input() {
        let helpdesk = FakeHelpdesk::new(Reply::Message("Note added successfully."));
        let view = Arc::new(RecordingView {
            note_input: Some("called the user back".to_string()),
            ..RecordingView::default()
        });
        let actions = client(&helpdesk, &view);

        let outcome = actions.submit_note("TKT-11").await.unwrap();

        assert!(outcome.is_completed());
        assert_eq!(
            helpdesk.calls(),
            vec![Call::AppendNote {
                ticket: "TKT-11".to_string(),
                note: "called the user back".to_string(),
            }]
        );
    }

    struct LogWriter(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
