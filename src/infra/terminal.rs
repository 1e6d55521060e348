use std::io::{self, Read, Write};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ticket::ViewLocation;
use crate::error::AppResult;
use crate::services::{DashboardView, HelpdeskService};

/// Dashboard rendered on the terminal. Inputs given on the command line take
/// the place of the form fields; missing ones are read from stdin.
pub struct TerminalView {
    helpdesk: Arc<dyn HelpdeskService>,
    location: ViewLocation,
    ticket_id: Option<String>,
    note: Option<String>,
}

impl TerminalView {
    pub fn new(helpdesk: Arc<dyn HelpdeskService>, location: ViewLocation) -> Self {
        Self {
            helpdesk,
            location,
            ticket_id: None,
            note: None,
        }
    }

    pub fn with_ticket_id(mut self, ticket_id: Option<String>) -> Self {
        self.ticket_id = ticket_id;
        self
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }
}

#[async_trait]
impl DashboardView for TerminalView {
    fn ticket_id_input(&self) -> AppResult<String> {
        if let Some(ticket_id) = &self.ticket_id {
            return Ok(ticket_id.clone());
        }
        let mut stdout = io::stdout();
        write!(stdout, "Ticket number: ")?;
        stdout.flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input)
    }

    fn note_input(&self) -> AppResult<String> {
        if let Some(note) = &self.note {
            return Ok(note.clone());
        }
        eprintln!("Enter the note, then press Ctrl-D:");
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        Ok(input)
    }

    fn notify(&self, message: &str) {
        println!("{message}");
    }

    async fn reload(&self) {
        let path = self.location.path();
        match self.helpdesk.fetch_view(&self.location).await {
            Ok(()) => info!(%path, "view refreshed"),
            Err(err) => warn!(%path, error = %err, "view refresh failed"),
        }
    }
}
