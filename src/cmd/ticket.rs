use std::sync::Arc;

use clap::Args;
use tracing::debug;

use crate::context::AppContext;
use crate::domain::ticket::{StatusValue, TicketId, ViewLocation};
use crate::error::AppResult;
use crate::infra::terminal::TerminalView;
use crate::workflow::action::{ActionOutcome, RemoteActionClient};

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// Ticket number, e.g. TKT-2024-0042.
    pub ticket: String,
    /// New status token (Open, In-Progress, Closed); sent as given.
    pub status: String,
}

#[derive(Args, Debug, Clone)]
pub struct CloseArgs {
    /// Ticket number; prompted for when omitted.
    #[arg(short, long)]
    pub ticket: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct NoteArgs {
    /// Ticket number to append the note to.
    pub ticket: String,
    /// Note text; read from stdin when omitted.
    #[arg(short, long)]
    pub content: Option<String>,
}

pub async fn run_status(ctx: &AppContext, args: StatusArgs) -> AppResult<ActionOutcome> {
    debug!(base_url = %ctx.config.base_url, ticket = %args.ticket, status = %args.status, "status update");
    let view = ticket_view(ctx, &args.ticket);
    let actions = RemoteActionClient::new(ctx.helpdesk.clone(), Arc::new(view));
    Ok(actions
        .perform_status_update(&args.ticket, &StatusValue::new(args.status))
        .await)
}

pub async fn run_close(ctx: &AppContext, args: CloseArgs) -> AppResult<ActionOutcome> {
    debug!(base_url = %ctx.config.base_url, "closing ticket");
    let view = TerminalView::new(ctx.helpdesk.clone(), ViewLocation::Dashboard)
        .with_ticket_id(args.ticket);
    let actions = RemoteActionClient::new(ctx.helpdesk.clone(), Arc::new(view));
    actions.close_ticket().await
}

pub async fn run_note(ctx: &AppContext, args: NoteArgs) -> AppResult<ActionOutcome> {
    debug!(base_url = %ctx.config.base_url, ticket = %args.ticket, "note submission");
    let view = ticket_view(ctx, &args.ticket).with_note(args.content);
    let actions = RemoteActionClient::new(ctx.helpdesk.clone(), Arc::new(view));
    actions.submit_note(&args.ticket).await
}

/// Actions started from a ticket page refresh that page. Blank ids are
/// rejected before any request, so they keep the dashboard.
fn ticket_view(ctx: &AppContext, raw_ticket: &str) -> TerminalView {
    let location = TicketId::parse(raw_ticket)
        .map(ViewLocation::Ticket)
        .unwrap_or(ViewLocation::Dashboard);
    TerminalView::new(ctx.helpdesk.clone(), location)
}
