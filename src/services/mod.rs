pub mod dashboard;
pub mod helpdesk;

pub use dashboard::DashboardView;
pub use helpdesk::HelpdeskService;
