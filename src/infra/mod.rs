pub mod http;
pub mod terminal;
