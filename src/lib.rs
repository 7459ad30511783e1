// Library root
// -----------
// Interactive client for the Desk Manager helpdesk API. The binary
// (`main.rs`) loads configuration, logs in and hands the client to the
// menu loop in `flow`.
//
// Module responsibilities:
// - `api`: authenticated calls (login, catalog lists, ticket creation,
//   interactions) over a pluggable `transport`.
// - `catalog` / `model`: reference-data catalogs, form drafts and the
//   JSON payloads they produce.
// - `flow`: the menu, listings, record selector and the two forms.
// - `ui` / `terminal`: rendering and line input.
// - `testing`: scripted terminal and fake transport for tests.
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod flow;
pub mod model;
pub mod terminal;
pub mod testing;
pub mod transport;
pub mod ui;

pub use api::{ApiClient, Session};
pub use catalog::Catalog;
pub use config::Config;
pub use error::{ConfigError, DeskError};
pub use flow::Desk;
pub use terminal::{ConsoleTerminal, Terminal};
pub use transport::{HttpTransport, Transport};
