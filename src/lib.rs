//! `floedb-load` is an HTTP service that runs bulk-load batches against a
//! FloeDB analytic warehouse.
//!
//! `POST /v1/load` accepts a [`LoadCommand`], derives its ordered statement
//! batch (`USE ...` context statements followed by a `COPY INTO`), executes
//! the batch against one warehouse session over the SQL pipeline API, and
//! answers with the terminal statement's rows.
//!
//! The execution core is usable as a library:
//! - [`LoadEngine::execute_non_query`]
//! - [`LoadEngine::execute_reader`]
//! - [`LoadEngine::load`]

mod command;
mod config;
mod decode;
mod engine;
mod error;
mod options;
mod server;
mod session;
mod types;
mod wire;

pub use command::LoadCommand;
pub use config::{db_id_to_pipeline_url, ConnectionString};
pub use engine::LoadEngine;
pub use error::LoadError;
pub use options::EngineOptions;
pub use server::{router, AppState};
pub use types::{ResultSet, Row};

pub type Result<T> = std::result::Result<T, LoadError>;
