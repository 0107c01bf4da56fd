use std::fmt;

use crate::{
    config::ConnectionString, decode, session::Session, types::ResultSet, EngineOptions,
    LoadCommand, LoadError, Result,
};

/// Executes ordered statement batches against the warehouse.
///
/// Each call owns exactly one session: it is opened at the start of the
/// call and released on every exit path, including mid-batch failures.
/// Statements run strictly in order, one at a time, and execution stops at
/// the first failure.
#[derive(Clone)]
pub struct LoadEngine {
    http: reqwest::Client,
    connection: ConnectionString,
    options: EngineOptions,
}

impl fmt::Debug for LoadEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadEngine")
            .field("connection", &self.connection)
            .field("options", &self.options)
            .finish()
    }
}

impl LoadEngine {
    /// Creates an engine bound to a parsed connection string.
    pub fn new(connection: ConnectionString) -> Self {
        Self {
            http: reqwest::Client::new(),
            connection,
            options: EngineOptions::default(),
        }
    }

    /// Parses `raw` and creates an engine bound to it.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use floedb_load::LoadEngine;
    ///
    /// let engine = LoadEngine::from_connection_string("db=sales-prod;token=abc123")?;
    /// # Ok::<(), floedb_load::LoadError>(())
    /// ```
    pub fn from_connection_string(raw: &str) -> Result<Self> {
        Ok(Self::new(ConnectionString::parse(raw)?))
    }

    /// Applies engine options such as timeout and open-retry behavior.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Derives the command's statement batch and materializes the terminal
    /// statement's result. Callers validate the command first.
    pub async fn load(&self, command: &LoadCommand) -> Result<ResultSet> {
        self.execute_reader(&command.to_statements()).await
    }

    /// Runs every statement in order for effect and returns the
    /// affected-row count reported for the last one. Counts from earlier
    /// statements are discarded.
    pub async fn execute_non_query(&self, statements: &[String]) -> Result<u64> {
        if statements.is_empty() {
            return Err(empty_batch());
        }

        let mut session = self.open_session().await?;
        let outcome = run_for_effect(&mut session, statements).await;
        let closed = session.close().await;

        let affected = outcome?;
        closed?;
        Ok(affected)
    }

    /// Runs all but the last statement for effect, in order, then the last
    /// one for its rows, returning them in cursor order.
    pub async fn execute_reader(&self, statements: &[String]) -> Result<ResultSet> {
        let Some((terminal, setup)) = statements.split_last() else {
            return Err(empty_batch());
        };

        let mut session = self.open_session().await?;
        let outcome = run_and_materialize(&mut session, setup, terminal).await;
        let closed = session.close().await;

        let rows = outcome?;
        closed?;
        Ok(rows)
    }

    async fn open_session(&self) -> Result<Session> {
        Session::open(
            self.http.clone(),
            self.connection.clone(),
            self.options.clone(),
        )
        .await
    }
}

async fn run_for_effect(session: &mut Session, statements: &[String]) -> Result<u64> {
    let mut affected = 0;
    for (index, sql) in statements.iter().enumerate() {
        let result = session.execute(sql.trim(), false, index).await?;
        affected = result.affected_row_count;
    }
    Ok(affected)
}

async fn run_and_materialize(
    session: &mut Session,
    setup: &[String],
    terminal: &str,
) -> Result<ResultSet> {
    for (index, sql) in setup.iter().enumerate() {
        session.execute(sql.trim(), false, index).await?;
    }
    let result = session.execute(terminal.trim(), true, setup.len()).await?;
    Ok(decode::materialize(result))
}

fn empty_batch() -> LoadError {
    LoadError::Decode("statement batch is empty".to_owned())
}
