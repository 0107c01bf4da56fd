use std::time::Duration;

use reqwest::header;
use tokio::time::sleep;

use crate::{
    config::ConnectionString,
    decode,
    wire::{self, ExecuteStatement, PipelineRequest, Request},
    EngineOptions, LoadError, Result,
};

/// One live warehouse session over the pipeline endpoint.
///
/// The warehouse may rotate the baton on every round-trip; the stored value
/// is always the one the next request must present. Statements run one at a
/// time — a session is never shared between concurrent operations.
pub(crate) struct Session {
    http: reqwest::Client,
    connection: ConnectionString,
    options: EngineOptions,
    baton: Option<String>,
}

impl Session {
    /// Opens a session by posting an empty request list and keeping the
    /// issued baton.
    ///
    /// Transient transport and status failures are retried with exponential
    /// backoff; no statement has run at this point.
    pub(crate) async fn open(
        http: reqwest::Client,
        connection: ConnectionString,
        options: EngineOptions,
    ) -> Result<Self> {
        let mut session = Self {
            http,
            connection,
            options,
            baton: None,
        };

        let mut attempt = 0usize;
        loop {
            let payload = PipelineRequest {
                baton: None,
                requests: Vec::new(),
            };
            match session.post(&payload).await {
                Ok(response) => {
                    let baton = response.baton.ok_or_else(|| {
                        LoadError::Decode("warehouse did not issue a session baton".to_owned())
                    })?;
                    session.baton = Some(baton);
                    return Ok(session);
                }
                Err(err) if should_retry(&err) && attempt < session.options.open_max_retries => {
                    wait_before_retry(attempt, session.options.retry_backoff_ms).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Runs one statement under the session and returns its raw result.
    ///
    /// `index` is the statement's position in its batch, used for error
    /// attribution only.
    pub(crate) async fn execute(
        &mut self,
        sql: &str,
        want_rows: bool,
        index: usize,
    ) -> Result<wire::ExecuteResult> {
        let payload = PipelineRequest {
            baton: self.baton.clone(),
            requests: vec![Request::Execute {
                stmt: ExecuteStatement {
                    sql: sql.to_owned(),
                    want_rows,
                },
            }],
        };
        let response = self.post(&payload).await?;
        self.adopt_baton(response.baton);

        let result = response.results.into_iter().next().ok_or_else(|| {
            LoadError::Decode(format!("missing result for statement {index}"))
        })?;
        decode::into_execute_result(result, index)
    }

    /// Releases the session. Safe to call after a failed statement; the
    /// warehouse drops whatever state the baton still names.
    pub(crate) async fn close(mut self) -> Result<()> {
        let payload = PipelineRequest {
            baton: self.baton.take(),
            requests: vec![Request::Close {}],
        };
        let response = self.post(&payload).await?;

        let result = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| LoadError::Decode("missing close result".to_owned()))?;
        decode::ensure_close_ok(result)
    }

    fn adopt_baton(&mut self, baton: Option<String>) {
        if baton.is_some() {
            self.baton = baton;
        }
    }

    async fn post(&self, payload: &PipelineRequest) -> Result<wire::PipelineResponse> {
        let response = self
            .http
            .post(self.connection.pipeline_url())
            .header(header::AUTHORIZATION, self.connection.authorization())
            .header(header::CONTENT_TYPE, "application/json")
            .timeout(Duration::from_millis(self.options.timeout_ms))
            .json(payload)
            .send()
            .await
            .map_err(LoadError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(LoadError::Transport)?;

        if !status.is_success() {
            return Err(LoadError::Http {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<wire::PipelineResponse>(&body).map_err(|err| {
            LoadError::Decode(format!("invalid pipeline response JSON: {err}; body: {body}"))
        })
    }
}

fn should_retry(err: &LoadError) -> bool {
    match err {
        LoadError::Transport(err) => {
            err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
        }
        LoadError::Http { status, .. } => matches!(*status, 429 | 500 | 502 | 503 | 504),
        _ => false,
    }
}

async fn wait_before_retry(attempt: usize, backoff_ms: u64) {
    let exp = attempt.min(16) as u32;
    let multiplier = 1u64 << exp;
    let delay_ms = backoff_ms.saturating_mul(multiplier);

    tracing::debug!(delay_ms, "retrying session open");
    sleep(Duration::from_millis(delay_ms)).await;
}
