use std::fmt;
use std::str::FromStr;

use crate::{LoadError, Result};

/// Formats a database ID into the canonical pipeline URL.
///
/// Example: `"abc123"` → `"https://abc123.warehouse.floedb.net/v1/pipeline"`
pub fn db_id_to_pipeline_url(db_id: &str) -> String {
    format!("https://{}.warehouse.floedb.net/v1/pipeline", db_id.trim())
}

/// Parsed form of the `ConnectionString` setting.
///
/// The raw value is semicolon-separated `key=value` pairs:
/// - `endpoint` — full pipeline URL, or
/// - `db` — database ID, expanded via [`db_id_to_pipeline_url`]
/// - `token` — access token (`Bearer ` prefix optional)
///
/// ```
/// use floedb_load::ConnectionString;
///
/// let conn = ConnectionString::parse("db=sales-prod;token=abc123").unwrap();
/// assert!(conn.pipeline_url().contains("sales-prod"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pipeline_url: String,
    authorization: String,
}

impl ConnectionString {
    /// Parses a raw connection string.
    ///
    /// Fails with [`LoadError::Config`] when the value is empty, a pair is
    /// malformed, a key is unknown, or the target/token is missing.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut endpoint: Option<String> = None;
        let mut token: Option<String> = None;

        if raw.trim().is_empty() {
            return Err(LoadError::Config("connection string is empty".to_owned()));
        }

        for pair in raw.split(';') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                LoadError::Config(format!("malformed connection string pair '{pair}'"))
            })?;
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "endpoint" => endpoint = Some(value.to_owned()),
                "db" => endpoint = Some(db_id_to_pipeline_url(value)),
                "token" => token = Some(value.to_owned()),
                other => {
                    return Err(LoadError::Config(format!(
                        "unknown connection string key '{other}'"
                    )));
                }
            }
        }

        let pipeline_url = endpoint.filter(|url| !url.is_empty()).ok_or_else(|| {
            LoadError::Config("connection string is missing 'endpoint' or 'db'".to_owned())
        })?;
        let token = token.filter(|token| !token.is_empty()).ok_or_else(|| {
            LoadError::Config("connection string is missing 'token'".to_owned())
        })?;

        Ok(Self {
            pipeline_url,
            authorization: normalize_bearer_authorization(&token),
        })
    }

    /// The warehouse pipeline endpoint URL.
    pub fn pipeline_url(&self) -> &str {
        &self.pipeline_url
    }

    /// The full `Authorization` header value.
    pub(crate) fn authorization(&self) -> &str {
        &self.authorization
    }
}

impl FromStr for ConnectionString {
    type Err = LoadError;

    fn from_str(raw: &str) -> Result<Self> {
        Self::parse(raw)
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionString")
            .field("pipeline_url", &self.pipeline_url)
            .field("authorization", &"<redacted>")
            .finish()
    }
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_bearer_authorization;
    use crate::{ConnectionString, LoadError};

    #[test]
    fn parses_endpoint_and_token() {
        let conn = ConnectionString::parse(
            "endpoint=https://sales.warehouse.floedb.net/v1/pipeline;token=abc123",
        )
        .expect("must parse");

        assert_eq!(
            conn.pipeline_url(),
            "https://sales.warehouse.floedb.net/v1/pipeline"
        );
        assert_eq!(conn.authorization(), "Bearer abc123");
    }

    #[test]
    fn expands_db_id_into_pipeline_url() {
        let conn = ConnectionString::parse("db=sales-prod;token=abc123").expect("must parse");
        assert_eq!(
            conn.pipeline_url(),
            "https://sales-prod.warehouse.floedb.net/v1/pipeline"
        );
    }

    #[test]
    fn keeps_existing_bearer_prefix() {
        assert_eq!(
            normalize_bearer_authorization("bEaReR abc123"),
            "bEaReR abc123".to_owned()
        );
    }

    #[test]
    fn rejects_missing_token() {
        let err = ConnectionString::parse("db=sales-prod").expect_err("must fail");
        assert!(matches!(err, LoadError::Config(_)));
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn rejects_empty_value() {
        let err = ConnectionString::parse("  ").expect_err("must fail");
        assert!(matches!(err, LoadError::Config(_)));
    }

    #[test]
    fn rejects_unknown_key() {
        let err = ConnectionString::parse("db=x;token=y;pooling=true").expect_err("must fail");
        assert!(err.to_string().contains("pooling"));
    }

    #[test]
    fn debug_redacts_token() {
        let conn = ConnectionString::parse("db=x;token=secret-token").expect("must parse");
        let debug = format!("{conn:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret-token"));
    }
}
