use crate::{
    types::{ResultSet, Row},
    wire, LoadError, Result,
};

/// Unwraps one pipeline result into its execute payload, or into the
/// statement error the warehouse reported for it.
pub(crate) fn into_execute_result(
    result: wire::PipelineResult,
    index: usize,
) -> Result<wire::ExecuteResult> {
    match result.kind.as_str() {
        "ok" => {
            let response = result.response.ok_or_else(|| {
                LoadError::Decode(format!("missing response payload for statement {index}"))
            })?;
            if response.kind != "execute" {
                return Err(LoadError::Decode(format!(
                    "expected execute response for statement {index}, got '{}'",
                    response.kind
                )));
            }
            response.result.ok_or_else(|| {
                LoadError::Decode(format!("missing execute result payload for statement {index}"))
            })
        }
        "error" => {
            let error = result.error.ok_or_else(|| {
                LoadError::Decode(format!("missing error payload for statement {index}"))
            })?;
            Err(LoadError::Statement {
                index,
                message: error.message,
                code: error.code,
            })
        }
        other => Err(LoadError::Decode(format!(
            "unknown pipeline result type '{other}' for statement {index}"
        ))),
    }
}

/// Checks that a close request was acknowledged.
pub(crate) fn ensure_close_ok(result: wire::PipelineResult) -> Result<()> {
    match result.kind.as_str() {
        "ok" => {
            let response = result
                .response
                .ok_or_else(|| LoadError::Decode("missing close response payload".to_owned()))?;
            if response.kind != "close" {
                return Err(LoadError::Decode(format!(
                    "expected close response, got '{}'",
                    response.kind
                )));
            }
            Ok(())
        }
        "error" => {
            let error = result
                .error
                .ok_or_else(|| LoadError::Decode("missing close error payload".to_owned()))?;
            Err(LoadError::Decode(format!(
                "session close rejected: {}",
                error.message
            )))
        }
        other => Err(LoadError::Decode(format!(
            "unknown pipeline result type '{other}' for close"
        ))),
    }
}

/// Converts the terminal statement's result into rows of ordered
/// name/rendered-value pairs.
///
/// Column names are paired with values by position, so duplicate names in
/// the result set survive as-is, and row order follows emission order.
pub(crate) fn materialize(result: wire::ExecuteResult) -> ResultSet {
    let names: Vec<String> = result.cols.into_iter().map(|col| col.name).collect();
    let rows = result
        .rows
        .into_iter()
        .map(|values| {
            names
                .iter()
                .cloned()
                .zip(values.into_iter().map(render_value))
                .collect::<Row>()
        })
        .collect();
    ResultSet { rows }
}

/// Renders a native value as text. Nulls render empty rather than as a
/// literal `null`.
pub(crate) fn render_value(value: wire::Value) -> String {
    match value {
        wire::Value::Null {} => String::new(),
        wire::Value::Integer { value } | wire::Value::Float { value } | wire::Value::Text { value } => {
            value
        }
        wire::Value::Blob { base64 } => base64,
    }
}

#[cfg(test)]
mod tests {
    use crate::{decode, wire, LoadError};

    fn execute_result(cols: &[&str], rows: Vec<Vec<wire::Value>>) -> wire::ExecuteResult {
        wire::ExecuteResult {
            cols: cols
                .iter()
                .map(|name| wire::Col {
                    name: (*name).to_owned(),
                })
                .collect(),
            rows,
            affected_row_count: 0,
        }
    }

    #[test]
    fn renders_each_value_kind_as_text() {
        assert_eq!(decode::render_value(wire::Value::Null {}), "");
        assert_eq!(
            decode::render_value(wire::Value::Integer {
                value: "42".to_owned()
            }),
            "42"
        );
        assert_eq!(
            decode::render_value(wire::Value::Float {
                value: "1.5".to_owned()
            }),
            "1.5"
        );
        assert_eq!(
            decode::render_value(wire::Value::Text {
                value: "a.csv".to_owned()
            }),
            "a.csv"
        );
        assert_eq!(
            decode::render_value(wire::Value::Blob {
                base64: "AQID".to_owned()
            }),
            "AQID"
        );
    }

    #[test]
    fn materialize_pairs_names_by_position() {
        let result = execute_result(
            &["file", "status", "status"],
            vec![vec![
                wire::Value::Text {
                    value: "a.csv".to_owned(),
                },
                wire::Value::Text {
                    value: "LOADED".to_owned(),
                },
                wire::Value::Null {},
            ]],
        );

        let set = decode::materialize(result);
        assert_eq!(set.rows.len(), 1);
        let columns: Vec<_> = set.rows[0].columns().collect();
        assert_eq!(
            columns,
            vec![("file", "a.csv"), ("status", "LOADED"), ("status", "")]
        );
    }

    #[test]
    fn materialize_keeps_emission_order() {
        let result = execute_result(
            &["n"],
            vec![
                vec![wire::Value::Integer {
                    value: "2".to_owned(),
                }],
                vec![wire::Value::Integer {
                    value: "1".to_owned(),
                }],
            ],
        );

        let set = decode::materialize(result);
        assert_eq!(set.rows[0].get("n"), Some("2"));
        assert_eq!(set.rows[1].get("n"), Some("1"));
    }

    #[test]
    fn error_result_maps_to_statement_error() {
        let result = wire::PipelineResult {
            kind: "error".to_owned(),
            response: None,
            error: Some(wire::PipelineError {
                message: "table not found".to_owned(),
                code: Some("FLOE_002".to_owned()),
            }),
        };

        let err = decode::into_execute_result(result, 2).expect_err("must fail");
        match err {
            LoadError::Statement {
                index,
                message,
                code,
            } => {
                assert_eq!(index, 2);
                assert_eq!(message, "table not found");
                assert_eq!(code.as_deref(), Some("FLOE_002"));
            }
            other => panic!("expected statement error, got {other:?}"),
        }
    }

    #[test]
    fn close_result_of_wrong_kind_is_decode_error() {
        let result = wire::PipelineResult {
            kind: "ok".to_owned(),
            response: Some(wire::ResponseEnvelope {
                kind: "execute".to_owned(),
                result: None,
            }),
            error: None,
        };

        let err = decode::ensure_close_ok(result).expect_err("must fail");
        assert!(matches!(err, LoadError::Decode(_)));
    }
}
