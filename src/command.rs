use serde::Deserialize;

/// Bulk-load request body for `POST /v1/load`.
///
/// Field names on the wire are PascalCase, matching the external contract:
/// `{"Stage": "@landing", "TargetTable": "events", ...}`. Absent fields
/// deserialize to their empty defaults and are caught by [`validate`].
///
/// [`validate`]: LoadCommand::validate
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoadCommand {
    /// Stage reference the files are read from, e.g. `@landing`.
    pub stage: String,
    /// Table the files are copied into.
    pub target_table: String,
    /// File names within the stage. Empty means the whole stage.
    pub files: Vec<String>,
    /// Warehouse to run the batch on.
    pub warehouse: String,
    pub database: String,
    pub schema: String,
    /// Reload files even if they were already loaded.
    pub force: bool,
    /// Warehouse-side error policy for the copy, passed through verbatim.
    pub on_error: String,
}

impl LoadCommand {
    /// Checks that the command carries the fields the derived batch cannot
    /// do without. Pure self-check: repeated calls give the same answer.
    pub fn validate(&self) -> Result<(), String> {
        if self.stage.trim().is_empty() {
            return Err("Stage is required".to_owned());
        }
        if self.target_table.trim().is_empty() {
            return Err("TargetTable is required".to_owned());
        }
        Ok(())
    }

    /// Derives the ordered statement batch for this command.
    ///
    /// Context statements (`USE WAREHOUSE` / `USE DATABASE` / `USE SCHEMA`)
    /// come first, for the fields that are present; the `COPY INTO` is
    /// always last. The batch is never empty.
    pub fn to_statements(&self) -> Vec<String> {
        let mut statements = Vec::with_capacity(4);

        if !self.warehouse.trim().is_empty() {
            statements.push(format!("USE WAREHOUSE {}", self.warehouse.trim()));
        }
        if !self.database.trim().is_empty() {
            statements.push(format!("USE DATABASE {}", self.database.trim()));
        }
        if !self.schema.trim().is_empty() {
            statements.push(format!("USE SCHEMA {}", self.schema.trim()));
        }

        let mut copy = format!(
            "COPY INTO {} FROM {}",
            self.target_table.trim(),
            self.stage.trim()
        );
        if !self.files.is_empty() {
            let list = self
                .files
                .iter()
                .map(|file| quote_literal(file))
                .collect::<Vec<_>>()
                .join(", ");
            copy.push_str(&format!(" FILES = ({list})"));
        }
        if self.force {
            copy.push_str(" FORCE = TRUE");
        }
        if !self.on_error.trim().is_empty() {
            copy.push_str(&format!(" ON_ERROR = {}", self.on_error.trim()));
        }
        statements.push(copy);

        statements
    }
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use crate::LoadCommand;

    fn full_command() -> LoadCommand {
        LoadCommand {
            stage: "@mystage".to_owned(),
            target_table: "T".to_owned(),
            files: vec!["a.csv".to_owned()],
            warehouse: "W".to_owned(),
            database: "D".to_owned(),
            schema: "S".to_owned(),
            force: false,
            on_error: "ABORT_STATEMENT".to_owned(),
        }
    }

    #[test]
    fn validate_accepts_full_command() {
        assert_eq!(full_command().validate(), Ok(()));
    }

    #[test]
    fn validate_requires_stage_first() {
        let command = LoadCommand::default();
        assert_eq!(command.validate(), Err("Stage is required".to_owned()));
    }

    #[test]
    fn validate_requires_target_table() {
        let command = LoadCommand {
            stage: "@mystage".to_owned(),
            ..LoadCommand::default()
        };
        assert_eq!(
            command.validate(),
            Err("TargetTable is required".to_owned())
        );
    }

    #[test]
    fn validate_is_idempotent() {
        let command = LoadCommand {
            stage: "@mystage".to_owned(),
            ..LoadCommand::default()
        };
        assert_eq!(command.validate(), command.validate());
    }

    #[test]
    fn statements_put_context_before_copy() {
        let statements = full_command().to_statements();
        assert_eq!(
            statements,
            vec![
                "USE WAREHOUSE W".to_owned(),
                "USE DATABASE D".to_owned(),
                "USE SCHEMA S".to_owned(),
                "COPY INTO T FROM @mystage FILES = ('a.csv') ON_ERROR = ABORT_STATEMENT"
                    .to_owned(),
            ]
        );
    }

    #[test]
    fn minimal_command_derives_single_statement() {
        let command = LoadCommand {
            stage: "@mystage".to_owned(),
            target_table: "T".to_owned(),
            ..LoadCommand::default()
        };
        assert_eq!(
            command.to_statements(),
            vec!["COPY INTO T FROM @mystage".to_owned()]
        );
    }

    #[test]
    fn force_flag_appends_force_clause() {
        let command = LoadCommand {
            force: true,
            on_error: String::new(),
            ..full_command()
        };
        let copy = command.to_statements().pop().expect("must have copy");
        assert!(copy.ends_with("FILES = ('a.csv') FORCE = TRUE"));
    }

    #[test]
    fn file_names_escape_single_quotes() {
        let command = LoadCommand {
            files: vec!["it's.csv".to_owned()],
            ..full_command()
        };
        let copy = command.to_statements().pop().expect("must have copy");
        assert!(copy.contains("FILES = ('it''s.csv')"));
    }

    #[test]
    fn deserializes_pascal_case_fields() {
        let command: LoadCommand = serde_json::from_str(
            r#"{
                "Stage": "@mystage",
                "TargetTable": "T",
                "Files": ["a.csv"],
                "Warehouse": "W",
                "Database": "D",
                "Schema": "S",
                "Force": false,
                "OnError": "ABORT_STATEMENT"
            }"#,
        )
        .expect("must deserialize");

        assert_eq!(command, full_command());
    }
}
