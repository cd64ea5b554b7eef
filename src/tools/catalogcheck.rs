use sqlparser::ast::Statement;
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::{Parser, ParserError};

use crate::catalog::{Catalog, QueryDefinition};

/// Result of statically parsing one catalog entry.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub key: u32,
    pub parsed: Result<(), String>,
    pub known_defect: Option<&'static str>,
}

impl CheckOutcome {
    /// A parse failure on an entry that is not flagged as defective.
    pub fn is_unexpected_failure(&self) -> bool {
        self.parsed.is_err() && self.known_defect.is_none()
    }

    pub fn label(&self) -> String {
        match (&self.parsed, self.known_defect) {
            (Ok(()), None) => "ok".to_string(),
            (Ok(()), Some(note)) => format!("ok (known defect: {})", note),
            (Err(e), Some(_)) => format!("known defect: {}", e),
            (Err(e), None) => format!("error: {}", e),
        }
    }
}

/// Parse one query text with the MySQL dialect. Exactly one query statement
/// is expected.
pub fn parse_query(sql: &str) -> Result<Statement, ParserError> {
    let dialect = MySqlDialect {};
    let mut statements = Parser::parse_sql(&dialect, sql)?;
    if statements.len() != 1 {
        return Err(ParserError::ParserError(format!("expected one statement, found {}", statements.len())));
    }
    let stmt = statements.remove(0);
    match stmt {
        Statement::Query(_) => Ok(stmt),
        other => Err(ParserError::ParserError(format!("not a query: {}", other))),
    }
}

pub fn check_entry(def: &QueryDefinition) -> CheckOutcome {
    CheckOutcome {
        key: def.key,
        parsed: parse_query(def.query_text).map(|_| ()).map_err(|e| e.to_string()),
        known_defect: def.known_defect,
    }
}

/// Parse every entry in registration order.
pub fn check_catalog(catalog: &Catalog) -> Vec<CheckOutcome> {
    catalog.entries().iter().map(check_entry).collect()
}
