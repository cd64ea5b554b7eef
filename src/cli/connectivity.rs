use std::fmt::{self, Display, Formatter};

use async_trait::async_trait;
use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::prelude::Queryable;
use mysql_async::{Column as MysqlColumn, Conn, OptsBuilder, Row as MysqlRow, Value as MysqlValue};
use serde::Serialize;
use tracing::debug;

use crate::config::DbConfig;
use crate::error::{BoxError, MenuError, MenuResult};

/// One value of a result row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Exact numeric kept in the server's textual form.
    Decimal(String),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool { matches!(self, Cell::Null) }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Cell::Int(_) | Cell::UInt(_) | Cell::Float(_) | Cell::Decimal(_))
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("NULL"),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::UInt(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Decimal(s) | Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self { Cell::Text(s.to_string()) }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self { Cell::Int(v) }
}

/// Column names plus rows, in server order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultSet {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns: columns.into_iter().map(Into::into).collect(), rows }
    }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

/// Opens a fresh session per query. Nothing is pooled.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Human readable description of where sessions go.
    fn target(&self) -> String;

    async fn open(&self) -> MenuResult<Box<dyn Session>>;
}

#[async_trait]
pub trait Session: Send {
    /// Run a single parameterless statement and fetch the full result set.
    async fn query(&mut self, sql: &str) -> Result<ResultSet, BoxError>;

    async fn close(self: Box<Self>) -> Result<(), BoxError>;
}

#[derive(Debug, Clone)]
pub struct MysqlConnector {
    cfg: DbConfig,
}

impl MysqlConnector {
    pub fn new(cfg: DbConfig) -> Self { Self { cfg } }

    fn opts(&self) -> OptsBuilder {
        // Credentials go through the builder so passwords never need URL escaping
        OptsBuilder::default()
            .ip_or_hostname(self.cfg.host.clone())
            .tcp_port(self.cfg.port)
            .user(Some(self.cfg.user.clone()))
            .pass(Some(self.cfg.password.clone()))
            .db_name(Some(self.cfg.database.clone()))
    }
}

#[async_trait]
impl Connector for MysqlConnector {
    fn target(&self) -> String { self.cfg.target() }

    async fn open(&self) -> MenuResult<Box<dyn Session>> {
        debug!(target: "tienda_menu::connect", "opening connection to {}", self.cfg);
        let conn = Conn::new(self.opts())
            .await
            .map_err(|e| MenuError::connection(self.cfg.target(), e))?;
        Ok(Box::new(MysqlSession { conn }))
    }
}

pub struct MysqlSession {
    conn: Conn,
}

#[async_trait]
impl Session for MysqlSession {
    async fn query(&mut self, sql: &str) -> Result<ResultSet, BoxError> {
        let mut result = self.conn.query_iter(sql).await?;
        let kinds: Vec<(String, ColumnKind)> = result
            .columns_ref()
            .iter()
            .map(|c| (c.name_str().into_owned(), ColumnKind::of(c)))
            .collect();
        let rows: Vec<MysqlRow> = result.collect().await?;
        // Statements end in ';' so drain anything the server may still send
        result.drop_result().await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            let mut cells = Vec::with_capacity(kinds.len());
            for (idx, (_, kind)) in kinds.iter().enumerate() {
                cells.push(match row.as_ref(idx) {
                    Some(v) => kind.convert(v),
                    None => Cell::Null,
                });
            }
            out.push(cells);
        }
        let columns = kinds.into_iter().map(|(name, _)| name).collect();
        Ok(ResultSet { columns, rows: out })
    }

    async fn close(self: Box<Self>) -> Result<(), BoxError> {
        self.conn.disconnect().await?;
        Ok(())
    }
}

/// Rendering class of a result column, derived from the column definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int,
    UInt,
    Float,
    Decimal,
    Text,
}

impl ColumnKind {
    fn of(col: &MysqlColumn) -> Self {
        use ColumnType::*;
        let unsigned = col.flags().contains(ColumnFlags::UNSIGNED_FLAG);
        match col.column_type() {
            MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_LONG | MYSQL_TYPE_INT24
            | MYSQL_TYPE_LONGLONG | MYSQL_TYPE_YEAR
                if unsigned => ColumnKind::UInt,
            MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_LONG | MYSQL_TYPE_INT24
            | MYSQL_TYPE_LONGLONG | MYSQL_TYPE_YEAR => ColumnKind::Int,
            MYSQL_TYPE_FLOAT | MYSQL_TYPE_DOUBLE => ColumnKind::Float,
            MYSQL_TYPE_DECIMAL | MYSQL_TYPE_NEWDECIMAL => ColumnKind::Decimal,
            _ => ColumnKind::Text,
        }
    }

    /// The text protocol ships every non-null value as bytes; parse those
    /// according to the column kind and fall back to text on mismatch.
    fn convert(&self, v: &MysqlValue) -> Cell {
        match v {
            MysqlValue::NULL => Cell::Null,
            MysqlValue::Int(i) => Cell::Int(*i),
            MysqlValue::UInt(u) => Cell::UInt(*u),
            MysqlValue::Float(f) => Cell::Float(*f as f64),
            MysqlValue::Double(d) => Cell::Float(*d),
            MysqlValue::Bytes(b) => {
                let s = String::from_utf8_lossy(b).into_owned();
                match self {
                    ColumnKind::Int => s.parse::<i64>().map(Cell::Int).unwrap_or(Cell::Text(s)),
                    ColumnKind::UInt => s.parse::<u64>().map(Cell::UInt).unwrap_or(Cell::Text(s)),
                    ColumnKind::Float => s.parse::<f64>().map(Cell::Float).unwrap_or(Cell::Text(s)),
                    ColumnKind::Decimal => Cell::Decimal(s),
                    ColumnKind::Text => Cell::Text(s),
                }
            }
            MysqlValue::Date(y, mo, d, h, mi, s, us) => {
                let mut text = format!("{:04}-{:02}-{:02}", y, mo, d);
                if (*h, *mi, *s, *us) != (0, 0, 0, 0) {
                    text.push_str(&format!(" {:02}:{:02}:{:02}", h, mi, s));
                    if *us > 0 { text.push_str(&format!(".{:06}", us)); }
                }
                Cell::Text(text)
            }
            MysqlValue::Time(neg, days, h, mi, s, us) => {
                let hours = *days * 24 + *h as u32;
                let mut text = format!("{}{:02}:{:02}:{:02}", if *neg { "-" } else { "" }, hours, mi, s);
                if *us > 0 { text.push_str(&format!(".{:06}", us)); }
                Cell::Text(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_protocol_bytes_follow_column_kind() {
        let bytes = |s: &str| MysqlValue::Bytes(s.as_bytes().to_vec());
        assert_eq!(ColumnKind::Int.convert(&bytes("42")), Cell::Int(42));
        assert_eq!(ColumnKind::UInt.convert(&bytes("7")), Cell::UInt(7));
        assert_eq!(ColumnKind::Float.convert(&bytes("2.5")), Cell::Float(2.5));
        assert_eq!(ColumnKind::Decimal.convert(&bytes("1499.9000")), Cell::Decimal("1499.9000".into()));
        assert_eq!(ColumnKind::Text.convert(&bytes("CDMX")), Cell::Text("CDMX".into()));
        assert_eq!(ColumnKind::Int.convert(&MysqlValue::NULL), Cell::Null);
    }

    #[test]
    fn unparsable_numeric_bytes_fall_back_to_text() {
        let v = MysqlValue::Bytes(b"n/a".to_vec());
        assert_eq!(ColumnKind::Int.convert(&v), Cell::Text("n/a".into()));
    }

    #[test]
    fn temporal_values_render_as_text() {
        assert_eq!(ColumnKind::Text.convert(&MysqlValue::Date(2024, 3, 9, 0, 0, 0, 0)), Cell::Text("2024-03-09".into()));
        assert_eq!(
            ColumnKind::Text.convert(&MysqlValue::Date(2024, 3, 9, 14, 5, 0, 0)),
            Cell::Text("2024-03-09 14:05:00".into())
        );
        assert_eq!(ColumnKind::Text.convert(&MysqlValue::Time(false, 1, 2, 3, 4, 0)), Cell::Text("26:03:04".into()));
    }

    #[test]
    fn cell_display_and_json() {
        assert_eq!(Cell::Null.to_string(), "NULL");
        assert_eq!(Cell::Decimal("10.50".into()).to_string(), "10.50");
        let rs = ResultSet::new(["nombre", "total"], vec![vec![Cell::from("Ana"), Cell::Int(3)], vec![Cell::Null, Cell::Null]]);
        let json = serde_json::to_value(&rs).unwrap();
        assert_eq!(json, serde_json::json!({"columns": ["nombre", "total"], "rows": [["Ana", 3], [null, null]]}));
    }
}
