//! Error model shared by the executor, the menu loop and the CLI front end.
//! Each variant carries a stable code used in log lines.

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum MenuError {
    /// The database could not be reached or rejected the credentials.
    #[error("no se pudo conectar a {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: BoxError,
    },

    /// The server rejected or failed the query of a catalog entry.
    #[error("la consulta {key} falló: {source}")]
    Query {
        key: u32,
        #[source]
        source: BoxError,
    },

    #[error("opción inválida: '{0}'")]
    InvalidSelection(String),

    #[error("configuración inválida: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MenuError {
    pub fn connection<E: Into<BoxError>>(target: impl Into<String>, source: E) -> Self {
        MenuError::Connection { target: target.into(), source: source.into() }
    }

    pub fn query<E: Into<BoxError>>(key: u32, source: E) -> Self {
        MenuError::Query { key, source: source.into() }
    }

    pub fn code(&self) -> &'static str {
        match self {
            MenuError::Connection { .. } => "connection_failure",
            MenuError::Query { .. } => "query_failure",
            MenuError::InvalidSelection(_) => "invalid_selection",
            MenuError::Config(_) => "config_error",
            MenuError::Io(_) => "io_error",
        }
    }

    /// Failures the menu loop reports and then keeps going.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, MenuError::Io(_))
    }
}

pub type MenuResult<T> = Result<T, MenuError>;
