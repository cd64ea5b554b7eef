//! Terminal side of the tool: database sessions and result rendering.

pub mod connectivity;
pub mod outputformatter;

pub use connectivity::{Cell, Connector, MysqlConnector, ResultSet, Session};
pub use outputformatter::{render_grid, render_result, terminal_width, OutputMode, NO_RESULTS};
