//! Runs one catalog entry: open a session, execute, render, release.

use std::io::Write;
use std::time::Instant;

use tracing::{debug, warn};

use crate::catalog::QueryDefinition;
use crate::cli::{render_result, Connector, OutputMode, ResultSet};
use crate::error::{MenuError, MenuResult};

pub struct Executor<C> {
    connector: C,
    mode: OutputMode,
    width: usize,
}

impl<C: Connector> Executor<C> {
    pub fn new(connector: C) -> Self {
        Self { connector, mode: OutputMode::Grid, width: 80 }
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Per-cell width budget for grid output.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn connector(&self) -> &C { &self.connector }

    /// Execute the definition's query on a fresh session. The session is
    /// closed whether or not the query succeeds.
    pub async fn fetch(&self, def: &QueryDefinition) -> MenuResult<ResultSet> {
        let started = Instant::now();
        let mut session = self.connector.open().await?;
        let res = session.query(def.query_text).await;
        if let Err(e) = session.close().await {
            warn!(target: "tienda_menu::executor", "closing session for query {} failed: {}", def.key, e);
        }
        let rs = res.map_err(|e| MenuError::query(def.key, e))?;
        debug!(
            target: "tienda_menu::executor",
            "query {} returned {} row(s), {} column(s) in {} ms",
            def.key, rs.rows.len(), rs.columns.len(), started.elapsed().as_millis()
        );
        Ok(rs)
    }

    /// Fetch and write the full report (label, description, table) to `out`.
    pub async fn run<W: Write>(&self, def: &QueryDefinition, out: &mut W) -> MenuResult<()> {
        let rs = match self.fetch(def).await {
            Ok(rs) => rs,
            Err(e) => {
                warn!(target: "tienda_menu::executor", code = e.code(), "query {} failed: {}", def.key, e);
                return Err(e);
            }
        };
        out.write_all(render_report(def, &rs, self.mode, self.width).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

pub fn render_report(def: &QueryDefinition, rs: &ResultSet, mode: OutputMode, width: usize) -> String {
    format!(
        "\nTipo: {}\nDescripción: {}\n\n{}\n",
        def.category_label,
        def.description,
        render_result(rs, mode, width)
    )
}
