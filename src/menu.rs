//! Interactive menu loop.
//!
//! Two states: `Running` prints the catalog and reads one line per turn,
//! `Terminated` is reached on the exit sentinel or end of input.

use std::io::{BufRead, Write};

use tokio::runtime::Runtime;
use tracing::{debug, error};

use crate::catalog::{Catalog, QueryDefinition};
use crate::cli::Connector;
use crate::error::{MenuError, MenuResult};
use crate::executor::Executor;

pub const EXIT_SENTINEL: &str = "0";
pub const MENU_TITLE: &str = "===== MENÚ DE CONSULTAS – TIENDA EN LÍNEA =====";
pub const EXIT_LINE: &str = "0. Salir";
pub const PROMPT: &str = "Seleccione una opción: ";
pub const INVALID_OPTION: &str = "Opción inválida";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

#[derive(Debug, Clone, Copy)]
pub enum Selection {
    Exit,
    Run(&'static QueryDefinition),
}

/// Classify one input line. Only a plain run of ASCII digits naming a catalog
/// key selects a query; signs, spaces inside the number and `00` do not.
pub fn parse_selection(line: &str, catalog: &Catalog) -> MenuResult<Selection> {
    let input = line.trim();
    if input == EXIT_SENTINEL { return Ok(Selection::Exit); }
    let invalid = || MenuError::InvalidSelection(input.to_string());
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let key: u32 = input.parse().map_err(|_| invalid())?;
    catalog.lookup(key).map(Selection::Run).ok_or_else(invalid)
}

pub fn print_menu<W: Write>(catalog: &Catalog, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "\n{}", MENU_TITLE)?;
    for def in catalog.entries() {
        writeln!(out, "{}", def.menu_line())?;
    }
    writeln!(out, "{}", EXIT_LINE)
}

pub struct MenuLoop<'a, C> {
    catalog: Catalog,
    executor: &'a Executor<C>,
    rt: &'a Runtime,
    state: LoopState,
}

impl<'a, C: Connector> MenuLoop<'a, C> {
    pub fn new(catalog: Catalog, executor: &'a Executor<C>, rt: &'a Runtime) -> Self {
        Self { catalog, executor, rt, state: LoopState::Running }
    }

    pub fn state(&self) -> LoopState { self.state }

    /// Process one line of input. Query failures are reported to `out` and
    /// the loop stays in `Running`; only console I/O errors escape.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> MenuResult<LoopState> {
        if self.state == LoopState::Terminated { return Ok(self.state); }
        match parse_selection(line, &self.catalog) {
            Ok(Selection::Exit) => {
                self.state = LoopState::Terminated;
            }
            Ok(Selection::Run(def)) => {
                match self.rt.block_on(self.executor.run(def, out)) {
                    Ok(()) => {}
                    Err(e) if e.is_recoverable() => {
                        error!(target: "tienda_menu::menu", code = e.code(), "query {} failed", def.key);
                        writeln!(out, "Error: {}", e)?;
                    }
                    Err(e) => return Err(e),
                }
            }
            Err(e) => {
                debug!(target: "tienda_menu::menu", code = e.code(), "{}", e);
                writeln!(out, "{}", INVALID_OPTION)?;
            }
        }
        Ok(self.state)
    }

    /// Drive the loop until the exit sentinel or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> MenuResult<()> {
        let mut line = String::new();
        while self.state == LoopState::Running {
            print_menu(&self.catalog, out)?;
            write!(out, "{}", PROMPT)?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                // EOF behaves like the exit sentinel
                writeln!(out)?;
                self.state = LoopState::Terminated;
                break;
            }
            self.handle_line(&line, out)?;
        }
        Ok(())
    }
}
