//!
//! tienda_menu binary
//! ------------------
//! Interactive menu over the relational algebra query catalog. Each selection
//! runs against the `tienda_online` MySQL database configured through
//! `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and `DB_NAME`.

use std::env;
use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use tienda_menu::catalog::Catalog;
use tienda_menu::cli::{terminal_width, MysqlConnector, OutputMode};
use tienda_menu::config::DbConfig;
use tienda_menu::executor::Executor;
use tienda_menu::menu::MenuLoop;
use tienda_menu::tools::catalogcheck::check_catalog;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program}                 # interactive menu\n  {program} --run <n>       # run catalog entry <n> once and exit\n  {program} --list          # print the catalog grouped by section\n  {program} --check         # parse every catalog entry with the MySQL dialect\n\nFlags:\n  -r, --run <n>            Run a single entry (1-20)\n  --list                   List entries, including known-defect notes\n  --check                  Static parse check; exits 1 on unexpected failures\n  --json                   Print result sets as JSON (same as TIENDA_OUTPUT=json)\n  -h, --help               Show this help\n\nEnvironment:\n  DB_HOST (db), DB_PORT (3306), DB_USER (root), DB_PASSWORD (root), DB_NAME (tienda_online)\n  RUST_LOG                 log filter for stderr diagnostics (default: warn)"
    );
}

fn main() -> Result<()> {
    // Diagnostics go to stderr so the menu on stdout stays readable
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .context("invalid log filter")?;
    let _ = fmt().with_env_filter(filter).with_writer(io::stderr).try_init();

    let mut args: Vec<String> = env::args().collect();
    let program = if args.is_empty() { "tienda_menu".to_string() } else { args.remove(0) };

    let mut run_key: Option<String> = None;
    let mut list = false;
    let mut check = false;
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--run" | "-r" => {
                if i + 1 >= args.len() { eprintln!("--run requires a value"); print_usage(&program); std::process::exit(2); }
                run_key = Some(args[i+1].clone());
                i += 2; continue;
            }
            "--list" => { list = true; i += 1; continue; }
            "--check" => { check = true; i += 1; continue; }
            "--json" => { json = true; i += 1; continue; }
            "-h" | "--help" => {
                print_usage(&program);
                return Ok(());
            }
            unk => {
                eprintln!("Unrecognized argument: {}", unk);
                print_usage(&program);
                std::process::exit(2);
            }
        }
    }

    let catalog = Catalog::reference();

    if list {
        let mut out = io::stdout().lock();
        for (section, defs) in catalog.sections() {
            writeln!(out, "\n# {}", section.title())?;
            for def in defs {
                writeln!(out, "{}", def.menu_line())?;
                if let Some(note) = def.known_defect { writeln!(out, "   ! {}", note)?; }
            }
        }
        return Ok(());
    }

    if check {
        let outcomes = check_catalog(&catalog);
        let failures = outcomes.iter().filter(|o| o.is_unexpected_failure()).count();
        for o in &outcomes {
            println!("{:>2}: {}", o.key, o.label());
        }
        eprintln!("[catalogcheck] {} entr(ies) parsed, {} unexpected failure(s)", outcomes.len(), failures);
        if failures > 0 { std::process::exit(1); }
        return Ok(());
    }

    let cfg = DbConfig::from_env().context("reading database settings from the environment")?;
    info!(target: "tienda_menu", "database: {}", cfg);

    let mode = if json { OutputMode::Json } else { OutputMode::from_env() };
    let executor = Executor::new(MysqlConnector::new(cfg))
        .with_mode(mode)
        .with_width(terminal_width());

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    if let Some(raw) = run_key {
        let def = match raw.trim().parse::<u32>().ok().and_then(|k| catalog.lookup(k)) {
            Some(def) => def,
            None => { eprintln!("unknown catalog entry: {}", raw); std::process::exit(2); }
        };
        let mut out = io::stdout().lock();
        if let Err(e) = rt.block_on(executor.run(def, &mut out)) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    println!(r"  _   _                _
 | |_(_) ___ _ __   __| | __ _
 | __| |/ _ \ '_ \ / _` |/ _` |
 | |_| |  __/ | | | (_| | (_| |
  \__|_|\___|_| |_|\__,_|\__,_|
     Consultas de álgebra relacional");

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    MenuLoop::new(catalog, &executor, &rt)
        .run(stdin.lock(), &mut out)
        .context("menu loop aborted")?;
    Ok(())
}
