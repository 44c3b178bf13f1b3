// allyselect entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout belongs to the operator)
// 2. Load config
// 3. Load the team catalog
// 4. Build the draft controller
// 5. Run commands from a script file (first argument) or stdin

use std::io::{BufRead, Write};
use std::path::Path;

use allyselect_app::catalog;
use allyselect_app::config;
use allyselect_app::session::{Outcome, Session};
use allyselect_core::DraftController;

use anyhow::Context;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("allyselect starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} teams per alliance, up to {} alliances, stealing={:?}",
        config.rules.teams_per_alliance, config.rules.max_alliances, config.rules.captain_stealing
    );

    // 3. Load the team catalog
    let records = catalog::load_catalog(Path::new(&config.catalog_path))
        .with_context(|| format!("failed to load team catalog {}", config.catalog_path))?;
    info!("Loaded {} teams from {}", records.len(), config.catalog_path);

    // 4. Build the draft controller
    let controller = DraftController::new(records, &config.weights, config.rules)
        .context("failed to build draft")?;
    info!(
        "Draft ready with {} alliances",
        controller.state().alliances().len()
    );
    let mut session = Session::new(controller);

    // 5. Run commands
    match std::env::args().nth(1) {
        Some(script) => {
            let input = std::fs::read_to_string(&script)
                .with_context(|| format!("failed to read command script {script}"))?;
            print!("{}", session.run_script(&input));
        }
        None => run_interactive(&mut session)?,
    }

    info!("allyselect shut down cleanly");
    Ok(())
}

fn run_interactive(session: &mut Session) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    if let Ok(Outcome::Text(table)) = session.execute_line("show") {
        writeln!(stdout, "{table}")?;
    }
    write!(stdout, "> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        match session.execute_line(&line) {
            Ok(Outcome::Text(text)) => {
                if !text.is_empty() {
                    writeln!(stdout, "{text}")?;
                }
            }
            Ok(Outcome::Quit) => break,
            Err(e) => {
                warn!("Command `{}` failed: {}", line.trim(), e);
                writeln!(stdout, "error: {e}")?;
            }
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    Ok(())
}

/// Filter used when `RUST_LOG` is unset: this workspace at info, other
/// crates at warn.
const DEFAULT_LOG_FILTER: &str = "allyselect=info,warn";

/// Route tracing output to `logs/allyselect.log`, appending so one event's
/// restarts share a single draft log. Stdout stays free for the operator.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_path = std::env::current_dir()?.join("logs").join("allyselect.log");
    if let Some(dir) = log_path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("cannot open draft log {}", log_path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("draft log subscriber already installed")?;

    Ok(())
}
