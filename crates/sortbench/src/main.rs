//! sortbench: scaling benchmark harness for a distributed sort executable.

use sortbench_cli::ui;
use sortbench_lib::{app, config, errors};
use tracing_subscriber::EnvFilter;

fn main() {
    let config = config::AppConfig::parse();

    // Logs on stderr; narration and the report own stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(config.log_level().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = app::run(&config) {
        ui::print_fatal(&format!("{err:#}"));
        std::process::exit(errors::exit_code(&err));
    }
}
