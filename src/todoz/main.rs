use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;

/// Log filter: `$TODOZ_LOG`, then `$RUST_LOG`, else warnings only.
fn log_filter() -> EnvFilter {
    ["TODOZ_LOG", "RUST_LOG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|raw| raw.trim().to_string())
        .find(|raw| !raw.is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn main() {
    // stdout belongs to command output.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter())
        .init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
