use anyhow::{bail, Result};
use glyphview::args::Args;
use glyphview::{render_all, Config};
use tracing::{error, info};

fn init_logging(verbose: u8) -> Result<()> {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("glyphview={log_level},glyph_bitmap={log_level}").into()
            }),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging first
    init_logging(args.verbose)?;

    info!("Starting glyphview {}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_args(&args)?;
    let outcomes = render_all(&args.assets, &config)?;

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(png) => info!("{} -> {}", outcome.asset.display(), png.display()),
            Err(e) => {
                error!("{}: {:#}", outcome.asset.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} assets failed to render", failed, outcomes.len());
    }

    info!("Rendered {} assets", outcomes.len());
    Ok(())
}
