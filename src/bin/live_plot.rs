use live_lpp::live::{parse_cli, run_session};
use live_lpp::{ChartRenderer, LiveError, SessionEnd, StopSignal};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let config = match parse_cli() {
        Ok(c) => c,
        Err(LiveError::Cli(e)) => e.exit(),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(e.exit_code());
        }
    };
    init_logging(config.verbose);
    println!(
        "read data from {} and plot to {}",
        config.data.display(),
        config.render.output.display()
    );

    let mut renderer = ChartRenderer::new(config.render.clone());
    let stop = StopSignal::new();
    match run_session(&config, &mut renderer, &stop) {
        Ok(SessionEnd::Completed { frames }) => info!(frames, "session ended"),
        Ok(SessionEnd::Stopped { frames }) => warn!(frames, "session stopped early"),
        Err(e) => {
            error!(kind = ?e.kind(), "{}", e);
            eprintln!("error: {}", e);
            std::process::exit(e.exit_code());
        }
    }

    if config.hold {
        println!("replay finished, press enter to exit");
        let mut line = String::new();
        if let Err(e) = std::io::stdin().read_line(&mut line) {
            warn!("could not read stdin: {}", e);
        }
    }
}
