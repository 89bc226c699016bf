use clap::Parser;
use lendsqr::cli::{Cli, Commands};
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    init_logging(global.verbose);

    match cli.command {
        Commands::Users(cmd) => lendsqr::cli::commands::users::run(cmd, &global),
        Commands::Cache(cmd) => lendsqr::cli::commands::cache::run(cmd, &global),
        Commands::Completions(args) => lendsqr::cli::commands::completions::run(args),
    }
}

/// Log to stderr, filtered by `LENDSQR_LOG`; `LENDSQR_LOG_FORMAT=json` for JSON lines
fn init_logging(verbose: bool) {
    let default = if verbose { "lendsqr=debug" } else { "lendsqr=warn" };
    let filter = EnvFilter::try_from_env("LENDSQR_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let json = std::env::var("LENDSQR_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}
