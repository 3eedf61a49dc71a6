use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;
use velo::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Terminate quietly on a closed pipe (`velo part list | head`)
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
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

    let default_level = if global.verbose { "velo=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Dashboard(args) => velo::cli::commands::dashboard::run(args, &global),
        Commands::Project(cmd) => velo::cli::commands::project::run(cmd, &global),
        Commands::Part(cmd) => velo::cli::commands::part::run(cmd, &global),
        Commands::Sub(cmd) => velo::cli::commands::sub::run(cmd, &global),
        Commands::Photo(cmd) => velo::cli::commands::photo::run(cmd, &global),
        Commands::Search(args) => velo::cli::commands::search::run(args, &global),
        Commands::Export(args) => velo::cli::commands::export::run(args, &global),
        Commands::Config(cmd) => velo::cli::commands::config::run(cmd),
        Commands::Completions(args) => velo::cli::commands::completions::run(args),
    }
}
