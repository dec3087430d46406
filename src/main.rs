use clap::Parser;
use miette::Result;
use hestia_site::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) so piping into
    // `head` or `grep -q` does not panic on a broken pipe.
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
    hestia_site::init_tracing(global.verbose);

    match cli.command {
        Commands::Validate(args) => hestia_site::cli::commands::validate::run(args, &global),
        Commands::List(args) => hestia_site::cli::commands::list::run(args, &global),
        Commands::Show(args) => hestia_site::cli::commands::show::run(args, &global),
        Commands::Site(cmd) => hestia_site::cli::commands::site::run(cmd, &global),
        Commands::Schema(cmd) => hestia_site::cli::commands::schema::run(cmd, &global),
        Commands::Config(cmd) => hestia_site::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => hestia_site::cli::commands::completions::run(args),
    }
}
