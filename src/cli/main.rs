use clap::Command;

mod args;
mod context;
mod endpoint;
mod host;
mod profile;
mod remote;
mod table;
mod tag;

use context::Context;

fn cli() -> Command {
    Command::new("fedhub")
        .about("module federation registry")
        .version("0.1.0")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(endpoint::args())
        .subcommand(host::args())
        .subcommand(remote::args())
        .subcommand(tag::args())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let matches = cli().get_matches();

    let mut context = Context::load()?;

    match matches.subcommand() {
        Some(("endpoint", submatches)) => Ok(endpoint::handlers(submatches, &mut context).await?),
        Some(("host", submatches)) => Ok(host::handlers(submatches, &context).await?),
        Some(("remote", submatches)) => Ok(remote::handlers(submatches, &context).await?),
        Some(("tag", submatches)) => Ok(tag::handlers(submatches, &context).await?),
        _ => unreachable!(), // If all subcommands are defined above, anything else is unreachable
    }
}
