use clap::{arg, ArgMatches, Command};
use fedhub_core::FedhubClient;

use crate::args::required_string;
use crate::context::Context;

pub fn args() -> Command {
    Command::new("endpoint")
        .about("save the api endpoint to the profile")
        .arg(arg!(<URL> "api base url, e.g. http://localhost:8080"))
        .arg_required_else_help(true)
}

pub async fn handlers(model_match: &ArgMatches, context: &mut Context) -> anyhow::Result<()> {
    let url = required_string(model_match, "URL")?;

    // reject anything the client could not use later
    FedhubClient::new(&url)?;

    context.profile.endpoint = Some(url.clone());
    context.profile.save()?;

    tracing::info!("endpoint set to {url}");

    Ok(())
}
