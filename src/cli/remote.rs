use clap::{arg, value_parser, Arg, ArgAction, ArgMatches, Command};
use fedhub_core::{ModuleRequest, RemoteMessage, RemoteRequest};
use std::collections::BTreeMap;

use crate::args::{optional_string, required_id, required_string, text_option};
use crate::context::Context;
use crate::table::print_table;

pub fn args() -> Command {
    Command::new("remote")
        .about("manage remotes")
        .subcommand_required(true)
        .subcommand(
            Command::new("create")
                .about("create remote")
                .arg(arg!(<NAME> "remote name"))
                .arg(text_option("url", 'u', "remote entry url"))
                .arg(text_option("scope", 's', "federation scope"))
                .arg(text_option("version", 'v', "active version"))
                .arg(
                    Arg::new("parent")
                        .short('p')
                        .long("parent")
                        .help("parent remote id")
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("module")
                        .short('m')
                        .long("module")
                        .help("exposed module name")
                        .action(ArgAction::Append),
                )
                .arg_required_else_help(true),
        )
        .subcommand(
            Command::new("delete")
                .about("delete remote")
                .arg(arg!(<ID> "remote id").value_parser(value_parser!(i64)))
                .arg_required_else_help(true),
        )
        .subcommand(
            Command::new("get")
                .about("show remote")
                .arg(arg!(<ID> "remote id").value_parser(value_parser!(i64)))
                .arg_required_else_help(true),
        )
        .subcommand(Command::new("list").about("list remotes"))
        .subcommand(Command::new("counts").about("module and sub-remote counts per remote"))
}

fn print_remotes(remotes: Vec<RemoteMessage>) {
    let table_data: Vec<Vec<String>> = remotes
        .into_iter()
        .map(|remote| {
            let modules: Vec<String> = remote.modules.into_iter().map(|m| m.name).collect();

            vec![
                remote.id.to_string(),
                remote.name,
                remote.active_version.unwrap_or_default(),
                remote
                    .parent_remote_id
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
                modules.join(", "),
            ]
        })
        .collect();

    print_table(
        &["ID", "NAME", "VERSION", "PARENT", "MODULES"],
        table_data,
        "no remotes found",
    );
}

pub async fn handlers(model_match: &ArgMatches, context: &Context) -> anyhow::Result<()> {
    let client = &context.client;

    match model_match.subcommand() {
        Some(("create", create_match)) => {
            let modules = create_match
                .get_many::<String>("module")
                .into_iter()
                .flatten()
                .map(|name| ModuleRequest { name: name.clone() })
                .collect();

            let request = RemoteRequest {
                name: required_string(create_match, "NAME")?,
                url: optional_string(create_match, "url"),
                scope: optional_string(create_match, "scope"),
                active_version: create_match.get_one::<String>("version").cloned(),
                parent_remote_id: create_match.get_one::<i64>("parent").copied(),
                modules,
                ..RemoteRequest::default()
            };

            let remote = client.create_remote(&request).await?;

            tracing::info!("remote '{}' created with id {}", remote.name, remote.id);

            Ok(())
        }
        Some(("delete", delete_match)) => {
            let id = required_id(delete_match, "ID")?;

            client.delete_remote(id).await?;

            tracing::info!("remote {id} deleted");

            Ok(())
        }
        Some(("get", get_match)) => {
            let remote = client.remote(required_id(get_match, "ID")?).await?;

            print_remotes(vec![remote]);

            Ok(())
        }
        Some(("list", _)) => {
            print_remotes(client.remotes().await?);

            Ok(())
        }
        Some(("counts", _)) => {
            let mut counts: BTreeMap<i64, (i64, i64)> = BTreeMap::new();

            for count in client.remote_module_counts().await? {
                counts.entry(count.remote_id).or_default().0 = count.count;
            }

            for count in client.remote_sub_remote_counts().await? {
                counts.entry(count.remote_id).or_default().1 = count.count;
            }

            let table_data = counts
                .into_iter()
                .map(|(remote_id, (modules, sub_remotes))| {
                    vec![
                        remote_id.to_string(),
                        modules.to_string(),
                        sub_remotes.to_string(),
                    ]
                })
                .collect();

            print_table(
                &["REMOTE ID", "MODULES", "SUB-REMOTES"],
                table_data,
                "no remotes found",
            );

            Ok(())
        }
        _ => unreachable!(), // If all subcommands are defined above, anything else is unreachable
    }
}
