use clap::{arg, value_parser, Arg, ArgAction, ArgMatches, Command};
use fedhub_core::{HostMessage, HostRequest, HostTag};

use crate::args::{optional_string, required_id, required_string, text_option};
use crate::context::Context;
use crate::table::print_table;

pub fn args() -> Command {
    Command::new("host")
        .about("manage hosts")
        .subcommand_required(true)
        .subcommand(
            Command::new("create")
                .about("create host")
                .arg(arg!(<NAME> "host name"))
                .arg(text_option("environment", 'e', "environment label"))
                .arg(text_option("url", 'u', "host url"))
                .arg(text_option("key", 'k', "host key"))
                .arg(text_option("description", 'd', "description"))
                .arg(
                    Arg::new("tag")
                        .short('t')
                        .long("tag")
                        .help("key=value tag to apply to host")
                        .action(ArgAction::Append),
                )
                .arg_required_else_help(true),
        )
        .subcommand(
            Command::new("delete")
                .about("delete host")
                .arg(arg!(<ID> "host id").value_parser(value_parser!(i64)))
                .arg_required_else_help(true),
        )
        .subcommand(
            Command::new("get")
                .about("show host")
                .arg(arg!(<ID> "host id").value_parser(value_parser!(i64)))
                .arg_required_else_help(true),
        )
        .subcommand(Command::new("list").about("list hosts"))
        .subcommand(
            Command::new("env")
                .about("list hosts in an environment")
                .arg(arg!(<ENVIRONMENT> "environment label"))
                .arg_required_else_help(true),
        )
        .subcommand(
            Command::new("remotes")
                .about("list remotes attached to host")
                .arg(arg!(<ID> "host id").value_parser(value_parser!(i64)))
                .arg_required_else_help(true),
        )
        .subcommand(
            Command::new("attach")
                .about("attach remote to host")
                .arg(arg!(<HOST_ID> "host id").value_parser(value_parser!(i64)))
                .arg(arg!(<REMOTE_ID> "remote id").value_parser(value_parser!(i64)))
                .arg_required_else_help(true),
        )
        .subcommand(
            Command::new("detach")
                .about("detach remote from host")
                .arg(arg!(<HOST_ID> "host id").value_parser(value_parser!(i64)))
                .arg(arg!(<REMOTE_ID> "remote id").value_parser(value_parser!(i64)))
                .arg_required_else_help(true),
        )
}

fn parse_tag(raw: &str) -> anyhow::Result<HostTag> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok(HostTag {
            key: key.trim().to_owned(),
            value: value.trim().to_owned(),
        }),
        _ => Err(anyhow::anyhow!("tag '{raw}' must be in key=value form")),
    }
}

fn print_hosts(hosts: Vec<HostMessage>) {
    let table_data: Vec<Vec<String>> = hosts
        .into_iter()
        .map(|host| {
            let tags: Vec<String> = host
                .tags
                .iter()
                .map(|tag| format!("{}={}", tag.key, tag.value))
                .collect();

            vec![
                host.id.to_string(),
                host.name,
                host.environment,
                host.url,
                tags.join(", "),
            ]
        })
        .collect();

    print_table(
        &["ID", "NAME", "ENVIRONMENT", "URL", "TAGS"],
        table_data,
        "no hosts found",
    );
}

pub async fn handlers(model_match: &ArgMatches, context: &Context) -> anyhow::Result<()> {
    let client = &context.client;

    match model_match.subcommand() {
        Some(("create", create_match)) => {
            let tags = create_match
                .get_many::<String>("tag")
                .into_iter()
                .flatten()
                .map(|raw| parse_tag(raw))
                .collect::<anyhow::Result<Vec<HostTag>>>()?;

            let request = HostRequest {
                name: required_string(create_match, "NAME")?,
                environment: optional_string(create_match, "environment"),
                url: optional_string(create_match, "url"),
                key: optional_string(create_match, "key"),
                description: optional_string(create_match, "description"),
                tags,
                ..HostRequest::default()
            };

            let host = client.create_host(&request).await?;

            tracing::info!("host '{}' created with id {}", host.name, host.id);

            Ok(())
        }
        Some(("delete", delete_match)) => {
            let id = required_id(delete_match, "ID")?;

            client.delete_host(id).await?;

            tracing::info!("host {id} deleted");

            Ok(())
        }
        Some(("get", get_match)) => {
            let host = client.host(required_id(get_match, "ID")?).await?;

            print_hosts(vec![host]);

            Ok(())
        }
        Some(("list", _)) => {
            print_hosts(client.hosts().await?);

            Ok(())
        }
        Some(("env", env_match)) => {
            let environment = required_string(env_match, "ENVIRONMENT")?;

            print_hosts(client.hosts_by_environment(&environment).await?);

            Ok(())
        }
        Some(("remotes", remotes_match)) => {
            let id = required_id(remotes_match, "ID")?;

            let table_data: Vec<Vec<String>> = client
                .host_remotes(id)
                .await?
                .into_iter()
                .map(|attached| {
                    vec![
                        attached.remote_id.to_string(),
                        attached.remote.name,
                        attached.remote.url,
                        attached.remote.active_version.unwrap_or_default(),
                        attached.created_date.to_rfc3339(),
                    ]
                })
                .collect();

            print_table(
                &["REMOTE ID", "NAME", "URL", "VERSION", "ATTACHED"],
                table_data,
                "no remotes attached",
            );

            Ok(())
        }
        Some(("attach", attach_match)) => {
            let host_id = required_id(attach_match, "HOST_ID")?;
            let remote_id = required_id(attach_match, "REMOTE_ID")?;

            client.attach_remote(host_id, remote_id).await?;

            tracing::info!("remote {remote_id} attached to host {host_id}");

            Ok(())
        }
        Some(("detach", detach_match)) => {
            let host_id = required_id(detach_match, "HOST_ID")?;
            let remote_id = required_id(detach_match, "REMOTE_ID")?;

            client.detach_remote(host_id, remote_id).await?;

            tracing::info!("remote {remote_id} detached from host {host_id}");

            Ok(())
        }
        _ => unreachable!(), // If all subcommands are defined above, anything else is unreachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag() {
        let tag = parse_tag("region = eastus2").unwrap();
        assert_eq!(tag.key, "region");
        assert_eq!(tag.value, "eastus2");

        assert!(parse_tag("region").is_err());
        assert!(parse_tag("=eastus2").is_err());
    }

    #[test]
    fn test_args_parse_ids() {
        let matches = args()
            .try_get_matches_from(["host", "attach", "4", "9"])
            .unwrap();

        let (_, attach_match) = matches.subcommand().unwrap();
        assert_eq!(required_id(attach_match, "HOST_ID").unwrap(), 4);
        assert_eq!(required_id(attach_match, "REMOTE_ID").unwrap(), 9);

        assert!(args()
            .try_get_matches_from(["host", "attach", "four", "9"])
            .is_err());
    }
}
