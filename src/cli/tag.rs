use clap::{arg, value_parser, ArgMatches, Command};
use fedhub_core::TagRequest;

use crate::args::{required_id, required_string};
use crate::context::Context;
use crate::table::print_table;

pub fn args() -> Command {
    Command::new("tag")
        .about("manage tags")
        .subcommand_required(true)
        .subcommand(
            Command::new("create")
                .about("create tag")
                .arg(arg!(<TEXT> "tag text"))
                .arg_required_else_help(true),
        )
        .subcommand(
            Command::new("delete")
                .about("delete tag")
                .arg(arg!(<ID> "tag id").value_parser(value_parser!(i64)))
                .arg_required_else_help(true),
        )
        .subcommand(Command::new("list").about("list tags"))
        .subcommand(
            Command::new("attach")
                .about("attach tag to remote")
                .arg(arg!(<REMOTE_ID> "remote id").value_parser(value_parser!(i64)))
                .arg(arg!(<TAG_ID> "tag id").value_parser(value_parser!(i64)))
                .arg_required_else_help(true),
        )
        .subcommand(
            Command::new("detach")
                .about("detach tag from remote")
                .arg(arg!(<REMOTE_ID> "remote id").value_parser(value_parser!(i64)))
                .arg(arg!(<TAG_ID> "tag id").value_parser(value_parser!(i64)))
                .arg_required_else_help(true),
        )
}

pub async fn handlers(model_match: &ArgMatches, context: &Context) -> anyhow::Result<()> {
    let client = &context.client;

    match model_match.subcommand() {
        Some(("create", create_match)) => {
            let request = TagRequest {
                text: required_string(create_match, "TEXT")?,
            };

            let tag = client.create_tag(&request).await?;

            tracing::info!("tag '{}' created with id {}", tag.text, tag.id);

            Ok(())
        }
        Some(("delete", delete_match)) => {
            let id = required_id(delete_match, "ID")?;

            client.delete_tag(id).await?;

            tracing::info!("tag {id} deleted");

            Ok(())
        }
        Some(("list", _)) => {
            let table_data = client
                .tags()
                .await?
                .into_iter()
                .map(|tag| vec![tag.id.to_string(), tag.text])
                .collect();

            print_table(&["ID", "TEXT"], table_data, "no tags found");

            Ok(())
        }
        Some(("attach", attach_match)) => {
            let remote_id = required_id(attach_match, "REMOTE_ID")?;
            let tag_id = required_id(attach_match, "TAG_ID")?;

            client.attach_tag(remote_id, tag_id).await?;

            tracing::info!("tag {tag_id} attached to remote {remote_id}");

            Ok(())
        }
        Some(("detach", detach_match)) => {
            let remote_id = required_id(detach_match, "REMOTE_ID")?;
            let tag_id = required_id(detach_match, "TAG_ID")?;

            client.detach_tag(remote_id, tag_id).await?;

            tracing::info!("tag {tag_id} detached from remote {remote_id}");

            Ok(())
        }
        _ => unreachable!(), // If all subcommands are defined above, anything else is unreachable
    }
}
