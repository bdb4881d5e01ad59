use clap::{Arg, ArgMatches};

/// An optional `--name <VALUE>` flag.
pub fn text_option(name: &'static str, short: char, help: &'static str) -> Arg {
    Arg::new(name).short(short).long(name).help(help)
}

pub fn required_id(matches: &ArgMatches, name: &str) -> anyhow::Result<i64> {
    matches
        .get_one::<i64>(name)
        .copied()
        .ok_or_else(|| anyhow::anyhow!("{name} expected"))
}

pub fn required_string(matches: &ArgMatches, name: &str) -> anyhow::Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("{name} expected"))
}

pub fn optional_string(matches: &ArgMatches, name: &str) -> String {
    matches.get_one::<String>(name).cloned().unwrap_or_default()
}
