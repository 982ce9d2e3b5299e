//! Command-line definition

use clap::{Arg, ArgAction, Command, value_parser};
use waltz_model::EntityLifecycleStatus;
use waltz_selector::Scope;

/// Build the `waltz-selector` command
#[must_use]
pub fn cli() -> Command {
    Command::new("waltz-selector")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Waltz scope rules and selection options")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("PATH")
                .help("TOML file with selector configuration"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON on stderr"),
        )
        .subcommand(
            Command::new("scope")
                .about("Show the default downward and upward scope for an entity kind")
                .arg(
                    Arg::new("kind")
                        .required(true)
                        .value_name("KIND")
                        .help("Entity kind, e.g. ORG_UNIT"),
                ),
        )
        .subcommand(selection_args(
            Command::new("options").about("Build canonical selection options and print them as JSON"),
        ))
        .subcommand(
            selection_args(
                Command::new("select")
                    .about("Run selection options against entities loaded from a JSON file"),
            )
            .arg(
                Arg::new("entities")
                    .long("entities")
                    .required(true)
                    .value_name("PATH")
                    .help("JSON array of catalogue entities"),
            )
            .arg(
                Arg::new("ids")
                    .long("ids")
                    .action(ArgAction::SetTrue)
                    .help("Print matching ids only"),
            ),
        )
}

fn selection_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("kind")
                .long("kind")
                .value_name("KIND")
                .conflicts_with("json")
                .requires("id")
                .help("Kind of the selected entity"),
        )
        .arg(
            Arg::new("id")
                .long("id")
                .value_name("ID")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64))
                .requires("kind")
                .help("Id of the selected entity"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .value_name("REFERENCE")
                .help("Entity reference as JSON; fields other than id and kind are ignored"),
        )
        .arg(
            Arg::new("scope")
                .long("scope")
                .value_name("SCOPE")
                .value_parser(|s: &str| s.parse::<Scope>())
                .help("EXACT, CHILDREN or PARENTS; defaults by kind"),
        )
        .arg(
            Arg::new("upward")
                .long("upward")
                .action(ArgAction::SetTrue)
                .conflicts_with("scope")
                .help("Use the kind's default upward scope"),
        )
        .arg(
            Arg::new("status")
                .long("status")
                .value_name("STATUS")
                .action(ArgAction::Append)
                .value_parser(|s: &str| s.parse::<EntityLifecycleStatus>())
                .help("Lifecycle status to include; repeatable"),
        )
        .arg(
            Arg::new("filter")
                .long("filter")
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Filter entry; VALUE is parsed as JSON, else taken as a string"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn kind_and_json_conflict() {
        let result = cli().try_get_matches_from([
            "waltz-selector",
            "options",
            "--kind",
            "APPLICATION",
            "--id",
            "1",
            "--json",
            "{}",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn statuses_and_filters_repeat() {
        let matches = cli()
            .try_get_matches_from([
                "waltz-selector",
                "options",
                "--kind",
                "ORG_UNIT",
                "--id",
                "7",
                "--status",
                "ACTIVE",
                "--status",
                "pending",
                "--filter",
                "region=EMEA",
                "--filter",
                "tier=1",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();

        assert_eq!(args.get_many::<EntityLifecycleStatus>("status").unwrap().count(), 2);
        assert_eq!(args.get_many::<String>("filter").unwrap().count(), 2);
    }

    #[test]
    fn rejects_unknown_scope() {
        let result = cli().try_get_matches_from([
            "waltz-selector",
            "options",
            "--kind",
            "ORG_UNIT",
            "--id",
            "7",
            "--scope",
            "SIBLINGS",
        ]);
        assert!(result.is_err());
    }
}
