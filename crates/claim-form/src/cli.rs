use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Error, Result};
use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser, Subcommand};

use crate::cmd::{
    self, Context, SourceKind, check::CheckArgs, claim_types::ClaimTypesArgs, fields::FieldsArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "claim-form",
    about = "Render and check dynamic insurance claim forms",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Display locale (ar or en)
    #[arg(long = "locale", value_name = "LOCALE", global = true)]
    locale: Option<String>,

    /// Where field definitions come from
    #[arg(long = "source", value_enum, global = true)]
    source: Option<SourceKind>,

    /// Base URL of the claims server
    #[arg(long = "endpoint", value_name = "URL", global = true)]
    endpoint: Option<String>,

    /// Path to a TOML engine config
    #[arg(long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available claim types
    ClaimTypes(ClaimTypesArgs),
    /// Load and render the fields of a claim type
    Fields(FieldsArgs),
    /// Populate a claim form from a values file and validate it
    Check(CheckArgs),
}

pub async fn main() -> Result<ExitCode> {
    let argv: Vec<OsString> = std::env::args_os().collect();
    let cli_locale = cmd::i18n::cli_locale_from_argv(&argv);
    cmd::i18n::init(cli_locale.as_deref());

    let mut command = localize_help(Cli::command(), true);
    let matches = match command.try_get_matches_from_mut(argv) {
        Ok(matches) => matches,
        Err(err) => err.exit(),
    };
    let cli = Cli::from_arg_matches(&matches).map_err(|err| Error::msg(err.to_string()))?;

    let ctx = Context::build(
        cli.source,
        cli.endpoint.as_deref(),
        cli.config.as_deref(),
        cli.locale.as_deref(),
    )?;
    match cli.command {
        Commands::ClaimTypes(args) => cmd::claim_types::run(args, &ctx).await,
        Commands::Fields(args) => cmd::fields::run(args, &ctx).await,
        Commands::Check(args) => cmd::check::run(args, &ctx).await,
    }
}

fn localize_help(mut command: clap::Command, is_root: bool) -> clap::Command {
    if let Some(about) = command.get_about().map(|s| s.to_string()) {
        command = command.about(cmd::i18n::tr_lit(&about));
    }
    if let Some(long_about) = command.get_long_about().map(|s| s.to_string()) {
        command = command.long_about(cmd::i18n::tr_lit(&long_about));
    }

    command = command
        .disable_help_subcommand(true)
        .disable_help_flag(true)
        .arg(
            Arg::new("help")
                .short('h')
                .long("help")
                .action(ArgAction::Help)
                .help(cmd::i18n::tr_lit("Print help")),
        );
    if is_root {
        command = command.disable_version_flag(true).arg(
            Arg::new("version")
                .short('V')
                .long("version")
                .action(ArgAction::Version)
                .help(cmd::i18n::tr_lit("Print version")),
        );
    }

    let arg_ids = command
        .get_arguments()
        .map(|arg| arg.get_id().clone())
        .collect::<Vec<_>>();
    for arg_id in arg_ids {
        command = command.mut_arg(arg_id, |arg| {
            let mut arg = arg;
            if let Some(help) = arg.get_help().map(ToString::to_string) {
                arg = arg.help(cmd::i18n::tr_lit(&help));
            }
            arg
        });
    }

    let sub_names = command
        .get_subcommands()
        .map(|sub| sub.get_name().to_string())
        .collect::<Vec<_>>();
    for name in sub_names {
        command = command.mut_subcommand(name, |sub| localize_help(sub, false));
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fields_subcommand_with_globals() {
        let cli = Cli::try_parse_from([
            "claim-form",
            "--locale",
            "ar",
            "fields",
            "car",
            "--json",
            "--source",
            "builtin",
        ])
        .expect("expected CLI to parse");
        assert_eq!(cli.locale.as_deref(), Some("ar"));
        assert_eq!(cli.source, Some(SourceKind::Builtin));
        match cli.command {
            Commands::Fields(args) => {
                assert_eq!(args.claim_type, "car");
                assert!(args.json);
            }
            _ => panic!("expected fields args"),
        }
    }

    #[test]
    fn parses_check_subcommand() {
        let cli = Cli::try_parse_from([
            "claim-form",
            "--endpoint",
            "http://claims.local",
            "check",
            "7",
            "--values",
            "/tmp/values.json",
        ])
        .expect("expected CLI to parse");
        assert_eq!(cli.endpoint.as_deref(), Some("http://claims.local"));
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.claim_type, "7");
                assert_eq!(args.values, PathBuf::from("/tmp/values.json"));
                assert!(!args.json);
            }
            _ => panic!("expected check args"),
        }
    }

    #[test]
    fn check_requires_values_file() {
        assert!(Cli::try_parse_from(["claim-form", "check", "car"]).is_err());
    }

    #[test]
    fn localized_help_keeps_every_subcommand() {
        let command = localize_help(Cli::command(), true);
        let names = command
            .get_subcommands()
            .map(|sub| sub.get_name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, ["claim-types", "fields", "check"]);
    }
}
