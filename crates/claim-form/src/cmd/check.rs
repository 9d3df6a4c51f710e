use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Result, anyhow};
use claim_form_spec::{FieldError, FormData, render_text};
use clap::Args;
use serde_json::json;

use crate::cmd::{Context, i18n, load_engine};
use crate::engine::Submission;

/// Exit status when validation blocks the submission.
pub const BLOCKED_EXIT: u8 = 2;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Claim type id or code
    #[arg(value_name = "CLAIM_TYPE")]
    pub claim_type: String,

    /// JSON file mapping field names to values
    #[arg(long, value_name = "FILE")]
    pub values: PathBuf,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: CheckArgs, ctx: &Context) -> Result<ExitCode> {
    let data = read_values(&args.values).await?;
    let mut engine = load_engine(ctx, &args.claim_type).await?;
    engine.set_form_data(&data);
    let submission = engine.submit();

    if args.json {
        let report = match &submission {
            Submission::Proceed(payload) => json!({
                "valid": true,
                "errors": [],
                "data": engine.form_data().non_empty(),
                "payload": payload.to_urlencoded(),
            }),
            Submission::Blocked(errors) => json!({
                "valid": false,
                "errors": errors,
                "data": engine.form_data().non_empty(),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &submission {
            Submission::Proceed(_) => println!("{}", i18n::tr_key("cli.check.valid")),
            Submission::Blocked(errors) => print_blocked(errors),
        }
        println!("{}", render_text(engine.target(), engine.locale()));
    }

    Ok(match submission {
        Submission::Proceed(_) => ExitCode::SUCCESS,
        Submission::Blocked(_) => ExitCode::from(BLOCKED_EXIT),
    })
}

async fn read_values(path: &Path) -> Result<FormData> {
    let describe = |error: String| {
        anyhow!(i18n::tr_with(
            "cli.error.values",
            &[("path", path.display().to_string()), ("error", error)],
        ))
    };
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| describe(err.to_string()))?;
    serde_json::from_str(&raw).map_err(|err| describe(err.to_string()))
}

fn print_blocked(errors: &[FieldError]) {
    println!(
        "{}",
        i18n::tr_with("cli.check.blocked", &[("count", errors.len().to_string())])
    );
    for error in errors {
        println!(" - {}: {}", error.field_name, error.message);
    }
}
