use std::process::ExitCode;

use anyhow::Result;
use claim_form_spec::{render_json, render_text};
use clap::Args;

use crate::cmd::{Context, i18n, load_engine};

#[derive(Args, Debug, Clone)]
pub struct FieldsArgs {
    /// Claim type id or code
    #[arg(value_name = "CLAIM_TYPE")]
    pub claim_type: String,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: FieldsArgs, ctx: &Context) -> Result<ExitCode> {
    let engine = load_engine(ctx, &args.claim_type).await?;

    if args.json {
        let view = render_json(engine.target(), engine.locale());
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(ExitCode::SUCCESS);
    }

    let title = engine
        .state()
        .current_claim_type()
        .unwrap_or(&args.claim_type)
        .to_string();
    println!(
        "{}",
        i18n::tr_with("cli.fields.header", &[("claim_type", title)])
    );
    println!("{}", render_text(engine.target(), engine.locale()));
    Ok(ExitCode::SUCCESS)
}
