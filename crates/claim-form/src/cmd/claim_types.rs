use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::cmd::{Context, i18n};

#[derive(Args, Debug, Clone)]
pub struct ClaimTypesArgs {
    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ClaimTypesArgs, ctx: &Context) -> Result<ExitCode> {
    let claim_types = ctx.source.claim_types().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&claim_types)?);
        return Ok(ExitCode::SUCCESS);
    }
    if claim_types.is_empty() {
        println!("{}", i18n::tr_key("cli.claim_types.none"));
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", i18n::tr_key("cli.claim_types.header"));
    for claim_type in &claim_types {
        let code = claim_type.code.as_deref().unwrap_or("-");
        println!(
            " - [{}] {} ({})",
            claim_type.id,
            claim_type.display_name(ctx.locale),
            code
        );
    }
    Ok(ExitCode::SUCCESS)
}
