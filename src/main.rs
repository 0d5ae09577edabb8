use anyhow::{Context, Result};
use git_diff_conditional::cli::commands::{ConditionsCommand, GenerateCommand, ValidateCommand};
use git_diff_conditional::cli::output::*;
use git_diff_conditional::cli::{Cli, Command};
use git_diff_conditional::core::check_identifiers;
use git_diff_conditional::{
    ConditionSet, Diagnostics, Generator, PipelineDocument, PipelineError, RuleConfig, RunOptions,
    PLUGIN_PREFIX,
};
use tracing::error;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.level())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let result = match &cli.command {
        Command::Generate(cmd) => generate(cmd).await,
        Command::Conditions(cmd) => show_conditions(cmd).await,
        Command::Validate(cmd) => validate_pipeline(cmd),
    };

    if let Err(e) = result {
        let code = e
            .downcast_ref::<PipelineError>()
            .map(PipelineError::exit_code)
            .unwrap_or(1);
        error!("{:#}", e);
        println!("{}{}", CROSS, style(format!("{:#}", e)).red());
        std::process::exit(code);
    }

    Ok(())
}

async fn generate(cmd: &GenerateCommand) -> Result<()> {
    let options = RunOptions {
        pipeline_path: cmd.dynamic_pipeline.clone(),
        disabled: cmd.disabled(),
        rules: RuleConfig::from_env(PLUGIN_PREFIX),
    };

    let generator = Generator::new(cmd.diff.source(), cmd.sink());
    let mut diagnostics = Diagnostics::new();
    let outcome = generator.run(&options, &mut diagnostics).await?;

    if !diagnostics.is_empty() {
        println!("{}", format_diagnostics(&diagnostics));
    }
    println!("{}", format_outcome(&outcome));

    Ok(())
}

async fn show_conditions(cmd: &ConditionsCommand) -> Result<()> {
    let rules = RuleConfig::from_env(PLUGIN_PREFIX);
    let diff = cmd.diff.source().changed_files().await?;

    let mut diagnostics = Diagnostics::new();
    let conditions = ConditionSet::build(&rules, &diff, &mut diagnostics);

    if cmd.json {
        let data = serde_json::json!({
            "diff": diff,
            "conditions": conditions,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    if conditions.is_empty() {
        println!("{}No conditions configured", INFO);
    } else {
        println!("{}Conditions for {} changed files:", INFO, style(diff.len()).cyan());
        println!("{}", format_conditions(&conditions));
    }
    if !diagnostics.is_empty() {
        println!("{}", format_diagnostics(&diagnostics));
    }

    Ok(())
}

fn validate_pipeline(cmd: &ValidateCommand) -> Result<()> {
    println!("{}Validating pipeline...", INFO);

    let pipeline = PipelineDocument::from_file(&cmd.dynamic_pipeline)?;
    let named = check_identifiers(&pipeline)?;

    println!("{}Pipeline is valid!", CHECK);
    println!("  Steps: {}", style(pipeline.steps.len()).cyan());
    println!("  Labelled steps: {}", style(named).cyan());

    Ok(())
}
