use agent_bootstrap::{
    default_tool_specs, logging, resolve_config_targets, BootstrapError, ExecutionMode,
    HttpFetcher, Orchestrator, Report, RunContext, Settings, SystemProbe, SystemRunner,
};
use clap::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;

/// Install the agentic coding toolchain and write default configs.
#[derive(Parser, Debug)]
#[command(name = "agent-bootstrap", version)]
struct Cli {
    /// Fail instead of installing missing tools.
    #[arg(long)]
    no_install: bool,

    /// Do not write config files.
    #[arg(long)]
    no_config: bool,

    /// Log what would be done without changing anything.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => return fail(&BootstrapError::Usage(usage_message(&err))),
    };

    logging::init();

    match run(&cli).await {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => fail(&err),
    }
}

async fn run(cli: &Cli) -> Result<Report, BootstrapError> {
    let mode = ExecutionMode::from_flags(cli.no_install, cli.no_config, cli.dry_run);
    let ctx = RunContext::from_process().ok_or(BootstrapError::NoHome)?;
    let settings = Settings::from_context(&ctx)?;

    let tools = default_tool_specs(&settings, &ctx);
    let targets = if mode.write_config_allowed {
        resolve_config_targets(&settings, &ctx)?
    } else {
        Vec::new()
    };

    if mode.dry_run {
        tracing::info!("dry run: nothing will be installed or written");
    }

    let probe = SystemProbe::new(ctx.clone());
    let runner = SystemRunner;
    let fetcher = HttpFetcher::new();
    let orchestrator = Orchestrator::new(&ctx, mode, &probe, &runner, &fetcher);
    let report = orchestrator.run(&tools, &targets).await?;
    Ok(report)
}

fn fail(err: &BootstrapError) -> ExitCode {
    eprintln!("ERROR: {err}");
    tracing::debug!("fix: {}", err.fix_suggestion());
    if matches!(err, BootstrapError::Usage(_)) {
        eprintln!("Try 'agent-bootstrap --help' for more information.");
    }
    ExitCode::from(err.exit_code())
}

/// First line of a clap error without its `error: ` prefix.
fn usage_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let line = rendered.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}
