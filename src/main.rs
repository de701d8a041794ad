use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use vigil_core::{Verdict, VigilConfig};
use vigil_remedy::advisor::Advisory;
use vigil_remedy::llm::LlmClient;
use vigil_remedy::pipeline::RemediationOrchestrator;

#[derive(Parser)]
#[command(
    name = "vigil",
    version,
    about = "DevSecOps assistant for infrastructure-as-code",
    long_about = "Vigil scans Terraform with Checkov, asks an LLM for remediation advice,\n\
                   and can push a fix branch for review.\n\n\
                   Examples:\n  \
                     vigil scan                     Scan and suggest fixes for top findings\n  \
                     vigil check-format             Check Terraform formatting\n  \
                     vigil validate                 Validate the Terraform configuration\n  \
                     vigil create-remediation-pr    Push the fix branch and re-verify\n  \
                     vigil                          Start an interactive session"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .vigil.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Check Terraform formatting without rewriting files
    CheckFormat,
    /// Rewrite Terraform files in place with terraform fmt
    AutoFormat,
    /// Validate the Terraform configuration
    Validate,
    /// Run a Checkov scan and suggest fixes for the top findings
    #[command(long_about = "Run a Checkov scan and suggest fixes for the top findings.\n\n\
        Scans [scan] target_dir, parses the report artifact, and asks the\n\
        configured LLM for a remediation suggestion for each of the first\n\
        [scan] max_advisories findings, streaming each as it is produced.\n\n\
        Examples:\n  vigil scan\n  vigil scan --json")]
    Scan,
    /// Push the remediation branch and re-scan to verify resolution
    #[command(
        name = "create-remediation-pr",
        alias = "pr",
        long_about = "Push the remediation branch and re-scan to verify resolution.\n\n\
            Commits pending changes to the fix branch and pushes it, then re-runs\n\
            the scanner. A push failure is reported but never blocks the\n\
            reverification scan. The cycle ends resolved, unresolved, or\n\
            inconclusive."
    )]
    CreateRemediationPr,
    /// Create a default .vigil.toml configuration file
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

const DEFAULT_CONFIG: &str = r#"# Vigil Configuration

[llm]
# model = "gpt-4o"
# base_url = "https://api.openai.com"
# temperature = 0.7
# max_tokens = 1024

[scan]
# Directory containing the infrastructure code to scan
# target_dir = "src"
# report_path = "report.json"
# image = "bridgecrew/checkov:latest"
# Full scanner command override (skips the docker invocation)
# command = ["checkov", "-d", ".", "-o", "json"]
# max_advisories = 3

[push]
# repo_dir = "."
# branch = "fix/checkov-patch"
# remote = "origin"
# "{token}" is replaced with the GITHUB_TOKEN credential
# remote_url = "https://{token}@github.com/acme/infra.git"
# bot_name = "vigil-bot"
# bot_email = "bot@example.com"
"#;

fn load_config(cli: &Cli) -> Result<VigilConfig> {
    let mut config = match &cli.config {
        Some(path) => VigilConfig::from_file(path).into_diagnostic()?,
        None => {
            let default_path = std::path::Path::new(".vigil.toml");
            if default_path.exists() {
                VigilConfig::from_file(default_path).into_diagnostic()?
            } else {
                VigilConfig::default()
            }
        }
    };

    if config.llm.api_key.is_none() {
        config.llm.api_key = std::env::var("OPENAI_API_KEY").ok();
    }
    if config.push.token.is_none() {
        config.push.token = std::env::var("GITHUB_TOKEN").ok();
    }
    Ok(config)
}

fn require_llm_key(config: &VigilConfig) -> Result<()> {
    if config.llm.api_key.is_none() {
        return Err(miette::miette!(
            help = "Set OPENAI_API_KEY or add api_key under [llm] in .vigil.toml",
            "No API key configured for LLM provider '{}'",
            config.llm.provider
        ));
    }
    Ok(())
}

fn build_orchestrator(config: &VigilConfig) -> Result<RemediationOrchestrator<LlmClient>> {
    let client = LlmClient::new(&config.llm).into_diagnostic()?;
    Ok(RemediationOrchestrator::new(config, client))
}

fn print_advisory(advisory: &Advisory) {
    if advisory.failed() {
        println!(
            "\nAdvisory failed for {}: {}",
            advisory.check_id,
            advisory.text()
        );
    } else {
        println!("\nSuggestion for {}:\n{}", advisory.check_id, advisory.text());
    }
}

async fn run_scan(
    orch: &mut RemediationOrchestrator<LlmClient>,
    config: &VigilConfig,
    json: bool,
) -> Result<()> {
    let report = orch.scan().into_diagnostic()?;

    if json {
        let summary = orch.advise(&report, |_| {}).await;
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).into_diagnostic()?
        );
        return Ok(());
    }

    if report.is_clean() {
        println!("No failed checks found.");
        return Ok(());
    }

    let advised = report.findings.len().min(config.scan.max_advisories);
    println!(
        "Found {} issues. Suggesting fixes for top {advised}:",
        report.findings.len()
    );
    orch.advise(&report, print_advisory).await;
    Ok(())
}

async fn run_remediation_cycle(
    orch: &mut RemediationOrchestrator<LlmClient>,
    json: bool,
) -> Result<()> {
    if !json {
        println!("Pushing remediation branch...");
    }
    let result = orch.remediation_cycle().await.into_diagnostic()?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).into_diagnostic()?
        );
        return Ok(());
    }

    if result.push.success {
        println!("{}", result.push.message);
    } else {
        println!("Push failed: {}", result.push.message);
    }

    println!("Re-running scan to verify resolution...");
    match result.verdict {
        Verdict::Resolved => println!("All vulnerabilities resolved after push."),
        Verdict::Unresolved => println!(
            "Still found {} issues after push. Further review needed.",
            result.remaining
        ),
        Verdict::Inconclusive => {
            println!("Could not read the reverification report; resolution is inconclusive.");
        }
    }
    Ok(())
}

fn chat_spinner() -> Option<indicatif::ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_style(
        indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
    );
    pb.set_message("Thinking...");
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    Some(pb)
}

async fn run_session(
    orch: &mut RemediationOrchestrator<LlmClient>,
    config: &VigilConfig,
) -> Result<()> {
    println!("DevSecOps Assistant Ready");
    println!("Commands: check-format | auto-format | validate | scan | pr | exit");
    println!("Anything else is sent to the assistant as free-form chat.\n");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush().into_diagnostic()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).into_diagnostic()? == 0 {
            break; // EOF
        }
        let input = line.trim();

        match input {
            "" => continue,
            "exit" | "quit" => break,
            "check-format" => {
                match vigil_scan::terraform::check_fmt(&config.scan.target_dir) {
                    Ok(msg) => println!("{msg}"),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "auto-format" => {
                match vigil_scan::terraform::auto_fmt(&config.scan.target_dir) {
                    Ok(msg) => println!("{msg}"),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "validate" => match vigil_scan::terraform::validate(&config.scan.target_dir) {
                Ok(msg) => println!("{msg}"),
                Err(e) => println!("Error: {e}"),
            },
            "scan" => {
                // A failed cycle is not fatal to the session.
                if let Err(e) = run_scan(orch, config, false).await {
                    println!("Scan failed: {e}");
                }
            }
            "pr" | "create-remediation-pr" => {
                if let Err(e) = run_remediation_cycle(orch, false).await {
                    println!("Remediation cycle failed: {e}");
                }
            }
            text => {
                let spinner = chat_spinner();
                let reply = orch.chat(text).await;
                if let Some(pb) = spinner {
                    pb.finish_and_clear();
                }
                match reply {
                    Ok(reply) => println!("\n{reply}\n"),
                    Err(e) => println!("Advisory failed: {e}"),
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        None => {
            require_llm_key(&config)?;
            let mut orch = build_orchestrator(&config)?;
            run_session(&mut orch, &config).await?;
        }
        Some(Command::CheckFormat) => {
            println!(
                "{}",
                vigil_scan::terraform::check_fmt(&config.scan.target_dir).into_diagnostic()?
            );
        }
        Some(Command::AutoFormat) => {
            println!(
                "{}",
                vigil_scan::terraform::auto_fmt(&config.scan.target_dir).into_diagnostic()?
            );
        }
        Some(Command::Validate) => {
            println!(
                "{}",
                vigil_scan::terraform::validate(&config.scan.target_dir).into_diagnostic()?
            );
        }
        Some(Command::Scan) => {
            require_llm_key(&config)?;
            let mut orch = build_orchestrator(&config)?;
            run_scan(&mut orch, &config, cli.json).await?;
        }
        Some(Command::CreateRemediationPr) => {
            require_llm_key(&config)?;
            if config.push.token.is_none() && config.push.remote_url.is_some() {
                return Err(miette::miette!(
                    help = "Set GITHUB_TOKEN or add token under [push] in .vigil.toml",
                    "No credential configured for the remote push URL"
                ));
            }
            let mut orch = build_orchestrator(&config)?;
            run_remediation_cycle(&mut orch, cli.json).await?;
        }
        Some(Command::Init) => {
            let path = std::path::Path::new(".vigil.toml");
            if path.exists() {
                return Err(miette::miette!(
                    help = "Delete or move the existing file first",
                    ".vigil.toml already exists"
                ));
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .vigil.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "vigil", &mut std::io::stdout());
        }
    }

    Ok(())
}
