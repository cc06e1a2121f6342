use clap::{Parser, Subcommand, ValueEnum};
use hostgate_core::{Context, HostStateSnapshot, HostgateError};
use hostgate_scheduler::{parse_label, HostDecision, HostFilter, LabelFilter, LabelFilterConfig};
use std::path::Path;
use tracing::info;

#[derive(Parser)]
#[command(name = "hostgate", about = "Label constraint host filter")]
struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "pretty", env = "HOSTGATE_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter hosts of a state snapshot against a request context
    Filter {
        /// Host state snapshot (.json, .yaml or .yml)
        #[arg(long, env = "HOSTGATE_STATE")]
        state: String,
        /// Request context (.json, .yaml or .yml)
        #[arg(long, env = "HOSTGATE_CONTEXT")]
        context: String,
        /// Candidate host, repeatable; defaults to every host in the snapshot
        #[arg(long = "host")]
        hosts: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        output: OutputFormat,
        /// Print every host with the constraints it failed
        #[arg(long)]
        explain: bool,
        /// Stop evaluating a host at its first failing constraint
        #[arg(long)]
        short_circuit: bool,
    },
    /// Show how a require-any label value is parsed
    Parse {
        /// Raw label value, e.g. "zone=us-east,gpu"
        value: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_format);

    match cli.command {
        Commands::Filter {
            state,
            context,
            hosts,
            output,
            explain,
            short_circuit,
        } => {
            let config = LabelFilterConfig {
                evaluate_all_constraints: !short_circuit,
            };
            let rendered = run_filter(&state, &context, hosts, config, output, explain)?;
            println!("{}", rendered);
            Ok(())
        }
        Commands::Parse { value } => {
            println!("{}", run_parse(&value));
            Ok(())
        }
    }
}

/// Initialize tracing, writing to stderr so stdout only carries results
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Load state and context, filter, and render the result
fn run_filter(
    state_path: &str,
    context_path: &str,
    hosts: Vec<String>,
    config: LabelFilterConfig,
    output: OutputFormat,
    explain: bool,
) -> miette::Result<String> {
    if hosts.iter().any(|h| h.trim().is_empty()) {
        return Err(HostgateError::invalid_argument(
            "empty host name given to --host",
            "Pass a host name, or omit --host to use every host in the snapshot",
        )
        .into());
    }

    let state: HostStateSnapshot = hostgate_core::load_file(Path::new(state_path))?;
    let context: Context = hostgate_core::load_file(Path::new(context_path))?;

    let hosts = if hosts.is_empty() {
        state.host_names()
    } else {
        hosts
    };

    info!(
        "Loaded {} hosts from {}, {} context entries from {}",
        state.len(),
        state_path,
        context.len(),
        context_path
    );

    let filter = LabelFilter::new(config);

    if explain {
        let decisions = filter.evaluate(&context, &hosts, &state);
        return render_decisions(&decisions, output);
    }

    let qualified = filter.filter(&[], &context, &hosts, &state);
    match output {
        OutputFormat::Text => Ok(qualified.join("\n")),
        OutputFormat::Json => Ok(hostgate_core::to_json_pretty(&qualified)?),
        OutputFormat::Yaml => Ok(hostgate_core::to_yaml(&qualified)?),
    }
}

fn render_decisions(decisions: &[HostDecision], output: OutputFormat) -> miette::Result<String> {
    match output {
        OutputFormat::Json => return Ok(hostgate_core::to_json_pretty(&decisions)?),
        OutputFormat::Yaml => return Ok(hostgate_core::to_yaml(&decisions)?),
        OutputFormat::Text => {}
    }

    let lines: Vec<String> = decisions
        .iter()
        .map(|d| {
            if d.qualified {
                format!("{}\tqualified", d.host)
            } else {
                let failures: Vec<String> = d
                    .failures
                    .iter()
                    .map(|f| format!("{}: {}", f.constraint, f.reason))
                    .collect();
                format!("{}\trejected\t{}", d.host, failures.join("; "))
            }
        })
        .collect();

    Ok(lines.join("\n"))
}

fn run_parse(value: &str) -> String {
    let parsed = parse_label(value);

    let mut lines: Vec<String> = parsed
        .iter()
        .map(|(k, v)| {
            if v.is_empty() {
                format!("{}\t(any value)", k)
            } else {
                format!("{}\t= {}", k, v)
            }
        })
        .collect();
    lines.push(format!("dropped tokens: {}", parsed.dropped()));

    lines.join("\n")
}
