// Copyright (c) 2026 openvpn-as-chart contributors
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use openvpn_as_chart::{
    chart::{chart_path, LoadedChart},
    constants::{DEFAULT_CHARTS_PATH, DEFAULT_CHART_DIR},
    helm::{HelmRunner, HelperRenderer},
    names::ResolvedNames,
    resources::{build_deployment, build_service_account},
    values::{load_values_file, values_from_set_expressions, ChartValues},
};
use serde_yaml::Value;
use std::path::PathBuf;
use tracing::{debug, info};

/// Name resolution, native rendering and helm helpers for the OpenVPN Access Server chart
#[derive(Debug, Parser)]
#[command(name = "openvpn-as-chart", version, about)]
struct Cli {
    /// Directory containing the charts
    #[arg(long, default_value = DEFAULT_CHARTS_PATH, global = true)]
    charts_dir: PathBuf,

    /// Chart directory name under the charts directory
    #[arg(long, default_value = DEFAULT_CHART_DIR, global = true)]
    chart: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the names and labels derived for a release
    Names {
        #[command(flatten)]
        release: ReleaseArgs,
    },
    /// Render the chart's Deployment and ServiceAccount natively
    Render {
        #[command(flatten)]
        release: ReleaseArgs,

        /// Namespace stamped on rendered resources
        #[arg(long, short = 'n')]
        namespace: Option<String>,
    },
    /// Render one of the chart's helper templates through helm
    Helper {
        /// Helper name without the chart prefix (e.g. "full-name")
        helper: String,

        #[command(flatten)]
        release: ReleaseArgs,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

#[derive(Debug, Args)]
struct ReleaseArgs {
    /// Release name
    #[arg(long, short = 'r', default_value = "release-name")]
    release: String,

    /// Values files, applied in order
    #[arg(long = "values", short = 'f')]
    values_files: Vec<PathBuf>,

    /// Values set on the command line (path.to.key=value), applied last
    #[arg(long = "set")]
    set: Vec<String>,
}

impl ReleaseArgs {
    /// User values layers: each `-f` file, then all `--set` expressions.
    fn layers(&self) -> Result<Vec<Value>> {
        let mut layers = self
            .values_files
            .iter()
            .map(PathBuf::as_path)
            .map(load_values_file)
            .collect::<Result<Vec<_>, _>>()?;
        if !self.set.is_empty() {
            layers.push(values_from_set_expressions(&self.set)?);
        }
        Ok(layers)
    }
}

fn init_logging() {
    // Logs go to stderr so stdout stays machine-readable YAML.
    //
    // Respects RUST_LOG environment variable if set, otherwise defaults to INFO level
    // Respects RUST_LOG_FORMAT environment variable for output format (json or text)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("openvpn-as-chart")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();
    debug!(?cli, "Parsed command line");

    match &cli.command {
        Command::Names { release } => {
            let (chart, values) = load_release(&cli, release)?;
            let names = ResolvedNames::resolve(&chart.release(&release.release), &values);
            print!("{}", serde_yaml::to_string(&names)?);
        }
        Command::Render { release, namespace } => {
            let (chart, values) = load_release(&cli, release)?;
            let mut ctx = chart.release(&release.release);
            ctx.namespace.clone_from(namespace);

            info!(release = %ctx.release_name, chart = %ctx.chart.name, "Rendering chart natively");
            let mut documents = vec![serde_yaml::to_string(&build_deployment(&ctx, &values))?];
            if let Some(service_account) = build_service_account(&ctx, &values) {
                documents.push(serde_yaml::to_string(&service_account)?);
            }
            for document in documents {
                print!("---\n{document}");
            }
        }
        Command::Helper { helper, release } => {
            let layers = release.layers()?;
            let runner = HelmRunner::new(&cli.charts_dir);
            anyhow::ensure!(
                runner.is_available().await,
                "helm is not available on PATH"
            );

            let renderer = HelperRenderer::new(&cli.chart, runner);
            let output = renderer
                .render(helper, &release.release, None, &layers)
                .await
                .with_context(|| format!("rendering helper '{helper}'"))?;
            println!("{output}");
        }
        Command::Completions { shell } => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "openvpn-as-chart",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

fn load_release(cli: &Cli, release: &ReleaseArgs) -> Result<(LoadedChart, ChartValues)> {
    let dir = chart_path(&cli.charts_dir, &cli.chart);
    let chart =
        LoadedChart::load(&dir).with_context(|| format!("loading chart {}", dir.display()))?;
    let values = chart.values(&release.layers()?)?;
    debug!(chart = %chart.metadata.name, "Loaded chart and values");
    Ok((chart, values))
}
