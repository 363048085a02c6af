//! fnproxy - proxies on cloud functions
//!
//! Usage:
//!   fnproxy deploy http -p tencent -r ap-2
//!   fnproxy deploy socks -p alibaba,tencent -r '*' -a 203.0.113.7:1080
//!   fnproxy deploy reverse -p tencent -r ap-beijing -o https://example.com
//!   fnproxy list regions
//!   fnproxy list http

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fnproxy_core::commands::{DeployCommand, ListCommand, ProviderRegions, RecordRow};
use fnproxy_core::context::AppContext;
use fnproxy_core::deploy::{DeployReport, DeployRequest, TargetStatus};
use fnproxy_core::diagnostics::Severity;
use fnproxy_core::provider::ProviderCatalog;
use fnproxy_core::types::Module;

#[derive(Parser)]
#[command(name = "fnproxy")]
#[command(about = "Deploy HTTP, SOCKS and reverse proxies onto cloud functions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a proxy module to providers and regions
    Deploy(Box<DeployArgs>),

    /// List provider regions or deployed proxies
    #[command(alias = "ls")]
    List(ListArgs),
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModuleArg {
    Http,
    Socks,
    Reverse,
}

impl From<ModuleArg> for Module {
    fn from(arg: ModuleArg) -> Self {
        match arg {
            ModuleArg::Http => Module::Http,
            ModuleArg::Socks => Module::Socks,
            ModuleArg::Reverse => Module::Reverse,
        }
    }
}

#[derive(Args)]
struct PathArgs {
    /// Credential file (default: <config dir>/fnproxy/providers.toml)
    #[arg(short = 'c', long = "config")]
    credentials: Option<PathBuf>,

    /// Directory holding deployment records
    #[arg(long)]
    state_dir: Option<PathBuf>,
}

impl PathArgs {
    fn context(&self) -> Result<AppContext> {
        let mut ctx = AppContext::with_defaults()?;
        if let Some(path) = &self.credentials {
            ctx = ctx.with_credentials_path(path.clone());
        }
        if let Some(dir) = &self.state_dir {
            ctx = ctx.with_state_dir(dir.clone());
        }
        Ok(ctx)
    }
}

#[derive(Args)]
struct DeployArgs {
    /// Module to deploy
    module: ModuleArg,

    /// Providers to deploy to
    #[arg(short, long = "provider", value_delimiter = ',', required = true)]
    providers: Vec<String>,

    /// Region patterns: `*`, `ap-*`, `us-2` or an exact region name
    #[arg(short, long = "region", value_delimiter = ',', required = true)]
    regions: Vec<String>,

    /// [socks] Callback address, host:port
    #[arg(short = 'a', long)]
    addr: Option<String>,

    /// [socks] 8-byte verification key, or `random`
    #[arg(short = 'k', long, default_value = "random")]
    key: String,

    /// [socks] Authentication, username:password
    #[arg(long)]
    auth: Option<String>,

    /// [reverse] Origin URL to proxy to
    #[arg(short = 'o', long)]
    origin: Option<String>,

    /// [reverse] Source IPs allowed to reach the proxy
    #[arg(long = "ip", value_delimiter = ',')]
    ips: Vec<String>,

    /// Give up on a single target after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,

    #[command(flatten)]
    paths: PathArgs,
}

#[derive(Args)]
struct ListArgs {
    /// What to list: regions, http, socks or reverse
    kind: String,

    /// Only list regions of these providers
    #[arg(short, long = "provider", value_delimiter = ',')]
    providers: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,

    #[command(flatten)]
    paths: PathArgs,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fnproxy_core=info,fnproxy=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy(args) => run_deploy(*args),
        Commands::List(args) => run_list(args),
    }
}

fn run_deploy(args: DeployArgs) -> Result<()> {
    let module = Module::from(args.module);
    let mut request = DeployRequest::for_module(module)
        .with_providers(&args.providers)
        .with_regions(&args.regions);

    match module {
        Module::Http => {}
        Module::Socks => {
            request = request.with_key(&args.key);
            if let Some(addr) = &args.addr {
                request = request.with_addr(addr);
            }
            if let Some(auth) = &args.auth {
                request = request.with_auth(auth);
            }
        }
        Module::Reverse => {
            if let Some(origin) = &args.origin {
                request = request.with_origin(origin);
            }
            request = request.with_ips(&args.ips);
        }
    }
    if let Some(secs) = args.timeout {
        request = request.with_timeout(Duration::from_secs(secs));
    }

    let ctx = args.paths.context()?;
    tracing::debug!(
        "Deploying {} to {:?} in {:?}, records in {}",
        module,
        args.providers,
        args.regions,
        ctx.state_dir().display()
    );
    let cmd = DeployCommand::new(ctx, ProviderCatalog::default());
    let report = cmd.execute(&request)?;

    match args.format {
        OutputFormat::Table => print_deploy_table(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn print_deploy_table(report: &DeployReport) {
    let dispatch = &report.dispatch;
    if dispatch.outcomes.is_empty() {
        println!("No {} proxy deployed: no usable target.", report.module);
        for diagnostic in &report.diagnostics {
            if diagnostic.severity != Severity::Debug {
                println!("  ⚠ {}", diagnostic.message);
            }
        }
        return;
    }

    println!("{:<12} {:<20} Status", "Provider", "Region");
    println!("{}", "-".repeat(60));

    for outcome in &dispatch.outcomes {
        let status = match &outcome.status {
            TargetStatus::Deployed { resumed: false } => style("✓ deployed").green().to_string(),
            TargetStatus::Deployed { resumed: true } => {
                style("✓ trigger created").green().to_string()
            }
            TargetStatus::Skipped => style("• already deployed").dim().to_string(),
            TargetStatus::Unsupported => style("- unsupported").yellow().to_string(),
            TargetStatus::Failed { error } => format!("{} {}", style("✗").red(), error),
        };
        println!("{:<12} {:<20} {}", outcome.provider, outcome.region, status);
    }

    println!();
    println!(
        "Summary: {} deployed, {} skipped, {} failed, {} unsupported",
        dispatch.deployed(),
        dispatch.skipped(),
        dispatch.failed(),
        dispatch.unsupported()
    );
}

fn run_list(args: ListArgs) -> Result<()> {
    let ctx = args.paths.context()?;
    let cmd = ListCommand::new(ctx, ProviderCatalog::default());

    if args.kind.eq_ignore_ascii_case("regions") {
        let providers = cmd.regions(&args.providers)?;
        match args.format {
            OutputFormat::Table => print_regions_table(&providers),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&providers)?),
        }
        return Ok(());
    }

    let module: Module = args.kind.parse().map_err(|_| {
        anyhow::anyhow!(
            "Unknown list kind: {}. Use 'regions', 'http', 'socks', or 'reverse'",
            args.kind
        )
    })?;
    let rows = cmd.records(module)?;
    match args.format {
        OutputFormat::Table => print_records_table(module, &rows),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }

    Ok(())
}

fn print_regions_table(providers: &[ProviderRegions]) {
    for provider in providers {
        let backend = if provider.backend {
            String::new()
        } else {
            format!(" {}", style("(no backend)").dim())
        };
        println!("{}{}", style(&provider.provider).bold(), backend);
        for region in &provider.regions {
            println!("  {}", region);
        }
    }
}

fn print_records_table(module: Module, rows: &[RecordRow]) {
    if rows.is_empty() {
        println!("No {} proxy deployed.", module);
        return;
    }

    let detail = match module {
        Module::Http => "",
        Module::Socks => "Key",
        Module::Reverse => "Origin",
    };
    println!(
        "{:<12} {:<20} {:<50} {}",
        "Provider", "Region", "Endpoint", detail
    );
    println!("{}", "-".repeat(100));

    for row in rows {
        let endpoint = if row.live {
            row.endpoint.clone()
        } else {
            style("(trigger missing)").yellow().to_string()
        };
        println!(
            "{:<12} {:<20} {:<50} {}",
            row.provider, row.region, endpoint, row.detail
        );
    }
}
