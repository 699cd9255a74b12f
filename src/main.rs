use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use dist_publish::cli::{process_env, run_publish_workflow, PublishWorkflowArgs};
use dist_publish::config;
use dist_publish::git::{Git2Vcs, Vcs};
use dist_publish::registry::NpmRegistry;
use dist_publish::runner::ProcessRunner;
use dist_publish::ui;

#[derive(clap::Parser)]
#[command(
    name = "dist-publish",
    about = "Publish an npm package under a version and dist-tag derived from the CI branch or tag"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Path to package.json")]
    manifest: Option<String>,

    #[arg(short, long, help = "Branch being built (overrides environment and git)")]
    branch: Option<String>,

    #[arg(short, long, help = "Explicit release tag (overrides environment)")]
    tag: Option<String>,

    #[arg(long, help = "Show what would be published without changing anything")]
    dry_run: bool,

    #[arg(long, help = "Do not add the latest-/stable- marker dist-tag")]
    no_secondary_tag: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

impl From<Args> for PublishWorkflowArgs {
    fn from(args: Args) -> Self {
        PublishWorkflowArgs {
            config_path: args.config,
            manifest_path: args.manifest,
            branch: args.branch,
            tag: args.tag,
            dry_run: args.dry_run,
            skip_secondary_tag: args.no_secondary_tag,
        }
    }
}

fn main() {
    let args = Args::parse();

    if args.version {
        println!("dist-publish {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    init_tracing();

    if let Err(e) = run(args.into()) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Console logging controlled by RUST_LOG (default: info), written to stderr
fn init_tracing() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .init();
}

fn run(args: PublishWorkflowArgs) -> Result<()> {
    let config =
        config::load_config(args.config_path.as_deref()).context("Error loading config")?;

    let manifest = args.manifest(&config);
    let package_dir = manifest
        .path()
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let vcs = match Git2Vcs::open(&package_dir) {
        Ok(vcs) => Some(vcs),
        Err(e) => {
            debug!("no git repository at {}: {}", package_dir.display(), e);
            None
        }
    };

    let registry = NpmRegistry::new(ProcessRunner::in_dir(&package_dir))
        .with_command(config.registry.command.clone())
        .with_publish_args(config.registry.publish_args.clone());

    if args.dry_run {
        ui::display_status("Dry run: the registry and manifest will not be changed");
    }

    let result = run_publish_workflow(
        &args,
        &config,
        &registry,
        vcs.as_ref().map(|vcs| vcs as &dyn Vcs),
        process_env,
        Utc::now(),
    )?;

    for warning in &result.warnings {
        ui::display_warning(warning);
    }
    ui::display_summary(&result);

    Ok(())
}
