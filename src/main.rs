// src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scoop_deps::helpers::{AnyProbe, AppsDirProbe, PathProbe};
use scoop_deps::{
    Architecture, BucketDirectory, Config, DependencyExtractor, DependencyResolver,
    InstallQueueBuilder, ManifestInformation, ManifestSource,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "scoop-deps")]
#[command(author, version, about = "Resolve installation order for Scoop manifests", long_about = None)]
struct Cli {
    /// Configuration file (default: <config dir>/scoop-deps/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Root directory holding buckets/ and apps/ (overrides config and $SCOOP)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Target architecture: 64bit, 32bit or arm64 (default: host)
    #[arg(short, long, global = true)]
    arch: Option<Architecture>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the installation queue for one or more applications
    Queue {
        /// Applications as [bucket/]name[@version]
        #[arg(required = true)]
        apps: Vec<String>,
    },
    /// Print the direct dependencies of one application
    Depends {
        /// Application as [bucket/]name[@version]
        app: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(root) = cli.root {
        config.root = Some(root);
    }
    let root = config.root_dir();
    let arch = cli.arch.unwrap_or_else(Architecture::host);
    info!("Using root {} ({})", root.display(), arch);

    let source = BucketDirectory::new(&root);
    let probe = AnyProbe::new(vec![Box::new(AppsDirProbe::new(&root)), Box::new(PathProbe)]);
    let extractor = DependencyExtractor::new(&config.helpers, &probe);

    match cli.command {
        Commands::Queue { apps } => {
            let resolver = DependencyResolver::new(&source, extractor);
            cmd_queue(&resolver, &apps, arch)
        }
        Commands::Depends { app } => cmd_depends(&source, &extractor, &app, arch),
    }
}

fn cmd_queue(resolver: &DependencyResolver<'_>, apps: &[String], arch: Architecture) -> Result<()> {
    let requested: Vec<ManifestInformation> =
        apps.iter().map(|app| resolver.source().lookup(app)).collect();
    let queue = InstallQueueBuilder::new(resolver).build(&requested, arch);

    for entry in &queue.entries {
        let version = entry.version.as_deref().unwrap_or("-");
        if entry.is_dependency {
            println!("{} {} [dependency]", entry.qualified_name(), version);
        } else {
            println!("{} {}", entry.qualified_name(), version);
        }
    }
    for note in &queue.notes {
        println!("note: {}", note);
    }
    for failure in &queue.failures {
        eprintln!("error: {}", failure);
    }

    if !queue.is_complete() {
        anyhow::bail!("{} of {} requests could not be resolved", queue.failures.len(), apps.len());
    }
    Ok(())
}

fn cmd_depends(
    source: &BucketDirectory,
    extractor: &DependencyExtractor<'_>,
    app: &str,
    arch: Architecture,
) -> Result<()> {
    let info = source.lookup(app);
    let Some(ref manifest) = info.manifest else {
        return Err(source.not_found_error(&info).into());
    };

    for dep in extractor.dependencies(manifest, arch) {
        println!("{}", dep);
    }
    Ok(())
}
