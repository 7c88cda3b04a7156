// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Positional application query
fn app_arg(multiple: bool) -> Arg {
    let arg = Arg::new("app")
        .required(true)
        .value_name("APP")
        .help("Application as [bucket/]name[@version]");
    if multiple {
        arg.num_args(1..)
    } else {
        arg
    }
}

fn build_cli() -> Command {
    Command::new("scoop-deps")
        .version(env!("CARGO_PKG_VERSION"))
        .author("scoop-deps Contributors")
        .about("Resolve installation order for Scoop manifests")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .global(true)
                .help("Configuration file"),
        )
        .arg(
            Arg::new("root")
                .short('r')
                .long("root")
                .value_name("PATH")
                .global(true)
                .help("Root directory holding buckets/ and apps/"),
        )
        .arg(
            Arg::new("arch")
                .short('a')
                .long("arch")
                .value_parser(["64bit", "32bit", "arm64"])
                .global(true)
                .help("Target architecture"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::SetTrue)
                .global(true)
                .help("Enable debug logging"),
        )
        .subcommand(
            Command::new("queue")
                .about("Print the installation queue for one or more applications")
                .arg(app_arg(true)),
        )
        .subcommand(
            Command::new("depends")
                .about("Print the direct dependencies of one application")
                .arg(app_arg(false)),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("scoop-deps.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
