//! Build script rendering the `framesync(1)` manual page from the CLI
//! definition.

use std::{env, fs, path::PathBuf};

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli.rs"]
mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=build.rs");

    let root = env::var_os("CARGO_MANIFEST_DIR").map_or_else(PathBuf::new, PathBuf::from);
    let out_dir = root.join("target").join("generated-man");
    fs::create_dir_all(&out_dir)?;

    let version = env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let man = Man::new(cli::Cli::command())
        .section("1")
        .manual("framesync manual")
        .source(format!("framesync {version}"));

    let mut page = Vec::new();
    man.render(&mut page)?;
    fs::write(out_dir.join("framesync.1"), page)?;

    Ok(())
}
