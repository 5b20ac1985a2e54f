//! RaffleWheel Build Tasks
//!
//! Usage:
//!   cargo xtask wasm            - Build the browser bundle into web/pkg
//!   cargo xtask test            - Run all tests
//!   cargo xtask docs            - Generate documentation
//!   cargo xtask check           - Clippy and formatting
//!   cargo xtask dist            - Release bundle plus static page in target/dist
//!   cargo xtask sim -- <args>   - Run the headless simulator

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

const WASM_CRATE: &str = "crates/rw-wasm";

#[derive(Parser)]
#[command(name = "xtask", about = "RaffleWheel build tasks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the browser bundle with wasm-pack
    Wasm {
        /// Build in release mode
        #[arg(short, long)]
        release: bool,
    },
    /// Run all tests
    Test {
        /// Run only the wheel engine tests
        #[arg(long)]
        wheel: bool,
    },
    /// Generate documentation
    Docs {
        /// Open in browser
        #[arg(short, long)]
        open: bool,
    },
    /// Check code quality
    Check,
    /// Release bundle and page, ready to serve
    Dist,
    /// Run rw-sim with the given arguments
    Sim {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let project_root = project_root()?;

    match cli.command {
        Commands::Wasm { release } => build_wasm(&project_root, release),
        Commands::Test { wheel } => run_tests(&project_root, wheel),
        Commands::Docs { open } => generate_docs(&project_root, open),
        Commands::Check => check_quality(&project_root),
        Commands::Dist => build_dist(&project_root),
        Commands::Sim { args } => run_sim(&project_root, &args),
    }
}

fn project_root() -> Result<PathBuf> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR")
        .context("CARGO_MANIFEST_DIR not set")?;

    Ok(Path::new(&manifest_dir)
        .parent()
        .context("Failed to get parent directory")?
        .to_path_buf())
}

fn build_wasm(root: &Path, release: bool) -> Result<()> {
    println!("📦 Building RaffleWheel wasm bundle...\n");

    let out_dir = root.join("web").join("pkg");
    let out_dir = out_dir.to_string_lossy();
    let mut args = vec!["build", WASM_CRATE, "--target", "web", "--out-dir", &*out_dir];
    args.push(if release { "--release" } else { "--dev" });

    let status = Command::new("wasm-pack")
        .current_dir(root)
        .args(&args)
        .status()
        .context("Failed to run wasm-pack (is it installed?)")?;

    if !status.success() {
        bail!("wasm build failed");
    }

    println!("\n✅ Bundle written to web/pkg");
    Ok(())
}

/// Run `cargo <args>` at the workspace root, failing with `what` on a non-zero exit
fn cargo(root: &Path, args: &[&str], what: &str) -> Result<()> {
    let status = Command::new("cargo")
        .current_dir(root)
        .args(args)
        .status()
        .with_context(|| format!("Failed to launch cargo for {}", what))?;

    if !status.success() {
        bail!("{} failed ({})", what, status);
    }
    Ok(())
}

fn run_tests(root: &Path, wheel_only: bool) -> Result<()> {
    println!("🎡 Testing RaffleWheel...\n");

    let scope: &[&str] = if wheel_only {
        &["--package", "rw-wheel"]
    } else {
        &["--workspace"]
    };
    cargo(root, &[&["test"][..], scope].concat(), "tests")?;

    println!("\n✅ Tests green");
    Ok(())
}

fn generate_docs(root: &Path, open: bool) -> Result<()> {
    let mut args = vec!["doc", "--workspace", "--no-deps"];
    if open {
        args.push("--open");
    }
    cargo(root, &args, "rustdoc")?;

    println!("\n✅ Docs in target/doc");
    Ok(())
}

fn check_quality(root: &Path) -> Result<()> {
    cargo(root, &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"], "clippy")?;

    // Formatting drift is reported, not fatal
    if let Err(e) = cargo(root, &["fmt", "--all", "--check"], "rustfmt") {
        println!("⚠️  {}: run 'cargo fmt'", e);
    }

    println!("\n✅ Lints clean");
    Ok(())
}

fn build_dist(root: &Path) -> Result<()> {
    build_wasm(root, true)?;

    println!("\n🚀 Assembling dist...\n");
    let dist = root.join("target").join("dist");
    if dist.exists() {
        fs::remove_dir_all(&dist).context("Failed to clear target/dist")?;
    }
    copy_dir_all(&root.join("web"), &dist)?;

    println!("✅ Static site ready in {}", dist.display());
    Ok(())
}

fn run_sim(root: &Path, args: &[String]) -> Result<()> {
    let mut full = vec!["run", "--quiet", "--package", "rw-sim", "--"];
    full.extend(args.iter().map(String::as_str));
    cargo(root, &full, "rw-sim")
}

fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        if ty.is_dir() {
            copy_dir_all(&entry.path(), &dst.join(entry.file_name()))?;
        } else {
            fs::copy(entry.path(), dst.join(entry.file_name()))?;
        }
    }
    Ok(())
}
