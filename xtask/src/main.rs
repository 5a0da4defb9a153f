use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LAMBDA_BIN: &str = "cert_lookup";
const ARTIFACT_NAME: &str = "cert_lookup.zip";

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the certificate lookup workspace",
    long_about = "A unified CLI for packaging the certificate lookup Lambda,\n\
                  running CI checks, and exercising the handler locally."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Run the handler once against a fabricated custom-resource event
    LocalInvoke {
        /// Domain name to look up
        #[arg(long, default_value = "gokanmalkoc.click")]
        domain_name: String,
        /// JSON inventory file used instead of ACM
        #[arg(long)]
        inventory_file: Option<String>,
        /// Print the callback body instead of sending it
        #[arg(long)]
        print_only: bool,
    },
    /// Build and package the Rust Lambda artifact for Terraform inputs
    ServerlessPackage {
        /// Compilation target triple for the Lambda binary
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build profile used for the binary
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting and clippy
    Check,
    /// Workspace tests
    Test,
    /// Run check + test
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    fn dir_name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    fn as_cargo_flag(self) -> Option<&'static str> {
        match self {
            Self::Debug => None,
            Self::Release => Some("--release"),
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn package_lookup_lambda(target: &str, profile: BuildProfile) {
    ensure_rust_target_installed(target);

    step("Build certificate lookup lambda binary");

    let mut cargo_args = vec![
        "build",
        "-p",
        "cert_lookup_lambda",
        "--target",
        target,
        "--bin",
        LAMBDA_BIN,
    ];
    if let Some(flag) = profile.as_cargo_flag() {
        cargo_args.push(flag);
    }
    run_cargo(&cargo_args);

    step("Package lambda zip with bootstrap entry");
    let profile_dir = profile.dir_name();
    let target_dir = Path::new("target").join(target).join(profile_dir);
    let dist_dir = Path::new("infra/cert_lookup/dist");
    fs::create_dir_all(dist_dir).expect("failed to create lambda dist directory");

    package_lambda_zip(&target_dir.join(LAMBDA_BIN), &dist_dir.join(ARTIFACT_NAME));

    eprintln!(
        "\nPackaged artifact:\n- {}",
        dist_dir.join(ARTIFACT_NAME).display()
    );
}

fn ensure_rust_target_installed(target: &str) {
    let listing = match Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output()
    {
        Ok(output) if output.status.success() => output.stdout,
        Ok(output) => {
            eprintln!(
                "warning: rustup could not list targets ({}); skipping {target} check",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return;
        }
        Err(error) => {
            eprintln!("warning: rustup unavailable ({error}); skipping {target} check");
            return;
        }
    };

    if !target_listed(&String::from_utf8_lossy(&listing), target) {
        eprintln!("missing rust target {target}; install it with `rustup target add {target}`");
        exit(1);
    }
}

fn target_listed(listing: &str, target: &str) -> bool {
    listing.lines().any(|line| line.trim() == target)
}

fn package_lambda_zip(binary_path: &Path, zip_path: &Path) {
    if !binary_path.exists() {
        panic!("expected lambda binary at '{}'", binary_path.display());
    }

    let binary = fs::read(binary_path).expect("failed to read lambda binary");
    let file = fs::File::create(zip_path).expect("failed to create lambda zip");
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options)
        .expect("failed to start bootstrap entry in lambda zip");
    zip.write_all(&binary)
        .expect("failed to write bootstrap entry");
    zip.finish().expect("failed to finish lambda zip");
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);
}

fn ci_test() {
    step("Test cert_lookup_core");
    run_cargo(&["test", "-p", "cert_lookup_core"]);

    step("Test cert_lookup_lambda");
    run_cargo(&["test", "-p", "cert_lookup_lambda"]);

    step("Test xtask");
    run_cargo(&["test", "-p", "xtask"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Test => ci_test(),
                CiJob::All => {
                    ci_check();
                    ci_test();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LocalInvoke {
            domain_name,
            inventory_file,
            print_only,
        } => {
            let mut args = vec![
                "run",
                "-p",
                "cert_lookup_lambda",
                "--bin",
                "local_invoke",
                "--",
                "--domain-name",
                &domain_name,
            ];
            if let Some(path) = inventory_file.as_deref() {
                args.extend(["--inventory-file", path]);
            }
            if print_only {
                args.push("--print-only");
            }
            run_cargo(&args);
        }
        Commands::ServerlessPackage { target, profile } => {
            package_lookup_lambda(&target, profile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_target_in_rustup_listing() {
        let listing = "aarch64-unknown-linux-gnu\nx86_64-unknown-linux-gnu\n";
        assert!(target_listed(listing, "x86_64-unknown-linux-gnu"));
        assert!(!target_listed(listing, "x86_64-unknown-linux-musl"));
        assert!(!target_listed("", "x86_64-unknown-linux-gnu"));
    }
}
