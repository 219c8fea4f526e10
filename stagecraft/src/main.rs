//! Stage, build, and collect artifacts for one import-path-keyed build job.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use stagecraft::{BuildWorkspace, ProcessRunner, Toolchain};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Workspace root directory.
    #[arg(short, long)]
    workspace: PathBuf,

    /// Import path the staged sources are keyed by.
    #[arg(short, long)]
    import_path: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy checked-out sources into the workspace
    Stage {
        /// Directory holding the sources to stage.
        #[arg(short, long)]
        source_dir: PathBuf,
    },
    /// Run the build tool inside the staged tree
    Build {
        /// Program to invoke.
        #[arg(long, default_value = "go")]
        tool: String,
        /// Directories probed for native library search paths.
        #[arg(long)]
        lib_root: Vec<PathBuf>,
    },
    /// Copy produced binaries into the install tree
    Collect {
        /// Install tree receiving a `bin` directory.
        #[arg(long)]
        install_dir: PathBuf,
    },
    /// Remove staged sources (and the package cache with --pkg)
    Clean {
        /// Also remove the package cache.
        #[arg(long)]
        pkg: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    let workspace = BuildWorkspace::new(args.workspace.clone(), args.import_path.clone());

    let result = match args.command {
        Command::Stage { source_dir } => workspace.stage(&source_dir),
        Command::Build { tool, lib_root } => {
            let toolchain = Toolchain {
                program: tool,
                ..Toolchain::default()
            };
            workspace.compile(&toolchain, &ProcessRunner, &lib_root)
        }
        Command::Collect { install_dir } => {
            workspace.collect_artifacts(&install_dir).map(|artifacts| {
                for path in artifacts.paths() {
                    println!("{}", path.display());
                }
            })
        }
        Command::Clean { pkg } => workspace.clean_stage().and_then(|()| {
            if pkg {
                workspace.clean_build()
            } else {
                Ok(())
            }
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
