//! Staging and driving an external build toolchain
//!
//! This crate manages the workspace layout that module-path-rooted
//! toolchains expect: sources staged under `<root>/src/<import-path>`,
//! compiled binaries left in the staged tree's `bin` directory, and a
//! package cache under `<root>/pkg`. A build job moves through
//! stage → compile → collect, with separate cleanup for staged sources and
//! the package cache.
//!
//! Everything here is synchronous and assumes exclusive ownership of the
//! workspace directory for the duration of an operation; callers running
//! concurrent jobs use one workspace per job. There is no cancellation: a
//! hung build tool blocks [`BuildWorkspace::compile`] until it exits.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use walkdir::WalkDir;

/// An error from staging, building, collecting or cleaning.
///
/// All variants are fatal for the build job that produced them and nothing
/// is retried. A failed stage can leave a partial tree behind; the caller
/// runs [`BuildWorkspace::clean_stage`] before trying again.
#[derive(Debug, Error)]
pub enum OrchestrateError {
    /// Copying sources into the workspace failed.
    #[error("failed to stage {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The build tool could not be started at all.
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
    /// The build tool exited non-zero; the code is kept for diagnostics.
    #[error("build failed with exit code {0}")]
    BuildFailed(i32),
    /// The build tool was killed before it could exit.
    #[error("build terminated by a signal")]
    BuildTerminated,
    /// The build produced no `bin` directory to collect from.
    #[error("artifact collection failed: no bin directory at {0}")]
    MissingArtifacts(PathBuf),
    /// Copying a produced binary into the install tree failed.
    #[error("failed to collect artifact {path}: {source}")]
    ArtifactCollection {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Removing a workspace tree failed.
    #[error("failed to clean {path}: {source}")]
    Clean {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The external build tool and the environment contract it expects.
#[derive(Debug, Clone)]
pub struct Toolchain {
    /// Program to invoke.
    pub program: String,
    /// Arguments for the build-and-install invocation.
    pub build_args: Vec<String>,
    /// Environment variable pointed at the workspace root.
    pub workspace_var: String,
    /// Environment variable carrying linker search directories.
    pub ldflags_var: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Toolchain {
            program: "go".into(),
            build_args: vec!["run".into(), "build.go".into(), "install".into()],
            workspace_var: "GOPATH".into(),
            ldflags_var: "CGO_LDFLAGS".into(),
        }
    }
}

/// A fully resolved external command: what to run, where, and with which
/// additional environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: Vec<(String, String)>,
}

/// How an external command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The process exited on its own with this code.
    Exited(i32),
    /// The process was killed by a signal before exiting.
    Signaled,
}

/// Runs external commands on behalf of the orchestrator.
///
/// The trait is the seam that lets tests substitute a recording fake for
/// the real [`ProcessRunner`]. Implementations block until the child
/// process exits.
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<ExitStatus>;
}

/// Spawns the command as a child process, inheriting stdio.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<ExitStatus> {
        let status = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .envs(spec.env.iter().map(|(key, value)| (key, value)))
            .status()?;
        Ok(match status.code() {
            Some(code) => ExitStatus::Exited(code),
            None => ExitStatus::Signaled,
        })
    }
}

/// Binaries copied into the install tree, in collection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallArtifactSet(Vec<PathBuf>);

impl InstallArtifactSet {
    /// The installed paths, in the order they were copied.
    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A compiler workspace keyed by import path.
///
/// The workspace root is owned exclusively by one build job at a time.
#[derive(Debug, Clone)]
pub struct BuildWorkspace {
    root: PathBuf,
    import_path: String,
}

impl BuildWorkspace {
    pub fn new(root: impl Into<PathBuf>, import_path: impl Into<String>) -> Self {
        BuildWorkspace {
            root: root.into(),
            import_path: import_path.into(),
        }
    }

    /// The workspace root the toolchain is pointed at.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The import path the staged sources are keyed by.
    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    /// `<root>/src`, the tree removed by [`Self::clean_stage`].
    pub fn source_root(&self) -> PathBuf {
        self.root.join("src")
    }

    /// `<root>/src/<import-path>`, where sources are staged.
    pub fn src_tree(&self) -> PathBuf {
        self.import_path
            .split('/')
            .fold(self.source_root(), |path, segment| path.join(segment))
    }

    /// `<root>/pkg`, the cache removed by [`Self::clean_build`].
    pub fn pkg_tree(&self) -> PathBuf {
        self.root.join("pkg")
    }

    /// Where the toolchain leaves compiled binaries.
    pub fn bin_dir(&self) -> PathBuf {
        self.src_tree().join("bin")
    }

    /// Copy `source_dir`'s full tree into the import-path-keyed location.
    ///
    /// Re-staging over an existing tree is fine and yields the same result;
    /// a stale symlink left at the target by an earlier linking scheme is
    /// removed first. On failure no rollback is attempted and the partial
    /// tree is left for [`Self::clean_stage`].
    pub fn stage(&self, source_dir: &Path) -> Result<(), OrchestrateError> {
        let target = self.src_tree();
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| stage_err(parent, e))?;
        }
        match fs::symlink_metadata(&target) {
            Ok(meta) if meta.file_type().is_symlink() => {
                log::debug!("removing stale staging link {}", target.display());
                fs::remove_file(&target).map_err(|e| stage_err(&target, e))?;
            }
            _ => {}
        }
        copy_tree(source_dir, &target)
    }

    /// Run the build tool inside the staged tree.
    ///
    /// `lib_roots` are directories (typically the install and stage trees)
    /// probed for native library directories; any found are appended to the
    /// toolchain's linker-flags variable. The invocation blocks until the
    /// tool exits; a non-zero exit is surfaced as
    /// [`OrchestrateError::BuildFailed`] and never retried.
    pub fn compile(
        &self,
        toolchain: &Toolchain,
        runner: &dyn CommandRunner,
        lib_roots: &[PathBuf],
    ) -> Result<(), OrchestrateError> {
        let spec = self.command_spec(toolchain, lib_roots);
        log::info!(
            "running `{} {}` in {}",
            spec.program,
            spec.args.join(" "),
            spec.cwd.display(),
        );
        match runner.run(&spec) {
            Ok(ExitStatus::Exited(0)) => Ok(()),
            Ok(ExitStatus::Exited(code)) => Err(OrchestrateError::BuildFailed(code)),
            Ok(ExitStatus::Signaled) => Err(OrchestrateError::BuildTerminated),
            Err(source) => Err(OrchestrateError::Launch {
                program: spec.program,
                source,
            }),
        }
    }

    /// The exact invocation [`Self::compile`] hands to its runner.
    pub fn command_spec(&self, toolchain: &Toolchain, lib_roots: &[PathBuf]) -> CommandSpec {
        let mut env = vec![(
            toolchain.workspace_var.clone(),
            self.root.display().to_string(),
        )];
        let lib_dirs = library_search_paths(lib_roots);
        if !lib_dirs.is_empty() {
            let existing = std::env::var(&toolchain.ldflags_var).ok();
            env.push((
                toolchain.ldflags_var.clone(),
                append_ldflags(existing.as_deref(), &lib_dirs),
            ));
        }
        CommandSpec {
            program: toolchain.program.clone(),
            args: toolchain.build_args.clone(),
            cwd: self.src_tree(),
            env,
        }
    }

    /// Copy every file directly under the produced `bin` directory into
    /// `install_dir/bin`, preserving permissions.
    ///
    /// A missing `bin` directory is a build-configuration bug and fatal,
    /// even right after a zero exit code. Later files with the same name
    /// overwrite earlier ones.
    pub fn collect_artifacts(
        &self,
        install_dir: &Path,
    ) -> Result<InstallArtifactSet, OrchestrateError> {
        let bin = self.bin_dir();
        if !bin.is_dir() {
            return Err(OrchestrateError::MissingArtifacts(bin));
        }
        let dest_dir = install_dir.join("bin");
        fs::create_dir_all(&dest_dir).map_err(|e| collect_err(&dest_dir, e))?;

        let mut produced = Vec::new();
        for entry in fs::read_dir(&bin).map_err(|e| collect_err(&bin, e))? {
            let entry = entry.map_err(|e| collect_err(&bin, e))?;
            let path = entry.path();
            if path.is_file() {
                produced.push(path);
            }
        }
        produced.sort();

        let mut installed = Vec::with_capacity(produced.len());
        for path in produced {
            let Some(file_name) = path.file_name() else {
                continue;
            };
            let dest = dest_dir.join(file_name);
            fs::copy(&path, &dest).map_err(|e| collect_err(&path, e))?;
            installed.push(dest);
        }
        Ok(InstallArtifactSet(installed))
    }

    /// Remove the staged source tree. A missing tree is a no-op.
    pub fn clean_stage(&self) -> Result<(), OrchestrateError> {
        remove_tree(&self.source_root())
    }

    /// Remove the package cache, leaving staged sources alone. A missing
    /// cache is a no-op.
    pub fn clean_build(&self) -> Result<(), OrchestrateError> {
        remove_tree(&self.pkg_tree())
    }
}

/// Library directories that exist under the given roots, in root order.
pub fn library_search_paths(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for root in roots {
        for sub in ["lib", "usr/lib"] {
            let dir = root.join(sub);
            if dir.is_dir() {
                dirs.push(dir);
            }
        }
    }
    dirs
}

fn append_ldflags(existing: Option<&str>, dirs: &[PathBuf]) -> String {
    let mut flags = existing.unwrap_or_default().to_owned();
    for dir in dirs {
        if !flags.is_empty() {
            flags.push(' ');
        }
        flags.push_str("-L");
        flags.push_str(&dir.display().to_string());
    }
    flags
}

fn copy_tree(from: &Path, to: &Path) -> Result<(), OrchestrateError> {
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(from).to_owned();
            OrchestrateError::Stage {
                path,
                source: e.into(),
            }
        })?;
        let rel = entry
            .path()
            .strip_prefix(from)
            .expect("walkdir entries stay under their root");
        let dest = to.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|e| stage_err(&dest, e))?;
        } else {
            fs::copy(entry.path(), &dest).map_err(|e| stage_err(entry.path(), e))?;
        }
    }
    Ok(())
}

fn remove_tree(path: &Path) -> Result<(), OrchestrateError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(OrchestrateError::Clean {
            path: path.to_owned(),
            source: e,
        }),
    }
}

fn stage_err(path: &Path, source: io::Error) -> OrchestrateError {
    OrchestrateError::Stage {
        path: path.to_owned(),
        source,
    }
}

fn collect_err(path: &Path, source: io::Error) -> OrchestrateError {
    OrchestrateError::ArtifactCollection {
        path: path.to_owned(),
        source,
    }
}
