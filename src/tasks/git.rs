// src/tasks/git.rs

//! `git-sync` and `sources-sync`: clone or fast-forward remote repositories.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::config::StepOptions;
use crate::engine::{ExecutionContext, HostEnv};
use crate::errors::{Result, SitepipeError};
use crate::exec::{ProcessSpec, run_process};
use crate::tasks::{TIMEOUT_SECONDS, TaskInput, TaskOutput, user_env};

pub const REPOSITORY: &[&str] = &["repository", "repo", "url"];
pub const PATH: &[&str] = &["path", "destination", "dir"];
pub const BRANCH: &[&str] = &["branch", "ref"];
pub const DEPTH: &[&str] = &["depth"];
pub const TOKEN_ENV: &[&str] = &["tokenEnv", "tokenEnvVar"];
pub const GIT_PATH: &[&str] = &["gitPath", "git"];
pub const SOURCES: &[&str] = &["sources", "repositories"];
pub const ROOT: &[&str] = &["root", "sourcesRoot"];

/// One repository to keep in sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSource {
    pub url: String,
    pub dest: PathBuf,
    pub branch: Option<String>,
    pub depth: Option<u32>,
}

impl GitSource {
    fn from_options(options: &StepOptions, root: &Path) -> Result<Self> {
        let url = options.require_string(REPOSITORY)?;
        let dest = match options.get_path(PATH)? {
            Some(p) if p.is_absolute() => p,
            Some(p) => root.join(p),
            None => root.join(repo_dir_name(&url)),
        };
        Ok(Self {
            url,
            dest,
            branch: options.get_string(BRANCH)?,
            depth: options.get(DEPTH)?.filter(|d: &u32| *d > 0),
        })
    }
}

/// Last path segment of a repository URL without `.git`.
pub fn repo_dir_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
    last.trim_end_matches(".git").to_string()
}

/// Settings shared by every repository of one step.
#[derive(Debug, Clone)]
struct GitSettings {
    git: String,
    timeout_secs: i64,
    env: BTreeMap<String, String>,
}

impl GitSettings {
    fn from_options(options: &StepOptions, host: &HostEnv) -> Result<Self> {
        let mut env = user_env(options, &[])?;
        env.insert("GIT_TERMINAL_PROMPT".to_string(), "0".to_string());

        if let Some(var) = options.get_string(TOKEN_ENV)? {
            match host.get(&var) {
                Some(token) => {
                    // Passed as config through the environment so it never
                    // shows up in argv or logs.
                    env.insert("GIT_CONFIG_COUNT".to_string(), "1".to_string());
                    env.insert("GIT_CONFIG_KEY_0".to_string(), "http.extraHeader".to_string());
                    env.insert(
                        "GIT_CONFIG_VALUE_0".to_string(),
                        format!("Authorization: Bearer {token}"),
                    );
                }
                None => warn!(token_env = %var, "token variable is not set; syncing anonymously"),
            }
        }

        Ok(Self {
            git: options
                .get_string(GIT_PATH)?
                .unwrap_or_else(|| "git".to_string()),
            timeout_secs: options.get_or(TIMEOUT_SECONDS, 0)?,
            env,
        })
    }

    async fn git(&self, cwd: &Path, args: Vec<String>) -> Result<()> {
        let mut spec = ProcessSpec::new(&self.git, cwd)
            .args(args)
            .timeout_secs(self.timeout_secs);
        spec.env = self.env.clone();
        let command_line = spec.display_command();
        run_process(&spec).await?.into_success(&command_line)?;
        Ok(())
    }
}

/// What happened to one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Cloned,
    Updated,
}

async fn sync_repo(source: &GitSource, settings: &GitSettings) -> Result<SyncAction> {
    if source.dest.join(".git").exists() {
        debug!(dest = %source.dest.display(), "repository present; fetching");
        let mut fetch = vec!["fetch".to_string(), "--prune".to_string(), "origin".to_string()];
        if let Some(depth) = source.depth {
            fetch.push(format!("--depth={depth}"));
        }
        settings.git(&source.dest, fetch).await?;

        if let Some(branch) = &source.branch {
            settings
                .git(&source.dest, vec!["checkout".to_string(), branch.clone()])
                .await?;
            settings
                .git(
                    &source.dest,
                    vec![
                        "reset".to_string(),
                        "--hard".to_string(),
                        format!("origin/{branch}"),
                    ],
                )
                .await?;
        } else {
            settings
                .git(&source.dest, vec!["pull".to_string(), "--ff-only".to_string()])
                .await?;
        }
        return Ok(SyncAction::Updated);
    }

    if source.dest.exists() && !is_empty_dir(&source.dest)? {
        return Err(SitepipeError::Precondition(format!(
            "destination exists and is not a git repository: {}",
            source.dest.display()
        )));
    }
    let parent = source
        .dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&parent)
        .with_context(|| format!("creating {}", parent.display()))?;

    let mut clone = vec!["clone".to_string()];
    if let Some(depth) = source.depth {
        clone.push(format!("--depth={depth}"));
    }
    if let Some(branch) = &source.branch {
        clone.extend(["--branch".to_string(), branch.clone()]);
    }
    clone.push(source.url.clone());
    clone.push(source.dest.to_string_lossy().into_owned());
    settings.git(&parent, clone).await?;
    Ok(SyncAction::Cloned)
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    Ok(std::fs::read_dir(path)?.next().is_none())
}

/// `git-sync`: a single repository described by the step options.
pub async fn run_single(input: &TaskInput<'_>, ctx: &ExecutionContext) -> Result<TaskOutput> {
    let settings = GitSettings::from_options(input.options, input.env)?;
    let source = GitSource::from_options(input.options, &ctx.base_dir)?;

    let action = sync_repo(&source, &settings).await?;
    info!(url = %source.url, dest = %source.dest.display(), ?action, "repository synced");

    let verb = match action {
        SyncAction::Cloned => "cloned",
        SyncAction::Updated => "updated",
    };
    Ok(TaskOutput::message(format!(
        "{} {verb} into {}",
        source.url,
        source.dest.display()
    )))
}

/// `sources-sync`: every entry of the `sources` list, in order. Entries
/// inherit the step's `tokenEnv`, `gitPath`, `timeoutSeconds` and `env`.
pub async fn run_sources(input: &TaskInput<'_>, ctx: &ExecutionContext) -> Result<TaskOutput> {
    let options = input.options;
    let root = match options.get_path(ROOT)? {
        Some(p) => ctx.resolve(p),
        None => ctx.base_dir.clone(),
    };
    let entries = options.require::<Vec<serde_json::Map<String, serde_json::Value>>>(SOURCES)?;
    let settings = GitSettings::from_options(options, input.env)?;

    let mut cloned = 0usize;
    let mut updated = 0usize;
    for (i, entry) in entries.into_iter().enumerate() {
        let entry = StepOptions::from(entry);
        let source = GitSource::from_options(&entry, &root)
            .map_err(|e| match e {
                SitepipeError::ConfigError(msg) => {
                    SitepipeError::config(format!("sources[{i}]: {msg}"))
                }
                other => other,
            })?;
        match sync_repo(&source, &settings).await? {
            SyncAction::Cloned => cloned += 1,
            SyncAction::Updated => updated += 1,
        }
        info!(index = i, url = %source.url, dest = %source.dest.display(), "source synced");
    }

    Ok(TaskOutput::message(format!(
        "{} sources synced ({cloned} cloned, {updated} updated)",
        cloned + updated
    )))
}
