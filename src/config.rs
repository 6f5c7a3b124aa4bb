use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

const CONFIG_FILENAME: &str = "config.yaml";

/// Environment variable that overrides the workspace base directory
pub const WORKSPACE_ENV: &str = "CLAUDE_WORKSPACE_DIR";

const DEFAULT_REPO_LOCAL_DIR: &str = ".claude/workspace";
const DEFAULT_DETACHED_BRANCH: &str = "detached";

/// Raw configuration structure (as parsed from YAML)
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GitpadConfigRaw {
    /// Root for per-repository workspaces (default ~/.claude/workspace)
    workspace_root: Option<String>,
    /// In-repo directory that, when present, hosts the workspaces instead
    repo_local_dir: Option<String>,
    /// Directory name used when HEAD is detached
    detached_branch: Option<String>,
    /// Signing program for the readiness probe
    gpg_program: Option<String>,
    /// Documents appended verbatim to the injected context
    context_files: Option<Vec<String>>,
}

/// Process environment the hook cares about, captured once at startup
#[derive(Debug, Clone)]
pub struct Environment {
    pub home: PathBuf,
    pub xdg_config_home: Option<PathBuf>,
    pub workspace_override: Option<PathBuf>,
}

impl Environment {
    pub fn from_process() -> Self {
        // A relative home fails validation in load()
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        Self {
            home: PathBuf::from(home),
            xdg_config_home: non_empty("XDG_CONFIG_HOME").map(PathBuf::from),
            workspace_override: non_empty(WORKSPACE_ENV).map(PathBuf::from),
        }
    }

    /// $XDG_CONFIG_HOME/gitpad/config.yaml, falling back to ~/.config
    pub fn config_path(&self) -> PathBuf {
        self.xdg_config_home
            .clone()
            .unwrap_or_else(|| self.home.join(".config"))
            .join("gitpad")
            .join(CONFIG_FILENAME)
    }
}

/// Resolved settings (defaults applied, paths expanded)
#[derive(Debug, Clone)]
pub struct Settings {
    /// From the environment; relative values are resolved against the event cwd
    pub workspace_override: Option<PathBuf>,
    pub workspace_root: PathBuf,
    pub repo_local_dir: PathBuf,
    pub detached_branch: String,
    pub gpg_program: Option<String>,
    pub context_files: Vec<PathBuf>,
}

impl Settings {
    /// Settings with no config file present
    pub fn defaults(env: &Environment) -> Self {
        Self {
            workspace_override: env.workspace_override.clone(),
            workspace_root: env.home.join(".claude").join("workspace"),
            repo_local_dir: PathBuf::from(DEFAULT_REPO_LOCAL_DIR),
            detached_branch: DEFAULT_DETACHED_BRANCH.to_string(),
            gpg_program: None,
            context_files: Vec::new(),
        }
    }
}

/// Expand a leading `~/` against the home directory
fn expand_home(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None if path == "~" => home.to_path_buf(),
        None => PathBuf::from(path),
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Validates the resolved settings
fn validate(settings: &Settings, config_path: &Path) -> Result<()> {
    if !settings.workspace_root.is_absolute() {
        bail!(
            "Invalid config at {}: 'workspace_root' must be an absolute path, got {}",
            config_path.display(),
            settings.workspace_root.display()
        );
    }
    if settings.repo_local_dir.as_os_str().is_empty() || settings.repo_local_dir.is_absolute() {
        bail!(
            "Invalid config at {}: 'repo_local_dir' must be a relative path inside the repository",
            config_path.display()
        );
    }
    if !is_single_component(&settings.detached_branch) {
        bail!(
            "Invalid config at {}: 'detached_branch' must be a single non-empty directory name, got '{}'",
            config_path.display(),
            settings.detached_branch
        );
    }
    Ok(())
}

/// Loads and parses a gitpad config file on top of the defaults.
pub fn load_config(config_path: &Path, env: &Environment) -> Result<Settings> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

    let parsed: GitpadConfigRaw = if content.trim().is_empty() {
        GitpadConfigRaw::default()
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", config_path.display()))?
    };

    let mut settings = Settings::defaults(env);
    if let Some(root) = &parsed.workspace_root {
        settings.workspace_root = expand_home(root, &env.home);
    }
    if let Some(dir) = parsed.repo_local_dir {
        settings.repo_local_dir = PathBuf::from(dir);
    }
    if let Some(name) = parsed.detached_branch {
        settings.detached_branch = name;
    }
    settings.gpg_program = parsed.gpg_program.filter(|p| !p.is_empty());
    settings.context_files = parsed
        .context_files
        .unwrap_or_default()
        .iter()
        .map(|f| expand_home(f, &env.home))
        .collect();

    validate(&settings, config_path)?;
    Ok(settings)
}

/// Load settings from the user config file, or defaults if there is none.
pub fn load(env: &Environment) -> Result<Settings> {
    let config_path = env.config_path();
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        let settings = Settings::defaults(env);
        if !settings.workspace_root.is_absolute() {
            bail!(
                "Cannot determine default workspace root {}: set HOME or 'workspace_root' in {}",
                settings.workspace_root.display(),
                config_path.display()
            );
        }
        return Ok(settings);
    }
    load_config(&config_path, env)
}
