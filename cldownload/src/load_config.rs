/// `load_config` module: turns flags, environment and an optional YAML file into one immutable [`RunConfig`].
///
/// # Sources, in order of precedence
/// 1. command-line flags
/// 2. environment variables (`CLASSEUR_USER_ID`, `CLASSEUR_API_KEY`, `CLASSEUR_HOST`),
///    including those loaded from a `.env` file
/// 3. the YAML file given with `--config`
/// 4. built-in defaults
///
/// Validation of IDs and the save destination happens here as well, so a
/// [`RunConfig`] always describes a runnable request.
use crate::api::{Credentials, DEFAULT_HOST};
use crate::cli::{Cli, Commands, ItemArgs, SaveArgs};
use crate::validate::{
    normalize_ids, validate_items, validate_save_target, SaveTarget, ValidationError,
};
use anyhow::Result;
use cldownload_core::config::{ContentMode, MaterializeOptions};
use cldownload_core::identity::IdentityMode;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub const ENV_USER_ID: &str = "CLASSEUR_USER_ID";
pub const ENV_API_KEY: &str = "CLASSEUR_API_KEY";
pub const ENV_HOST: &str = "CLASSEUR_HOST";

/// Contents of the optional YAML config file. Every key may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

/// A fully resolved and validated invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub credentials: Credentials,
    pub folders: Vec<String>,
    pub files: Vec<String>,
    pub mode: IdentityMode,
    pub verbose: bool,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    List,
    Save(SaveConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveConfig {
    pub target: SaveTarget,
    pub options: MaterializeOptions,
}

/// Loads the YAML config file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    match serde_yaml::from_str::<Option<FileConfig>>(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(conf.unwrap_or_default())
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

/// Merge all configuration sources for `cli` and validate the result.
pub fn resolve(cli: &Cli) -> Result<RunConfig> {
    let file = match &cli.global.config {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };

    let user_id = pick(cli.global.user_id.as_deref(), ENV_USER_ID, file.user_id.as_deref())
        .ok_or(ValidationError::MissingCredential {
            flag: "--user-id",
            env: ENV_USER_ID,
        })?;
    let api_key = pick(cli.global.api_key.as_deref(), ENV_API_KEY, file.api_key.as_deref())
        .ok_or(ValidationError::MissingCredential {
            flag: "--api-key",
            env: ENV_API_KEY,
        })?;
    let host = pick(cli.global.host.as_deref(), ENV_HOST, file.host.as_deref())
        .unwrap_or_else(|| DEFAULT_HOST.to_owned());

    let items = match &cli.command {
        Commands::List(items) => items,
        Commands::Save(save) => &save.items,
    };
    let (folders, files, mode) = resolve_items(items)?;

    let action = match &cli.command {
        Commands::List(_) => Action::List,
        Commands::Save(save) => Action::Save(resolve_save(save, &folders, &files, &file)?),
    };

    let config = RunConfig {
        credentials: Credentials {
            user_id,
            api_key,
            host,
        },
        folders,
        files,
        mode,
        verbose: cli.global.verbose,
        action,
    };
    info!(
        host = %config.credentials.host,
        folders = config.folders.len(),
        files = config.files.len(),
        mode = ?config.mode,
        "Configuration resolved"
    );
    Ok(config)
}

fn resolve_items(items: &ItemArgs) -> Result<(Vec<String>, Vec<String>, IdentityMode), ValidationError> {
    let folders = normalize_ids(&items.folders);
    let files = normalize_ids(&items.files);
    validate_items(&folders, &files)?;
    Ok((folders, files, IdentityMode::from_by_id(items.by_id)))
}

fn resolve_save(
    save: &SaveArgs,
    folders: &[String],
    files: &[String],
    file: &FileConfig,
) -> Result<SaveConfig, ValidationError> {
    if save.metadata && folders.is_empty() {
        return Err(ValidationError::MetadataWithoutFolders);
    }
    let target = validate_save_target(&save.save_path, folders, files, save.overwrite)?;
    let options = MaterializeOptions {
        content: ContentMode::from_markdown(save.markdown),
        overwrite: save.overwrite,
        folder_metadata: save.metadata,
        add_extension: true,
        max_concurrency: save
            .max_concurrency
            .map(|n| n.get())
            .or(file.max_concurrency.filter(|n| *n > 0)),
    };
    Ok(SaveConfig { target, options })
}

fn pick(flag: Option<&str>, env_key: &str, file: Option<&str>) -> Option<String> {
    let non_empty = |v: &str| !v.trim().is_empty();
    flag.filter(|v| non_empty(v))
        .map(str::to_owned)
        .or_else(|| std::env::var(env_key).ok().filter(|v| non_empty(v)))
        .or_else(|| file.filter(|v| non_empty(v)).map(str::to_owned))
}
