///
/// This module implements the CLI interface for cldownload: command parsing,
/// the async [`run`] entrypoint and dispatch to the core operations.
///
/// All tree, printing and download logic lives in the `cldownload-core` crate.
/// This module is glue: it parses arguments, resolves configuration (see
/// [`crate::load_config`]), builds the HTTP client and reports the outcome.
///
/// ## How To Use
/// - From a shell: `cldownload --help`.
/// - Programmatically: build a [`Cli`] and call [`run`], or call [`execute`]
///   with any [`ClasseurApi`] implementation.
use crate::api::ClasseurClient;
use crate::load_config::{resolve, Action, RunConfig};
use crate::validate::SaveTarget;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cldownload_core::contract::ClasseurApi;
use cldownload_core::download::{list_tree, save_single_file, save_tree};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// CLI for cldownload: list or download Classeur folders and files.
#[derive(Parser, Debug)]
#[clap(
    name = "cldownload",
    version,
    about = "List or download Classeur folders and files"
)]
pub struct Cli {
    #[clap(flatten)]
    pub global: GlobalArgs,
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// User ID token
    #[clap(short = 'u', long = "user-id", global = true)]
    pub user_id: Option<String>,
    /// API Key/Password Equivalent
    #[clap(short = 'k', long = "api-key", global = true)]
    pub api_key: Option<String>,
    /// Classeur host, e.g. app.classeur.io or http://localhost:8080
    #[clap(long, global = true)]
    pub host: Option<String>,
    /// YAML file with user_id, api_key, host and max_concurrency defaults
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    /// Log progress and report success
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the hierarchy of the given folders and files
    List(ItemArgs),
    /// Save the given folders and files to a local path
    Save(SaveArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct ItemArgs {
    /// Folder IDs (repeatable, space or comma separated)
    #[clap(short = 'd', long, num_args = 1.., value_delimiter = ',', value_name = "FOLDER_ID")]
    pub folders: Vec<String>,
    /// File IDs (repeatable, space or comma separated)
    #[clap(short = 'f', long, num_args = 1.., value_delimiter = ',', value_name = "FILE_ID")]
    pub files: Vec<String>,
    /// Name files and folders by ID instead of by name
    #[clap(long)]
    pub by_id: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SaveArgs {
    #[clap(flatten)]
    pub items: ItemArgs,
    /// Save file and folder contents to a filesystem path
    #[clap(short = 'p', long = "save-path", visible_alias = "destination")]
    pub save_path: PathBuf,
    /// Save markdown contents instead of full JSON metadata (like file and folder IDs)
    #[clap(short = 'm', long)]
    pub markdown: bool,
    /// Replace files that already exist
    #[clap(long)]
    pub overwrite: bool,
    /// Write a .folder_metadata.json file next to every saved folder
    #[clap(long)]
    pub metadata: bool,
    /// Maximum number of files fetched and written at once (default: unbounded)
    #[clap(long)]
    pub max_concurrency: Option<NonZeroUsize>,
}

/// Async CLI entrypoint used by main() and the integration tests.
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("run_started");

    let config = resolve(&cli)?;
    let client = ClasseurClient::new(&config.credentials)?;
    execute(&config, &client).await
}

/// Carry out a resolved invocation against `api`.
pub async fn execute<A>(config: &RunConfig, api: &A) -> Result<()>
where
    A: ClasseurApi + ?Sized,
{
    match &config.action {
        Action::List => {
            tracing::info!(command = "list", "Listing folders and files");
            let rendered = list_tree(api, &config.folders, &config.files, config.mode).await?;
            print!("{rendered}");
        }
        Action::Save(save) => match &save.target {
            SaveTarget::Directory(destination) => {
                tracing::info!(command = "save", destination = %destination.display(), "Saving tree");
                let report = save_tree(
                    api,
                    destination,
                    &config.folders,
                    &config.files,
                    config.mode,
                    save.options.clone(),
                )
                .await
                .map_err(|e| {
                    tracing::error!(command = "save", error = %e, "Save failed; partial results may exist on disk");
                    e
                })?;
                tracing::info!(
                    command = "save",
                    files = report.files.len(),
                    directories = report.directories.len(),
                    sidecars = report.sidecars.len(),
                    "Save complete"
                );
            }
            SaveTarget::SingleFile { path, file_id } => {
                tracing::info!(command = "save", path = %path.display(), file_id = %file_id, "Saving single file");
                save_single_file(api, file_id, path, save.options.content, save.options.overwrite)
                    .await?;
            }
        },
    }

    tracing::info!("Successfully completed!");
    if config.verbose {
        println!("Successfully completed!");
    }
    Ok(())
}
