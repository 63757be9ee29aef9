//! # Site Builder CLI
//!
//! Command-line host for the site builder: browse the component palette and
//! manage stored projects.
//!
//! ## Usage
//!
//! ```bash
//! site-builder palette --filter head
//! site-builder project create --name Bakery --industry Food --design page.json
//! site-builder project list
//! ```
//!
//! ## With a hosted backend:
//!
//! ```bash
//! site-builder --api-url https://db.example.co --api-key KEY --token JWT project list
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `BuilderConfig` - Resolved backend, identity and logging settings
//! - `commands` - One async handler per subcommand

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default directory for the file backend.
pub const DEFAULT_DATA_DIR: &str = "./projects";

/// Default user id for local backends.
pub const DEFAULT_USER: &str = "local";

/// Command-line arguments for site-builder.
#[derive(Debug, Clone, Parser)]
#[command(name = "site-builder")]
#[command(about = "Visual site builder: palette and project tools")]
#[command(version)]
pub struct CliArgs {
    /// Hosted REST backend URL; selects the REST store when set
    #[arg(long, env = "SITE_BUILDER_API_URL", global = true)]
    pub api_url: Option<String>,

    /// API key sent with every REST request
    #[arg(long, env = "SITE_BUILDER_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Bearer token for the REST backend
    #[arg(long, env = "SITE_BUILDER_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Directory for the file backend
    #[arg(long, env = "SITE_BUILDER_DATA_DIR", global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// User id that owns projects
    #[arg(long, env = "SITE_BUILDER_USER", global = true, default_value = DEFAULT_USER)]
    pub user: String,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List palette blueprints
    Palette {
        /// Case-insensitive name or description filter
        #[arg(long)]
        filter: Option<String>,

        /// Print JSON instead of a grouped listing
        #[arg(long)]
        json: bool,
    },

    /// Manage stored projects
    #[command(subcommand)]
    Project(ProjectCommand),
}

/// Project subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ProjectCommand {
    /// Create a project
    Create {
        /// Display name
        #[arg(long)]
        name: String,
        /// Industry the site targets
        #[arg(long)]
        industry: String,
        #[allow(missing_docs)]
        #[command(flatten)]
        files: ContentFiles,
    },

    /// Update fields of a project
    Update {
        /// Project id
        #[arg(long)]
        id: uuid::Uuid,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New industry
        #[arg(long)]
        industry: Option<String>,
        #[allow(missing_docs)]
        #[command(flatten)]
        files: ContentFiles,
    },

    /// Print one project as JSON
    Show {
        /// Project id
        #[arg(long)]
        id: uuid::Uuid,
    },

    /// List projects, most recently updated first
    List,

    /// Delete a project
    Delete {
        /// Project id
        #[arg(long)]
        id: uuid::Uuid,
    },
}

/// Files holding a project's design and generated code.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ContentFiles {
    /// Design document (JSON)
    #[arg(long)]
    pub design: Option<PathBuf>,
    /// Generated stylesheet
    #[arg(long)]
    pub css: Option<PathBuf>,
    /// Generated markup
    #[arg(long)]
    pub html: Option<PathBuf>,
}

/// Where projects are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// One JSON file per project.
    File {
        /// Data directory.
        data_dir: PathBuf,
    },
    /// Hosted REST table.
    Rest {
        /// Service root URL.
        url: String,
        /// API key, if configured.
        api_key: Option<String>,
    },
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Selected backend.
    pub backend: Backend,
    /// User id that owns projects.
    pub user: String,
    /// Bearer token for hosted backends.
    pub token: Option<String>,
    /// Debug logging.
    pub verbose: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BuilderConfig {
    /// File backend in the default directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend: Backend::File {
                data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            },
            user: DEFAULT_USER.to_string(),
            token: None,
            verbose: false,
        }
    }

    /// Log filter directives for this configuration.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "site_builder=debug,builder_cli=debug,builder_core=debug,builder_persist=debug"
        } else {
            "site_builder=info,builder_cli=info,builder_core=info,builder_persist=info"
        }
    }
}

impl From<&CliArgs> for BuilderConfig {
    fn from(args: &CliArgs) -> Self {
        let backend = match args.api_url {
            Some(ref url) => Backend::Rest {
                url: url.clone(),
                api_key: args.api_key.clone(),
            },
            None => Backend::File {
                data_dir: args.data_dir.clone(),
            },
        };
        Self {
            backend,
            user: args.user.clone(),
            token: args.token.clone(),
            verbose: args.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).expect("valid arguments")
    }

    #[test]
    fn defaults_to_file_backend() {
        let args = parse(&["site-builder", "--data-dir", "/tmp/p", "project", "list"]);
        let config = BuilderConfig::from(&args);
        assert_eq!(
            config.backend,
            Backend::File {
                data_dir: PathBuf::from("/tmp/p")
            }
        );
        assert!(matches!(args.command, Command::Project(ProjectCommand::List)));
    }

    #[test]
    fn api_url_selects_rest_backend() {
        let args = parse(&[
            "site-builder",
            "--api-url",
            "https://db.example.co",
            "--api-key",
            "k",
            "--token",
            "t",
            "project",
            "list",
        ]);
        let config = BuilderConfig::from(&args);
        assert_eq!(
            config.backend,
            Backend::Rest {
                url: "https://db.example.co".into(),
                api_key: Some("k".into()),
            }
        );
        assert_eq!(config.token.as_deref(), Some("t"));
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let args = parse(&["site-builder", "palette", "--filter", "img", "--verbose"]);
        assert!(args.verbose);
        assert!(BuilderConfig::from(&args).log_filter().contains("debug"));
        match args.command {
            Command::Palette { filter, json } => {
                assert_eq!(filter.as_deref(), Some("img"));
                assert!(!json);
            }
            Command::Project(_) => panic!("expected palette"),
        }
    }

    #[test]
    fn update_requires_valid_uuid() {
        assert!(CliArgs::try_parse_from([
            "site-builder",
            "project",
            "update",
            "--id",
            "nope",
            "--name",
            "x"
        ])
        .is_err());
    }

    #[test]
    fn create_accepts_content_files() {
        let args = parse(&[
            "site-builder",
            "project",
            "create",
            "--name",
            "Bakery",
            "--industry",
            "Food",
            "--css",
            "site.css",
        ]);
        match args.command {
            Command::Project(ProjectCommand::Create { name, files, .. }) => {
                assert_eq!(name, "Bakery");
                assert_eq!(files.css, Some(PathBuf::from("site.css")));
                assert_eq!(files.design, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
