//! Subcommand handlers.
//!
//! Handlers write their output to a caller-supplied writer; logs go through
//! `tracing`.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use builder_core::{DesignDocument, Palette};
use builder_persist::{
    FileProjectStore, NewProject, ProjectPatch, ProjectRecord, ProjectStore, RestProjectStore,
    Session,
};

use crate::{Backend, BuilderConfig, Command, ContentFiles, ProjectCommand};

/// Run one subcommand.
///
/// # Errors
///
/// Returns an error if the backend cannot be opened, an input file is
/// unreadable, or the store rejects the request.
pub async fn run(config: &BuilderConfig, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::Palette { filter, json } => palette(filter.as_deref().unwrap_or(""), json, out),
        Command::Project(project) => {
            let store = open_store(config).await?;
            let session = session_for(config);
            run_project(store.as_ref(), &session, project, out).await
        }
    }
}

/// Print palette blueprints matching `query`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn palette(query: &str, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let palette = Palette::standard();
    if json {
        serde_json::to_writer_pretty(&mut *out, &palette.filter(query))?;
        writeln!(out)?;
        return Ok(());
    }

    let groups = palette.grouped(query);
    if groups.is_empty() {
        writeln!(out, "No components match \"{query}\"")?;
        return Ok(());
    }
    for (category, blueprints) in groups {
        writeln!(out, "{}", category.label())?;
        for blueprint in blueprints {
            writeln!(
                out,
                "  {:<10} {:<12} {}",
                blueprint.kind.as_str(),
                blueprint.display_name,
                blueprint.description
            )?;
        }
    }
    Ok(())
}

/// Open the configured project store.
///
/// # Errors
///
/// Returns an error if the data directory cannot be opened, the REST URL is
/// invalid, or the REST backend has no API key.
pub async fn open_store(config: &BuilderConfig) -> anyhow::Result<Box<dyn ProjectStore>> {
    match config.backend {
        Backend::File { ref data_dir } => {
            tracing::debug!("Using file backend at {}", data_dir.display());
            let store = FileProjectStore::open(data_dir)
                .await
                .with_context(|| format!("failed to open data directory {}", data_dir.display()))?;
            Ok(Box::new(store))
        }
        Backend::Rest {
            ref url,
            ref api_key,
        } => {
            let api_key = api_key
                .as_deref()
                .context("--api-key is required with --api-url")?;
            tracing::debug!("Using REST backend at {url}");
            let store = RestProjectStore::new(url, api_key)?;
            Ok(Box::new(store))
        }
    }
}

fn session_for(config: &BuilderConfig) -> Session {
    let session = Session::new(config.user.clone());
    match config.token {
        Some(ref token) => session.with_access_token(token.clone()),
        None => session,
    }
}

/// Run a project subcommand against `store`.
///
/// # Errors
///
/// Returns an error if an input file is unreadable or the store rejects the
/// request.
pub async fn run_project(
    store: &dyn ProjectStore,
    session: &Session,
    command: ProjectCommand,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        ProjectCommand::Create {
            name,
            industry,
            files,
        } => {
            let mut project = NewProject::new(name, industry);
            let content = Content::read(&files).await?;
            if let Some(design) = content.design {
                project = project.with_design(&design)?;
            }
            project.css_code = content.css.unwrap_or_default();
            project.html_code = content.html.unwrap_or_default();

            let record = store.create(session, project).await?;
            writeln!(out, "Created project {}", record.id)?;
        }
        ProjectCommand::Update {
            id,
            name,
            industry,
            files,
        } => {
            let content = Content::read(&files).await?;
            let mut patch = ProjectPatch {
                name,
                industry,
                css_code: content.css,
                html_code: content.html,
                ..ProjectPatch::default()
            };
            if let Some(design) = content.design {
                patch = patch.design(&design)?;
            }
            let record = store
                .update(session, id, patch)
                .await
                .with_context(|| format!("failed to update project {id}"))?;
            writeln!(out, "Updated project {}", record.id)?;
        }
        ProjectCommand::Show { id } => {
            let record = store.get(session, id).await?;
            serde_json::to_writer_pretty(&mut *out, &record)?;
            writeln!(out)?;
        }
        ProjectCommand::List => {
            let records = store.list(session).await?;
            if records.is_empty() {
                writeln!(out, "No projects")?;
            }
            for record in &records {
                write_row(record, out)?;
            }
        }
        ProjectCommand::Delete { id } => {
            store.delete(session, id).await?;
            writeln!(out, "Deleted project {id}")?;
        }
    }
    Ok(())
}

fn write_row(record: &ProjectRecord, out: &mut impl Write) -> std::io::Result<()> {
    let elements = record
        .design()
        .map(|design| design.elements.len())
        .unwrap_or_default();
    writeln!(
        out,
        "{}  {:<24} {:<16} {} elements",
        record.id, record.name, record.industry, elements
    )
}

/// Contents of the files named on the command line.
#[derive(Debug, Default)]
struct Content {
    design: Option<DesignDocument>,
    css: Option<String>,
    html: Option<String>,
}

impl Content {
    async fn read(files: &ContentFiles) -> anyhow::Result<Self> {
        let design = match files.design {
            Some(ref path) => Some(read_design(path).await?),
            None => None,
        };
        let css = match files.css {
            Some(ref path) => Some(read_text(path).await?),
            None => None,
        };
        let html = match files.html {
            Some(ref path) => Some(read_text(path).await?),
            None => None,
        };
        Ok(Self { design, css, html })
    }
}

async fn read_text(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Read a design file, rejecting documents that do not load into a store.
async fn read_design(path: &Path) -> anyhow::Result<DesignDocument> {
    let text = read_text(path).await?;
    let design: DesignDocument = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a design document", path.display()))?;
    design
        .clone()
        .into_store()
        .with_context(|| format!("{} has invalid elements", path.display()))?;
    Ok(design)
}
