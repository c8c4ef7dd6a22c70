//! Command dispatch: each subcommand plays one host page binding

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use colored::Colorize;
use itertools::Itertools;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, MarkerArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{find_marker, leaf_views, leaves, LeafNode, LeafView, MarkerSelector, MatchMode, Visibility};
use crate::infrastructure::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `treesites --help`".into(),
        ));
    };
    match command {
        Commands::Completion { shell } => {
            print_completions(*shell);
            Ok(())
        }
        Commands::Config { command } => execute_config(command),
        other => {
            let container = ServiceContainer::load()?;
            execute_page_command(&container, other)
        }
    }
}

fn execute_page_command(container: &ServiceContainer, command: &Commands) -> CliResult<()> {
    match command {
        Commands::Search {
            file,
            query,
            regex,
            output,
        } => search(
            container,
            file,
            query.as_deref(),
            *regex,
            output.output.as_deref(),
        ),
        Commands::Clear { file, output } => clear(container, file, output.output.as_deref()),
        Commands::Highlight {
            file,
            marker,
            output,
        } => highlight(container, file, marker, output.output.as_deref()),
        Commands::Leaves { file } => list_leaves(container, file),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

#[instrument(skip(container))]
fn search(
    container: &ServiceContainer,
    file: &Path,
    query: Option<&str>,
    regex: bool,
    out: Option<&Path>,
) -> CliResult<()> {
    let mut controller = container.controller();
    if regex {
        controller = controller.with_mode(MatchMode::Pattern);
    }

    let matched = container.page_service().update(file, out, |page| {
        if let Some(q) = query {
            page.set_query(q);
        }
        // surface a bad pattern to the user; `search` alone would skip it
        Ok(controller.apply_search(page)?)
    })?;

    match matched {
        Some(count) => output::success(&format!("{count} label(s) matched")),
        None => output::warning("empty query, nothing searched"),
    }
    Ok(())
}

#[instrument(skip(container))]
fn clear(container: &ServiceContainer, file: &Path, out: Option<&Path>) -> CliResult<()> {
    let controller = container.controller();
    let hidden = container.page_service().update(file, out, |page| {
        let count = leaves(&page.document, controller.shape()).len();
        controller.clear(page);
        Ok(count)
    })?;
    output::success(&format!("{hidden} label(s) hidden, query cleared"));
    Ok(())
}

#[instrument(skip(container))]
fn highlight(
    container: &ServiceContainer,
    file: &Path,
    marker: &MarkerArgs,
    out: Option<&Path>,
) -> CliResult<()> {
    let selector = match (&marker.id, marker.index) {
        (Some(id), None) => MarkerSelector::Id(id.clone()),
        (None, Some(index)) => MarkerSelector::Position(index),
        _ => {
            return Err(CliError::InvalidArgs(
                "exactly one of --id or --index is required".into(),
            ))
        }
    };
    debug!("selector: {selector}");

    let controller = container.controller();
    let service = container.page_service();
    let mut page = service.load(file)?;
    let marker = find_marker(&page.document, controller.shape(), &selector)?;
    // a marker without a sibling label leaves the file as it was
    let Some(leaf) = LeafNode::from_marker(&page.document, marker) else {
        output::warning(&format!("{selector} has no sibling label, nothing highlighted"));
        return Ok(());
    };
    controller.highlight_one(&mut page.document, marker);
    service.save(&page, out.unwrap_or(file))?;

    output::success(&format!("highlighted {:?}", leaf.label_text(&page.document)));
    Ok(())
}

#[instrument(skip(container))]
fn list_leaves(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let page = container.page_service().load(file)?;
    let views = leaf_views(&page.document, &container.settings.leaf);
    if views.is_empty() {
        output::warning(&format!("no leaves found in {}", file.display()));
        return Ok(());
    }
    let tree = Tree::new(file.display().to_string()).with_leaves(views.iter().map(format_leaf));
    output::info(&tree);
    Ok(())
}

fn format_leaf(view: &LeafView) -> String {
    let state = match view.visibility {
        Some(Visibility::Shown) => "shown".green().to_string(),
        Some(Visibility::Hidden) => "hidden".dimmed().to_string(),
        None => "unset".normal().to_string(),
    };
    let details = std::iter::once(state)
        .chain(view.fill.clone())
        .chain(view.marker_id.as_ref().map(|id| format!("#{id}")))
        .join(", ");
    format!("{:>3} {} [{}]", view.position, view.label, details)
}

fn execute_config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load()?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available on this system"),
        },
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
