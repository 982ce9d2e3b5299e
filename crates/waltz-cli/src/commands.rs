//! Subcommand implementations
//!
//! Each command returns its stdout text so that it can be exercised
//! without spawning the binary.

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use serde_json::{json, Value};
use std::path::Path;
use waltz_model::{EntityKind, EntityLifecycleStatus};
use waltz_query::{CatalogEntity, InMemoryEntityStore, SelectorQuery};
use waltz_selector::{
    build_selection_options, resolve_downward_scope, resolve_upward_scope, Filters, Scope,
    SelectionOptions, SelectorConfig,
};

/// Dispatch parsed arguments to a subcommand
///
/// # Errors
/// Any failure of the selected subcommand.
pub async fn run(matches: &ArgMatches) -> Result<String> {
    let config = match matches.get_one::<String>("config") {
        Some(path) => SelectorConfig::load(path)?,
        None => SelectorConfig::default(),
    };

    match matches.subcommand() {
        Some(("scope", args)) => {
            let kind = args
                .get_one::<String>("kind")
                .context("missing entity kind")?;
            scope_report(kind)
        }
        Some(("options", args)) => {
            let options = selection_from_args(args, &config)?;
            Ok(serde_json::to_string_pretty(&options)?)
        }
        Some(("select", args)) => {
            let options = selection_from_args(args, &config)?;
            let path = args
                .get_one::<String>("entities")
                .context("missing --entities")?;
            select(&options, Path::new(path), args.get_flag("ids")).await
        }
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("no command given"),
    }
}

/// Default scopes for `kind`
///
/// # Errors
/// If `kind` is blank.
pub fn scope_report(kind: &str) -> Result<String> {
    let kind: EntityKind = kind.parse()?;
    Ok(format!(
        "kind: {kind}\ndownward: {}\nupward: {}",
        resolve_downward_scope(&kind),
        resolve_upward_scope(&kind)
    ))
}

/// Build selection options from `options`/`select` arguments
///
/// # Errors
/// Malformed reference JSON, a missing reference, or a malformed filter.
pub fn selection_from_args(args: &ArgMatches, config: &SelectorConfig) -> Result<SelectionOptions> {
    let reference = match (args.get_one::<String>("json"), args.get_one::<String>("kind")) {
        (Some(text), _) => serde_json::from_str::<Value>(text).context("--json is not valid JSON")?,
        (None, Some(kind)) => {
            let id = args.get_one::<i64>("id").context("--kind requires --id")?;
            json!({ "id": id, "kind": kind })
        }
        (None, None) => bail!("either --json or --kind/--id is required"),
    };

    let statuses: Vec<EntityLifecycleStatus> = match args.get_many::<EntityLifecycleStatus>("status")
    {
        Some(values) => values.copied().collect(),
        None => config.default_lifecycle_statuses.clone(),
    };

    let filters = args
        .get_many::<String>("filter")
        .into_iter()
        .flatten()
        .map(String::as_str)
        .map(parse_filter)
        .collect::<Result<Filters>>()?;

    let options = build_selection_options(
        &reference,
        args.get_one::<Scope>("scope").copied(),
        Some(&statuses),
        Some(filters),
    )?;

    Ok(if args.get_flag("upward") {
        options.with_upward_scope()
    } else {
        options
    })
}

fn parse_filter(entry: &str) -> Result<(String, Value)> {
    let Some((key, raw)) = entry.split_once('=') else {
        bail!("filter '{entry}' must be KEY=VALUE");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("filter '{entry}' has an empty key");
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

async fn select(options: &SelectionOptions, path: &Path, ids_only: bool) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let entities: Vec<CatalogEntity> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of entities", path.display()))?;

    let kind = options.entity_reference().kind();
    let store = InMemoryEntityStore::new(kind.clone());
    let (matching, skipped): (Vec<_>, Vec<_>) =
        entities.into_iter().partition(|e| &e.kind == kind);
    if !skipped.is_empty() {
        tracing::warn!(count = skipped.len(), %kind, "ignoring entities of other kinds");
    }
    store.extend(matching)?;

    tracing::info!(
        reference = %options.entity_reference(),
        scope = %options.scope(),
        entities = store.len(),
        "running selector"
    );

    if ids_only {
        let ids = store.find_by_id_selector(options).await?;
        Ok(serde_json::to_string(&ids)?)
    } else {
        let found = store.find_for_selector(options).await?;
        Ok(serde_json::to_string_pretty(&found)?)
    }
}
