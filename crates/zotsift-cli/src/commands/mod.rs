use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::debug;
use zotsift_core::{AppConfig, LaunchAction, Launcher, Query, Zotsift, ZoteroUri};

use crate::cli::{Cli, Commands, LaunchArgs, SearchArgs};

mod picker;
mod support;


use self::picker::pick;
use self::support::{print_json, write_candidates};

const NO_MATCHES: &str = "no matches";

pub(crate) fn run(cli: Cli) -> Result<()> {
    validate_command_preflight(&cli.command)?;
    let config = resolve_config(cli.zotero_dir, cli.no_snapshot)?;
    debug!(database = %config.database_path().display(), "resolved configuration");

    // Opening an attachment needs only its key, not a loaded library.
    if let Commands::Open(args) = &cli.command {
        return run_open(&Launcher::from_config(&config), args);
    }

    let library = Zotsift::open(config).context("failed to open zotero library")?;
    run_validated(&library, cli.command)
}

fn resolve_config(zotero_dir: Option<PathBuf>, no_snapshot: bool) -> Result<AppConfig> {
    let mut config = AppConfig::load().context("failed to load configuration")?;
    if let Some(dir) = zotero_dir {
        config = config.with_zotero_dir(dir);
    }
    if no_snapshot {
        config = config.with_snapshot(false);
    }
    Ok(config)
}

fn validate_command_preflight(command: &Commands) -> Result<()> {
    match command {
        Commands::Search(args) => {
            build_query(args)?;
            Ok(())
        }
        Commands::Attachments(_) | Commands::Open(_) | Commands::Select(_) => Ok(()),
    }
}

fn build_query(args: &SearchArgs) -> Result<Query> {
    let query = Query::from_expressions(
        args.author.as_deref(),
        args.year.as_deref(),
        args.added.as_deref(),
    )?;
    if query.is_empty() {
        bail!("at least one of --author, --year, --added is required");
    }
    Ok(query)
}

fn run_validated(library: &Zotsift, command: Commands) -> Result<()> {
    match command {
        Commands::Search(args) => run_search(library, &args),
        Commands::Attachments(args) => {
            let item = library.item_by_key(&args.key)?;
            print_json(&library.attachments(item.id)?)
        }
        Commands::Select(args) => {
            let item = library.item_by_key(&args.key)?;
            dispatch(library.launcher(), &ZoteroUri::Select(item.key), args.dry_run)
        }
        Commands::Open(args) => run_open(library.launcher(), &args),
    }
}

fn run_search(library: &Zotsift, args: &SearchArgs) -> Result<()> {
    let query = build_query(args)?;
    let mut candidates = library.search(&query)?;
    if let Some(limit) = args.limit {
        candidates.truncate(limit);
    }

    if args.json {
        return print_json(&candidates);
    }
    if candidates.is_empty() {
        println!("{NO_MATCHES}");
        return Ok(());
    }
    if !args.pick {
        return write_candidates(&mut io::stdout().lock(), &candidates);
    }

    let picked = pick(&candidates, io::stdin().lock(), io::stdout().lock())?;
    let Some(candidate) = picked else {
        debug!("selection cancelled");
        return Ok(());
    };
    let action = args.action.map_or(LaunchAction::Open, LaunchAction::from);
    let uri = library.uri_for(action, &candidate.item.key)?;
    dispatch(library.launcher(), &uri, args.dry_run)
}

fn run_open(launcher: &Launcher, args: &LaunchArgs) -> Result<()> {
    dispatch(launcher, &ZoteroUri::OpenPdf(args.key.clone()), args.dry_run)
}

fn dispatch(launcher: &Launcher, uri: &ZoteroUri, dry_run: bool) -> Result<()> {
    if dry_run {
        println!("{uri}");
        return Ok(());
    }
    launcher
        .launch(uri)
        .with_context(|| format!("failed to launch {uri}"))
}
