//! ndtips command-line viewer.
//!
//! Loads generated tooltip tables from a documentation root and resolves
//! `(group, id)` pairs the way the documentation viewer does.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use ndtips_config::Config;
use ndtips_loader::{Fragment, TooltipLoader, read_table};
use ndtips_registry::TooltipRegistry;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Viewer command line arguments.
#[derive(Parser, Debug)]
#[command(name = "ndtips")]
#[command(about = "Inspect generated documentation summary tooltips")]
struct Args {
	/// Configuration file
	#[arg(short, long, value_name = "PATH", global = true)]
	config: Option<PathBuf>,

	/// Documentation output root, overriding the configured one
	#[arg(short, long, value_name = "DIR", global = true)]
	root: Option<PathBuf>,

	/// Verbose logging (repeat for more)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Print the tooltip registered for a group and ID
	Lookup {
		group: String,
		id: u32,
		/// Print the stored fragment unchanged
		#[arg(long)]
		raw: bool,
	},
	/// List groups with their entry counts
	List,
	/// Show every tooltip in a group
	Show { group: String },
	/// Parse one table file and report its contents
	Parse { file: PathBuf },
}

fn main() -> Result<ExitCode> {
	let args = Args::parse();

	let default_level = match args.verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let subscriber = tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
		)
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	run(args, TooltipRegistry::global(), &mut std::io::stdout().lock())
}

/// Executes `args.command` against `registry`, writing results to `out`.
fn run(args: Args, registry: &TooltipRegistry, out: &mut impl Write) -> Result<ExitCode> {
	let mut config =
		Config::discover(args.config.as_deref()).context("failed to load configuration")?;
	if let Some(root) = args.root {
		config.root = root;
	}
	debug!(?config, "resolved configuration");

	let loader = TooltipLoader::new(registry, &config)?;

	match args.command {
		Command::Lookup { group, id, raw } => {
			let html = if config.lazy {
				loader.lookup_or_load(&group, id)?
			} else {
				loader.load_all()?;
				registry.lookup(&group, id)
			};
			let Some(html) = html else {
				writeln!(out, "not found")?;
				return Ok(ExitCode::from(1));
			};
			if raw {
				writeln!(out, "{html}")?;
			} else {
				for line in describe(&html) {
					writeln!(out, "{line}")?;
				}
			}
		}
		Command::List => {
			loader.load_all()?;
			let snapshot = registry.snapshot();
			for key in snapshot.keys() {
				let entries = snapshot.group(key.as_str()).map_or(0, |g| g.len());
				writeln!(out, "{key}\t{entries}")?;
			}
		}
		Command::Show { group } => {
			let group = if config.lazy {
				loader.ensure_group(&group)?
			} else {
				loader.load_all()?;
				registry.group(&group)
			};
			let Some(group) = group else {
				writeln!(out, "not found")?;
				return Ok(ExitCode::from(1));
			};
			for (id, html) in group.sorted() {
				let fragment = Fragment::inspect(html);
				writeln!(out, "{id}\t{}", fragment.headline().unwrap_or(""))?;
			}
		}
		Command::Parse { file } => {
			let table =
				read_table(&file).with_context(|| format!("failed to read {}", file.display()))?;
			writeln!(out, "{}\t{} entries", table.group, table.entries.len())?;
			let duplicates = table.duplicates();
			if !duplicates.is_empty() {
				let ids: Vec<String> = duplicates.iter().map(ToString::to_string).collect();
				writeln!(out, "duplicate ids: {}", ids.join(", "))?;
			}
		}
	}

	Ok(ExitCode::SUCCESS)
}

/// Plain-text lines for a fragment: prototype, then summary. Falls back to
/// the fragment itself when neither is present.
fn describe(html: &str) -> Vec<String> {
	let fragment = Fragment::inspect(html);
	let lines: Vec<String> = [fragment.prototype, fragment.summary]
		.into_iter()
		.flatten()
		.collect();
	if lines.is_empty() {
		vec![html.to_string()]
	} else {
		lines
	}
}
