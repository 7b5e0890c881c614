//! Blueprint Admin CLI
//!
//! Command-line tool for moving content blueprints between sites.
//!
//! ## Usage
//!
//! ```bash
//! blueprint-admin --site site.json export rabbit --taxonomy diet --name "Spring Warren"
//! blueprint-admin --site other.json import out/spring-warren.zip
//! blueprint-admin --site other.json reset --all
//! ```

mod site;

use std::path::PathBuf;
use std::process;

use blueprint_transfer::commands::{
	ExportArgs, ExportCommand, ExportOptions, ImportArgs, ImportCommand, ImportOptions, ResetCommand, ResetOptions,
};
use blueprint_transfer::{ResetScope, TransferResult, TransferSettings};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::site::FileSite;

#[derive(Parser)]
#[command(name = "blueprint-admin")]
#[command(about = "Content blueprint administration utility", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Site state file (created on first write)
	#[arg(long, value_name = "PATH", default_value = "site.json", global = true)]
	site: PathBuf,

	/// Directory holding the site's media files
	#[arg(long, value_name = "DIR", default_value = "media", global = true)]
	media_root: PathBuf,

	/// Transfer settings file (TOML)
	#[arg(long, value_name = "PATH", global = true)]
	config: Option<PathBuf>,

	/// Verbosity level (can be repeated)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbosity: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Export content types and their content into a blueprint archive
	Export {
		/// Content type slugs to export
		#[arg(value_name = "TYPE", required = true)]
		types: Vec<String>,

		/// Taxonomy to export (repeatable)
		#[arg(short, long = "taxonomy", value_name = "SLUG")]
		taxonomies: Vec<String>,

		/// Blueprint name, used for the archive file name
		#[arg(long)]
		name: Option<String>,

		/// Blueprint description
		#[arg(long)]
		description: Option<String>,

		/// Host option to include (repeatable)
		#[arg(long = "option", value_name = "KEY")]
		options: Vec<String>,

		/// Directory receiving the archive
		#[arg(short, long, value_name = "DIR")]
		output: Option<PathBuf>,
	},

	/// Import a blueprint archive into the site
	Import {
		/// Path to the blueprint archive
		#[arg(value_name = "ARCHIVE")]
		archive: PathBuf,

		/// Replace host options that already exist
		#[arg(long)]
		overwrite_options: bool,
	},

	/// Delete blueprint data from the site
	Reset {
		/// Delete every blueprint-owned family
		#[arg(long)]
		all: bool,

		/// Delete entries
		#[arg(long)]
		posts: bool,

		/// Delete media items and files
		#[arg(long)]
		media: bool,

		/// Delete relationship records
		#[arg(long)]
		relationships: bool,

		/// Delete terms of registered taxonomies
		#[arg(long)]
		terms: bool,

		/// Delete taxonomy definitions
		#[arg(long)]
		taxonomies: bool,

		/// Delete content model definitions
		#[arg(long)]
		models: bool,

		/// Also delete host-owned entries and media
		#[arg(long)]
		include_core: bool,
	},
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.verbosity);

	if let Err(e) = run(cli) {
		eprintln!("{} {}", "Error:".red().bold(), e);
		process::exit(1);
	}
}

/// `RUST_LOG` wins over the verbosity flag.
fn init_logging(verbosity: u8) {
	let level = match verbosity {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

fn run(cli: Cli) -> TransferResult<()> {
	let settings = match &cli.config {
		Some(path) => TransferSettings::from_toml_file(path)?,
		None => TransferSettings::default(),
	};
	let site = FileSite::open(&cli.site, cli.media_root)?;
	// Commands only print their summaries at verbosity 1 and above.
	let verbosity = cli.verbosity.max(1);

	match cli.command {
		Commands::Export {
			types,
			taxonomies,
			name,
			description,
			options,
			output,
		} => {
			let args = ExportArgs {
				types,
				taxonomies,
				name,
			};
			let mut export_options = ExportOptions::new()
				.with_option_keys(options)
				.with_verbosity(verbosity);
			if let Some(description) = description {
				export_options = export_options.with_description(description);
			}
			if let Some(dir) = output {
				export_options = export_options.with_output_dir(dir);
			}
			ExportCommand::new(site.context(), settings).execute(args, export_options)?;
		}
		Commands::Import {
			archive,
			overwrite_options,
		} => {
			let options = ImportOptions::new()
				.with_overwrite_options(overwrite_options)
				.with_verbosity(verbosity);
			site.persist(ImportCommand::new(site.context(), settings).execute(ImportArgs { archive }, options))?;
		}
		Commands::Reset {
			all,
			posts,
			media,
			relationships,
			terms,
			taxonomies,
			models,
			include_core,
		} => {
			let mut scope = if all {
				ResetScope::all()
			} else {
				ResetScope {
					posts,
					media,
					relationships,
					terms,
					taxonomies,
					models,
					include_core: false,
				}
			};
			scope.include_core = include_core;
			let options = ResetOptions::new().with_scope(scope).with_verbosity(verbosity);
			site.persist(ResetCommand::new(site.context()).execute(options))?;
		}
	}
	Ok(())
}
