use std::io::{BufWriter, Write};
use std::path::PathBuf;
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use class_codec::Options;

mod check;
mod dump;
mod jar;

#[derive(Debug, Parser)]
#[command(about = "Reads, checks and prints JVM class files")]
struct Cli {
	/// Be verbose.
	#[arg(short = 'v', long = "verbose", global = true)]
	verbose: bool,

	/// Log every structure read or written.
	#[arg(long = "trace", global = true)]
	trace: bool,

	/// Don't index the constant pool while reading, it gets indexed on first lookup instead.
	#[arg(long = "skip-constant-pool-index", global = true)]
	skip_constant_pool_index: bool,

	/// Keep all attributes as raw bytes.
	#[arg(long = "skip-attributes", global = true)]
	skip_attributes: bool,

	#[command(subcommand)]
	command: Command,
}

impl Cli {
	fn options(&self) -> Options {
		Options {
			trace: self.trace,
			skip_constant_pool_index: self.skip_constant_pool_index,
			skip_attributes: self.skip_attributes,
		}
	}

	fn level(&self) -> LevelFilter {
		if self.trace {
			LevelFilter::Trace
		} else if self.verbose {
			LevelFilter::Debug
		} else {
			LevelFilter::Info
		}
	}
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Read and write back class files and the classes in archives, reporting every class that changes.
	Check {
		/// Class files, jar or zip files, or directories to search for them.
		#[arg(required = true)]
		paths: Vec<PathBuf>,
	},
	/// Print the contents of one class.
	Dump {
		/// A class file, or a jar or zip file when used with `--entry`.
		file: PathBuf,

		/// The name of the class file inside the archive, like `java/lang/Object.class`.
		#[arg(long = "entry")]
		entry: Option<String>,
	},
}

fn setup_logger(level: LevelFilter) -> Result<()> {
	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {message}", record.level(), record.target()))
		})
		.level(level)
		.chain(std::io::stderr())
		.apply()?;
	Ok(())
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_logger(cli.level())?;

	let options = cli.options();

	match cli.command {
		Command::Check { paths } => {
			let start = std::time::Instant::now();

			let summary = check::check_paths(&paths, &options)?;

			let elapsed = start.elapsed();
			println!("checked {} classes in {elapsed:?}, {} failed", summary.checked, summary.failed.len());
			for (name, reason) in &summary.failed {
				println!("  {name}: {reason}");
			}

			if !summary.failed.is_empty() {
				bail!("{} of {} classes didn't survive being read and written back", summary.failed.len(), summary.checked);
			}
		},
		Command::Dump { file, entry } => {
			let class = dump::load(&file, entry.as_deref(), &options)?;

			let mut out = BufWriter::new(std::io::stdout().lock());
			dump::dump(&class, &mut out)?;
			out.flush()?;
		},
	}

	Ok(())
}

#[cfg(test)]
mod testing {
	use clap::Parser;
	use log::LevelFilter;
	use pretty_assertions::assert_eq;
	use super::{Cli, Command};

	#[test]
	fn flags_become_options() -> anyhow::Result<()> {
		let cli = Cli::try_parse_from(["classview", "check", "--skip-attributes", "a.jar", "-v", "b"])?;

		assert_eq!(cli.level(), LevelFilter::Debug);
		let options = cli.options();
		assert!(options.skip_attributes);
		assert!(!options.skip_constant_pool_index);
		assert!(!options.trace);
		assert!(matches!(cli.command, Command::Check { ref paths } if paths.len() == 2));
		Ok(())
	}

	#[test]
	fn dump_entry() -> anyhow::Result<()> {
		let cli = Cli::try_parse_from(["classview", "--trace", "dump", "a.jar", "--entry", "A.class"])?;

		assert_eq!(cli.level(), LevelFilter::Trace);
		assert!(matches!(cli.command, Command::Dump { entry: Some(ref entry), .. } if entry == "A.class"));
		Ok(())
	}

	#[test]
	fn check_needs_paths() {
		assert!(Cli::try_parse_from(["classview", "check"]).is_err());
	}
}
