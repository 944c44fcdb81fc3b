use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::{LevelFilter, info};

use rs_markov_core::model::language_model::LanguageModel;
use rs_markov_core::model::model_config::ModelConfig;

/// Train a character-level Markov model on a text file and extend a seed text.
#[derive(Parser, Debug)]
#[command(name = "rs-markov", version, about)]
struct Cli {
	/// UTF-8 corpus to train on
	corpus: PathBuf,

	/// Number of preceding characters used as context
	#[arg(short, long, default_value_t = 4)]
	window: usize,

	/// Number of characters to generate
	#[arg(short = 'n', long, default_value_t = 200)]
	length: usize,

	/// Seed for reproducible output
	#[arg(short, long)]
	seed: Option<u64>,

	/// Text to extend (defaults to a random window from the corpus)
	#[arg(short, long)]
	initial: Option<String>,

	/// Print the learned frequency tables before generating
	#[arg(long)]
	dump: bool,

	/// Print the learned frequency tables as JSON before generating
	#[arg(long)]
	json: bool,

	/// Increase logging (-v debug, -vv trace)
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,

	/// Decrease logging (-q warn, -qq error)
	#[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "verbose")]
	quiet: u8,
}

fn init_logging(verbose: u8, quiet: u8) {
	let level = match (verbose, quiet) {
		(_, 1) => LevelFilter::Warn,
		(_, q) if q > 1 => LevelFilter::Error,
		(0, _) => LevelFilter::Info,
		(1, _) => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};

	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
	builder.filter_level(level);
	builder.parse_default_env();
	builder.init();
}

/// Trains on the corpus and returns everything to print on stdout.
fn run(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
	let mut config = ModelConfig::new(cli.window)?;
	if let Some(seed) = cli.seed {
		config = config.with_seed(seed);
	}

	let mut model = LanguageModel::from_config(config);
	model.train_file(&cli.corpus)?;
	info!(
		"learned {} windows of length {} from {}",
		model.window_count(),
		model.window_length(),
		cli.corpus.display()
	);

	let mut output = String::new();
	if cli.dump {
		output.push_str(&model.render());
	}
	if cli.json {
		output.push_str(&serde_json::to_string_pretty(model.index())?);
		output.push('\n');
	}

	let initial = match &cli.initial {
		Some(text) => text.clone(),
		None => match model.random_window() {
			Some(window) => window,
			None => return Err("corpus has no window followed by a character".into()),
		},
	};

	output.push_str(&model.generate(&initial, cli.length)?);
	output.push('\n');
	Ok(output)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	print!("{}", run(&cli)?);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn corpus(name: &str, contents: &str) -> PathBuf {
		let path = std::env::temp_dir().join(format!("rs-markov-cli-{}-{}.txt", name, std::process::id()));
		std::fs::write(&path, contents).unwrap();
		path
	}

	fn cli(path: &PathBuf, extra: &[&str]) -> Cli {
		let mut args = vec!["rs-markov", path.to_str().unwrap()];
		args.extend_from_slice(extra);
		Cli::try_parse_from(args).unwrap()
	}

	#[test]
	fn generates_from_given_initial_text() {
		let path = corpus("chain", "abcdefg");
		let result = run(&cli(&path, &["-w", "2", "-n", "3", "-s", "1", "-i", "ab"]));
		std::fs::remove_file(&path).unwrap();
		assert_eq!(result.unwrap(), "abcde\n");
	}

	#[test]
	fn initial_text_shorter_than_window_fails() {
		let path = corpus("short-initial", "abcdefg");
		let result = run(&cli(&path, &["-w", "3", "-i", "ab"]));
		std::fs::remove_file(&path).unwrap();
		let err = result.unwrap_err();
		assert!(err.to_string().starts_with("configuration error"), "{err}");
	}

	#[test]
	fn corpus_without_followers_has_no_start_window() {
		let path = corpus("one-window", "abc");
		let result = run(&cli(&path, &["-w", "3"]));
		std::fs::remove_file(&path).unwrap();
		let err = result.unwrap_err();
		assert_eq!(err.to_string(), "corpus has no window followed by a character");
	}

	#[test]
	fn json_dump_lists_tables() {
		let path = corpus("json", "aab");
		let result = run(&cli(&path, &["-w", "1", "-n", "0", "-i", "a", "--json"]));
		std::fs::remove_file(&path).unwrap();

		let output = result.unwrap();
		let (json, generated) = output.trim_end().rsplit_once('\n').unwrap();
		assert_eq!(generated, "a");
		let value: serde_json::Value = serde_json::from_str(json).unwrap();
		assert_eq!(value["tables"][0]["window"], "a");
		assert_eq!(value["tables"][0]["entries"][1]["character"], "b");
		assert_eq!(value["tables"][0]["entries"][1]["cp"], 1.0);
	}
}
