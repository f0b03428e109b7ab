use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, ValueEnum};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_words_core::model::generator::{DeadEnd, Generator};
use rs_words_core::model::trainer::Trainer;
use rs_words_core::{DEFAULT_CAPACITY, WordModel};

/// Dead-end policy on the command line side.
/// Kept apart from the core enum so the library does not depend on clap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DeadEndMode {
	Stop,
	Restart,
}

impl From<DeadEndMode> for DeadEnd {
	fn from(mode: DeadEndMode) -> Self {
		match mode {
			DeadEndMode::Stop => DeadEnd::Stop,
			DeadEndMode::Restart => DeadEnd::Restart,
		}
	}
}

#[derive(Parser, Debug)]
#[command(name = "rs-words")]
#[command(about = "Train a word Markov chain on text files and generate new text")]
struct Args {
	/// Training corpus files
	#[arg(required = true)]
	inputs: Vec<PathBuf>,

	/// Hash table capacity
	#[arg(short, long, default_value_t = DEFAULT_CAPACITY)]
	capacity: usize,

	/// Byte budget of each generated text
	#[arg(short, long, default_value_t = 4096)]
	length: usize,

	/// Number of texts written to the output file
	#[arg(short = 'n', long, default_value_t = 2048)]
	count: usize,

	/// Output file (nothing is written when absent)
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// Random seed (derived from the clock when absent)
	#[arg(short, long)]
	seed: Option<u64>,

	/// What to do when the current context was never seen in training
	#[arg(long, value_enum, default_value_t = DeadEndMode::Restart)]
	dead_end: DeadEndMode,

	/// Print the trained table
	#[arg(long)]
	dump: bool,
}

fn clock_seed() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|elapsed| elapsed.as_secs())
		.unwrap_or_default()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = Args::parse();

	let mut model = WordModel::new(args.capacity)?;

	// One running context per file; unreadable or empty files are skipped
	let mut trained = 0;
	for input in &args.inputs {
		match Trainer::new(&mut model).train_file(input) {
			Ok(_) => trained += 1,
			Err(e) => warn!("skipping: {}", e),
		}
	}
	if trained == 0 {
		return Err("no usable training file".into());
	}

	let stats = model.stats();
	info!(
		"model: {} contexts, {} entries, {}/{} slots used, longest chain {}",
		stats.contexts, stats.entries, stats.used_slots, stats.capacity, stats.longest_chain
	);

	if args.dump {
		let stdout = io::stdout();
		model.dump(&mut stdout.lock())?;
	}

	let seed = args.seed.unwrap_or_else(clock_seed);
	info!("seed = {}", seed);
	let mut rng = StdRng::seed_from_u64(seed);

	let generator = Generator::new(&model).with_dead_end(args.dead_end.into());

	println!("Generated text:\n---\n{}\n---", generator.generate(args.length, &mut rng));

	if let Some(path) = &args.output {
		let mut out = BufWriter::new(File::create(path)?);
		for _ in 0..args.count {
			out.write_all(generator.generate(args.length, &mut rng).as_bytes())?;
			out.write_all(b"\n")?;
		}
		out.flush()?;
		info!("wrote {} texts to {}", args.count, path.display());
	}

	println!("COMPLETE");

	Ok(())
}
