use log::debug;
use rand::Rng;

use super::context::Context;
use super::markov_model::MarkovModel;

/// Separator appended after every generated word.
pub const SEPARATOR: char = ' ';

/// What generation does when the current context was never seen in training.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeadEnd {
	/// Return the text generated so far.
	Stop,
	/// Reset to the empty context and go on. Stops if the empty context is
	/// itself unknown.
	#[default]
	Restart,
}

/// Walks a `MarkovModel` to produce text.
///
/// # Responsibilities
/// - Look up the current context and sample its successor
/// - Slide the context over every sampled word
/// - Keep the output within a byte budget
///
/// Randomness comes from the RNG passed to each call, so a seeded RNG
/// gives reproducible output.
#[derive(Clone, Copy, Debug)]
pub struct Generator<'m, const N: usize> {
	model: &'m MarkovModel<N>,
	dead_end: DeadEnd,
}

impl<'m, const N: usize> Generator<'m, N> {
	/// Creates a generator with the default dead-end policy.
	pub fn new(model: &'m MarkovModel<N>) -> Self {
		Self { model, dead_end: DeadEnd::default() }
	}

	/// Sets the dead-end policy.
	pub fn with_dead_end(mut self, dead_end: DeadEnd) -> Self {
		self.dead_end = dead_end;
		self
	}

	/// Returns the dead-end policy.
	pub fn dead_end(&self) -> DeadEnd {
		self.dead_end
	}

	/// Samples the word following `context`.
	///
	/// Walks the chain of the context's slot for the node holding exactly
	/// `context`, then draws from its bucket with Laplace smoothing.
	///
	/// Returns `None` if the context was never seen.
	pub fn sample_next<R: Rng>(&self, context: &Context<N>, rng: &mut R) -> Option<&'m str> {
		let model: &'m MarkovModel<N> = self.model;
		model
			.lookup(context)
			.find(|node| node.context() == context)?
			.bucket()
			.sample(rng)
	}

	/// Generates text of at most `target_length` bytes.
	///
	/// Starts from the empty context. Each sampled word is appended with one
	/// trailing separator; generation stops as soon as the next word and its
	/// separator would not fit, or on a dead end (see `DeadEnd`).
	///
	/// # Returns
	/// A string whose byte length never exceeds `target_length`. It may be
	/// shorter, down to empty if the model is empty.
	pub fn generate<R: Rng>(&self, target_length: usize, rng: &mut R) -> String {
		let mut output = String::with_capacity(target_length);
		let mut context = Context::empty();

		loop {
			let word = match self.sample_next(&context, rng) {
				Some(word) => word,
				None => {
					if self.dead_end == DeadEnd::Stop || context.is_empty() {
						debug!("no successor for {}, stopping", context);
						break;
					}
					debug!("no successor for {}, restarting", context);
					context = Context::empty();
					continue;
				}
			};

			if output.len() + word.len() + SEPARATOR.len_utf8() > target_length {
				break;
			}
			output.push_str(word);
			output.push(SEPARATOR);
			context.advance(Some(word));
		}

		output
	}
}
