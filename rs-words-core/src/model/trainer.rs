use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use super::context::Context;
use super::markov_model::MarkovModel;
use crate::io::{read_chunks, tokenize};

/// Failure to train from a corpus file.
///
/// Both variants are recoverable: the model is left consistent and
/// training may continue with another file.
#[derive(Debug)]
pub enum TrainError {
	/// The file could not be opened or read.
	Io { path: PathBuf, source: io::Error },
	/// The file holds no token.
	Empty { path: PathBuf },
}

impl fmt::Display for TrainError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TrainError::Io { path, source } => write!(f, "cannot read {}: {}", path.display(), source),
			TrainError::Empty { path } => write!(f, "no words found in {}", path.display()),
		}
	}
}

impl std::error::Error for TrainError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			TrainError::Io { source, .. } => Some(source),
			TrainError::Empty { .. } => None,
		}
	}
}

/// Streaming, single-pass model builder.
///
/// Holds one running context, initially empty. Every token is recorded
/// under the context that preceded it, then the context slides over it.
///
/// # Invariants
/// - The running context only holds complete, non-empty tokens
pub struct Trainer<'m, const N: usize> {
	model: &'m mut MarkovModel<N>,
	context: Context<N>,
	tokens: usize,
}

impl<'m, const N: usize> Trainer<'m, N> {
	/// Starts a token stream over `model` with an empty context.
	pub fn new(model: &'m mut MarkovModel<N>) -> Self {
		Self {
			model,
			context: Context::empty(),
			tokens: 0,
		}
	}

	/// Returns the running context.
	pub fn context(&self) -> &Context<N> {
		&self.context
	}

	/// Returns the number of tokens fed so far.
	pub fn tokens(&self) -> usize {
		self.tokens
	}

	/// Records one token and advances the context.
	///
	/// Empty tokens are ignored and leave the context untouched.
	pub fn feed(&mut self, token: &str) {
		if token.is_empty() {
			return;
		}
		self.model.insert(&self.context, token);
		self.context.advance(Some(token));
		self.tokens += 1;
	}

	/// Feeds every token of a stream, in order.
	pub fn train<I, S>(&mut self, tokens: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for token in tokens {
			self.feed(token.as_ref());
		}
	}

	/// Tokenizes `text` and feeds its tokens.
	///
	/// Returns the number of tokens fed.
	pub fn train_text(&mut self, text: &str) -> usize {
		let before = self.tokens;
		self.train(tokenize(text));
		self.tokens - before
	}

	/// Reads a corpus file chunk by chunk and feeds its tokens.
	///
	/// The running context carries across chunks, so the result matches
	/// training on the whole file at once.
	///
	/// Returns the number of tokens fed.
	///
	/// # Errors
	/// - `TrainError::Io` if the file cannot be opened or read
	/// - `TrainError::Empty` if the file holds no token
	pub fn train_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, TrainError> {
		let path = path.as_ref();
		let io_error = |source: io::Error| TrainError::Io { path: path.to_owned(), source };

		let mut fed = 0;
		for chunk in read_chunks(path).map_err(io_error)? {
			fed += self.train_text(&chunk.map_err(io_error)?);
		}

		if fed == 0 {
			return Err(TrainError::Empty { path: path.to_owned() });
		}
		info!("trained on {} words from {}", fed, path.display());
		Ok(fed)
	}
}
