use std::fmt;

/// Initial value of the DJB2 running hash.
const HASH_SEED: u64 = 5381;

/// Multiplier applied to the running hash for each byte.
const HASH_MULTIPLIER: u64 = 33;

/// Sliding window over the last `N` words of a text.
///
/// A `Context` is the lookup key of the Markov model: the words that
/// preceded the word being learned or generated, oldest first.
///
/// ## Slots
/// - Each slot is either empty (`None`) or owns a copy of one word
/// - Empty slots only appear at the start of a stream (or after a
///   generation restart), before `N` words have been seen
///
/// ## Equality
/// Two contexts are equal iff every slot pair matches: two empty slots
/// are equal, an empty slot never equals a filled one, filled slots
/// compare by string value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Context<const N: usize> {
	words: [Option<String>; N],
}

impl<const N: usize> Context<N> {
	/// Creates a context with every slot empty.
	pub fn empty() -> Self {
		const { assert!(N >= 1, "context window must hold at least one word") };
		Self { words: std::array::from_fn(|_| None) }
	}

	/// Creates a context from explicit slot values, oldest first.
	pub fn from_words(words: [Option<&str>; N]) -> Self {
		const { assert!(N >= 1, "context window must hold at least one word") };
		Self { words: words.map(|word| word.map(str::to_owned)) }
	}

	/// Returns the slots, oldest first.
	pub fn words(&self) -> &[Option<String>; N] {
		&self.words
	}

	/// Returns `true` if no slot holds a word.
	pub fn is_empty(&self) -> bool {
		self.words.iter().all(Option::is_none)
	}

	/// Order-sensitive DJB2 hash over every slot.
	///
	/// Bytes of each filled slot are folded into a running hash in window
	/// order. An empty slot contributes nothing, so `[None, "a"]` and
	/// `["a", None]` hash alike but are still told apart by equality.
	pub fn hash(&self) -> u64 {
		self.words
			.iter()
			.flatten()
			.flat_map(|word| word.bytes())
			.fold(HASH_SEED, |hash, byte| {
				hash.wrapping_mul(HASH_MULTIPLIER).wrapping_add(byte as u64)
			})
	}

	/// Slides the window forward by one word.
	///
	/// The oldest word is dropped, the others move one slot towards the
	/// front (moved, not copied) and the last slot receives `word`.
	/// Passing `None` pushes an empty slot.
	pub fn advance(&mut self, word: Option<&str>) {
		self.words.rotate_left(1);
		self.words[N - 1] = word.map(str::to_owned);
	}
}

impl<const N: usize> Default for Context<N> {
	fn default() -> Self {
		Self::empty()
	}
}

impl<const N: usize> fmt::Display for Context<N> {
	/// Formats as `["a", "b", NULL]`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("[")?;
		for (i, word) in self.words.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			match word {
				Some(word) => write!(f, "\"{}\"", word)?,
				None => f.write_str("NULL")?,
			}
		}
		f.write_str("]")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_context_hashes_to_seed() {
		let context = Context::<4>::empty();
		assert!(context.is_empty());
		assert_eq!(context.hash(), HASH_SEED);
	}

	#[test]
	fn hash_matches_djb2() {
		let context = Context::<2>::from_words([None, Some("ab")]);
		let expected = (HASH_SEED * 33 + b'a' as u64) * 33 + b'b' as u64;
		assert_eq!(context.hash(), expected);
	}

	#[test]
	fn hash_is_order_sensitive() {
		let ab = Context::<2>::from_words([Some("a"), Some("b")]);
		let ba = Context::<2>::from_words([Some("b"), Some("a")]);
		assert_ne!(ab.hash(), ba.hash());
		assert_ne!(ab, ba);
	}

	#[test]
	fn equal_contexts_hash_equal() {
		let a = Context::<3>::from_words([None, Some("le"), Some("chat")]);
		let b = Context::<3>::from_words([None, Some("le"), Some("chat")]);
		assert_eq!(a, b);
		assert_eq!(a.hash(), b.hash());
	}

	#[test]
	fn empty_slot_never_equals_filled_slot() {
		let shifted_left = Context::<2>::from_words([Some("a"), None]);
		let shifted_right = Context::<2>::from_words([None, Some("a")]);
		assert_eq!(shifted_left.hash(), shifted_right.hash());
		assert_ne!(shifted_left, shifted_right);
		assert_ne!(Context::<2>::from_words([Some(""), None]), Context::<2>::empty());
	}

	#[test]
	fn advance_shifts_oldest_out() {
		let mut context = Context::<3>::empty();
		for word in ["one", "two", "three", "four"] {
			context.advance(Some(word));
		}
		assert_eq!(context, Context::from_words([Some("two"), Some("three"), Some("four")]));

		context.advance(None);
		assert_eq!(context, Context::from_words([Some("three"), Some("four"), None]));
	}

	#[test]
	fn clone_is_independent() {
		let mut original = Context::<2>::from_words([Some("x"), Some("y")]);
		let copy = original.clone();
		original.advance(Some("z"));
		assert_eq!(copy, Context::from_words([Some("x"), Some("y")]));
		assert_eq!(original, Context::from_words([Some("y"), Some("z")]));
	}

	#[test]
	fn display_marks_empty_slots() {
		let context = Context::<3>::from_words([None, Some("a"), Some("b")]);
		assert_eq!(context.to_string(), "[NULL, \"a\", \"b\"]");
	}
}
