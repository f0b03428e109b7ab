use std::fmt;

use rand::Rng;

/// Constant added to every occurrence count before sampling.
pub const LAPLACE_SMOOTHING: usize = 1;

/// One successor word observed after a given context.
///
/// ## Invariants
/// - `occurrences >= 1`
/// - `total_occurrences == occurrences` (kept apart for later weighting schemes)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BucketEntry {
	word: String,
	occurrences: usize,
	total_occurrences: usize,
}

impl BucketEntry {
	fn new(word: &str) -> Self {
		Self {
			word: word.to_owned(),
			occurrences: 1,
			total_occurrences: 1,
		}
	}

	/// Returns the successor word.
	pub fn word(&self) -> &str {
		&self.word
	}

	/// Returns how many times the word followed the context.
	pub fn occurrences(&self) -> usize {
		self.occurrences
	}

	/// Returns the total occurrence counter.
	pub fn total_occurrences(&self) -> usize {
		self.total_occurrences
	}

	fn weight(&self, smoothing: usize) -> usize {
		self.occurrences + smoothing
	}
}

/// Successor words of one context with their occurrence counts.
///
/// Conceptually, this is the set of outgoing edges of a Markov chain
/// node, weighted by how often each edge was observed.
///
/// ## Invariants
/// - No two entries share the same word
/// - Entries keep first-seen order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyBucket {
	entries: Vec<BucketEntry>,
}

impl FrequencyBucket {
	/// Creates a bucket holding a single entry for `word`.
	pub fn with_word(word: &str) -> Self {
		Self { entries: vec![BucketEntry::new(word)] }
	}

	/// Records an occurrence of `word`.
	///
	/// - If the word already exists, its counters are increased.
	/// - Otherwise, a new entry is appended with a count of 1.
	pub fn find_or_create(&mut self, word: &str) -> &BucketEntry {
		let index = match self.entries.iter().position(|entry| entry.word == word) {
			Some(index) => {
				let entry = &mut self.entries[index];
				entry.occurrences += 1;
				entry.total_occurrences += 1;
				index
			}
			None => {
				self.entries.push(BucketEntry::new(word));
				self.entries.len() - 1
			}
		};
		&self.entries[index]
	}

	/// Returns the occurrence count of `word`, if it was ever seen.
	pub fn count(&self, word: &str) -> Option<usize> {
		self.entries
			.iter()
			.find(|entry| entry.word == word)
			.map(BucketEntry::occurrences)
	}

	/// Returns the entries in first-seen order.
	pub fn entries(&self) -> &[BucketEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Sum of `occurrences + smoothing` over every entry.
	pub fn total_weight(&self, smoothing: usize) -> usize {
		self.entries.iter().map(|entry| entry.weight(smoothing)).sum()
	}

	/// Picks a word using Laplace-smoothed weighted random sampling.
	///
	/// Each entry is selected with probability
	/// `(occurrences + 1) / total_weight(1)`.
	///
	/// Returns `None` if the bucket is empty.
	pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		self.sample_smoothed(rng, LAPLACE_SMOOTHING)
	}

	/// Weighted random sampling with an explicit smoothing constant.
	///
	/// This method performs:
	/// - an O(n) scan to compute the total weight
	/// - a cumulative subtraction to select an entry
	pub fn sample_smoothed<R: Rng>(&self, rng: &mut R, smoothing: usize) -> Option<&str> {
		let total = self.total_weight(smoothing);
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for entry in &self.entries {
			let weight = entry.weight(smoothing);
			if r < weight {
				return Some(&entry.word);
			}
			r -= weight;
		}

		// Unreachable while r < total
		None
	}
}

impl fmt::Display for FrequencyBucket {
	/// Formats as `[word, count], [word, count]`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, entry) in self.entries.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "[{}, {}]", entry.word, entry.occurrences)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn repeated_word_increments_counter() {
		let mut bucket = FrequencyBucket::with_word("la");
		for _ in 0..4 {
			bucket.find_or_create("la");
		}
		assert_eq!(bucket.len(), 1);
		assert_eq!(bucket.count("la"), Some(5));
		assert_eq!(bucket.entries()[0].total_occurrences(), 5);
	}

	#[test]
	fn distinct_words_get_distinct_entries() {
		let mut bucket = FrequencyBucket::default();
		for word in ["un", "deux", "trois"] {
			let entry = bucket.find_or_create(word);
			assert_eq!(entry.occurrences(), 1);
		}
		let words: Vec<&str> = bucket.entries().iter().map(BucketEntry::word).collect();
		assert_eq!(words, ["un", "deux", "trois"]);
		assert_eq!(bucket.count("quatre"), None);
	}

	#[test]
	fn words_compare_exactly() {
		let mut bucket = FrequencyBucket::with_word("Word");
		bucket.find_or_create("word");
		bucket.find_or_create("word,");
		assert_eq!(bucket.len(), 3);
	}

	#[test]
	fn total_weight_adds_smoothing_per_entry() {
		let mut bucket = FrequencyBucket::with_word("a");
		bucket.find_or_create("a");
		bucket.find_or_create("b");
		assert_eq!(bucket.total_weight(0), 3);
		assert_eq!(bucket.total_weight(LAPLACE_SMOOTHING), 5);
	}

	#[test]
	fn empty_bucket_samples_nothing() {
		let mut rng = StdRng::seed_from_u64(7);
		assert_eq!(FrequencyBucket::default().sample(&mut rng), None);
	}

	#[test]
	fn single_entry_is_always_sampled() {
		let mut rng = StdRng::seed_from_u64(7);
		let bucket = FrequencyBucket::with_word("only");
		for _ in 0..100 {
			assert_eq!(bucket.sample(&mut rng), Some("only"));
		}
	}

	#[test]
	fn sampling_converges_to_smoothed_frequencies() {
		let mut bucket = FrequencyBucket::with_word("w1");
		bucket.find_or_create("w1");
		bucket.find_or_create("w1");
		bucket.find_or_create("w2");

		let mut rng = StdRng::seed_from_u64(42);
		let draws = 30_000;
		let mut w1 = 0;
		for _ in 0..draws {
			match bucket.sample(&mut rng) {
				Some("w1") => w1 += 1,
				Some("w2") => (),
				other => panic!("unexpected sample {:?}", other),
			}
		}

		// (3 + 1) / ((3 + 1) + (1 + 1))
		let expected = 4.0 / 6.0;
		let observed = w1 as f64 / draws as f64;
		assert!((observed - expected).abs() < 0.02, "observed {}", observed);
	}

	#[test]
	fn smoothing_gives_rare_words_a_chance() {
		let mut bucket = FrequencyBucket::with_word("common");
		for _ in 0..20 {
			bucket.find_or_create("common");
		}
		bucket.find_or_create("rare");

		let mut rng = StdRng::seed_from_u64(3);
		let seen_rare = (0..2_000).any(|_| bucket.sample(&mut rng) == Some("rare"));
		assert!(seen_rare);
	}

	#[test]
	fn display_lists_entries() {
		let mut bucket = FrequencyBucket::with_word("a");
		bucket.find_or_create("b");
		bucket.find_or_create("a");
		assert_eq!(bucket.to_string(), "[a, 2], [b, 1]");
	}
}
