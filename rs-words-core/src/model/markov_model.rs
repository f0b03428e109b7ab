use std::io::{self, Write};

use log::trace;

use super::bucket::FrequencyBucket;
use super::context::Context;

/// One (context, bucket) pair of a collision chain.
///
/// ## Invariants
/// - `bucket` is never empty
/// - No other node of the same chain holds an equal `context`
#[derive(Clone, Debug)]
pub struct ChainNode<const N: usize> {
	context: Context<N>,
	bucket: FrequencyBucket,
	/// Arena index of the next node in the chain.
	next: Option<usize>,
}

impl<const N: usize> ChainNode<N> {
	/// Returns the context this node is keyed by.
	pub fn context(&self) -> &Context<N> {
		&self.context
	}

	/// Returns the successor words observed after the context.
	pub fn bucket(&self) -> &FrequencyBucket {
		&self.bucket
	}
}

/// Iterator over the nodes of one hash table slot.
///
/// The chain may hold unrelated contexts that collide on the same slot.
pub struct Chain<'a, const N: usize> {
	nodes: &'a [ChainNode<N>],
	current: Option<usize>,
}

impl<'a, const N: usize> Iterator for Chain<'a, N> {
	type Item = &'a ChainNode<N>;

	fn next(&mut self) -> Option<Self::Item> {
		let nodes = self.nodes;
		let node = &nodes[self.current?];
		self.current = node.next;
		Some(node)
	}
}

/// Occupancy figures of a `MarkovModel`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModelStats {
	/// Number of hash table slots.
	pub capacity: usize,
	/// Slots holding at least one chain node.
	pub used_slots: usize,
	/// Distinct contexts stored.
	pub contexts: usize,
	/// Bucket entries across every context.
	pub entries: usize,
	/// Length of the longest collision chain.
	pub longest_chain: usize,
}

/// Word Markov model stored as a fixed-capacity chained hash table.
///
/// Each slot stores the arena index of its chain head. Chain nodes live in
/// a single arena and link to each other by index, so the whole table
/// (contexts, buckets, words) is released at once when the model is dropped.
///
/// # Responsibilities
/// - Map each distinct context to the frequency bucket of its successors
/// - Count (context, word) observations
/// - Expose slot chains and exact-context lookups for sampling
///
/// # Invariants
/// - `slots.len() == capacity > 0`, never resized or rehashed
/// - A context is stored at most once, in slot `hash % capacity`
/// - Nodes are never removed
#[derive(Clone, Debug)]
pub struct MarkovModel<const N: usize> {
	slots: Vec<Option<usize>>,
	nodes: Vec<ChainNode<N>>,
}

impl<const N: usize> MarkovModel<N> {
	/// Creates an empty model with `capacity` slots.
	///
	/// # Errors
	/// Returns an error if `capacity == 0`.
	pub fn new(capacity: usize) -> Result<Self, String> {
		if capacity == 0 {
			return Err("capacity must be > 0".to_owned());
		}
		Ok(Self {
			slots: vec![None; capacity],
			nodes: Vec::new(),
		})
	}

	/// Returns the number of slots.
	pub fn capacity(&self) -> usize {
		self.slots.len()
	}

	/// Returns the number of distinct contexts stored.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	fn slot_index(&self, context: &Context<N>) -> usize {
		(context.hash() % self.slots.len() as u64) as usize
	}

	/// Records that `word` followed `context`.
	///
	/// - Empty words are ignored.
	/// - Creates the context node and/or the bucket entry if needed.
	///
	/// Returns the occurrence count of `word` after insertion
	/// (0 if the word was ignored).
	pub fn insert(&mut self, context: &Context<N>, word: &str) -> usize {
		if word.is_empty() {
			return 0;
		}

		let index = self.slot_index(context);
		let mut current = match self.slots[index] {
			Some(head) => head,
			None => {
				let node = self.push_node(context, word);
				self.slots[index] = Some(node);
				return 1;
			}
		};

		loop {
			if self.nodes[current].context == *context {
				return self.nodes[current].bucket.find_or_create(word).occurrences();
			}
			match self.nodes[current].next {
				Some(next) => current = next,
				None => break,
			}
		}

		// Unknown context colliding with existing ones: append to the chain tail
		trace!("slot {} collision, chaining {}", index, context);
		let node = self.push_node(context, word);
		self.nodes[current].next = Some(node);
		1
	}

	fn push_node(&mut self, context: &Context<N>, word: &str) -> usize {
		self.nodes.push(ChainNode {
			context: context.clone(),
			bucket: FrequencyBucket::with_word(word),
			next: None,
		});
		self.nodes.len() - 1
	}

	/// Returns the chain of the slot `context` hashes to.
	///
	/// The chain is not filtered: callers must compare contexts, since the
	/// slot may house unrelated colliding contexts.
	pub fn lookup(&self, context: &Context<N>) -> Chain<'_, N> {
		Chain {
			nodes: &self.nodes,
			current: self.slots[self.slot_index(context)],
		}
	}

	/// Returns the bucket stored for exactly `context`, if any.
	pub fn get(&self, context: &Context<N>) -> Option<&FrequencyBucket> {
		self.lookup(context)
			.find(|node| node.context == *context)
			.map(ChainNode::bucket)
	}

	/// Iterates over the non-empty slots as `(slot index, chain)`.
	pub fn chains(&self) -> impl Iterator<Item = (usize, Chain<'_, N>)> {
		self.slots.iter().enumerate().filter_map(|(index, &head)| {
			head.map(|head| (index, Chain { nodes: &self.nodes, current: Some(head) }))
		})
	}

	/// Computes occupancy figures.
	pub fn stats(&self) -> ModelStats {
		let mut stats = ModelStats {
			capacity: self.capacity(),
			contexts: self.nodes.len(),
			entries: self.nodes.iter().map(|node| node.bucket.len()).sum(),
			..ModelStats::default()
		};
		for (_, chain) in self.chains() {
			stats.used_slots += 1;
			stats.longest_chain = stats.longest_chain.max(chain.count());
		}
		stats
	}

	/// Writes the table, one line per non-empty slot.
	///
	/// Each line lists the slot's chain as `<context> -> <bucket>` pairs
	/// separated by `, `.
	pub fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
		for (_, chain) in self.chains() {
			for (i, node) in chain.enumerate() {
				if i > 0 {
					write!(out, ", ")?;
				}
				write!(out, "{} -> {}", node.context, node.bucket)?;
			}
			writeln!(out)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn context(words: [Option<&str>; 2]) -> Context<2> {
		Context::from_words(words)
	}

	#[test]
	fn zero_capacity_is_rejected() {
		assert!(MarkovModel::<2>::new(0).is_err());
		assert_eq!(MarkovModel::<2>::new(16).unwrap().capacity(), 16);
	}

	#[test]
	fn repeated_pair_counts_up() {
		let mut model = MarkovModel::<2>::new(64).unwrap();
		let key = context([Some("a"), Some("b")]);
		for k in 1..=5 {
			assert_eq!(model.insert(&key, "c"), k);
		}
		assert_eq!(model.len(), 1);
		assert_eq!(model.get(&key).unwrap().count("c"), Some(5));
	}

	#[test]
	fn distinct_words_share_one_node() {
		let mut model = MarkovModel::<2>::new(64).unwrap();
		let key = context([None, Some("x")]);
		for word in ["p", "q", "r", "s"] {
			assert_eq!(model.insert(&key, word), 1);
		}
		let bucket = model.get(&key).unwrap();
		assert_eq!(bucket.len(), 4);
		assert!(bucket.entries().iter().all(|entry| entry.occurrences() == 1));
		assert_eq!(model.len(), 1);
	}

	#[test]
	fn empty_word_is_ignored() {
		let mut model = MarkovModel::<2>::new(8).unwrap();
		assert_eq!(model.insert(&Context::empty(), ""), 0);
		assert!(model.is_empty());
		assert_eq!(model.get(&Context::empty()), None);
	}

	#[test]
	fn colliding_contexts_are_chained_without_duplicates() {
		// A single slot forces every context into one chain
		let mut model = MarkovModel::<2>::new(1).unwrap();
		let keys = [
			context([None, None]),
			context([None, Some("a")]),
			context([Some("a"), None]),
			context([Some("a"), Some("b")]),
		];
		for _ in 0..3 {
			for key in &keys {
				model.insert(key, "w");
			}
		}

		assert_eq!(model.len(), keys.len());
		let chain: Vec<&Context<2>> = model.lookup(&keys[0]).map(ChainNode::context).collect();
		assert_eq!(chain, keys.iter().collect::<Vec<_>>());
		for key in &keys {
			assert_eq!(model.get(key).unwrap().count("w"), Some(3));
		}

		let stats = model.stats();
		assert_eq!(stats.used_slots, 1);
		assert_eq!(stats.longest_chain, 4);
		assert_eq!(stats.entries, 4);
	}

	#[test]
	fn lookup_of_unknown_context_finds_nothing() {
		let mut model = MarkovModel::<2>::new(1).unwrap();
		model.insert(&context([Some("a"), Some("b")]), "c");
		let unknown = context([Some("b"), Some("a")]);
		assert_eq!(model.lookup(&unknown).count(), 1);
		assert_eq!(model.get(&unknown), None);
	}

	#[test]
	fn dump_prints_one_line_per_slot() {
		let mut model = MarkovModel::<2>::new(1).unwrap();
		model.insert(&context([None, None]), "a");
		model.insert(&context([None, Some("a")]), "b");
		model.insert(&context([None, Some("a")]), "b");

		let mut out = Vec::new();
		model.dump(&mut out).unwrap();
		assert_eq!(
			String::from_utf8(out).unwrap(),
			"[NULL, NULL] -> [a, 1], [NULL, \"a\"] -> [b, 2]\n"
		);
	}
}
