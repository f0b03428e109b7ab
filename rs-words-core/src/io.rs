use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

/// Size of the buffer used to read corpus files.
pub const CHUNK_SIZE: usize = 4096;

/// Characters separating tokens: space, CR, LF, form feed, escape,
/// vertical tab and horizontal tab.
pub const WHITESPACE: [char; 7] = [' ', '\r', '\n', '\x0c', '\x1b', '\x0b', '\t'];

fn is_separator_byte(byte: u8) -> bool {
	WHITESPACE.iter().any(|&c| c as u32 == byte as u32)
}

/// Splits text into tokens.
///
/// - Tokens are maximal runs of non-separator characters
/// - Empty tokens are never produced
/// - A trailing token without following whitespace is still produced
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
	text.split(WHITESPACE).filter(|token| !token.is_empty())
}

/// Reads text in fixed-size chunks that never split a token.
///
/// Each chunk ends right after the last separator read so far; the trailing
/// partial token is carried over to the next chunk. The final chunk holds
/// whatever remains at end of input. Invalid UTF-8 is replaced lossily.
pub struct TextChunks<R: Read> {
	reader: R,
	buffer: Vec<u8>,
	pending: Vec<u8>,
	done: bool,
}

impl<R: Read> TextChunks<R> {
	/// Wraps a reader, reading `chunk_size` bytes at a time.
	pub fn new(reader: R, chunk_size: usize) -> Self {
		Self {
			reader,
			buffer: vec![0; chunk_size.max(1)],
			pending: Vec::new(),
			done: false,
		}
	}
}

impl<R: Read> Iterator for TextChunks<R> {
	type Item = io::Result<String>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if self.done {
				if self.pending.is_empty() {
					return None;
				}
				let rest = std::mem::take(&mut self.pending);
				return Some(Ok(String::from_utf8_lossy(&rest).into_owned()));
			}

			match self.reader.read(&mut self.buffer) {
				Ok(0) => self.done = true,
				Ok(n) => {
					self.pending.extend_from_slice(&self.buffer[..n]);
					// Separators are ASCII, splitting after one keeps UTF-8 sequences whole
					if let Some(pos) = self.pending.iter().rposition(|&b| is_separator_byte(b)) {
						let carry = self.pending.split_off(pos + 1);
						let chunk = std::mem::replace(&mut self.pending, carry);
						return Some(Ok(String::from_utf8_lossy(&chunk).into_owned()));
					}
				}
				Err(e) if e.kind() == ErrorKind::Interrupted => (),
				Err(e) => {
					self.done = true;
					self.pending.clear();
					return Some(Err(e));
				}
			}
		}
	}
}

/// Opens a file and returns its content as token-aligned chunks.
pub fn read_chunks<P: AsRef<Path>>(path: P) -> io::Result<TextChunks<File>> {
	Ok(TextChunks::new(File::open(path)?, CHUNK_SIZE))
}
