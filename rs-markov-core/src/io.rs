use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{ModelError, Result};

/// Reads characters one at a time from a buffered byte stream.
///
/// Bytes are decoded as UTF-8. Malformed sequences are reported as
/// `io::ErrorKind::InvalidData`; the iterator ends after the first error.
///
/// Decoding happens one sequence at a time rather than through
/// `read_to_string`, so training consumes the source as a stream and a
/// corpus is never held in memory as a whole. `BufRead` has no char-level
/// reader, hence the lead-byte width table below.
#[derive(Debug)]
pub struct CharReader<R> {
	inner: R,
	failed: bool,
}

impl<R: BufRead> CharReader<R> {
	pub fn new(inner: R) -> Self {
		Self { inner, failed: false }
	}

	/// Reads a single byte, `None` at end of stream.
	fn read_byte(&mut self) -> io::Result<Option<u8>> {
		loop {
			match self.inner.fill_buf() {
				Ok([]) => return Ok(None),
				Ok(buf) => {
					let byte = buf[0];
					self.inner.consume(1);
					return Ok(Some(byte));
				}
				Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
				Err(e) => return Err(e),
			}
		}
	}

	/// Decodes the next character, `None` at end of stream.
	pub fn read_char(&mut self) -> io::Result<Option<char>> {
		let lead = match self.read_byte()? {
			Some(b) => b,
			None => return Ok(None),
		};

		let width = utf8_width(lead)
			.ok_or_else(|| invalid_data(format!("invalid UTF-8 lead byte 0x{lead:02x}")))?;

		let mut bytes = [lead, 0, 0, 0];
		for slot in bytes.iter_mut().take(width).skip(1) {
			*slot = self
				.read_byte()?
				.ok_or_else(|| invalid_data("truncated UTF-8 sequence".to_owned()))?;
		}

		let decoded = std::str::from_utf8(&bytes[..width]).map_err(|e| invalid_data(e.to_string()))?;
		Ok(decoded.chars().next())
	}
}

impl<R: BufRead> Iterator for CharReader<R> {
	type Item = io::Result<char>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.failed {
			return None;
		}
		match self.read_char() {
			Ok(c) => c.map(Ok),
			Err(e) => {
				self.failed = true;
				Some(Err(e))
			}
		}
	}
}

/// Number of bytes in the UTF-8 sequence starting with `lead`.
fn utf8_width(lead: u8) -> Option<usize> {
	match lead {
		0x00..=0x7F => Some(1),
		0xC2..=0xDF => Some(2),
		0xE0..=0xEF => Some(3),
		0xF0..=0xF4 => Some(4),
		_ => None,
	}
}

fn invalid_data(message: String) -> io::Error {
	io::Error::new(io::ErrorKind::InvalidData, message)
}

/// Opens a file as a character source.
///
/// # Errors
/// Returns `ModelError::SourceRead` if the file cannot be opened.
pub fn open_source<P: AsRef<Path>>(path: P) -> Result<CharReader<BufReader<File>>> {
	let path = path.as_ref();
	let file = File::open(path).map_err(|e| {
		ModelError::SourceRead(io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
	})?;
	Ok(CharReader::new(BufReader::new(file)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	fn decode(bytes: &[u8]) -> Vec<io::Result<char>> {
		CharReader::new(Cursor::new(bytes.to_vec())).collect()
	}

	#[test]
	fn reads_ascii_in_order() {
		let chars: String = decode(b"abc\n").into_iter().map(|c| c.unwrap()).collect();
		assert_eq!(chars, "abc\n");
	}

	#[test]
	fn reads_multibyte_characters() {
		let text = "aé€😀";
		let chars: String = decode(text.as_bytes()).into_iter().map(|c| c.unwrap()).collect();
		assert_eq!(chars, text);
	}

	#[test]
	fn empty_stream_yields_nothing() {
		assert!(decode(b"").is_empty());
	}

	#[test]
	fn invalid_lead_byte_is_reported_once() {
		let items = decode(&[b'a', 0xFF, b'b']);
		assert_eq!(items.len(), 2);
		assert_eq!(*items[0].as_ref().unwrap(), 'a');
		assert_eq!(items[1].as_ref().unwrap_err().kind(), io::ErrorKind::InvalidData);
	}

	#[test]
	fn truncated_sequence_is_an_error() {
		let items = decode(&[0xE2, 0x82]);
		assert_eq!(items.len(), 1);
		assert!(items[0].is_err());
	}

	#[test]
	fn overlong_encodings_are_rejected() {
		// 0xC0 0x80 and 0xE0 0x80 0x80 are overlong forms of NUL.
		assert!(decode(&[0xC0, 0x80])[0].is_err());
		let items = decode(&[0xE0, 0x80, 0x80]);
		assert_eq!(items.len(), 1);
		assert_eq!(items[0].as_ref().unwrap_err().kind(), io::ErrorKind::InvalidData);
	}

	#[test]
	fn missing_file_is_a_source_read_error() {
		let path = std::env::temp_dir().join("rs-markov-core-does-not-exist.txt");
		let err = open_source(&path).unwrap_err();
		assert!(matches!(err, ModelError::SourceRead(_)));
	}
}
