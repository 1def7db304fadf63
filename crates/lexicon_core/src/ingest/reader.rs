//! Line-oriented JSONL record stream.

use super::raw::RawRecord;
use std::io::{self, BufRead};

/// Decoding outcome for one non-blank input line.
///
/// Invalid UTF-8 inside a line is a decoding failure, not a read failure.
#[derive(Debug)]
pub enum RecordLine {
    Parsed(RawRecord),
    Malformed(serde_json::Error),
}

/// Iterator over the records of a JSONL stream.
///
/// Blank lines are skipped without being counted. Each yielded item carries
/// the 1-based physical line number for diagnostics. Only errors of the
/// underlying reader are yielded as `Err`.
pub struct RecordReader<R> {
    input: R,
    buffer: Vec<u8>,
    line_no: u64,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            buffer: Vec::new(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = io::Result<(u64, RecordLine)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.input.read_until(b'\n', &mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => return Some(Err(err)),
            }
            self.line_no += 1;

            let line = self.buffer.trim_ascii();
            if line.is_empty() {
                continue;
            }

            let decoded = match serde_json::from_slice::<RawRecord>(line) {
                Ok(record) => RecordLine::Parsed(record),
                Err(err) => RecordLine::Malformed(err),
            };
            return Some(Ok((self.line_no, decoded)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordLine, RecordReader};
    use std::io::Cursor;

    #[test]
    fn skips_blank_lines_and_flags_malformed_ones() {
        let input = "{\"word\":\"a\"}\n\n   \n{broken\n{\"word\":\"b\"}";
        let lines: Vec<(u64, RecordLine)> = RecordReader::new(Cursor::new(input))
            .map(Result::unwrap)
            .collect();

        assert_eq!(lines.len(), 3);
        assert!(matches!(&lines[0], (1, RecordLine::Parsed(r)) if r.word.as_deref() == Some("a")));
        assert!(matches!(&lines[1], (4, RecordLine::Malformed(_))));
        assert!(matches!(&lines[2], (5, RecordLine::Parsed(r)) if r.word.as_deref() == Some("b")));
    }

    #[test]
    fn wrong_member_type_is_malformed() {
        let input = "{\"word\":\"a\",\"senses\":\"oops\"}\n";
        let mut reader = RecordReader::new(Cursor::new(input));
        let (_, line) = reader.next().unwrap().unwrap();
        assert!(matches!(line, RecordLine::Malformed(_)));
        assert!(reader.next().is_none());
    }

    #[test]
    fn invalid_utf8_line_is_malformed_and_reading_continues() {
        let input: &[u8] = b"{\"word\":\"Mann\"}\n{\"word\":\"\xff\xfe\"}\n\xc3(\n{\"word\":\"Frau\"}\n";
        let lines: Vec<(u64, RecordLine)> = RecordReader::new(input).map(Result::unwrap).collect();

        assert_eq!(lines.len(), 4);
        assert!(matches!(&lines[1], (2, RecordLine::Malformed(_))));
        assert!(matches!(&lines[2], (3, RecordLine::Malformed(_))));
        assert!(matches!(&lines[3], (4, RecordLine::Parsed(r)) if r.word.as_deref() == Some("Frau")));
    }
}
