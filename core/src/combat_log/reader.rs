use std::fs;
use std::path::{Path, PathBuf};

use memchr::memchr_iter;
use memmap2::Mmap;
use rayon::prelude::*;

use crate::combat_log::{EventParser, ReaderError, ReplayEvent};

/// Reads a complete JSON-lines event log from disk.
pub struct Reader {
    path: PathBuf,
}

impl Reader {
    pub fn from(file_path: PathBuf) -> Self {
        Reader { path: file_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse every event of the file, preserving line order.
    ///
    /// Lines are decoded in parallel; the first malformed line fails the
    /// whole read since a partially parsed log can't be analysed.
    pub fn read_events(&self) -> Result<Vec<ReplayEvent>, ReaderError> {
        let timer = std::time::Instant::now();

        let file = fs::File::open(&self.path).map_err(|source| ReaderError::OpenFile {
            path: self.path.clone(),
            source,
        })?;
        // SAFETY: the log is written once by the conversion service and only read here
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| ReaderError::MemoryMap {
            path: self.path.clone(),
            source,
        })?;
        let bytes = mmap.as_ref();

        // Line boundaries with their 1-based physical line numbers
        let mut line_ranges: Vec<(u64, usize, usize)> = Vec::new();
        let mut start = 0;
        let mut line_number = 1;
        for end in memchr_iter(b'\n', bytes) {
            if end > start {
                line_ranges.push((line_number, start, end));
            }
            start = end + 1;
            line_number += 1;
        }
        if start < bytes.len() {
            line_ranges.push((line_number, start, bytes.len()));
        }

        let parser = EventParser::new();
        let events: Vec<ReplayEvent> = line_ranges
            .par_iter()
            .filter_map(|&(line_number, start, end)| {
                parser
                    .parse_bytes(line_number, &bytes[start..end])
                    .transpose()
            })
            .collect::<Result<_, _>>()
            .map_err(|source| ReaderError::Parse {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(
            path = %self.path.display(),
            events = events.len(),
            bytes = bytes.len(),
            elapsed_ms = timer.elapsed().as_millis() as u64,
            "Read replay event log"
        );

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat_log::{EventKind, ParseError};
    use std::io::Write;

    fn write_log(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_events_in_file_order() {
        let mut contents = String::new();
        for t in 0..500 {
            contents.push_str(&format!(
                "{{\"time\":{t},\"ticks\":{t},\"type\":\"interval\",\"unit\":\"CDOTA_Unit_Hero_Axe\",\"slot\":0,\"hp\":{}}}\n",
                1000 - t
            ));
        }
        let file = write_log(&contents);

        let events = Reader::from(file.path().to_path_buf()).read_events().unwrap();

        assert_eq!(events.len(), 500);
        for (t, event) in events.iter().enumerate() {
            assert_eq!(event.time, t as i64);
            assert_eq!(event.line_number, t as u64 + 1);
            assert!(matches!(event.kind, EventKind::Interval(_)));
        }
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let file = write_log("{\"time\":1,\"type\":\"a\"}\n{\"time\":2,\"type\":\"b\"}");
        let events = Reader::from(file.path().to_path_buf()).read_events().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].time, 2);
    }

    #[test]
    fn empty_file_reads_no_events() {
        let file = write_log("");
        let events = Reader::from(file.path().to_path_buf()).read_events().unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn event_without_time_fails_the_read() {
        let file = write_log("{\"time\":1,\"type\":\"a\"}\n{\"type\":\"b\"}\n");
        let err = Reader::from(file.path().to_path_buf())
            .read_events()
            .unwrap_err();
        let ReaderError::Parse { source, .. } = err else {
            panic!("expected parse error, got {err:?}");
        };
        assert!(matches!(source, ParseError::MissingTime { line_number: 2 }));
    }

    #[test]
    fn blank_lines_keep_physical_line_numbers() {
        let file = write_log("{\"time\":1,\"type\":\"a\"}\n\n{\"time\":3,\"type\":\"b\"}\n\n{\"type\":\"c\"}");
        let err = Reader::from(file.path().to_path_buf())
            .read_events()
            .unwrap_err();
        let ReaderError::Parse { source, .. } = err else {
            panic!("expected parse error, got {err:?}");
        };
        assert!(matches!(source, ParseError::MissingTime { line_number: 5 }));

        let file = write_log("{\"time\":1,\"type\":\"a\"}\n\n{\"time\":3,\"type\":\"b\"}\n");
        let events = Reader::from(file.path().to_path_buf()).read_events().unwrap();
        let lines: Vec<u64> = events.iter().map(|e| e.line_number).collect();
        assert_eq!(lines, vec![1, 3]);
        let from_str = EventParser::new()
            .parse_str(&std::fs::read_to_string(file.path()).unwrap())
            .unwrap();
        let str_lines: Vec<u64> = from_str.iter().map(|e| e.line_number).collect();
        assert_eq!(lines, str_lines);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Reader::from(PathBuf::from("/nonexistent/1.jsonlines"))
            .read_events()
            .unwrap_err();
        assert!(matches!(err, ReaderError::OpenFile { .. }));
    }
}
