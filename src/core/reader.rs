use crate::domain::model::PlaceName;
use crate::utils::error::{PlacesError, Result};
use std::collections::BTreeSet;
use std::io::{Cursor, Read};

/// Delimiters considered when sniffing, in order of preference.
const CANDIDATES: [u8; 5] = [b',', b'\t', b';', b'|', b':'];

const SNIFF_LINES: usize = 64;

/// Streams place names out of delimited text, one per row.
pub struct PlaceReader<R: Read> {
    reader: csv::Reader<R>,
}

impl PlaceReader<Cursor<Vec<u8>>> {
    /// Builds a reader over in-memory file content. When `delimiter` is `None` it is
    /// sniffed from the first lines of `data`.
    pub fn from_bytes(
        source_name: &str,
        data: Vec<u8>,
        delimiter: Option<u8>,
        has_headers: bool,
    ) -> Result<Self> {
        let delimiter = match delimiter {
            Some(d) => d,
            None => {
                let sample = String::from_utf8_lossy(&data);
                let sniffed = sniff_delimiter(&sample).ok_or_else(|| {
                    PlacesError::DelimiterDetectionError {
                        source_name: source_name.to_string(),
                        reason: "no candidate delimiter occurs consistently on every line"
                            .to_string(),
                    }
                })?;
                tracing::debug!("Sniffed delimiter {:?} for {}", sniffed as char, source_name);
                sniffed
            }
        };

        Ok(Self::new(Cursor::new(data), delimiter, has_headers))
    }
}

impl<R: Read> PlaceReader<R> {
    pub fn new(input: R, delimiter: u8, has_headers: bool) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(has_headers)
            .flexible(true)
            .from_reader(input);
        Self { reader }
    }

    /// Lazily yields the first field of every row. Rows whose first field is empty
    /// or whitespace-only are skipped; other values pass through untouched.
    pub fn places(self) -> impl Iterator<Item = Result<PlaceName>> {
        self.reader
            .into_records()
            .filter_map(|record| match record {
                Ok(record) => {
                    let first = record.get(0).unwrap_or("");
                    if first.trim().is_empty() {
                        tracing::debug!(
                            "Skipping row {} with empty place name",
                            record.position().map(|p| p.line()).unwrap_or(0)
                        );
                        None
                    } else {
                        Some(Ok(first.to_string()))
                    }
                }
                Err(e) => Some(Err(PlacesError::from(e))),
            })
    }
}

/// Guesses the field delimiter from a text sample.
///
/// A candidate fits when it occurs the same non-zero number of times, outside of
/// double quotes, on every non-empty line of the sample. A sample where no
/// candidate occurs at all is single-column and reads as comma separated.
pub fn sniff_delimiter(sample: &str) -> Option<u8> {
    let counts: Vec<[usize; CANDIDATES.len()]> = sample
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SNIFF_LINES)
        .map(count_unquoted)
        .collect();

    if counts.iter().all(|c| c.iter().all(|&n| n == 0)) {
        return Some(b',');
    }

    CANDIDATES
        .iter()
        .enumerate()
        .find(|(i, _)| {
            let first = counts[0][*i];
            first > 0 && counts.iter().all(|c| c[*i] == first)
        })
        .map(|(_, &d)| d)
}

fn count_unquoted(line: &str) -> [usize; CANDIDATES.len()] {
    let mut counts = [0; CANDIDATES.len()];
    let mut in_quotes = false;
    for b in line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(i) = CANDIDATES.iter().position(|&c| c == b) {
                counts[i] += 1;
            }
        }
    }
    counts
}

/// Removes exact duplicates and sorts ascending, so runs over the same input
/// query places in the same order.
pub fn unique_sorted<I>(places: I) -> Vec<PlaceName>
where
    I: IntoIterator<Item = PlaceName>,
{
    places
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
