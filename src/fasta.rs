//! FASTA input for the aligner, built on `bio::io::fasta`.
//!
//! Records are streamed one at a time. Ids keep only the identifier (the
//! first whitespace-delimited token of the header), sequence symbols are
//! upper-cased with any whitespace dropped. Paths ending in `.gz` / `.gzip`
//! are decompressed transparently.

use bio::io::fasta;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::{AlignerError, Sequence};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub seq: Sequence,
}

impl From<fasta::Record> for FastaRecord {
    fn from(record: fasta::Record) -> Self {
        let seq: Vec<u8> = record
            .seq()
            .iter()
            .filter(|b| !b.is_ascii_whitespace())
            .map(|b| b.to_ascii_uppercase())
            .collect();
        Self {
            id: record.id().to_string(),
            seq: seq.into(),
        }
    }
}

pub struct FastaReader {
    records: fasta::Records<BufReader<Box<dyn Read>>>,
    failed: bool,
}

impl FastaReader {
    pub fn new<R: Read + 'static>(reader: R) -> Self {
        let reader: Box<dyn Read> = Box::new(reader);
        Self {
            records: fasta::Reader::new(reader).records(),
            failed: false,
        }
    }

    /// Open a FASTA file, gzip-compressed or plain depending on extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AlignerError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let gzipped = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("gz") | Some("gzip")
        );
        if gzipped {
            log::debug!("reading gzip FASTA {}", path.display());
            Ok(Self::new(GzDecoder::new(file)))
        } else {
            log::debug!("reading plain FASTA {}", path.display());
            Ok(Self::new(file))
        }
    }

    /// Next record, `Ok(None)` at end of input. After an error the reader
    /// yields nothing more.
    pub fn read_record(&mut self) -> Result<Option<FastaRecord>, AlignerError> {
        if self.failed {
            return Ok(None);
        }
        match self.records.next() {
            Some(Ok(record)) => Ok(Some(record.into())),
            Some(Err(e)) => {
                self.failed = true;
                Err(parse_error(e))
            }
            None => Ok(None),
        }
    }
}

// bio reports malformed input as `ErrorKind::Other`; everything else is a
// genuine I/O failure.
fn parse_error(e: io::Error) -> AlignerError {
    match e.kind() {
        io::ErrorKind::Other => AlignerError::InvalidFasta(e.to_string()),
        _ => AlignerError::Io(e),
    }
}

impl Iterator for FastaReader {
    type Item = Result<FastaRecord, AlignerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

/// All records of a FASTA file, in file order.
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecord>, AlignerError> {
    FastaReader::from_path(path)?.collect()
}
