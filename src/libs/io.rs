use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::libs::error::BbhError;

/// Opens `input` for buffered reading. `stdin` reads from standard input and
/// `.gz` files are transparently decompressed.
///
/// ```
/// use std::io::BufRead;
/// let reader = bbh::reader("tests/bbh/a.fa").unwrap();
/// assert_eq!(reader.lines().count(), 10);
/// ```
pub fn reader(input: &str) -> Result<Box<dyn BufRead>, BbhError> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = Path::new(input);
        let file = std::fs::File::open(path).map_err(|why| {
            BbhError::Io(std::io::Error::new(
                why.kind(),
                format!("could not open {}: {}", path.display(), why),
            ))
        })?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

pub fn writer(output: &str) -> Result<Box<dyn Write>, BbhError> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = std::fs::File::create(output).map_err(|why| {
            BbhError::Io(std::io::Error::new(
                why.kind(),
                format!("could not create {}: {}", output, why),
            ))
        })?;
        Box::new(BufWriter::new(file))
    };

    Ok(writer)
}
