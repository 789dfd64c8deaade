use crate::codec::{read_native_cell, write_native_cell, NATIVE_RECORD_LEN};
use crate::util::{get_split, Record, Writer};
use crate::{Cell, Error, ErrorKind};
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

const COUNT_LEN: usize = 4;
const RECORD_LEN: usize = 8 + NATIVE_RECORD_LEN;

/// A cell placed at an absolute position, independent of any grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "derive", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementRecord {
    pub x: i32,
    pub y: i32,
    pub cell: Cell,
}

impl PlacementRecord {
    pub fn new(x: i32, y: i32, cell: Cell) -> Self {
        PlacementRecord { x, y, cell }
    }
}

/// Total bytes of an object file holding `count` records
///
/// ```
/// use mirmap::objects_file_size;
///
/// assert_eq!(objects_file_size(0), 4);
/// assert_eq!(objects_file_size(3), 4 + 3 * 34);
/// ```
pub fn objects_file_size(count: usize) -> usize {
    COUNT_LEN + count * RECORD_LEN
}

/// Writes the record count followed by each record's position and native cell
pub fn encode_objects(records: &[PlacementRecord]) -> Vec<u8> {
    let mut out = Vec::with_capacity(objects_file_size(records.len()));
    let mut w = Writer::new(&mut out);
    w.i32(records.len() as i32);
    for record in records {
        w.i32(record.x).i32(record.y);
        write_native_cell(&mut w, &record.cell);
    }
    out
}

/// Reads an object file
///
/// Empty input and non-positive counts yield no records. A count that
/// promises more records than the buffer holds is an error, and is caught
/// before anything is allocated.
///
/// ```
/// use mirmap::{decode_objects, encode_objects, Cell, PlacementRecord};
///
/// assert!(decode_objects(&[])?.is_empty());
///
/// let records = vec![PlacementRecord::new(3, -4, Cell::default())];
/// assert_eq!(decode_objects(&encode_objects(&records))?, records);
/// # Ok::<(), mirmap::Error>(())
/// ```
pub fn decode_objects(data: &[u8]) -> Result<Vec<PlacementRecord>, Error> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let (count, body) = get_split::<COUNT_LEN>(data).ok_or_else(|| {
        Error::new(ErrorKind::TruncatedObjects {
            expected: COUNT_LEN,
            actual: data.len(),
        })
    })?;

    let count = i32::from_le_bytes(count);
    if count <= 0 {
        tracing::debug!(count, "object file holds no records");
        return Ok(Vec::new());
    }

    let count = count as usize;
    let expected = count
        .checked_mul(RECORD_LEN)
        .and_then(|x| x.checked_add(COUNT_LEN))
        .unwrap_or(usize::MAX);
    if data.len() < expected {
        return Err(Error::new(ErrorKind::TruncatedObjects {
            expected,
            actual: data.len(),
        }));
    }

    tracing::debug!(count, "decoding object records");
    let records = body
        .chunks_exact(RECORD_LEN)
        .take(count)
        .map(|x| {
            let r = Record::new(x);
            PlacementRecord {
                x: r.i32(0),
                y: r.i32(4),
                cell: read_native_cell(Record::new(&x[8..])),
            }
        })
        .collect();

    Ok(records)
}

/// Reads an object file from disk. A file that does not exist holds no
/// records.
pub fn read_objects<P: AsRef<Path>>(path: P) -> Result<Vec<PlacementRecord>, Error> {
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(data) => decode_objects(&data),
        Err(e) if e.kind() == IoErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "object file not found");
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Writes the records to disk as an object file
pub fn write_objects<P: AsRef<Path>>(path: P, records: &[PlacementRecord]) -> Result<(), Error> {
    std::fs::write(path, encode_objects(records))?;
    Ok(())
}
