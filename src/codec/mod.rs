//! Decoders and encoders for every map layout.
//!
//! Each layout is a unit struct implementing [`MapFormat`]. [`FormatTag`]
//! dispatches to them, so callers normally go through [`decode`],
//! [`encode`], or [`MapEncoder`].

mod mir3;
mod native;
mod shanda;
mod wemade;

pub use self::mir3::{ShandaMir3Format, WemadeMir3Format};
pub use self::native::{native_file_size, NativeFormat};
pub use self::shanda::{ShandaExtendedFormat, ShandaOldFormat};
pub use self::wemade::{AntiHackFormat, ClassicFormat, HeroesFormat, Wemade2010Format};

pub(crate) use self::native::{read_native_cell, write_native_cell, NATIVE_RECORD_LEN};

use crate::grid::check_dimensions;
use crate::util::{Record, Writer};
use crate::{detect, validate, Cell, Error, ErrorKind, FormatTag, Grid};
use std::io::{self, Write};
use std::path::Path;

/// A single map layout: its tag and the decode/encode pair for it
pub trait MapFormat {
    /// The tag this layout is detected as
    const TAG: FormatTag;

    /// Total bytes a map of the given size occupies in this layout
    fn file_size(width: usize, height: usize) -> usize;

    /// Decodes a buffer already known to be in this layout
    fn decode(data: &[u8]) -> Result<Grid, Error>;

    /// Encodes a validated grid. The key is only consulted by obfuscated
    /// layouts.
    fn encode(grid: &Grid, xor_key: u16) -> Vec<u8>;
}

impl FormatTag {
    /// Decodes the buffer with this layout, skipping detection
    pub fn decode(&self, data: &[u8]) -> Result<Grid, Error> {
        match self {
            FormatTag::Classic => ClassicFormat::decode(data),
            FormatTag::Wemade2010 => Wemade2010Format::decode(data),
            FormatTag::ShandaOld => ShandaOldFormat::decode(data),
            FormatTag::ShandaExtended => ShandaExtendedFormat::decode(data),
            FormatTag::AntiHack => AntiHackFormat::decode(data),
            FormatTag::WemadeMir3 => WemadeMir3Format::decode(data),
            FormatTag::ShandaMir3 => ShandaMir3Format::decode(data),
            FormatTag::Heroes => HeroesFormat::decode(data),
            FormatTag::Native => NativeFormat::decode(data),
        }
    }

    /// Encodes the grid with this layout regardless of the grid's own tag
    pub fn encode(&self, grid: &Grid, xor_key: u16) -> Result<Vec<u8>, Error> {
        if !validate(grid) {
            let (width, height) = grid.raw_dimensions();
            return Err(Error::new(ErrorKind::InvalidGrid {
                width,
                height,
                cells: grid.cells().len(),
            }));
        }

        let out = match self {
            FormatTag::Classic => ClassicFormat::encode(grid, xor_key),
            FormatTag::Wemade2010 => Wemade2010Format::encode(grid, xor_key),
            FormatTag::ShandaOld => ShandaOldFormat::encode(grid, xor_key),
            FormatTag::ShandaExtended => ShandaExtendedFormat::encode(grid, xor_key),
            FormatTag::AntiHack => AntiHackFormat::encode(grid, xor_key),
            FormatTag::WemadeMir3 => WemadeMir3Format::encode(grid, xor_key),
            FormatTag::ShandaMir3 => ShandaMir3Format::encode(grid, xor_key),
            FormatTag::Heroes => HeroesFormat::encode(grid, xor_key),
            FormatTag::Native => NativeFormat::encode(grid, xor_key),
        };

        debug_assert_eq!(out.len(), self.file_size(grid.width(), grid.height()));
        Ok(out)
    }

    /// Total bytes a map of the given size occupies in this layout
    pub fn file_size(&self, width: usize, height: usize) -> usize {
        match self {
            FormatTag::Classic => ClassicFormat::file_size(width, height),
            FormatTag::Wemade2010 => Wemade2010Format::file_size(width, height),
            FormatTag::ShandaOld => ShandaOldFormat::file_size(width, height),
            FormatTag::ShandaExtended => ShandaExtendedFormat::file_size(width, height),
            FormatTag::AntiHack => AntiHackFormat::file_size(width, height),
            FormatTag::WemadeMir3 => WemadeMir3Format::file_size(width, height),
            FormatTag::ShandaMir3 => ShandaMir3Format::file_size(width, height),
            FormatTag::Heroes => HeroesFormat::file_size(width, height),
            FormatTag::Native => NativeFormat::file_size(width, height),
        }
    }
}

/// Returns true for input that stands for a missing map: nothing at all, or
/// nothing but zeros
pub fn is_missing(data: &[u8]) -> bool {
    data.iter().all(|&b| b == 0)
}

/// Detects the layout of the buffer and decodes it
///
/// Empty or all-zero input is treated as a missing file and yields
/// [`Grid::default`] rather than an error.
///
/// ```
/// use mirmap::{decode, FormatTag};
///
/// let grid = decode(&[])?;
/// assert_eq!((grid.width(), grid.height()), (1000, 1000));
/// assert_eq!(grid.format(), FormatTag::Native);
/// # Ok::<(), mirmap::Error>(())
/// ```
pub fn decode(data: &[u8]) -> Result<Grid, Error> {
    if is_missing(data) {
        tracing::debug!(len = data.len(), "no map data, using blank map");
        return Ok(Grid::default());
    }

    let format = detect(data);
    tracing::debug!(
        format = format.name(),
        tag = format.value(),
        len = data.len(),
        "decoding map"
    );
    format.decode(data)
}

/// Encodes the grid in the layout it was decoded from
///
/// Obfuscated layouts draw a random XOR key; use [`MapEncoder`] to supply one.
pub fn encode(grid: &Grid) -> Result<Vec<u8>, Error> {
    MapEncoder::new().encode(grid)
}

/// Configurable map encoder
///
/// ```
/// use mirmap::{decode, FormatTag, Grid, MapEncoder};
///
/// let grid = Grid::new(8, 8, FormatTag::Classic)?;
/// let data = MapEncoder::new()
///     .format(FormatTag::AntiHack)
///     .xor_key(0x1234)
///     .encode(&grid)?;
/// assert_eq!(decode(&data)?.format(), FormatTag::AntiHack);
/// # Ok::<(), mirmap::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MapEncoder {
    format: Option<FormatTag>,
    xor_key: Option<u16>,
}

impl MapEncoder {
    /// An encoder that writes each grid in its own format with a random key
    pub fn new() -> Self {
        MapEncoder::default()
    }

    /// Write this layout instead of the grid's own
    pub fn format(mut self, format: FormatTag) -> Self {
        self.format = Some(format);
        self
    }

    /// Use a fixed XOR key for obfuscated layouts
    pub fn xor_key(mut self, key: u16) -> Self {
        self.xor_key = Some(key);
        self
    }

    /// Encodes the grid into a new buffer
    pub fn encode(&self, grid: &Grid) -> Result<Vec<u8>, Error> {
        let format = self.format.unwrap_or_else(|| grid.format());
        let key = match self.xor_key {
            Some(key) => key,
            None if format.is_obfuscated() => {
                let key = rand::random::<u16>();
                tracing::trace!(key, "drew random xor key");
                key
            }
            None => 0,
        };

        let out = format.encode(grid, key)?;
        tracing::debug!(
            format = format.name(),
            tag = format.value(),
            width = grid.width(),
            height = grid.height(),
            len = out.len(),
            "encoded map"
        );
        Ok(out)
    }

    /// Encodes the grid into the writer
    pub fn encode_to<W>(&self, grid: &Grid, mut writer: W) -> Result<(), Error>
    where
        W: Write,
    {
        let data = self.encode(grid)?;
        writer.write_all(&data)?;
        Ok(())
    }
}

/// Reads and decodes a map file. A file that does not exist is a missing map
/// and yields [`Grid::default`].
pub fn read_map<P: AsRef<Path>>(path: P) -> Result<Grid, Error> {
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(data) => decode(&data),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "map file not found, using blank map");
            Ok(Grid::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Encodes the grid in its own format and writes it to disk
pub fn write_map<P: AsRef<Path>>(path: P, grid: &Grid) -> Result<(), Error> {
    let data = encode(grid)?;
    std::fs::write(path, data)?;
    Ok(())
}

/// Borrows the first `len` bytes of the buffer as a header
pub(crate) fn header(data: &[u8], len: usize, format: FormatTag) -> Result<&[u8], Error> {
    data.get(..len)
        .ok_or_else(|| Error::truncated(format, len, data.len()))
}

/// Reads `width * height` fixed size records that start at `start`, walking
/// `x` outer and `y` inner
pub(crate) fn decode_records<F>(
    data: &[u8],
    format: FormatTag,
    (width, height): (i32, i32),
    start: usize,
    record_len: usize,
    mut read: F,
) -> Result<Grid, Error>
where
    F: FnMut(Record<'_>) -> Cell,
{
    check_dimensions(format, width, height)?;
    let count = width as usize * height as usize;
    let expected = start + count * record_len;
    let body = data
        .get(start..expected)
        .ok_or_else(|| Error::truncated(format, expected, data.len()))?;

    let cells = body
        .chunks_exact(record_len)
        .map(|x| read(Record::new(x)))
        .collect();

    Grid::from_cells(width as u32, height as u32, format, cells)
}

/// Writes the header followed by one fixed size record per cell
pub(crate) fn encode_records<F>(grid: &Grid, header: Vec<u8>, record_len: usize, mut write: F) -> Vec<u8>
where
    F: FnMut(&Cell, &mut Writer<'_>),
{
    let mut out = header;
    out.reserve(grid.cells().len() * record_len);
    for cell in grid.cells() {
        let before = out.len();
        write(cell, &mut Writer::new(&mut out));
        debug_assert_eq!(out.len() - before, record_len);
    }
    out
}

/// A zero filled header of `len` bytes that starts with the given title
pub(crate) fn header_template(len: usize, title: &[u8]) -> Vec<u8> {
    let mut header = vec![0u8; len];
    header[..title.len()].copy_from_slice(title);
    header
}

/// Writes a 16 bit little endian value into a header
pub(crate) fn put_u16(header: &mut [u8], at: usize, value: u16) {
    header[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

/// Dimensions of a validated grid as stored in 16 bit header fields
pub(crate) fn stored_dimensions(grid: &Grid) -> (u16, u16) {
    (grid.width() as u16, grid.height() as u16)
}
