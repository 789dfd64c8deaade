use super::{decode_records, encode_records, header, header_template, put_u16, MapFormat};
use crate::util::{le_i16, Record, Writer};
use crate::{Cell, Error, ErrorKind, FormatTag, Grid};

/// Bytes taken by one cell in the native layout, also embedded in object files
pub(crate) const NATIVE_RECORD_LEN: usize = 26;

const VERSION: i16 = 1;
const MAGIC: [u8; 2] = *b"C#";
const CELLS_START: usize = 8;

/// Total bytes of a native map of the given size
///
/// ```
/// use mirmap::native_file_size;
///
/// assert_eq!(native_file_size(1, 1), 34);
/// assert_eq!(native_file_size(10, 20), 8 + 26 * 200);
/// ```
pub fn native_file_size(width: usize, height: usize) -> usize {
    CELLS_START + width * height * NATIVE_RECORD_LEN
}

pub(crate) fn read_native_cell(r: Record<'_>) -> Cell {
    Cell {
        back_index: r.i16(0),
        back_image: r.i32(2),
        middle_index: r.i16(6),
        middle_image: r.i16(8),
        front_index: r.i16(10),
        front_image: r.i16(12),
        door_index: r.u8(14),
        door_offset: r.u8(15),
        front_animation_frame: r.u8(16),
        front_animation_tick: r.u8(17),
        middle_animation_frame: r.u8(18),
        middle_animation_tick: r.u8(19),
        tile_animation_image: r.i16(20),
        tile_animation_offset: r.i16(22),
        tile_animation_frames: r.u8(24),
        light: r.u8(25),
        unknown: 0,
    }
}

pub(crate) fn write_native_cell(w: &mut Writer<'_>, cell: &Cell) {
    w.i16(cell.back_index)
        .i32(cell.back_image)
        .i16(cell.middle_index)
        .i16(cell.middle_image)
        .i16(cell.front_index)
        .i16(cell.front_image)
        .u8(cell.door_index)
        .u8(cell.door_offset)
        .u8(cell.front_animation_frame)
        .u8(cell.front_animation_tick)
        .u8(cell.middle_animation_frame)
        .u8(cell.middle_animation_tick)
        .i16(cell.tile_animation_image)
        .i16(cell.tile_animation_offset)
        .u8(cell.tile_animation_frames)
        .u8(cell.light);
}

/// The versioned lossless layout. Every cell field except `unknown` is
/// stored as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFormat;

impl MapFormat for NativeFormat {
    const TAG: FormatTag = FormatTag::Native;

    fn file_size(width: usize, height: usize) -> usize {
        native_file_size(width, height)
    }

    fn decode(data: &[u8]) -> Result<Grid, Error> {
        let head = header(data, CELLS_START, Self::TAG)?;
        let version = le_i16(head);
        if version != VERSION {
            return Err(Error::new(ErrorKind::UnsupportedVersion { version }));
        }

        let dims = (i32::from(le_i16(&head[4..])), i32::from(le_i16(&head[6..])));
        decode_records(
            data,
            Self::TAG,
            dims,
            CELLS_START,
            NATIVE_RECORD_LEN,
            read_native_cell,
        )
    }

    fn encode(grid: &Grid, _xor_key: u16) -> Vec<u8> {
        let mut head = header_template(CELLS_START, &VERSION.to_le_bytes());
        head[2..4].copy_from_slice(&MAGIC);
        put_u16(&mut head, 4, grid.width() as u16);
        put_u16(&mut head, 6, grid.height() as u16);
        encode_records(grid, head, NATIVE_RECORD_LEN, |cell, w| {
            write_native_cell(w, cell)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect;

    fn sample_cell() -> Cell {
        Cell {
            back_index: 0,
            back_image: 0x2000_0123,
            middle_index: 1,
            middle_image: -3,
            front_index: 90,
            front_image: i16::MIN,
            door_index: 0x85,
            door_offset: 2,
            front_animation_frame: 3,
            front_animation_tick: 4,
            middle_animation_frame: 5,
            middle_animation_tick: 6,
            tile_animation_image: 700,
            tile_animation_offset: -8,
            tile_animation_frames: 9,
            light: 110,
            unknown: 0,
        }
    }

    #[test]
    fn test_header_and_record() {
        let mut grid = Grid::new(1, 1, FormatTag::Native).unwrap();
        grid[(0, 0)] = sample_cell();
        let data = NativeFormat::encode(&grid, 0);
        assert_eq!(&data[..8], &[1, 0, b'C', b'#', 1, 0, 1, 0]);
        assert_eq!(data.len(), native_file_size(1, 1));
        assert_eq!(&data[8..14], &[0, 0, 0x23, 0x01, 0, 0x20]);
        assert_eq!(data[8 + 14], 0x85);
        assert_eq!(data[8 + 25], 110);
        assert_eq!(detect(&data), FormatTag::Native);
        assert_eq!(NativeFormat::decode(&data).unwrap(), grid);
    }

    #[test]
    fn test_unknown_is_not_stored() {
        let mut grid = Grid::new(1, 1, FormatTag::Native).unwrap();
        grid[(0, 0)].unknown = 42;
        let decoded = NativeFormat::decode(&NativeFormat::encode(&grid, 0)).unwrap();
        assert_eq!(decoded[(0, 0)].unknown, 0);
    }

    #[test]
    fn test_unsupported_version() {
        let grid = Grid::new(1, 1, FormatTag::Native).unwrap();
        let mut data = NativeFormat::encode(&grid, 0);
        data[0] = 2;
        let err = NativeFormat::decode(&data).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::UnsupportedVersion { version: 2 }
        ));
    }

    #[test]
    fn test_zero_dimensions() {
        let data = [1, 0, b'C', b'#', 0, 0, 5, 0];
        let err = NativeFormat::decode(&data).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidDimensions {
                format: FormatTag::Native,
                width: 0,
                height: 5,
            }
        ));
    }

    #[test]
    fn test_short_header() {
        let err = NativeFormat::decode(&[1, 0, b'C', b'#']).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::Truncated {
                expected: 8,
                actual: 4,
                ..
            }
        ));
    }
}
