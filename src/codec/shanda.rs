//! Shanda's mir2 layouts. Both share a 20 byte signature and differ only in
//! record size, which is why detection has to look at the buffer length.

use super::{
    decode_records, encode_records, header, header_template, put_u16, stored_dimensions,
    MapFormat,
};
use crate::transform::{bias_index, pack_blocked, unbias_index, unpack_blocked};
use crate::util::{le_i16, Record, Writer};
use crate::{Cell, Error, FormatTag, Grid};

const BACK_BIAS: i16 = 100;
const MIDDLE_BIAS: i16 = 110;
const FRONT_BIAS: i16 = 120;

const CELLS_START: usize = 52;
const TITLE_AT: usize = 4;
const TITLE: &[u8] = b"\x0FMir2 Map File\r\n";

/// Bytes of the record both layouts have in common
const BASE_RECORD_LEN: usize = 14;

fn read_dimensions(data: &[u8], format: FormatTag) -> Result<(i32, i32), Error> {
    let head = header(data, 4, format)?;
    Ok((i32::from(le_i16(&head[0..])), i32::from(le_i16(&head[2..]))))
}

fn read_base(r: Record<'_>) -> Cell {
    Cell {
        back_image: unpack_blocked(i32::from(r.i16(0))),
        middle_image: r.i16(2),
        front_image: r.i16(4),
        door_index: r.u8(6),
        door_offset: r.u8(7),
        front_animation_frame: r.u8(8),
        front_animation_tick: r.u8(9),
        front_index: bias_index(r.u8(10), FRONT_BIAS),
        light: r.u8(11),
        back_index: bias_index(r.u8(12), BACK_BIAS),
        middle_index: bias_index(r.u8(13), MIDDLE_BIAS),
        ..Cell::default()
    }
}

fn write_base(w: &mut Writer<'_>, cell: &Cell) {
    w.i16(pack_blocked(cell.back_image) as i16)
        .i16(cell.middle_image)
        .i16(cell.front_image)
        .u8(cell.door_index)
        .u8(cell.door_offset)
        .u8(cell.front_animation_frame)
        .u8(cell.front_animation_tick)
        .u8(unbias_index(cell.front_index, FRONT_BIAS))
        .u8(cell.light)
        .u8(unbias_index(cell.back_index, BACK_BIAS))
        .u8(unbias_index(cell.middle_index, MIDDLE_BIAS));
}

fn shanda_header(grid: &Grid) -> Vec<u8> {
    let (width, height) = stored_dimensions(grid);
    let mut head = header_template(CELLS_START, &[]);
    put_u16(&mut head, 0, width);
    put_u16(&mut head, 2, height);
    head[TITLE_AT..TITLE_AT + TITLE.len()].copy_from_slice(TITLE);
    head
}

/// Shanda's older layout with 14 byte records. Library numbers are stored
/// relative to the shanda library ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShandaOldFormat;

impl MapFormat for ShandaOldFormat {
    const TAG: FormatTag = FormatTag::ShandaOld;

    fn file_size(width: usize, height: usize) -> usize {
        CELLS_START + width * height * BASE_RECORD_LEN
    }

    fn decode(data: &[u8]) -> Result<Grid, Error> {
        let dims = read_dimensions(data, Self::TAG)?;
        decode_records(data, Self::TAG, dims, CELLS_START, BASE_RECORD_LEN, read_base)
    }

    fn encode(grid: &Grid, _xor_key: u16) -> Vec<u8> {
        encode_records(grid, shanda_header(grid), BASE_RECORD_LEN, |cell, w| {
            write_base(w, cell)
        })
    }
}

/// Shanda's 2012 layout: the older record followed by tile animation data
/// and a run of blending and lighting bytes that are not interpreted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShandaExtendedFormat;

impl ShandaExtendedFormat {
    const RECORD_LEN: usize = BASE_RECORD_LEN + 2 + 7 + 1 + 2 + 14;
}

impl MapFormat for ShandaExtendedFormat {
    const TAG: FormatTag = FormatTag::ShandaExtended;

    fn file_size(width: usize, height: usize) -> usize {
        CELLS_START + width * height * Self::RECORD_LEN
    }

    fn decode(data: &[u8]) -> Result<Grid, Error> {
        let dims = read_dimensions(data, Self::TAG)?;
        decode_records(data, Self::TAG, dims, CELLS_START, Self::RECORD_LEN, |r| {
            let mut cell = read_base(r);
            cell.tile_animation_image = r.i16(14);
            cell.tile_animation_frames = r.u8(23);
            cell.tile_animation_offset = r.i16(24);
            cell
        })
    }

    fn encode(grid: &Grid, _xor_key: u16) -> Vec<u8> {
        encode_records(grid, shanda_header(grid), Self::RECORD_LEN, |cell, w| {
            write_base(w, cell);
            w.i16(cell.tile_animation_image)
                .skip(7)
                .u8(cell.tile_animation_frames)
                .i16(cell.tile_animation_offset)
                .skip(14);
        })
    }
}
