//! Wemade's mir2 layouts: the classic headerless maps, the 2010 and antihack
//! maps with XOR obfuscated fields, and the heroes maps derived from them.
//!
//! None of these layouts carry background or middle libraries, so every
//! decoded cell reads from library 0 for the background and 1 for the
//! middle layer.

use super::{
    decode_records, encode_records, header, header_template, put_u16, stored_dimensions,
    MapFormat,
};
use crate::transform::{
    bias_index, pack_blocked, unbias_index, unpack_blocked, wemade2010_front_index,
    wemade2010_front_index_raw, xor_back_image, xor_i16,
};
use crate::util::{le_i16, le_u16, Record, Writer};
use crate::{Cell, Error, FormatTag, Grid};

const BACK_LIBRARY: i16 = 0;
const MIDDLE_LIBRARY: i16 = 1;
const FRONT_BIAS: i16 = 2;

const WEMADE_2010_TITLE: &[u8] = b"\x10Map 2010 Ver 1.0";
const ANTIHACK_TITLE: &[u8] = b"\x15Mir2 AntiHack Ver 1.0";
const HEROES_TITLE: &[u8] = b"\x0DLegend of mir";

/// Door, animation, front library and light bytes shared by every wemade
/// record, in stored order
fn read_tail(cell: &mut Cell, r: Record<'_>, at: usize) {
    cell.door_index = r.u8(at);
    cell.door_offset = r.u8(at + 1);
    cell.front_animation_frame = r.u8(at + 2);
    cell.front_animation_tick = r.u8(at + 3);
    cell.front_index = bias_index(r.u8(at + 4), FRONT_BIAS);
    cell.light = r.u8(at + 5);
}

fn write_tail(w: &mut Writer<'_>, cell: &Cell, front_index: u8) {
    w.u8(cell.door_index)
        .u8(cell.door_offset)
        .u8(cell.front_animation_frame)
        .u8(cell.front_animation_tick)
        .u8(front_index)
        .u8(cell.light);
}

fn wemade_cell() -> Cell {
    Cell {
        back_index: BACK_LIBRARY,
        middle_index: MIDDLE_LIBRARY,
        ..Cell::default()
    }
}

/// The original layout: dimensions at the start of a 52 byte header and
/// 12 byte records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicFormat;

impl ClassicFormat {
    const CELLS_START: usize = 52;
    const RECORD_LEN: usize = 12;
}

impl MapFormat for ClassicFormat {
    const TAG: FormatTag = FormatTag::Classic;

    fn file_size(width: usize, height: usize) -> usize {
        Self::CELLS_START + width * height * Self::RECORD_LEN
    }

    fn decode(data: &[u8]) -> Result<Grid, Error> {
        let head = header(data, 4, Self::TAG)?;
        let dims = (i32::from(le_i16(&head[0..])), i32::from(le_i16(&head[2..])));
        decode_records(
            data,
            Self::TAG,
            dims,
            Self::CELLS_START,
            Self::RECORD_LEN,
            |r| {
                let mut cell = wemade_cell();
                cell.back_image = unpack_blocked(i32::from(r.i16(0)));
                cell.middle_image = r.i16(2);
                cell.front_image = r.i16(4);
                read_tail(&mut cell, r, 6);
                cell
            },
        )
    }

    fn encode(grid: &Grid, _xor_key: u16) -> Vec<u8> {
        let (width, height) = stored_dimensions(grid);
        let mut head = header_template(Self::CELLS_START, &[]);
        put_u16(&mut head, 0, width);
        put_u16(&mut head, 2, height);
        encode_records(grid, head, Self::RECORD_LEN, |cell, w| {
            w.i16(pack_blocked(cell.back_image) as i16)
                .i16(cell.middle_image)
                .i16(cell.front_image);
            write_tail(w, cell, unbias_index(cell.front_index, FRONT_BIAS));
        })
    }
}

/// Wemade's 2010 layout. Dimensions and the middle/front images are XORed
/// with a per file key stored in the header, the 32 bit back image with a
/// fixed constant.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wemade2010Format;

impl Wemade2010Format {
    const DIMS_AT: usize = 21;
    const CELLS_START: usize = 54;
    const RECORD_LEN: usize = 15;
}

impl MapFormat for Wemade2010Format {
    const TAG: FormatTag = FormatTag::Wemade2010;

    fn file_size(width: usize, height: usize) -> usize {
        Self::CELLS_START + width * height * Self::RECORD_LEN
    }

    fn decode(data: &[u8]) -> Result<Grid, Error> {
        let head = header(data, Self::DIMS_AT + 6, Self::TAG)?;
        let (dims, key) = xored_dimensions(&head[Self::DIMS_AT..]);
        decode_records(
            data,
            Self::TAG,
            dims,
            Self::CELLS_START,
            Self::RECORD_LEN,
            |r| {
                let mut cell = wemade_cell();
                cell.back_image = xor_back_image(r.i32(0));
                cell.middle_image = xor_i16(r.i16(4), key);
                cell.front_image = xor_i16(r.i16(6), key);
                read_tail(&mut cell, r, 8);
                cell.front_index = wemade2010_front_index(r.u8(12));
                cell.unknown = r.u8(14);
                cell
            },
        )
    }

    fn encode(grid: &Grid, xor_key: u16) -> Vec<u8> {
        let mut head = header_template(Self::CELLS_START, WEMADE_2010_TITLE);
        put_xored_dimensions(&mut head, Self::DIMS_AT, stored_dimensions(grid), xor_key);
        encode_records(grid, head, Self::RECORD_LEN, |cell, w| {
            w.i32(xor_back_image(cell.back_image))
                .i16(xor_i16(cell.middle_image, xor_key))
                .i16(xor_i16(cell.front_image, xor_key));
            write_tail(w, cell, wemade2010_front_index_raw(cell.front_index));
            w.u8(cell.unknown);
        })
    }
}

/// Wemade's antihack layout used by the labyrinth maps: every image is XORed
/// with the per file key.
#[derive(Debug, Clone, Copy, Default)]
pub struct AntiHackFormat;

impl AntiHackFormat {
    const DIMS_AT: usize = 31;
    const CELLS_START: usize = 64;
    const RECORD_LEN: usize = 12;
}

impl MapFormat for AntiHackFormat {
    const TAG: FormatTag = FormatTag::AntiHack;

    fn file_size(width: usize, height: usize) -> usize {
        Self::CELLS_START + width * height * Self::RECORD_LEN
    }

    fn decode(data: &[u8]) -> Result<Grid, Error> {
        let head = header(data, Self::DIMS_AT + 6, Self::TAG)?;
        let (dims, key) = xored_dimensions(&head[Self::DIMS_AT..]);
        decode_records(
            data,
            Self::TAG,
            dims,
            Self::CELLS_START,
            Self::RECORD_LEN,
            |r| {
                let mut cell = wemade_cell();
                cell.back_image = unpack_blocked(i32::from(xor_i16(r.i16(0), key)));
                cell.middle_image = xor_i16(r.i16(2), key);
                cell.front_image = xor_i16(r.i16(4), key);
                read_tail(&mut cell, r, 6);
                cell
            },
        )
    }

    fn encode(grid: &Grid, xor_key: u16) -> Vec<u8> {
        let mut head = header_template(Self::CELLS_START, ANTIHACK_TITLE);
        put_xored_dimensions(&mut head, Self::DIMS_AT, stored_dimensions(grid), xor_key);
        encode_records(grid, head, Self::RECORD_LEN, |cell, w| {
            w.i16(xor_i16(pack_blocked(cell.back_image) as i16, xor_key))
                .i16(xor_i16(cell.middle_image, xor_key))
                .i16(xor_i16(cell.front_image, xor_key));
            write_tail(w, cell, unbias_index(cell.front_index, FRONT_BIAS));
        })
    }
}

/// The 3/4 heroes layout (myth/lifcos): the 2010 record shape without any
/// obfuscation.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeroesFormat;

impl HeroesFormat {
    const WIDTH_AT: usize = 21;
    const HEIGHT_AT: usize = 25;
    const CELLS_START: usize = 54;
    const RECORD_LEN: usize = 15;
}

impl MapFormat for HeroesFormat {
    const TAG: FormatTag = FormatTag::Heroes;

    fn file_size(width: usize, height: usize) -> usize {
        Self::CELLS_START + width * height * Self::RECORD_LEN
    }

    fn decode(data: &[u8]) -> Result<Grid, Error> {
        let head = header(data, Self::HEIGHT_AT + 2, Self::TAG)?;
        let dims = (
            i32::from(le_i16(&head[Self::WIDTH_AT..])),
            i32::from(le_i16(&head[Self::HEIGHT_AT..])),
        );
        decode_records(
            data,
            Self::TAG,
            dims,
            Self::CELLS_START,
            Self::RECORD_LEN,
            |r| {
                let mut cell = wemade_cell();
                cell.back_image = unpack_blocked(r.i32(0));
                cell.middle_image = r.i16(4);
                cell.front_image = r.i16(6);
                read_tail(&mut cell, r, 8);
                cell.unknown = r.u8(14);
                cell
            },
        )
    }

    fn encode(grid: &Grid, _xor_key: u16) -> Vec<u8> {
        let (width, height) = stored_dimensions(grid);
        let mut head = header_template(Self::CELLS_START, HEROES_TITLE);
        put_u16(&mut head, Self::WIDTH_AT, width);
        put_u16(&mut head, Self::HEIGHT_AT, height);
        encode_records(grid, head, Self::RECORD_LEN, |cell, w| {
            w.i32(pack_blocked(cell.back_image))
                .i16(cell.middle_image)
                .i16(cell.front_image);
            write_tail(w, cell, unbias_index(cell.front_index, FRONT_BIAS));
            w.u8(cell.unknown);
        })
    }
}

/// Width, key, height: returns the plain dimensions and the key
fn xored_dimensions(data: &[u8]) -> ((i32, i32), u16) {
    let key = le_u16(&data[2..]);
    let width = xor_i16(le_i16(&data[0..]), key);
    let height = xor_i16(le_i16(&data[4..]), key);
    ((i32::from(width), i32::from(height)), key)
}

fn put_xored_dimensions(head: &mut [u8], at: usize, (width, height): (u16, u16), key: u16) {
    put_u16(head, at, width ^ key);
    put_u16(head, at + 2, key);
    put_u16(head, at + 4, height ^ key);
}
