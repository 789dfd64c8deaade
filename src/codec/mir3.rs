//! Mir3 layouts. Both store zero based images, a 255 "no library" marker,
//! and a flag byte that carries the back and front blocking bits.

use super::{
    decode_records, encode_records, header, header_template, put_u16, stored_dimensions,
    MapFormat,
};
use crate::grid::check_dimensions;
use crate::transform::{
    apply_mir3_flags, mir3_back_image, mir3_back_image_raw, mir3_front_index, mir3_image,
    mir3_image_raw, mir3_index, mir3_index_raw, mir3_light, mir3_light_raw, split_mir3_flags,
};
use crate::util::{le_i16, Record, Writer};
use crate::{Cell, Error, FormatTag, Grid};

/// Clears the empty front placeholder, then folds the flag bits into the images
fn finish_cell(cell: &mut Cell, flag: u8) {
    cell.front_index = mir3_front_index(cell.front_index, cell.front_image);
    apply_mir3_flags(flag, &mut cell.back_image, &mut cell.front_image);
}

#[inline]
fn animation_frame(raw: u8) -> u8 {
    if raw == 255 {
        0
    } else {
        raw
    }
}

/// Wemade's mir3 layout. Back tiles are stored once per 2x2 square ahead of
/// the per cell records.
#[derive(Debug, Clone, Copy, Default)]
pub struct WemadeMir3Format;

impl WemadeMir3Format {
    const BIAS: i16 = 200;
    const CELLS_START: usize = 28;
    const BLOCK_LEN: usize = 3;
    const RECORD_LEN: usize = 14;

    /// Offset of the first per cell record. Odd widths reserve a block per
    /// row pair that is never read.
    fn records_start(width: usize, height: usize) -> usize {
        Self::CELLS_START + Self::BLOCK_LEN * (width / 2 + width % 2) * (height / 2)
    }

    /// Spreads each back tile block over its 2x2 square. Cells in an odd
    /// trailing row or column keep an empty back layer.
    fn read_back_layer(data: &[u8], width: usize, height: usize) -> Vec<(i16, i32)> {
        let mut backs = vec![(0i16, 0i32); width * height];
        let blocks = data[Self::CELLS_START..].chunks_exact(Self::BLOCK_LEN);
        let squares = (0..width / 2).flat_map(|bx| (0..height / 2).map(move |by| (bx, by)));
        for ((bx, by), block) in squares.zip(blocks) {
            let r = Record::new(block);
            let back = (
                mir3_index(r.u8(0), Self::BIAS),
                mir3_back_image(r.i16(1)),
            );
            for i in 0..4 {
                let (x, y) = (bx * 2 + i % 2, by * 2 + i / 2);
                backs[x * height + y] = back;
            }
        }
        backs
    }
}

impl MapFormat for WemadeMir3Format {
    const TAG: FormatTag = FormatTag::WemadeMir3;

    fn file_size(width: usize, height: usize) -> usize {
        Self::records_start(width, height) + width * height * Self::RECORD_LEN
    }

    fn decode(data: &[u8]) -> Result<Grid, Error> {
        let head = header(data, Self::CELLS_START, Self::TAG)?;
        let dims = (i32::from(le_i16(&head[24..])), i32::from(le_i16(&head[26..])));
        check_dimensions(Self::TAG, dims.0, dims.1)?;

        let (width, height) = (dims.0 as usize, dims.1 as usize);
        let expected = Self::file_size(width, height);
        if data.len() < expected {
            return Err(Error::truncated(Self::TAG, expected, data.len()));
        }

        let mut backs = Self::read_back_layer(data, width, height).into_iter();
        let start = Self::records_start(width, height);
        decode_records(data, Self::TAG, dims, start, Self::RECORD_LEN, |r| {
            let (back_index, back_image) = backs.next().unwrap_or_default();
            let mut cell = Cell {
                back_index,
                back_image,
                middle_animation_frame: r.u8(1),
                front_animation_frame: animation_frame(r.u8(2)) & 0x8F,
                front_index: mir3_index(r.u8(3), Self::BIAS),
                middle_index: mir3_index(r.u8(4), Self::BIAS),
                middle_image: mir3_image(r.i16(5)),
                front_image: mir3_image(r.i16(7)),
                light: mir3_light(r.u8(12)),
                ..Cell::default()
            };
            finish_cell(&mut cell, r.u8(0));
            cell
        })
    }

    fn encode(grid: &Grid, _xor_key: u16) -> Vec<u8> {
        let (width, height) = (grid.width(), grid.height());
        let (stored_width, stored_height) = stored_dimensions(grid);
        let mut head = header_template(Self::CELLS_START, &[]);
        put_u16(&mut head, 24, stored_width);
        put_u16(&mut head, 26, stored_height);

        let mut w = Writer::new(&mut head);
        for bx in 0..width / 2 {
            for by in 0..height / 2 {
                let cell = &grid.cells()[bx * 2 * height + by * 2];
                let (_, back_image, _) = split_mir3_flags(cell.back_image, cell.front_image);
                w.u8(mir3_index_raw(cell.back_index, Self::BIAS))
                    .i16(mir3_back_image_raw(back_image));
            }
        }
        head.resize(Self::records_start(width, height), 0);

        encode_records(grid, head, Self::RECORD_LEN, |cell, w| {
            let (flag, _, front_image) = split_mir3_flags(cell.back_image, cell.front_image);
            w.u8(flag)
                .u8(cell.middle_animation_frame)
                .u8(cell.front_animation_frame)
                .u8(mir3_index_raw(cell.front_index, Self::BIAS))
                .u8(mir3_index_raw(cell.middle_index, Self::BIAS))
                .i16(mir3_image_raw(cell.middle_image))
                .i16(mir3_image_raw(front_image))
                .skip(3)
                .u8(mir3_light_raw(cell.light))
                .skip(1);
        })
    }
}

/// Shanda's mir3 layout with a 40 byte titled header and 20 byte records
#[derive(Debug, Clone, Copy, Default)]
pub struct ShandaMir3Format;

impl ShandaMir3Format {
    const BIAS: i16 = 300;
    const CELLS_START: usize = 40;
    const RECORD_LEN: usize = 20;
    const TITLE: &'static [u8] = b"\x0F(C) SNDA, MIR3.";
}

impl MapFormat for ShandaMir3Format {
    const TAG: FormatTag = FormatTag::ShandaMir3;

    fn file_size(width: usize, height: usize) -> usize {
        Self::CELLS_START + width * height * Self::RECORD_LEN
    }

    fn decode(data: &[u8]) -> Result<Grid, Error> {
        let head = header(data, 20, Self::TAG)?;
        let dims = (i32::from(le_i16(&head[16..])), i32::from(le_i16(&head[18..])));
        decode_records(data, Self::TAG, dims, Self::CELLS_START, Self::RECORD_LEN, |r| {
            let mut front_animation_frame = animation_frame(r.u8(11));
            if front_animation_frame > 0x0F {
                front_animation_frame &= 0x0F;
            }

            let mut cell = Cell {
                back_index: mir3_index(r.u8(1), Self::BIAS),
                middle_index: mir3_index(r.u8(2), Self::BIAS),
                front_index: mir3_index(r.u8(3), Self::BIAS),
                back_image: mir3_back_image(r.i16(4)),
                middle_image: mir3_image(r.i16(6)),
                front_image: mir3_image(r.i16(8)),
                middle_animation_frame: r.u8(10),
                front_animation_frame,
                light: mir3_light(r.u8(12)),
                ..Cell::default()
            };
            finish_cell(&mut cell, r.u8(0));
            cell
        })
    }

    fn encode(grid: &Grid, _xor_key: u16) -> Vec<u8> {
        let (width, height) = stored_dimensions(grid);
        let mut head = header_template(Self::CELLS_START, Self::TITLE);
        put_u16(&mut head, 16, width);
        put_u16(&mut head, 18, height);

        encode_records(grid, head, Self::RECORD_LEN, |cell, w| {
            let (flag, back_image, front_image) =
                split_mir3_flags(cell.back_image, cell.front_image);
            w.u8(flag)
                .u8(mir3_index_raw(cell.back_index, Self::BIAS))
                .u8(mir3_index_raw(cell.middle_index, Self::BIAS))
                .u8(mir3_index_raw(cell.front_index, Self::BIAS))
                .i16(mir3_back_image_raw(back_image))
                .i16(mir3_image_raw(cell.middle_image))
                .i16(mir3_image_raw(front_image))
                .u8(cell.middle_animation_frame)
                .u8(cell.front_animation_frame)
                .u8(mir3_light_raw(cell.light))
                .skip(7);
        })
    }
}
