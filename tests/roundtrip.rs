use mirmap::transform::mir3_front_index;
use mirmap::{
    decode, encode, Cell, ErrorKind, FormatTag, Grid, MapEncoder, BLOCKED_BACK_IMAGE,
    BLOCKED_FRONT_IMAGE,
};
use rstest::*;

const LIGHTS: [u8; 5] = [0, 99, 100, 119, 120];

fn seed(x: usize, y: usize) -> u32 {
    (x as u32).wrapping_mul(7919) ^ (y as u32).wrapping_mul(104_729) ^ 0x9E37
}

fn maybe_blocked(image: i32, s: u32) -> i32 {
    if s % 3 == 0 {
        image | BLOCKED_BACK_IMAGE
    } else {
        image
    }
}

fn mir3_library(raw: u8, bias: i16, s: u32) -> i16 {
    if s % 7 == 0 {
        -1
    } else {
        bias + i16::from(raw)
    }
}

/// A cell holding only values the given layout can store
fn cell_for(format: FormatTag, x: usize, y: usize, width: usize, height: usize) -> Cell {
    let i = x * height + y;
    let s = seed(x, y);
    let raw = (s % 255) as u8;
    let image = (s % 0x8000) as i32;
    let wide = (s >> 3) as i16;

    let mut cell = Cell {
        light: LIGHTS[i % LIGHTS.len()],
        ..Cell::default()
    };

    match format {
        FormatTag::Classic | FormatTag::AntiHack | FormatTag::Wemade2010 | FormatTag::Heroes => {
            cell.back_index = 0;
            cell.middle_index = 1;
            cell.back_image = maybe_blocked(image, s);
            cell.middle_image = wide;
            cell.front_image = wide.wrapping_mul(3);
            cell.door_index = raw;
            cell.door_offset = raw / 2;
            cell.front_animation_frame = raw / 3;
            cell.front_animation_tick = raw / 5;
            cell.front_index = 2 + i16::from(raw);

            if format == FormatTag::Wemade2010 {
                cell.back_image = s.wrapping_mul(2_654_435_761) as i32;
                if cell.front_index == 102 {
                    cell.front_index = 90;
                }
            }

            if matches!(format, FormatTag::Wemade2010 | FormatTag::Heroes) {
                cell.unknown = raw / 7;
            }
        }
        FormatTag::ShandaOld | FormatTag::ShandaExtended => {
            cell.back_index = 100 + i16::from(raw);
            cell.middle_index = 110 + i16::from(raw / 2);
            cell.front_index = 120 + i16::from(raw / 3);
            cell.back_image = maybe_blocked(image, s);
            cell.middle_image = wide;
            cell.front_image = wide.wrapping_add(11);
            cell.door_index = raw / 4;
            cell.door_offset = raw / 5;
            cell.front_animation_frame = raw / 6;
            cell.front_animation_tick = raw / 7;

            if format == FormatTag::ShandaExtended {
                cell.tile_animation_image = wide.wrapping_mul(5);
                cell.tile_animation_frames = raw / 8;
                cell.tile_animation_offset = wide / 2;
            }
        }
        FormatTag::WemadeMir3 => {
            let (sx, sy) = (x / 2 * 2, y / 2 * 2);
            if sx + 1 < width && sy + 1 < height {
                let square = seed(sx, sy);
                cell.back_index = mir3_library((square % 255) as u8, 200, square);
                cell.back_image = (square % 0x8000) as i32;
            }
            cell.back_image = maybe_blocked(cell.back_image, s);
            fill_mir3(&mut cell, raw, s, 200);
            cell.front_animation_frame = raw & 0x8F;
        }
        FormatTag::ShandaMir3 => {
            cell.back_index = mir3_library(raw / 2, 300, s / 2);
            cell.back_image = maybe_blocked(image, s);
            fill_mir3(&mut cell, raw, s, 300);
            cell.front_animation_frame = raw & 0x0F;
        }
        FormatTag::Native => {
            cell.back_index = wide;
            cell.back_image = s as i32;
            cell.middle_index = wide.wrapping_neg();
            cell.middle_image = wide.wrapping_add(1);
            cell.front_index = wide.wrapping_add(2);
            cell.front_image = wide.wrapping_add(3);
            cell.door_index = raw;
            cell.door_offset = raw / 2;
            cell.front_animation_frame = raw / 3;
            cell.front_animation_tick = raw / 4;
            cell.middle_animation_frame = raw / 5;
            cell.middle_animation_tick = raw / 6;
            cell.tile_animation_image = wide.wrapping_mul(7);
            cell.tile_animation_offset = wide / 3;
            cell.tile_animation_frames = raw / 7;
        }
    }

    cell
}

fn fill_mir3(cell: &mut Cell, raw: u8, s: u32, bias: i16) {
    cell.middle_index = mir3_library(raw / 3, bias, s / 3);
    cell.front_index = mir3_library(raw / 5, bias, s / 5);
    cell.middle_image = (s >> 5) as i16;
    cell.front_image = (s % 0x8000) as i16;
    cell.front_index = mir3_front_index(cell.front_index, cell.front_image);
    if s % 4 == 1 {
        cell.front_image = (cell.front_image as u16 | BLOCKED_FRONT_IMAGE) as i16;
    }
    cell.middle_animation_frame = raw;
    cell.light = ((s % 16) * 4) as u8;
}

fn sample_grid(format: FormatTag, width: u32, height: u32) -> Grid {
    let (w, h) = (width as usize, height as usize);
    let cells = (0..w * h)
        .map(|i| cell_for(format, i / h, i % h, w, h))
        .collect();
    Grid::from_cells(width, height, format, cells).unwrap()
}

#[rstest]
fn round_trip(
    #[values(
        FormatTag::Classic,
        FormatTag::Wemade2010,
        FormatTag::ShandaOld,
        FormatTag::ShandaExtended,
        FormatTag::AntiHack,
        FormatTag::WemadeMir3,
        FormatTag::ShandaMir3,
        FormatTag::Heroes,
        FormatTag::Native
    )]
    format: FormatTag,
    #[values((1, 1), (4, 6), (5, 3), (7, 8))] dims: (u32, u32),
) {
    let grid = sample_grid(format, dims.0, dims.1);
    let data = MapEncoder::new().xor_key(0x3C5A).encode(&grid).unwrap();
    assert_eq!(data.len(), format.file_size(grid.width(), grid.height()));
    assert_eq!(decode(&data).unwrap(), grid);
}

#[rstest]
#[case(FormatTag::Wemade2010)]
#[case(FormatTag::AntiHack)]
fn xor_key_does_not_leak_into_cells(#[case] format: FormatTag) {
    let grid = sample_grid(format, 6, 6);
    let a = MapEncoder::new().xor_key(0x0000).encode(&grid).unwrap();
    let b = MapEncoder::new().xor_key(0xA5C3).encode(&grid).unwrap();
    assert_ne!(a, b);
    assert_eq!(decode(&a).unwrap(), decode(&b).unwrap());
}

#[rstest]
#[case(FormatTag::Classic, 52, 2)]
#[case(FormatTag::ShandaOld, 52, 2)]
#[case(FormatTag::ShandaExtended, 52, 2)]
#[case(FormatTag::AntiHack, 64, 2)]
#[case(FormatTag::Heroes, 54, 4)]
fn blocked_back_image_uses_legacy_bit(
    #[case] format: FormatTag,
    #[case] start: usize,
    #[case] width: usize,
) {
    let mut grid = Grid::new(1, 1, format).unwrap();
    grid[(0, 0)] = cell_for(format, 0, 0, 1, 1);
    grid[(0, 0)].back_image = BLOCKED_BACK_IMAGE | 0x0321;

    let data = MapEncoder::new().xor_key(0).encode(&grid).unwrap();
    let stored = &data[start..start + width];
    assert_eq!(stored[0], 0x21);
    assert_eq!(stored[1], 0x83);
    assert!(stored[2..].iter().all(|&b| b == 0));

    let decoded = decode(&data).unwrap();
    assert!(decoded[(0, 0)].is_blocked());
    assert_eq!(decoded, grid);
}

#[test]
fn convert_between_layouts() {
    let grid = sample_grid(FormatTag::ShandaOld, 4, 4);
    let data = MapEncoder::new()
        .format(FormatTag::Native)
        .encode(&grid)
        .unwrap();
    let native = decode(&data).unwrap();
    assert_eq!(native.format(), FormatTag::Native);
    assert_eq!(native.cells(), grid.cells());
}

#[test]
fn legacy_layouts_drop_unstored_fields() {
    let mut grid = Grid::new(2, 2, FormatTag::Classic).unwrap();
    for cell in grid.cells_mut() {
        cell.middle_index = 1;
        cell.front_index = 2;
        cell.middle_animation_tick = 9;
        cell.tile_animation_frames = 3;
        cell.unknown = 4;
    }

    let decoded = decode(&encode(&grid).unwrap()).unwrap();
    for cell in decoded.cells() {
        assert_eq!(cell.middle_animation_tick, 0);
        assert_eq!(cell.tile_animation_frames, 0);
        assert_eq!(cell.unknown, 0);
    }
}

#[test]
fn empty_buffer_is_default_grid() {
    let grid = decode(&[]).unwrap();
    assert_eq!(grid, Grid::default());
    assert_eq!(grid.cells().len(), 1_000_000);
    assert!(grid.cells().iter().all(|c| *c == Cell::default()));
}

#[test]
fn truncated_input_reports_sizes() {
    let grid = sample_grid(FormatTag::Heroes, 3, 3);
    let data = encode(&grid).unwrap();
    let err = decode(&data[..data.len() - 5]).unwrap_err();
    match err.kind() {
        ErrorKind::Truncated {
            format,
            expected,
            actual,
        } => {
            assert_eq!(*format, FormatTag::Heroes);
            assert_eq!(*expected, data.len());
            assert_eq!(*actual, data.len() - 5);
        }
        x => panic!("unexpected error: {:?}", x),
    }
    assert_eq!(err.offset(), Some(data.len() - 5));
}

#[cfg(feature = "derive")]
#[rstest]
#[case(r#"{"width":2,"height":2,"format":"Native","cells":[]}"#)]
#[case(r#"{"width":1,"height":0,"format":"Native","cells":[{}]}"#)]
fn deserialized_grid_is_checked(#[case] json: &str) {
    assert!(serde_json::from_str::<Grid>(json).is_err());
}

#[cfg(feature = "derive")]
#[test]
fn deserialized_grid_keeps_its_cells_reachable() {
    let json = serde_json::to_string(&sample_grid(FormatTag::Native, 2, 2)).unwrap();
    let grid: Grid = serde_json::from_str(&json).unwrap();
    assert!(mirmap::validate(&grid));
    assert_eq!(grid.iter().count(), 4);
    assert!(grid.get(1, 1).is_some());
    assert!(encode(&grid).is_ok());
}

#[cfg(feature = "derive")]
#[test]
fn grid_json_round_trip() {
    let grid = sample_grid(FormatTag::ShandaMir3, 3, 2);
    let json = serde_json::to_string(&grid).unwrap();
    let back: Grid = serde_json::from_str(&json).unwrap();
    assert_eq!(back, grid);
}
