//! Bit and byte level value transforms shared by the map codecs.
//!
//! Each legacy layout stores a cell's fields with its own biases, masks, and
//! obfuscation. The functions here convert a single stored value into its
//! in-memory form (and back) so the codecs stay declarative.

use crate::cell::{BLOCKED_BACK_IMAGE, BLOCKED_FRONT_IMAGE};

/// Legacy 16 bit back image flag for a blocked cell
pub const LEGACY_BLOCKED: i32 = 0x8000;

/// Fixed XOR applied to the 32 bit back image of the 2010 layout
pub const BACK_IMAGE_XOR: u32 = 0xAA38_AA38;

/// Stored library byte meaning "no library" in mir3 maps
pub const MIR3_EMPTY_INDEX: u8 = 255;

/// Folds the legacy 16 bit blocked flag into [`BLOCKED_BACK_IMAGE`]
///
/// ```
/// use mirmap::transform::unpack_blocked;
///
/// assert_eq!(unpack_blocked(0x8005), 0x2000_0005);
/// assert_eq!(unpack_blocked(i32::from(0x8005u16 as i16)), 0x2000_0005);
/// assert_eq!(unpack_blocked(0x0005), 0x0005);
/// ```
#[inline]
pub fn unpack_blocked(value: i32) -> i32 {
    if value & LEGACY_BLOCKED != 0 {
        (value & 0x7FFF) | BLOCKED_BACK_IMAGE
    } else {
        value
    }
}

/// Inverse of [`unpack_blocked`]
#[inline]
pub fn pack_blocked(value: i32) -> i32 {
    if value & BLOCKED_BACK_IMAGE != 0 {
        (value & 0x7FFF) | LEGACY_BLOCKED
    } else {
        value
    }
}

/// Applies a 16 bit XOR key to a stored signed field
#[inline]
pub fn xor_i16(value: i16, key: u16) -> i16 {
    ((value as u16) ^ key) as i16
}

/// Applies the fixed 2010 back image XOR. The transform is its own inverse.
#[inline]
pub fn xor_back_image(value: i32) -> i32 {
    ((value as u32) ^ BACK_IMAGE_XOR) as i32
}

/// Adds a library bias to a stored library byte
#[inline]
pub fn bias_index(raw: u8, bias: i16) -> i16 {
    i16::from(raw).wrapping_add(bias)
}

/// Inverse of [`bias_index`]. Libraries outside `bias..=bias + 255` clamp to
/// the nearest storable byte.
///
/// ```
/// use mirmap::transform::unbias_index;
///
/// assert_eq!(unbias_index(7, 2), 5);
/// assert_eq!(unbias_index(0, 2), 0);
/// assert_eq!(unbias_index(400, 100), 255);
/// ```
#[inline]
pub fn unbias_index(index: i16, bias: i16) -> u8 {
    index.saturating_sub(bias).clamp(0, 255) as u8
}

/// Mir3 library byte: [`MIR3_EMPTY_INDEX`] is -1, anything else is biased
#[inline]
pub fn mir3_index(raw: u8, bias: i16) -> i16 {
    if raw == MIR3_EMPTY_INDEX {
        -1
    } else {
        bias_index(raw, bias)
    }
}

/// Inverse of [`mir3_index`]. Libraries outside `bias..=bias + 254` clamp
/// to the nearest storable byte, never to [`MIR3_EMPTY_INDEX`].
#[inline]
pub fn mir3_index_raw(index: i16, bias: i16) -> u8 {
    if index == -1 {
        MIR3_EMPTY_INDEX
    } else {
        index
            .saturating_sub(bias)
            .clamp(0, i16::from(MIR3_EMPTY_INDEX) - 1) as u8
    }
}

/// Mir3 images are stored zero based
#[inline]
pub fn mir3_image(raw: i16) -> i16 {
    raw.wrapping_add(1)
}

/// Inverse of [`mir3_image`]
#[inline]
pub fn mir3_image_raw(image: i16) -> i16 {
    image.wrapping_sub(1)
}

/// Mir3 back images are 32 bit once loaded, so the zero based offset is
/// added after widening
///
/// ```
/// use mirmap::transform::mir3_back_image;
///
/// assert_eq!(mir3_back_image(0x7FFF), 32768);
/// assert_eq!(mir3_back_image(-1), 0);
/// ```
#[inline]
pub fn mir3_back_image(raw: i16) -> i32 {
    i32::from(raw) + 1
}

/// Inverse of [`mir3_back_image`]
#[inline]
pub fn mir3_back_image_raw(image: i32) -> i16 {
    image.wrapping_sub(1) as i16
}

/// Mir3 light keeps the low nibble and scales it up
#[inline]
pub fn mir3_light(raw: u8) -> u8 {
    (raw & 0x0F) * 4
}

/// Inverse of [`mir3_light`]
#[inline]
pub fn mir3_light_raw(light: u8) -> u8 {
    (light / 4) & 0x0F
}

/// 2010 front library: the usual `+2` bias, with library 102 read as 90
#[inline]
pub fn wemade2010_front_index(raw: u8) -> i16 {
    match bias_index(raw, 2) {
        102 => 90,
        x => x,
    }
}

/// Inverse of [`wemade2010_front_index`]
#[inline]
pub fn wemade2010_front_index_raw(index: i16) -> u8 {
    let index = if index == 90 { 102 } else { index };
    unbias_index(index, 2)
}

/// Mir3 flag byte: bit 0 clear blocks the back tile, bit 1 clear blocks the
/// front tile
#[inline]
pub fn apply_mir3_flags(flag: u8, back_image: &mut i32, front_image: &mut i16) {
    if flag & 0x01 == 0 {
        *back_image |= BLOCKED_BACK_IMAGE;
    }

    if flag & 0x02 == 0 {
        *front_image = ((*front_image as u16) | BLOCKED_FRONT_IMAGE) as i16;
    }
}

/// Inverse of [`apply_mir3_flags`]: returns the flag byte and the images with
/// their flag bits cleared
#[inline]
pub fn split_mir3_flags(back_image: i32, front_image: i16) -> (u8, i32, i16) {
    let mut flag = 0;
    if back_image & BLOCKED_BACK_IMAGE == 0 {
        flag |= 0x01;
    }

    if (front_image as u16) & BLOCKED_FRONT_IMAGE == 0 {
        flag |= 0x02;
    }

    let back = back_image & !BLOCKED_BACK_IMAGE;
    let front = ((front_image as u16) & !BLOCKED_FRONT_IMAGE) as i16;
    (flag, back, front)
}

/// A front tile pointing at image 1 of library 200 is an empty placeholder
#[inline]
pub fn mir3_front_index(front_index: i16, front_image: i16) -> i16 {
    if front_image == 1 && front_index == 200 {
        -1
    } else {
        front_index
    }
}
