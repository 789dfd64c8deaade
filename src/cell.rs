use std::ops::RangeInclusive;

/// Light values that mark a cell as a fishing zone
pub const FISHING_LIGHT: RangeInclusive<u8> = 100..=119;

/// Back image bit that marks a cell as blocked for movement
pub const BLOCKED_BACK_IMAGE: i32 = 0x2000_0000;

/// Front image bit that marks the front tile as blocking in mir3 maps
pub const BLOCKED_FRONT_IMAGE: u16 = 0x8000;

/// Returns true if the light value is within the fishing zone range
///
/// ```
/// use mirmap::is_fishing_zone;
///
/// assert!(!is_fishing_zone(99));
/// assert!(is_fishing_zone(100));
/// assert!(is_fishing_zone(119));
/// assert!(!is_fishing_zone(120));
/// ```
#[inline]
pub fn is_fishing_zone(light: u8) -> bool {
    FISHING_LIGHT.contains(&light)
}

/// Everything a single map position holds: three tile layers, door and
/// animation state, and the light level.
///
/// The `*_index` fields select a tile library while the `*_image` fields
/// select an image within that library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub back_index: i16,

    /// Background image. [`BLOCKED_BACK_IMAGE`] is folded into this field
    pub back_image: i32,

    pub middle_index: i16,
    pub middle_image: i16,
    pub front_index: i16,

    /// Front image. Mir3 maps fold [`BLOCKED_FRONT_IMAGE`] into this field
    pub front_image: i16,

    /// Door number, zero when there is no door
    pub door_index: u8,
    pub door_offset: u8,

    pub front_animation_frame: u8,
    pub front_animation_tick: u8,
    pub middle_animation_frame: u8,
    pub middle_animation_tick: u8,

    pub tile_animation_image: i16,
    pub tile_animation_offset: i16,
    pub tile_animation_frames: u8,

    /// 0 is unlit, 1 to 99 is intensity and [`FISHING_LIGHT`] marks fishing
    pub light: u8,

    /// Reserved byte carried by some of the legacy formats
    pub unknown: u8,
}

impl Cell {
    /// Returns true if this cell's light marks it as a fishing zone
    #[inline]
    pub fn is_fishing_zone(&self) -> bool {
        is_fishing_zone(self.light)
    }

    /// Returns true if the back image carries the blocked flag
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.back_image & BLOCKED_BACK_IMAGE != 0
    }

    /// Returns true if the front image carries the mir3 blocking flag
    #[inline]
    pub fn is_front_blocked(&self) -> bool {
        (self.front_image as u16) & BLOCKED_FRONT_IMAGE != 0
    }

    /// Returns true if the cell holds a door
    #[inline]
    pub fn has_door(&self) -> bool {
        self.door_index != 0
    }
}
