use crate::{Error, ErrorKind};
use std::fmt;

/// Buffers shorter than this are never inspected and read as [`FormatTag::Classic`]
pub const SIGNATURE_LEN: usize = 20;

/// The map layouts that can be detected and decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "derive", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatTag {
    /// The original headerless wemade mir2 layout
    Classic,

    /// Wemade's 2010 layout, title starts with `Map 2010 Ver 1.0`
    Wemade2010,

    /// Shanda's older mir2 layout, shares its header with `ShandaExtended`
    ShandaOld,

    /// Shanda's 2012 layout with tile animation data
    ShandaExtended,

    /// Wemade's antihack layout (labyrinth maps), title starts with `Mir2 AntiHack`
    AntiHack,

    /// Wemade mir3 maps, which start with blank bytes
    WemadeMir3,

    /// Shanda mir3 maps, titled `(C) SNDA, MIR3.`
    ShandaMir3,

    /// The 3/4 heroes layout (myth/lifcos)
    Heroes,

    /// The lossless layout tagged with `C#`
    Native,
}

impl FormatTag {
    /// Every format, ordered by tag value
    pub const ALL: [FormatTag; 9] = [
        FormatTag::Classic,
        FormatTag::Wemade2010,
        FormatTag::ShandaOld,
        FormatTag::ShandaExtended,
        FormatTag::AntiHack,
        FormatTag::WemadeMir3,
        FormatTag::ShandaMir3,
        FormatTag::Heroes,
        FormatTag::Native,
    ];

    /// Creates a format from its numeric tag
    pub fn new(tag: u16) -> Option<FormatTag> {
        match tag {
            0 => Some(FormatTag::Classic),
            1 => Some(FormatTag::Wemade2010),
            2 => Some(FormatTag::ShandaOld),
            3 => Some(FormatTag::ShandaExtended),
            4 => Some(FormatTag::AntiHack),
            5 => Some(FormatTag::WemadeMir3),
            6 => Some(FormatTag::ShandaMir3),
            7 => Some(FormatTag::Heroes),
            100 => Some(FormatTag::Native),
            _ => None,
        }
    }

    /// Returns the numeric tag of this format
    pub fn value(&self) -> u16 {
        match self {
            FormatTag::Classic => 0,
            FormatTag::Wemade2010 => 1,
            FormatTag::ShandaOld => 2,
            FormatTag::ShandaExtended => 3,
            FormatTag::AntiHack => 4,
            FormatTag::WemadeMir3 => 5,
            FormatTag::ShandaMir3 => 6,
            FormatTag::Heroes => 7,
            FormatTag::Native => 100,
        }
    }

    /// Short human readable name
    pub fn name(&self) -> &'static str {
        match self {
            FormatTag::Classic => "classic",
            FormatTag::Wemade2010 => "wemade-2010",
            FormatTag::ShandaOld => "shanda-old",
            FormatTag::ShandaExtended => "shanda-ext",
            FormatTag::AntiHack => "antihack",
            FormatTag::WemadeMir3 => "wemade-mir3",
            FormatTag::ShandaMir3 => "shanda-mir3",
            FormatTag::Heroes => "heroes",
            FormatTag::Native => "native",
        }
    }

    /// Returns true if encoding this format consumes an XOR key
    pub fn is_obfuscated(&self) -> bool {
        matches!(self, FormatTag::Wemade2010 | FormatTag::AntiHack)
    }
}

impl TryFrom<u16> for FormatTag {
    type Error = Error;

    fn try_from(tag: u16) -> Result<Self, Self::Error> {
        FormatTag::new(tag).ok_or_else(|| Error::new(ErrorKind::UnsupportedFormat(tag)))
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.value())
    }
}

/// Identifies the map format of a buffer from its leading bytes
///
/// The signatures are tested in a fixed order and the first match wins. The
/// two shanda layouts share a header and are told apart by whether the
/// buffer is larger than the older layout's 14 byte records would need.
///
/// ```
/// use mirmap::{detect, FormatTag};
///
/// assert_eq!(detect(b"short"), FormatTag::Classic);
///
/// let mut data = [0xffu8; 32];
/// data[2] = b'C';
/// data[3] = b'#';
/// assert_eq!(detect(&data), FormatTag::Native);
/// ```
pub fn detect(data: &[u8]) -> FormatTag {
    let b = match data.first_chunk::<SIGNATURE_LEN>() {
        Some(b) => b,
        None => return FormatTag::Classic,
    };

    if b[2] == 0x43 && b[3] == 0x23 {
        FormatTag::Native
    } else if b[0] == 0 {
        FormatTag::WemadeMir3
    } else if b[0] == 0x0F && b[5] == 0x53 && b[14] == 0x33 {
        FormatTag::ShandaMir3
    } else if b[0] == 0x15 && b[4] == 0x32 && b[6] == 0x41 && b[19] == 0x31 {
        FormatTag::AntiHack
    } else if b[0] == 0x10 && b[2] == 0x61 && b[7] == 0x31 && b[14] == 0x31 {
        FormatTag::Wemade2010
    } else if b[4] == 0x0F && b[18] == 0x0D && b[19] == 0x0A {
        let width = u64::from(u16::from_le_bytes([b[0], b[1]]));
        let height = u64::from(u16::from_le_bytes([b[2], b[3]]));
        if data.len() as u64 > 52 + width * height * 14 {
            FormatTag::ShandaExtended
        } else {
            FormatTag::ShandaOld
        }
    } else if b[0] == 0x0D && b[1] == 0x4C && b[7] == 0x20 && b[11] == 0x6D {
        FormatTag::Heroes
    } else {
        FormatTag::Classic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use rstest::*;

    fn signature(pairs: &[(usize, u8)]) -> Vec<u8> {
        let mut data = vec![0xffu8; 64];
        for &(i, b) in pairs {
            data[i] = b;
        }
        data
    }

    #[rstest]
    #[case(&[(2, 0x43), (3, 0x23)], FormatTag::Native)]
    #[case(&[(0, 0x00)], FormatTag::WemadeMir3)]
    #[case(&[(0, 0x0F), (5, 0x53), (14, 0x33)], FormatTag::ShandaMir3)]
    #[case(&[(0, 0x15), (4, 0x32), (6, 0x41), (19, 0x31)], FormatTag::AntiHack)]
    #[case(&[(0, 0x10), (2, 0x61), (7, 0x31), (14, 0x31)], FormatTag::Wemade2010)]
    #[case(&[(0, 0x0D), (1, 0x4C), (7, 0x20), (11, 0x6D)], FormatTag::Heroes)]
    #[case(&[], FormatTag::Classic)]
    fn test_signatures(#[case] pairs: &[(usize, u8)], #[case] expected: FormatTag) {
        assert_eq!(detect(&signature(pairs)), expected);
    }

    #[test]
    fn test_native_wins_over_blank_start() {
        let data = signature(&[(0, 0x00), (2, 0x43), (3, 0x23)]);
        assert_eq!(detect(&data), FormatTag::Native);
    }

    #[test]
    fn test_shanda_size_tie_break() {
        let (w, h) = (3u16, 2u16);
        let exact = 52 + usize::from(w) * usize::from(h) * 14;
        let mut data = vec![0x01u8; exact];
        data[0..2].copy_from_slice(&w.to_le_bytes());
        data[2..4].copy_from_slice(&h.to_le_bytes());
        data[4] = 0x0F;
        data[18] = 0x0D;
        data[19] = 0x0A;
        assert_eq!(detect(&data), FormatTag::ShandaOld);

        data.push(0);
        assert_eq!(detect(&data), FormatTag::ShandaExtended);
    }

    #[quickcheck]
    fn short_buffers_are_classic(data: Vec<u8>) -> bool {
        let len = data.len().min(SIGNATURE_LEN - 1);
        detect(&data[..len]) == FormatTag::Classic
    }

    #[test]
    fn test_tag_values_round_trip() {
        for tag in FormatTag::ALL {
            assert_eq!(FormatTag::new(tag.value()), Some(tag));
        }
        assert_eq!(FormatTag::new(8), None);
        assert_eq!(FormatTag::new(99), None);
    }

    #[test]
    fn test_try_from_unsupported() {
        assert_eq!(FormatTag::try_from(6).unwrap(), FormatTag::ShandaMir3);
        let err = FormatTag::try_from(9).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnsupportedFormat(9)));
    }
}
