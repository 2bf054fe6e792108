//! Channel order labels.
//!
//! A [`ChannelOrder`] names the channels of a [`crate::PixelBuffer`] in storage
//! order, one letter per channel: `RGB`, `BGR`, `YUV`, `RGBA`, `Y`, ...
//!
//! Labels are normalized on construction: the first four characters are
//! upper-cased and the rest is NUL padded. Two orders compare equal exactly
//! when their labels match case-insensitively on those four characters.
//!
//! ```rust
//! use soq_core::ChannelOrder;
//!
//! let a = ChannelOrder::parse("bgr");
//! let b: ChannelOrder = "BGR".parse().unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.tag(0), 'B');
//! assert_eq!(a.len(), 3);
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::MAX_CHANNELS;

/// Normalized channel order label (at most four ASCII tags).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelOrder([u8; MAX_CHANNELS]);

impl ChannelOrder {
    /// Single luma channel.
    pub const Y: Self = Self(*b"Y\0\0\0");
    /// Luma plus alpha.
    pub const YA: Self = Self(*b"YA\0\0");
    /// Red, green, blue.
    pub const RGB: Self = Self(*b"RGB\0");
    /// Blue, green, red.
    pub const BGR: Self = Self(*b"BGR\0");
    /// Luma, blue-difference chroma, red-difference chroma.
    pub const YUV: Self = Self(*b"YUV\0");
    /// Red, green, blue, alpha.
    pub const RGBA: Self = Self(*b"RGBA");
    /// Blue, green, red, alpha.
    pub const BGRA: Self = Self(*b"BGRA");

    /// Normalizes a label: first four characters, upper-cased, NUL padded.
    ///
    /// Characters outside ASCII are stored as `?`.
    pub fn parse(label: &str) -> Self {
        let mut tags = [0u8; MAX_CHANNELS];
        for (slot, ch) in tags.iter_mut().zip(label.chars()) {
            *slot = if ch.is_ascii() && ch != '\0' {
                ch.to_ascii_uppercase() as u8
            } else {
                b'?'
            };
        }
        Self(tags)
    }

    /// Default order for a decoded image with `channels` channels.
    ///
    /// Returns `None` outside 1..=4.
    pub fn standard(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(Self::Y),
            2 => Some(Self::YA),
            3 => Some(Self::RGB),
            4 => Some(Self::RGBA),
            _ => None,
        }
    }

    /// Number of tags in the label.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.iter().position(|&b| b == 0).unwrap_or(MAX_CHANNELS)
    }

    /// Returns `true` for the empty label.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }

    /// Tag of channel `index`, or `?` when the label is shorter.
    #[inline]
    pub fn tag(&self, index: usize) -> char {
        match self.0.get(index) {
            Some(&b) if b != 0 => b as char,
            _ => '?',
        }
    }

    /// Iterates over the tags in storage order.
    pub fn tags(&self) -> impl Iterator<Item = char> + '_ {
        self.0[..self.len()].iter().map(|&b| b as char)
    }

    /// Position of `tag` within the label (case-insensitive).
    pub fn position(&self, tag: char) -> Option<usize> {
        let tag = tag.to_ascii_uppercase();
        self.tags().position(|t| t == tag)
    }
}

impl FromStr for ChannelOrder {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for ChannelOrder {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tag in self.tags() {
            write!(f, "{tag}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChannelOrder({self})")
    }
}
