use crate::types::{scan_numbers, trim_padding};
use dicom_core::value::{PrimitiveValue, Value};
use dicom_core::Tag;
use dicom_object::mem::InMemElement;
use dicom_object::InMemDicomObject;
use std::borrow::Cow;
use std::fmt;

// Standard Tags
pub use dicom_dictionary_std::tags::{MANUFACTURER, MODALITY, NUMBER_OF_FRAMES, PIXEL_DATA};

/// Private creator reserving the echo series elements
pub const PHILIPS_US_IMAGING_DD_033: &str = "Philips US Imaging DD 033";

// Volume Layout Tags
pub const VOLUME_DATA_TYPE: Tag = Tag(0x200D, 0x2005);
pub const VOLUME_DIMENSIONS: Tag = Tag(0x200D, 0x3301);
pub const VOLUME_SPACING: Tag = Tag(0x200D, 0x3303);

// Multi-Volume Echo Series Tags
pub const ECHO_SERIES_SEQUENCE: Tag = Tag(0x200D, 0x3016);
pub const SERIES_DATA_TYPE: PrivateTag = PrivateTag::new(0x200D, 0x300D, PHILIPS_US_IMAGING_DD_033);
pub const SERIES_DETAILS_SEQUENCE: PrivateTag =
    PrivateTag::new(0x200D, 0x3020, PHILIPS_US_IMAGING_DD_033);
pub const SERIES_NUMBER_OF_FRAMES: PrivateTag =
    PrivateTag::new(0x200D, 0x3010, PHILIPS_US_IMAGING_DD_033);
pub const SERIES_FRAME_ALLOCATION_SIZE: PrivateTag =
    PrivateTag::new(0x200D, 0x3011, PHILIPS_US_IMAGING_DD_033);
pub const SERIES_FRAME_DATA: PrivateTag =
    PrivateTag::new(0x200D, 0x300E, PHILIPS_US_IMAGING_DD_033);

/// Private element addressed through its creator string
///
/// Only the low byte of `element` identifies the element; the high byte is
/// the block the scanner usually reserves, and is replaced by whichever block
/// the creator actually holds in the data set being searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivateTag {
    pub group: u16,
    pub element: u16,
    pub creator: &'static str,
}

impl PrivateTag {
    pub const fn new(group: u16, element: u16, creator: &'static str) -> Self {
        Self {
            group,
            element,
            creator,
        }
    }

    /// Resolves the concrete tag inside one data set
    ///
    /// Scans the reservation elements (gggg,0010)-(gggg,00FF) for the creator
    /// string. Returns `None` if the creator holds no block.
    pub fn resolve(&self, dcm: &InMemDicomObject) -> Option<Tag> {
        (0x0010u16..=0x00FF)
            .find(|block| {
                dcm.element(Tag(self.group, *block))
                    .ok()
                    .and_then(element_text)
                    .map(|creator| trim_padding(&creator) == self.creator)
                    .unwrap_or(false)
            })
            .map(|block| Tag(self.group, (block << 8) | (self.element & 0x00FF)))
    }
}

impl fmt::Display for PrivateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:04X},xx{:02X}) [{}]",
            self.group,
            self.element & 0x00FF,
            self.creator
        )
    }
}

/// Address of an element, either a plain tag or a creator-scoped private tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagAddress {
    Plain(Tag),
    Private(PrivateTag),
}

impl TagAddress {
    /// Resolves the address to a concrete tag inside one data set
    pub fn resolve(&self, dcm: &InMemDicomObject) -> Option<Tag> {
        match self {
            TagAddress::Plain(tag) => Some(*tag),
            TagAddress::Private(private) => private.resolve(dcm),
        }
    }
}

impl From<Tag> for TagAddress {
    fn from(tag: Tag) -> Self {
        TagAddress::Plain(tag)
    }
}

impl From<PrivateTag> for TagAddress {
    fn from(tag: PrivateTag) -> Self {
        TagAddress::Private(tag)
    }
}

impl fmt::Display for TagAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagAddress::Plain(tag) => write!(f, "({:04X},{:04X})", tag.group(), tag.element()),
            TagAddress::Private(private) => write!(f, "{}", private),
        }
    }
}

/// Looks up an element by plain or private address
pub fn find_element(dcm: &InMemDicomObject, addr: impl Into<TagAddress>) -> Option<&InMemElement> {
    let addr = addr.into();
    addr.resolve(dcm).and_then(|tag| dcm.element(tag).ok())
}

/// Returns the items of a sequence element
pub fn find_items(dcm: &InMemDicomObject, addr: impl Into<TagAddress>) -> Option<&[InMemDicomObject]> {
    find_element(dcm, addr).and_then(|elem| elem.items())
}

/// Decodes an element as text
///
/// Private elements read with an implicit VR arrive as raw bytes and are
/// decoded as UTF-8. Padding is left in place.
pub fn element_text(elem: &InMemElement) -> Option<String> {
    match elem.value() {
        Value::Primitive(PrimitiveValue::U8(bytes)) => {
            Some(String::from_utf8_lossy(&bytes[..]).into_owned())
        }
        Value::Primitive(_) => elem.to_str().ok().map(|s| s.into_owned()),
        _ => None,
    }
}

/// Decodes all numeric components of an element
///
/// Numbers stored as text (`LO`, `DS`, `IS` or raw bytes) are scanned out
/// of the string; binary numeric values are converted directly.
pub fn element_numbers(elem: &InMemElement) -> Option<Vec<f64>> {
    match elem.value() {
        Value::Primitive(PrimitiveValue::U8(_))
        | Value::Primitive(PrimitiveValue::Str(_))
        | Value::Primitive(PrimitiveValue::Strs(_)) => {
            element_text(elem).map(|text| scan_numbers(&text))
        }
        Value::Primitive(_) => elem.to_multi_float64().ok(),
        _ => None,
    }
}

/// Decodes an element as a single integer
pub fn element_int(elem: &InMemElement) -> Option<i64> {
    match elem.value() {
        Value::Primitive(PrimitiveValue::U8(_)) => element_text(elem)
            .and_then(|text| text.trim_matches([' ', '\0']).parse::<i64>().ok()),
        Value::Primitive(_) => elem.to_int::<i64>().ok(),
        _ => None,
    }
}

/// Returns the raw bytes of an element, borrowed when stored as bytes
pub fn element_bytes(elem: &InMemElement) -> Option<Cow<'_, [u8]>> {
    match elem.value() {
        Value::Primitive(PrimitiveValue::U8(bytes)) => Some(Cow::Borrowed(&bytes[..])),
        Value::Primitive(_) => elem.to_bytes().ok(),
        _ => None,
    }
}

/// Helper to get string value from a DICOM element
///
/// Returns `None` if the element is not present or cannot be converted to
/// string. Trailing padding is removed; leading characters are kept.
pub fn get_text_value(dcm: &InMemDicomObject, addr: impl Into<TagAddress>) -> Option<String> {
    find_element(dcm, addr)
        .and_then(element_text)
        .map(|s| trim_padding(&s).to_string())
}

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(element_text)
        .map(|s| s.trim_matches([' ', '\0']).to_string())
}

/// Helper to get integer value from a DICOM element
pub fn get_int_value(dcm: &InMemDicomObject, addr: impl Into<TagAddress>) -> Option<i64> {
    find_element(dcm, addr).and_then(element_int)
}

/// Helper to get all numeric components of a DICOM element
pub fn get_numbers(dcm: &InMemDicomObject, addr: impl Into<TagAddress>) -> Option<Vec<f64>> {
    find_element(dcm, addr).and_then(element_numbers)
}
