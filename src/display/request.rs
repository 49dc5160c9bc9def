use super::error::Error;

use std::slice;
use std::mem;
use std::ptr;


// https://xcb.freedesktop.org/manual/xproto_8h_source.html

#[repr(packed, C)]
pub struct SetupRequest {
    endian: u8,
    pad0: u8,
    major_version: u16,
    minor_version: u16,
    name_len: u16,
    data_len: u16,
    pad1: [u8; 2],
}

impl SetupRequest {
    pub fn new(endian: u8, major_version: u16, minor_version: u16, name_len: u16, data_len: u16) -> SetupRequest {
        SetupRequest {
            endian,
            pad0: 0,
            major_version,
            minor_version,
            name_len,
            data_len,
            pad1: [0; 2],
        }
    }
}

#[repr(packed, C)]
#[derive(Debug)]
pub struct SetupResponse {
    pub status: u8,
    pub reason_len: u8,
    pub major_version: u16,
    pub minor_version: u16,
    pub length: u16,
}

#[repr(packed, C)]
#[derive(Debug, Default)]
pub struct SuccessResponse {
    pub release_number: u32,
    pub resource_id_base: u32,
    pub resource_id_mask: u32,
    pub motion_buffer_size: u32,
    pub vendor_len: u16,
    pub maximum_request_len: u16,
    pub roots_len: u8,
    pub pixmap_formats_len: u8,
    pub image_byte_order: u8,
    pub bitmap_format_bit_order: u8,
    pub bitmap_format_scanline_unit: u8,
    pub bitmap_format_scanline_pad: u8,
    pub min_keycode: u8,
    pub max_keycode: u8,
    pub padding: [u8; 4],
}

#[repr(packed, C)]
#[derive(Debug)]
pub struct PixmapFormat {
    depth: u8,
    bits_per_pixel: u8,
    scanline_pad: u8,
    padding: [u8; 5],
}

#[repr(packed, C)]
#[derive(Debug, Clone)]
pub struct ScreenResponse {
    pub root: u32,
    pub default_colormap: u32,
    pub white_pixel: u32,
    pub black_pixel: u32,
    pub current_input_mask: u32,
    pub width_in_pixels: u16,
    pub height_in_pixels: u16,
    pub width_in_mm: u16,
    pub height_in_mm: u16,
    pub min_installed_maps: u16,
    pub max_installed_maps: u16,
    pub root_visual: u32,
    pub backing_stores: u8,
    pub save_unders: u8,
    pub root_depth: u8,
    pub allowed_depths_len: u8,
}

#[repr(packed, C)]
#[derive(Debug)]
pub struct DepthResponse {
    pub depth: u8,
    pub pad0: u8,
    pub visuals_len: u16,
    pub pad1: [u8; 4],
}

#[repr(packed, C)]
#[derive(Debug, Clone, Copy)]
pub struct VisualResponse {
    pub visual_id: u32,
    pub class: u8,
    pub bits_per_rgb_value: u8,
    pub colormap_entries: u16,
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
    pub pad0: [u8; 4],
}

#[repr(packed, C)]
#[derive(Debug)]
pub struct ErrorEvent {
    pub opcode: u8,
    pub code: u8,
    pub sequence: u16,
    pub bad_value: u32,
    pub minor_opcode: u16,
    pub major_opcode: u8,
    pub pad0: [u8; 21],
}

/// the first 8 bytes shared by every reply, length counts the 4-byte units following the 32 byte header
#[repr(packed, C)]
#[derive(Debug)]
pub struct GenericReply {
    pub opcode: u8,
    pub detail: u8,
    pub sequence: u16,
    pub length: u32,
}

#[repr(packed, C)]
#[derive(Debug)]
pub struct PropertyNotify {
    pub opcode: u8,
    pub pad0: u8,
    pub sequence: u16,
    pub window: u32,
    pub atom: u32,
    pub time: u32,
    pub state: u8,
    pub pad1: [u8; 15],
}

#[repr(packed, C)]
#[derive(Debug)]
pub struct SelectionNotify {
    pub opcode: u8,
    pub pad0: u8,
    pub sequence: u16,
    pub time: u32,
    pub requestor: u32,
    pub selection: u32,
    pub target: u32,
    pub property: u32,
    pub pad1: [u8; 8],
}

#[repr(packed, C)]
#[derive(Debug)]
pub struct CreateWindow {
    pub opcode: u8,
    pub depth: u8,
    pub length: u16,
    pub wid: u32,
    pub parent: u32,
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub border_width: u16,
    pub class: u16,
    pub visual: u32,
    pub value_mask: u32,
}

#[repr(packed, C)]
#[derive(Debug)]
pub struct ChangeWindowAttributes {
    pub opcode: u8,
    pub pad0: u8,
    pub length: u16,
    pub wid: u32,
    pub mask: u32,
}

#[repr(packed, C)]
#[derive(Debug)]
pub struct InternAtom {
    pub opcode: u8,
    pub only_if_exists: u8,
    pub length: u16,
    pub name_len: u16,
    pub pad1: [u8; 2],
}

#[repr(packed, C)]
#[derive(Debug, Clone)]
pub struct InternAtomResponse {
    pub(crate) opcode: u8,
    pub(crate) pad0: u8,
    pub(crate) sequence: u16,
    pub(crate) length: u32,
    pub atom: u32,
    pub(crate) pad1: [u8; 20],
}

#[repr(packed, C)]
#[derive(Debug)]
pub struct GetAtomName {
    pub opcode: u8,
    pub pad0: u8,
    pub length: u16,
    pub atom: u32,
}

#[repr(packed, C)]
#[derive(Debug, Clone)]
pub struct GetAtomNameResponse {
    pub(crate) opcode: u8,
    pub(crate) pad0: u8,
    pub(crate) sequence: u16,
    pub(crate) length: u32,
    pub name_len: u16,
    pub(crate) pad1: [u8; 22],
}

#[repr(packed, C)]
#[derive(Debug)]
pub struct DeleteProperty {
    pub opcode: u8,
    pub pad0: u8,
    pub length: u16,
    pub window: u32,
    pub property: u32,
}

#[repr(packed, C)]
#[derive(Debug)]
pub struct GetProperty {
    pub opcode: u8,
    pub delete: u8,
    pub length: u16,
    pub window: u32,
    pub property: u32,
    pub type_: u32,
    pub long_offset: u32,
    pub long_length: u32,
}

#[repr(packed, C)]
#[derive(Debug, Clone)]
pub struct GetPropertyResponse {
    pub(crate) opcode: u8,
    pub format: u8,
    pub(crate) sequence: u16,
    pub(crate) length: u32,
    pub type_: u32,
    pub bytes_after: u32,
    pub value_len: u32,
    pub(crate) pad0: [u8; 12],
}

#[repr(packed, C)]
#[derive(Debug)]
pub struct ConvertSelection {
    pub opcode: u8,
    pub pad0: u8,
    pub length: u16,
    pub requestor: u32,
    pub selection: u32,
    pub target: u32,
    pub property: u32,
    pub time: u32,
}

pub fn encode<T>(ptr: &T) -> &[u8] {
    unsafe {
        slice::from_raw_parts((ptr as *const T) as *const u8, mem::size_of::<T>())
    }
}

pub fn decode<T>(bytes: &[u8]) -> Result<T, Error> {
    if bytes.len() < mem::size_of::<T>() {
        return Err(Error::InvalidReply);
    }

    unsafe {
        Ok(ptr::read_unaligned(bytes.as_ptr() as *const T))
    }
}

pub fn pad(len: usize) -> usize {
    (4 - (len % 4)) % 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_sizes() {
        assert_eq!(mem::size_of::<SetupRequest>(), 12);
        assert_eq!(mem::size_of::<SetupResponse>(), 8);
        assert_eq!(mem::size_of::<SuccessResponse>(), 32);
        assert_eq!(mem::size_of::<ScreenResponse>(), 40);
        assert_eq!(mem::size_of::<VisualResponse>(), 24);
        assert_eq!(mem::size_of::<ErrorEvent>(), 32);
        assert_eq!(mem::size_of::<PropertyNotify>(), 32);
        assert_eq!(mem::size_of::<SelectionNotify>(), 32);
        assert_eq!(mem::size_of::<CreateWindow>(), 32);
        assert_eq!(mem::size_of::<InternAtomResponse>(), 32);
        assert_eq!(mem::size_of::<GetAtomNameResponse>(), 32);
        assert_eq!(mem::size_of::<GetPropertyResponse>(), 32);
        assert_eq!(mem::size_of::<GetProperty>(), 24);
        assert_eq!(mem::size_of::<ConvertSelection>(), 24);
        assert_eq!(mem::size_of::<DeleteProperty>(), 12);
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad(0), 0);
        assert_eq!(pad(1), 3);
        assert_eq!(pad(4), 0);
        assert_eq!(pad(10), 2);
    }

    #[test]
    fn test_decode_short_buffer() {
        assert!(decode::<GenericReply>(&[1, 0, 0]).is_err());
    }

    #[test]
    fn test_decode_generic_reply() {
        let mut bytes = vec![1u8, 8];
        bytes.extend_from_slice(&7u16.to_ne_bytes());
        bytes.extend_from_slice(&3u32.to_ne_bytes());

        let reply: GenericReply = decode(&bytes).unwrap();

        assert_eq!({ reply.opcode }, 1);
        assert_eq!({ reply.detail }, 8);
        assert_eq!({ reply.sequence }, 7);
        assert_eq!({ reply.length }, 3);
    }

    #[test]
    fn test_encode_delete_property() {
        let request = DeleteProperty {
            opcode: 19,
            pad0: 0,
            length: 3,
            window: 0x0040_0001,
            property: 300,
        };

        let bytes = encode(&request);

        assert_eq!(bytes.len(), 12);
        assert_eq!(bytes[0], 19);
        assert_eq!(&bytes[4..8], &0x0040_0001u32.to_ne_bytes());
        assert_eq!(&bytes[8..12], &300u32.to_ne_bytes());
    }
}
