use pixstash_surface::Surface;
use tracing::{debug, trace};

use crate::error::{CodecError, Result};
use crate::layout::{self, Slot};
use crate::value::Encode;

/// Writes a typed byte stream into the color channels of a surface.
///
/// One writer performs one write pass: the cursor starts at byte 0 and only
/// moves forward. Recovering the data is [`PixelReader`]'s job, and the
/// read sequence must mirror the write sequence exactly in order and type —
/// the stream carries no tags to catch a mismatch.
///
/// [`PixelReader`]: crate::reader::PixelReader
pub struct PixelWriter<S> {
    surface: S,
    next_byte: usize,
    width: u32,
    height: u32,
}

impl<S: Surface> PixelWriter<S> {
    /// Create a writer positioned at byte 0 of `surface`.
    ///
    /// Dimensions are captured here; the surface must not change size while
    /// the writer is bound to it. Pass `&mut surface` to keep ownership.
    pub fn new(surface: S) -> Self {
        let width = surface.width();
        let height = surface.height();
        debug!(
            width,
            height,
            capacity = layout::capacity(width, height),
            "opening write cursor"
        );
        Self {
            surface,
            next_byte: 0,
            width,
            height,
        }
    }

    /// Write one byte into the next color channel and advance the cursor.
    ///
    /// The resolved pixel is read, the one channel replaced, and the pixel
    /// stored back, so its other channels keep their values. Fails with
    /// [`CodecError::OutOfBounds`] when the surface is full, without
    /// touching it.
    pub fn write_byte(&mut self, b: u8) -> Result<()> {
        let Slot { x, y, channel } = layout::resolve(self.next_byte, self.width, self.height)?;

        let mut pixel = self.surface.pixel(x, y);
        pixel[channel] = b;
        self.surface.set_pixel(x, y, pixel);

        self.next_byte += 1;
        Ok(())
    }

    /// Write a 32-bit integer: 4 bytes, big-endian, two's complement.
    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        for b in v.to_be_bytes() {
            self.write_byte(b)?;
        }
        Ok(())
    }

    /// Write a 64-bit integer: 8 bytes, big-endian, two's complement.
    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        for b in v.to_be_bytes() {
            self.write_byte(b)?;
        }
        Ok(())
    }

    /// Write a string: character count as a 64-bit prefix, then one byte
    /// per character.
    ///
    /// Every character must fit in one byte (U+0000..=U+00FF). The whole
    /// string is validated up front, so an [`CodecError::EncodingRange`]
    /// failure has written nothing and the cursor has not moved.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        if let Some((index, ch)) = s.chars().enumerate().find(|&(_, ch)| ch as u32 > 0xFF) {
            return Err(CodecError::EncodingRange { ch, index });
        }

        let len = s.chars().count();
        trace!(len, "writing string");
        self.write_i64(len as i64)?;
        for ch in s.chars() {
            self.write_byte(ch as u32 as u8)?;
        }
        Ok(())
    }

    /// Write a list: element count as a 64-bit prefix, then each element in
    /// order through the generic dispatch rule.
    pub fn write_list<T: Encode>(&mut self, items: &[T]) -> Result<()> {
        trace!(len = items.len(), "writing list");
        self.write_i64(items.len() as i64)?;
        for item in items {
            item.encode(self)?;
        }
        Ok(())
    }

    /// Write any encodable value.
    ///
    /// Dispatch is by static type: `i64` takes the fixed 64-bit encoding,
    /// strings the length-prefixed form, slices the list form, and record
    /// types whatever their own [`Encode`] implementation emits. 32-bit
    /// integers travel only through the explicit
    /// [`write_i32`](Self::write_i32).
    pub fn write_value<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.encode(self)
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> usize {
        self.next_byte
    }

    /// Total bytes the surface can hold.
    pub fn capacity(&self) -> usize {
        layout::capacity(self.width, self.height)
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.next_byte
    }

    /// Surface width in pixels, as captured at construction.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels, as captured at construction.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Borrow the underlying surface.
    pub fn get_ref(&self) -> &S {
        &self.surface
    }

    /// Mutably borrow the underlying surface.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Consume the writer and return the surface.
    pub fn into_inner(self) -> S {
        self.surface
    }
}
