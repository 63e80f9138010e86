use pixstash_surface::Surface;
use tracing::{debug, trace};

use crate::error::{CodecError, Result};
use crate::layout::{self, Slot};
use crate::value::Decode;

/// Reads a typed byte stream back out of the color channels of a surface.
///
/// The mirror of [`PixelWriter`]: one reader performs one read pass,
/// issuing the same sequence of operations the writer issued, in the same
/// order and with the same types. The stream carries no tags, so the reader
/// must already know the shape it is decoding — a mismatched sequence
/// yields garbage values or an error downstream, not a dedicated failure.
///
/// [`PixelWriter`]: crate::writer::PixelWriter
pub struct PixelReader<S> {
    surface: S,
    next_byte: usize,
    width: u32,
    height: u32,
}

impl<S: Surface> PixelReader<S> {
    /// Create a reader positioned at byte 0 of `surface`.
    ///
    /// Dimensions are captured here; the surface must not change size while
    /// the reader is bound to it.
    pub fn new(surface: S) -> Self {
        let width = surface.width();
        let height = surface.height();
        debug!(
            width,
            height,
            capacity = layout::capacity(width, height),
            "opening read cursor"
        );
        Self {
            surface,
            next_byte: 0,
            width,
            height,
        }
    }

    /// Read one byte from the next color channel and advance the cursor.
    pub fn read_byte(&mut self) -> Result<u8> {
        let Slot { x, y, channel } = layout::resolve(self.next_byte, self.width, self.height)?;
        let b = self.surface.pixel(x, y)[channel];
        self.next_byte += 1;
        Ok(b)
    }

    /// Read `n` consecutive bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(n.min(self.remaining()));
        for _ in 0..n {
            out.push(self.read_byte()?);
        }
        Ok(out)
    }

    /// Read a 32-bit integer: 4 bytes, big-endian, two's complement.
    pub fn read_i32(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        for slot in &mut buf {
            *slot = self.read_byte()?;
        }
        Ok(i32::from_be_bytes(buf))
    }

    /// Read a 64-bit integer: 8 bytes, big-endian, two's complement.
    pub fn read_i64(&mut self) -> Result<i64> {
        let mut buf = [0u8; 8];
        for slot in &mut buf {
            *slot = self.read_byte()?;
        }
        Ok(i64::from_be_bytes(buf))
    }

    /// Read a length-prefixed string.
    ///
    /// The 64-bit prefix counts characters; each following byte becomes one
    /// character in U+0000..=U+00FF. A prefix that is negative or larger
    /// than the remaining stream fails with
    /// [`CodecError::InvalidLength`] before anything is consumed past it.
    pub fn read_str(&mut self) -> Result<String> {
        let prefix = self.read_i64()?;
        let len = usize::try_from(prefix)
            .ok()
            .filter(|&n| n <= self.remaining())
            .ok_or(CodecError::InvalidLength { length: prefix })?;

        trace!(len, "reading string");
        let mut out = String::with_capacity(len);
        for b in self.read_bytes(len)? {
            out.push(char::from(b));
        }
        Ok(out)
    }

    /// Read a length-prefixed list of the declared element type.
    ///
    /// Elements decode recursively through [`Decode`], so nested lists and
    /// record elements work without the core knowing their shape.
    pub fn read_list<T: Decode>(&mut self) -> Result<Vec<T>> {
        let prefix = self.read_i64()?;
        let len =
            usize::try_from(prefix).map_err(|_| CodecError::InvalidLength { length: prefix })?;

        trace!(len, "reading list");
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }

    /// Read a value of the declared type.
    ///
    /// The caller asserts the type; it must match what the write pass put
    /// at this position. `i64` takes the fixed 64-bit decoding, `String`
    /// the length-prefixed form, `Vec<T>` the list form, and record types
    /// their own [`Decode`] implementation.
    pub fn read_value<T: Decode>(&mut self) -> Result<T> {
        T::decode(self)
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.next_byte
    }

    /// Total bytes the surface can hold.
    pub fn capacity(&self) -> usize {
        layout::capacity(self.width, self.height)
    }

    /// Bytes still unread.
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

    /// Consume the reader and return the surface.
    pub fn into_inner(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use pixstash_surface::{Canvas, Surface};

    use super::*;
    use crate::writer::PixelWriter;

    #[test]
    fn bytes_come_from_channels_in_order() {
        let mut canvas = Canvas::new(2, 1).unwrap();
        canvas.set_pixel(0, 0, [10, 20, 30]);
        canvas.set_pixel(1, 0, [40, 50, 60]);

        let mut reader = PixelReader::new(&mut canvas);
        let bytes = reader.read_bytes(5).unwrap();

        assert_eq!(bytes, vec![10, 20, 30, 40, 50]);
        assert_eq!(reader.position(), 5);
    }

    #[test]
    fn i32_decodes_big_endian() {
        let mut canvas = Canvas::new(2, 1).unwrap();
        canvas.set_pixel(0, 0, [1, 2, 3]);
        canvas.set_pixel(1, 0, [4, 0, 0]);

        let mut reader = PixelReader::new(&mut canvas);
        assert_eq!(reader.read_i32().unwrap(), 0x0102_0304);
    }

    #[test]
    fn i64_reproduces_negative_values() {
        let mut canvas = Canvas::new(3, 1).unwrap();
        let mut writer = PixelWriter::new(&mut canvas);
        writer.write_i64(i64::MIN).unwrap();

        let mut reader = PixelReader::new(&mut canvas);
        assert_eq!(reader.read_i64().unwrap(), i64::MIN);
    }

    #[test]
    fn string_roundtrips_through_surface() {
        let mut canvas = Canvas::new(8, 2).unwrap();
        let mut writer = PixelWriter::new(&mut canvas);
        writer.write_str("caférrée").unwrap();

        let mut reader = PixelReader::new(&mut canvas);
        assert_eq!(reader.read_str().unwrap(), "caférrée");
    }

    #[test]
    fn negative_string_length_rejected() {
        let mut canvas = Canvas::new(8, 2).unwrap();
        let mut writer = PixelWriter::new(&mut canvas);
        writer.write_i64(-1).unwrap();

        let mut reader = PixelReader::new(&mut canvas);
        let err = reader.read_str().unwrap_err();
        assert!(matches!(err, CodecError::InvalidLength { length: -1 }));
    }

    #[test]
    fn oversized_string_length_rejected() {
        let mut canvas = Canvas::new(8, 2).unwrap();
        let mut writer = PixelWriter::new(&mut canvas);
        writer.write_i64(1_000_000).unwrap();

        let mut reader = PixelReader::new(&mut canvas);
        let err = reader.read_str().unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidLength { length: 1_000_000 }
        ));
    }

    #[test]
    fn negative_list_length_rejected() {
        let mut canvas = Canvas::new(8, 2).unwrap();
        let mut writer = PixelWriter::new(&mut canvas);
        writer.write_i64(i64::MIN).unwrap();

        let mut reader = PixelReader::new(&mut canvas);
        let err = reader.read_list::<i64>().unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidLength {
                length: i64::MIN
            }
        ));
    }

    #[test]
    fn reading_past_capacity_rejected() {
        let mut canvas = Canvas::new(1, 1).unwrap();
        let mut reader = PixelReader::new(&mut canvas);

        reader.read_bytes(3).unwrap();
        let err = reader.read_byte().unwrap_err();
        assert!(matches!(
            err,
            CodecError::OutOfBounds {
                index: 3,
                capacity: 3
            }
        ));
    }

    #[test]
    fn read_value_uses_declared_type() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        let mut writer = PixelWriter::new(&mut canvas);
        writer.write_value(&42i64).unwrap();
        writer.write_value("hi").unwrap();

        let mut reader = PixelReader::new(&mut canvas);
        assert_eq!(reader.read_value::<i64>().unwrap(), 42);
        assert_eq!(reader.read_value::<String>().unwrap(), "hi");
    }

    #[test]
    fn mismatched_read_yields_garbage_not_panic() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        let mut writer = PixelWriter::new(&mut canvas);
        writer.write_i64(7).unwrap();
        writer.write_i64(7).unwrap();

        // Reading an i32 where an i64 was written desynchronizes the
        // stream; the values are wrong but no error is detectable yet.
        let mut reader = PixelReader::new(&mut canvas);
        assert_eq!(reader.read_i32().unwrap(), 0);
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn accessors_report_geometry() {
        let mut canvas = Canvas::new(4, 2).unwrap();
        let mut reader = PixelReader::new(&mut canvas);

        assert_eq!(reader.width(), 4);
        assert_eq!(reader.height(), 2);
        assert_eq!(reader.capacity(), 24);
        assert_eq!(reader.remaining(), 24);

        reader.read_byte().unwrap();
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.remaining(), 23);

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _surface = reader.into_inner();
    }
}
