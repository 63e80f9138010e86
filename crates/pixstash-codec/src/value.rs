//! The value protocol: how typed data plugs into the cursor.
//!
//! [`Encode`] and [`Decode`] are the two halves of the extension point.
//! The crate provides implementations for the built-in wire kinds — `i64`,
//! strings, and lists — and user-defined record types implement both
//! traits themselves, writing their fields in a fixed order of their own
//! choosing and reading them back in exactly that order. The core enforces
//! no schema; round-trip correctness is each type's responsibility.
//!
//! `i32` implements neither trait on purpose: in the generic path integers
//! always take the 64-bit encoding, and 32-bit values travel only through
//! the explicit `write_i32`/`read_i32` calls.

use pixstash_surface::Surface;

use crate::error::Result;
use crate::reader::PixelReader;
use crate::writer::PixelWriter;

/// Instance-side half of the value protocol.
///
/// An implementation issues a fixed sequence of primitive and composite
/// writes for its own fields. The order is the type's contract with
/// itself — [`Decode`] must mirror it exactly.
pub trait Encode {
    fn encode<S: Surface>(&self, w: &mut PixelWriter<S>) -> Result<()>;
}

/// Type-side half of the value protocol: a factory constructing a new
/// instance from the stream.
pub trait Decode: Sized {
    fn decode<S: Surface>(r: &mut PixelReader<S>) -> Result<Self>;
}

impl Encode for i64 {
    fn encode<S: Surface>(&self, w: &mut PixelWriter<S>) -> Result<()> {
        w.write_i64(*self)
    }
}

impl Decode for i64 {
    fn decode<S: Surface>(r: &mut PixelReader<S>) -> Result<Self> {
        r.read_i64()
    }
}

impl Encode for str {
    fn encode<S: Surface>(&self, w: &mut PixelWriter<S>) -> Result<()> {
        w.write_str(self)
    }
}

impl Encode for String {
    fn encode<S: Surface>(&self, w: &mut PixelWriter<S>) -> Result<()> {
        w.write_str(self)
    }
}

impl Decode for String {
    fn decode<S: Surface>(r: &mut PixelReader<S>) -> Result<Self> {
        r.read_str()
    }
}

impl<T: Encode> Encode for [T] {
    fn encode<S: Surface>(&self, w: &mut PixelWriter<S>) -> Result<()> {
        w.write_list(self)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<S: Surface>(&self, w: &mut PixelWriter<S>) -> Result<()> {
        w.write_list(self)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<S: Surface>(r: &mut PixelReader<S>) -> Result<Self> {
        r.read_list()
    }
}
