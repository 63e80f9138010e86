/// Errors that can occur encoding or decoding values on a surface.
///
/// All failures are synchronous and final: a cursor that has returned an
/// error is positioned inconsistently with the stream and must be
/// discarded, not reused.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A byte index resolved to a pixel outside the surface.
    ///
    /// Detected before any surface access, so a rejected write has not
    /// mutated anything.
    #[error("byte index {index} out of bounds (surface holds {capacity} bytes)")]
    OutOfBounds { index: usize, capacity: usize },

    /// A string contained a character that does not fit in one byte.
    ///
    /// The wire format stores one byte per character, so only code points
    /// U+0000..=U+00FF are representable. The whole string is checked
    /// before any of it is written.
    #[error("character {ch:?} at index {index} exceeds U+00FF")]
    EncodingRange { ch: char, index: usize },

    /// A length prefix read from the stream was negative or larger than
    /// the remaining stream.
    ///
    /// Usually means the read sequence does not mirror the write sequence
    /// that produced the stream. Mismatches this check cannot catch
    /// surface as garbage values or a downstream
    /// [`OutOfBounds`](CodecError::OutOfBounds).
    #[error("invalid length prefix {length}")]
    InvalidLength { length: i64 },
}

pub type Result<T> = std::result::Result<T, CodecError>;
