//! Raw binary payload access.
//!
//! Payload files hold uncompressed, native-endian arrays. A DataItem
//! selects `count` elements starting `Seek` bytes into the file:
//!
//! ```text
//! +-----------------+----------------------------+-----------
//! | Seek bytes      | count * sizeof(element)    | rest ...
//! +-----------------+----------------------------+-----------
//! ```
//!
//! - [`BinarySource`] - bounds-checked bytes of one file (mmap or buffered)
//! - [`TypedArray`] - typed, zero-copy view with row-major reshaping
//! - [`ArrayDecoder`] - DataItem metadata to [`DecodedArray`]

mod streams;
mod array;
mod decoder;

pub use streams::*;
pub use array::*;
pub use decoder::*;
