//! Identity tracking for [`Shared`](crate::Shared) values.
//!
//! Both tables live for one top-level call. The writer hands out sequential
//! ids, the reader registers them and patches forward references once the
//! whole tree has been read.

// -----------------------------------------------------------------------------
// Modules

mod comparer;
mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use comparer::{EqualityComparer, ReferenceEqualityComparer, ReferenceKey};
pub use comparer::ValueEqualityComparer;

pub(crate) use reader::{ReferenceReader, Step};
pub(crate) use writer::ReferenceWriter;
