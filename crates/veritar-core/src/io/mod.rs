//! I/O wrappers shared by archive creation.

pub mod counting;

pub use counting::CountingWriter;
