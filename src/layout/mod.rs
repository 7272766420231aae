//! Reading-order reconstruction from positioned glyph runs.

mod assembler;

pub use assembler::LineAssembler;
