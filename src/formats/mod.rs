//! File format support
//!
//! - `nud` - NUD mesh containers extracted from BIN archives
//! - `dae` - COLLADA scene output

pub mod dae;
pub mod nud;
