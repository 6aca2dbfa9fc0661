//! Parsers for the file formats the scan understands.
//!
//! Each parser works on file *content* handed to it by an analyzer; none of
//! them touch the filesystem. Parse failures are reported to the caller,
//! which decides whether to skip the input or abort.

mod os_release;
pub mod poetry;

pub use self::os_release::{detect_os_release, parse_os_release};
