//! # rapidlink Core
//!
//! Codec and conversion pipeline for rapid-upload links.
//!
//! ## Formats
//!
//! | Format | Grammar | Decodable |
//! |--------|---------|-----------|
//! | BaiduPCS-Go | `BaiduPCS-Go rapidupload -length=N -md5=L -slicemd5=S "F"` | yes |
//! | PanDownload | `bdpan://` + base64(`F\|N\|L\|S`) | yes |
//! | Standard (long) | `L#S#N#F` | yes |
//! | Standard (short) | `L#N#F` | no |
//!
//! `L` is the full-content MD5, `S` the MD5 of the first 256 KiB, `N` the
//! length in bytes and `F` the file name.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod format;
pub mod pipeline;

pub use codec::{DECODE_ORDER, decode, decode_with_format, detect, encode};
pub use error::{CodecError, Error, Result};
pub use format::LinkFormat;
pub use pipeline::{ConversionPipeline, EncodedLink, FileLinks, HashProgress, encode_all};

pub use rapidlink_files::FileIdentity;
