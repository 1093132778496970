//! Rapid-upload link codec.
//!
//! Encoding is a total function from an identity to the text of one format.
//! Decoding tries the decodable grammars in a fixed priority order
//! ([`DECODE_ORDER`]) and accepts the first one that matches the whole input.
//! Any failure inside a candidate (no match, bad base64, non-UTF-8 payload,
//! length overflow) moves on to the next candidate; only when all of them
//! reject the input does [`decode`] fail.
//!
//! Names are never escaped. A name containing a delimiter of its format is
//! written verbatim, which is what the client tools consuming these links
//! expect.

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use regex::{Captures, Regex};
use std::num::ParseIntError;
use std::string::FromUtf8Error;
use std::sync::LazyLock;
use thiserror::Error;

use rapidlink_files::FileIdentity;

use crate::error::CodecError;
use crate::format::LinkFormat;

/// Command token that starts a [`LinkFormat::ClientStyleA`] link
pub const CLIENT_COMMAND: &str = "BaiduPCS-Go";

/// URI prefix of a [`LinkFormat::EncodedURI`] link
pub const URI_PREFIX: &str = "bdpan://";

/// Base64 decoder for PanDownload payloads; padding is optional on input
const PAYLOAD_DECODER: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Fallback for payloads written with the URL-safe alphabet (`-` and `_`)
const URL_SAFE_PAYLOAD_DECODER: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

static CLIENT_STYLE_A: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)^BaiduPCS-Go rapidupload -length=([0-9]+) -md5=([a-fA-F0-9]{32}) -slicemd5=([a-fA-F0-9]{32}) "(.*)"$"#,
    )
    .expect("BaiduPCS-Go grammar is a valid regex")
});

static ENCODED_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^bdpan://(.*)$").expect("PanDownload grammar is a valid regex")
});

static ENCODED_URI_PAYLOAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(.*)\|([0-9]+)\|([a-fA-F0-9]{32})\|([a-fA-F0-9]{32})$")
        .expect("PanDownload payload grammar is a valid regex")
});

static STANDARD_LONG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^([a-fA-F0-9]{32})#([a-fA-F0-9]{32})#([0-9]+)#(.*)$")
        .expect("standard link grammar is a valid regex")
});

/// Why a single candidate grammar rejected the input
#[derive(Debug, Error)]
enum Rejection {
    #[error("grammar did not match")]
    NoMatch,
    #[error("payload is not base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error("decoded payload did not match")]
    PayloadMismatch,
    #[error("length out of range: {0}")]
    Length(#[from] ParseIntError),
}

type Candidate = fn(&str) -> Result<FileIdentity, Rejection>;

/// Decoding priority: formats are tried in this order, first match wins
pub const DECODE_ORDER: [LinkFormat; 3] = [
    LinkFormat::ClientStyleA,
    LinkFormat::EncodedURI,
    LinkFormat::StandardLong,
];

const CANDIDATES: [(LinkFormat, Candidate); 3] = [
    (LinkFormat::ClientStyleA, decode_client_style_a),
    (LinkFormat::EncodedURI, decode_encoded_uri),
    (LinkFormat::StandardLong, decode_standard_long),
];

/// Encode `identity` as a link in `format`
///
/// # Example
///
/// ```
/// use rapidlink_core::{LinkFormat, encode};
/// use rapidlink_files::compute;
///
/// let id = compute("a.txt", 5, b"hello");
/// assert_eq!(
///     encode(&id, LinkFormat::StandardShort),
///     "5D41402ABC4B2A76B9719D911017C592#5#a.txt"
/// );
/// ```
#[must_use]
pub fn encode(identity: &FileIdentity, format: LinkFormat) -> String {
    let name = identity.name();
    let length = identity.length();
    let full = identity.full_hash();
    let prefix = identity.prefix_hash();

    match format {
        LinkFormat::ClientStyleA => format!(
            "{CLIENT_COMMAND} rapidupload -length={length} -md5={full} -slicemd5={prefix} \"{name}\""
        ),
        LinkFormat::EncodedURI => {
            let payload = format!("{name}|{length}|{full}|{prefix}");
            format!("{URI_PREFIX}{}", STANDARD.encode(payload))
        }
        LinkFormat::StandardLong => format!("{full}#{prefix}#{length}#{name}"),
        LinkFormat::StandardShort => format!("{full}#{length}#{name}"),
    }
}

/// Decode a link of any decodable format.
///
/// Hashes are returned exactly as written in the link; lowercase input stays
/// lowercase.
///
/// # Errors
///
/// Returns [`CodecError::UnrecognizedFormat`] if no decodable grammar matches
/// the entire input.
pub fn decode(text: &str) -> Result<FileIdentity, CodecError> {
    decode_with_format(text).map(|(_, identity)| identity)
}

/// Decode a link and report which format it was recognized as.
///
/// # Errors
///
/// Returns [`CodecError::UnrecognizedFormat`] if no decodable grammar matches.
pub fn decode_with_format(text: &str) -> Result<(LinkFormat, FileIdentity), CodecError> {
    for (format, candidate) in CANDIDATES {
        match candidate(text) {
            Ok(identity) => {
                tracing::debug!("Recognized {} link for {:?}", format.label(), identity.name());
                return Ok((format, identity));
            }
            Err(rejection) => {
                tracing::trace!("Not a {} link: {}", format.label(), rejection);
            }
        }
    }

    Err(unrecognized())
}

/// Detect the format of a link without keeping the decoded identity
#[must_use]
pub fn detect(text: &str) -> Option<LinkFormat> {
    decode_with_format(text).ok().map(|(format, _)| format)
}

fn unrecognized() -> CodecError {
    let accepted = DECODE_ORDER
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ");

    CodecError::UnrecognizedFormat {
        message: format!(
            "unrecognized link format: expected one of {accepted} (short standard links cannot be converted)"
        ),
    }
}

fn decode_client_style_a(text: &str) -> Result<FileIdentity, Rejection> {
    let caps = CLIENT_STYLE_A.captures(text).ok_or(Rejection::NoMatch)?;
    identity_from(&caps, 4, 1, 2, 3)
}

fn decode_encoded_uri(text: &str) -> Result<FileIdentity, Rejection> {
    let caps = ENCODED_URI.captures(text).ok_or(Rejection::NoMatch)?;
    let encoded = &caps[1];
    let bytes = PAYLOAD_DECODER
        .decode(encoded)
        .or_else(|_| URL_SAFE_PAYLOAD_DECODER.decode(encoded))?;
    let payload = String::from_utf8(bytes)?;
    let inner = ENCODED_URI_PAYLOAD
        .captures(&payload)
        .ok_or(Rejection::PayloadMismatch)?;
    identity_from(&inner, 1, 2, 3, 4)
}

fn decode_standard_long(text: &str) -> Result<FileIdentity, Rejection> {
    let caps = STANDARD_LONG.captures(text).ok_or(Rejection::NoMatch)?;
    identity_from(&caps, 4, 3, 1, 2)
}

/// Build an identity from capture groups at the given indices
fn identity_from(
    caps: &Captures<'_>,
    name: usize,
    length: usize,
    full: usize,
    prefix: usize,
) -> Result<FileIdentity, Rejection> {
    Ok(FileIdentity::new(
        &caps[name],
        caps[length].parse::<u64>()?,
        &caps[full],
        &caps[prefix],
    ))
}
