//! Supported rapid-upload link formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Rapid-upload link format
///
/// Identifiers (`baidupcs-go`, `pandownload`, ...) are what users type on the
/// command line and in config files. They parse case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum LinkFormat {
    /// BaiduPCS-Go command line:
    /// `BaiduPCS-Go rapidupload -length=N -md5=L -slicemd5=S "F"`
    ClientStyleA,
    /// PanDownload link: `bdpan://` followed by base64 of `F|N|L|S`
    EncodedURI,
    /// Long standard code: `L#S#N#F`
    StandardLong,
    /// Short standard code: `L#N#F`.
    ///
    /// Carries no slice hash, so it can be produced but never decoded.
    StandardShort,
}

impl LinkFormat {
    /// Every format, in declaration order
    pub const ALL: [LinkFormat; 4] = [
        LinkFormat::ClientStyleA,
        LinkFormat::EncodedURI,
        LinkFormat::StandardLong,
        LinkFormat::StandardShort,
    ];

    /// Identifier used on the command line and in configuration
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            LinkFormat::ClientStyleA => "baidupcs-go",
            LinkFormat::EncodedURI => "pandownload",
            LinkFormat::StandardLong => "rapid-upload-link",
            LinkFormat::StandardShort => "rapid-upload-link-short",
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            LinkFormat::ClientStyleA => "BaiduPCS-Go",
            LinkFormat::EncodedURI => "PanDownload",
            LinkFormat::StandardLong => "Rapid-upload standard link (long)",
            LinkFormat::StandardShort => "Rapid-upload standard link (short)",
        }
    }

    /// Whether links in this format can be decoded back into an identity
    #[must_use]
    pub const fn is_decodable(self) -> bool {
        match self {
            LinkFormat::ClientStyleA | LinkFormat::EncodedURI | LinkFormat::StandardLong => true,
            LinkFormat::StandardShort => false,
        }
    }

    fn known_ids() -> String {
        Self::ALL
            .iter()
            .map(|f| f.id())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for LinkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for LinkFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownFormat {
                name: s.to_string(),
                expected: Self::known_ids(),
            })
    }
}

impl TryFrom<String> for LinkFormat {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LinkFormat> for &'static str {
    fn from(format: LinkFormat) -> Self {
        format.id()
    }
}
