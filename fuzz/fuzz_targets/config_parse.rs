//! Fuzz test for configuration file parsing
//!
//! Tests that arbitrary TOML input doesn't cause panics when parsed as a
//! rapidlink configuration, including the format names it lists.

#![no_main]

use std::str::FromStr;

use libfuzzer_sys::fuzz_target;
use rapidlink_core::LinkFormat;
use serde::Deserialize;

/// Shape of the `[output]` table the CLI reads
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct OutputSection {
    #[serde(default)]
    default_targets: Vec<LinkFormat>,
    #[serde(default)]
    show_labels: bool,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct ConfigFile {
    output: Option<OutputSection>,
}

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _: Result<toml::Value, _> = toml::from_str(s);

        // Format names inside the config go through the same parser
        if let Ok(config) = toml::from_str::<ConfigFile>(s) {
            for format in config.output.into_iter().flat_map(|o| o.default_targets) {
                assert_eq!(LinkFormat::from_str(format.id()).ok(), Some(format));
            }
        }

        // Format names given on the command line
        if let Ok(format) = LinkFormat::from_str(s) {
            assert!(LinkFormat::ALL.contains(&format));
        }
    }
});
