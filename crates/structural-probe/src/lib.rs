/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Format detection probes.
 *
 * A probe inspects the start of an input stream and decides whether it
 * recognizes the format. Probes exist only to select which parser to
 * invoke: the registry scans registered probes in order and the first one
 * to claim the input wins.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Read};
use std::path::Path;

/// A description of a recognized document format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescription {
    /// The unique format name, such as `"com.structural.xml"`.
    pub name: String,

    /// A humanly readable description of the format.
    pub description: String,

    /// The MIME type of the format.
    pub mime_type: String,

    /// The major version of the format.
    pub version_major: u32,

    /// The minor version of the format.
    pub version_minor: u32,
}

impl fmt::Display for FormatDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}.{} ({})",
            self.name, self.version_major, self.version_minor, self.mime_type
        )
    }
}

/// A provider of input streams. Probes may open the stream several times;
/// each call yields a fresh stream positioned at the start of the input.
pub trait StreamProvider {
    fn open(&self) -> io::Result<Box<dyn Read>>;
}

impl<F> StreamProvider for F
where
    F: Fn() -> io::Result<Box<dyn Read>>,
{
    fn open(&self) -> io::Result<Box<dyn Read>> {
        self()
    }
}

/// A request to probe a file.
pub struct ProbeRequest<'a> {
    /// The base directory for the probe; probes are not allowed to access
    /// files or directories in any ancestor of this directory.
    pub base_directory: &'a Path,

    /// The URI of the file, for diagnostic purposes.
    pub uri: &'a str,

    /// The stream provider for the file.
    pub streams: &'a dyn StreamProvider,
}

/// A single format probe.
pub trait Probe {
    /// Inspect the input and return a format description if the probe
    /// recognizes it, or `None` to pass.
    fn probe(&self, request: &ProbeRequest<'_>) -> io::Result<Option<FormatDescription>>;
}

/// The probe registry: an ordered collection of probes scanned first-match.
#[derive(Default)]
pub struct Probes {
    probes: Vec<Box<dyn Probe>>,
}

impl Probes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a probe. Probes run in registration order.
    pub fn register(&mut self, probe: Box<dyn Probe>) {
        self.probes.push(probe);
    }

    /// Probe the given input, returning the first recognized format.
    pub fn probe_uri(
        &self,
        base_directory: &Path,
        uri: &str,
        streams: &dyn StreamProvider,
    ) -> io::Result<Option<FormatDescription>> {
        let request = ProbeRequest {
            base_directory,
            uri,
            streams,
        };

        for probe in &self.probes {
            if let Some(format) = probe.probe(&request)? {
                tracing::debug!(uri, format = %format, "format recognized");
                return Ok(Some(format));
            }
        }

        tracing::debug!(uri, "no probe recognized the input");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct FixedProbe(Option<FormatDescription>);

    impl Probe for FixedProbe {
        fn probe(&self, _request: &ProbeRequest<'_>) -> io::Result<Option<FormatDescription>> {
            Ok(self.0.clone())
        }
    }

    fn format(name: &str) -> FormatDescription {
        FormatDescription {
            name: name.to_string(),
            description: "a test format".to_string(),
            mime_type: "application/octet-stream".to_string(),
            version_major: 1,
            version_minor: 0,
        }
    }

    fn empty_streams() -> impl StreamProvider {
        || -> io::Result<Box<dyn Read>> { Ok(Box::new(Cursor::new(Vec::new()))) }
    }

    #[test]
    fn first_match_wins() {
        let mut probes = Probes::new();
        probes.register(Box::new(FixedProbe(None)));
        probes.register(Box::new(FixedProbe(Some(format("second")))));
        probes.register(Box::new(FixedProbe(Some(format("third")))));

        let result = probes
            .probe_uri(Path::new("."), "test.xml", &empty_streams())
            .unwrap();
        assert_eq!(result.unwrap().name, "second");
    }

    #[test]
    fn no_match_yields_none() {
        let mut probes = Probes::new();
        probes.register(Box::new(FixedProbe(None)));

        let result = probes
            .probe_uri(Path::new("."), "test.bin", &empty_streams())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn empty_registry_yields_none() {
        let probes = Probes::new();
        let result = probes
            .probe_uri(Path::new("."), "test.bin", &empty_streams())
            .unwrap();
        assert!(result.is_none());
    }
}
