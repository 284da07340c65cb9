use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::Result;

/// Image bytes buffered in memory so every attempt sends an identical body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImagePayload {
    bytes: Vec<u8>,
}

impl ImagePayload {
    /// Rewinds a seekable stream to position zero and reads it to the end.
    pub fn from_seekable<R: Read + Seek>(mut reader: R) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        Self::from_reader(reader)
    }

    /// Reads a stream from its current position to the end.
    ///
    /// Use this for non-seekable sources; the stream is consumed exactly once.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self { bytes })
    }

    /// Reads a whole image file into memory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            bytes: std::fs::read(path)?,
        })
    }

    /// Buffered image bytes exactly as they are sent.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the buffered image in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` when no bytes were buffered.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn to_part(&self) -> reqwest::multipart::Part {
        reqwest::multipart::Part::bytes(self.bytes.clone()).file_name("image")
    }
}

impl From<Vec<u8>> for ImagePayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<&[u8]> for ImagePayload {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }
}
