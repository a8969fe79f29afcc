/*
MIT License

Copyright (c) 2024 Philipp Schuster

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/
//! Module for [`FileFormat`]: detection of the container format of audio
//! data by its leading bytes, so that the right decoder can be chosen.
//!
//! Each known format is described by a rule: a sequence of byte signatures
//! and skipped bytes, matched left to right. The first matching rule wins.
//! See <https://en.wikipedia.org/wiki/List_of_file_signatures>.

use core::fmt::{Display, Formatter};

/// Number of leading bytes that are needed to resolve every rule.
pub const SNIFF_LEN: usize = 16;

/// Known audio container formats.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// RIFF WAVE
    Wav,
    /// Windows Media Audio (ASF container)
    Wma,
    /// Ogg
    Ogg,
    /// MPEG-1 Layer 3 without tag
    Mp3,
    /// MPEG-1 Layer 3 with ID3v2 tag
    Mp3Id3,
    /// Free Lossless Audio Codec
    Flac,
    /// Audio Interchange File Format
    Aiff,
    /// None of the above.
    Other,
}

impl Display for FileFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Wav => "WAV",
            Self::Wma => "WMA",
            Self::Ogg => "OGG",
            Self::Mp3 => "MP3",
            Self::Mp3Id3 => "MP3 (ID3)",
            Self::Flac => "FLAC",
            Self::Aiff => "AIFF",
            Self::Other => "unknown",
        };
        f.write_str(name)
    }
}

/// One step of a [`Rule`].
#[derive(Debug, Copy, Clone)]
enum Segment {
    /// These bytes must follow.
    Signature(&'static [u8]),
    /// Any `n` bytes follow.
    Skip(usize),
}

impl Segment {
    const fn len(&self) -> usize {
        match self {
            Self::Signature(bytes) => bytes.len(),
            Self::Skip(n) => *n,
        }
    }
}

#[derive(Debug)]
struct Rule {
    format: FileFormat,
    segments: &'static [Segment],
}

impl Rule {
    /// Number of bytes this rule needs.
    fn len(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    fn matches(&self, prefix: &[u8]) -> bool {
        if prefix.len() < self.len() {
            return false;
        }

        let mut offset = 0;
        for segment in self.segments {
            if let Segment::Signature(bytes) = segment {
                if &prefix[offset..offset + bytes.len()] != *bytes {
                    return false;
                }
            }
            offset += segment.len();
        }
        true
    }
}

/// All known rules, in the order they are tried.
static RULES: [Rule; 11] = [
    Rule {
        format: FileFormat::Wav,
        segments: &[
            Segment::Signature(b"RIFF"),
            Segment::Skip(4),
            Segment::Signature(b"WAVE"),
        ],
    },
    Rule {
        format: FileFormat::Wma,
        segments: &[Segment::Signature(&[
            0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62,
            0xCE, 0x6C,
        ])],
    },
    Rule {
        format: FileFormat::Ogg,
        segments: &[Segment::Signature(b"OggS")],
    },
    Rule {
        format: FileFormat::Mp3,
        segments: &[Segment::Signature(&[0xFF, 0xFA])],
    },
    Rule {
        format: FileFormat::Mp3,
        segments: &[Segment::Signature(&[0xFF, 0xFB])],
    },
    Rule {
        format: FileFormat::Mp3,
        segments: &[Segment::Signature(&[0xFF, 0xF3])],
    },
    Rule {
        format: FileFormat::Mp3,
        segments: &[Segment::Signature(&[0xFF, 0xF2])],
    },
    Rule {
        format: FileFormat::Mp3,
        segments: &[Segment::Signature(&[0xFF, 0xE3])],
    },
    Rule {
        format: FileFormat::Mp3Id3,
        segments: &[Segment::Signature(b"ID3")],
    },
    Rule {
        format: FileFormat::Flac,
        segments: &[Segment::Signature(b"fLaC")],
    },
    Rule {
        format: FileFormat::Aiff,
        segments: &[
            Segment::Signature(b"FORM"),
            Segment::Skip(4),
            Segment::Signature(b"AIFF"),
        ],
    },
];

impl FileFormat {
    /// Detects the format from the leading bytes of a file. The prefix
    /// should be [`SNIFF_LEN`] bytes long (or the whole file, if it's
    /// shorter). A rule that needs more bytes than available doesn't match.
    #[must_use]
    pub fn detect(prefix: &[u8]) -> Self {
        RULES
            .iter()
            .find(|rule| rule.matches(prefix))
            .map_or(Self::Other, |rule| rule.format)
    }
}

#[cfg(feature = "std")]
pub use self::stream::Sniffed;

#[cfg(feature = "std")]
mod stream {
    use super::{FileFormat, SNIFF_LEN};
    use std::io::{self, Chain, Cursor, Read};
    use std::vec::Vec;

    /// Result of [`FileFormat::detect_reader`]: the detected format plus the
    /// bytes that were consumed from the reader.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Sniffed {
        /// The detected format.
        pub format: FileFormat,
        prefix: Vec<u8>,
    }

    impl Sniffed {
        /// The bytes that were read from the stream.
        #[must_use]
        pub fn prefix(&self) -> &[u8] {
            &self.prefix
        }

        /// Puts the consumed bytes back in front of the rest of the stream.
        /// This way, non-seekable input can be handed to a decoder as if
        /// it was never touched.
        pub fn chain<R: Read>(self, rest: R) -> Chain<Cursor<Vec<u8>>, R> {
            Cursor::new(self.prefix).chain(rest)
        }
    }

    impl FileFormat {
        /// Detects the format from a reader. At most [`SNIFF_LEN`] bytes are
        /// read, so this also works for non-seekable input. Use
        /// [`Sniffed::chain`] to get a reader that yields the whole
        /// stream again.
        pub fn detect_reader<R: Read>(reader: R) -> io::Result<Sniffed> {
            let mut prefix = Vec::with_capacity(SNIFF_LEN);
            reader.take(SNIFF_LEN as u64).read_to_end(&mut prefix)?;

            let format = Self::detect(&prefix);
            log::trace!("detected format {format} from {} leading bytes", prefix.len());
            Ok(Sniffed { format, prefix })
        }
    }
}
