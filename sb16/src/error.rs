//! Driver error types

use core::fmt;

pub type Result<T> = core::result::Result<T, Sb16Error>;

/// Everything `init` (and registration) can fail with.
///
/// All of these surface to the syscall layer as `-1`; the message below is
/// what gets logged so the failures stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sb16Error {
    /// Another client already holds the card.
    Busy,
    /// Reset handshake never produced the ready magic.
    HardwareNotResponding,
    /// Header magic is not "RIFF".
    NotWave,
    /// Format code is not linear PCM.
    Compressed,
    /// Channel count or sample width we cannot play.
    Unsupported,
    /// Null header pointer from user space.
    NullHeader,
    /// The playback ring could not be claimed at registration.
    RingUnavailable,
    /// The playback ring straddles a 64 KiB DMA page.
    RingCrossesPage,
}

impl Sb16Error {
    /// Stable human-readable message, also used by the debug log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Busy => "Another process is using the SB16. Terminate it and try again.",
            Self::HardwareNotResponding => "SB16 initialization failed. Check hardware.",
            Self::NotWave => "Not a wav file.",
            Self::Compressed => "Only uncompressed music is supported.",
            Self::Unsupported => "Only 16-bit stereo audio is supported.",
            Self::NullHeader => "Info block invalid.",
            Self::RingUnavailable => "DMA ring already claimed.",
            Self::RingCrossesPage => "DMA ring crosses a 64 KiB page boundary.",
        }
    }
}

impl fmt::Display for Sb16Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_distinct() {
        let all = [
            Sb16Error::Busy,
            Sb16Error::HardwareNotResponding,
            Sb16Error::NotWave,
            Sb16Error::Compressed,
            Sb16Error::Unsupported,
            Sb16Error::NullHeader,
            Sb16Error::RingUnavailable,
            Sb16Error::RingCrossesPage,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }
}
