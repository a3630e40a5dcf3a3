//! Error type shared by the tracker and its integrations.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Session parameters are out of range.
    #[error("invalid session config: {0}")]
    InvalidConfig(String),

    /// A record was emitted for a frame other than the next one in sequence.
    #[error("frame record out of sequence: expected frame {expected}, got {got}")]
    FrameOutOfSequence { expected: u64, got: u64 },

    /// An earlier frame failed; the record stream can no longer stay aligned
    /// with the video.
    #[error("tracking session stopped after a failure at frame {frame_idx}")]
    SessionFailed { frame_idx: u64 },

    /// The annotation sink could not accept a record.
    #[error("record sink failed: {0}")]
    Sink(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A replay line could not be decoded.
    #[error("malformed replay line {line}: {source}")]
    Replay {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The detection backend failed on a frame.
    #[error("detector failed: {0}")]
    Detector(#[source] Box<dyn std::error::Error + Send + Sync>),
}
