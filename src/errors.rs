use thiserror::Error;

///
/// Failures raised while decoding a capture. `EndOfCapture` is the normal
/// loop-termination signal; the iteration surfaces convert it to `None`
/// rather than handing it to callers.
///
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid capture signature {magic:#010x}")]
    InvalidSignature { magic: u32 },
    #[error("needed {needed} bytes but only {available} available")]
    TruncatedData { needed: usize, available: usize },
    #[error("record header truncated, only {available} of {needed} bytes present")]
    TruncatedRecord { needed: usize, available: usize },
    #[error("no further records in capture")]
    EndOfCapture,
}

impl Error {
    /// Whether this value marks the expected end of the record stream.
    pub fn is_end_of_capture(&self) -> bool {
        match self {
            Error::EndOfCapture => true,
            _ => false,
        }
    }
}
