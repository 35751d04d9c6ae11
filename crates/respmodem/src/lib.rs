//! An incremental decoder for RESP-style replies.
//!
//! Bytes arrive in arbitrary chunks; [`StreamingDecoder`] reconstructs simple
//! strings, errors, integers, binary-safe bulk strings and nested arrays
//! without blocking on chunk boundaries or rescanning consumed input.
//!
//! ```rust
//! use respmodem::{Reply, StreamingDecoder, Value};
//!
//! let mut decoder = StreamingDecoder::default();
//! decoder.feed(b"*1\r\n*1\r\n+x\r\n");
//! assert_eq!(
//!     decoder.next(),
//!     Some(Ok(Reply::Value(Value::Array(vec![Value::Array(vec![
//!         Value::from("x")
//!     ])]))))
//! );
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

/// Emits a `tracing` event at TRACE level when the `tracing` feature is on.
macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!($($arg)*);
        }
    };
}

/// Emits a `tracing` event at DEBUG level when the `tracing` feature is on.
macro_rules! debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!($($arg)*);
        }
    };
}

mod chunk_utils;
mod cursor;
mod decoder;
mod error;
mod numbers;
mod options;
mod pending;
mod value;

#[cfg(test)]
mod tests;

pub use chunk_utils::{produce_chunks, produce_prefixes};
pub use decoder::{ClosedStreamingDecoder, DecodeResult, StreamingDecoder};
pub use error::{DecodeError, DecodeErrorKind, UnknownEncoding};
pub use options::DecoderOptions;
pub use value::{Array, Reply, Value};
