//! ubjcheck core - generator state codec
//!
//! Round-trips the two state words of an XorShift128+ generator through a
//! structured value and several encodings, and reports whether every route
//! reproduces the original state.
//!
//! # Architecture
//!
//! - [`GeneratorState`] - the two opaque 64-bit words
//! - [`Xs128Rng`] - the generator those words drive
//! - [`Value`] - structured value tree shared by every encoding
//! - [`text`] / [`binary`] / [`compress`] - JSON, UBJSON-style and LZ4 passes
//! - [`StateCodec`] - explicit state ↔ value mapping plus the passes above
//! - [`Pipeline`] / [`Report`] - composed round trips and their diagnostics
//!
//! # Usage
//!
//! ```
//! use ubjcheck_core::{GeneratorState, Pipeline, StateCodec};
//!
//! let codec = StateCodec::default();
//! let report = codec.run_all(&GeneratorState::demo(), &Pipeline::ALL).unwrap();
//! assert!(report.is_lossless());
//! assert!(report.pipelines_agree());
//! ```

pub mod binary;
pub mod codec;
pub mod compress;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod rng;
pub mod state;
pub mod text;
pub mod value;

pub use codec::{CodecOptions, StateCodec, decode_structured, encode_structured};
pub use config::{Config, ConfigError};
pub use error::{CodecError, Result};
pub use pipeline::{Pipeline, PipelineOutcome, Report, UnknownPipeline};
pub use rng::Xs128Rng;
pub use state::GeneratorState;
pub use value::{Object, Value};
