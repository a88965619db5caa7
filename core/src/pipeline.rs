//! Round-trip pipelines and the diagnostic report

use crate::codec::StateCodec;
use crate::error::{CodecError, Result};
use crate::state::GeneratorState;
use std::fmt;
use std::str::FromStr;

/// One encode-then-decode route through the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pipeline {
    /// JSON text
    Text,
    /// UBJSON binary
    Binary,
    /// UBJSON binary, then LZ4
    CompressedBinary,
    /// JSON text bytes, then LZ4
    CompressedText,
}

impl Pipeline {
    pub const ALL: [Pipeline; 4] = [
        Pipeline::Text,
        Pipeline::Binary,
        Pipeline::CompressedBinary,
        Pipeline::CompressedText,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pipeline::Text => "text",
            Pipeline::Binary => "binary",
            Pipeline::CompressedBinary => "binary-lz4",
            Pipeline::CompressedText => "text-lz4",
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized pipeline name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pipeline '{0}' (expected text, binary, binary-lz4 or text-lz4)")]
pub struct UnknownPipeline(pub String);

impl FromStr for Pipeline {
    type Err = UnknownPipeline;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Pipeline::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPipeline(s.to_string()))
    }
}

/// Result of running one pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub pipeline: Pipeline,
    /// Size of the intermediate encoded form in bytes
    pub encoded_len: usize,
    pub decoded: GeneratorState,
}

impl StateCodec {
    /// Encode `state` into the pipeline's form
    pub fn encode_with(&self, pipeline: Pipeline, state: &GeneratorState) -> Result<Vec<u8>> {
        let value = self.encode_structured(state);
        let encoded = match pipeline {
            Pipeline::Text => self.to_text(&value)?.into_bytes(),
            Pipeline::Binary => self.to_binary(&value)?,
            Pipeline::CompressedBinary => {
                let bytes = self.to_binary(&value)?;
                let frame = self.compress(&bytes);
                tracing::debug!(binary = bytes.len(), lz4 = frame.len(), "compressed binary");
                frame
            }
            Pipeline::CompressedText => {
                let text = self.to_text(&value)?;
                let frame = self.compress(text.as_bytes());
                tracing::debug!(text = text.len(), lz4 = frame.len(), "compressed text");
                frame
            }
        };
        Ok(encoded)
    }

    /// Decode the pipeline's form back into a state
    pub fn decode_with(&self, pipeline: Pipeline, encoded: &[u8]) -> Result<GeneratorState> {
        let value = match pipeline {
            Pipeline::Text => self.from_text(&utf8(encoded)?)?,
            Pipeline::Binary => self.from_binary(encoded)?,
            Pipeline::CompressedBinary => self.from_binary(&self.decompress(encoded)?)?,
            Pipeline::CompressedText => self.from_text(&utf8(&self.decompress(encoded)?)?)?,
        };
        self.decode_structured(&value)
    }

    /// Encode then decode `state` through one pipeline
    pub fn run(&self, pipeline: Pipeline, state: &GeneratorState) -> Result<PipelineOutcome> {
        let encoded = self.encode_with(pipeline, state)?;
        let decoded = self.decode_with(pipeline, &encoded)?;
        tracing::debug!(%pipeline, bytes = encoded.len(), matches = decoded == *state, "round trip");
        Ok(PipelineOutcome {
            pipeline,
            encoded_len: encoded.len(),
            decoded,
        })
    }

    /// Run every listed pipeline and collect the diagnostic report
    pub fn run_all(&self, state: &GeneratorState, pipelines: &[Pipeline]) -> Result<Report> {
        let serialized = self.to_text(&self.encode_structured(state))?;
        let restored = self.decode_structured(&self.from_text(&serialized)?)?;
        let deserialized = self.to_text(&self.encode_structured(&restored))?;

        let outcomes = pipelines
            .iter()
            .map(|&p| self.run(p, state))
            .collect::<Result<Vec<_>>>()?;

        Ok(Report {
            original: *state,
            serialized,
            deserialized,
            outcomes,
        })
    }
}

fn utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| {
        CodecError::parse(e.utf8_error().valid_up_to() as u64, e.to_string())
    })
}

/// Everything a run shows about the round trips
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub original: GeneratorState,
    /// Text form of the original state
    pub serialized: String,
    /// Text form of the state decoded from `serialized`
    pub deserialized: String,
    pub outcomes: Vec<PipelineOutcome>,
}

impl Report {
    /// Every pipeline reproduced the original state
    pub fn is_lossless(&self) -> bool {
        self.outcomes.iter().all(|o| o.decoded == self.original)
    }

    /// Every pipeline produced the same state as every other
    pub fn pipelines_agree(&self) -> bool {
        self.outcomes
            .windows(2)
            .all(|pair| pair[0].decoded == pair[1].decoded)
    }

    pub fn outcome(&self, pipeline: Pipeline) -> Option<&PipelineOutcome> {
        self.outcomes.iter().find(|o| o.pipeline == pipeline)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Should have states {}", self.original)?;
        writeln!(f, "Serialized:   {}", self.serialized)?;
        writeln!(f, "Deserialized: {}", self.deserialized)?;
        for outcome in &self.outcomes {
            let verdict = if outcome.decoded == self.original {
                "ok"
            } else {
                "MISMATCH"
            };
            writeln!(
                f,
                "{:<11} {:>4} bytes  {}  {}",
                outcome.pipeline.name(),
                outcome.encoded_len,
                outcome.decoded,
                verdict
            )?;
        }
        write!(
            f,
            "Pipelines agree: {}",
            if self.pipelines_agree() { "yes" } else { "no" }
        )
    }
}
