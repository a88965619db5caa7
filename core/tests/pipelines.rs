//! Round-trip tests across every pipeline.
//!
//! Exercises the public API only, the same way the CLI does.

use rand::SeedableRng;
use ubjcheck_core::binary::{from_binary, to_binary};
use ubjcheck_core::compress::{compress, decompress};
use ubjcheck_core::text::{from_text, to_text};
use ubjcheck_core::*;

fn sample_states() -> Vec<GeneratorState> {
    let mut states = vec![
        GeneratorState::demo(),
        GeneratorState::new(0, 0),
        GeneratorState::new(u64::MAX, u64::MAX),
        GeneratorState::new(1 << 63, (1 << 63) - 1),
        GeneratorState::new(0x7F, 0x80),
    ];
    // A spread of generator-produced words
    let mut rng = Xs128Rng::from_state(GeneratorState::demo());
    for _ in 0..32 {
        states.push(GeneratorState::new(rng.next_word(), rng.next_word()));
    }
    states
}

#[test]
fn test_text_roundtrip_identity() {
    for state in sample_states() {
        let text = to_text(&encode_structured(&state), true).unwrap();
        let decoded = decode_structured(&from_text(&text).unwrap()).unwrap();
        assert_eq!(decoded, state, "text: {}", text);
    }
}

#[test]
fn test_binary_roundtrip_identity() {
    for state in sample_states() {
        for compact in [true, false] {
            let bytes = to_binary(&encode_structured(&state), compact).unwrap();
            let decoded = decode_structured(&from_binary(&bytes).unwrap()).unwrap();
            assert_eq!(decoded, state);
        }
    }
}

#[test]
fn test_compressed_binary_is_byte_exact() {
    for state in sample_states() {
        let bytes = to_binary(&encode_structured(&state), true).unwrap();
        assert_eq!(decompress(&compress(&bytes)).unwrap(), bytes);
    }
}

#[test]
fn test_empty_compression_roundtrip() {
    assert!(decompress(&compress(&[])).unwrap().is_empty());
}

#[test]
fn test_large_input_compression_roundtrip() {
    // Larger than any fixed cap a frame could be checked against
    let data = vec![0u8; 65 * 1024 * 1024];
    let frame = compress(&data);
    assert!(frame.len() < data.len() / 200);
    assert_eq!(decompress(&frame).unwrap(), data);
}

#[test]
fn test_header_only_frame_rejected() {
    let mut frame = (64u64 * 1024 * 1024).to_le_bytes().to_vec();
    frame.push(0);
    assert!(matches!(
        decompress(&frame),
        Err(CodecError::Corruption(_))
    ));
}

#[test]
fn test_binary_element_bomb_rejected() {
    // Nine bytes declaring 2^24 payload-less elements
    let bomb = [b'[', b'$', b'Z', b'#', b'l', 1, 0, 0, 0];
    assert!(matches!(from_binary(&bomb), Err(CodecError::Parse { .. })));

    let codec = StateCodec::default();
    let frame = codec.compress(&bomb);
    assert!(matches!(
        codec.decode_with(Pipeline::CompressedBinary, &frame),
        Err(CodecError::Parse { .. })
    ));
}

#[test]
fn test_missing_field_failure() {
    let value = from_text(r#"{"state0": 1311768467139281697}"#).unwrap();
    assert!(matches!(
        decode_structured(&value),
        Err(CodecError::MissingField("state1"))
    ));
}

#[test]
fn test_truncated_binary_never_decodes() {
    let bytes = to_binary(&encode_structured(&GeneratorState::demo()), true).unwrap();
    let result = from_binary(&bytes[..bytes.len() - 1]);
    assert!(matches!(result, Err(CodecError::Parse { .. })), "{:?}", result);
}

#[test]
fn test_concrete_demo_scenario() {
    let codec = StateCodec::default();
    let state = GeneratorState::new(0x1234567887654321, 0x00000000FFFFFFFF);

    let value = codec.encode_structured(&state);
    assert_eq!(value.get("state0"), Some(&Value::Int(1311768467139281697)));
    assert_eq!(value.get("state1"), Some(&Value::Int(4294967295)));

    let text = codec.to_text(&value).unwrap();
    let decoded = codec.decode_structured(&codec.from_text(&text).unwrap()).unwrap();
    assert_eq!(decoded, state);

    let binary = codec.to_binary(&value).unwrap();
    assert_eq!(binary.len(), 36);
    assert_eq!(codec.to_binary(&value).unwrap(), binary);

    let frame = codec.compress(&binary);
    assert_eq!(codec.decompress(&frame).unwrap(), binary);
}

#[test]
fn test_all_pipelines_agree() {
    let codec = StateCodec::default();
    for state in sample_states() {
        let report = codec.run_all(&state, &Pipeline::ALL).unwrap();
        assert!(report.is_lossless(), "{}", report);
        assert!(report.pipelines_agree(), "{}", report);

        let lz4_binary = report.outcome(Pipeline::CompressedBinary).unwrap();
        let lz4_text = report.outcome(Pipeline::CompressedText).unwrap();
        assert_eq!(lz4_binary.decoded, lz4_text.decoded);
    }
}

#[test]
fn test_generator_continues_after_each_pipeline() {
    let codec = StateCodec::default();
    let mut original = Xs128Rng::seed_from_u64(0xC0FFEE);
    for _ in 0..5 {
        original.next_word();
    }

    let mut restored = Xs128Rng::seed_from_u64(0);
    for pipeline in Pipeline::ALL {
        let outcome = codec.run(pipeline, &original.state()).unwrap();
        restored.set_state(outcome.decoded);
        let mut reference = original.clone();
        for _ in 0..16 {
            assert_eq!(restored.next_word(), reference.next_word(), "{}", pipeline);
        }

        let mut converted = Xs128Rng::from(outcome.decoded);
        assert_eq!(converted.next_word(), original.clone().next_word());
    }
}

#[test]
fn test_corrupt_frame_is_distinguishable() {
    let codec = StateCodec::default();
    let mut frame = codec
        .encode_with(Pipeline::CompressedBinary, &GeneratorState::demo())
        .unwrap();
    frame.truncate(frame.len() - 3);
    assert!(matches!(
        codec.decode_with(Pipeline::CompressedBinary, &frame),
        Err(CodecError::Corruption(_))
    ));
}

#[test]
fn test_options_do_not_change_decoded_state() {
    let state = GeneratorState::demo();
    for pretty_text in [true, false] {
        for compact_integers in [true, false] {
            let codec = StateCodec::new(CodecOptions {
                pretty_text,
                compact_integers,
            });
            let report = codec.run_all(&state, &Pipeline::ALL).unwrap();
            assert!(report.is_lossless());
        }
    }
}

