//! Pipeline integration tests
//!
//! Runs complete graphs through the engine and checks the rendered buffer
//! stored on the Output node.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use approx::assert_abs_diff_eq;
use montage::prelude::*;
use montage::{EffectRendering, MergeStrategy, PipelineError, PipelineState};
use montage::core::GraphError;
use std::sync::Arc;

/// Input (3 s mono at 44.1 kHz) -> Trim{start "00:00:01", duration "1"} -> Output
/// renders exactly one second starting at source frame 44100.
#[tokio::test]
async fn test_trim_one_second_from_three() {
    let engine = test_engine();
    let ids = build_chain(&engine, &[NodeKind::Input, NodeKind::Trim, NodeKind::Output]);
    let source = generate_position_ramp(3 * TEST_SAMPLE_RATE as usize);
    engine
        .update_node_parameter(&ids[0], FILE_KEY, mono_wav(source.clone(), TEST_SAMPLE_RATE))
        .unwrap();
    engine.update_node_parameter(&ids[1], "start", "00:00:01").unwrap();
    engine.update_node_parameter(&ids[1], "duration", "1").unwrap();

    let output = engine.run_pipeline().await.unwrap();

    assert_eq!(output.output, ids[2]);
    assert_eq!(output.buffer.sample_rate(), TEST_SAMPLE_RATE);
    assert_eq!(output.buffer.channel_count(), 1);
    assert_eq!(output.buffer.frame_count(), 44100);
    let rendered = output.buffer.channel(0).unwrap();
    assert_abs_diff_eq!(rendered[0], source[44100], epsilon = FLOAT_EPSILON);
    assert_abs_diff_eq!(rendered[44099], source[88199], epsilon = FLOAT_EPSILON);

    let stored = engine.output_audio(&ids[2]).unwrap();
    assert!(Arc::ptr_eq(&stored, &output.buffer));
    assert_eq!(engine.pipeline_state(), PipelineState::Completed);
    assert!(!engine.is_processing());
}

/// Two 2 s inputs -> Merge -> Output produce a 2 s averaged mix.
#[tokio::test]
async fn test_merge_two_inputs() {
    let engine = test_engine();
    let a = engine.add_node(NodeKind::Input).unwrap();
    let b = engine.add_node(NodeKind::Input).unwrap();
    let merge = engine.add_node(NodeKind::Merge).unwrap();
    let output = engine.add_node(NodeKind::Output).unwrap();
    engine.connect(&a, OUTPUT_PORT, &merge, "a").unwrap();
    engine.connect(&b, OUTPUT_PORT, &merge, "b").unwrap();
    engine.connect(&merge, OUTPUT_PORT, &output, INPUT_PORT).unwrap();
    engine
        .update_node_parameter(&a, FILE_KEY, dc_wav(0.2, 2.0, TEST_SAMPLE_RATE))
        .unwrap();
    engine
        .update_node_parameter(&b, FILE_KEY, dc_wav(0.6, 2.0, TEST_SAMPLE_RATE))
        .unwrap();

    let rendered = engine.run_pipeline().await.unwrap();

    assert_eq!(rendered.buffer.frame_count(), 2 * TEST_SAMPLE_RATE as usize);
    assert_abs_diff_eq!(rendered.buffer.duration_seconds(), 2.0, epsilon = 1e-9);
    for &sample in rendered.buffer.channel(0).unwrap().iter().step_by(997) {
        assert_abs_diff_eq!(sample, 0.4, epsilon = DSP_EPSILON);
    }
}

/// Mixing pads the shorter source; concatenation joins in insertion order.
#[tokio::test]
async fn test_merge_strategies_with_unequal_lengths() {
    for (strategy, expected_frames) in [(MergeStrategy::Mix, 8000), (MergeStrategy::Concat, 12000)] {
        let engine = MontageEngine::builder()
            .merge_strategy(strategy)
            .build()
            .unwrap();
        let a = engine.add_node(NodeKind::Input).unwrap();
        let b = engine.add_node(NodeKind::Record).unwrap();
        let merge = engine.add_node(NodeKind::Merge).unwrap();
        let output = engine.add_node(NodeKind::Output).unwrap();
        engine.connect(&a, OUTPUT_PORT, &merge, "a").unwrap();
        engine.connect(&b, OUTPUT_PORT, &merge, "b").unwrap();
        engine.connect(&merge, OUTPUT_PORT, &output, INPUT_PORT).unwrap();
        engine
            .update_node_parameter(&a, FILE_KEY, dc_wav(0.5, 1.0, 8000))
            .unwrap();
        engine
            .update_node_parameter(&b, FILE_KEY, dc_wav(0.5, 0.5, 8000))
            .unwrap();

        let rendered = engine.run_pipeline().await.unwrap();
        let samples = rendered.buffer.channel(0).unwrap();
        assert_eq!(samples.len(), expected_frames, "{:?}", strategy);

        if strategy == MergeStrategy::Mix {
            assert_abs_diff_eq!(samples[0], 0.5, epsilon = DSP_EPSILON);
            assert_abs_diff_eq!(samples[7999], 0.25, epsilon = DSP_EPSILON);
        } else {
            assert!(samples.iter().all(|&s| (s - 0.5).abs() < DSP_EPSILON));
        }
    }
}

/// Input -> Effect{fadeOut} -> Output without a Trim node is rejected before
/// the source is decoded.
#[tokio::test]
async fn test_fade_out_without_trim() {
    let engine = test_engine();
    let ids = build_chain(&engine, &[NodeKind::Input, NodeKind::Effect, NodeKind::Output]);
    engine
        .update_node_parameter(&ids[0], FILE_KEY, EncodedAudio::wav(vec![1u8, 2, 3]))
        .unwrap();
    engine.update_node_parameter(&ids[1], "effect", "fadeOut").unwrap();

    let err = engine.run_pipeline().await.unwrap_err();
    assert!(matches!(
        err,
        montage::Error::Pipeline(PipelineError::MissingTrimForFadeOut)
    ));
    assert!(engine.output_audio(&ids[2]).is_none());
}

/// A graph without an Output node fails validation; the undecodable source
/// shows nothing was decoded first.
#[tokio::test]
async fn test_missing_output_fails_before_decode() {
    let engine = test_engine();
    let ids = build_chain(&engine, &[NodeKind::Input, NodeKind::Trim]);
    engine
        .update_node_parameter(&ids[0], FILE_KEY, EncodedAudio::wav(vec![0u8; 8]))
        .unwrap();

    let err = engine.run_pipeline().await.unwrap_err();
    assert!(matches!(err, montage::Error::Graph(GraphError::MissingOutput)));
    assert_eq!(engine.pipeline_state(), PipelineState::Failed);
}

/// A failing run leaves the Output node without audio.
#[tokio::test]
async fn test_failed_run_leaves_output_unset() {
    let engine = test_engine();
    let ids = build_chain(&engine, &[NodeKind::Input, NodeKind::Trim, NodeKind::Output]);
    engine
        .update_node_parameter(&ids[0], FILE_KEY, dc_wav(0.5, 1.0, 8000))
        .unwrap();
    engine.update_node_parameter(&ids[1], "start", "00:00:05").unwrap();
    engine.update_node_parameter(&ids[1], "duration", "1").unwrap();

    let err = engine.run_pipeline().await.unwrap_err();
    assert!(matches!(err, montage::Error::Dsp(_)));
    assert!(engine.output_audio(&ids[2]).is_none());
    assert_eq!(engine.pipeline_state(), PipelineState::Failed);
    assert!(!engine.is_processing());
}

/// An undecodable source is a codec error.
#[tokio::test]
async fn test_undecodable_source() {
    let engine = test_engine();
    let ids = build_chain(&engine, &[NodeKind::Input, NodeKind::Output]);
    engine
        .update_node_parameter(&ids[0], FILE_KEY, EncodedAudio::wav(b"RIFF\0\0\0\0WAVE".to_vec()))
        .unwrap();

    let err = engine.run_pipeline().await.unwrap_err();
    assert!(matches!(err, montage::Error::Codec(_)));
    assert!(engine.output_audio(&ids[1]).is_none());
}

/// A second run while one is in flight is rejected, not queued.
#[tokio::test]
async fn test_concurrent_run_rejected() {
    let gate = Arc::new(GatedTranscoder::default());
    let engine = MontageEngine::builder()
        .effect_rendering(EffectRendering::Transcoder)
        .transcoder(gate.clone())
        .build()
        .unwrap();
    let ids = build_chain(&engine, &[NodeKind::Input, NodeKind::Effect, NodeKind::Output]);
    engine
        .update_node_parameter(&ids[0], FILE_KEY, dc_wav(0.5, 0.25, 8000))
        .unwrap();
    engine.update_node_parameter(&ids[1], "effect", "echo").unwrap();

    let first = engine.run_pipeline();
    let second = async {
        gate.entered.notified().await;
        assert!(engine.is_processing());
        assert_eq!(engine.pipeline_state(), PipelineState::EffectApplying);
        let result = engine.run_pipeline().await;
        gate.release.notify_one();
        result
    };
    let (first, second) = tokio::join!(first, second);

    assert!(first.is_ok());
    assert!(matches!(
        second,
        Err(montage::Error::Pipeline(PipelineError::AlreadyProcessing))
    ));
    assert!(!engine.is_processing());
    assert!(engine.output_audio(&ids[2]).is_some());
}

/// Edits made while a run is in flight discard its result.
#[tokio::test]
async fn test_edit_during_run_discards_result() {
    for delete_output in [false, true] {
        let gate = Arc::new(GatedTranscoder::default());
        let engine = MontageEngine::builder()
            .effect_rendering(EffectRendering::Transcoder)
            .transcoder(gate.clone())
            .build()
            .unwrap();
        let ids = build_chain(&engine, &[NodeKind::Input, NodeKind::Effect, NodeKind::Output]);
        engine
            .update_node_parameter(&ids[0], FILE_KEY, dc_wav(0.5, 0.25, 8000))
            .unwrap();
        engine.update_node_parameter(&ids[1], "effect", "echo").unwrap();

        let run = engine.run_pipeline();
        let edit = async {
            gate.entered.notified().await;
            if delete_output {
                engine.delete_node(&ids[2]).unwrap();
            } else {
                engine.update_node_parameter(&ids[1], "effect", "reverb").unwrap();
            }
            gate.release.notify_one();
        };
        let (result, ()) = tokio::join!(run, edit);

        assert!(matches!(
            result,
            Err(montage::Error::Pipeline(PipelineError::GraphChanged))
        ));
        assert_eq!(engine.pipeline_state(), PipelineState::Failed);
        assert!(!engine.is_processing());
        assert!(engine.output_audio(&ids[2]).is_none());
    }
}

/// Echo rendered by the transcoder matches the local operator.
#[tokio::test]
async fn test_echo_through_transcoder_matches_local() {
    let transcoder = Arc::new(LoopbackTranscoder::default());
    let delegated = MontageEngine::builder()
        .effect_rendering(EffectRendering::Transcoder)
        .transcoder(transcoder.clone())
        .build()
        .unwrap();
    let local = test_engine();

    let samples = generate_sine(440.0, 8000, 4000);
    let mut rendered = Vec::new();
    for engine in [&delegated, &local] {
        let ids = build_chain(engine, &[NodeKind::Input, NodeKind::Effect, NodeKind::Output]);
        engine
            .update_node_parameter(&ids[0], FILE_KEY, mono_wav(samples.clone(), 8000))
            .unwrap();
        engine.update_node_parameter(&ids[1], "effect", "echo").unwrap();
        rendered.push(engine.run_pipeline().await.unwrap().buffer);
    }

    assert_eq!(
        transcoder.requests.lock().unwrap().as_slice(),
        ["aecho=0.8:0.88:60:0.4".to_string()]
    );
    let (remote, local) = (rendered[0].channel(0).unwrap(), rendered[1].channel(0).unwrap());
    assert_eq!(remote.len(), local.len());
    for (a, b) in remote.iter().zip(local) {
        assert_abs_diff_eq!(*a, *b, epsilon = 4.0 * INT16_ROUNDTRIP_EPSILON);
    }
}

/// Editing the graph after a run does not disturb the stored output.
#[tokio::test]
async fn test_output_survives_later_edits() {
    let engine = test_engine();
    let ids = build_chain(&engine, &[NodeKind::Input, NodeKind::Effect, NodeKind::Output]);
    engine
        .update_node_parameter(&ids[0], FILE_KEY, dc_wav(1.0, 1.0, 8000))
        .unwrap();
    engine.update_node_parameter(&ids[1], "effect", "fadeIn").unwrap();
    engine.update_node_parameter(&ids[1], "fadeDuration", 0.5).unwrap();

    let first = engine.run_pipeline().await.unwrap();
    let samples = first.buffer.channel(0).unwrap();
    assert_eq!(samples[0], 0.0);
    assert_abs_diff_eq!(samples[2000], 0.5, epsilon = DSP_EPSILON);
    assert_eq!(samples[4000], 1.0);

    engine.update_node_parameter(&ids[1], "effect", "none").unwrap();
    let stored = engine.output_audio(&ids[2]).unwrap();
    assert!(Arc::ptr_eq(&stored, &first.buffer));
}
