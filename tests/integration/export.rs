//! Export integration tests
//!
//! Encoding finished audio and handing it to an export sink.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use approx::assert_abs_diff_eq;
use montage::codec::CodecError;
use montage::prelude::*;
use montage::session::SessionError;
use montage::PipelineError;
use std::sync::Arc;

#[tokio::test]
async fn test_export_selected_wav() {
    let engine = test_engine();
    let samples = generate_sine(330.0, 8000, 4000);
    let id = engine
        .import_audio(mono_wav(samples.clone(), 8000))
        .await
        .unwrap();
    let sink = MemorySink::default();

    let location = engine
        .export_selected(ContainerFormat::Wav, &sink)
        .await
        .unwrap();
    assert_eq!(location, format!("memory://track-{}.wav", id));

    let deliveries = sink.deliveries.lock().unwrap();
    let (name, audio) = &deliveries[0];
    assert_eq!(name, &format!("track-{}.wav", id));
    assert_eq!(audio.mime(), "audio/wav");

    let decoded = montage::codec::decode_audio(audio).unwrap();
    assert_eq!(decoded.frame_count(), 4000);
    for (a, b) in decoded.channel(0).unwrap().iter().zip(&samples) {
        assert_abs_diff_eq!(*a, *b, epsilon = INT16_ROUNDTRIP_EPSILON);
    }
}

#[tokio::test]
async fn test_export_needs_selection() {
    let engine = test_engine();
    let sink = MemorySink::default();
    let err = engine
        .export_selected(ContainerFormat::Wav, &sink)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Session(SessionError::NoTrackSelected)
    ));
    assert!(sink.deliveries.lock().unwrap().is_empty());
}

/// Compressed containers need a transcoder; nothing reaches the sink otherwise.
#[tokio::test]
async fn test_export_mp3_requires_transcoder() {
    let engine = test_engine();
    engine.import_audio(dc_wav(0.5, 0.5, 8000)).await.unwrap();
    let sink = MemorySink::default();

    let err = engine
        .export_selected(ContainerFormat::Mp3, &sink)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Codec(CodecError::TranscodeUnavailable(_))
    ));
    assert!(sink.deliveries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_export_mp3_through_transcoder() {
    let transcoder = Arc::new(LoopbackTranscoder::default());
    let engine = MontageEngine::builder()
        .transcoder(transcoder.clone())
        .build()
        .unwrap();
    engine.import_audio(dc_wav(0.5, 0.5, 8000)).await.unwrap();
    engine.import_audio(dc_wav(0.5, 0.5, 8000)).await.unwrap();
    let sink = MemorySink::default();

    let location = engine
        .export_merged(ContainerFormat::Mp3, &sink)
        .await
        .unwrap();
    assert_eq!(location, "memory://merged.mp3");
    assert_eq!(
        transcoder.requests.lock().unwrap().as_slice(),
        ["encode=mp3".to_string()]
    );
    assert_eq!(sink.deliveries.lock().unwrap()[0].1.mime(), "audio/mpeg");
}

#[tokio::test]
async fn test_export_output_after_run() {
    let engine = test_engine();
    let sink = MemorySink::default();
    assert!(matches!(
        engine.export_output(ContainerFormat::Wav, &sink).await,
        Err(Error::Pipeline(PipelineError::NoAudioSource))
    ));

    let ids = build_chain(&engine, &[NodeKind::Input, NodeKind::Output]);
    engine
        .update_node_parameter(&ids[0], FILE_KEY, dc_wav(0.5, 0.25, 8000))
        .unwrap();
    engine.run_pipeline().await.unwrap();

    let location = engine
        .export_output(ContainerFormat::Wav, &sink)
        .await
        .unwrap();
    assert_eq!(location, "memory://output.wav");
    let deliveries = sink.deliveries.lock().unwrap();
    let decoded = montage::codec::decode_audio(&deliveries[0].1).unwrap();
    assert_eq!(decoded.frame_count(), 2000);
}
