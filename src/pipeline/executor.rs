//! Graph execution.

use super::PipelineState;
use crate::context::EditContext;
use crate::error::{PipelineError, Result};
use montage_codec::{CodecError, FilterGraph};
use montage_core::graph::{
    parse_seconds, time_str_to_seconds, EffectName, Graph, NodeId, NodeKind, NodeParams,
};
use montage_core::{EffectRendering, EncodedAudio, GraphError, MergeStrategy, SampleBuffer};
use montage_dsp::{EchoParams, MergeOptions, TrimRegion};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Rendered result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// The Output node the result belongs to.
    pub output: NodeId,
    pub buffer: Arc<SampleBuffer>,
}

/// Runs graphs one at a time.
///
/// A second [`run`](Self::run) while one is in flight fails with
/// [`PipelineError::AlreadyProcessing`]; nothing is queued.
#[derive(Debug)]
pub struct PipelineExecutor {
    state: AtomicU8,
    processing: AtomicBool,
}

impl Default for PipelineExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineExecutor {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(PipelineState::Idle as u8),
            processing: AtomicBool::new(false),
        }
    }

    /// Stage of the current run, or the outcome of the last one.
    pub fn state(&self) -> PipelineState {
        PipelineState::from(self.state.load(Ordering::Acquire))
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    fn set_state(&self, state: PipelineState) {
        debug!(?state, "pipeline state");
        self.state.store(state as u8, Ordering::Release);
    }

    /// Execute `graph` and return the rendered buffer.
    ///
    /// The graph is only read. Every structural problem (missing Output,
    /// missing sources, bad trim duration, fade-out without trim) is reported
    /// before any source is decoded.
    pub async fn run(&self, graph: &Graph, context: &EditContext) -> Result<PipelineOutput> {
        self.run_and_commit(graph, context, |_| Ok(())).await
    }

    /// Like [`run`](Self::run), but hands the rendered output to `commit`
    /// before the run is reported as completed. A commit error fails the run.
    pub async fn run_and_commit<F>(
        &self,
        graph: &Graph,
        context: &EditContext,
        commit: F,
    ) -> Result<PipelineOutput>
    where
        F: FnOnce(&PipelineOutput) -> Result<()>,
    {
        if self
            .processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("pipeline run rejected: already processing");
            return Err(PipelineError::AlreadyProcessing.into());
        }
        let _guard = ProcessingGuard(self);

        self.set_state(PipelineState::Resolving);
        let result = self
            .execute(graph, context)
            .await
            .and_then(|output| commit(&output).map(|()| output));
        match &result {
            Ok(output) => {
                self.set_state(PipelineState::Completed);
                info!(
                    output = %output.output,
                    frames = output.buffer.frame_count(),
                    channels = output.buffer.channel_count(),
                    "pipeline completed"
                );
            }
            Err(e) => {
                self.set_state(PipelineState::Failed);
                warn!(error = %e, "pipeline failed");
            }
        }
        result
    }

    async fn execute(&self, graph: &Graph, context: &EditContext) -> Result<PipelineOutput> {
        let plan = Plan::build(graph, context)?;

        let mut buffer = match plan.sources {
            Sources::Single(audio) => decode(audio.clone()).await?,
            Sources::Merge(sources) => {
                let mut decoded = Vec::with_capacity(sources.len());
                for audio in sources {
                    decoded.push(decode(audio.clone()).await?);
                }

                self.set_state(PipelineState::Merging);
                let refs: Vec<&SampleBuffer> = decoded.iter().collect();
                let config = context.config();
                match config.merge_strategy {
                    MergeStrategy::Mix => montage_dsp::merge(
                        &refs,
                        MergeOptions::new(config.merge_normalization),
                    )?,
                    MergeStrategy::Concat => montage_dsp::concat(&refs)?,
                }
            }
        };

        if let Some(region) = plan.trim {
            self.set_state(PipelineState::Trimming);
            buffer = montage_dsp::trim(&buffer, region)?;
        }

        if let Some(effect) = plan.effect {
            self.set_state(PipelineState::EffectApplying);
            buffer = match effect {
                EffectStep::FadeIn(seconds) => montage_dsp::fade_in(&buffer, seconds),
                EffectStep::FadeOut(seconds) => montage_dsp::fade_out(&buffer, seconds),
                EffectStep::Delay(params) => match context.transcoder() {
                    Some(transcoder)
                        if context.config().effect_rendering == EffectRendering::Transcoder =>
                    {
                        montage_codec::render_with(transcoder, &buffer, &FilterGraph::Echo(params))
                            .await?
                    }
                    _ => montage_dsp::echo(&buffer, params)?,
                },
            };
        }

        Ok(PipelineOutput {
            output: plan.output,
            buffer: Arc::new(buffer),
        })
    }
}

/// Clears the processing flag on every exit path, including cancellation.
struct ProcessingGuard<'a>(&'a PipelineExecutor);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        if self.0.state().is_running() {
            self.0.set_state(PipelineState::Failed);
        }
        self.0.processing.store(false, Ordering::Release);
    }
}

enum Sources<'g> {
    Single(&'g EncodedAudio),
    Merge(Vec<&'g EncodedAudio>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EffectStep {
    FadeIn(f64),
    FadeOut(f64),
    Delay(EchoParams),
}

/// Everything a run needs, resolved from the graph before decoding.
struct Plan<'g> {
    output: NodeId,
    sources: Sources<'g>,
    trim: Option<TrimRegion>,
    effect: Option<EffectStep>,
}

impl<'g> Plan<'g> {
    fn build(graph: &'g Graph, context: &EditContext) -> Result<Self> {
        let topology = graph.validate()?;

        let sources = if topology.merge.is_some() {
            let sources: Vec<&EncodedAudio> = graph
                .nodes()
                .iter()
                .filter(|n| n.kind().is_source())
                .filter_map(|n| n.source_audio())
                .collect();
            if sources.len() < 2 {
                return Err(PipelineError::InsufficientSources(sources.len()).into());
            }
            Sources::Merge(sources)
        } else {
            let audio = graph
                .nodes_of_kind(NodeKind::Input)
                .find_map(|n| n.source_audio())
                .or_else(|| {
                    graph
                        .nodes_of_kind(NodeKind::Record)
                        .find_map(|n| n.source_audio())
                })
                .ok_or(PipelineError::NoAudioSource)?;
            Sources::Single(audio)
        };

        let trim = match graph.first_of_kind(NodeKind::Trim).map(|n| n.params()) {
            Some(NodeParams::Trim { start, duration }) => {
                let seconds =
                    parse_seconds(duration).ok_or_else(|| GraphError::InvalidParameter {
                        key: "duration".into(),
                        reason: format!("'{}' is not a number of seconds", duration),
                    })?;
                Some(TrimRegion::from_start(time_str_to_seconds(start), seconds))
            }
            _ => None,
        };

        let effect = match graph.first_of_kind(NodeKind::Effect).map(|n| n.params()) {
            Some(NodeParams::Effect {
                effect,
                fade_duration,
            }) => match effect {
                EffectName::None => None,
                EffectName::FadeIn => Some(EffectStep::FadeIn(*fade_duration)),
                EffectName::FadeOut => {
                    if trim.is_none() {
                        return Err(PipelineError::MissingTrimForFadeOut.into());
                    }
                    Some(EffectStep::FadeOut(*fade_duration))
                }
                EffectName::Echo => Some(EffectStep::Delay(EchoParams::ECHO)),
                EffectName::Reverb => Some(EffectStep::Delay(EchoParams::REVERB)),
            },
            _ => None,
        };

        if matches!(effect, Some(EffectStep::Delay(_)))
            && context.config().effect_rendering == EffectRendering::Transcoder
            && context.transcoder().is_none()
        {
            return Err(CodecError::TranscodeUnavailable("echo/reverb rendering".into()).into());
        }

        debug!(
            output = %topology.output,
            merge = topology.merge.is_some(),
            ?trim,
            ?effect,
            "pipeline planned"
        );
        Ok(Self {
            output: topology.output,
            sources,
            trim,
            effect,
        })
    }
}

/// Decode off the async thread.
pub(crate) async fn decode(audio: EncodedAudio) -> Result<SampleBuffer> {
    let mime = audio.mime().to_string();
    let buffer = tokio::task::spawn_blocking(move || montage_codec::decode_audio(&audio))
        .await
        .map_err(|e| CodecError::DecodeError(format!("decode task failed: {}", e)))??;
    debug!(
        mime = %mime,
        frames = buffer.frame_count(),
        sample_rate = buffer.sample_rate(),
        "decoded source"
    );
    Ok(buffer)
}
