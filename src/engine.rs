//! MontageEngine that coordinates the graph, pipeline and track session

use crate::context::EditContext;
use crate::error::{PipelineError, Result};
use crate::export::ExportSink;
use crate::pipeline::{self, PipelineExecutor, PipelineOutput, PipelineState};
use montage_codec::ContainerFormat;
use montage_core::graph::{
    Edge, Graph, GraphDescription, Node, NodeId, NodeKind, ParamValue, ResolvedAudio,
};
use montage_core::{EncodedAudio, MontageConfig, SampleBuffer};
use montage_dsp::{MergeOptions, TrimRegion};
use montage_session::{
    CaptureSource, SessionError, StopSignal, Track, TrackId, TrackOrigin, TrackSession,
};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tracing::{debug, info};

/// Audio editing engine.
///
/// Owns the node graph, the pipeline executor and the linear track session.
/// Locks are never held across an `.await`, so the engine can be shared
/// between tasks behind an `Arc`.
///
/// # Example
///
/// ```ignore
/// use montage::prelude::*;
///
/// let engine = MontageEngine::builder().max_tracks(3).build()?;
///
/// let input = engine.add_node(NodeKind::Input)?;
/// let trim = engine.add_node(NodeKind::Trim)?;
/// let output = engine.add_node(NodeKind::Output)?;
/// engine.connect(&input, OUTPUT_PORT, &trim, INPUT_PORT)?;
/// engine.connect(&trim, OUTPUT_PORT, &output, INPUT_PORT)?;
/// engine.update_node_parameter(&input, FILE_KEY, EncodedAudio::wav(bytes))?;
/// engine.update_node_parameter(&trim, "start", "00:00:01")?;
///
/// let rendered = engine.run_pipeline().await?;
/// ```
pub struct MontageEngine {
    context: EditContext,
    graph: Mutex<Graph>,
    executor: PipelineExecutor,
    session: Mutex<TrackSession>,
}

impl MontageEngine {
    /// Create a new engine builder
    pub fn builder() -> crate::MontageEngineBuilder {
        crate::MontageEngineBuilder::default()
    }

    pub(crate) fn from_context(context: EditContext) -> Self {
        let session = TrackSession::new(context.config());
        Self {
            context,
            graph: Mutex::new(Graph::new()),
            executor: PipelineExecutor::new(),
            session: Mutex::new(session),
        }
    }

    pub fn context(&self) -> &EditContext {
        &self.context
    }

    pub fn config(&self) -> &MontageConfig {
        self.context.config()
    }

    // =========================================================================
    // Graph
    // =========================================================================

    /// Add a node with default parameters.
    ///
    /// Effect nodes start with the configured default fade duration.
    pub fn add_node(&self, kind: NodeKind) -> Result<NodeId> {
        let mut graph = self.graph.lock();
        let id = graph.add_node(kind);
        if kind == NodeKind::Effect {
            graph.update_node_parameter(
                &id,
                "fadeDuration",
                ParamValue::Number(self.config().default_fade_seconds),
            )?;
        }
        debug!(node = %id, ?kind, "added node");
        Ok(id)
    }

    pub fn connect(
        &self,
        source: &NodeId,
        source_port: &str,
        target: &NodeId,
        target_port: &str,
    ) -> Result<()> {
        self.graph
            .lock()
            .connect(source, source_port, target, target_port)?;
        Ok(())
    }

    /// Remove an edge. Returns whether it existed.
    pub fn disconnect(&self, edge: &Edge) -> bool {
        self.graph.lock().disconnect(edge)
    }

    pub fn update_node_parameter(
        &self,
        id: &NodeId,
        key: &str,
        value: impl Into<ParamValue>,
    ) -> Result<()> {
        self.graph
            .lock()
            .update_node_parameter(id, key, value.into())?;
        Ok(())
    }

    pub fn delete_node(&self, id: &NodeId) -> Result<Node> {
        Ok(self.graph.lock().delete_node(id)?)
    }

    /// Access the graph directly.
    ///
    /// # Example
    /// ```ignore
    /// let outputs = engine.graph(|g| g.nodes_of_kind(NodeKind::Output).count());
    /// ```
    pub fn graph<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Graph) -> R,
    {
        f(&mut self.graph.lock())
    }

    pub fn graph_description(&self) -> GraphDescription {
        self.graph.lock().to_description()
    }

    /// Replace the graph with one built from `description`.
    ///
    /// The current graph is kept when the description is invalid.
    pub fn load_description(&self, description: &GraphDescription) -> Result<()> {
        let graph = Graph::from_description(description)?;
        info!(nodes = graph.len(), edges = graph.edges().len(), "loaded graph description");
        *self.graph.lock() = graph;
        Ok(())
    }

    pub fn load_description_json(&self, json: &str) -> Result<()> {
        let description = GraphDescription::from_json(json)?;
        self.load_description(&description)
    }

    /// Rendered audio of an Output node, once a run has completed.
    pub fn output_audio(&self, id: &NodeId) -> Option<Arc<SampleBuffer>> {
        self.graph
            .lock()
            .node(id)
            .and_then(Node::resolved)
            .and_then(ResolvedAudio::as_decoded)
            .cloned()
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    pub fn is_processing(&self) -> bool {
        self.executor.is_processing()
    }

    pub fn pipeline_state(&self) -> PipelineState {
        self.executor.state()
    }

    /// Execute the current graph and store the result on its Output node.
    ///
    /// The run works on a snapshot, so edits made while it is in flight do
    /// not affect it. Nothing is written back when the run fails. If the
    /// graph was edited in the meantime the result is discarded and the run
    /// fails with [`PipelineError::GraphChanged`].
    pub async fn run_pipeline(&self) -> Result<PipelineOutput> {
        let snapshot = self.graph.lock().clone();
        self.executor
            .run_and_commit(&snapshot, &self.context, |output| {
                let mut live = self.graph.lock();
                if *live != snapshot {
                    return Err(PipelineError::GraphChanged.into());
                }
                live.set_output_audio(
                    &output.output,
                    ResolvedAudio::Decoded(Arc::clone(&output.buffer)),
                )?;
                Ok(())
            })
            .await
    }

    // =========================================================================
    // Tracks
    // =========================================================================

    /// Lock the track session for direct use.
    ///
    /// Do not hold the guard across an `.await`.
    pub fn session(&self) -> MutexGuard<'_, TrackSession> {
        self.session.lock()
    }

    /// Decode an imported file and add it as a track.
    pub async fn import_audio(&self, audio: EncodedAudio) -> Result<TrackId> {
        self.add_decoded(audio, TrackOrigin::Imported).await
    }

    /// Decode a finished recording into the Recorded track.
    pub async fn finish_recording(&self, audio: EncodedAudio) -> Result<TrackId> {
        self.add_decoded(audio, TrackOrigin::Recorded).await
    }

    /// Capture from `source` for at most the configured record budget, then
    /// store the result as the Recorded track.
    pub async fn record(&self, source: &mut dyn CaptureSource, stop: StopSignal) -> Result<TrackId> {
        let captured =
            montage_session::capture(source, self.config().record_budget, stop).await?;
        info!(chunks = captured.chunks, end = ?captured.end, "recording captured");
        self.finish_recording(captured.audio).await
    }

    async fn add_decoded(&self, audio: EncodedAudio, origin: TrackOrigin) -> Result<TrackId> {
        let mime = audio.mime().to_string();
        let buffer = pipeline::decode(audio).await?;
        let id = self
            .session
            .lock()
            .add_or_update_track(buffer, origin, Some(mime))?;
        Ok(id)
    }

    pub fn select_track(&self, id: TrackId) -> Result<()> {
        Ok(self.session.lock().select_track(id)?)
    }

    pub fn set_trim_region(&self, id: TrackId, region: TrimRegion) -> Result<()> {
        Ok(self.session.lock().set_trim_region(id, region)?)
    }

    /// Trim the selected track to `region`, or to its stored region.
    pub fn trim_selected(&self, region: Option<TrimRegion>) -> Result<()> {
        Ok(self.session.lock().trim_selected(region)?)
    }

    /// Fade in the selected track over `seconds`, or the default fade
    /// duration.
    pub fn fade_in_selected(&self, seconds: Option<f64>) -> Result<()> {
        let seconds = seconds.unwrap_or(self.config().default_fade_seconds);
        Ok(self.session.lock().fade_in_selected(seconds)?)
    }

    /// Fade out the selected track over `seconds`, or the default fade
    /// duration.
    pub fn fade_out_selected(&self, seconds: Option<f64>) -> Result<()> {
        let seconds = seconds.unwrap_or(self.config().default_fade_seconds);
        Ok(self.session.lock().fade_out_selected(seconds)?)
    }

    pub fn delete_track(&self, id: TrackId) -> Result<Track> {
        Ok(self.session.lock().delete_track(id)?)
    }

    /// Combine every track using the configured merge strategy.
    pub fn merge_tracks(&self) -> Result<SampleBuffer> {
        let config = self.config();
        let merged = self.session.lock().merge_tracks(
            config.merge_strategy,
            MergeOptions::new(config.merge_normalization),
        )?;
        Ok(merged)
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Encode the selected track and hand it to `sink`.
    ///
    /// Returns the location reported by the sink.
    pub async fn export_selected(
        &self,
        format: ContainerFormat,
        sink: &dyn ExportSink,
    ) -> Result<String> {
        let (id, buffer) = {
            let session = self.session.lock();
            let track = session.selected().ok_or(SessionError::NoTrackSelected)?;
            (track.id(), track.buffer().clone())
        };
        self.export(&buffer, format, &format!("track-{}", id), sink)
            .await
    }

    /// Merge every track and export the result.
    pub async fn export_merged(
        &self,
        format: ContainerFormat,
        sink: &dyn ExportSink,
    ) -> Result<String> {
        let merged = self.merge_tracks()?;
        self.export(&merged, format, "merged", sink).await
    }

    /// Export the rendered Output node of the last successful run.
    pub async fn export_output(
        &self,
        format: ContainerFormat,
        sink: &dyn ExportSink,
    ) -> Result<String> {
        let buffer = {
            let graph = self.graph.lock();
            let rendered = graph
                .first_of_kind(NodeKind::Output)
                .and_then(Node::resolved)
                .and_then(ResolvedAudio::as_decoded)
                .cloned();
            rendered.ok_or(PipelineError::NoAudioSource)?
        };
        self.export(&buffer, format, "output", sink).await
    }

    async fn export(
        &self,
        buffer: &SampleBuffer,
        format: ContainerFormat,
        stem: &str,
        sink: &dyn ExportSink,
    ) -> Result<String> {
        let audio =
            montage_codec::encode_container(buffer, format, self.context.transcoder()).await?;
        let name = format!("{}.{}", stem, format.extension());
        let size = audio.len();
        let location = sink.deliver(&name, audio).await?;
        info!(name = %name, size, location = %location, "exported audio");
        Ok(location)
    }
}

impl std::fmt::Debug for MontageEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MontageEngine")
            .field("context", &self.context)
            .field("state", &self.executor.state())
            .finish_non_exhaustive()
    }
}
