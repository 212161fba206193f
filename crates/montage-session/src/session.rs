//! Capacity-bounded track collection with a single selection.

use crate::error::{Result, SessionError};
use crate::track::{Track, TrackId, TrackOrigin};
use montage_core::{MergeStrategy, MontageConfig, SampleBuffer};
use montage_dsp::{MergeOptions, TrimRegion};
use std::collections::HashMap;
use tracing::{debug, info};

/// Tracks of the linear editor, in insertion order.
///
/// At most one Recorded track exists at a time; re-recording replaces its
/// audio in place.
#[derive(Debug, Clone)]
pub struct TrackSession {
    tracks: Vec<Track>,
    selected: Option<TrackId>,
    regions: HashMap<TrackId, TrimRegion>,
    max_tracks: usize,
    max_imported: usize,
}

impl Default for TrackSession {
    fn default() -> Self {
        Self::new(&MontageConfig::default())
    }
}

impl TrackSession {
    pub fn new(config: &MontageConfig) -> Self {
        Self::with_limits(config.max_tracks, config.max_imported_tracks)
    }

    pub fn with_limits(max_tracks: usize, max_imported: usize) -> Self {
        Self {
            tracks: Vec::new(),
            selected: None,
            regions: HashMap::new(),
            max_tracks,
            max_imported,
        }
    }

    /// Add a track, or replace the Recorded track's audio on re-record.
    ///
    /// New tracks become the selection. Capacity is checked before the import
    /// limit.
    pub fn add_or_update_track(
        &mut self,
        buffer: SampleBuffer,
        origin: TrackOrigin,
        mime: Option<String>,
    ) -> Result<TrackId> {
        if origin == TrackOrigin::Recorded {
            if let Some(track) = self
                .tracks
                .iter_mut()
                .find(|t| t.origin() == TrackOrigin::Recorded)
            {
                track.replace_buffer(buffer, mime);
                let id = track.id();
                self.regions.remove(&id);
                info!(track = %id, "replaced recorded track");
                return Ok(id);
            }
        }

        if self.tracks.len() >= self.max_tracks {
            return Err(SessionError::TrackLimitReached(self.max_tracks));
        }
        if origin == TrackOrigin::Imported && self.imported_count() >= self.max_imported {
            return Err(SessionError::ImportLimitReached(self.max_imported));
        }

        let track = Track::new(buffer, origin, mime);
        let id = track.id();
        self.tracks.push(track);
        self.selected = Some(id);
        info!(track = %id, ?origin, count = self.tracks.len(), "added track");
        Ok(id)
    }

    pub fn select_track(&mut self, id: TrackId) -> Result<()> {
        self.require(id)?;
        self.selected = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<TrackId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Track> {
        self.selected.and_then(|id| self.track(id))
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn imported_count(&self) -> usize {
        self.tracks
            .iter()
            .filter(|t| t.origin() == TrackOrigin::Imported)
            .count()
    }

    /// Remember the selected span of a track.
    pub fn set_trim_region(&mut self, id: TrackId, region: TrimRegion) -> Result<()> {
        self.require(id)?;
        if !region.start.is_finite()
            || !region.end.is_finite()
            || region.start < 0.0
            || region.end <= region.start
        {
            return Err(SessionError::InvalidRegion {
                start: region.start,
                end: region.end,
            });
        }
        self.regions.insert(id, region);
        Ok(())
    }

    pub fn trim_region(&self, id: TrackId) -> Option<TrimRegion> {
        self.regions.get(&id).copied()
    }

    pub fn clear_trim_region(&mut self, id: TrackId) {
        self.regions.remove(&id);
    }

    /// Trim the selected track to `region`, or to its stored region when `None`.
    pub fn trim_selected(&mut self, region: Option<TrimRegion>) -> Result<()> {
        let id = self.selected.ok_or(SessionError::NoTrackSelected)?;
        let region = region
            .or_else(|| self.trim_region(id))
            .ok_or(SessionError::NoRegionSet)?;
        let trimmed = montage_dsp::trim(self.require(id)?.buffer(), region)?;
        debug!(track = %id, start = region.start, end = region.end, "trimmed track");
        self.replace_selected(id, trimmed)
    }

    pub fn fade_in_selected(&mut self, seconds: f64) -> Result<()> {
        let id = self.selected.ok_or(SessionError::NoTrackSelected)?;
        let faded = montage_dsp::fade_in(self.require(id)?.buffer(), seconds);
        debug!(track = %id, seconds, "faded in");
        self.replace_selected(id, faded)
    }

    pub fn fade_out_selected(&mut self, seconds: f64) -> Result<()> {
        let id = self.selected.ok_or(SessionError::NoTrackSelected)?;
        let faded = montage_dsp::fade_out(self.require(id)?.buffer(), seconds);
        debug!(track = %id, seconds, "faded out");
        self.replace_selected(id, faded)
    }

    /// Remove a track; the selection is cleared if it pointed at it.
    pub fn delete_track(&mut self, id: TrackId) -> Result<Track> {
        let index = self
            .tracks
            .iter()
            .position(|t| t.id() == id)
            .ok_or(SessionError::UnknownTrack(id))?;
        let track = self.tracks.remove(index);
        self.regions.remove(&id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        info!(track = %id, "deleted track");
        Ok(track)
    }

    /// Combine every track into one buffer.
    pub fn merge_tracks(&self, strategy: MergeStrategy, options: MergeOptions) -> Result<SampleBuffer> {
        let buffers: Vec<&SampleBuffer> = self.tracks.iter().map(Track::buffer).collect();
        let merged = match strategy {
            MergeStrategy::Mix => montage_dsp::merge(&buffers, options)?,
            MergeStrategy::Concat => montage_dsp::concat(&buffers)?,
        };
        Ok(merged)
    }

    fn require(&self, id: TrackId) -> Result<&Track> {
        self.track(id).ok_or(SessionError::UnknownTrack(id))
    }

    fn replace_selected(&mut self, id: TrackId, buffer: SampleBuffer) -> Result<()> {
        let track = self
            .tracks
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or(SessionError::UnknownTrack(id))?;
        track.replace_buffer(buffer, None);
        self.regions.remove(&id);
        Ok(())
    }
}
