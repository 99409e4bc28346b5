//! Per-tick render snapshots
//!
//! After every step the engine builds a [`VisualFrame`] and hands it to a
//! [`FrameSink`]. The engine never inspects the sink; a headless run passes
//! [`NullSink`], a renderer or recorder passes its own.

use crate::core_types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a renderer needs to draw one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualFrame {
    pub tick: u32,
    /// Signed intensity per tree node: vitality for healthy trees,
    /// `vitality - fire_color_offset` for burning ones. Rock nodes are absent.
    pub intensities: BTreeMap<NodeId, f64>,
    /// Node of each firefighter, indexed by agent id.
    pub firefighter_positions: Vec<NodeId>,
}

impl VisualFrame {
    /// Nodes drawn as burning.
    pub fn burning_nodes(&self, fire_color_offset: f64) -> impl Iterator<Item = NodeId> + '_ {
        self.intensities
            .iter()
            .filter(move |&(_, &v)| v <= 0.0 && v > -fire_color_offset)
            .map(|(&n, _)| n)
    }
}

/// Receives one frame per completed step.
pub trait FrameSink {
    fn deliver(&mut self, frame: &VisualFrame);
}

/// Discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    #[inline]
    fn deliver(&mut self, _frame: &VisualFrame) {}
}

/// Keeps every delivered frame in memory.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    frames: Vec<VisualFrame>,
}

impl FrameRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn frames(&self) -> &[VisualFrame] {
        &self.frames
    }

    #[must_use]
    pub fn into_frames(self) -> Vec<VisualFrame> {
        self.frames
    }
}

impl FrameSink for FrameRecorder {
    fn deliver(&mut self, frame: &VisualFrame) {
        self.frames.push(frame.clone());
    }
}

impl<F> FrameSink for F
where
    F: FnMut(&VisualFrame),
{
    fn deliver(&mut self, frame: &VisualFrame) {
        self(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tick: u32) -> VisualFrame {
        VisualFrame {
            tick,
            intensities: [(NodeId(0), 120.0), (NodeId(2), -156.0)]
                .into_iter()
                .collect(),
            firefighter_positions: vec![NodeId(2)],
        }
    }

    #[test]
    fn test_recorder_keeps_frames_in_order() {
        let mut recorder = FrameRecorder::new();
        recorder.deliver(&frame(1));
        recorder.deliver(&frame(2));
        let ticks: Vec<u32> = recorder.frames().iter().map(|f| f.tick).collect();
        assert_eq!(ticks, vec![1, 2]);
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |f: &VisualFrame| seen.push(f.tick);
            sink.deliver(&frame(7));
        }
        assert_eq!(seen, vec![7]);
    }

    #[test]
    fn test_burning_nodes_from_signal() {
        let f = frame(0);
        let burning: Vec<NodeId> = f.burning_nodes(256.0).collect();
        assert_eq!(burning, vec![NodeId(2)]);
    }
}
