//! Series storage
//!
//! [`SeriesStore`] routes streamed samples into one [`SeriesBuffer`] per
//! (facet, line) pair according to the channel mapping. Buffers are keyed by
//! the pair, not by the channel, so reconfiguring keeps the history of every
//! pair that is still targeted.

use crate::config::{ChannelMapping, ChannelTarget};
use crate::types::{DataPoint, Extent, Sample, SeriesBuffer};
use std::collections::{BTreeMap, BTreeSet};

/// What a [`SeriesStore::configure`] call changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreChanges {
    /// Pairs whose buffer survived
    pub kept: Vec<ChannelTarget>,
    /// Pairs that start with an empty buffer
    pub added: Vec<ChannelTarget>,
    /// Pairs whose buffer was discarded
    pub dropped: Vec<ChannelTarget>,
    /// Channels ignored because another channel already claimed their pair
    pub ignored: Vec<String>,
}

/// Accumulates samples per (facet, line) pair
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    channels: BTreeMap<String, ChannelTarget>,
    buffers: BTreeMap<ChannelTarget, SeriesBuffer>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the channel mapping.
    ///
    /// A pair may be claimed by one channel only. Channels that keep their
    /// previous target claim first, the remaining ones follow in key order;
    /// later claims on a taken pair are ignored. Buffers of pairs that are
    /// still claimed survive, new pairs start empty, and unclaimed pairs are
    /// dropped.
    pub fn configure(&mut self, mapping: &ChannelMapping) -> StoreChanges {
        let mut changes = StoreChanges::default();
        let mut channels = BTreeMap::new();
        let mut claimed = BTreeSet::new();

        let (unchanged, moved): (Vec<_>, Vec<_>) = mapping
            .iter()
            .partition(|(channel, target)| self.channels.get(*channel) == Some(*target));

        for (channel, target) in unchanged.into_iter().chain(moved) {
            if !claimed.insert(target.clone()) {
                tracing::warn!(
                    "Channel '{}' targets {} which is already claimed, ignoring it",
                    channel,
                    target
                );
                changes.ignored.push(channel.clone());
                continue;
            }
            channels.insert(channel.clone(), target.clone());
        }

        let mut buffers = BTreeMap::new();
        for target in claimed {
            match self.buffers.remove(&target) {
                Some(buffer) => {
                    changes.kept.push(target.clone());
                    buffers.insert(target, buffer);
                }
                None => {
                    changes.added.push(target.clone());
                    buffers.insert(target, SeriesBuffer::new());
                }
            }
        }
        changes.dropped = std::mem::take(&mut self.buffers).into_keys().collect();

        self.channels = channels;
        self.buffers = buffers;
        changes
    }

    /// Route one sample; channels without a mapping are skipped.
    pub fn append(&mut self, sample: &Sample) {
        for (channel, &value) in &sample.y {
            let Some(target) = self.channels.get(channel) else {
                tracing::trace!("Skipping unmapped channel '{}'", channel);
                continue;
            };
            if let Some(buffer) = self.buffers.get_mut(target) {
                buffer.push(DataPoint::new(sample.x, value));
            }
        }
    }

    /// Route samples in order
    pub fn append_all<'a>(&mut self, samples: impl IntoIterator<Item = &'a Sample>) {
        for sample in samples {
            self.append(sample);
        }
    }

    /// Resolved channel mapping
    pub fn channels(&self) -> &BTreeMap<String, ChannelTarget> {
        &self.channels
    }

    pub fn buffer(&self, facet: &str, line: &str) -> Option<&SeriesBuffer> {
        self.buffers.get(&ChannelTarget::new(facet, line))
    }

    /// Buffers of one facet keyed by line, in line order
    pub fn buffers_for_facet(&self, facet: &str) -> BTreeMap<&str, &SeriesBuffer> {
        self.buffers
            .iter()
            .filter(|(target, _)| target.facet == facet)
            .map(|(target, buffer)| (target.line.as_str(), buffer))
            .collect()
    }

    /// Facets with at least one claimed pair, in key order
    pub fn facets(&self) -> BTreeSet<&str> {
        self.buffers.keys().map(|t| t.facet.as_str()).collect()
    }

    /// x extent across every buffer
    pub fn x_extent(&self) -> Option<Extent> {
        self.buffers
            .values()
            .fold(None, |acc, buffer| Extent::merge(acc, buffer.x_extent()))
    }

    /// y extent across the buffers of one facet
    pub fn y_extent(&self, facet: &str, positive_only: bool) -> Option<Extent> {
        self.buffers_for_facet(facet)
            .values()
            .fold(None, |acc, buffer| Extent::merge(acc, buffer.y_extent(positive_only)))
    }

    /// Total number of stored points
    pub fn total_points(&self) -> usize {
        self.buffers.values().map(SeriesBuffer::len).sum()
    }
}
