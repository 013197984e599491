//! Circular track store
//!
//! An ordered, 1-based, position-addressable collection of [`Track`]s kept as
//! a singly linked cycle. Nodes live in an owning arena (`Vec<Node>`) and link
//! to each other by index; removed slots go on a free list and are reused by
//! later inserts.
//!
//! # Invariants
//!
//! - `len > 0`: walking `next` from any node returns to it after exactly `len` steps
//! - `len == 0`: there is no head and no reachable node
//! - Positions are relative to the current head, which moves on
//!   `insert_front` / `remove_front`
//!
//! No tail index is kept, so operations that need the tail walk the cycle.
//! Releasing the arena releases every node at once, so there is never a
//! circular reference to break by hand.

use crate::error::StoreError;
use crate::playlist::track::Track;
use looptune_common::title::fold_case;
use tracing::debug;

/// Opaque handle to a node of one particular [`Playlist`].
///
/// Handles are only meaningful until the next structural mutation of the
/// playlist that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Sort projection for [`Playlist::sort_by`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Cleaned track title (path, extension and numeric prefix stripped)
    Title,
    /// Artist label
    Artist,
}

impl SortKey {
    fn project(self, track: &Track) -> String {
        match self {
            SortKey::Title => fold_case(&track.title()),
            SortKey::Artist => fold_case(&track.artist),
        }
    }
}

#[derive(Debug)]
struct Node {
    track: Track,
    next: usize,
}

/// Circularly linked playlist
#[derive(Debug, Default)]
pub struct Playlist {
    /// Node arena; free slots hold an empty track and are never reachable
    nodes: Vec<Node>,

    /// Indices of released arena slots
    free: Vec<usize>,

    /// Entry node (position 1)
    head: Option<usize>,

    /// Number of reachable nodes
    len: usize,

    /// Playlist name
    name: String,

    /// Whether the owning slot is in use
    active: bool,
}

impl Playlist {
    /// Create new empty playlist
    pub fn new() -> Self {
        Self::default()
    }

    /// Create new empty playlist with a name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    /// Insert at position 1; the new track becomes the head
    pub fn insert_front(&mut self, track: Track) {
        debug!("Insert at front: {}", track.source);
        match self.head {
            None => self.insert_first(track),
            Some(head) => {
                let tail = self.tail_of(head);
                let idx = self.alloc(track, head);
                self.nodes[tail].next = idx;
                self.head = Some(idx);
            }
        }
        self.len += 1;
    }

    /// Insert after the current tail
    pub fn insert_back(&mut self, track: Track) {
        debug!("Insert at back: {}", track.source);
        match self.head {
            None => self.insert_first(track),
            Some(head) => {
                let tail = self.tail_of(head);
                let idx = self.alloc(track, head);
                self.nodes[tail].next = idx;
            }
        }
        self.len += 1;
    }

    /// Insert so the track ends up at `position` (valid range `1..=len+1`)
    ///
    /// Out-of-range positions leave the playlist untouched.
    pub fn insert_at(&mut self, track: Track, position: usize) -> Result<(), StoreError> {
        let max = self.len + 1;
        if position < 1 || position > max {
            return Err(StoreError::OutOfRange {
                position,
                min: 1,
                max,
            });
        }

        if position == 1 {
            self.insert_front(track);
        } else if position == max {
            self.insert_back(track);
        } else {
            debug!("Insert at position {}: {}", position, track.source);
            let pred = self.index_at(position - 1);
            let idx = self.alloc(track, self.nodes[pred].next);
            self.nodes[pred].next = idx;
            self.len += 1;
        }
        Ok(())
    }

    fn insert_first(&mut self, track: Track) {
        let idx = self.alloc(track, 0);
        self.nodes[idx].next = idx;
        self.head = Some(idx);
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    /// Remove the head; the second track becomes position 1
    pub fn remove_front(&mut self) -> Result<Track, StoreError> {
        let head = self.head.ok_or(StoreError::EmptyStore)?;
        if self.len == 1 {
            return Ok(self.remove_only(head));
        }

        let tail = self.tail_of(head);
        let new_head = self.nodes[head].next;
        self.nodes[tail].next = new_head;
        self.head = Some(new_head);
        self.len -= 1;

        let track = self.release(head);
        debug!("Removed front: {}", track.source);
        Ok(track)
    }

    /// Remove the tail
    pub fn remove_back(&mut self) -> Result<Track, StoreError> {
        let head = self.head.ok_or(StoreError::EmptyStore)?;
        if self.len == 1 {
            return Ok(self.remove_only(head));
        }

        let mut pred = head;
        while self.nodes[self.nodes[pred].next].next != head {
            pred = self.nodes[pred].next;
        }
        let tail = self.nodes[pred].next;
        self.nodes[pred].next = head;
        self.len -= 1;

        let track = self.release(tail);
        debug!("Removed back: {}", track.source);
        Ok(track)
    }

    /// Remove the track at `position` (valid range `1..=len`)
    pub fn remove_at(&mut self, position: usize) -> Result<Track, StoreError> {
        if self.head.is_none() {
            return Err(StoreError::EmptyStore);
        }
        if position < 1 || position > self.len {
            return Err(StoreError::OutOfRange {
                position,
                min: 1,
                max: self.len,
            });
        }

        if position == 1 {
            return self.remove_front();
        }
        if position == self.len {
            return self.remove_back();
        }

        let pred = self.index_at(position - 1);
        let victim = self.nodes[pred].next;
        self.nodes[pred].next = self.nodes[victim].next;
        self.len -= 1;

        let track = self.release(victim);
        debug!("Removed position {}: {}", position, track.source);
        Ok(track)
    }

    fn remove_only(&mut self, head: usize) -> Track {
        self.head = None;
        self.len = 0;
        let track = self.release(head);
        debug!("Removed last remaining track: {}", track.source);
        track
    }

    /// Release every track. Name and active flag are left as they are.
    pub fn clear(&mut self) {
        if self.len > 0 {
            debug!("Clearing {} tracks from '{}'", self.len, self.name);
        }
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.len = 0;
    }

    // ------------------------------------------------------------------
    // Lookup and traversal
    // ------------------------------------------------------------------

    /// Track at a 1-based position
    pub fn get(&self, position: usize) -> Result<&Track, StoreError> {
        let id = self.node_at(position)?;
        Ok(self.track(id))
    }

    /// Node handle at a 1-based position
    pub fn node_at(&self, position: usize) -> Result<NodeId, StoreError> {
        if self.head.is_none() {
            return Err(StoreError::EmptyStore);
        }
        if position < 1 || position > self.len {
            return Err(StoreError::OutOfRange {
                position,
                min: 1,
                max: self.len,
            });
        }
        Ok(NodeId(self.index_at(position)))
    }

    /// Handle of the entry node, if any
    pub fn head(&self) -> Option<NodeId> {
        self.head.map(NodeId)
    }

    /// Handle of the node following `id` (wraps from tail to head)
    pub fn next_of(&self, id: NodeId) -> NodeId {
        NodeId(self.nodes[id.0].next)
    }

    /// Track stored in a node
    pub fn track(&self, id: NodeId) -> &Track {
        &self.nodes[id.0].track
    }

    /// Node handles from head to tail, exactly `len` items
    pub fn node_ids(&self) -> NodeIds<'_> {
        NodeIds {
            playlist: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Tracks from head to tail, exactly `len` items
    pub fn iter(&self) -> impl Iterator<Item = &Track> + '_ {
        self.node_ids().map(move |id| self.track(id))
    }

    /// `(position, track)` pairs from head to tail
    pub fn iter_positions(&self) -> impl Iterator<Item = (usize, &Track)> + '_ {
        self.iter().enumerate().map(|(i, track)| (i + 1, track))
    }

    /// Walk the cycle once from the head and count the distinct nodes seen
    ///
    /// Stops after `arena size + 1` steps, so a broken cycle is reported as a
    /// count that disagrees with [`len`](Self::len) instead of looping.
    pub fn cycle_len(&self) -> usize {
        let Some(head) = self.head else {
            return 0;
        };
        let mut count = 1;
        let mut cursor = self.nodes[head].next;
        while cursor != head && count <= self.nodes.len() {
            cursor = self.nodes[cursor].next;
            count += 1;
        }
        count
    }

    // ------------------------------------------------------------------
    // Sorting and searching
    // ------------------------------------------------------------------

    /// Sort by a case-insensitive projection.
    ///
    /// Track contents move between nodes; node handles and links stay put.
    /// The sort is stable, so sorting a sorted playlist changes nothing.
    pub fn sort_by(&mut self, key: SortKey) {
        if self.len < 2 {
            return;
        }

        let order: Vec<usize> = self.node_ids().map(|id| id.0).collect();
        let mut keyed: Vec<(String, Track)> = order
            .iter()
            .map(|&idx| {
                let track = std::mem::take(&mut self.nodes[idx].track);
                (key.project(&track), track)
            })
            .collect();

        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        for (idx, (_, track)) in order.into_iter().zip(keyed) {
            self.nodes[idx].track = track;
        }
        debug!("Sorted '{}' by {:?}", self.name, key);
    }

    /// Case-insensitive substring search on cleaned titles.
    ///
    /// Returns every match in traversal order with its 1-based position.
    pub fn search(&self, term: &str) -> Vec<(usize, &Track)> {
        let needle = fold_case(term);
        self.iter_positions()
            .filter(|(_, track)| fold_case(&track.title()).contains(&needle))
            .collect()
    }

    // ------------------------------------------------------------------
    // Arena helpers
    // ------------------------------------------------------------------

    fn alloc(&mut self, track: Track, next: usize) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Node { track, next };
                idx
            }
            None => {
                self.nodes.push(Node { track, next });
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> Track {
        self.free.push(idx);
        std::mem::take(&mut self.nodes[idx].track)
    }

    /// Arena index of the node pointing back at `head`
    fn tail_of(&self, head: usize) -> usize {
        let mut cursor = head;
        while self.nodes[cursor].next != head {
            cursor = self.nodes[cursor].next;
        }
        cursor
    }

    /// Arena index at a 1-based position; caller has validated the range
    fn index_at(&self, position: usize) -> usize {
        let mut cursor = self.head.unwrap_or_default();
        for _ in 1..position {
            cursor = self.nodes[cursor].next;
        }
        cursor
    }
}

/// Iterator over node handles from head to tail
pub struct NodeIds<'a> {
    playlist: &'a Playlist,
    cursor: Option<usize>,
    remaining: usize,
}

impl Iterator for NodeIds<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.cursor?;
        self.cursor = Some(self.playlist.nodes[current].next);
        self.remaining -= 1;
        Some(NodeId(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
