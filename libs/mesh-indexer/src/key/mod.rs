//! # Vertex Key & Table
//!
//! [`VertexKey`] canonicalizes a vertex's attribute tuple into something that
//! can be hashed and compared exactly. [`VertexTable`] maps keys to output
//! vertex indices in first-seen order and owns the output attribute buffers.
//!
//! ## Equality
//!
//! Keys compare the IEEE bit patterns of their components, with `-0.0`
//! folded onto `+0.0` so that hashing agrees with float equality. NaN
//! components only match an identical NaN bit pattern.

use std::collections::HashMap;

use glam::Vec3;

// =============================================================================
// VERTEX KEY
// =============================================================================

/// Exact, hashable identity of an output vertex.
///
/// ## Example
///
/// ```rust
/// use glam::Vec3;
/// use mesh_indexer::VertexKey;
///
/// let a = VertexKey::new(Vec3::X, Some(Vec3::Z));
/// let b = VertexKey::new(Vec3::X, Some(Vec3::Y));
/// assert_ne!(a, b);
/// assert_eq!(VertexKey::new(Vec3::X, None), VertexKey::position(Vec3::X));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexKey {
    /// Position only: (x, y, z)
    Position([u32; 3]),
    /// Position and normal: (x, y, z, nx, ny, nz)
    PositionNormal([u32; 6]),
}

impl VertexKey {
    /// Builds a key from a position and an optional normal.
    #[inline]
    pub fn new(position: Vec3, normal: Option<Vec3>) -> Self {
        match normal {
            Some(normal) => Self::with_normal(position, normal),
            None => Self::position(position),
        }
    }

    /// Builds a position-only key.
    #[inline]
    pub fn position(position: Vec3) -> Self {
        Self::Position([
            canonical_bits(position.x),
            canonical_bits(position.y),
            canonical_bits(position.z),
        ])
    }

    /// Builds a key over position and normal.
    #[inline]
    pub fn with_normal(position: Vec3, normal: Vec3) -> Self {
        Self::PositionNormal([
            canonical_bits(position.x),
            canonical_bits(position.y),
            canonical_bits(position.z),
            canonical_bits(normal.x),
            canonical_bits(normal.y),
            canonical_bits(normal.z),
        ])
    }

    /// Returns true if the key includes normal components.
    #[inline]
    pub fn has_normal(&self) -> bool {
        matches!(self, Self::PositionNormal(_))
    }
}

/// Bit pattern of `value` with both zeros mapped to `+0.0`.
#[inline]
fn canonical_bits(value: f32) -> u32 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

// =============================================================================
// VERTEX TABLE
// =============================================================================

/// Insertion-ordered map from [`VertexKey`] to output vertex index.
///
/// The first occurrence of a key appends its attributes to the output
/// buffers and receives the next sequential index. Later occurrences return
/// the index assigned the first time.
///
/// ## Example
///
/// ```rust
/// use glam::Vec3;
/// use mesh_indexer::VertexTable;
///
/// let mut table = VertexTable::new(true);
/// assert_eq!(table.insert(Vec3::ZERO, Some(Vec3::Z)), 0);
/// assert_eq!(table.insert(Vec3::X, Some(Vec3::Z)), 1);
/// assert_eq!(table.insert(Vec3::ZERO, Some(Vec3::Z)), 0);
/// assert_eq!(table.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct VertexTable {
    lookup: HashMap<VertexKey, u32>,
    positions: Vec<f32>,
    normals: Option<Vec<f32>>,
}

impl VertexTable {
    /// Creates an empty table. With `track_normals` the key includes the
    /// normal and a normal buffer is kept alongside positions.
    pub fn new(track_normals: bool) -> Self {
        Self::with_capacity(track_normals, 0)
    }

    /// Creates an empty table sized for `capacity` distinct vertices.
    pub fn with_capacity(track_normals: bool, capacity: usize) -> Self {
        Self {
            lookup: HashMap::with_capacity(capacity),
            positions: Vec::with_capacity(capacity * 3),
            normals: track_normals.then(|| Vec::with_capacity(capacity * 3)),
        }
    }

    /// Returns true if the table keys on normals.
    #[inline]
    pub fn tracks_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Number of distinct vertices inserted so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Returns true if nothing has been inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Looks up or inserts a vertex and returns its output index.
    ///
    /// `normal` is ignored when the table does not track normals. A table
    /// that does track normals treats a missing normal as zero.
    pub fn insert(&mut self, position: Vec3, normal: Option<Vec3>) -> u32 {
        let normal = self
            .normals
            .as_ref()
            .map(|_| normal.unwrap_or(Vec3::ZERO));
        let key = VertexKey::new(position, normal);

        if let Some(&index) = self.lookup.get(&key) {
            return index;
        }

        let index = self.lookup.len() as u32;
        self.lookup.insert(key, index);
        self.positions.extend_from_slice(&position.to_array());
        if let (Some(buffer), Some(normal)) = (self.normals.as_mut(), normal) {
            buffer.extend_from_slice(&normal.to_array());
        }
        index
    }

    /// Returns the index assigned to `key`, if any.
    #[inline]
    pub fn get(&self, key: &VertexKey) -> Option<u32> {
        self.lookup.get(key).copied()
    }

    /// Flat position buffer: [x0, y0, z0, x1, ...]
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat normal buffer, if normals are tracked.
    #[inline]
    pub fn normals(&self) -> Option<&[f32]> {
        self.normals.as_deref()
    }

    /// Consumes the table and hands over the attribute buffers.
    pub fn into_buffers(self) -> (Vec<f32>, Option<Vec<f32>>) {
        (self.positions, self.normals)
    }
}
