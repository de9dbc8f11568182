//! Faces: the artwork a pair of cards shares.
//!
//! A `Face` is static data. Two cards showing the same `FaceId` are a pair.
//! Image references are carried for renderers and never interpreted here.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Identifier of the artwork pair a card belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FaceId(pub u32);

impl FaceId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for FaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Face({})", self.0)
    }
}

/// A face with its front and back image references.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Face {
    pub id: FaceId,
    /// Image shown when the card is face-up.
    pub front: String,
    /// Image shown when the card is face-down.
    pub back: String,
}

impl Face {
    #[must_use]
    pub fn new(id: FaceId, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id,
            front: front.into(),
            back: back.into(),
        }
    }
}

/// Source of faces available for dealing.
///
/// Implementations typically wrap an asset store. The deck builder only
/// reads from it.
pub trait FacePool {
    /// Available faces, in the provider's order.
    fn faces(&self) -> Vec<Face>;

    /// Distinct face ids in first-seen order.
    fn face_ids(&self) -> Vec<FaceId> {
        distinct(self.faces().iter().map(|f| f.id))
    }

    /// Look up one face for rendering.
    fn face(&self, id: FaceId) -> Option<Face> {
        self.faces().into_iter().find(|f| f.id == id)
    }
}

/// A fixed list of faces.
///
/// ## Example
///
/// ```
/// use magic_match::cards::{FacePool, FaceId, StaticFacePool};
///
/// let pool = StaticFacePool::numbered(8, "card-back.png");
/// assert_eq!(pool.face_ids().len(), 8);
///
/// let face = pool.face(FaceId::new(3)).unwrap();
/// assert_eq!(face.front, "face-3.png");
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticFacePool {
    faces: Vec<Face>,
}

impl StaticFacePool {
    #[must_use]
    pub fn new(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    /// `count` faces named `face-<n>.png`, all sharing one back image.
    #[must_use]
    pub fn numbered(count: u32, back: &str) -> Self {
        let faces = (0..count)
            .map(|i| Face::new(FaceId::new(i), format!("face-{i}.png"), back))
            .collect();
        Self { faces }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

impl FacePool for StaticFacePool {
    fn faces(&self) -> Vec<Face> {
        self.faces.clone()
    }

    fn face(&self, id: FaceId) -> Option<Face> {
        self.faces.iter().find(|f| f.id == id).cloned()
    }
}

/// Drop repeated ids, keeping first-seen order.
pub(crate) fn distinct(ids: impl IntoIterator<Item = FaceId>) -> Vec<FaceId> {
    let mut seen = FxHashSet::default();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
