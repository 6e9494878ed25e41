use std::fmt;

/// Identifier of a simulated actor. Ids are never reused within a world, so a
/// stale id simply resolves to "not present".
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub const fn from_u64(value: u64) -> Self {
        EntityId(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
