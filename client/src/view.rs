use tether_shared::{EntityId, Vec3};

/// What the observer can see of the world: replicated positions of the actors
/// currently present on this machine.
pub trait ObserverView {
    /// `None` if the entity is not currently present.
    fn position(&self, entity: EntityId) -> Option<Vec3>;
}
