mod entity_id;
mod entity_registry;

pub use entity_id::EntityId;
pub use entity_registry::EntityRegistry;
