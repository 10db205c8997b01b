// ── View-model storage primitives ──

mod list;
mod load;

pub use list::{Entity, EntityList};
pub use load::LoadStatus;
