pub mod clock;
pub mod ids;
pub mod store;

pub use clock::SystemClock;
pub use ids::GeneratedIds;
pub use store::JsonStore;
