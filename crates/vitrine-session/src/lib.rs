pub mod debounce;
pub mod session;
pub mod state;

pub use debounce::{DebounceEffect, DebounceState, SearchDebouncer};
pub use session::{CatalogSession, Effect, ListingBackend, ListingView};
pub use state::SessionEvent;
