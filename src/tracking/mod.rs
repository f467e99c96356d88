//! Tracking-state reconciliation and flicker suppression
//!
//! Converts the stateless, periodically-repeated TUIO snapshot protocol into
//! a minimal, debounced stream of create/update/delete events:
//!
//! ```text
//! decoded frame -> Reconciler (registry diff) -> DebounceBuffer -> tick -> events
//! ```
//!
//! Touches and tagged objects run through independent copies of the whole
//! pipeline; they share no state.

mod debounce;
mod pipeline;
mod reconciler;

pub use debounce::DebounceBuffer;
pub use pipeline::TrackingPipeline;
pub use reconciler::{PendingAction, Reconciler};
