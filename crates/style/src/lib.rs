//! Tincture Style Engine
//!
//! Inline style registry, selector cascade and computed style.
//!
//! The registry shares declaration blocks through `Rc`, so it and the
//! resolvers borrowing it stay on the thread that owns them.

pub mod error;
pub mod registry;
pub mod matching;
pub mod cascade;
pub mod computed;

pub use error::{StyleError, StyleResult};
pub use registry::InlineStyleRegistry;
pub use matching::SelectorMatchProvider;
pub use cascade::{CascadeContext, CascadeResolver, MatchedStyle, Tier};
pub use computed::{ComputeContext, ComputedStyle};
