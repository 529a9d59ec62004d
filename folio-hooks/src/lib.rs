//! Lifecycle hooks for Folio.
//!
//! Two behaviours hang off the document store:
//! - [`DefaultUserSeeder`] makes sure a user exists when the process starts
//! - [`FeaturedPropagation`] features pages and users referenced from the
//!   settings global after every settings change
//!
//! Both are [`LifecycleObserver`]s registered on a [`Lifecycle`], which the
//! runtime drives. The store is always passed in explicitly.

mod error;
mod featured;
mod observer;
mod seed;

pub use error::{HookError, HookResult};
pub use featured::{
    FeaturedPropagation, FeaturedUpdate, PropagationFailure, PropagationOutcome, propagate_featured,
};
pub use observer::{Lifecycle, LifecycleObserver, ObserverFailure};
pub use seed::{DefaultUserSeeder, SeedOutcome, seed_default_user};

/// The seeder followed by featured propagation.
pub fn standard_lifecycle(seeder: DefaultUserSeeder) -> Lifecycle {
    Lifecycle::new()
        .with_observer(seeder)
        .with_observer(FeaturedPropagation)
}
