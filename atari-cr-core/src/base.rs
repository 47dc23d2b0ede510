//! Core functionalities.
mod env;
mod step;
pub use env::Env;
use std::fmt::Debug;
pub use step::{Info, Step};

/// An observation of an environment.
pub trait Obs: Clone + Debug {
    /// Returns a dummy observation.
    ///
    /// The observation created with this method is used as a placeholder,
    /// for example as the initial observation of a step where the episode
    /// did not end.
    fn dummy() -> Self;

    /// Returns the number of elements in the observation.
    fn len(&self) -> usize;

    /// Returns `true` if the observation has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An action of an environment.
pub trait Act: Clone + Debug {
    /// Returns the number of components of the action.
    fn len(&self) -> usize;

    /// Returns `true` if the action has no components.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
