//! State tag trait.

use std::fmt::Debug;
use std::hash::Hash;

use strum::IntoEnumIterator;

/// Enum naming the states of one machine domain.
///
/// `Args` is passed to `on_enter`; a plain `change_state` uses
/// `Args::default()`. `Signal` is the payload that event callbacks post to the
/// mailbox for the current state's handler.
pub trait StateTag: Copy + Eq + Ord + Hash + Debug + IntoEnumIterator + 'static {
    type Args: Default + 'static;
    type Signal: Debug + 'static;

    /// Short name used in log output.
    fn domain() -> &'static str;
}
