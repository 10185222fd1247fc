//! The combat rule matrix.
//!
//! | attacker → defender | Dragon | Knight | Pegasus |
//! |---------------------|--------|--------|---------|
//! | Dragon              |        |        | kill    |
//! | Knight              | kill   |        |         |
//! | Pegasus             |        |        |         |
//!
//! A lethal verdict only makes a fight *possible*; the dice decide it.

use crate::kind::ActorKind;

/// The only ordered `(attacker, defender)` pairs that may end in a kill.
pub const LETHAL_PAIRS: [(ActorKind, ActorKind); 2] = [
    (ActorKind::Dragon, ActorKind::Pegasus),
    (ActorKind::Knight, ActorKind::Dragon),
];

/// Whether an attacker of kind `attacker` may kill a defender of kind
/// `defender`. Total, pure, and callable from any thread.
pub const fn can_kill(attacker: ActorKind, defender: ActorKind) -> bool {
    matches!(
        (attacker, defender),
        (ActorKind::Dragon, ActorKind::Pegasus) | (ActorKind::Knight, ActorKind::Dragon)
    )
}
