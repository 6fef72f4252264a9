use super::{AbilityId, ItemId, MoveId};

/// Errors raised when the content catalog cannot answer a lookup.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("move {0} is not in the content catalog")]
    UnknownMove(MoveId),

    #[error("ability {0:?} is not in the content catalog")]
    UnknownAbility(AbilityId),

    #[error("held item {0:?} is not in the content catalog")]
    UnknownItem(ItemId),
}
