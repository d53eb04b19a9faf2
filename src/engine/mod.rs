mod transfer;
mod unlock;

pub use transfer::{Holder, drop_item, move_entity, move_item, pick_up};
pub use unlock::{UnlockOutcome, try_unlock, unlock_with};
