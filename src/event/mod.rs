//! Execution lifecycle events
//!
//! Every execute unit produces exactly two events sharing one id:
//! `BeforeExecute` right before the physical call, then either
//! `ExecuteSuccess` or `ExecuteFailure` right after it. Events are delivered
//! synchronously to the listeners registered on an `EventBus`, on whichever
//! thread ran the unit.
//!
//! There is no buffering and no replay. An event with no listener
//! registered at the moment it is posted is gone.

mod bus;
mod event;

pub use bus::{EventBus, ExecutionEventListener};
pub use event::{EventType, ExecutionEvent};
