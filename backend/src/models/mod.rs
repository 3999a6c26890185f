//! Domain entities persisted by the repository layer.
//!
//! Every entity comes in two shapes: the stored record (with its id and
//! server-assigned timestamps) and a `New*` input used to create it.

pub mod macros;

pub mod attendance;
pub mod booking;
pub mod task;
pub mod user;
pub mod workspace;

pub use attendance::*;
pub use booking::*;
pub use task::*;
pub use user::*;
pub use workspace::*;
