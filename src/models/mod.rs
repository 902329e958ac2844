//! Domain models for the session feedback service.
//!
//! - [`User`]: an author of feedback.
//! - [`Session`]: a game session that feedback is left on.
//! - [`SessionFeedback`]: one user's 1–5 rating and optional comment for one
//!   session. At most one exists per (session, user) pair.
//! - [`Counter`]: the visit counter behind `/ping`.
//!
//! Users and sessions only back-reference their feedback; neither owns it.

mod counter;
mod feedback;
mod session;
mod user;

pub use counter::*;
pub use feedback::*;
pub use session::*;
pub use user::*;
