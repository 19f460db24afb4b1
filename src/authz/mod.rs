//! Authorization - principal model, route role gates and per-operation guard rules
//!
//! Two layers decide access:
//! - a route-level [`gate`] admitting a fixed [`RoleSet`]
//! - the per-operation [`guard`], which repeats the role check and then applies
//!   the ownership predicate for the caller's role

pub mod gate;
pub mod guard;
pub mod principal;

pub use gate::RoleSet;
pub use guard::{authorize, evaluate, Decision, Operation};
pub use principal::{Principal, RoleProfile};
