//! The autoscale decision core (spec §4.5–§4.6): pure functions from cluster
//! state to one `DesiredCapacity` target per ASG. No I/O happens here.

pub mod decide;
pub mod required;

pub use decide::{decide_all, AutoscaleDecision, ReasonCode};
