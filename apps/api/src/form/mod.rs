//! Client-held application form: a pure reducer over [`state::ApplicationForm`],
//! the wire-body builder, and a session that drives both against a gateway.

pub mod builder;
pub mod session;
pub mod state;
