//! CLI command implementations.

pub(crate) mod captions;

pub(crate) use captions::CaptionsArgs;
