// Protocol Layer - stateless marshal/unmarshal of the REAPER web-remote
// text protocol. Pure functions, no I/O.

pub mod codec;
pub mod commands;

// Re-exports
pub use codec::{
    parse_keyed_field, parse_tab_list, parse_transport, request_path, split_fields, split_records,
};
