// Session module
// Persistence of the sequence as a single JSON document

pub mod store;

pub use store::{
    SessionData, SessionError, SessionStore, export_to_file, from_json, import_from_file, to_json,
};
