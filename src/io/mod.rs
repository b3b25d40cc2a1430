pub mod commit;
pub mod csv_import;
pub mod file;

pub use commit::{CommitDispatcher, CommitGateway, CommitOutcome, JsonFileGateway};
