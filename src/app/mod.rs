pub mod import_use_case;
pub mod ports;

pub use import_use_case::{CommitStatus, ImportRun, ImportUseCase};
