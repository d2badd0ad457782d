pub mod import;
pub mod classification;
pub mod processor; // Submission entry point: ingest → classify
