/// Assessment CSV writer.
pub mod export;
/// Grid-metrics CSV reader.
pub mod ingest;
