pub mod lookup_pipeline;
