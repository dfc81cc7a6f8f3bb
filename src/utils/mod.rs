pub mod exporter;
pub mod profiler;
pub mod vector;
