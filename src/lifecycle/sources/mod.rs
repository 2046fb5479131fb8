//! Data source implementations

pub mod endoflife;

pub use endoflife::EndOfLifeSource;
