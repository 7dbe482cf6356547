mod combiner;
mod debug;

pub use combiner::Combiner;
pub use crate::debug_process;
