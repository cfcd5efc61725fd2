mod subtask;
mod task;

pub use subtask::*;
pub use task::*;
