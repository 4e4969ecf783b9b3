pub mod output;
pub mod progress;
pub mod signals;

pub use output::{OutputFormatter, OutputMode};
pub use progress::{OperationProgress, ProgressManager};
pub use signals::GracefulShutdown;
