mod clear;
mod loop_mode;
mod pause;
mod play;
mod queue;
mod recommendations;
mod resume;
mod shuffle;
mod skip;
mod stop;

pub use clear::clear;
pub use loop_mode::loop_mode;
pub use pause::pause;
pub use play::play;
pub use queue::{format_queue, head_marker, queue};
pub use recommendations::recommendations;
pub use resume::resume;
pub use shuffle::shuffle;
pub use skip::skip;
pub use stop::stop;
