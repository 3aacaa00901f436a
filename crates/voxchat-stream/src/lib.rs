pub mod buffer;
pub mod envelope;
pub mod reframe;

pub use buffer::TailBuffer;
pub use envelope::Envelope;
pub use reframe::{error_frame, frame_line, reframe};
