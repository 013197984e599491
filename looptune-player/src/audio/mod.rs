//! Audio decode and output
//!
//! - `session` - traits the playback engine drives
//! - `compressed` / `sampled` - the two symphonia decode paths
//! - `output` - blocking sink over a cpal stream
//! - `backend` - picks a decode path per source and opens sinks

pub mod backend;
pub mod compressed;
pub mod convert;
pub mod output;
pub mod ring_buffer;
pub mod sampled;
pub mod session;
pub mod types;

mod source;

pub use backend::SystemBackend;
pub use compressed::CompressedSession;
pub use output::{DeviceSink, OutputDevice};
pub use sampled::SampledSession;
pub use session::{clamp_seek_target, AudioBackend, DecodeSession, OutputSink};
pub use types::{BackendKind, DecodeEvent, PcmFormat};
