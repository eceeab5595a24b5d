pub mod frame;
pub mod landmark;

pub use frame::Frame;
pub use landmark::{Landmark, LandmarkId, Landmarks, UnknownLandmark};

/// Producer of pose frames (the pose-estimation collaborator).
///
/// Frames must be yielded in non-decreasing timestamp order. `Ok(None)`
/// signals end of stream.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error + Send + Sync>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error + Send + Sync>> {
        (**self).next_frame()
    }
}
