//! Display-refresh frame requests
//!
//! The host drives one tick per display refresh. Anything that wants the next
//! tick holds a `FrameClock` and requests a frame; cancelling invalidates the
//! pending request so a tick that arrives afterwards is ignored.

/// Handle for one requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(u64);

impl FrameRequest {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// At most one outstanding frame request
#[derive(Debug, Default)]
pub struct FrameClock {
    next_id: u64,
    pending: Option<FrameRequest>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the next frame, replacing any earlier request
    pub fn request(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_id);
        self.next_id += 1;
        self.pending = Some(request);
        request
    }

    /// Drop the pending request; returns whether there was one
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume the pending request on a display tick
    pub fn fire(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }

    /// Consume `request` only if it is still the pending one
    pub fn fire_if(&mut self, request: FrameRequest) -> bool {
        if self.pending == Some(request) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
