/// Identifies one requested frame callback.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct FrameHandle(u64);

/// Requests and cancels the next display frame.
pub trait FrameScheduler {
    /// Asks for one more frame and returns the handle it will be delivered with.
    fn schedule_next_frame(&mut self) -> FrameHandle;

    /// Withdraws a frame request. Unknown or already delivered handles are ignored.
    fn cancel(&mut self, handle: FrameHandle);
}

/// Cooperative scheduler that holds at most one outstanding frame.
///
/// The run loop calls [`FrameQueue::take_due`] once per display refresh and
/// delivers the returned handle to the game.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl FrameQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the outstanding frame, if any, and forgets it.
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    #[must_use]
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule_next_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}
