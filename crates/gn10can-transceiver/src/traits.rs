use gn10can_frame::Frame;

/// Hardware-facing side of a bus.
///
/// Both operations are non-blocking. `send` reports whether the frame was
/// accepted for transmission; `receive` returns the next pending frame, or
/// `None` when nothing is queued.
pub trait Transceiver {
    /// Queue `frame` for transmission.
    fn send(&mut self, frame: &Frame) -> bool;

    /// Take the next received frame, if any.
    fn receive(&mut self) -> Option<Frame>;
}

impl<T: Transceiver + ?Sized> Transceiver for Box<T> {
    fn send(&mut self, frame: &Frame) -> bool {
        (**self).send(frame)
    }

    fn receive(&mut self) -> Option<Frame> {
        (**self).receive()
    }
}

impl<T: Transceiver + ?Sized> Transceiver for &mut T {
    fn send(&mut self, frame: &Frame) -> bool {
        (**self).send(frame)
    }

    fn receive(&mut self) -> Option<Frame> {
        (**self).receive()
    }
}
