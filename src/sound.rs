use std::io::{self, Write};

use log::warn;

use crate::flip_controller::FlipCallback;

const BELL: &[u8] = b"\x07";

/// Audible page-turn feedback: rings the terminal bell.
///
/// Playback is fire-and-forget; a failed write is logged and otherwise ignored
/// so it can never affect navigation.
pub struct FlipSound<W: Write> {
    out: W,
}

impl FlipSound<io::Stdout> {
    pub fn terminal_bell() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> FlipSound<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn play(&mut self) {
        if let Err(e) = self.out.write_all(BELL).and_then(|_| self.out.flush()) {
            warn!("Error playing flip sound: {e}");
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + 'static> FlipSound<W> {
    pub fn into_callback(mut self) -> FlipCallback {
        Box::new(move || self.play())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn play_rings_bell() {
        let mut sound = FlipSound::new(Vec::new());
        sound.play();
        sound.play();
        assert_eq!(sound.into_inner(), b"\x07\x07".to_vec());
    }

    #[test]
    fn failed_playback_is_swallowed() {
        let mut sound = FlipSound::new(FailingWriter);
        sound.play();
    }

    #[test]
    fn callback_plays_on_each_call() {
        let buffer = SharedBuffer::default();
        let mut callback = FlipSound::new(buffer.clone()).into_callback();
        callback();
        callback();
        callback();
        assert_eq!(buffer.0.borrow().len(), 3);
    }
}
