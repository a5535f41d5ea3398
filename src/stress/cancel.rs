use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};

/// Owner side of a cancellation signal. Cancelling, or dropping the source,
/// wakes every token at once.
pub struct CancelSource {
    sender: Option<Sender<()>>,
    token: CancelToken,
}

/// Cheap to clone; handed to every worker thread.
#[derive(Clone)]
pub struct CancelToken {
    receiver: Receiver<()>,
}

impl CancelSource {
    pub fn new() -> Self {
        // nothing is ever sent: disconnection is the signal
        let (sender, receiver) = bounded(0);
        Self { sender: Some(sender), token: CancelToken { receiver } }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn cancel(&mut self) {
        self.sender.take();
    }

    pub fn is_cancelled(&self) -> bool {
        self.sender.is_none()
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.receiver.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Wait up to `duration`. Returns true if cancelled before or during the wait.
    pub fn sleep(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return self.is_cancelled();
        }
        !matches!(self.receiver.recv_timeout(duration), Err(RecvTimeoutError::Timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn token_sees_cancel() {
        let mut source = CancelSource::new();
        let token = source.token();
        assert!(!token.is_cancelled());
        assert!(!token.sleep(Duration::from_millis(5)));
        source.cancel();
        assert!(token.is_cancelled());
        assert!(source.is_cancelled());
        assert!(token.sleep(Duration::ZERO));
    }

    #[test]
    fn dropping_source_cancels() {
        let source = CancelSource::new();
        let token = source.token();
        drop(source);
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancel_wakes_a_sleeping_thread() {
        let mut source = CancelSource::new();
        let token = source.token();
        let started = Instant::now();
        let sleeper = thread::spawn(move || token.sleep(Duration::from_secs(30)));
        thread::sleep(Duration::from_millis(20));
        source.cancel();
        assert!(sleeper.join().unwrap());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
