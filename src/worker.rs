//! Runs blocking work off the UI thread and hands the result back through a polled channel.

use std::sync::mpsc;
use std::time::Duration;

#[derive(Debug)]
pub struct WorkerTask<T> {
    rx: mpsc::Receiver<T>,
    finished: bool,
}

impl<T> WorkerTask<T> {
    /// Non-blocking check for the result. Yields it at most once.
    pub fn try_take(&mut self) -> Option<T> {
        if self.finished {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.finished = true;
                Some(result)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                tracing::warn!("worker thread exited without a result");
                self.finished = true;
                None
            }
        }
    }

    /// Blocks up to `timeout` for the result.
    pub fn wait(&mut self, timeout: Duration) -> Option<T> {
        if self.finished {
            return None;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(result) => {
                self.finished = true;
                Some(result)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => None,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                self.finished = true;
                None
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

pub fn spawn_worker<T, W>(work: W) -> WorkerTask<T>
where
    T: Send + 'static,
    W: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<T>();
    std::thread::spawn(move || {
        let result = work();
        let _ = tx.send(result);
    });
    WorkerTask {
        rx,
        finished: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_is_delivered_once() {
        let mut task = spawn_worker(|| 41 + 1);
        assert_eq!(task.wait(Duration::from_secs(5)), Some(42));
        assert!(task.is_finished());
        assert_eq!(task.try_take(), None);
    }

    #[test]
    fn panicking_worker_finishes_without_result() {
        let mut task = spawn_worker(|| -> u8 { panic!("worker failure") });
        assert_eq!(task.wait(Duration::from_secs(5)), None);
        assert!(task.is_finished());
    }
}
