//! Line-oriented stdin reader that never blocks the event loop.

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Result, anyhow};
use tokio::sync::mpsc;

const INPUT_CHANNEL_CAPACITY: usize = 64;

enum InputMsg {
    Line(String),
    Eof,
    Error(String),
}

/// Reads stdin on a blocking thread and hands complete lines to the loop.
pub struct LinePump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    closed: bool,
}

impl LinePump {
    pub fn new() -> Result<Self> {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        // A plain thread rather than spawn_blocking: the runtime would wait on
        // a reader parked in read_line at shutdown. The thread is detached.
        std::thread::Builder::new()
            .name("rise-input".to_string())
            .spawn(move || input_loop(&stop2, &tx))?;
        Ok(Self {
            rx,
            stop,
            closed: false,
        })
    }

    /// Next complete line if one is ready. `Ok(None)` when nothing is queued
    /// or input has ended; see [`LinePump::is_closed`].
    pub fn try_line(&mut self) -> Result<Option<String>> {
        match self.rx.try_recv() {
            Ok(msg) => self.accept(msg),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.closed = true;
                Ok(None)
            }
        }
    }

    /// Wait for the next line. `Ok(None)` once input has ended.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        match self.rx.recv().await {
            Some(msg) => self.accept(msg),
            None => {
                self.closed = true;
                Ok(None)
            }
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn accept(&mut self, msg: InputMsg) -> Result<Option<String>> {
        match msg {
            InputMsg::Line(line) => Ok(Some(line)),
            InputMsg::Eof => {
                self.closed = true;
                Ok(None)
            }
            InputMsg::Error(msg) => Err(anyhow!("input error: {msg}")),
        }
    }
}

impl Drop for LinePump {
    fn drop(&mut self) {
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: &AtomicBool, tx: &mpsc::Sender<InputMsg>) {
    let stdin = std::io::stdin();
    let mut lock = stdin.lock();
    let mut buf = String::new();
    while !stop.load(Ordering::Acquire) {
        buf.clear();
        match lock.read_line(&mut buf) {
            Ok(0) => {
                let _ = tx.blocking_send(InputMsg::Eof);
                break;
            }
            Ok(_) => {
                let line = buf.trim_end_matches(['\r', '\n']).to_string();
                if tx.blocking_send(InputMsg::Line(line)).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}
