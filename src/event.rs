use std::collections::VecDeque;
use std::io::{self, Read};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::debug;

use crate::clock::VirtualClock;
use crate::session::input::INTERRUPT;

/// Raw keyboard bytes, one at a time.
pub trait ByteSource {
    /// Blocks for the next byte. `None` once the input is closed.
    fn next_byte(&mut self) -> Result<Option<u8>>;

    /// Drains whatever is already buffered without blocking and reports
    /// whether an interrupt was among it. Closed input counts as one.
    fn interrupt_pending(&mut self) -> Result<bool>;
}

/// Reads stdin on a background thread so the session can both block on the
/// next key and peek for Ctrl+C between replayed keystrokes.
pub struct StdinBytes {
    rx: mpsc::Receiver<io::Result<u8>>,
}

impl StdinBytes {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let stdin = io::stdin();
            let mut handle = stdin.lock();
            let mut buf = [0u8; 1];
            loop {
                match handle.read(&mut buf) {
                    Ok(0) => return,
                    Ok(_) => {
                        if tx.send(Ok(buf[0])).is_err() {
                            return;
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        return;
                    }
                }
            }
        });

        Self { rx }
    }
}

impl Default for StdinBytes {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for StdinBytes {
    fn next_byte(&mut self) -> Result<Option<u8>> {
        match self.rx.recv() {
            Ok(Ok(byte)) => Ok(Some(byte)),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Ok(None),
        }
    }

    fn interrupt_pending(&mut self) -> Result<bool> {
        loop {
            match self.rx.try_recv() {
                Ok(Ok(INTERRUPT)) => return Ok(true),
                Ok(Ok(byte)) => debug!("discarding byte {byte:#04x} during replay"),
                Ok(Err(e)) => return Err(e.into()),
                Err(TryRecvError::Empty) => return Ok(false),
                Err(TryRecvError::Disconnected) => return Ok(true),
            }
        }
    }
}

/// Canned keystrokes for tests. Each byte carries the pause before it, which
/// is applied to the shared virtual clock when the byte is read.
#[derive(Debug)]
pub struct ScriptedBytes {
    queue: VecDeque<(Duration, u8)>,
    clock: VirtualClock,
    interrupt_on_poll: Option<usize>,
    polls: usize,
}

impl ScriptedBytes {
    pub fn new(clock: VirtualClock) -> Self {
        Self {
            queue: VecDeque::new(),
            clock,
            interrupt_on_poll: None,
            polls: 0,
        }
    }

    /// Queues `bytes` with no pause between them.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.queue.extend(bytes.iter().map(|&b| (Duration::ZERO, b)));
        self
    }

    /// Queues one byte arriving `after` the previous one.
    pub fn push_after(&mut self, after: Duration, byte: u8) -> &mut Self {
        self.queue.push_back((after, byte));
        self
    }

    /// Queues `bytes` with the same pause before each of them.
    pub fn push_paced(&mut self, pace: Duration, bytes: &[u8]) -> &mut Self {
        self.queue.extend(bytes.iter().map(|&b| (pace, b)));
        self
    }

    /// Makes the `n`th call (0-based) to `interrupt_pending` report Ctrl+C.
    pub fn interrupt_on_poll(&mut self, n: usize) -> &mut Self {
        self.interrupt_on_poll = Some(n);
        self
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl ByteSource for ScriptedBytes {
    fn next_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.queue.pop_front().map(|(after, byte)| {
            self.clock.advance(after);
            byte
        }))
    }

    fn interrupt_pending(&mut self) -> Result<bool> {
        let poll = self.polls;
        self.polls += 1;
        Ok(self.interrupt_on_poll == Some(poll))
    }
}
