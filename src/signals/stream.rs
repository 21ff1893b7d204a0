/*!
 * Async Signal Stream
 * Bridges the blocking consumer into tokio
 */

use super::hooks::SignalHooks;
use super::queue::SignalQueue;
use crate::core::errors::QueueResult;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::thread;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

/// Stream of signal numbers received from a queue
///
/// A dedicated thread owns the queue's [`Receiver`](super::Receiver), blocks
/// in `recv` and forwards each number into a bounded channel. Once the
/// stream is dropped the thread exits after the next signal arrives, putting
/// that signal back into the queue.
pub struct SignalStream {
    inner: ReceiverStream<u32>,
}

impl SignalStream {
    /// Claim the consumer slot of `queue` and start forwarding
    pub fn spawn<H>(queue: &'static SignalQueue<H>, capacity: usize) -> QueueResult<Self>
    where
        H: SignalHooks + 'static,
    {
        let mut receiver = queue.receiver()?;
        let (tx, rx) = mpsc::channel(capacity.max(1));

        thread::Builder::new()
            .name("sigrelay-consumer".into())
            .spawn(move || {
                debug!("signal consumer thread started");
                loop {
                    let signal = receiver.recv();
                    if tx.blocking_send(signal).is_err() {
                        receiver.queue().requeue(signal);
                        break;
                    }
                }
                debug!("signal stream closed, consumer thread exiting");
            })?;

        Ok(Self {
            inner: ReceiverStream::new(rx),
        })
    }
}

impl Stream for SignalStream {
    type Item = u32;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<u32>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
