//! Stream throttling utilities

use futures::{Stream, ready};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

/// Extension trait to add throttling to any Stream
pub trait ThrottleExt: Stream {
    /// Throttle the stream to emit at most once per interval
    ///
    /// Uses "latest-wins" semantics - if multiple items arrive
    /// during an interval, only the latest is emitted.
    fn throttle(self, duration: Duration) -> Throttle<Self>
    where
        Self: Sized,
    {
        Throttle::new(self, duration)
    }
}

impl<T: Stream> ThrottleExt for T {}

pin_project! {
    /// A stream combinator that throttles emission rate
    pub struct Throttle<S: Stream> {
        #[pin]
        stream: S,
        interval: Interval,
        pending: Option<S::Item>,
        // Interval has fired and the next item may go out immediately
        ticked: bool,
        done: bool,
    }
}

impl<S: Stream> Throttle<S> {
    /// Create a new throttled stream
    pub fn new(stream: S, duration: Duration) -> Self {
        let mut interval = interval(duration);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self { stream, interval, pending: None, ticked: false, done: false }
    }
}

impl<S: Stream> Stream for Throttle<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if !*this.done {
            // Drain everything available, keeping only the latest
            loop {
                match this.stream.as_mut().poll_next(cx) {
                    Poll::Ready(Some(item)) => *this.pending = Some(item),
                    Poll::Ready(None) => {
                        *this.done = true;
                        break;
                    }
                    Poll::Pending => break,
                }
            }
        }

        if *this.done {
            // Flush the last item without waiting out the interval
            return Poll::Ready(this.pending.take());
        }

        if !*this.ticked {
            ready!(this.interval.poll_tick(cx));
            *this.ticked = true;
        }

        match this.pending.take() {
            Some(item) => {
                *this.ticked = false;
                Poll::Ready(Some(item))
            }
            // Inner stream registered the waker when it returned Pending
            None => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tokio::sync::mpsc;
    use tokio_stream::wrappers::UnboundedReceiverStream;

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_latest() {
        let items = futures::stream::iter(1..=5).throttle(Duration::from_millis(100));
        let collected: Vec<i32> = items.collect().await;
        assert_eq!(collected, vec![5]);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_items_instead_of_ending() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut throttled = UnboundedReceiverStream::new(rx).throttle(Duration::from_millis(100));

        tx.send(1).unwrap();
        assert_eq!(throttled.next().await, Some(1));

        let sender = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(250)).await;
            tx.send(2).unwrap();
            tx.send(3).unwrap();
        });

        assert_eq!(throttled.next().await, Some(3));
        sender.await.unwrap();
        assert_eq!(throttled.next().await, None);
    }
}
