use std::pin::Pin;
use std::time::Duration;

use tokio::time::{sleep, Instant, Sleep};

/// A re-armable read deadline.
///
/// The reader arms it before issuing a read and races the two; the losing
/// branch of the race is dropped, which is its cancellation. Arming again
/// before expiry resets the deadline. A cancelled deadline never fires:
/// awaiting it pends forever, so it is safe to keep in a `select!`.
#[derive(Debug)]
pub struct Deadline {
    sleep: Pin<Box<Sleep>>,
    armed: bool,
}

impl Deadline {
    pub fn new() -> Self {
        Self {
            sleep: Box::pin(sleep(Duration::from_secs(0))),
            armed: false,
        }
    }

    /// Sets (or resets) the deadline to `seconds` from now.
    pub fn arm(&mut self, seconds: u64) {
        self.sleep
            .as_mut()
            .reset(Instant::now() + Duration::from_secs(seconds));
        self.armed = true;
    }

    /// Disarms the deadline; a later expiry is a no-op.
    pub fn cancel(&mut self) {
        self.armed = false;
    }

    /// Resolves when the armed deadline expires. Never resolves while
    /// disarmed.
    pub async fn expired(&mut self) {
        if !self.armed {
            std::future::pending::<()>().await;
        }
        self.sleep.as_mut().await;
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::new()
    }
}
