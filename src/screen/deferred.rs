use std::collections::HashMap;
use std::time::Duration;

use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};

use super::ScreenData;

/// Purpose of a deferred callback. At most one callback per purpose is pending at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeferredWork {
    TilePreview,
    WorkAreaRecalc,
    FullscreenCheck,
}

/// Single-shot timers keyed by purpose.
pub struct Deferred<D: ScreenData> {
    event_loop: LoopHandle<'static, D>,
    pending: HashMap<DeferredWork, RegistrationToken>,
}

impl<D: ScreenData> Deferred<D> {
    pub fn new(event_loop: LoopHandle<'static, D>) -> Self {
        Self {
            event_loop,
            pending: HashMap::new(),
        }
    }

    /// Runs `callback` after `delay`, replacing any pending callback for the same work.
    pub fn schedule(
        &mut self,
        work: DeferredWork,
        delay: Duration,
        callback: impl FnOnce(&mut D) + 'static,
    ) {
        self.cancel(work);

        let mut callback = Some(callback);
        let timer = Timer::from_duration(delay);
        let res = self.event_loop.insert_source(timer, move |_, _, data| {
            data.screen().deferred.pending.remove(&work);
            if let Some(callback) = callback.take() {
                callback(data);
            }
            TimeoutAction::Drop
        });

        match res {
            Ok(token) => {
                trace!("scheduled {work:?} in {delay:?}");
                self.pending.insert(work, token);
            }
            Err(err) => warn!("error scheduling {work:?}: {err:?}"),
        }
    }

    /// Cancels the pending callback for `work`. Returns whether one was pending.
    pub fn cancel(&mut self, work: DeferredWork) -> bool {
        match self.pending.remove(&work) {
            Some(token) => {
                self.event_loop.remove(token);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (work, token) in self.pending.drain() {
            trace!("cancelling {work:?}");
            self.event_loop.remove(token);
        }
    }

    pub fn is_pending(&self, work: DeferredWork) -> bool {
        self.pending.contains_key(&work)
    }
}
