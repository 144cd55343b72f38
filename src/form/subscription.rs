use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};
use std::time::Duration;

use futures_timer::Delay;

use super::control::{FieldControl, FieldState, FormResult, read_lock, write_lock};
use super::value::FieldValue;

static SUBSCRIPTION_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubscriptionId(pub u64);

impl SubscriptionId {
    pub fn next() -> Self {
        Self(SUBSCRIPTION_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

pub(super) type ChangeCallback = Arc<dyn Fn(&FieldValue) + Send + Sync>;

#[derive(Clone)]
pub(super) struct SubscriberEntry {
    pub(super) id: SubscriptionId,
    pub(super) debounce: Duration,
    pub(super) callback: ChangeCallback,
}

pub struct Subscription {
    field: Weak<RwLock<FieldState>>,
    id: SubscriptionId,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn detach(mut self) {
        self.field = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(state) = self.field.upgrade() else {
            return;
        };
        let mut state = match state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.subscribers.retain(|entry| entry.id != self.id);
    }
}

impl FieldControl {
    pub fn subscribe(
        &self,
        callback: impl Fn(&FieldValue) + Send + Sync + 'static,
    ) -> FormResult<Subscription> {
        self.subscribe_with_debounce(Duration::ZERO, callback)
    }

    pub fn subscribe_with_debounce(
        &self,
        debounce: Duration,
        callback: impl Fn(&FieldValue) + Send + Sync + 'static,
    ) -> FormResult<Subscription> {
        let id = SubscriptionId::next();
        write_lock(&self.state, "registering value subscriber")?
            .subscribers
            .push(SubscriberEntry {
                id,
                debounce,
                callback: Arc::new(callback),
            });
        Ok(Subscription {
            field: Arc::downgrade(&self.state),
            id,
        })
    }

    pub async fn input_async(&self, value: impl Into<FieldValue>) -> FormResult<()> {
        self.input(value)?;
        self.deliver_debounced().await
    }

    pub(super) fn notify_subscribers(&self) -> FormResult<()> {
        self.notify_where(|entry| entry.debounce.is_zero())
    }

    pub(super) fn notify_all_subscribers(&self) -> FormResult<()> {
        self.notify_where(|_entry| true)
    }

    fn notify_where(&self, keep: impl Fn(&SubscriberEntry) -> bool) -> FormResult<()> {
        let (value, callbacks) = {
            let state = read_lock(&self.state, "reading subscribers for notify")?;
            let callbacks: Vec<ChangeCallback> = state
                .subscribers
                .iter()
                .filter(|entry| keep(entry))
                .map(|entry| entry.callback.clone())
                .collect();
            (state.value.clone(), callbacks)
        };
        // Callbacks run without the state lock so they can read the field back.
        for callback in callbacks {
            callback(&value);
        }
        Ok(())
    }

    async fn deliver_debounced(&self) -> FormResult<()> {
        let (revision, entries) = {
            let state = read_lock(&self.state, "reading debounced subscribers")?;
            let entries: Vec<SubscriberEntry> = state
                .subscribers
                .iter()
                .filter(|entry| !entry.debounce.is_zero())
                .cloned()
                .collect();
            (state.revision, entries)
        };
        for entry in entries {
            Delay::new(entry.debounce).await;
            // A newer change supersedes this delivery.
            if !self.is_latest_revision(revision)? {
                continue;
            }
            // An unsubscribe during the wait cancels the delivery.
            if !self.is_subscribed(entry.id)? {
                continue;
            }
            let value = self.value()?;
            (entry.callback)(&value);
        }
        Ok(())
    }

    fn is_latest_revision(&self, revision: u64) -> FormResult<bool> {
        Ok(read_lock(&self.state, "checking change revision")?.revision == revision)
    }

    fn is_subscribed(&self, id: SubscriptionId) -> FormResult<bool> {
        Ok(read_lock(&self.state, "checking subscriber registration")?
            .subscribers
            .iter()
            .any(|entry| entry.id == id))
    }
}
