//! Synchronous, in order, event channels
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use log::error;

use crate::{
    error::{Error, ErrorEvent},
    message::{Message, Protocol},
};

/// Error a message subscriber may return
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Message subscriber
pub type MessageHandler = Box<dyn FnMut(&Message) -> Result<(), HandlerError> + Send>;

/// Raw (validated) frame subscriber, for relaying or recording
pub type RawFrameHandler = Box<dyn FnMut(Protocol, &[u8]) + Send>;

/// Error subscriber
pub type ErrorHandler = Box<dyn FnMut(&ErrorEvent) + Send>;

/// Panic message, when the payload is a string
fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(reason) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", reason)
    } else if let Some(reason) = payload.downcast_ref::<String>() {
        format!("panicked: {}", reason)
    } else {
        "panicked".to_string()
    }
}

/// Handle returned by every subscription, to unsubscribe later on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription(u64);

/// Message, raw frame and error channels.
/// Subscribers are invoked in subscription order.
#[derive(Default)]
pub struct Events {
    next: u64,
    messages: Vec<(Subscription, MessageHandler)>,
    raw_frames: Vec<(Subscription, RawFrameHandler)>,
    errors: Vec<(Subscription, ErrorHandler)>,
}

impl std::fmt::Debug for Events {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Events")
            .field("messages", &self.messages.len())
            .field("raw_frames", &self.raw_frames.len())
            .field("errors", &self.errors.len())
            .finish()
    }
}

impl Events {
    fn subscription(&mut self) -> Subscription {
        self.next += 1;
        Subscription(self.next)
    }

    pub fn on_message<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(&Message) -> Result<(), HandlerError> + Send + 'static,
    {
        let subscription = self.subscription();
        self.messages.push((subscription, Box::new(handler)));
        subscription
    }

    pub fn on_raw_frame<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(Protocol, &[u8]) + Send + 'static,
    {
        let subscription = self.subscription();
        self.raw_frames.push((subscription, Box::new(handler)));
        subscription
    }

    pub fn on_error<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(&ErrorEvent) + Send + 'static,
    {
        let subscription = self.subscription();
        self.errors.push((subscription, Box::new(handler)));
        subscription
    }

    /// Removes this [Subscription], whatever its channel.
    /// Returns false if it was not (or no longer) subscribed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.messages.len() + self.raw_frames.len() + self.errors.len();
        self.messages.retain(|(s, _)| *s != subscription);
        self.raw_frames.retain(|(s, _)| *s != subscription);
        self.errors.retain(|(s, _)| *s != subscription);
        before != self.messages.len() + self.raw_frames.len() + self.errors.len()
    }

    /// Delivers a [Message]. Subscriber failures, returned errors and panics
    /// alike, are converted to [Error::Publication] and delivered on the
    /// error channel: they never interrupt delivery to other subscribers.
    pub fn publish_message(&mut self, message: &Message) {
        for (_, handler) in self.messages.iter_mut() {
            let reason = match panic::catch_unwind(AssertUnwindSafe(|| handler(message))) {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e.to_string(),
                Err(payload) => panic_reason(payload.as_ref()),
            };
            error!(
                "{}({}) {} subscriber failure: {}",
                message.protocol,
                message.id,
                message.name(),
                reason
            );
            let event = ErrorEvent::new(message.protocol, Error::Publication(reason))
                .with_message_id(message.id.clone())
                .with_message_name(message.name());
            for (_, handler) in self.errors.iter_mut() {
                handler(&event);
            }
        }
    }

    pub fn publish_raw_frame(&mut self, protocol: Protocol, bytes: &[u8]) {
        for (_, handler) in self.raw_frames.iter_mut() {
            handler(protocol, bytes);
        }
    }

    pub fn publish_error(&mut self, event: &ErrorEvent) {
        for (_, handler) in self.errors.iter_mut() {
            handler(event);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn unsubscription() {
        let mut events = Events::default();
        let counter = Arc::new(Mutex::new(0));

        let shared = counter.clone();
        let first = events.on_raw_frame(move |_, _| *shared.lock().unwrap() += 1);
        let shared = counter.clone();
        let second = events.on_raw_frame(move |_, _| *shared.lock().unwrap() += 10);

        events.publish_raw_frame(Protocol::Ubx, &[]);
        assert_eq!(*counter.lock().unwrap(), 11);

        assert!(events.unsubscribe(first));
        assert!(!events.unsubscribe(first));

        events.publish_raw_frame(Protocol::Ubx, &[]);
        assert_eq!(*counter.lock().unwrap(), 21);

        assert!(events.unsubscribe(second));
        events.publish_raw_frame(Protocol::Ubx, &[]);
        assert_eq!(*counter.lock().unwrap(), 21);
    }
}
