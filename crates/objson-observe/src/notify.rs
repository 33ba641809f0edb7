use std::sync::mpsc::{self, Receiver, Sender};

/// A tracked property's stored value actually changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyChanged {
    pub property: String,
}

#[derive(Debug)]
struct Subscriber {
    /// `None` receives every change.
    property: Option<String>,
    sender: Sender<PropertyChanged>,
}

/// Fans change notifications out to subscribers.
///
/// Subscribers whose receiver has been dropped are pruned the next time a
/// change is routed to them.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    subscribers: Vec<Subscriber>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every change.
    pub fn subscribe(&mut self) -> Receiver<PropertyChanged> {
        self.add(None)
    }

    /// Receive changes to one property only.
    pub fn subscribe_to(&mut self, property: impl Into<String>) -> Receiver<PropertyChanged> {
        self.add(Some(property.into()))
    }

    fn add(&mut self, property: Option<String>) -> Receiver<PropertyChanged> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.push(Subscriber { property, sender });
        receiver
    }

    pub fn notify(&mut self, property: &str) {
        self.subscribers.retain(|sub| match &sub.property {
            Some(wanted) if wanted != property => true,
            _ => sub
                .sender
                .send(PropertyChanged {
                    property: property.to_string(),
                })
                .is_ok(),
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
