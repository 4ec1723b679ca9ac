use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

use super::Tooltip;

/// Host input delivered to a chart, already translated out of the UI runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChartEvent {
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    Click { x: f64, y: f64 },
    /// New container content-box width in pixels.
    Resize { width: f64 },
}

/// State change emitted by a chart after handling an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartNotification {
    HoverChanged { index: usize, tooltip: Tooltip },
    HoverCleared,
    Relayout { width: u32, height: u32 },
    Clicked { index: usize, label: String },
}

/// Observer hook for host-side reactions to chart state changes.
///
/// Observers are read-only: they see notifications but cannot mutate the
/// chart that emitted them.
pub trait ChartObserver {
    fn id(&self) -> &str;
    fn on_notification(&mut self, notification: &ChartNotification);
}

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    observers: Vec<Box<dyn ChartObserver>>,
}

impl ObserverRegistry {
    pub(crate) fn register(&mut self, observer: Box<dyn ChartObserver>) -> ChartResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(ChartError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.contains(&observer_id) {
            return Err(ChartError::InvalidData(format!(
                "observer with id `{observer_id}` is already registered"
            )));
        }
        self.observers.push(observer);
        Ok(())
    }

    pub(crate) fn unregister(&mut self, observer_id: &str) -> bool {
        if let Some(position) = self
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        {
            self.observers.remove(position);
            return true;
        }
        false
    }

    pub(crate) fn contains(&self, observer_id: &str) -> bool {
        self.observers.iter().any(|entry| entry.id() == observer_id)
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn emit(&mut self, notification: &ChartNotification) {
        for observer in &mut self.observers {
            observer.on_notification(notification);
        }
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.observers.iter().map(|observer| observer.id()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartNotification, ChartObserver, ObserverRegistry};

    struct Probe {
        id: &'static str,
    }

    impl ChartObserver for Probe {
        fn id(&self) -> &str {
            self.id
        }

        fn on_notification(&mut self, _notification: &ChartNotification) {}
    }

    #[test]
    fn duplicate_and_empty_ids_are_rejected() {
        let mut registry = ObserverRegistry::default();
        registry.register(Box::new(Probe { id: "a" })).expect("first");
        assert!(registry.register(Box::new(Probe { id: "a" })).is_err());
        assert!(registry.register(Box::new(Probe { id: "" })).is_err());
        assert_eq!(registry.len(), 1);
        assert!(registry.unregister("a"));
        assert!(!registry.contains("a"));
    }
}
