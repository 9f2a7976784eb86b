use crate::models::ticket::TicketStatus;
use tokio::sync::broadcast;

/// Ticket lifecycle events published by the services
#[derive(Debug, Clone)]
pub enum SystemEvent {
    TicketOpened {
        ticket_id: String,
        client_id: String,
        technician_id: Option<String>,
        timestamp: String, // ISO 8601
    },
    TicketStatusChanged {
        ticket_id: String,
        old_status: TicketStatus,
        new_status: TicketStatus,
        timestamp: String, // ISO 8601
    },
    TicketAssigned {
        ticket_id: String,
        technician_id: String,
        timestamp: String, // ISO 8601
    },
}

/// Event bus for publishing and subscribing to system events
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SystemEvent>,
}

impl EventBus {
    /// Create a new event bus with specified capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event to all subscribers (non-blocking, fire-and-forget)
    pub fn publish(&self, event: SystemEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::debug!("No subscribers for event: {}", e);
        }
    }

    /// Subscribe to events (returns a receiver)
    pub fn subscribe(&self) -> broadcast::Receiver<SystemEvent> {
        self.tx.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1000)
    }
}
