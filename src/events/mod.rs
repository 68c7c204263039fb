//! In-process event emission.
//!
//! Every create/update/delete and every voucher lifecycle transition emits a
//! set of topic strings for external consumers to fan out. Delivery is a pure
//! notification contract: the core never depends on it succeeding, and a full
//! or closed channel only produces a warning at the call site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::errors::LedgerError;
use crate::tenant::Tenant;

/// Events raised by the ledger core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    AccountCreated(Uuid),
    AccountUpdated(Uuid),
    AccountDeleted(Uuid),
    GroupingCreated(Uuid),
    GroupingUpdated(Uuid),
    DefinitionCreated(Uuid),
    DefinitionUpdated(Uuid),
    DefinitionDeleted(Uuid),
    JournalVoucherCreated(Uuid),
    JournalVoucherUpdated(Uuid),
    JournalVoucherDeleted(Uuid),
    JournalVoucherEntryAdded {
        voucher_id: Uuid,
        entry_id: Uuid,
    },
    JournalVoucherPrinted(Uuid),
    JournalVoucherApproved(Uuid),
    JournalVoucherReleased(Uuid),
    ChartOfAccountsSeeded {
        organization_id: Uuid,
        branch_id: Uuid,
    },
}

/// An event together with the topic strings it should be dispatched under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub topics: Vec<String>,
    pub event: Event,
    pub occurred_at: DateTime<Utc>,
}

impl EventEnvelope {
    pub fn new(topics: Vec<String>, event: Event) -> Self {
        Self {
            topics,
            event,
            occurred_at: Utc::now(),
        }
    }

    /// The wire form published to each topic by a message-bus dispatcher.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The four-shaped topic set emitted for every entity mutation:
/// `<entity>.<action>`, `<entity>.<action>.<id>`,
/// `<entity>.<action>.branch.<branch>`, `<entity>.<action>.organization.<org>`.
pub fn entity_topics(entity: &str, action: &str, id: Uuid, tenant: &Tenant) -> Vec<String> {
    vec![
        format!("{entity}.{action}"),
        format!("{entity}.{action}.{id}"),
        format!("{entity}.{action}.branch.{}", tenant.branch_id),
        format!("{entity}.{action}.organization.{}", tenant.organization_id),
    ]
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<EventEnvelope>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<EventEnvelope>) -> Self {
        Self { sender }
    }

    /// Convenience constructor returning the sender and its receiving half.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<EventEnvelope>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    pub async fn send(&self, envelope: EventEnvelope) -> Result<(), LedgerError> {
        self.sender
            .send(envelope)
            .await
            .map_err(|e| LedgerError::Event(format!("failed to send event: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_topics_have_the_four_shapes() {
        let tenant = Tenant::new(Uuid::new_v4(), Uuid::new_v4());
        let id = Uuid::new_v4();
        let topics = entity_topics("account", "create", id, &tenant);

        assert_eq!(topics.len(), 4);
        assert_eq!(topics[0], "account.create");
        assert_eq!(topics[1], format!("account.create.{id}"));
        assert_eq!(topics[2], format!("account.create.branch.{}", tenant.branch_id));
        assert_eq!(
            topics[3],
            format!("account.create.organization.{}", tenant.organization_id)
        );
    }

    #[test]
    fn envelope_serializes_with_topics_and_timestamp() {
        let tenant = Tenant::new(Uuid::new_v4(), Uuid::new_v4());
        let id = Uuid::new_v4();
        let envelope = EventEnvelope::new(
            entity_topics("account", "delete", id, &tenant),
            Event::AccountDeleted(id),
        );

        let json = envelope.to_json().unwrap();
        assert!(json.contains("account.delete"));
        assert!(json.contains("occurred_at"));
    }

    #[tokio::test]
    async fn send_delivers_envelope() {
        let (sender, mut rx) = EventSender::channel(4);
        let tenant = Tenant::new(Uuid::new_v4(), Uuid::new_v4());
        let id = Uuid::new_v4();

        sender
            .send(EventEnvelope::new(
                entity_topics("account", "create", id, &tenant),
                Event::AccountCreated(id),
            ))
            .await
            .unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event, Event::AccountCreated(id));
        assert_eq!(received.topics[0], "account.create");
    }

    #[tokio::test]
    async fn send_on_a_closed_channel_is_an_event_error() {
        let (sender, rx) = EventSender::channel(4);
        drop(rx);
        let tenant = Tenant::new(Uuid::new_v4(), Uuid::new_v4());
        let id = Uuid::new_v4();

        let err = sender
            .send(EventEnvelope::new(
                entity_topics("account", "create", id, &tenant),
                Event::AccountCreated(id),
            ))
            .await
            .unwrap_err();
        assert_matches::assert_matches!(err, LedgerError::Event(_));
    }
}
