//! Inbound event processing.
//!
//! One handler call per normalized event: read the record, snapshot the
//! stock, run the pure dispatch, merge the patch, then execute the
//! effects in order. All failures are contained here; nothing that goes
//! wrong while answering one customer may affect another.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error};

use crate::domain::conversation::{DeliveryPolicy, Effect, InboundEvent, StageRouter};
use crate::domain::foundation::PhoneNumber;
use crate::ports::{ConversationStore, Messenger, MessengerError, StoreError, VehicleCatalog};

/// Best-effort apology when processing blew up mid-reply.
const APOLOGY: &str =
    "Desculpe, ocorreu um erro. Por favor, tente de novo ou digite *menu*.";

/// Errors that abort the processing of one event.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("delivery failed: {0}")]
    Delivery(#[from] MessengerError),
}

/// Drives one inbound event through the conversation flow.
pub struct ProcessInboundHandler {
    store: Arc<dyn ConversationStore>,
    messenger: Arc<dyn Messenger>,
    catalog: Arc<dyn VehicleCatalog>,
    router: StageRouter,
}

impl ProcessInboundHandler {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        messenger: Arc<dyn Messenger>,
        catalog: Arc<dyn VehicleCatalog>,
        router: StageRouter,
    ) -> Self {
        Self {
            store,
            messenger,
            catalog,
            router,
        }
    }

    /// Processes one event, containing every failure.
    ///
    /// On error the customer gets a best-effort apology pointing back at
    /// the menu; a failed apology is swallowed so one broken send cannot
    /// cascade.
    pub async fn process(&self, event: InboundEvent) {
        if let Err(err) = self.process_inner(&event).await {
            error!(identity = %event.identity, error = %err, "event processing failed");
            if let Err(apology_err) = self.messenger.send_text(&event.identity, APOLOGY).await {
                debug!(identity = %event.identity, error = %apology_err, "apology send failed");
            }
        }
    }

    async fn process_inner(&self, event: &InboundEvent) -> Result<(), ProcessError> {
        let record = self.store.get_or_create(&event.identity).await?;
        let stock = self.catalog.snapshot().await;

        let outcome = self.router.dispatch(&record, event, &stock);
        if outcome.is_ignored() {
            debug!(identity = %event.identity, stage = ?record.stage, "event ignored");
            return Ok(());
        }

        if !outcome.patch.is_empty() {
            let updated = self.store.merge(&event.identity, outcome.patch).await?;
            debug!(
                identity = %event.identity,
                from = ?record.stage,
                to = ?updated.stage,
                "conversation advanced"
            );
        }

        for effect in &outcome.effects {
            match self.deliver(&event.identity, effect).await {
                Ok(()) => {}
                Err(err) => match effect.delivery_policy() {
                    DeliveryPolicy::BestEffort => {
                        debug!(
                            identity = %event.identity,
                            kind = effect.kind(),
                            error = %err,
                            "best-effort send failed"
                        );
                    }
                    DeliveryPolicy::Required => return Err(err.into()),
                },
            }
        }
        Ok(())
    }

    async fn deliver(&self, to: &PhoneNumber, effect: &Effect) -> Result<(), MessengerError> {
        match effect {
            Effect::SendText { body } => self.messenger.send_text(to, body).await,
            Effect::SendImage { uri, caption } => {
                self.messenger.send_image(to, uri, caption.as_deref()).await
            }
            Effect::SendListMenu(menu) => self.messenger.send_list_menu(to, menu).await,
            Effect::SendButtonMenu(menu) => self.messenger.send_button_menu(to, menu).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::adapters::storage::InMemoryConversationStore;
    use crate::domain::catalog::{BodyType, PriceTier, Vehicle, VehicleId};
    use crate::domain::conversation::{ButtonMenu, ListMenu, Stage, StoreFront};

    /// Messenger that records sends and can fail on demand per kind.
    #[derive(Default)]
    struct RecordingMessenger {
        sent: Mutex<Vec<String>>,
        fail_text: Mutex<bool>,
        fail_images: Mutex<bool>,
    }

    impl RecordingMessenger {
        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }

        fn fail_text(&self, fail: bool) {
            *self.fail_text.lock().unwrap() = fail;
        }

        fn fail_images(&self, fail: bool) {
            *self.fail_images.lock().unwrap() = fail;
        }
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send_text(&self, _to: &PhoneNumber, body: &str) -> Result<(), MessengerError> {
            if *self.fail_text.lock().unwrap() {
                return Err(MessengerError::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            self.sent.lock().unwrap().push(format!("text:{}", body));
            Ok(())
        }

        async fn send_image(
            &self,
            _to: &PhoneNumber,
            uri: &str,
            _caption: Option<&str>,
        ) -> Result<(), MessengerError> {
            if *self.fail_images.lock().unwrap() {
                return Err(MessengerError::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            self.sent.lock().unwrap().push(format!("image:{}", uri));
            Ok(())
        }

        async fn send_list_menu(
            &self,
            _to: &PhoneNumber,
            menu: &ListMenu,
        ) -> Result<(), MessengerError> {
            self.sent.lock().unwrap().push(format!("list:{}", menu.text));
            Ok(())
        }

        async fn send_button_menu(
            &self,
            _to: &PhoneNumber,
            menu: &ButtonMenu,
        ) -> Result<(), MessengerError> {
            self.sent.lock().unwrap().push(format!("buttons:{}", menu.text));
            Ok(())
        }
    }

    struct FixedCatalog {
        stock: Arc<Vec<Vehicle>>,
    }

    #[async_trait]
    impl VehicleCatalog for FixedCatalog {
        async fn snapshot(&self) -> Arc<Vec<Vehicle>> {
            Arc::clone(&self.stock)
        }
    }

    fn vehicle(id: &str) -> Vehicle {
        Vehicle {
            id: VehicleId::new(id),
            display_name: format!("Carro {}", id),
            price: 42_000,
            mileage: None,
            color: None,
            transmission: None,
            price_tier: PriceTier::Under50,
            body_type: BodyType::Economic,
            images: vec![format!("https://cdn.example.com/{}.jpg", id)],
        }
    }

    struct Harness {
        store: Arc<InMemoryConversationStore>,
        messenger: Arc<RecordingMessenger>,
        handler: ProcessInboundHandler,
    }

    fn harness() -> Harness {
        let store = Arc::new(InMemoryConversationStore::new());
        let messenger = Arc::new(RecordingMessenger::default());
        let catalog = Arc::new(FixedCatalog {
            stock: Arc::new(vec![vehicle("v1"), vehicle("v2")]),
        });
        let router = StageRouter::new(StoreFront {
            name: "Andrade Veículos".to_string(),
            address: "Av. Santos Dumont, 1250".to_string(),
            opening_hours: "Seg - Sáb: 8h às 18h".to_string(),
        });
        let handler = ProcessInboundHandler::new(
            Arc::clone(&store) as Arc<dyn ConversationStore>,
            Arc::clone(&messenger) as Arc<dyn Messenger>,
            catalog,
            router,
        );
        Harness {
            store,
            messenger,
            handler,
        }
    }

    fn identity() -> PhoneNumber {
        PhoneNumber::parse("5511999999999").unwrap()
    }

    fn tap(text: &str) -> InboundEvent {
        InboundEvent::new(identity(), text, false, true)
    }

    #[tokio::test]
    async fn greeting_sends_welcome_and_stores_the_record() {
        let h = harness();
        h.handler
            .process(InboundEvent::new(identity(), "oi", false, false))
            .await;

        let sent = h.messenger.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].starts_with("text:Olá!"));
        assert!(sent[1].starts_with("list:"));

        let record = h.store.get_or_create(&identity()).await.unwrap();
        assert_eq!(record.stage, Stage::Menu);
    }

    #[tokio::test]
    async fn ignored_events_send_nothing_and_change_nothing() {
        let h = harness();
        h.handler
            .process(InboundEvent::new(identity(), "blablabla", false, false))
            .await;

        assert!(h.messenger.sent().is_empty());
        let record = h.store.get_or_create(&identity()).await.unwrap();
        assert_eq!(record.stage, Stage::Menu);
    }

    #[tokio::test]
    async fn state_is_merged_before_effects_run() {
        let h = harness();
        h.handler.process(tap("ver_carros")).await;

        let record = h.store.get_or_create(&identity()).await.unwrap();
        assert_eq!(record.stage, Stage::Filter);
        assert_eq!(h.messenger.sent().len(), 1);
    }

    #[tokio::test]
    async fn image_failures_do_not_stop_the_reply() {
        let h = harness();
        h.handler.process(tap("ver_carros")).await;
        h.handler.process(tap("filter:todos")).await;

        h.messenger.fail_images(true);
        h.handler.process(tap("veh:v1")).await;

        let sent = h.messenger.sent();
        // The detail card text and the action buttons still arrive.
        assert!(sent.iter().any(|s| s.starts_with("text:🚗")));
        assert!(sent.iter().any(|s| s.starts_with("buttons:")));
        assert!(!sent.iter().any(|s| s.starts_with("image:")));

        let record = h.store.get_or_create(&identity()).await.unwrap();
        assert_eq!(record.stage, Stage::VehicleDetail);
    }

    #[tokio::test]
    async fn text_failure_triggers_the_apology_path() {
        let h = harness();
        h.messenger.fail_text(true);
        h.handler
            .process(InboundEvent::new(identity(), "oi", false, false))
            .await;

        // Both the welcome text and the apology failed silently; the
        // process call itself must not panic or propagate.
        assert!(h.messenger.sent().is_empty());

        // Recovery: the next greeting works once sends do.
        h.messenger.fail_text(false);
        h.handler
            .process(InboundEvent::new(identity(), "oi", false, false))
            .await;
        assert_eq!(h.messenger.sent().len(), 2);
    }

    #[tokio::test]
    async fn audio_hands_off_and_acknowledges() {
        let h = harness();
        h.handler
            .process(InboundEvent::new(identity(), "", true, false))
            .await;

        let sent = h.messenger.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].contains("áudio"));

        let record = h.store.get_or_create(&identity()).await.unwrap();
        assert_eq!(record.stage, Stage::Transfer);
    }

    #[tokio::test]
    async fn browsing_flow_reaches_detail_with_recorded_list() {
        let h = harness();
        h.handler.process(tap("ver_carros")).await;
        h.handler.process(tap("filter:todos")).await;

        let record = h.store.get_or_create(&identity()).await.unwrap();
        assert_eq!(record.stage, Stage::List);
        assert_eq!(
            record.current_list,
            vec![VehicleId::new("v1"), VehicleId::new("v2")]
        );

        h.handler.process(tap("veh:v2")).await;
        let record = h.store.get_or_create(&identity()).await.unwrap();
        assert_eq!(record.stage, Stage::VehicleDetail);
        assert_eq!(record.last_viewed, Some(VehicleId::new("v2")));
    }
}
