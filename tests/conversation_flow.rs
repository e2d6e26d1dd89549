//! End-to-end conversation flow tests.
//!
//! Raw provider payloads go through normalization and the full
//! processing pipeline against in-memory adapters, verifying the stage
//! transitions and the outbound message sequence a real customer would
//! see.

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};

use forecourt::adapters::messaging::normalize;
use forecourt::adapters::storage::InMemoryConversationStore;
use forecourt::application::ProcessInboundHandler;
use forecourt::domain::catalog::{BodyType, PriceTier, Vehicle, VehicleId};
use forecourt::domain::conversation::{ButtonMenu, ListMenu, Stage, StageRouter, StoreFront};
use forecourt::domain::foundation::PhoneNumber;
use forecourt::ports::{
    ConversationStore, Messenger, MessengerError, VehicleCatalog,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Records every outbound send as a compact line.
#[derive(Default)]
struct RecordingMessenger {
    sent: Mutex<Vec<String>>,
}

impl RecordingMessenger {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(&self, to: &PhoneNumber, body: &str) -> Result<(), MessengerError> {
        self.sent
            .lock()
            .unwrap()
            .push(format!("{}|text|{}", to, body.lines().next().unwrap_or("")));
        Ok(())
    }

    async fn send_image(
        &self,
        to: &PhoneNumber,
        uri: &str,
        _caption: Option<&str>,
    ) -> Result<(), MessengerError> {
        self.sent.lock().unwrap().push(format!("{}|image|{}", to, uri));
        Ok(())
    }

    async fn send_list_menu(&self, to: &PhoneNumber, menu: &ListMenu) -> Result<(), MessengerError> {
        let ids: Vec<&str> = menu.choices.iter().map(|c| c.id.as_str()).collect();
        self.sent
            .lock()
            .unwrap()
            .push(format!("{}|list|{}", to, ids.join(",")));
        Ok(())
    }

    async fn send_button_menu(
        &self,
        to: &PhoneNumber,
        menu: &ButtonMenu,
    ) -> Result<(), MessengerError> {
        let ids: Vec<&str> = menu.choices.iter().map(|c| c.id.as_str()).collect();
        self.sent
            .lock()
            .unwrap()
            .push(format!("{}|buttons|{}", to, ids.join(",")));
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

fn vehicle(n: usize) -> Vehicle {
    Vehicle {
        id: VehicleId::new(format!("v{}", n)),
        display_name: format!("Carro {}", n),
        price: 40_000 + n as i64 * 500,
        mileage: Some(50_000),
        color: Some("Preto".to_string()),
        transmission: Some("Manual".to_string()),
        price_tier: PriceTier::Under50,
        body_type: BodyType::Economic,
        images: vec![format!("https://cdn.example.com/v{}.jpg", n)],
    }
}

struct World {
    store: Arc<InMemoryConversationStore>,
    messenger: Arc<RecordingMessenger>,
    handler: ProcessInboundHandler,
}

impl World {
    fn new() -> Self {
        let store = Arc::new(InMemoryConversationStore::new());
        let messenger = Arc::new(RecordingMessenger::default());
        let catalog = Arc::new(FixedCatalog {
            stock: Arc::new((0..7).map(vehicle).collect()),
        });
        let router = StageRouter::new(StoreFront {
            name: "Andrade Veículos".to_string(),
            address: "Av. Santos Dumont, 1250\nFeira de Santana - BA, 44001-000".to_string(),
            opening_hours: "Seg - Sáb: 8h às 18h".to_string(),
        });
        let handler = ProcessInboundHandler::new(
            Arc::clone(&store) as Arc<dyn ConversationStore>,
            Arc::clone(&messenger) as Arc<dyn Messenger>,
            catalog,
            router,
        );
        Self {
            store,
            messenger,
            handler,
        }
    }

    /// Feeds a raw provider payload through normalization + processing.
    /// Returns false when the payload was dropped at normalization.
    async fn receive(&self, payload: serde_json::Value) -> bool {
        match normalize(&payload) {
            Some(event) => {
                self.handler.process(event).await;
                true
            }
            None => false,
        }
    }

    async fn stage(&self) -> Stage {
        self.store
            .get_or_create(&PhoneNumber::parse("5511999999999").unwrap())
            .await
            .unwrap()
            .stage
    }
}

fn text_payload(text: &str) -> serde_json::Value {
    json!({
        "EventType": "messages",
        "chat": {"remoteJid": "5511999999999@s.whatsapp.net"},
        "message": {"type": "text", "text": text}
    })
}

fn tap_payload(id: &str) -> serde_json::Value {
    json!({
        "EventType": "messages",
        "chat": {"remoteJid": "5511999999999@s.whatsapp.net"},
        "message": {"type": "interactive", "buttonOrListid": id}
    })
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn full_browsing_journey() {
    let world = World::new();

    // First contact: a greeting resets to the welcome menu.
    assert!(world.receive(text_payload("bom dia")).await);
    assert_eq!(world.stage().await, Stage::Menu);
    let sent = world.messenger.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].contains("|text|Olá!"));
    assert!(sent[1].contains("|list|ver_carros,financiamento,troca,vendedor,endereco"));

    // Browse: category menu.
    world.messenger.clear();
    world.receive(tap_payload("ver_carros")).await;
    assert_eq!(world.stage().await, Stage::Filter);
    assert!(world.messenger.sent()[0].contains("filter:ate30"));

    // Pick a price band: first page of five plus navigation entries.
    world.messenger.clear();
    world.receive(tap_payload("filter:ate50")).await;
    assert_eq!(world.stage().await, Stage::List);
    let sent = world.messenger.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[1].contains("veh:v0,veh:v1,veh:v2,veh:v3,veh:v4,mais,vendedor,menu"));

    // See more: the remaining two vehicles.
    world.messenger.clear();
    world.receive(tap_payload("mais")).await;
    let sent = world.messenger.sent();
    assert!(sent[1].contains("veh:v5,veh:v6,vendedor,menu"));
    assert!(!sent[1].contains("mais"));

    // Open a detail card: text, photo, action buttons.
    world.messenger.clear();
    world.receive(tap_payload("veh:v5")).await;
    assert_eq!(world.stage().await, Stage::VehicleDetail);
    let sent = world.messenger.sent();
    assert_eq!(sent.len(), 3);
    assert!(sent[0].contains("|text|🚗 *Carro 5*"));
    assert!(sent[1].contains("|image|https://cdn.example.com/v5.jpg"));
    assert!(sent[2].contains("|buttons|financiamento,vendedor,voltar"));

    let record = world
        .store
        .get_or_create(&PhoneNumber::parse("5511999999999").unwrap())
        .await
        .unwrap();
    assert_eq!(record.last_viewed, Some(VehicleId::new("v5")));

    // Back to the same list page.
    world.messenger.clear();
    world.receive(tap_payload("voltar")).await;
    assert_eq!(world.stage().await, Stage::List);

    // Talk to a seller: hand-off.
    world.messenger.clear();
    world.receive(tap_payload("vendedor")).await;
    assert_eq!(world.stage().await, Stage::Transfer);

    // Any message after the hand-off restarts the flow.
    world.messenger.clear();
    world.receive(text_payload("obrigado!")).await;
    assert_eq!(world.stage().await, Stage::Menu);
    assert!(world.messenger.sent()[0].contains("|text|Olá!"));
}

#[tokio::test]
async fn group_and_status_payloads_are_dropped() {
    let world = World::new();

    let group = json!({
        "EventType": "messages",
        "chat": {"remoteJid": "12036304@g.us"},
        "message": {"text": "oi pessoal"}
    });
    assert!(!world.receive(group).await);

    let status = json!({
        "remoteJid": "status@broadcast",
        "phone": "5511999999999"
    });
    assert!(!world.receive(status).await);

    assert!(world.messenger.sent().is_empty());
    assert!(world.store.is_empty().await);
}

#[tokio::test]
async fn payloads_without_identity_are_dropped() {
    let world = World::new();
    assert!(!world.receive(json!({"message": {"text": "oi"}})).await);
    assert!(world.messenger.sent().is_empty());
}

#[tokio::test]
async fn voice_notes_hand_off_from_any_point() {
    let world = World::new();

    world.receive(text_payload("bom dia")).await;
    world.receive(tap_payload("ver_carros")).await;
    world.messenger.clear();

    let audio = json!({
        "EventType": "messages",
        "chat": {"remoteJid": "5511999999999@s.whatsapp.net"},
        "message": {"type": "ptt"}
    });
    world.receive(audio).await;

    assert_eq!(world.stage().await, Stage::Transfer);
    let sent = world.messenger.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].contains("áudio"));
}

#[tokio::test]
async fn seller_subjects_short_circuit_the_flow() {
    let world = World::new();

    world.receive(text_payload("bom dia")).await;
    world.messenger.clear();

    world.receive(text_payload("vocês fazem financiamento?")).await;
    assert_eq!(world.stage().await, Stage::Transfer);
}

#[tokio::test]
async fn typed_chatter_is_ignored_while_browsing() {
    let world = World::new();

    world.receive(text_payload("bom dia")).await;
    world.receive(tap_payload("ver_carros")).await;
    world.messenger.clear();

    world.receive(text_payload("tem carro vermelho?")).await;

    assert!(world.messenger.sent().is_empty());
    assert_eq!(world.stage().await, Stage::Filter);
}

#[tokio::test]
async fn empty_messages_reshow_the_welcome_menu() {
    let world = World::new();

    world.receive(tap_payload("ver_carros")).await;
    world.messenger.clear();

    let empty = json!({
        "EventType": "messages",
        "chat": {"remoteJid": "5511999999999@s.whatsapp.net"},
        "message": {"type": "text"}
    });
    world.receive(empty).await;

    assert_eq!(world.stage().await, Stage::Menu);
    assert_eq!(world.messenger.sent().len(), 2);
}
