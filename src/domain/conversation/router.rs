//! The stage router: one pure dispatch over (record, event, stock).
//!
//! Every inbound event runs through the same order of checks: greeting
//! reset, hand-off triggers (audio or seller-only subjects), the
//! interactive lock, then the per-stage transition table. The router
//! never performs I/O; it proposes a [`RecordPatch`] and an ordered list
//! of [`Effect`]s for the application layer to execute.

use crate::domain::catalog::{
    self, group_thousands, Vehicle, VehicleFilter, VehicleId, MAX_IMAGES,
};

use super::effect::{ButtonChoice, ButtonMenu, Effect, ListMenu, MenuChoice};
use super::event::InboundEvent;
use super::patterns;
use super::record::{ConversationRecord, RecordPatch};
use super::stage::Stage;

/// Hand-off message sent whenever the bot steps aside for a seller.
const HANDOFF: &str =
    "Perfeito! Vou te encaminhar para um de nossos vendedores. Só um momento.";

/// Extra note sent before the hand-off when the trigger was a voice note.
const AUDIO_ACK: &str = "Recebi seu áudio. Vou te encaminhar para um vendedor.";

const TRADE_ACK: &str =
    "Obrigado! Vou te encaminhar para um de nossos vendedores. Só um momento.";

const OPTION_NOT_FOUND: &str =
    "Opção não encontrada. Toque em *Ver opções* ou digite 1, 2, 3, 4 ou 5.";

const LIST_INTRO: &str = "Encontrei essas opções para você (sem fotos):";

const VEHICLE_NOT_FOUND: &str = "Veículo não encontrado.";

const FINANCING_PROMPT: &str = "Beleza! Para simular o financiamento, me informe:\n\
     • Valor de entrada, ou\n\
     • Valor da parcela desejada\n\n\
     Assim que você enviar, um vendedor vai te atender.";

const TRADE_PROMPT: &str = "Certo! Para avaliar seu carro, me envie:\n\
     • Marca e modelo\n\
     • Ano\n\
     • Quilometragem\n\
     • Fotos do veículo (se puder)\n\n\
     Após sua resposta, um vendedor vai te atender.";

/// Tokens that bring the customer back to the main menu from anywhere.
const BACK_TO_MENU: [&str; 4] = ["menu", "voltar", "voltar ao menu", "voltar ao menu principal"];

/// Substrings that mean the customer is asking where the store is.
const ADDRESS_HINTS: [&str; 5] = [
    "endereço",
    "endereco",
    "localização",
    "localizacao",
    "onde fica",
];

/// Filters offered on the category menu, in display order.
const CATEGORY_MENU: [VehicleFilter; 5] = [
    VehicleFilter::Under30,
    VehicleFilter::Under50,
    VehicleFilter::Under80,
    VehicleFilter::Automatic,
    VehicleFilter::All,
];

/// Dealership identity woven into the message copy.
#[derive(Debug, Clone)]
pub struct StoreFront {
    pub name: String,
    pub address: String,
    pub opening_hours: String,
}

/// What a dispatch decided: a state patch plus ordered outbound effects.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub patch: RecordPatch,
    pub effects: Vec<Effect>,
}

impl Outcome {
    fn ignored() -> Self {
        Self {
            patch: RecordPatch::default(),
            effects: Vec::new(),
        }
    }

    /// True when the event produced no reply and no state change.
    pub fn is_ignored(&self) -> bool {
        self.patch.is_empty() && self.effects.is_empty()
    }
}

/// The conversation state machine.
pub struct StageRouter {
    store: StoreFront,
}

impl StageRouter {
    pub fn new(store: StoreFront) -> Self {
        Self { store }
    }

    /// Routes one inbound event against the customer's current record.
    ///
    /// `stock` is the current inventory snapshot; the router reads it for
    /// listings and detail cards but never holds on to it.
    pub fn dispatch(
        &self,
        record: &ConversationRecord,
        event: &InboundEvent,
        stock: &[Vehicle],
    ) -> Outcome {
        // A greeting (or a message with nothing in it) restarts the flow
        // from any stage.
        if event.is_blank() || patterns::is_greeting(&event.text) {
            return self.welcome();
        }

        let token = event.token();

        // Voice notes and seller-only subjects skip the flow entirely,
        // whatever stage the customer is in.
        if event.is_audio || patterns::wants_handoff(&token) {
            let mut outcome = self.transfer();
            if event.is_audio {
                outcome.effects.insert(0, Effect::text(AUDIO_ACK));
            }
            return outcome;
        }

        match record.stage {
            // Once the bot asked for financing or trade-in details, any
            // typed answer is forwarded to a seller.
            Stage::Financing => self.forward_details(&token, HANDOFF),
            Stage::Trade => self.forward_details(&token, TRADE_ACK),
            // A message after hand-off means the seller conversation is
            // over; start again from the top.
            Stage::Transfer => self.welcome(),
            // Browsing stages are locked to menu taps so arbitrary
            // chatter is not misread as navigation.
            _ if !event.is_interactive => Outcome::ignored(),
            Stage::Menu => self.main_menu(&token),
            Stage::Filter => self.category_selection(&token, stock),
            Stage::List => self.list_selection(record, &token, stock),
            Stage::VehicleDetail => self.detail_selection(record, &token, stock),
        }
    }

    // ── Stage handlers ──────────────────────────────────────────────

    fn main_menu(&self, token: &str) -> Outcome {
        if BACK_TO_MENU.contains(&token) {
            return self.welcome();
        }
        // Asking for the address never transfers; the bot can answer it.
        if ADDRESS_HINTS.iter().any(|h| token.contains(h)) {
            return self.address_card();
        }

        match Self::menu_option(token) {
            Some(1) => self.category_menu(),
            Some(2) => self.financing_prompt(),
            Some(3) => self.trade_prompt(),
            Some(4) => self.transfer(),
            Some(5) => self.address_card(),
            _ => {
                let mut outcome = self.welcome();
                outcome.effects.insert(0, Effect::text(OPTION_NOT_FOUND));
                outcome
            }
        }
    }

    /// Maps selection ids, typed labels and the 1-5 shortcuts onto the
    /// main menu options.
    fn menu_option(token: &str) -> Option<u8> {
        match token {
            "ver_carros" | "1" | "ver carros" | "ver carros disponíveis" => Some(1),
            "financiamento" | "2" | "simular financiamento" => Some(2),
            "troca" | "3" | "avaliar" | "avaliar meu carro na troca" => Some(3),
            "vendedor" | "4" | "falar com vendedor" => Some(4),
            "endereco" | "endereço" | "5" | "endereço da loja" | "localização"
            | "localizacao" | "ver endereço" | "ver endereco" => Some(5),
            _ => None,
        }
    }

    fn category_selection(&self, token: &str, stock: &[Vehicle]) -> Outcome {
        if token == "menu" {
            return self.welcome();
        }
        let Some(key) = token.strip_prefix("filter:") else {
            // Locked: only selections coming from the category menu count.
            return Outcome::ignored();
        };

        let filter = VehicleFilter::from_key(key);
        let (ids, effects) = self.list_page(filter, 1, stock);
        Outcome {
            patch: RecordPatch {
                stage: Some(Stage::List),
                active_filter: Some(filter),
                active_page: Some(1),
                current_list: Some(ids),
                ..Default::default()
            },
            effects,
        }
    }

    fn list_selection(
        &self,
        record: &ConversationRecord,
        token: &str,
        stock: &[Vehicle],
    ) -> Outcome {
        let filter = record.active_filter.unwrap_or(VehicleFilter::All);

        match token {
            "vendedor" | "falar com vendedor" => self.transfer(),
            "menu" => self.welcome(),
            "mais" => {
                let next_page = record.active_page + 1;
                if catalog::query(stock, filter, next_page).items.is_empty() {
                    // Nothing further: show the same page again.
                    let (ids, effects) = self.list_page(filter, record.active_page, stock);
                    Outcome {
                        patch: RecordPatch {
                            current_list: Some(ids),
                            ..Default::default()
                        },
                        effects,
                    }
                } else {
                    let (ids, effects) = self.list_page(filter, next_page, stock);
                    Outcome {
                        patch: RecordPatch {
                            active_page: Some(next_page),
                            current_list: Some(ids),
                            ..Default::default()
                        },
                        effects,
                    }
                }
            }
            _ => match token.strip_prefix("veh:") {
                Some(id) => self.vehicle_card(&VehicleId::new(id), stock),
                None => Outcome::ignored(),
            },
        }
    }

    fn detail_selection(
        &self,
        record: &ConversationRecord,
        token: &str,
        stock: &[Vehicle],
    ) -> Outcome {
        match token {
            "vendedor" | "falar com vendedor" => self.transfer(),
            "voltar" | "voltar para a lista" => {
                let filter = record.active_filter.unwrap_or(VehicleFilter::All);
                let (ids, effects) = self.list_page(filter, record.active_page, stock);
                Outcome {
                    patch: RecordPatch {
                        stage: Some(Stage::List),
                        current_list: Some(ids),
                        ..Default::default()
                    },
                    effects,
                }
            }
            "financiamento" | "simular financiamento" => self.financing_prompt(),
            _ => Outcome::ignored(),
        }
    }

    fn forward_details(&self, token: &str, ack: &str) -> Outcome {
        if token.is_empty() {
            return Outcome::ignored();
        }
        let mut outcome = self.transfer();
        outcome.effects.insert(0, Effect::text(ack));
        outcome
    }

    // ── Outcome builders ────────────────────────────────────────────

    /// Welcome text plus the main menu; resets the stage to `Menu`.
    fn welcome(&self) -> Outcome {
        let greeting = format!(
            "Olá! 👋 Seja muito bem-vindo à {}!\n\n\
             É um prazer ter você aqui. Vamos encontrar o carro perfeito pra você?",
            self.store.name
        );
        let menu = ListMenu {
            text: "Como posso te ajudar hoje?".to_string(),
            footer_text: self.store.name.clone(),
            list_button_label: "Ver opções".to_string(),
            choices: vec![
                MenuChoice::new("Ver carros disponíveis", "ver_carros", "Veículos em estoque"),
                MenuChoice::new("Simular financiamento", "financiamento", "Simule suas parcelas"),
                MenuChoice::new("Avaliar meu carro na troca", "troca", "Avaliação para troca"),
                MenuChoice::new("Falar com vendedor", "vendedor", "Atendimento humano"),
                MenuChoice::new("Endereço da loja", "endereco", "Localização e horários"),
            ],
        };
        Outcome {
            patch: RecordPatch::stage(Stage::Menu),
            effects: vec![Effect::text(greeting), Effect::SendListMenu(menu)],
        }
    }

    fn category_menu(&self) -> Outcome {
        let mut choices: Vec<MenuChoice> = CATEGORY_MENU
            .iter()
            .map(|f| MenuChoice::new(f.label(), format!("filter:{}", f.key()), ""))
            .collect();
        choices.push(MenuChoice::new("Voltar ao menu principal", "menu", ""));

        let menu = ListMenu {
            text: "Perfeito! Que tipo de carro você procura?".to_string(),
            footer_text: self.store.name.clone(),
            list_button_label: "Filtrar".to_string(),
            choices,
        };
        Outcome {
            patch: RecordPatch::stage(Stage::Filter),
            effects: vec![Effect::SendListMenu(menu)],
        }
    }

    /// Renders one listing page; returns the shown ids alongside the
    /// effects so callers can record them.
    fn list_page(
        &self,
        filter: VehicleFilter,
        page: u32,
        stock: &[Vehicle],
    ) -> (Vec<VehicleId>, Vec<Effect>) {
        let result = catalog::query(stock, filter, page);
        let ids: Vec<VehicleId> = result.items.iter().map(|v| v.id.clone()).collect();

        let mut choices: Vec<MenuChoice> = result
            .items
            .iter()
            .map(|v| {
                MenuChoice::new(
                    format!("{} – {}", v.display_name, v.formatted_price()),
                    format!("veh:{}", v.id),
                    "",
                )
            })
            .collect();
        if result.has_more {
            choices.push(MenuChoice::new("Ver mais opções", "mais", ""));
        }
        choices.push(MenuChoice::new("Falar com vendedor", "vendedor", ""));
        choices.push(MenuChoice::new("Voltar ao menu principal", "menu", ""));

        let menu = ListMenu {
            text: "Escolha o carro (nomes na lista):".to_string(),
            footer_text: format!("Página {}", result.page),
            list_button_label: "Ver carros".to_string(),
            choices,
        };
        (ids, vec![Effect::text(LIST_INTRO), Effect::SendListMenu(menu)])
    }

    /// Detail card: info text, up to five photos, then the action buttons.
    fn vehicle_card(&self, id: &VehicleId, stock: &[Vehicle]) -> Outcome {
        let Some(vehicle) = catalog::find_by_id(stock, id) else {
            let mut outcome = self.welcome();
            outcome.effects.insert(0, Effect::text(VEHICLE_NOT_FOUND));
            return outcome;
        };

        let mut card = format!(
            "🚗 *{}*\n💰 {}\n",
            vehicle.display_name,
            vehicle.formatted_price()
        );
        if let Some(km) = vehicle.mileage {
            card.push_str(&format!("📏 {} km\n", group_thousands(km)));
        }
        if let Some(color) = &vehicle.color {
            card.push_str(&format!("🎨 Cor: {}\n", color));
        }
        if let Some(transmission) = &vehicle.transmission {
            card.push_str(&format!("⚙️ Câmbio: {}\n", transmission));
        }
        card.push_str(&format!("📍 Disponível na {}", self.store.name));

        let mut effects = vec![Effect::text(card)];
        for uri in vehicle.images.iter().take(MAX_IMAGES) {
            effects.push(Effect::SendImage {
                uri: uri.clone(),
                caption: None,
            });
        }
        effects.push(Effect::SendButtonMenu(ButtonMenu::new(
            "O que deseja fazer?",
            vec![
                ButtonChoice::new("Simular financiamento", "financiamento"),
                ButtonChoice::new("Falar com vendedor", "vendedor"),
                ButtonChoice::new("Voltar para a lista", "voltar"),
            ],
        )));

        Outcome {
            patch: RecordPatch {
                stage: Some(Stage::VehicleDetail),
                last_viewed: Some(id.clone()),
                ..Default::default()
            },
            effects,
        }
    }

    fn financing_prompt(&self) -> Outcome {
        Outcome {
            patch: RecordPatch::stage(Stage::Financing),
            effects: vec![Effect::text(FINANCING_PROMPT)],
        }
    }

    fn trade_prompt(&self) -> Outcome {
        Outcome {
            patch: RecordPatch::stage(Stage::Trade),
            effects: vec![Effect::text(TRADE_PROMPT)],
        }
    }

    fn transfer(&self) -> Outcome {
        Outcome {
            patch: RecordPatch::stage(Stage::Transfer),
            effects: vec![Effect::text(HANDOFF)],
        }
    }

    fn address_card(&self) -> Outcome {
        let card = format!(
            "📍 *{}*\nLocalização\n{}\n\n{}",
            self.store.name, self.store.address, self.store.opening_hours
        );
        let buttons = ButtonMenu::new(
            "Voltar ao menu principal",
            vec![ButtonChoice::new("Voltar ao menu principal", "menu")],
        );
        Outcome {
            patch: RecordPatch::stage(Stage::Menu),
            effects: vec![Effect::text(card), Effect::SendButtonMenu(buttons)],
        }
    }
}
