//! The player's own view of their hand.
//!
//! Cards are listed with the client-side valuation, where an ace is worth
//! 1. The total always comes from the server.

use udp_blackjack::{entities::Card, functional::display_value, messages::ServerMessage};

pub const RULES: &str = "\
Regras:
- Ás (A) vale 1 ponto
- Figuras (K, Q, J) valem 10 pontos
- Números (2-10) valem seu valor nominal
- Objetivo: chegar o mais perto possível de 21 sem estourar
";

fn points_word(value: u32) -> &'static str {
    if value == 1 { "ponto" } else { "pontos" }
}

fn card_line(card: &Card) -> String {
    let value = display_value(card);
    format!("- {card}: {value} {}", points_word(value))
}

#[derive(Debug, Default)]
pub struct HandView {
    cards: Vec<Card>,
    points: u32,
}

impl HandView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Last total reported by the server.
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Track a server message and render what should be printed for it.
    pub fn apply(&mut self, message: &ServerMessage) -> String {
        match message {
            ServerMessage::Card(card) => {
                self.cards.push(*card);
                format!("\nVocê recebeu: {card} (Valor: {})", display_value(card))
            }
            ServerMessage::Points(points) => {
                self.points = *points;
                self.render_hand()
            }
            ServerMessage::Result(text) => self.render_result(text),
            ServerMessage::Notice(text) => format!("\n[Servidor] {text}"),
            ServerMessage::Status(text) => format!("\n[Status] {text}"),
        }
    }

    fn card_lines(&self) -> Vec<String> {
        self.cards.iter().map(card_line).collect()
    }

    fn render_hand(&self) -> String {
        let cards = self
            .cards
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let mut lines = vec![
            "\n=== SUA MÃO ATUAL ===".to_string(),
            format!("Cartas: {cards}"),
            format!("Pontuação total: {}", self.points),
            String::new(),
            "Detalhe das cartas:".to_string(),
        ];
        lines.extend(self.card_lines());
        lines.push("=====================".to_string());
        lines.join("\n")
    }

    fn render_result(&self, text: &str) -> String {
        let mut lines = vec![
            "\n=== RESULTADO FINAL ===".to_string(),
            format!("Você {text}!"),
            String::new(),
            "Suas cartas:".to_string(),
        ];
        lines.extend(self.card_lines());
        lines.push(String::new());
        lines.push(format!("Pontuação final: {}", self.points));
        lines.push("======================".to_string());
        lines.join("\n")
    }
}
