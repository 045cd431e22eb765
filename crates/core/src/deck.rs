use crate::{CardId, CardInstance, Catalog, CopyRules, Hand, RandomSource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub draw: Vec<CardInstance>,
    /// Consumed relocation cards and occupants removed by tile clears.
    #[serde(default)]
    pub discard: Vec<CardInstance>,
}

impl Deck {
    /// Builds and shuffles a fresh deck. Ids are handed out from `next_id`.
    pub fn build<R: RandomSource>(
        catalog: &Catalog,
        copies: &CopyRules,
        rng: &mut R,
        next_id: &mut CardId,
    ) -> Self {
        let mut draw = Vec::new();
        for card in catalog.iter() {
            for _ in 0..copies.copies_for(card) {
                draw.push(CardInstance::new(*next_id, &card.key));
                *next_id = next_id.saturating_add(1);
            }
        }
        rng.shuffle(&mut draw);
        Self {
            draw,
            discard: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.draw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draw.is_empty()
    }

    /// Takes up to `count` cards from the front of the draw pile.
    pub fn draw_cards(&mut self, count: usize) -> Vec<CardInstance> {
        let count = count.min(self.draw.len());
        self.draw.drain(..count).collect()
    }

    pub fn discard(&mut self, card: CardInstance) {
        self.discard.push(card);
    }
}

/// Pure deal: returns the deck and hand after filling the hand to capacity.
pub fn draw(deck: &Deck, hand: &Hand) -> (Deck, Hand) {
    let need = hand.missing().min(deck.remaining());
    if need == 0 {
        return (deck.clone(), hand.clone());
    }
    let mut deck = deck.clone();
    let mut hand = hand.clone();
    hand.refill_from(&mut deck);
    (deck, hand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CardDef, Category, RngState, ScriptedRng};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CardDef::new("SEEDS", "Seeds", 1, Category::Special),
            CardDef::new("CORN", "Corn", 3, Category::Crop),
            CardDef::new("MILL", "Mill", 5, Category::Building),
            CardDef::new("HORSE", "Horse", 6, Category::Animal),
            CardDef::new("PHOENIX", "Phoenix", 7, Category::Special).shiny(),
        ])
        .expect("catalog")
    }

    #[test]
    fn build_uses_copy_table_and_unique_ids() {
        let mut next_id = 1;
        let deck = Deck::build(
            &catalog(),
            &CopyRules::default(),
            &mut RngState::from_seed(3),
            &mut next_id,
        );
        assert_eq!(deck.remaining(), 5 + 4 + 3 + 2 + 1);
        assert_eq!(next_id, 16);
        let mut ids: Vec<CardId> = deck.draw.iter().map(|card| card.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 15);
        let phoenix = deck.draw.iter().filter(|card| card.key == "PHOENIX").count();
        assert_eq!(phoenix, 1);
    }

    #[test]
    fn scripted_build_keeps_catalog_order() {
        let mut next_id = 1;
        let deck = Deck::build(
            &catalog(),
            &CopyRules::default(),
            &mut ScriptedRng::zeros(),
            &mut next_id,
        );
        assert_eq!(deck.draw[0].key, "SEEDS");
        assert_eq!(deck.draw[14].key, "PHOENIX");
    }

    #[test]
    fn draw_fills_to_capacity_from_front() {
        let mut next_id = 1;
        let deck = Deck::build(
            &catalog(),
            &CopyRules::default(),
            &mut ScriptedRng::zeros(),
            &mut next_id,
        );
        let hand = Hand::with_capacity(5);
        let (deck_after, hand_after) = draw(&deck, &hand);
        assert_eq!(hand_after.len(), 5);
        assert_eq!(deck_after.remaining(), 10);
        assert_eq!(hand_after.cards, deck.draw[..5].to_vec());
        assert_eq!(deck_after.draw, deck.draw[5..].to_vec());
        assert!(hand.is_empty());
    }

    #[test]
    fn draw_is_idempotent_at_capacity() {
        let mut next_id = 1;
        let deck = Deck::build(
            &catalog(),
            &CopyRules::default(),
            &mut ScriptedRng::zeros(),
            &mut next_id,
        );
        let (deck, hand) = draw(&deck, &Hand::with_capacity(5));
        let (deck_again, hand_again) = draw(&deck, &hand);
        assert_eq!(deck_again, deck);
        assert_eq!(hand_again, hand);
    }

    #[test]
    fn draw_from_short_deck_is_not_an_error() {
        let deck = Deck {
            draw: vec![CardInstance::new(1, "CORN"), CardInstance::new(2, "CORN")],
            discard: Vec::new(),
        };
        let (deck, hand) = draw(&deck, &Hand::with_capacity(5));
        assert_eq!(hand.len(), 2);
        assert!(deck.is_empty());
        let (deck, hand) = draw(&deck, &hand);
        assert_eq!(hand.len(), 2);
        assert!(deck.is_empty());
    }
}
