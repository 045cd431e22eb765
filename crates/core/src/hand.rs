use crate::{CardId, CardInstance, Deck};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hand {
    pub capacity: usize,
    pub cards: Vec<CardInstance>,
}

impl Hand {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            cards: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn missing(&self) -> usize {
        self.capacity.saturating_sub(self.cards.len())
    }

    pub fn get(&self, id: CardId) -> Option<&CardInstance> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.get(id).is_some()
    }

    pub fn remove(&mut self, id: CardId) -> Option<CardInstance> {
        let idx = self.cards.iter().position(|card| card.id == id)?;
        Some(self.cards.remove(idx))
    }

    /// Draws until full or the deck runs dry. Returns how many cards moved.
    pub fn refill_from(&mut self, deck: &mut Deck) -> usize {
        let drawn = deck.draw_cards(self.missing());
        let count = drawn.len();
        self.cards.extend(drawn);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refill_stops_at_capacity() {
        let mut deck = Deck {
            draw: (1..=8).map(|id| CardInstance::new(id, "WHEAT")).collect(),
            discard: Vec::new(),
        };
        let mut hand = Hand::with_capacity(5);
        assert_eq!(hand.refill_from(&mut deck), 5);
        assert_eq!(hand.refill_from(&mut deck), 0);
        assert_eq!(deck.remaining(), 3);
        assert!(hand.remove(2).is_some());
        assert!(hand.remove(2).is_none());
        assert_eq!(hand.refill_from(&mut deck), 1);
        assert_eq!(hand.cards.last().map(|card| card.id), Some(6));
    }
}
