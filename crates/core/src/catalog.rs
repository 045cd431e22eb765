use crate::{CardDef, Category};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown card kind: {0}")]
    UnknownCardKind(String),
    #[error("duplicate card key: {0}")]
    DuplicateKey(String),
    #[error("card {0} must have a positive base value")]
    ZeroBaseValue(String),
}

/// Read-only registry of card definitions, kept in load order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: Vec<CardDef>,
    by_key: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(cards: Vec<CardDef>) -> Result<Self, CatalogError> {
        let mut by_key = HashMap::with_capacity(cards.len());
        for (idx, card) in cards.iter().enumerate() {
            if card.base_points <= 0 {
                return Err(CatalogError::ZeroBaseValue(card.key.clone()));
            }
            if by_key.insert(card.key.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateKey(card.key.clone()));
            }
        }
        Ok(Self { cards, by_key })
    }

    pub fn get(&self, key: &str) -> Result<&CardDef, CatalogError> {
        self.by_key
            .get(key)
            .map(|&idx| &self.cards[idx])
            .ok_or_else(|| CatalogError::UnknownCardKind(key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardDef> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &CardDef> {
        self.cards.iter().filter(move |card| card.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_miss_reports_key() {
        let catalog = Catalog::new(vec![CardDef::new("WHEAT", "Wheat", 2, Category::Crop)])
            .expect("catalog");
        assert_eq!(catalog.get("WHEAT").expect("wheat").name, "Wheat");
        assert_eq!(
            catalog.get("KALE").expect_err("kale must be unknown"),
            CatalogError::UnknownCardKind("KALE".to_string())
        );
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = Catalog::new(vec![
            CardDef::new("COW", "Cow", 5, Category::Animal),
            CardDef::new("COW", "Cow", 5, Category::Animal),
        ])
        .expect_err("duplicate must fail");
        assert_eq!(err, CatalogError::DuplicateKey("COW".to_string()));
    }

    #[test]
    fn rejects_non_positive_base() {
        let err = Catalog::new(vec![CardDef::new("DIRT", "Dirt", 0, Category::Special)])
            .expect_err("zero base must fail");
        assert!(err.to_string().contains("DIRT"));
    }
}
