pub mod cards;
pub mod check;
pub mod decks;
pub mod flagged;
pub mod generate;
