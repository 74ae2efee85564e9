use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_PRICE_PER_SQUARE, DEFAULT_TEAM1_NAME, DEFAULT_TEAM2_NAME, GRID_SIZE, QUARTER_COUNT,
    SQUARE_COUNT,
};

/// Score pair for a single quarter. Values are free-form text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterScore {
    #[serde(default)]
    pub team1: String,
    #[serde(default)]
    pub team2: String,
}

/// The shared squares board document persisted under the game key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameState {
    pub squares: Vec<Option<String>>,
    pub row_numbers: Vec<u8>,
    pub col_numbers: Vec<u8>,
    pub numbers_assigned: bool,
    pub team1_name: String,
    pub team2_name: String,
    pub price_per_square: f64,
    pub quarter_scores: Vec<QuarterScore>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            squares: vec![None; SQUARE_COUNT],
            row_numbers: Vec::new(),
            col_numbers: Vec::new(),
            numbers_assigned: false,
            team1_name: DEFAULT_TEAM1_NAME.to_string(),
            team2_name: DEFAULT_TEAM2_NAME.to_string(),
            price_per_square: DEFAULT_PRICE_PER_SQUARE,
            quarter_scores: vec![QuarterScore::default(); QUARTER_COUNT],
        }
    }
}

impl GameState {
    /// Fresh board that keeps the team names and price of `previous`.
    /// A zero price falls back to the default.
    pub fn reset_from(previous: &GameState) -> Self {
        let price_per_square = if previous.price_per_square > 0.0 {
            previous.price_per_square
        } else {
            DEFAULT_PRICE_PER_SQUARE
        };

        Self {
            team1_name: previous.team1_name.clone(),
            team2_name: previous.team2_name.clone(),
            price_per_square,
            ..Self::default()
        }
    }

    /// Pads or truncates the fixed-length sequences of a document read back
    /// from the store. Blank labels count as empty slots.
    pub fn normalize(mut self) -> Self {
        self.squares.resize(SQUARE_COUNT, None);
        for slot in self.squares.iter_mut() {
            if slot.as_deref().is_some_and(str::is_empty) {
                *slot = None;
            }
        }
        self.quarter_scores.resize(QUARTER_COUNT, QuarterScore::default());
        self
    }

    /// Describes the first board invariant a stored document breaks, if any.
    /// Header digits must be both empty or both a permutation of 0..=9, the
    /// assigned flag must agree with them, and the price must be non-negative.
    pub fn invariant_violation(&self) -> Option<String> {
        let rows_empty = self.row_numbers.is_empty();
        let cols_empty = self.col_numbers.is_empty();

        if rows_empty != cols_empty {
            return Some("rowNumbers and colNumbers must be assigned together".to_string());
        }
        if !rows_empty {
            if !is_digit_permutation(&self.row_numbers) {
                return Some("rowNumbers is not a permutation of 0-9".to_string());
            }
            if !is_digit_permutation(&self.col_numbers) {
                return Some("colNumbers is not a permutation of 0-9".to_string());
            }
        }
        if self.numbers_assigned == rows_empty {
            return Some("numbersAssigned does not match the header digits".to_string());
        }
        if !(self.price_per_square.is_finite() && self.price_per_square >= 0.0) {
            return Some(format!("pricePerSquare {} is negative", self.price_per_square));
        }
        None
    }

    pub fn is_board_full(&self) -> bool {
        self.squares.iter().all(Option::is_some)
    }

    pub fn claimed_count(&self) -> usize {
        self.squares.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn clear_squares(&mut self) {
        self.squares = vec![None; SQUARE_COUNT];
    }
}

fn is_digit_permutation(values: &[u8]) -> bool {
    let mut seen = [false; GRID_SIZE];
    values.len() == GRID_SIZE
        && values.iter().all(|&d| {
            let slot = seen.get_mut(d as usize);
            match slot {
                Some(flag) if !*flag => {
                    *flag = true;
                    true
                }
                _ => false,
            }
        })
}
