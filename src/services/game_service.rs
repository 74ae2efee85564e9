use std::sync::{Arc, Mutex};

use crate::{
    constants::{INITIALS_MAX_LEN, INITIALS_MIN_LEN, QUARTER_COUNT, SQUARE_COUNT},
    error::{AppError, Result},
    models::{Action, GameState, QuarterScore},
    services::shuffle::{digit_permutation, RandomSource},
    store::GameStore,
};

/// Read-modify-write access to the shared board.
///
/// Every call re-fetches the document from the store; nothing is cached in
/// process. Concurrent writers are not coordinated, so the last `set` wins.
#[derive(Clone)]
pub struct GameService {
    store: Arc<dyn GameStore>,
    rng: Arc<Mutex<Box<dyn RandomSource>>>,
    key: String,
}

impl GameService {
    pub fn new(
        store: Arc<dyn GameStore>,
        rng: Box<dyn RandomSource>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            rng: Arc::new(Mutex::new(rng)),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the stored board, creating and persisting the default one
    /// when the key is absent.
    pub async fn load(&self) -> Result<GameState> {
        if let Some(state) = self.store.get(&self.key).await? {
            let state = state.normalize();
            if let Some(problem) = state.invariant_violation() {
                return Err(AppError::Internal(format!(
                    "Stored game document under key={} is invalid: {}",
                    self.key, problem
                )));
            }
            return Ok(state);
        }

        tracing::info!("No game document under key={}; initializing board", self.key);
        let state = GameState::default();
        self.store.set(&self.key, &state).await?;
        Ok(state)
    }

    /// Loads the board, applies `action`, and writes the whole document
    /// back. A validation failure returns before anything is written.
    pub async fn apply(&self, action: Action) -> Result<GameState> {
        let mut state = self.load().await?;
        let name = action.name();

        {
            let mut rng = self
                .rng
                .lock()
                .map_err(|e| AppError::Internal(format!("RNG lock poisoned: {e}")))?;
            apply_action(&mut state, action, &mut **rng)?;
        }

        self.store.set(&self.key, &state).await?;
        tracing::info!(
            "Applied game action={} claimed={} numbers_assigned={}",
            name,
            state.claimed_count(),
            state.numbers_assigned
        );
        Ok(state)
    }

    pub async fn store_healthy(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("Game store ping failed: {}", err);
                false
            }
        }
    }
}

/// Applies one action to `state`. Each arm validates its inputs before
/// touching the document, so an `Err` leaves `state` unchanged.
pub fn apply_action(
    state: &mut GameState,
    action: Action,
    rng: &mut dyn RandomSource,
) -> Result<()> {
    match action {
        Action::Claim { index, initials } => {
            let index = square_index(index)?;
            let initials = validate_initials(initials)?;
            if state.squares[index].is_some() {
                return Err(AppError::validation("Square already claimed"));
            }
            state.squares[index] = Some(initials);
        }
        Action::AssignNumbers => {
            if !state.is_board_full() {
                return Err(AppError::validation(
                    "All squares must be claimed before assigning numbers",
                ));
            }
            state.row_numbers = digit_permutation(rng);
            state.col_numbers = digit_permutation(rng);
            state.numbers_assigned = true;
            if rng.coin_flip() {
                std::mem::swap(&mut state.team1_name, &mut state.team2_name);
            }
        }
        Action::UpdateTeams {
            team1_name,
            team2_name,
        } => {
            if let Some(name) = team1_name.filter(|n| !n.is_empty()) {
                state.team1_name = name;
            }
            if let Some(name) = team2_name.filter(|n| !n.is_empty()) {
                state.team2_name = name;
            }
        }
        Action::UpdatePrice { price } => match price {
            Some(price) if price.is_finite() && price >= 0.0 => state.price_per_square = price,
            _ => return Err(AppError::validation("Invalid price")),
        },
        Action::SetScore {
            quarter,
            team1_score,
            team2_score,
        } => {
            let quarter = match quarter {
                Some(q) if (0..QUARTER_COUNT as i64).contains(&q) => q as usize,
                _ => return Err(AppError::validation("Invalid quarter")),
            };
            state.quarter_scores[quarter] = QuarterScore {
                team1: team1_score,
                team2: team2_score,
            };
        }
        Action::Erase { index } => {
            let index = square_index(index)?;
            state.squares[index] = None;
        }
        Action::ClearBoard => state.clear_squares(),
        Action::Reset => *state = GameState::reset_from(state),
    }
    Ok(())
}

// Internal helper that checks a square index against the board bounds.
fn square_index(index: Option<i64>) -> Result<usize> {
    match index {
        Some(i) if (0..SQUARE_COUNT as i64).contains(&i) => Ok(i as usize),
        _ => Err(AppError::validation("Invalid square index")),
    }
}

// Internal helper that upper-cases initials and checks the stored label length.
fn validate_initials(initials: Option<String>) -> Result<String> {
    let label = initials.unwrap_or_default().to_uppercase();
    let len = label.chars().count();
    if !(INITIALS_MIN_LEN..=INITIALS_MAX_LEN).contains(&len) {
        return Err(AppError::validation("Initials must be 2-4 characters"));
    }
    Ok(label)
}
