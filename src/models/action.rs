use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};

pub const ACTION_CLAIM: &str = "claim";
pub const ACTION_ASSIGN_NUMBERS: &str = "assign-numbers";
pub const ACTION_UPDATE_TEAMS: &str = "update-teams";
pub const ACTION_UPDATE_PRICE: &str = "update-price";
pub const ACTION_SET_SCORE: &str = "set-score";
pub const ACTION_ERASE: &str = "erase";
pub const ACTION_CLEAR_BOARD: &str = "clear-board";
pub const ACTION_RESET: &str = "reset";

/// POST body for `/api/game`. Every field except `action` is optional; which
/// ones matter depends on the action.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[serde(default)]
    pub action: String,
    pub index: Option<i64>,
    pub initials: Option<String>,
    pub team1_name: Option<String>,
    pub team2_name: Option<String>,
    pub quarter: Option<i64>,
    pub team1_score: Option<Value>,
    pub team2_score: Option<Value>,
    pub price: Option<f64>,
}

/// The eight board mutations. Payloads are carried as received; range checks
/// happen when the action is applied to a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Claim {
        index: Option<i64>,
        initials: Option<String>,
    },
    AssignNumbers,
    UpdateTeams {
        team1_name: Option<String>,
        team2_name: Option<String>,
    },
    UpdatePrice {
        price: Option<f64>,
    },
    SetScore {
        quarter: Option<i64>,
        team1_score: String,
        team2_score: String,
    },
    Erase {
        index: Option<i64>,
    },
    ClearBoard,
    Reset,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Claim { .. } => ACTION_CLAIM,
            Action::AssignNumbers => ACTION_ASSIGN_NUMBERS,
            Action::UpdateTeams { .. } => ACTION_UPDATE_TEAMS,
            Action::UpdatePrice { .. } => ACTION_UPDATE_PRICE,
            Action::SetScore { .. } => ACTION_SET_SCORE,
            Action::Erase { .. } => ACTION_ERASE,
            Action::ClearBoard => ACTION_CLEAR_BOARD,
            Action::Reset => ACTION_RESET,
        }
    }
}

impl TryFrom<ActionRequest> for Action {
    type Error = AppError;

    fn try_from(request: ActionRequest) -> Result<Self> {
        let action = match request.action.as_str() {
            ACTION_CLAIM => Action::Claim {
                index: request.index,
                initials: request.initials,
            },
            ACTION_ASSIGN_NUMBERS => Action::AssignNumbers,
            ACTION_UPDATE_TEAMS => Action::UpdateTeams {
                team1_name: request.team1_name,
                team2_name: request.team2_name,
            },
            ACTION_UPDATE_PRICE => Action::UpdatePrice {
                price: request.price,
            },
            ACTION_SET_SCORE => Action::SetScore {
                quarter: request.quarter,
                team1_score: score_text(request.team1_score),
                team2_score: score_text(request.team2_score),
            },
            ACTION_ERASE => Action::Erase {
                index: request.index,
            },
            ACTION_CLEAR_BOARD => Action::ClearBoard,
            ACTION_RESET => Action::Reset,
            _ => return Err(AppError::validation("Invalid action")),
        };
        Ok(action)
    }
}

// Scores arrive as strings or bare numbers; both are stored as text.
fn score_text(raw: Option<Value>) -> String {
    match raw {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    }
}
