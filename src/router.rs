//! Screen router.
//!
//! Explicit finite-state machine over the app's six screens. It only
//! tracks which screen is showing and what is selected; it never touches
//! predictions or settlement.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    Login,
    Groups,
    CreateGroup,
    PredictionList,
    CreatePrediction,
    Settle,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Login => "login",
            View::Groups => "groups",
            View::CreateGroup => "create-group",
            View::PredictionList => "predictions",
            View::CreatePrediction => "create-prediction",
            View::Settle => "settle",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    LoggedIn,
    NewGroup,
    GroupCreated,
    SelectGroup { group_id: String },
    SelectPrediction { prediction_id: String },
    NewPrediction,
    PredictionCreated { prediction_id: String },
    OutcomeConfirmed,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("No transition from {from} on {event}")]
    InvalidTransition { from: View, event: String },

    #[error("No prediction selected")]
    NoPredictionSelected,
}

#[derive(Debug, Clone)]
pub struct Router {
    current: View,
    selected_group: Option<String>,
    selected_prediction: Option<String>,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            current: View::Login,
            selected_group: None,
            selected_prediction: None,
        }
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> View {
        self.current
    }

    pub fn selected_group(&self) -> Option<&str> {
        self.selected_group.as_deref()
    }

    pub fn selected_prediction(&self) -> Option<&str> {
        self.selected_prediction.as_deref()
    }

    /// Apply `event`; on error the router is unchanged.
    pub fn dispatch(&mut self, event: Event) -> Result<View, RouteError> {
        use View::*;

        let next = match (self.current, &event) {
            (Login, Event::LoggedIn) => Groups,

            (Groups, Event::NewGroup) => CreateGroup,
            (Groups, Event::SelectGroup { group_id }) => {
                self.selected_group = Some(group_id.clone());
                self.selected_prediction = None;
                PredictionList
            }

            (CreateGroup, Event::GroupCreated | Event::Back) => Groups,

            (PredictionList, Event::SelectPrediction { prediction_id }) => {
                self.selected_prediction = Some(prediction_id.clone());
                PredictionList
            }
            (PredictionList, Event::NewPrediction) => CreatePrediction,
            (PredictionList, Event::OutcomeConfirmed) => {
                if self.selected_prediction.is_none() {
                    return Err(RouteError::NoPredictionSelected);
                }
                Settle
            }
            (PredictionList, Event::Back) => {
                self.selected_group = None;
                self.selected_prediction = None;
                Groups
            }

            (CreatePrediction, Event::PredictionCreated { prediction_id }) => {
                self.selected_prediction = Some(prediction_id.clone());
                PredictionList
            }
            (CreatePrediction, Event::Back) => PredictionList,

            (Settle, Event::Back) => PredictionList,

            (from, event) => {
                return Err(RouteError::InvalidTransition {
                    from,
                    event: format!("{event:?}"),
                })
            }
        };

        debug!(from = %self.current, to = %next, "View transition");
        self.current = next;
        Ok(next)
    }
}
