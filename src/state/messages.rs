use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use sweepstake_domain::board::SweepstakeBoard;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadSweepstakes,
    /// Same load as `LoadSweepstakes`, sent by the periodic refresher.
    Refresh,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    SweepstakesLoaded { boards: Vec<SweepstakeBoard> },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
