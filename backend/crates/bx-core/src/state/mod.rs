pub mod live_state;
pub mod state_cell;
