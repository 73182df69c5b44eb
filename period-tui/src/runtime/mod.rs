mod action_queue;
mod actions;
mod event_loop;
mod views;

pub use actions::apply_predictions_result;
pub use event_loop::run_app;
