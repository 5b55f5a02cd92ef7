mod matches;
mod media;
mod recommendations;
mod rooms;
mod routes;
mod social;
mod state;
mod votes;

pub use routes::create_router;
pub use state::AppState;
