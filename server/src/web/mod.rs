pub mod route;
pub mod state;

use proto::prelude::Transport;

use state::AppState;

pub mod prelude {
    pub use super::app;
    pub use super::state::AppState;
}

/// `POST /` takes the voice platform's request envelope, `GET /health`
/// answers liveness probes.
pub fn app<T: Transport + 'static>(state: AppState<T>) -> tide::Server<AppState<T>> {
    let mut app = tide::with_state(state);
    app.with(route::LogMiddleware);
    app.at("/").post(route::invoke::<T>);
    app.at("/health").get(route::health::<AppState<T>>);
    app
}
