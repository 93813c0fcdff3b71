use courtyard_core::constants::ADMIN_ROUTE_COMPONENT;
use salvo::Router;

mod residents;

#[must_use]
pub fn routes() -> Router {
    Router::with_path(ADMIN_ROUTE_COMPONENT).push(residents::routes())
}
