//! Typed services over the blog API routes

use ark_http_client::{create_headers, RequestParameters, APPLICATION_JSON};

use crate::session::Session;

mod auth;
mod blog;
mod tag;

pub use auth::{AuthService, LoginOutcome};
pub use blog::BlogService;
pub use tag::TagService;

/// Post controller
pub const POST_CONTROLLER: &str = "Post";
/// Tag controller
pub const TAG_CONTROLLER: &str = "Tag";
/// Account controller
pub const ACCOUNT_CONTROLLER: &str = "api/AppUser";

/// `controller[/action]` with the JSON content type
pub(crate) fn route(controller: &str, action: Option<&str>) -> RequestParameters {
    let mut params = RequestParameters::new(controller)
        .with_headers(create_headers(Some(APPLICATION_JSON), None));
    if let Some(action) = action {
        params = params.with_action(action);
    }
    params
}

/// [`route`] plus the session's bearer token when one is stored
pub(crate) fn authorized_route(
    session: &Session,
    controller: &str,
    action: Option<&str>,
) -> RequestParameters {
    let params = route(controller, action);
    match session.bearer() {
        Some(bearer) => params.with_headers(create_headers(Some(APPLICATION_JSON), Some(&bearer))),
        None => params,
    }
}
