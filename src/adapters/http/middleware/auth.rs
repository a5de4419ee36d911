use actix_web::{
  Error, FromRequest, HttpMessage, HttpRequest,
  dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::{
  adapters::http::errors::{ApiError, AuthErrorKind},
  application::auth::GetCurrentUserUseCase,
  domain::auth::User,
  domain::shared::EntityId,
};

/// Authentication middleware that resolves bearer tokens into users
///
/// This middleware:
/// 1. Reads the `Authorization: Bearer <token>` header, if any
/// 2. Validates the token using GetCurrentUserUseCase
/// 3. Attaches the User entity (or the rejection) to request extensions
///
/// Requests are never short-circuited here. Handlers that need a user take
/// an [`AuthenticatedUser`] argument, which turns a missing or rejected token
/// into 401, so public routes can live in the same scope.
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// use std::sync::Arc;
/// # use jobboard::application::auth::GetCurrentUserUseCase;
/// # use jobboard::adapters::http::middleware::auth::AuthMiddleware;
///
/// # async fn example(get_user_use_case: Arc<GetCurrentUserUseCase>) {
/// let app = App::new()
///   .wrap(AuthMiddleware::new(get_user_use_case))
///   .service(
///     web::resource("/protected")
///       .route(web::get().to(|| async { "Protected endpoint" }))
///   );
/// # }
/// ```
pub struct AuthMiddleware {
  get_user_use_case: Arc<GetCurrentUserUseCase>,
}

impl AuthMiddleware {
  /// Creates a new authentication middleware
  pub fn new(get_user_use_case: Arc<GetCurrentUserUseCase>) -> Self {
    Self { get_user_use_case }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Transform = AuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AuthMiddlewareService {
      service: Rc::new(service),
      get_user_use_case: self.get_user_use_case.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  get_user_use_case: Arc<GetCurrentUserUseCase>,
}

/// Why a request carrying an `Authorization` header was not authenticated
#[derive(Debug, Clone)]
struct AuthRejection(ApiError);

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let get_user_use_case = self.get_user_use_case.clone();

    Box::pin(async move {
      match extract_bearer_token(&req) {
        None => {}
        Some(Err(e)) => {
          req.extensions_mut().insert(AuthRejection(e));
        }
        Some(Ok(token)) => match get_user_use_case.execute(&token).await {
          Ok(user) => {
            tracing::debug!(user_id = user.id, "Request authenticated");
            req.extensions_mut().insert(user);
          }
          Err(e) => {
            let api_error = ApiError::from(e);
            if let ApiError::Auth(kind) = &api_error {
              tracing::debug!(reason = ?kind, path = req.path(), "Rejected bearer token");
            }
            req.extensions_mut().insert(AuthRejection(api_error));
          }
        },
      }

      service.call(req).await
    })
  }
}

/// Extract the bearer token from the Authorization header
///
/// `None` when the header is absent, an error when it is present but not a
/// usable bearer credential.
fn extract_bearer_token(req: &ServiceRequest) -> Option<Result<String, ApiError>> {
  let header = req.headers().get("Authorization")?;

  let token = header
    .to_str()
    .ok()
    .and_then(|s| {
      let (scheme, token) = s.split_once(' ')?;
      scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
    })
    .filter(|token| !token.is_empty())
    .map(|token| token.to_string())
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidToken));

  Some(token)
}

/// The user resolved from the request's bearer token
///
/// Extraction fails with 401 when the token is missing, malformed, expired
/// or belongs to a deleted user.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
  pub fn id(&self) -> EntityId {
    self.0.id
  }

  pub fn into_inner(self) -> User {
    self.0
  }
}

impl FromRequest for AuthenticatedUser {
  type Error = ApiError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let extensions = req.extensions();

    let result = if let Some(user) = extensions.get::<User>() {
      Ok(AuthenticatedUser(user.clone()))
    } else if let Some(AuthRejection(error)) = extensions.get::<AuthRejection>() {
      Err(error.clone())
    } else {
      Err(ApiError::Auth(AuthErrorKind::MissingToken))
    };

    ready(result)
  }
}
