use actix_web::{dev::Payload, web, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;

/// Request body read as JSON, or as an urlencoded form when the request says so.
/// Usage: `body: ProjectBody<NewProjectRequest>` in place of `web::Json<..>`.
#[derive(Debug)]
pub struct ProjectBody<T>(pub T);

impl<T> ProjectBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for ProjectBody<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if req.content_type() == "application/x-www-form-urlencoded" {
            let form = web::Form::<T>::from_request(req, payload);
            Box::pin(async move { Ok(ProjectBody(form.await?.into_inner())) })
        } else {
            let json = web::Json::<T>::from_request(req, payload);
            Box::pin(async move { Ok(ProjectBody(json.await?.into_inner())) })
        }
    }
}
