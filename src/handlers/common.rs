use crate::errors::ServiceError;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// JSON body extractor whose rejections use the service error body.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ServiceError {
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        other => format!("Invalid request body: {}", other.body_text()),
    };
    ServiceError::ValidationError(message)
}

/// A body that may hold one item or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Parses a numeric path segment. `what` names the id in the error message.
pub fn parse_id(raw: &str, what: &str) -> Result<i32, ServiceError> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ServiceError::ValidationError(format!("Invalid {} id", what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        n: i32,
    }

    #[test]
    fn one_or_many_accepts_both_shapes() {
        let one: OneOrMany<Item> = serde_json::from_value(json!({"n": 1})).unwrap();
        assert_eq!(one.into_vec(), vec![Item { n: 1 }]);

        let many: OneOrMany<Item> = serde_json::from_value(json!([{"n": 1}, {"n": 2}])).unwrap();
        assert_eq!(many.into_vec().len(), 2);
    }

    #[rstest]
    #[case("7", Some(7))]
    #[case(" 12 ", Some(12))]
    #[case("0", None)]
    #[case("-3", None)]
    #[case("abc", None)]
    #[case("1.5", None)]
    fn path_ids_must_be_positive_integers(#[case] raw: &str, #[case] expected: Option<i32>) {
        assert_eq!(parse_id(raw, "floor").ok(), expected);
    }

    #[test]
    fn bad_path_id_names_the_entity() {
        let err = parse_id("x", "exit path").unwrap_err();
        assert_eq!(err.response_message(), "Invalid exit path id");
    }
}
