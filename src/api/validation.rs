use actix_web::{error::InternalError, web, HttpResponse};
use serde::Serialize;
use serde_json::{json, Map, Value};
use validator::{ValidationErrors, ValidationErrorsKind};

/// Failure half of the response envelope
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: None,
            fields: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_fields(mut self, fields: Value) -> Self {
        self.fields = Some(fields);
        self
    }
}

fn bad_request(body: ErrorResponse) -> actix_web::Error {
    InternalError::from_response("", HttpResponse::BadRequest().json(body)).into()
}

/// Flatten validator output into `{field: {errors: [..]}}`.
/// Nested structs are serde-flattened into the request body, so their fields
/// are reported under their own names; list items get an `name[i].` prefix.
fn collect_field_errors(errors: &ValidationErrors, prefix: &str, out: &mut Map<String, Value>) {
    for (name, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                let field = format!("{}{}", prefix, name);
                let messages: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Validation error in field: {}", field))
                    })
                    .collect();
                out.insert(field, json!({"errors": messages}));
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(nested, prefix, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_errors(nested, &format!("{}{}[{}].", prefix, name, index), out);
                }
            }
        }
    }
}

/// Creates a configured JsonConfig with standardized error handling for the entire project
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default()
        .error_handler(|err, _req| {
            match err {
                actix_web_validator::Error::Validate(validation_errors) => {
                    let mut fields = Map::new();
                    collect_field_errors(&validation_errors, "", &mut fields);

                    bad_request(
                        ErrorResponse::new("Validation failed").with_fields(Value::Object(fields)),
                    )
                }
                actix_web_validator::Error::Deserialize(de_err) => {
                    let err_string = de_err.to_string();

                    let message = if err_string.contains("EOF while parsing") {
                        "Request body is empty. Expected JSON payload"
                    } else if err_string.contains("invalid type") {
                        "Invalid field type. Check the expected type of each field"
                    } else {
                        "Invalid JSON format"
                    };

                    bad_request(ErrorResponse::new("Request validation failed").with_message(message))
                }
                _ => bad_request(ErrorResponse::new("Validation failed").with_message("Validation error")),
            }
        })
}

/// Malformed path segments (e.g. a non-numeric id) are a 400, not a 404
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        bad_request(ErrorResponse::new("Invalid id").with_message(err.to_string()))
    })
}
