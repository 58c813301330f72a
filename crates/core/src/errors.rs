//! Localized domain error descriptors.
//!
//! Business-rule violations are described by immutable [`ErrorDescriptor`]
//! statics: a stable id, a message per supported language and the HTTP status
//! the boundary should answer with. Errors refer to descriptors by identity.

use serde::Serialize;

use crate::storage::{store_error_to_status_code, StoreError};

/// Languages error messages are available in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    /// Parses a language tag such as `fr` or `fr-CH`. Unknown tags fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag.split(['-', '_']).next().unwrap_or_default();
        if primary.eq_ignore_ascii_case("fr") {
            Locale::Fr
        } else {
            Locale::En
        }
    }
}

/// Message of an error in every supported language.
#[derive(Debug, PartialEq, Eq)]
pub struct Message {
    pub en: &'static str,
    pub fr: &'static str,
}

/// An entry of the domain error table.
#[derive(Debug, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub id: &'static str,
    pub message: Message,
    pub status: u16,
}

impl ErrorDescriptor {
    pub fn message(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.message.en,
            Locale::Fr => self.message.fr,
        }
    }

    pub fn response(&self, locale: Locale) -> ErrorResponse {
        ErrorResponse {
            id: self.id.to_string(),
            message: self.message(locale).to_string(),
            status: self.status,
        }
    }
}

pub static INTERNAL_ERROR: ErrorDescriptor = ErrorDescriptor {
    id: "internal_error",
    message: Message {
        en: "Internal Server Error",
        fr: "Erreur interne du serveur",
    },
    status: 500,
};

pub static UNAUTHORIZED: ErrorDescriptor = ErrorDescriptor {
    id: "unauthorized",
    message: Message {
        en: "Unauthorized",
        fr: "Non autorisé",
    },
    status: 401,
};

pub static BAD_REQUEST: ErrorDescriptor = ErrorDescriptor {
    id: "bad_request",
    message: Message {
        en: "Bad Request",
        fr: "Requête invalide",
    },
    status: 400,
};

pub static CONFLICT: ErrorDescriptor = ErrorDescriptor {
    id: "conflict",
    message: Message {
        en: "The item was modified concurrently",
        fr: "L'élément a été modifié simultanément",
    },
    status: 409,
};

pub static SERVICE_UNAVAILABLE: ErrorDescriptor = ErrorDescriptor {
    id: "service_unavailable",
    message: Message {
        en: "Service Unavailable",
        fr: "Service indisponible",
    },
    status: 503,
};

pub static INVALID_NEXT_TOKEN: ErrorDescriptor = ErrorDescriptor {
    id: "invalid_next_token",
    message: Message {
        en: "The pagination token is invalid",
        fr: "Le jeton de pagination n'est pas valide",
    },
    status: 400,
};

/// Body returned to clients for a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub id: String,
    pub message: String,
    pub status: u16,
}

/// Picks the generic descriptor for a store failure.
///
/// Backend detail never reaches the message.
pub fn store_error_descriptor(error: &StoreError) -> &'static ErrorDescriptor {
    match store_error_to_status_code(error) {
        401 => &UNAUTHORIZED,
        400 => &BAD_REQUEST,
        409 => &CONFLICT,
        503 => &SERVICE_UNAVAILABLE,
        _ => &INTERNAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ACCESS_DENIED, VALIDATION};

    #[test]
    fn test_locale_from_tag() {
        assert_eq!(Locale::from_tag("fr"), Locale::Fr);
        assert_eq!(Locale::from_tag("FR-ch"), Locale::Fr);
        assert_eq!(Locale::from_tag("fr_CH"), Locale::Fr);
        assert_eq!(Locale::from_tag("en"), Locale::En);
        assert_eq!(Locale::from_tag("de"), Locale::En);
        assert_eq!(Locale::from_tag(""), Locale::En);
    }

    #[test]
    fn test_descriptor_response() {
        let response = INVALID_NEXT_TOKEN.response(Locale::Fr);
        assert_eq!(response.id, "invalid_next_token");
        assert_eq!(response.message, "Le jeton de pagination n'est pas valide");
        assert_eq!(response.status, 400);
    }

    #[test]
    fn test_store_error_descriptor_hides_detail() {
        let error = StoreError::service("InternalServerError", "table arn:aws:... exploded");
        let response = store_error_descriptor(&error).response(Locale::En);
        assert_eq!(response.id, "internal_error");
        assert_eq!(response.message, "Internal Server Error");
        assert_eq!(response.status, 500);
    }

    #[test]
    fn test_store_error_descriptor_classes() {
        assert_eq!(
            store_error_descriptor(&StoreError::service(ACCESS_DENIED, "no")).id,
            "unauthorized"
        );
        assert_eq!(
            store_error_descriptor(&StoreError::service(VALIDATION, "no")).id,
            "bad_request"
        );
        assert_eq!(
            store_error_descriptor(&StoreError::ConditionalCheckFailed).id,
            "conflict"
        );
        assert_eq!(
            store_error_descriptor(&StoreError::ConnectionFailed("x".into())).id,
            "service_unavailable"
        );
    }

    #[test]
    fn test_error_response_serializes() {
        let json = serde_json::to_string(&UNAUTHORIZED.response(Locale::En)).unwrap();
        assert_eq!(
            json,
            r#"{"id":"unauthorized","message":"Unauthorized","status":401}"#
        );
    }
}
