//! Sign-in request validation and bearer-token extraction.
//!
//! A sign-in body moves through three checks in a fixed order: the provider
//! must be supported, then the provider's required fields must be present, and
//! only then is a provider routine called. Validation yields a
//! [`SignInCredentials`] so dispatch is a plain `match`.

use serde_json::{Map, Value};
use thiserror::Error;

use stylish_core::{Provider, SignupForm};

pub const NOT_SUPPORTED_PROVIDER: &str = "Bad Request: not supported provider";
pub const MISSING_PARAMETER: &str = "Bad Request: missing parameter";
pub const MALFORMED_BODY: &str = "Bad Request: malformed request body";
pub const INVALID_AUTHORIZATION: &str = "Bad Request: invalid authorization header";

/// Raw sign-in body. Every field may be absent.
///
/// Fields are read loosely: a value that is not a JSON string counts as
/// absent, so a body such as `{"provider": 7}` still reaches the provider
/// check instead of failing as a whole.
#[derive(Default)]
pub struct SignInRequest {
    pub provider: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
}

impl SignInRequest {
    fn from_object(object: &Map<String, Value>) -> Self {
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_owned);

        Self {
            provider: text("provider"),
            email: text("email"),
            password: text("password"),
            access_token: text("access_token").or_else(|| text("accessToken")),
        }
    }
}

impl std::fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInRequest")
            .field("provider", &self.provider)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Credentials for exactly one provider, all required fields present.
#[derive(Clone, PartialEq, Eq)]
pub enum SignInCredentials {
    Native { email: String, password: String },
    Facebook { access_token: String },
}

impl SignInCredentials {
    #[must_use]
    pub const fn provider(&self) -> Provider {
        match self {
            Self::Native { .. } => Provider::Native,
            Self::Facebook { .. } => Provider::Facebook,
        }
    }
}

impl std::fmt::Debug for SignInCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native { email, .. } => f
                .debug_struct("Native")
                .field("email", email)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::Facebook { .. } => f
                .debug_struct("Facebook")
                .field("access_token", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Why a sign-in body was rejected before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignInRejection {
    #[error("{}", NOT_SUPPORTED_PROVIDER)]
    UnsupportedProvider,

    #[error("{}", MISSING_PARAMETER)]
    MissingParameter,

    #[error("{}", MALFORMED_BODY)]
    MalformedBody,
}

/// Decode a raw sign-in body.
///
/// An empty body or JSON `null` decodes to `None`. Any other JSON value that
/// is not an object decodes to a request with no fields.
///
/// # Errors
///
/// Returns `SignInRejection::MalformedBody` only if the body is not JSON.
pub fn parse_sign_in_body(body: &[u8]) -> Result<Option<SignInRequest>, SignInRejection> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: Value = serde_json::from_slice(body).map_err(|_| SignInRejection::MalformedBody)?;
    Ok(match value {
        Value::Null => None,
        Value::Object(object) => Some(SignInRequest::from_object(&object)),
        _ => Some(SignInRequest::default()),
    })
}

/// Decode a sign-up body.
///
/// # Errors
///
/// Returns `MissingParameter` for an absent body or a missing field, and
/// `MalformedBody` for anything that is not JSON.
pub fn parse_signup_body(body: &[u8]) -> Result<SignupForm, SignInRejection> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(SignInRejection::MissingParameter);
    }
    match serde_json::from_slice::<Option<SignupForm>>(body) {
        Ok(Some(form)) => Ok(form),
        Ok(None) => Err(SignInRejection::MissingParameter),
        Err(e) if e.is_data() => Err(SignInRejection::MissingParameter),
        Err(_) => Err(SignInRejection::MalformedBody),
    }
}

/// Validate a sign-in body: provider first, then required fields.
///
/// # Errors
///
/// Returns `UnsupportedProvider` when the provider is missing or unknown, and
/// `MissingParameter` when the body is absent or the provider's fields are.
pub fn validate_sign_in(
    request: Option<SignInRequest>,
) -> Result<SignInCredentials, SignInRejection> {
    let request = request.ok_or(SignInRejection::MissingParameter)?;

    let provider: Provider = request
        .provider
        .as_deref()
        .ok_or(SignInRejection::UnsupportedProvider)?
        .parse()
        .map_err(|_| SignInRejection::UnsupportedProvider)?;

    match provider {
        Provider::Native => match (request.email, request.password) {
            (Some(email), Some(password)) => Ok(SignInCredentials::Native { email, password }),
            _ => Err(SignInRejection::MissingParameter),
        },
        Provider::Facebook => request
            .access_token
            .map(|access_token| SignInCredentials::Facebook { access_token })
            .ok_or(SignInRejection::MissingParameter),
    }
}

/// Second whitespace-separated token of an `Authorization` header.
///
/// The scheme word is not checked; `"Bearer abc"` and `"Token abc"` both yield
/// `"abc"`.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    header.split_whitespace().nth(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(json: &str) -> Option<SignInRequest> {
        parse_sign_in_body(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_native_credentials() {
        let creds =
            validate_sign_in(request(r#"{"provider":"native","email":"a@x.com","password":"pw"}"#))
                .unwrap();
        assert_eq!(
            creds,
            SignInCredentials::Native {
                email: "a@x.com".to_owned(),
                password: "pw".to_owned()
            }
        );
        assert_eq!(creds.provider(), Provider::Native);
    }

    #[test]
    fn test_facebook_credentials() {
        let creds =
            validate_sign_in(request(r#"{"provider":"facebook","access_token":"EAAB"}"#)).unwrap();
        assert_eq!(
            creds,
            SignInCredentials::Facebook {
                access_token: "EAAB".to_owned()
            }
        );
    }

    #[test]
    fn test_unsupported_provider() {
        assert_eq!(
            validate_sign_in(request(r#"{"provider":"twitter"}"#)),
            Err(SignInRejection::UnsupportedProvider)
        );
        assert_eq!(
            validate_sign_in(request(r#"{"email":"a@x.com","password":"pw"}"#)),
            Err(SignInRejection::UnsupportedProvider)
        );
    }

    #[test]
    fn test_provider_checked_before_fields() {
        // every credential field present but the provider is unknown
        let err = validate_sign_in(request(
            r#"{"provider":"google","email":"a@x.com","password":"pw","access_token":"t"}"#,
        ));
        assert_eq!(err, Err(SignInRejection::UnsupportedProvider));
    }

    #[test]
    fn test_missing_native_fields() {
        assert_eq!(
            validate_sign_in(request(r#"{"provider":"native","email":"a@x.com"}"#)),
            Err(SignInRejection::MissingParameter)
        );
        assert_eq!(
            validate_sign_in(request(r#"{"provider":"native","password":"pw"}"#)),
            Err(SignInRejection::MissingParameter)
        );
    }

    #[test]
    fn test_missing_facebook_token() {
        // native fields do not satisfy the facebook provider
        assert_eq!(
            validate_sign_in(request(
                r#"{"provider":"facebook","email":"a@x.com","password":"pw"}"#
            )),
            Err(SignInRejection::MissingParameter)
        );
    }

    #[test]
    fn test_absent_body() {
        assert!(parse_sign_in_body(b"").unwrap().is_none());
        assert!(parse_sign_in_body(b"  \n").unwrap().is_none());
        assert!(parse_sign_in_body(b"null").unwrap().is_none());
        assert_eq!(validate_sign_in(None), Err(SignInRejection::MissingParameter));
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            parse_sign_in_body(b"{\"provider\":"),
            Err(SignInRejection::MalformedBody)
        ));
        assert!(matches!(
            parse_sign_in_body(b"provider=native"),
            Err(SignInRejection::MalformedBody)
        ));
    }

    #[test]
    fn test_non_string_provider_is_unsupported() {
        assert_eq!(
            validate_sign_in(request(r#"{"provider":7}"#)),
            Err(SignInRejection::UnsupportedProvider)
        );
        assert_eq!(
            validate_sign_in(request(r#"{"provider":"twitter","email":42}"#)),
            Err(SignInRejection::UnsupportedProvider)
        );
        assert_eq!(
            validate_sign_in(request("[1, 2]")),
            Err(SignInRejection::UnsupportedProvider)
        );
    }

    #[test]
    fn test_non_string_field_counts_as_missing() {
        assert_eq!(
            validate_sign_in(request(r#"{"provider":"native","email":"a@x.com","password":123}"#)),
            Err(SignInRejection::MissingParameter)
        );
        assert_eq!(
            validate_sign_in(request(r#"{"provider":"facebook","access_token":{"v":1}}"#)),
            Err(SignInRejection::MissingParameter)
        );
    }

    #[test]
    fn test_camel_case_access_token() {
        let creds =
            validate_sign_in(request(r#"{"provider":"facebook","accessToken":"EAAB"}"#)).unwrap();
        assert_eq!(creds.provider(), Provider::Facebook);
    }

    #[test]
    fn test_signup_body() {
        let form =
            parse_signup_body(br#"{"name":"Ming","email":"m@x.com","password":"pw"}"#).unwrap();
        assert_eq!(form.name, "Ming");

        assert_eq!(
            parse_signup_body(br#"{"name":"Ming","email":"m@x.com"}"#).err(),
            Some(SignInRejection::MissingParameter)
        );
        assert_eq!(
            parse_signup_body(b"null").err(),
            Some(SignInRejection::MissingParameter)
        );
        assert_eq!(
            parse_signup_body(b"").err(),
            Some(SignInRejection::MissingParameter)
        );
        assert_eq!(
            parse_signup_body(b"{name").err(),
            Some(SignInRejection::MalformedBody)
        );
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            SignInRejection::UnsupportedProvider.to_string(),
            "Bad Request: not supported provider"
        );
        assert_eq!(
            SignInRejection::MissingParameter.to_string(),
            "Bad Request: missing parameter"
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = SignInCredentials::Native {
            email: "a@x.com".to_owned(),
            password: "hunter2".to_owned(),
        };
        assert!(!format!("{creds:?}").contains("hunter2"));

        let raw = request(r#"{"provider":"facebook","access_token":"EAAB-secret"}"#).unwrap();
        assert!(!format!("{raw:?}").contains("EAAB-secret"));
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("  Bearer   abc  "), Some("abc"));
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token(""), None);
    }
}
