/// One-shot flash messages
///
/// A handler that redirects can leave messages for the next page the
/// browser renders ("Issue reported!"). Messages travel in the `flash`
/// cookie as a JSON array and are removed by the first page that displays
/// them. `CookieJar` percent-encodes the value on the way out and decodes
/// it on the way in.
///
/// The cookie is unsigned: its content is only ever rendered back, escaped,
/// to the browser that sent it.
///
/// # Example
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use issuedesk_api::flash;
///
/// let jar = flash::push(CookieJar::new(), false, "Issue reported!");
/// let (jar, messages) = flash::take(jar);
/// assert_eq!(messages, vec!["Issue reported!".to_string()]);
/// assert!(jar.get(flash::FLASH_COOKIE).is_none());
/// ```

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Name of the cookie carrying pending messages
pub const FLASH_COOKIE: &str = "flash";

/// Returns the pending messages without consuming them
///
/// A value that is not a JSON array of strings counts as no messages.
pub fn peek(jar: &CookieJar) -> Vec<String> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}

/// Appends a message to the pending ones
///
/// `secure` marks the cookie `Secure`, as for the session cookie.
pub fn push(jar: CookieJar, secure: bool, message: impl Into<String>) -> CookieJar {
    let mut messages = peek(&jar);
    messages.push(message.into());

    let value = serde_json::to_string(&messages).unwrap_or_else(|_| "[]".to_string());

    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure),
    )
}

/// Removes and returns the pending messages
///
/// A malformed cookie yields no messages and is removed all the same.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<String>) {
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, Vec::new());
    }

    let messages = peek(&jar);
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, messages)
}
