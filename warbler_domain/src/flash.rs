use axum_extra::extract::cookie::{Cookie, CookieJar};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Info,
    Danger,
}

impl FlashCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Danger => "danger",
        }
    }
}

/// A one-shot message shown on the next rendered page.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn new(category: FlashCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    /// Queue this flash behind any that are already pending in the jar.
    pub fn add_to(self, jar: CookieJar) -> CookieJar {
        let mut flashes = pending(&jar);
        flashes.push(self);

        match serde_json::to_string(&flashes) {
            Ok(value) => jar.add(Cookie::build((FLASH_COOKIE, value)).path("/")),
            Err(e) => {
                tracing::warn!("dropping flash that could not be encoded: {e}");
                jar
            }
        }
    }
}

/// Remove and return all pending flashes.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<Flash>) {
    let flashes = pending(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, flashes);
    }

    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flashes)
}

fn pending(jar: &CookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        // A tampered cookie only loses its messages.
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}
