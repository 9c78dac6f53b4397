use std::sync::LazyLock;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mge_core::SteamId64;
use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE: &str = "mge_session";
const SESSION_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    exp: usize,
}

impl Claims {
    pub fn from_token(token: &str) -> Option<Self> {
        let token_data = decode::<Claims>(token, &KEYS.decoding, &Validation::default()).ok()?;
        Some(token_data.claims)
    }

    pub fn steam_id(&self) -> Option<SteamId64> {
        self.sub.parse().ok()
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

static KEYS: LazyLock<Keys> = LazyLock::new(|| {
    let secret = read_or_generate_secret();
    Keys::new(&secret)
});

/// Without a configured secret, sessions do not survive a restart.
fn read_or_generate_secret() -> Vec<u8> {
    match std::env::var("MGE_SESSION_SECRET") {
        Ok(secret) if !secret.trim().is_empty() => secret.into_bytes(),
        _ => {
            log::warn!("MGE_SESSION_SECRET not set, using a per-process session secret");
            uuid::Uuid::new_v4().as_bytes().to_vec()
        }
    }
}

pub fn generate_jwt(steam_id: SteamId64) -> Option<String> {
    let claims = Claims {
        sub: steam_id.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(SESSION_HOURS)).timestamp() as usize,
    };
    match encode(&Header::default(), &claims, &KEYS.encoding) {
        Ok(token) => Some(token),
        Err(e) => {
            log::error!("Failed to sign session for {}: {}", steam_id, e);
            None
        }
    }
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Logged-in user of the request, `None` for missing, expired or forged cookies.
pub fn session_steam_id(jar: &CookieJar) -> Option<SteamId64> {
    let cookie = jar.get(SESSION_COOKIE)?;
    Claims::from_token(cookie.value())?.steam_id()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: SteamId64 = SteamId64(76561197960290419);

    #[test]
    fn test_session_round_trip() {
        let token = generate_jwt(ID).unwrap();
        let jar = CookieJar::new().add(session_cookie(token));
        assert_eq!(session_steam_id(&jar), Some(ID));
    }

    #[test]
    fn test_forged_token_is_ignored() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "not.a.jwt"));
        assert_eq!(session_steam_id(&jar), None);
        assert_eq!(session_steam_id(&CookieJar::new()), None);
    }

    #[test]
    fn test_expired_token_is_ignored() {
        let claims = Claims {
            sub: ID.to_string(),
            exp: (chrono::Utc::now() - chrono::Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &KEYS.encoding).unwrap();
        assert!(Claims::from_token(&token).is_none());
    }
}
