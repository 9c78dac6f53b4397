use std::{fmt, str::FromStr};

use lazy_regex::regex_captures;

/// Offset between the account number space and the individual-account 64-bit space.
pub const STEAM_ID64_BASE: u64 = 76_561_197_960_265_728;

/// Steam id in the 64-bit community form (`7656119...`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SteamId64(pub u64);

/// Steam id in the legacy `STEAM_0:Y:Z` form stored by the game server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LegacySteamId {
    pub auth_bit: u8,
    pub account: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSteamIdError;

impl fmt::Display for ParseSteamIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid steam id")
    }
}

impl std::error::Error for ParseSteamIdError {}

impl SteamId64 {
    pub fn to_legacy(self) -> Option<LegacySteamId> {
        let rest = self.0.checked_sub(STEAM_ID64_BASE)?;
        Some(LegacySteamId {
            auth_bit: (rest % 2) as u8,
            account: rest / 2,
        })
    }
}

impl FromStr for SteamId64 {
    type Err = ParseSteamIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: u64 = s.trim().parse().map_err(|_| ParseSteamIdError)?;
        if id < STEAM_ID64_BASE {
            return Err(ParseSteamIdError);
        }
        Ok(SteamId64(id))
    }
}

impl fmt::Display for SteamId64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl LegacySteamId {
    pub fn to_steam64(self) -> Option<SteamId64> {
        self.account
            .checked_mul(2)?
            .checked_add(STEAM_ID64_BASE)?
            .checked_add(self.auth_bit as u64)
            .map(SteamId64)
    }
}

impl FromStr for LegacySteamId {
    type Err = ParseSteamIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, auth_bit, account) =
            regex_captures!(r"^STEAM_0:([01]):([0-9]+)$", s.trim()).ok_or(ParseSteamIdError)?;
        Ok(LegacySteamId {
            auth_bit: auth_bit.parse().map_err(|_| ParseSteamIdError)?,
            account: account.parse().map_err(|_| ParseSteamIdError)?,
        })
    }
}

impl fmt::Display for LegacySteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "STEAM_0:{}:{}", self.auth_bit, self.account)
    }
}

/// Best-effort conversion of a stored legacy id into its community id.
pub fn legacy_to_steam64(legacy: &str) -> Option<SteamId64> {
    legacy.parse::<LegacySteamId>().ok()?.to_steam64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_to_steam64() {
        let legacy: LegacySteamId = "STEAM_0:1:12345".parse().unwrap();
        assert_eq!(legacy.to_steam64(), Some(SteamId64(76561197960290419)));

        let legacy: LegacySteamId = "STEAM_0:0:0".parse().unwrap();
        assert_eq!(legacy.to_steam64(), Some(SteamId64(STEAM_ID64_BASE)));
    }

    #[test]
    fn test_steam64_to_legacy() {
        let legacy = SteamId64(76561197960290419).to_legacy().unwrap();
        assert_eq!(legacy.to_string(), "STEAM_0:1:12345");
        assert_eq!(SteamId64(1).to_legacy(), None);
    }

    #[test]
    fn test_round_trip() {
        for s in [
            "STEAM_0:0:1",
            "STEAM_0:1:1",
            "STEAM_0:0:40960000",
            "STEAM_0:1:536870911",
        ] {
            let legacy: LegacySteamId = s.parse().unwrap();
            let back = legacy.to_steam64().unwrap().to_legacy().unwrap();
            assert_eq!(back.to_string(), s);
        }
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("STEAM_1:0:1".parse::<LegacySteamId>().is_err());
        assert!("STEAM_0:2:1".parse::<LegacySteamId>().is_err());
        assert!("STEAM_0:0:".parse::<LegacySteamId>().is_err());
        assert!("STEAM_0:0:99999999999999999999".parse::<LegacySteamId>().is_err());
        assert!("12345".parse::<SteamId64>().is_err());
        assert!("abc".parse::<SteamId64>().is_err());
    }

    #[test]
    fn test_overflow_is_rejected() {
        let legacy = LegacySteamId {
            auth_bit: 1,
            account: u64::MAX / 2,
        };
        assert_eq!(legacy.to_steam64(), None);
    }
}
