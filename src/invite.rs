//! OAuth2 invite URL construction.
//!
//! Pure string building against the Discord authorize endpoint; no
//! network calls. The bitmask is passed through verbatim — Discord may
//! define bits the local catalogue does not know about yet, and clamping
//! them here would silently weaken the generated link.

use std::collections::BTreeSet;
use std::path::Path;

use url::Url;

use crate::config::InviteConfig;
use crate::error::{PermScanError, Result};
use crate::{table, ScanOptions};

/// Discord's OAuth2 authorization endpoint.
pub const AUTHORIZE_URL: &str = "https://discord.com/oauth2/authorize";

/// Scopes requested when the caller supplies none: install as a bot and
/// register its application commands.
pub const DEFAULT_SCOPES: &[&str] = &["bot", "applications.commands"];

/// One way to arrive at a permission bitmask, in priority order:
/// an explicit integer beats a name set beats a directory scan.
#[derive(Debug, Clone)]
pub enum PermissionSource<'a> {
    Explicit(u64),
    Names(&'a BTreeSet<String>),
    ScanRoot(&'a Path),
}

/// A resolved bitmask plus the names that could not contribute to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPermissions {
    pub bitmask: u64,
    /// Names dropped because the catalogue does not know them.
    pub dropped: Vec<String>,
}

/// Try each source in order; the first one present wins.
///
/// An empty source list is a caller error (`NoPermissionSource`) — there
/// is nothing sensible to fall back to.
pub fn resolve(sources: &[PermissionSource<'_>], options: &ScanOptions) -> Result<ResolvedPermissions> {
    let Some(source) = sources.first() else {
        return Err(PermScanError::NoPermissionSource);
    };

    match source {
        PermissionSource::Explicit(mask) => Ok(ResolvedPermissions {
            bitmask: *mask,
            dropped: Vec::new(),
        }),
        PermissionSource::Names(names) => {
            let mut resolved = ResolvedPermissions::default();
            for name in names.iter() {
                match table::bit_for(name) {
                    Some(bit) => resolved.bitmask |= bit,
                    None => {
                        tracing::warn!(name = %name, "unknown permission name dropped");
                        resolved.dropped.push(name.clone());
                    }
                }
            }
            Ok(resolved)
        }
        PermissionSource::ScanRoot(root) => {
            let report = crate::scan_directory(root, options)?;
            Ok(ResolvedPermissions {
                bitmask: report.aggregate.bitmask,
                dropped: report.aggregate.unknown.iter().cloned().collect(),
            })
        }
    }
}

/// Check that `client_id` is a plausible Discord snowflake: non-empty,
/// ASCII digits only.
pub fn validate_client_id(client_id: &str) -> Result<()> {
    if client_id.is_empty() || !client_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PermScanError::InvalidClientId(client_id.to_string()));
    }
    Ok(())
}

/// Build the invite URL for `client_id` with the given bitmask and scopes.
///
/// `client_id` must be a Discord snowflake (non-empty, ASCII digits).
/// Scopes are joined in caller order; duplicates are the caller's problem.
pub fn build_invite_url(client_id: &str, permissions: u64, scopes: &[String]) -> Result<String> {
    validate_client_id(client_id)?;

    let mut url = Url::parse(AUTHORIZE_URL)?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("permissions", &permissions.to_string())
        .append_pair("scope", &scopes.join(" "));

    Ok(url.into())
}

/// The default scope list as owned strings.
pub fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}

/// Scope fallback chain: explicit caller scopes, then config scopes,
/// then the built-in defaults.
pub fn effective_scopes(explicit: &[String], config: &InviteConfig) -> Vec<String> {
    if !explicit.is_empty() {
        explicit.to_vec()
    } else if !config.scopes.is_empty() {
        config.scopes.clone()
    } else {
        default_scopes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_embeds_client_id_permissions_and_scopes() {
        let url = build_invite_url("123", 8, &default_scopes()).unwrap();
        assert!(url.starts_with(AUTHORIZE_URL));
        assert!(url.contains("client_id=123"));
        assert!(url.contains("permissions=8"));
        assert!(url.contains("bot"));
        assert!(url.contains("applications.commands"));
    }

    #[test]
    fn empty_client_id_is_rejected() {
        let err = build_invite_url("", 8, &default_scopes()).unwrap_err();
        assert!(matches!(err, PermScanError::InvalidClientId(_)));
    }

    #[test]
    fn non_numeric_client_id_is_rejected() {
        let err = build_invite_url("abc123", 0, &default_scopes()).unwrap_err();
        assert!(matches!(err, PermScanError::InvalidClientId(_)));
    }

    #[test]
    fn bitmask_beyond_the_catalogue_passes_through() {
        let url = build_invite_url("42", u64::MAX, &default_scopes()).unwrap();
        assert!(url.contains(&format!("permissions={}", u64::MAX)));
    }

    #[test]
    fn scopes_keep_caller_order() {
        let scopes = vec!["applications.commands".to_string(), "bot".to_string()];
        let url = build_invite_url("1", 0, &scopes).unwrap();
        let scope_pos = url.find("scope=").unwrap();
        let scope_str = &url[scope_pos..];
        assert!(scope_str.find("applications.commands").unwrap() < scope_str.find("bot").unwrap());
    }

    #[test]
    fn explicit_scopes_outrank_config_scopes() {
        let config = InviteConfig {
            scopes: vec!["bot".to_string()],
        };
        let explicit = vec!["applications.commands".to_string()];
        assert_eq!(effective_scopes(&explicit, &config), explicit);
    }

    #[test]
    fn config_scopes_used_when_none_supplied() {
        let config = InviteConfig {
            scopes: vec!["bot".to_string()],
        };
        assert_eq!(effective_scopes(&[], &config), vec!["bot".to_string()]);
    }

    #[test]
    fn empty_config_scopes_fall_back_to_defaults() {
        let config = InviteConfig { scopes: Vec::new() };
        assert_eq!(effective_scopes(&[], &config), default_scopes());
    }

    #[test]
    fn explicit_mask_wins() {
        let names: BTreeSet<String> = ["administrator".to_string()].into();
        let sources = [
            PermissionSource::Explicit(8),
            PermissionSource::Names(&names),
        ];
        let resolved = resolve(&sources, &ScanOptions::default()).unwrap();
        assert_eq!(resolved.bitmask, 8);
        assert!(resolved.dropped.is_empty());
    }

    #[test]
    fn names_resolve_through_the_table() {
        let names: BTreeSet<String> =
            ["ban_members".to_string(), "kick_members".to_string()].into();
        let sources = [PermissionSource::Names(&names)];
        let resolved = resolve(&sources, &ScanOptions::default()).unwrap();
        assert_eq!(resolved.bitmask, (1 << 2) | (1 << 1));
    }

    #[test]
    fn unknown_names_drop_to_zero_and_are_reported() {
        let names: BTreeSet<String> = ["not_a_real_permission".to_string()].into();
        let sources = [PermissionSource::Names(&names)];
        let resolved = resolve(&sources, &ScanOptions::default()).unwrap();
        assert_eq!(resolved.bitmask, 0);
        assert_eq!(resolved.dropped, vec!["not_a_real_permission".to_string()]);
    }

    #[test]
    fn no_source_is_an_error() {
        let err = resolve(&[], &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, PermScanError::NoPermissionSource));
    }
}
