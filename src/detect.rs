//! Textual permission-usage detector.
//!
//! Strictly lexical: the detector pattern-matches source text and never
//! parses, imports, or executes anything, so scanning untrusted bot code
//! is safe. It deliberately over-approximates — a permission name inside
//! a comment or an unrelated string still counts. False positives are an
//! accepted trade for zero execution risk.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::table;

/// Permission references found in one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    pub file: PathBuf,
    /// Canonical names from explicit references (decorators, attribute
    /// access, quoted literals).
    pub declared: BTreeSet<String>,
    /// Canonical names guessed from discord.py method calls.
    pub inferred: BTreeSet<String>,
    /// Integer literals assigned to permission-like identifiers.
    pub raw_values: BTreeSet<u64>,
    /// Declared-style names with no catalogue entry.
    pub unknown: BTreeSet<String>,
}

// Decorator calls that declare permissions via keyword arguments:
// @commands.has_permissions(ban_members=True), @app_commands.default_permissions(...)
static DECORATOR_CALL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:has_permissions|bot_has_permissions|has_guild_permissions|bot_has_guild_permissions|default_permissions)\s*\(([^)]*)\)",
    )
    .unwrap()
});

static KWARG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z_]\w*)\s*=\s*([^,)\s]+)").unwrap());

// Attribute access on an identifier bound to the permissions concept:
// ctx.author.guild_permissions.ban_members, perms.manage_roles
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:\w*permissions|perms?)\s*\.\s*([A-Za-z_]\w*)").unwrap()
});

// Quoted tokens, checked against the catalogue on permission-related lines.
static STRING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"["']([A-Za-z_]\w*)["']"#).unwrap());

// Integer literal assigned to an identifier containing "permission":
// permissions=8, required_permissions: 268435456
static RAW_INT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\w*permissions?\w*)\s*[:=]\s*(\d+)\b").unwrap());

// Method calls: .ban(, .purge(, ...
static METHOD_CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\s*([a-z_]\w*)\s*\(").unwrap());

// discord.py method name -> permissions it usually requires. Best-effort
// heuristics only; context-dependent methods (edit, delete) are omitted.
static METHOD_HINTS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        // Member actions
        ("ban", &["ban_members"] as &[&str]),
        ("unban", &["ban_members"]),
        ("kick", &["kick_members"]),
        ("timeout", &["moderate_members"]),
        // Message actions
        ("send", &["send_messages"]),
        ("purge", &["manage_messages", "read_message_history"]),
        ("pin", &["manage_messages"]),
        ("unpin", &["manage_messages"]),
        ("publish", &["send_messages", "manage_messages"]),
        // Reaction actions
        ("add_reaction", &["add_reactions"]),
        ("clear_reactions", &["manage_messages"]),
        // Channel actions
        ("create_text_channel", &["manage_channels"]),
        ("create_voice_channel", &["manage_channels"]),
        ("create_category", &["manage_channels"]),
        ("create_stage_channel", &["manage_channels"]),
        ("create_forum", &["manage_channels"]),
        ("delete_channel", &["manage_channels"]),
        // Role actions
        ("create_role", &["manage_roles"]),
        ("delete_role", &["manage_roles"]),
        ("add_roles", &["manage_roles"]),
        ("remove_roles", &["manage_roles"]),
        // Webhook actions
        ("create_webhook", &["manage_webhooks"]),
        ("delete_webhook", &["manage_webhooks"]),
        ("webhooks", &["manage_webhooks"]),
        // Thread actions
        ("create_thread", &["create_public_threads"]),
        ("archive", &["manage_threads"]),
        ("unarchive", &["manage_threads"]),
        ("join_thread", &["send_messages_in_threads"]),
        // Voice actions
        ("move_to", &["move_members"]),
        ("disconnect", &["move_members"]),
        // Invite actions
        ("create_invite", &["create_instant_invite"]),
        ("invites", &["manage_guild"]),
        // Guild actions
        ("fetch_audit_logs", &["view_audit_log"]),
        ("audit_logs", &["view_audit_log"]),
        // Emoji/sticker actions
        ("create_custom_emoji", &["manage_guild_expressions"]),
        ("delete_emoji", &["manage_guild_expressions"]),
        ("create_sticker", &["manage_guild_expressions"]),
        ("delete_sticker", &["manage_guild_expressions"]),
        // Event actions
        ("create_scheduled_event", &["manage_events"]),
        ("delete_scheduled_event", &["manage_events"]),
    ])
});

/// Scan one file's text for permission references.
pub fn detect(file: &Path, text: &str) -> Detection {
    let mut det = Detection {
        file: file.to_path_buf(),
        ..Detection::default()
    };

    // Decorator keyword arguments. Falsy values mean the permission is
    // explicitly not required; anything else (True, a variable) counts.
    for call in DECORATOR_CALL_RE.captures_iter(text) {
        for kwarg in KWARG_RE.captures_iter(&call[1]) {
            let value = &kwarg[2];
            if matches!(value, "False" | "None" | "0") {
                continue;
            }
            add_declared(&mut det, &kwarg[1]);
        }
    }

    // Attribute access: only catalogue hits count, anything else is just
    // an unrelated attribute on an unrelated object.
    for cap in ATTR_RE.captures_iter(text) {
        if let Some(name) = table::canonical(&cap[1]) {
            det.declared.insert(name.to_string());
        }
    }

    for line in text.lines() {
        // Quoted permission names, gated on permission-related context so
        // ordinary message strings don't light up the whole catalogue.
        if line.to_lowercase().contains("perm") {
            for cap in STRING_RE.captures_iter(line) {
                if let Some(name) = table::canonical(&cap[1]) {
                    det.declared.insert(name.to_string());
                }
            }
        }

        // Explicit numeric bitmasks.
        for cap in RAW_INT_RE.captures_iter(line) {
            if let Ok(value) = cap[2].parse::<u64>() {
                det.raw_values.insert(value);
            }
        }
    }

    // Method-call heuristics.
    for cap in METHOD_CALL_RE.captures_iter(text) {
        if let Some(perms) = METHOD_HINTS.get(&cap[1]) {
            for perm in *perms {
                det.inferred.insert((*perm).to_string());
            }
        }
    }

    det
}

fn add_declared(det: &mut Detection, name: &str) {
    match table::canonical(name) {
        Some(canonical) => {
            det.declared.insert(canonical.to_string());
        }
        None => {
            det.unknown.insert(name.to_lowercase());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect_str(text: &str) -> Detection {
        detect(Path::new("bot.py"), text)
    }

    #[test]
    fn decorator_kwargs_declare_permissions() {
        let det = detect_str(
            r#"
@commands.has_permissions(administrator=True)
@commands.bot_has_permissions(ban_members=True, kick_members=True)
async def moderation(ctx):
    pass
"#,
        );
        let expected: BTreeSet<String> = ["administrator", "ban_members", "kick_members"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(det.declared, expected);
        assert!(det.unknown.is_empty());
    }

    #[test]
    fn falsy_kwarg_is_skipped() {
        let det = detect_str("@commands.has_permissions(ban_members=False, speak=True)");
        assert!(!det.declared.contains("ban_members"));
        assert!(det.declared.contains("speak"));
    }

    #[test]
    fn multiline_decorator_arguments() {
        let det = detect_str(
            "@commands.has_permissions(\n    manage_guild=True,\n    manage_roles=True,\n)",
        );
        assert!(det.declared.contains("manage_guild"));
        assert!(det.declared.contains("manage_roles"));
    }

    #[test]
    fn decorator_alias_resolves_to_canonical() {
        let det = detect_str("@commands.has_permissions(read_messages=True)");
        assert!(det.declared.contains("view_channel"));
    }

    #[test]
    fn unknown_decorator_kwarg_recorded_not_fatal() {
        let det = detect_str("@commands.has_permissions(fly_members=True)");
        assert!(det.declared.is_empty());
        assert!(det.unknown.contains("fly_members"));
    }

    #[test]
    fn attribute_access_on_permissions_object() {
        let det = detect_str("if ctx.author.guild_permissions.ban_members:\n    pass");
        assert!(det.declared.contains("ban_members"));
    }

    #[test]
    fn short_perms_identifier_counts() {
        let det = detect_str("if perms.manage_roles: grant()");
        assert!(det.declared.contains("manage_roles"));
    }

    #[test]
    fn attribute_in_comment_still_counts() {
        // Over-approximation is intentional: no comment stripping.
        let det = detect_str("# needs permissions.manage_webhooks to mirror messages");
        assert!(det.declared.contains("manage_webhooks"));
    }

    #[test]
    fn quoted_name_on_permission_line_counts() {
        let det = detect_str(r#"require_permission("manage_channels")"#);
        assert!(det.declared.contains("manage_channels"));
    }

    #[test]
    fn quoted_name_without_permission_context_ignored() {
        let det = detect_str(r#"await ctx.reply("speak")"#);
        assert!(!det.declared.contains("speak"));
    }

    #[test]
    fn raw_integer_assignment_captured() {
        let det = detect_str("permissions=8");
        assert_eq!(det.raw_values, BTreeSet::from([8]));
    }

    #[test]
    fn raw_integer_with_named_variable() {
        let det = detect_str("required_permissions = 268435456\nlimit = 100");
        assert_eq!(det.raw_values, BTreeSet::from([268435456]));
    }

    #[test]
    fn equality_comparison_is_not_an_assignment() {
        let det = detect_str("if permissions == 8: pass");
        assert!(det.raw_values.is_empty());
    }

    #[test]
    fn method_calls_produce_inferred_permissions() {
        let det = detect_str("await member.ban(reason=reason)\nawait ctx.channel.purge(limit=50)");
        let expected: BTreeSet<String> =
            ["ban_members", "manage_messages", "read_message_history"]
                .iter()
                .map(|s| s.to_string())
                .collect();
        assert_eq!(det.inferred, expected);
        assert!(det.declared.is_empty());
    }

    #[test]
    fn unmapped_method_is_ignored() {
        let det = detect_str("bot.run(\"TOKEN\")");
        assert!(det.inferred.is_empty());
    }

    #[test]
    fn empty_text_yields_empty_detection() {
        let det = detect_str("");
        assert_eq!(det, Detection { file: PathBuf::from("bot.py"), ..Detection::default() });
    }
}
