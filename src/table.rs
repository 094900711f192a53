//! Static catalogue of Discord permission flags.
//!
//! Mirrors the Discord API permission documentation. The catalogue is
//! immutable process-wide data; lookups are case-insensitive and resolve
//! legacy aliases to canonical names. Unknown names return `None` rather
//! than failing — the platform catalogue can grow ahead of this table,
//! and a scan must not abort over a name it does not know.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// One permission flag: canonical lowercase name and its bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionEntry {
    pub name: &'static str,
    pub bit: u64,
}

/// All known permission flags. Bits 47 and 48 are reserved by Discord.
pub const ENTRIES: &[PermissionEntry] = &[
    PermissionEntry { name: "create_instant_invite", bit: 1 << 0 },
    PermissionEntry { name: "kick_members", bit: 1 << 1 },
    PermissionEntry { name: "ban_members", bit: 1 << 2 },
    PermissionEntry { name: "administrator", bit: 1 << 3 },
    PermissionEntry { name: "manage_channels", bit: 1 << 4 },
    PermissionEntry { name: "manage_guild", bit: 1 << 5 },
    PermissionEntry { name: "add_reactions", bit: 1 << 6 },
    PermissionEntry { name: "view_audit_log", bit: 1 << 7 },
    PermissionEntry { name: "priority_speaker", bit: 1 << 8 },
    PermissionEntry { name: "stream", bit: 1 << 9 },
    PermissionEntry { name: "view_channel", bit: 1 << 10 },
    PermissionEntry { name: "send_messages", bit: 1 << 11 },
    PermissionEntry { name: "send_tts_messages", bit: 1 << 12 },
    PermissionEntry { name: "manage_messages", bit: 1 << 13 },
    PermissionEntry { name: "embed_links", bit: 1 << 14 },
    PermissionEntry { name: "attach_files", bit: 1 << 15 },
    PermissionEntry { name: "read_message_history", bit: 1 << 16 },
    PermissionEntry { name: "mention_everyone", bit: 1 << 17 },
    PermissionEntry { name: "use_external_emojis", bit: 1 << 18 },
    PermissionEntry { name: "view_guild_insights", bit: 1 << 19 },
    PermissionEntry { name: "connect", bit: 1 << 20 },
    PermissionEntry { name: "speak", bit: 1 << 21 },
    PermissionEntry { name: "mute_members", bit: 1 << 22 },
    PermissionEntry { name: "deafen_members", bit: 1 << 23 },
    PermissionEntry { name: "move_members", bit: 1 << 24 },
    PermissionEntry { name: "use_vad", bit: 1 << 25 },
    PermissionEntry { name: "change_nickname", bit: 1 << 26 },
    PermissionEntry { name: "manage_nicknames", bit: 1 << 27 },
    PermissionEntry { name: "manage_roles", bit: 1 << 28 },
    PermissionEntry { name: "manage_webhooks", bit: 1 << 29 },
    PermissionEntry { name: "manage_guild_expressions", bit: 1 << 30 },
    PermissionEntry { name: "use_application_commands", bit: 1 << 31 },
    PermissionEntry { name: "request_to_speak", bit: 1 << 32 },
    PermissionEntry { name: "manage_events", bit: 1 << 33 },
    PermissionEntry { name: "manage_threads", bit: 1 << 34 },
    PermissionEntry { name: "create_public_threads", bit: 1 << 35 },
    PermissionEntry { name: "create_private_threads", bit: 1 << 36 },
    PermissionEntry { name: "use_external_stickers", bit: 1 << 37 },
    PermissionEntry { name: "send_messages_in_threads", bit: 1 << 38 },
    PermissionEntry { name: "use_embedded_activities", bit: 1 << 39 },
    PermissionEntry { name: "moderate_members", bit: 1 << 40 },
    PermissionEntry { name: "view_creator_monetization_analytics", bit: 1 << 41 },
    PermissionEntry { name: "use_soundboard", bit: 1 << 42 },
    PermissionEntry { name: "create_guild_expressions", bit: 1 << 43 },
    PermissionEntry { name: "create_events", bit: 1 << 44 },
    PermissionEntry { name: "use_external_sounds", bit: 1 << 45 },
    PermissionEntry { name: "send_voice_messages", bit: 1 << 46 },
    PermissionEntry { name: "send_polls", bit: 1 << 49 },
    PermissionEntry { name: "use_external_apps", bit: 1 << 50 },
];

static BY_NAME: Lazy<HashMap<&'static str, u64>> =
    Lazy::new(|| ENTRIES.iter().map(|e| (e.name, e.bit)).collect());

/// Legacy and common variant names, resolved to canonical names.
static ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("read_messages", "view_channel"),
        ("send_message", "send_messages"),
        ("external_emojis", "use_external_emojis"),
        ("external_stickers", "use_external_stickers"),
        ("manage_emojis", "manage_guild_expressions"),
        ("manage_emojis_and_stickers", "manage_guild_expressions"),
        ("manage_permissions", "manage_roles"),
        ("use_voice_activity", "use_vad"),
        ("go_live", "stream"),
        ("timeout_members", "moderate_members"),
        ("use_slash_commands", "use_application_commands"),
    ])
});

/// Resolve a name (canonical or alias, any case) to its canonical form.
pub fn canonical(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    if let Some((&key, _)) = BY_NAME.get_key_value(lower.as_str()) {
        return Some(key);
    }
    ALIASES.get(lower.as_str()).copied()
}

/// Bit value for a permission name. Case-insensitive, alias-resolving.
pub fn bit_for(name: &str) -> Option<u64> {
    canonical(name).and_then(|c| BY_NAME.get(c).copied())
}

/// Canonical name for a single bit value.
pub fn name_for(bit: u64) -> Option<&'static str> {
    ENTRIES.iter().find(|e| e.bit == bit).map(|e| e.name)
}

/// All catalogue entries, in bit order.
pub fn all_entries() -> &'static [PermissionEntry] {
    ENTRIES
}
