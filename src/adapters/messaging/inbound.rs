//! Inbound webhook payload normalization.
//!
//! Provider payloads are loosely shaped: the same logical fields arrive
//! under different names and nesting depending on the event kind and
//! provider version. This module scans the known locations in priority
//! order and produces one canonical [`InboundEvent`], or `None` for
//! payloads the bot must not answer (groups, status broadcasts, events
//! with no extractable customer identity).

use serde_json::Value;

use crate::domain::conversation::InboundEvent;
use crate::domain::foundation::PhoneNumber;

/// Locations checked for a routing address that marks group or status
/// traffic.
const ROUTING_ADDRESS_PATHS: [&[&str]; 5] = [
    &["remoteJid"],
    &["chat", "remoteJid"],
    &["data", "remoteJid"],
    &["key", "remoteJid"],
    &["chat", "id"],
];

/// Candidate identity fields, scanned in priority order. Direct fields
/// first, then the nested chat/data/message objects, then key-encoded
/// remote addresses.
const IDENTITY_PATHS: [&[&str]; 18] = [
    &["phone"],
    &["number"],
    &["from"],
    &["sender"],
    &["remoteJid"],
    &["chat", "remoteJid"],
    &["chat", "phone"],
    &["chat", "number"],
    &["data", "phone"],
    &["data", "number"],
    &["data", "from"],
    &["data", "sender"],
    &["data", "remoteJid"],
    &["message", "from"],
    &["message", "sender"],
    &["chat", "lastMessage", "from"],
    &["contact", "waid"],
    &["key", "remoteJid"],
];

/// Message-type tags meaning a voice note.
const AUDIO_TYPES: [&str; 2] = ["audio", "ptt"];

/// Converts a raw webhook payload into a canonical event.
///
/// Returns `None` for group/status traffic and for payloads with no
/// extractable identity; both are silently dropped upstream.
pub fn normalize(payload: &Value) -> Option<InboundEvent> {
    if !payload.is_object() {
        return None;
    }
    if is_group_or_status(payload) {
        return None;
    }
    let identity = extract_identity(payload)?;

    let node = message_node(payload);
    let mut text = String::new();
    let mut is_interactive = false;
    let mut is_audio = false;

    if node.is_object() {
        is_audio = message_type(node)
            .map(|t| AUDIO_TYPES.contains(&t.as_str()))
            .unwrap_or(false);

        // A list/button selection id beats any free text.
        if let Some(selection) = node.get("buttonOrListid").and_then(loose_string) {
            text = selection.trim().to_string();
            is_interactive = true;
        }
        if text.is_empty() {
            text = text_from_message(node).unwrap_or_default();
        }
    }

    // Top-level fallbacks for flat payload shapes.
    if text.is_empty() {
        text = text_field(payload, "text")
            .or_else(|| payload.get("body").and_then(loose_string))
            .or_else(|| payload.get("message").and_then(Value::as_str).map(String::from))
            .unwrap_or_default();
    }

    Some(InboundEvent::new(identity, text, is_audio, is_interactive))
}

/// True for group chats, status stories and other broadcast traffic the
/// bot must stay out of.
fn is_group_or_status(payload: &Value) -> bool {
    for path in ROUTING_ADDRESS_PATHS {
        if let Some(addr) = lookup(payload, path).and_then(Value::as_str) {
            if is_group_address(addr) {
                return true;
            }
        }
    }

    if lookup(payload, &["chat", "isGroup"]).and_then(Value::as_bool) == Some(true) {
        return true;
    }
    if payload.get("isGroup").and_then(Value::as_bool) == Some(true) {
        return true;
    }

    for key in ["type", "EventType"] {
        if let Some(kind) = payload.get(key).and_then(Value::as_str) {
            if kind.to_lowercase().contains("status") {
                return true;
            }
        }
    }
    false
}

fn is_group_address(addr: &str) -> bool {
    let lower = addr.to_lowercase();
    lower.ends_with("@g.us")
        || lower.contains("status@broadcast")
        || lower.ends_with("@broadcast")
}

/// Scans the identity candidates and returns the first that parses.
///
/// Group-shaped string candidates are skipped outright, so a payload
/// carrying both a group address and a personal number still resolves to
/// the person.
fn extract_identity(payload: &Value) -> Option<PhoneNumber> {
    for path in IDENTITY_PATHS {
        let Some(value) = lookup(payload, path) else {
            continue;
        };
        if let Some(s) = value.as_str() {
            if is_group_address(s) {
                continue;
            }
        }
        let Some(candidate) = loose_string(value) else {
            continue;
        };
        if let Ok(phone) = PhoneNumber::parse(&candidate) {
            return Some(phone);
        }
    }
    None
}

/// The object most likely to carry the message body.
fn message_node(payload: &Value) -> &Value {
    payload
        .get("message")
        .or_else(|| lookup(payload, &["data", "message"]))
        .or_else(|| payload.get("data"))
        .or_else(|| lookup(payload, &["chat", "lastMessage"]))
        .unwrap_or(payload)
}

fn message_type(node: &Value) -> Option<String> {
    ["type", "messageType", "msgType"]
        .iter()
        .find_map(|k| node.get(*k).and_then(Value::as_str))
        .map(str::to_lowercase)
}

/// Free text from a message object: `text` (string or `{body}`), then
/// `body`, `content`, `caption`.
fn text_from_message(node: &Value) -> Option<String> {
    text_field(node, "text")
        .or_else(|| node.get("body").and_then(loose_string))
        .or_else(|| node.get("content").and_then(loose_string))
        .or_else(|| node.get("caption").and_then(loose_string))
}

/// Reads a field that is either a plain string or a `{body: ...}` object.
fn text_field(node: &Value, key: &str) -> Option<String> {
    let value = node.get(key)?;
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => value.get("body").and_then(Value::as_str).map(String::from),
        _ => None,
    }
}

/// Accepts strings and numbers where providers disagree on the type.
fn loose_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lookup<'a>(payload: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut node = payload;
    for key in path {
        node = node.get(key)?;
    }
    Some(node)
}
