use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "server": {
                "type": "object",
                "properties": {
                    "host": { "type": "string" },
                    "port": { "type": "integer", "minimum": 1, "maximum": 65535 },
                    "database": { "type": "string" }
                }
            },
            "audit": {
                "type": "object",
                "properties": {
                    "backend": { "type": "string", "enum": ["remote", "headless"] },
                    "mode": { "type": "string", "enum": ["synchronous", "fire-and-forget"] },
                    "scoring": { "type": "string", "enum": ["direct", "weighted"] },
                    "timeout_secs": { "type": "integer", "minimum": 1 }
                }
            },
            "remote": {
                "type": "object",
                "properties": {
                    "endpoint": { "type": "string", "format": "uri" },
                    "api_key": { "type": "string" }
                }
            },
            "browser": {
                "type": "object",
                "properties": {
                    "executable": { "type": "string", "enum": ["bundled-minimal", "system-installed"] },
                    "bundled_path": { "type": "string" },
                    "node_binary": { "type": "string" },
                    "runner_dir": { "type": "string" },
                    "navigation_timeout_secs": { "type": "integer", "minimum": 1 }
                }
            },
            "quota": {
                "type": "object",
                "properties": {
                    "monthly_limit": { "type": "integer", "minimum": 0 },
                    "enforce": { "type": "boolean" }
                }
            },
            "auth": {
                "type": "object",
                "properties": {
                    "public_base_url": { "type": "string", "format": "uri" },
                    "login_token_ttl_minutes": { "type": "integer", "minimum": 1 },
                    "session_ttl_days": { "type": "integer", "minimum": 1 },
                    "echo_link": { "type": "boolean" }
                }
            }
        }
    })
});
