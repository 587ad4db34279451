//! Shared UI icons.
//!
//! Each emoji has a plain-text fallback for terminals without Unicode support.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static RUNNING: Emoji<'_, '_> = Emoji("▶️  ", "[>]");
pub static PAUSED: Emoji<'_, '_> = Emoji("⏸️  ", "[||]");
pub static IDLE: Emoji<'_, '_> = Emoji("⏹️  ", "[ ]");
pub static FLAG: Emoji<'_, '_> = Emoji("🏁 ", "[DONE]");

// Timer indicators
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "[T]");
pub static BELL: Emoji<'_, '_> = Emoji("🔔 ", "[!]");
pub static CYCLE: Emoji<'_, '_> = Emoji("🔄 ", "[C]");
pub static WORK: Emoji<'_, '_> = Emoji("💪 ", "W");
pub static REST: Emoji<'_, '_> = Emoji("☕ ", "R");
