//! Placeholder chat replies.

use rand::Rng;

/// A reply in the character's voice, picked from fixed templates.
pub fn chat_reply<R: Rng + ?Sized>(rng: &mut R, name: &str) -> String {
    match rng.gen_range(0..5) {
        0 => format!("*{name} looks at you thoughtfully* \"An interesting question indeed...\""),
        1 => format!("\"Hmm,\" *{name} considers your words* \"I suppose you have a point there.\""),
        2 => format!("*A slight smile crosses {name}'s face* \"You remind me of someone I once knew.\""),
        3 => format!("\"That's quite bold of you to say,\" *{name} replies with a hint of amusement*"),
        _ => format!("*{name} pauses, choosing their words carefully* \"Let me tell you a story...\""),
    }
}
