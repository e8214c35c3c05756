//! Default preference values.

use serde_json::Value;

// ── Primitive helpers ──────────────────────────────────────────────────────

pub fn bool_false() -> bool {
    false
}

pub fn bool_true() -> bool {
    true
}

// ── Identity ───────────────────────────────────────────────────────────────

pub fn nick() -> String {
    "Anonymous".to_string()
}

// ── Documents ──────────────────────────────────────────────────────────────

/// Rows for a new document. Stored as a raw value because the preferences
/// window writes whatever the user typed into the field.
pub fn new_document_rows() -> Value {
    Value::from(25)
}

// ── Function keys ──────────────────────────────────────────────────────────

/// Ten CP437 character sets, one code per function key F1..F10.
pub fn fkeys() -> Vec<Vec<u32>> {
    vec![
        vec![218, 191, 192, 217, 196, 179, 195, 180, 193, 194],
        vec![201, 187, 200, 188, 205, 186, 204, 185, 202, 203],
        vec![213, 184, 212, 190, 205, 179, 198, 181, 207, 209],
        vec![214, 183, 211, 189, 196, 186, 199, 182, 208, 210],
        vec![197, 206, 216, 215, 232, 233, 155, 156, 153, 239],
        vec![176, 177, 178, 219, 223, 220, 221, 222, 254, 250],
        vec![1, 2, 3, 4, 5, 6, 14, 15, 19, 20],
        vec![24, 25, 30, 31, 16, 17, 18, 29, 20, 21],
        vec![174, 175, 242, 243, 169, 170, 253, 246, 171, 172],
        vec![227, 241, 244, 245, 234, 157, 228, 248, 251, 252],
    ]
}
