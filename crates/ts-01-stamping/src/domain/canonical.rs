//! # Canonical Form
//!
//! Normalizes message text so the same logical content always hashes the same
//! regardless of the line endings or padding a client added.

/// Canonicalize raw text: every CRLF becomes LF, then surrounding whitespace
/// is trimmed. `None` and empty input yield an empty string.
///
/// Replacement runs to a fixpoint, so `\r\r\n` also collapses to `\n` and a
/// second pass never changes the output. Lone CR characters are left alone.
pub fn canonicalize(raw: Option<&str>) -> String {
    let Some(text) = raw else {
        return String::new();
    };

    let mut out = String::with_capacity(text.len());
    let mut pending_cr = 0usize;
    for ch in text.chars() {
        match ch {
            '\r' => pending_cr += 1,
            '\n' => {
                pending_cr = 0;
                out.push('\n');
            }
            other => {
                out.extend(std::iter::repeat('\r').take(pending_cr));
                pending_cr = 0;
                out.push(other);
            }
        }
    }
    out.extend(std::iter::repeat('\r').take(pending_cr));

    out.trim().to_string()
}

/// Build the hashing input for a message.
///
/// Each field is canonicalized first, laid out as
/// `from:..\nto:..\nsubject:..\nbody:..`, and the whole envelope is
/// canonicalized once more.
pub fn canonical_envelope(from: &str, to: &str, subject: &str, body: &str) -> String {
    let envelope = format!(
        "from:{}\nto:{}\nsubject:{}\nbody:{}",
        canonicalize(Some(from)),
        canonicalize(Some(to)),
        canonicalize(Some(subject)),
        canonicalize(Some(body)),
    );
    canonicalize(Some(&envelope))
}
