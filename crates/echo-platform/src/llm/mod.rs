//! Generation clients.
//!
//! [`RelayClient`] is what the chat client normally uses: it talks to the
//! relay server, which holds the API key. [`GeminiClient`] talks to the
//! upstream API directly and is what the relay server itself uses.

mod gemini;
mod relay;

pub use gemini::GeminiClient;
pub use relay::RelayClient;

#[cfg(test)]
pub(crate) use gemini::{gemini_request_body, sse_data_text};
#[cfg(test)]
pub(crate) use relay::relay_request_body;

/// Take the decodable prefix out of `pending`, replacing invalid byte
/// sequences with U+FFFD. An incomplete multi-byte sequence at the tail
/// is left in `pending` for the next chunk; callers must flush whatever
/// remains when the stream ends.
pub(crate) fn take_decoded(pending: &mut Vec<u8>) -> String {
    let mut out = String::new();
    loop {
        match std::str::from_utf8(pending) {
            Ok(s) => {
                out.push_str(s);
                pending.clear();
                return out;
            }
            Err(e) => {
                let valid = e.valid_up_to();
                out.push_str(&String::from_utf8_lossy(&pending[..valid]));
                match e.error_len() {
                    Some(len) => {
                        out.push('\u{FFFD}');
                        pending.drain(..valid + len);
                    }
                    None => {
                        // Incomplete tail, wait for more bytes
                        pending.drain(..valid);
                        return out;
                    }
                }
            }
        }
    }
}
