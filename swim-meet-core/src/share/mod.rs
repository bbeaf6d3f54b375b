//! Share tokens: compact, URL-safe encodings of a meet snapshot.
//!
//! A token either embeds the meet (info + events) or points at a stored
//! record. Tokens written by older releases used other encodings; decoding
//! tries each known scheme in a fixed order.

mod codec;
mod error;
mod payload;
mod url;

pub use codec::{decode_share_payload, encode_share_payload, DecodeStrategy, CURRENT_SHARE_VERSION};
pub use error::ShareError;
pub use payload::SharePayload;
pub use url::{build_share_url, extract_share_token, SHARE_QUERY_PARAM};
