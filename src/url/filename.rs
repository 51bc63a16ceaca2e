//! Canonical URL to file name mapping
//!
//! Every character that is unsafe in a file name, plus the escape
//! character `_` and the digest marker `~`, is written as `_XX` (two
//! uppercase hex digits). The mapping is injective: hex digits never
//! include `_`, so each escape decodes to exactly one character.
//!
//! Stems longer than [`MAX_STEM_BYTES`] are truncated and end with `~`
//! followed by a SHA-256 prefix of the canonical URL. A literal `~` is
//! always escaped, so only truncated stems carry the marker.

use sha2::{Digest, Sha256};

/// Characters that cannot appear in a file name on common filesystems
const UNSAFE_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Escape character
const ESCAPE: char = '_';

/// Separates a truncated stem from its digest
const DIGEST_MARKER: char = '~';

/// Hex characters of the digest kept in a truncated stem
const DIGEST_HEX_LEN: usize = 16;

/// Longest stem written, in bytes; leaves room for the extension
/// within the usual 255-byte file name limit
pub const MAX_STEM_BYTES: usize = 200;

/// Stem of the site root, which has an empty canonical URL
///
/// `_i` is not a valid escape, so no other URL maps here.
const ROOT_STEM: &str = "_index";

fn needs_escape(c: char) -> bool {
    c == ESCAPE || c == DIGEST_MARKER || UNSAFE_CHARS.contains(&c) || c.is_control()
}

/// Derives the file stem of a mirrored page from its canonical URL
///
/// Distinct canonical URLs always get distinct stems, and the stem never
/// exceeds [`MAX_STEM_BYTES`].
///
/// # Examples
///
/// ```
/// use sumi_scroll::url::page_file_stem;
///
/// assert_eq!(page_file_stem("/guide/intro"), "_2Fguide_2Fintro");
/// assert_eq!(page_file_stem("/a_b"), "_2Fa_5Fb");
/// assert_eq!(page_file_stem(""), "_index");
/// ```
pub fn page_file_stem(canonical_url: &str) -> String {
    if canonical_url.is_empty() {
        return ROOT_STEM.to_string();
    }

    let mut stem = String::with_capacity(canonical_url.len());
    for c in canonical_url.chars() {
        if needs_escape(c) {
            // All escaped characters are below U+0100
            stem.push_str(&format!("{}{:02X}", ESCAPE, c as u32));
        } else {
            stem.push(c);
        }
    }

    if stem.len() <= MAX_STEM_BYTES {
        return stem;
    }

    let keep = MAX_STEM_BYTES - DIGEST_HEX_LEN - DIGEST_MARKER.len_utf8();
    let mut cut = keep;
    while !stem.is_char_boundary(cut) {
        cut -= 1;
    }
    stem.truncate(cut);

    let digest = hex::encode(Sha256::digest(canonical_url.as_bytes()));
    stem.push(DIGEST_MARKER);
    stem.push_str(&digest[..DIGEST_HEX_LEN]);
    stem
}
