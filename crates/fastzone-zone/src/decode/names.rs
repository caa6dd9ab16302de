//! Plausibility guards for decoded names.
//!
//! Recovery applies decoders at arbitrary offsets, so a name that parses is
//! not enough; it has to look like something the linker would have written.

/// Localize key: 3..=150 of `[A-Z0-9_]`, leading uppercase letter, at least
/// one underscore, at least two uppercase letters, and no character
/// repeated more than three times in a row.
pub fn is_localize_key(key: &str) -> bool {
    let bytes = key.as_bytes();
    if !(3..=150).contains(&bytes.len()) || !bytes[0].is_ascii_uppercase() {
        return false;
    }
    if !bytes
        .iter()
        .all(|&b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
    {
        return false;
    }
    if !bytes.contains(&b'_') || bytes.iter().filter(|b| b.is_ascii_uppercase()).count() < 2 {
        return false;
    }
    longest_repeat(bytes) <= 3
}

/// Animation name: `[a-z0-9_]+` with at least one underscore.
///
/// The character class leaves out `/` and `.`, which rejects the paths and
/// extensions (`sfx/...`, `ui/...`, `*.menu`) of other assets.
pub fn is_xanim_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    (3..=128).contains(&bytes.len())
        && bytes
            .iter()
            .all(|&b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
        && bytes.contains(&b'_')
        && !bytes.starts_with(b"_")
}

/// Rawfile name: printable path with an extension or a directory.
pub fn is_file_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    (1..=255).contains(&bytes.len())
        && bytes.iter().all(|&b| b.is_ascii_graphic() || b == b' ')
        && !bytes.starts_with(b" ")
        && (bytes.contains(&b'.') || bytes.contains(&b'/'))
}

/// Generic asset name: printable, no whitespace.
pub fn is_asset_name(name: &str, max_len: usize) -> bool {
    let bytes = name.as_bytes();
    !bytes.is_empty() && bytes.len() <= max_len && bytes.iter().all(u8::is_ascii_graphic)
}

/// Weapon internal name: lowercase identifiers with `_`, `+` and `-`.
pub fn is_weapon_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    (2..=64).contains(&bytes.len())
        && bytes[0].is_ascii_alphanumeric()
        && bytes.iter().all(|&b| {
            b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'_' | b'+' | b'-')
        })
}

/// String table name: a path ending in `.csv`.
pub fn is_csv_name(name: &str) -> bool {
    name.len() > 4
        && name.len() <= 255
        && name.to_ascii_lowercase().ends_with(".csv")
        && name.bytes().all(|b| b.is_ascii_graphic())
}

fn longest_repeat(bytes: &[u8]) -> usize {
    let mut longest = 0;
    let mut run = 0;
    let mut prev = None;
    for &b in bytes {
        if Some(b) == prev {
            run += 1;
        } else {
            run = 1;
            prev = Some(b);
        }
        longest = longest.max(run);
    }
    longest
}
