pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'-') && bytes.get(idx + 1) == Some(&b'-')
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Scan a `:name`, `@name` or `$name` parameter starting at the prefix byte.
///
/// `::` (a cast in some dialects) is never a parameter.
pub(super) fn try_named_param(bytes: &[u8], start: usize) -> Option<usize> {
    let prefix = bytes[start];
    if prefix == b':' && (start > 0 && bytes[start - 1] == b':') {
        return None;
    }
    let first = *bytes.get(start + 1)?;
    if !is_name_start(first) {
        return None;
    }
    let mut idx = start + 2;
    while idx < bytes.len() && is_name_char(bytes[idx]) {
        idx += 1;
    }
    Some(idx)
}
