//! Host path normalization.
//!
//! Clients hand over paths as they see them on their own machine, often
//! Windows paths with doubled (JSON-escaped) backslashes, while the engine
//! runs against the same drive mounted at `/<drive letter>`.

use std::path::PathBuf;

/// Normalize a client-supplied path to a POSIX path.
///
/// `G:\\Repos\\app` and `G:\Repos\app` both become `/g/Repos/app`. POSIX
/// input passes through with repeated slashes collapsed.
pub fn normalize_host_path(raw: &str) -> PathBuf {
    let unified = raw.trim().replace('\\', "/");
    let mut chars = unified.chars();

    let mapped = match (chars.next(), chars.next(), chars.next()) {
        (Some(drive), Some(':'), None | Some('/')) if drive.is_ascii_alphabetic() => {
            let rest = unified[2..].trim_start_matches('/');
            format!("/{}/{rest}", drive.to_ascii_lowercase())
        }
        _ => unified,
    };

    PathBuf::from(collapse_slashes(&mapped))
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        out.push(c);
    }
    if out.len() > 1 && out.ends_with('/') {
        let _ = out.pop();
    }
    out
}
