//! Lexical path arithmetic on site-relative `/`-separated paths.
//!
//! Nothing here touches the filesystem.

const NON_RELATIVE_SCHEMES: &[&str] = &["mailto:", "data:", "javascript:", "tel:"];

/// True for references that should be rewritten when the referring page
/// moves: not absolute URLs, not root-absolute, not fragments.
pub fn is_relative_reference(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || value.starts_with('#') || value.starts_with('/') {
        return false;
    }
    let lower = value.to_ascii_lowercase();
    if NON_RELATIVE_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return false;
    }
    !has_scheme(value)
}

fn has_scheme(value: &str) -> bool {
    let Some(idx) = value.find(':') else {
        return false;
    };
    let scheme = &value[..idx];
    let slash = value.find('/').unwrap_or(usize::MAX);
    idx < slash
        && !scheme.is_empty()
        && scheme
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '.'))
}

/// Directory part of a file path, without trailing slash.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Resolves `.` and `..` segments. Leading `..` that cannot be resolved are kept.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }
    parts.join("/")
}

pub fn join(dir: &str, path: &str) -> String {
    if dir.is_empty() {
        normalize(path)
    } else {
        normalize(&format!("{dir}/{path}"))
    }
}

/// Path of `target` as seen from directory `from_dir`. Both are site-relative.
pub fn relative_to(from_dir: &str, target: &str) -> String {
    let from = normalize(from_dir);
    let target = normalize(target);
    let from_parts: Vec<&str> = from.split('/').filter(|part| !part.is_empty()).collect();
    let target_parts: Vec<&str> = target.split('/').filter(|part| !part.is_empty()).collect();
    let common = from_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let mut out: Vec<&str> = Vec::new();
    for _ in common..from_parts.len() {
        out.push("..");
    }
    out.extend_from_slice(&target_parts[common..]);
    if out.is_empty() {
        ".".to_string()
    } else {
        out.join("/")
    }
}

/// Link from the page at `from_file` to the site path `target`.
pub fn link(from_file: &str, target: &str) -> String {
    relative_to(parent_dir(from_file), target)
}

/// `../` repeated once per directory level of `output_file`.
pub fn root_prefix(output_file: &str) -> String {
    let depth = normalize(parent_dir(output_file))
        .split('/')
        .filter(|part| !part.is_empty())
        .count();
    "../".repeat(depth)
}

/// Rewrites `reference`, written relative to `source_file`, so that it
/// resolves to the same target from `output_file`.
pub fn rebase(reference: &str, source_file: &str, output_file: &str) -> String {
    let (path_part, suffix) = split_suffix(reference);
    if path_part.is_empty() {
        return reference.to_string();
    }
    let target = join(parent_dir(source_file), path_part);
    let mut rebased = relative_to(parent_dir(output_file), &target);
    if path_part.ends_with('/') && !rebased.ends_with('/') {
        rebased.push('/');
    }
    rebased.push_str(suffix);
    rebased
}

fn split_suffix(reference: &str) -> (&str, &str) {
    match reference.find(['?', '#']) {
        Some(idx) => (&reference[..idx], &reference[idx..]),
        None => (reference, ""),
    }
}
