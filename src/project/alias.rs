//! Import alias mapping and rewriting
//!
//! Registry sources import each other through canonical aliases such as
//! `@/components/ui/button`. Installed copies must use the project's own
//! aliases, or relative paths when the project has no alias setup.

use std::path::{Component, Path, PathBuf};

use crate::error::{ComponentryError, Result};

use super::config::{AliasKind, ImportStyle, ProjectConfig};

/// Alias groups ordered so that longer aliases win over their prefixes
fn longest_first<'a>(mut pairs: Vec<(&'a str, AliasKind)>) -> Vec<(&'a str, AliasKind)> {
    pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    pairs
}

/// `rest` after `alias` when `specifier` is the alias or a path below it
fn strip_alias<'a>(specifier: &'a str, alias: &str) -> Option<&'a str> {
    let rest = specifier.strip_prefix(alias)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest.trim_start_matches('/'))
    } else {
        None
    }
}

fn join_dir(dir: &str, rest: &str) -> PathBuf {
    let mut path = PathBuf::from(dir);
    if !rest.is_empty() {
        path.push(rest);
    }
    path
}

/// Map an import specifier to a path relative to the project root
pub fn resolve_alias(specifier: &str, config: &ProjectConfig) -> Result<PathBuf> {
    let configured = longest_first(
        AliasKind::ALL
            .iter()
            .map(|&kind| (config.aliases.get(kind), kind))
            .collect(),
    );

    for (alias, kind) in configured {
        if let Some(rest) = strip_alias(specifier, alias) {
            return Ok(join_dir(&config.dirs.for_alias(kind), rest));
        }
    }

    if let Some(rest) = specifier.strip_prefix("@/") {
        return Ok(join_dir(config.source_root(), rest));
    }

    Err(ComponentryError::Validation {
        message: format!("'{specifier}' does not match any configured alias"),
    })
}

/// Import path from `from_file` to `to_path`, both relative to the project root
///
/// Always starts with `./` or `../`, uses `/` and drops script extensions.
pub fn relative_import_path(from_file: &Path, to_path: &Path) -> String {
    fn parts(path: &Path) -> Vec<String> {
        path.components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect()
    }

    let from_dir = from_file.parent().map(parts).unwrap_or_default();
    let mut to = parts(to_path);

    if let Some(last) = to.last_mut() {
        let path = Path::new(last.as_str());
        let is_script = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e, "ts" | "tsx" | "js" | "jsx"));
        if is_script {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                *last = stem.to_string();
            }
        }
    }

    let common = from_dir
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = std::iter::repeat_n("..".to_string(), from_dir.len() - common)
        .collect();
    segments.extend(to.into_iter().skip(common));

    match segments.first().map(String::as_str) {
        None => ".".to_string(),
        Some("..") => segments.join("/"),
        Some(_) => format!("./{}", segments.join("/")),
    }
}

/// Rewrite canonical registry aliases inside quoted module specifiers
///
/// `target_file` is where the source will be written, relative to the
/// project root; it anchors relative imports.
pub fn rewrite_imports(source: &str, config: &ProjectConfig, target_file: &Path) -> String {
    let canonical = longest_first(
        AliasKind::ALL
            .iter()
            .map(|&kind| (kind.canonical(), kind))
            .collect(),
    );

    let rewrite = |specifier: &str| -> Option<String> {
        let (kind, rest) = canonical
            .iter()
            .find_map(|&(alias, kind)| Some((kind, strip_alias(specifier, alias)?)))?;

        let project_alias = config.aliases.get(kind);
        let aliased = if rest.is_empty() {
            project_alias.to_string()
        } else {
            format!("{project_alias}/{rest}")
        };

        match config.import_style {
            ImportStyle::Alias => Some(aliased),
            ImportStyle::Relative => resolve_alias(&aliased, config)
                .ok()
                .map(|to| relative_import_path(target_file, &to)),
        }
    };

    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find(['"', '\'']) {
        let quote = if rest[start..].starts_with('"') { '"' } else { '\'' };
        let (before, after_open) = rest.split_at(start + 1);
        out.push_str(before);

        match after_open.find(|c: char| c == quote || c == '\n') {
            Some(end) if after_open[end..].starts_with(quote) => {
                let literal = &after_open[..end];
                match rewrite(literal) {
                    Some(replaced) => out.push_str(&replaced),
                    None => out.push_str(literal),
                }
                out.push(quote);
                rest = &after_open[end + 1..];
            }
            // Unterminated on this line, e.g. an apostrophe in a comment
            _ => rest = after_open,
        }
    }

    out.push_str(rest);
    out
}
