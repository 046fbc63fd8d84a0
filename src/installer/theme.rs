//! Theme index generation

use std::path::Path;

use walkdir::WalkDir;

use crate::project::THEME_INDEX_FILE;

/// Themes already present in the project's theme directory, sorted
pub fn installed_themes(theme_dir: &Path) -> Vec<String> {
    if !theme_dir.is_dir() {
        return Vec::new();
    }

    let mut themes: Vec<String> = WalkDir::new(theme_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name() != THEME_INDEX_FILE)
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "ts") {
                path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
            } else {
                None
            }
        })
        .collect();
    themes.sort();
    themes
}

/// `dark` -> `darkTheme`, `high-contrast` -> `highContrastTheme`
fn theme_identifier(name: &str) -> String {
    let mut ident = String::with_capacity(name.len() + 5);
    let mut upper = false;
    for c in name.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            ident.extend(c.to_uppercase());
            upper = false;
        } else {
            ident.push(c);
        }
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert_str(0, "theme");
    }
    ident.push_str("Theme");
    ident
}

/// Source of `theme/index.ts` exporting every theme by name
pub fn render_theme_index(themes: &[String]) -> String {
    let mut out = String::from(
        "// Generated by componentry. `componentry add theme` rewrites this file.\n\n",
    );

    for theme in themes {
        out.push_str(&format!(
            "import {} from \"./{}\";\n",
            theme_identifier(theme),
            theme
        ));
    }

    out.push_str("\nexport const themes = {\n");
    for theme in themes {
        out.push_str(&format!("  \"{}\": {},\n", theme, theme_identifier(theme)));
    }
    out.push_str("} as const;\n\nexport type ThemeName = keyof typeof themes;\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_identifiers() {
        assert_eq!(theme_identifier("default"), "defaultTheme");
        assert_eq!(theme_identifier("high-contrast"), "highContrastTheme");
        assert_eq!(theme_identifier("2024"), "theme2024Theme");
    }

    #[test]
    fn test_render_index() {
        let index = render_theme_index(&["dark".to_string(), "default".to_string()]);
        assert!(index.contains("import darkTheme from \"./dark\";"));
        assert!(index.contains("import defaultTheme from \"./default\";"));
        assert!(index.contains("  \"default\": defaultTheme,"));
        assert!(index.contains("export type ThemeName"));
    }

    #[test]
    fn test_installed_themes_skips_index() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("default.ts"), "").unwrap();
        std::fs::write(temp.path().join("ocean.ts"), "").unwrap();
        std::fs::write(temp.path().join("index.ts"), "").unwrap();
        std::fs::write(temp.path().join("notes.md"), "").unwrap();

        assert_eq!(installed_themes(temp.path()), vec!["default", "ocean"]);
        assert!(installed_themes(&temp.path().join("missing")).is_empty());
    }
}
