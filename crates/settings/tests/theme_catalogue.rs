use crtpad_settings::{Color, ThemeBase, ThemeCatalogue, ThemeError};
use std::fs;
use tempfile::tempdir;

#[test]
fn catalogue_loads_user_themes_from_directory() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("vault.json"),
        r##"{
            "id": "vault-blue",
            "label": "Vault-Tec Blue",
            "base": "vs-dark",
            "palette": {
                "background": "#001028",
                "foreground": "#ffd200",
                "line_highlight": "#002050",
                "selection": "#ffd20040",
                "cursor": "#ffd200",
                "line_number": "#8a7200",
                "line_number_active": "#ffd200",
                "find_match": "#ffd20040"
            },
            "rules": [ { "token": "comment", "foreground": "#8a7200", "font_style": "italic" } ]
        }"##,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let (catalogue, skipped) = ThemeCatalogue::load_from_dir(dir.path()).unwrap();
    assert!(skipped.is_empty());
    assert_eq!(catalogue.len(), 4);
    let theme = catalogue.get("vault-blue").unwrap();
    assert_eq!(theme.base, ThemeBase::VsDark);
    assert_eq!(theme.display_name(), "Vault-Tec Blue");
    assert_eq!(
        catalogue.palette("vault-blue").unwrap().foreground,
        Color::from_hex("#ffd200").unwrap()
    );
}

#[test]
fn missing_directory_yields_builtins() {
    let dir = tempdir().unwrap();
    let (catalogue, skipped) = ThemeCatalogue::load_from_dir(dir.path().join("themes")).unwrap();
    assert!(skipped.is_empty());
    assert!(catalogue.contains("fallout-dark"));
    assert_eq!(catalogue.len(), 3);
}

#[test]
fn malformed_theme_files_are_skipped_and_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("broken.json"), "{ \"id\": 3 }").unwrap();
    fs::write(
        dir.path().join("neon.json"),
        r##"{
            "id": "neon",
            "label": "Neon",
            "base": "vs-dark",
            "palette": {
                "background": "not-a-colour",
                "foreground": "#ffffff",
                "line_highlight": "#111111",
                "selection": "#222222",
                "cursor": "#ffffff",
                "line_number": "#333333",
                "line_number_active": "#ffffff",
                "find_match": "#444444"
            }
        }"##,
    )
    .unwrap();

    let (catalogue, skipped) = ThemeCatalogue::load_from_dir(dir.path()).unwrap();
    assert_eq!(catalogue.len(), 3);
    assert!(!catalogue.contains("neon"));
    assert_eq!(skipped.len(), 2);
    assert!(matches!(skipped[0], ThemeError::Parse { .. }));
    assert!(matches!(skipped[1], ThemeError::InvalidColor { .. }));
}
