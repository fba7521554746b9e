//! Environment overrides, kept in their own binary so the variables
//! never leak into other config tests.

use circumplex::CircumplexConfig;

#[test]
fn environment_overrides_selection_and_size() {
    std::env::set_var("CIRCUMPLEX_RENDER_ACTIVE", "joy,love");
    std::env::set_var("CIRCUMPLEX_OUTPUT_WIDTH", "1100");

    let dir = tempfile::tempdir().unwrap();
    let config = CircumplexConfig::load(&dir.path().join("absent.toml")).unwrap();

    std::env::remove_var("CIRCUMPLEX_RENDER_ACTIVE");
    std::env::remove_var("CIRCUMPLEX_OUTPUT_WIDTH");

    assert_eq!(config.output.width, 1100);
    let catalog = config.catalog().unwrap();
    let active = config.active_set(&catalog).unwrap();
    assert_eq!(active.ids(), ["joy", "love"]);
}
