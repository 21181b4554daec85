/// Default settings file content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Permisso settings
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[links]
# behavior = "custom-tab"      # custom-tab, external-browser, custom

[presentation]
# style = "full-screen"        # full-screen, page-sheet, form-sheet, over-full-screen, automatic
# animated = true
# title = "Permisso"           # 1-64 characters

[renderer]
# user_agent = "Permisso/0.1"  # printable ASCII, max 256 bytes
# devtools = false

[logging]
# level = "info"               # trace, debug, info, warn, error
"##
    .to_string()
}
