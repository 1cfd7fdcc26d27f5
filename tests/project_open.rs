//! Opening projects from disk: configuration, command transpilers, plugins.

use std::fs;

use tempfile::TempDir;
use transpile_overlay::prelude::*;
use transpile_overlay::path::to_slash;

fn write(dir: &TempDir, name: &str, content: &str) {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_open_requires_config() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        Project::open(dir.path()),
        Err(OverlayError::MissingConfig { .. })
    ));
}

#[test]
fn test_open_requires_existing_root_dir() {
    let dir = TempDir::new().unwrap();
    write(&dir, "tsconfig.json", r#"{ "compilerOptions": { "rootDir": "src" } }"#);
    assert!(matches!(
        Project::open(dir.path()),
        Err(OverlayError::UnreadableRoot { .. })
    ));
}

#[test]
fn test_open_rejects_invalid_transpiler_declaration() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "tsconfig.json",
        r#"{ "transpilers": [{ "extension": "", "targetExtension": ".ts", "command": "x" }] }"#,
    );
    assert!(matches!(
        Project::open(dir.path()),
        Err(OverlayError::InvalidConfig { .. })
    ));
}

#[test]
fn test_settings_force_overlay_flags() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    write(
        &dir,
        "tsconfig.json",
        r#"{ "compilerOptions": { "rootDir": "./src", "allowJs": false, "target": "es2022" } }"#,
    );

    let project = Project::open(dir.path()).unwrap();
    let settings = project.compilation_settings();

    assert_eq!(settings.get_bool("allowJs"), Some(true));
    assert_eq!(settings.get_bool("allowArbitraryExtensions"), Some(true));
    assert_eq!(settings.get_str("target"), Some("es2022"));
    assert!(settings.root_dir().unwrap().ends_with("/src"));
    project.close();
}

#[test]
fn test_plugins_load_in_background_and_isolate_failures() {
    let dir = TempDir::new().unwrap();
    write(&dir, "tsconfig.json", "{}");
    write(
        &dir,
        ".overlay/plugins/upper.transpiler.json",
        r#"{ "transpilers": [{ "extension": "up", "targetExtension": "ts", "command": "tr", "args": ["a-z", "A-Z"] }] }"#,
    );
    write(&dir, ".overlay/plugins/broken.transpiler.json", "{ nope");

    let project = Project::open(dir.path()).unwrap();
    let report = project.wait_for_plugins().unwrap();

    assert_eq!(report.loaded, vec!["upper".to_string()]);
    assert_eq!(report.failures.len(), 1);
    assert!(project.registry().contains(".up"));
    assert!(project.wait_for_plugins().is_none());
}

#[cfg(unix)]
#[test]
fn test_command_transpiler_from_config() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "tsconfig.json",
        r#"{
            "transpilers": [
                { "extension": ".up", "targetExtension": ".ts", "command": "tr", "args": ["a-z", "A-Z"] },
                { "extension": ".fail", "targetExtension": ".ts", "command": "sh", "args": ["-c", "exit 1"] }
            ],
            "plugins": { "directory": "no-plugins-here" }
        }"#,
    );
    write(&dir, "src/a.up", "export const x = 1;");

    let sink = std::sync::Arc::new(CollectingSink::new());
    let config = ProjectConfig::load(dir.path()).unwrap();
    let project = Project::builder(config).with_sink(sink.clone()).build().unwrap();

    let root = to_slash(project.config().project_root());
    let source = format!("{root}/src/a.up");
    let compiled = format!("{source}.ts");

    let resolved = project.resolve_module_names(&["./a"], &format!("{root}/src/main.ts"));
    assert_eq!(resolved[0].as_ref().unwrap().resolved_file_name, compiled);
    assert_eq!(project.get_snapshot(&compiled).text(), "EXPORT CONST X = 1;");

    project.register_or_update(&format!("{root}/src/b.fail"), "anything", 1);
    assert!(project.get_snapshot(&format!("{root}/src/b.fail.ts")).is_empty());
    assert_eq!(sink.len(), 1);
    assert!(matches!(sink.failures()[0].error, TranspileError::Exit { .. }));
}

#[cfg(feature = "batch")]
#[test]
fn test_warm_compiles_registered_sources() {
    let dir = TempDir::new().unwrap();
    let config = ConfigBuilder::new(dir.path()).build().unwrap();
    let project = Project::builder(config)
        .no_plugins()
        .with_transpiler(TranspilerDescriptor::from_fn(".alt", ".host", |_: &str, s: &str| {
            Ok(Transpiled::code(s.chars().rev().collect::<String>()))
        }))
        .build()
        .unwrap();

    project.register_or_update("/p/a.alt", "abc", 1);
    project.register_or_update("/p/b.alt", "xyz", 1);

    let report = project.warm();
    assert_eq!(report.compiled, 2);
    assert_eq!(project.get_snapshot("/p/a.alt.host").text(), "cba");

    let stats = project.close();
    assert_eq!(stats.compiles, 2);
    assert_eq!(stats.snapshot_misses, 1);
}
