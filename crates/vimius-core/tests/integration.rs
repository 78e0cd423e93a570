use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Barrier};
use std::thread;
use vimius_core::{enable, Config, CoreError, Submodules};
use vimius_schema::{ManifestError, SubmoduleRecord};

const MANIFEST: &str = r"
submodules:
  pathogen:
    path: vimius/vim/core/pathogen
    group: core
  tlib:
    path: vimius/vim/tools/tlib
    group: tools
    dependencies: [pathogen]
  command-t:
    path: vimius/vim/tools/command-t
    group: tools
    dependencies: [tlib]
  github:
    path: vimius/vim/tools/github
    group: tools
    dependencies: [tlib, pathogen]
";

fn write_manifest(dir: &Path, file: &str, content: &str) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, content).unwrap();
    path
}

fn names(records: &[&SubmoduleRecord]) -> Vec<String> {
    records.iter().map(|r| r.name.to_string()).collect()
}

#[test]
fn submodules_follow_manifest_order() {
    let dir = tempfile::tempdir().unwrap();
    let s = Submodules::from_path(write_manifest(dir.path(), "submodules.yml", MANIFEST));

    let order: Vec<&str> = s.submodules().unwrap().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(order, vec!["pathogen", "tlib", "command-t", "github"]);
}

#[test]
fn cached_after_source_disappears() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_manifest(dir.path(), "submodules.yml", MANIFEST);
    let s = Submodules::from_path(&path);

    let first = s.submodules().unwrap().to_vec();
    fs::remove_file(&path).unwrap();
    let second = s.submodules().unwrap().to_vec();
    assert_eq!(first, second);
}

#[test]
fn cached_after_source_is_corrupted() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_manifest(dir.path(), "submodules.yml", MANIFEST);
    let s = Submodules::from_path(&path);

    let first = s.submodules().unwrap().to_vec();
    fs::write(&path, "submodules: [").unwrap();
    assert_eq!(s.submodules().unwrap(), first.as_slice());
}

#[test]
fn github_closure_has_each_dependency_once() {
    let dir = tempfile::tempdir().unwrap();
    let s = Submodules::from_path(write_manifest(dir.path(), "submodules.yml", MANIFEST));

    let records = s.submodule_with_dependencies("github").unwrap();
    assert_eq!(records[0].name, "github");
    let unique: HashSet<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(unique.len(), records.len());
    assert_eq!(
        unique,
        HashSet::from(["github", "tlib", "pathogen"])
    );
}

#[test]
fn closure_never_contains_its_root() {
    let dir = tempfile::tempdir().unwrap();
    let s = Submodules::from_path(write_manifest(dir.path(), "submodules.yml", MANIFEST));

    for record in s.submodules().unwrap() {
        let deps = s.dependencies(&record.name).unwrap();
        assert!(!deps.contains(&record.name), "{} depends on itself", record.name);
    }
}

#[test]
fn grouping_covers_every_record_once() {
    let dir = tempfile::tempdir().unwrap();
    let s = Submodules::from_path(write_manifest(dir.path(), "submodules.yml", MANIFEST));

    let grouped = s.submodules_by_group().unwrap();
    let flattened: Vec<&SubmoduleRecord> = grouped
        .iter()
        .flat_map(|(_, bucket)| bucket.iter().copied())
        .collect();
    assert_eq!(flattened.len(), s.submodules().unwrap().len());

    let all: HashSet<&str> = s.submodules().unwrap().iter().map(|r| r.name.as_str()).collect();
    let seen: HashSet<&str> = flattened.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(all, seen);
}

#[test]
fn active_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let s = Submodules::from_path(write_manifest(dir.path(), "submodules.yml", MANIFEST));
    let config_path = write_manifest(
        dir.path(),
        "vimius.yml",
        "vimius:\n  submodules: [github, command-t, tlib, pathogen]\n",
    );

    let config = Config::load(&config_path).unwrap();
    let active = s.active(&config.active_submodules().unwrap()).unwrap();
    assert_eq!(names(&active), vec!["pathogen", "tlib", "command-t", "github"]);
}

#[test]
fn enable_then_save_persists_closure() {
    let dir = tempfile::tempdir().unwrap();
    let s = Submodules::from_path(write_manifest(dir.path(), "submodules.yml", MANIFEST));
    let config_path = dir.path().join("vimius.yml");

    let mut config = Config::load(&config_path).unwrap();
    enable(&s, &mut config, "github").unwrap();
    config.save().unwrap();

    let reloaded = Config::load(&config_path).unwrap();
    let active = s.active(&reloaded.active_submodules().unwrap()).unwrap();
    assert_eq!(names(&active), vec!["pathogen", "tlib", "github"]);
}

#[test]
fn numeric_submodule_names_round_trip_through_config() {
    let dir = tempfile::tempdir().unwrap();
    let s = Submodules::from_path(write_manifest(
        dir.path(),
        "submodules.yml",
        "submodules:\n  1:\n    path: vim/one\n    group: misc\n  tlib:\n    path: vim/tlib\n    group: tools\n    dependencies: [1]\n",
    ));
    let config_path = write_manifest(dir.path(), "vimius.yml", "vimius:\n  submodules: [1]\n");

    let mut config = Config::load(&config_path).unwrap();
    assert_eq!(names(&s.active(&config.active_submodules().unwrap()).unwrap()), vec!["1"]);

    enable(&s, &mut config, "tlib").unwrap();
    config.save().unwrap();
    let reloaded = Config::load(&config_path).unwrap();
    let active = s.active(&reloaded.active_submodules().unwrap()).unwrap();
    assert_eq!(names(&active), vec!["1", "tlib"]);
}

#[test]
fn long_dependency_chain_resolves() {
    let dir = tempfile::tempdir().unwrap();
    let mut manifest = String::from("submodules:\n  m0:\n    path: vim/m0\n    group: chain\n");
    for i in 1..10_000 {
        manifest.push_str(&format!(
            "  m{i}:\n    path: vim/m{i}\n    group: chain\n    dependencies: [m{}]\n",
            i - 1
        ));
    }
    let s = Submodules::from_path(write_manifest(dir.path(), "submodules.yml", &manifest));

    let deps = s.dependencies("m9999").unwrap();
    assert_eq!(deps.len(), 9_999);
    assert_eq!(deps[0], "m0");
    assert_eq!(s.submodule_with_dependencies("m9999").unwrap().len(), 10_000);
}

#[test]
fn toml_manifest_behaves_like_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_manifest(
        dir.path(),
        "submodules.toml",
        r#"
[submodules.pathogen]
path = "vimius/vim/core/pathogen"
group = "core"

[submodules.tlib]
path = "vimius/vim/tools/tlib"
group = "tools"
dependencies = ["pathogen"]

[submodules.command-t]
path = "vimius/vim/tools/command-t"
group = "tools"
dependencies = ["tlib"]
"#,
    );
    let s = Submodules::from_path(path);
    assert_eq!(s.dependencies("command-t").unwrap(), vec!["pathogen", "tlib"]);
    let groups: Vec<&str> = s.groups().unwrap().into_iter().map(|g| g.as_str()).collect();
    assert_eq!(groups, vec!["core", "tools"]);
}

#[test]
fn unparsable_manifest_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let s = Submodules::from_path(write_manifest(dir.path(), "submodules.yml", "submodules: {"));
    assert!(matches!(
        s.submodules(),
        Err(CoreError::Manifest(ManifestError::ParseYaml(_)))
    ));
}

#[test]
fn missing_manifest_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let s = Submodules::from_path(dir.path().join("absent.yml"));
    assert!(matches!(
        s.groups(),
        Err(CoreError::Manifest(ManifestError::Io(_)))
    ));
}

#[test]
fn cyclic_manifest_fails_instead_of_looping() {
    let dir = tempfile::tempdir().unwrap();
    let s = Submodules::from_path(write_manifest(
        dir.path(),
        "submodules.yml",
        "submodules:\n  a:\n    path: a\n    group: g\n    dependencies: [b]\n  b:\n    path: b\n    group: g\n    dependencies: [a]\n",
    ));
    assert!(matches!(
        s.submodule_with_dependencies("a"),
        Err(CoreError::DependencyCycle { .. })
    ));
    assert!(matches!(s.check(), Err(CoreError::DependencyCycle { .. })));
}

#[test]
fn shared_across_threads() {
    let dir = tempfile::tempdir().unwrap();
    let s = Arc::new(Submodules::from_path(write_manifest(
        dir.path(),
        "submodules.yml",
        MANIFEST,
    )));
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let s = Arc::clone(&s);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                s.dependencies("github").unwrap().len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 2);
    }
}
