use xshell::Shell;

fn manifest_version(text: &str) -> Option<&str> {
    let line = text.lines().find(|it| it.starts_with("version = "))?;
    line.split('"').nth(1)
}

#[test]
fn versions_agree() {
    let sh = Shell::new().unwrap();
    sh.change_dir(env!("CARGO_MANIFEST_DIR"));
    sh.change_dir("..");

    let root = sh.read_file("Cargo.toml").unwrap();
    let macros = sh.read_file("optbind-macros/Cargo.toml").unwrap();

    let version = manifest_version(&root).unwrap();
    assert_eq!(manifest_version(&macros), Some(version), "optbind-macros/Cargo.toml");

    let pinned = format!("version = \"={version}\"");
    let dep = root.lines().find(|it| it.starts_with("optbind-macros = ")).unwrap();
    assert!(dep.contains(&pinned), "optbind-macros dependency is not pinned to {version}: {dep}");
}
